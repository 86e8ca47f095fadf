//! Core design pricing calculation.
//!
//! Pure functions for the design area math - no database access.
//! The persisted record is assembled by `services` after a successful compute.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

use crate::error::ValidationError;

/// Fraction of the plot reserved for basic (non-optional) spaces.
pub const BASIC_AREA_RATIO: Decimal = dec!(0.5);

const ONE_HUNDRED: Decimal = dec!(100);

/// A selected design option.
///
/// Only `area` and `price` take part in the calculation; any other fields the
/// client sends are kept in the raw `opciones` payload, not here.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DesignOption {
    pub area: Decimal,
    pub price: Decimal,
}

impl DesignOption {
    pub fn new(area: Decimal, price: Decimal) -> Self {
        Self { area, price }
    }
}

/// Result of a design area calculation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesignCalculationResult {
    pub area_total: Decimal,
    pub area_basica: Decimal,
    pub area_disponible: Decimal,
    pub area_usada: Decimal,
    pub porcentaje_ocupado: Decimal,
    pub precio_total: Decimal,
}

/// Compute area usage and total price using the default basic allocation.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use design_studio::design::calculators::{compute, DesignOption};
///
/// let options = [
///     DesignOption::new(dec!(20), dec!(500)),
///     DesignOption::new(dec!(10), dec!(300)),
/// ];
/// let result = compute(dec!(100), &options).unwrap();
/// assert_eq!(result.porcentaje_ocupado, dec!(60));
/// assert_eq!(result.precio_total, dec!(800));
/// ```
pub fn compute(
    area_total: Decimal,
    options: &[DesignOption],
) -> Result<DesignCalculationResult, ValidationError> {
    compute_with_ratio(BASIC_AREA_RATIO, area_total, options)
}

/// Compute area usage and total price with an explicit basic allocation ratio.
///
/// When no area is left after the basic allocation the occupancy is reported
/// as zero rather than failing.
pub fn compute_with_ratio(
    basic_area_ratio: Decimal,
    area_total: Decimal,
    options: &[DesignOption],
) -> Result<DesignCalculationResult, ValidationError> {
    if area_total <= Decimal::ZERO {
        return Err(ValidationError::invalid("area_total debe ser mayor que cero"));
    }
    if options.is_empty() {
        return Err(ValidationError::invalid("Debe seleccionar al menos una opción"));
    }

    let area_basica = area_total
        .checked_mul(basic_area_ratio)
        .ok_or_else(out_of_range)?;
    let area_disponible = area_total - area_basica;

    let area_usada = checked_sum(options.iter().map(|o| o.area))?;
    let precio_total = checked_sum(options.iter().map(|o| o.price))?;

    let porcentaje_ocupado = if area_disponible > Decimal::ZERO {
        area_usada
            .checked_div(area_disponible)
            .and_then(|ratio| ratio.checked_mul(ONE_HUNDRED))
            .ok_or_else(out_of_range)?
    } else {
        Decimal::ZERO
    };

    Ok(DesignCalculationResult {
        area_total,
        area_basica,
        area_disponible,
        area_usada,
        porcentaje_ocupado,
        precio_total,
    })
}

fn checked_sum(mut values: impl Iterator<Item = Decimal>) -> Result<Decimal, ValidationError> {
    values.try_fold(Decimal::ZERO, |acc, v| {
        acc.checked_add(v).ok_or_else(out_of_range)
    })
}

fn out_of_range() -> ValidationError {
    ValidationError::invalid("Valor numérico fuera de rango")
}
