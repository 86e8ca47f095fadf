//! Website quote formula.
//!
//! Pure functions - no database access. Independent of the design calculator.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::str::FromStr;

use crate::error::ValidationError;

/// Flat price every website starts from
pub const BASE_PRICE: Decimal = dec!(200000);

/// Price of one page before the design multiplier
pub const PRICE_PER_PAGE: Decimal = dec!(50000);

/// Added once when the site ships in more than one language
pub const MULTILANGUAGE_SURCHARGE: Decimal = dec!(150000);

/// Design complexity tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesignLevel {
    Basic,
    Intermediate,
    Advanced,
}

impl DesignLevel {
    pub fn multiplier(self) -> Decimal {
        match self {
            DesignLevel::Basic => dec!(1.0),
            DesignLevel::Intermediate => dec!(1.5),
            DesignLevel::Advanced => dec!(2.0),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DesignLevel::Basic => "basic",
            DesignLevel::Intermediate => "intermediate",
            DesignLevel::Advanced => "advanced",
        }
    }
}

impl FromStr for DesignLevel {
    type Err = ValidationError;

    /// Accepts the English names and the Spanish ones the site used first.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basic" | "básico" | "basico" => Ok(DesignLevel::Basic),
            "intermediate" | "intermedio" => Ok(DesignLevel::Intermediate),
            "advanced" | "avanzado" => Ok(DesignLevel::Advanced),
            _ => Err(ValidationError::invalid(format!(
                "design_level inválido: '{}' (basic, intermediate, advanced)",
                s
            ))),
        }
    }
}

/// Quote a website: base + pages * per-page * level multiplier, plus the
/// multilanguage surcharge when requested.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use design_studio::quote::calculate_price;
///
/// assert_eq!(calculate_price(10, "basic", false).unwrap(), dec!(700000));
/// assert_eq!(calculate_price(10, "basic", true).unwrap(), dec!(850000));
/// ```
pub fn calculate_price(
    pages: i64,
    design_level: &str,
    has_multilanguage: bool,
) -> Result<Decimal, ValidationError> {
    let level: DesignLevel = design_level.parse()?;
    price_for_level(pages, level, has_multilanguage)
}

/// Same as [`calculate_price`] with an already parsed level
pub fn price_for_level(
    pages: i64,
    level: DesignLevel,
    has_multilanguage: bool,
) -> Result<Decimal, ValidationError> {
    if pages < 1 {
        return Err(ValidationError::invalid("num_pages debe ser al menos 1"));
    }

    let mut total = BASE_PRICE + Decimal::from(pages) * PRICE_PER_PAGE * level.multiplier();

    if has_multilanguage {
        total += MULTILANGUAGE_SURCHARGE;
    }

    Ok(total)
}
