//! HTTP handler for the website quote.

use axum::{extract::rejection::JsonRejection, routing::post, Json, Router};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::AppState;

use super::calculators::{price_for_level, DesignLevel};

/// Request to quote a website
#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub num_pages: i64,
    pub design_level: String,
    pub has_multilanguage: bool,
}

/// Response for the website quote
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
}

/// Quote routes, mounted under `/api`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/calculator/", post(quote))
        .route("/calculator", post(quote))
}

async fn quote(
    payload: std::result::Result<Json<QuoteRequest>, JsonRejection>,
) -> Result<Json<QuoteResponse>> {
    let Json(request) = payload?;

    let level: DesignLevel = request.design_level.parse()?;
    let total_price = price_for_level(request.num_pages, level, request.has_multilanguage)?;

    tracing::debug!(
        num_pages = request.num_pages,
        design_level = level.as_str(),
        %total_price,
        "Website quote calculated"
    );

    Ok(Json(QuoteResponse { total_price }))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::test_support::test_app;

    async fn post_quote(body: Value) -> (StatusCode, Value) {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/calculator/")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_quote_ok() {
        let (status, body) = post_quote(json!({
            "num_pages": 10,
            "design_level": "basic",
            "has_multilanguage": true
        }))
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "total_price": 850000.0 }));
    }

    #[tokio::test]
    async fn test_quote_invalid_level_is_400() {
        let (status, body) = post_quote(json!({
            "num_pages": 5,
            "design_level": "nonexistent_level",
            "has_multilanguage": false
        }))
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("design_level"));
    }

    #[tokio::test]
    async fn test_quote_zero_pages_is_400() {
        let (status, _) = post_quote(json!({
            "num_pages": 0,
            "design_level": "advanced",
            "has_multilanguage": false
        }))
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_quote_missing_field_is_400() {
        let (status, body) = post_quote(json!({ "num_pages": 3 })).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_quote_accepts_spanish_level() {
        let (status, body) = post_quote(json!({
            "num_pages": 4,
            "design_level": "Intermedio",
            "has_multilanguage": false
        }))
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "total_price": 500000.0 }));
    }
}
