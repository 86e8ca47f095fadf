//! Blog models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::ValidationError;

/// Blog post from blog_posts
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BlogPost {
    pub id: i32,
    pub title: String,
    pub category: String,
    pub image: Option<String>,
    pub date: NaiveDate,
    pub read_time: String,
    pub featured: bool,
}

/// One row of the interaction log
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InteractionEvent {
    pub id: i64,
    pub blog_id: i32,
    pub visitor_id: Uuid,
    pub liked: bool,
    pub favorited: bool,
    pub created_at: DateTime<Utc>,
}

/// Likes and favorites derived from the latest event of each visitor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromRow, Serialize)]
pub struct InteractionCounts {
    pub likes: i64,
    pub favorites: i64,
}

/// Request to record a visitor's like/favorite state
#[derive(Debug, Deserialize)]
pub struct RecordInteractionRequest {
    pub visitor_id: Uuid,
    #[serde(default)]
    pub liked: bool,
    #[serde(default)]
    pub favorited: bool,
}

impl RecordInteractionRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.visitor_id.is_nil() {
            return Err(ValidationError::invalid("visitor_id es obligatorio"));
        }
        Ok(())
    }
}

/// Query parameters for reading interaction counts
#[derive(Debug, Default, Deserialize)]
pub struct InteractionQuery {
    #[serde(default)]
    pub visitor_id: Option<Uuid>,
}

/// Counts plus, when asked for, the visitor's own latest state
#[derive(Debug, Clone, Serialize)]
pub struct InteractionSummary {
    pub blog_id: i32,
    #[serde(flatten)]
    pub counts: InteractionCounts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visitor: Option<VisitorState>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow, Serialize)]
pub struct VisitorState {
    pub liked: bool,
    pub favorited: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nil_visitor_rejected() {
        let req = RecordInteractionRequest {
            visitor_id: Uuid::nil(),
            liked: true,
            favorited: false,
        };
        assert!(req.validate().is_err());

        let req = RecordInteractionRequest {
            visitor_id: Uuid::new_v4(),
            ..req
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_flags_default_to_false() {
        let req: RecordInteractionRequest = serde_json::from_value(json!({
            "visitor_id": "6f1c2a4e-8d0b-4a55-9a57-1d2f3e4a5b6c",
            "liked": true
        }))
        .unwrap();

        assert!(req.liked);
        assert!(!req.favorited);
    }

    #[test]
    fn test_summary_flattens_counts() {
        let summary = InteractionSummary {
            blog_id: 3,
            counts: InteractionCounts { likes: 5, favorites: 2 },
            visitor: None,
        };

        assert_eq!(
            serde_json::to_value(&summary).unwrap(),
            json!({ "blog_id": 3, "likes": 5, "favorites": 2 })
        );
    }
}
