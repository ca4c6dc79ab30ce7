use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::error::DomainError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub author_name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(
        post_id: Uuid,
        author_id: Uuid,
        author_name: String,
        content: String,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            id: Uuid::new_v4(),
            post_id,
            author_id,
            author_name,
            content: validate_content(content)?,
            created_at: Utc::now(),
        })
    }
}

pub fn validate_content(content: String) -> Result<String, DomainError> {
    if content.trim().is_empty() {
        return Err(DomainError::Validation(
            "comment cannot be empty".to_string(),
        ));
    }
    Ok(content)
}
