use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::error::DomainError;

const MAX_DISPLAY_NAME: usize = 32;

/// Display name chosen by an identity. One per identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserProfile {
    pub identity_id: Uuid,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn new(identity_id: Uuid, display_name: String) -> Result<Self, DomainError> {
        let display_name = display_name.trim().to_string();
        if display_name.is_empty() {
            return Err(DomainError::Validation("display name is required".into()));
        }
        if display_name.chars().count() > MAX_DISPLAY_NAME {
            return Err(DomainError::Validation(format!(
                "display name must be at most {MAX_DISPLAY_NAME} characters"
            )));
        }
        Ok(Self {
            identity_id,
            display_name,
            created_at: Utc::now(),
        })
    }
}
