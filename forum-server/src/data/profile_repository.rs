use crate::data::postgres::PostgresStore;
use crate::domain::error::DomainError;
use crate::domain::profile::UserProfile;
use async_trait::async_trait;
use tracing::{error, info};
use uuid::Uuid;

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn create(&self, profile: UserProfile) -> Result<UserProfile, DomainError>;
    async fn find_by_identity(&self, identity_id: Uuid)
    -> Result<Option<UserProfile>, DomainError>;
}

#[async_trait]
impl ProfileRepository for PostgresStore {
    async fn create(&self, profile: UserProfile) -> Result<UserProfile, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO user_profiles (identity_id, display_name, created_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(profile.identity_id)
        .bind(&profile.display_name)
        .bind(profile.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to create profile: {}", e);
            if e.as_database_error()
                .map(|db| db.is_unique_violation())
                == Some(true)
            {
                DomainError::ProfileAlreadyExists(profile.display_name.clone())
            } else {
                DomainError::from(e)
            }
        })?;

        info!(identity_id = %profile.identity_id, display_name = %profile.display_name, "profile created");
        Ok(profile)
    }

    async fn find_by_identity(
        &self,
        identity_id: Uuid,
    ) -> Result<Option<UserProfile>, DomainError> {
        sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT identity_id, display_name, created_at
            FROM user_profiles
            WHERE identity_id = $1
            "#,
        )
        .bind(identity_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to find profile for {}: {}", identity_id, e);
            DomainError::from(e)
        })
    }
}
