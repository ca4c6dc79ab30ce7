use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use crate::data::profile_repository::ProfileRepository;
use crate::domain::{error::DomainError, profile::UserProfile};

#[derive(Clone)]
pub struct ProfileService<R: ProfileRepository + 'static> {
    repo: Arc<R>,
}

impl<R> ProfileService<R>
where
    R: ProfileRepository + 'static,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// The caller's profile. Content cannot be published without one.
    pub async fn get_profile(&self, identity_id: Uuid) -> Result<UserProfile, DomainError> {
        self.repo
            .find_by_identity(identity_id)
            .await?
            .ok_or(DomainError::ProfileNotFound(identity_id))
    }

    #[instrument(skip(self))]
    pub async fn claim_display_name(
        &self,
        identity_id: Uuid,
        display_name: String,
    ) -> Result<UserProfile, DomainError> {
        if self.repo.find_by_identity(identity_id).await?.is_some() {
            return Err(DomainError::ProfileAlreadyExists(
                "identity already has a profile".to_string(),
            ));
        }
        let profile = UserProfile::new(identity_id, display_name)?;
        self.repo.create(profile).await
    }
}
