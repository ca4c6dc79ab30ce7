use actix_web::dev::Payload;
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{Ready, ready};
use uuid::Uuid;

use crate::application::profile_service::ProfileService;
use crate::data::profile_repository::ProfileRepository;
use crate::domain::error::DomainError;
use crate::domain::profile::UserProfile;

/// Identity resolved from a verified bearer token. Extracting it on a route
/// makes the route reject anonymous callers with 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: Uuid,
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>() {
            Some(user) => ready(Ok(*user)),
            None => ready(Err(DomainError::Unauthorized.into())),
        }
    }
}

/// Publishing needs a display name to stamp on the content.
pub async fn require_profile<R: ProfileRepository + 'static>(
    profiles: &ProfileService<R>,
    user: AuthenticatedUser,
) -> Result<UserProfile, DomainError> {
    profiles.get_profile(user.id).await.map_err(|err| match err {
        DomainError::ProfileNotFound(_) => DomainError::Validation(
            "choose a display name (POST /api/profile) before publishing".to_string(),
        ),
        other => other,
    })
}
