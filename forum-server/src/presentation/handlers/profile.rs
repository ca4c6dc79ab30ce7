use crate::application::profile_service::ProfileService;
use crate::data::RecordStore;
use crate::domain::error::DomainError;
use crate::presentation::dto::ProfileRequest;
use crate::presentation::utils::AuthenticatedUser;
use actix_web::{HttpResponse, web};
use tracing::info;

pub async fn get_profile<S: RecordStore>(
    user: AuthenticatedUser,
    profiles: web::Data<ProfileService<S>>,
) -> Result<HttpResponse, DomainError> {
    let profile = profiles.get_profile(user.id).await?;
    Ok(HttpResponse::Ok().json(profile))
}

pub async fn create_profile<S: RecordStore>(
    user: AuthenticatedUser,
    profiles: web::Data<ProfileService<S>>,
    payload: web::Json<ProfileRequest>,
) -> Result<HttpResponse, DomainError> {
    let profile = profiles
        .claim_display_name(user.id, payload.into_inner().display_name)
        .await?;

    info!(identity_id = %user.id, display_name = %profile.display_name, "profile created");

    Ok(HttpResponse::Created().json(profile))
}
