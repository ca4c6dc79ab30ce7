use crate::application::comment_service::CommentService;
use crate::application::profile_service::ProfileService;
use crate::data::RecordStore;
use crate::domain::error::DomainError;
use crate::presentation::dto::CommentRequest;
use crate::presentation::handlers::request_id;
use crate::presentation::utils::{AuthenticatedUser, require_profile};
use actix_web::{HttpRequest, HttpResponse, web};
use tracing::info;
use uuid::Uuid;

pub async fn list_comments<S: RecordStore>(
    comments: web::Data<CommentService<S>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let comments = comments.list_comments(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(comments))
}

pub async fn add_comment<S: RecordStore>(
    req: HttpRequest,
    user: AuthenticatedUser,
    comments: web::Data<CommentService<S>>,
    profiles: web::Data<ProfileService<S>>,
    payload: web::Json<CommentRequest>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let author = require_profile(profiles.get_ref(), user).await?;
    let comment = comments
        .add_comment(&author, path.into_inner(), payload.into_inner().content)
        .await?;

    info!(
        request_id = %request_id(&req),
        post_id = %comment.post_id,
        comment_id = %comment.id,
        "comment added"
    );

    Ok(HttpResponse::Created().json(comment))
}

pub async fn edit_comment<S: RecordStore>(
    req: HttpRequest,
    user: AuthenticatedUser,
    comments: web::Data<CommentService<S>>,
    payload: web::Json<CommentRequest>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let comment = comments
        .edit_comment(user.id, path.into_inner(), payload.into_inner().content)
        .await?;

    info!(
        request_id = %request_id(&req),
        comment_id = %comment.id,
        "comment edited"
    );

    Ok(HttpResponse::Ok().json(comment))
}

pub async fn delete_comment<S: RecordStore>(
    req: HttpRequest,
    user: AuthenticatedUser,
    comments: web::Data<CommentService<S>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let comment_id = path.into_inner();
    comments.delete_comment(user.id, comment_id).await?;

    info!(
        request_id = %request_id(&req),
        comment_id = %comment_id,
        "comment deleted"
    );

    Ok(HttpResponse::NoContent().finish())
}
