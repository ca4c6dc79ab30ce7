use crate::application::post_service::PostService;
use crate::application::profile_service::ProfileService;
use crate::application::upvote_service::UpvoteService;
use crate::data::RecordStore;
use crate::domain::error::DomainError;
use crate::domain::feed::FeedQuery;
use crate::domain::post::PostUpdate;
use crate::presentation::dto::{CreatePostRequest, FeedResponse};
use crate::presentation::handlers::request_id;
use crate::presentation::utils::{AuthenticatedUser, require_profile};
use actix_web::{HttpRequest, HttpResponse, web};
use tracing::info;
use uuid::Uuid;

pub async fn list_posts<S: RecordStore>(
    req: HttpRequest,
    posts: web::Data<PostService<S>>,
    query: web::Query<FeedQuery>,
) -> Result<HttpResponse, DomainError> {
    let query = query.into_inner();
    let feed = posts.feed(&query).await?;

    info!(
        request_id = %request_id(&req),
        sort = ?query.sort,
        shown = feed.len(),
        "feed served"
    );

    Ok(HttpResponse::Ok().json(FeedResponse::new(feed, query)))
}

pub async fn get_post<S: RecordStore>(
    posts: web::Data<PostService<S>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let post = posts.get_post(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// Adds one upvote per call. The response carries the stored count; clients
/// should show it only after this succeeds and must not fire twice for one
/// user action.
pub async fn upvote_post<S: RecordStore>(
    req: HttpRequest,
    upvotes: web::Data<UpvoteService<S>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let result = upvotes.upvote(path.into_inner()).await?;

    info!(
        request_id = %request_id(&req),
        post_id = %result.id,
        upvotes = result.upvotes,
        "post upvoted"
    );

    Ok(HttpResponse::Ok().json(result))
}

pub async fn create_post<S: RecordStore>(
    req: HttpRequest,
    user: AuthenticatedUser,
    posts: web::Data<PostService<S>>,
    profiles: web::Data<ProfileService<S>>,
    payload: web::Json<CreatePostRequest>,
) -> Result<HttpResponse, DomainError> {
    let author = require_profile(profiles.get_ref(), user).await?;
    let payload = payload.into_inner();
    let post = posts
        .create_post(&author, payload.title, payload.caption, payload.image_url)
        .await?;

    info!(
        request_id = %request_id(&req),
        author = %author.display_name,
        post_id = %post.id,
        "post created"
    );

    Ok(HttpResponse::Created().json(post))
}

pub async fn update_post<S: RecordStore>(
    req: HttpRequest,
    user: AuthenticatedUser,
    posts: web::Data<PostService<S>>,
    payload: web::Json<PostUpdate>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    let post = posts.update_post(user.id, post_id, payload.into_inner()).await?;

    info!(
        request_id = %request_id(&req),
        author_id = %user.id,
        post_id = %post_id,
        "post updated"
    );

    Ok(HttpResponse::Ok().json(post))
}

pub async fn delete_post<S: RecordStore>(
    req: HttpRequest,
    user: AuthenticatedUser,
    posts: web::Data<PostService<S>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    posts.delete_post(user.id, post_id).await?;

    info!(
        request_id = %request_id(&req),
        author_id = %user.id,
        post_id = %post_id,
        "post deleted"
    );

    Ok(HttpResponse::NoContent().finish())
}
