pub mod comment;
pub mod post;
pub mod profile;

use actix_web::{HttpMessage, HttpRequest, web};

use crate::data::RecordStore;
use crate::presentation::middleware::RequestId;

/// Routes under `/api`. Generic over the record store so the same table
/// serves PostgreSQL and the in-memory store.
pub fn configure<S: RecordStore>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/posts")
            .route(web::get().to(post::list_posts::<S>))
            .route(web::post().to(post::create_post::<S>)),
    )
    .service(
        web::resource("/posts/{id}")
            .route(web::get().to(post::get_post::<S>))
            .route(web::put().to(post::update_post::<S>))
            .route(web::delete().to(post::delete_post::<S>)),
    )
    .service(web::resource("/posts/{id}/upvote").route(web::post().to(post::upvote_post::<S>)))
    .service(
        web::resource("/posts/{id}/comments")
            .route(web::get().to(comment::list_comments::<S>))
            .route(web::post().to(comment::add_comment::<S>)),
    )
    .service(
        web::resource("/comments/{id}")
            .route(web::put().to(comment::edit_comment::<S>))
            .route(web::delete().to(comment::delete_comment::<S>)),
    )
    .service(
        web::resource("/profile")
            .route(web::get().to(profile::get_profile::<S>))
            .route(web::post().to(profile::create_profile::<S>)),
    );
}

pub(crate) fn request_id(req: &HttpRequest) -> String {
    req.extensions()
        .get::<RequestId>()
        .map(|rid| rid.0.clone())
        .unwrap_or_else(|| "unknown".into())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use chrono::{Duration, Utc};
    use serde_json::{Value, json};
    use uuid::Uuid;

    use crate::application::upvote_service::CounterPolicy;
    use crate::data::memory::InMemoryStore;
    use crate::data::post_repository::PostRepository;
    use crate::domain::post::Post;
    use crate::infrastructure::security::JwtKeys;
    use crate::presentation::middleware::{IdentityMiddleware, RequestIdMiddleware};
    use crate::utils::Services;

    const SECRET: &str = "handler-test-secret";

    macro_rules! forum_app {
        ($store:expr) => {{
            let services = Services::new($store, CounterPolicy::ReadModifyWrite);
            test::init_service(
                App::new()
                    .wrap(IdentityMiddleware::new(JwtKeys::new(SECRET.into())))
                    .wrap(RequestIdMiddleware)
                    .configure(|cfg| services.install(cfg)),
            )
            .await
        }};
    }

    fn bearer(identity: Uuid) -> (&'static str, String) {
        let token = JwtKeys::new(SECRET.into()).generate_token(identity);
        ("Authorization", format!("Bearer {token}"))
    }

    async fn seed(store: &InMemoryStore, title: &str, caption: &str, upvotes: i64, age_min: i64) -> Uuid {
        let mut post = Post::new(
            Uuid::new_v4(),
            "seed".into(),
            title.into(),
            caption.into(),
            "https://img.example/seed.png".into(),
        );
        post.upvotes = upvotes;
        post.created_at = Some(Utc::now() - Duration::minutes(age_min));
        PostRepository::create(store, post).await.unwrap().id
    }

    fn ids(body: &Value) -> Vec<String> {
        body["posts"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_str().unwrap().to_string())
            .collect()
    }

    #[actix_web::test]
    async fn feed_is_filtered_and_ranked() {
        let store = Arc::new(InMemoryStore::new());
        let older = seed(&store, "Cats", "", 5, 30).await;
        let newer = seed(&store, "Dogs", "I love cats", 5, 10).await;
        let top = seed(&store, "Cat nap", "", 8, 60).await;
        seed(&store, "Birds", "tweet", 99, 0).await;
        let app = forum_app!(store);

        let req = test::TestRequest::get().uri("/api/posts?search=CAT").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["total"], 3);
        assert_eq!(body["sort"], "combined");
        assert_eq!(
            ids(&body),
            [top.to_string(), newer.to_string(), older.to_string()]
        );

        let req = test::TestRequest::get()
            .uri("/api/posts?search=cat&sort=recent")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            ids(&body),
            [newer.to_string(), older.to_string(), top.to_string()]
        );
    }

    #[actix_web::test]
    async fn unknown_sort_mode_is_rejected() {
        let app = forum_app!(Arc::new(InMemoryStore::new()));
        let req = test::TestRequest::get().uri("/api/posts?sort=hot").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn upvote_returns_stored_count() {
        let store = Arc::new(InMemoryStore::new());
        let id = seed(&store, "t", "c", 2, 0).await;
        let app = forum_app!(Arc::clone(&store));

        for expected in [3, 4] {
            let req = test::TestRequest::post()
                .uri(&format!("/api/posts/{id}/upvote"))
                .to_request();
            let body: Value = test::call_and_read_body_json(&app, req).await;
            assert_eq!(body, json!({ "id": id, "upvotes": expected }));
        }
        let stored = store.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.upvotes, 4);

        let req = test::TestRequest::post()
            .uri(&format!("/api/posts/{}/upvote", Uuid::new_v4()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn publishing_needs_identity_and_profile() {
        let app = forum_app!(Arc::new(InMemoryStore::new()));
        let me = Uuid::new_v4();
        let new_post = json!({
            "title": "Harbor",
            "caption": "morning fog",
            "image_url": "https://img.example/harbor.png"
        });

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(&new_post)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "unauthorized");

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(me))
            .set_json(&new_post)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/api/profile")
            .insert_header(bearer(me))
            .set_json(json!({ "display_name": "harbormaster" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(me))
            .set_json(&new_post)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let post: Value = test::read_body_json(resp).await;
        assert_eq!(post["author_name"], "harbormaster");
        assert_eq!(post["upvotes"], 0);
    }

    #[actix_web::test]
    async fn only_the_author_edits_or_deletes_a_post() {
        let app = forum_app!(Arc::new(InMemoryStore::new()));
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();

        let req = test::TestRequest::post()
            .uri("/api/profile")
            .insert_header(bearer(owner))
            .set_json(json!({ "display_name": "owner" }))
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(owner))
            .set_json(json!({
                "title": "Pier",
                "caption": "low tide",
                "image_url": "https://img.example/pier.png"
            }))
            .to_request();
        let post: Value = test::call_and_read_body_json(&app, req).await;
        let post_id = post["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::put()
            .uri(&format!("/api/posts/{post_id}"))
            .insert_header(bearer(stranger))
            .set_json(json!({ "title": "mine now" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/posts/{post_id}"))
            .insert_header(bearer(stranger))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::put()
            .uri(&format!("/api/posts/{post_id}"))
            .insert_header(bearer(owner))
            .set_json(json!({ "caption": "high tide" }))
            .to_request();
        let edited: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(edited["caption"], "high tide");
        assert_eq!(edited["title"], "Pier");

        let req = test::TestRequest::delete()
            .uri(&format!("/api/posts/{post_id}"))
            .insert_header(bearer(owner))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

        let req = test::TestRequest::get()
            .uri(&format!("/api/posts/{post_id}"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/posts/{post_id}"))
            .insert_header(bearer(owner))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn comment_lifecycle_respects_authorship() {
        let store = Arc::new(InMemoryStore::new());
        let post_id = seed(&store, "t", "c", 0, 0).await;
        let app = forum_app!(store);
        let author = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        for (who, name) in [(author, "writer"), (stranger, "stranger")] {
            let req = test::TestRequest::post()
                .uri("/api/profile")
                .insert_header(bearer(who))
                .set_json(json!({ "display_name": name }))
                .to_request();
            test::call_service(&app, req).await;
        }

        let req = test::TestRequest::post()
            .uri(&format!("/api/posts/{post_id}/comments"))
            .insert_header(bearer(author))
            .set_json(json!({ "content": "lovely light" }))
            .to_request();
        let comment: Value = test::call_and_read_body_json(&app, req).await;
        let comment_id = comment["id"].as_str().unwrap().to_string();
        assert_eq!(comment["author_name"], "writer");

        let req = test::TestRequest::put()
            .uri(&format!("/api/comments/{comment_id}"))
            .insert_header(bearer(stranger))
            .set_json(json!({ "content": "spam" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::put()
            .uri(&format!("/api/comments/{comment_id}"))
            .insert_header(bearer(author))
            .set_json(json!({ "content": "   " }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/comments/{comment_id}"))
            .insert_header(bearer(author))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

        let req = test::TestRequest::get()
            .uri(&format!("/api/posts/{post_id}/comments"))
            .to_request();
        let comments: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(comments, json!([]));
    }
}
