use crate::application::comment_service::CommentService;
use crate::application::post_service::PostService;
use crate::application::profile_service::ProfileService;
use crate::application::upvote_service::{CounterPolicy, UpvoteService};
use crate::data::RecordStore;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::security::JwtKeys;
use crate::presentation::handlers;
use crate::presentation::middleware::{IdentityMiddleware, RequestIdMiddleware, TimingMiddleware};
use actix_cors::Cors;
use actix_web::middleware::{DefaultHeaders, Logger};
use actix_web::{App, HttpResponse, HttpServer, Responder, web};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Application services over one record store, shared by every worker.
pub struct Services<S: RecordStore> {
    posts: web::Data<PostService<S>>,
    upvotes: web::Data<UpvoteService<S>>,
    comments: web::Data<CommentService<S>>,
    profiles: web::Data<ProfileService<S>>,
}

impl<S: RecordStore> Services<S> {
    pub fn new(store: Arc<S>, policy: CounterPolicy) -> Self {
        Self {
            posts: web::Data::new(PostService::new(Arc::clone(&store))),
            upvotes: web::Data::new(UpvoteService::new(Arc::clone(&store), policy)),
            comments: web::Data::new(CommentService::new(Arc::clone(&store))),
            profiles: web::Data::new(ProfileService::new(store)),
        }
    }

    pub fn install(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.posts.clone())
            .app_data(self.upvotes.clone())
            .app_data(self.comments.clone())
            .app_data(self.profiles.clone())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(health))
                    .configure(handlers::configure::<S>),
            );
    }
}

impl<S: RecordStore> Clone for Services<S> {
    fn clone(&self) -> Self {
        Self {
            posts: self.posts.clone(),
            upvotes: self.upvotes.clone(),
            comments: self.comments.clone(),
            profiles: self.profiles.clone(),
        }
    }
}

pub async fn start_rest_server<S: RecordStore>(config: AppConfig, store: Arc<S>) -> anyhow::Result<()> {
    let services = Services::new(store, config.upvote_policy);
    let keys = JwtKeys::new(config.jwt_secret.clone());
    let bind_address = (config.host.clone(), config.port);

    info!(
        host = %bind_address.0,
        port = bind_address.1,
        upvote_policy = %config.upvote_policy,
        "HTTP server starting"
    );

    HttpServer::new(move || {
        let cors = build_cors(&config);
        let services = services.clone();

        App::new()
            .wrap(IdentityMiddleware::new(keys.clone()))
            .wrap(TimingMiddleware)
            .wrap(RequestIdMiddleware)
            .wrap(Logger::default())
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("Referrer-Policy", "no-referrer"))
                    .add(("Permissions-Policy", "geolocation=()"))
                    .add(("Cross-Origin-Opener-Policy", "same-origin")),
            )
            .wrap(cors)
            .configure(|cfg| services.install(cfg))
    })
    .bind(bind_address)?
    .run()
    .await
    .map_err(anyhow::Error::new)?;

    info!("HTTP server stopped");
    Ok(())
}

fn build_cors(config: &AppConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec![
            actix_web::http::header::CONTENT_TYPE,
            actix_web::http::header::AUTHORIZATION,
        ])
        .max_age(3600);

    for origin in &config.cors_origins {
        cors = if origin == "*" {
            cors.allow_any_origin()
        } else {
            cors.allowed_origin(origin)
        };
    }

    cors
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
    })
}
