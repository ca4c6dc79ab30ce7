use serde::Deserialize;

use crate::application::upvote_service::CounterPolicy;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Unset means the process-local store.
    pub database_url: Option<String>,
    pub jwt_secret: String,
    #[serde(default)]
    pub cors_origins: Vec<String>,
    #[serde(skip)]
    pub upvote_policy: CounterPolicy,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".into())
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid PORT: {}", e))?;
        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());
        let jwt_secret =
            std::env::var("JWT_SECRET").map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?;
        let cors_origins = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let upvote_policy = match std::env::var("UPVOTE_POLICY") {
            Ok(raw) => raw.parse().map_err(|e| anyhow::anyhow!("invalid UPVOTE_POLICY: {}", e))?,
            Err(_) => CounterPolicy::default(),
        };

        Ok(Self {
            host,
            port,
            database_url,
            jwt_secret,
            cors_origins,
            upvote_policy,
        })
    }
}
