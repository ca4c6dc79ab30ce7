use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForumClientError {
    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("Not found")]
    NotFound,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Forbidden")]
    Forbidden,
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Server error ({status}): {message}")]
    Api { status: StatusCode, message: String },
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl ForumClientError {
    pub async fn from_http_response(resp: reqwest::Response) -> Self {
        let status = resp.status();
        let message = match resp.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status.canonical_reason().unwrap_or("unknown error").to_string(),
        };
        match status {
            StatusCode::NOT_FOUND => ForumClientError::NotFound,
            StatusCode::UNAUTHORIZED => ForumClientError::Unauthorized,
            StatusCode::FORBIDDEN => ForumClientError::Forbidden,
            StatusCode::BAD_REQUEST | StatusCode::CONFLICT => {
                ForumClientError::InvalidRequest(message)
            }
            _ => ForumClientError::Api { status, message },
        }
    }
}
