use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

mod error;
mod feed_view;
mod http_client;

pub use error::ForumClientError;
pub use feed_view::{FeedView, time_ago};
pub use http_client::ForumClientHttp;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub author_name: String,
    pub title: String,
    pub caption: String,
    pub image_url: String,
    pub upvotes: i64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub author_name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub identity_id: Uuid,
    pub display_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpvoteResult {
    pub id: Uuid,
    pub upvotes: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    Upvotes,
    Recent,
    #[default]
    Combined,
}

impl SortMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SortMode::Upvotes => "upvotes",
            SortMode::Recent => "recent",
            SortMode::Combined => "combined",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct NewPost {
    pub title: String,
    pub caption: String,
    pub image_url: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PostEdit {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Forum API as seen by a front end.
#[async_trait(?Send)]
pub trait ForumApi {
    /// Server-ranked feed. The server re-reads and re-ranks on every call.
    async fn feed(&self, search: &str, sort: SortMode) -> Result<Vec<Post>, ForumClientError>;
    async fn get_post(&self, id: Uuid) -> Result<Post, ForumClientError>;
    /// Not idempotent: each call adds one upvote.
    async fn upvote(&self, id: Uuid) -> Result<UpvoteResult, ForumClientError>;
    async fn create_post(&self, post: &NewPost) -> Result<Post, ForumClientError>;
    async fn update_post(&self, id: Uuid, edit: &PostEdit) -> Result<Post, ForumClientError>;
    async fn delete_post(&self, id: Uuid) -> Result<(), ForumClientError>;
    async fn list_comments(&self, post_id: Uuid) -> Result<Vec<Comment>, ForumClientError>;
    async fn add_comment(&self, post_id: Uuid, content: &str) -> Result<Comment, ForumClientError>;
    async fn edit_comment(&self, id: Uuid, content: &str) -> Result<Comment, ForumClientError>;
    async fn delete_comment(&self, id: Uuid) -> Result<(), ForumClientError>;
    async fn create_profile(&self, display_name: &str) -> Result<Profile, ForumClientError>;
}
