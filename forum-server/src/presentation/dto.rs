use crate::domain::feed::{FeedQuery, SortMode};
use crate::domain::post::Post;
use serde::{Deserialize, Serialize};

// ======================= POSTS =======================

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub caption: String,
    pub image_url: String,
}

#[derive(Debug, Serialize)]
pub struct FeedResponse {
    pub posts: Vec<Post>,
    pub total: usize,
    pub search: String,
    pub sort: SortMode,
}

impl FeedResponse {
    pub fn new(posts: Vec<Post>, query: FeedQuery) -> Self {
        Self {
            total: posts.len(),
            posts,
            search: query.search,
            sort: query.sort,
        }
    }
}

// ======================= COMMENTS =======================

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub content: String,
}

// ======================= PROFILE =======================

#[derive(Debug, Deserialize)]
pub struct ProfileRequest {
    pub display_name: String,
}
