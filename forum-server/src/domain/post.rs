use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::time::lenient_timestamp;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub author_name: String,
    pub title: String,
    pub caption: String,
    pub image_url: String,
    #[serde(default)]
    pub upvotes: i64,
    /// Assigned once by [`Post::new`]. `None` when the stored value is
    /// missing or could not be parsed.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Post {
    pub fn new(
        author_id: Uuid,
        author_name: String,
        title: String,
        caption: String,
        image_url: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id,
            author_name,
            title,
            caption,
            image_url,
            upvotes: 0,
            created_at: Some(Utc::now()),
        }
    }

    pub fn counter(&self, field: CounterField) -> i64 {
        match field {
            CounterField::Upvotes => self.upvotes,
        }
    }
}

/// Monotonically increasing counters stored on a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterField {
    Upvotes,
}

impl CounterField {
    pub fn column(self) -> &'static str {
        match self {
            CounterField::Upvotes => "upvotes",
        }
    }
}

/// Author edit of a post. Counters and `created_at` are not editable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostUpdate {
    pub title: Option<String>,
    pub caption: Option<String>,
    pub image_url: Option<String>,
}

impl PostUpdate {
    pub fn apply(self, post: &mut Post) {
        if let Some(title) = self.title {
            post.title = title;
        }
        if let Some(caption) = self.caption {
            post.caption = caption;
        }
        if let Some(image_url) = self.image_url {
            post.image_url = image_url;
        }
    }
}
