use crate::error::ForumClientError;
use crate::{ForumApi, Post, SortMode};
use chrono::{DateTime, Utc};
use tracing::warn;
use uuid::Uuid;

/// Posts as currently shown to the user, in server order.
#[derive(Debug, Default, Clone)]
pub struct FeedView {
    posts: Vec<Post>,
    search: String,
    sort: SortMode,
}

impl FeedView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn sort(&self) -> SortMode {
        self.sort
    }

    /// Replaces the displayed list with a freshly ranked one.
    pub async fn load<A: ForumApi + ?Sized>(
        &mut self,
        api: &A,
        search: &str,
        sort: SortMode,
    ) -> Result<(), ForumClientError> {
        self.posts = api.feed(search, sort).await?;
        self.search = search.to_string();
        self.sort = sort;
        Ok(())
    }

    pub async fn reload<A: ForumApi + ?Sized>(&mut self, api: &A) -> Result<(), ForumClientError> {
        let search = self.search.clone();
        let sort = self.sort;
        self.load(api, &search, sort).await
    }

    /// Sends one upvote. The displayed count changes only to the value the
    /// server confirmed; on failure it stays as it was.
    pub async fn upvote<A: ForumApi + ?Sized>(
        &mut self,
        api: &A,
        post_id: Uuid,
    ) -> Result<i64, ForumClientError> {
        match api.upvote(post_id).await {
            Ok(result) => {
                if let Some(post) = self.posts.iter_mut().find(|p| p.id == result.id) {
                    post.upvotes = result.upvotes;
                }
                Ok(result.upvotes)
            }
            Err(err) => {
                warn!(post_id = %post_id, error = %err, "upvote not applied");
                Err(err)
            }
        }
    }
}

const INTERVALS: [(&str, i64); 6] = [
    ("year", 31_536_000),
    ("month", 2_592_000),
    ("week", 604_800),
    ("day", 86_400),
    ("hour", 3_600),
    ("minute", 60),
];

/// Human-readable age of a timestamp relative to `now`.
pub fn time_ago(timestamp: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(timestamp) = timestamp else {
        return "Invalid date".to_string();
    };
    let seconds = (now - timestamp).num_seconds();

    for (unit, size) in INTERVALS {
        let count = seconds / size;
        if count >= 1 {
            let plural = if count > 1 { "s" } else { "" };
            return format!("{count} {unit}{plural} ago");
        }
    }

    "Just now".to_string()
}
