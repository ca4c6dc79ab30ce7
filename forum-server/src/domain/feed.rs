use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::domain::post::Post;
use crate::domain::time::recency_key;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Most upvoted first.
    Upvotes,
    /// Newest first.
    Recent,
    /// Upvotes, then recency for equal upvotes. Not a weighted score.
    #[default]
    Combined,
}

impl SortMode {
    fn compare(self, a: &Post, b: &Post) -> Ordering {
        let by_upvotes = || b.upvotes.cmp(&a.upvotes);
        let by_recency = || recency_key(b.created_at).cmp(&recency_key(a.created_at));
        match self {
            SortMode::Upvotes => by_upvotes(),
            SortMode::Recent => by_recency(),
            SortMode::Combined => by_upvotes().then_with(by_recency),
        }
    }
}

/// Search text and sort mode for one feed render. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub sort: SortMode,
}

impl FeedQuery {
    pub fn new(search: impl Into<String>, sort: SortMode) -> Self {
        Self {
            search: search.into(),
            sort,
        }
    }

    fn matcher(&self) -> impl Fn(&Post) -> bool + '_ {
        let needle = self.search.to_lowercase();
        move |post: &Post| {
            needle.is_empty()
                || post.title.to_lowercase().contains(&needle)
                || post.caption.to_lowercase().contains(&needle)
        }
    }
}

/// Filters and orders `posts` for display.
///
/// Pure: the input is left untouched and equal-key posts keep their input
/// order, so the same collection and query always yield the same feed.
pub fn rank(posts: &[Post], query: &FeedQuery) -> Vec<Post> {
    let matches = query.matcher();
    let mut feed: Vec<Post> = posts.iter().filter(|&post| matches(post)).cloned().collect();
    // `sort_by` is a stable merge sort.
    feed.sort_by(|a, b| query.sort.compare(a, b));
    feed
}
