//! Upvote counter protocol.
//!
//! The default `read-modify-write` policy reads the stored count, writes
//! `count + 1` back keyed only by the post id, and reports the computed value.
//! The read and the write are separate store calls with no compare-and-swap,
//! so two concurrent upvotes that read the same base value both write
//! `base + 1` and one increment is lost. The `atomic` policy delegates the
//! increment to the store as a single statement and has no such window.
//!
//! Neither policy is idempotent: every call adds one. Callers that must count
//! a user action once have to stop it from firing twice.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::data::post_repository::PostRepository;
use crate::domain::error::DomainError;
use crate::domain::post::CounterField;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CounterPolicy {
    #[default]
    ReadModifyWrite,
    Atomic,
}

impl FromStr for CounterPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "read-modify-write" | "rmw" => Ok(CounterPolicy::ReadModifyWrite),
            "atomic" => Ok(CounterPolicy::Atomic),
            other => Err(format!("unknown counter policy: {other}")),
        }
    }
}

impl fmt::Display for CounterPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CounterPolicy::ReadModifyWrite => f.write_str("read-modify-write"),
            CounterPolicy::Atomic => f.write_str("atomic"),
        }
    }
}

/// Authoritative count after a successful upvote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UpvoteResult {
    pub id: Uuid,
    pub upvotes: i64,
}

#[derive(Clone)]
pub struct UpvoteService<R: PostRepository + 'static> {
    repo: Arc<R>,
    policy: CounterPolicy,
}

impl<R> UpvoteService<R>
where
    R: PostRepository + 'static,
{
    pub fn new(repo: Arc<R>, policy: CounterPolicy) -> Self {
        Self { repo, policy }
    }

    pub async fn upvote(&self, post_id: Uuid) -> Result<UpvoteResult, DomainError> {
        let upvotes = self.increment(post_id, CounterField::Upvotes).await?;
        Ok(UpvoteResult {
            id: post_id,
            upvotes,
        })
    }

    /// Adds exactly one to `field`. Store failures are returned as-is; there
    /// is no retry.
    #[instrument(skip(self), fields(policy = %self.policy))]
    pub async fn increment(&self, post_id: Uuid, field: CounterField) -> Result<i64, DomainError> {
        let result = match self.policy {
            CounterPolicy::ReadModifyWrite => self.read_modify_write(post_id, field).await,
            CounterPolicy::Atomic => self.repo.increment_counter(post_id, field).await,
        };
        if let Err(err) = &result {
            warn!(%post_id, error = %err, "counter update failed");
        }
        result
    }

    async fn read_modify_write(&self, post_id: Uuid, field: CounterField) -> Result<i64, DomainError> {
        let post = self
            .repo
            .find_by_id(post_id)
            .await?
            .ok_or(DomainError::PostNotFound(post_id))?;
        let next = post
            .counter(field)
            .checked_add(1)
            .ok_or_else(|| DomainError::Internal(format!("{} overflow", field.column())))?;
        self.repo.set_counter(post_id, field, next).await?;
        Ok(next)
    }
}
