use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::data::comment_repository::CommentRepository;
use crate::data::post_repository::PostRepository;
use crate::data::profile_repository::ProfileRepository;
use crate::domain::comment::Comment;
use crate::domain::error::DomainError;
use crate::domain::post::{CounterField, Post, PostUpdate};
use crate::domain::profile::UserProfile;

#[derive(Default)]
struct Tables {
    posts: Vec<Post>,
    comments: Vec<Comment>,
    profiles: HashMap<Uuid, UserProfile>,
}

/// Process-local record store. Used when no `DATABASE_URL` is configured
/// and as the base for test doubles.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn counter_mut(post: &mut Post, field: CounterField) -> &mut i64 {
    match field {
        CounterField::Upvotes => &mut post.upvotes,
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn create(&self, post: Post) -> Result<Post, DomainError> {
        self.tables.write().await.posts.push(post.clone());
        info!(post_id = %post.id, author_id = %post.author_id, "post created");
        Ok(post)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn list_posts(&self) -> Result<Vec<Post>, DomainError> {
        Ok(self.tables.read().await.posts.clone())
    }

    async fn set_counter(
        &self,
        id: Uuid,
        field: CounterField,
        value: i64,
    ) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        let post = tables
            .posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(DomainError::PostNotFound(id))?;
        *counter_mut(post, field) = value;
        info!(post_id = %id, counter = field.column(), value, "counter written");
        Ok(())
    }

    async fn increment_counter(&self, id: Uuid, field: CounterField) -> Result<i64, DomainError> {
        let mut tables = self.tables.write().await;
        let post = tables
            .posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(DomainError::PostNotFound(id))?;
        let counter = counter_mut(post, field);
        *counter = counter
            .checked_add(1)
            .ok_or_else(|| DomainError::Internal(format!("{} overflow", field.column())))?;
        let value = *counter;
        info!(post_id = %id, counter = field.column(), value, "counter incremented");
        Ok(value)
    }

    async fn update_post(
        &self,
        id: Uuid,
        author_id: Uuid,
        update: PostUpdate,
    ) -> Result<Option<Post>, DomainError> {
        let mut tables = self.tables.write().await;
        let Some(post) = tables
            .posts
            .iter_mut()
            .find(|p| p.id == id && p.author_id == author_id)
        else {
            return Ok(None);
        };
        update.apply(post);
        info!(post_id = %id, "post updated");
        Ok(Some(post.clone()))
    }

    async fn delete_post(&self, id: Uuid, author_id: Uuid) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        let post = tables
            .posts
            .iter()
            .find(|p| p.id == id)
            .ok_or(DomainError::PostNotFound(id))?;
        if post.author_id != author_id {
            return Err(DomainError::Forbidden);
        }
        tables.posts.retain(|p| p.id != id);
        tables.comments.retain(|c| c.post_id != id);
        info!(post_id = %id, "post deleted");
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, DomainError> {
        let tables = self.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(comments)
    }

    async fn create(&self, comment: Comment) -> Result<Comment, DomainError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.iter().any(|p| p.id == comment.post_id) {
            return Err(DomainError::PostNotFound(comment.post_id));
        }
        tables.comments.push(comment.clone());
        info!(comment_id = %comment.id, post_id = %comment.post_id, "comment created");
        Ok(comment)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.comments.iter().find(|c| c.id == id).cloned())
    }

    async fn update_content(
        &self,
        id: Uuid,
        author_id: Uuid,
        content: String,
    ) -> Result<Option<Comment>, DomainError> {
        let mut tables = self.tables.write().await;
        let Some(comment) = tables
            .comments
            .iter_mut()
            .find(|c| c.id == id && c.author_id == author_id)
        else {
            return Ok(None);
        };
        comment.content = content;
        info!(comment_id = %id, "comment updated");
        Ok(Some(comment.clone()))
    }

    async fn delete(&self, id: Uuid, author_id: Uuid) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        let comment = tables
            .comments
            .iter()
            .find(|c| c.id == id)
            .ok_or(DomainError::CommentNotFound(id))?;
        if comment.author_id != author_id {
            return Err(DomainError::Forbidden);
        }
        tables.comments.retain(|c| c.id != id);
        info!(comment_id = %id, "comment deleted");
        Ok(())
    }
}

#[async_trait]
impl ProfileRepository for InMemoryStore {
    async fn create(&self, profile: UserProfile) -> Result<UserProfile, DomainError> {
        let mut tables = self.tables.write().await;
        let taken = tables.profiles.contains_key(&profile.identity_id)
            || tables
                .profiles
                .values()
                .any(|p| p.display_name == profile.display_name);
        if taken {
            return Err(DomainError::ProfileAlreadyExists(profile.display_name));
        }
        tables.profiles.insert(profile.identity_id, profile.clone());
        info!(identity_id = %profile.identity_id, display_name = %profile.display_name, "profile created");
        Ok(profile)
    }

    async fn find_by_identity(
        &self,
        identity_id: Uuid,
    ) -> Result<Option<UserProfile>, DomainError> {
        Ok(self.tables.read().await.profiles.get(&identity_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(author_id: Uuid) -> Post {
        Post::new(
            author_id,
            "author".into(),
            "title".into(),
            "caption".into(),
            "https://img.example/a.png".into(),
        )
    }

    #[tokio::test]
    async fn deleting_a_post_cascades_to_its_comments() {
        let store = InMemoryStore::new();
        let author = Uuid::new_v4();
        let kept = PostRepository::create(&store, post(author)).await.unwrap();
        let doomed = PostRepository::create(&store, post(author)).await.unwrap();
        for target in [kept.id, doomed.id] {
            let comment = Comment::new(target, author, "author".into(), "hi".into()).unwrap();
            CommentRepository::create(&store, comment).await.unwrap();
        }

        store.delete_post(doomed.id, author).await.unwrap();

        assert!(store.list_for_post(doomed.id).await.unwrap().is_empty());
        assert_eq!(store.list_for_post(kept.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn comment_on_missing_post_is_rejected() {
        let store = InMemoryStore::new();
        let orphan = Comment::new(Uuid::new_v4(), Uuid::new_v4(), "x".into(), "hi".into()).unwrap();
        let err = CommentRepository::create(&store, orphan).await.unwrap_err();
        assert!(matches!(err, DomainError::PostNotFound(_)));
    }

    #[tokio::test]
    async fn display_names_are_unique() {
        let store = InMemoryStore::new();
        let first = UserProfile::new(Uuid::new_v4(), "maker".into()).unwrap();
        let second = UserProfile::new(Uuid::new_v4(), "maker".into()).unwrap();
        ProfileRepository::create(&store, first).await.unwrap();
        let err = ProfileRepository::create(&store, second).await.unwrap_err();
        assert!(matches!(err, DomainError::ProfileAlreadyExists(_)));
    }

    #[tokio::test]
    async fn list_posts_keeps_insertion_order() {
        let store = InMemoryStore::new();
        let author = Uuid::new_v4();
        let a = PostRepository::create(&store, post(author)).await.unwrap();
        let b = PostRepository::create(&store, post(author)).await.unwrap();
        let ids: Vec<Uuid> = store.list_posts().await.unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, [a.id, b.id]);
    }
}
