use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use crate::data::comment_repository::CommentRepository;
use crate::data::post_repository::PostRepository;
use crate::domain::comment::{Comment, validate_content};
use crate::domain::error::DomainError;
use crate::domain::profile::UserProfile;

#[derive(Clone)]
pub struct CommentService<R: CommentRepository + PostRepository + 'static> {
    repo: Arc<R>,
}

impl<R> CommentService<R>
where
    R: CommentRepository + PostRepository + 'static,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Newest first. A missing post is a `PostNotFound`, not an empty list.
    pub async fn list_comments(&self, post_id: Uuid) -> Result<Vec<Comment>, DomainError> {
        PostRepository::find_by_id(self.repo.as_ref(), post_id)
            .await?
            .ok_or(DomainError::PostNotFound(post_id))?;
        self.repo.list_for_post(post_id).await
    }

    #[instrument(skip(self, author, content), fields(author_id = %author.identity_id))]
    pub async fn add_comment(
        &self,
        author: &UserProfile,
        post_id: Uuid,
        content: String,
    ) -> Result<Comment, DomainError> {
        let comment = Comment::new(
            post_id,
            author.identity_id,
            author.display_name.clone(),
            content,
        )?;
        CommentRepository::create(self.repo.as_ref(), comment).await
    }

    #[instrument(skip(self, content))]
    pub async fn edit_comment(
        &self,
        author_id: Uuid,
        comment_id: Uuid,
        content: String,
    ) -> Result<Comment, DomainError> {
        let content = validate_content(content)?;
        let existing = CommentRepository::find_by_id(self.repo.as_ref(), comment_id)
            .await?
            .ok_or(DomainError::CommentNotFound(comment_id))?;
        if existing.author_id != author_id {
            return Err(DomainError::Forbidden);
        }
        self.repo
            .update_content(comment_id, author_id, content)
            .await?
            .ok_or(DomainError::CommentNotFound(comment_id))
    }

    #[instrument(skip(self))]
    pub async fn delete_comment(&self, author_id: Uuid, comment_id: Uuid) -> Result<(), DomainError> {
        self.repo.delete(comment_id, author_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory::InMemoryStore;
    use crate::domain::post::Post;
    use chrono::Duration;

    async fn setup() -> (CommentService<InMemoryStore>, Arc<InMemoryStore>, Uuid) {
        let store = Arc::new(InMemoryStore::new());
        let post = Post::new(
            Uuid::new_v4(),
            "op".into(),
            "t".into(),
            "c".into(),
            "https://img.example/c.png".into(),
        );
        let post_id = post.id;
        PostRepository::create(store.as_ref(), post).await.unwrap();
        (CommentService::new(Arc::clone(&store)), store, post_id)
    }

    fn profile(name: &str) -> UserProfile {
        UserProfile::new(Uuid::new_v4(), name.into()).unwrap()
    }

    #[tokio::test]
    async fn comments_list_newest_first() {
        let (service, store, post_id) = setup().await;
        let author = profile("reader");
        let older = service
            .add_comment(&author, post_id, "first".into())
            .await
            .unwrap();
        let mut newer = Comment::new(post_id, author.identity_id, "reader".into(), "second".into())
            .unwrap();
        newer.created_at = older.created_at + Duration::seconds(5);
        CommentRepository::create(store.as_ref(), newer).await.unwrap();

        let listed = service.list_comments(post_id).await.unwrap();
        let contents: Vec<_> = listed.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, ["second", "first"]);
    }

    #[tokio::test]
    async fn blank_comment_is_a_validation_error() {
        let (service, _, post_id) = setup().await;
        let err = service
            .add_comment(&profile("reader"), post_id, " \n ".into())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn listing_comments_of_missing_post_is_not_found() {
        let (service, _, _) = setup().await;
        let err = service.list_comments(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, DomainError::PostNotFound(_)));
    }

    #[tokio::test]
    async fn only_the_author_edits_or_deletes() {
        let (service, _, post_id) = setup().await;
        let author = profile("reader");
        let stranger = profile("lurker");
        let comment = service
            .add_comment(&author, post_id, "hello".into())
            .await
            .unwrap();

        let err = service
            .edit_comment(stranger.identity_id, comment.id, "pwned".into())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden));
        let err = service
            .delete_comment(stranger.identity_id, comment.id)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden));

        let edited = service
            .edit_comment(author.identity_id, comment.id, "hello again".into())
            .await
            .unwrap();
        assert_eq!(edited.content, "hello again");

        service
            .delete_comment(author.identity_id, comment.id)
            .await
            .unwrap();
        assert!(service.list_comments(post_id).await.unwrap().is_empty());
    }
}
