use std::sync::Arc;

use crate::data::post_repository::PostRepository;
use crate::domain::feed::{FeedQuery, rank};
use crate::domain::profile::UserProfile;
use crate::domain::{
    error::DomainError,
    post::{Post, PostUpdate},
};
use tracing::{debug, instrument};
use uuid::Uuid;

#[derive(Clone)]
pub struct PostService<R: PostRepository + 'static> {
    repo: Arc<R>,
}

impl<R> PostService<R>
where
    R: PostRepository + 'static,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn get_post(&self, id: Uuid) -> Result<Post, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(DomainError::PostNotFound(id))
    }

    /// Re-reads the whole collection on every call and ranks it.
    #[instrument(skip(self))]
    pub async fn feed(&self, query: &FeedQuery) -> Result<Vec<Post>, DomainError> {
        let posts = self.repo.list_posts().await?;
        let feed = rank(&posts, query);
        debug!(total = posts.len(), shown = feed.len(), "feed ranked");
        Ok(feed)
    }

    #[instrument(skip(self, author), fields(author_id = %author.identity_id))]
    pub async fn create_post(
        &self,
        author: &UserProfile,
        title: String,
        caption: String,
        image_url: String,
    ) -> Result<Post, DomainError> {
        let title = required("title", title)?;
        let caption = required("caption", caption)?;
        let image_url = validate_image_url(image_url)?;
        let post = Post::new(
            author.identity_id,
            author.display_name.clone(),
            title,
            caption,
            image_url,
        );
        self.repo.create(post).await
    }

    #[instrument(skip(self))]
    pub async fn update_post(
        &self,
        author_id: Uuid,
        post_id: Uuid,
        mut update: PostUpdate,
    ) -> Result<Post, DomainError> {
        update.title = update.title.map(|t| required("title", t)).transpose()?;
        update.caption = update.caption.map(|c| required("caption", c)).transpose()?;
        update.image_url = update.image_url.map(validate_image_url).transpose()?;

        let existing = self.get_post(post_id).await?;
        if existing.author_id != author_id {
            return Err(DomainError::Forbidden);
        }

        self.repo
            .update_post(post_id, author_id, update)
            .await?
            .ok_or(DomainError::PostNotFound(post_id))
    }

    #[instrument(skip(self))]
    pub async fn delete_post(&self, author_id: Uuid, post_id: Uuid) -> Result<(), DomainError> {
        self.repo.delete_post(post_id, author_id).await
    }
}

fn required(field: &str, value: String) -> Result<String, DomainError> {
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(DomainError::Validation(format!("{field} is required")));
    }
    Ok(value)
}

fn validate_image_url(url: String) -> Result<String, DomainError> {
    let url = required("image_url", url)?;
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        return Err(DomainError::Validation(
            "image_url must be an http(s) URL".to_string(),
        ));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory::InMemoryStore;
    use crate::domain::feed::SortMode;

    fn author() -> UserProfile {
        UserProfile::new(Uuid::new_v4(), "painter".into()).unwrap()
    }

    fn service() -> PostService<InMemoryStore> {
        PostService::new(Arc::new(InMemoryStore::new()))
    }

    #[tokio::test]
    async fn created_post_starts_at_zero_with_timestamp() {
        let service = service();
        let post = service
            .create_post(
                &author(),
                " Sunset ".into(),
                "over the bay".into(),
                "https://img.example/s.png".into(),
            )
            .await
            .unwrap();
        assert_eq!(post.title, "Sunset");
        assert_eq!(post.upvotes, 0);
        assert_eq!(post.author_name, "painter");
        assert!(post.created_at.is_some());
    }

    #[tokio::test]
    async fn create_rejects_blank_fields_and_non_http_images() {
        let service = service();
        let err = service
            .create_post(&author(), "  ".into(), "c".into(), "https://x/y.png".into())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = service
            .create_post(&author(), "t".into(), "c".into(), "file:///etc/passwd".into())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn feed_filters_and_sorts_fresh_store_contents() {
        let service = service();
        let author = author();
        for (title, caption) in [("Cats", "fluffy"), ("Dogs", "I love cats"), ("Birds", "tweet")] {
            service
                .create_post(&author, title.into(), caption.into(), "https://i/x.png".into())
                .await
                .unwrap();
        }
        let feed = service
            .feed(&FeedQuery::new("cat", SortMode::Combined))
            .await
            .unwrap();
        let mut titles: Vec<_> = feed.iter().map(|p| p.title.as_str()).collect();
        titles.sort();
        assert_eq!(titles, ["Cats", "Dogs"]);
    }

    #[tokio::test]
    async fn only_the_author_may_edit() {
        let service = service();
        let owner = author();
        let post = service
            .create_post(&owner, "t".into(), "c".into(), "https://i/x.png".into())
            .await
            .unwrap();

        let update = PostUpdate {
            title: Some("hijacked".into()),
            ..PostUpdate::default()
        };
        let err = service
            .update_post(Uuid::new_v4(), post.id, update.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden));

        let edited = service
            .update_post(owner.identity_id, post.id, update)
            .await
            .unwrap();
        assert_eq!(edited.title, "hijacked");
        assert_eq!(edited.created_at, post.created_at);
        assert_eq!(edited.upvotes, post.upvotes);
    }

    #[tokio::test]
    async fn only_the_author_may_delete() {
        let service = service();
        let owner = author();
        let post = service
            .create_post(&owner, "t".into(), "c".into(), "https://i/x.png".into())
            .await
            .unwrap();

        let err = service.delete_post(Uuid::new_v4(), post.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden));
        assert!(service.get_post(post.id).await.is_ok());

        let missing = Uuid::new_v4();
        let err = service
            .delete_post(owner.identity_id, missing)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::PostNotFound(id) if id == missing));

        service.delete_post(owner.identity_id, post.id).await.unwrap();
        assert!(matches!(
            service.get_post(post.id).await,
            Err(DomainError::PostNotFound(_))
        ));
    }
}
