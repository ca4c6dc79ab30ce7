use crate::data::postgres::PostgresStore;
use crate::domain::comment::Comment;
use crate::domain::error::DomainError;
use async_trait::async_trait;
use tracing::{error, info};
use uuid::Uuid;

#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Newest first.
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, DomainError>;
    /// Fails with `PostNotFound` when the parent post does not exist.
    async fn create(&self, comment: Comment) -> Result<Comment, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, DomainError>;
    async fn update_content(
        &self,
        id: Uuid,
        author_id: Uuid,
        content: String,
    ) -> Result<Option<Comment>, DomainError>;
    async fn delete(&self, id: Uuid, author_id: Uuid) -> Result<(), DomainError>;
}

#[async_trait]
impl CommentRepository for PostgresStore {
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, DomainError> {
        sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, post_id, author_id, author_name, content, created_at
            FROM comments
            WHERE post_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("db error while fetching comments for {}: {}", post_id, e);
            DomainError::from(e)
        })
    }

    async fn create(&self, comment: Comment) -> Result<Comment, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO comments (id, post_id, author_id, author_name, content, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(comment.id)
        .bind(comment.post_id)
        .bind(comment.author_id)
        .bind(&comment.author_name)
        .bind(&comment.content)
        .bind(comment.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to create comment: {}", e);
            if e.as_database_error()
                .and_then(|db| db.constraint())
                .map(|c| c.contains("post_id"))
                == Some(true)
            {
                DomainError::PostNotFound(comment.post_id)
            } else {
                DomainError::from(e)
            }
        })?;

        info!(comment_id = %comment.id, post_id = %comment.post_id, "comment created");
        Ok(comment)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, DomainError> {
        sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, post_id, author_id, author_name, content, created_at
            FROM comments WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("db error find comment {}: {}", id, e);
            DomainError::from(e)
        })
    }

    async fn update_content(
        &self,
        id: Uuid,
        author_id: Uuid,
        content: String,
    ) -> Result<Option<Comment>, DomainError> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            UPDATE comments
            SET content = $1
            WHERE id = $2 AND author_id = $3
            RETURNING id, post_id, author_id, author_name, content, created_at
            "#,
        )
        .bind(content)
        .bind(id)
        .bind(author_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to update comment {}: {}", id, e);
            DomainError::from(e)
        })?;

        if comment.is_some() {
            info!(comment_id = %id, "comment updated");
        }

        Ok(comment)
    }

    async fn delete(&self, id: Uuid, author_id: Uuid) -> Result<(), DomainError> {
        let deleted = sqlx::query("DELETE FROM comments WHERE id = $1 AND author_id = $2")
            .bind(id)
            .bind(author_id)
            .execute(&self.pool)
            .await?;

        if deleted.rows_affected() == 0 {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM comments WHERE id = $1)")
                    .bind(id)
                    .fetch_one(&self.pool)
                    .await?;

            return if exists {
                Err(DomainError::Forbidden)
            } else {
                Err(DomainError::CommentNotFound(id))
            };
        }

        info!(comment_id = %id, "comment deleted");
        Ok(())
    }
}
