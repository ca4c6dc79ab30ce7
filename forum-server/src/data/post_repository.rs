use crate::data::postgres::PostgresStore;
use crate::domain::error::DomainError;
use crate::domain::post::{CounterField, Post, PostUpdate};
use async_trait::async_trait;
use tracing::{error, info};
use uuid::Uuid;

const POST_COLUMNS: &str =
    "id, author_id, author_name, title, caption, image_url, upvotes, created_at";

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, post: Post) -> Result<Post, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError>;
    /// Every post, unfiltered, in insertion order.
    async fn list_posts(&self) -> Result<Vec<Post>, DomainError>;
    /// Plain field write keyed by id. No compare-and-swap.
    async fn set_counter(
        &self,
        id: Uuid,
        field: CounterField,
        value: i64,
    ) -> Result<(), DomainError>;
    /// Single-statement `count = count + 1`; returns the stored value.
    async fn increment_counter(&self, id: Uuid, field: CounterField) -> Result<i64, DomainError>;
    async fn update_post(
        &self,
        id: Uuid,
        author_id: Uuid,
        update: PostUpdate,
    ) -> Result<Option<Post>, DomainError>;
    async fn delete_post(&self, id: Uuid, author_id: Uuid) -> Result<(), DomainError>;
}

/// SQLSTATE 22003: numeric_value_out_of_range.
fn is_numeric_overflow(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == "22003")
}

#[async_trait]
impl PostRepository for PostgresStore {
    async fn create(&self, post: Post) -> Result<Post, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO posts (id, author_id, author_name, title, caption, image_url, upvotes, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(post.id)
        .bind(post.author_id)
        .bind(&post.author_name)
        .bind(&post.title)
        .bind(&post.caption)
        .bind(&post.image_url)
        .bind(post.upvotes)
        .bind(post.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to create post: {}", e);
            DomainError::from(e)
        })?;

        info!(post_id = %post.id, author_id = %post.author_id, "post created");
        Ok(post)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError> {
        sqlx::query_as::<_, Post>(&format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("db error find_by_id {}: {}", id, e);
                DomainError::from(e)
            })
    }

    async fn list_posts(&self) -> Result<Vec<Post>, DomainError> {
        sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts ORDER BY created_at ASC NULLS FIRST, id ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("db error while fetching posts: {}", e);
            DomainError::from(e)
        })
    }

    async fn set_counter(
        &self,
        id: Uuid,
        field: CounterField,
        value: i64,
    ) -> Result<(), DomainError> {
        let column = field.column();
        let updated = sqlx::query(&format!("UPDATE posts SET {column} = $1 WHERE id = $2"))
            .bind(value)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("failed to write {} for post {}: {}", column, id, e);
                DomainError::from(e)
            })?;

        if updated.rows_affected() == 0 {
            return Err(DomainError::PostNotFound(id));
        }

        info!(post_id = %id, counter = column, value, "counter written");
        Ok(())
    }

    async fn increment_counter(&self, id: Uuid, field: CounterField) -> Result<i64, DomainError> {
        let column = field.column();
        let value = sqlx::query_scalar::<_, i64>(&format!(
            "UPDATE posts SET {column} = {column} + 1 WHERE id = $1 RETURNING {column}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to increment {} for post {}: {}", column, id, e);
            if is_numeric_overflow(&e) {
                DomainError::Internal(format!("{column} overflow"))
            } else {
                DomainError::from(e)
            }
        })?
        .ok_or(DomainError::PostNotFound(id))?;

        info!(post_id = %id, counter = column, value, "counter incremented");
        Ok(value)
    }

    async fn update_post(
        &self,
        id: Uuid,
        author_id: Uuid,
        update: PostUpdate,
    ) -> Result<Option<Post>, DomainError> {
        let post = sqlx::query_as::<_, Post>(&format!(
            r#"
            UPDATE posts
            SET
                title = COALESCE($1, title),
                caption = COALESCE($2, caption),
                image_url = COALESCE($3, image_url)
            WHERE id = $4 AND author_id = $5
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(update.title)
        .bind(update.caption)
        .bind(update.image_url)
        .bind(id)
        .bind(author_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to update post {}: {}", id, e);
            DomainError::from(e)
        })?;

        if post.is_some() {
            info!(post_id = %id, "post updated");
        }

        Ok(post)
    }

    async fn delete_post(&self, id: Uuid, author_id: Uuid) -> Result<(), DomainError> {
        let deleted = sqlx::query("DELETE FROM posts WHERE id = $1 AND author_id = $2")
            .bind(id)
            .bind(author_id)
            .execute(&self.pool)
            .await?;

        if deleted.rows_affected() == 0 {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM posts WHERE id = $1)")
                    .bind(id)
                    .fetch_one(&self.pool)
                    .await?;

            return if exists {
                Err(DomainError::Forbidden)
            } else {
                Err(DomainError::PostNotFound(id))
            };
        }

        info!(post_id = %id, "post deleted");
        Ok(())
    }
}
