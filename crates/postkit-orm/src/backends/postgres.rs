use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::error::{ModelError, ModelResult};
use crate::model::{Model, Post, User, ValidPost};
use crate::store::PostStore;

const POST_COLUMNS: &str = "id, title, description, user_id";

/// PostgreSQL store; every mutation is a single statement scoped by owner
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect a small pool to `database_url`
    pub async fn connect(database_url: &str) -> ModelResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await
            .map_err(|e| ModelError::Connection(e.to_string()))?;

        tracing::info!("Connected to PostgreSQL");
        Ok(Self { pool })
    }

    /// Apply the bundled schema migrations
    pub async fn migrate(&self) -> ModelResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("Database migrations applied");
        Ok(())
    }
}

#[async_trait]
impl PostStore for PgStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn create_user(&self, name: &str) -> ModelResult<User> {
        let user = sqlx::query_as::<_, User>("INSERT INTO users (name) VALUES ($1) RETURNING id, name")
            .bind(name)
            .fetch_one(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user(&self, id: i64) -> ModelResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT id, name FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn count_users(&self) -> ModelResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn list_posts(&self, user_id: i64) -> ModelResult<Vec<Post>> {
        let sql = format!("SELECT {} FROM posts WHERE user_id = $1 ORDER BY id", POST_COLUMNS);
        let posts = sqlx::query_as::<_, Post>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(posts)
    }

    async fn find_post(&self, user_id: i64, post_id: i64) -> ModelResult<Option<Post>> {
        let sql = format!(
            "SELECT {} FROM posts WHERE id = $1 AND user_id = $2",
            POST_COLUMNS
        );
        let post = sqlx::query_as::<_, Post>(&sql)
            .bind(post_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(post)
    }

    async fn create_post(&self, user_id: i64, post: ValidPost) -> ModelResult<Post> {
        // Selecting the owner inside the insert makes the existence check atomic.
        let sql = format!(
            "INSERT INTO posts (title, description, user_id) \
             SELECT $1, $2, id FROM users WHERE id = $3 \
             RETURNING {}",
            POST_COLUMNS
        );
        sqlx::query_as::<_, Post>(&sql)
            .bind(post.title())
            .bind(post.description())
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ModelError::NotFound(User::table_name().to_string()))
    }

    async fn update_post(
        &self,
        user_id: i64,
        post_id: i64,
        post: ValidPost,
    ) -> ModelResult<Option<Post>> {
        let sql = format!(
            "UPDATE posts SET title = $1, description = $2 \
             WHERE id = $3 AND user_id = $4 \
             RETURNING {}",
            POST_COLUMNS
        );
        let updated = sqlx::query_as::<_, Post>(&sql)
            .bind(post.title())
            .bind(post.description())
            .bind(post_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(updated)
    }

    async fn delete_post(&self, user_id: i64, post_id: i64) -> ModelResult<Option<Post>> {
        let sql = format!(
            "DELETE FROM posts WHERE id = $1 AND user_id = $2 RETURNING {}",
            POST_COLUMNS
        );
        let deleted = sqlx::query_as::<_, Post>(&sql)
            .bind(post_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(deleted)
    }

    async fn count_posts(&self) -> ModelResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
