//! Storage interface injected into the HTTP layer

use crate::error::ModelResult;
use crate::model::{Post, User, ValidPost};
use async_trait::async_trait;

/// Persistence capabilities needed by the posts resource.
///
/// Every post operation is scoped by the owning user's id: a post that
/// belongs to another user behaves exactly like a missing one. Mutations
/// are atomic; a failed call leaves storage untouched.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Short backend name, reported by the health check
    fn backend_name(&self) -> &'static str;

    async fn create_user(&self, name: &str) -> ModelResult<User>;

    async fn find_user(&self, id: i64) -> ModelResult<Option<User>>;

    async fn count_users(&self) -> ModelResult<i64>;

    /// All posts of a user in ascending id order
    async fn list_posts(&self, user_id: i64) -> ModelResult<Vec<Post>>;

    async fn find_post(&self, user_id: i64, post_id: i64) -> ModelResult<Option<Post>>;

    /// Fails with `ModelError::NotFound("users")` when the owner is missing
    async fn create_post(&self, user_id: i64, post: ValidPost) -> ModelResult<Post>;

    /// Returns `None` when the post does not exist for this user
    async fn update_post(
        &self,
        user_id: i64,
        post_id: i64,
        post: ValidPost,
    ) -> ModelResult<Option<Post>>;

    /// Hard delete; returns the removed post
    async fn delete_post(&self, user_id: i64, post_id: i64) -> ModelResult<Option<Post>>;

    /// Number of posts across all users
    async fn count_posts(&self) -> ModelResult<i64>;
}
