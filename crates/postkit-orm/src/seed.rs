//! Demo data for local runs

use crate::error::ModelResult;
use crate::model::PostAttributes;
use crate::store::PostStore;
use crate::User;

/// Create a demo user with one post, but only into an empty store.
/// Returns the created user, or `None` when users already exist.
pub async fn seed_demo_data(store: &dyn PostStore) -> ModelResult<Option<User>> {
    if store.count_users().await? > 0 {
        tracing::debug!("Skipping demo seed: users already present");
        return Ok(None);
    }

    let user = store.create_user("Demo User").await?;
    let post = PostAttributes::new("Welcome to postkit", "This post was created by the demo seed.")
        .validate()
        .await?;
    let post = store.create_post(user.id, post).await?;

    tracing::info!(user_id = user.id, post_id = post.id, "Seeded demo data");
    Ok(Some(user))
}
