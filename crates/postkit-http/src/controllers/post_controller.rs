//! Posts resource nested under a user
//!
//! Path ids are parsed before any lookup. Lookups run user first, then post,
//! then attribute validation. A post that belongs to another user is reported
//! as missing.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use postkit_orm::{Post, PostStore, User};
use tracing::{debug, info};

use crate::error::{HttpError, HttpResult};
use crate::request::{parse_id, PostParams};
use crate::routes::AppState;

type Created<T> = (StatusCode, Json<T>);

/// GET /api/v1/users/:user_id/posts
pub async fn index(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> HttpResult<Json<Vec<Post>>> {
    let user = find_user(state.store(), parse_id(&user_id)?).await?;
    let posts = state.store().list_posts(user.id).await?;

    debug!(user_id = user.id, count = posts.len(), "Listed posts");
    Ok(Json(posts))
}

/// GET /api/v1/users/:user_id/posts/:post_id
pub async fn show(
    State(state): State<AppState>,
    Path((user_id, post_id)): Path<(String, String)>,
) -> HttpResult<Json<Post>> {
    let (user_id, post_id) = (parse_id(&user_id)?, parse_id(&post_id)?);
    let user = find_user(state.store(), user_id).await?;
    let post = find_post(state.store(), &user, post_id).await?;
    Ok(Json(post))
}

/// POST /api/v1/users/:user_id/posts
pub async fn store(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    PostParams(attributes): PostParams,
) -> HttpResult<Created<Post>> {
    let user = find_user(state.store(), parse_id(&user_id)?).await?;
    let valid = attributes.validate().await?;
    let post = state.store().create_post(user.id, valid).await?;

    info!(user_id = user.id, post_id = post.id, "Created post");
    Ok((StatusCode::CREATED, Json(post)))
}

/// PUT /api/v1/users/:user_id/posts/:post_id
pub async fn update(
    State(state): State<AppState>,
    Path((user_id, post_id)): Path<(String, String)>,
    PostParams(attributes): PostParams,
) -> HttpResult<Created<Post>> {
    let (user_id, post_id) = (parse_id(&user_id)?, parse_id(&post_id)?);
    let user = find_user(state.store(), user_id).await?;
    let post = find_post(state.store(), &user, post_id).await?;
    let valid = attributes.validate().await?;

    let updated = state
        .store()
        .update_post(user.id, post.id, valid)
        .await?
        .ok_or(HttpError::PostNotFound)?;

    info!(user_id = user.id, post_id = updated.id, "Updated post");
    Ok((StatusCode::CREATED, Json(updated)))
}

/// DELETE /api/v1/users/:user_id/posts/:post_id
pub async fn destroy(
    State(state): State<AppState>,
    Path((user_id, post_id)): Path<(String, String)>,
) -> HttpResult<Created<Post>> {
    let (user_id, post_id) = (parse_id(&user_id)?, parse_id(&post_id)?);
    let user = find_user(state.store(), user_id).await?;

    let removed = state
        .store()
        .delete_post(user.id, post_id)
        .await?
        .ok_or(HttpError::PostNotFound)?;

    info!(user_id = user.id, post_id = removed.id, "Deleted post");
    Ok((StatusCode::CREATED, Json(removed)))
}

async fn find_user(store: &dyn PostStore, id: i64) -> HttpResult<User> {
    store.find_user(id).await?.ok_or_else(|| {
        debug!(user_id = id, "User not found");
        HttpError::UserNotFound
    })
}

async fn find_post(store: &dyn PostStore, user: &User, id: i64) -> HttpResult<Post> {
    store.find_post(user.id, id).await?.ok_or_else(|| {
        debug!(user_id = user.id, post_id = id, "Post not found");
        HttpError::PostNotFound
    })
}
