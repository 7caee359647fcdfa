use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{ModelError, ModelResult};
use crate::model::{Model, Post, User, ValidPost};
use crate::store::PostStore;

#[derive(Debug)]
struct MemoryState {
    users: BTreeMap<i64, User>,
    posts: BTreeMap<i64, Post>,
    next_user_id: i64,
    next_post_id: i64,
}

impl Default for MemoryState {
    fn default() -> Self {
        Self {
            users: BTreeMap::new(),
            posts: BTreeMap::new(),
            next_user_id: 1,
            next_post_id: 1,
        }
    }
}

/// Process-local store; one lock guards users, posts and id counters
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create_user(&self, name: &str) -> ModelResult<User> {
        let mut state = self.state.write().await;
        let user = User {
            id: state.next_user_id,
            name: name.to_string(),
        };
        state.next_user_id += 1;
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: i64) -> ModelResult<Option<User>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn count_users(&self) -> ModelResult<i64> {
        Ok(self.state.read().await.users.len() as i64)
    }

    async fn list_posts(&self, user_id: i64) -> ModelResult<Vec<Post>> {
        let state = self.state.read().await;
        Ok(state
            .posts
            .values()
            .filter(|post| post.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_post(&self, user_id: i64, post_id: i64) -> ModelResult<Option<Post>> {
        let state = self.state.read().await;
        Ok(state
            .posts
            .get(&post_id)
            .filter(|post| post.user_id == user_id)
            .cloned())
    }

    async fn create_post(&self, user_id: i64, post: ValidPost) -> ModelResult<Post> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&user_id) {
            return Err(ModelError::NotFound(User::table_name().to_string()));
        }

        let post = Post {
            id: state.next_post_id,
            title: post.title().to_string(),
            description: post.description().to_string(),
            user_id,
        };
        state.next_post_id += 1;
        state.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update_post(
        &self,
        user_id: i64,
        post_id: i64,
        post: ValidPost,
    ) -> ModelResult<Option<Post>> {
        let mut state = self.state.write().await;
        match state
            .posts
            .get_mut(&post_id)
            .filter(|existing| existing.user_id == user_id)
        {
            Some(existing) => {
                existing.title = post.title().to_string();
                existing.description = post.description().to_string();
                Ok(Some(existing.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_post(&self, user_id: i64, post_id: i64) -> ModelResult<Option<Post>> {
        let mut state = self.state.write().await;
        let owned = state
            .posts
            .get(&post_id)
            .is_some_and(|post| post.user_id == user_id);

        if owned {
            Ok(state.posts.remove(&post_id))
        } else {
            Ok(None)
        }
    }

    async fn count_posts(&self) -> ModelResult<i64> {
        Ok(self.state.read().await.posts.len() as i64)
    }
}
