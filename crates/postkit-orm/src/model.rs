//! Models and their attribute rules

use postkit_validation::{Rules, ToValidationValue, ValidationResult};
use serde::{Deserialize, Serialize};
use serde_json::Map;

/// Trait for persisted records
pub trait Model: Send + Sync + std::fmt::Debug + Serialize {
    /// Table name for this model
    fn table_name() -> &'static str;

    /// Primary key of this instance
    fn primary_key(&self) -> i64;
}

/// Owner of posts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
}

impl Model for User {
    fn table_name() -> &'static str {
        "users"
    }

    fn primary_key(&self) -> i64 {
        self.id
    }
}

/// A post as stored and as rendered to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub user_id: i64,
}

impl Model for Post {
    fn table_name() -> &'static str {
        "posts"
    }

    fn primary_key(&self) -> i64 {
        self.id
    }
}

impl Post {
    pub const TITLE_MIN_LENGTH: usize = 5;
    pub const TITLE_MAX_LENGTH: usize = 255;

    pub const TITLE_BLANK: &'static str = "Title Can't Be Blank!";
    pub const TITLE_LENGTH: &'static str = "Title Must Be Between 5 And 255 Characters!";
    pub const DESCRIPTION_BLANK: &'static str = "Description Can't Be Blank!";

    /// Attribute rules: title first, then description
    pub fn rules() -> Rules {
        Rules::new()
            .required_string(
                "title",
                Self::TITLE_BLANK,
                Some((
                    Self::TITLE_MIN_LENGTH,
                    Self::TITLE_MAX_LENGTH,
                    Self::TITLE_LENGTH.to_string(),
                )),
            )
            .required_string("description", Self::DESCRIPTION_BLANK, None)
    }
}

/// Writable post attributes; `None` means the client sent nothing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostAttributes {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl PostAttributes {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: Some(description.into()),
        }
    }

    /// Run [`Post::rules`] and hand back the checked values
    pub async fn validate(self) -> ValidationResult<ValidPost> {
        let mut data = Map::new();
        data.insert("title".to_string(), self.title.to_validation_value());
        data.insert("description".to_string(), self.description.to_validation_value());

        Post::rules().validate(&data).await?;

        Ok(ValidPost {
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
        })
    }
}

/// Post attributes that passed validation; stores only accept this type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidPost {
    title: String,
    description: String,
}

impl ValidPost {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}
