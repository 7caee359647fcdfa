//! Validation rules builder and composition

use crate::error::{ValidationErrors, ValidationResult};
use crate::traits::{ValidateField, ValidationRule};
use crate::validators::{LengthValidator, RequiredValidator};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Ordered collection of per-field validation rules
#[derive(Clone, Default)]
pub struct Rules {
    field_rules: Vec<(String, Vec<Arc<dyn ValidationRule>>)>,
}

impl std::fmt::Debug for Rules {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rules")
            .field("validated_fields", &self.validated_fields())
            .finish()
    }
}

impl Rules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a validation rule for a field; fields are checked in the order
    /// they were first declared
    pub fn field<R>(mut self, field: impl Into<String>, rule: R) -> Self
    where
        R: ValidationRule + 'static,
    {
        let field = field.into();
        let rule: Arc<dyn ValidationRule> = Arc::new(rule);
        match self.field_rules.iter_mut().find(|(name, _)| *name == field) {
            Some((_, rules)) => rules.push(rule),
            None => self.field_rules.push((field, vec![rule])),
        }
        self
    }

    /// Required string with optional inclusive length bounds
    pub fn required_string(
        self,
        field: impl Into<String>,
        blank_message: impl Into<String>,
        length: Option<(usize, usize, String)>,
    ) -> Self {
        let field = field.into();
        let rules = self.field(field.clone(), RequiredValidator::with_message(blank_message));
        match length {
            Some((min, max, message)) => rules.field(
                field,
                LengthValidator::new().range(min, max).message(message),
            ),
            None => rules,
        }
    }

    pub fn get_field_rules(&self, field: &str) -> Option<&Vec<Arc<dyn ValidationRule>>> {
        self.field_rules
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, rules)| rules)
    }

    pub fn validated_fields(&self) -> Vec<&str> {
        self.field_rules.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.field_rules.is_empty()
    }

    /// Validate every declared field of `data`; absent fields validate as null
    pub async fn validate(&self, data: &Map<String, Value>) -> ValidationResult<()> {
        let mut errors = ValidationErrors::new();

        for (field, _) in &self.field_rules {
            let value = data.get(field).unwrap_or(&Value::Null);
            if let Err(field_errors) = self.validate_field(field, value).await {
                errors.merge(field_errors);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[async_trait]
impl ValidateField for Rules {
    /// Stops at the first failing rule of the field
    async fn validate_field(&self, field: &str, value: &Value) -> ValidationResult<()> {
        if let Some(rules) = self.get_field_rules(field) {
            for rule in rules {
                rule.validate(value, field).await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn post_like_rules() -> Rules {
        Rules::new()
            .required_string(
                "title",
                "Title Can't Be Blank!",
                Some((5, 255, "Title Too Short Or Long".to_string())),
            )
            .required_string("description", "Description Can't Be Blank!", None)
    }

    fn data(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[tokio::test]
    async fn test_valid_data_passes() {
        let rules = post_like_rules();
        let result = rules
            .validate(&data(json!({"title": "Testing Post", "description": "Body"})))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_blank_field_reports_only_required_message() {
        let rules = post_like_rules();
        let errors = rules
            .validate(&data(json!({"title": "", "description": "Body"})))
            .await
            .unwrap_err();

        assert_eq!(errors.messages(), vec!["Title Can't Be Blank!"]);
    }

    #[tokio::test]
    async fn test_errors_follow_declaration_order() {
        let rules = post_like_rules();
        let errors = rules.validate(&Map::new()).await.unwrap_err();

        assert_eq!(
            errors.messages(),
            vec!["Title Can't Be Blank!", "Description Can't Be Blank!"]
        );
    }

    #[tokio::test]
    async fn test_length_rule_applies_after_presence() {
        let rules = post_like_rules();
        let errors = rules
            .validate(&data(json!({"title": "Test", "description": "Body"})))
            .await
            .unwrap_err();

        assert_eq!(errors.messages(), vec!["Title Too Short Or Long"]);
    }

    #[test]
    fn test_rules_introspection() {
        let rules = post_like_rules();
        assert_eq!(rules.validated_fields(), vec!["title", "description"]);
        assert_eq!(rules.get_field_rules("title").map(Vec::len), Some(2));
        assert!(rules.get_field_rules("user_id").is_none());
        assert!(!rules.is_empty());
    }
}
