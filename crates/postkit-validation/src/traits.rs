//! Core validation traits

use crate::error::ValidationResult;
use async_trait::async_trait;
use serde_json::Value;

/// Core validation trait that all validators must implement
#[async_trait]
pub trait ValidationRule: Send + Sync {
    /// Validate a single value
    async fn validate(&self, value: &Value, field: &str) -> ValidationResult<()>;

    /// Get the validation rule name/type
    fn rule_name(&self) -> &'static str;

    /// Get validation rule parameters/configuration as JSON
    fn parameters(&self) -> Option<Value> {
        None
    }
}

/// Trait for validating individual fields
#[async_trait]
pub trait ValidateField: Send + Sync {
    async fn validate_field(&self, field: &str, value: &Value) -> ValidationResult<()>;
}

/// Trait for types that can be converted to a validation value
pub trait ToValidationValue {
    fn to_validation_value(&self) -> Value;
}

impl ToValidationValue for String {
    fn to_validation_value(&self) -> Value {
        Value::String(self.clone())
    }
}

impl ToValidationValue for &str {
    fn to_validation_value(&self) -> Value {
        Value::String(self.to_string())
    }
}

impl ToValidationValue for i64 {
    fn to_validation_value(&self) -> Value {
        Value::Number(serde_json::Number::from(*self))
    }
}

impl ToValidationValue for Value {
    fn to_validation_value(&self) -> Value {
        self.clone()
    }
}

impl<T> ToValidationValue for Option<T>
where
    T: ToValidationValue,
{
    fn to_validation_value(&self) -> Value {
        match self {
            Some(value) => value.to_validation_value(),
            None => Value::Null,
        }
    }
}
