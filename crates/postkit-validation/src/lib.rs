//! # postkit-validation
//!
//! Rule-based validation of request fields. Each field carries an ordered
//! list of rules; the first failing rule of a field produces that field's
//! error and the remaining rules for it are skipped.

pub mod error;
pub mod rules;
pub mod traits;
pub mod validators;

pub use error::{ValidationError, ValidationErrors, ValidationResult};
pub use rules::Rules;
pub use traits::{ToValidationValue, ValidateField, ValidationRule};

pub use validators::{length::LengthValidator, required::RequiredValidator};
