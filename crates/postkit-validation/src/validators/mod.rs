//! Built-in validators

pub mod length;
pub mod required;

pub use length::LengthValidator;
pub use required::RequiredValidator;
