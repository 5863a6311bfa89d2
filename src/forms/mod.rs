//! Form handling
//!
//! Bound/unbound forms with field-level validation, rendered back into
//! templates with the submitted values when validation fails.

pub mod comment;

pub use comment::{CleanedComment, CommentForm, CommentFormData};

/// Message for a missing or blank required field
pub const REQUIRED_MESSAGE: &str = "This field is required.";

/// Message for a value longer than `max` characters
pub fn max_length_message(max: usize, actual: usize) -> String {
    format!(
        "Ensure this value has at most {} characters (it has {}).",
        max, actual
    )
}
