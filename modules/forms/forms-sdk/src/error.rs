//! Error types for the forms module.

use thiserror::Error;

/// Errors that can occur when using the forms API.
#[derive(Debug, Error)]
pub enum FormsError {
    /// The requested form was not found.
    #[error("form not found: {form_id}")]
    FormNotFound {
        /// The form ID that was not found.
        form_id: String,
    },

    /// A submitted field is not part of the form.
    #[error("field not found: {field_id}")]
    FieldNotFound {
        /// The field ID that was not found.
        field_id: String,
    },

    /// The forms backend could not be reached.
    #[error("forms backend unavailable")]
    Unavailable,

    /// The forms backend answered with an error.
    #[error("upstream error: {}", message.as_deref().unwrap_or("no details"))]
    Upstream {
        /// Message reported by the backend, if any.
        message: Option<String>,
    },

    /// An internal error occurred.
    #[error("internal error: {message}")]
    Internal {
        /// Error description.
        message: String,
    },
}

impl FormsError {
    #[must_use]
    pub fn form_not_found(form_id: impl Into<String>) -> Self {
        Self::FormNotFound {
            form_id: form_id.into(),
        }
    }

    #[must_use]
    pub fn field_not_found(field_id: impl Into<String>) -> Self {
        Self::FieldNotFound {
            field_id: field_id.into(),
        }
    }

    #[must_use]
    pub fn upstream(message: Option<String>) -> Self {
        Self::Upstream { message }
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
