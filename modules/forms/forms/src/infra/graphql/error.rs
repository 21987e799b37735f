//! Error taxonomy of the GraphQL backend.

use thiserror::Error;

use super::models::GraphQlErrorEntry;

/// Error code the backend attaches to authorization failures.
const FORBIDDEN_CODE: &str = "FORBIDDEN";

/// Error code the backend attaches to everything that went wrong on its side.
const INTERNAL_SERVER_ERROR_CODE: &str = "INTERNAL_SERVER_ERROR";

/// Failures of a single GraphQL operation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GraphQlError {
    /// The endpoint could not be reached or did not speak GraphQL.
    #[error("cannot reach GraphQL endpoint: {0}")]
    Connect(String),

    #[error("unknown GraphQL error: {}", .0.as_deref().unwrap_or("no message"))]
    Unknown(Option<String>),

    /// Missing or expired credentials.
    #[error("forbidden: {}", .0.as_deref().unwrap_or("no message"))]
    Forbidden(Option<String>),

    #[error("GraphQL internal server error: {}", .0.as_deref().unwrap_or("no message"))]
    InternalServer(Option<String>),

    /// The id passed to the operation does not exist.
    #[error("not found")]
    NotFound,
}

impl GraphQlError {
    /// Classify the error list of a GraphQL response.
    ///
    /// Only the first entry is inspected.
    #[must_use]
    pub fn from_entries(entries: &[GraphQlErrorEntry]) -> Self {
        let Some(first) = entries.first() else {
            return Self::Unknown(None);
        };
        let message = first.message.clone();

        match first.code() {
            None => Self::Unknown(message),
            Some(FORBIDDEN_CODE) => Self::Forbidden(message),
            Some(INTERNAL_SERVER_ERROR_CODE) => {
                if message.as_deref().is_some_and(is_invalid_id_message) {
                    Self::NotFound
                } else {
                    Self::InternalServer(message)
                }
            }
            Some(_) => Self::Unknown(message),
        }
    }

    #[must_use]
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::Forbidden(_))
    }
}

/// The backend has no dedicated code for missing resources; it reports them
/// as an internal server error carrying exactly this message.
#[must_use]
pub fn is_invalid_id_message(message: &str) -> bool {
    message == "invalid id passed"
}
