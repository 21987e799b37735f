//! Public API trait for the forms module.

use async_trait::async_trait;

use crate::error::FormsError;
use crate::models::{Form, FormPager, ListFormsOptions, Submission, SubmissionConfirmation};

/// Public API trait for the forms module.
///
/// The HTTP-facing layer consumes this trait and converts its outcomes into
/// responses:
///
/// ```ignore
/// let pager = forms.list_forms(&ListFormsOptions { limit: Some(10), start: None }).await?;
/// let form = forms.get_form("f1").await?;
/// let confirmation = forms.submit_form("f1", submission).await?;
/// ```
#[async_trait]
pub trait FormsClient: Send + Sync {
    /// List forms, one page at a time.
    ///
    /// Unset `limit`/`start` are left to the backend defaults.
    ///
    /// # Errors
    ///
    /// - `Unavailable` if the backend cannot be reached
    /// - `Upstream` for any other backend failure
    async fn list_forms(&self, options: &ListFormsOptions) -> Result<FormPager, FormsError>;

    /// Get a form with its normalized fields.
    ///
    /// Fields the backend describes in a shape this module does not understand
    /// are left out of the returned form.
    ///
    /// # Errors
    ///
    /// - `FormNotFound` if the backend does not know `id`
    /// - `Unavailable` / `Upstream` for backend failures
    async fn get_form(&self, id: &str) -> Result<Form, FormsError>;

    /// Submit a filled-in form.
    ///
    /// Every field value is written concurrently; the submission is sealed only
    /// when all of them were accepted.
    ///
    /// # Errors
    ///
    /// - `FormNotFound` if the backend does not know `id`
    /// - `FieldNotFound` naming the first field the backend rejected as unknown
    /// - `Unavailable` / `Upstream` / `Internal` for other failures
    async fn submit_form(
        &self,
        id: &str,
        submission: Submission,
    ) -> Result<SubmissionConfirmation, FormsError>;
}
