//! Output ports of the forms domain.

use async_trait::async_trait;
use forms_sdk::Device;

use crate::infra::graphql::GraphQlError;
use crate::infra::graphql::models::{FormDto, ListFormsVariables, PagerDto, SubmissionDto};

/// Authenticated access to the forms backend.
///
/// Implementations own the session; callers never see tokens.
#[async_trait]
pub trait FormsBackend: Send + Sync {
    async fn list_forms(&self, variables: ListFormsVariables) -> Result<PagerDto, GraphQlError>;

    async fn get_form(&self, id: &str) -> Result<FormDto, GraphQlError>;

    async fn start_submission(
        &self,
        form_id: &str,
        token: &str,
        device: &Device,
    ) -> Result<SubmissionDto, GraphQlError>;

    /// `data` is the JSON-encoded field value.
    async fn submit_field(
        &self,
        submission_id: &str,
        token: &str,
        field_id: &str,
        data: &str,
    ) -> Result<SubmissionDto, GraphQlError>;

    async fn finish_submission(&self, submission_id: &str) -> Result<SubmissionDto, GraphQlError>;
}
