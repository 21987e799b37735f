//! Local (in-process) client for the forms module.

use std::sync::Arc;

use async_trait::async_trait;
use forms_sdk::{
    Form, FormPager, FormsClient, FormsError, ListFormsOptions, Submission,
    SubmissionConfirmation,
};

use super::{DomainError, Service};

/// Local client wrapping the forms service.
///
/// Handed to the HTTP-facing layer as `Arc<dyn FormsClient>`.
pub struct FormsLocalClient {
    svc: Arc<Service>,
}

impl FormsLocalClient {
    #[must_use]
    pub fn new(svc: Arc<Service>) -> Self {
        Self { svc }
    }
}

fn log_and_convert(op: &str, e: DomainError) -> FormsError {
    tracing::error!(operation = op, error = ?e, "forms call failed");
    e.into()
}

#[async_trait]
impl FormsClient for FormsLocalClient {
    async fn list_forms(&self, options: &ListFormsOptions) -> Result<FormPager, FormsError> {
        self.svc
            .list_forms(options)
            .await
            .map_err(|e| log_and_convert("list_forms", e))
    }

    async fn get_form(&self, id: &str) -> Result<Form, FormsError> {
        self.svc
            .get_form(id)
            .await
            .map_err(|e| log_and_convert("get_form", e))
    }

    async fn submit_form(
        &self,
        id: &str,
        submission: Submission,
    ) -> Result<SubmissionConfirmation, FormsError> {
        self.svc
            .submit_form(id, submission)
            .await
            .map_err(|e| log_and_convert("submit_form", e))
    }
}
