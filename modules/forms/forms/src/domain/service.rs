use std::collections::BTreeMap;
use std::sync::Arc;

use forms_sdk::{Device, Form, FormPager, ListFormsOptions, Submission, SubmissionConfirmation};
use serde_json::Value;
use tokio::task::JoinSet;
use tracing::{Instrument, instrument};
use uuid::Uuid;

use super::error::DomainError;
use super::normalizer::{normalize_form, normalize_pager};
use super::ports::FormsBackend;
use crate::infra::graphql::GraphQlError;
use crate::infra::graphql::models::ListFormsVariables;

/// Forms domain service.
///
/// Reads are normalized into the SDK models. Submissions follow the backend
/// protocol: start, write every field concurrently, finish.
pub struct Service {
    backend: Arc<dyn FormsBackend>,
}

impl Service {
    #[must_use]
    pub fn new(backend: Arc<dyn FormsBackend>) -> Self {
        Self { backend }
    }

    /// # Errors
    ///
    /// Propagates backend failures.
    #[instrument(skip_all, fields(limit = options.limit, start = options.start))]
    pub async fn list_forms(&self, options: &ListFormsOptions) -> Result<FormPager, DomainError> {
        let pager = self
            .backend
            .list_forms(ListFormsVariables {
                start: options.start,
                limit: options.limit,
            })
            .await?;
        Ok(normalize_pager(pager))
    }

    /// # Errors
    ///
    /// [`DomainError::FormNotFound`] if the backend does not know `id`.
    #[instrument(skip_all, fields(form_id = %id))]
    pub async fn get_form(&self, id: &str) -> Result<Form, DomainError> {
        let form = self
            .backend
            .get_form(id)
            .await
            .map_err(|e| not_found_as(e, || DomainError::FormNotFound(id.to_owned())))?;

        let received = form.fields.len();
        let form = normalize_form(form);
        tracing::debug!(received, kept = form.fields.len(), "form normalized");
        Ok(form)
    }

    /// # Errors
    ///
    /// - [`DomainError::FormNotFound`] if starting the submission fails with not-found
    /// - [`DomainError::FieldNotFound`] for the first field the backend rejects as unknown
    /// - any other backend failure of the three steps
    #[instrument(skip_all, fields(form_id = %form_id, fields = submission.fields.len()))]
    pub async fn submit_form(
        &self,
        form_id: &str,
        submission: Submission,
    ) -> Result<SubmissionConfirmation, DomainError> {
        let token = Uuid::new_v4().simple().to_string();
        let device = submission.metadata.device.unwrap_or_else(Device::unknown);

        let started = self
            .backend
            .start_submission(form_id, &token, &device)
            .await
            .map_err(|e| not_found_as(e, || DomainError::FormNotFound(form_id.to_owned())))?;
        tracing::debug!(submission_id = %started.id, "submission started");

        self.submit_fields(&started.id, &token, submission.fields).await?;

        let finished = self.backend.finish_submission(&started.id).await?;
        tracing::info!(
            submission_id = %started.id,
            percentage_complete = finished.percentage_complete,
            "submission finished"
        );

        Ok(SubmissionConfirmation {
            submission_id: started.id,
        })
    }

    /// Write every field concurrently and fail on the first rejected one.
    ///
    /// Returning early drops the task set, which aborts the writes still in
    /// flight. Writes that already reached the backend are not undone.
    async fn submit_fields(
        &self,
        submission_id: &str,
        token: &str,
        fields: BTreeMap<String, Value>,
    ) -> Result<(), DomainError> {
        let mut tasks = JoinSet::new();

        for (field_id, value) in fields {
            let backend = Arc::clone(&self.backend);
            let submission_id = submission_id.to_owned();
            let token = token.to_owned();
            let data = value.to_string();

            tasks.spawn(
                async move {
                    let result = backend
                        .submit_field(&submission_id, &token, &field_id, &data)
                        .await;
                    result.map_err(|e| not_found_as(e, || DomainError::FieldNotFound(field_id)))
                }
                .in_current_span(),
            );
        }

        while let Some(joined) = tasks.join_next().await {
            joined.map_err(|e| DomainError::TaskJoin(e.to_string()))??;
        }
        Ok(())
    }
}

/// Translate the backend's not-found into the caller's domain condition.
fn not_found_as(err: GraphQlError, not_found: impl FnOnce() -> DomainError) -> DomainError {
    match err {
        GraphQlError::NotFound => not_found(),
        other => DomainError::Upstream(other),
    }
}
