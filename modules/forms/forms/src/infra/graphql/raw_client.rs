//! One method per backend operation, no retries.

use std::sync::Arc;

use forms_sdk::Device;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::documents;
use super::error::GraphQlError;
use super::models::{
    DeviceInput, FinishSubmissionVariables, FormDto, GetFormData, GetFormVariables, GraphQlRequest,
    ListFormsData, ListFormsVariables, LoginData, LoginVariables, PagerDto, StartSubmissionVariables,
    SubmissionData, SubmissionDto, SubmissionSetFieldInput, SubmissionStartInput,
    SubmitFieldVariables,
};
use super::transport::GraphQlTransport;

/// Access/refresh token pair returned by a login.
#[derive(Debug)]
pub struct Tokens {
    pub access: SecretString,
    pub refresh: SecretString,
}

/// Unauthenticated building block of the session guard.
///
/// Every call except [`RawGraphQlClient::login`] takes the access token to
/// send as a bearer header.
pub struct RawGraphQlClient {
    transport: Arc<dyn GraphQlTransport>,
}

impl RawGraphQlClient {
    #[must_use]
    pub fn new(transport: Arc<dyn GraphQlTransport>) -> Self {
        Self { transport }
    }

    /// # Errors
    ///
    /// Any [`GraphQlError`]; wrong credentials usually come back as `Forbidden`.
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<Tokens, GraphQlError> {
        let variables = LoginVariables {
            username,
            password: password.expose_secret(),
        };
        let data: LoginData = self
            .execute(documents::LOGIN, "authLogin", &variables, None)
            .await?;

        Ok(Tokens {
            access: data.tokens.access,
            refresh: data.tokens.refresh,
        })
    }

    /// # Errors
    ///
    /// Any [`GraphQlError`].
    pub async fn list_forms(
        &self,
        access: &SecretString,
        variables: ListFormsVariables,
    ) -> Result<PagerDto, GraphQlError> {
        let data: ListFormsData = self
            .execute(documents::LIST_FORMS, "listForms", &variables, Some(access))
            .await?;
        Ok(data.pager)
    }

    /// # Errors
    ///
    /// [`GraphQlError::NotFound`] if the backend does not know `id`.
    pub async fn get_form(&self, access: &SecretString, id: &str) -> Result<FormDto, GraphQlError> {
        let data: GetFormData = self
            .execute(
                documents::GET_FORM,
                "getFormById",
                &GetFormVariables { id },
                Some(access),
            )
            .await?;
        Ok(data.form)
    }

    /// # Errors
    ///
    /// [`GraphQlError::NotFound`] if the backend does not know `form_id`.
    pub async fn start_submission(
        &self,
        access: &SecretString,
        form_id: &str,
        token: &str,
        device: &Device,
    ) -> Result<SubmissionDto, GraphQlError> {
        let variables = StartSubmissionVariables {
            form: form_id,
            submission: SubmissionStartInput {
                token,
                device: DeviceInput {
                    device_type: &device.device_type,
                    name: &device.name,
                },
            },
        };
        self.execute_submission(documents::START_SUBMISSION, "submissionStart", &variables, access)
            .await
    }

    /// # Errors
    ///
    /// [`GraphQlError::NotFound`] if `field_id` is not part of the submitted form.
    pub async fn submit_field(
        &self,
        access: &SecretString,
        submission_id: &str,
        token: &str,
        field_id: &str,
        data: &str,
    ) -> Result<SubmissionDto, GraphQlError> {
        let variables = SubmitFieldVariables {
            submission: submission_id,
            field: SubmissionSetFieldInput {
                token,
                field: field_id,
                data,
            },
        };
        self.execute_submission(documents::SUBMIT_FIELD, "submissionSetField", &variables, access)
            .await
    }

    /// # Errors
    ///
    /// Any [`GraphQlError`].
    pub async fn finish_submission(
        &self,
        access: &SecretString,
        submission_id: &str,
    ) -> Result<SubmissionDto, GraphQlError> {
        self.execute_submission(
            documents::FINISH_SUBMISSION,
            "submissionFinish",
            &FinishSubmissionVariables {
                submission: submission_id,
            },
            access,
        )
        .await
    }

    async fn execute_submission<V: Serialize + Sync>(
        &self,
        query: &'static str,
        operation_name: &'static str,
        variables: &V,
        access: &SecretString,
    ) -> Result<SubmissionDto, GraphQlError> {
        let data: SubmissionData = self
            .execute(query, operation_name, variables, Some(access))
            .await?;
        tracing::debug!(
            operation = operation_name,
            submission_id = %data.submission.id,
            percentage_complete = data.submission.percentage_complete,
            "submission updated"
        );
        Ok(data.submission)
    }

    async fn execute<V, D>(
        &self,
        query: &'static str,
        operation_name: &'static str,
        variables: &V,
        bearer: Option<&SecretString>,
    ) -> Result<D, GraphQlError>
    where
        V: Serialize + Sync,
        D: DeserializeOwned,
    {
        let variables = serde_json::to_value(variables)
            .map_err(|e| GraphQlError::Unknown(Some(format!("invalid variables: {e}"))))?;
        let request = GraphQlRequest {
            query,
            variables,
            operation_name,
        };

        let data = self.transport.execute(request, bearer).await?;
        serde_json::from_value(data)
            .map_err(|e| GraphQlError::Unknown(Some(format!("invalid response: {e}"))))
    }
}
