//! Wire shapes of the GraphQL backend.
//!
//! Field names follow the aliases declared in [`super::documents`].

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// GraphQL-over-HTTP request body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQlRequest {
    pub query: &'static str,
    pub variables: Value,
    pub operation_name: &'static str,
}

/// GraphQL-over-HTTP response body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphQlResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Option<Vec<GraphQlErrorEntry>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GraphQlErrorEntry {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub extensions: Option<GraphQlErrorExtensions>,
}

impl GraphQlErrorEntry {
    /// Machine-readable error code, if the backend sent one.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.extensions
            .as_ref()
            .and_then(|ext| ext.code.as_deref())
            .filter(|code| !code.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GraphQlErrorExtensions {
    #[serde(default)]
    pub code: Option<String>,
}

// -- login --------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct LoginVariables<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LoginData {
    pub tokens: TokensDto,
}

#[derive(Debug, Deserialize)]
pub struct TokensDto {
    pub access: SecretString,
    pub refresh: SecretString,
}

// -- forms --------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ListFormsVariables {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ListFormsData {
    pub pager: PagerDto,
}

#[derive(Debug, Deserialize)]
pub struct PagerDto {
    pub entries: Vec<PagerEntryDto>,
    pub total: u32,
    pub limit: u32,
    pub start: u32,
}

#[derive(Debug, Deserialize)]
pub struct PagerEntryDto {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct GetFormVariables<'a> {
    pub id: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct GetFormData {
    pub form: FormDto,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FormDto {
    pub id: String,
    pub title: String,
    pub fields: Vec<RawField>,
}

/// A field as the backend describes it: one loose record for every type.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawField {
    pub id: String,
    #[serde(default)]
    pub idx: Option<i64>,
    pub title: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub default_value: Option<String>,
    #[serde(default)]
    pub options: Vec<RawOption>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawOption {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    pub value: String,
}

// -- submissions --------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct StartSubmissionVariables<'a> {
    pub form: &'a str,
    pub submission: SubmissionStartInput<'a>,
}

#[derive(Debug, Serialize)]
pub struct SubmissionStartInput<'a> {
    pub token: &'a str,
    pub device: DeviceInput<'a>,
}

#[derive(Debug, Serialize)]
pub struct DeviceInput<'a> {
    #[serde(rename = "type")]
    pub device_type: &'a str,
    pub name: &'a str,
}

#[derive(Debug, Serialize)]
pub struct SubmitFieldVariables<'a> {
    pub submission: &'a str,
    pub field: SubmissionSetFieldInput<'a>,
}

#[derive(Debug, Serialize)]
pub struct SubmissionSetFieldInput<'a> {
    pub token: &'a str,
    pub field: &'a str,
    /// JSON-encoded field value.
    pub data: &'a str,
}

#[derive(Debug, Serialize)]
pub struct FinishSubmissionVariables<'a> {
    pub submission: &'a str,
}

/// Payload shared by the three submission mutations.
#[derive(Debug, Deserialize)]
pub struct SubmissionData {
    pub submission: SubmissionDto,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionDto {
    pub id: String,
    #[serde(default)]
    pub percentage_complete: Option<f64>,
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use serde_json::json;

    #[test]
    fn list_variables_omit_unset_paging() {
        let vars = serde_json::to_value(ListFormsVariables::default()).unwrap();
        assert_eq!(vars, json!({}));

        let vars = serde_json::to_value(ListFormsVariables {
            start: None,
            limit: Some(5),
        })
        .unwrap();
        assert_eq!(vars, json!({"limit": 5}));
    }

    #[test]
    fn raw_field_tolerates_missing_optionals() {
        let raw: RawField = serde_json::from_value(json!({
            "id": "f1",
            "title": "Name",
            "type": "textfield",
            "defaultValue": null
        }))
        .unwrap();
        assert_eq!(raw.idx, None);
        assert!(raw.options.is_empty());
        assert!(!raw.required);
        assert_eq!(raw.default_value, None);
    }

    #[test]
    fn error_code_is_read_from_extensions() {
        let entry: GraphQlErrorEntry = serde_json::from_value(json!({
            "message": "nope",
            "extensions": {"code": "FORBIDDEN"}
        }))
        .unwrap();
        assert_eq!(entry.code(), Some("FORBIDDEN"));

        let entry: GraphQlErrorEntry =
            serde_json::from_value(json!({"message": "nope", "extensions": {}})).unwrap();
        assert_eq!(entry.code(), None);
    }

    #[test]
    fn start_variables_shape() {
        let vars = serde_json::to_value(StartSubmissionVariables {
            form: "f1",
            submission: SubmissionStartInput {
                token: "abc",
                device: DeviceInput {
                    device_type: "unknown",
                    name: "unknown",
                },
            },
        })
        .unwrap();
        assert_eq!(
            vars,
            json!({
                "form": "f1",
                "submission": {"token": "abc", "device": {"type": "unknown", "name": "unknown"}}
            })
        );
    }

    #[test]
    fn login_tokens_stay_secret() {
        let data: LoginData = serde_json::from_value(json!({
            "tokens": {"access": "secret-access", "refresh": "secret-refresh"}
        }))
        .unwrap();

        assert_eq!(data.tokens.access.expose_secret(), "secret-access");
        let rendered = format!("{data:?}");
        assert!(!rendered.contains("secret-access"));
        assert!(!rendered.contains("secret-refresh"));
    }
}
