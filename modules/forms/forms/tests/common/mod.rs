#![allow(clippy::unwrap_used, clippy::expect_used, dead_code)]

//! Shared helpers for the forms end-to-end tests.

use forms::{FormsGateway, GraphQlConfig};
use httpmock::Method::POST;
use httpmock::{Mock, MockServer};
use secrecy::SecretString;
use serde_json::{Value, json};

pub const USER: &str = "admin";
pub const PASSWORD: &str = "pw";

/// Config pointing at the mock backend.
pub fn config(server: &MockServer) -> GraphQlConfig {
    GraphQlConfig {
        host: "127.0.0.1".to_owned(),
        port: server.port(),
        user: USER.to_owned(),
        password: SecretString::from(PASSWORD),
        ..Default::default()
    }
}

pub fn gateway(server: &MockServer) -> FormsGateway {
    FormsGateway::new(config(server)).unwrap()
}

/// Answers every login with the given access token.
pub fn mock_login<'a>(server: &'a MockServer, access: &str) -> Mock<'a> {
    server.mock(|when, then| {
        when.method(POST)
            .path("/graphql")
            .body_includes(r#""operationName":"authLogin""#);
        then.status(200).json_body(json!({
            "data": {"tokens": {"access": access, "refresh": format!("{access}-refresh")}}
        }));
    })
}

/// Answers `operation` sent with `Bearer {access}` with `response`.
pub fn mock_operation<'a>(
    server: &'a MockServer,
    operation: &str,
    access: &str,
    extra_body: &[&str],
    response: Value,
) -> Mock<'a> {
    server.mock(|when, then| {
        let mut when = when
            .method(POST)
            .path("/graphql")
            .header("authorization", format!("Bearer {access}"))
            .body_includes(format!(r#""operationName":"{operation}""#));
        for fragment in extra_body {
            when = when.body_includes(*fragment);
        }
        then.status(200).json_body(response);
    })
}

pub fn graphql_error(message: &str, code: &str) -> Value {
    json!({
        "data": null,
        "errors": [{"message": message, "extensions": {"code": code}}]
    })
}

pub fn submission(id: &str, percentage: f64) -> Value {
    json!({"data": {"submission": {"id": id, "percentageComplete": percentage}}})
}
