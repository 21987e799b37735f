//! Configuration for the forms module.

use std::path::Path;
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use thiserror::Error;
use url::Url;

/// Prefix of environment overrides, e.g. `FORMS__GRAPHQL__HOST`.
pub const ENV_PREFIX: &str = "FORMS__";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load forms config: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("invalid GraphQL endpoint `{endpoint}`: {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid forms config: {0}")]
    Invalid(String),
}

/// Module configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormsConfig {
    pub graphql: GraphQlConfig,
}

impl FormsConfig {
    /// Layer defaults, the optional YAML file, and `FORMS__*` environment
    /// variables, in that order.
    ///
    /// A missing file is not an error; the defaults apply.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] if a source cannot be read or does not
    /// match the expected shape.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::new();
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| ConfigError::Load(Box::new(e)))
    }
}

/// Connection settings of the GraphQL backend.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GraphQlConfig {
    pub host: String,
    pub port: u16,
    /// Path of the GraphQL endpoint, starting with `/`.
    pub path: String,
    pub user: String,
    pub password: SecretString,
    /// Per-request timeout, e.g. `30s` or `1m 30s`.
    #[serde(deserialize_with = "deserialize_duration")]
    pub request_timeout: Duration,
}

impl Default for GraphQlConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_owned(),
            port: 30004,
            path: "/graphql".to_owned(),
            user: "admin".to_owned(),
            password: SecretString::from("password"),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl GraphQlConfig {
    /// `http://{host}:{port}{path}`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for an empty host or a relative path,
    /// and [`ConfigError::InvalidEndpoint`] if the result is not a valid URL.
    pub fn endpoint(&self) -> Result<Url, ConfigError> {
        if self.host.is_empty() {
            return Err(ConfigError::Invalid("graphql.host must not be empty".to_owned()));
        }
        if !self.path.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "graphql.path must start with '/', got `{}`",
                self.path
            )));
        }

        let endpoint = format!("http://{}:{}{}", self.host, self.port, self.path);
        Url::parse(&endpoint).map_err(|source| ConfigError::InvalidEndpoint { endpoint, source })
    }
}

fn deserialize_duration<'de, D>(d: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(d)?;
    humantime::parse_duration(&raw).map_err(serde::de::Error::custom)
}
