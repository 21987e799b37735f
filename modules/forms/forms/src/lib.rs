//! Forms Module
//!
//! Exposes forms stored in a GraphQL backend through the
//! [`forms_sdk::FormsClient`] trait:
//!
//! - `infra::graphql` talks to the backend and keeps the login session alive
//! - `domain` normalizes forms and orchestrates submissions
//! - [`FormsGateway`] wires both together from [`FormsConfig`]
//!
//! ```ignore
//! let config = FormsConfig::load(Some(Path::new("config/forms.yaml")))?;
//! let gateway = FormsGateway::connect(config.graphql).await?;
//! let forms = gateway.client();
//! let form = forms.get_form("f1").await?;
//! gateway.close().await;
//! ```
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod domain;
pub mod gateway;
pub mod infra;

pub use config::{ConfigError, FormsConfig, GraphQlConfig};
pub use gateway::{FormsGateway, GatewayError};
