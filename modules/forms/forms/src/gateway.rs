//! Wiring and lifecycle of the forms module.

use std::sync::Arc;

use forms_sdk::FormsClient;
use thiserror::Error;

use crate::config::{ConfigError, GraphQlConfig};
use crate::domain::{FormsBackend, FormsLocalClient, Service};
use crate::infra::graphql::{
    GraphQlError, GraphQlTransport, HttpTransport, RawGraphQlClient, SessionGuard, TransportError,
};

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to set up GraphQL transport: {0}")]
    Transport(#[from] TransportError),

    #[error("initial login failed: {0}")]
    Login(#[from] GraphQlError),
}

/// Owns the backend session and hands out the [`FormsClient`].
///
/// Build it once at startup with [`FormsGateway::connect`] and call
/// [`FormsGateway::close`] on shutdown.
pub struct FormsGateway {
    session: Arc<SessionGuard>,
    client: Arc<FormsLocalClient>,
}

impl FormsGateway {
    /// Assemble the module without logging in. The first call does.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] or [`GatewayError::Transport`] for an
    /// unusable endpoint.
    pub fn new(config: GraphQlConfig) -> Result<Self, GatewayError> {
        let endpoint = config.endpoint()?;
        let transport: Arc<dyn GraphQlTransport> =
            Arc::new(HttpTransport::new(&endpoint, config.request_timeout)?);
        Ok(Self::with_transport(transport, config))
    }

    /// Assemble the module and log in.
    ///
    /// # Errors
    ///
    /// Everything [`FormsGateway::new`] returns, plus [`GatewayError::Login`].
    pub async fn connect(config: GraphQlConfig) -> Result<Self, GatewayError> {
        let gateway = Self::new(config)?;
        gateway.session.connect().await?;
        tracing::info!("forms gateway connected");
        Ok(gateway)
    }

    /// Assemble the module over a caller-provided transport.
    #[must_use]
    pub fn with_transport(transport: Arc<dyn GraphQlTransport>, config: GraphQlConfig) -> Self {
        let raw = RawGraphQlClient::new(transport);
        let session = Arc::new(SessionGuard::new(raw, config.user, config.password));
        let backend: Arc<dyn FormsBackend> = session.clone();
        let client = Arc::new(FormsLocalClient::new(Arc::new(Service::new(backend))));

        Self { session, client }
    }

    #[must_use]
    pub fn client(&self) -> Arc<dyn FormsClient> {
        self.client.clone()
    }

    pub async fn is_connected(&self) -> bool {
        self.session.is_connected().await
    }

    pub async fn close(&self) {
        self.session.close().await;
        tracing::info!("forms gateway closed");
    }
}
