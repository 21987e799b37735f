//! GraphQL backend adapter.
//!
//! Layers, innermost first: [`transport`] moves documents over HTTP,
//! [`raw_client`] maps one backend operation to one call, and [`session`]
//! adds authentication and the re-login protocol on top.

pub mod documents;
pub mod error;
pub mod models;
pub mod raw_client;
pub mod session;
pub mod transport;

pub use error::GraphQlError;
pub use raw_client::RawGraphQlClient;
pub use session::SessionGuard;
pub use transport::{GraphQlTransport, HttpTransport, TransportError};
