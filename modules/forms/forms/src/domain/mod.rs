//! Domain layer of the forms module.

pub mod error;
pub mod local_client;
pub mod normalizer;
pub mod ports;
pub mod service;


pub use error::DomainError;
pub use local_client::FormsLocalClient;
pub use ports::FormsBackend;
pub use service::Service;
