//! Backend command abstractions
//!
//! The backend owns login, roster fetch and the proxy transport. This crate
//! only issues commands to it; `MockCoreClient` replaces it in tests.

use crate::model::consent::ConsentAction;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Local proxy endpoint returned when a getting session starts
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    pub address: String,
    pub port: u16,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.address, self.port)
    }
}

/// Result type for backend commands
pub type CoreResult<T> = Result<T, CoreError>;

/// Backend command errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Rejected by backend: {0}")]
    Rejected(String),

    #[error("Not logged in to {0}")]
    NotLoggedIn(String),
}

/// Outbound commands to the backend
#[async_trait]
pub trait CoreClient: Clone + Send + Sync {
    /// Log in to a social network; the roster arrives later as updates
    async fn login(&self, network: &str) -> CoreResult<()>;

    async fn logout(&self, network: &str) -> CoreResult<()>;

    async fn modify_consent(
        &self,
        network: &str,
        user_id: &str,
        action: ConsentAction,
    ) -> CoreResult<()>;

    /// Start getting access through a remote instance
    async fn start_proxying(&self, instance_id: &str) -> CoreResult<Endpoint>;

    /// Stop the current getting session
    async fn stop_proxying(&self) -> CoreResult<()>;
}
