//! Remote sources for the two snapshots.
//!
//! The transport (HTTP client, retries, auth) is a collaborator: anything
//! that can produce a [`MaintenanceConfig`] or a menu forest implements these
//! traits. A rejected request and a payload of the wrong shape are the same
//! thing to the poller, a [`FetchError`].

use async_trait::async_trait;
use navgate::{MaintenanceConfig, PolicyError, UserMenuNode};
use std::sync::Arc;
use std::time::Duration;

/// Why a fetch produced no usable snapshot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Connection, DNS, TLS or body read failure.
    #[error("transport error: {0}")]
    Transport(String),
    /// Non-2xx response.
    #[error("unexpected status {0}")]
    Status(u16),
    /// 2xx response whose body is not the expected shape.
    #[error("malformed payload: {0}")]
    Decode(String),
    /// The fetch did not complete within one poll interval.
    #[error("fetch did not complete within {0:?}")]
    TimedOut(Duration),
}

impl From<PolicyError> for FetchError {
    fn from(err: PolicyError) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Produces the current maintenance configuration.
#[async_trait]
pub trait ConfigSource: Send + Sync {
    /// Fetch and decode the config (already merged over defaults).
    async fn fetch_config(&self) -> Result<MaintenanceConfig, FetchError>;
}

/// Produces the user menu forest.
#[async_trait]
pub trait MenuSource: Send + Sync {
    /// Fetch the menu tree; `only_usable` asks the backend to drop
    /// `useTf = 'N'` entries.
    async fn fetch_menu(&self, only_usable: bool) -> Result<Vec<UserMenuNode>, FetchError>;
}

#[async_trait]
impl<T: ConfigSource + ?Sized> ConfigSource for Arc<T> {
    async fn fetch_config(&self) -> Result<MaintenanceConfig, FetchError> {
        (**self).fetch_config().await
    }
}

#[async_trait]
impl<T: MenuSource + ?Sized> MenuSource for Arc<T> {
    async fn fetch_menu(&self, only_usable: bool) -> Result<Vec<UserMenuNode>, FetchError> {
        (**self).fetch_menu(only_usable).await
    }
}
