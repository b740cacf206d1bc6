//! navgate-poll - keeps navgate snapshots fresh
//!
//! [`ConfigPoller`] refreshes a [`PolicyCell`](navgate::PolicyCell) on the
//! cadence the config itself asks for; [`MenuLoader`] fills a
//! [`MenuCell`](navgate::MenuCell) on demand. Transports plug in through
//! [`ConfigSource`] and [`MenuSource`]. Enable the `http` feature for a
//! reqwest implementation of both.
//!
//! ```no_run
//! use navgate::{MaintenanceRouteGuard, PolicyCell, RouteGuard};
//! use navgate_poll::{ConfigPoller, ConfigSource, FetchError};
//!
//! struct Static;
//!
//! #[async_trait::async_trait]
//! impl ConfigSource for Static {
//!     async fn fetch_config(&self) -> Result<navgate::MaintenanceConfig, FetchError> {
//!         Ok(navgate::MaintenanceConfig::default())
//!     }
//! }
//!
//! # async fn run() {
//! let cell = PolicyCell::new();
//! let handle = ConfigPoller::new(Static, cell.clone()).spawn();
//! let guard = MaintenanceRouteGuard::new(cell);
//! let _ = guard.check("/");
//! handle.shutdown().await;
//! # }
//! ```

mod menu_loader;
mod poller;
mod source;

#[cfg(feature = "http")]
mod http;

pub use menu_loader::MenuLoader;
pub use poller::{ConfigPoller, FailurePolicy, PollStatus, PollerHandle};
pub use source::{ConfigSource, FetchError, MenuSource};

#[cfg(feature = "http")]
pub use http::HttpSource;
