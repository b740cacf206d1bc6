//! Background refresh of the maintenance policy.
//!
//! Fetches once immediately, then again `max(5, pollIntervalSec)` seconds
//! after each fetch completes, reading the interval from the snapshot that
//! fetch just produced. Failures never reach guards: they are logged, folded
//! into [`PollStatus`], and resolved per [`FailurePolicy`]. A fetch that
//! takes longer than one interval is dropped and counts as a failure.

use crate::source::{ConfigSource, FetchError};
use navgate::{MaintenanceConfig, MaintenancePolicy, PolicyCell};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// What a failed fetch does to the published snapshot.
///
/// Under either policy a failure before anything was published resolves to
/// the fully-open default, so guards never wait on an unresolved fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Publish the fully-open default config.
    #[default]
    ResetToDefault,
    /// Keep serving the last successfully fetched config.
    KeepLastKnownGood,
}

/// Outcome of the most recent poll cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollStatus {
    /// No cycle has completed yet.
    Pending,
    /// A fresh config was published.
    Updated {
        /// Number of rules in the payload.
        rules: usize,
    },
    /// The fetch failed and the open default was published.
    FailedOpen {
        /// Rendered [`FetchError`].
        error: String,
    },
    /// The fetch failed and the previous config stays authoritative.
    KeptLastKnownGood {
        /// Rendered [`FetchError`].
        error: String,
    },
}

impl PollStatus {
    /// Returns `true` for either failure outcome.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::FailedOpen { .. } | Self::KeptLastKnownGood { .. })
    }
}

/// Keeps a [`PolicyCell`] fresh from a [`ConfigSource`].
pub struct ConfigPoller {
    source: Arc<dyn ConfigSource>,
    cell: PolicyCell,
    failure_policy: FailurePolicy,
}

impl ConfigPoller {
    /// Create a poller writing into `cell`.
    pub fn new(source: impl ConfigSource + 'static, cell: PolicyCell) -> Self {
        Self {
            source: Arc::new(source),
            cell,
            failure_policy: FailurePolicy::default(),
        }
    }

    /// Set the failure policy (builder pattern).
    #[must_use]
    pub fn with_failure_policy(mut self, failure_policy: FailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }

    /// Interval of the latest published snapshot, or the default's.
    fn current_interval(&self) -> Duration {
        self.cell.load().map_or_else(
            || MaintenanceConfig::default().poll_interval(),
            |policy| policy.poll_interval(),
        )
    }

    /// Run a single fetch, bounded by the current interval, and publish.
    pub async fn poll_once(&self) -> PollStatus {
        let outcome = self.fetch().await;
        self.apply(outcome)
    }

    async fn fetch(&self) -> Result<MaintenanceConfig, FetchError> {
        let limit = self.current_interval();
        tokio::time::timeout(limit, self.source.fetch_config())
            .await
            .unwrap_or(Err(FetchError::TimedOut(limit)))
    }

    fn apply(&self, outcome: Result<MaintenanceConfig, FetchError>) -> PollStatus {
        match outcome {
            Ok(config) => {
                let rules = config.rules.len();
                tracing::debug!(
                    rules,
                    enabled = config.enabled,
                    interval = ?config.poll_interval(),
                    "maintenance config refreshed"
                );
                self.cell.publish(MaintenancePolicy::new(config));
                PollStatus::Updated { rules }
            }
            Err(err) => {
                let keep = self.failure_policy == FailurePolicy::KeepLastKnownGood
                    && self.cell.is_resolved();
                tracing::warn!(
                    error = %err,
                    keep_last_known_good = keep,
                    "maintenance config fetch failed"
                );
                if keep {
                    PollStatus::KeptLastKnownGood {
                        error: err.to_string(),
                    }
                } else {
                    self.cell.publish(MaintenancePolicy::open());
                    PollStatus::FailedOpen {
                        error: err.to_string(),
                    }
                }
            }
        }
    }

    /// Start polling on the current tokio runtime.
    ///
    /// Polling stops when the returned handle is shut down or dropped.
    #[must_use]
    pub fn spawn(self) -> PollerHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (status_tx, status_rx) = watch::channel(PollStatus::Pending);
        let cycles = Arc::new(AtomicU64::new(0));
        let task = tokio::spawn(self.run(shutdown_rx, status_tx, Arc::clone(&cycles)));

        PollerHandle {
            shutdown: shutdown_tx,
            status: status_rx,
            cycles,
            task: Some(task),
        }
    }

    async fn run(
        self,
        mut shutdown: watch::Receiver<bool>,
        status: watch::Sender<PollStatus>,
        cycles: Arc<AtomicU64>,
    ) {
        loop {
            let outcome = tokio::select! {
                biased;
                _ = shutdown.changed() => break,
                outcome = self.fetch() => outcome,
            };
            // Nothing is published once shutdown was requested.
            if *shutdown.borrow() {
                break;
            }
            let outcome = self.apply(outcome);
            cycles.fetch_add(1, Ordering::Relaxed);
            status.send_replace(outcome);

            let next = self.current_interval();
            tokio::select! {
                biased;
                _ = shutdown.changed() => break,
                () = tokio::time::sleep(next) => {}
            }
        }
        tracing::debug!("maintenance config poller stopped");
    }
}

impl std::fmt::Debug for ConfigPoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigPoller")
            .field("cell", &self.cell)
            .field("failure_policy", &self.failure_policy)
            .finish_non_exhaustive()
    }
}

/// Owner of a running [`ConfigPoller`].
///
/// Dropping the handle aborts the task, discarding any in-flight fetch.
#[derive(Debug)]
pub struct PollerHandle {
    shutdown: watch::Sender<bool>,
    status: watch::Receiver<PollStatus>,
    cycles: Arc<AtomicU64>,
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    /// Observability signal: the outcome of the latest cycle.
    #[must_use]
    pub fn status(&self) -> watch::Receiver<PollStatus> {
        self.status.clone()
    }

    /// Number of completed poll cycles, successful or not.
    #[must_use]
    pub fn cycles(&self) -> u64 {
        self.cycles.load(Ordering::Relaxed)
    }

    /// Stop scheduling fetches and wait for the task to exit.
    pub async fn shutdown(mut self) {
        let _ = self.shutdown.send(true);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    /// Returns `true` once the polling task has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
