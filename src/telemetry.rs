//! Mutation telemetry / 变更遥测
//!
//! The store reports every create/update/delete to a `MutationObserver`.
//! Observers must return immediately; any work they do runs detached from the
//! request that triggered it.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A store mutation about to be executed / 即将执行的存储变更
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationEvent {
    Created { title: String },
    Updated { id: i64, title: String },
    Deleted { id: i64 },
}

impl MutationEvent {
    /// Synthetic work duration before scaling.
    fn base_delay(&self) -> Duration {
        match self {
            MutationEvent::Created { .. } => Duration::from_millis(100),
            MutationEvent::Updated { .. } | MutationEvent::Deleted { .. } => Duration::from_millis(50),
        }
    }

    fn describe(&self) -> String {
        match self {
            MutationEvent::Created { title } => format!("create book '{}'", title),
            MutationEvent::Updated { id, title } => format!("update book {} '{}'", id, title),
            MutationEvent::Deleted { id } => format!("delete book {}", id),
        }
    }
}

/// Receives store mutations. Implementations must not block.
pub trait MutationObserver: Send + Sync {
    fn notify(&self, event: MutationEvent);
}

/// Observer that drops every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl MutationObserver for NoopObserver {
    fn notify(&self, _event: MutationEvent) {}
}

/// Channel-backed observer / 基于通道的观察者
///
/// Events go through an unbounded channel to a worker task, which spawns one
/// logging task per event so a slow event never holds up the next one.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<MutationEvent>,
}

impl ChannelObserver {
    /// Start the worker on the current tokio runtime.
    ///
    /// `delay_scale` multiplies the synthetic delay; 0.0 disables it.
    pub fn spawn(delay_scale: f64) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::unbounded_channel::<MutationEvent>();
        let scale = if delay_scale.is_finite() && delay_scale > 0.0 { delay_scale } else { 0.0 };

        let worker = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                let delay = event.base_delay().mul_f64(scale);
                tokio::spawn(async move {
                    let what = event.describe();
                    tracing::debug!("Background: start {}", what);
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    tracing::debug!("Background: done {}", what);
                });
            }
            tracing::debug!("Mutation telemetry worker stopped");
        });

        (Self { tx }, worker)
    }
}

impl MutationObserver for ChannelObserver {
    fn notify(&self, event: MutationEvent) {
        // Worker gone means shutdown is in progress
        let _ = self.tx.send(event);
    }
}

/// Build the observer selected by configuration.
pub fn observer_from_config(enabled: bool, delay_scale: f64) -> Arc<dyn MutationObserver> {
    if enabled {
        let (observer, _worker) = ChannelObserver::spawn(delay_scale);
        Arc::new(observer)
    } else {
        Arc::new(NoopObserver)
    }
}
