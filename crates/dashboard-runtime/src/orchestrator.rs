//! Async refresh orchestrator.
//!
//! Runs a [`ReportService`] in a tokio task, sending a [`ReportUpdate`] on
//! startup and then on every refresh interval through an `mpsc` channel, so
//! the TUI event loop can consume reports without any shared mutable state.

use std::sync::Arc;
use std::time::Duration;

use dashboard_data::report::DashboardReport;
use tokio::sync::mpsc;
use tokio::time;

use crate::report_service::ReportService;

// ── Public types ──────────────────────────────────────────────────────────────

/// One refresh result forwarded to the presentation layer.
#[derive(Debug, Clone)]
pub enum ReportUpdate {
    Ready(DashboardReport),
    /// Generation failed; carries the user-facing message.
    Unavailable(String),
}

// ── ReportOrchestrator ────────────────────────────────────────────────────────

/// Background refresh coordinator.
pub struct ReportOrchestrator {
    service: Arc<ReportService>,
    update_interval: Duration,
}

impl ReportOrchestrator {
    pub fn new(service: Arc<ReportService>, update_interval_secs: u64) -> Self {
        Self {
            service,
            update_interval: Duration::from_secs(update_interval_secs.max(1)),
        }
    }

    /// Start the refresh loop.
    ///
    /// Returns the update receiver and a [`ReportHandle`] that can abort the
    /// loop. The loop also exits on its own once the receiver is dropped.
    pub fn start(self) -> (mpsc::Receiver<ReportUpdate>, ReportHandle) {
        let (tx, rx) = mpsc::channel(16);

        let handle = tokio::spawn(async move {
            self.refresh_loop(tx).await;
        });

        (rx, ReportHandle { handle })
    }

    // ── Private implementation ────────────────────────────────────────────

    async fn refresh_loop(self, tx: mpsc::Sender<ReportUpdate>) {
        if !self.generate_and_send(&tx).await {
            return;
        }

        let mut interval = time::interval(self.update_interval);
        // First tick fires immediately; the initial report is already sent.
        interval.tick().await;

        loop {
            interval.tick().await;

            if tx.is_closed() {
                tracing::debug!("report channel closed; exiting loop");
                break;
            }

            if !self.generate_and_send(&tx).await {
                break;
            }
        }
    }

    /// Returns `false` once the receiver is gone.
    async fn generate_and_send(&self, tx: &mpsc::Sender<ReportUpdate>) -> bool {
        let update = match self.service.generate().await {
            Ok(report) => ReportUpdate::Ready(report),
            Err(e) => {
                tracing::error!(error = %e, "report generation failed");
                ReportUpdate::Unavailable(e.to_string())
            }
        };

        if let Err(e) = tx.send(update).await {
            tracing::debug!(error = %e, "failed to send report update; receiver dropped");
            return false;
        }
        true
    }
}

// ── ReportHandle ──────────────────────────────────────────────────────────────

/// A handle to the background refresh task.
pub struct ReportHandle {
    handle: tokio::task::JoinHandle<()>,
}

impl ReportHandle {
    /// Immediately abort the refresh loop.
    pub fn abort(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
