use async_trait::async_trait;
use common::domain::{
    ConnectionStatus, ConnectivityEvent, EvaluationOutcome, PresentationSink, SampleWindow,
    Severity, TelemetrySample,
};
use std::sync::{Mutex, PoisonError};
use tracing::{error, info, warn};

/// Presentation sink that renders to structured logs and keeps the bounded
/// sample history for status queries.
///
/// The window is display state only; losing it on restart is harmless.
pub struct LogPresenter {
    window: Mutex<SampleWindow>,
}

impl LogPresenter {
    pub fn new(window_capacity: usize) -> Self {
        Self {
            window: Mutex::new(SampleWindow::new(window_capacity)),
        }
    }

    /// Snapshot of the retained samples, oldest first.
    pub fn recent_samples(&self) -> Vec<TelemetrySample> {
        self.window
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }
}

impl Default for LogPresenter {
    fn default() -> Self {
        Self {
            window: Mutex::new(SampleWindow::default()),
        }
    }
}

#[async_trait]
impl PresentationSink for LogPresenter {
    async fn sample_received(&self, sample: &TelemetrySample) {
        self.window
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(sample.clone());

        info!(
            temp = sample.temp,
            humidity = sample.humidity,
            flow = sample.flow,
            "telemetry sample received"
        );
    }

    async fn evaluation_completed(&self, _sample: &TelemetrySample, outcome: &EvaluationOutcome) {
        for alert in &outcome.alerts {
            match alert.severity {
                Severity::Critical => {
                    error!(subject = %alert.subject, "{}", alert.message)
                }
                Severity::Warning => {
                    warn!(subject = %alert.subject, "{}", alert.message)
                }
                Severity::Info => {
                    info!(subject = %alert.subject, "{}", alert.message)
                }
            }
        }

        for command in &outcome.commands {
            info!(command = %command, "actuator command issued");
        }
    }

    async fn decode_rejected(&self, reason: &str) {
        warn!(reason, "telemetry message rejected");
    }

    async fn connection_changed(&self, status: ConnectionStatus) {
        info!(status = %status, "transport connection status changed");
    }

    async fn connectivity_changed(&self, event: ConnectivityEvent) {
        match event {
            ConnectivityEvent::Online => info!("backend reachable"),
            ConnectivityEvent::Offline => {
                warn!("backend unreachable, display continues from retained samples")
            }
        }
    }
}
