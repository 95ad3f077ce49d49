use crate::domain::alert::EvaluationOutcome;
use crate::domain::sample::TelemetrySample;
use crate::domain::transport::{ConnectionStatus, ConnectivityEvent};
use async_trait::async_trait;

/// Sink for everything the presentation layer renders: raw samples, alert
/// lists, transport lifecycle, reachability edges, decode diagnostics.
///
/// Samples arrive through `sample_received` even when the control loop is
/// disabled; `evaluation_completed` fires only for evaluated cycles.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PresentationSink: Send + Sync {
    async fn sample_received(&self, sample: &TelemetrySample);
    async fn evaluation_completed(&self, sample: &TelemetrySample, outcome: &EvaluationOutcome);
    async fn decode_rejected(&self, reason: &str);
    async fn connection_changed(&self, status: ConnectionStatus);
    async fn connectivity_changed(&self, event: ConnectivityEvent);
}
