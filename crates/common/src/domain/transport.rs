use crate::domain::result::DomainResult;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Connection lifecycle of one transport session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connecting,
    Connected,
    Error,
    Closed,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConnectionStatus::Connecting => "connecting",
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Error => "error",
            ConnectionStatus::Closed => "closed",
        };
        f.write_str(label)
    }
}

/// Device-level reachability edge, independent of any one connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityEvent {
    Online,
    Offline,
}

/// Push-delivery side of the transport contract.
///
/// The transport invokes the handler once per raw inbound message, in arrival
/// order, from a single delivery context. Decode failures are the handler's
/// to absorb; one bad message must not stop the session loop.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait TelemetryHandler: Send + Sync {
    async fn handle_message(&self, payload: &[u8]);
    async fn connection_changed(&self, status: ConnectionStatus);
}

/// One connection session against a concrete transport.
///
/// A session connects, reports `Connecting → Connected`, pumps inbound
/// messages to the handler until the connection errors, closes, or the token
/// is cancelled, then reports the terminal status and tears down.
/// Reconnection policy lives outside the adapter.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait TelemetryTransport: Send + Sync {
    async fn run_session(
        &self,
        handler: Arc<dyn TelemetryHandler>,
        token: CancellationToken,
    ) -> DomainResult<()>;
}
