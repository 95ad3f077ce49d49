use async_trait::async_trait;
use common::domain::{
    ConnectivityEvent, PresentationSink, TelemetryHandler, TelemetryTransport,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

/// Edge detector over raw reachability probes.
///
/// Emits an event only when the answer changes, plus once for the very first
/// probe so startup surfaces the initial state.
pub struct ConnectivityMonitor {
    online: Option<bool>,
}

impl ConnectivityMonitor {
    pub fn new() -> Self {
        Self { online: None }
    }

    pub fn observe(&mut self, online: bool) -> Option<ConnectivityEvent> {
        let previous = self.online.replace(online);
        if previous == Some(online) {
            return None;
        }
        if online {
            Some(ConnectivityEvent::Online)
        } else {
            Some(ConnectivityEvent::Offline)
        }
    }
}

impl Default for ConnectivityMonitor {
    fn default() -> Self {
        Self::new()
    }
}

/// Answers a single question: can the backend be reached right now?
#[async_trait]
pub trait ReachabilityProbe: Send + Sync {
    async fn check(&self) -> bool;
}

/// Probes by opening (and immediately dropping) a TCP connection to the
/// backend address.
pub struct TcpReachabilityProbe {
    addr: String,
    timeout: Duration,
}

impl TcpReachabilityProbe {
    pub fn new(addr: impl Into<String>, timeout: Duration) -> Self {
        Self {
            addr: addr.into(),
            timeout,
        }
    }
}

#[async_trait]
impl ReachabilityProbe for TcpReachabilityProbe {
    async fn check(&self) -> bool {
        matches!(
            tokio::time::timeout(self.timeout, TcpStream::connect(&self.addr)).await,
            Ok(Ok(_))
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SupervisorConfig {
    pub probe_interval: Duration,
    pub restart_backoff: Duration,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            probe_interval: Duration::from_secs(5),
            restart_backoff: Duration::from_secs(2),
        }
    }
}

/// Runs transport sessions for as long as the backend is reachable.
///
/// While a session is up, the probe keeps ticking; a lost probe cancels the
/// session's token so the transport tears down cleanly, and a fresh session
/// is started once the probe answers again. The handler (and with it all
/// latch state) is shared across sessions, never rebuilt.
pub struct TransportSupervisor {
    transport: Arc<dyn TelemetryTransport>,
    handler: Arc<dyn TelemetryHandler>,
    probe: Arc<dyn ReachabilityProbe>,
    presenter: Arc<dyn PresentationSink>,
    config: SupervisorConfig,
}

impl TransportSupervisor {
    pub fn new(
        transport: Arc<dyn TelemetryTransport>,
        handler: Arc<dyn TelemetryHandler>,
        probe: Arc<dyn ReachabilityProbe>,
        presenter: Arc<dyn PresentationSink>,
        config: SupervisorConfig,
    ) -> Self {
        Self {
            transport,
            handler,
            probe,
            presenter,
            config,
        }
    }

    #[instrument(skip_all)]
    pub async fn run(&self, token: CancellationToken) {
        let mut monitor = ConnectivityMonitor::new();

        while !token.is_cancelled() {
            self.wait_until_online(&mut monitor, &token).await;
            if token.is_cancelled() {
                break;
            }

            let session_token = token.child_token();
            let session = self
                .transport
                .run_session(self.handler.clone(), session_token.clone());
            tokio::pin!(session);

            loop {
                tokio::select! {
                    result = &mut session => {
                        match result {
                            Ok(()) => info!("transport session closed"),
                            Err(e) => warn!(error = %e, "transport session failed"),
                        }
                        break;
                    }
                    _ = tokio::time::sleep(self.config.probe_interval) => {
                        let online = self.probe.check().await;
                        if let Some(event) = monitor.observe(online) {
                            self.presenter.connectivity_changed(event).await;
                            if event == ConnectivityEvent::Offline {
                                info!("connectivity lost, tearing down transport session");
                                session_token.cancel();
                            }
                        }
                    }
                }
            }

            if token.is_cancelled() {
                break;
            }
            tokio::time::sleep(self.config.restart_backoff).await;
        }

        info!("transport supervisor stopped");
    }

    async fn wait_until_online(&self, monitor: &mut ConnectivityMonitor, token: &CancellationToken) {
        loop {
            let online = self.probe.check().await;
            if let Some(event) = monitor.observe(online) {
                self.presenter.connectivity_changed(event).await;
            }
            if online {
                return;
            }
            tokio::select! {
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(self.config.probe_interval) => {}
            }
        }
    }
}
