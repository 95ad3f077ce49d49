use async_trait::async_trait;
use common::domain::{
    ConnectionStatus, DomainError, DomainResult, TelemetryHandler, TelemetryTransport,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use std::sync::Arc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, Deserialize)]
pub struct WsTransportConfig {
    #[serde(default = "default_ws_url")]
    pub ws_url: String,
}

fn default_ws_url() -> String {
    "ws://localhost:1880/ws/sensors".to_string()
}

impl Default for WsTransportConfig {
    fn default() -> Self {
        Self {
            ws_url: default_ws_url(),
        }
    }
}

/// WebSocket transport adapter for the HTTP-gateway variant.
///
/// Inbound only: telemetry frames arrive on the socket, commands go out
/// through [`crate::HttpCommandApi`] instead. Text and binary frames are both
/// fed to the handler; payload validity is the handler's concern.
pub struct WsTransport {
    config: WsTransportConfig,
}

impl WsTransport {
    pub fn new(config: WsTransportConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl TelemetryTransport for WsTransport {
    #[instrument(name = "ws_session", skip_all, fields(ws_url = %self.config.ws_url))]
    async fn run_session(
        &self,
        handler: Arc<dyn TelemetryHandler>,
        token: CancellationToken,
    ) -> DomainResult<()> {
        handler.connection_changed(ConnectionStatus::Connecting).await;

        let (ws_stream, _response) = connect_async(&self.config.ws_url).await.map_err(|e| {
            DomainError::TransportError(anyhow::anyhow!(
                "failed to connect to {}: {}",
                self.config.ws_url,
                e
            ))
        })?;

        info!("connected to WebSocket telemetry stream");
        handler.connection_changed(ConnectionStatus::Connected).await;

        let (mut write, mut read) = ws_stream.split();

        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    debug!("session cancellation received");
                    let _ = write.send(Message::Close(None)).await;
                    handler.connection_changed(ConnectionStatus::Closed).await;
                    return Ok(());
                }
                frame = read.next() => {
                    match frame {
                        Some(Ok(Message::Text(text))) => {
                            handler.handle_message(text.as_bytes()).await;
                        }
                        Some(Ok(Message::Binary(data))) => {
                            handler.handle_message(&data).await;
                        }
                        Some(Ok(Message::Close(_))) | None => {
                            info!("WebSocket stream closed by server");
                            handler.connection_changed(ConnectionStatus::Closed).await;
                            return Ok(());
                        }
                        Some(Ok(_)) => {
                            // Ping/pong and other control frames.
                        }
                        Some(Err(e)) => {
                            handler.connection_changed(ConnectionStatus::Error).await;
                            return Err(DomainError::TransportError(anyhow::anyhow!(
                                "WebSocket error: {}",
                                e
                            )));
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default_url() {
        let config = WsTransportConfig::default();
        assert_eq!(config.ws_url, "ws://localhost:1880/ws/sensors");
    }
}
