use async_trait::async_trait;
use common::domain::{
    ActuatorCommand, CommandPublisher, ConnectionStatus, DomainError, DomainResult,
    TelemetryHandler, TelemetryTransport,
};
use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS};
use serde::Deserialize;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, Deserialize)]
pub struct MqttTransportConfig {
    #[serde(default = "default_broker_url")]
    pub broker_url: String,
    #[serde(default = "default_client_id")]
    pub client_id: String,
    #[serde(default = "default_sensor_topic")]
    pub sensor_topic: String,
    #[serde(default = "default_actuator_topic")]
    pub actuator_topic: String,
}

fn default_broker_url() -> String {
    "mqtt://localhost:1883".to_string()
}

fn default_client_id() -> String {
    "enviro-agent".to_string()
}

fn default_sensor_topic() -> String {
    "wokwi/sensors".to_string()
}

fn default_actuator_topic() -> String {
    "wokwi/actuators".to_string()
}

impl Default for MqttTransportConfig {
    fn default() -> Self {
        Self {
            broker_url: default_broker_url(),
            client_id: default_client_id(),
            sensor_topic: default_sensor_topic(),
            actuator_topic: default_actuator_topic(),
        }
    }
}

/// MQTT transport adapter.
///
/// A session subscribes to the sensor topic and pumps publishes to the
/// handler; commands go out on the actuator topic through the same client.
/// The client handle exists only while a session is live, so publishing
/// between sessions fails fast instead of queueing silently.
pub struct MqttTransport {
    config: MqttTransportConfig,
    client: Mutex<Option<AsyncClient>>,
}

impl MqttTransport {
    pub fn new(config: MqttTransportConfig) -> Self {
        Self {
            config,
            client: Mutex::new(None),
        }
    }

    fn install_client(&self, client: AsyncClient) {
        *self
            .client
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(client);
    }

    fn clear_client(&self) {
        *self
            .client
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn current_client(&self) -> Option<AsyncClient> {
        self.client
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl TelemetryTransport for MqttTransport {
    #[instrument(name = "mqtt_session", skip_all, fields(broker_url = %self.config.broker_url))]
    async fn run_session(
        &self,
        handler: Arc<dyn TelemetryHandler>,
        token: CancellationToken,
    ) -> DomainResult<()> {
        handler.connection_changed(ConnectionStatus::Connecting).await;

        let (host, port) = parse_broker_url(&self.config.broker_url)?;

        let mut mqtt_options = MqttOptions::new(&self.config.client_id, host, port);
        mqtt_options.set_keep_alive(Duration::from_secs(30));
        mqtt_options.set_clean_session(true);

        let (client, mut eventloop) = AsyncClient::new(mqtt_options, 100);

        client
            .subscribe(&self.config.sensor_topic, QoS::AtLeastOnce)
            .await
            .map_err(|e| {
                DomainError::TransportError(anyhow::anyhow!("failed to subscribe: {}", e))
            })?;

        info!(topic = %self.config.sensor_topic, "subscribed to sensor topic");
        self.install_client(client.clone());

        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    debug!("session cancellation received");
                    self.clear_client();
                    let _ = client.disconnect().await;
                    handler.connection_changed(ConnectionStatus::Closed).await;
                    return Ok(());
                }
                event = eventloop.poll() => {
                    match event {
                        Ok(Event::Incoming(Packet::Publish(publish))) => {
                            if publish.topic == self.config.sensor_topic {
                                handler.handle_message(&publish.payload).await;
                            } else {
                                warn!(topic = %publish.topic, "message on unexpected topic, skipping");
                            }
                        }
                        Ok(Event::Incoming(Packet::ConnAck(_))) => {
                            info!("connected to MQTT broker");
                            handler.connection_changed(ConnectionStatus::Connected).await;
                        }
                        Ok(Event::Incoming(Packet::SubAck(_))) => {
                            debug!("subscription acknowledged");
                        }
                        Ok(_) => {
                            // Other events (outgoing, pings, etc.)
                        }
                        Err(e) => {
                            self.clear_client();
                            handler.connection_changed(ConnectionStatus::Error).await;
                            return Err(DomainError::TransportError(anyhow::anyhow!(
                                "MQTT event loop error: {}",
                                e
                            )));
                        }
                    }
                }
            }
        }
    }
}

#[async_trait]
impl CommandPublisher for MqttTransport {
    #[instrument(skip_all, fields(command = %command))]
    async fn publish_command(&self, command: ActuatorCommand) -> DomainResult<()> {
        let client = self.current_client().ok_or_else(|| {
            DomainError::TransportError(anyhow::anyhow!("no active MQTT session"))
        })?;

        client
            .publish(
                &self.config.actuator_topic,
                QoS::AtLeastOnce,
                false,
                command.wire_format(),
            )
            .await
            .map_err(|e| {
                DomainError::TransportError(anyhow::anyhow!("failed to publish command: {}", e))
            })?;

        debug!(topic = %self.config.actuator_topic, "actuator command published");
        Ok(())
    }
}

/// Parse broker URL in format mqtt://host:port, tcp://host:port or host:port.
/// Only the final colon separates the port, so bracketed IPv6 literals like
/// mqtt://[::1]:1883 stay intact.
fn parse_broker_url(url: &str) -> DomainResult<(&str, u16)> {
    let url = url.trim_start_matches("mqtt://");
    let url = url.trim_start_matches("tcp://");

    // Bracketed IPv6 literal without an explicit port.
    if url.starts_with('[') && url.ends_with(']') {
        return Ok((strip_brackets(url), 1883));
    }

    match url.rsplit_once(':') {
        None => Ok((url, 1883)), // Default MQTT port
        Some((host, port)) => {
            let port = port.parse::<u16>().map_err(|_| {
                DomainError::InvalidTransportConfig(format!(
                    "Invalid port in broker URL: {}",
                    port
                ))
            })?;
            Ok((strip_brackets(host), port))
        }
    }
}

fn strip_brackets(host: &str) -> &str {
    host.strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host)
}
