use async_trait::async_trait;
use common::domain::{ActuatorCommand, CommandPublisher, DomainError, DomainResult};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

/// HTTP request timeout for a single command delivery attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Deserialize)]
pub struct HttpCommandApiConfig {
    #[serde(default = "default_command_url")]
    pub command_url: String,
}

fn default_command_url() -> String {
    "http://localhost:1880/api".to_string()
}

impl Default for HttpCommandApiConfig {
    fn default() -> Self {
        Self {
            command_url: default_command_url(),
        }
    }
}

/// Command publisher for the HTTP-gateway variant.
///
/// Commands are POSTed as JSON to the gateway's command endpoint; a non-2xx
/// response is a delivery failure.
pub struct HttpCommandApi {
    config: HttpCommandApiConfig,
    client: reqwest::Client,
}

impl HttpCommandApi {
    pub fn new(config: HttpCommandApiConfig) -> DomainResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                DomainError::InvalidTransportConfig(format!("failed to build HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }
}

fn command_body(command: ActuatorCommand) -> serde_json::Value {
    serde_json::json!({ "command": command.wire_format() })
}

#[async_trait]
impl CommandPublisher for HttpCommandApi {
    #[instrument(skip_all, fields(command = %command))]
    async fn publish_command(&self, command: ActuatorCommand) -> DomainResult<()> {
        let response = self
            .client
            .post(&self.config.command_url)
            .json(&command_body(command))
            .send()
            .await
            .map_err(|e| {
                DomainError::TransportError(anyhow::anyhow!("command request failed: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(DomainError::TransportError(anyhow::anyhow!(
                "command endpoint returned HTTP {}",
                response.status()
            )));
        }

        debug!(url = %self.config.command_url, "actuator command delivered");
        Ok(())
    }
}
