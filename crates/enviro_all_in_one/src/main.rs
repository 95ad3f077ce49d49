mod config;

use anyhow::{bail, Result};
use common::domain::{
    CommandPublisher, PresentationSink, SharedPolicy, TelemetryHandler, TelemetryTransport,
    ThresholdPolicy,
};
use common::telemetry::{init_telemetry, TelemetryConfig};
use config::ServiceConfig;
use control_worker::{
    AgentService, LogPresenter, SupervisorConfig, TcpReachabilityProbe, TransportSupervisor,
};
use mqtt_transport::{MqttTransport, MqttTransportConfig};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;
use ws_transport::{HttpCommandApi, HttpCommandApiConfig, WsTransport, WsTransportConfig};

#[tokio::main]
async fn main() {
    let config = match ServiceConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(config).await {
        eprintln!("Service failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(config: ServiceConfig) -> Result<()> {
    init_telemetry(&TelemetryConfig {
        service_name: "enviro-all-in-one".to_string(),
        log_level: config.log_level.clone(),
    })?;

    info!(transport = %config.transport, "starting environmental control agent");

    let policy = SharedPolicy::new(ThresholdPolicy {
        temp_max: config.temp_max,
        temp_min: config.temp_min,
        humidity_max: config.humidity_max,
        humidity_min: config.humidity_min,
        flow_max: config.flow_max,
        flow_min: config.flow_min,
    })?;

    let presenter = Arc::new(LogPresenter::new(config.window_capacity));

    let (transport, publisher): (Arc<dyn TelemetryTransport>, Arc<dyn CommandPublisher>) =
        match config.transport.as_str() {
            "mqtt" => {
                let mqtt = Arc::new(MqttTransport::new(MqttTransportConfig {
                    broker_url: config.broker_url.clone(),
                    client_id: config.client_id.clone(),
                    sensor_topic: config.sensor_topic.clone(),
                    actuator_topic: config.actuator_topic.clone(),
                }));
                (mqtt.clone(), mqtt)
            }
            "ws" | "websocket" => {
                let stream = Arc::new(WsTransport::new(WsTransportConfig {
                    ws_url: config.ws_url.clone(),
                }));
                let api = Arc::new(HttpCommandApi::new(HttpCommandApiConfig {
                    command_url: config.command_url.clone(),
                })?);
                (stream, api)
            }
            other => bail!("unknown transport variant: {}", other),
        };

    let agent: Arc<dyn TelemetryHandler> = Arc::new(AgentService::new(
        policy,
        publisher,
        presenter.clone() as Arc<dyn PresentationSink>,
        config.agent_enabled,
    ));

    let probe = Arc::new(TcpReachabilityProbe::new(
        config.probe_addr.clone(),
        Duration::from_secs(config.probe_timeout_secs),
    ));

    let supervisor = TransportSupervisor::new(
        transport,
        agent,
        probe,
        presenter as Arc<dyn PresentationSink>,
        SupervisorConfig {
            probe_interval: Duration::from_secs(config.probe_interval_secs),
            restart_backoff: Duration::from_secs(config.restart_backoff_secs),
        },
    );

    let token = CancellationToken::new();
    let shutdown = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
            shutdown.cancel();
        }
    });

    supervisor.run(token).await;

    info!("service stopped gracefully");
    Ok(())
}
