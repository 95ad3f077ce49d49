use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServiceConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Transport variant: "mqtt" or "websocket"
    #[serde(default = "default_transport")]
    pub transport: String,

    // MQTT transport
    /// MQTT broker URL
    #[serde(default = "default_broker_url")]
    pub broker_url: String,

    /// MQTT client ID
    #[serde(default = "default_client_id")]
    pub client_id: String,

    /// Topic carrying inbound telemetry
    #[serde(default = "default_sensor_topic")]
    pub sensor_topic: String,

    /// Topic carrying outbound actuator commands
    #[serde(default = "default_actuator_topic")]
    pub actuator_topic: String,

    // WebSocket transport
    /// WebSocket telemetry stream URL
    #[serde(default = "default_ws_url")]
    pub ws_url: String,

    /// HTTP command endpoint URL
    #[serde(default = "default_command_url")]
    pub command_url: String,

    // Connectivity supervision
    /// TCP address probed for backend reachability
    #[serde(default = "default_probe_addr")]
    pub probe_addr: String,

    /// Seconds between reachability probes
    #[serde(default = "default_probe_interval_secs")]
    pub probe_interval_secs: u64,

    /// TCP connect timeout for one probe, in seconds
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,

    /// Seconds to wait before restarting a finished transport session
    #[serde(default = "default_restart_backoff_secs")]
    pub restart_backoff_secs: u64,

    // Control loop
    /// Whether the control loop evaluates samples at startup
    #[serde(default = "default_agent_enabled")]
    pub agent_enabled: bool,

    /// Number of samples retained for display
    #[serde(default = "default_window_capacity")]
    pub window_capacity: usize,

    // Threshold policy
    #[serde(default = "default_temp_max")]
    pub temp_max: f64,
    #[serde(default = "default_temp_min")]
    pub temp_min: f64,
    #[serde(default = "default_humidity_max")]
    pub humidity_max: f64,
    #[serde(default = "default_humidity_min")]
    pub humidity_min: f64,
    #[serde(default = "default_flow_max")]
    pub flow_max: f64,
    #[serde(default = "default_flow_min")]
    pub flow_min: f64,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_transport() -> String {
    "mqtt".to_string()
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

fn default_ws_url() -> String {
    "ws://localhost:1880/ws/sensors".to_string()
}

fn default_command_url() -> String {
    "http://localhost:1880/api".to_string()
}

fn default_probe_addr() -> String {
    "localhost:1883".to_string()
}

fn default_probe_interval_secs() -> u64 {
    5
}

fn default_probe_timeout_secs() -> u64 {
    3
}

fn default_restart_backoff_secs() -> u64 {
    2
}

fn default_agent_enabled() -> bool {
    true
}

fn default_window_capacity() -> usize {
    20
}

fn default_temp_max() -> f64 {
    30.0
}

fn default_temp_min() -> f64 {
    10.0
}

fn default_humidity_max() -> f64 {
    70.0
}

fn default_humidity_min() -> f64 {
    20.0
}

fn default_flow_max() -> f64 {
    50.0
}

fn default_flow_min() -> f64 {
    5.0
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(Environment::with_prefix("ENVIRO"))
            .build()?
            .try_deserialize()
    }
}
