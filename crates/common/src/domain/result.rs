use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Malformed telemetry payload: {0}")]
    MalformedPayload(String),

    #[error("Invalid threshold policy: {0}")]
    InvalidPolicy(String),

    #[error("Invalid transport configuration: {0}")]
    InvalidTransportConfig(String),

    #[error("Transport error: {0}")]
    TransportError(#[from] anyhow::Error),
}
