use crate::domain::result::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};

/// Six independent scalar bounds driving band classification.
///
/// Each channel is classified against its own max/min pair; no cross-channel
/// invariant exists.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdPolicy {
    pub temp_max: f64,
    pub temp_min: f64,
    pub humidity_max: f64,
    pub humidity_min: f64,
    pub flow_max: f64,
    pub flow_min: f64,
}

impl ThresholdPolicy {
    /// Reject inverted bounds instead of silently producing overlapping bands.
    pub fn validate(&self) -> DomainResult<()> {
        for (channel, max, min) in [
            ("temperature", self.temp_max, self.temp_min),
            ("humidity", self.humidity_max, self.humidity_min),
            ("flow", self.flow_max, self.flow_min),
        ] {
            if max < min {
                return Err(DomainError::InvalidPolicy(format!(
                    "{channel} bounds inverted: max {max} < min {min}"
                )));
            }
        }
        Ok(())
    }
}

/// Shared, live-updatable policy handle.
///
/// Readers see the latest bounds on every evaluation; writes are validated
/// before they become visible, so the engine never observes an inverted pair.
#[derive(Clone)]
pub struct SharedPolicy {
    inner: Arc<RwLock<ThresholdPolicy>>,
}

impl SharedPolicy {
    pub fn new(policy: ThresholdPolicy) -> DomainResult<Self> {
        policy.validate()?;
        Ok(Self {
            inner: Arc::new(RwLock::new(policy)),
        })
    }

    pub fn get(&self) -> ThresholdPolicy {
        *self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set(&self, policy: ThresholdPolicy) -> DomainResult<()> {
        policy.validate()?;
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = policy;
        Ok(())
    }
}
