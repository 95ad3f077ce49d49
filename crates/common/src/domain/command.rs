use crate::domain::result::DomainResult;
use async_trait::async_trait;
use std::fmt;

/// The two controlled actuators. Temperature drives Act1 and flow drives
/// Act2; humidity never drives an actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actuator {
    Act1,
    Act2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchState {
    On,
    Off,
}

/// An actuator command, produced only by a latch transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActuatorCommand {
    pub actuator: Actuator,
    pub state: SwitchState,
}

impl ActuatorCommand {
    pub fn turn_on(actuator: Actuator) -> Self {
        Self {
            actuator,
            state: SwitchState::On,
        }
    }

    pub fn turn_off(actuator: Actuator) -> Self {
        Self {
            actuator,
            state: SwitchState::Off,
        }
    }

    /// The exact wire representation expected by the device firmware.
    pub fn wire_format(&self) -> &'static str {
        match (self.actuator, self.state) {
            (Actuator::Act1, SwitchState::On) => "ACT1:ON",
            (Actuator::Act1, SwitchState::Off) => "ACT1:OFF",
            (Actuator::Act2, SwitchState::On) => "ACT2:ON",
            (Actuator::Act2, SwitchState::Off) => "ACT2:OFF",
        }
    }
}

impl fmt::Display for ActuatorCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_format())
    }
}

/// Best-effort outbound command channel.
///
/// Implementations publish to the transport's command path (MQTT actuator
/// topic, HTTP command endpoint). A failed send is a transport concern to
/// surface, not a reason for the caller to re-evaluate or roll back.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CommandPublisher: Send + Sync {
    async fn publish_command(&self, command: ActuatorCommand) -> DomainResult<()>;
}
