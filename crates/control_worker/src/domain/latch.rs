use common::domain::{Actuator, ActuatorCommand};

/// Band classification of one reading relative to its policy bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    High,
    Low,
    Normal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatchState {
    Off,
    On,
}

/// Edge-triggered ON/OFF state machine for one actuator.
///
/// High band with the latch Off turns it On; normal band with the latch On
/// turns it Off; low band never transitions in either direction. The output
/// is the transition itself: re-entering the current band is a no-op, which
/// is what keeps repeated out-of-band samples from re-emitting commands.
#[derive(Debug)]
pub struct ActuatorLatch {
    actuator: Actuator,
    state: LatchState,
}

impl ActuatorLatch {
    pub fn new(actuator: Actuator) -> Self {
        Self {
            actuator,
            state: LatchState::Off,
        }
    }

    pub fn state(&self) -> LatchState {
        self.state
    }

    /// Feed one band observation; returns the command for an edge, if any.
    pub fn observe(&mut self, band: Band) -> Option<ActuatorCommand> {
        match (band, self.state) {
            (Band::High, LatchState::Off) => {
                self.state = LatchState::On;
                Some(ActuatorCommand::turn_on(self.actuator))
            }
            (Band::Normal, LatchState::On) => {
                self.state = LatchState::Off;
                Some(ActuatorCommand::turn_off(self.actuator))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::domain::SwitchState;

    #[test]
    fn test_high_band_edge_turns_latch_on() {
        let mut latch = ActuatorLatch::new(Actuator::Act1);

        let command = latch.observe(Band::High).expect("rising edge emits");
        assert_eq!(command.actuator, Actuator::Act1);
        assert_eq!(command.state, SwitchState::On);
        assert_eq!(latch.state(), LatchState::On);
    }

    #[test]
    fn test_high_band_reentry_is_noop() {
        let mut latch = ActuatorLatch::new(Actuator::Act1);
        latch.observe(Band::High);

        assert_eq!(latch.observe(Band::High), None);
        assert_eq!(latch.state(), LatchState::On);
    }

    #[test]
    fn test_normal_band_edge_turns_latch_off() {
        let mut latch = ActuatorLatch::new(Actuator::Act2);
        latch.observe(Band::High);

        let command = latch.observe(Band::Normal).expect("falling edge emits");
        assert_eq!(command.state, SwitchState::Off);
        assert_eq!(latch.state(), LatchState::Off);
    }

    #[test]
    fn test_normal_band_with_latch_off_is_noop() {
        let mut latch = ActuatorLatch::new(Actuator::Act1);
        assert_eq!(latch.observe(Band::Normal), None);
    }

    #[test]
    fn test_low_band_never_transitions() {
        let mut latch = ActuatorLatch::new(Actuator::Act1);
        assert_eq!(latch.observe(Band::Low), None);
        assert_eq!(latch.state(), LatchState::Off);

        latch.observe(Band::High);
        assert_eq!(latch.observe(Band::Low), None);
        assert_eq!(latch.state(), LatchState::On);
    }

    #[test]
    fn test_sustained_band_emits_exactly_one_command() {
        let mut latch = ActuatorLatch::new(Actuator::Act1);

        let commands: usize = (0..10)
            .filter_map(|_| latch.observe(Band::High))
            .count();
        assert_eq!(commands, 1);

        let commands: usize = (0..10)
            .filter_map(|_| latch.observe(Band::Normal))
            .count();
        assert_eq!(commands, 1);
    }
}
