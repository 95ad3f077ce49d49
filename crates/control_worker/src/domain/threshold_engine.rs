use crate::domain::latch::{ActuatorLatch, Band, LatchState};
use common::domain::{
    Actuator, AlertRecord, EvaluationOutcome, Severity, TelemetrySample, ThresholdPolicy,
};

/// Per-channel alerting profile.
struct ChannelSpec {
    subject: &'static str,
    unit: &'static str,
    high_severity: Severity,
    low_severity: Severity,
}

const TEMPERATURE: ChannelSpec = ChannelSpec {
    subject: "temperature",
    unit: "°C",
    high_severity: Severity::Critical,
    low_severity: Severity::Warning,
};

const HUMIDITY: ChannelSpec = ChannelSpec {
    subject: "humidity",
    unit: "%",
    high_severity: Severity::Warning,
    low_severity: Severity::Info,
};

const FLOW: ChannelSpec = ChannelSpec {
    subject: "flow",
    unit: " L/h",
    high_severity: Severity::Critical,
    low_severity: Severity::Warning,
};

/// High wins over low by construction: bounds are checked in that order, so
/// the bands stay mutually exclusive even for a degenerate max == min policy.
fn classify(value: f64, max: f64, min: f64) -> Band {
    if value > max {
        Band::High
    } else if value < min {
        Band::Low
    } else {
        Band::Normal
    }
}

fn channel_alert(channel: &ChannelSpec, band: Band, value: f64, max: f64, min: f64) -> Option<AlertRecord> {
    match band {
        Band::High => Some(AlertRecord::new(
            channel.high_severity,
            channel.subject,
            format!(
                "{} {:.1}{} above maximum {:.1}{}",
                channel.subject, value, channel.unit, max, channel.unit
            ),
        )),
        Band::Low => Some(AlertRecord::new(
            channel.low_severity,
            channel.subject,
            format!(
                "{} {:.1}{} below minimum {:.1}{}",
                channel.subject, value, channel.unit, min, channel.unit
            ),
        )),
        Band::Normal => None,
    }
}

/// Threshold evaluation engine driving the two actuator latches.
///
/// One evaluation per inbound sample, synchronously, in arrival order. The
/// policy is passed in fresh each time; the only state carried between
/// evaluations is the two latches, so a command is emitted only on a band
/// crossing, never on every cycle the condition persists.
pub struct ThresholdEngine {
    temperature_latch: ActuatorLatch,
    flow_latch: ActuatorLatch,
}

impl ThresholdEngine {
    pub fn new() -> Self {
        Self {
            temperature_latch: ActuatorLatch::new(Actuator::Act1),
            flow_latch: ActuatorLatch::new(Actuator::Act2),
        }
    }

    /// Current latch states as (Act1, Act2), for status reporting.
    pub fn latch_states(&self) -> (LatchState, LatchState) {
        (self.temperature_latch.state(), self.flow_latch.state())
    }

    pub fn evaluate(
        &mut self,
        sample: &TelemetrySample,
        policy: &ThresholdPolicy,
    ) -> EvaluationOutcome {
        let mut alerts = Vec::new();
        let mut commands = Vec::new();

        let temp_band = classify(sample.temp, policy.temp_max, policy.temp_min);
        if let Some(alert) =
            channel_alert(&TEMPERATURE, temp_band, sample.temp, policy.temp_max, policy.temp_min)
        {
            alerts.push(alert);
        }
        if let Some(command) = self.temperature_latch.observe(temp_band) {
            commands.push(command);
        }

        // Humidity alerts but never actuates.
        let humidity_band = classify(sample.humidity, policy.humidity_max, policy.humidity_min);
        if let Some(alert) = channel_alert(
            &HUMIDITY,
            humidity_band,
            sample.humidity,
            policy.humidity_max,
            policy.humidity_min,
        ) {
            alerts.push(alert);
        }

        let flow_band = classify(sample.flow, policy.flow_max, policy.flow_min);
        if let Some(alert) =
            channel_alert(&FLOW, flow_band, sample.flow, policy.flow_max, policy.flow_min)
        {
            alerts.push(alert);
        }
        if let Some(command) = self.flow_latch.observe(flow_band) {
            commands.push(command);
        }

        if alerts.is_empty() {
            let message = format!(
                "all readings normal: temp {:.1}°C, humidity {:.1}%, flow {:.1} L/h",
                sample.temp, sample.humidity, sample.flow
            );
            return EvaluationOutcome {
                severity: Severity::Info,
                alerts: vec![AlertRecord::new(Severity::Info, "system", message)],
                commands,
            };
        }

        let severity = if alerts.iter().any(|a| a.severity == Severity::Critical) {
            Severity::Critical
        } else {
            Severity::Warning
        };

        EvaluationOutcome {
            severity,
            alerts,
            commands,
        }
    }
}

impl Default for ThresholdEngine {
    fn default() -> Self {
        Self::new()
    }
}
