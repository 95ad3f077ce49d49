use crate::domain::command::ActuatorCommand;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        };
        f.write_str(label)
    }
}

/// One alert produced by an evaluation cycle. Ephemeral: consumed by the
/// presentation sink and never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertRecord {
    pub severity: Severity,
    pub subject: String,
    pub message: String,
}

impl AlertRecord {
    pub fn new(severity: Severity, subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            subject: subject.into(),
            message: message.into(),
        }
    }
}

/// Result of one evaluation cycle: the alert list, the latch-edge commands,
/// and the derived overall severity.
///
/// When no channel raised an alert the list holds a single synthetic
/// "all normal" Info record carrying the readings.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationOutcome {
    pub severity: Severity,
    pub alerts: Vec<AlertRecord>,
    pub commands: Vec<ActuatorCommand>,
}

impl EvaluationOutcome {
    pub fn is_all_normal(&self) -> bool {
        self.severity == Severity::Info
    }
}
