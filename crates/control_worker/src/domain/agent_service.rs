use crate::domain::threshold_engine::ThresholdEngine;
use async_trait::async_trait;
use common::domain::{
    CommandPublisher, ConnectionStatus, PresentationSink, SharedPolicy, TelemetryHandler,
    TelemetrySample,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

/// Domain service that runs the closed control loop.
///
/// Owns the engine (and with it the two latches), reads the policy fresh on
/// every sample, publishes latch-edge commands best-effort, and feeds the
/// presentation sink. Constructed once and shared with the transport, so
/// latch state survives transport session restarts.
///
/// No failure here is fatal: a malformed message, a publish error, or a sink
/// hiccup all leave the loop available for the next message.
pub struct AgentService {
    engine: Mutex<ThresholdEngine>,
    policy: SharedPolicy,
    publisher: Arc<dyn CommandPublisher>,
    presenter: Arc<dyn PresentationSink>,
    enabled: AtomicBool,
}

impl AgentService {
    pub fn new(
        policy: SharedPolicy,
        publisher: Arc<dyn CommandPublisher>,
        presenter: Arc<dyn PresentationSink>,
        enabled: bool,
    ) -> Self {
        Self {
            engine: Mutex::new(ThresholdEngine::new()),
            policy,
            publisher,
            presenter,
            enabled: AtomicBool::new(enabled),
        }
    }

    /// Enable or disable the control loop. Display updates continue either way.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
        info!(enabled, "control agent toggled");
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TelemetryHandler for AgentService {
    #[instrument(skip_all, fields(payload_size = payload.len()))]
    async fn handle_message(&self, payload: &[u8]) {
        let sample = match TelemetrySample::decode(payload) {
            Ok(sample) => sample,
            Err(e) => {
                warn!(error = %e, "discarding malformed telemetry message");
                self.presenter.decode_rejected(&e.to_string()).await;
                return;
            }
        };

        // Display always sees the sample, even with the agent paused.
        self.presenter.sample_received(&sample).await;

        if !self.is_enabled() {
            debug!("control agent disabled, skipping evaluation");
            return;
        }

        let policy = self.policy.get();
        let outcome = {
            let mut engine = self.engine.lock().await;
            engine.evaluate(&sample, &policy)
        };

        for command in &outcome.commands {
            // The latch already reflects the intended physical state; a
            // failed send is the transport's to retry, not a reason to
            // roll back or re-evaluate.
            if let Err(e) = self.publisher.publish_command(*command).await {
                warn!(error = %e, command = %command, "command publish failed");
            }
        }

        self.presenter.evaluation_completed(&sample, &outcome).await;
    }

    async fn connection_changed(&self, status: ConnectionStatus) {
        self.presenter.connection_changed(status).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::domain::{
        Actuator, ActuatorCommand, DomainError, MockCommandPublisher, MockPresentationSink,
        Severity, SwitchState, ThresholdPolicy,
    };
    use mockall::Sequence;

    fn test_policy() -> SharedPolicy {
        SharedPolicy::new(ThresholdPolicy {
            temp_max: 30.0,
            temp_min: 10.0,
            humidity_max: 70.0,
            humidity_min: 20.0,
            flow_max: 50.0,
            flow_min: 5.0,
        })
        .expect("valid policy")
    }

    fn quiet_presenter() -> MockPresentationSink {
        let mut presenter = MockPresentationSink::new();
        presenter.expect_sample_received().returning(|_| ());
        presenter.expect_evaluation_completed().returning(|_, _| ());
        presenter.expect_decode_rejected().returning(|_| ());
        presenter.expect_connection_changed().returning(|_| ());
        presenter
    }

    #[tokio::test]
    async fn test_high_temp_then_normal_publishes_on_then_off() {
        let mut publisher = MockCommandPublisher::new();
        let mut seq = Sequence::new();
        publisher
            .expect_publish_command()
            .withf(|c: &ActuatorCommand| c.wire_format() == "ACT1:ON")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        publisher
            .expect_publish_command()
            .withf(|c: &ActuatorCommand| c.wire_format() == "ACT1:OFF")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let service = AgentService::new(
            test_policy(),
            Arc::new(publisher),
            Arc::new(quiet_presenter()),
            true,
        );

        service
            .handle_message(br#"{"temp":32.0,"humidity":40.0,"flow":10.0}"#)
            .await;
        service
            .handle_message(br#"{"temp":28.0,"humidity":40.0,"flow":10.0}"#)
            .await;
    }

    #[tokio::test]
    async fn test_decode_failure_leaves_latch_state_untouched() {
        let mut publisher = MockCommandPublisher::new();
        // Exactly one command: the rising edge from message k+1. The bad
        // message k must neither command nor block the next evaluation.
        publisher
            .expect_publish_command()
            .withf(|c: &ActuatorCommand| c.wire_format() == "ACT1:ON")
            .times(1)
            .returning(|_| Ok(()));

        let mut presenter = quiet_presenter();
        presenter.checkpoint();
        presenter.expect_sample_received().returning(|_| ());
        presenter.expect_evaluation_completed().returning(|_, _| ());
        presenter.expect_decode_rejected().times(1).returning(|_| ());

        let service =
            AgentService::new(test_policy(), Arc::new(publisher), Arc::new(presenter), true);

        service.handle_message(b"{not json").await;
        service
            .handle_message(br#"{"temp":32.0,"humidity":40.0,"flow":10.0}"#)
            .await;
    }

    #[tokio::test]
    async fn test_disabled_agent_skips_evaluation_but_displays() {
        let mut publisher = MockCommandPublisher::new();
        publisher.expect_publish_command().times(0);

        let mut presenter = MockPresentationSink::new();
        presenter.expect_sample_received().times(1).returning(|_| ());
        presenter.expect_evaluation_completed().times(0);

        let service =
            AgentService::new(test_policy(), Arc::new(publisher), Arc::new(presenter), false);

        assert!(!service.is_enabled());
        service
            .handle_message(br#"{"temp":32.0,"humidity":40.0,"flow":10.0}"#)
            .await;
    }

    #[tokio::test]
    async fn test_publish_failure_does_not_roll_back_latch() {
        let mut publisher = MockCommandPublisher::new();
        // The first send fails; the latch stays On, so the identical second
        // sample produces no further publish attempt.
        publisher
            .expect_publish_command()
            .times(1)
            .returning(|_| Err(DomainError::TransportError(anyhow::anyhow!("send failed"))));

        let service = AgentService::new(
            test_policy(),
            Arc::new(publisher),
            Arc::new(quiet_presenter()),
            true,
        );

        service
            .handle_message(br#"{"temp":32.0,"humidity":40.0,"flow":10.0}"#)
            .await;
        service
            .handle_message(br#"{"temp":32.0,"humidity":40.0,"flow":10.0}"#)
            .await;
    }

    #[tokio::test]
    async fn test_humidity_extremes_never_publish() {
        let mut publisher = MockCommandPublisher::new();
        publisher.expect_publish_command().times(0);

        let mut presenter = quiet_presenter();
        presenter.checkpoint();
        presenter.expect_sample_received().returning(|_| ());
        presenter
            .expect_evaluation_completed()
            .withf(|_, outcome| {
                outcome.severity == Severity::Warning && outcome.commands.is_empty()
            })
            .times(1)
            .returning(|_, _| ());

        let service =
            AgentService::new(test_policy(), Arc::new(publisher), Arc::new(presenter), true);

        service
            .handle_message(br#"{"temp":25.0,"humidity":95.0,"flow":10.0}"#)
            .await;
    }

    #[tokio::test]
    async fn test_enable_toggle_resumes_evaluation() {
        let mut publisher = MockCommandPublisher::new();
        publisher
            .expect_publish_command()
            .withf(|c: &ActuatorCommand| {
                c.actuator == Actuator::Act1 && c.state == SwitchState::On
            })
            .times(1)
            .returning(|_| Ok(()));

        let service = AgentService::new(
            test_policy(),
            Arc::new(publisher),
            Arc::new(quiet_presenter()),
            false,
        );

        service
            .handle_message(br#"{"temp":32.0,"humidity":40.0,"flow":10.0}"#)
            .await;

        service.set_enabled(true);
        service
            .handle_message(br#"{"temp":32.0,"humidity":40.0,"flow":10.0}"#)
            .await;
    }

    #[tokio::test]
    async fn test_connection_changed_reaches_presenter() {
        let publisher = MockCommandPublisher::new();

        let mut presenter = MockPresentationSink::new();
        presenter
            .expect_connection_changed()
            .withf(|status| *status == ConnectionStatus::Connected)
            .times(1)
            .returning(|_| ());

        let service =
            AgentService::new(test_policy(), Arc::new(publisher), Arc::new(presenter), true);

        service.connection_changed(ConnectionStatus::Connected).await;
    }
}
