// Private module declaration
mod server;

use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry};

// Re-export for public API
pub use server::start_metrics_server;

// ============================================================================
// Metrics Module - Prometheus metrics for the message pipeline
// ============================================================================
//
// - Inbound messages (recognized vs. not understood, latency)
// - Commands recognized and their outcomes
// - Replies handed to the chat transport
// - Circuit breaker state of the outbound transport
//
// ============================================================================

pub struct BotMetrics {
    registry: Registry,

    pub messages_processed: IntCounterVec,
    pub message_duration: HistogramVec,

    pub commands_recognized: IntCounterVec,
    pub command_outcomes: IntCounterVec,

    pub replies_sent: IntCounterVec,

    pub circuit_breaker_state: IntGauge,
    pub circuit_breaker_transitions: IntCounterVec,
}

impl BotMetrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let messages_processed = IntCounterVec::new(
            Opts::new("chat_messages_processed_total", "Inbound messages processed"),
            &["outcome"],
        )?;
        registry.register(Box::new(messages_processed.clone()))?;

        let message_duration = HistogramVec::new(
            HistogramOpts::new("chat_message_duration_seconds", "Time from receipt to reply")
                .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
            &["outcome"],
        )?;
        registry.register(Box::new(message_duration.clone()))?;

        let commands_recognized = IntCounterVec::new(
            Opts::new("chat_commands_recognized_total", "Commands recognized in messages"),
            &["kind"],
        )?;
        registry.register(Box::new(commands_recognized.clone()))?;

        let command_outcomes = IntCounterVec::new(
            Opts::new("chat_command_outcomes_total", "Executed commands by outcome"),
            &["kind", "status"],
        )?;
        registry.register(Box::new(command_outcomes.clone()))?;

        let replies_sent = IntCounterVec::new(
            Opts::new("chat_replies_sent_total", "Replies handed to the chat transport"),
            &["transport", "result"],
        )?;
        registry.register(Box::new(replies_sent.clone()))?;

        let circuit_breaker_state = IntGauge::new(
            "transport_circuit_breaker_state",
            "Outbound transport circuit breaker state (0=Closed, 1=Open, 2=HalfOpen)",
        )?;
        registry.register(Box::new(circuit_breaker_state.clone()))?;

        let circuit_breaker_transitions = IntCounterVec::new(
            Opts::new(
                "transport_circuit_breaker_transitions_total",
                "Outbound transport circuit breaker state transitions",
            ),
            &["from_state", "to_state"],
        )?;
        registry.register(Box::new(circuit_breaker_transitions.clone()))?;

        Ok(Self {
            registry,
            messages_processed,
            message_duration,
            commands_recognized,
            command_outcomes,
            replies_sent,
            circuit_breaker_state,
            circuit_breaker_transitions,
        })
    }

    /// Get the Prometheus registry for exposing metrics via HTTP
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn record_message(&self, recognized: bool, duration_secs: f64) {
        let outcome = if recognized { "recognized" } else { "not_understood" };
        self.messages_processed.with_label_values(&[outcome]).inc();
        self.message_duration.with_label_values(&[outcome]).observe(duration_secs);
    }

    pub fn record_command(&self, kind: &str, status: &str) {
        self.commands_recognized.with_label_values(&[kind]).inc();
        self.command_outcomes.with_label_values(&[kind, status]).inc();
    }

    pub fn record_reply(&self, transport: &str, success: bool) {
        let result = if success { "sent" } else { "failed" };
        self.replies_sent.with_label_values(&[transport, result]).inc();
    }

    pub fn update_circuit_breaker_state(&self, state: u8) {
        self.circuit_breaker_state.set(state as i64);
    }

    pub fn record_circuit_breaker_transition(&self, from_state: &str, to_state: &str) {
        self.circuit_breaker_transitions
            .with_label_values(&[from_state, to_state])
            .inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = BotMetrics::new().unwrap();
        metrics.record_message(true, 0.01);
        assert!(!metrics.registry.gather().is_empty());
    }

    #[test]
    fn test_record_command_outcomes() {
        let metrics = BotMetrics::new().unwrap();
        metrics.record_command("update_user_info", "ok");
        metrics.record_command("update_user_info", "failed");
        metrics.record_command("question", "ok");

        let gathered = metrics.registry.gather();
        let recognized = gathered
            .iter()
            .find(|m| m.name() == "chat_commands_recognized_total")
            .unwrap();
        assert_eq!(recognized.metric.len(), 2); // two kinds

        let outcomes = gathered
            .iter()
            .find(|m| m.name() == "chat_command_outcomes_total")
            .unwrap();
        assert_eq!(outcomes.metric.len(), 3);
    }

    #[test]
    fn test_record_reply() {
        let metrics = BotMetrics::new().unwrap();
        metrics.record_reply("console", true);
        metrics.record_reply("console", true);

        let gathered = metrics.registry.gather();
        let sent = gathered.iter().find(|m| m.name() == "chat_replies_sent_total").unwrap();
        assert_eq!(sent.metric[0].counter.value, Some(2.0));
    }

    #[test]
    fn test_circuit_breaker_metrics() {
        let metrics = BotMetrics::new().unwrap();
        metrics.record_circuit_breaker_transition("Closed", "Open");
        metrics.update_circuit_breaker_state(1);

        let gathered = metrics.registry.gather();
        let state = gathered
            .iter()
            .find(|m| m.name() == "transport_circuit_breaker_state")
            .unwrap();
        assert_eq!(state.metric[0].gauge.value, Some(1.0));
    }
}
