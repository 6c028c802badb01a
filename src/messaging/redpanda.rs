use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rdkafka::{
    config::ClientConfig,
    producer::{FutureProducer, FutureRecord},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::metrics::BotMetrics;
use crate::utils::{CircuitBreaker, CircuitBreakerConfig, CircuitBreakerError};

use super::{ChatTransport, TransportError};

/// Reply as published for the chat gateway to deliver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub message_id: Uuid,
    pub to: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl OutboundMessage {
    pub fn new(to: &str, text: &str) -> Self {
        Self {
            message_id: Uuid::now_v7(),
            to: to.to_string(),
            text: text.to_string(),
            created_at: Utc::now(),
        }
    }
}

/// Publishes replies to a Redpanda/Kafka topic, keyed by destination so a
/// user's replies stay ordered within one partition.
pub struct RedpandaTransport {
    producer: FutureProducer,
    topic: String,
    circuit_breaker: CircuitBreaker,
}

impl RedpandaTransport {
    pub fn new(brokers: &str, topic: &str, metrics: Option<Arc<BotMetrics>>) -> Result<Self, TransportError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", "5000")
            .create()
            .map_err(|e| TransportError::Unavailable(format!("failed to create Redpanda producer: {}", e)))?;

        let mut circuit_breaker = CircuitBreaker::new(
            "redpanda",
            CircuitBreakerConfig {
                failure_threshold: 5,
                cooldown: Duration::from_secs(30),
                success_threshold: 3,
            },
        );
        if let Some(metrics) = metrics {
            circuit_breaker = circuit_breaker.with_metrics(metrics);
        }

        tracing::info!(brokers = %brokers, topic = %topic, "Redpanda transport ready");

        Ok(Self {
            producer,
            topic: topic.to_string(),
            circuit_breaker,
        })
    }
}

#[async_trait]
impl ChatTransport for RedpandaTransport {
    fn name(&self) -> &'static str {
        "redpanda"
    }

    async fn send_message(&self, destination: &str, text: &str) -> Result<(), TransportError> {
        let message = OutboundMessage::new(destination, text);
        let payload = serde_json::to_string(&message)?;

        let result = self
            .circuit_breaker
            .call(async {
                let record = FutureRecord::to(&self.topic).key(destination).payload(&payload);

                self.producer
                    .send(record, rdkafka::util::Timeout::After(Duration::from_secs(5)))
                    .await
                    .map_err(|(e, _)| e)
            })
            .await;

        match result {
            Ok(_) => {
                tracing::info!(
                    topic = %self.topic,
                    to = %destination,
                    message_id = %message.message_id,
                    "Published reply"
                );
                Ok(())
            }
            Err(CircuitBreakerError::CircuitOpen) => {
                tracing::error!(topic = %self.topic, "Circuit breaker open - Redpanda unavailable");
                Err(TransportError::Unavailable("circuit breaker open for Redpanda".to_string()))
            }
            Err(CircuitBreakerError::OperationFailed(e)) => {
                tracing::error!(error = %e, topic = %self.topic, "Failed to publish reply");
                Err(TransportError::SendFailed(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outbound_message_serialization() {
        let message = OutboundMessage::new("27821234567", "Main Menu");
        let json = serde_json::to_string(&message).unwrap();
        let restored: OutboundMessage = serde_json::from_str(&json).unwrap();

        assert_eq!(message, restored);
        assert!(json.contains("\"to\":\"27821234567\""));
    }
}
