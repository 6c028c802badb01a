// ============================================================================
// Chat Transport
// ============================================================================
//
// One interface, several providers, picked once at start-up:
// - ConsoleTransport:  replies printed to stdout
// - RedpandaTransport: replies published to a Kafka topic for a gateway
//
// ============================================================================

mod console;
mod redpanda;

pub use console::ConsoleTransport;
pub use redpanda::{OutboundMessage, RedpandaTransport};

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("transport unavailable: {0}")]
    Unavailable(String),

    #[error("send failed: {0}")]
    SendFailed(String),

    #[error("failed to encode outbound message: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Short provider name for logs and metrics.
    fn name(&self) -> &'static str;

    async fn send_message(&self, destination: &str, text: &str) -> Result<(), TransportError>;
}
