use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt, Stdout};
use tokio::sync::Mutex;

use super::{ChatTransport, TransportError};

/// Writes each reply to a sink, stdout by default.
pub struct ConsoleTransport<W = Stdout> {
    sink: Mutex<W>,
}

impl ConsoleTransport<Stdout> {
    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout())
    }
}

impl<W> ConsoleTransport<W>
where
    W: AsyncWrite + Unpin + Send + Sync,
{
    pub fn new(sink: W) -> Self {
        Self { sink: Mutex::new(sink) }
    }

    pub fn into_inner(self) -> W {
        self.sink.into_inner()
    }
}

#[async_trait]
impl<W> ChatTransport for ConsoleTransport<W>
where
    W: AsyncWrite + Unpin + Send + Sync,
{
    fn name(&self) -> &'static str {
        "console"
    }

    async fn send_message(&self, destination: &str, text: &str) -> Result<(), TransportError> {
        let mut sink = self.sink.lock().await;
        sink.write_all(format!("--> {}\n{}\n\n", destination, text).as_bytes()).await?;
        sink.flush().await?;
        Ok(())
    }
}
