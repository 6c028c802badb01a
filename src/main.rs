use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use order_chatbot::commands::{Collaborators, CommandPatterns, CommandRecognizer};
use order_chatbot::config::{BotConfig, TransportConfig};
use order_chatbot::conversation::{load_conversation, ChatBot};
use order_chatbot::domain::catalogue::Catalogue;
use order_chatbot::messaging::{ChatTransport, ConsoleTransport, RedpandaTransport};
use order_chatbot::metrics::{self, BotMetrics};
use order_chatbot::store::{InMemoryStore, PgStore};

const BUNDLED_CATALOGUE: &str = include_str!("../data/catalogue.json");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG overrides the default filter, e.g. RUST_LOG=debug
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,order_chatbot=debug")))
        .init();

    let config = Arc::new(BotConfig::from_env().context("invalid ORDERBOT__ configuration")?);
    tracing::info!(shop = %config.shop_name, catalogue_id = config.catalogue_id, "Starting order chatbot");

    // === 1. Price list ===
    let catalogue = match &config.catalogue_path {
        Some(path) => Catalogue::from_json_file(path).with_context(|| format!("failed to load catalogue {}", path))?,
        None => Catalogue::from_json(BUNDLED_CATALOGUE)?,
    };
    let catalogue = Arc::new(catalogue);
    tracing::info!(items = catalogue.items.len(), "Catalogue loaded");

    // === 2. Metrics ===
    let metrics = Arc::new(BotMetrics::new()?);
    if let Some(port) = config.metrics_port {
        let registry = Arc::new(metrics.registry().clone());
        std::thread::spawn(move || {
            let system = actix_web::rt::System::new();
            if let Err(e) = system.block_on(metrics::start_metrics_server(registry, port)) {
                tracing::error!(error = %e, "Metrics server error");
            }
        });
    }

    // === 3. Stores ===
    let services = match &config.database_url {
        Some(url) => {
            tracing::info!("Connecting to Postgres...");
            let store = Arc::new(PgStore::connect(url, catalogue.clone()).await?);
            store.ensure_schema().await?;
            Collaborators::for_store(store, catalogue.clone(), &config)?
        }
        None => {
            tracing::warn!("No database configured, state is kept in memory");
            Collaborators::for_store(Arc::new(InMemoryStore::new(catalogue.clone())), catalogue.clone(), &config)?
        }
    };

    // === 4. Outbound transport ===
    let transport: Arc<dyn ChatTransport> = match &config.transport {
        TransportConfig::Console => Arc::new(ConsoleTransport::stdout()),
        TransportConfig::Redpanda { brokers, topic } => {
            Arc::new(RedpandaTransport::new(brokers, topic, Some(metrics.clone()))?)
        }
    };
    tracing::info!(transport = transport.name(), "Transport ready");

    let recognizer = CommandRecognizer::new(CommandPatterns::new(), services.clone(), config.clone());
    let bot = ChatBot::new(recognizer, services, transport, config.clone(), metrics);

    // === 5. Inbound loop: one "<cell number> <message>" per line ===
    tracing::info!("Reading messages from stdin");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let Some((cell_number, body)) = line.trim().split_once(char::is_whitespace) else {
            if !line.trim().is_empty() {
                tracing::warn!(line = %line, "Expected '<cell number> <message>'");
            }
            continue;
        };

        let mut convo = match load_conversation(
            bot.services().users.as_ref(),
            bot.services().orders.as_ref(),
            cell_number,
            body.trim(),
            config.auto_increment_orders,
        )
        .await
        {
            Ok(convo) => convo,
            Err(e) => {
                tracing::error!(user = %cell_number, error = %e, "Failed to load conversation");
                continue;
            }
        };

        // Send failures are already logged and counted.
        let _ = bot.handle_message(&mut convo).await;
    }

    tracing::info!("Input closed, shutting down");
    Ok(())
}
