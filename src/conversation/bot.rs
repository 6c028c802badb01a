use std::sync::Arc;
use std::time::Instant;

use crate::commands::{process_commands, Collaborators, CommandRecognizer, ExecutionContext};
use crate::config::BotConfig;
use crate::messaging::{ChatTransport, TransportError};
use crate::metrics::BotMetrics;

use super::composer::compose_reply;
use super::context::ConversationContext;

// ============================================================================
// ChatBot - one inbound message, one reply
// ============================================================================
//
// recognize -> execute (in order, never short-circuits) -> compose -> send
//
// ============================================================================

pub struct ChatBot {
    recognizer: CommandRecognizer,
    services: Collaborators,
    transport: Arc<dyn ChatTransport>,
    config: Arc<BotConfig>,
    metrics: Arc<BotMetrics>,
}

impl ChatBot {
    pub fn new(
        recognizer: CommandRecognizer,
        services: Collaborators,
        transport: Arc<dyn ChatTransport>,
        config: Arc<BotConfig>,
        metrics: Arc<BotMetrics>,
    ) -> Self {
        Self {
            recognizer,
            services,
            transport,
            config,
            metrics,
        }
    }

    pub fn services(&self) -> &Collaborators {
        &self.services
    }

    /// Build the reply for `convo` without sending it. Marks the user as
    /// existing.
    pub async fn reply_to(&self, convo: &mut ConversationContext) -> String {
        let started = Instant::now();
        let user = convo.user_info.clone();

        tracing::debug!(user = %user.cell_number, body = %convo.message_body, "Message received");

        let commands = self.recognizer.recognize(&convo.message_body, convo).await;
        let recognized = !commands.is_empty();

        let block = if recognized {
            tracing::info!(user = %user.cell_number, commands = commands.len(), "Executing commands");

            let ctx = ExecutionContext {
                users: self.services.users.as_ref(),
                orders: self.services.orders.as_ref(),
                user: &user,
                catalogue_id: self.config.catalogue_id,
                auto_increment: self.config.auto_increment_orders,
            };
            let report = process_commands(&commands, &ctx).await;

            for (kind, outcome) in &report.outcomes {
                self.metrics.record_command(kind.as_str(), outcome.status.as_str());
            }
            report.joined()
        } else {
            tracing::info!(user = %user.cell_number, "No command recognized");
            String::new()
        };

        let reply = compose_reply(convo, &block, recognized);
        self.metrics.record_message(recognized, started.elapsed().as_secs_f64());
        reply
    }

    /// Run the full pipeline and send exactly one reply to the sender.
    pub async fn handle_message(&self, convo: &mut ConversationContext) -> Result<String, TransportError> {
        let reply = self.reply_to(convo).await;
        let destination = convo.user_info.cell_number.clone();

        match self.transport.send_message(&destination, &reply).await {
            Ok(()) => {
                self.metrics.record_reply(self.transport.name(), true);
                tracing::info!(user = %destination, transport = self.transport.name(), "Reply sent");
                Ok(reply)
            }
            Err(e) => {
                self.metrics.record_reply(self.transport.name(), false);
                tracing::error!(user = %destination, error = %e, "Failed to send reply");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use super::*;
    use crate::commands::CommandPatterns;
    use crate::conversation::{load_conversation, texts};
    use crate::domain::catalogue::tests::sample_catalogue;
    use crate::domain::customer::UserInfo;
    use crate::store::{InMemoryStore, OrderStore, UserStore};

    #[derive(Default)]
    struct RecordingTransport {
        sent: Mutex<Vec<(String, String)>>,
        fail: bool,
    }

    #[async_trait]
    impl ChatTransport for RecordingTransport {
        fn name(&self) -> &'static str {
            "recording"
        }

        async fn send_message(&self, destination: &str, text: &str) -> Result<(), TransportError> {
            if self.fail {
                return Err(TransportError::SendFailed("network down".to_string()));
            }
            self.sent.lock().await.push((destination.to_string(), text.to_string()));
            Ok(())
        }
    }

    struct Harness {
        bot: ChatBot,
        store: Arc<InMemoryStore>,
        transport: Arc<RecordingTransport>,
        metrics: Arc<BotMetrics>,
    }

    fn harness(fail: bool) -> Harness {
        let catalogue = Arc::new(sample_catalogue());
        let store = Arc::new(InMemoryStore::new(catalogue.clone()));
        let config = Arc::new(BotConfig::default());
        let services = Collaborators::for_store(store.clone(), catalogue, &config).unwrap();
        let transport = Arc::new(RecordingTransport {
            fail,
            ..Default::default()
        });
        let metrics = Arc::new(BotMetrics::new().unwrap());

        let recognizer = CommandRecognizer::new(CommandPatterns::new(), services.clone(), config.clone());
        let bot = ChatBot::new(recognizer, services, transport.clone(), config, metrics.clone());

        Harness {
            bot,
            store,
            transport,
            metrics,
        }
    }

    async fn convo(h: &Harness, cell: &str, body: &str) -> ConversationContext {
        load_conversation(h.store.as_ref(), h.store.as_ref(), cell, body, true)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_first_message_gets_cold_greeting() {
        let h = harness(false);
        let mut c = convo(&h, "1", "hello").await;

        let reply = h.bot.handle_message(&mut c).await.unwrap();

        assert!(reply.starts_with(texts::COLD_GREETING));
        assert!(c.user_existed);
        let sent = h.transport.sent.lock().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0], ("1".to_string(), reply.clone()));
    }

    #[tokio::test]
    async fn test_returning_user_field_and_question_in_one_message() {
        let h = harness(false);
        h.store.register_user("1").await.unwrap();
        let mut c = convo(&h, "1", "update email: A@B.com userinfo?").await;
        assert!(c.user_existed);

        let reply = h.bot.handle_message(&mut c).await.unwrap();
        let lines: Vec<&str> = reply.lines().collect();

        // The question was answered before the update ran.
        assert_eq!(lines[0], "Your user info:");
        assert!(reply.contains("email: not set"));
        assert!(reply.ends_with("successfully updated user info.email to A@B.com"));

        let user = h.store.find_user("1").await.unwrap().unwrap();
        assert_eq!(user.email.as_deref(), Some("A@B.com"));
    }

    #[tokio::test]
    async fn test_new_user_with_command_gets_smarty_pants_wrapping() {
        let h = harness(false);
        let mut c = convo(&h, "1", "update order 9:12, 10: 1x3, 3x2, 2x1, 6:5").await;

        let reply = h.bot.handle_message(&mut c).await.unwrap();

        assert!(reply.starts_with(texts::SMARTY_PANTS_GREETING));
        assert!(reply.contains("successfully updated current order"));
        assert!(reply.ends_with(texts::SAY_MENU));

        let order = h.store.current_order("1", true).await.unwrap().unwrap();
        assert_eq!(order.order_items.len(), 3);
    }

    #[tokio::test]
    async fn test_returning_user_unknown_text() {
        let h = harness(false);
        h.store.register_user("1").await.unwrap();
        let mut c = convo(&h, "1", "what's up").await;

        let reply = h.bot.handle_message(&mut c).await.unwrap();
        assert_eq!(reply, format!("{}\n\n{}", texts::NO_COMMAND, texts::SAY_MENU));
    }

    #[tokio::test]
    async fn test_checkout_after_order() {
        let h = harness(false);
        h.store.register_user("1").await.unwrap();

        let mut first = convo(&h, "1", "update order: 9:2").await;
        h.bot.handle_message(&mut first).await.unwrap();

        let mut second = convo(&h, "1", "checkoutnow?").await;
        let reply = h.bot.handle_message(&mut second).await.unwrap();

        assert!(reply.starts_with("Order 1 summary:"));
        assert!(reply.contains("amount=240.00"));
    }

    #[tokio::test]
    async fn test_checkout_of_oversized_order_answers_with_error() {
        let h = harness(false);
        h.store.register_user("1").await.unwrap();
        let huge = u64::MAX;

        let mut first = convo(&h, "1", &format!("update order 9:{huge}, 6:{huge}")).await;
        h.bot.handle_message(&mut first).await.unwrap();

        let mut second = convo(&h, "1", "checkoutnow?").await;
        let reply = h.bot.handle_message(&mut second).await.unwrap();

        assert!(reply.starts_with("invalid amount for item 9"));
        assert_eq!(h.transport.sent.lock().await.len(), 2);
    }

    #[tokio::test]
    async fn test_services_share_the_store() {
        let h = harness(false);
        h.bot.services().users.register_user("1").await.unwrap();
        assert!(h.store.find_user("1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_transport_failure_is_returned() {
        let h = harness(true);
        let mut c = ConversationContext::new("menu?", UserInfo::new("1"), true);

        let err = h.bot.handle_message(&mut c).await.unwrap_err();
        assert!(matches!(err, TransportError::SendFailed(_)));
        assert!(c.user_existed);

        let gathered = h.metrics.registry().gather();
        let replies = gathered.iter().find(|m| m.name() == "chat_replies_sent_total").unwrap();
        assert_eq!(replies.metric[0].counter.value, Some(1.0));
    }
}
