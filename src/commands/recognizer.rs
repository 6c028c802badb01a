use std::sync::Arc;

use regex::Regex;

use crate::config::BotConfig;
use crate::conversation::ConversationContext;

use super::command::Command;
use super::question::Question;
use super::Collaborators;

// ============================================================================
// Command Recognizer
// ============================================================================
//
// Three pattern families are scanned over the whole message, in this order:
//   1. questions        menu?  fr.prlist?  userinfo?  currentorder?  checkoutnow?
//   2. field updates    update <email|nickname|social|consent>: <value>
//   3. order updates    update order[:] <payload>
//
// Matching is case-insensitive. Field values keep the sender's casing.
// ============================================================================

/// A directive found in a message, before any store is consulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Question(Question),
    UpdateField { name: String, value: String },
    UpdateOrder { name: String, payload: String },
}

/// Compiled once, shared read-only.
#[derive(Debug, Clone)]
pub struct CommandPatterns {
    question: Regex,
    update_field: Regex,
    update_order: Regex,
}

impl Default for CommandPatterns {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandPatterns {
    pub fn new() -> Self {
        Self {
            question: Regex::new(r"(?i)(menu\?|fr\.prlist\?|userinfo\?|currentorder\?|checkoutnow\?)")
                .expect("question pattern is valid"),
            update_field: Regex::new(r"(?i)(update (?:email|nickname|social|consent)):\s*(\S*)")
                .expect("field update pattern is valid"),
            update_order: Regex::new(r"(?i)(update order):?\s*(.*)")
                .expect("order update pattern is valid"),
        }
    }

    pub fn scan(&self, message: &str) -> Vec<Directive> {
        let questions = self
            .question
            .captures_iter(message)
            .map(|caps| Directive::Question(Question::from_keyword(&caps[1])));

        let fields = self.update_field.captures_iter(message).map(|caps| Directive::UpdateField {
            name: caps[1].to_lowercase(),
            value: caps[2].to_string(),
        });

        let orders = self.update_order.captures_iter(message).map(|caps| Directive::UpdateOrder {
            name: caps[1].to_lowercase(),
            payload: caps[2].to_lowercase(),
        });

        questions.chain(fields).chain(orders).collect()
    }
}

pub struct CommandRecognizer {
    patterns: CommandPatterns,
    services: Collaborators,
    config: Arc<BotConfig>,
}

impl CommandRecognizer {
    pub fn new(patterns: CommandPatterns, services: Collaborators, config: Arc<BotConfig>) -> Self {
        Self {
            patterns,
            services,
            config,
        }
    }

    /// Materialize every directive in `message` as a command. Questions are
    /// answered here; updates are deferred to execution. An empty list means
    /// nothing was understood.
    pub async fn recognize(&self, message: &str, convo: &ConversationContext) -> Vec<Command> {
        let mut commands = Vec::new();

        for directive in self.patterns.scan(message) {
            let command = match directive {
                Directive::Question(question) => {
                    let text = question.resolve(&self.services, &self.config, convo).await;
                    Command::question(question.name(), text)
                }
                Directive::UpdateField { name, value } => Command::update_user_info(name, value),
                Directive::UpdateOrder { name, payload } => Command::update_order(name, payload),
            };
            commands.push(command);
        }

        tracing::debug!(
            user = %convo.user_info.cell_number,
            count = commands.len(),
            "Recognized commands"
        );

        commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::CommandKind;
    use crate::conversation::texts;
    use crate::domain::catalogue::tests::sample_catalogue;
    use crate::domain::customer::UserInfo;
    use crate::domain::order::CustomerOrder;
    use crate::store::{InMemoryStore, OrderStore};

    fn field(name: &str, value: &str) -> Directive {
        Directive::UpdateField {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_question_is_case_insensitive() {
        let directives = CommandPatterns::new().scan("MENU? please");
        assert_eq!(directives, vec![Directive::Question(Question::Menu)]);
    }

    #[test]
    fn test_field_updates_keep_order_and_casing() {
        let directives = CommandPatterns::new().scan("update email: a@b.com and update nickname: Bob");
        assert_eq!(
            directives,
            vec![field("update email", "a@b.com"), field("update nickname", "Bob")]
        );
    }

    #[test]
    fn test_families_are_emitted_questions_fields_orders() {
        let directives = CommandPatterns::new()
            .scan("update order: 9:12\nupdate social: @bob\nuserinfo? currentorder?");

        assert_eq!(
            directives,
            vec![
                Directive::Question(Question::UserInfo),
                Directive::Question(Question::CurrentOrder),
                field("update social", "@bob"),
                Directive::UpdateOrder {
                    name: "update order".to_string(),
                    payload: "9:12".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_order_payload_runs_to_end_of_line() {
        let directives = CommandPatterns::new().scan("Update Order 9:12, 10: 1X3\nthanks");
        assert_eq!(
            directives,
            vec![Directive::UpdateOrder {
                name: "update order".to_string(),
                payload: "9:12, 10: 1x3".to_string(),
            }]
        );
    }

    #[test]
    fn test_nothing_recognized() {
        assert!(CommandPatterns::new().scan("hello, what do you sell").is_empty());
        assert!(CommandPatterns::new().scan("menu without question mark").is_empty());
    }

    fn recognizer(store: Arc<InMemoryStore>) -> CommandRecognizer {
        let services = Collaborators::for_store(store, Arc::new(sample_catalogue()), &BotConfig::default()).unwrap();
        CommandRecognizer::new(CommandPatterns::new(), services, Arc::new(BotConfig::default()))
    }

    fn convo(message: &str) -> ConversationContext {
        ConversationContext {
            message_body: message.to_string(),
            user_info: UserInfo::new("27821234567"),
            current_order: CustomerOrder::default(),
            user_existed: true,
        }
    }

    #[tokio::test]
    async fn test_recognize_resolves_menu_question() {
        let store = Arc::new(InMemoryStore::new(Arc::new(sample_catalogue())));
        let commands = recognizer(store).recognize("MENU? please", &convo("MENU? please")).await;

        assert_eq!(commands, vec![Command::question("menu", texts::main_menu())]);
    }

    #[tokio::test]
    async fn test_recognize_resolves_current_order_at_recognition_time() {
        let store = Arc::new(InMemoryStore::new(Arc::new(sample_catalogue())));
        store
            .upsert_order(
                "27821234567",
                1,
                &crate::domain::order::OrderItems::new(vec![crate::domain::order::MenuIndication::new(9, "3")]),
                true,
            )
            .await
            .unwrap();

        let commands = recognizer(store).recognize("currentorder?", &convo("currentorder?")).await;
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].kind(), CommandKind::Question);
        assert!(commands[0].data().text.contains("9: Peanut butter breath - 3 gram"));
    }

    #[tokio::test]
    async fn test_recognize_price_list_includes_preamble() {
        let store = Arc::new(InMemoryStore::new(Arc::new(sample_catalogue())));
        let commands = recognizer(store).recognize("fr.prlist?", &convo("fr.prlist?")).await;

        let text = &commands[0].data().text;
        assert!(text.starts_with("Welcome to Flying Rasta,"));
        assert!(text.contains("10. Cannisters"));
    }

    #[tokio::test]
    async fn test_recognize_updates_are_deferred() {
        let store = Arc::new(InMemoryStore::new(Arc::new(sample_catalogue())));
        let message = "update email: a@b.com and update nickname: Bob";
        let commands = recognizer(store.clone()).recognize(message, &convo(message)).await;

        assert_eq!(
            commands,
            vec![
                Command::update_user_info("update email", "a@b.com"),
                Command::update_user_info("update nickname", "Bob"),
            ]
        );
        assert!(store.current_order("27821234567", true).await.unwrap().is_none());
    }
}
