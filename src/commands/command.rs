use std::fmt;

use crate::domain::customer::{ProfileField, UserInfo};
use crate::domain::order::{parse_update_order, OrderItems};
use crate::store::{OrderStore, UserStore};

// ============================================================================
// Commands - one recognized directive each
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandData {
    /// Directive identifier, e.g. `update email` or `menu`.
    pub name: String,
    /// Argument payload (or precomputed reply text for questions).
    pub text: String,
}

impl CommandData {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionCommand {
    pub data: CommandData,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateUserInfoCommand {
    pub data: CommandData,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOrderCommand {
    pub data: CommandData,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Question(QuestionCommand),
    UpdateUserInfo(UpdateUserInfoCommand),
    UpdateOrder(UpdateOrderCommand),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Question,
    UpdateUserInfo,
    UpdateOrder,
}

impl CommandKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandKind::Question => "question",
            CommandKind::UpdateUserInfo => "update_user_info",
            CommandKind::UpdateOrder => "update_order",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    Ok,
    Failed,
}

impl OutcomeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeStatus::Ok => "ok",
            OutcomeStatus::Failed => "failed",
        }
    }
}

/// What executing one command produced. Every outcome carries display text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub status: OutcomeStatus,
    pub message: String,
}

impl CommandOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: OutcomeStatus::Ok,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: OutcomeStatus::Failed,
            message: message.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == OutcomeStatus::Ok
    }
}

/// Everything a command may touch while executing.
pub struct ExecutionContext<'a> {
    pub users: &'a dyn UserStore,
    pub orders: &'a dyn OrderStore,
    pub user: &'a UserInfo,
    pub catalogue_id: i64,
    pub auto_increment: bool,
}

impl Command {
    pub fn question(name: impl Into<String>, text: impl Into<String>) -> Self {
        Command::Question(QuestionCommand {
            data: CommandData::new(name, text),
        })
    }

    pub fn update_user_info(name: impl Into<String>, value: impl Into<String>) -> Self {
        Command::UpdateUserInfo(UpdateUserInfoCommand {
            data: CommandData::new(name, value),
        })
    }

    pub fn update_order(name: impl Into<String>, payload: impl Into<String>) -> Self {
        Command::UpdateOrder(UpdateOrderCommand {
            data: CommandData::new(name, payload),
        })
    }

    pub fn data(&self) -> &CommandData {
        match self {
            Command::Question(cmd) => &cmd.data,
            Command::UpdateUserInfo(cmd) => &cmd.data,
            Command::UpdateOrder(cmd) => &cmd.data,
        }
    }

    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Question(_) => CommandKind::Question,
            Command::UpdateUserInfo(_) => CommandKind::UpdateUserInfo,
            Command::UpdateOrder(_) => CommandKind::UpdateOrder,
        }
    }

    pub async fn execute(&self, ctx: &ExecutionContext<'_>) -> CommandOutcome {
        match self {
            Command::Question(cmd) => cmd.execute(),
            Command::UpdateUserInfo(cmd) => cmd.execute(ctx).await,
            Command::UpdateOrder(cmd) => cmd.execute(ctx).await,
        }
    }
}

impl QuestionCommand {
    /// The reply was computed at recognition time; nothing left to do.
    pub fn execute(&self) -> CommandOutcome {
        CommandOutcome::ok(self.data.text.clone())
    }
}

impl UpdateUserInfoCommand {
    pub async fn execute(&self, ctx: &ExecutionContext<'_>) -> CommandOutcome {
        let column = self.data.name.trim();
        let column = column.strip_prefix("update").unwrap_or(column).trim();

        let field: ProfileField = match column.parse() {
            Ok(field) => field,
            Err(e) => return CommandOutcome::failed(format!("unhandled error updating user info: {}", e)),
        };

        match ctx
            .users
            .update_field(&ctx.user.cell_number, field, &self.data.text)
            .await
        {
            Ok(()) => CommandOutcome::ok(format!(
                "successfully updated user info.{} to {}",
                field, self.data.text
            )),
            Err(e) => CommandOutcome::failed(format!("unhandled error updating user info: {}", e)),
        }
    }
}

impl UpdateOrderCommand {
    pub async fn execute(&self, ctx: &ExecutionContext<'_>) -> CommandOutcome {
        let updates = match parse_update_order(&self.data.text) {
            Ok(updates) => updates,
            Err(e) => return CommandOutcome::failed(format!("error parsing update order command: {}", e)),
        };

        let items = OrderItems::new(updates);
        match ctx
            .orders
            .upsert_order(&ctx.user.cell_number, ctx.catalogue_id, &items, ctx.auto_increment)
            .await
        {
            Ok(_) => CommandOutcome::ok("successfully updated current order"),
            Err(e) => CommandOutcome::failed(format!("unhandled error updating order: {}", e)),
        }
    }
}
