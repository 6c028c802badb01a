use super::command::{Command, CommandKind, CommandOutcome, ExecutionContext};

/// Outcomes of one message's commands, in command order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandReport {
    pub outcomes: Vec<(CommandKind, CommandOutcome)>,
}

impl CommandReport {
    /// Result block: every outcome message, newline-joined.
    pub fn joined(&self) -> String {
        self.outcomes
            .iter()
            .map(|(_, outcome)| outcome.message.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|(_, o)| !o.is_ok()).count()
    }
}

/// Run every command in order. A failing command never stops the batch.
pub async fn process_commands(commands: &[Command], ctx: &ExecutionContext<'_>) -> CommandReport {
    let mut report = CommandReport::default();

    for command in commands {
        let outcome = command.execute(ctx).await;

        if outcome.is_ok() {
            tracing::debug!(
                user = %ctx.user.cell_number,
                command = %command.data().name,
                "Command succeeded"
            );
        } else {
            tracing::warn!(
                user = %ctx.user.cell_number,
                command = %command.data().name,
                error = %outcome.message,
                "Command failed"
            );
        }

        report.outcomes.push((command.kind(), outcome));
    }

    report
}
