use super::context::ConversationContext;
use super::texts::{COLD_GREETING, NO_COMMAND, REMINDER_GREETING, SAY_MENU, SMARTY_PANTS_GREETING};

/// Trivial whitespace counts as "nothing happened".
fn is_blank(block: &str) -> bool {
    matches!(block, "" | " " | "\n")
}

/// Build the outbound text.
///
/// | user existed | recognized, non-blank | reply                                   |
/// |--------------|-----------------------|-----------------------------------------|
/// | no           | yes                   | smarty-pants + result + reminder + menu |
/// | no           | no                    | cold greeting + reminder + menu         |
/// | yes          | no                    | no-command + menu                       |
/// | yes          | yes                   | result                                  |
pub fn compose(command_block: &str, recognized: bool, user_existed: bool) -> String {
    let understood = recognized && !is_blank(command_block);

    match (user_existed, understood) {
        (false, true) => format!(
            "{}\n\n{}\n\n{}\n\n{}",
            SMARTY_PANTS_GREETING, command_block, REMINDER_GREETING, SAY_MENU
        ),
        (false, false) => format!("{}\n\n{}\n\n{}", COLD_GREETING, REMINDER_GREETING, SAY_MENU),
        (true, false) => format!("{}\n\n{}", NO_COMMAND, SAY_MENU),
        (true, true) => command_block.to_string(),
    }
}

/// Compose the reply for `convo`, then mark its user as known.
pub fn compose_reply(convo: &mut ConversationContext, command_block: &str, recognized: bool) -> String {
    let reply = compose(command_block, recognized, convo.user_existed);
    convo.user_existed = true;
    reply
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::customer::UserInfo;

    #[test]
    fn test_new_user_with_result() {
        let reply = compose("successfully updated current order", true, false);

        assert!(reply.starts_with(SMARTY_PANTS_GREETING));
        assert!(reply.contains("\n\nsuccessfully updated current order\n\n"));
        assert!(reply.contains(REMINDER_GREETING));
        assert!(reply.ends_with(SAY_MENU));
    }

    #[test]
    fn test_new_user_without_command() {
        let reply = compose("", false, false);
        assert_eq!(reply, format!("{}\n\n{}\n\n{}", COLD_GREETING, REMINDER_GREETING, SAY_MENU));
    }

    #[test]
    fn test_returning_user_without_command() {
        assert_eq!(compose("", false, true), format!("{}\n\n{}", NO_COMMAND, SAY_MENU));
    }

    #[test]
    fn test_returning_user_gets_result_verbatim() {
        assert_eq!(compose("line one\nline two", true, true), "line one\nline two");
    }

    #[test]
    fn test_blank_result_counts_as_nothing() {
        for blank in ["", " ", "\n"] {
            assert_eq!(compose(blank, true, true), format!("{}\n\n{}", NO_COMMAND, SAY_MENU));
            assert!(compose(blank, true, false).starts_with(COLD_GREETING));
        }
        assert_eq!(compose("  ", true, true), "  ");
    }

    #[test]
    fn test_compose_reply_marks_user_existing() {
        let mut convo = ConversationContext::new("menu?", UserInfo::new("1"), false);

        let first = compose_reply(&mut convo, "Main Menu", true);
        assert!(first.starts_with(SMARTY_PANTS_GREETING));
        assert!(first.ends_with(SAY_MENU));
        assert!(convo.user_existed);

        let second = compose_reply(&mut convo, "Main Menu", true);
        assert_eq!(second, "Main Menu");
        assert!(convo.user_existed);
    }
}
