use crate::checkout::begin_checkout;
use crate::config::BotConfig;
use crate::conversation::{texts, ConversationContext};

use super::Collaborators;

/// Informational queries a user can ask with a trailing `?`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Question {
    Menu,
    PriceList,
    UserInfo,
    CurrentOrder,
    CheckoutNow,
}

impl Question {
    /// Map a matched keyword to its question. Anything unknown is the menu.
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword.to_ascii_lowercase().as_str() {
            "currentorder?" => Question::CurrentOrder,
            "fr.prlist?" => Question::PriceList,
            "userinfo?" => Question::UserInfo,
            "checkoutnow?" => Question::CheckoutNow,
            _ => Question::Menu,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Question::Menu => "menu",
            Question::PriceList => "fr.prlist",
            Question::UserInfo => "userinfo",
            Question::CurrentOrder => "currentorder",
            Question::CheckoutNow => "checkoutnow",
        }
    }

    /// Compute the reply text now. Store failures become the reply.
    pub async fn resolve(&self, services: &Collaborators, config: &BotConfig, convo: &ConversationContext) -> String {
        let auto_increment = config.auto_increment_orders;
        let user = &convo.user_info;
        match self {
            Question::CurrentOrder => services
                .orders
                .render_current_order(&user.cell_number, auto_increment)
                .await
                .unwrap_or_else(|e| e.to_string()),
            Question::PriceList => format!(
                "{}\n\n{}",
                texts::price_list_preamble(&config.shop_name),
                services.price_list.render_price_list()
            ),
            Question::UserInfo => services
                .users
                .render_profile(&user.cell_number)
                .await
                .unwrap_or_else(|e| e.to_string()),
            Question::CheckoutNow => {
                begin_checkout(
                    services.orders.as_ref(),
                    services.payment_links.as_ref(),
                    user,
                    &convo.current_order,
                    &config.checkout.urls(),
                    auto_increment,
                )
                .await
            }
            Question::Menu => texts::main_menu(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_keyword() {
        assert_eq!(Question::from_keyword("MENU?"), Question::Menu);
        assert_eq!(Question::from_keyword("fr.prlist?"), Question::PriceList);
        assert_eq!(Question::from_keyword("CheckoutNow?"), Question::CheckoutNow);
        assert_eq!(Question::from_keyword("whatever"), Question::Menu);
    }
}
