use crate::domain::customer::UserInfo;
use crate::domain::order::{CustomerOrder, OrderItems};
use crate::store::{OrderStore, StoreError, UserStore};

/// One inbound message plus what is known about its sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationContext {
    pub message_body: String,
    pub user_info: UserInfo,
    pub current_order: CustomerOrder,
    /// Whether this sender had talked to the bot before this message.
    pub user_existed: bool,
}

impl ConversationContext {
    pub fn new(message_body: impl Into<String>, user_info: UserInfo, user_existed: bool) -> Self {
        let current_order = CustomerOrder::new(user_info.cell_number.clone(), 0, OrderItems::default());
        Self {
            message_body: message_body.into(),
            user_info,
            current_order,
            user_existed,
        }
    }
}

/// Resolve the sender, registering numbers seen for the first time, and load
/// their pending order.
pub async fn load_conversation(
    users: &dyn UserStore,
    orders: &dyn OrderStore,
    cell_number: &str,
    message_body: &str,
    auto_increment: bool,
) -> Result<ConversationContext, StoreError> {
    let (user_info, user_existed) = match users.find_user(cell_number).await? {
        Some(user) => (user, true),
        None => (users.register_user(cell_number).await?, false),
    };

    let mut convo = ConversationContext::new(message_body, user_info, user_existed);
    if let Some(order) = orders.current_order(cell_number, auto_increment).await? {
        convo.current_order = order;
    }

    Ok(convo)
}
