use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::customer::UserInfo;
use crate::domain::order::CustomerOrder;
use crate::store::OrderStore;

// ============================================================================
// Checkout - turns the pending order into a payment link
// ============================================================================

/// Redirect/notification URLs handed to the payment page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckoutInfo {
    pub return_url: String,
    pub cancel_url: String,
    pub notify_url: String,
    #[serde(default)]
    pub item_name_prefix: String,
}

impl CheckoutInfo {
    /// Parse and re-serialize every URL so the payment page receives
    /// canonical forms.
    pub fn normalized(&self) -> Result<Self, url::ParseError> {
        Ok(Self {
            return_url: Url::parse(&self.return_url)?.to_string(),
            cancel_url: Url::parse(&self.cancel_url)?.to_string(),
            notify_url: Url::parse(&self.notify_url)?.to_string(),
            item_name_prefix: self.item_name_prefix.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutCart {
    pub item_name: String,
    pub cart_total_cents: u64,
    pub order_id: String,
    pub cust_first_name: String,
    pub cust_last_name: String,
    pub cust_email: String,
}

pub trait PaymentLinkBuilder: Send + Sync {
    fn build_payment_link(&self, cart: &CheckoutCart, urls: &CheckoutInfo) -> String;
}

/// Hosted payment page addressed by query parameters.
pub struct HostedPaymentLink {
    payment_url: Url,
    merchant_id: String,
    merchant_key: String,
}

impl HostedPaymentLink {
    pub fn new(
        payment_url: &str,
        merchant_id: impl Into<String>,
        merchant_key: impl Into<String>,
    ) -> Result<Self, url::ParseError> {
        Ok(Self {
            payment_url: Url::parse(payment_url)?,
            merchant_id: merchant_id.into(),
            merchant_key: merchant_key.into(),
        })
    }
}

impl PaymentLinkBuilder for HostedPaymentLink {
    fn build_payment_link(&self, cart: &CheckoutCart, urls: &CheckoutInfo) -> String {
        let mut link = self.payment_url.clone();
        {
            let mut query = link.query_pairs_mut();
            query
                .append_pair("merchant_id", &self.merchant_id)
                .append_pair("merchant_key", &self.merchant_key)
                .append_pair("return_url", &urls.return_url)
                .append_pair("cancel_url", &urls.cancel_url)
                .append_pair("notify_url", &urls.notify_url)
                .append_pair("name_first", &cart.cust_first_name)
                .append_pair("name_last", &cart.cust_last_name);
            if !cart.cust_email.is_empty() {
                query.append_pair("email_address", &cart.cust_email);
            }
            query
                .append_pair("m_payment_id", &cart.order_id)
                .append_pair("amount", &format_amount(cart.cart_total_cents))
                .append_pair("item_name", &cart.item_name);
        }
        link.to_string()
    }
}

fn format_amount(cents: u64) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}

/// Tally the user's pending order and answer with its summary followed by a
/// payment link for `order`, the order loaded with the conversation. Failures
/// come back as reply text.
pub async fn begin_checkout(
    orders: &dyn OrderStore,
    links: &dyn PaymentLinkBuilder,
    user: &UserInfo,
    order: &CustomerOrder,
    urls: &CheckoutInfo,
    auto_increment: bool,
) -> String {
    let urls = match urls.normalized() {
        Ok(urls) => urls,
        Err(e) => {
            tracing::error!(error = %e, "Checkout URLs are invalid");
            return format!("checkout is not available right now: {}", e);
        }
    };

    let (cart_total_cents, cart_summary) = match orders.tally(&user.cell_number, auto_increment).await {
        Ok(tally) => tally,
        Err(e) => return e.to_string(),
    };

    if !order.is_persisted() {
        return format!("no pending order for {}", user.cell_number);
    }

    let cart = CheckoutCart {
        item_name: order.build_item_name(&urls.item_name_prefix),
        cart_total_cents,
        order_id: order.order_id.clone(),
        cust_first_name: user.nickname.clone().unwrap_or_default(),
        cust_last_name: user.cell_number.clone(),
        cust_email: user.email.clone().unwrap_or_default(),
    };

    tracing::info!(
        user = %user.cell_number,
        order_id = %cart.order_id,
        total_cents = cart.cart_total_cents,
        "Built checkout cart"
    );

    format!("{}\n\n{}", cart_summary, links.build_payment_link(&cart, &urls))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::conversation::load_conversation;
    use crate::domain::catalogue::tests::sample_catalogue;
    use crate::domain::order::{MenuIndication, OrderItems};
    use crate::store::{InMemoryStore, OrderStore, UserStore};

    fn urls() -> CheckoutInfo {
        CheckoutInfo {
            return_url: "https://shop.example/return".to_string(),
            cancel_url: "https://shop.example/cancel".to_string(),
            notify_url: "https://shop.example/notify".to_string(),
            item_name_prefix: "Flying Rasta".to_string(),
        }
    }

    fn links() -> HostedPaymentLink {
        HostedPaymentLink::new("https://pay.example/eng/process", "10000100", "key").unwrap()
    }

    #[test]
    fn test_payment_link_carries_cart() {
        let cart = CheckoutCart {
            item_name: "Flying Rasta order 3".to_string(),
            cart_total_cents: 24_050,
            order_id: "3".to_string(),
            cust_first_name: "Bob".to_string(),
            cust_last_name: "27821234567".to_string(),
            cust_email: String::new(),
        };

        let link = links().build_payment_link(&cart, &urls());
        let parsed = Url::parse(&link).unwrap();
        let pairs: Vec<(String, String)> = parsed.query_pairs().into_owned().collect();

        assert!(link.starts_with("https://pay.example/eng/process?merchant_id=10000100"));
        assert!(pairs.contains(&("amount".to_string(), "240.50".to_string())));
        assert!(pairs.contains(&("item_name".to_string(), "Flying Rasta order 3".to_string())));
        assert!(!pairs.iter().any(|(k, _)| k == "email_address"));
    }

    #[test]
    fn test_invalid_urls_are_rejected() {
        let mut info = urls();
        info.notify_url = "not a url".to_string();
        assert!(info.normalized().is_err());
    }

    #[tokio::test]
    async fn test_begin_checkout_summary_then_link() {
        let store = InMemoryStore::new(Arc::new(sample_catalogue()));
        let user = store.register_user("27821234567").await.unwrap();
        let order = store
            .upsert_order(
                "27821234567",
                1,
                &OrderItems::new(vec![MenuIndication::new(9, "2")]),
                true,
            )
            .await
            .unwrap();

        let text = begin_checkout(&store, &links(), &user, &order, &urls(), true).await;
        let (summary, link) = text.split_once("\n\n").unwrap();

        assert!(summary.starts_with("Order 1 summary:"));
        assert!(link.contains("m_payment_id=1"));
        assert!(link.contains("amount=240.00"));
    }

    #[tokio::test]
    async fn test_begin_checkout_without_order_reports_error() {
        let store = InMemoryStore::new(Arc::new(sample_catalogue()));
        let user = store.register_user("1").await.unwrap();

        let text = begin_checkout(&store, &links(), &user, &CustomerOrder::default(), &urls(), true).await;
        assert_eq!(text, "no pending order for 1");
    }

    #[tokio::test]
    async fn test_begin_checkout_links_conversation_order() {
        let store = InMemoryStore::new(Arc::new(sample_catalogue()));
        let user = store.register_user("1").await.unwrap();
        store
            .upsert_order("1", 1, &OrderItems::new(vec![MenuIndication::new(6, "1")]), false)
            .await
            .unwrap();

        let convo = load_conversation(&store, &store, "1", "checkoutnow?", false).await.unwrap();
        let text = begin_checkout(&store, &links(), &user, &convo.current_order, &urls(), false).await;

        let expected = format!("m_payment_id={}", convo.current_order.order_id);
        assert!(text.contains(&expected));
        assert!(text.contains("amount=100.00"));
    }

    #[tokio::test]
    async fn test_begin_checkout_oversized_order_reports_error() {
        let store = InMemoryStore::new(Arc::new(sample_catalogue()));
        let user = store.register_user("1").await.unwrap();
        let huge = u64::MAX.to_string();
        let order = store
            .upsert_order(
                "1",
                1,
                &OrderItems::new(vec![MenuIndication::new(9, huge.as_str()), MenuIndication::new(6, huge.as_str())]),
                true,
            )
            .await
            .unwrap();

        let text = begin_checkout(&store, &links(), &user, &order, &urls(), true).await;
        assert!(text.starts_with("invalid amount for item 9"));
    }
}
