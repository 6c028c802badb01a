// ============================================================================
// Commands
// ============================================================================
//
// message -> CommandRecognizer -> Vec<Command> -> process_commands -> report
//
// ============================================================================

pub mod command;
pub mod executor;
pub mod question;
pub mod recognizer;

pub use command::*;
pub use executor::{process_commands, CommandReport};
pub use question::Question;
pub use recognizer::{CommandPatterns, CommandRecognizer, Directive};

use std::sync::Arc;

use crate::checkout::{HostedPaymentLink, PaymentLinkBuilder};
use crate::config::BotConfig;
use crate::domain::catalogue::Catalogue;
use crate::store::{OrderStore, PriceList, UserStore};

/// External collaborators the pipeline reads from and writes to.
#[derive(Clone)]
pub struct Collaborators {
    pub users: Arc<dyn UserStore>,
    pub orders: Arc<dyn OrderStore>,
    pub price_list: Arc<dyn PriceList>,
    pub payment_links: Arc<dyn PaymentLinkBuilder>,
}

impl Collaborators {
    /// Wire one store serving both users and orders, with the hosted payment
    /// page from `config`.
    pub fn for_store<S>(
        store: Arc<S>,
        catalogue: Arc<Catalogue>,
        config: &BotConfig,
    ) -> Result<Self, url::ParseError>
    where
        S: UserStore + OrderStore + 'static,
    {
        let links = HostedPaymentLink::new(
            &config.checkout.payment_url,
            config.checkout.merchant_id.clone(),
            config.checkout.merchant_key.clone(),
        )?;

        Ok(Self {
            users: store.clone(),
            orders: store,
            price_list: catalogue,
            payment_links: Arc::new(links),
        })
    }
}
