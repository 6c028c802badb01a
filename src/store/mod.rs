// ============================================================================
// Store Collaborators
// ============================================================================
//
// Narrow async interfaces the command pipeline consumes. Two backends:
// - InMemoryStore (tests, console demo)
// - PgStore (Postgres through sqlx)
//
// ============================================================================

mod memory;
mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;

use crate::domain::catalogue::Catalogue;
use crate::domain::customer::{ProfileField, UserInfo};
use crate::domain::order::{CustomerOrder, OrderItems, TallyError};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("no pending order for {0}")]
    NoPendingOrder(String),

    #[error("{0}")]
    Tally(#[from] TallyError),

    #[error("failed to encode order items: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user(&self, cell_number: &str) -> Result<Option<UserInfo>, StoreError>;

    async fn register_user(&self, cell_number: &str) -> Result<UserInfo, StoreError>;

    /// Write a single profile field.
    async fn update_field(
        &self,
        cell_number: &str,
        field: ProfileField,
        value: &str,
    ) -> Result<(), StoreError>;

    async fn render_profile(&self, cell_number: &str) -> Result<String, StoreError>;
}

/// Orders are keyed by user. `auto_increment` selects how new order ids are
/// assigned: a store sequence when true, a time-ordered UUID when false.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn current_order(
        &self,
        cell_number: &str,
        auto_increment: bool,
    ) -> Result<Option<CustomerOrder>, StoreError>;

    /// Merge `items` into the user's pending order, creating it if needed.
    async fn upsert_order(
        &self,
        cell_number: &str,
        catalogue_id: i64,
        items: &OrderItems,
        auto_increment: bool,
    ) -> Result<CustomerOrder, StoreError>;

    async fn render_current_order(
        &self,
        cell_number: &str,
        auto_increment: bool,
    ) -> Result<String, StoreError>;

    /// Total in cents plus a printable summary of the pending order.
    async fn tally(&self, cell_number: &str, auto_increment: bool) -> Result<(u64, String), StoreError>;
}

pub trait PriceList: Send + Sync {
    fn render_price_list(&self) -> String;
}

impl PriceList for Catalogue {
    fn render_price_list(&self) -> String {
        Catalogue::render_price_list(self)
    }
}
