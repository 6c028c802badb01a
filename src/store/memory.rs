use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::catalogue::Catalogue;
use crate::domain::customer::{ProfileField, UserInfo};
use crate::domain::order::{describe_order, tally_order, CustomerOrder, OrderItems};

use super::{OrderStore, StoreError, UserStore};

/// Process-local store. One pending order per user.
pub struct InMemoryStore {
    catalogue: Arc<Catalogue>,
    users: RwLock<HashMap<String, UserInfo>>,
    orders: RwLock<HashMap<String, CustomerOrder>>,
    order_sequence: AtomicI64,
}

impl InMemoryStore {
    pub fn new(catalogue: Arc<Catalogue>) -> Self {
        Self {
            catalogue,
            users: RwLock::new(HashMap::new()),
            orders: RwLock::new(HashMap::new()),
            order_sequence: AtomicI64::new(0),
        }
    }

    fn next_order_id(&self, auto_increment: bool) -> String {
        if auto_increment {
            (self.order_sequence.fetch_add(1, Ordering::SeqCst) + 1).to_string()
        } else {
            Uuid::now_v7().to_string()
        }
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn find_user(&self, cell_number: &str) -> Result<Option<UserInfo>, StoreError> {
        Ok(self.users.read().await.get(cell_number).cloned())
    }

    async fn register_user(&self, cell_number: &str) -> Result<UserInfo, StoreError> {
        let mut users = self.users.write().await;
        let user = users
            .entry(cell_number.to_string())
            .or_insert_with(|| UserInfo::new(cell_number));
        tracing::debug!(user = %cell_number, "Registered user");
        Ok(user.clone())
    }

    async fn update_field(
        &self,
        cell_number: &str,
        field: ProfileField,
        value: &str,
    ) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(cell_number)
            .ok_or_else(|| StoreError::UserNotFound(cell_number.to_string()))?;
        user.set_field(field, value);
        Ok(())
    }

    async fn render_profile(&self, cell_number: &str) -> Result<String, StoreError> {
        self.users
            .read()
            .await
            .get(cell_number)
            .map(UserInfo::render_profile)
            .ok_or_else(|| StoreError::UserNotFound(cell_number.to_string()))
    }
}

#[async_trait]
impl OrderStore for InMemoryStore {
    async fn current_order(
        &self,
        cell_number: &str,
        _auto_increment: bool,
    ) -> Result<Option<CustomerOrder>, StoreError> {
        Ok(self.orders.read().await.get(cell_number).cloned())
    }

    async fn upsert_order(
        &self,
        cell_number: &str,
        catalogue_id: i64,
        items: &OrderItems,
        auto_increment: bool,
    ) -> Result<CustomerOrder, StoreError> {
        let mut orders = self.orders.write().await;
        let order = orders.entry(cell_number.to_string()).or_insert_with(|| {
            let mut order = CustomerOrder::new(cell_number, catalogue_id, OrderItems::default());
            order.order_id = self.next_order_id(auto_increment);
            order
        });

        order.catalogue_id = catalogue_id;
        order.order_items.merge(&items.menu_indications);

        tracing::debug!(
            user = %cell_number,
            order_id = %order.order_id,
            lines = order.order_items.len(),
            "Upserted pending order"
        );

        Ok(order.clone())
    }

    async fn render_current_order(
        &self,
        cell_number: &str,
        auto_increment: bool,
    ) -> Result<String, StoreError> {
        let order = self
            .current_order(cell_number, auto_increment)
            .await?
            .unwrap_or_else(|| CustomerOrder::new(cell_number, self.catalogue.id, OrderItems::default()));
        Ok(describe_order(&order, &self.catalogue))
    }

    async fn tally(&self, cell_number: &str, auto_increment: bool) -> Result<(u64, String), StoreError> {
        let order = self
            .current_order(cell_number, auto_increment)
            .await?
            .ok_or_else(|| StoreError::NoPendingOrder(cell_number.to_string()))?;
        let tally = tally_order(&order, &self.catalogue)?;
        Ok((tally.total_cents, tally.summary(&self.catalogue)))
    }
}
