use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use uuid::Uuid;

use crate::domain::catalogue::Catalogue;
use crate::domain::customer::{ProfileField, UserInfo};
use crate::domain::order::{describe_order, tally_order, CustomerOrder, OrderItems};

use super::{OrderStore, StoreError, UserStore};

// ============================================================================
// Postgres Store
// ============================================================================
//
// Tables:
// - users:            one row per cell number, one column per profile field
// - customer_orders:  order items as JSONB, at most one pending row per user
//
// ============================================================================

const SCHEMA: &[&str] = &[
    "CREATE SEQUENCE IF NOT EXISTS customer_order_seq",
    "CREATE TABLE IF NOT EXISTS users (
        cell_number TEXT PRIMARY KEY,
        nickname    TEXT,
        email       TEXT,
        social      TEXT,
        consent     TEXT,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS customer_orders (
        order_id     TEXT PRIMARY KEY,
        cell_number  TEXT NOT NULL REFERENCES users (cell_number),
        catalogue_id BIGINT NOT NULL,
        items        JSONB NOT NULL,
        pending      BOOLEAN NOT NULL DEFAULT TRUE,
        updated_at   TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE UNIQUE INDEX IF NOT EXISTS customer_orders_one_pending
        ON customer_orders (cell_number) WHERE pending",
];

type UserRow = (String, Option<String>, Option<String>, Option<String>, Option<String>);
type OrderRow = (String, String, i64, Json<OrderItems>);

pub struct PgStore {
    pool: PgPool,
    catalogue: Arc<Catalogue>,
}

impl PgStore {
    pub async fn connect(database_url: &str, catalogue: Arc<Catalogue>) -> anyhow::Result<Self> {
        tracing::info!("Connecting to Postgres...");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Ok(Self { pool, catalogue })
    }

    /// Create tables if they are missing.
    pub async fn ensure_schema(&self) -> anyhow::Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        tracing::info!("Postgres schema ready");
        Ok(())
    }

    async fn next_order_id(&self, auto_increment: bool) -> Result<String, StoreError> {
        if !auto_increment {
            return Ok(Uuid::now_v7().to_string());
        }
        let (id,): (i64,) = sqlx::query_as("SELECT nextval('customer_order_seq')")
            .fetch_one(&self.pool)
            .await?;
        Ok(id.to_string())
    }
}

fn user_from_row((cell_number, nickname, email, social, consent): UserRow) -> UserInfo {
    UserInfo {
        cell_number,
        nickname,
        email,
        social,
        consent,
    }
}

fn order_from_row((order_id, cell_number, catalogue_id, items): OrderRow) -> CustomerOrder {
    CustomerOrder {
        order_id,
        cell_number,
        catalogue_id,
        order_items: items.0,
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_user(&self, cell_number: &str) -> Result<Option<UserInfo>, StoreError> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT cell_number, nickname, email, social, consent FROM users WHERE cell_number = $1",
        )
        .bind(cell_number)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(user_from_row))
    }

    async fn register_user(&self, cell_number: &str) -> Result<UserInfo, StoreError> {
        sqlx::query("INSERT INTO users (cell_number) VALUES ($1) ON CONFLICT (cell_number) DO NOTHING")
            .bind(cell_number)
            .execute(&self.pool)
            .await?;
        tracing::debug!(user = %cell_number, "Registered user");
        self.find_user(cell_number)
            .await?
            .ok_or_else(|| StoreError::UserNotFound(cell_number.to_string()))
    }

    async fn update_field(
        &self,
        cell_number: &str,
        field: ProfileField,
        value: &str,
    ) -> Result<(), StoreError> {
        // Column names come from the ProfileField whitelist, never from input.
        let statement = format!("UPDATE users SET {} = $1 WHERE cell_number = $2", field.column());
        let result = sqlx::query(&statement)
            .bind(value)
            .bind(cell_number)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::UserNotFound(cell_number.to_string()));
        }
        Ok(())
    }

    async fn render_profile(&self, cell_number: &str) -> Result<String, StoreError> {
        self.find_user(cell_number)
            .await?
            .map(|user| user.render_profile())
            .ok_or_else(|| StoreError::UserNotFound(cell_number.to_string()))
    }
}

#[async_trait]
impl OrderStore for PgStore {
    async fn current_order(
        &self,
        cell_number: &str,
        _auto_increment: bool,
    ) -> Result<Option<CustomerOrder>, StoreError> {
        let row: Option<OrderRow> = sqlx::query_as(
            "SELECT order_id, cell_number, catalogue_id, items
             FROM customer_orders WHERE cell_number = $1 AND pending",
        )
        .bind(cell_number)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(order_from_row))
    }

    async fn upsert_order(
        &self,
        cell_number: &str,
        catalogue_id: i64,
        items: &OrderItems,
        auto_increment: bool,
    ) -> Result<CustomerOrder, StoreError> {
        let mut tx = self.pool.begin().await?;

        let existing: Option<OrderRow> = sqlx::query_as(
            "SELECT order_id, cell_number, catalogue_id, items
             FROM customer_orders WHERE cell_number = $1 AND pending FOR UPDATE",
        )
        .bind(cell_number)
        .fetch_optional(&mut *tx)
        .await?;

        let order = match existing {
            Some(row) => {
                let mut order = order_from_row(row);
                order.catalogue_id = catalogue_id;
                order.order_items.merge(&items.menu_indications);

                sqlx::query(
                    "UPDATE customer_orders SET catalogue_id = $1, items = $2, updated_at = $3
                     WHERE order_id = $4",
                )
                .bind(catalogue_id)
                .bind(Json(&order.order_items))
                .bind(Utc::now())
                .bind(&order.order_id)
                .execute(&mut *tx)
                .await?;
                order
            }
            None => {
                let mut order = CustomerOrder::new(cell_number, catalogue_id, OrderItems::default());
                order.order_items.merge(&items.menu_indications);
                order.order_id = self.next_order_id(auto_increment).await?;

                sqlx::query(
                    "INSERT INTO customer_orders (order_id, cell_number, catalogue_id, items, updated_at)
                     VALUES ($1, $2, $3, $4, $5)",
                )
                .bind(&order.order_id)
                .bind(cell_number)
                .bind(catalogue_id)
                .bind(Json(&order.order_items))
                .bind(Utc::now())
                .execute(&mut *tx)
                .await?;
                order
            }
        };

        tx.commit().await?;

        tracing::debug!(
            user = %cell_number,
            order_id = %order.order_id,
            lines = order.order_items.len(),
            "Upserted pending order"
        );

        Ok(order)
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
