//! Service Order Repository
//!
//! All status mutations go through the order state machine; this layer
//! only persists. The idempotency flags are claimed with conditional
//! updates so concurrent duplicate transitions cannot double-dispatch.

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{OrderItem, ServiceOrder};
use shared::models::OrderStatus;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "service_order";

#[derive(Debug, serde::Deserialize)]
struct ServiceOrderRecord {
    id: RecordId,
    store: RecordId,
    client: RecordId,
    created_by: String,
    order_number: String,
    status: OrderStatus,
    items: Vec<OrderItem>,
    total_amount: f64,
    paused_reason: Option<String>,
    whatsapp_sent: bool,
    email_sent: bool,
    created_at: i64,
    finished_at: Option<i64>,
    paid_at: Option<i64>,
}

#[derive(Debug, serde::Serialize)]
struct ServiceOrderInsert {
    store: RecordId,
    client: RecordId,
    created_by: String,
    order_number: String,
    status: OrderStatus,
    items: Vec<OrderItem>,
    total_amount: f64,
    paused_reason: Option<String>,
    whatsapp_sent: bool,
    email_sent: bool,
    created_at: i64,
    finished_at: Option<i64>,
    paid_at: Option<i64>,
}

impl From<ServiceOrderRecord> for ServiceOrder {
    fn from(r: ServiceOrderRecord) -> Self {
        ServiceOrder {
            id: r.id.to_string(),
            store_id: r.store.to_string(),
            client_id: r.client.to_string(),
            created_by: r.created_by,
            order_number: r.order_number,
            status: r.status,
            items: r.items,
            total_amount: r.total_amount,
            paused_reason: r.paused_reason,
            whatsapp_sent: r.whatsapp_sent,
            email_sent: r.email_sent,
            created_at: r.created_at,
            finished_at: r.finished_at,
            paid_at: r.paid_at,
        }
    }
}

/// Fields persisted by a status transition
#[derive(Debug, Clone)]
pub struct StatusUpdate {
    pub status: OrderStatus,
    pub paused_reason: Option<String>,
    pub finished_at: Option<i64>,
    pub paid_at: Option<i64>,
}

#[derive(Clone)]
pub struct ServiceOrderRepository {
    base: BaseRepository,
}

impl ServiceOrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Persist a new order (status RECEIVED, flags cleared)
    pub async fn create(
        &self,
        store_id: &str,
        client_id: &str,
        created_by: String,
        order_number: String,
        items: Vec<OrderItem>,
        total_amount: f64,
        created_at: i64,
    ) -> RepoResult<ServiceOrder> {
        let insert = ServiceOrderInsert {
            store: parse_record_id("store", store_id)?,
            client: parse_record_id("client", client_id)?,
            created_by,
            order_number,
            status: OrderStatus::Received,
            items,
            total_amount,
            paused_reason: None,
            whatsapp_sent: false,
            email_sent: false,
            created_at,
            finished_at: None,
            paid_at: None,
        };
        let created: Option<ServiceOrderRecord> =
            self.base.db().create(TABLE).content(insert).await?;
        created
            .map(Into::into)
            .ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<ServiceOrder>> {
        let rid = parse_record_id(TABLE, id)?;
        let record: Option<ServiceOrderRecord> = self.base.db().select(rid).await?;
        Ok(record.map(Into::into))
    }

    /// List a store's orders, newest first
    pub async fn list_by_store(&self, store_id: &str) -> RepoResult<Vec<ServiceOrder>> {
        let store = parse_record_id("store", store_id)?;
        let records: Vec<ServiceOrderRecord> = self
            .base
            .db()
            .query("SELECT * FROM service_order WHERE store = $store ORDER BY created_at DESC")
            .bind(("store", store))
            .await?
            .take(0)?;
        Ok(records.into_iter().map(Into::into).collect())
    }

    /// Persist the result of a status transition
    pub async fn update_status(&self, id: &str, update: StatusUpdate) -> RepoResult<ServiceOrder> {
        let rid = parse_record_id(TABLE, id)?;
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $id SET status = $status, paused_reason = $paused_reason, \
                 finished_at = $finished_at, paid_at = $paid_at RETURN AFTER",
            )
            .bind(("id", rid))
            .bind(("status", update.status))
            .bind(("paused_reason", update.paused_reason))
            .bind(("finished_at", update.finished_at))
            .bind(("paid_at", update.paid_at))
            .await?;
        let records: Vec<ServiceOrderRecord> = result.take(0)?;
        records
            .into_iter()
            .next()
            .map(Into::into)
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    /// Replace the line items (full edit) and recompute the stored total
    pub async fn replace_items(
        &self,
        id: &str,
        items: Vec<OrderItem>,
        total_amount: f64,
    ) -> RepoResult<ServiceOrder> {
        let rid = parse_record_id(TABLE, id)?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $id SET items = $items, total_amount = $total RETURN AFTER")
            .bind(("id", rid))
            .bind(("items", items))
            .bind(("total", total_amount))
            .await?;
        let records: Vec<ServiceOrderRecord> = result.take(0)?;
        records
            .into_iter()
            .next()
            .map(Into::into)
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    /// Claim the FINISHED WhatsApp idempotency flag
    ///
    /// Conditional write: the flag flips only if it was still false, and
    /// the return value says whether this caller's write took effect.
    /// Two concurrent claimers cannot both win, so the notification
    /// fires at most once.
    pub async fn claim_whatsapp_sent(&self, id: &str) -> RepoResult<bool> {
        self.claim_flag(id, "whatsapp_sent").await
    }

    /// Claim the FINISHED email idempotency flag (same contract)
    pub async fn claim_email_sent(&self, id: &str) -> RepoResult<bool> {
        self.claim_flag(id, "email_sent").await
    }

    async fn claim_flag(&self, id: &str, flag: &str) -> RepoResult<bool> {
        let rid = parse_record_id(TABLE, id)?;
        let sql = format!("UPDATE $id SET {flag} = true WHERE {flag} = false RETURN AFTER");
        let mut result = self.base.db().query(sql).bind(("id", rid)).await?;
        let records: Vec<ServiceOrderRecord> = result.take(0)?;
        Ok(!records.is_empty())
    }
}
