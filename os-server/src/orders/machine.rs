//! Order state machine
//!
//! Validates and applies status transitions:
//!
//! ```text
//! RECEIVED → IN_PROGRESS ⇄ PAUSED → FINISHED → PAID
//! ```
//!
//! PAID is terminal. Side effects are derived from the *target* status
//! alone:
//! - first entry into FINISHED stamps `finished_at`
//! - first entry into PAID stamps `paid_at` and backfills `finished_at`
//! - entering PAUSED stores the reason; any other target clears it
//! - re-entering the current status never re-stamps a timestamp
//!
//! After the row is persisted the machine enqueues exactly one
//! notification job. The caller's response reflects only the persisted
//! order; dispatch failures are invisible here.

use chrono_tz::Tz;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::db::models::{OrderCreate, OrderItem, ServiceOrder};
use crate::db::repository::service_order::StatusUpdate;
use crate::db::repository::{
    ClientRepository, OrderCounterRepository, ServiceOrderRepository, StoreRepository,
};
use crate::money;
use crate::notify::{NotificationJob, NotificationService};
use crate::utils::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, validate_required_text};
use crate::utils::{AppError, AppResult};
use shared::models::{OrderStatus, TransitionRequest};
use shared::util::now_millis;

pub struct OrderStateMachine {
    orders: ServiceOrderRepository,
    stores: StoreRepository,
    clients: ClientRepository,
    counters: OrderCounterRepository,
    notifier: NotificationService,
    tz: Tz,
}

impl OrderStateMachine {
    pub fn new(db: Surreal<Db>, notifier: NotificationService, tz: Tz) -> Self {
        Self {
            orders: ServiceOrderRepository::new(db.clone()),
            stores: StoreRepository::new(db.clone()),
            clients: ClientRepository::new(db.clone()),
            counters: OrderCounterRepository::new(db),
            notifier,
            tz,
        }
    }

    /// Create an order in RECEIVED with a generated number
    ///
    /// The creation notification goes through the same outbox as any
    /// transition, modeled as RECEIVED → RECEIVED.
    pub async fn create_order(&self, data: OrderCreate) -> AppResult<ServiceOrder> {
        validate_required_text(&data.created_by, "createdBy", MAX_NAME_LEN)?;
        money::validate_items(&data.items)?;

        let store = self
            .stores
            .find_by_id(&data.store_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Store {} not found", data.store_id)))?;
        let client = self
            .clients
            .find_by_id(&data.client_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Client {} not found", data.client_id)))?;
        if client.store_id != store.id {
            return Err(AppError::validation(format!(
                "Client {} does not belong to store {}",
                client.id, store.id
            )));
        }

        let now = now_millis();
        let sequence = self.counters.next_value(&store.id).await?;
        let order_number = super::format_order_number(sequence, now, self.tz);
        let total = money::order_total(&data.items);

        let order = self
            .orders
            .create(
                &store.id,
                &client.id,
                data.created_by,
                order_number,
                data.items,
                total,
                now,
            )
            .await?;

        tracing::info!(
            order_id = %order.id,
            order_number = %order.order_number,
            "Order created"
        );

        self.notifier.enqueue(NotificationJob {
            order_id: order.id.clone(),
            previous: OrderStatus::Received,
            status: OrderStatus::Received,
        });

        Ok(order)
    }

    /// Apply a requested status transition
    pub async fn request_transition(
        &self,
        order_id: &str,
        request: TransitionRequest,
    ) -> AppResult<ServiceOrder> {
        let reason = request
            .paused_reason
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string);
        if let Some(r) = &reason
            && r.len() > MAX_NOTE_LEN
        {
            return Err(AppError::validation(format!(
                "pausedReason is too long ({} chars, max {MAX_NOTE_LEN})",
                r.len()
            )));
        }

        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order {} not found", order_id)))?;

        if order.status.is_terminal() {
            return Err(AppError::business_rule(format!(
                "Order {} is already paid; no further transitions are allowed",
                order.order_number
            )));
        }

        let previous = order.status;
        let target = request.status;
        let now = now_millis();

        // Timestamps stamp on first entry only; PAID backfills finished_at
        // for orders paid without passing through FINISHED.
        let finished_at = match target {
            OrderStatus::Finished | OrderStatus::Paid => order.finished_at.or(Some(now)),
            _ => order.finished_at,
        };
        let paid_at = match target {
            OrderStatus::Paid => order.paid_at.or(Some(now)),
            _ => order.paid_at,
        };
        let paused_reason = match target {
            OrderStatus::Paused => reason,
            _ => None,
        };

        let updated = self
            .orders
            .update_status(
                order_id,
                StatusUpdate {
                    status: target,
                    paused_reason,
                    finished_at,
                    paid_at,
                },
            )
            .await?;

        tracing::info!(
            order_id = %updated.id,
            order_number = %updated.order_number,
            from = %previous,
            to = %target,
            "Order status changed"
        );

        self.notifier.enqueue(NotificationJob {
            order_id: updated.id.clone(),
            previous,
            status: target,
        });

        Ok(updated)
    }

    /// Replace all line items and recompute the total (full edit)
    pub async fn replace_items(
        &self,
        order_id: &str,
        items: Vec<OrderItem>,
    ) -> AppResult<ServiceOrder> {
        money::validate_items(&items)?;

        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order {} not found", order_id)))?;

        if order.status.is_terminal() {
            return Err(AppError::business_rule(format!(
                "Order {} is paid; items are immutable",
                order.order_number
            )));
        }

        let total = money::order_total(&items);
        let updated = self.orders.replace_items(order_id, items, total).await?;
        Ok(updated)
    }
}
