//! Order state machine
//!
//! `Pending` → `Approved` | `Rejected`. Both targets are terminal.
//! Rejecting or deleting a pending order refunds the current cost of its
//! lines to the owner in the same transaction.

use shared::models::{
    OrderCreate, OrderCreated, OrderDetail, OrderPatch, OrderStatus, OrderSummary, OrdersCleared,
    PendingOrders,
};
use shared::util::now_millis;
use tracing::info;

use super::{
    OrderError, OrderService, ensure_active_user, ensure_pending, insert_line, ledger, load_detail,
    lock_order,
};
use crate::auth::{CurrentUser, policy};
use crate::db::repository::{order as order_repo, order_drink as line_repo, room as room_repo, user as user_repo};
use crate::utils::AppResult;
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text, validate_quantity};

fn clean_notes(notes: Option<&str>) -> Option<&str> {
    notes.map(str::trim).filter(|n| !n.is_empty())
}

impl OrderService {
    /// Open a pending order for `actor` with an optional first batch of lines.
    ///
    /// Any failing line aborts the whole order.
    pub async fn create_order(&self, actor: &CurrentUser, data: OrderCreate) -> AppResult<OrderCreated> {
        validate_optional_text(data.notes.as_deref(), "notes", MAX_NOTE_LEN)?;
        for line in &data.lines {
            validate_quantity(line.quantity)?;
        }

        let now = now_millis();
        let mut tx = self.pool.begin().await?;
        if !user_repo::touch(&mut tx, actor.id, now).await? {
            return Err(OrderError::UserNotFound(actor.id).into());
        }
        let mut balance = ensure_active_user(&mut tx, actor.id).await?;
        if room_repo::find_by_id(&mut *tx, data.room_id).await?.is_none() {
            return Err(OrderError::UnknownReference {
                field: "room_id",
                id: data.room_id,
            }
            .into());
        }

        let order_id =
            order_repo::insert(&mut tx, actor.id, data.room_id, clean_notes(data.notes.as_deref()), now)
                .await?;
        for line in &data.lines {
            let (_, after) =
                insert_line(&mut tx, actor.id, order_id, line.beverage_id, line.quantity, now).await?;
            balance = after;
        }
        let order = load_detail(&mut tx, order_id).await?;
        tx.commit().await?;

        info!(
            order_id,
            user_id = actor.id,
            lines = order.lines.len(),
            amount = order.total_cost,
            balance,
            "Order created"
        );
        Ok(OrderCreated {
            order,
            ticket_count: balance,
        })
    }

    pub async fn get_order(&self, actor: &CurrentUser, id: i64) -> AppResult<OrderDetail> {
        let mut conn = self.pool.acquire().await?;
        let order = order_repo::find_by_id(&mut *conn, id)
            .await?
            .ok_or(OrderError::OrderNotFound(id))?;
        policy::authorize(actor, order.user_id, "order", id)?;
        Ok(load_detail(&mut conn, id).await?)
    }

    /// Edit notes / room (owner or admin) and move the status (admin only).
    ///
    /// A status change to `Rejected` refunds the order's current cost.
    pub async fn patch_order(&self, actor: &CurrentUser, id: i64, patch: OrderPatch) -> AppResult<OrderDetail> {
        validate_optional_text(patch.notes.as_deref(), "notes", MAX_NOTE_LEN)?;

        let now = now_millis();
        let mut tx = self.pool.begin().await?;
        let order = lock_order(&mut tx, id, now).await?;

        let target = match patch.status.as_deref() {
            Some(raw) => {
                policy::authorize_admin(actor)?;
                match OrderStatus::parse(raw) {
                    Some(status) if !status.is_pending() => Some(status),
                    _ => return Err(OrderError::InvalidStatus(raw.to_string()).into()),
                }
            }
            None => {
                policy::authorize(actor, order.user_id, "order", id)?;
                None
            }
        };
        ensure_pending(&order)?;

        if let Some(room_id) = patch.room_id
            && room_repo::find_by_id(&mut *tx, room_id).await?.is_none()
        {
            return Err(OrderError::UnknownReference {
                field: "room_id",
                id: room_id,
            }
            .into());
        }
        // Blank notes clear the field, as on create
        let notes = patch.notes.as_deref().map(|n| clean_notes(Some(n)));
        if notes.is_some() || patch.room_id.is_some() {
            order_repo::update_details(&mut tx, id, notes, patch.room_id, now).await?;
        }

        let refund = match target {
            Some(OrderStatus::Rejected) => {
                let cost = line_repo::order_cost(&mut *tx, id).await?;
                let balance = ledger::credit(&mut tx, order.user_id, cost, now).await?;
                Some((cost, balance))
            }
            _ => None,
        };
        if let Some(status) = target {
            order_repo::set_status(&mut tx, id, status, now).await?;
        }

        let detail = load_detail(&mut tx, id).await?;
        tx.commit().await?;

        match (target, refund) {
            (Some(status), Some((amount, balance))) => info!(
                order_id = id,
                user_id = order.user_id,
                %status,
                amount,
                balance,
                "Order rejected and refunded"
            ),
            (Some(status), None) => info!(order_id = id, %status, "Order status changed"),
            _ => info!(order_id = id, "Order details updated"),
        }
        Ok(detail)
    }

    /// Delete a pending order, refunding the current cost of its lines.
    /// Returns the refunded amount.
    pub async fn delete_order(&self, actor: &CurrentUser, id: i64) -> AppResult<i64> {
        let now = now_millis();
        let mut tx = self.pool.begin().await?;
        let order = lock_order(&mut tx, id, now).await?;
        policy::authorize(actor, order.user_id, "order", id)?;
        ensure_pending(&order)?;

        let refunded = line_repo::order_cost(&mut *tx, id).await?;
        let balance = ledger::credit(&mut tx, order.user_id, refunded, now).await?;
        order_repo::delete(&mut tx, id).await?;
        tx.commit().await?;

        info!(
            order_id = id,
            user_id = order.user_id,
            amount = refunded,
            balance,
            "Order deleted"
        );
        Ok(refunded)
    }

    /// Remove every order. Pending ones are refunded first; finalized
    /// orders carry no outstanding debit.
    pub async fn delete_all(&self) -> AppResult<OrdersCleared> {
        let now = now_millis();
        let mut tx = self.pool.begin().await?;
        order_repo::touch_pending(&mut tx, now).await?;

        let mut refunds = Vec::new();
        for (user_id, cost) in order_repo::pending_cost_by_owner(&mut tx).await? {
            let balance = ledger::credit(&mut tx, user_id, cost, now).await?;
            refunds.push((user_id, cost, balance));
        }
        let deleted = order_repo::delete_all(&mut tx).await?;
        tx.commit().await?;

        let mut refunded = 0;
        for (user_id, amount, balance) in refunds {
            info!(user_id, amount, balance, "Pending orders refunded");
            refunded += amount;
        }
        info!(deleted, refunded, "All orders deleted");
        Ok(OrdersCleared { deleted, refunded })
    }

    pub async fn list_orders(&self) -> AppResult<Vec<OrderSummary>> {
        Ok(order_repo::find_all(&self.pool).await?)
    }

    pub async fn pending_orders(&self) -> AppResult<PendingOrders> {
        let orders = order_repo::find_by_status(&self.pool, OrderStatus::Pending).await?;
        let count = orders.len();
        Ok(PendingOrders { orders, count })
    }

    pub async fn completed_orders(&self) -> AppResult<Vec<OrderSummary>> {
        Ok(order_repo::find_completed(&self.pool).await?)
    }

    /// The actor's own orders with their lines, newest first
    pub async fn my_orders(&self, actor: &CurrentUser) -> AppResult<Vec<OrderDetail>> {
        let summaries = order_repo::find_by_user(&self.pool, actor.id).await?;
        let mut conn = self.pool.acquire().await?;
        let mut orders = Vec::with_capacity(summaries.len());
        for summary in summaries {
            orders.push(load_detail(&mut conn, summary.id).await?);
        }
        Ok(orders)
    }
}
