//! 订单核心
//!
//! [`OrderService`] runs every order mutation as a single SQLite
//! transaction. The first statement of each unit of work is a write
//! (the order row, or the acting user for a new order), so the database
//! write lock serialises competing mutations before any balance is read.
//! Lines, balances and status then change together or not at all.
//!
//! - [`ledger`] - ticket debit / credit
//! - `lines` - order-line manager (add / update / delete)
//! - `lifecycle` - create, status transitions, delete

mod error;
pub mod ledger;
mod lifecycle;
mod lines;

pub use error::{OrderError, OrderResult};

use shared::models::{Beverage, Order, OrderDetail};
use sqlx::{SqliteConnection, SqlitePool};

use crate::db::repository::{
    beverage as beverage_repo, order as order_repo, order_drink as line_repo, user as user_repo,
};

/// Order and ticket workflow over the shared SQLite pool
#[derive(Clone)]
pub struct OrderService {
    pool: SqlitePool,
}

impl OrderService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Claim the order row for this transaction and load it
async fn lock_order(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    id: i64,
    now: i64,
) -> OrderResult<Order> {
    if !order_repo::touch(tx, id, now).await? {
        return Err(OrderError::OrderNotFound(id));
    }
    order_repo::find_by_id(&mut **tx, id)
        .await?
        .ok_or(OrderError::OrderNotFound(id))
}

fn ensure_pending(order: &Order) -> OrderResult<()> {
    if order.status.is_pending() {
        Ok(())
    } else {
        Err(OrderError::NotPending {
            order_id: order.id,
            status: order.status,
        })
    }
}

async fn active_beverage(conn: &mut SqliteConnection, id: i64) -> OrderResult<Beverage> {
    match beverage_repo::find_by_id(conn, id).await? {
        Some(beverage) if beverage.is_active => Ok(beverage),
        _ => Err(OrderError::BeverageUnavailable(id)),
    }
}

async fn ensure_active_user(conn: &mut SqliteConnection, user_id: i64) -> OrderResult<i64> {
    let user = user_repo::find_by_id(conn, user_id)
        .await?
        .ok_or(OrderError::UserNotFound(user_id))?;
    if !user.is_active {
        return Err(OrderError::UserInactive(user_id));
    }
    Ok(user.ticket_count)
}

/// Order with its lines and current total cost
async fn load_detail(conn: &mut SqliteConnection, id: i64) -> OrderResult<OrderDetail> {
    let order = order_repo::find_summary(&mut *conn, id)
        .await?
        .ok_or(OrderError::OrderNotFound(id))?;
    let lines = line_repo::find_by_order(&mut *conn, id).await?;
    let total_cost = lines.iter().map(|l| l.line_cost).sum();
    Ok(OrderDetail {
        order,
        lines,
        total_cost,
    })
}

/// Debit the owner and persist one new line. Returns `(line_id, balance)`.
async fn insert_line(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    owner_id: i64,
    order_id: i64,
    beverage_id: i64,
    quantity: i64,
    now: i64,
) -> OrderResult<(i64, i64)> {
    let beverage = active_beverage(tx, beverage_id).await?;
    let cost = ledger::line_cost(quantity, beverage.price)?;
    let balance = ledger::debit(tx, owner_id, cost, now).await?;
    let line_id = line_repo::insert(tx, order_id, beverage_id, quantity, now).await?;
    Ok((line_id, balance))
}


#[cfg(test)]
mod tests {
    use super::testing::fixture;
    use shared::models::{OrderCreate, OrderDrinkCreate, OrderDrinkUpdate, OrderPatch, OrderStatus};

    use crate::utils::ErrorCode;

    #[tokio::test]
    async fn ticket_scenario_balances_add_update_delete_and_reject() {
        let f = fixture(100).await;
        let created = f
            .service
            .create_order(
                &f.customer,
                OrderCreate {
                    room_id: f.room,
                    notes: None,
                    lines: vec![],
                },
            )
            .await
            .unwrap();
        let order_id = created.order.order.id;
        assert_eq!(created.ticket_count, 100);

        let tea_line = f
            .service
            .add_line(
                &f.customer,
                OrderDrinkCreate {
                    order_id,
                    beverage_id: f.tea,
                    quantity: 2,
                },
            )
            .await
            .unwrap();
        assert_eq!(tea_line.ticket_count, 40);

        let coffee_line = f
            .service
            .add_line(
                &f.customer,
                OrderDrinkCreate {
                    order_id,
                    beverage_id: f.coffee,
                    quantity: 1,
                },
            )
            .await
            .unwrap();
        assert_eq!(coffee_line.ticket_count, 20);

        let err = f
            .service
            .update_line(
                &f.customer,
                coffee_line.line.id,
                OrderDrinkUpdate {
                    beverage_id: None,
                    quantity: Some(3),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientBalance);
        assert_eq!(f.balance(f.customer.id).await, 20);
        let unchanged = f
            .service
            .get_line(&f.customer, coffee_line.line.id)
            .await
            .unwrap();
        assert_eq!(unchanged.quantity, 1);

        let removed = f
            .service
            .delete_line(&f.customer, tea_line.line.id)
            .await
            .unwrap();
        assert_eq!(removed.refunded, 60);
        assert_eq!(removed.ticket_count, 80);

        let rejected = f
            .service
            .patch_order(
                &f.admin,
                order_id,
                OrderPatch {
                    status: Some("Rejected".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(rejected.order.status, OrderStatus::Rejected);
        assert_eq!(f.balance(f.customer.id).await, 100);
    }
}
