//! Order-line manager
//!
//! Lines can only change while their order is Pending. Each change moves
//! the owner's balance by exactly the cost difference, priced at the
//! beverage's current price.

use shared::models::{LineChanged, LineRemoved, OrderDrinkCreate, OrderDrinkDetail, OrderDrinkUpdate};
use shared::util::now_millis;
use tracing::info;

use super::{
    OrderError, OrderService, active_beverage, ensure_active_user, ensure_pending, insert_line,
    ledger,
};
use crate::auth::{CurrentUser, policy};
use crate::db::repository::{beverage as beverage_repo, order as order_repo, order_drink as line_repo};
use crate::utils::AppResult;
use crate::utils::validation::validate_quantity;

impl OrderService {
    /// Add `quantity` units of a beverage to a pending order, debiting the owner
    pub async fn add_line(&self, actor: &CurrentUser, data: OrderDrinkCreate) -> AppResult<LineChanged> {
        validate_quantity(data.quantity)?;

        let now = now_millis();
        let mut tx = self.pool.begin().await?;
        if !order_repo::touch(&mut tx, data.order_id, now).await? {
            return Err(OrderError::UnknownReference {
                field: "order_id",
                id: data.order_id,
            }
            .into());
        }
        let order = order_repo::find_by_id(&mut *tx, data.order_id)
            .await?
            .ok_or(OrderError::OrderNotFound(data.order_id))?;
        policy::authorize(actor, order.user_id, "order", order.id)?;
        ensure_pending(&order)?;
        ensure_active_user(&mut tx, actor.id).await?;

        let (line_id, balance) = insert_line(
            &mut tx,
            order.user_id,
            order.id,
            data.beverage_id,
            data.quantity,
            now,
        )
        .await?;
        let line = line_repo::find_detail(&mut *tx, line_id)
            .await?
            .ok_or(OrderError::LineNotFound(line_id))?;
        tx.commit().await?;

        info!(
            order_id = order.id,
            line_id,
            user_id = order.user_id,
            amount = line.line_cost,
            balance,
            "Order line added"
        );
        Ok(LineChanged {
            line,
            ticket_count: balance,
        })
    }

    /// Re-cost a line: refund its old cost, then debit the new one.
    ///
    /// Missing fields keep their current value. Either step failing rolls
    /// the whole update back, refund included.
    pub async fn update_line(
        &self,
        actor: &CurrentUser,
        line_id: i64,
        data: OrderDrinkUpdate,
    ) -> AppResult<LineChanged> {
        if let Some(quantity) = data.quantity {
            validate_quantity(quantity)?;
        }

        let now = now_millis();
        let mut tx = self.pool.begin().await?;
        if !order_repo::touch_by_line(&mut tx, line_id, now).await? {
            return Err(OrderError::LineNotFound(line_id).into());
        }
        let line = line_repo::find_by_id(&mut *tx, line_id)
            .await?
            .ok_or(OrderError::LineNotFound(line_id))?;
        let order = order_repo::find_by_id(&mut *tx, line.order_id)
            .await?
            .ok_or(OrderError::OrderNotFound(line.order_id))?;
        policy::authorize(actor, order.user_id, "order_line", line_id)?;
        ensure_pending(&order)?;

        let old_price = beverage_repo::find_by_id(&mut *tx, line.beverage_id)
            .await?
            .map(|b| b.price)
            .ok_or(OrderError::BeverageUnavailable(line.beverage_id))?;
        let old_cost = ledger::line_cost(line.quantity, old_price)?;
        ledger::credit(&mut tx, order.user_id, old_cost, now).await?;

        let beverage_id = data.beverage_id.unwrap_or(line.beverage_id);
        let quantity = data.quantity.unwrap_or(line.quantity);
        let beverage = active_beverage(&mut tx, beverage_id).await?;
        let new_cost = ledger::line_cost(quantity, beverage.price)?;
        let balance = ledger::debit(&mut tx, order.user_id, new_cost, now).await?;

        line_repo::update(&mut tx, line_id, beverage_id, quantity, now).await?;
        let updated = line_repo::find_detail(&mut *tx, line_id)
            .await?
            .ok_or(OrderError::LineNotFound(line_id))?;
        tx.commit().await?;

        info!(
            order_id = order.id,
            line_id,
            user_id = order.user_id,
            refunded = old_cost,
            amount = new_cost,
            balance,
            "Order line updated"
        );
        Ok(LineChanged {
            line: updated,
            ticket_count: balance,
        })
    }

    /// Remove a line and refund its current cost
    pub async fn delete_line(&self, actor: &CurrentUser, line_id: i64) -> AppResult<LineRemoved> {
        let now = now_millis();
        let mut tx = self.pool.begin().await?;
        if !order_repo::touch_by_line(&mut tx, line_id, now).await? {
            return Err(OrderError::LineNotFound(line_id).into());
        }
        let line = line_repo::find_detail(&mut *tx, line_id)
            .await?
            .ok_or(OrderError::LineNotFound(line_id))?;
        let order = order_repo::find_by_id(&mut *tx, line.order_id)
            .await?
            .ok_or(OrderError::OrderNotFound(line.order_id))?;
        policy::authorize(actor, order.user_id, "order_line", line_id)?;
        ensure_pending(&order)?;

        let refunded = ledger::line_cost(line.quantity, line.unit_price)?;
        let balance = ledger::credit(&mut tx, order.user_id, refunded, now).await?;
        line_repo::delete(&mut tx, line_id).await?;
        tx.commit().await?;

        info!(
            order_id = order.id,
            line_id,
            user_id = order.user_id,
            amount = refunded,
            balance,
            "Order line removed"
        );
        Ok(LineRemoved {
            id: line_id,
            refunded,
            ticket_count: balance,
        })
    }

    pub async fn get_line(&self, actor: &CurrentUser, line_id: i64) -> AppResult<OrderDrinkDetail> {
        let line = line_repo::find_detail(&self.pool, line_id)
            .await?
            .ok_or(OrderError::LineNotFound(line_id))?;
        let order = order_repo::find_by_id(&self.pool, line.order_id)
            .await?
            .ok_or(OrderError::OrderNotFound(line.order_id))?;
        policy::authorize(actor, order.user_id, "order_line", line_id)?;
        Ok(line)
    }

    pub async fn lines_by_order(&self, actor: &CurrentUser, order_id: i64) -> AppResult<Vec<OrderDrinkDetail>> {
        let order = order_repo::find_by_id(&self.pool, order_id)
            .await?
            .ok_or(OrderError::OrderNotFound(order_id))?;
        policy::authorize(actor, order.user_id, "order", order_id)?;
        Ok(line_repo::find_by_order(&self.pool, order_id).await?)
    }

    /// Every line of every order (admin view)
    pub async fn list_lines(&self) -> AppResult<Vec<OrderDrinkDetail>> {
        Ok(line_repo::find_all(&self.pool).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{actor, fixture};
    use crate::db::repository::{beverage as beverage_repo, testing};
    use crate::utils::ErrorCode;
    use shared::models::{
        BeverageUpdate, OrderCreate, OrderDrinkCreate, OrderDrinkUpdate, OrderPatch, Role,
    };

    async fn open_order(f: &super::super::testing::Fixture) -> i64 {
        f.service
            .create_order(
                &f.customer,
                OrderCreate {
                    room_id: f.room,
                    notes: Some("iki sekerli".into()),
                    lines: vec![],
                },
            )
            .await
            .unwrap()
            .order
            .order
            .id
    }

    fn add(order_id: i64, beverage_id: i64, quantity: i64) -> OrderDrinkCreate {
        OrderDrinkCreate {
            order_id,
            beverage_id,
            quantity,
        }
    }

    #[tokio::test]
    async fn update_line_moves_balance_by_cost_difference() {
        let f = fixture(100).await;
        let order_id = open_order(&f).await;
        let line = f
            .service
            .add_line(&f.customer, add(order_id, f.coffee, 1))
            .await
            .unwrap();
        assert_eq!(line.ticket_count, 80);

        let changed = f
            .service
            .update_line(
                &f.customer,
                line.line.id,
                OrderDrinkUpdate {
                    beverage_id: Some(f.tea),
                    quantity: Some(2),
                },
            )
            .await
            .unwrap();
        assert_eq!(changed.line.beverage_id, f.tea);
        assert_eq!(changed.line.line_cost, 60);
        assert_eq!(changed.ticket_count, 40);
    }

    #[tokio::test]
    async fn update_with_no_fields_recosts_in_place() {
        let f = fixture(100).await;
        let order_id = open_order(&f).await;
        let line = f
            .service
            .add_line(&f.customer, add(order_id, f.tea, 1))
            .await
            .unwrap();

        let changed = f
            .service
            .update_line(&f.customer, line.line.id, OrderDrinkUpdate::default())
            .await
            .unwrap();
        assert_eq!(changed.line.quantity, 1);
        assert_eq!(changed.ticket_count, 70);
    }

    #[tokio::test]
    async fn non_positive_quantities_are_rejected_before_any_change() {
        let f = fixture(100).await;
        let order_id = open_order(&f).await;

        for quantity in [0, -2] {
            let err = f
                .service
                .add_line(&f.customer, add(order_id, f.tea, quantity))
                .await
                .unwrap_err();
            assert_eq!(err.code, ErrorCode::ValidationFailed);
        }
        assert_eq!(f.balance(f.customer.id).await, 100);
    }

    #[tokio::test]
    async fn insufficient_balance_creates_no_line() {
        let f = fixture(50).await;
        let order_id = open_order(&f).await;

        let err = f
            .service
            .add_line(&f.customer, add(order_id, f.tea, 2))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientBalance);
        let details = err.details.unwrap();
        assert_eq!(details["required"], 60);
        assert_eq!(details["available"], 50);

        assert_eq!(f.balance(f.customer.id).await, 50);
        let lines = f.service.lines_by_order(&f.customer, order_id).await.unwrap();
        assert!(lines.is_empty());
    }

    #[tokio::test]
    async fn inactive_or_missing_beverage_is_unavailable() {
        let f = fixture(100).await;
        let order_id = open_order(&f).await;
        beverage_repo::toggle_active(&f.pool, f.tea).await.unwrap();

        let err = f
            .service
            .add_line(&f.customer, add(order_id, f.tea, 1))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::BeverageUnavailable);

        let err = f
            .service
            .add_line(&f.customer, add(order_id, 9999, 1))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::BeverageUnavailable);
        assert_eq!(f.balance(f.customer.id).await, 100);
    }

    #[tokio::test]
    async fn unknown_order_reference_is_a_bad_request() {
        let f = fixture(100).await;
        let err = f
            .service
            .add_line(&f.customer, add(404, f.tea, 1))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn other_users_cannot_touch_lines() {
        let f = fixture(100).await;
        let order_id = open_order(&f).await;
        let line = f
            .service
            .add_line(&f.customer, add(order_id, f.tea, 1))
            .await
            .unwrap();
        let other_id = testing::seed_user(&f.pool, "mehmet", Role::User, 100).await;
        let other = actor(other_id, "mehmet", Role::User);

        let err = f
            .service
            .add_line(&other, add(order_id, f.tea, 1))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
        let err = f.service.delete_line(&other, line.line.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
        let err = f.service.get_line(&other, line.line.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);

        // admin acts on the owner's balance
        let removed = f.service.delete_line(&f.admin, line.line.id).await.unwrap();
        assert_eq!(removed.ticket_count, 100);
        assert_eq!(f.balance(f.admin.id).await, 0);
    }

    #[tokio::test]
    async fn lines_of_a_finalized_order_are_frozen() {
        let f = fixture(100).await;
        let order_id = open_order(&f).await;
        let line = f
            .service
            .add_line(&f.customer, add(order_id, f.tea, 1))
            .await
            .unwrap();
        f.service
            .patch_order(
                &f.admin,
                order_id,
                OrderPatch {
                    status: Some("Approved".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let err = f
            .service
            .add_line(&f.customer, add(order_id, f.coffee, 1))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderNotPending);
        let err = f
            .service
            .update_line(
                &f.customer,
                line.line.id,
                OrderDrinkUpdate {
                    beverage_id: None,
                    quantity: Some(2),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderNotPending);
        let err = f.service.delete_line(&f.customer, line.line.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderNotPending);

        assert_eq!(f.balance(f.customer.id).await, 70);
        // approved lines stay readable
        assert_eq!(f.service.get_line(&f.customer, line.line.id).await.unwrap().quantity, 1);
    }

    #[tokio::test]
    async fn refunds_use_the_current_price() {
        let f = fixture(100).await;
        let order_id = open_order(&f).await;
        let line = f
            .service
            .add_line(&f.customer, add(order_id, f.tea, 2))
            .await
            .unwrap();
        assert_eq!(line.ticket_count, 40);

        beverage_repo::update(
            &f.pool,
            f.tea,
            BeverageUpdate {
                price: Some(35),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let removed = f.service.delete_line(&f.customer, line.line.id).await.unwrap();
        assert_eq!(removed.refunded, 70);
        assert_eq!(removed.ticket_count, 110);
    }

    #[tokio::test]
    async fn oversized_price_is_refused_and_order_stays_refundable() {
        let f = fixture(100).await;
        let order_id = open_order(&f).await;
        f.service
            .add_line(&f.customer, add(order_id, f.tea, 2))
            .await
            .unwrap();

        let err = beverage_repo::update(
            &f.pool,
            f.tea,
            BeverageUpdate {
                price: Some(i64::MAX / 2 + 1),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, crate::db::repository::RepoError::Validation(_)));

        let detail = f.service.get_order(&f.customer, order_id).await.unwrap();
        assert_eq!(detail.total_cost, 60);
        f.service
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
        assert_eq!(f.balance(f.customer.id).await, 100);
    }

    #[tokio::test]
    async fn inactive_users_cannot_add_lines() {
        let f = fixture(100).await;
        let order_id = open_order(&f).await;
        crate::db::repository::user::set_active(&f.pool, f.customer.id, false)
            .await
            .unwrap();

        let err = f
            .service
            .add_line(&f.customer, add(order_id, f.tea, 1))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::UserInactive);
    }

    #[tokio::test]
    async fn missing_lines_are_not_found() {
        let f = fixture(100).await;
        let err = f
            .service
            .update_line(&f.customer, 77, OrderDrinkUpdate::default())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderLineNotFound);
        let err = f.service.delete_line(&f.customer, 77).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderLineNotFound);
        let err = f.service.lines_by_order(&f.customer, 77).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderNotFound);
    }
}
