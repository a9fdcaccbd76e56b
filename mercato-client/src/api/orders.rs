use super::{ORDERS, ensure_row, non_negative, require_id};
use crate::{BackendClient, ClientError, ClientResult, DegradeExt, Query};
use shared::models::{NewOrder, OrderRecord};
use tracing::info;

fn check(order: &OrderRecord) -> ClientResult<()> {
    ensure_row(!order.id.trim().is_empty(), ORDERS, || "row without id".to_string())?;
    ensure_row(non_negative(order.total_amount), ORDERS, || {
        format!("negative total for {}", order.id)
    })
}

impl BackendClient {
    /// Submit an order draft and return the stored row
    pub async fn create_order(&self, order: &NewOrder) -> ClientResult<OrderRecord> {
        require_id("user id", &order.user_id)?;
        require_id("restaurant id", &order.restaurant_id)?;
        if order.items.is_empty() {
            return Err(ClientError::Validation("order has no items".to_string()));
        }
        if order.items.iter().any(|line| line.quantity <= 0) {
            return Err(ClientError::Validation("order line with non-positive quantity".to_string()));
        }
        if !non_negative(order.total_amount) {
            return Err(ClientError::Validation("order total is negative".to_string()));
        }

        let rows: Vec<OrderRecord> = self.insert(ORDERS, order).await?;
        let record = rows
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::InvalidResponse("insert returned no order".to_string()))?;
        check(&record)?;

        info!(order_id = %record.id, total = %record.total_amount, "Order created");
        Ok(record)
    }

    /// A user's orders, newest first
    pub async fn list_orders(&self, user_id: &str) -> ClientResult<Vec<OrderRecord>> {
        require_id("user id", user_id)?;
        let query = Query::new()
            .eq("user_id", user_id)
            .order("created_at", false);

        let rows: Vec<OrderRecord> = self
            .select(ORDERS, &query)
            .await
            .or_empty_if_unprovisioned()?;
        rows.iter().try_for_each(check)?;
        Ok(rows)
    }
}
