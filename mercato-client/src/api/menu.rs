use super::{MENU_ITEMS, ensure_row, non_negative, require_id};
use crate::{BackendClient, ClientResult, DegradeExt, Query};
use shared::models::MenuItem;

impl BackendClient {
    /// Available items of a restaurant's menu, grouped by category
    pub async fn menu_items(&self, restaurant_id: &str) -> ClientResult<Vec<MenuItem>> {
        require_id("restaurant id", restaurant_id)?;
        let query = Query::new()
            .eq("restaurant_id", restaurant_id)
            .eq("is_available", true)
            .order("category", true)
            .order("name", true);

        let rows: Vec<MenuItem> = self
            .select(MENU_ITEMS, &query)
            .await
            .or_empty_if_unprovisioned()?;

        for item in &rows {
            ensure_row(!item.id.trim().is_empty(), MENU_ITEMS, || "row without id".to_string())?;
            ensure_row(non_negative(item.price), MENU_ITEMS, || {
                format!("negative price for {}", item.id)
            })?;
            ensure_row(item.restaurant_id == restaurant_id, MENU_ITEMS, || {
                format!("{} belongs to {}", item.id, item.restaurant_id)
            })?;
        }
        Ok(rows)
    }

    pub async fn get_menu_item(&self, id: &str) -> ClientResult<Option<MenuItem>> {
        require_id("menu item id", id)?;
        let row: Option<MenuItem> = self.select_one(MENU_ITEMS, &Query::new().eq("id", id)).await?;
        if let Some(item) = &row {
            ensure_row(non_negative(item.price), MENU_ITEMS, || {
                format!("negative price for {}", item.id)
            })?;
        }
        Ok(row)
    }
}
