use super::{RESTAURANTS, ensure_row, non_negative, require_id};
use crate::{BackendClient, ClientResult, DegradeExt, Query};
use shared::models::{Restaurant, ServiceType};

fn check(restaurant: &Restaurant) -> ClientResult<()> {
    ensure_row(!restaurant.id.trim().is_empty(), RESTAURANTS, || {
        "row without id".to_string()
    })?;
    ensure_row(non_negative(restaurant.delivery_fee), RESTAURANTS, || {
        format!("negative delivery fee for {}", restaurant.id)
    })
}

fn check_all(rows: Vec<Restaurant>) -> ClientResult<Vec<Restaurant>> {
    rows.iter().try_for_each(check)?;
    Ok(rows)
}

impl BackendClient {
    /// Listings for a service vertical (all verticals when `None`), best rated first
    pub async fn list_restaurants(&self, service: Option<ServiceType>) -> ClientResult<Vec<Restaurant>> {
        let mut query = Query::new();
        if let Some(service) = service {
            query = query.eq("service_type", service);
        }
        let query = query.order("rating", false).order("name", true);

        let rows = self
            .select(RESTAURANTS, &query)
            .await
            .or_empty_if_unprovisioned()?;
        check_all(rows)
    }

    /// Listings whose name contains `term` (case-insensitive)
    pub async fn search_restaurants(&self, term: &str) -> ClientResult<Vec<Restaurant>> {
        let term = term.trim();
        if term.is_empty() {
            return self.list_restaurants(None).await;
        }

        // `*` is the pattern wildcard; drop any the user typed
        let term: String = term.chars().filter(|c| *c != '*').collect();
        let query = Query::new()
            .ilike("name", format!("*{}*", term))
            .order("rating", false);

        let rows = self
            .select(RESTAURANTS, &query)
            .await
            .or_empty_if_unprovisioned()?;
        check_all(rows)
    }

    pub async fn get_restaurant(&self, id: &str) -> ClientResult<Option<Restaurant>> {
        require_id("restaurant id", id)?;
        let row: Option<Restaurant> = self.select_one(RESTAURANTS, &Query::new().eq("id", id)).await?;
        if let Some(r) = &row {
            check(r)?;
        }
        Ok(row)
    }
}
