use super::{FAVORITES, require_id};
use crate::{BackendClient, ClientResult, DegradeExt, Query};
use shared::models::Favorite;

impl BackendClient {
    /// Mark a restaurant as favorite; adding twice is harmless
    pub async fn add_favorite(&self, user_id: &str, restaurant_id: &str) -> ClientResult<()> {
        require_id("user id", user_id)?;
        require_id("restaurant id", restaurant_id)?;

        let favorite = Favorite {
            user_id: user_id.to_string(),
            restaurant_id: restaurant_id.to_string(),
        };
        let _: Vec<Favorite> = self
            .upsert(FAVORITES, &favorite, "user_id,restaurant_id")
            .await?;
        Ok(())
    }

    pub async fn remove_favorite(&self, user_id: &str, restaurant_id: &str) -> ClientResult<()> {
        require_id("user id", user_id)?;
        require_id("restaurant id", restaurant_id)?;

        let query = Query::new()
            .eq("user_id", user_id)
            .eq("restaurant_id", restaurant_id);
        self.delete(FAVORITES, &query).await
    }

    pub async fn list_favorites(&self, user_id: &str) -> ClientResult<Vec<Favorite>> {
        require_id("user id", user_id)?;
        self.select(FAVORITES, &Query::new().eq("user_id", user_id))
            .await
            .or_empty_if_unprovisioned()
    }
}
