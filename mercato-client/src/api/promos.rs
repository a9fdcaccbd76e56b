use super::{INCREMENT_PROMO_USAGE, PROMO_CODE_USAGE, PROMO_CODES, ensure_row, non_negative, require_id};
use crate::{BackendClient, ClientResult, DegradeExt, Query};
use shared::models::{PromoCode, PromoRedemption};

impl BackendClient {
    /// Look up a promo code as typed by the user
    ///
    /// Inactive codes are returned too; the validator decides.
    pub async fn find_promo_code(&self, code: &str) -> ClientResult<Option<PromoCode>> {
        let code = PromoCode::normalize(code);
        require_id("promo code", &code)?;

        let row: Option<PromoCode> = self
            .select_one(PROMO_CODES, &Query::new().eq("code", &code))
            .await?;
        if let Some(promo) = &row {
            ensure_row(non_negative(promo.discount_value), PROMO_CODES, || {
                format!("negative discount for {}", promo.code)
            })?;
        }
        Ok(row)
    }

    /// How many times `user_id` redeemed the code
    pub async fn promo_redemption_count(&self, promo_code_id: &str, user_id: &str) -> ClientResult<i32> {
        require_id("promo code id", promo_code_id)?;
        require_id("user id", user_id)?;

        let query = Query::new()
            .select("promo_code_id")
            .eq("promo_code_id", promo_code_id)
            .eq("user_id", user_id);
        let rows: Vec<serde_json::Value> = self
            .select(PROMO_CODE_USAGE, &query)
            .await
            .or_empty_if_unprovisioned()?;
        Ok(i32::try_from(rows.len()).unwrap_or(i32::MAX))
    }

    pub async fn record_promo_redemption(&self, redemption: &PromoRedemption) -> ClientResult<()> {
        require_id("promo code id", &redemption.promo_code_id)?;
        require_id("user id", &redemption.user_id)?;
        let _: Vec<serde_json::Value> = self.insert(PROMO_CODE_USAGE, redemption).await?;
        Ok(())
    }

    /// Bump the global usage counter of a code
    pub async fn increment_promo_usage(&self, promo_code_id: &str) -> ClientResult<()> {
        require_id("promo code id", promo_code_id)?;
        let _: serde_json::Value = self
            .rpc(
                INCREMENT_PROMO_USAGE,
                &serde_json::json!({ "promo_id": promo_code_id }),
            )
            .await?;
        Ok(())
    }
}
