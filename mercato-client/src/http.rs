//! HTTP client for the managed backend
//!
//! Tables live under `/rest/v1/{table}`, remote procedures under
//! `/rest/v1/rpc/{function}`. Every request carries the `apikey` header and
//! a bearer token (the user's access token, or the API key when signed out).

use crate::{ClientConfig, ClientError, ClientResult, Query};
use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

const PREFER: &str = "Prefer";

/// Backend client
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
    api_key: String,
    access_token: Option<String>,
}

impl BackendClient {
    /// Create a new client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            access_token: config.access_token.clone(),
        })
    }

    /// Set the user's access token
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn rpc_url(&self, function: &str) -> String {
        format!("{}/rest/v1/rpc/{}", self.base_url, function)
    }

    /// Public URL of an object in a public storage bucket
    pub fn storage_public_url(&self, bucket: &str, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url,
            bucket,
            path.trim_start_matches('/')
        )
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let bearer = self.access_token.as_deref().unwrap_or(&self.api_key);
        self.client
            .request(method, url)
            .header("apikey", &self.api_key)
            .header(reqwest::header::AUTHORIZATION, format!("Bearer {}", bearer))
            .header(reqwest::header::ACCEPT, "application/json")
    }

    // ========== Table access ==========

    /// Rows matching `query`
    pub async fn select<T: DeserializeOwned>(&self, table: &str, query: &Query) -> ClientResult<Vec<T>> {
        debug!(table, "select");
        let response = self
            .request(Method::GET, &self.table_url(table))
            .query(&query.to_params())
            .send()
            .await?;
        Self::handle_response(response, table).await
    }

    /// First row matching `query`, if any
    pub async fn select_one<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &Query,
    ) -> ClientResult<Option<T>> {
        let rows: Vec<T> = self.select(table, &query.clone().limit(1)).await?;
        Ok(rows.into_iter().next())
    }

    /// Insert one row (or an array of rows) and return what was stored
    pub async fn insert<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        table: &str,
        body: &B,
    ) -> ClientResult<Vec<T>> {
        debug!(table, "insert");
        let response = self
            .request(Method::POST, &self.table_url(table))
            .header(PREFER, "return=representation")
            .json(body)
            .send()
            .await?;
        Self::handle_response(response, table).await
    }

    /// Insert, merging with existing rows that collide on `on_conflict`
    /// (comma-separated unique columns)
    pub async fn upsert<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        table: &str,
        body: &B,
        on_conflict: &str,
    ) -> ClientResult<Vec<T>> {
        debug!(table, on_conflict, "upsert");
        let response = self
            .request(Method::POST, &self.table_url(table))
            .header(PREFER, "resolution=merge-duplicates,return=representation")
            .query(&[("on_conflict", on_conflict)])
            .json(body)
            .send()
            .await?;
        Self::handle_response(response, table).await
    }

    /// Patch the rows matching `query`. An unfiltered update is refused.
    pub async fn update<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        table: &str,
        query: &Query,
        body: &B,
    ) -> ClientResult<Vec<T>> {
        Self::require_filters(table, query, "update")?;
        debug!(table, "update");
        let response = self
            .request(Method::PATCH, &self.table_url(table))
            .header(PREFER, "return=representation")
            .query(&query.filter_params())
            .json(body)
            .send()
            .await?;
        Self::handle_response(response, table).await
    }

    /// Delete the rows matching `query`. An unfiltered delete is refused.
    pub async fn delete(&self, table: &str, query: &Query) -> ClientResult<()> {
        Self::require_filters(table, query, "delete")?;
        debug!(table, "delete");
        let response = self
            .request(Method::DELETE, &self.table_url(table))
            .header(PREFER, "return=minimal")
            .query(&query.filter_params())
            .send()
            .await?;
        Self::handle_response::<serde_json::Value>(response, table).await?;
        Ok(())
    }

    /// Call a remote procedure with named arguments
    pub async fn rpc<T: DeserializeOwned, A: Serialize + ?Sized>(
        &self,
        function: &str,
        args: &A,
    ) -> ClientResult<T> {
        debug!(function, "rpc");
        let response = self
            .request(Method::POST, &self.rpc_url(function))
            .json(args)
            .send()
            .await?;
        Self::handle_response(response, function).await
    }

    fn require_filters(table: &str, query: &Query, op: &str) -> ClientResult<()> {
        if query.has_filters() {
            Ok(())
        } else {
            Err(ClientError::Validation(format!(
                "refusing to {} every row of {}",
                op, table
            )))
        }
    }

    /// Handle the HTTP response
    ///
    /// An empty success body (204, `return=minimal`, void RPC) parses as
    /// JSON `null`.
    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
        relation: &str,
    ) -> ClientResult<T> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(crate::error::parse_backend_error(status, &text, relation));
        }

        let body = if text.trim().is_empty() { "null" } else { text.as_str() };
        serde_json::from_str(body).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> BackendClient {
        ClientConfig::new("https://project.example.co/", "anon-key")
            .build()
            .unwrap()
    }

    #[test]
    fn test_urls() {
        let c = client();
        assert_eq!(c.base_url(), "https://project.example.co");
        assert_eq!(c.table_url("orders"), "https://project.example.co/rest/v1/orders");
        assert_eq!(
            c.rpc_url("increment_promo_usage"),
            "https://project.example.co/rest/v1/rpc/increment_promo_usage"
        );
        assert_eq!(
            c.storage_public_url("menu-images", "/r1/pizza.jpg"),
            "https://project.example.co/storage/v1/object/public/menu-images/r1/pizza.jpg"
        );
    }

    #[test]
    fn test_access_token() {
        let c = client();
        assert!(c.access_token().is_none());
        let c = c.with_access_token("user-jwt");
        assert_eq!(c.access_token(), Some("user-jwt"));
    }

    #[tokio::test]
    async fn test_unfiltered_delete_is_refused() {
        let err = client().delete("favorites", &Query::new()).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
    }
}
