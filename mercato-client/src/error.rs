//! Client error types
//!
//! Backend failures are mapped from the HTTP status and the backend's JSON
//! error body (`{"code": "...", "message": "...", "details": ..., "hint": ...}`).
//! A missing table or function is reported as [`ClientError::NotProvisioned`]
//! so list views can degrade to empty instead of failing.

use reqwest::StatusCode;
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;
use tracing::warn;

/// Backend codes meaning the relation or function does not exist
const NOT_PROVISIONED_CODES: &[&str] = &["42P01", "PGRST205", "42883", "PGRST202"];

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Authentication required
    #[error("Authentication required")]
    Unauthorized,

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request rejected as invalid, or refused locally before sending
    #[error("Validation error: {0}")]
    Validation(String),

    /// The table or function has not been created on the backend
    #[error("Relation not provisioned: {0}")]
    NotProvisioned(String),

    /// Any other backend error
    #[error("Backend error {status} ({code}): {message}")]
    Backend {
        status: u16,
        code: String,
        message: String,
    },

    /// Response did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    pub fn is_not_provisioned(&self) -> bool {
        matches!(self, ClientError::NotProvisioned(_))
    }
}

#[derive(Debug, Default, Deserialize)]
struct BackendErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    hint: Option<String>,
}

/// Map a failed response to a [`ClientError`]
///
/// `relation` names the table or function the request targeted.
pub fn parse_backend_error(status: StatusCode, body: &str, relation: &str) -> ClientError {
    let parsed: BackendErrorBody = serde_json::from_str(body).unwrap_or_default();
    let code = parsed.code.unwrap_or_default();
    let message = parsed
        .message
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.trim().to_string());

    let missing_relation = NOT_PROVISIONED_CODES.contains(&code.as_str())
        || (message.contains("relation") && message.contains("does not exist"));
    if missing_relation {
        return ClientError::NotProvisioned(relation.to_string());
    }

    match status {
        StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
        StatusCode::FORBIDDEN => ClientError::Forbidden(message),
        StatusCode::NOT_FOUND => ClientError::NotFound(message),
        StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
            match parsed.hint {
                Some(hint) if !hint.is_empty() => {
                    ClientError::Validation(format!("{} ({})", message, hint))
                }
                _ => ClientError::Validation(message),
            }
        }
        _ => ClientError::Backend {
            status: status.as_u16(),
            code,
            message,
        },
    }
}

/// Degrade policy for list queries
pub trait DegradeExt<T> {
    /// Treat a missing relation as an empty list, logging a warning.
    /// Every other error is returned unchanged.
    fn or_empty_if_unprovisioned(self) -> ClientResult<Vec<T>>;
}

impl<T> DegradeExt<T> for ClientResult<Vec<T>> {
    fn or_empty_if_unprovisioned(self) -> ClientResult<Vec<T>> {
        match self {
            Err(ClientError::NotProvisioned(relation)) => {
                warn!(relation = %relation, "Relation not provisioned, returning no rows");
                Ok(Vec::new())
            }
            other => other,
        }
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Http(e) => {
                AppError::with_message(ErrorCode::BackendUnavailable, e.to_string())
            }
            ClientError::Unauthorized => AppError::new(ErrorCode::NotAuthenticated),
            ClientError::Forbidden(msg) => AppError::with_message(ErrorCode::PermissionDenied, msg),
            ClientError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            ClientError::Validation(msg) => AppError::validation(msg),
            ClientError::NotProvisioned(relation) => AppError::with_message(
                ErrorCode::RelationNotProvisioned,
                format!("{} is not available", relation),
            )
            .with_detail("relation", relation),
            ClientError::Backend {
                status,
                code,
                message,
            } => AppError::with_message(ErrorCode::BackendRejected, message)
                .with_detail("status", status)
                .with_detail("code", code),
            ClientError::InvalidResponse(msg) => {
                AppError::with_message(ErrorCode::InvalidResponse, msg)
            }
            ClientError::Serialization(e) => {
                AppError::with_message(ErrorCode::InvalidResponse, e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_table_codes() {
        let body = r#"{"code":"42P01","details":null,"hint":null,"message":"relation \"public.favorites\" does not exist"}"#;
        let err = parse_backend_error(StatusCode::NOT_FOUND, body, "favorites");
        assert!(matches!(err, ClientError::NotProvisioned(ref r) if r == "favorites"));

        let body = r#"{"code":"PGRST205","message":"Could not find the table 'public.experiments' in the schema cache"}"#;
        let err = parse_backend_error(StatusCode::NOT_FOUND, body, "experiments");
        assert!(err.is_not_provisioned());

        let body = r#"{"code":"PGRST202","message":"Could not find the function public.increment_promo_usage"}"#;
        assert!(parse_backend_error(StatusCode::NOT_FOUND, body, "increment_promo_usage").is_not_provisioned());
    }

    #[test]
    fn test_message_only_missing_relation() {
        let body = r#"{"message":"relation \"orders\" does not exist"}"#;
        assert!(parse_backend_error(StatusCode::BAD_REQUEST, body, "orders").is_not_provisioned());
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            parse_backend_error(StatusCode::UNAUTHORIZED, "", "orders"),
            ClientError::Unauthorized
        ));
        assert!(matches!(
            parse_backend_error(StatusCode::FORBIDDEN, r#"{"message":"rls"}"#, "orders"),
            ClientError::Forbidden(ref m) if m == "rls"
        ));

        let body = r#"{"code":"23505","message":"duplicate key","hint":"use upsert"}"#;
        assert!(matches!(
            parse_backend_error(StatusCode::CONFLICT, body, "favorites"),
            ClientError::Validation(ref m) if m == "duplicate key (use upsert)"
        ));

        let err = parse_backend_error(StatusCode::SERVICE_UNAVAILABLE, "upstream down", "orders");
        match err {
            ClientError::Backend {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 503);
                assert!(code.is_empty());
                assert_eq!(message, "upstream down");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_degrade_only_affects_not_provisioned() {
        let rows: ClientResult<Vec<i32>> = Err(ClientError::NotProvisioned("t".into()));
        assert!(rows.or_empty_if_unprovisioned().unwrap().is_empty());

        let rows: ClientResult<Vec<i32>> = Ok(vec![1, 2]);
        assert_eq!(rows.or_empty_if_unprovisioned().unwrap(), vec![1, 2]);

        let rows: ClientResult<Vec<i32>> = Err(ClientError::Unauthorized);
        assert!(matches!(
            rows.or_empty_if_unprovisioned(),
            Err(ClientError::Unauthorized)
        ));
    }

    #[test]
    fn test_into_app_error() {
        let err: AppError = ClientError::NotProvisioned("favorites".into()).into();
        assert_eq!(err.code, ErrorCode::RelationNotProvisioned);
        assert_eq!(err.details.unwrap()["relation"], "favorites");

        let err: AppError = ClientError::Unauthorized.into();
        assert_eq!(err.code, ErrorCode::NotAuthenticated);

        let err: AppError = ClientError::Backend {
            status: 500,
            code: "XX000".into(),
            message: "boom".into(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::BackendRejected);
        assert_eq!(err.message, "boom");
    }
}
