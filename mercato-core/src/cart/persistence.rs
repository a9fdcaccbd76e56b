//! Cart persistence
//!
//! The cart is stored as a single JSON blob under a fixed key, wrapped in a
//! versioned envelope:
//!
//! ```json
//! { "version": 2, "state": { "items": [...], "restaurant_id": "...", ... } }
//! ```
//!
//! A blob with a different version, one that does not parse, or one whose
//! cart is inconsistent is discarded on load. Bump [`CART_SCHEMA_VERSION`] whenever the stored shape changes
//! incompatibly.
//!
//! # Adapters
//!
//! | Adapter | Backing | Use |
//! |---------|---------|-----|
//! | [`MemoryCartStorage`] | `HashMap` | tests, ephemeral sessions |
//! | [`RedbCartStorage`] | redb file (`cart_state` table) | durable client storage |

use super::state::CartState;
use parking_lot::Mutex;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use serde::{Deserialize, Serialize};
use shared::error::AppError;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

/// Storage key of the persisted cart
pub const CART_STORAGE_KEY: &str = "mercato-cart";

/// Version tag of the persisted cart shape
pub const CART_SCHEMA_VERSION: u32 = 2;

/// Table for persisted blobs: key = storage key, value = JSON bytes
const CART_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("cart_state");

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::storage(err.to_string())
    }
}

/// Durable key-value blob storage for client state
pub trait CartPersistence: Send + Sync {
    fn load(&self, key: &str) -> StorageResult<Option<Vec<u8>>>;
    fn save(&self, key: &str, value: &[u8]) -> StorageResult<()>;
    fn remove(&self, key: &str) -> StorageResult<()>;
}

/// Versioned envelope written to storage
#[derive(Debug, Serialize)]
struct PersistedCartRef<'a> {
    version: u32,
    state: &'a CartState,
}

#[derive(Debug, Deserialize)]
struct PersistedCart {
    version: u32,
    state: serde_json::Value,
}

/// Serialize a cart into its versioned envelope
pub fn encode_cart(state: &CartState) -> StorageResult<Vec<u8>> {
    let envelope = PersistedCartRef {
        version: CART_SCHEMA_VERSION,
        state,
    };
    Ok(serde_json::to_vec(&envelope)?)
}

/// Parse a versioned envelope.
///
/// Returns `None` when the version does not match, the payload does not
/// parse, or the parsed cart breaks the cart invariants; the caller is
/// expected to discard the blob.
pub fn decode_cart(bytes: &[u8]) -> Option<CartState> {
    let envelope: PersistedCart = match serde_json::from_slice(bytes) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!(error = %e, "Persisted cart envelope is unreadable");
            return None;
        }
    };

    if envelope.version != CART_SCHEMA_VERSION {
        warn!(
            found = envelope.version,
            expected = CART_SCHEMA_VERSION,
            "Persisted cart has an incompatible version"
        );
        return None;
    }

    match serde_json::from_value::<CartState>(envelope.state) {
        Ok(state) if state.is_well_formed() => Some(state),
        Ok(state) => {
            warn!(
                items = state.items.len(),
                restaurant_id = ?state.restaurant_id,
                "Persisted cart is inconsistent"
            );
            None
        }
        Err(e) => {
            warn!(error = %e, "Persisted cart state does not match the current shape");
            None
        }
    }
}

/// Load the cart stored under `key`, discarding incompatible data
pub fn load_cart(persistence: &dyn CartPersistence, key: &str) -> StorageResult<Option<CartState>> {
    let Some(bytes) = persistence.load(key)? else {
        return Ok(None);
    };

    match decode_cart(&bytes) {
        Some(state) => Ok(Some(state)),
        None => {
            persistence.remove(key)?;
            Ok(None)
        }
    }
}

/// Store the cart under `key`
pub fn save_cart(
    persistence: &dyn CartPersistence,
    key: &str,
    state: &CartState,
) -> StorageResult<()> {
    let bytes = encode_cart(state)?;
    persistence.save(key, &bytes)
}

// ========== In-memory adapter ==========

/// In-memory storage
#[derive(Debug, Default, Clone)]
pub struct MemoryCartStorage {
    entries: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryCartStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CartPersistence for MemoryCartStorage {
    fn load(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn save(&self, key: &str, value: &[u8]) -> StorageResult<()> {
        self.entries.lock().insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

// ========== redb adapter ==========

/// File-backed storage using redb
///
/// Commits are durable as soon as `commit()` returns, so a cart written
/// before the process exits is available on the next start.
#[derive(Clone)]
pub struct RedbCartStorage {
    db: Arc<Database>,
}

impl std::fmt::Debug for RedbCartStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbCartStorage").finish_non_exhaustive()
    }
}

impl RedbCartStorage {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Create an in-memory database (for testing)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(CART_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }
}

impl CartPersistence for RedbCartStorage {
    fn load(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CART_TABLE)?;
        let value = table.get(key)?.map(|guard| guard.value().to_vec());
        Ok(value)
    }

    fn save(&self, key: &str, value: &[u8]) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(CART_TABLE)?;
            table.insert(key, value)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(CART_TABLE)?;
            table.remove(key)?;
        }
        write_txn.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::CartItemInput;

    const NOW: i64 = 1_750_000_000_000;

    fn sample_cart() -> CartState {
        let mut cart = CartState::new();
        cart.add_item(
            CartItemInput {
                menu_item_id: "m1".to_string(),
                name: "Margherita".to_string(),
                price: "11.50".parse().unwrap(),
                image_url: Some("https://cdn.example.com/m1.jpg".to_string()),
                restaurant_id: "r1".to_string(),
                restaurant_name: "Luigi's".to_string(),
            },
            NOW,
        );
        cart.update_instructions("m1", Some("extra basil".to_string()), NOW);
        cart
    }

    #[test]
    fn test_envelope_carries_version() {
        let bytes = encode_cart(&sample_cart()).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["version"], CART_SCHEMA_VERSION);
        assert_eq!(json["state"]["restaurant_id"], "r1");
    }

    #[test]
    fn test_decode_restores_state() {
        let cart = sample_cart();
        let restored = decode_cart(&encode_cart(&cart).unwrap()).unwrap();
        assert_eq!(restored, cart);
    }

    #[test]
    fn test_decode_rejects_other_version() {
        let bytes = br#"{"version": 1, "state": {"items": [], "restaurant_id": null, "restaurant_name": null, "expires_at": null}}"#;
        assert!(decode_cart(bytes).is_none());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_cart(b"not json").is_none());
        let wrong_shape = format!(r#"{{"version": {}, "state": {{"items": 42}}}}"#, CART_SCHEMA_VERSION);
        assert!(decode_cart(wrong_shape.as_bytes()).is_none());
    }

    fn tampered(edit: impl FnOnce(&mut serde_json::Value)) -> Vec<u8> {
        let mut json: serde_json::Value =
            serde_json::from_slice(&encode_cart(&sample_cart()).unwrap()).unwrap();
        edit(&mut json["state"]);
        serde_json::to_vec(&json).unwrap()
    }

    #[test]
    fn test_decode_rejects_inconsistent_cart() {
        let negative_quantity = tampered(|state| {
            state["items"][0]["quantity"] = (-3).into();
            state["restaurant_id"] = serde_json::Value::Null;
            state["expires_at"] = serde_json::Value::Null;
        });
        assert!(decode_cart(&negative_quantity).is_none());

        let zero_quantity = tampered(|state| state["items"][0]["quantity"] = 0.into());
        assert!(decode_cart(&zero_quantity).is_none());

        let missing_expiry = tampered(|state| state["expires_at"] = serde_json::Value::Null);
        assert!(decode_cart(&missing_expiry).is_none());

        let foreign_item = tampered(|state| state["items"][0]["restaurant_id"] = "r2".into());
        assert!(decode_cart(&foreign_item).is_none());

        let header_without_items = tampered(|state| state["items"] = serde_json::json!([]));
        assert!(decode_cart(&header_without_items).is_none());
    }

    #[test]
    fn test_load_discards_inconsistent_cart() {
        let storage = MemoryCartStorage::new();
        let bytes = tampered(|state| state["items"][0]["quantity"] = (-3).into());
        storage.save(CART_STORAGE_KEY, &bytes).unwrap();

        assert!(load_cart(&storage, CART_STORAGE_KEY).unwrap().is_none());
        assert!(storage.load(CART_STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_decode_accepts_empty_cart() {
        let bytes = encode_cart(&CartState::new()).unwrap();
        assert_eq!(decode_cart(&bytes), Some(CartState::new()));
    }

    #[test]
    fn test_load_discards_incompatible_blob() {
        let storage = MemoryCartStorage::new();
        storage
            .save(CART_STORAGE_KEY, br#"{"version": 0, "state": {}}"#)
            .unwrap();

        assert!(load_cart(&storage, CART_STORAGE_KEY).unwrap().is_none());
        assert!(storage.load(CART_STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_memory_storage_roundtrip() {
        let storage = MemoryCartStorage::new();
        assert!(load_cart(&storage, CART_STORAGE_KEY).unwrap().is_none());

        let cart = sample_cart();
        save_cart(&storage, CART_STORAGE_KEY, &cart).unwrap();
        assert_eq!(load_cart(&storage, CART_STORAGE_KEY).unwrap(), Some(cart));
    }

    #[test]
    fn test_redb_in_memory_save_load_remove() {
        let storage = RedbCartStorage::open_in_memory().unwrap();
        let cart = sample_cart();

        save_cart(&storage, CART_STORAGE_KEY, &cart).unwrap();
        assert_eq!(load_cart(&storage, CART_STORAGE_KEY).unwrap(), Some(cart));

        storage.remove(CART_STORAGE_KEY).unwrap();
        assert!(storage.load(CART_STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_redb_file_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.redb");
        let cart = sample_cart();

        {
            let storage = RedbCartStorage::open(&path).unwrap();
            save_cart(&storage, CART_STORAGE_KEY, &cart).unwrap();
        }

        let storage = RedbCartStorage::open(&path).unwrap();
        assert_eq!(load_cart(&storage, CART_STORAGE_KEY).unwrap(), Some(cart));
    }
}
