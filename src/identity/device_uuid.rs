//! Persistent random device identifier. A version-4 UUID stored under a
//! well-known key in a durable key-value store, created lazily on first
//! request.

use uuid::Uuid;

/// Well-known store key for the persisted identifier
pub const DEVICE_UUID_KEY: &str = "deviceUUID";

#[derive(Debug)]
pub enum StoreError {
    /// The durable store rejected a write
    WriteFailed(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::WriteFailed(reason) => write!(f, "Store write failed: {}", reason),
        }
    }
}

impl std::error::Error for StoreError {}

/// Durable key-value store, durable across process restarts. Concurrency
/// guarantees are the store's own.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Return the stored identifier, or generate, persist and return a fresh
/// version-4 UUID. On a rejected write the generated value is discarded, so
/// the next call retries fresh.
pub fn get_or_create(store: &dyn KeyValueStore) -> Result<String, StoreError> {
    if let Some(existing) = store.get(DEVICE_UUID_KEY)
        && !existing.is_empty()
    {
        return Ok(existing);
    }

    let generated = Uuid::new_v4().to_string();
    store.put(DEVICE_UUID_KEY, &generated)?;
    Ok(generated)
}
