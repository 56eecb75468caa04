use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use redis::aio::ConnectionManager;
use redis::{AsyncCommands, ErrorKind, RedisError, RedisResult};
use shared::{Result, VoteError};
use tracing::warn;

pub const MEMORY_STORE_URL: &str = "memory://";

/// Accessor over the key-value store holding the vote counters.
///
/// Implementations must make `increment` atomic at the store. `reset_all`
/// defaults to one `set` per key; a concurrent increment landing between two
/// of those sets is lost, so stores with transactions should override it.
#[rocket::async_trait]
pub trait CounterStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<u64>;

    async fn set(&self, key: &str, value: u64) -> Result<()>;

    async fn increment(&self, key: &str, delta: u64) -> Result<u64>;

    /// Writes 0 when the key is absent. Returns whether a write happened.
    async fn ensure_initialized(&self, key: &str) -> Result<bool>;

    async fn reset_all(&self, keys: &[&str]) -> Result<()> {
        for key in keys {
            self.set(key, 0).await?;
        }
        Ok(())
    }
}

fn parse_counter(key: &str, raw: Option<String>) -> Result<u64> {
    let raw = raw.ok_or_else(|| VoteError::invalid_value(key, "no value stored"))?;
    raw.trim()
        .parse::<u64>()
        .map_err(|e| VoteError::invalid_value(key, format!("{raw:?}: {e}")))
}

pub struct RedisStore {
    conn: ConnectionManager,
    timeout: Duration,
}

impl RedisStore {
    pub async fn connect(url: &str, timeout: Duration) -> Result<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| VoteError::StoreUnavailable(format!("invalid store url: {e}")))?;

        let conn = match tokio::time::timeout(timeout, ConnectionManager::new(client)).await {
            Ok(conn) => conn.map_err(|e| VoteError::StoreUnavailable(e.to_string()))?,
            Err(_) => {
                return Err(VoteError::StoreUnavailable(format!(
                    "connect timed out after {}ms",
                    timeout.as_millis()
                )))
            }
        };

        Ok(Self { conn, timeout })
    }

    async fn bounded<T>(&self, key: &str, call: impl Future<Output = RedisResult<T>>) -> Result<T> {
        bounded_call(self.timeout, key, call).await
    }
}

async fn bounded_call<T>(
    timeout: Duration,
    key: &str,
    call: impl Future<Output = RedisResult<T>>,
) -> Result<T> {
    match tokio::time::timeout(timeout, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(classify(key, e)),
        Err(_) => {
            warn!(key, "Counter store call timed out");
            Err(VoteError::StoreUnavailable(format!(
                "call on {key} timed out after {}ms",
                timeout.as_millis()
            )))
        }
    }
}

fn classify(key: &str, err: RedisError) -> VoteError {
    match err.kind() {
        ErrorKind::ResponseError | ErrorKind::TypeError => VoteError::invalid_value(key, err.to_string()),
        _ => VoteError::StoreUnavailable(err.to_string()),
    }
}

#[rocket::async_trait]
impl CounterStore for RedisStore {
    async fn get(&self, key: &str) -> Result<u64> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = self.bounded(key, conn.get(key)).await?;
        parse_counter(key, raw)
    }

    async fn set(&self, key: &str, value: u64) -> Result<()> {
        let mut conn = self.conn.clone();
        let () = self.bounded(key, conn.set(key, value)).await?;
        Ok(())
    }

    async fn increment(&self, key: &str, delta: u64) -> Result<u64> {
        let mut conn = self.conn.clone();
        let value: i64 = self.bounded(key, conn.incr(key, delta)).await?;
        u64::try_from(value).map_err(|_| VoteError::invalid_value(key, format!("negative count {value}")))
    }

    async fn ensure_initialized(&self, key: &str) -> Result<bool> {
        let mut conn = self.conn.clone();
        self.bounded(key, conn.set_nx(key, 0u64)).await
    }

    async fn reset_all(&self, keys: &[&str]) -> Result<()> {
        let mut pipe = redis::pipe();
        pipe.atomic();
        for key in keys {
            pipe.set(*key, 0u64).ignore();
        }

        let mut conn = self.conn.clone();
        let label = keys.join(",");
        let () = self.bounded(&label, pipe.query_async(&mut conn)).await?;
        Ok(())
    }
}

/// In-process store. Values are kept as strings so corrupt entries can be
/// represented the same way Redis would hold them.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_counts<'a>(counts: impl IntoIterator<Item = (&'a str, u64)>) -> Self {
        let store = Self::new();
        for (key, count) in counts {
            store.insert_raw(key, count.to_string());
        }
        store
    }

    pub fn insert_raw(&self, key: &str, value: impl Into<String>) {
        if let Ok(mut values) = self.values.lock() {
            values.insert(key.to_string(), value.into());
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.lock().map(|values| values.contains_key(key)).unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.values.lock().map(|values| values.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Makes every subsequent call fail with `StoreUnavailable` until cleared.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn values(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(VoteError::StoreUnavailable("memory store offline".into()));
        }
        self.values
            .lock()
            .map_err(|_| VoteError::StoreUnavailable("memory store lock poisoned".into()))
    }
}

#[rocket::async_trait]
impl CounterStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<u64> {
        let raw = self.values()?.get(key).cloned();
        parse_counter(key, raw)
    }

    async fn set(&self, key: &str, value: u64) -> Result<()> {
        self.values()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn increment(&self, key: &str, delta: u64) -> Result<u64> {
        let mut values = self.values()?;
        let current = match values.get(key) {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|_| VoteError::invalid_value(key, "value is not an integer"))?,
            None => 0,
        };
        let next = current
            .checked_add(delta)
            .ok_or_else(|| VoteError::invalid_value(key, "counter overflow"))?;
        values.insert(key.to_string(), next.to_string());
        Ok(next)
    }

    async fn ensure_initialized(&self, key: &str) -> Result<bool> {
        let mut values = self.values()?;
        if values.contains_key(key) {
            return Ok(false);
        }
        values.insert(key.to_string(), "0".into());
        Ok(true)
    }

    async fn reset_all(&self, keys: &[&str]) -> Result<()> {
        let mut values = self.values()?;
        for key in keys {
            values.insert(key.to_string(), "0".into());
        }
        Ok(())
    }
}
