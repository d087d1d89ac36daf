//! Test doubles shared by unit tests across the crate.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing_subscriber::layer::SubscriberExt;

use ipvault_core::cache::{pattern_matches, CacheBackend, CacheError, Result as CacheResult};
use ipvault_core::resource::{name_matches_filter, Resource, ResourceInput};
use ipvault_core::storage::{RepositoryError, ResourceRepository, Result};

/// Lets fire-and-forget cache tasks spawned by the code under test finish.
///
/// Tests run on the current-thread runtime and the test backends never park
/// on I/O, so handing the scheduler a few turns drains every spawned task.
pub async fn settle() {
    for _ in 0..64 {
        tokio::task::yield_now().await;
    }
}

// ============================================================================
// Cache backends
// ============================================================================

/// Cache backend over a plain map that records how it is used.
#[derive(Default)]
pub struct MockCacheBackend {
    entries: RwLock<HashMap<String, (Vec<u8>, Duration)>>,
    pub get_calls: AtomicUsize,
    pub delete_many_calls: AtomicUsize,
    pub fail_delete_many: AtomicBool,
    patterns: Mutex<Vec<String>>,
}

impl MockCacheBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expiration the key was last stored with.
    pub async fn ttl_of(&self, key: &str) -> Option<Duration> {
        self.entries.read().await.get(key).map(|(_, ttl)| *ttl)
    }

    /// Stored payload, bypassing the call counters.
    pub async fn peek(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.read().await.get(key).map(|(value, _)| value.clone())
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Patterns passed to `keys`, in call order.
    pub fn patterns(&self) -> Vec<String> {
        self.patterns.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl CacheBackend for MockCacheBackend {
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.peek(key).await)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> CacheResult<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), (value.to_vec(), ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<u64> {
        Ok(u64::from(self.entries.write().await.remove(key).is_some()))
    }

    async fn keys(&self, pattern: &str) -> CacheResult<Vec<String>> {
        if let Ok(mut patterns) = self.patterns.lock() {
            patterns.push(pattern.to_string());
        }
        Ok(self
            .entries
            .read()
            .await
            .keys()
            .filter(|key| pattern_matches(pattern, key))
            .cloned()
            .collect())
    }

    async fn delete_many(&self, keys: &[String]) -> CacheResult<u64> {
        self.delete_many_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_delete_many.load(Ordering::SeqCst) {
            return Err(CacheError::OperationFailed("DEL rejected".to_string()));
        }
        let mut entries = self.entries.write().await;
        Ok(keys
            .iter()
            .filter(|key| entries.remove(key.as_str()).is_some())
            .count() as u64)
    }

    async fn flush_all(&self) -> CacheResult<String> {
        self.entries.write().await.clear();
        Ok("OK".to_string())
    }

    async fn close(&self) -> CacheResult<()> {
        Ok(())
    }
}

/// Cache backend whose every operation fails as if the server were down.
pub struct FailingCacheBackend;

impl FailingCacheBackend {
    fn offline<T>() -> CacheResult<T> {
        Err(CacheError::ConnectionFailed("connection refused".to_string()))
    }
}

#[async_trait]
impl CacheBackend for FailingCacheBackend {
    async fn get(&self, _key: &str) -> CacheResult<Option<Vec<u8>>> {
        Self::offline()
    }

    async fn set(&self, _key: &str, _value: &[u8], _ttl: Duration) -> CacheResult<()> {
        Self::offline()
    }

    async fn delete(&self, _key: &str) -> CacheResult<u64> {
        Self::offline()
    }

    async fn keys(&self, _pattern: &str) -> CacheResult<Vec<String>> {
        Self::offline()
    }

    async fn delete_many(&self, _keys: &[String]) -> CacheResult<u64> {
        Self::offline()
    }

    async fn flush_all(&self) -> CacheResult<String> {
        Self::offline()
    }

    async fn close(&self) -> CacheResult<()> {
        Self::offline()
    }
}

/// Cache backend that answers reads as misses and never completes a write.
pub struct HangingCacheBackend;

#[async_trait]
impl CacheBackend for HangingCacheBackend {
    async fn get(&self, _key: &str) -> CacheResult<Option<Vec<u8>>> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &[u8], _ttl: Duration) -> CacheResult<()> {
        std::future::pending().await
    }

    async fn delete(&self, _key: &str) -> CacheResult<u64> {
        std::future::pending().await
    }

    async fn keys(&self, _pattern: &str) -> CacheResult<Vec<String>> {
        std::future::pending().await
    }

    async fn delete_many(&self, _keys: &[String]) -> CacheResult<u64> {
        std::future::pending().await
    }

    async fn flush_all(&self) -> CacheResult<String> {
        std::future::pending().await
    }

    async fn close(&self) -> CacheResult<()> {
        std::future::pending().await
    }
}

// ============================================================================
// Repository
// ============================================================================

/// Resource repository that tracks calls and can be told to misbehave.
#[derive(Default)]
pub struct MockResourceRepository {
    resources: RwLock<BTreeMap<i64, Resource>>,
    next_id: AtomicI64,
    pub find_by_id_calls: AtomicUsize,
    pub find_page_calls: AtomicUsize,
    pub count_calls: AtomicUsize,
    /// When set, writes report zero affected rows.
    pub return_no_rows: AtomicBool,
    /// When set, every call fails with this error.
    pub failure: Mutex<Option<RepositoryError>>,
}

impl MockResourceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts resources named `{prefix}-{n}` directly, bypassing call counters.
    pub async fn seed(&self, prefix: &str, amount: usize) {
        for n in 1..=amount {
            let input = ResourceInput::new(format!("{prefix}-{n:02}"), "10.0.0.1");
            self.insert(&input).await;
        }
    }

    async fn insert(&self, input: &ResourceInput) -> Resource {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let now = Utc::now();
        let resource = Resource {
            id,
            name: input.name.clone(),
            ip: input.ip.clone(),
            created_at: now,
            updated_at: now,
        };
        self.resources.write().await.insert(id, resource.clone());
        resource
    }

    fn check_failure(&self) -> Result<()> {
        match self.failure.lock().ok().and_then(|f| f.clone()) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn name_taken(&self, name: &str, except: Option<i64>) -> bool {
        self.resources
            .read()
            .await
            .values()
            .any(|r| r.name == name && Some(r.id) != except)
    }
}

#[async_trait]
impl ResourceRepository for MockResourceRepository {
    async fn create(&self, input: &ResourceInput) -> Result<Vec<Resource>> {
        self.check_failure()?;
        if self.name_taken(&input.name, None).await {
            return Err(RepositoryError::UniqueViolation {
                entity_type: "Resource",
                field: "name",
            });
        }
        if self.return_no_rows.load(Ordering::SeqCst) {
            return Ok(vec![]);
        }
        Ok(vec![self.insert(input).await])
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Resource>> {
        self.find_by_id_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        Ok(self.resources.read().await.get(&id).cloned())
    }

    async fn find_page(
        &self,
        limit: u32,
        offset: u64,
        name_filter: &str,
    ) -> Result<Vec<Resource>> {
        self.find_page_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        Ok(self
            .resources
            .read()
            .await
            .values()
            .filter(|r| name_matches_filter(&r.name, name_filter))
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn count(&self, name_filter: &str) -> Result<u64> {
        self.count_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        Ok(self
            .resources
            .read()
            .await
            .values()
            .filter(|r| name_matches_filter(&r.name, name_filter))
            .count() as u64)
    }

    async fn update(&self, id: i64, input: &ResourceInput) -> Result<Vec<Resource>> {
        self.check_failure()?;
        if self.name_taken(&input.name, Some(id)).await {
            return Err(RepositoryError::UniqueViolation {
                entity_type: "Resource",
                field: "name",
            });
        }
        if self.return_no_rows.load(Ordering::SeqCst) {
            return Ok(vec![]);
        }
        let mut resources = self.resources.write().await;
        let Some(resource) = resources.get_mut(&id) else {
            return Ok(vec![]);
        };
        resource.name = input.name.clone();
        resource.ip = input.ip.clone();
        resource.updated_at = Utc::now();
        Ok(vec![resource.clone()])
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.check_failure()?;
        self.resources.write().await.remove(&id);
        Ok(())
    }
}

// ============================================================================
// Logging
// ============================================================================

/// Counts error-level events while installed as the thread's subscriber.
pub struct ErrorCapture {
    count: Arc<AtomicUsize>,
    _guard: tracing::subscriber::DefaultGuard,
}

impl ErrorCapture {
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

struct ErrorCounter(Arc<AtomicUsize>);

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for ErrorCounter {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        if *event.metadata().level() == tracing::Level::ERROR {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Starts counting error events emitted on the current thread.
pub fn capture_errors() -> ErrorCapture {
    let count = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(ErrorCounter(count.clone()));
    ErrorCapture {
        count,
        _guard: tracing::subscriber::set_default(subscriber),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_settle_drains_spawned_cache_work() {
        let cache = Arc::new(MockCacheBackend::new());
        let done = Arc::new(AtomicBool::new(false));
        let ttl = Duration::from_secs(60);

        let task_cache = cache.clone();
        let task_done = done.clone();
        tokio::spawn(async move {
            task_cache.set("a", b"1", ttl).await.unwrap();
            task_cache.delete("a").await.unwrap();
            task_cache.set("b", b"2", ttl).await.unwrap();
            task_done.store(true, Ordering::SeqCst);
        });
        settle().await;

        assert!(done.load(Ordering::SeqCst));
        assert_eq!(cache.peek("b").await, Some(b"2".to_vec()));
    }
}
