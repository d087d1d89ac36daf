use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use ipvault_core::files::{validate_file_name, FileStoreError, Result};

type LockMap = HashMap<String, Arc<Mutex<()>>>;

/// Stores named blobs as files in a single directory.
///
/// Every operation on a name holds that name's mutex for its whole duration,
/// so a read never observes a half-written update. Operations on different
/// names do not contend. A name's mutex only lives in the registry while some
/// operation on it is in flight.
#[derive(Clone)]
pub struct FileStore {
    dir: PathBuf,
    locks: Arc<StdMutex<LockMap>>,
}

/// Registry entry held for the duration of one operation.
///
/// Dropping the last lease for a name removes it from the registry, even when
/// the operation was cancelled.
struct NameLease {
    locks: Arc<StdMutex<LockMap>>,
    name: String,
    lock: Arc<Mutex<()>>,
}

impl Drop for NameLease {
    fn drop(&mut self) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        // New leases clone under the registry mutex, so the count is stable here.
        if Arc::strong_count(&self.lock) == 2 {
            locks.remove(&self.name);
        }
    }
}

impl FileStore {
    /// Opens a store rooted at `dir`, creating the directory if needed.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;
        Ok(Self {
            dir,
            locks: Arc::new(StdMutex::new(HashMap::new())),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn lease(&self, name: &str) -> NameLease {
        let lock = self
            .locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(name.to_string())
            .or_default()
            .clone();
        NameLease {
            locks: self.locks.clone(),
            name: name.to_string(),
            lock,
        }
    }

    fn path_for(&self, name: &str) -> Result<PathBuf> {
        validate_file_name(name)?;
        Ok(self.dir.join(name))
    }

    /// Writes a new file. Fails with `AlreadyExists` if `name` is taken.
    pub async fn create(&self, name: &str, contents: &[u8]) -> Result<()> {
        let path = self.path_for(name)?;
        let lease = self.lease(name);
        let _guard = lease.lock.lock().await;

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => FileStoreError::AlreadyExists(name.to_string()),
                _ => FileStoreError::Io(e),
            })?;
        file.write_all(contents).await?;
        file.flush().await?;

        tracing::debug!(name, bytes = contents.len(), "Created file");
        Ok(())
    }

    pub async fn read(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.path_for(name)?;
        let lease = self.lease(name);
        let _guard = lease.lock.lock().await;

        fs::read(&path).await.map_err(|e| not_found_or_io(e, name))
    }

    /// Replaces the contents of an existing file.
    pub async fn update(&self, name: &str, contents: &[u8]) -> Result<()> {
        let path = self.path_for(name)?;
        let lease = self.lease(name);
        let _guard = lease.lock.lock().await;

        let mut file = fs::OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&path)
            .await
            .map_err(|e| not_found_or_io(e, name))?;
        file.write_all(contents).await?;
        file.flush().await?;

        tracing::debug!(name, bytes = contents.len(), "Updated file");
        Ok(())
    }

    pub async fn delete(&self, name: &str) -> Result<()> {
        let path = self.path_for(name)?;
        let lease = self.lease(name);
        let _guard = lease.lock.lock().await;

        fs::remove_file(&path)
            .await
            .map_err(|e| not_found_or_io(e, name))?;

        tracing::debug!(name, "Deleted file");
        Ok(())
    }
}

fn not_found_or_io(err: std::io::Error, name: &str) -> FileStoreError {
    match err.kind() {
        ErrorKind::NotFound => FileStoreError::NotFound(name.to_string()),
        _ => FileStoreError::Io(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn temp_store() -> FileStore {
        let dir = std::env::temp_dir().join(format!("ipvault-files-{}", uuid::Uuid::new_v4()));
        FileStore::open(dir).await.unwrap()
    }

    fn tracked_names(store: &FileStore) -> usize {
        store.locks.lock().unwrap().len()
    }

    async fn cleanup(store: FileStore) {
        let _ = fs::remove_dir_all(store.dir()).await;
    }

    #[tokio::test]
    async fn test_create_then_read() {
        let store = temp_store().await;

        store.create("a.json", b"{\"x\":1}").await.unwrap();

        assert_eq!(store.read("a.json").await.unwrap(), b"{\"x\":1}");
        cleanup(store).await;
    }

    #[tokio::test]
    async fn test_create_existing_fails() {
        let store = temp_store().await;
        store.create("a.json", b"1").await.unwrap();

        let err = store.create("a.json", b"2").await.unwrap_err();

        assert!(matches!(err, FileStoreError::AlreadyExists(name) if name == "a.json"));
        assert_eq!(store.read("a.json").await.unwrap(), b"1");
        cleanup(store).await;
    }

    #[tokio::test]
    async fn test_missing_file_operations_fail() {
        let store = temp_store().await;

        assert!(matches!(
            store.read("nope").await,
            Err(FileStoreError::NotFound(_))
        ));
        assert!(matches!(
            store.update("nope", b"x").await,
            Err(FileStoreError::NotFound(_))
        ));
        assert!(matches!(
            store.delete("nope").await,
            Err(FileStoreError::NotFound(_))
        ));
        cleanup(store).await;
    }

    #[tokio::test]
    async fn test_update_truncates() {
        let store = temp_store().await;
        store.create("a", b"a long original body").await.unwrap();

        store.update("a", b"short").await.unwrap();

        assert_eq!(store.read("a").await.unwrap(), b"short");
        cleanup(store).await;
    }

    #[tokio::test]
    async fn test_delete() {
        let store = temp_store().await;
        store.create("a", b"1").await.unwrap();

        store.delete("a").await.unwrap();

        assert!(matches!(store.read("a").await, Err(FileStoreError::NotFound(_))));
        cleanup(store).await;
    }

    #[tokio::test]
    async fn test_rejects_path_traversal() {
        let store = temp_store().await;

        let err = store.create("../escape", b"x").await.unwrap_err();

        assert!(matches!(err, FileStoreError::InvalidName(_)));
        cleanup(store).await;
    }

    #[tokio::test]
    async fn test_concurrent_creates_have_one_winner() {
        let store = temp_store().await;

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.create("race", format!("{i}").as_bytes()).await })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                created += 1;
            }
        }

        assert_eq!(created, 1);
        assert_eq!(tracked_names(&store), 0);
        cleanup(store).await;
    }

    #[tokio::test]
    async fn test_registry_is_empty_after_operations() {
        let store = temp_store().await;

        for i in 0..1000 {
            let name = format!("missing-{i}");
            assert!(matches!(
                store.read(&name).await,
                Err(FileStoreError::NotFound(_))
            ));
        }
        store.create("a", b"1").await.unwrap();
        store.delete("a").await.unwrap();

        assert_eq!(tracked_names(&store), 0);
        cleanup(store).await;
    }

    #[tokio::test]
    async fn test_registry_keeps_name_while_leased() {
        let store = temp_store().await;

        let first = store.lease("a");
        let second = store.lease("a");
        assert_eq!(tracked_names(&store), 1);
        assert!(Arc::ptr_eq(&first.lock, &second.lock));

        drop(first);
        assert_eq!(tracked_names(&store), 1);
        drop(second);
        assert_eq!(tracked_names(&store), 0);
        cleanup(store).await;
    }

    #[tokio::test]
    async fn test_cancelled_operation_releases_its_name() {
        let store = temp_store().await;
        let lease = store.lease("busy");
        let held = lease.lock.clone().lock_owned().await;

        // Blocks on the held mutex until the timeout drops it.
        let result =
            tokio::time::timeout(std::time::Duration::from_millis(10), store.read("busy")).await;
        assert!(result.is_err());

        drop(held);
        drop(lease);
        assert_eq!(tracked_names(&store), 0);
        cleanup(store).await;
    }
}
