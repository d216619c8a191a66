//! The shared datastore handle built from a connection descriptor

use crate::Result;
use crate::config::DatastoreConfig;
use crate::error::Error;
use crate::paths::ensure_parent_dir;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{ConnectOptions, Pool, Sqlite};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// The app's embedded SQLite datastore
///
/// One `Datastore` is opened at process startup and shared (as an `Arc`) by
/// every part of the application that performs persistence. It wraps a lazy
/// sqlx connection pool configured from a [`DatastoreConfig`]; no I/O
/// happens until a consumer runs the first query.
///
/// # Example
///
/// ```no_run
/// use punton_datastore::Datastore;
///
/// # async fn example() -> Result<(), punton_datastore::Error> {
/// let db = Datastore::open_default()?;
///
/// let rows = sqlx::query("SELECT * FROM tracks")
///     .fetch_all(db.pool()?)
///     .await?;
///
/// db.close().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Datastore {
   /// Pooled connections, bounded by the descriptor's pool limits
   pool: Pool<Sqlite>,

   /// Marks the datastore as closed to prevent further operations
   closed: AtomicBool,

   /// Resolved path of the database file
   path: PathBuf,

   /// The descriptor this datastore was opened from
   config: DatastoreConfig,
}

impl Datastore {
   /// Open the datastore described by a connection descriptor
   ///
   /// Validates the descriptor, resolves the storage path (explicit override
   /// or the platform default), creates the parent directory if missing, and
   /// builds the connection pool with exactly the descriptor's limits. The
   /// pool connects lazily: the database file itself is created by the first
   /// connection checkout.
   ///
   /// Opening the same descriptor twice yields two independent handles that
   /// point at the same file.
   ///
   /// # Errors
   ///
   /// Returns [`Error::InvalidPoolLimits`] for an inconsistent descriptor,
   /// [`Error::UserDataDirUnavailable`] when no storage override is set and
   /// the platform user-data directory cannot be resolved, and [`Error::Io`]
   /// when the storage directory cannot be created.
   pub fn open(config: DatastoreConfig) -> Result<Arc<Self>> {
      config.validate()?;

      let path = config.resolved_storage_path()?;
      ensure_parent_dir(&path)?;

      let mut connect_options = SqliteConnectOptions::new()
         .filename(&path)
         .create_if_missing(true);

      if !config.log_statements {
         connect_options = connect_options.disable_statement_logging();
      }

      let pool = SqlitePoolOptions::new()
         .max_connections(config.pool.max_connections)
         .min_connections(config.pool.min_connections)
         .acquire_timeout(config.pool.acquire_timeout())
         .idle_timeout(Some(config.pool.idle_timeout()))
         .connect_lazy_with(connect_options);

      debug!(
         path = %path.display(),
         max_connections = config.pool.max_connections,
         min_connections = config.pool.min_connections,
         "opened datastore"
      );

      Ok(Arc::new(Self {
         pool,
         closed: AtomicBool::new(false),
         path,
         config,
      }))
   }

   /// Open the datastore with the app's default descriptor
   ///
   /// Equivalent to `Datastore::open(DatastoreConfig::default())`: database
   /// `punton` at `<user-data dir>/punton/punton.db`, pool limits
   /// 5/0/30s/10s, statement logging off.
   ///
   /// # Errors
   ///
   /// Same failure conditions as [`Datastore::open`].
   pub fn open_default() -> Result<Arc<Self>> {
      Self::open(DatastoreConfig::default())
   }

   /// Get a reference to the connection pool for executing queries
   ///
   /// # Errors
   ///
   /// Returns [`Error::DatastoreClosed`] after [`Datastore::close`].
   pub fn pool(&self) -> Result<&Pool<Sqlite>> {
      if self.closed.load(Ordering::SeqCst) {
         return Err(Error::DatastoreClosed);
      }
      Ok(&self.pool)
   }

   /// Resolved path of the database file
   pub fn path(&self) -> &Path {
      &self.path
   }

   /// The descriptor this datastore was opened from
   pub fn config(&self) -> &DatastoreConfig {
      &self.config
   }

   /// Verify the datastore is reachable and the storage location is usable
   ///
   /// Runs `SELECT 1`, which forces the lazy pool to check out a real
   /// connection and therefore creates the database file if this is the
   /// first use. An unwritable storage location surfaces here.
   ///
   /// # Errors
   ///
   /// Returns [`Error::DatastoreClosed`] after close, or [`Error::Sqlx`]
   /// when the connection cannot be established.
   pub async fn ping(&self) -> Result<()> {
      sqlx::query("SELECT 1").execute(self.pool()?).await?;

      Ok(())
   }

   /// Close the datastore
   ///
   /// Waits for checked-out connections to be returned, then closes the
   /// pool. After calling close, any operation on this datastore returns
   /// [`Error::DatastoreClosed`].
   ///
   /// Note: Takes `Arc<Self>` to consume ownership, preventing
   /// use-after-close through this handle at compile time.
   pub async fn close(self: Arc<Self>) -> Result<()> {
      self.closed.store(true, Ordering::SeqCst);

      self.pool.close().await;

      debug!(path = %self.path.display(), "closed datastore");

      Ok(())
   }

   /// Close the datastore and delete its files from disk
   ///
   /// Removes the database file along with the `-wal` and `-shm` siblings
   /// SQLite may have left next to it. Use with caution!
   ///
   /// # Errors
   ///
   /// Returns [`Error::Io`] when the database file cannot be removed. The
   /// sibling files are allowed to be missing.
   pub async fn remove(self: Arc<Self>) -> Result<()> {
      let path = self.path.clone();

      self.close().await?;

      // Main database file should exist - propagate errors
      std::fs::remove_file(&path).map_err(Error::Io)?;

      // WAL and SHM files may not exist - ignore "not found" only
      let wal_path = path.with_extension("db-wal");
      if let Err(e) = std::fs::remove_file(&wal_path)
         && e.kind() != std::io::ErrorKind::NotFound
      {
         return Err(Error::Io(e));
      }

      let shm_path = path.with_extension("db-shm");
      if let Err(e) = std::fs::remove_file(&shm_path)
         && e.kind() != std::io::ErrorKind::NotFound
      {
         return Err(Error::Io(e));
      }

      debug!(path = %path.display(), "removed datastore");

      Ok(())
   }
}

#[cfg(test)]
mod tests {
   use super::*;
   use crate::config::PoolLimits;

   fn test_config(dir: &tempfile::TempDir) -> DatastoreConfig {
      DatastoreConfig {
         storage_path: Some(dir.path().join("punton.db")),
         ..Default::default()
      }
   }

   #[test]
   fn open_rejects_invalid_pool_limits() {
      let dir = tempfile::tempdir().unwrap();
      let config = DatastoreConfig {
         pool: PoolLimits {
            max_connections: 0,
            ..Default::default()
         },
         ..test_config(&dir)
      };

      let result = Datastore::open(config);
      assert!(matches!(
         result.unwrap_err(),
         Error::InvalidPoolLimits { .. }
      ));
   }

   #[tokio::test]
   async fn open_is_lazy_and_creates_no_file() {
      let dir = tempfile::tempdir().unwrap();
      let config = test_config(&dir);
      let path = config.resolved_storage_path().unwrap();

      let _db = Datastore::open(config).unwrap();

      // No query has run, so no I/O has happened yet
      assert!(!path.exists());
   }

   #[tokio::test]
   async fn open_creates_missing_parent_directory() {
      let dir = tempfile::tempdir().unwrap();
      let config = DatastoreConfig {
         storage_path: Some(dir.path().join("nested").join("punton.db")),
         ..Default::default()
      };

      let db = Datastore::open(config).unwrap();

      assert!(db.path().parent().unwrap().is_dir());
   }

   #[tokio::test]
   async fn open_twice_points_at_same_file() {
      let dir = tempfile::tempdir().unwrap();

      let db1 = Datastore::open(test_config(&dir)).unwrap();
      let db2 = Datastore::open(test_config(&dir)).unwrap();

      // Independent handles, same storage
      assert!(!Arc::ptr_eq(&db1, &db2));
      assert_eq!(db1.path(), db2.path());
   }

   #[tokio::test]
   async fn ping_creates_database_file() {
      let dir = tempfile::tempdir().unwrap();
      let db = Datastore::open(test_config(&dir)).unwrap();

      db.ping().await.unwrap();

      assert!(db.path().exists());
   }

   #[tokio::test]
   async fn operations_fail_after_close() {
      let dir = tempfile::tempdir().unwrap();
      let db = Datastore::open(test_config(&dir)).unwrap();

      let db_ref = Arc::clone(&db);
      db.close().await.unwrap();

      assert!(matches!(
         db_ref.pool().unwrap_err(),
         Error::DatastoreClosed
      ));
      assert!(matches!(
         db_ref.ping().await.unwrap_err(),
         Error::DatastoreClosed
      ));
   }
}
