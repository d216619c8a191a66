//! The connection descriptor for the Punton datastore

use crate::Result;
use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Connection-pool limits applied to the datastore's SQLite pool
///
/// The defaults are the values the desktop app has always shipped with and
/// are what consumers should use unless they have a measured reason not to.
///
/// # Examples
///
/// ```
/// use punton_datastore::PoolLimits;
///
/// // Use defaults
/// let limits = PoolLimits::default();
/// assert_eq!(limits.max_connections, 5);
///
/// // Override just one field
/// let limits = PoolLimits {
///    max_connections: 2,
///    ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolLimits {
   /// Maximum number of concurrent pooled connections
   ///
   /// Default: 5
   pub max_connections: u32,

   /// Minimum number of connections the pool keeps open when idle
   ///
   /// Default: 0
   pub min_connections: u32,

   /// How long a consumer may wait for a connection before the checkout
   /// fails (in milliseconds)
   ///
   /// Default: 30_000
   pub acquire_timeout_ms: u64,

   /// Connections idle for longer than this are closed (in milliseconds)
   ///
   /// Default: 10_000
   pub idle_timeout_ms: u64,
}

impl Default for PoolLimits {
   fn default() -> Self {
      Self {
         max_connections: 5,
         min_connections: 0,
         acquire_timeout_ms: 30_000,
         idle_timeout_ms: 10_000,
      }
   }
}

impl PoolLimits {
   /// Check that the limits are internally consistent
   ///
   /// The pool must allow at least one connection, and the floor cannot
   /// exceed the ceiling. Timeouts are unsigned and need no validation.
   ///
   /// # Errors
   ///
   /// Returns [`Error::InvalidPoolLimits`] when `max_connections` is zero or
   /// smaller than `min_connections`.
   pub fn validate(&self) -> Result<()> {
      if self.max_connections == 0 || self.max_connections < self.min_connections {
         return Err(Error::InvalidPoolLimits {
            max: self.max_connections,
            min: self.min_connections,
         });
      }

      Ok(())
   }

   /// Acquire timeout as a [`Duration`]
   pub fn acquire_timeout(&self) -> Duration {
      Duration::from_millis(self.acquire_timeout_ms)
   }

   /// Idle timeout as a [`Duration`]
   pub fn idle_timeout(&self) -> Duration {
      Duration::from_millis(self.idle_timeout_ms)
   }
}

/// The connection descriptor for the app's embedded database
///
/// One of these is constructed at process startup and describes everything
/// needed to open the datastore: what the database is called, which
/// application owns it, where the file lives, and how the connection pool
/// behaves. The descriptor is plain data - opening it is [`Datastore::open`].
///
/// `host` and `password` are carried for descriptor completeness; the
/// embedded engine has no use for either.
///
/// # Examples
///
/// ```
/// use punton_datastore::DatastoreConfig;
///
/// let config = DatastoreConfig::default();
/// assert_eq!(config.database, "punton");
/// assert!(!config.log_statements);
/// ```
///
/// [`Datastore::open`]: crate::Datastore::open
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatastoreConfig {
   /// Logical database name
   ///
   /// Default: `"punton"`
   pub database: String,

   /// Identifier of the application the datastore belongs to
   ///
   /// Default: `"punton_music_desktop"`
   pub application_id: String,

   /// Credentials for the database
   ///
   /// SQLite has no user accounts, so this stays empty. Default: `""`
   pub password: String,

   /// Host the database lives on
   ///
   /// Unused for a file-based engine. Default: `"localhost"`
   pub host: String,

   /// Connection-pool limits
   pub pool: PoolLimits,

   /// Explicit storage path for the database file
   ///
   /// `None` derives `<platform user-data dir>/punton/punton.db`. Tests and
   /// embedders set this to keep the real user profile out of the picture.
   pub storage_path: Option<PathBuf>,

   /// Whether sqlx should log every SQL statement it executes
   ///
   /// Default: `false`
   pub log_statements: bool,
}

impl Default for DatastoreConfig {
   fn default() -> Self {
      Self {
         database: "punton".to_string(),
         application_id: "punton_music_desktop".to_string(),
         password: String::new(),
         host: "localhost".to_string(),
         pool: PoolLimits::default(),
         storage_path: None,
         log_statements: false,
      }
   }
}

impl DatastoreConfig {
   /// The storage path this descriptor resolves to
   ///
   /// Returns the explicit override when one is set, otherwise derives the
   /// platform default via [`default_storage_path`].
   ///
   /// # Errors
   ///
   /// Returns [`Error::UserDataDirUnavailable`] when no override is set and
   /// the platform user-data directory cannot be resolved.
   ///
   /// [`default_storage_path`]: crate::paths::default_storage_path
   pub fn resolved_storage_path(&self) -> Result<PathBuf> {
      match &self.storage_path {
         Some(path) => Ok(path.clone()),
         None => crate::paths::default_storage_path(&self.database),
      }
   }

   /// Check the descriptor's invariants
   ///
   /// # Errors
   ///
   /// Returns [`Error::InvalidPoolLimits`] when the pool limits are
   /// inconsistent.
   pub fn validate(&self) -> Result<()> {
      self.pool.validate()
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn default_pool_limits_match_shipped_values() {
      let limits = PoolLimits::default();

      assert_eq!(limits.max_connections, 5);
      assert_eq!(limits.min_connections, 0);
      assert_eq!(limits.acquire_timeout_ms, 30_000);
      assert_eq!(limits.idle_timeout_ms, 10_000);
   }

   #[test]
   fn default_descriptor_matches_shipped_values() {
      let config = DatastoreConfig::default();

      assert_eq!(config.database, "punton");
      assert_eq!(config.application_id, "punton_music_desktop");
      assert_eq!(config.password, "");
      assert_eq!(config.host, "localhost");
      assert_eq!(config.pool, PoolLimits::default());
      assert!(config.storage_path.is_none());
      assert!(!config.log_statements);
   }

   #[test]
   fn default_descriptor_is_stable_across_constructions() {
      // Idempotent configuration: every construction yields the same values
      assert_eq!(DatastoreConfig::default(), DatastoreConfig::default());
   }

   #[test]
   fn validate_rejects_zero_max_connections() {
      let limits = PoolLimits {
         max_connections: 0,
         ..Default::default()
      };

      assert!(matches!(
         limits.validate().unwrap_err(),
         Error::InvalidPoolLimits { max: 0, min: 0 }
      ));
   }

   #[test]
   fn validate_rejects_min_above_max() {
      let limits = PoolLimits {
         max_connections: 2,
         min_connections: 3,
         ..Default::default()
      };

      assert!(matches!(
         limits.validate().unwrap_err(),
         Error::InvalidPoolLimits { max: 2, min: 3 }
      ));
   }

   #[test]
   fn timeouts_convert_to_durations() {
      let limits = PoolLimits::default();

      assert_eq!(limits.acquire_timeout(), Duration::from_secs(30));
      assert_eq!(limits.idle_timeout(), Duration::from_secs(10));
   }

   #[test]
   fn resolved_storage_path_prefers_override() {
      let config = DatastoreConfig {
         storage_path: Some(PathBuf::from("/tmp/elsewhere/punton.db")),
         ..Default::default()
      };

      let path = config.resolved_storage_path().unwrap();
      assert_eq!(path, PathBuf::from("/tmp/elsewhere/punton.db"));
   }
}
