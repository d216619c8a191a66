//! Error types for punton-datastore

use thiserror::Error;

/// Errors that may occur when configuring or opening the datastore
#[derive(Error, Debug)]
pub enum Error {
   /// IO error when preparing the storage location. Standard library IO
   /// errors are converted to this variant.
   #[error("IO error: {0}")]
   Io(#[from] std::io::Error),

   /// Error from the sqlx library. Standard sqlx errors are converted to this variant
   #[error("Sqlx error: {0}")]
   Sqlx(#[from] sqlx::Error),

   /// The platform user-data directory could not be resolved, so there is
   /// nowhere to derive the default storage path from
   #[error("Platform user-data directory could not be resolved")]
   UserDataDirUnavailable,

   /// The descriptor's pool limits are inconsistent
   #[error(
      "Invalid pool limits: max_connections ({max}) must be >= min_connections ({min}) and >= 1"
   )]
   InvalidPoolLimits {
      /// Configured maximum pool size
      max: u32,
      /// Configured minimum pool size
      min: u32,
   },

   /// Datastore has been closed and cannot be used
   #[error("Datastore has been closed")]
   DatastoreClosed,
}
