//! # punton-datastore
//!
//! Configures and opens the single embedded SQLite datastore of the Punton
//! music desktop application.
//!
//! ## Core Types
//!
//! - **[`Datastore`]**: The shared database handle with a bounded connection pool
//! - **[`DatastoreConfig`]**: The connection descriptor (name, path, pool limits)
//! - **[`PoolLimits`]**: Connection-pool bounds and timeouts
//! - **[`Error`]**: Error type for datastore operations
//!
//! ## Architecture
//!
//! - **One descriptor, one handle**: the descriptor is built once at startup
//!   and the resulting `Arc<Datastore>` is passed to every consumer
//! - **Platform storage path**: the database file lives at
//!   `<user-data dir>/punton/punton.db` unless an explicit path is injected
//! - **Lazy pool**: connections are established on first use; opening the
//!   datastore performs no database I/O
//! - **Delegation**: pooling, timeouts, and the SQL engine are sqlx's - this
//!   crate only supplies configuration
//!
//! ## Usage
//!
//! ```no_run
//! use punton_datastore::Datastore;
//!
//! #[tokio::main]
//! async fn main() -> punton_datastore::Result<()> {
//!     // Open with the app's shipped configuration
//!     let db = Datastore::open_default()?;
//!
//!     // Hand db.pool() to anything that runs queries
//!     let rows = sqlx::query("SELECT * FROM tracks")
//!         .fetch_all(db.pool()?)
//!         .await?;
//!
//!     // Close when done
//!     db.close().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Design Principles
//!
//! - Uses sqlx's `SqlitePoolOptions` for all pool configuration
//! - Uses sqlx's `SqliteConnectOptions` for connection flags and statement logging
//! - Minimal custom logic - delegates to sqlx and `dirs` wherever possible
//! - No process-global state: handles are shared by explicit injection
//!
mod config;
mod datastore;
mod error;
pub mod paths;

// Re-export public types
pub use config::{DatastoreConfig, PoolLimits};
pub use datastore::Datastore;
pub use error::Error;

/// A type alias for Results with our custom Error type
pub type Result<T> = std::result::Result<T, Error>;
