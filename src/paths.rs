//! Platform storage-path resolution for the datastore file

use crate::Result;
use crate::error::Error;
use std::path::{Path, PathBuf};

/// Resolve the default storage path for a database name
///
/// The file lives in the app's slice of the platform user-data directory:
///
/// - Linux: `~/.local/share/punton/punton.db`
/// - macOS: `~/Library/Application Support/punton/punton.db`
/// - Windows: `C:\Users\<user>\AppData\Roaming\punton\punton.db`
///
/// The directory is not created here; [`Datastore::open`] creates it just
/// before connecting.
///
/// # Errors
///
/// Returns [`Error::UserDataDirUnavailable`] when the platform user-data
/// directory cannot be resolved (e.g. no home directory in the environment).
///
/// [`Datastore::open`]: crate::Datastore::open
pub fn default_storage_path(database: &str) -> Result<PathBuf> {
   let user_data_dir = dirs::data_dir().ok_or(Error::UserDataDirUnavailable)?;

   Ok(user_data_dir
      .join(database)
      .join(format!("{database}.db")))
}

/// Create the parent directory of a storage path if it is missing
///
/// # Errors
///
/// Returns [`Error::Io`] when the directory cannot be created, which is the
/// first point an unwritable location surfaces.
pub(crate) fn ensure_parent_dir(path: &Path) -> Result<()> {
   if let Some(parent) = path.parent()
      && !parent.as_os_str().is_empty()
   {
      std::fs::create_dir_all(parent)?;
   }

   Ok(())
}
