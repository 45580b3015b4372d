use std::collections::HashMap;
use std::hash::BuildHasherDefault;
use std::io;
use std::path::Path;

use serde_json::Value;
use twox_hash::XxHash64;

/// The durable storage key that backups are written under, unless another is given
pub const DEFAULT_BACKUP_KEY: &str = "backup";

/// The key-value pairs held in memory
pub(crate) type Entries = HashMap<String, Value, BuildHasherDefault<XxHash64>>;

/// Creates the storage folder if it does not exist
pub(crate) fn initialize_storage_folder(folder: &Path) -> io::Result<()> {
    std::fs::create_dir_all(folder)
}
