pub(crate) use hash::get_hash;
pub(crate) use macros::try_borrow_mut;
pub(crate) use snapshot::{decode, encode, Snapshot};
pub use utils::DEFAULT_BACKUP_KEY;
pub(crate) use utils::{initialize_storage_folder, Entries};

mod hash;
mod macros;
mod snapshot;
mod utils;
