use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::durable::DurableStorage;
use crate::internal;

const FILE_EXTENSION: &str = "bak";

/// Durable storage keeping each key in its own file inside a folder.
///
/// This is the native stand-in for `localStorage` when the store runs outside
/// a browser. Files are named after the xxh3 hash of their key so any key is
/// safe to use as a file name.
#[derive(Debug)]
pub struct FileStorage {
    folder: PathBuf,
}

impl FileStorage {
    /// Creates a file storage in `folder`, creating the folder if it does not exist
    pub fn new<P: AsRef<Path>>(folder: P) -> io::Result<Self> {
        let folder = folder.as_ref().to_path_buf();
        internal::initialize_storage_folder(&folder)?;
        Ok(Self { folder })
    }

    /// Returns the folder the files are kept in
    pub fn folder(&self) -> &Path {
        &self.folder
    }

    fn file_path(&self, key: &str) -> PathBuf {
        let hash = internal::get_hash(key.as_bytes());
        self.folder.join(format!("{:016x}.{}", hash, FILE_EXTENSION))
    }
}

impl DurableStorage for FileStorage {
    fn read(&self, key: &str) -> Option<String> {
        match fs::read_to_string(self.file_path(key)) {
            Ok(value) => Some(value),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(error = %e, key, "failed to read durable storage file");
                None
            }
        }
    }

    /// Writes into a temporary file, then renames it over the key's file.
    ///
    /// The temporary file is removed if any step fails.
    fn write(&mut self, key: &str, value: &str) -> io::Result<()> {
        let path = self.file_path(key);
        let tmp_path = path.with_extension(format!("{}.tmp", FILE_EXTENSION));

        let result = write_synced(&tmp_path, value).and_then(|_| fs::rename(&tmp_path, &path));
        if result.is_err() {
            if let Err(e) = fs::remove_file(&tmp_path) {
                if e.kind() != io::ErrorKind::NotFound {
                    tracing::warn!(error = %e, path = ?tmp_path, "failed to remove temporary file");
                }
            }
        }
        result
    }

    fn delete(&mut self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.file_path(key)) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

fn write_synced(path: &Path, value: &str) -> io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(value.as_bytes())?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    const STORAGE_PATH: &str = "test_file_storage";

    #[test]
    #[serial]
    fn write_read_and_delete() {
        let mut storage = new_empty_storage();

        assert_eq!(storage.read("backup"), None);

        storage.write("backup", "{\"name\":\"Obiora\"}").expect("write backup");
        assert_eq!(
            storage.read("backup"),
            Some("{\"name\":\"Obiora\"}".to_string())
        );

        storage.write("backup", "{}").expect("overwrite backup");
        assert_eq!(storage.read("backup"), Some("{}".to_string()));

        storage.delete("backup").expect("delete backup");
        assert_eq!(storage.read("backup"), None);
        storage.delete("backup").expect("delete missing backup");
    }

    #[test]
    #[serial]
    fn persist_across_instances() {
        let mut storage = new_empty_storage();
        storage.write("backup", "[1,2,3]").expect("write backup");

        // Open new storage instance
        let storage = FileStorage::new(STORAGE_PATH).expect("open file storage");

        assert_eq!(storage.read("backup"), Some("[1,2,3]".to_string()));
        assert_eq!(count_files(&storage), 1);
    }

    #[test]
    #[serial]
    fn keys_with_path_characters_stay_inside_folder() {
        let mut storage = new_empty_storage();
        let keys = ["../escape", "nested/key", "C:\\windows", ""];

        for (i, k) in keys.iter().enumerate() {
            storage.write(k, &i.to_string()).expect("write key");
        }

        for (i, k) in keys.iter().enumerate() {
            assert_eq!(storage.read(k), Some(i.to_string()));
        }
        assert_eq!(count_files(&storage), keys.len());
    }

    #[test]
    #[serial]
    fn failed_write_leaves_no_temporary_file() {
        let mut storage = new_empty_storage();
        let target = storage.file_path("backup");
        // a non-empty folder in place of the key's file makes the rename fail
        fs::create_dir(&target).expect("create folder at file path");
        fs::write(target.join("occupant"), "x").expect("fill folder");

        let got = storage.write("backup", "{\"name\":\"Obiora\"}");

        assert!(got.is_err());
        let names: Vec<String> = fs::read_dir(storage.folder())
            .expect("list storage folder")
            .map(|entry| entry.expect("read entry").file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 1);
        assert!(names.iter().all(|name| !name.ends_with(".tmp")), "{:?}", names);
    }

    /// Opens the test storage after removing anything a previous test left behind
    fn new_empty_storage() -> FileStorage {
        fs::remove_dir_all(STORAGE_PATH).unwrap_or(());
        FileStorage::new(STORAGE_PATH).expect("create file storage")
    }

    /// Counts the files in the storage's folder
    fn count_files(storage: &FileStorage) -> usize {
        fs::read_dir(storage.folder())
            .expect("list storage folder")
            .count()
    }
}
