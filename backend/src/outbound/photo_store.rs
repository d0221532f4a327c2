//! File-system photo store confined to the upload directory.
//!
//! Writes go through a `cap_std` directory handle so a file name can never
//! escape the upload root. Each photo is staged under a temporary name and
//! renamed into place, replacing any previous upload for the bootcamp.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;

use crate::domain::ports::{PhotoStore, PhotoStoreError};

/// `PhotoStore` writing into one directory.
#[derive(Clone)]
pub struct CapStdPhotoStore {
    root: Arc<Dir>,
    root_path: PathBuf,
}

impl CapStdPhotoStore {
    /// Open `path`, creating it when missing.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory cannot be created or opened.
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        Dir::create_ambient_dir_all(path, ambient_authority())?;
        let root = Dir::open_ambient_dir(path, ambient_authority())?;
        Ok(Self {
            root: Arc::new(root),
            root_path: path.to_path_buf(),
        })
    }

    /// Directory photos are written to.
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.starts_with('.')
        && !name.contains(['/', '\\', '\0'])
}

fn write_staged(root: &Dir, file_name: &str, bytes: &[u8]) -> std::io::Result<()> {
    let staged = format!(".{file_name}.partial");
    root.write(&staged, bytes)?;
    root.rename(&staged, root, file_name)
}

#[async_trait]
impl PhotoStore for CapStdPhotoStore {
    async fn store(&self, file_name: &str, bytes: &[u8]) -> Result<(), PhotoStoreError> {
        if !is_plain_file_name(file_name) {
            return Err(PhotoStoreError::invalid_name(file_name));
        }
        let root = Arc::clone(&self.root);
        let name = file_name.to_owned();
        let payload = bytes.to_vec();
        tokio::task::spawn_blocking(move || write_staged(&root, &name, &payload))
            .await
            .map_err(|error| PhotoStoreError::io(error.to_string()))?
            .map_err(|error| PhotoStoreError::io(error.to_string()))?;
        debug!(file_name, bytes = bytes.len(), "photo stored");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::cap_fs::{path_exists, read_file};
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    #[tokio::test]
    async fn stores_and_replaces_photos() {
        let temp = TempDir::new().expect("temp dir");
        let store = CapStdPhotoStore::open(temp.path().join("uploads")).expect("open store");

        store.store("photo_1.jpg", b"first").await.expect("first write");
        store.store("photo_1.jpg", b"second").await.expect("second write");

        let written = store.root_path().join("photo_1.jpg");
        assert_eq!(read_file(&written).expect("read back"), b"second");
        assert!(!path_exists(&store.root_path().join(".photo_1.jpg.partial")));
    }

    #[rstest]
    #[case("../escape.jpg")]
    #[case("nested/photo.jpg")]
    #[case("..")]
    #[case(".hidden")]
    #[case("")]
    #[tokio::test]
    async fn rejects_names_outside_the_root(#[case] name: &str) {
        let temp = TempDir::new().expect("temp dir");
        let store = CapStdPhotoStore::open(temp.path()).expect("open store");

        let error = store.store(name, b"x").await.expect_err("rejected");
        assert!(matches!(error, PhotoStoreError::InvalidName { .. }));
    }
}
