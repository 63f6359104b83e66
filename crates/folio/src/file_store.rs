//! Flat directory of documents.
//!
//! Every document is a single file directly under the store root. Names come
//! straight from request paths and form fields, so anything that could escape
//! the root (separators, `.`/`..`, NUL) is rejected up front. Nothing is cached
//! between calls and there is no locking: concurrent writers race and the last
//! write wins.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;

#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Names of the documents in the root, in directory enumeration order.
    ///
    /// Hidden entries and sub-directories are skipped.
    pub async fn list(&self) -> Result<Vec<String>, FileStoreError> {
        let mut entries = fs::read_dir(&self.root).await?;
        let mut names = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(raw) => {
                    tracing::warn!(name = ?raw, "skipping document with non utf-8 name");
                    continue;
                }
            };
            if name.starts_with('.') {
                continue;
            }
            if entry.file_type().await?.is_dir() {
                continue;
            }
            names.push(name);
        }

        Ok(names)
    }

    pub async fn exists(&self, name: &str) -> Result<bool, FileStoreError> {
        let path = self.path_for(name)?;
        Ok(fs::try_exists(&path).await?)
    }

    pub async fn read(&self, name: &str) -> Result<Vec<u8>, FileStoreError> {
        let path = self.path_for(name)?;
        fs::read(&path).await.map_err(|e| not_found_or_io(e, name))
    }

    /// Document content split into lines, each keeping its trailing newline
    /// so that concatenating them reproduces the file exactly.
    pub async fn read_lines(&self, name: &str) -> Result<Vec<String>, FileStoreError> {
        let path = self.path_for(name)?;
        let bytes = fs::read(&path).await.map_err(|e| not_found_or_io(e, name))?;
        let content = String::from_utf8_lossy(&bytes);
        Ok(content.split_inclusive('\n').map(str::to_owned).collect())
    }

    /// Create or fully overwrite a document.
    pub async fn write(&self, name: &str, content: &[u8]) -> Result<(), FileStoreError> {
        let path = self.path_for(name)?;
        fs::write(&path, content).await?;
        tracing::debug!(document = name, bytes = content.len(), "document written");
        Ok(())
    }

    /// Create an empty document. An existing document of the same name is
    /// truncated.
    pub async fn create(&self, name: &str) -> Result<(), FileStoreError> {
        let path = self.path_for(name)?;
        fs::File::create(&path).await?;
        tracing::debug!(document = name, "document created");
        Ok(())
    }

    pub async fn delete(&self, name: &str) -> Result<(), FileStoreError> {
        let path = self.path_for(name)?;
        fs::remove_file(&path)
            .await
            .map_err(|e| not_found_or_io(e, name))?;
        tracing::debug!(document = name, "document deleted");
        Ok(())
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, FileStoreError> {
        validate_name(name)?;
        Ok(self.root.join(name))
    }
}

/// Checks that `name` names a single entry directly under the root.
pub fn validate_name(name: &str) -> Result<(), FileStoreError> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);

    if invalid {
        return Err(FileStoreError::InvalidName(name.to_string()));
    }
    Ok(())
}

fn not_found_or_io(err: std::io::Error, name: &str) -> FileStoreError {
    if err.kind() == ErrorKind::NotFound {
        FileStoreError::NotFound(name.to_string())
    } else {
        FileStoreError::Io(err)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FileStoreError {
    #[error("document not found: {0}")]
    NotFound(String),

    #[error("invalid document name: {0:?}")]
    InvalidName(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, FileStore) {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        (dir, store)
    }

    #[tokio::test]
    async fn test_list_skips_hidden_and_directories() {
        let (dir, store) = setup();
        std::fs::write(dir.path().join("a.txt"), "").unwrap();
        std::fs::write(dir.path().join("b.md"), "").unwrap();
        std::fs::write(dir.path().join(".hidden"), "").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();

        let mut names = store.list().await.unwrap();
        names.sort();
        assert_eq!(names, vec!["a.txt".to_string(), "b.md".to_string()]);
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let (_dir, store) = setup();
        store.write("notes.txt", b"first").await.unwrap();
        store.write("notes.txt", b"second").await.unwrap();

        assert_eq!(store.read("notes.txt").await.unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_read_missing_is_not_found() {
        let (_dir, store) = setup();
        let err = store.read("missing.txt").await.unwrap_err();
        assert!(matches!(err, FileStoreError::NotFound(name) if name == "missing.txt"));
    }

    #[tokio::test]
    async fn test_read_lines_preserves_content() {
        let (_dir, store) = setup();
        store.write("lines.txt", b"one\ntwo\nthree").await.unwrap();

        let lines = store.read_lines("lines.txt").await.unwrap();
        assert_eq!(lines, vec!["one\n", "two\n", "three"]);
        assert_eq!(lines.concat(), "one\ntwo\nthree");
    }

    #[tokio::test]
    async fn test_create_truncates_existing() {
        let (_dir, store) = setup();
        store.write("keep.md", b"# content").await.unwrap();
        store.create("keep.md").await.unwrap();

        assert!(store.read("keep.md").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete() {
        let (_dir, store) = setup();
        store.create("gone.txt").await.unwrap();
        assert!(store.exists("gone.txt").await.unwrap());

        store.delete("gone.txt").await.unwrap();
        assert!(!store.exists("gone.txt").await.unwrap());

        let err = store.delete("gone.txt").await.unwrap_err();
        assert!(matches!(err, FileStoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_rejects_names_outside_root() {
        let (_dir, store) = setup();
        for name in ["", ".", "..", "../secret", "a/b.txt", "a\\b.txt"] {
            let err = store.read(name).await.unwrap_err();
            assert!(
                matches!(err, FileStoreError::InvalidName(_)),
                "expected {name:?} to be rejected"
            );
        }
    }
}
