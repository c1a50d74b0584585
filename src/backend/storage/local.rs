//! Local file system storage backend.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use super::{StorageBackend, StorageError, StorageResult};

/// Blobs stored as plain files below a root directory
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Open a store rooted at `base_path`, creating the directory if needed.
    pub async fn open(base_path: impl AsRef<Path>) -> StorageResult<Self> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path).await?;

        let metadata = fs::metadata(&base_path).await?;
        if !metadata.is_dir() {
            return Err(StorageError::Config(format!(
                "Base path is not a directory: {}",
                base_path.display()
            )));
        }

        Ok(Self { base_path })
    }

    /// Map a relative storage path onto the filesystem, refusing anything
    /// that could land outside the root.
    fn resolve(&self, name: &str) -> StorageResult<PathBuf> {
        let relative = Path::new(name);
        if name.is_empty() || relative.is_absolute() {
            return Err(StorageError::InvalidPath(name.to_string()));
        }
        for component in relative.components() {
            match component {
                Component::Normal(_) => {}
                Component::CurDir => {}
                _ => return Err(StorageError::InvalidPath(name.to_string())),
            }
        }
        Ok(self.base_path.join(relative))
    }

    fn to_key(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.base_path).ok()?;
        let parts: Vec<String> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        Some(parts.join("/"))
    }
}

#[async_trait]
impl StorageBackend for LocalStorage {
    async fn save(&self, content: &[u8], name: &str) -> StorageResult<String> {
        let path = self.resolve(name)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        fs::write(&path, content).await?;
        tracing::debug!("Stored {} bytes at {}", content.len(), name);

        Ok(name.to_string())
    }

    async fn read(&self, name: &str) -> StorageResult<Vec<u8>> {
        let path = self.resolve(name)?;

        match fs::read(&path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, name: &str) -> StorageResult<bool> {
        let path = self.resolve(name)?;

        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, name: &str) -> StorageResult<bool> {
        let path = self.resolve(name)?;
        match fs::metadata(&path).await {
            Ok(metadata) => Ok(metadata.is_file()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self, prefix: &str) -> StorageResult<Vec<String>> {
        let root = self.resolve(prefix)?;
        let metadata = match fs::metadata(&root).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if metadata.is_file() {
            return Ok(vec![prefix.to_string()]);
        }

        let mut keys = Vec::new();
        let mut pending = vec![root];
        while let Some(dir) = pending.pop() {
            let mut entries = fs::read_dir(&dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                let file_type = entry.file_type().await?;
                let path = entry.path();
                if file_type.is_dir() {
                    pending.push(path);
                } else if file_type.is_file() {
                    if let Some(key) = self.to_key(&path) {
                        keys.push(key);
                    }
                }
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn url_for(&self, name: &str) -> String {
        format!("/api/storage/{}", name.trim_start_matches('/'))
    }
}
