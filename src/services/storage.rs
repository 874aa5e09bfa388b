use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::io::{AsyncRead, AsyncWriteExt};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StorageError {
    fn write(path: &Path, source: io::Error) -> Self {
        StorageError::Write {
            path: path.to_path_buf(),
            source,
        }
    }

    fn read(path: &Path, source: io::Error) -> Self {
        StorageError::Read {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

pub struct UploadResult {
    pub stored_name: String,
    pub size: u64,
}

/// A directory entry together with the filesystem metadata the catalog reads.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub stored_name: String,
    pub size: u64,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait StorageService: Send + Sync {
    /// Streams `reader` into a new object called `stored_name`.
    async fn upload_stream<'a>(
        &self,
        stored_name: &str,
        reader: Box<dyn AsyncRead + Unpin + Send + 'a>,
    ) -> StorageResult<UploadResult>;

    /// Lists every regular file in the storage root with its size and
    /// creation time. Fails as a whole if any entry cannot be stat'd.
    async fn list_objects(&self) -> StorageResult<Vec<StoredObject>>;

    async fn health_check(&self) -> StorageResult<()>;
}

/// Flat directory storage. Objects live directly under `root`.
#[derive(Debug, Clone)]
pub struct LocalStorageService {
    root: PathBuf,
}

impl LocalStorageService {
    /// Creates the service, creating `root` if it does not exist yet.
    pub async fn new(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .await
            .map_err(|e| StorageError::write(&root, e))?;

        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, stored_name: &str) -> PathBuf {
        self.root.join(stored_name)
    }
}

/// Stats one directory entry. Anything other than a regular file yields `None`.
async fn stat_object(path: PathBuf, file_name: OsString) -> StorageResult<Option<StoredObject>> {
    let metadata = fs::metadata(&path)
        .await
        .map_err(|e| StorageError::read(&path, e))?;

    if !metadata.is_file() {
        return Ok(None);
    }

    // Not every filesystem records a birth time.
    let created = metadata
        .created()
        .or_else(|_| metadata.modified())
        .map_err(|e| StorageError::read(&path, e))?;

    Ok(Some(StoredObject {
        stored_name: file_name.to_string_lossy().into_owned(),
        size: metadata.len(),
        created_at: DateTime::<Utc>::from(created),
    }))
}

#[async_trait]
impl StorageService for LocalStorageService {
    async fn upload_stream<'a>(
        &self,
        stored_name: &str,
        mut reader: Box<dyn AsyncRead + Unpin + Send + 'a>,
    ) -> StorageResult<UploadResult> {
        let path = self.object_path(stored_name);
        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path)
            .await
            .map_err(|e| StorageError::write(&path, e))?;

        let written = async {
            let size = tokio::io::copy(&mut reader, &mut file).await?;
            file.flush().await?;
            Ok::<_, io::Error>(size)
        }
        .await;

        let size = match written {
            Ok(size) => size,
            Err(e) => {
                drop(file);
                if let Err(cleanup) = fs::remove_file(&path).await {
                    tracing::warn!(
                        path = %path.display(),
                        "Failed to remove partial upload: {}",
                        cleanup
                    );
                }
                return Err(StorageError::write(&path, e));
            }
        };

        tracing::info!(
            path = %path.display(),
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(UploadResult {
            stored_name: stored_name.to_string(),
            size,
        })
    }

    async fn list_objects(&self) -> StorageResult<Vec<StoredObject>> {
        let mut dir = fs::read_dir(&self.root)
            .await
            .map_err(|e| StorageError::read(&self.root, e))?;

        let mut paths = Vec::new();
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| StorageError::read(&self.root, e))?
        {
            paths.push((entry.path(), entry.file_name()));
        }

        let objects = futures::future::try_join_all(
            paths
                .into_iter()
                .map(|(path, file_name)| stat_object(path, file_name)),
        )
        .await?;

        Ok(objects.into_iter().flatten().collect())
    }

    async fn health_check(&self) -> StorageResult<()> {
        let metadata = fs::metadata(&self.root)
            .await
            .map_err(|e| StorageError::read(&self.root, e))?;

        if !metadata.is_dir() {
            return Err(StorageError::read(
                &self.root,
                io::Error::new(io::ErrorKind::NotADirectory, "storage root is not a directory"),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upload_and_list() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorageService::new(dir.path()).await.unwrap();

        let data: &[u8] = b"hello world";
        let res = storage
            .upload_stream("object.txt", Box::new(data))
            .await
            .unwrap();
        assert_eq!(res.size, 11);

        let objects = storage.list_objects().await.unwrap();
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].stored_name, "object.txt");
        assert_eq!(objects[0].size, 11);
    }

    #[tokio::test]
    async fn test_new_creates_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested").join("files");
        let storage = LocalStorageService::new(&root).await.unwrap();

        assert!(root.is_dir());
        assert!(storage.health_check().await.is_ok());
        assert!(storage.list_objects().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_skips_directories() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorageService::new(dir.path()).await.unwrap();
        std::fs::create_dir(dir.path().join("subdir")).unwrap();
        std::fs::write(dir.path().join("a.txt"), b"a").unwrap();

        let objects = storage.list_objects().await.unwrap();
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].stored_name, "a.txt");
    }

    #[tokio::test]
    async fn test_list_missing_root_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("files");
        let storage = LocalStorageService::new(&root).await.unwrap();
        std::fs::remove_dir(&root).unwrap();

        let err = storage.list_objects().await.unwrap_err();
        assert!(matches!(err, StorageError::Read { .. }));
        assert!(storage.health_check().await.is_err());
    }

    #[tokio::test]
    async fn test_upload_into_missing_root_is_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("files");
        let storage = LocalStorageService::new(&root).await.unwrap();
        std::fs::remove_dir(&root).unwrap();

        let data: &[u8] = b"lost";
        let err = storage
            .upload_stream("object.txt", Box::new(data))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, StorageError::Write { .. }));
    }

    #[tokio::test]
    async fn test_failed_stream_removes_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorageService::new(dir.path()).await.unwrap();

        let chunks: Vec<io::Result<bytes::Bytes>> = vec![
            Ok(bytes::Bytes::from_static(b"partial")),
            Err(io::Error::other("connection reset")),
        ];
        let reader = tokio_util::io::StreamReader::new(futures::stream::iter(chunks));

        let err = storage
            .upload_stream("broken.bin", Box::new(reader))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, StorageError::Write { .. }));
        assert!(!dir.path().join("broken.bin").exists());
    }
}
