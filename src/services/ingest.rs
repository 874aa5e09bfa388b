use crate::services::storage::{StorageResult, StorageService};
use crate::utils::naming;
use crate::utils::validation::sanitize_filename;
use std::sync::Arc;
use tokio::io::AsyncRead;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct IngestedFile {
    pub id: Uuid,
    pub stored_name: String,
    pub original_name: String,
    pub size: u64,
}

/// Persists uploads under `{uuid}-{base}{extension}`.
pub struct IngestService {
    storage: Arc<dyn StorageService>,
}

impl IngestService {
    pub fn new(storage: Arc<dyn StorageService>) -> Self {
        Self { storage }
    }

    /// Writes `reader` verbatim under a fresh stored name.
    ///
    /// The identifier is a random v4 UUID; existing files are not consulted.
    pub async fn ingest<'a>(
        &self,
        client_filename: &str,
        reader: impl AsyncRead + Unpin + Send + 'a,
    ) -> StorageResult<IngestedFile> {
        let original_name = sanitize_filename(client_filename);
        let id = Uuid::new_v4();
        let stored_name = naming::encode(id, &original_name);

        let res = self
            .storage
            .upload_stream(&stored_name, Box::new(reader))
            .await?;

        tracing::info!(
            file_id = %id,
            stored_name = %res.stored_name,
            size_bytes = res.size,
            "File ingested"
        );

        Ok(IngestedFile {
            id,
            stored_name: res.stored_name,
            original_name,
            size: res.size,
        })
    }
}
