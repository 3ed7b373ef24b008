//! Upload service: persists a batch of files and records them in the catalog.
//!
//! Payloads are processed strictly in order. A failure aborts the rest of the
//! batch but keeps everything committed before it; there is no rollback.

use std::sync::Arc;

use shared::{public_url, sanitize_file_name, CatalogRecord};

use crate::catalog::{CatalogError, CatalogStore, NewRecord};
use crate::storage::{BlobStorage, StorageError};

/// One uploaded file
#[derive(Debug, Clone)]
pub struct UploadPayload {
    pub name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("no files provided")]
    NoFilesProvided,
    #[error("storing '{name}' failed: {source}")]
    StorageWriteFailed {
        name: String,
        #[source]
        source: StorageError,
    },
    #[error("recording '{name}' in the catalog failed: {source}")]
    CatalogWriteFailed {
        name: String,
        #[source]
        source: CatalogError,
    },
}

#[derive(Clone)]
pub struct UploadService {
    storage: Arc<dyn BlobStorage>,
    catalog: Arc<dyn CatalogStore>,
}

impl UploadService {
    pub fn new(storage: Arc<dyn BlobStorage>, catalog: Arc<dyn CatalogStore>) -> Self {
        Self { storage, catalog }
    }

    /// Store every payload and return the created records.
    pub fn upload(&self, payloads: Vec<UploadPayload>) -> Result<Vec<CatalogRecord>, UploadError> {
        if payloads.is_empty() {
            return Err(UploadError::NoFilesProvided);
        }

        let mut saved = Vec::with_capacity(payloads.len());
        for payload in payloads {
            let stored_name = sanitize_file_name(&payload.name);

            let path = self
                .storage
                .write(&stored_name, &payload.bytes)
                .map_err(|source| UploadError::StorageWriteFailed {
                    name: payload.name.clone(),
                    source,
                })?;

            let record = self
                .catalog
                .insert(NewRecord {
                    name: payload.name.clone(),
                    url: public_url(&stored_name),
                    size: payload.bytes.len() as u64,
                })
                .map_err(|source| {
                    // The blob stays on disk: it may back an older record with the same name.
                    tracing::warn!("Orphaned blob {} after catalog failure", path.display());
                    UploadError::CatalogWriteFailed {
                        name: payload.name.clone(),
                        source,
                    }
                })?;

            tracing::info!("Stored {} ({} bytes) at {}", record.name, record.size, record.url);
            saved.push(record);
        }

        Ok(saved)
    }
}
