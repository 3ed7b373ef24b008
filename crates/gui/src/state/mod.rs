pub mod blobs;
pub mod catalog;
pub mod layout;
pub mod selection;
pub mod settings;

use std::sync::Arc;

use shared::CatalogRecord;

pub use blobs::{LocalBlob, LocalBlobs};
pub use catalog::{CatalogCache, RefreshTicket};
pub use layout::LayoutController;
pub use selection::{ActiveModel, LoadController, LoadPhase, SourceKind, SourceRef};
pub use settings::ClientSettings;

use crate::viewport::mesh::ModelMesh;

/// Upload progress as shown in the sidebar
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadStatus {
    Idle,
    InFlight { files: usize },
    Done { files: usize },
    Failed,
}

/// One viewer session: owns every piece of client state and is the only
/// place transitions happen.
pub struct ViewerState {
    pub catalog: CatalogCache,
    pub selection: LoadController,
    pub layout: LayoutController,
    pub blobs: LocalBlobs,
    pub upload: UploadStatus,
    /// Mesh shown by the render surface, tagged with its source
    displayed: Option<(SourceRef, Arc<ModelMesh>)>,
}

impl ViewerState {
    pub fn new(viewport_width: f32) -> Self {
        Self {
            catalog: CatalogCache::default(),
            selection: LoadController::default(),
            layout: LayoutController::new(viewport_width),
            blobs: LocalBlobs::default(),
            upload: UploadStatus::Idle,
            displayed: None,
        }
    }

    /// Activate catalog entry `index`. Returns the record so the caller can
    /// start loading it.
    pub fn select_catalog_entry(&mut self, index: usize) -> Option<CatalogRecord> {
        let record = self.catalog.get(index)?.clone();
        let superseded = self.selection.select_remote(&record);
        self.after_selection(superseded);
        Some(record)
    }

    /// Register a locally opened file and activate it
    pub fn open_local_file(&mut self, name: impl Into<String>, bytes: Vec<u8>) -> SourceRef {
        let source = self.blobs.create(name, bytes);
        let superseded = self.selection.select_local(source.clone());
        self.after_selection(superseded);
        source
    }

    fn after_selection(&mut self, superseded: Option<ActiveModel>) {
        self.displayed = None;
        self.layout.on_model_selected();
        if let Some(old) = superseded {
            if old.kind == SourceKind::Local && !self.selection.is_active(&old.source) {
                self.blobs.revoke(&old.source);
            }
        }
    }

    /// Render surface result for `source`. Stale results are dropped.
    /// Returns whether the result was accepted.
    pub fn model_resolved(
        &mut self,
        source: &SourceRef,
        result: Result<Arc<ModelMesh>, String>,
    ) -> bool {
        match result {
            Ok(mesh) => {
                if !self.selection.report_load_complete(source) {
                    return false;
                }
                if let Some(ms) = self.selection.duration_ms() {
                    tracing::info!("Loaded {} ({} triangles) in {:.2} ms", source, mesh.triangle_count(), ms);
                }
                self.displayed = Some((source.clone(), mesh));
                true
            }
            Err(message) => {
                let accepted = self.selection.report_load_failed(source, message.clone());
                if accepted {
                    tracing::error!("Failed to load {}: {}", source, message);
                }
                accepted
            }
        }
    }

    pub fn displayed(&self) -> Option<(&SourceRef, &ModelMesh)> {
        self.displayed.as_ref().map(|(s, m)| (s, m.as_ref()))
    }

    /// Bytes of a local source, if its handle is still live
    pub fn local_blob(&self, source: &SourceRef) -> Option<Arc<LocalBlob>> {
        self.blobs.get(source)
    }

    pub fn upload_started(&mut self, files: usize) {
        self.upload = UploadStatus::InFlight { files };
    }

    /// Returns `true` when the catalog should be refreshed
    pub fn upload_finished<E: std::fmt::Display>(&mut self, result: Result<Vec<CatalogRecord>, E>) -> bool {
        match result {
            Ok(files) => {
                tracing::info!("Uploaded {} files", files.len());
                self.upload = UploadStatus::Done { files: files.len() };
                true
            }
            Err(e) => {
                tracing::error!("Upload failed: {}", e);
                self.upload = UploadStatus::Failed;
                false
            }
        }
    }

    /// Release every local blob; called when the view closes
    pub fn release_all(&mut self) {
        let released = self.blobs.clear();
        tracing::debug!("Released {} local blobs", released);
        self.displayed = None;
    }
}
