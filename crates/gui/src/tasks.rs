//! Background work: network requests and model parsing run on a tokio
//! runtime, results return to the UI thread as [`TaskEvent`]s.

use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

use shared::{CatalogRecord, UploadResponse};

use crate::api::{ApiClient, ApiError, UploadFile};
use crate::state::{LocalBlob, LocalBlobs, RefreshTicket, SourceRef, ViewerState};
use crate::viewport::mesh::ModelMesh;

pub enum TaskEvent {
    CatalogFetched {
        ticket: RefreshTicket,
        result: Result<Vec<CatalogRecord>, ApiError>,
    },
    LocalFileRead {
        name: String,
        result: Result<Vec<u8>, String>,
    },
    UploadFinished(Result<UploadResponse, ApiError>),
    ModelResolved {
        source: SourceRef,
        result: Result<Arc<ModelMesh>, String>,
    },
}

type Waker = Arc<dyn Fn() + Send + Sync>;

pub struct TaskRunner {
    runtime: tokio::runtime::Runtime,
    api: ApiClient,
    tx: Sender<TaskEvent>,
    rx: Receiver<TaskEvent>,
    waker: Waker,
}

impl TaskRunner {
    pub fn new(api: ApiClient) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;
        let (tx, rx) = channel();
        Ok(Self {
            runtime,
            api,
            tx,
            rx,
            waker: Arc::new(|| {}),
        })
    }

    /// Called after every delivered event, e.g. to request a repaint
    pub fn set_waker(&mut self, waker: impl Fn() + Send + Sync + 'static) {
        self.waker = Arc::new(waker);
    }

    fn emitter(&self) -> impl Fn(TaskEvent) + Send + 'static {
        let tx = self.tx.clone();
        let waker = self.waker.clone();
        move |event| {
            // Receiver gone means the app is shutting down
            if tx.send(event).is_ok() {
                waker();
            }
        }
    }

    pub fn refresh_catalog(&self, ticket: RefreshTicket) {
        let api = self.api.clone();
        let emit = self.emitter();
        self.runtime.spawn(async move {
            let result = api.list_files().await;
            emit(TaskEvent::CatalogFetched { ticket, result });
        });
    }

    /// Read a file picked for local viewing; never touches the server
    pub fn read_local(&self, path: PathBuf) {
        let emit = self.emitter();
        self.runtime.spawn(async move {
            let name = file_name(&path);
            let result = tokio::fs::read(&path).await.map_err(|e| e.to_string());
            emit(TaskEvent::LocalFileRead { name, result });
        });
    }

    /// Read the picked files, then upload them as one batch
    pub fn upload(&self, paths: Vec<PathBuf>) {
        let api = self.api.clone();
        let emit = self.emitter();
        self.runtime.spawn(async move {
            let mut files = Vec::with_capacity(paths.len());
            for path in &paths {
                match tokio::fs::read(path).await {
                    Ok(bytes) => files.push(UploadFile {
                        name: file_name(path),
                        bytes,
                    }),
                    Err(e) => {
                        tracing::error!("Failed to read {}: {}", path.display(), e);
                        emit(TaskEvent::UploadFinished(Err(ApiError::Read(e.to_string()))));
                        return;
                    }
                }
            }
            emit(TaskEvent::UploadFinished(api.upload(files).await));
        });
    }

    /// Resolve `source` to a mesh. Local handles must still be live in `state`.
    pub fn load(&self, state: &ViewerState, source: &SourceRef) {
        if LocalBlobs::is_local(source) {
            match state.local_blob(source) {
                Some(blob) => self.load_local(source.clone(), blob),
                None => self.emitter()(TaskEvent::ModelResolved {
                    source: source.clone(),
                    result: Err("local file was released".to_string()),
                }),
            }
        } else {
            self.load_remote(source.clone());
        }
    }

    fn load_remote(&self, source: SourceRef) {
        let api = self.api.clone();
        let emit = self.emitter();
        self.runtime.spawn(async move {
            let result = match api.fetch_model(source.as_str()).await {
                Ok(bytes) => parse_off_thread(bytes).await,
                Err(e) => Err(e.to_string()),
            };
            emit(TaskEvent::ModelResolved { source, result });
        });
    }

    fn load_local(&self, source: SourceRef, blob: Arc<LocalBlob>) {
        let emit = self.emitter();
        self.runtime.spawn(async move {
            let result = tokio::task::spawn_blocking(move || ModelMesh::from_stl_bytes(&blob.bytes))
                .await
                .map_err(|e| e.to_string())
                .and_then(|r| r.map(Arc::new).map_err(|e| e.to_string()));
            emit(TaskEvent::ModelResolved { source, result });
        });
    }

    /// Events delivered since the last call
    pub fn poll(&self) -> Vec<TaskEvent> {
        self.rx.try_iter().collect()
    }
}

fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "model.stl".to_string())
}

async fn parse_off_thread(bytes: Vec<u8>) -> Result<Arc<ModelMesh>, String> {
    tokio::task::spawn_blocking(move || ModelMesh::from_stl_bytes(&bytes))
        .await
        .map_err(|e| e.to_string())?
        .map(Arc::new)
        .map_err(|e| e.to_string())
}

/// What the app must do after an event was applied
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Followup {
    pub refresh_catalog: bool,
    /// Newly activated source the render surface must load
    pub load: Option<SourceRef>,
}

/// Fold one background result into the session state
pub fn apply_event(state: &mut ViewerState, event: TaskEvent) -> Followup {
    match event {
        TaskEvent::CatalogFetched { ticket, result } => {
            state.catalog.complete_refresh(ticket, result);
            Followup::default()
        }
        TaskEvent::LocalFileRead { name, result } => match result {
            Ok(bytes) => Followup {
                load: Some(state.open_local_file(name, bytes)),
                ..Followup::default()
            },
            Err(e) => {
                tracing::error!("Failed to read local file {}: {}", name, e);
                Followup::default()
            }
        },
        TaskEvent::UploadFinished(result) => {
            // A server-side failure may still have committed part of the batch
            let answered = matches!(result, Err(ApiError::Status { .. }));
            let succeeded = state.upload_finished(result.map(|resp| resp.files));
            Followup {
                refresh_catalog: succeeded || answered,
                ..Followup::default()
            }
        }
        TaskEvent::ModelResolved { source, result } => {
            state.model_resolved(&source, result);
            Followup::default()
        }
    }
}
