use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::{json, Value};
use shared::{CatalogRecord, ErrorBody, UploadResponse, UPLOAD_FIELD};

use crate::upload::{UploadError, UploadPayload};
use crate::AppState;

/// Failures reported to API clients. Details go to the log, not the response.
#[derive(Debug)]
pub enum ApiError {
    NoFilesUploaded,
    UploadFailed,
    CatalogUnavailable,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NoFilesUploaded => (StatusCode::BAD_REQUEST, "No files uploaded"),
            ApiError::UploadFailed => (StatusCode::INTERNAL_SERVER_ERROR, "Upload failed"),
            ApiError::CatalogUnavailable => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to list files")
            }
        };
        (status, Json(ErrorBody::new(message))).into_response()
    }
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::NoFilesProvided => ApiError::NoFilesUploaded,
            other => {
                tracing::error!("Upload error: {}", other);
                ApiError::UploadFailed
            }
        }
    }
}

/// Health check
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Multipart upload → stored files + catalog records
pub async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut multipart = multipart.map_err(|e| {
        tracing::error!("Upload error: not a multipart request: {}", e);
        ApiError::UploadFailed
    })?;
    let mut payloads = Vec::new();
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                tracing::error!("Upload error: malformed multipart body: {}", e);
                return Err(ApiError::UploadFailed);
            }
        };
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let name = field.file_name().unwrap_or("upload.stl").to_string();
        let bytes = field.bytes().await.map_err(|e| {
            tracing::error!("Upload error: reading '{}': {}", name, e);
            ApiError::UploadFailed
        })?;
        payloads.push(UploadPayload {
            name,
            bytes: bytes.to_vec(),
        });
    }

    let service = state.uploads.clone();
    let files = tokio::task::spawn_blocking(move || service.upload(payloads))
        .await
        .map_err(|e| {
            tracing::error!("Upload task panicked: {}", e);
            ApiError::UploadFailed
        })??;

    Ok(Json(UploadResponse::new(files)))
}

/// All catalog records in store order
pub async fn list_files(
    State(state): State<AppState>,
) -> Result<Json<Vec<CatalogRecord>>, ApiError> {
    let catalog = state.catalog.clone();
    let files = tokio::task::spawn_blocking(move || catalog.list_all())
        .await
        .map_err(|_| ApiError::CatalogUnavailable)?
        .map_err(|e| {
            tracing::error!("List error: {}", e);
            ApiError::CatalogUnavailable
        })?;
    Ok(Json(files))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::extract::{FromRequest, Request};
    use axum::http::header;

    use super::*;
    use crate::catalog::{CatalogStore, MemoryCatalog};
    use crate::storage::DiskStorage;
    use crate::upload::UploadService;

    const BOUNDARY: &str = "stlviewboundary";

    fn test_state(dir: &std::path::Path) -> AppState {
        let catalog: Arc<dyn CatalogStore> = Arc::new(MemoryCatalog::default());
        let storage = Arc::new(DiskStorage::new(dir).unwrap());
        AppState {
            uploads: UploadService::new(storage, catalog.clone()),
            catalog,
        }
    }

    /// Multipart body with one part per `(field, file_name, bytes)`
    fn multipart_body(parts: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
        let mut body = Vec::new();
        for (field, file_name, bytes) in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match file_name {
                Some(file) => body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                ),
                None => body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{field}\"\r\n\r\n").as_bytes(),
                ),
            }
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    async fn multipart(
        parts: &[(&str, Option<&str>, &[u8])],
    ) -> Result<Multipart, MultipartRejection> {
        let request = Request::builder()
            .method("POST")
            .uri("/api/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(parts)))
            .unwrap();
        let form = Multipart::from_request(request, &()).await;
        assert!(form.is_ok());
        form
    }

    #[tokio::test]
    async fn test_upload_then_list() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());
        let model = vec![7u8; 12_000];

        let form = multipart(&[("files", Some("my model.stl"), model.as_slice())]).await;
        let Json(resp) = upload(State(state.clone()), form).await.unwrap();
        assert_eq!(resp.count, 1);
        assert_eq!(resp.files[0].name, "my model.stl");
        assert_eq!(resp.files[0].url, "/uploads/my-model.stl");
        assert_eq!(resp.files[0].size, 12_000);
        assert!(dir.path().join("my-model.stl").exists());

        let Json(listed) = list_files(State(state)).await.unwrap();
        assert_eq!(listed, resp.files);
    }

    #[tokio::test]
    async fn test_upload_without_files_is_client_error() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());

        let form = multipart(&[("note", None, &b"hello"[..])]).await;
        let err = upload(State(state.clone()), form).await.unwrap_err();
        assert!(matches!(err, ApiError::NoFilesUploaded));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);

        let Json(listed) = list_files(State(state)).await.unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn test_upload_ignores_other_fields() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());

        let form = multipart(&[
            ("files", Some("a.stl"), &b"solid a"[..]),
            ("comment", None, &b"skip me"[..]),
            ("files", Some("b.stl"), &b"solid b"[..]),
        ])
        .await;
        let Json(resp) = upload(State(state), form).await.unwrap();
        let names: Vec<_> = resp.files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["a.stl", "b.stl"]);
    }

    #[tokio::test]
    async fn test_non_multipart_body_gets_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());

        let request = Request::builder()
            .method("POST")
            .uri("/api/upload")
            .body(Body::empty())
            .unwrap();
        let form = Multipart::from_request(request, &()).await;
        assert!(form.is_err());

        let err = upload(State(state.clone()), form).await.unwrap_err();
        assert!(matches!(err, ApiError::UploadFailed));

        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: ErrorBody = serde_json::from_slice(&body).unwrap();
        assert_eq!(body.error, "Upload failed");

        let Json(listed) = list_files(State(state)).await.unwrap();
        assert!(listed.is_empty());
    }

    #[test]
    fn test_error_statuses() {
        assert_eq!(
            ApiError::UploadFailed.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::CatalogUnavailable.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert!(matches!(
            ApiError::from(UploadError::NoFilesProvided),
            ApiError::NoFilesUploaded
        ));
    }
}
