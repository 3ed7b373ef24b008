//! HTTP client for the catalog server.

use reqwest::multipart::{Form, Part};
use shared::{CatalogRecord, ErrorBody, UploadResponse, UPLOAD_FIELD};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("reading local file failed: {0}")]
    Read(String),
}

/// A file picked for upload
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a server path such as `/uploads/a.stl`
    pub fn resolve(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    pub async fn list_files(&self) -> Result<Vec<CatalogRecord>, ApiError> {
        let resp = self.http.get(self.resolve("/api/files")).send().await?;
        let resp = check_status(resp).await?;
        Ok(resp.json().await?)
    }

    pub async fn upload(&self, files: Vec<UploadFile>) -> Result<UploadResponse, ApiError> {
        let form = files.into_iter().fold(Form::new(), |form, file| {
            form.part(UPLOAD_FIELD, Part::bytes(file.bytes).file_name(file.name))
        });
        let resp = self
            .http
            .post(self.resolve("/api/upload"))
            .multipart(form)
            .send()
            .await?;
        let resp = check_status(resp).await?;
        Ok(resp.json().await?)
    }

    /// Raw bytes of a stored model
    pub async fn fetch_model(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let resp = self.http.get(self.resolve(url)).send().await?;
        let resp = check_status(resp).await?;
        Ok(resp.bytes().await?.to_vec())
    }
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let message = match resp.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status.canonical_reason().unwrap_or("unknown error").to_string(),
    };
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_paths() {
        let api = ApiClient::new("http://localhost:3001/");
        assert_eq!(api.base_url(), "http://localhost:3001");
        assert_eq!(
            api.resolve("/uploads/my-model.stl"),
            "http://localhost:3001/uploads/my-model.stl"
        );
        assert_eq!(api.resolve("api/files"), "http://localhost:3001/api/files");
        assert_eq!(
            api.resolve("https://cdn.example.com/a.stl"),
            "https://cdn.example.com/a.stl"
        );
    }

    #[test]
    fn test_status_error_message() {
        let err = ApiError::Status {
            status: 400,
            message: "No files uploaded".into(),
        };
        assert_eq!(err.to_string(), "server returned 400: No files uploaded");
    }
}
