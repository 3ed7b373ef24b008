use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier of a catalog record
pub type RecordId = String;

/// Web path prefix under which stored uploads are served
pub const UPLOADS_PREFIX: &str = "/uploads";

/// Multipart field carrying the uploaded files
pub const UPLOAD_FIELD: &str = "files";

/// One file known to the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRecord {
    pub id: RecordId,
    /// Original file name as uploaded (not sanitized)
    pub name: String,
    /// Public web path of the stored bytes
    pub url: String,
    /// Size in bytes
    pub size: u64,
    pub created_at: DateTime<Utc>,
}

/// Successful upload response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub count: usize,
    pub files: Vec<CatalogRecord>,
}

impl UploadResponse {
    pub fn new(files: Vec<CatalogRecord>) -> Self {
        Self {
            count: files.len(),
            files,
        }
    }
}

/// JSON error body returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Whitespace as web `\s` counts it: `char::is_whitespace` plus U+FEFF,
/// minus U+0085.
fn is_name_space(ch: char) -> bool {
    match ch {
        '\u{feff}' => true,
        '\u{85}' => false,
        c => c.is_whitespace(),
    }
}

/// Storage name for an uploaded file.
///
/// Every run of whitespace becomes a single `-`. Directory components are
/// dropped so the result is always a bare file name.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);

    let mut out = String::with_capacity(base.len());
    let mut in_space = false;
    for ch in base.chars() {
        if is_name_space(ch) {
            if !in_space {
                out.push('-');
                in_space = true;
            }
        } else {
            out.push(ch);
            in_space = false;
        }
    }

    match out.as_str() {
        "" | "." | ".." => "upload".to_string(),
        _ => out,
    }
}

/// Public web path for a sanitized storage name
pub fn public_url(sanitized: &str) -> String {
    format!("{UPLOADS_PREFIX}/{sanitized}")
}
