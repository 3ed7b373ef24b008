//! Session-local handles for files opened from disk without uploading.

use std::collections::HashMap;
use std::sync::Arc;

use super::selection::SourceRef;

const LOCAL_SCHEME: &str = "local-blob:";

/// Bytes of a locally opened file
#[derive(Debug)]
pub struct LocalBlob {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Registry of live local blobs. Whoever creates a handle revokes it once the
/// selection that referenced it is superseded.
#[derive(Default)]
pub struct LocalBlobs {
    next_id: u64,
    entries: HashMap<SourceRef, Arc<LocalBlob>>,
}

impl LocalBlobs {
    pub fn is_local(source: &SourceRef) -> bool {
        source.as_str().starts_with(LOCAL_SCHEME)
    }

    /// Register bytes and mint a fresh, never reused handle
    pub fn create(&mut self, name: impl Into<String>, bytes: Vec<u8>) -> SourceRef {
        self.next_id += 1;
        let source = SourceRef::new(format!("{LOCAL_SCHEME}{}", self.next_id));
        let blob = LocalBlob {
            name: name.into(),
            bytes,
        };
        tracing::debug!("Created {} for {} ({} bytes)", source, blob.name, blob.bytes.len());
        self.entries.insert(source.clone(), Arc::new(blob));
        source
    }

    pub fn get(&self, source: &SourceRef) -> Option<Arc<LocalBlob>> {
        self.entries.get(source).cloned()
    }

    /// Release a handle. Loads already holding the bytes keep their `Arc`.
    pub fn revoke(&mut self, source: &SourceRef) -> bool {
        self.entries.remove(source).is_some()
    }

    /// Revoke every handle; returns how many were live
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
