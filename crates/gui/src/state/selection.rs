//! Active model selection and load timing.
//!
//! Exactly one model is active after the first selection. Completion signals
//! are matched against the active source reference; a signal for anything
//! else is stale and ignored, so a slow superseded load can never overwrite
//! the state or timing of a newer selection.

use std::fmt;
use std::time::Instant;

use shared::CatalogRecord;

/// Reference the render surface resolves: a catalog URL or a local blob handle
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceRef(String);

impl SourceRef {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Catalog entry stored on the server
    Remote,
    /// Ephemeral client-held blob, never uploaded
    Local,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveModel {
    pub kind: SourceKind,
    pub source: SourceRef,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadPhase {
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadMeasurement {
    pub started_at: Instant,
    /// Elapsed time until completion; `None` while pending
    pub duration_ms: Option<f64>,
}

pub struct LoadController {
    active: Option<ActiveModel>,
    phase: LoadPhase,
    measurement: Option<LoadMeasurement>,
}

impl Default for LoadController {
    fn default() -> Self {
        Self {
            active: None,
            phase: LoadPhase::Idle,
            measurement: None,
        }
    }
}

impl LoadController {
    pub fn active(&self) -> Option<&ActiveModel> {
        self.active.as_ref()
    }

    pub fn active_source(&self) -> Option<&SourceRef> {
        self.active.as_ref().map(|m| &m.source)
    }

    pub fn phase(&self) -> &LoadPhase {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == LoadPhase::Loading
    }

    pub fn measurement(&self) -> Option<&LoadMeasurement> {
        self.measurement.as_ref()
    }

    /// Load time of the active model, once its completion was accepted
    pub fn duration_ms(&self) -> Option<f64> {
        self.measurement.and_then(|m| m.duration_ms)
    }

    /// Whether `source` is the active reference
    pub fn is_active(&self, source: &SourceRef) -> bool {
        self.active_source() == Some(source)
    }

    /// Activate a catalog entry. Returns the superseded model, if any.
    pub fn select_remote(&mut self, record: &CatalogRecord) -> Option<ActiveModel> {
        self.select_remote_at(record, Instant::now())
    }

    pub fn select_remote_at(&mut self, record: &CatalogRecord, now: Instant) -> Option<ActiveModel> {
        self.activate(SourceKind::Remote, SourceRef::new(record.url.clone()), now)
    }

    /// Activate a local blob. The caller keeps ownership of the blob and
    /// releases it once the returned superseded model no longer needs it.
    pub fn select_local(&mut self, source: SourceRef) -> Option<ActiveModel> {
        self.select_local_at(source, Instant::now())
    }

    pub fn select_local_at(&mut self, source: SourceRef, now: Instant) -> Option<ActiveModel> {
        self.activate(SourceKind::Local, source, now)
    }

    fn activate(&mut self, kind: SourceKind, source: SourceRef, now: Instant) -> Option<ActiveModel> {
        tracing::debug!("Activating {:?} model {}", kind, source);
        self.phase = LoadPhase::Loading;
        self.measurement = Some(LoadMeasurement {
            started_at: now,
            duration_ms: None,
        });
        self.active.replace(ActiveModel { kind, source })
    }

    /// Render surface finished `source`. Returns `false` for a stale signal.
    pub fn report_load_complete(&mut self, source: &SourceRef) -> bool {
        self.report_load_complete_at(source, Instant::now())
    }

    pub fn report_load_complete_at(&mut self, source: &SourceRef, now: Instant) -> bool {
        if !self.accepts(source) {
            return false;
        }
        self.phase = LoadPhase::Loaded;
        if let Some(m) = self.measurement.as_mut() {
            let elapsed = now.saturating_duration_since(m.started_at);
            m.duration_ms = Some(elapsed.as_secs_f64() * 1000.0);
        }
        true
    }

    /// Render surface gave up on `source`. Returns `false` for a stale signal.
    pub fn report_load_failed(&mut self, source: &SourceRef, message: impl Into<String>) -> bool {
        if !self.accepts(source) {
            return false;
        }
        self.phase = LoadPhase::Failed(message.into());
        true
    }

    fn accepts(&self, source: &SourceRef) -> bool {
        if self.phase != LoadPhase::Loading || !self.is_active(source) {
            tracing::debug!("Ignoring stale completion for {}", source);
            return false;
        }
        true
    }
}
