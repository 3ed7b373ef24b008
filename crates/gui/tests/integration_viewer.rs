//! Integration tests for the viewer session.
//!
//! Drives `ViewerState` through `apply_event` the way the app loop does:
//! background results arrive as `TaskEvent`s, followups are checked by hand.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use glam::Vec3;

use shared::{CatalogRecord, UploadResponse};
use stlview_gui_lib::api::ApiError;
use stlview_gui_lib::state::{LoadPhase, LocalBlobs, SourceRef, UploadStatus, ViewerState};
use stlview_gui_lib::tasks::{apply_event, Followup, TaskEvent};
use stlview_gui_lib::viewport::mesh::ModelMesh;

fn record(id: &str, name: &str) -> CatalogRecord {
    CatalogRecord {
        id: id.to_string(),
        name: name.to_string(),
        url: format!("/uploads/{name}"),
        size: 84,
        created_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
    }
}

fn triangle() -> Arc<ModelMesh> {
    Arc::new(
        ModelMesh::from_positions(vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ])
        .unwrap(),
    )
}

fn fetched(state: &mut ViewerState, records: Vec<CatalogRecord>) {
    let ticket = state.catalog.begin_refresh();
    let followup = apply_event(
        state,
        TaskEvent::CatalogFetched {
            ticket,
            result: Ok(records),
        },
    );
    assert_eq!(followup, Followup::default());
}

fn resolved(state: &mut ViewerState, source: &SourceRef) -> Followup {
    apply_event(
        state,
        TaskEvent::ModelResolved {
            source: source.clone(),
            result: Ok(triangle()),
        },
    )
}

#[test]
fn test_upload_refresh_select_and_render() {
    let mut state = ViewerState::new(1280.0);
    fetched(&mut state, Vec::new());

    state.upload_started(1);
    assert_eq!(state.upload, UploadStatus::InFlight { files: 1 });

    let uploaded = record("r1", "my-model.stl");
    let followup = apply_event(
        &mut state,
        TaskEvent::UploadFinished(Ok(UploadResponse::new(vec![uploaded.clone()]))),
    );
    assert!(followup.refresh_catalog);
    assert_eq!(state.upload, UploadStatus::Done { files: 1 });

    fetched(&mut state, vec![uploaded]);
    assert_eq!(state.catalog.current().len(), 1);

    let selected = state.select_catalog_entry(0).unwrap();
    assert_eq!(selected.url, "/uploads/my-model.stl");
    assert!(state.selection.is_loading());
    assert!(state.displayed().is_none());

    let source = SourceRef::new(selected.url);
    resolved(&mut state, &source);

    assert_eq!(*state.selection.phase(), LoadPhase::Loaded);
    assert!(state.selection.duration_ms().unwrap() >= 0.0);
    let (shown, mesh) = state.displayed().unwrap();
    assert_eq!(shown, &source);
    assert_eq!(mesh.triangle_count(), 1);
}

#[test]
fn test_stale_model_is_not_displayed() {
    let mut state = ViewerState::new(1280.0);
    fetched(&mut state, vec![record("a", "a.stl"), record("b", "b.stl")]);

    let a = SourceRef::new(state.select_catalog_entry(0).unwrap().url);
    let b = SourceRef::new(state.select_catalog_entry(1).unwrap().url);

    resolved(&mut state, &a);
    assert!(state.displayed().is_none());
    assert!(state.selection.is_loading());

    resolved(&mut state, &b);
    assert_eq!(state.displayed().unwrap().0, &b);
}

#[test]
fn test_stale_failure_does_not_override_loaded_model() {
    let mut state = ViewerState::new(1280.0);
    fetched(&mut state, vec![record("a", "a.stl"), record("b", "b.stl")]);

    let a = SourceRef::new(state.select_catalog_entry(0).unwrap().url);
    let b = SourceRef::new(state.select_catalog_entry(1).unwrap().url);
    resolved(&mut state, &b);

    apply_event(
        &mut state,
        TaskEvent::ModelResolved {
            source: a,
            result: Err("404 Not Found".to_string()),
        },
    );
    assert_eq!(*state.selection.phase(), LoadPhase::Loaded);
    assert!(state.displayed().is_some());
}

#[test]
fn test_failed_load_reports_failure() {
    let mut state = ViewerState::new(1280.0);
    fetched(&mut state, vec![record("a", "broken.stl")]);
    let source = SourceRef::new(state.select_catalog_entry(0).unwrap().url);

    apply_event(
        &mut state,
        TaskEvent::ModelResolved {
            source,
            result: Err("not a readable STL file".to_string()),
        },
    );
    assert!(matches!(state.selection.phase(), LoadPhase::Failed(_)));
    assert!(!state.selection.is_loading());
    assert!(state.displayed().is_none());
}

#[test]
fn test_local_file_read_requests_load() {
    let mut state = ViewerState::new(1280.0);

    let followup = apply_event(
        &mut state,
        TaskEvent::LocalFileRead {
            name: "part.stl".to_string(),
            result: Ok(b"solid empty\nendsolid empty\n".to_vec()),
        },
    );
    let source = followup.load.unwrap();
    assert!(LocalBlobs::is_local(&source));
    assert!(state.selection.is_active(&source));
    assert_eq!(state.local_blob(&source).unwrap().name, "part.stl");
    assert_eq!(state.catalog.current().len(), 0);
}

#[test]
fn test_local_read_error_changes_nothing() {
    let mut state = ViewerState::new(1280.0);
    let followup = apply_event(
        &mut state,
        TaskEvent::LocalFileRead {
            name: "gone.stl".to_string(),
            result: Err("No such file or directory".to_string()),
        },
    );
    assert_eq!(followup, Followup::default());
    assert!(state.selection.active().is_none());
    assert!(state.blobs.is_empty());
}

#[test]
fn test_superseded_local_blob_is_revoked() {
    let mut state = ViewerState::new(1280.0);
    let first = state.open_local_file("one.stl", vec![1, 2, 3]);
    assert!(state.local_blob(&first).is_some());

    let second = state.open_local_file("two.stl", vec![4, 5, 6]);
    assert_ne!(first, second);
    assert!(state.local_blob(&first).is_none());
    assert!(state.local_blob(&second).is_some());
    assert_eq!(state.blobs.len(), 1);

    fetched(&mut state, vec![record("r", "remote.stl")]);
    state.select_catalog_entry(0).unwrap();
    assert!(state.local_blob(&second).is_none());
    assert!(state.blobs.is_empty());
}

#[test]
fn test_release_all_on_close() {
    let mut state = ViewerState::new(1280.0);
    let source = state.open_local_file("one.stl", vec![1, 2, 3]);
    resolved(&mut state, &source);
    assert!(state.displayed().is_some());

    state.release_all();
    assert!(state.blobs.is_empty());
    assert!(state.displayed().is_none());
}

#[test]
fn test_server_upload_error_still_refreshes() {
    let mut state = ViewerState::new(1280.0);
    fetched(&mut state, vec![record("r", "kept.stl")]);

    state.upload_started(2);
    let followup = apply_event(
        &mut state,
        TaskEvent::UploadFinished(Err(ApiError::Status {
            status: 500,
            message: "Upload failed".to_string(),
        })),
    );
    assert!(followup.refresh_catalog);
    assert_eq!(state.upload, UploadStatus::Failed);
    assert_eq!(state.catalog.current().len(), 1);

    // Records committed before the failure show up after the refresh
    fetched(&mut state, vec![record("r", "kept.stl"), record("p", "partial.stl")]);
    assert_eq!(state.catalog.current().len(), 2);
}

#[test]
fn test_unreadable_upload_does_not_refresh() {
    let mut state = ViewerState::new(1280.0);
    state.upload_started(1);
    let followup = apply_event(
        &mut state,
        TaskEvent::UploadFinished(Err(ApiError::Read("permission denied".to_string()))),
    );
    assert!(!followup.refresh_catalog);
    assert_eq!(state.upload, UploadStatus::Failed);
}

#[test]
fn test_out_of_order_refresh_keeps_newest() {
    let mut state = ViewerState::new(1280.0);
    let older = state.catalog.begin_refresh();
    let newer = state.catalog.begin_refresh();

    apply_event(
        &mut state,
        TaskEvent::CatalogFetched {
            ticket: newer,
            result: Ok(vec![record("a", "a.stl"), record("b", "b.stl")]),
        },
    );
    apply_event(
        &mut state,
        TaskEvent::CatalogFetched {
            ticket: older,
            result: Ok(vec![record("a", "a.stl")]),
        },
    );
    assert_eq!(state.catalog.current().len(), 2);
    assert!(!state.catalog.is_refreshing());
}

#[test]
fn test_narrow_layout_collapses_on_selection() {
    let mut state = ViewerState::new(600.0);
    assert!(state.layout.is_narrow());
    assert!(!state.layout.sidebar_open());

    state.layout.toggle();
    assert!(state.layout.sidebar_open());

    state.open_local_file("phone.stl", vec![0; 4]);
    assert!(!state.layout.sidebar_open());

    // Growing past the breakpoint reopens the sidebar
    state.layout.on_viewport_width(1024.0);
    assert!(state.layout.sidebar_open());
    state.open_local_file("desk.stl", vec![0; 4]);
    assert!(state.layout.sidebar_open());
}
