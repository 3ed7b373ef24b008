// Library crate: viewer state, networking and the render surface.
// The eframe application shell (app, ui, i18n) stays in the binary crate.

pub mod api;
pub mod state;
pub mod tasks;
pub mod viewport;
