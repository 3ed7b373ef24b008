//! Sidebar visibility driven by viewport width and user toggles.

/// Width (logical points) at or below which the viewport counts as narrow
pub const SIDEBAR_BREAKPOINT: f32 = 768.0;

pub fn is_narrow(width: f32) -> bool {
    width <= SIDEBAR_BREAKPOINT
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutController {
    sidebar_open: bool,
    narrow: bool,
}

impl LayoutController {
    pub fn new(viewport_width: f32) -> Self {
        let narrow = is_narrow(viewport_width);
        Self {
            sidebar_open: !narrow,
            narrow,
        }
    }

    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    pub fn is_narrow(&self) -> bool {
        self.narrow
    }

    /// Breakpoint feed. Only a crossing re-derives the sidebar state, so a
    /// manual toggle survives any number of same-side events.
    pub fn on_viewport_change(&mut self, below_breakpoint: bool) {
        if below_breakpoint == self.narrow {
            return;
        }
        tracing::debug!("Viewport crossed breakpoint (narrow = {})", below_breakpoint);
        self.narrow = below_breakpoint;
        self.sidebar_open = !below_breakpoint;
    }

    /// Raw width feed, called every frame
    pub fn on_viewport_width(&mut self, width: f32) {
        self.on_viewport_change(is_narrow(width));
    }

    pub fn toggle(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }

    /// Collapse the sidebar after a pick on narrow viewports
    pub fn on_model_selected(&mut self) {
        if self.narrow {
            self.sidebar_open = false;
        }
    }
}
