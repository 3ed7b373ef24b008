pub mod sidebar;
pub mod status_bar;
