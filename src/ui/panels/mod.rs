// PanicScope - ui/panels/mod.rs

pub mod about;
pub mod config_warnings;
pub mod error_notice;
pub mod findings;
pub mod log_view;
