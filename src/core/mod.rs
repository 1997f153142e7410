// PanicScope - core/mod.rs
//
// Core business logic layer: signature rules, classification, report text.
// Must NOT depend on: ui, platform, app, or any I/O.

pub mod classifier;
pub mod model;
pub mod report;
pub mod rules;
