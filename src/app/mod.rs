// PanicScope - app/mod.rs
//
// Application layer: acquisition orchestration, background analysis,
// state management.
// Dependencies: core, platform.
// Must NOT depend on: ui.

pub mod acquire;
pub mod analysis;
pub mod state;
