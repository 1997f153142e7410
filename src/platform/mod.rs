// PanicScope - platform/mod.rs
//
// Platform abstraction layer: config directories, the extraction tool
// subprocess, and filesystem access.
// Dependencies: standard library, directories, glob, core model types.
// Must NOT depend on: app, ui.

pub mod config;
pub mod device_tool;
pub mod fs;
