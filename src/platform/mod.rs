// McPlaytime - platform/mod.rs
//
// Platform abstraction layer.
// Dependencies: standard library, directories, flate2.
// Must NOT depend on: core, app.

pub mod config;
pub mod fs;
