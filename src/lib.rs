// McPlaytime - lib.rs
//
// Library entry point, exposing the scanning core for the CLI and for
// integration testing.

pub mod app;
pub mod core;
pub mod platform;
pub mod util;
