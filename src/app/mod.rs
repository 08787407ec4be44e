// McPlaytime - app/mod.rs
//
// Application layer: input resolution and scan orchestration.
// Dependencies: core layer, platform::fs for opening log files.

pub mod input;
pub mod scan;
