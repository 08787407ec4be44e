// McPlaytime - core/mod.rs
//
// Core business logic layer.
// Must NOT depend on: platform or app. Works on Read/Seek/Write trait
// objects; opening files is left to the layers above.

pub mod backscan;
pub mod export;
pub mod extract;
pub mod logfile;
pub mod model;
pub mod report;
