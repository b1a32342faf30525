//! Report module - console output and JSON export of exploration results

pub mod export;
pub mod summary;

pub use export::*;
pub use summary::*;
