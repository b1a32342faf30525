//! Pipeline module - load, build, inspect and aggregate the dataset

pub mod aggregate;
pub mod error;
pub mod frame;
pub mod inspect;
pub mod iris;
pub mod loader;

pub use aggregate::*;
pub use error::*;
pub use frame::*;
pub use inspect::*;
pub use loader::*;
