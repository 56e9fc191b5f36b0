//! Domain-wide types and error classification shared by the persistence
//! and HTTP crates.

pub mod error;
pub mod types;
