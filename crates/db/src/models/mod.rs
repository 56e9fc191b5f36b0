//! Row structs and insert DTOs.
//!
//! Each submodule contains a `FromRow` entity struct matching the database
//! row and, where rows are created through the API, a create DTO.

pub mod category;
pub mod expense;
pub mod receipt;
pub mod session;
pub mod user;
