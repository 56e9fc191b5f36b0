//! Request interceptors.
//!
//! - [`auth::require_session`] -- cookie session gate with sliding renewal.

pub mod auth;
