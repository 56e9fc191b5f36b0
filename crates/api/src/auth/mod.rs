//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`session`] -- session id issuance and verification.
//! - [`cookie`] -- reading and writing the `session` cookie.
//! - [`client`] -- the user agent and client IP a session is bound to.

pub mod client;
pub mod cookie;
pub mod password;
pub mod session;
