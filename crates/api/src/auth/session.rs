//! Session id issuance and verification.
//!
//! A session id is 128 random bits rendered as a canonical version-4 UUID.
//! The randomness comes from an injected [`RandomSource`] so tests can seed
//! it; production reads from the operating system.
//!
//! Verification is a pure comparison over the stored row: a session is valid
//! iff it has not expired and the presented user agent and client IP equal
//! the ones captured at issuance.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use ledger_core::types::Timestamp;
use ledger_db::models::session::Session;
use ledger_db::{CredentialStore, StoreError};
use rand::rngs::{OsRng, StdRng};
use rand::{RngCore, SeedableRng, TryRngCore};
use uuid::Uuid;

/// Failure while issuing or verifying a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No session row exists for the presented id.
    #[error("session not found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),

    /// The random source could not produce bytes.
    #[error("random source unavailable: {0}")]
    Entropy(String),
}

/// What a request presents when it claims a session.
#[derive(Debug, Clone)]
pub struct VerifySession {
    pub session_id: Uuid,
    pub user_agent: String,
    pub client_ip: String,
}

/// Issues and verifies session ids.
#[async_trait]
pub trait SessionManager: Send + Sync {
    /// Produce a fresh, unguessable session id. Does not touch the store.
    fn create_session(&self) -> Result<Uuid, SessionError>;

    /// Check a presented session against the stored row.
    ///
    /// Returns `Ok(false)` for an expired or fingerprint-mismatched session and
    /// `Err(SessionError::NotFound)` when no row exists.
    async fn verify_session(&self, request: &VerifySession) -> Result<bool, SessionError>;
}

// ---------------------------------------------------------------------------
// Random sources
// ---------------------------------------------------------------------------

/// A fallible source of random bytes.
pub trait RandomSource: Send + Sync {
    fn fill(&self, dest: &mut [u8]) -> Result<(), SessionError>;
}

/// Reads the operating system CSPRNG on every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill(&self, dest: &mut [u8]) -> Result<(), SessionError> {
        OsRng
            .try_fill_bytes(dest)
            .map_err(|e| SessionError::Entropy(e.to_string()))
    }
}

/// A `StdRng` seeded once at construction.
#[derive(Debug)]
pub struct SeededRandom(Mutex<StdRng>);

impl SeededRandom {
    /// Deterministic stream for tests.
    pub fn from_seed(seed: u64) -> Self {
        Self(Mutex::new(StdRng::seed_from_u64(seed)))
    }

    /// Seed from the operating system.
    pub fn from_os() -> Result<Self, SessionError> {
        let rng = StdRng::try_from_os_rng().map_err(|e| SessionError::Entropy(e.to_string()))?;
        Ok(Self(Mutex::new(rng)))
    }
}

impl RandomSource for SeededRandom {
    fn fill(&self, dest: &mut [u8]) -> Result<(), SessionError> {
        let mut rng = self
            .0
            .lock()
            .map_err(|_| SessionError::Entropy("random source lock poisoned".into()))?;
        rng.fill_bytes(dest);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// UUID-based manager
// ---------------------------------------------------------------------------

/// [`SessionManager`] that mints UUIDv4 ids and verifies against a
/// [`CredentialStore`].
pub struct UuidSessionManager {
    store: Arc<dyn CredentialStore>,
    random: Arc<dyn RandomSource>,
}

impl UuidSessionManager {
    pub fn new(store: Arc<dyn CredentialStore>, random: Arc<dyn RandomSource>) -> Self {
        Self { store, random }
    }
}

#[async_trait]
impl SessionManager for UuidSessionManager {
    fn create_session(&self) -> Result<Uuid, SessionError> {
        let mut bytes = [0u8; 16];
        self.random.fill(&mut bytes)?;
        Ok(uuid::Builder::from_random_bytes(bytes).into_uuid())
    }

    async fn verify_session(&self, request: &VerifySession) -> Result<bool, SessionError> {
        let session = self
            .store
            .get_session(request.session_id)
            .await?
            .ok_or(SessionError::NotFound)?;

        Ok(is_valid(&session, request, Utc::now()))
    }
}

/// All three conditions are required; there is no grace period.
pub fn is_valid(session: &Session, request: &VerifySession, now: Timestamp) -> bool {
    session.expires_at > now
        && session.user_agent == request.user_agent
        && session.client_ip == request.client_ip
}
