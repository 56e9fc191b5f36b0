//! Handlers for registration, login and logout.

use std::fmt;

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use ledger_core::types::{Amount, DbId, Timestamp};
use ledger_db::models::session::CreateSession;
use ledger_db::models::user::{CreateUser, User};
use ledger_db::StoreError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::auth::client::ClientInfo;
use crate::auth::cookie::{clear_session_cookie, find_cookie, session_cookie, SESSION_COOKIE};
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::extract::ValidJson;
use crate::state::AppState;

const DUPLICATE_EMAIL: &str = "The Email has already registered.";
const INVALID_CREDENTIALS: &str = "Invalid email or password.";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /users`.
#[derive(Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[serde(default)]
    pub age: i32,
    #[serde(default)]
    pub balance: Amount,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .field("email", &self.email)
            .field("age", &self.age)
            .field("balance", &self.balance)
            .finish()
    }
}

/// Request body for `POST /login`.
#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .finish()
    }
}

/// Public user profile. Never includes the password hash.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub age: i32,
    pub balance: Amount,
    pub password_changed_at: Timestamp,
    pub created_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.name,
            email: user.email,
            age: user.age,
            balance: user.balance,
            password_changed_at: user.password_changed_at,
            created_at: user.created_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /users
///
/// Register a new user and start a session for them.
pub async fn create_user(
    State(state): State<AppState>,
    client: ClientInfo,
    ValidJson(input): ValidJson<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    tracing::debug!(request = ?input, "Register request");

    if state.store.get_user(&input.email).await?.is_some() {
        tracing::warn!(email = %input.email, "Email already registered");
        return Err(AppError::BadRequest(DUPLICATE_EMAIL.into()));
    }

    let password = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = state
        .store
        .create_user(&CreateUser {
            name: input.username,
            password,
            email: input.email,
            age: input.age,
            balance: input.balance,
        })
        .await
        .map_err(|err| match err {
            // Lost a race with a concurrent registration of the same email.
            StoreError::Conflict(_) => AppError::BadRequest(DUPLICATE_EMAIL.into()),
            other => other.into(),
        })?;

    let cookie = issue_session(&state, user.id, client).await?;
    tracing::info!(user_id = user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        [(SET_COOKIE, cookie)],
        Json(UserResponse::from(user)),
    ))
}

/// POST /login
///
/// Check credentials and start a new session.
pub async fn login_user(
    State(state): State<AppState>,
    client: ClientInfo,
    ValidJson(input): ValidJson<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    tracing::debug!(request = ?input, "Login request");

    let Some(user) = state.store.get_user(&input.email).await? else {
        tracing::warn!(email = %input.email, "Login for unregistered email");
        return Err(AppError::BadRequest(INVALID_CREDENTIALS.into()));
    };

    let password_valid = verify_password(&input.password, &user.password)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::warn!(user_id = user.id, "Wrong password");
        return Err(AppError::BadRequest(INVALID_CREDENTIALS.into()));
    }

    let cookie = issue_session(&state, user.id, client).await?;
    tracing::info!(user_id = user.id, "User logged in");

    Ok((
        StatusCode::OK,
        [(SET_COOKIE, cookie)],
        Json(UserResponse::from(user)),
    ))
}

/// POST /logout
///
/// Expire the presented session and tell the client to drop its cookie.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<impl IntoResponse> {
    let raw = find_cookie(&headers, SESSION_COOKIE).ok_or_else(|| {
        tracing::warn!("Logout without session cookie");
        AppError::unauthorized("cannot find cookie")
    })?;

    let session_id = Uuid::parse_str(raw).map_err(|_| {
        tracing::warn!("Logout with malformed session cookie");
        AppError::BadRequest("wrong cookie value found".into())
    })?;

    state.store.delete_session(session_id).await?;
    tracing::info!(%session_id, "Session expired by logout");

    let cookie = clear_session_cookie(&session_id.to_string())?;
    Ok((StatusCode::OK, [(SET_COOKIE, cookie)]))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Mint a session for `user_id` bound to the caller's fingerprint and return
/// the `Set-Cookie` value carrying it.
async fn issue_session(
    state: &AppState,
    user_id: DbId,
    client: ClientInfo,
) -> AppResult<HeaderValue> {
    let duration = state.config.session_duration();
    let id = state.sessions.create_session()?;

    let session = state
        .store
        .create_session(&CreateSession {
            id,
            user_id,
            user_agent: client.user_agent,
            client_ip: client.client_ip,
            expires_at: Utc::now() + duration,
        })
        .await?;

    Ok(session_cookie(session.id, duration.num_seconds())?)
}
