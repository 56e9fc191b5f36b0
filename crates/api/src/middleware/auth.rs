//! Session gate for protected routes.
//!
//! Per request: read the `session` cookie, parse it as a UUID, verify it
//! against the store with the observed client fingerprint, push the expiry
//! forward, run the handler, then re-issue the cookie with the same id.
//! Every successful pass costs exactly one store read and one store write.

use axum::extract::{Request, State};
use axum::http::header::SET_COOKIE;
use axum::middleware::Next;
use axum::response::Response;
use chrono::Utc;
use uuid::Uuid;

use crate::auth::client::ClientInfo;
use crate::auth::cookie::{find_cookie, session_cookie, SESSION_COOKIE};
use crate::auth::session::{SessionError, VerifySession};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Reject requests without a live session and renew the ones that have one.
pub async fn require_session(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> AppResult<Response> {
    let raw = find_cookie(request.headers(), SESSION_COOKIE)
        .ok_or_else(|| AppError::unauthorized("cannot find cookie"))?;

    let session_id = Uuid::parse_str(raw).map_err(|_| {
        tracing::warn!("Malformed session cookie");
        AppError::unauthorized("wrong cookie value found")
    })?;

    let client = ClientInfo::from_request(
        request.headers(),
        request.extensions(),
        state.config.trust_forwarded_headers,
    );
    let verify = VerifySession {
        session_id,
        user_agent: client.user_agent,
        client_ip: client.client_ip,
    };

    match state.sessions.verify_session(&verify).await {
        Ok(true) => {}
        Ok(false) | Err(SessionError::NotFound) => {
            tracing::warn!(%session_id, "Session was not verified");
            return Err(AppError::unauthorized("session was not verified"));
        }
        Err(err) => {
            tracing::error!(%session_id, error = %err, "Session verification failed");
            return Err(AppError::ServiceUnavailable(
                "session store unavailable".into(),
            ));
        }
    }

    let duration = state.config.session_duration();
    let renewed = state
        .store
        .update_session(session_id, Utc::now() + duration)
        .await?;
    if !renewed {
        return Err(AppError::InternalError(format!(
            "session {session_id} vanished before renewal"
        )));
    }
    let cookie = session_cookie(session_id, duration.num_seconds())?;

    tracing::debug!(%session_id, "Session renewed");

    let mut response = next.run(request).await;
    response.headers_mut().append(SET_COOKIE, cookie);
    Ok(response)
}
