//! The client fingerprint a session is bound to.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::header::USER_AGENT;
use axum::http::request::Parts;
use axum::http::{Extensions, HeaderMap};

use crate::state::AppState;

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";

/// User agent and client IP observed on the current request.
///
/// Both are empty strings when unknown; an empty value only ever matches an
/// empty value captured at issuance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientInfo {
    pub user_agent: String,
    pub client_ip: String,
}

impl ClientInfo {
    /// Read the fingerprint from request headers and the peer address.
    ///
    /// With `trust_forwarded` the first `X-Forwarded-For` entry wins, then
    /// `X-Real-IP`; the TCP peer is used only when neither is present.
    pub fn from_request(headers: &HeaderMap, extensions: &Extensions, trust_forwarded: bool) -> Self {
        let user_agent = header_str(headers, USER_AGENT.as_str())
            .unwrap_or_default()
            .to_string();

        let forwarded = trust_forwarded
            .then(|| {
                header_str(headers, X_FORWARDED_FOR)
                    .and_then(|v| v.split(',').next())
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .or_else(|| {
                        header_str(headers, X_REAL_IP)
                            .map(str::trim)
                            .filter(|v| !v.is_empty())
                    })
            })
            .flatten();

        let client_ip = match forwarded {
            Some(ip) => ip.to_string(),
            None => extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
                .unwrap_or_default(),
        };

        Self {
            user_agent,
            client_ip,
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

impl FromRequestParts<AppState> for ClientInfo {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self::from_request(
            &parts.headers,
            &parts.extensions,
            state.config.trust_forwarded_headers,
        ))
    }
}
