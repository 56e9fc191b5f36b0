//! The `session` cookie.
//!
//! Every `Set-Cookie` carries `Path=/; Max-Age=N; HttpOnly; Secure`. Clearing
//! uses the same attributes with `Max-Age=0`.

use axum::http::header::{InvalidHeaderValue, COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use uuid::Uuid;

/// Name of the cookie that transports the session id.
pub const SESSION_COOKIE: &str = "session";

/// Find the value of the named cookie across every `Cookie` header.
///
/// Returns the first match. Headers that are not visible ASCII are skipped.
pub fn find_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim())
}

/// `Set-Cookie` value that stores `id` for `max_age_secs` seconds.
pub fn session_cookie(id: Uuid, max_age_secs: i64) -> Result<HeaderValue, InvalidHeaderValue> {
    build(&id.to_string(), max_age_secs)
}

/// `Set-Cookie` value that tells the client to drop the session cookie now.
pub fn clear_session_cookie(value: &str) -> Result<HeaderValue, InvalidHeaderValue> {
    build(value, 0)
}

fn build(value: &str, max_age_secs: i64) -> Result<HeaderValue, InvalidHeaderValue> {
    HeaderValue::from_str(&format!(
        "{SESSION_COOKIE}={value}; Path=/; Max-Age={max_age_secs}; HttpOnly; Secure"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(values: &[&str]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for v in values {
            map.append(COOKIE, HeaderValue::from_str(v).unwrap());
        }
        map
    }

    #[test]
    fn finds_cookie_among_others() {
        let map = headers(&["theme=dark; session=abc ; lang=en"]);
        assert_eq!(find_cookie(&map, SESSION_COOKIE), Some("abc"));
    }

    #[test]
    fn searches_every_cookie_header() {
        let map = headers(&["theme=dark", "session=xyz"]);
        assert_eq!(find_cookie(&map, SESSION_COOKIE), Some("xyz"));
    }

    #[test]
    fn missing_cookie_is_none() {
        assert_eq!(find_cookie(&headers(&["sessionid=1"]), SESSION_COOKIE), None);
        assert_eq!(find_cookie(&HeaderMap::new(), SESSION_COOKIE), None);
    }

    #[test]
    fn session_cookie_has_required_attributes() {
        let id = Uuid::nil();
        let value = session_cookie(id, 1800).unwrap();
        assert_eq!(
            value.to_str().unwrap(),
            "session=00000000-0000-0000-0000-000000000000; Path=/; Max-Age=1800; HttpOnly; Secure"
        );
    }

    #[test]
    fn clearing_sets_max_age_zero() {
        let value = clear_session_cookie("abc").unwrap();
        assert_eq!(
            value.to_str().unwrap(),
            "session=abc; Path=/; Max-Age=0; HttpOnly; Secure"
        );
    }

    #[test]
    fn control_characters_are_rejected() {
        assert!(clear_session_cookie("a\nb").is_err());
    }
}
