use std::net::IpAddr;

use axum::http::HeaderValue;

/// Default sliding session window: 30 minutes.
const DEFAULT_SESSION_DURATION_SECS: i64 = 30 * 60;

/// Longest accepted session window: one year.
const MAX_SESSION_DURATION_SECS: i64 = 365 * 24 * 3600;

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable, for local development.
    Pretty,
    /// One JSON object per line, for log shipping.
    Json,
}

/// A configuration value that is missing or cannot be parsed.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Server configuration loaded from environment variables.
///
/// Everything except `DATABASE_URL` has a default suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<HeaderValue>,
    pub request_timeout_secs: u64,
    /// Lifetime of a session after issuance or its latest renewal.
    pub session_duration_secs: i64,
    /// Whether `X-Forwarded-For` / `X-Real-IP` decide the client IP.
    pub trust_forwarded_headers: bool,
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                 |
    /// |---------------------------|-------------------------|
    /// | `HOST`                    | `0.0.0.0`               |
    /// | `PORT`                    | `8080`                  |
    /// | `DATABASE_URL`            | **required**            |
    /// | `DB_MAX_CONNECTIONS`      | `10`                    |
    /// | `CORS_ORIGINS`            | `http://localhost:3000` |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                    |
    /// | `SESSION_DURATION_SECS`   | `1800`                  |
    /// | `TRUST_FORWARDED_HEADERS` | `true`                  |
    /// | `LOG_FORMAT`              | `pretty`                |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host: IpAddr = parse_or(&lookup, "HOST", Some(IpAddr::from([0, 0, 0, 0])))?;
        let port = parse_or(&lookup, "PORT", Some(8080))?;
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let db_max_connections = parse_or(&lookup, "DB_MAX_CONNECTIONS", Some(10))?;
        let request_timeout_secs = parse_or(&lookup, "REQUEST_TIMEOUT_SECS", Some(30))?;
        let trust_forwarded_headers = parse_or(&lookup, "TRUST_FORWARDED_HEADERS", Some(true))?;

        let session_duration_secs: i64 = parse_or(
            &lookup,
            "SESSION_DURATION_SECS",
            Some(DEFAULT_SESSION_DURATION_SECS),
        )?;
        if session_duration_secs <= 0 || session_duration_secs > MAX_SESSION_DURATION_SECS {
            return Err(ConfigError::Invalid {
                name: "SESSION_DURATION_SECS",
                value: session_duration_secs.to_string(),
            });
        }

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000".into())
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|origin| {
                HeaderValue::from_str(origin).map_err(|_| ConfigError::Invalid {
                    name: "CORS_ORIGINS",
                    value: origin.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "LOG_FORMAT",
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            host,
            port,
            database_url,
            db_max_connections,
            cors_origins,
            request_timeout_secs,
            session_duration_secs,
            trust_forwarded_headers,
            log_format,
        })
    }

    /// The sliding session window as a duration to add to "now".
    pub fn session_duration(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.session_duration_secs)
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: Option<T>) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => default.ok_or(ConfigError::Missing(name)),
    }
}
