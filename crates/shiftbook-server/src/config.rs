use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};

/// Placeholder JWT secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &[
    "change-me",
    "change-me-to-a-random-string",
    "dev-secret-change-me",
    "secret",
];

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub db_path: PathBuf,
    pub jwt_secret: String,
    pub write_limit: u32,
    pub write_window: Duration,
    pub token_ttl: chrono::Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let jwt_secret = get("SHIFTBOOK_JWT_SECRET").unwrap_or_default();
        if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            bail!("SHIFTBOOK_JWT_SECRET is unset or still a placeholder; set it in .env and restart");
        }

        let host = get("SHIFTBOOK_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = parse_or(&get, "SHIFTBOOK_PORT", 3000)?;
        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", host, port))?;

        let db_path = get("SHIFTBOOK_DB_PATH")
            .unwrap_or_else(|| "shiftbook.db".into())
            .into();
        let write_limit = parse_or(&get, "SHIFTBOOK_WRITE_LIMIT", 30)?;
        let window_secs: u64 = parse_or(&get, "SHIFTBOOK_WRITE_WINDOW_SECS", 60)?;
        let ttl_days: i64 = parse_or(&get, "SHIFTBOOK_TOKEN_TTL_DAYS", 30)?;
        if ttl_days <= 0 {
            bail!("SHIFTBOOK_TOKEN_TTL_DAYS must be positive");
        }

        Ok(Self {
            addr,
            db_path,
            jwt_secret,
            write_limit,
            write_window: Duration::from_secs(window_secs),
            token_ttl: chrono::Duration::days(ttl_days),
        })
    }
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {:?}", key, raw)),
        None => Ok(default),
    }
}
