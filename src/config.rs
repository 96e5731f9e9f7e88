// src/config.rs
use crate::error::{AppError, AppResult};
use std::{env, net::SocketAddr, str::FromStr};

/// Minimum length accepted for the cookie signing key.
pub const MIN_SESSION_SECRET_LEN: usize = 64;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub session_secret: String,
    pub addr: SocketAddr,
    pub db_max_connections: u32,
    pub session_inactivity_days: i64,
    pub seed_default_accounts: bool,
    pub seed_admin_password: String,
    pub seed_user_password: String,
}

impl Config {
    /// Reads the configuration from the environment (after `.env` has been loaded).
    pub fn from_env() -> AppResult<Self> {
        let database_url = env::var("DATABASE_URL")?;

        let session_secret = env::var("SESSION_SECRET")?;
        if session_secret.len() < MIN_SESSION_SECRET_LEN {
            return Err(AppError::Config(format!(
                "SESSION_SECRET must be at least {} bytes",
                MIN_SESSION_SECRET_LEN
            )));
        }

        Ok(Self {
            database_url,
            session_secret,
            addr: parse_or("APP_ADDR", SocketAddr::from(([0, 0, 0, 0], 3000)))?,
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", 5)?,
            session_inactivity_days: parse_or("SESSION_INACTIVITY_DAYS", 1)?,
            seed_default_accounts: parse_or("SEED_DEFAULT_ACCOUNTS", true)?,
            seed_admin_password: env::var("SEED_ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".into()),
            seed_user_password: env::var("SEED_USER_PASSWORD").unwrap_or_else(|_| "user123".into()),
        })
    }

    #[cfg(test)]
    pub fn for_tests(database_url: &str) -> Self {
        Self {
            database_url: database_url.into(),
            session_secret: "x".repeat(MIN_SESSION_SECRET_LEN),
            addr: ([127, 0, 0, 1], 0).into(),
            db_max_connections: 8,
            session_inactivity_days: 1,
            seed_default_accounts: true,
            seed_admin_password: "admin123".into(),
            seed_user_password: "user123".into(),
        }
    }
}

// Optional variable: falls back to `default` when unset, errors when set but unparsable.
fn parse_or<T: FromStr>(key: &str, default: T) -> AppResult<T> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} has an invalid value: {:?}", key, raw))),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_or_uses_default_when_unset() {
        let value: u32 = parse_or("HOTEL_TEST_SURELY_UNSET_VARIABLE", 7).unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn parse_or_rejects_garbage() {
        // Variable name is unique to this test so parallel tests don't race on it
        env::set_var("HOTEL_TEST_BAD_NUMBER", "not-a-number");
        let result: AppResult<u32> = parse_or("HOTEL_TEST_BAD_NUMBER", 1);
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
