use log::{info, warn};
use std::env;
use thiserror::Error;

pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set")]
    MissingJwtSecret,
}

/// Token-signing configuration, loaded from the environment at startup.
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
}

impl AuthConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let jwt_secret = env::var("JWT_SECRET").map_err(|_| ConfigError::MissingJwtSecret)?;
        if jwt_secret.len() < 16 {
            warn!("JWT_SECRET is shorter than 16 bytes; use a stronger secret in production");
        }

        let token_ttl_hours = parse_ttl_hours(env::var("TOKEN_TTL_HOURS").ok());
        info!("Session tokens expire after {} hours", token_ttl_hours);

        Ok(AuthConfig {
            jwt_secret,
            token_ttl_hours,
        })
    }
}

fn parse_ttl_hours(raw: Option<String>) -> i64 {
    match raw {
        Some(value) => match value.parse::<i64>() {
            Ok(hours) if hours > 0 => hours,
            _ => {
                warn!("TOKEN_TTL_HOURS {:?} is not a positive integer, using default", value);
                DEFAULT_TOKEN_TTL_HOURS
            }
        },
        None => DEFAULT_TOKEN_TTL_HOURS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ttl_defaults_to_24_hours() {
        assert_eq!(parse_ttl_hours(None), 24);
    }

    #[test]
    fn ttl_parses_positive_integers() {
        assert_eq!(parse_ttl_hours(Some("48".to_string())), 48);
    }

    #[test]
    fn ttl_falls_back_on_garbage() {
        assert_eq!(parse_ttl_hours(Some("soon".to_string())), DEFAULT_TOKEN_TTL_HOURS);
        assert_eq!(parse_ttl_hours(Some("0".to_string())), DEFAULT_TOKEN_TTL_HOURS);
        assert_eq!(parse_ttl_hours(Some("-1".to_string())), DEFAULT_TOKEN_TTL_HOURS);
    }
}
