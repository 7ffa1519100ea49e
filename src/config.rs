use std::env;

use thiserror::Error;

/// Startup-time configuration failures. Any of these stops the service
/// before it binds a socket.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set")]
    MissingJwtSecret,

    #[error("{name} must be {expected}, got {value:?}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

pub struct Config {
    pub database_url: Option<String>,
    pub server_port: u16,
    pub server_host: String,
    pub jwt_secret: String,
    /// Token lifetime in seconds, always positive.
    pub token_ttl_secs: u32,
    pub bcrypt_cost: u32,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    /// Whether registration may request the `admin` role.
    pub allow_role_selection: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Empty values are
    /// treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let jwt_secret = get("JWT_SECRET").ok_or(ConfigError::MissingJwtSecret)?;

        Ok(Self {
            database_url: get("DATABASE_URL"),
            server_port: parse_or(get("SERVER_PORT"), "SERVER_PORT", "a port number", 5000)?,
            server_host: get("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            jwt_secret,
            token_ttl_secs: positive(parse_or(
                get("TOKEN_TTL_SECS"),
                "TOKEN_TTL_SECS",
                "a positive number of seconds",
                3600,
            )?)?,
            bcrypt_cost: parse_or(
                get("BCRYPT_COST"),
                "BCRYPT_COST",
                "a bcrypt cost",
                bcrypt::DEFAULT_COST,
            )?,
            admin_email: get("ADMIN_EMAIL"),
            admin_password: get("ADMIN_PASSWORD"),
            allow_role_selection: parse_or(
                get("ALLOW_ROLE_SELECTION"),
                "ALLOW_ROLE_SELECTION",
                "true or false",
                false,
            )?,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn parse_or<T: std::str::FromStr>(
    value: Option<String>,
    name: &'static str,
    expected: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            expected,
            value: raw,
        }),
    }
}

fn positive(secs: u32) -> Result<u32, ConfigError> {
    if secs == 0 {
        return Err(ConfigError::Invalid {
            name: "TOKEN_TTL_SECS",
            expected: "a positive number of seconds",
            value: secs.to_string(),
        });
    }
    Ok(secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_lookup(lookup(&[("JWT_SECRET", "s3cret")])).unwrap();

        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.database_url, None);
        assert_eq!(config.server_port, 5000);
        assert_eq!(config.server_host, "127.0.0.1");
        assert_eq!(config.token_ttl_secs, 3600);
        assert_eq!(config.bcrypt_cost, bcrypt::DEFAULT_COST);
        assert!(config.admin_email.is_none());
        assert!(!config.allow_role_selection);
        assert_eq!(config.server_url(), "http://127.0.0.1:5000");
    }

    #[test]
    fn test_config_custom_values() {
        let config = Config::from_lookup(lookup(&[
            ("JWT_SECRET", "s3cret"),
            ("DATABASE_URL", "postgres://test"),
            ("SERVER_PORT", "3000"),
            ("SERVER_HOST", "0.0.0.0"),
            ("TOKEN_TTL_SECS", "60"),
            ("BCRYPT_COST", "4"),
            ("ADMIN_EMAIL", "root@x.com"),
            ("ADMIN_PASSWORD", "hunter22"),
            ("ALLOW_ROLE_SELECTION", "true"),
        ]))
        .unwrap();

        assert_eq!(config.database_url.as_deref(), Some("postgres://test"));
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.server_host, "0.0.0.0");
        assert_eq!(config.token_ttl_secs, 60);
        assert_eq!(config.bcrypt_cost, 4);
        assert_eq!(config.admin_email.as_deref(), Some("root@x.com"));
        assert_eq!(config.admin_password.as_deref(), Some("hunter22"));
        assert!(config.allow_role_selection);
    }

    #[test]
    fn test_missing_secret_is_fatal() {
        assert_eq!(
            Config::from_lookup(lookup(&[])).err(),
            Some(ConfigError::MissingJwtSecret)
        );
        assert_eq!(
            Config::from_lookup(lookup(&[("JWT_SECRET", "   ")])).err(),
            Some(ConfigError::MissingJwtSecret)
        );
    }

    #[test]
    fn test_invalid_number_is_reported() {
        let err = Config::from_lookup(lookup(&[("JWT_SECRET", "x"), ("SERVER_PORT", "http")]))
            .err()
            .unwrap();
        assert_eq!(err.to_string(), "SERVER_PORT must be a port number, got \"http\"");
    }

    #[test]
    fn test_token_lifetime_must_be_positive_and_bounded() {
        for raw in ["0", "-10", "9223372036854775807", "1h"] {
            let err = Config::from_lookup(lookup(&[("JWT_SECRET", "x"), ("TOKEN_TTL_SECS", raw)]))
                .err()
                .unwrap();
            assert_eq!(
                err,
                ConfigError::Invalid {
                    name: "TOKEN_TTL_SECS",
                    expected: "a positive number of seconds",
                    value: raw.to_string(),
                }
            );
        }
    }
}
