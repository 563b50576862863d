//! Runtime settings read from the environment (`.env` is loaded by the server binary).

use crate::error::ConfigError;

pub const MEMORY_DATABASE_URL: &str = "memory://";

#[derive(Clone, Debug)]
pub struct Settings {
    /// PostgreSQL URL, or `memory://` for the in-process store.
    pub database_url: String,
    pub max_connections: u32,
    pub bind_addr: String,
    /// Run cascade deletes in one transaction instead of step-by-step commits.
    pub atomic_cascade: bool,
    pub max_image_bytes: usize,
    pub s3_bucket: Option<String>,
    /// Public base URL under which uploaded objects are reachable.
    pub s3_public_url: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            database_url: "postgres://localhost/tour_platform".into(),
            max_connections: 5,
            bind_addr: "0.0.0.0:3000".into(),
            atomic_cascade: false,
            max_image_bytes: 10 * 1024 * 1024,
            s3_bucket: None,
            s3_public_url: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut s = Settings::default();
        if let Some(v) = lookup("DATABASE_URL") {
            s.database_url = v;
        }
        if let Some(v) = lookup("DATABASE_MAX_CONNECTIONS") {
            s.max_connections = parse("DATABASE_MAX_CONNECTIONS", &v)?;
        }
        if let Some(v) = lookup("BIND_ADDR") {
            s.bind_addr = v;
        }
        if let Some(v) = lookup("ATOMIC_CASCADE") {
            s.atomic_cascade = parse_flag("ATOMIC_CASCADE", &v)?;
        }
        if let Some(v) = lookup("MAX_IMAGE_BYTES") {
            s.max_image_bytes = parse("MAX_IMAGE_BYTES", &v)?;
        }
        s.s3_bucket = lookup("S3_BUCKET").filter(|v| !v.is_empty());
        s.s3_public_url = lookup("S3_PUBLIC_URL")
            .filter(|v| !v.is_empty())
            .map(|v| v.trim_end_matches('/').to_string());
        if s.s3_bucket.is_some() && s.s3_public_url.is_none() {
            return Err(ConfigError::Load("S3_PUBLIC_URL is required when S3_BUCKET is set".into()));
        }
        Ok(s)
    }

    pub fn uses_memory_store(&self) -> bool {
        self.database_url.starts_with(MEMORY_DATABASE_URL)
    }
}

fn parse<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Load(format!("{} has an invalid value '{}'", key, value)))
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::Load(format!("{} must be a boolean, got '{}'", key, value))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let env: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Settings::from_lookup(|k| env.get(k).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let s = settings(&[]).unwrap();
        assert_eq!(s.max_connections, 5);
        assert!(!s.atomic_cascade);
        assert!(!s.uses_memory_store());
        assert!(s.s3_bucket.is_none());
    }

    #[test]
    fn overrides_are_parsed() {
        let s = settings(&[
            ("DATABASE_URL", "memory://"),
            ("ATOMIC_CASCADE", "yes"),
            ("DATABASE_MAX_CONNECTIONS", "12"),
            ("S3_BUCKET", "images"),
            ("S3_PUBLIC_URL", "https://cdn.example.com/"),
        ])
        .unwrap();
        assert!(s.uses_memory_store());
        assert!(s.atomic_cascade);
        assert_eq!(s.max_connections, 12);
        assert_eq!(s.s3_public_url.as_deref(), Some("https://cdn.example.com"));
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(settings(&[("ATOMIC_CASCADE", "maybe")]).is_err());
        assert!(settings(&[("MAX_IMAGE_BYTES", "lots")]).is_err());
        assert!(settings(&[("S3_BUCKET", "images")]).is_err());
    }
}
