//! Server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! ## Variables
//! | Variable        | Default                 |
//! |-----------------|-------------------------|
//! | `HTTP_HOST`     | `0.0.0.0`               |
//! | `HTTP_PORT`     | `8000`                  |
//! | `DATABASE_PATH` | `./till.db`             |
//! | `SITE_URL`      | `http://localhost:8000` |
//! | `MEDIA_ROOT`    | `./media`               |
//! | `MEDIA_URL`     | `/media/`               |
//! | `TEMPLATE_DIR`  | unset (built-in)        |
//! | `QR_EC_LEVEL`   | `M`                     |
//! | `QR_SCALE`      | `10`                    |

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use till_render::ErrorCorrection;

/// Accepted range for `QR_SCALE`.
const QR_SCALE_RANGE: std::ops::RangeInclusive<u32> = 1..=64;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind
    pub http_host: IpAddr,

    /// Port to bind
    pub http_port: u16,

    /// SQLite database file
    pub database_path: PathBuf,

    /// Public base URL, without a trailing slash
    pub site_url: String,

    /// Directory holding stored artifacts
    pub media_root: PathBuf,

    /// URL path artifacts are served under; always `/…/`
    pub media_url: String,

    /// Template directory overriding the built-in receipt template
    pub template_dir: Option<PathBuf>,

    /// QR error-correction level
    pub qr_ec_level: ErrorCorrection,

    /// Pixels per QR module
    pub qr_scale: u32,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which returns the value of a
    /// variable or `None` when it is unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let config = ServerConfig {
            http_host: var("HTTP_HOST", "0.0.0.0")
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("HTTP_HOST".to_string()))?,

            http_port: var("HTTP_PORT", "8000")
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("HTTP_PORT".to_string()))?,

            database_path: PathBuf::from(var("DATABASE_PATH", "./till.db")),

            site_url: normalize_site_url(&var("SITE_URL", "http://localhost:8000"))
                .ok_or_else(|| ConfigError::InvalidValue("SITE_URL".to_string()))?,

            media_root: PathBuf::from(var("MEDIA_ROOT", "./media")),

            media_url: normalize_media_url(&var("MEDIA_URL", "/media/"))
                .ok_or_else(|| ConfigError::InvalidValue("MEDIA_URL".to_string()))?,

            template_dir: lookup("TEMPLATE_DIR")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),

            qr_ec_level: var("QR_EC_LEVEL", "M")
                .parse()
                .map_err(|_| ConfigError::InvalidValue("QR_EC_LEVEL".to_string()))?,

            qr_scale: var("QR_SCALE", "10")
                .trim()
                .parse()
                .ok()
                .filter(|scale| QR_SCALE_RANGE.contains(scale))
                .ok_or_else(|| ConfigError::InvalidValue("QR_SCALE".to_string()))?,
        };

        Ok(config)
    }

    /// Socket address to listen on.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.http_host, self.http_port)
    }

    /// Route pattern serving artifacts, e.g. `/media/{filename}`.
    pub fn media_route(&self) -> String {
        format!("{}{{filename}}", self.media_url)
    }
}

/// `http(s)://host[:port][/prefix]` without the trailing slash.
fn normalize_site_url(raw: &str) -> Option<String> {
    let url = raw.trim().trim_end_matches('/');
    let rest = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))?;

    if rest.is_empty() || rest.contains(char::is_whitespace) {
        return None;
    }
    Some(url.to_string())
}

/// Adds the leading and trailing slash; rejects `/` alone and characters
/// that have a meaning in route patterns.
fn normalize_media_url(raw: &str) -> Option<String> {
    let segments = raw.trim().trim_matches('/');
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '/' | '-' | '_' | '.');

    if segments.is_empty() || !segments.chars().all(allowed) || segments.contains("//") {
        return None;
    }
    Some(format!("/{}/", segments))
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.bind_addr().to_string(), "0.0.0.0:8000");
        assert_eq!(config.database_path, PathBuf::from("./till.db"));
        assert_eq!(config.site_url, "http://localhost:8000");
        assert_eq!(config.media_root, PathBuf::from("./media"));
        assert_eq!(config.media_url, "/media/");
        assert_eq!(config.template_dir, None);
        assert_eq!(config.qr_ec_level, ErrorCorrection::Medium);
        assert_eq!(config.qr_scale, 10);
        assert_eq!(config.media_route(), "/media/{filename}");
    }

    #[test]
    fn test_urls_are_normalized() {
        let config = load(&[
            ("SITE_URL", "https://shop.example.com/"),
            ("MEDIA_URL", "files/receipts"),
        ])
        .unwrap();

        assert_eq!(config.site_url, "https://shop.example.com");
        assert_eq!(config.media_url, "/files/receipts/");
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = load(&[("HTTP_PORT", " "), ("TEMPLATE_DIR", "")]).unwrap();
        assert_eq!(config.http_port, 8000);
        assert_eq!(config.template_dir, None);
    }

    #[test]
    fn test_invalid_values() {
        let cases = [
            ("HTTP_HOST", "localhost:1"),
            ("HTTP_PORT", "99999"),
            ("SITE_URL", "ftp://example.com"),
            ("SITE_URL", "http://"),
            ("MEDIA_URL", "/"),
            ("MEDIA_URL", "/{x}/"),
            ("QR_EC_LEVEL", "Z"),
            ("QR_SCALE", "0"),
            ("QR_SCALE", "65"),
        ];

        for (key, value) in cases {
            match load(&[(key, value)]) {
                Err(ConfigError::InvalidValue(name)) => assert_eq!(name, key),
                Ok(_) => panic!("{}={} accepted", key, value),
            }
        }
    }

    #[test]
    fn test_qr_settings() {
        let config = load(&[("QR_EC_LEVEL", "h"), ("QR_SCALE", "4")]).unwrap();
        assert_eq!(config.qr_ec_level, ErrorCorrection::High);
        assert_eq!(config.qr_scale, 4);
    }
}
