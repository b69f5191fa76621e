//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from config files.

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};

/// One year in seconds, the usual HSTS max-age.
pub const ONE_YEAR_SECS: i64 = 31_536_000;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Strict-Transport-Security settings.
    pub hsts: HstsSettings,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of the human-readable format.
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
        }
    }
}

/// User-supplied HSTS settings.
///
/// `max_age` is required inside an `[hsts]` table. It is signed so that a
/// negative value in a config file is reported as an error instead of
/// failing to parse.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HstsSettings {
    /// Seconds the policy stays valid. Used as the fallback once `expires`
    /// has passed.
    #[serde(alias = "MaxAge")]
    pub max_age: i64,

    /// Fixed point in time the policy is valid until. Accepts an RFC 3339
    /// string or a TOML offset date-time literal.
    /// Takes precedence over `max_age` while it lies in the future.
    #[serde(
        default,
        alias = "Expires",
        deserialize_with = "deserialize_expires",
        skip_serializing_if = "Option::is_none"
    )]
    pub expires: Option<DateTime<Utc>>,

    /// Apply the policy to every subdomain as well.
    #[serde(default, alias = "IncludeSubDomains")]
    pub include_subdomains: bool,

    /// Send the `preload` directive.
    #[serde(default, alias = "SendPreloadDirective")]
    pub send_preload_directive: bool,
}

fn deserialize_expires<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = match Option::<toml::Value>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(toml::Value::String(text)) => text,
        Some(toml::Value::Datetime(datetime)) => datetime.to_string(),
        Some(other) => {
            return Err(de::Error::custom(format!(
                "expires must be an RFC 3339 date-time, got a {}",
                other.type_str()
            )))
        }
    };

    DateTime::parse_from_rfc3339(&text)
        .map(|expires| Some(expires.with_timezone(&Utc)))
        .map_err(|e| {
            de::Error::custom(format!(
                "expires must be an RFC 3339 date-time with an offset ({text}): {e}"
            ))
        })
}

impl HstsSettings {
    /// Settings with the given max-age and no directives.
    pub fn new(max_age: i64) -> Self {
        Self {
            max_age,
            expires: None,
            include_subdomains: false,
            send_preload_directive: false,
        }
    }

    pub fn with_expires(mut self, expires: DateTime<Utc>) -> Self {
        self.expires = Some(expires);
        self
    }

    pub fn with_include_subdomains(mut self) -> Self {
        self.include_subdomains = true;
        self
    }

    pub fn with_preload(mut self) -> Self {
        self.send_preload_directive = true;
        self
    }
}

impl Default for HstsSettings {
    fn default() -> Self {
        Self::new(ONE_YEAR_SECS)
    }
}
