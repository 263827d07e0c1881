//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Pinned hosts must be well-formed and unique
//! - Validate value ranges (timeouts > 0, max-age >= 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: HstsConfig → Result<(), Vec<ValidationError>>

use std::collections::HashSet;
use std::fmt;

use url::Host;

use crate::config::schema::HstsConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyPinnedHost,
    InvalidPinnedHost { host: String, reason: String },
    DuplicatePinnedHost(String),
    NegativeFallbackMaxAge(i64),
    ZeroConnectTimeout,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyPinnedHost => write!(f, "pinned host must not be empty"),
            ValidationError::InvalidPinnedHost { host, reason } => {
                write!(f, "pinned host '{}' is invalid: {}", host, reason)
            }
            ValidationError::DuplicatePinnedHost(host) => {
                write!(f, "pinned host '{}' listed twice", host)
            }
            ValidationError::NegativeFallbackMaxAge(v) => {
                write!(f, "fallback_max_age_secs must be >= 0 (got {})", v)
            }
            ValidationError::ZeroConnectTimeout => write!(f, "connect_timeout_secs must be > 0"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Split an optional `:port` suffix off a host, minding bracketed IPv6 literals.
fn split_port(host: &str) -> (&str, Option<&str>) {
    if let Some(rest) = host.strip_prefix('[') {
        return match rest.split_once(']') {
            Some((addr, tail)) => match tail.strip_prefix(':') {
                Some(port) => (&host[..addr.len() + 2], Some(port)),
                None => (host, None),
            },
            None => (host, None),
        };
    }

    match host.rsplit_once(':') {
        Some((name, port)) => (name, Some(port)),
        None => (host, None),
    }
}

/// Check a pinned host: a domain or IP literal, optionally followed by `:port`.
pub fn validate_host(host: &str) -> Result<(), String> {
    let (name, port) = split_port(host);

    if let Some(port) = port {
        port.parse::<u16>()
            .map_err(|_| format!("bad port '{}'", port))?;
    }

    Host::parse(name).map(|_| ()).map_err(|e| e.to_string())
}

/// Validate a parsed configuration, collecting every error.
pub fn validate_config(config: &HstsConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for pinned in &config.policy.pinned {
        if pinned.host.is_empty() {
            errors.push(ValidationError::EmptyPinnedHost);
            continue;
        }
        if let Err(reason) = validate_host(&pinned.host) {
            errors.push(ValidationError::InvalidPinnedHost {
                host: pinned.host.clone(),
                reason,
            });
            continue;
        }
        if !seen.insert(pinned.host.as_str()) {
            errors.push(ValidationError::DuplicatePinnedHost(pinned.host.clone()));
        }
    }

    if config.policy.fallback_max_age_secs < 0 {
        errors.push(ValidationError::NegativeFallbackMaxAge(
            config.policy.fallback_max_age_secs,
        ));
    }

    if config.upstream.connect_timeout_secs == 0 {
        errors.push(ValidationError::ZeroConnectTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::PinnedHost;

    fn pinned(host: &str) -> PinnedHost {
        PinnedHost {
            host: host.to_string(),
            include_subdomains: false,
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&HstsConfig::default()).is_ok());
    }

    #[test]
    fn test_validate_host() {
        assert!(validate_host("example.com").is_ok());
        assert!(validate_host("example.com:8443").is_ok());
        assert!(validate_host("127.0.0.1:80").is_ok());
        assert!(validate_host("[::1]").is_ok());
        assert!(validate_host("[::1]:8443").is_ok());

        assert!(validate_host("example.com:http").is_err());
        assert!(validate_host("exa mple.com").is_err());
        assert!(validate_host("example.com:99999").is_err());
    }

    #[test]
    fn test_pinned_host_errors() {
        let mut config = HstsConfig::default();
        config.policy.pinned = vec![
            pinned("example.com"),
            pinned(""),
            pinned("bad host"),
            pinned("example.com"),
        ];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors[0], ValidationError::EmptyPinnedHost);
        assert!(matches!(errors[1], ValidationError::InvalidPinnedHost { .. }));
        assert_eq!(errors[2], ValidationError::DuplicatePinnedHost("example.com".into()));
    }

    #[test]
    fn test_range_errors() {
        let mut config = HstsConfig::default();
        config.policy.fallback_max_age_secs = -5;
        config.upstream.connect_timeout_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::NegativeFallbackMaxAge(-5),
                ValidationError::ZeroConnectTimeout,
            ]
        );
    }
}
