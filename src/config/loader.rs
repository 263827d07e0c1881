//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::HstsConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<HstsConfig, ConfigError> {
    let config: HstsConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<HstsConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.policy.fallback_max_age_secs, 10);
        assert!(config.policy.pinned.is_empty());
        assert!(config.storage.snapshot_path.is_none());
        assert_eq!(config.storage.sweep_interval_secs, 0);
        assert_eq!(config.upstream.connect_timeout_secs, 5);
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_full_config() {
        let config = parse_config(
            r#"
            [policy]
            fallback_max_age_secs = 300
            pinned = [
                { host = "example.com", include_subdomains = true },
                { host = "intranet.test:8443" },
            ]

            [storage]
            snapshot_path = "/var/lib/hsts/policy.json"
            sweep_interval_secs = 60

            [upstream]
            connect_timeout_secs = 2

            [observability]
            log_level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.policy.fallback_max_age_secs, 300);
        assert_eq!(config.policy.pinned.len(), 2);
        assert!(config.policy.pinned[0].include_subdomains);
        assert!(!config.policy.pinned[1].include_subdomains);
        assert_eq!(config.storage.snapshot_path, Some(PathBuf::from("/var/lib/hsts/policy.json")));
        assert_eq!(config.storage.sweep_interval_secs, 60);
        assert_eq!(config.upstream.connect_timeout_secs, 2);
        assert_eq!(config.upstream.pool_idle_timeout_secs, 60);
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(parse_config("[policy"), Err(ConfigError::Parse(_))));
        assert!(matches!(
            parse_config("[policy]\nfallback_max_age_secs = \"ten\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_validation_error_lists_every_problem() {
        let err = parse_config(
            r#"
            [policy]
            fallback_max_age_secs = -1
            pinned = [{ host = "" }]
            "#,
        )
        .unwrap_err();

        match &err {
            ConfigError::Validation(errors) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected error: {}", other),
        }
        assert!(err.to_string().starts_with("Validation failed: "));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hsts.toml");
        fs::write(&path, "[observability]\nlog_level = \"warn\"\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.observability.log_level, "warn");

        assert!(matches!(load_config(&dir.path().join("missing.toml")), Err(ConfigError::Io(_))));
    }
}
