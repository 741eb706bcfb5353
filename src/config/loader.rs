//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::GatekeeperConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable selecting `production` or `development`.
pub const ENV_MODE: &str = "GATEKEEPER_ENV";
/// Environment variable overriding `listener.bind_address`.
pub const ENV_BIND: &str = "GATEKEEPER_BIND";
/// Environment variable overriding `upstream.address`.
pub const ENV_UPSTREAM: &str = "GATEKEEPER_UPSTREAM";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid {var}: {reason}")]
    Env { var: &'static str, reason: String },

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

/// Load configuration from an optional file, then apply process environment
/// overrides and validate the result.
pub fn load(path: Option<&Path>) -> Result<GatekeeperConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_file(path)?,
        None => GatekeeperConfig::default(),
    };

    apply_env_overrides(&mut config, |var| std::env::var(var).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

fn read_file(path: &Path) -> Result<GatekeeperConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Apply environment overrides using the given lookup.
pub fn apply_env_overrides<F>(config: &mut GatekeeperConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(mode) = lookup(ENV_MODE) {
        config.mode = mode
            .parse()
            .map_err(|reason| ConfigError::Env { var: ENV_MODE, reason })?;
    }
    if let Some(bind) = lookup(ENV_BIND) {
        config.listener.bind_address = bind;
    }
    if let Some(upstream) = lookup(ENV_UPSTREAM) {
        config.upstream.address = upstream;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::Mode;
    use std::collections::HashMap;

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_MODE, "production"),
            (ENV_UPSTREAM, "10.0.0.2:3000"),
        ]
        .into_iter()
        .collect();

        let mut config = GatekeeperConfig::default();
        apply_env_overrides(&mut config, |k| env.get(k).map(|v| v.to_string())).unwrap();

        assert_eq!(config.mode, Mode::Production);
        assert_eq!(config.upstream.address, "10.0.0.2:3000");
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
    }

    #[test]
    fn test_bad_mode_is_rejected() {
        let mut config = GatekeeperConfig::default();
        let err = apply_env_overrides(&mut config, |k| {
            (k == ENV_MODE).then(|| "staging".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::Env { var: ENV_MODE, .. }));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("gatekeeper-{}.toml", std::process::id()));
        fs::write(
            &path,
            "mode = \"production\"\n[rate_limit]\nmax_requests = 5\n",
        )
        .unwrap();

        let config = load(Some(&path)).unwrap();
        fs::remove_file(&path).unwrap();

        assert!(config.is_production());
        assert_eq!(config.rate_limit.max_requests, 5);
    }

    #[test]
    fn test_load_reports_validation() {
        let path = std::env::temp_dir().join(format!("gatekeeper-bad-{}.toml", std::process::id()));
        fs::write(&path, "[rate_limit]\nwindow_secs = 0\n").unwrap();

        let err = load(Some(&path)).unwrap_err();
        fs::remove_file(&path).unwrap();

        assert!(matches!(err, ConfigError::Validation(ref e) if e.len() == 1));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("gatekeeper-does-not-exist.toml");
        assert!(matches!(load(Some(&path)), Err(ConfigError::Io(_))));
    }
}
