//! Config get subcommand
//!
//! Retrieves a single configuration value by key.

use anyhow::{Result, bail};
use wsctl_core::Config;

use super::VALID_KEYS;

/// Value of `key` as plain text; unset optional values are empty
pub(super) fn config_value(config: &Config, key: &str) -> Result<String> {
    let value = match key.to_lowercase().as_str() {
        "version" => config.version.to_string(),
        "ssh_config_path" => config.ssh_config_path.clone().unwrap_or_default(),
        "private_key_path" | "key" => config.private_key_path.clone().unwrap_or_default(),
        "ssh_user" | "user" => config.ssh_user.clone(),
        "port_base" => config.port_base.to_string(),
        "api_url" => config.api_url.clone().unwrap_or_default(),
        "fetch_timeout_secs" | "timeout" => config.fetch_timeout_secs.to_string(),
        "prune" => config.prune.to_string(),
        _ => bail!("Unknown configuration key: {key}\n\n{VALID_KEYS}\n  version"),
    };
    Ok(value)
}

/// Print a single configuration value (no formatting, for scripting)
pub fn cmd_config_get(config: &Config, key: &str) -> Result<()> {
    println!("{}", config_value(config, key)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_defaults() {
        let config = Config::default();
        assert_eq!(config_value(&config, "ssh_user").unwrap(), "ubuntu");
        assert_eq!(config_value(&config, "port_base").unwrap(), "2222");
        assert_eq!(config_value(&config, "api_url").unwrap(), "");
        assert_eq!(config_value(&config, "prune").unwrap(), "true");
    }

    #[test]
    fn test_get_aliases_and_case() {
        let config = Config {
            private_key_path: Some("~/keys/ws.pem".to_string()),
            ..Config::default()
        };
        assert_eq!(config_value(&config, "KEY").unwrap(), "~/keys/ws.pem");
        assert_eq!(config_value(&config, "timeout").unwrap(), "10");
    }

    #[test]
    fn test_get_unknown_key() {
        let err = config_value(&Config::default(), "bind").unwrap_err();
        assert!(err.to_string().contains("Unknown configuration key"));
    }
}
