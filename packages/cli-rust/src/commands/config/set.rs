//! Config set subcommand
//!
//! Sets a single configuration value.

use anyhow::{Result, anyhow, bail};
use console::style;
use wsctl_core::{Config, load_config, save_config};

use super::VALID_KEYS;

/// Apply `key = value` to `config`, returning the value as stored
pub(super) fn apply_setting(config: &mut Config, key: &str, value: &str) -> Result<String> {
    let display_value = match key.to_lowercase().as_str() {
        "ssh_config_path" => {
            config.ssh_config_path = parse_optional(value);
            display_optional(&config.ssh_config_path)
        }
        "private_key_path" | "key" => {
            config.private_key_path = parse_optional(value);
            display_optional(&config.private_key_path)
        }
        "ssh_user" | "user" => {
            let user = value.trim();
            if user.is_empty() || user.chars().any(char::is_whitespace) {
                bail!("Invalid ssh_user: '{value}'. Must be a single non-empty word.");
            }
            config.ssh_user = user.to_string();
            user.to_string()
        }
        "port_base" => {
            let port: u16 = value
                .parse()
                .ok()
                .filter(|p| *p > 0)
                .ok_or_else(|| {
                    anyhow!("Invalid port number: {value}. Must be a number between 1-65535.")
                })?;
            config.port_base = port;
            port.to_string()
        }
        "api_url" => {
            let url = parse_optional(value);
            if let Some(url) = &url {
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    bail!("Invalid api_url: {url}. Must start with http:// or https://");
                }
            }
            config.api_url = url;
            display_optional(&config.api_url)
        }
        "fetch_timeout_secs" | "timeout" => {
            let secs: u64 = value
                .parse()
                .ok()
                .filter(|s| *s > 0)
                .ok_or_else(|| {
                    anyhow!("Invalid fetch_timeout_secs: {value}. Must be a positive integer.")
                })?;
            config.fetch_timeout_secs = secs;
            secs.to_string()
        }
        "prune" => {
            let parsed = parse_bool(value).ok_or_else(|| {
                anyhow!("Invalid boolean value: {value}. Use: true/false, yes/no, or 1/0")
            })?;
            config.prune = parsed;
            parsed.to_string()
        }
        _ => bail!("Unknown configuration key: {key}\n\n{VALID_KEYS}"),
    };
    Ok(display_value)
}

/// Set a configuration value and save the config file
pub fn cmd_config_set(key: &str, value: &str, quiet: bool) -> Result<()> {
    let mut config = load_config()?;
    let display_value = apply_setting(&mut config, key, value)?;
    save_config(&config)?;

    if !quiet {
        println!(
            "{} Set {} = {}",
            style("Success:").green().bold(),
            key,
            display_value
        );
    }
    Ok(())
}

/// "none" or an empty value clears an optional setting
fn parse_optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn display_optional(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| "(default)".to_string())
}

/// Parse boolean from various string representations
fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_port_base() {
        let mut config = Config::default();
        assert_eq!(apply_setting(&mut config, "port_base", "3000").unwrap(), "3000");
        assert_eq!(config.port_base, 3000);
        assert!(apply_setting(&mut config, "port_base", "0").is_err());
        assert!(apply_setting(&mut config, "port_base", "70000").is_err());
    }

    #[test]
    fn test_set_and_clear_optional_path() {
        let mut config = Config::default();
        apply_setting(&mut config, "key", "~/keys/ws.pem").unwrap();
        assert_eq!(config.private_key_path.as_deref(), Some("~/keys/ws.pem"));

        assert_eq!(apply_setting(&mut config, "key", "none").unwrap(), "(default)");
        assert!(config.private_key_path.is_none());
    }

    #[test]
    fn test_set_api_url_requires_scheme() {
        let mut config = Config::default();
        assert!(apply_setting(&mut config, "api_url", "api.wsctl.dev").is_err());
        apply_setting(&mut config, "api_url", "https://api.wsctl.dev/v1").unwrap();
        assert!(config.has_api());
    }

    #[test]
    fn test_set_user_rejects_whitespace() {
        let mut config = Config::default();
        assert!(apply_setting(&mut config, "ssh_user", "two words").is_err());
        apply_setting(&mut config, "user", "dev").unwrap();
        assert_eq!(config.ssh_user, "dev");
    }

    #[test]
    fn test_set_prune_bool_variants() {
        let mut config = Config::default();
        apply_setting(&mut config, "prune", "no").unwrap();
        assert!(!config.prune);
        apply_setting(&mut config, "prune", "YES").unwrap();
        assert!(config.prune);
        assert!(apply_setting(&mut config, "prune", "maybe").is_err());
    }

    #[test]
    fn test_version_is_read_only() {
        let mut config = Config::default();
        assert!(apply_setting(&mut config, "version", "2").is_err());
    }
}
