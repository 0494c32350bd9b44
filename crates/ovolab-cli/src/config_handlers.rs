//! Handler functions for config CLI commands.

use anyhow::{Result, anyhow};
use std::io::Write;

use ovolab_client::ClientConfig;

use crate::cli::ConfigAction;

/// Handle a config subcommand.
pub fn handle_config_command(
    config_path: Option<&str>,
    action: &ConfigAction,
    out: &mut impl Write,
) -> Result<()> {
    match action {
        ConfigAction::Path => cmd_config_path(config_path, out),
        ConfigAction::Show => cmd_config_show(config_path, out),
    }
}

/// Show the resolved config file path.
pub fn cmd_config_path(config_path: Option<&str>, out: &mut impl Write) -> Result<()> {
    let path = ClientConfig::resolve_path(config_path)
        .ok_or_else(|| anyhow!("could not determine config directory for this platform"))?;
    writeln!(out, "{}", path.display())?;
    if !path.exists() {
        eprintln!("(file does not exist; built-in defaults are in effect)");
    }
    Ok(())
}

/// Show the effective configuration, environment overrides included.
pub fn cmd_config_show(config_path: Option<&str>, out: &mut impl Write) -> Result<()> {
    let config = ClientConfig::load(config_path)?;
    write!(out, "{}", config.to_toml()?)?;
    writeln!(out, "# health check: {}", config.health_url())?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn run(config_path: Option<&str>, action: ConfigAction) -> Result<String> {
        let mut out = Vec::new();
        handle_config_command(config_path, &action, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_config_path_prefers_explicit() {
        let out = run(Some("/tmp/ovolab-test/config.toml"), ConfigAction::Path).unwrap();
        assert_eq!(out, "/tmp/ovolab-test/config.toml\n");
    }

    #[test]
    fn test_config_show_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "api_url = \"https://lab.example.com/api/v1\"\n").unwrap();

        let out = run(path.to_str(), ConfigAction::Show).unwrap();

        assert!(out.contains("timeout_secs = 30"));
        assert!(out.contains("# health check: "));
    }

    #[test]
    fn test_config_show_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        assert!(run(path.to_str(), ConfigAction::Show).is_err());
    }

    #[test]
    fn test_config_show_rejects_unknown_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "api_ulr = \"typo\"\n").unwrap();
        assert!(run(path.to_str(), ConfigAction::Show).is_err());
    }
}
