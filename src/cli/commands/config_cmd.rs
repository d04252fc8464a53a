//! Configuration command.

use crate::cli::icons::{dim_arrow, success};
use crate::config::{Config, Settings};

/// Print the effective settings as TOML.
pub fn cmd_config_show(settings: &Settings, config: &Config) -> anyhow::Result<()> {
    match &config.source_path {
        Some(path) => eprintln!("{} Loaded {}", success(), path.display()),
        None => eprintln!("{} No config file found, using defaults", dim_arrow()),
    }

    print!("{}", toml::to_string_pretty(settings)?);
    Ok(())
}
