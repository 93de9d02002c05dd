//! `rmr config` – show the config file path and effective configuration.

use anyhow::Result;
use rmr_core::config::{self, RmrConfig};

pub fn run_config(cfg: &RmrConfig) -> Result<()> {
    println!("config file: {}", config::config_path()?.display());
    print!("{}", toml::to_string_pretty(cfg)?);
    Ok(())
}
