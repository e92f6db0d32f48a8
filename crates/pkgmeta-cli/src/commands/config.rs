use crate::common::GlobalOpts;
use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use pkgmeta_config::Config;
use pkgmeta_logger as logger;
use tracing::debug;

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Print every configured value
    Show,
    /// Print the config file location
    Path,
    /// Print a single value
    Get { key: String },
    /// Set a value (build-requires takes a comma-separated list)
    Set { key: String, value: String },
}

pub fn handle_config(action: Option<ConfigAction>, opts: &GlobalOpts) -> Result<()> {
    match action.unwrap_or(ConfigAction::Show) {
        ConfigAction::Show => {
            let config = Config::load().context("Failed to load config")?;
            println!("{}", "Configuration:".bold().green());
            if config.is_empty() {
                if opts.verbosity_level() > 0 {
                    println!("  {}", "(empty)".yellow());
                }
            } else {
                for (key, value) in config.values() {
                    println!("  {}: {}", key.cyan(), value);
                }
            }
            println!(
                "  {}: {}",
                "effective build-backend".dimmed(),
                config.build_backend()
            );
            println!(
                "  {}: {}",
                "effective build-requires".dimmed(),
                config.build_requires().join(", ")
            );
        }
        ConfigAction::Path => {
            println!("{}", Config::path()?.display());
        }
        ConfigAction::Get { key } => {
            let config = Config::load().context("Failed to load config")?;
            match config.get(&key)? {
                Some(value) => println!("{}", value),
                None => logger::info(&format!("{} is not set", key)),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load().context("Failed to load config")?;
            config.set(&key, value.clone())?;
            let path = config.save().context("Failed to save config")?;
            debug!("Wrote config to {:?}", path);
            logger::success(&format!("Set {} = {}", key, value));
        }
    }
    Ok(())
}
