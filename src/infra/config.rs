use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::cli::{AppContext, InitArgs};
use crate::core::duplicates::DEFAULT_THRESHOLD;

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Duplicate detection settings
    pub duplicates: DuplicatesConfig,

    /// Directory scan settings
    pub scan: ScanConfig,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DuplicatesConfig {
    /// Minimum pairwise score for two records to count as duplicates
    pub threshold: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Directory names skipped while collecting event files
    pub ignore: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            duplicates: DuplicatesConfig { threshold: DEFAULT_THRESHOLD },
            scan: ScanConfig {
                ignore: vec![
                    "node_modules".to_string(),
                    "target".to_string(),
                    "templates".to_string(),
                ],
            },
        }
    }
}

pub fn load_config() -> Result<Config> {
    let mut builder = config::Config::builder();

    // Load from config files in priority order
    let config_paths = ["reconcile.toml", ".reconcile.toml"];

    for path in &config_paths {
        if Path::new(path).exists() {
            builder = builder.add_source(config::File::with_name(path));
            break;
        }
    }

    // Add environment variables with EVR_ prefix
    builder = builder.add_source(config::Environment::with_prefix("EVR").separator("_"));

    let cfg = builder.build().context("Failed to load configuration")?;
    let parsed: Config = cfg
        .try_deserialize()
        .context("Failed to parse configuration")?;

    Ok(parsed)
}

pub fn init(args: InitArgs, ctx: &AppContext) -> Result<()> {
    let config_path = args.path.join("reconcile.toml");

    if config_path.exists() && !args.force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let config = Config::default();
    let toml_string =
        toml::to_string_pretty(&config).context("Failed to serialize default config")?;

    std::fs::write(&config_path, toml_string).context("Failed to write config file")?;

    if !ctx.quiet {
        println!("Created config file at {}", config_path.display());
    }
    Ok(())
}
