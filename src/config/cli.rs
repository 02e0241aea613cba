use crate::config::AppConfig;
use crate::utils::error::Result;
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "adboard")]
#[command(about = "Classifieds advertisement API server")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Listen address, overrides server.bind
    #[arg(long)]
    pub bind: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl CliConfig {
    /// Loads the config file (or defaults) and applies command line overrides.
    pub fn load(&self) -> Result<AppConfig> {
        let mut config = match self.config.as_deref() {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };

        if let Some(bind) = &self.bind {
            config.server.bind = bind.clone();
        }
        if self.json_logs {
            config.logging.json = true;
        }

        Ok(config)
    }
}
