use anyhow::Context;
use serde::Deserialize;
use tracing::debug;

use std::collections::HashMap;
use std::path::Path;

mod collector;
mod general;
mod log;

pub use collector::Collector as CollectorConfig;
pub use general::General;
pub use log::Log;

fn listen() -> String {
    "0.0.0.0:9101".into()
}

fn namespace() -> String {
    "node".into()
}

fn sysfs() -> String {
    "/sys".into()
}

fn timeout() -> String {
    "5s".into()
}

fn channel_capacity() -> usize {
    1024
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    general: General,
    #[serde(default)]
    log: Log,
    #[serde(default)]
    defaults: CollectorConfig,
    #[serde(default)]
    collectors: HashMap<String, CollectorConfig>,
}

impl Config {
    pub fn load(path: &dyn AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("unable to open config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;

        config.check()?;

        Ok(config)
    }

    pub fn check(&self) -> anyhow::Result<()> {
        self.general.check()
    }

    pub fn general(&self) -> &General {
        &self.general
    }

    pub fn log(&self) -> &Log {
        &self.log
    }

    /// Resolves whether a collector is enabled. A per-collector setting wins
    /// over `[defaults]`, which wins over the collector's registered default.
    pub fn enabled(&self, name: &str, default: bool) -> bool {
        let enabled = self
            .collectors
            .get(name)
            .and_then(|v| v.enabled())
            .or(self.defaults.enabled())
            .unwrap_or(default);

        if enabled {
            debug!("'{name}' collector is enabled");
        } else {
            debug!("'{name}' collector is not enabled");
        }

        enabled
    }
}
