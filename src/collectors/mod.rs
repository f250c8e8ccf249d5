use crate::config::Config;
use crate::metrics::SampleSender;

use async_trait::async_trait;
use linkme::distributed_slice;
use tracing::{error, info, info_span, Span};

use std::sync::Arc;

mod exposer;
mod vmstat_numa;

pub use exposer::{RecordCollector, StatsReader};

/// Every collector compiled into the binary registers itself here.
#[distributed_slice]
pub static COLLECTORS: [Registration] = [..];

/// How a collector is registered with the host.
pub struct Registration {
    /// Short identifier, also the key of its `[collectors.<name>]` table.
    pub name: &'static str,
    /// Whether the collector runs when the configuration does not say.
    pub default_enabled: bool,
    /// Builds the collector. `logger` is the span its diagnostics go to.
    pub init: fn(config: Arc<Config>, logger: Span) -> CollectorResult,
}

pub type CollectorResult = Result<Box<dyn Collector>, CollectorError>;

#[async_trait]
pub trait Collector: Send + Sync {
    fn name(&self) -> &'static str;

    /// Reads the current statistics and emits one sample per series into
    /// `sink`.
    async fn update(&self, sink: &SampleSender) -> Result<(), CollectorError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CollectorError {
    #[error("{collector} collector: failed to open statistics source: {source}")]
    Construction {
        collector: &'static str,
        source: std::io::Error,
    },
    #[error("{collector} collector: failed to read statistics: {source}")]
    Read {
        collector: &'static str,
        source: std::io::Error,
    },
}

/// Builds every registered collector the configuration enables. A collector
/// that fails to build is logged and left out.
pub fn init(config: Arc<Config>) -> Vec<Box<dyn Collector>> {
    let mut collectors = Vec::new();

    for registration in COLLECTORS {
        if !config.enabled(registration.name, registration.default_enabled) {
            continue;
        }

        let logger = info_span!("collector", name = registration.name);

        match (registration.init)(config.clone(), logger) {
            Ok(collector) => {
                info!("'{}' collector initialized", registration.name);
                collectors.push(collector);
            }
            Err(e) => {
                error!("{e}");
            }
        }
    }

    collectors.sort_by_key(|c| c.name());

    collectors
}
