use clap::{value_parser, Arg, Command};
use tracing::{info, warn};

use std::path::PathBuf;
use std::sync::Arc;

mod collectors;
mod common;
mod config;
mod exposition;
mod metrics;

use config::Config;

fn main() -> anyhow::Result<()> {
    // custom panic hook to terminate whole process after unwinding
    std::panic::set_hook(Box::new(|s| {
        eprintln!("{s}");
        std::process::exit(101);
    }));

    // parse command line options
    let matches = Command::new(env!("CARGO_BIN_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .long_about(
            "Exposes per-node NUMA virtual memory statistics on a Prometheus \
            compatible metrics endpoint.",
        )
        .arg(
            Arg::new("CONFIG")
                .help("Exporter configuration file")
                .value_parser(value_parser!(PathBuf))
                .action(clap::ArgAction::Set)
                .index(1),
        )
        .get_matches();

    // load config from file, or run with defaults
    let config: Arc<Config> = match matches.get_one::<PathBuf>("CONFIG") {
        Some(path) => Config::load(path)?.into(),
        None => Config::default().into(),
    };

    // configure logging
    tracing_subscriber::fmt()
        .with_max_level(config.log().level())
        .with_target(false)
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "starting");

    // initialize async runtime
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(2)
        .thread_name("vmstat-numa")
        .build()?;

    let collectors = collectors::init(config.clone());

    if collectors.is_empty() {
        warn!("no collectors are enabled");
    } else {
        let names: Vec<_> = collectors.iter().map(|c| c.name()).collect();
        info!("enabled collectors: {}", names.join(", "));
    }

    rt.block_on(exposition::serve(config, collectors))
}
