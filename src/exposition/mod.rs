use crate::collectors::Collector;
use crate::config::Config;
use crate::metrics::Sample;

use anyhow::Context;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, decompression::RequestDecompressionLayer};
use tracing::info;

use std::collections::BTreeMap;
use std::sync::Arc;

mod scrape;
mod text;

pub use scrape::Scraper;

struct AppState {
    scraper: Scraper,
}

/// Serves the scrape endpoints until the process is interrupted.
pub async fn serve(
    config: Arc<Config>,
    collectors: Vec<Box<dyn Collector>>,
) -> anyhow::Result<()> {
    let general = config.general();

    let scraper = Scraper::new(
        collectors,
        general.namespace(),
        general.timeout(),
        general.channel_capacity(),
    );

    let app = app(Arc::new(AppState { scraper }));

    let listen = general.listen()?;
    let listener = TcpListener::bind(listen)
        .await
        .with_context(|| format!("failed to listen on {listen}"))?;

    info!("listening on {listen}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown())
        .await
        .context("failed to run http server")
}

async fn shutdown() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}

fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/metrics", get(prometheus))
        .route("/metrics/json", get(json))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(RequestDecompressionLayer::new())
                .layer(CompressionLayer::new()),
        )
}

async fn root() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("vmstat-numa-exporter {version}\nMetrics are served at /metrics\n")
}

async fn prometheus(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let samples = state.scraper.scrape().await;

    (
        [(header::CONTENT_TYPE, text::CONTENT_TYPE)],
        text::encode(&samples),
    )
}

#[derive(Serialize)]
struct JsonSample {
    name: String,
    help: String,
    kind: crate::metrics::MetricKind,
    labels: BTreeMap<String, String>,
    value: f64,
}

impl From<&Sample> for JsonSample {
    fn from(sample: &Sample) -> Self {
        Self {
            name: sample.descriptor.name().to_string(),
            help: sample.descriptor.help().to_string(),
            kind: sample.descriptor.kind(),
            labels: sample
                .labels()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            value: sample.value,
        }
    }
}

async fn json(State(state): State<Arc<AppState>>) -> Json<Vec<JsonSample>> {
    let samples = state.scraper.scrape().await;

    let mut samples: Vec<JsonSample> = samples.iter().map(JsonSample::from).collect();
    samples.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.labels.cmp(&b.labels)));

    Json(samples)
}
