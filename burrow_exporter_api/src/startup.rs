use crate::app_config::AppConfig;
use crate::error::ApplicationError;
use crate::exposition::render_samples;
use anyhow::Context;
use axum::extract::State;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use burrow_exporter::burrow::BurrowClient;
use burrow_exporter::collector::{Collector, CollectorSettings};
use burrow_exporter::config_store::load_cluster_groups;
use http::header;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

#[derive(Clone)]
struct AppState {
    collector: Arc<Collector>,
    telemetry_path: Arc<str>,
}

pub async fn run_until_stopped(
    config: AppConfig,
    cancellation_token: CancellationToken,
) -> Result<(), anyhow::Error> {
    let collector = build_collector(&config)
        .await
        .context("While building collector")?;

    let listener = TcpListener::bind(&config.listen_address)
        .await
        .with_context(|| format!("While binding {}", config.listen_address))?;

    info!(
        "Providing metrics at {}{}",
        config.listen_address, config.telemetry_path
    );

    serve(
        listener,
        Arc::new(collector),
        &config.telemetry_path,
        cancellation_token,
    )
    .await
}

pub async fn build_collector(config: &AppConfig) -> Result<Collector, anyhow::Error> {
    let cluster_groups = load_cluster_groups(&config.config_file).await?;
    info!(
        "Loaded {} groups in {} clusters from {}",
        cluster_groups.pairs_count(),
        cluster_groups.clusters_count(),
        config.config_file.display()
    );

    let client = BurrowClient::new(&config.burrow_endpoint, config.request_timeout())
        .context("While creating burrow client")?;
    info!("Polling burrow at {}", client.endpoint());

    let settings = CollectorSettings {
        max_concurrent_requests: config.max_concurrent_requests,
    };

    Ok(Collector::new(cluster_groups, client, settings))
}

pub async fn serve(
    listener: TcpListener,
    collector: Arc<Collector>,
    telemetry_path: &str,
    cancellation_token: CancellationToken,
) -> Result<(), anyhow::Error> {
    let router = build_router(collector, telemetry_path);

    axum::serve(listener, router)
        .with_graceful_shutdown(async move { cancellation_token.cancelled().await })
        .await
        .context("While serving http")?;

    info!("Http server stopped");

    Ok(())
}

pub fn build_router(collector: Arc<Collector>, telemetry_path: &str) -> Router {
    let state = AppState {
        collector,
        telemetry_path: Arc::from(telemetry_path),
    };

    Router::new()
        .route("/", get(root_page))
        .route(telemetry_path, get(metrics))
        .fallback(root_page)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[tracing::instrument(skip_all)]
async fn metrics(State(state): State<AppState>) -> Result<Response, ApplicationError> {
    let rx = state.collector.clone().collect_to_channel();
    let samples = ReceiverStream::new(rx).collect::<Vec<_>>().await;

    debug!("Collected {} samples", samples.len());

    let body = render_samples(state.collector.describe(), samples)
        .map_err(ApplicationError::Exposition)?;

    Ok(([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body).into_response())
}

async fn root_page(State(state): State<AppState>) -> Html<String> {
    Html(format!(
        "<html>
<head><title>Burrow exporter</title></head>
<body>
<h1>Burrow exporter</h1>
<p><a href='{}'>Metrics</a></p>
</body>
</html>",
        state.telemetry_path
    ))
}
