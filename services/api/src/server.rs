use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_child_photo_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use photo_match::config::AppConfig;
use photo_match::error::AppError;
use photo_match::telemetry;
use photo_match::workflows::child_photo::{
    ChildPhotoService, CloudStorageClient, RealtimeDatabaseClient,
};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let database_url = config.firebase.require_database_url()?;
    let source = Arc::new(CloudStorageClient::from_config(
        &config.firebase,
        &config.matcher,
    )?);
    let sink = Arc::new(RealtimeDatabaseClient::from_config(
        &config.firebase,
        database_url,
    )?);
    let service = Arc::new(ChildPhotoService::new(
        source,
        sink,
        config.matcher.settings(),
        config.matcher.candidate_prefix.clone(),
    ));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let app = with_child_photo_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        bucket = %config.matcher.bucket,
        prefix = %config.matcher.candidate_prefix,
        threshold = config.matcher.threshold,
        "child photo matcher ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
