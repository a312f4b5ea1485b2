use crate::cli::ServeArgs;
use crate::infra::{AppState, FileApartmentRepository, InMemoryApartmentRepository, InMemoryPhotoStore};
use crate::routes::with_comparison_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use rentwise::apartments::{ApartmentRepository, ComparisonService};
use rentwise::config::AppConfig;
use rentwise::error::AppError;
use rentwise::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
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

    match config.storage.data_dir.clone() {
        Some(dir) => {
            info!(data_dir = %dir.display(), "persisting lists as JSON files");
            serve(config, Arc::new(FileApartmentRepository::new(dir))).await
        }
        None => {
            info!("persisting lists in memory only");
            serve(config, Arc::new(InMemoryApartmentRepository::default())).await
        }
    }
}

async fn serve<R>(config: AppConfig, repository: Arc<R>) -> Result<(), AppError>
where
    R: ApartmentRepository + 'static,
{
    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let service = Arc::new(ComparisonService::with_photo_limit(
        repository,
        Arc::new(InMemoryPhotoStore::default()),
        config.storage.photo_max_bytes,
    ));

    let app = with_comparison_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "apartment comparison service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
