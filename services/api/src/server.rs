use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryDonorDirectory, LoggingNotifier};
use crate::routes::with_matching_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use donor_match::config::AppConfig;
use donor_match::dispatch::DispatchService;
use donor_match::error::AppError;
use donor_match::matching::MatchingEngine;
use donor_match::records::DonorImporter;
use donor_match::telemetry;
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

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let roster = match args.donors.take() {
        Some(path) => DonorImporter::from_path(path)?,
        None => Vec::new(),
    };
    let directory = Arc::new(InMemoryDonorDirectory::seeded(roster));
    let donor_count = directory.len();
    let notifier = Arc::new(LoggingNotifier::default());
    let dispatch_service = Arc::new(DispatchService::new(
        directory,
        notifier,
        MatchingEngine::system(),
        config.dispatch.clone(),
    ));

    let app = with_matching_routes(dispatch_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        donors = donor_count,
        notify_limit = config.dispatch.notify_limit,
        "donor dispatch service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
