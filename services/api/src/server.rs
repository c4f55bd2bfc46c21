use crate::cli::ServeArgs;
use crate::infra::{
    AppState, InMemoryAuditStore, InMemoryNotificationPublisher, LoggingOptimizationTrigger,
};
use crate::routes::with_scoring_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use site_audit::config::AppConfig;
use site_audit::error::AppError;
use site_audit::telemetry;
use site_audit::workflows::crawl_import::CrawlExportImporter;
use site_audit::workflows::scoring::{spawn_side_effect_worker, ScoringService, TaskId};
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

    let store = Arc::new(InMemoryAuditStore::default());
    if let (Some(path), Some(task_id)) = (args.pages_csv.take(), args.task_id.take()) {
        let pages = CrawlExportImporter::from_path(&path)?;
        info!(%task_id, pages = pages.len(), path = %path.display(), "crawl export preloaded");
        store.load_crawl(TaskId(task_id), pages);
    }

    let (dispatcher, _worker) = spawn_side_effect_worker(
        Arc::new(LoggingOptimizationTrigger),
        Arc::new(InMemoryNotificationPublisher::default()),
        config.side_effects.queue_capacity,
    );
    let scoring_service = Arc::new(ScoringService::new(
        store,
        dispatcher,
        config.scoring.clone(),
    ));

    let app = with_scoring_routes(scoring_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        completion_threshold = config.scoring.completion_threshold,
        "site audit scoring service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
