use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use axum_prometheus::PrometheusMetricLayer;
use metrics::counter;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::cli::decode_event;
use crate::config::Config;
use crate::pipeline::Pipeline;
use crate::types::ClassificationResponse;

#[derive(Clone)]
pub struct AppState {
    pipeline: Pipeline,
}

impl AppState {
    pub fn new(pipeline: Pipeline) -> Self {
        Self { pipeline }
    }
}

/// Routes without the metrics layer.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/classify", post(classify_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Checks that the artifacts load, then serves until the process is stopped.
pub async fn serve(config: &Config, pipeline: Pipeline) -> anyhow::Result<()> {
    tracing::info!("Checking artifacts before accepting requests...");
    let startup = pipeline.clone();
    tokio::task::spawn_blocking(move || -> crate::Result<()> {
        startup.loader().load_classifier()?;
        startup.loader().load_encoder()?;
        Ok(())
    })
    .await??;
    tracing::info!("Artifacts loaded successfully");

    let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();

    let app = router(AppState::new(pipeline))
        .route("/metrics", get(|| async move { metric_handle.render() }))
        .layer(prometheus_layer);

    let listener = TcpListener::bind(&config.server_address()).await?;
    tracing::info!("Server running on http://{}", config.server_address());

    axum::serve(listener, app).await?;
    Ok(())
}

#[tracing::instrument(skip(state, body), fields(request_id = %uuid::Uuid::new_v4().simple(), body_bytes = body.len()))]
async fn classify_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> (StatusCode, Json<ClassificationResponse>) {
    counter!("classification_requests_total").increment(1);
    tracing::info!("Processing classification request");

    let response = match decode_event(&body) {
        Ok(event) => state.pipeline.handle_blocking(Some(event)).await,
        Err(rejection) => rejection,
    };

    if !response.is_success() {
        counter!("classification_failures_total").increment(1);
    }

    let status = StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::BAD_REQUEST);
    (status, Json(response))
}
