//! Page host for the dashboard
//!
//! Every request runs the pipeline from scratch; nothing is cached between
//! requests.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::DashboardConfig;
use crate::models::{FetchProfile, ForecastWindow, Variant};
use crate::pipeline::{self, Dashboard};
use crate::render::PageRenderer;
use crate::weather::ForecastProvider;
use crate::{DashboardError, Result};

/// Shared state behind every route and the one-shot `render` command
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<DashboardConfig>,
    pub provider: Arc<dyn ForecastProvider>,
    pub renderer: Arc<PageRenderer>,
}

impl AppState {
    pub fn new(config: DashboardConfig, provider: Arc<dyn ForecastProvider>) -> Result<Self> {
        Ok(Self {
            config: Arc::new(config),
            provider,
            renderer: Arc::new(PageRenderer::new()?),
        })
    }

    /// Window for `profile` starting on today's UTC date
    #[must_use]
    pub fn window_for(&self, profile: &FetchProfile) -> ForecastWindow {
        ForecastWindow::for_today(profile.horizon_days, self.config.weather.api_ceiling_date)
    }

    /// Run the pipeline for `variant` over the configured locations
    pub async fn dashboard(&self, variant: Variant) -> Result<Dashboard> {
        let profile = FetchProfile::for_variant(variant);
        let window = self.window_for(&profile);
        pipeline::run(
            self.provider.as_ref(),
            &self.config.locations,
            &profile,
            window,
        )
        .await
    }

    /// Run the pipeline and render the HTML page
    pub async fn page(&self, variant: Variant) -> Result<(Dashboard, String)> {
        let dashboard = self.dashboard(variant).await?;
        let html = self
            .renderer
            .render(&dashboard, &self.config.title_for(variant))?;
        Ok((dashboard, html))
    }

    fn resolve_variant(&self, query: &ViewQuery) -> std::result::Result<Variant, StatusCode> {
        match &query.variant {
            Some(name) => name.parse().map_err(|_| StatusCode::BAD_REQUEST),
            None => Ok(self.config.dashboard.variant),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ViewQuery {
    pub variant: Option<String>,
}

fn status_for(err: &DashboardError) -> StatusCode {
    match err {
        DashboardError::Api { .. } | DashboardError::Parse { .. } => StatusCode::BAD_GATEWAY,
        DashboardError::NoData { .. } => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(get_page))
        .route("/api/forecast", get(get_forecast))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn get_page(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> std::result::Result<Html<String>, StatusCode> {
    let variant = state.resolve_variant(&query)?;
    let (_, html) = state.page(variant).await.map_err(|e| {
        error!("Failed to build dashboard page: {}", e);
        status_for(&e)
    })?;
    Ok(Html(html))
}

async fn get_forecast(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> std::result::Result<Response, StatusCode> {
    let variant = state.resolve_variant(&query)?;
    let dashboard = state.dashboard(variant).await.map_err(|e| {
        error!("Failed to build forecast: {}", e);
        status_for(&e)
    })?;

    if dashboard.is_halted() {
        let body = json!({
            "error": DashboardError::no_data().user_message(),
            "notices": dashboard.notices,
        });
        return Ok((StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response());
    }

    Ok(Json(dashboard).into_response())
}

/// Serve the dashboard until the process is interrupted
pub async fn run(state: AppState, port: u16) -> anyhow::Result<()> {
    let app = router(state);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Dashboard running at http://localhost:{}", port);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await?;
    Ok(())
}
