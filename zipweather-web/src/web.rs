use std::sync::Arc;

use axum::{
    Form, Router,
    extract::{Query, State},
    http::StatusCode,
    response::Html,
    routing::get,
};
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use zipweather_core::{LookupError, LookupService};

use crate::pages;

#[derive(Debug, Clone)]
pub struct AppState {
    pub lookup: Arc<LookupService>,
}

#[derive(Debug, Deserialize)]
pub struct ZipForm {
    #[serde(rename = "zipCode", default)]
    pub zip_code: String,
}

type Page = (StatusCode, Html<String>);

/// All routes served by the front end.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/lookup", get(lookup_query).post(lookup_form))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve `app` on `listener` until Ctrl-C.
pub async fn serve(listener: TcpListener, app: Router) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    info!("Web server running at http://{addr}");

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Could not listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

async fn home() -> Html<String> {
    Html(pages::home())
}

async fn lookup_query(State(state): State<AppState>, Query(form): Query<ZipForm>) -> Page {
    render_lookup(&state, &form.zip_code).await
}

async fn lookup_form(State(state): State<AppState>, Form(form): Form<ZipForm>) -> Page {
    render_lookup(&state, &form.zip_code).await
}

async fn render_lookup(state: &AppState, zip: &str) -> Page {
    let zip = zip.trim();
    if zip.is_empty() {
        return (StatusCode::BAD_REQUEST, Html(pages::error("Please enter a zip code.", zip)));
    }

    match state.lookup.lookup(zip).await {
        Ok(result) => (StatusCode::OK, Html(pages::lookup(&result))),
        Err(e) => {
            warn!(zip, error = %e, "lookup failed");
            (status_for(&e), Html(pages::error(&user_message(&e), zip)))
        }
    }
}

fn status_for(err: &LookupError) -> StatusCode {
    if err.is_not_found() {
        StatusCode::NOT_FOUND
    } else if err.is_timeout() {
        StatusCode::GATEWAY_TIMEOUT
    } else {
        StatusCode::BAD_GATEWAY
    }
}

fn user_message(err: &LookupError) -> String {
    match err {
        LookupError::NoRecords { .. } | LookupError::NoStation { .. } => err.to_string(),
        e if e.is_timeout() => "The weather services took too long to answer. Try again shortly.".to_string(),
        LookupError::Transport { .. } => {
            "Could not reach the weather services. Try again shortly.".to_string()
        }
        _ => "The weather services returned something we could not understand.".to_string(),
    }
}
