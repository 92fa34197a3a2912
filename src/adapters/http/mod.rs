pub mod cors;
pub mod handler;

use crate::core::exam::ExamService;
use crate::core::GenerationClient;
use crate::utils::error::Result;
use axum::middleware;
use axum::routing::post;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

pub use cors::CorsPolicy;
pub use handler::AppState;

pub const GENERATE_EXAM_PATH: &str = "/generate-exam";

pub fn router<G: GenerationClient + 'static>(service: ExamService<G>, cors_policy: CorsPolicy) -> Router {
    Router::new()
        .route(GENERATE_EXAM_PATH, post(handler::generate_exam::<G>))
        .with_state(AppState {
            service: Arc::new(service),
        })
        .layer(middleware::from_fn_with_state(
            Arc::new(cors_policy),
            cors::apply_cors,
        ))
}

/// Serves until Ctrl-C.
pub async fn serve(listener: TcpListener, app: Router) -> Result<()> {
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server");
}
