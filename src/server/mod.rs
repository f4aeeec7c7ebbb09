use axum::{
    extract::{Form, State},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::{EntityKind, Fields};

pub mod html;
pub mod routes;

/// Server state. Each request opens its own store on `database_path`.
pub struct AppState {
    pub database_path: PathBuf,
}

/// Routes: `/` redirects to `/about-us`; every entity kind gets
/// `GET /show_<kind>`, `GET /create_<kind>` and `POST /create_<kind>`.
pub fn router(state: Arc<AppState>) -> Router {
    let mut app: Router<Arc<AppState>> = Router::new()
        .route("/", get(routes::home))
        .route("/about-us", get(routes::about_us));

    for &kind in EntityKind::all() {
        app = app
            .route(
                &kind.listing_path(),
                get(move |state: State<Arc<AppState>>| routes::show(state, kind)),
            )
            .route(
                &kind.create_path(),
                get(move |state: State<Arc<AppState>>| routes::create_form(state, kind)).post(
                    move |state: State<Arc<AppState>>, form: Form<Fields>| {
                        routes::create_submit(state, kind, form)
                    },
                ),
            );
    }

    app.layer(TraceLayer::new_for_http()).with_state(state)
}

pub async fn start_server(port: u16, database_path: PathBuf) -> anyhow::Result<()> {
    let state = Arc::new(AppState { database_path });
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
