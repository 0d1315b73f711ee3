use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::{debug, info};

use crate::{
    app::App,
    boot::{AppRouter, BootError},
    router::router,
};

pub async fn handle_serve_command(app: App, app_router: AppRouter) -> Result<(), BootError> {
    let port = app.config.server.port;

    let api = app_router(app.clone())?;
    for route in api.routes() {
        debug!(%route, "Route registered");
    }
    info!(routes = api.routes().len(), "CRUD routes registered");

    start_server(router(app, api.into_router()), port).await
}

async fn start_server(router: axum::Router, port: u16) -> Result<(), BootError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;

    info!("🌐 Server starting on http://{}", addr);
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
