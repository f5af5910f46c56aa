use anyhow::Result;
use log::info;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::api::handlers::AppState;
use crate::api::routes::create_router;
use crate::tracker::PlayerRegistry;

/// Health and leaderboard endpoints over the live registry
pub struct ServerService {
    port: u16,
    registry: Arc<PlayerRegistry>,
}

impl ServerService {
    pub fn new(port: u16, registry: Arc<PlayerRegistry>) -> Self {
        Self { port, registry }
    }

    pub async fn run(&self) -> Result<()> {
        let state = Arc::new(AppState {
            registry: Arc::clone(&self.registry),
        });

        let app = create_router(state)
            .layer(CorsLayer::permissive());

        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        info!("Server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}
