mod common;
mod error;
mod game;
mod listings;
mod market;
mod negotiations;
mod offers;
mod routes;

pub use error::{ApiError, ApiResult};
pub use game::supervisor::AiTaskSupervisor;

use crate::routes::ServerRoutes;
use axum::response::IntoResponse;
use core::storage::InMemoryStore;
use core::transfers::negotiation::{InMemorySessionStore, NegotiationManager};
use core::transfers::policy::AiConfig;
use log::{error, info};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;

pub struct TransferMarketServer {
    data: GameAppData,
}

impl TransferMarketServer {
    pub fn new(data: GameAppData) -> Self {
        TransferMarketServer { data }
    }

    pub async fn run(&self) {
        let app = ServerRoutes::create()
            .layer(
                ServiceBuilder::new()
                    // Catch panics in handlers and convert them to 500 errors
                    .layer(CatchPanicLayer::custom(|_err| {
                        (
                            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                            "Internal server error - handler panicked".to_string(),
                        )
                            .into_response()
                    })),
            )
            .with_state(self.data.clone());

        let addr = SocketAddr::from(([0, 0, 0, 0], 18000));

        let listener = match TcpListener::bind(addr).await {
            Ok(listener) => listener,
            Err(e) => {
                error!("Failed to bind to address {}: {}", addr, e);
                panic!("Cannot start server without binding to port");
            }
        };

        info!("listen at: http://localhost:18000");

        if let Err(e) = axum::serve(listener, app).await {
            error!("Server error: {}", e);
            error!("Server stopped unexpectedly, but not crashing the process");
        }
    }
}

pub struct GameAppData {
    pub store: Arc<RwLock<InMemoryStore>>,
    pub negotiations: Arc<NegotiationManager>,
    pub ai_tasks: Arc<AiTaskSupervisor>,
    pub ai_config: Arc<AiConfig>,
}

impl GameAppData {
    pub fn new(store: InMemoryStore) -> Self {
        GameAppData {
            store: Arc::new(RwLock::new(store)),
            negotiations: Arc::new(NegotiationManager::new(Arc::new(
                InMemorySessionStore::new(),
            ))),
            ai_tasks: Arc::new(AiTaskSupervisor::new()),
            ai_config: Arc::new(AiConfig::default()),
        }
    }
}

impl Clone for GameAppData {
    fn clone(&self) -> Self {
        GameAppData {
            store: Arc::clone(&self.store),
            negotiations: Arc::clone(&self.negotiations),
            ai_tasks: Arc::clone(&self.ai_tasks),
            ai_config: Arc::clone(&self.ai_config),
        }
    }
}
