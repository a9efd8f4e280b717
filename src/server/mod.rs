use crate::{
    config::Config,
    database::{DatabaseManager, DatabaseManagerImpl},
    error::AppError,
    health::HealthService,
    routes::{
        create_dashboard_routes, create_health_routes, create_patient_routes,
        create_transaction_routes,
    },
};
use axum::{
    Router,
    extract::Request,
    middleware::{self, Next},
    response::Response,
};
use std::{net::SocketAddr, sync::Arc, time::Instant};
use tokio::net::TcpListener;
use tracing::info;

#[derive(Clone)]
pub struct Server {
    pub config: Arc<Config>,
    pub database: Arc<dyn DatabaseManager>,
    pub health_service: Arc<HealthService>,
}

impl Server {
    pub async fn new(config: Config) -> Result<Self, AppError> {
        // Initialize database
        let database_impl = Arc::new(
            DatabaseManagerImpl::new_from_config(&config)
                .await
                .map_err(AppError::Database)?,
        );
        let database: Arc<dyn DatabaseManager> = database_impl.clone();

        // Initialize health service
        let health_service = Arc::new(HealthService::new());
        health_service.register(database_impl).await;

        Ok(Self {
            config: Arc::new(config),
            database,
            health_service,
        })
    }

    pub async fn run(&self) -> Result<(), AppError> {
        // Run database migrations on startup to ensure tables exist
        self.database.migrate().await.map_err(AppError::Database)?;

        let app = self.create_app();

        let addr: SocketAddr = format!("{}:{}", self.config.server.host, self.config.server.port)
            .parse()
            .map_err(|e| AppError::Internal(format!("Invalid listen address: {}", e)))?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to bind to address: {}", e)))?;

        info!("Server listening on http://{}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                info!("Graceful shutdown initiated");
            })
            .await
            .map_err(|e| AppError::Internal(format!("Server error: {}", e)))?;

        info!("Server shutdown complete");
        Ok(())
    }

    // Creates an application router
    pub fn create_app(&self) -> Router {
        let api_routes = Router::new()
            .merge(create_patient_routes())
            .merge(create_transaction_routes())
            .merge(create_dashboard_routes());

        let mut app = Router::new()
            .nest("/api", api_routes)
            .nest("/health", create_health_routes())
            .with_state(self.clone());

        if self.config.logging.log_request {
            app = app.layer(middleware::from_fn(request_response_logger));
        }
        app
    }
}

/// Request/response logging middleware
async fn request_response_logger(req: Request, next: Next) -> Response {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();

    let start = Instant::now();
    let response = next.run(req).await;
    let elapsed_ms = start.elapsed().as_millis();

    info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        elapsed_ms = elapsed_ms as u64,
        "request"
    );

    response
}
