use crate::config::{Config, Environment};
use crate::error::panic_fault;
use crate::handlers::{create_address, delete_address, health_check, list_addresses, root, AppState};
use crate::health::HealthChecker;
use crate::middleware::{error_translator, logging_middleware, require_bearer_token, security_headers};
use axum::routing::{delete, get, post};
use axum::{middleware, Router};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the application router with a freshly seeded store
pub fn create_app(config: Config) -> Router {
    router(AppState::new(config))
}

/// Build the application router around existing state
pub fn router(state: AppState) -> Router {
    HealthChecker::mark_started();

    let environment = state.config.environment;
    let auth = middleware::from_fn_with_state(state.clone(), require_bearer_token);

    let routes = Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route(
            "/address",
            get(list_addresses).merge(post(create_address).route_layer(auth.clone())),
        )
        .route("/address/:id", delete(delete_address).route_layer(auth))
        .with_state(state);

    with_middleware(routes, environment)
}

/// Wrap routes in the shared layer stack: tracing, CORS, security headers,
/// request logging and server fault handling.
pub fn with_middleware(routes: Router, environment: Environment) -> Router {
    routes.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .layer(middleware::from_fn(security_headers))
            .layer(middleware::from_fn_with_state(
                environment.request_log_format(),
                logging_middleware,
            ))
            .layer(middleware::from_fn_with_state(environment, error_translator))
            .layer(CatchPanicLayer::custom(panic_fault)),
    )
}

pub struct Server {
    app: Router,
    bind_addr: SocketAddr,
}

impl Server {
    pub fn new(config: Config) -> Self {
        let bind_addr = config.bind_addr;
        Self {
            app: create_app(config),
            bind_addr,
        }
    }

    pub async fn run(self) -> std::io::Result<()> {
        let listener = TcpListener::bind(self.bind_addr).await?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener until a shutdown signal arrives
    pub async fn serve(self, listener: TcpListener) -> std::io::Result<()> {
        let local_addr = listener.local_addr()?;

        tracing::info!("Address book server listening on {}", local_addr);
        tracing::info!("Health check available at /health");

        axum::serve(
            listener,
            self.app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install terminate handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        },
    }
}
