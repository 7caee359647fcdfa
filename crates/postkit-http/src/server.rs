//! HTTP server
//!
//! Builds the application router (health check plus the posts resource)
//! and serves it with graceful shutdown on Ctrl+C / SIGTERM.

use std::future::Future;
use std::net::SocketAddr;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::{header, StatusCode};
use axum::middleware::map_response;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::{TcpListener, ToSocketAddrs};
use tokio::signal;
use tokio::sync::oneshot;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::config::HttpConfig;
use crate::error::{HttpError, HttpResult};
use crate::routes::{api_routes, AppState};

/// Assemble the full application router
pub fn app(state: AppState, config: &HttpConfig) -> Router {
    let mut router = Router::new()
        .route(&config.health_check_path, get(health_check))
        .merge(api_routes())
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.max_request_size))
        .layer(TimeoutLayer::new(config.request_timeout()))
        .layer(map_response(json_error_bodies));

    if config.enable_tracing {
        router = router.layer(TraceLayer::new_for_http());
    }

    router
}

async fn health_check(State(state): State<AppState>) -> HttpResult<Json<Value>> {
    let store = state.store();
    let posts = store.count_posts().await.map_err(|e| {
        warn!("Health check failed: {}", e);
        HttpError::health_check(format!("{} storage unavailable", store.backend_name()))
    })?;

    Ok(Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "storage": store.backend_name(),
        "posts": posts,
    })))
}

/// Give bodiless framework errors (unknown route, wrong method, timeout)
/// the same JSON shape as handler errors
async fn json_error_bodies(response: Response) -> Response {
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error())
        || response.headers().contains_key(header::CONTENT_TYPE)
    {
        return response;
    }

    let error = match status {
        StatusCode::NOT_FOUND => HttpError::RouteNotFound,
        StatusCode::METHOD_NOT_ALLOWED => HttpError::MethodNotAllowed,
        StatusCode::REQUEST_TIMEOUT => HttpError::RequestTimeout,
        _ => return response,
    };

    let allow = response.headers().get(header::ALLOW).cloned();
    let mut rewritten = error.into_response();
    if let Some(allow) = allow {
        rewritten.headers_mut().insert(header::ALLOW, allow);
    }
    rewritten
}

/// A bound listener plus the router it will serve
pub struct HttpServer {
    listener: TcpListener,
    router: Router,
    config: HttpConfig,
}

impl HttpServer {
    /// Bind `addr` and build the router; nothing is served until [`run`](Self::run)
    pub async fn bind<A: ToSocketAddrs>(
        addr: A,
        state: AppState,
        config: HttpConfig,
    ) -> HttpResult<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| HttpError::startup(format!("Failed to bind: {}", e)))?;
        let router = app(state, &config);

        Ok(Self {
            listener,
            router,
            config,
        })
    }

    pub fn local_addr(&self) -> HttpResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until Ctrl+C or SIGTERM
    pub async fn run(self) -> HttpResult<()> {
        self.run_until(shutdown_signal()).await
    }

    /// Serve until `shutdown` completes, then give in-flight requests up to
    /// the configured shutdown timeout to finish
    pub async fn run_until<F>(self, shutdown: F) -> HttpResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.local_addr()?;
        let grace = self.config.shutdown_timeout();
        info!("Starting HTTP server on {}", addr);
        info!(
            "Health check: http://{}{}",
            addr, self.config.health_check_path
        );

        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let serve = axum::serve(self.listener, self.router.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = stop_rx.await;
            });
        let mut server = tokio::spawn(async move { serve.await });

        tokio::select! {
            result = &mut server => return finish(result),
            _ = shutdown => {
                info!("Shutdown signal received, draining connections");
                let _ = stop_tx.send(());
            }
        }

        match tokio::time::timeout(grace, &mut server).await {
            Ok(result) => finish(result),
            Err(_) => {
                warn!("Shutdown timed out after {:?}, aborting open connections", grace);
                server.abort();
                Ok(())
            }
        }
    }
}

fn finish(result: Result<std::io::Result<()>, tokio::task::JoinError>) -> HttpResult<()> {
    match result {
        Ok(Ok(())) => {
            info!("HTTP server stopped gracefully");
            Ok(())
        }
        Ok(Err(e)) => {
            error!("Server error: {}", e);
            Err(HttpError::startup(format!("Server failed: {}", e)))
        }
        Err(e) => Err(HttpError::internal(format!("Server task failed: {}", e))),
    }
}

/// Resolves on Ctrl+C or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
