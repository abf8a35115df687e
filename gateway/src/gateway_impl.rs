//! Main gateway implementation
//!
//! The `Gateway` owns the stateless validator and engine and the injected
//! services, and wires them into the axum router.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use engine::{OptimizationEngine, Validator};
use shared::logging::{log_shutdown, log_startup};
use shared::{ComponentId, component_error, component_info};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::GatewayConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::state::GatewayState;
use crate::traits::{MetricsStore, TraceRecorder, WorkflowDispatcher};
use crate::web::handlers::{health, metrics, not_found, optimize, trace};

/// Main gateway struct with dependency injection
pub struct Gateway<D, M, T>
where
    D: WorkflowDispatcher,
    M: MetricsStore,
    T: TraceRecorder,
{
    pub(crate) config: Arc<GatewayConfig>,
    pub(crate) state: Arc<GatewayState>,
    pub(crate) validator: Arc<Validator>,
    pub(crate) engine: OptimizationEngine,
    pub(crate) dispatcher: Arc<D>,
    pub(crate) metrics: Arc<M>,
    pub(crate) tracer: Arc<T>,
}

// Services are shared behind `Arc`, so cloning never requires `D: Clone`
impl<D, M, T> Clone for Gateway<D, M, T>
where
    D: WorkflowDispatcher,
    M: MetricsStore,
    T: TraceRecorder,
{
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            state: self.state.clone(),
            validator: self.validator.clone(),
            engine: self.engine,
            dispatcher: self.dispatcher.clone(),
            metrics: self.metrics.clone(),
            tracer: self.tracer.clone(),
        }
    }
}

impl<D, M, T> Gateway<D, M, T>
where
    D: WorkflowDispatcher + 'static,
    M: MetricsStore + 'static,
    T: TraceRecorder + 'static,
{
    /// Create a new gateway with dependency injection
    pub fn new(config: GatewayConfig, dispatcher: D, metrics: M, tracer: T) -> Self {
        let validator = Validator::new(config.defaults.clone());

        Self {
            config: Arc::new(config),
            state: Arc::new(GatewayState::new()),
            validator: Arc::new(validator),
            engine: OptimizationEngine::new(),
            dispatcher: Arc::new(dispatcher),
            metrics: Arc::new(metrics),
            tracer: Arc::new(tracer),
        }
    }

    /// Build the axum router with all routes
    pub fn build_router(&self) -> Router {
        Router::new()
            .route("/optimize", post(optimize::optimize::<D, M, T>))
            .route("/metrics", get(metrics::metrics::<D, M, T>))
            .route("/trace", post(trace::trace::<D, M, T>))
            .route("/health", get(health::health::<D, M, T>))
            .fallback(not_found)
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(CorsLayer::permissive())
                    .into_inner(),
            )
            .with_state(self.clone())
    }

    /// Bind the listener and serve until Ctrl+C
    pub async fn run(&self) -> GatewayResult<()> {
        let address = self.config.bind_address;
        let router = self.build_router();

        let listener = tokio::net::TcpListener::bind(address)
            .await
            .map_err(|source| GatewayError::ServerStartup { address, source })?;

        log_startup(ComponentId::Gateway, &format!("HTTP gateway on http://{address}"));
        component_info!(
            ComponentId::Gateway,
            dispatch_configured = self.dispatcher.is_configured(),
            dispatch_mode = ?self.dispatcher.mode(),
            trace_sink_configured = self.tracer.is_configured(),
            circuit = %self.config.metrics.circuit_id,
            "Gateway ready"
        );

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                component_error!(ComponentId::Gateway, error = %e, "HTTP server failed");
                GatewayError::Io(e)
            })?;

        let drained = self.dispatcher.drain().await;
        component_info!(
            ComponentId::Gateway,
            drained_dispatches = drained,
            requests = self.state.requests(),
            optimizations = self.state.optimizations(),
            rejections = self.state.rejections(),
            "Gateway stopped"
        );
        Ok(())
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => log_shutdown(ComponentId::Gateway, "Received Ctrl+C signal"),
        Err(e) => component_error!(ComponentId::Gateway, error = %e, "Signal handling failed"),
    }
}
