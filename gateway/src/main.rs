//! Gateway process entry point
//!
//! Settings come from the command line, the environment, or a `.env` file in
//! the working directory, in that order of precedence.

use clap::Parser;
use shared::{ComponentId, component_info, logging};

use gateway::{
    Args, Gateway, GatewayConfig, GatewayResult, InMemoryMetricsStore, RealTraceRecorder, RealWorkflowDispatcher,
};

#[tokio::main]
async fn main() -> GatewayResult<()> {
    // A missing .env file is fine; real environment variables still apply
    let _ = dotenv::dotenv();

    let args = Args::parse();
    logging::init_tracing(Some(&args.log_level));

    let config = match GatewayConfig::try_from(args) {
        Ok(config) => config,
        Err(e) => {
            logging::log_error(ComponentId::Gateway, "Configuration", &e);
            return Err(e);
        }
    };

    component_info!(
        ComponentId::Gateway,
        bind = %config.bind_address,
        dispatch_timeout_ms = config.dispatch.timeout.as_millis() as u64,
        dispatch_attempts = config.dispatch.attempts,
        "Configuration loaded"
    );

    // Initialize services with dependency injection
    let dispatcher = RealWorkflowDispatcher::new(config.dispatch.clone())?;
    let metrics = InMemoryMetricsStore::new(config.metrics.active_window);
    let tracer = RealTraceRecorder::new(config.trace_sink.clone())?;

    let gateway = Gateway::new(config, dispatcher, metrics, tracer);
    gateway.run().await?;

    logging::log_success(ComponentId::Gateway, "Gateway stopped gracefully");
    Ok(())
}
