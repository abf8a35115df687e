//! Gateway configuration
//!
//! Every setting is read once at process start (command line, then
//! environment, then an optional `.env` file loaded by `main`) and frozen into
//! a [`GatewayConfig`] that is shared by reference with each component.
//! External endpoints and credentials have no built-in defaults: leaving them
//! unset disables the corresponding collaborator.

use std::net::SocketAddr;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use engine::FieldDefaults;
use serde::Serialize;
use url::Url;

use crate::error::{GatewayError, GatewayResult};

const MIN_DISPATCH_TIMEOUT_MS: u64 = 1_000;
const MAX_DISPATCH_TIMEOUT_MS: u64 = 60_000;
const MAX_DISPATCH_ATTEMPTS: u32 = 5;

/// How `/optimize` waits for the workflow executor
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
    /// Wait for the executor (bounded by the dispatch timeout)
    Await,
    /// Hand off to a background task and report `pending`
    Detached,
}

/// Command line arguments, each with an environment fallback
#[derive(Parser, Debug, Clone)]
#[command(name = "gateway")]
#[command(about = "Record optimization gateway: validate, optimize, dispatch, measure")]
pub struct Args {
    /// Address for the HTTP listener
    #[arg(long, env = "GATEWAY_BIND", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Workflow executor webhook; dispatch is disabled when unset
    #[arg(long, env = "DISPATCH_URL")]
    pub dispatch_url: Option<String>,

    /// Upper bound on one dispatch attempt, in milliseconds
    #[arg(long, env = "DISPATCH_TIMEOUT_MS", default_value_t = 15_000)]
    pub dispatch_timeout_ms: u64,

    /// Total dispatch attempts (1 disables retries)
    #[arg(long, env = "DISPATCH_ATTEMPTS", default_value_t = 1)]
    pub dispatch_attempts: u32,

    /// Pause between dispatch attempts, in milliseconds
    #[arg(long, env = "DISPATCH_RETRY_BACKOFF_MS", default_value_t = 250)]
    pub dispatch_retry_backoff_ms: u64,

    #[arg(long, env = "DISPATCH_MODE", value_enum, default_value_t = DispatchMode::Await)]
    pub dispatch_mode: DispatchMode,

    /// Workflow name sent with dispatches and used for traces without one
    #[arg(long, env = "WORKFLOW_NAME", default_value = "pup-optimization")]
    pub workflow_name: String,

    /// Source tag sent with dispatches
    #[arg(long, env = "DISPATCH_SOURCE", default_value = "record-optimizer")]
    pub dispatch_source: String,

    /// Observability sink for execution traces; traces stay local when unset
    #[arg(long, env = "TRACE_SINK_URL")]
    pub trace_sink_url: Option<String>,

    /// Credential sent to the trace sink as `x-api-key`
    #[arg(long, env = "TRACE_SINK_API_KEY", hide_env_values = true)]
    pub trace_sink_api_key: Option<String>,

    #[arg(long, env = "TRACE_TIMEOUT_MS", default_value_t = 5_000)]
    pub trace_timeout_ms: u64,

    /// Circuit that `/optimize` executions are recorded under
    #[arg(long, env = "CIRCUIT_ID", default_value = "pup_optimizer")]
    pub circuit_id: String,

    /// Window for counting a circuit as active, in seconds
    #[arg(long, env = "ACTIVE_WINDOW_SECS", default_value_t = 3_600)]
    pub active_window_secs: u64,

    #[arg(long, env = "DEFAULT_PLANT", default_value = "P001")]
    pub default_plant: String,

    #[arg(long, env = "DEFAULT_VALUATION_CLASS", default_value = "3000")]
    pub default_valuation_class: String,

    /// Include internal error messages in 500 responses (diagnostics only)
    #[arg(long, env = "EXPOSE_ERROR_DETAILS")]
    pub expose_error_details: bool,
}

/// Workflow executor settings
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    pub endpoint: Option<Url>,
    pub timeout: Duration,
    pub attempts: u32,
    pub retry_backoff: Duration,
    pub mode: DispatchMode,
    pub workflow_name: String,
    pub source: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout: Duration::from_millis(15_000),
            attempts: 1,
            retry_backoff: Duration::from_millis(250),
            mode: DispatchMode::Await,
            workflow_name: "pup-optimization".to_string(),
            source: "record-optimizer".to_string(),
        }
    }
}

/// Trace sink settings
#[derive(Debug, Clone)]
pub struct TraceSinkConfig {
    pub endpoint: Option<Url>,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for TraceSinkConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            timeout: Duration::from_millis(5_000),
        }
    }
}

/// Metrics store settings
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    pub circuit_id: String,
    pub active_window: Duration,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            circuit_id: "pup_optimizer".to_string(),
            active_window: Duration::from_secs(3_600),
        }
    }
}

/// Immutable process-wide configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub bind_address: SocketAddr,
    pub log_level: String,
    pub dispatch: DispatchConfig,
    pub trace_sink: TraceSinkConfig,
    pub metrics: MetricsConfig,
    pub defaults: FieldDefaults,
    pub expose_error_details: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([127, 0, 0, 1], 8080)),
            log_level: "info".to_string(),
            dispatch: DispatchConfig::default(),
            trace_sink: TraceSinkConfig::default(),
            metrics: MetricsConfig::default(),
            defaults: FieldDefaults::default(),
            expose_error_details: false,
        }
    }
}

impl TryFrom<Args> for GatewayConfig {
    type Error = GatewayError;

    fn try_from(args: Args) -> GatewayResult<Self> {
        if !(MIN_DISPATCH_TIMEOUT_MS..=MAX_DISPATCH_TIMEOUT_MS).contains(&args.dispatch_timeout_ms) {
            return Err(GatewayError::config(format!(
                "dispatch timeout must be between {MIN_DISPATCH_TIMEOUT_MS} and {MAX_DISPATCH_TIMEOUT_MS} ms, got {}",
                args.dispatch_timeout_ms
            )));
        }
        if args.dispatch_attempts == 0 || args.dispatch_attempts > MAX_DISPATCH_ATTEMPTS {
            return Err(GatewayError::config(format!(
                "dispatch attempts must be between 1 and {MAX_DISPATCH_ATTEMPTS}, got {}",
                args.dispatch_attempts
            )));
        }
        if args.trace_timeout_ms == 0 {
            return Err(GatewayError::config("trace timeout must be positive"));
        }
        if args.circuit_id.trim().is_empty() {
            return Err(GatewayError::config("circuit id must not be empty"));
        }
        if args.active_window_secs == 0 {
            return Err(GatewayError::config("active window must be positive"));
        }

        Ok(Self {
            bind_address: args.bind,
            log_level: args.log_level,
            dispatch: DispatchConfig {
                endpoint: parse_endpoint("DISPATCH_URL", args.dispatch_url)?,
                timeout: Duration::from_millis(args.dispatch_timeout_ms),
                attempts: args.dispatch_attempts,
                retry_backoff: Duration::from_millis(args.dispatch_retry_backoff_ms),
                mode: args.dispatch_mode,
                workflow_name: args.workflow_name,
                source: args.dispatch_source,
            },
            trace_sink: TraceSinkConfig {
                endpoint: parse_endpoint("TRACE_SINK_URL", args.trace_sink_url)?,
                api_key: args.trace_sink_api_key.filter(|key| !key.trim().is_empty()),
                timeout: Duration::from_millis(args.trace_timeout_ms),
            },
            metrics: MetricsConfig {
                circuit_id: args.circuit_id.trim().to_string(),
                active_window: Duration::from_secs(args.active_window_secs),
            },
            defaults: FieldDefaults {
                plant: args.default_plant,
                valuation_class: args.default_valuation_class,
                period: None,
            },
            expose_error_details: args.expose_error_details,
        })
    }
}

/// Blank values count as unset; anything else must be an http(s) URL
fn parse_endpoint(name: &str, raw: Option<String>) -> GatewayResult<Option<Url>> {
    let Some(raw) = raw.filter(|value| !value.trim().is_empty()) else {
        return Ok(None);
    };

    let url = Url::parse(raw.trim()).map_err(|e| GatewayError::config(format!("{name} is not a valid URL: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(Some(url)),
        other => Err(GatewayError::config(format!("{name} must use http or https, got {other}"))),
    }
}
