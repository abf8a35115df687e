//! Trace recorder service implementation
//!
//! Forwards execution traces to an external observability sink. Losing a
//! trace is logged and reported as `forwarded = false`; it never fails the
//! caller.

use async_trait::async_trait;
use shared::{ComponentId, TraceRecord, component_debug, component_warn};
use url::Url;

use crate::config::TraceSinkConfig;
use crate::error::GatewayResult;
use crate::traits::TraceRecorder;

const API_KEY_HEADER: &str = "x-api-key";

/// Real trace recorder posting JSON to the configured sink
#[derive(Clone)]
pub struct RealTraceRecorder {
    endpoint: Option<Url>,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl RealTraceRecorder {
    pub fn new(config: TraceSinkConfig) -> GatewayResult<Self> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            endpoint: config.endpoint,
            api_key: config.api_key,
            client,
        })
    }

    async fn forward(&self, endpoint: &Url, trace: &TraceRecord) -> Result<(), String> {
        let mut request = self.client.post(endpoint.clone()).json(trace);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request.send().await.map_err(|e| e.to_string())?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(format!("trace sink returned HTTP {}", status.as_u16()))
        }
    }
}

#[async_trait]
impl TraceRecorder for RealTraceRecorder {
    async fn record(&self, trace: &TraceRecord) -> bool {
        let Some(endpoint) = &self.endpoint else {
            component_debug!(
                ComponentId::Tracer,
                session_id = %trace.session_id,
                "No trace sink configured, keeping trace local"
            );
            return false;
        };

        match self.forward(endpoint, trace).await {
            Ok(()) => {
                component_debug!(ComponentId::Tracer, session_id = %trace.session_id, "Trace forwarded");
                true
            }
            Err(error) => {
                component_warn!(
                    ComponentId::Tracer,
                    session_id = %trace.session_id,
                    error = %error,
                    "Trace forwarding failed"
                );
                false
            }
        }
    }

    fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }

    fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}
