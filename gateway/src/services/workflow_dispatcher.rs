//! Workflow dispatcher service implementation
//!
//! Posts each optimization result to the configured workflow executor. Every
//! failure mode (no endpoint, timeout, connection error, non-2xx reply) turns
//! into a `failed` [`WorkflowDispatchOutcome`]; nothing here returns an error
//! to the caller.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use shared::{
    ComponentId, DispatchStatus, DomainRecord, OptimizationResult, WorkflowDispatchOutcome, component_info,
    component_warn,
};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinSet;
use url::Url;

use crate::config::{DispatchConfig, DispatchMode};
use crate::error::GatewayResult;
use crate::traits::WorkflowDispatcher;
use crate::types::DispatchAttempt;

/// Body fields checked, in order, for the executor's workflow identifier
const WORKFLOW_ID_FIELDS: [&str; 3] = ["workflowId", "executionId", "id"];

const NOT_CONFIGURED: &str = "dispatch endpoint not configured";

/// JSON body sent to the executor
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchPayload {
    pub workflow_name: String,
    pub request_id: String,
    pub source: String,
    pub timestamp: String,
    pub record: DomainRecord,
    pub result: OptimizationResult,
}

/// Why a single attempt failed
#[derive(Debug, Clone, PartialEq)]
enum AttemptFailure {
    Timeout,
    Connect(String),
    Status(u16),
    Other(String),
}

impl AttemptFailure {
    fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AttemptFailure::Timeout
        } else if err.is_connect() {
            AttemptFailure::Connect(err.to_string())
        } else {
            AttemptFailure::Other(err.to_string())
        }
    }

    /// Client errors are the executor rejecting the payload; resending won't help
    fn is_retryable(&self) -> bool {
        match self {
            AttemptFailure::Status(code) => !(400..500).contains(code),
            _ => true,
        }
    }

    fn describe(&self, timeout_ms: u64) -> String {
        match self {
            AttemptFailure::Timeout => format!("dispatch timed out after {timeout_ms} ms"),
            AttemptFailure::Connect(message) => format!("connection failed: {message}"),
            AttemptFailure::Status(code) => format!("workflow endpoint returned HTTP {code}"),
            AttemptFailure::Other(message) => format!("dispatch failed: {message}"),
        }
    }
}

/// Real dispatcher backed by a shared `reqwest` client
#[derive(Clone)]
pub struct RealWorkflowDispatcher {
    config: DispatchConfig,
    client: reqwest::Client,
    last_attempt: Arc<RwLock<Option<DispatchAttempt>>>,
    in_flight: Arc<Mutex<JoinSet<()>>>,
}

impl RealWorkflowDispatcher {
    /// Build the dispatcher; the client enforces the per-attempt timeout
    pub fn new(config: DispatchConfig) -> GatewayResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("record-optimizer-gateway/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            config,
            client,
            last_attempt: Arc::new(RwLock::new(None)),
            in_flight: Arc::new(Mutex::new(JoinSet::new())),
        })
    }

    fn payload(&self, request_id: &str, record: &DomainRecord, result: &OptimizationResult) -> DispatchPayload {
        DispatchPayload {
            workflow_name: self.config.workflow_name.clone(),
            request_id: request_id.to_string(),
            source: self.config.source.clone(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            record: record.clone(),
            result: result.clone(),
        }
    }

    /// Run up to `attempts` posts and record how the delivery ended
    async fn deliver(&self, endpoint: &Url, payload: &DispatchPayload) -> WorkflowDispatchOutcome {
        let attempts = self.config.attempts.max(1);
        let mut attempt = 0;

        let outcome = loop {
            attempt += 1;
            match self.send_once(endpoint, payload).await {
                Ok(workflow_id) => break WorkflowDispatchOutcome::success(workflow_id),
                Err(failure) => {
                    let description = failure.describe(self.timeout_ms());
                    if attempt >= attempts || !failure.is_retryable() {
                        break WorkflowDispatchOutcome::failed(description);
                    }
                    component_warn!(
                        ComponentId::Dispatcher,
                        request_id = %payload.request_id,
                        attempt,
                        error = %description,
                        "Dispatch attempt failed, retrying"
                    );
                    tokio::time::sleep(self.config.retry_backoff).await;
                }
            }
        };

        self.remember(&payload.request_id, &outcome, attempt).await;
        outcome
    }

    async fn send_once(&self, endpoint: &Url, payload: &DispatchPayload) -> Result<Option<String>, AttemptFailure> {
        let response = self
            .client
            .post(endpoint.clone())
            .header("X-Request-Id", &payload.request_id)
            .header("X-Timestamp", &payload.timestamp)
            .json(payload)
            .send()
            .await
            .map_err(AttemptFailure::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AttemptFailure::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(AttemptFailure::from_reqwest)?;
        Ok(extract_workflow_id(status, &body))
    }

    async fn remember(&self, request_id: &str, outcome: &WorkflowDispatchOutcome, attempts: u32) {
        match outcome.status {
            DispatchStatus::Failed => component_warn!(
                ComponentId::Dispatcher,
                request_id,
                attempts,
                error = outcome.error.as_deref().unwrap_or_default(),
                "Dispatch failed, continuing with fallback outcome"
            ),
            _ => component_info!(
                ComponentId::Dispatcher,
                request_id,
                attempts,
                workflow_id = outcome.workflow_id.as_deref().unwrap_or("-"),
                "Dispatch delivered"
            ),
        }

        let mut last = self.last_attempt.write().await;
        *last = Some(DispatchAttempt {
            request_id: request_id.to_string(),
            status: outcome.status,
            at: Utc::now(),
            attempts,
            error: outcome.error.clone(),
        });
    }
}

/// Pull the executor's identifier out of a 2xx body, if it sent one
fn extract_workflow_id(status: StatusCode, body: &str) -> Option<String> {
    if status == StatusCode::NO_CONTENT || body.trim().is_empty() {
        return None;
    }

    let value: Value = serde_json::from_str(body).ok()?;
    WORKFLOW_ID_FIELDS.iter().find_map(|field| match value.get(*field)? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    })
}

#[async_trait]
impl WorkflowDispatcher for RealWorkflowDispatcher {
    async fn dispatch(
        &self,
        request_id: &str,
        record: &DomainRecord,
        result: &OptimizationResult,
    ) -> WorkflowDispatchOutcome {
        let Some(endpoint) = self.config.endpoint.clone() else {
            let outcome = WorkflowDispatchOutcome::failed(NOT_CONFIGURED);
            self.remember(request_id, &outcome, 0).await;
            return outcome;
        };

        let payload = self.payload(request_id, record, result);

        match self.config.mode {
            DispatchMode::Await => self.deliver(&endpoint, &payload).await,
            DispatchMode::Detached => {
                let dispatcher = self.clone();
                let mut in_flight = self.in_flight.lock().await;
                // Reap finished deliveries so the set only holds live ones
                while in_flight.try_join_next().is_some() {}
                in_flight.spawn(async move {
                    dispatcher.deliver(&endpoint, &payload).await;
                });
                WorkflowDispatchOutcome::pending()
            }
        }
    }

    async fn last_attempt(&self) -> Option<DispatchAttempt> {
        self.last_attempt.read().await.clone()
    }

    async fn drain(&self) -> usize {
        let mut in_flight = std::mem::take(&mut *self.in_flight.lock().await);
        if in_flight.is_empty() {
            return 0;
        }

        component_info!(
            ComponentId::Dispatcher,
            pending = in_flight.len(),
            "Waiting for detached dispatches"
        );
        let mut finished = 0;
        while let Some(joined) = in_flight.join_next().await {
            match joined {
                Ok(()) => finished += 1,
                Err(e) => component_warn!(ComponentId::Dispatcher, error = %e, "Detached dispatch task failed"),
            }
        }
        finished
    }

    fn is_configured(&self) -> bool {
        self.config.endpoint.is_some()
    }

    fn mode(&self) -> DispatchMode {
        self.config.mode
    }

    fn timeout_ms(&self) -> u64 {
        self.config.timeout.as_millis() as u64
    }
}
