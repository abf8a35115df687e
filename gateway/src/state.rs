//! Gateway state management
//!
//! Request counters and the process start time. The per-circuit metrics live
//! in the metrics store; these counters only feed logs and `/health`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Core gateway state shared by every handler
#[derive(Debug)]
pub struct GatewayState {
    pub started_at: Instant,
    requests: AtomicU64,
    optimizations: AtomicU64,
    rejections: AtomicU64,
}

impl GatewayState {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            requests: AtomicU64::new(0),
            optimizations: AtomicU64::new(0),
            rejections: AtomicU64::new(0),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    /// Count an incoming `/optimize` request and return its sequence number
    pub fn begin_request(&self) -> u64 {
        self.requests.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn record_optimization(&self) {
        self.optimizations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejection(&self) {
        self.rejections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn requests(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    pub fn optimizations(&self) -> u64 {
        self.optimizations.load(Ordering::Relaxed)
    }

    pub fn rejections(&self) -> u64 {
        self.rejections.load(Ordering::Relaxed)
    }
}

impl Default for GatewayState {
    fn default() -> Self {
        Self::new()
    }
}
