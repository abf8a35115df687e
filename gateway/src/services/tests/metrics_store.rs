//! Tests for the MetricsStore service

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::services::InMemoryMetricsStore;
use crate::traits::MetricsStore;
use crate::types::ExecutionSample;

const CIRCUIT: &str = "pup_optimizer";

mod in_memory_metrics_store_tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_store_reports_zero_summary() {
        let store = InMemoryMetricsStore::default();

        let (metrics, summary) = store.report_at(Utc::now()).await.unwrap();
        assert!(metrics.is_empty());
        assert_eq!(summary.total_executions, 0);
        assert_eq!(summary.best_advantage_ratio, 0.0);
        assert_eq!(summary.active_circuits, 0);
    }

    #[tokio::test]
    async fn test_concurrent_records_lose_no_updates() {
        let store = Arc::new(InMemoryMetricsStore::default());
        let total = 64u64;

        let handles: Vec<_> = (0..total)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.record(CIRCUIT, i % 7, i % 3 != 0).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let successes = (0..total).filter(|i| i % 3 != 0).count() as u64;
        let metric = store.circuit(CIRCUIT).await.unwrap().unwrap();

        assert_eq!(metric.execution_count, total);
        assert_eq!(metric.success_rate, successes as f64 / total as f64);
        assert_eq!(metric.error_rate, (total - successes) as f64 / total as f64);
    }

    #[tokio::test]
    async fn test_advantage_ratio_tracks_successful_samples() {
        let store = InMemoryMetricsStore::default();

        store.record_execution(CIRCUIT, ExecutionSample::success(3, 1.10)).await.unwrap();
        store.record_execution(CIRCUIT, ExecutionSample::success(5, 1.02)).await.unwrap();
        store.record_execution(CIRCUIT, ExecutionSample::failure(9)).await.unwrap();

        let metric = store.circuit(CIRCUIT).await.unwrap().unwrap();
        assert!((metric.advantage_ratio - 1.06).abs() < 1e-9);
        assert_eq!(metric.execution_count, 3);
    }

    #[tokio::test]
    async fn test_circuits_without_advantage_samples_stay_neutral() {
        let store = InMemoryMetricsStore::default();

        store.record("other", 4, false).await.unwrap();

        let metric = store.circuit("other").await.unwrap().unwrap();
        assert_eq!(metric.advantage_ratio, 1.0);
        assert_eq!(metric.success_rate, 0.0);
    }

    #[tokio::test]
    async fn test_snapshot_sorted_by_circuit() {
        let store = InMemoryMetricsStore::default();

        for circuit in ["zeta", "alpha", "mid"] {
            store.record(circuit, 1, true).await.unwrap();
        }

        let ids: Vec<_> = store.snapshot().await.unwrap().into_iter().map(|m| m.circuit_id).collect();
        assert_eq!(ids, vec!["alpha", "mid", "zeta"]);
    }

    #[tokio::test]
    async fn test_summary_aggregates_circuits() {
        let store = InMemoryMetricsStore::default();

        store.record_execution("a", ExecutionSample::success(2, 1.08)).await.unwrap();
        store.record_execution("b", ExecutionSample::failure(2)).await.unwrap();

        let summary = store.summary_at(Utc::now()).await.unwrap();
        assert_eq!(summary.total_executions, 2);
        assert_eq!(summary.average_success_rate, 0.5);
        assert!((summary.best_advantage_ratio - 1.08).abs() < 1e-9);
        assert_eq!(summary.active_circuits, 2);
    }

    #[tokio::test]
    async fn test_active_window_excludes_stale_circuits() {
        let store = InMemoryMetricsStore::new(Duration::from_secs(60));

        store.record(CIRCUIT, 1, true).await.unwrap();

        let later = Utc::now() + chrono::Duration::minutes(5);
        let summary = store.summary_at(later).await.unwrap();
        assert_eq!(summary.total_executions, 1);
        assert_eq!(summary.active_circuits, 0);
    }

    #[tokio::test]
    async fn test_unknown_circuit_lookup() {
        let store = InMemoryMetricsStore::default();
        assert!(store.circuit("missing").await.unwrap().is_none());
    }
}
