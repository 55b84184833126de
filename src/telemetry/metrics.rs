// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Metrics collection for performance monitoring.
//!
//! Keeps operation timings, completion outcomes per model and billed usage
//! in process memory. Nothing is exported; the snapshot is logged on exit.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

use once_cell::sync::Lazy;

/// Global metrics instance.
pub static GLOBAL_METRICS: Lazy<Metrics> = Lazy::new(Metrics::new);

/// Central metrics collection.
#[derive(Debug)]
pub struct Metrics {
    /// Completion round-trips by model id.
    requests: RwLock<HashMap<String, RequestMetrics>>,

    /// General operation timings by name.
    operations: RwLock<HashMap<String, OperationMetrics>>,

    /// Coins billed across all completions.
    usage: RwLock<f64>,

    /// Start time for calculating uptime.
    start_time: Instant,
}

impl Metrics {
    /// Create a new metrics collector.
    pub fn new() -> Self {
        Self {
            requests: RwLock::new(HashMap::new()),
            operations: RwLock::new(HashMap::new()),
            usage: RwLock::new(0.0),
            start_time: Instant::now(),
        }
    }

    /// Record one completion round-trip.
    pub fn record_request(&self, model: &str, duration: Duration, success: bool) {
        let mut requests = self.requests.write().unwrap_or_else(PoisonError::into_inner);
        let metrics = requests
            .entry(model.to_string())
            .or_insert_with(RequestMetrics::new);
        metrics.record(duration, success);
    }

    /// Record a generic operation.
    pub fn record_operation(&self, name: &str, duration: Duration) {
        let mut ops = self.operations.write().unwrap_or_else(PoisonError::into_inner);
        let metrics = ops.entry(name.to_string()).or_insert_with(OperationMetrics::new);
        metrics.record(duration);
    }

    /// Add billed coins.
    pub fn record_usage(&self, coins: f64) {
        *self.usage.write().unwrap_or_else(PoisonError::into_inner) += coins;
    }

    /// Metrics for one model.
    pub fn request_metrics(&self, model: &str) -> Option<RequestMetrics> {
        self.requests
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(model)
            .cloned()
    }

    /// Metrics for one operation.
    pub fn operation_metrics(&self, name: &str) -> Option<OperationMetrics> {
        self.operations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Total billed coins.
    pub fn usage(&self) -> f64 {
        *self.usage.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get uptime since metrics were initialized.
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Take a snapshot of all metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests: self
                .requests
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
            operations: self
                .operations
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
            usage: self.usage(),
            uptime: self.uptime(),
        }
    }

    /// Reset all metrics.
    pub fn reset(&self) {
        self.requests
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.operations
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        *self.usage.write().unwrap_or_else(PoisonError::into_inner) = 0.0;
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcomes of completion requests against one model.
#[derive(Debug, Clone)]
pub struct RequestMetrics {
    pub requests: u64,
    pub successes: u64,
    pub failures: u64,
    /// Latency of every round-trip, successful or not.
    pub latency: OperationMetrics,
}

impl RequestMetrics {
    pub fn new() -> Self {
        Self {
            requests: 0,
            successes: 0,
            failures: 0,
            latency: OperationMetrics::new(),
        }
    }

    /// Record a round-trip.
    pub fn record(&mut self, duration: Duration, success: bool) {
        self.requests += 1;
        if success {
            self.successes += 1;
        } else {
            self.failures += 1;
        }
        self.latency.record(duration);
    }

    /// Calculate success rate (0.0 to 1.0).
    pub fn success_rate(&self) -> f64 {
        if self.requests == 0 {
            1.0
        } else {
            self.successes as f64 / self.requests as f64
        }
    }
}

impl Default for RequestMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Generic operation metrics with histogram.
#[derive(Debug, Clone)]
pub struct OperationMetrics {
    pub count: u64,
    pub total_duration: Duration,
    pub min_duration: Duration,
    pub max_duration: Duration,
    /// Histogram buckets for latency distribution.
    pub histogram: Histogram,
}

impl OperationMetrics {
    pub fn new() -> Self {
        Self {
            count: 0,
            total_duration: Duration::ZERO,
            min_duration: Duration::MAX,
            max_duration: Duration::ZERO,
            histogram: Histogram::default(),
        }
    }

    /// Record an operation.
    pub fn record(&mut self, duration: Duration) {
        self.count += 1;
        self.total_duration += duration;
        self.min_duration = self.min_duration.min(duration);
        self.max_duration = self.max_duration.max(duration);
        self.histogram.record(duration);
    }

    /// Calculate average duration.
    pub fn avg_duration(&self) -> Duration {
        if self.count == 0 {
            Duration::ZERO
        } else {
            self.total_duration / self.count as u32
        }
    }
}

impl Default for OperationMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed-bucket latency histogram.
#[derive(Debug, Clone)]
pub struct Histogram {
    /// Bucket upper bounds in microseconds.
    buckets: Vec<u64>,
    /// One count per bucket plus the overflow bucket.
    counts: Vec<u64>,
}

impl Histogram {
    /// Create a histogram with custom bucket boundaries (in microseconds).
    pub fn with_buckets(buckets: Vec<u64>) -> Self {
        let counts = vec![0; buckets.len() + 1];
        Self { buckets, counts }
    }

    /// Record a duration value.
    pub fn record(&mut self, duration: Duration) {
        let micros = duration.as_micros() as u64;
        let bucket_idx = self
            .buckets
            .iter()
            .position(|&b| micros <= b)
            .unwrap_or(self.buckets.len());
        self.counts[bucket_idx] += 1;
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Approximate percentile, reported as the upper bound of its bucket.
    pub fn percentile(&self, p: f64) -> Duration {
        let total: u64 = self.counts.iter().sum();
        if total == 0 {
            return Duration::ZERO;
        }

        let target = (total as f64 * p / 100.0).ceil() as u64;
        let mut cumulative = 0u64;

        for (i, &count) in self.counts.iter().enumerate() {
            cumulative += count;
            if cumulative >= target {
                let micros = match self.buckets.get(i) {
                    Some(&bound) => bound,
                    None => self.buckets.last().copied().unwrap_or(0) * 10,
                };
                return Duration::from_micros(micros);
            }
        }

        Duration::ZERO
    }

    pub fn p50(&self) -> Duration {
        self.percentile(50.0)
    }

    pub fn p99(&self) -> Duration {
        self.percentile(99.0)
    }
}

impl Default for Histogram {
    fn default() -> Self {
        // Network round-trips dominate, so the top buckets go up to a minute.
        Self::with_buckets(vec![
            100, 1_000, 10_000, 100_000, 1_000_000, 10_000_000, 60_000_000,
        ])
    }
}

/// A snapshot of all metrics at a point in time.
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub requests: HashMap<String, RequestMetrics>,
    pub operations: HashMap<String, OperationMetrics>,
    pub usage: f64,
    pub uptime: Duration,
}

impl MetricsSnapshot {
    /// Format as a human-readable report.
    pub fn format_report(&self) -> String {
        let mut report = String::new();

        report.push_str("=== Metrics Report ===\n\n");
        report.push_str(&format!("Uptime: {:.2?}\n", self.uptime));
        report.push_str(&format!("Usage: {:.2} coins\n\n", self.usage));

        if !self.requests.is_empty() {
            report.push_str("Completions:\n");
            let mut models: Vec<_> = self.requests.iter().collect();
            models.sort_by(|a, b| a.0.cmp(b.0));
            for (model, metrics) in models {
                report.push_str(&format!(
                    "  {}: {} requests, {:.1}% success, avg {:.2?}\n",
                    model,
                    metrics.requests,
                    metrics.success_rate() * 100.0,
                    metrics.latency.avg_duration()
                ));
            }
            report.push('\n');
        }

        if !self.operations.is_empty() {
            report.push_str("Operations:\n");
            let mut ops: Vec<_> = self.operations.iter().collect();
            ops.sort_by(|a, b| a.0.cmp(b.0));
            for (name, metrics) in ops {
                report.push_str(&format!(
                    "  {}: {} ops, avg {:.2?}, p99 {:.2?}\n",
                    name,
                    metrics.count,
                    metrics.avg_duration(),
                    metrics.histogram.p99()
                ));
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_metrics() {
        let mut metrics = RequestMetrics::new();
        metrics.record(Duration::from_millis(800), true);
        metrics.record(Duration::from_millis(1200), true);
        metrics.record(Duration::from_millis(50), false);

        assert_eq!(metrics.requests, 3);
        assert_eq!(metrics.successes, 2);
        assert_eq!(metrics.failures, 1);
        assert!((metrics.success_rate() - 0.666).abs() < 0.01);
        assert_eq!(metrics.latency.count, 3);
    }

    #[test]
    fn test_operation_metrics() {
        let mut metrics = OperationMetrics::new();
        metrics.record(Duration::from_millis(10));
        metrics.record(Duration::from_millis(20));
        metrics.record(Duration::from_millis(30));

        assert_eq!(metrics.count, 3);
        assert_eq!(metrics.avg_duration(), Duration::from_millis(20));
        assert_eq!(metrics.min_duration, Duration::from_millis(10));
        assert_eq!(metrics.max_duration, Duration::from_millis(30));
    }

    #[test]
    fn test_histogram_buckets() {
        let mut hist = Histogram::default();
        hist.record(Duration::from_micros(50));
        hist.record(Duration::from_micros(500));
        hist.record(Duration::from_secs(5));
        hist.record(Duration::from_secs(120));

        assert_eq!(hist.counts()[0], 1);
        assert_eq!(hist.counts()[1], 1);
        assert_eq!(hist.counts()[5], 1);
        assert_eq!(*hist.counts().last().unwrap(), 1);
    }

    #[test]
    fn test_histogram_percentiles() {
        let mut hist = Histogram::default();
        for _ in 0..100 {
            hist.record(Duration::from_micros(500));
        }

        assert_eq!(hist.p50(), Duration::from_micros(1_000));
        assert_eq!(hist.p99(), Duration::from_micros(1_000));
        assert_eq!(Histogram::default().p50(), Duration::ZERO);
    }

    #[test]
    fn test_usage_and_snapshot() {
        let metrics = Metrics::new();
        metrics.record_request("anthropic/claude-3-haiku:beta", Duration::from_millis(900), true);
        metrics.record_usage(1.5);
        metrics.record_usage(0.25);

        let snapshot = metrics.snapshot();
        assert!(snapshot.requests.contains_key("anthropic/claude-3-haiku:beta"));
        assert!((snapshot.usage - 1.75).abs() < f64::EPSILON);

        let report = snapshot.format_report();
        assert!(report.contains("1.75 coins"));
        assert!(report.contains("anthropic/claude-3-haiku:beta: 1 requests"));
    }

    #[test]
    fn test_metrics_reset() {
        let metrics = Metrics::new();
        metrics.record_request("m", Duration::from_millis(100), false);
        metrics.record_operation("op", Duration::from_millis(1));
        metrics.record_usage(3.0);

        metrics.reset();

        assert!(metrics.request_metrics("m").is_none());
        assert!(metrics.operation_metrics("op").is_none());
        assert_eq!(metrics.usage(), 0.0);
    }
}
