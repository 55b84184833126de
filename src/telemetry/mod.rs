// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Logging and metrics infrastructure.
//!
//! - **Tracing**: structured logging through `tracing`, written to a log file
//!   while the full-screen client owns the terminal
//! - **Metrics**: operation timings, completion outcomes and billed usage
//!
//! # Usage
//!
//! ```rust,ignore
//! use straico::telemetry::{init_telemetry, TelemetryConfig};
//!
//! let _guard = init_telemetry(&TelemetryConfig::interactive("/tmp/straico.log"))?;
//! ```
//!
//! Record fields that help reconstruct a session (slot, model, lengths,
//! costs). Never record the API key or message text.

mod init;
pub mod metrics;

pub use init::{default_log_path, init_telemetry, TelemetryConfig, TelemetryGuard, LOG_FILE_NAME};
pub use metrics::{
    Histogram, Metrics, MetricsSnapshot, OperationMetrics, RequestMetrics, GLOBAL_METRICS,
};
