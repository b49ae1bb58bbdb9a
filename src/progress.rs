//! Progress-callback trait for per-report generation events.
//!
//! Inject an [`Arc<dyn ReportProgressCallback>`] via
//! [`crate::config::ReportConfigBuilder::progress_callback`] to receive
//! events as the batch works through the identifier list.
//!
//! Reports are produced strictly one after another, so events for one
//! identifier never interleave with another's.
//!
//! # Example
//!
//! ```rust
//! use kepler_fpp_report::{ReportConfig, ReportOutcome, ReportProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     done: AtomicUsize,
//! }
//!
//! impl ReportProgressCallback for CountingCallback {
//!     fn on_report_complete(&self, index: usize, total: usize, outcome: &ReportOutcome) {
//!         self.done.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{}/{} {}", index, total, outcome.identifier);
//!     }
//! }
//!
//! let config = ReportConfig::builder()
//!     .progress_callback(Arc::new(CountingCallback { done: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use crate::output::ReportOutcome;
use std::sync::Arc;

/// Called by the batch as it processes each identifier.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. `index` is 1-based.
pub trait ReportProgressCallback: Send + Sync {
    /// Called once before the first report.
    fn on_batch_start(&self, total_reports: usize) {
        let _ = total_reports;
    }

    /// Called before a report's document is assembled.
    fn on_report_start(&self, index: usize, total: usize, identifier: &str) {
        let _ = (index, total, identifier);
    }

    /// Called after every typesetting pass, successful or not.
    fn on_pass_complete(&self, identifier: &str, pass: u8, success: bool) {
        let _ = (identifier, pass, success);
    }

    /// Called after a report has been rendered and cleaned up.
    fn on_report_complete(&self, index: usize, total: usize, outcome: &ReportOutcome) {
        let _ = (index, total, outcome);
    }

    /// Called once after the last report.
    ///
    /// `rendered` counts reports whose PDF exists afterwards.
    fn on_batch_complete(&self, total_reports: usize, rendered: usize) {
        let _ = (total_reports, rendered);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ReportProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ReportConfig`].
pub type ProgressCallback = Arc<dyn ReportProgressCallback>;
