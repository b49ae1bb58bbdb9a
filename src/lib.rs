//! # kepler-fpp-report
//!
//! Build one PDF report per Kepler Object of Interest from the plots that
//! the false-positive-probability (FPP) pipeline leaves on disk.
//!
//! Every report has the same fixed layout: fifteen plot slots over nine
//! bookmarked pages. A slot whose plot is missing shows a placeholder image
//! with a short caption instead, so a report is always complete.
//!
//! ## Pipeline Overview
//!
//! ```text
//! identifier list
//!  │
//!  ├─ 1. Input     whitespace-separated KOI names, in order
//!  ├─ 2. Resolve   <image_root>/<KOI>/<file> or the placeholder, per slot
//!  ├─ 3. Assemble  LaTeX source (landscape letter, hyperref bookmarks)
//!  ├─ 4. Typeset   external engine, two passes, failures recorded
//!  └─ 5. Cleanup   remove .tex .out .aux .log, keep the PDF
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kepler_fpp_report::{generate, ReportConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ReportConfig::builder()
//!         .image_root("./PNGS/")
//!         .placeholder("NoPlot.png")
//!         .build()?;
//!     let output = generate("kois.txt", &config)?;
//!     eprintln!(
//!         "{}/{} PDFs rendered",
//!         output.stats.rendered_reports, output.stats.total_reports
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `fpp2pdf` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! kepler-fpp-report = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod batch;
pub mod config;
pub mod error;
pub mod generate;
pub mod layout;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use batch::ReportBatch;
pub use config::{ReportConfig, ReportConfigBuilder};
pub use error::{FppError, ReportError, TypesetError};
pub use generate::{
    assemble_document, generate, generate_report, generate_reports, plan_reports, ReportStage,
};
pub use layout::SlotGroup;
pub use output::{BatchOutput, BatchStats, ReportOutcome, ReportPlan, SlotPlan};
pub use pipeline::assemble::ReportDocument;
pub use pipeline::input::{load_identifiers, Identifier};
pub use pipeline::typeset::{LatexTypesetter, Typesetter};
pub use progress::{NoopProgressCallback, ProgressCallback, ReportProgressCallback};
