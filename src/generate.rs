//! Eager (whole-batch) generation entry points.
//!
//! [`generate`] loads the identifier list and produces every report before
//! returning. [`crate::batch::ReportBatch`] is the lazy counterpart that
//! yields one [`ReportOutcome`] at a time.
//!
//! Each report walks the same fixed sequence, and a failure at one step
//! never stops the next:
//!
//! ```text
//! Start → TemplateBuilt → Rendered(1) → Rendered(2) → CleanedUp → Done
//! ```

use crate::batch::ReportBatch;
use crate::config::{ReportConfig, MIN_PASSES};
use crate::error::{FppError, ReportError};
use crate::output::{BatchOutput, BatchStats, ReportOutcome, ReportPlan, SlotPlan};
use crate::pipeline::assemble::{self, ReportDocument};
use crate::pipeline::cleanup;
use crate::pipeline::input::{self, Identifier};
use crate::pipeline::resolve::{self, Resolution};
use crate::pipeline::typeset::{LatexTypesetter, Typesetter};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};
use tracing::{debug, info, warn};

/// Steps of a single report, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStage {
    TemplateBuilt,
    Rendered(u8),
    CleanedUp,
    Done,
}

impl fmt::Display for ReportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportStage::TemplateBuilt => f.write_str("template built"),
            ReportStage::Rendered(pass) => write!(f, "rendered (pass {pass})"),
            ReportStage::CleanedUp => f.write_str("cleaned up"),
            ReportStage::Done => f.write_str("done"),
        }
    }
}

/// Load the identifier list at `input` and generate every report.
///
/// # Errors
/// Only fatal conditions: the list is missing, unreadable or empty. Render
/// failures are recorded per report in the returned [`BatchOutput`].
pub fn generate(input: impl AsRef<Path>, config: &ReportConfig) -> Result<BatchOutput, FppError> {
    let ids = input::load_identifiers(input.as_ref())?;
    generate_reports(&ids, config)
}

/// Generate one report per identifier, in order.
///
/// # Errors
/// [`FppError::EmptyIdentifierList`] when `ids` is empty; nothing is
/// assembled, rendered or cleaned up in that case.
pub fn generate_reports(
    ids: &[Identifier],
    config: &ReportConfig,
) -> Result<BatchOutput, FppError> {
    input::ensure_not_empty(ids, "identifier list")?;
    let start = Instant::now();
    info!("Generating {} reports", ids.len());

    let reports: Vec<ReportOutcome> = ReportBatch::new(ids, config).collect();
    let stats = BatchStats::from_outcomes(&reports, start.elapsed().as_millis() as u64);

    info!(
        "Batch complete: {}/{} PDFs rendered, {} placeholder substitutions, {}ms",
        stats.rendered_reports, stats.total_reports, stats.placeholder_slots, stats.total_duration_ms
    );

    Ok(BatchOutput { reports, stats })
}

/// Generate a single report.
pub fn generate_report(id: &Identifier, config: &ReportConfig) -> ReportOutcome {
    let typesetter = resolve_typesetter(config);
    render_report(id, config, typesetter.as_ref())
}

/// Build the LaTeX document for `id` without writing or rendering it.
pub fn assemble_document(id: &Identifier, config: &ReportConfig) -> ReportDocument {
    assemble::assemble(id, &config.image_root, &config.placeholder)
}

/// Report, per identifier and slot, whether the plot exists.
///
/// Touches nothing on disk beyond the existence checks.
pub fn plan_reports(ids: &[Identifier], config: &ReportConfig) -> Vec<ReportPlan> {
    ids.iter()
        .map(|id| ReportPlan {
            identifier: id.to_string(),
            slots: resolve::resolve_all(&config.image_root, id)
                .into_iter()
                .map(|r| SlotPlan {
                    bookmark: r.page.bookmark.to_string(),
                    group: r.page.group,
                    filename: r.slot.filename.to_string(),
                    candidate_path: resolve::candidate_path(&config.image_root, id, r.slot.filename),
                    found: matches!(r.resolution, Resolution::Found(_)),
                })
                .collect(),
        })
        .collect()
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// The configured typesetter, or a [`LatexTypesetter`] for `config.engine`.
pub(crate) fn resolve_typesetter(config: &ReportConfig) -> Arc<dyn Typesetter> {
    match config.typesetter {
        Some(ref t) => Arc::clone(t),
        None => Arc::new(LatexTypesetter::new(config.engine.clone())),
    }
}

/// Coarsest mtime resolution in common use (FAT stores 2 s).
const MTIME_SLACK: Duration = Duration::from_secs(2);

fn modified(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

fn write_source(path: &Path, output_dir: &Path, source: &str) -> std::io::Result<()> {
    std::fs::create_dir_all(output_dir)?;
    std::fs::write(path, source)
}

/// Assemble, write, typeset `config.passes` times (never fewer than two), clean up.
pub(crate) fn render_report(
    id: &Identifier,
    config: &ReportConfig,
    typesetter: &dyn Typesetter,
) -> ReportOutcome {
    let start = Instant::now();
    let out_dir = config.output_dir.as_path();
    let source_path = texrun::artifact_path(out_dir, id.as_str(), texrun::SOURCE_EXTENSION);
    let pdf_path = texrun::artifact_path(out_dir, id.as_str(), texrun::OUTPUT_EXTENSION);
    let pdf_before = modified(&pdf_path);
    let mut errors = Vec::new();

    let doc = assemble_document(id, config);
    let placeholder_slots: Vec<String> =
        doc.placeholder_slots().into_iter().map(String::from).collect();
    debug!(
        "{}: {} ({} plots, {} placeholders)",
        id,
        ReportStage::TemplateBuilt,
        doc.found_count(),
        placeholder_slots.len()
    );

    if let Err(e) = write_source(&source_path, out_dir, &doc.source) {
        warn!("{}: could not write {}: {}", id, source_path.display(), e);
        errors.push(ReportError::SourceWriteFailed {
            identifier: id.to_string(),
            path: source_path.clone(),
            detail: e.to_string(),
        });
    }

    let passes = config.passes.max(MIN_PASSES);
    let typeset_start = SystemTime::now()
        .checked_sub(MTIME_SLACK)
        .unwrap_or(SystemTime::UNIX_EPOCH);
    for pass in 1..=passes {
        let result = typesetter.typeset(&source_path, out_dir);
        if let Some(ref cb) = config.progress_callback {
            cb.on_pass_complete(id.as_str(), pass, result.is_ok());
        }
        match result {
            Ok(()) => debug!("{}: {}", id, ReportStage::Rendered(pass)),
            Err(e) => {
                warn!("{}: typesetting pass {} failed: {}", id, pass, e);
                errors.push(ReportError::TypesetFailed {
                    identifier: id.to_string(),
                    pass,
                    detail: e.to_string(),
                });
            }
        }
    }

    let intermediates_removed = if config.keep_intermediates {
        debug!("{}: keeping intermediates in {}", id, out_dir.display());
        0
    } else {
        let n = cleanup::remove_intermediates(out_dir, id);
        debug!("{}: {} ({} files)", id, ReportStage::CleanedUp, n);
        n
    };

    // A rewrite within the same mtime tick leaves the timestamp unchanged,
    // so a recent timestamp counts as well as a changed one.
    let pdf_after = modified(&pdf_path);
    let pdf_produced =
        pdf_after.is_some_and(|t| Some(t) != pdf_before || t >= typeset_start);

    let outcome = ReportOutcome {
        identifier: id.to_string(),
        pdf_path,
        found_slots: doc.found_count(),
        placeholder_slots,
        passes_attempted: passes,
        intermediates_removed,
        pdf_produced,
        errors,
        duration_ms: start.elapsed().as_millis() as u64,
    };
    debug!("{}: {} in {}ms", id, ReportStage::Done, outcome.duration_ms);
    outcome
}
