//! Result types returned by the generation entry points.
//!
//! Everything here is `Serialize` so the CLI's `--json` mode can print it
//! as-is.

use crate::error::ReportError;
use crate::layout::SlotGroup;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What happened to one candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportOutcome {
    pub identifier: String,
    /// Where the engine was asked to write the PDF.
    pub pdf_path: PathBuf,
    /// Slots that embedded the candidate's own plot.
    pub found_slots: usize,
    /// File names of slots that fell back to the placeholder, in document order.
    pub placeholder_slots: Vec<String>,
    /// Typesetting passes attempted (always the configured number).
    pub passes_attempted: u8,
    /// Intermediate files removed during cleanup.
    pub intermediates_removed: usize,
    /// Whether the PDF exists after the last pass.
    pub pdf_produced: bool,
    /// Non-fatal problems, in the order they happened.
    pub errors: Vec<ReportError>,
    pub duration_ms: u64,
}

impl ReportOutcome {
    /// `true` when every pass succeeded and the PDF exists.
    pub fn is_success(&self) -> bool {
        self.errors.is_empty() && self.pdf_produced
    }
}

/// Totals for a batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchStats {
    pub total_reports: usize,
    /// Reports whose PDF exists afterwards.
    pub rendered_reports: usize,
    /// Reports with at least one [`ReportError`] or no PDF.
    pub failed_reports: usize,
    /// Placeholder substitutions across all reports.
    pub placeholder_slots: usize,
    pub total_duration_ms: u64,
}

impl BatchStats {
    pub fn from_outcomes(outcomes: &[ReportOutcome], total_duration_ms: u64) -> Self {
        Self {
            total_reports: outcomes.len(),
            rendered_reports: outcomes.iter().filter(|o| o.pdf_produced).count(),
            failed_reports: outcomes.iter().filter(|o| !o.is_success()).count(),
            placeholder_slots: outcomes.iter().map(|o| o.placeholder_slots.len()).sum(),
            total_duration_ms,
        }
    }
}

/// Every outcome of a batch, in input order, plus totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOutput {
    pub reports: Vec<ReportOutcome>,
    pub stats: BatchStats,
}

/// Resolution of one slot, without rendering anything.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotPlan {
    pub bookmark: String,
    pub group: SlotGroup,
    pub filename: String,
    /// Path that was checked.
    pub candidate_path: PathBuf,
    pub found: bool,
}

/// Resolution of every slot for one candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportPlan {
    pub identifier: String,
    pub slots: Vec<SlotPlan>,
}

impl ReportPlan {
    pub fn found_count(&self) -> usize {
        self.slots.iter().filter(|s| s.found).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(pdf: bool, errors: Vec<ReportError>, placeholders: usize) -> ReportOutcome {
        ReportOutcome {
            identifier: "K1.01".into(),
            pdf_path: PathBuf::from("K1.01.pdf"),
            found_slots: 15 - placeholders,
            placeholder_slots: vec!["pl.png".to_string(); placeholders],
            passes_attempted: 2,
            intermediates_removed: 4,
            pdf_produced: pdf,
            errors,
            duration_ms: 10,
        }
    }

    #[test]
    fn stats_count_failures_and_placeholders() {
        let failed = ReportError::TypesetFailed {
            identifier: "K1.01".into(),
            pass: 1,
            detail: "boom".into(),
        };
        let outcomes = vec![
            outcome(true, vec![], 3),
            outcome(true, vec![failed], 0),
            outcome(false, vec![], 15),
        ];
        let stats = BatchStats::from_outcomes(&outcomes, 99);
        assert_eq!(stats.total_reports, 3);
        assert_eq!(stats.rendered_reports, 2);
        assert_eq!(stats.failed_reports, 2);
        assert_eq!(stats.placeholder_slots, 18);
        assert_eq!(stats.total_duration_ms, 99);
    }

    #[test]
    fn outcome_serialises_to_json() {
        let json = serde_json::to_value(outcome(true, vec![], 1)).unwrap();
        assert_eq!(json["identifier"], "K1.01");
        assert_eq!(json["passes_attempted"], 2);
        assert_eq!(json["placeholder_slots"][0], "pl.png");
    }
}
