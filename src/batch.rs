//! Lazy batch API: one report per `next()`.
//!
//! [`ReportBatch`] does the work of [`crate::generate::generate_reports`]
//! incrementally, so callers can print or persist each [`ReportOutcome`] as
//! soon as its PDF is done. Reports are always produced in input order;
//! the next candidate is not started until the previous one is cleaned up.

use crate::config::ReportConfig;
use crate::generate::{render_report, resolve_typesetter};
use crate::output::ReportOutcome;
use crate::pipeline::input::Identifier;
use crate::pipeline::resolve;
use crate::pipeline::typeset::Typesetter;
use std::sync::Arc;
use tracing::{info, warn};

/// Iterator over the reports of a batch.
///
/// Progress callbacks fire as items are pulled: `on_batch_start` with the
/// first one, `on_batch_complete` once the iterator is exhausted. Dropping
/// the iterator early simply stops the batch.
pub struct ReportBatch<'a> {
    ids: &'a [Identifier],
    config: &'a ReportConfig,
    typesetter: Arc<dyn Typesetter>,
    index: usize,
    rendered: usize,
    started: bool,
    finished: bool,
}

impl<'a> ReportBatch<'a> {
    pub fn new(ids: &'a [Identifier], config: &'a ReportConfig) -> Self {
        Self {
            ids,
            config,
            typesetter: resolve_typesetter(config),
            index: 0,
            rendered: 0,
            started: false,
            finished: false,
        }
    }

    /// Reports not yet produced.
    pub fn remaining(&self) -> usize {
        self.ids.len() - self.index
    }

    fn start(&mut self) {
        self.started = true;
        if !resolve::image_exists(&self.config.placeholder) {
            warn!(
                "Placeholder {} not found; slots without a plot will fail to typeset",
                self.config.placeholder.display()
            );
        }
        if let Some(ref cb) = self.config.progress_callback {
            cb.on_batch_start(self.ids.len());
        }
    }

    fn finish(&mut self) {
        self.finished = true;
        if let Some(ref cb) = self.config.progress_callback {
            cb.on_batch_complete(self.ids.len(), self.rendered);
        }
    }
}

impl Iterator for ReportBatch<'_> {
    type Item = ReportOutcome;

    fn next(&mut self) -> Option<ReportOutcome> {
        if self.finished {
            return None;
        }
        if !self.started {
            self.start();
        }
        let Some(id) = self.ids.get(self.index) else {
            self.finish();
            return None;
        };

        let total = self.ids.len();
        let index = self.index;
        self.index += 1;

        info!("[{}/{}] {}", index + 1, total, id);
        if let Some(ref cb) = self.config.progress_callback {
            cb.on_report_start(index + 1, total, id.as_str());
        }

        let outcome = render_report(id, self.config, self.typesetter.as_ref());
        if outcome.pdf_produced {
            self.rendered += 1;
        }

        if let Some(ref cb) = self.config.progress_callback {
            cb.on_report_complete(index + 1, total, &outcome);
        }
        Some(outcome)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = if self.finished { 0 } else { self.remaining() };
        (n, Some(n))
    }
}
