//! The external typesetting collaborator.
//!
//! [`Typesetter`] is the one seam between report assembly and the outside
//! world: compile this `.tex` into that directory. The batch calls it
//! `passes` times per report (two by default) whatever the previous pass
//! returned, because `hyperref` only writes bookmarks that the first pass
//! recorded in the `.out` file.
//!
//! [`LatexTypesetter`] is the production implementation on top of
//! [`texrun`]. Tests inject their own implementation through
//! [`crate::config::ReportConfigBuilder::typesetter`].

use crate::error::TypesetError;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;

/// Compiles one LaTeX source file.
pub trait Typesetter: Send + Sync {
    /// Run one pass over `source`, writing results into `output_dir`.
    fn typeset(&self, source: &Path, output_dir: &Path) -> Result<(), TypesetError>;
}

/// Runs a LaTeX engine found on `PATH` (or via `TEXRUN_ENGINE_PATH`).
///
/// The engine is located on first use and the result reused for the rest of
/// the batch.
#[derive(Debug)]
pub struct LatexTypesetter {
    engine: String,
    resolved: OnceLock<Option<PathBuf>>,
}

impl LatexTypesetter {
    pub fn new(engine: impl Into<String>) -> Self {
        Self {
            engine: engine.into(),
            resolved: OnceLock::new(),
        }
    }

    pub fn engine(&self) -> &str {
        &self.engine
    }

    fn engine_path(&self) -> Result<&Path, TypesetError> {
        self.resolved
            .get_or_init(|| texrun::locate_engine(&self.engine).ok())
            .as_deref()
            .ok_or_else(|| TypesetError::EngineNotFound {
                engine: self.engine.clone(),
            })
    }
}

impl Default for LatexTypesetter {
    fn default() -> Self {
        Self::new(texrun::DEFAULT_ENGINE)
    }
}

impl Typesetter for LatexTypesetter {
    fn typeset(&self, source: &Path, output_dir: &Path) -> Result<(), TypesetError> {
        let engine = self.engine_path()?;
        let out = texrun::run_pass(&texrun::Invocation::new(engine, source, output_dir))?;
        debug!(
            "{} finished {} ({} bytes of output)",
            engine.display(),
            source.display(),
            out.stdout.len()
        );
        Ok(())
    }
}
