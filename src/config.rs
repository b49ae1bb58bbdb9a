//! Configuration types for FPP report generation.
//!
//! All generation behaviour is controlled through [`ReportConfig`], built
//! via its [`ReportConfigBuilder`]. The defaults reproduce the conventional
//! working-directory layout:
//!
//! ```text
//! ./KOIS.txt                         identifier list
//! ./NoPlot.png                       shared placeholder
//! ./PNGS/K07016.01/FPPsummary.png    per-candidate plots
//! ./K07016.01.pdf                    output
//! ```

use crate::error::FppError;
use crate::pipeline::typeset::Typesetter;
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Default per-candidate image root.
pub const DEFAULT_IMAGE_ROOT: &str = "./PNGS/";

/// Default shared placeholder image.
pub const DEFAULT_PLACEHOLDER: &str = "NoPlot.png";

/// Passes needed for `hyperref` bookmarks to settle.
pub const MIN_PASSES: u8 = 2;

/// Configuration for a batch of FPP reports.
///
/// Built via [`ReportConfig::builder()`] or using [`ReportConfig::default()`].
///
/// # Example
/// ```rust
/// use kepler_fpp_report::ReportConfig;
///
/// let config = ReportConfig::builder()
///     .image_root("plots/")
///     .output_dir("reports")
///     .build()
///     .unwrap();
/// assert_eq!(config.passes, 2);
/// ```
#[derive(Clone)]
pub struct ReportConfig {
    /// Directory holding one sub-directory of plots per identifier. Default: `./PNGS/`.
    pub image_root: PathBuf,

    /// Image embedded for every missing plot. Default: `NoPlot.png`.
    ///
    /// Referenced as given, so a relative path resolves against the
    /// engine's working directory, like the image root.
    pub placeholder: PathBuf,

    /// Directory receiving `<identifier>.tex` and `<identifier>.pdf`. Default: `.`.
    pub output_dir: PathBuf,

    /// Typesetting engine name or path. Default: `pdflatex`.
    pub engine: String,

    /// Engine passes per report. Default and minimum: 2.
    ///
    /// The first pass writes the bookmark outline to `.out`; the second reads
    /// it back into the PDF.
    pub passes: u8,

    /// Leave `.tex`, `.aux`, `.out` and `.log` on disk. Default: false.
    pub keep_intermediates: bool,

    /// Pre-constructed typesetter. Takes precedence over `engine`.
    pub typesetter: Option<Arc<dyn Typesetter>>,

    /// Optional progress callback for per-report events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            image_root: PathBuf::from(DEFAULT_IMAGE_ROOT),
            placeholder: PathBuf::from(DEFAULT_PLACEHOLDER),
            output_dir: PathBuf::from("."),
            engine: texrun::DEFAULT_ENGINE.to_string(),
            passes: MIN_PASSES,
            keep_intermediates: false,
            typesetter: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ReportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportConfig")
            .field("image_root", &self.image_root)
            .field("placeholder", &self.placeholder)
            .field("output_dir", &self.output_dir)
            .field("engine", &self.engine)
            .field("passes", &self.passes)
            .field("keep_intermediates", &self.keep_intermediates)
            .field("typesetter", &self.typesetter.as_ref().map(|_| "<dyn Typesetter>"))
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl ReportConfig {
    /// Create a new builder for `ReportConfig`.
    pub fn builder() -> ReportConfigBuilder {
        ReportConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ReportConfig`].
pub struct ReportConfigBuilder {
    config: ReportConfig,
}

impl ReportConfigBuilder {
    pub fn image_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.image_root = dir.into();
        self
    }

    pub fn placeholder(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.placeholder = path.into();
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn engine(mut self, engine: impl Into<String>) -> Self {
        self.config.engine = engine.into();
        self
    }

    pub fn passes(mut self, n: u8) -> Self {
        self.config.passes = n.max(MIN_PASSES);
        self
    }

    pub fn keep_intermediates(mut self, v: bool) -> Self {
        self.config.keep_intermediates = v;
        self
    }

    pub fn typesetter(mut self, typesetter: Arc<dyn Typesetter>) -> Self {
        self.config.typesetter = Some(typesetter);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ReportConfig, FppError> {
        let c = &self.config;
        if c.passes < MIN_PASSES {
            return Err(FppError::InvalidConfig(format!(
                "At least {MIN_PASSES} passes are required, got {}",
                c.passes
            )));
        }
        if c.typesetter.is_none() && c.engine.trim().is_empty() {
            return Err(FppError::InvalidConfig(
                "Engine name must not be empty".into(),
            ));
        }
        if c.placeholder.as_os_str().is_empty() {
            return Err(FppError::InvalidConfig(
                "Placeholder path must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}
