//! Slot resolution: decide, per slot, between the candidate's own plot and
//! the shared placeholder.
//!
//! The test is a plain "can this be opened for reading as a file" check on
//! `<image-root>/<identifier>/<filename>`. Every I/O failure (missing file,
//! missing directory, permission denied) counts as absent; image contents
//! are never inspected.

use crate::layout::{Bounds, CaptionLine, PageSpec, SlotSpec, PLACEHOLDER_TICS};
use crate::pipeline::input::Identifier;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// What a slot embeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The candidate's plot, at this path.
    Found(PathBuf),
    /// The shared placeholder, with the slot's fallback caption.
    Placeholder,
}

/// A slot after the existence check.
#[derive(Debug, Clone)]
pub struct ResolvedSlot {
    pub page: &'static PageSpec,
    pub slot: &'static SlotSpec,
    pub resolution: Resolution,
}

impl ResolvedSlot {
    pub fn is_found(&self) -> bool {
        matches!(self.resolution, Resolution::Found(_))
    }

    /// Caption lines overlaid on this slot; empty unless it fell back.
    pub fn overlay(&self) -> &'static [CaptionLine] {
        match self.resolution {
            Resolution::Found(_) => &[],
            Resolution::Placeholder => self.slot.fallback,
        }
    }

    /// Image path and `overpic` options to embed.
    pub fn embed<'a>(&'a self, placeholder: &'a Path) -> (&'a Path, Fit) {
        let bounds = self.page.layout.bounds();
        match &self.resolution {
            Resolution::Found(path) => (path.as_path(), Fit::Contain(bounds)),
            Resolution::Placeholder => (placeholder, Fit::Width(bounds)),
        }
    }
}

/// `overpic` sizing options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fit {
    /// Aspect-preserving fit inside the layout's width and height.
    Contain(Bounds),
    /// Scale to the layout's width only (placeholder).
    Width(Bounds),
}

impl fmt::Display for Fit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fit::Contain(b) => write!(
                f,
                "width={}in,height={}in,keepaspectratio,tics={},trim=0 0 0 0,clip",
                fmt_inches(b.width_in),
                fmt_inches(b.height_in),
                b.tics
            ),
            Fit::Width(b) => write!(
                f,
                "width={}in,tics={},trim=0 0 0 0,clip",
                fmt_inches(b.width_in),
                PLACEHOLDER_TICS
            ),
        }
    }
}

/// `8.0` → `8.0`, `5.25` → `5.25`, `4.5` → `4.5`.
fn fmt_inches(v: f32) -> String {
    let s = format!("{v}");
    if s.contains('.') {
        s
    } else {
        format!("{s}.0")
    }
}

/// `<image-root>/<identifier>/<filename>`.
pub fn candidate_path(image_root: &Path, id: &Identifier, filename: &str) -> PathBuf {
    image_root.join(id.as_str()).join(filename)
}

/// `true` if `path` opens for reading and is a regular file.
pub fn image_exists(path: &Path) -> bool {
    std::fs::File::open(path)
        .and_then(|f| f.metadata())
        .map(|m| m.is_file())
        .unwrap_or(false)
}

/// Resolve a single slot for `id`.
pub fn resolve_slot(
    image_root: &Path,
    id: &Identifier,
    page: &'static PageSpec,
    slot: &'static SlotSpec,
) -> ResolvedSlot {
    let path = candidate_path(image_root, id, slot.filename);
    let resolution = if image_exists(&path) {
        Resolution::Found(path)
    } else {
        debug!("{}: {} missing, using placeholder", id, path.display());
        Resolution::Placeholder
    };
    ResolvedSlot {
        page,
        slot,
        resolution,
    }
}

/// Resolve every slot of the report for `id`, in document order.
pub fn resolve_all(image_root: &Path, id: &Identifier) -> Vec<ResolvedSlot> {
    crate::layout::slots()
        .map(|(page, slot)| resolve_slot(image_root, id, page, slot))
        .collect()
}
