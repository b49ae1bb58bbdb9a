//! Template assembly: resolved slots → LaTeX source for one report.
//!
//! The document is a fixed preamble, one bookmarked page per entry of
//! [`crate::layout::PAGES`], and `\end{document}`. Only the image path,
//! sizing options and fallback captions of each slot vary between
//! candidates.
//!
//! Row pages use a two-column `tabular*`:
//!
//! ```text
//! ┌──────────────┬──────────────┐
//! │ slot 1       │ slot 2       │
//! ├──────────────┼──────────────┤
//! │ explanation  │ slot 3       │
//! └──────────────┴──────────────┘
//! ```

use crate::layout::{PageLayout, PageSpec, ROW_EXPLANATION_RAISE, ROW_TABLE_WIDTH};
use crate::pipeline::input::Identifier;
use crate::pipeline::resolve::{resolve_all, ResolvedSlot};
use std::fmt;
use std::path::Path;

const PREAMBLE: &str = r"\documentclass[letterpaper,10pt]{article}
\usepackage[bookmarks=true]{hyperref}
\usepackage[landscape,left=0.0in,right=0in,top=0.0in,bottom=0in,noheadfoot]{geometry}
\usepackage[abs]{overpic}
\begin{document}
\pagestyle{empty}
";

const CLOSING: &str = "\\end{document}\n";

/// The assembled report for one candidate.
#[derive(Debug, Clone)]
pub struct ReportDocument {
    pub identifier: Identifier,
    /// All slots in document order.
    pub slots: Vec<ResolvedSlot>,
    /// Complete LaTeX source.
    pub source: String,
}

impl ReportDocument {
    /// Number of slots that embed the candidate's own plot.
    pub fn found_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_found()).count()
    }

    /// File names of the slots that fell back to the placeholder.
    pub fn placeholder_slots(&self) -> Vec<&'static str> {
        self.slots
            .iter()
            .filter(|s| !s.is_found())
            .map(|s| s.slot.filename)
            .collect()
    }
}

/// Resolve every slot for `id` and build its document.
pub fn assemble(id: &Identifier, image_root: &Path, placeholder: &Path) -> ReportDocument {
    let slots = resolve_all(image_root, id);
    let source = Source {
        slots: &slots,
        placeholder,
    }
    .to_string();

    ReportDocument {
        identifier: id.clone(),
        slots,
        source,
    }
}

/// Path as written inside the document: forward slashes on every platform.
pub fn latex_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

struct Source<'a> {
    slots: &'a [ResolvedSlot],
    placeholder: &'a Path,
}

impl fmt::Display for Source<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(PREAMBLE)?;

        let mut rest = self.slots;
        for page in crate::layout::PAGES.iter() {
            let (on_page, tail) = rest.split_at(page.slots.len().min(rest.len()));
            rest = tail;
            write_page(f, page, on_page, self.placeholder)?;
        }

        f.write_str(CLOSING)
    }
}

fn write_page(
    f: &mut fmt::Formatter<'_>,
    page: &PageSpec,
    slots: &[ResolvedSlot],
    placeholder: &Path,
) -> fmt::Result {
    writeln!(f, "\\pdfbookmark[0]{{{0}}}{{{0}}}", page.bookmark)?;
    writeln!(f, "\\newgeometry{{{}}}", page.layout.geometry())?;

    match page.layout {
        PageLayout::Row { explanation } => {
            writeln!(f, "\\begin{{tabular*}}{{{ROW_TABLE_WIDTH}}}{{cc}}")?;
            for (i, slot) in slots.iter().enumerate() {
                write_overpic(f, slot, placeholder)?;
                match i {
                    0 => writeln!(f, " & ")?,
                    1 => {
                        writeln!(f, " \\\\ ")?;
                        let width = page.layout.bounds().width_in;
                        writeln!(
                            f,
                            "\\parbox{{{width}in}}{{\\vspace{{{ROW_EXPLANATION_RAISE}}}\\LARGE {explanation}}} & "
                        )?;
                    }
                    _ => writeln!(f)?,
                }
            }
            writeln!(f, "\\end{{tabular*}}")?;
        }
        PageLayout::FullPage => {
            for slot in slots {
                write_overpic(f, slot, placeholder)?;
                writeln!(f)?;
            }
        }
    }

    writeln!(f, "\\clearpage")
}

/// `\begin{overpic}...\end{overpic}` without a trailing newline, so the
/// caller can append a table cell separator.
fn write_overpic(f: &mut fmt::Formatter<'_>, slot: &ResolvedSlot, placeholder: &Path) -> fmt::Result {
    let (path, fit) = slot.embed(placeholder);
    writeln!(f, "\\begin{{overpic}}[{fit}]{{{}}}", latex_path(path))?;
    for line in slot.overlay() {
        writeln!(f, "\\put({},{}){{\\LARGE {}}}", line.x, line.y, line.text)?;
    }
    write!(f, "\\end{{overpic}}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{PAGES, SLOT_COUNT};

    fn assemble_with(files: &[&str]) -> (tempfile::TempDir, ReportDocument) {
        let root = tempfile::tempdir().unwrap();
        let id = Identifier::new("K07016.01");
        let dir = root.path().join(id.as_str());
        std::fs::create_dir_all(&dir).unwrap();
        for f in files {
            std::fs::write(dir.join(f), b"png").unwrap();
        }
        let doc = assemble(&id, root.path(), Path::new("NoPlot.png"));
        (root, doc)
    }

    #[test]
    fn preamble_and_closing_appear_once() {
        let (_root, doc) = assemble_with(&[]);
        assert!(doc.source.starts_with("\\documentclass[letterpaper,10pt]{article}\n"));
        assert_eq!(doc.source.matches("\\begin{document}").count(), 1);
        assert_eq!(doc.source.matches("\\end{document}").count(), 1);
        assert!(doc.source.ends_with("\\end{document}\n"));
    }

    #[test]
    fn every_page_is_bookmarked_and_broken() {
        let (_root, doc) = assemble_with(&[]);
        assert_eq!(doc.source.matches("\\clearpage").count(), PAGES.len());
        assert_eq!(doc.source.matches("\\newgeometry").count(), PAGES.len());

        let mut pos = 0;
        for page in PAGES.iter() {
            let mark = format!("\\pdfbookmark[0]{{{0}}}{{{0}}}", page.bookmark);
            let found = doc.source[pos..]
                .find(&mark)
                .unwrap_or_else(|| panic!("bookmark {} missing or out of order", page.bookmark));
            pos += found + mark.len();
        }
    }

    #[test]
    fn fifteen_overpics_regardless_of_files() {
        for files in [&[][..], &["pl.png", "eb.png"][..]] {
            let (_root, doc) = assemble_with(files);
            assert_eq!(doc.source.matches("\\begin{overpic}").count(), SLOT_COUNT);
            assert_eq!(doc.source.matches("\\end{overpic}").count(), SLOT_COUNT);
            assert_eq!(doc.slots.len(), SLOT_COUNT);
        }
    }

    #[test]
    fn all_missing_uses_placeholder_and_captions() {
        let (_root, doc) = assemble_with(&[]);
        assert_eq!(doc.found_count(), 0);
        assert_eq!(doc.source.matches("{NoPlot.png}").count(), SLOT_COUNT);
        assert!(doc
            .source
            .contains("\\put(180,495){\\LARGE Results of the single-star `isochrones' stellar parameter fits.}"));
        assert_eq!(doc.source.matches("\\put(").count(), 9);
    }

    #[test]
    fn found_full_page_has_no_overlay() {
        let (root, doc) = assemble_with(&["dartmouth_triangle_binary_physical.png"]);
        let path = latex_path(
            &root
                .path()
                .join("K07016.01")
                .join("dartmouth_triangle_binary_physical.png"),
        );
        assert!(doc.source.contains(&format!(
            "\\begin{{overpic}}[width=8.0in,height=9.5in,keepaspectratio,tics=20,trim=0 0 0 0,clip]{{{path}}}"
        )));
        assert!(!doc.source.contains("\\put(165,500)"));
        assert_eq!(doc.source.matches("\\put(").count(), 8);
    }

    #[test]
    fn row_table_cells_follow_fill_pattern() {
        let (_root, doc) = assemble_with(&[]);
        let start = doc.source.find("\\begin{tabular*}{11in}{cc}").unwrap();
        let end = doc.source[start..].find("\\end{tabular*}").unwrap() + start;
        let table = &doc.source[start..end];

        let first = table.find("\\end{overpic} & ").unwrap();
        let second = table.find("\\end{overpic} \\\\ ").unwrap();
        let parbox = table.find("\\parbox{5.25in}{\\vspace{-4in}\\LARGE Summary plots").unwrap();
        let last = table.rfind("\\end{overpic}\n").unwrap();
        assert!(first < second && second < parbox && parbox < last);
    }

    #[test]
    fn placeholder_slots_list_missing_files_in_order() {
        let (_root, doc) = assemble_with(&["FPPsummary.png", "beb_Px2.png"]);
        let missing = doc.placeholder_slots();
        assert_eq!(missing.len(), 13);
        assert_eq!(missing[0], "signal.png");
        assert!(!missing.contains(&"beb_Px2.png"));
    }

    #[test]
    fn latex_path_uses_forward_slashes() {
        assert_eq!(latex_path(Path::new("PNGS\\K1.01\\pl.png")), "PNGS/K1.01/pl.png");
    }
}
