//! The fixed page layout of an FPP report.
//!
//! Every report contains the same nine pages and fifteen image slots in the
//! same order. They live here as static data so the assembler is one loop
//! over [`PAGES`] plus two layout strategies ([`PageLayout::Row`] and
//! [`PageLayout::FullPage`]).
//!
//! Captions are LaTeX source: quotes use TeX ligatures (`` `isochrones' ``)
//! and must stay valid inside `\parbox` / `\put` arguments.

/// Which part of the report a page belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SlotGroup {
    /// vespa summary: prior/likelihood factors, phased light curve, planet fit.
    Summary,
    /// Shape-parameter likelihoods for the EB, HEB and BEB scenarios.
    EbProbability,
    /// The same three scenarios at twice the candidate period.
    DoublePeriod,
    /// Full-page isochrone fits and correlation plots.
    Triangle,
}

/// Size limits for an embedded plot, in inches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width_in: f32,
    pub height_in: f32,
    /// `overpic` grid spacing used when the real plot is embedded.
    pub tics: u8,
}

/// Grid spacing used for the placeholder in every layout.
pub const PLACEHOLDER_TICS: u8 = 20;

/// How a page arranges its slots.
#[derive(Debug, Clone, Copy)]
pub enum PageLayout {
    /// Three plots in a two-by-two table; the free bottom-left cell holds
    /// `explanation`.
    Row { explanation: &'static str },
    /// One plot filling the page.
    FullPage,
}

impl PageLayout {
    pub fn bounds(&self) -> Bounds {
        match self {
            PageLayout::Row { .. } => ROW_BOUNDS,
            PageLayout::FullPage => FULL_PAGE_BOUNDS,
        }
    }

    /// Arguments to `\newgeometry` for this layout.
    pub fn geometry(&self) -> &'static str {
        match self {
            PageLayout::Row { .. } => ROW_GEOMETRY,
            PageLayout::FullPage => FULL_PAGE_GEOMETRY,
        }
    }
}

/// One line of caption text placed over the placeholder at `(x, y)` in
/// `overpic` absolute units (points).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptionLine {
    pub x: u16,
    pub y: u16,
    pub text: &'static str,
}

/// One image slot.
#[derive(Debug, Clone, Copy)]
pub struct SlotSpec {
    /// File name inside `<image-root>/<identifier>/`.
    pub filename: &'static str,
    /// Overlaid on the placeholder when the plot is missing. Empty for row
    /// slots, whose page explanation sits beside the table.
    pub fallback: &'static [CaptionLine],
}

/// One page of the report.
#[derive(Debug, Clone, Copy)]
pub struct PageSpec {
    /// PDF bookmark title.
    pub bookmark: &'static str,
    pub group: SlotGroup,
    pub layout: PageLayout,
    pub slots: &'static [SlotSpec],
}

/// Number of image slots in every report.
pub const SLOT_COUNT: usize = 15;

pub const ROW_BOUNDS: Bounds = Bounds {
    width_in: 5.25,
    height_in: 4.5,
    tics: 25,
};

pub const FULL_PAGE_BOUNDS: Bounds = Bounds {
    width_in: 8.0,
    height_in: 9.5,
    tics: 20,
};

pub const ROW_GEOMETRY: &str = "left=0.25in,right=0.05in,top=0.15in,bottom=0.15in,noheadfoot";
pub const FULL_PAGE_GEOMETRY: &str = "left=0.25in,right=0.25in,top=0.25in,bottom=0.25in,noheadfoot";

/// Width of the row-page table.
pub const ROW_TABLE_WIDTH: &str = "11in";

/// Vertical offset lifting the explanation block level with the plots.
pub const ROW_EXPLANATION_RAISE: &str = "-4in";

const fn row(filename: &'static str) -> SlotSpec {
    SlotSpec {
        filename,
        fallback: &[],
    }
}

const SUMMARY_TEXT: &str = "Summary plots of the `vespa' calculation.  Top-left shows the values \
of the prior and likelihood factors for each scenario. Top-right shows the phased transit light \
curve used and the best-fit trapezoid model.  Bottom-right shows the trapezoid shape parameter \
likelihood space for the transiting planet model.  The red point + error bar represents the \
uncertainty on the trapezoidal shape parameters for the signal.";

const EB_TEXT: &str = "Trapezoid shape parameter likelihood surface plots for the false positive \
scenarios considered by `vespa'. EB = undiluted eclipsing binary, HEB = hierarchical triple \
eclipsing binary, and BEB = blended eclipsing binary (chance-aligned).  The red `x' and error \
bars represent the shape of the observed signal.";

const DOUBLE_PERIOD_TEXT: &str = "Trapezoid shape parameter likelihood surface plots for the false \
positive scenarios considered by `vespa', specifically for a scenario where the KOI is detected at \
half the true orbital period. EB = undiluted eclipsing binary, HEB = hierarchical triple eclipsing \
binary, and BEB = blended eclipsing binary (chance-aligned).  The red `x' and error bars represent \
the shape of the observed signal.";

const CORRELATION_TAIL: &str =
    "parameter fits. The blue lines represent the observed values for each quantity.";

/// All pages, in document order.
pub static PAGES: [PageSpec; 9] = [
    PageSpec {
        bookmark: "Summary",
        group: SlotGroup::Summary,
        layout: PageLayout::Row {
            explanation: SUMMARY_TEXT,
        },
        slots: &[row("FPPsummary.png"), row("signal.png"), row("pl.png")],
    },
    PageSpec {
        bookmark: "EB Probabilities",
        group: SlotGroup::EbProbability,
        layout: PageLayout::Row {
            explanation: EB_TEXT,
        },
        slots: &[row("eb.png"), row("heb.png"), row("beb.png")],
    },
    PageSpec {
        bookmark: "Double Periods",
        group: SlotGroup::DoublePeriod,
        layout: PageLayout::Row {
            explanation: DOUBLE_PERIOD_TEXT,
        },
        slots: &[row("eb_Px2.png"), row("heb_Px2.png"), row("beb_Px2.png")],
    },
    PageSpec {
        bookmark: "Single Star Isochrones",
        group: SlotGroup::Triangle,
        layout: PageLayout::FullPage,
        slots: &[SlotSpec {
            filename: "dartmouth_triangle_single_physical.png",
            fallback: &[CaptionLine {
                x: 180,
                y: 495,
                text: "Results of the single-star `isochrones' stellar parameter fits.",
            }],
        }],
    },
    PageSpec {
        bookmark: "Single Star Correlation",
        group: SlotGroup::Triangle,
        layout: PageLayout::FullPage,
        slots: &[SlotSpec {
            filename: "dartmouth_triangle_single_observed.png",
            fallback: &[
                CaptionLine {
                    x: 200,
                    y: 485,
                    text: "Correlation plot of the constraints used in the single-star `isochrones' stellar",
                },
                CaptionLine {
                    x: 200,
                    y: 465,
                    text: CORRELATION_TAIL,
                },
            ],
        }],
    },
    PageSpec {
        bookmark: "Binary Star Isochrones",
        group: SlotGroup::Triangle,
        layout: PageLayout::FullPage,
        slots: &[SlotSpec {
            filename: "dartmouth_triangle_binary_physical.png",
            fallback: &[CaptionLine {
                x: 165,
                y: 500,
                text: "Results of the binary-star `isochrones' stellar parameter fits.",
            }],
        }],
    },
    PageSpec {
        bookmark: "Binary Star Correlation",
        group: SlotGroup::Triangle,
        layout: PageLayout::FullPage,
        slots: &[SlotSpec {
            filename: "dartmouth_triangle_binary_observed.png",
            fallback: &[
                CaptionLine {
                    x: 200,
                    y: 485,
                    text: "Correlation plot of the constraints used in the binary-star `isochrones' stellar",
                },
                CaptionLine {
                    x: 200,
                    y: 465,
                    text: CORRELATION_TAIL,
                },
            ],
        }],
    },
    PageSpec {
        bookmark: "Triple Star Isochrones",
        group: SlotGroup::Triangle,
        layout: PageLayout::FullPage,
        slots: &[SlotSpec {
            filename: "dartmouth_triangle_triple_physical.png",
            fallback: &[CaptionLine {
                x: 150,
                y: 510,
                text: "Results of the triple-star `isochrones' stellar parameter fits.",
            }],
        }],
    },
    PageSpec {
        bookmark: "Triple Star Correlation",
        group: SlotGroup::Triangle,
        layout: PageLayout::FullPage,
        slots: &[SlotSpec {
            filename: "dartmouth_triangle_triple_observed.png",
            fallback: &[
                CaptionLine {
                    x: 200,
                    y: 485,
                    text: "Correlation plot of the constraints used in the triple-star `isochrones' stellar",
                },
                CaptionLine {
                    x: 200,
                    y: 465,
                    text: CORRELATION_TAIL,
                },
            ],
        }],
    },
];

/// Every slot in document order, paired with the page that holds it.
pub fn slots() -> impl Iterator<Item = (&'static PageSpec, &'static SlotSpec)> {
    PAGES
        .iter()
        .flat_map(|page| page.slots.iter().map(move |slot| (page, slot)))
}
