//! CLI binary for kepler-fpp-report.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ReportConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use kepler_fpp_report::{
    generate_reports, load_identifiers, plan_reports, BatchOutput, BatchStats, FppError,
    ProgressCallback, ReportConfig, ReportOutcome, ReportPlan, ReportProgressCallback,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a progress bar over the identifier list with
/// one log line per finished report.
struct CliProgressCallback {
    bar: ProgressBar,
    /// Start of the report currently being produced.
    started: Mutex<Option<Instant>>,
    /// Reports that are not [`ReportOutcome::is_success`], as `--strict` counts them.
    failed: AtomicUsize,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        Self::with_bar(ProgressBar::new(0))
    }

    fn with_bar(bar: ProgressBar) -> Arc<Self> {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} reports  \
             ⏱ {elapsed_precise}  ETA {eta_precise}  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Typesetting");

        Arc::new(Self {
            bar,
            started: Mutex::new(None),
            failed: AtomicUsize::new(0),
        })
    }

    fn failed(&self) -> usize {
        self.failed.load(Ordering::SeqCst)
    }
}

impl ReportProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_reports: usize) {
        self.bar.set_length(total_reports as u64);
        self.bar.reset_eta();
        self.bar.enable_steady_tick(Duration::from_millis(80));
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Generating {total_reports} FPP reports…"))
        ));
    }

    fn on_report_start(&self, _index: usize, _total: usize, identifier: &str) {
        if let Ok(mut started) = self.started.lock() {
            *started = Some(Instant::now());
        }
        self.bar.set_message(identifier.to_string());
    }

    fn on_pass_complete(&self, identifier: &str, pass: u8, success: bool) {
        let status = if success { "" } else { " failed" };
        self.bar
            .set_message(format!("{identifier} (pass {pass}{status})"));
    }

    fn on_report_complete(&self, index: usize, total: usize, outcome: &ReportOutcome) {
        let elapsed_ms = self
            .started
            .lock()
            .ok()
            .and_then(|mut s| s.take())
            .map(|t| t.elapsed().as_millis())
            .unwrap_or(0);

        let mark = if outcome.is_success() {
            green("✓")
        } else {
            self.failed.fetch_add(1, Ordering::SeqCst);
            red("✗")
        };
        let detail = match outcome.errors.first() {
            Some(e) if !outcome.is_success() => red(&truncate(&e.to_string(), 80)),
            _ => dim(&format!("{:>2} placeholders", outcome.placeholder_slots.len())),
        };

        self.bar.println(format!(
            "  {} {:>4}/{:<4} {:<12}  {}  {}",
            mark,
            index,
            total,
            outcome.identifier,
            detail,
            dim(&format!("{:.1}s", elapsed_ms as f64 / 1000.0)),
        ));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, total_reports: usize, rendered: usize) {
        let failed = self.failed();
        self.bar.finish_and_clear();

        if failed == 0 {
            eprintln!(
                "{} {} PDFs rendered",
                green("✔"),
                bold(&rendered.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} PDFs rendered  ({} failed)",
                if failed == total_reports {
                    red("✘")
                } else {
                    cyan("⚠")
                },
                bold(&rendered.to_string()),
                total_reports,
                red(&failed.to_string()),
            );
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let cut: String = s.chars().take(max - 1).collect();
        format!("{cut}\u{2026}")
    } else {
        s.to_string()
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # One PDF per KOI listed in kois.txt, plots under ./PNGS/<KOI>/
  fpp2pdf kois.txt

  # Prompt for the list file
  fpp2pdf

  # Different image tree and output directory
  fpp2pdf --image-root /data/fpp/PNGS --output-dir reports kois.txt

  # Which plots exist for each KOI? Nothing is rendered.
  fpp2pdf --plan-only kois.txt

  # Machine-readable batch summary, fail the job if any report failed
  fpp2pdf --json --strict kois.txt > summary.json

  # Keep the .tex/.aux/.log files to debug a LaTeX error
  fpp2pdf --keep-intermediates -v kois.txt

INPUT FORMAT:
  Whitespace- or newline-separated KOI identifiers, e.g.

    K07016.01
    K00752.01 K00753.01

  Reports are produced in list order. Duplicates are processed twice.

REQUIREMENTS:
  A LaTeX engine (pdflatex by default) with the overpic, geometry and
  hyperref packages. Missing plots are replaced by the placeholder image,
  which must exist relative to the working directory.

ENVIRONMENT VARIABLES:
  FPP_IMAGE_ROOT          Per-KOI plot root (default ./PNGS/)
  FPP_PLACEHOLDER         Placeholder image (default NoPlot.png)
  FPP_OUTPUT_DIR          Output directory (default .)
  FPP_ENGINE              Typesetting command (default pdflatex)
  TEXRUN_ENGINE_PATH      Full path to the engine binary, skips PATH search
  RUST_LOG                Override log filter (e.g. kepler_fpp_report=debug)
"#;

/// Generate Kepler FPP PDF reports from plot images.
#[derive(Parser, Debug)]
#[command(
    name = "fpp2pdf",
    version,
    about = "Generate one FPP PDF report per KOI from plot images via LaTeX",
    long_about = "Reads a list of Kepler Object of Interest identifiers and, for each one, \
assembles a fixed 9-page LaTeX report from its false-positive-probability plots, \
substitutes a placeholder for every missing plot, typesets it twice and removes \
the intermediate files.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Identifier list file. Prompted for when omitted.
    input: Option<PathBuf>,

    /// Directory holding one sub-directory of plots per KOI.
    #[arg(long, env = "FPP_IMAGE_ROOT", default_value = kepler_fpp_report::config::DEFAULT_IMAGE_ROOT)]
    image_root: PathBuf,

    /// Image shown in place of a missing plot.
    #[arg(long, env = "FPP_PLACEHOLDER", default_value = kepler_fpp_report::config::DEFAULT_PLACEHOLDER)]
    placeholder: PathBuf,

    /// Where .tex and .pdf files are written.
    #[arg(short, long, env = "FPP_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Typesetting command.
    #[arg(long, env = "FPP_ENGINE", default_value = texrun::DEFAULT_ENGINE)]
    engine: String,

    /// Leave .tex/.aux/.out/.log in place after typesetting.
    #[arg(long, env = "FPP_KEEP_INTERMEDIATES")]
    keep_intermediates: bool,

    /// Print which plots exist for each KOI, render nothing.
    #[arg(long)]
    plan_only: bool,

    /// Output structured JSON (BatchOutput or plan) on stdout.
    #[arg(long, env = "FPP_JSON")]
    json: bool,

    /// Exit non-zero if any report failed to render.
    #[arg(long, env = "FPP_STRICT")]
    strict: bool,

    /// Disable progress bar.
    #[arg(long, env = "FPP_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "FPP_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "FPP_QUIET")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar carries the per-report feedback, so INFO is hidden
    // while it is shown.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.plan_only;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Load identifiers ─────────────────────────────────────────────────
    let input = match cli.input {
        Some(ref path) => path.clone(),
        None => prompt_for_input().context("Failed to read the input file name")?,
    };

    let ids = match load_identifiers(&input) {
        Ok(ids) => ids,
        Err(empty @ FppError::EmptyIdentifierList { .. }) => {
            if cli.json {
                eprintln!("{empty}");
                println!("{}", empty_json(cli.plan_only)?);
            } else {
                println!("{empty}");
            }
            return Ok(());
        }
        Err(e) => return Err(e).context("Could not load the identifier list"),
    };

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn ReportProgressCallback>)
    } else {
        None
    };

    let mut builder = ReportConfig::builder()
        .image_root(&cli.image_root)
        .placeholder(&cli.placeholder)
        .output_dir(&cli.output_dir)
        .engine(&cli.engine)
        .keep_intermediates(cli.keep_intermediates);
    if let Some(cb) = progress_cb {
        builder = builder.progress_callback(cb);
    }
    let config = builder.build().context("Invalid configuration")?;

    // ── Plan-only mode ───────────────────────────────────────────────────
    if cli.plan_only {
        let plans = plan_reports(&ids, &config);
        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&plans).context("Failed to serialise plan")?
            );
        } else {
            print_plans(&plans).context("Failed to write to stdout")?;
        }
        return Ok(());
    }

    if !texrun::is_engine_available(&cli.engine) {
        tracing::warn!(
            "Typesetting engine '{}' not found on PATH; every pass will fail",
            cli.engine
        );
        if !cli.quiet && !cli.json {
            eprintln!(
                "{} engine {} not found; reports will not be typeset",
                cyan("⚠"),
                bold(&cli.engine)
            );
        }
    }

    // ── Run batch ────────────────────────────────────────────────────────
    let output = generate_reports(&ids, &config).context("Report generation failed")?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("Failed to serialise output")?
        );
    } else if !cli.quiet && !show_progress {
        eprintln!(
            "Rendered {}/{} reports in {}ms ({} placeholder plots)",
            output.stats.rendered_reports,
            output.stats.total_reports,
            output.stats.total_duration_ms,
            output.stats.placeholder_slots,
        );
        for report in output.reports.iter().filter(|r| !r.is_success()) {
            for e in &report.errors {
                eprintln!("  {} {}", red("✗"), e);
            }
        }
    }

    if cli.strict && output.stats.failed_reports > 0 {
        anyhow::bail!(
            "{} of {} reports failed",
            output.stats.failed_reports,
            output.stats.total_reports
        );
    }

    Ok(())
}

/// JSON document for a run with nothing to do: `[]` for a plan, an empty
/// `BatchOutput` otherwise.
fn empty_json(plan_only: bool) -> Result<String> {
    let json = if plan_only {
        serde_json::to_string_pretty(&Vec::<ReportPlan>::new())
    } else {
        serde_json::to_string_pretty(&BatchOutput {
            reports: Vec::new(),
            stats: BatchStats::default(),
        })
    };
    json.context("Failed to serialise output")
}

/// Ask for the list file on stdin.
fn prompt_for_input() -> Result<PathBuf> {
    let mut stdout = io::stdout();
    write!(stdout, "Name of Input File of KOIs?: ")?;
    stdout.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let name = line.trim();
    if name.is_empty() {
        anyhow::bail!("No input file given");
    }
    Ok(PathBuf::from(name))
}

fn print_plans(plans: &[ReportPlan]) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for plan in plans {
        writeln!(
            out,
            "{}  {}/{} plots",
            bold(&plan.identifier),
            plan.found_count(),
            plan.slots.len()
        )?;
        for slot in &plan.slots {
            let mark = if slot.found { green("✓") } else { dim("·") };
            writeln!(
                out,
                "  {} {:<36} {}",
                mark,
                slot.bookmark,
                dim(&slot.candidate_path.display().to_string())
            )?;
        }
    }
    Ok(())
}
