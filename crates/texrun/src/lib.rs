//! # texrun
//!
//! Locate a LaTeX engine (`pdflatex` by default) and run it for a single
//! compilation pass, without the caller having to build command lines or
//! know which auxiliary files the engine leaves behind.
//!
//! ## How it works
//!
//! 1. [`locate_engine`] resolves the engine binary: `TEXRUN_ENGINE_PATH`
//!    first, then an explicit path, then every directory on `PATH`.
//! 2. [`run_pass`] starts the engine with a null stdin in non-stop
//!    interaction mode, so a broken document fails instead of waiting for
//!    terminal input, and captures its output.
//! 3. [`intermediate_paths`] names the `.tex` source plus the `.aux`, `.out`
//!    and `.log` files produced for a job, for cleanup by the caller.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use texrun::{locate_engine, run_pass, Invocation};
//!
//! let engine = locate_engine("pdflatex").expect("pdflatex not installed");
//! let out = run_pass(&Invocation::new(&engine, Path::new("K07016.01.tex"), Path::new(".")))
//!     .expect("pass failed");
//! println!("pass finished with {:?}", out.status_code);
//! ```
//!
//! ## Job names with dots
//!
//! Job names such as `K07016.01` contain a dot that is *not* an extension.
//! Every helper here appends extensions with `format!("{job}.{ext}")`
//! rather than `Path::with_extension`, which would clobber the `.01`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use thiserror::Error;

// ── Public constants ─────────────────────────────────────────────────────────

/// Engine used when the caller does not name one.
pub const DEFAULT_ENGINE: &str = "pdflatex";

/// Environment variable pointing at an engine binary; skips the `PATH` search.
pub const ENGINE_PATH_ENV: &str = "TEXRUN_ENGINE_PATH";

/// Extension of the LaTeX source handed to the engine.
pub const SOURCE_EXTENSION: &str = "tex";

/// Extension of the rendered document.
pub const OUTPUT_EXTENSION: &str = "pdf";

/// Files a `hyperref` document leaves next to the PDF: bookmark outline,
/// cross-reference table and transcript log, in deletion order.
pub const AUXILIARY_EXTENSIONS: [&str; 3] = ["out", "aux", "log"];

// ── Error type ───────────────────────────────────────────────────────────────

/// Errors returned by texrun operations.
#[derive(Error, Debug)]
pub enum TexrunError {
    /// The engine could not be found on `PATH` or at the given location.
    #[error("LaTeX engine '{name}' not found on PATH")]
    EngineNotFound { name: String },

    /// The engine binary exists but could not be started.
    #[error("Failed to start '{engine}': {source}")]
    Spawn {
        engine: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The engine ran and exited unsuccessfully.
    #[error("'{engine}' exited with {}: {detail}", describe_status(.code))]
    Failed {
        engine: PathBuf,
        code: Option<i32>,
        detail: String,
    },
}

fn describe_status(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("status {c}"),
        None => "a signal".to_string(),
    }
}

// ── Engine discovery ─────────────────────────────────────────────────────────

/// Platform file name of an executable, e.g. `pdflatex.exe` on Windows.
fn executable_name(name: &str) -> OsString {
    let mut file = OsString::from(name);
    if cfg!(windows) && Path::new(name).extension().is_none() {
        file.push(".exe");
    }
    file
}

/// Resolve the engine binary for `name`.
///
/// - If `TEXRUN_ENGINE_PATH` is set and points at a file, that path wins.
/// - If `name` contains a path separator it is used as-is when it exists.
/// - Otherwise every directory on `PATH` is searched in order.
pub fn locate_engine(name: &str) -> Result<PathBuf, TexrunError> {
    if let Ok(env_path) = std::env::var(ENGINE_PATH_ENV) {
        let p = PathBuf::from(env_path);
        if p.is_file() {
            return Ok(p);
        }
    }

    let not_found = || TexrunError::EngineNotFound {
        name: name.to_string(),
    };

    let candidate = Path::new(name);
    if candidate.components().count() > 1 {
        return if candidate.is_file() {
            Ok(candidate.to_path_buf())
        } else {
            Err(not_found())
        };
    }

    let path_var = std::env::var_os("PATH").ok_or_else(not_found)?;
    let file = executable_name(name);
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(&file))
        .find(|p| p.is_file())
        .ok_or_else(not_found)
}

/// Returns `true` if [`locate_engine`] would succeed for `name`.
pub fn is_engine_available(name: &str) -> bool {
    locate_engine(name).is_ok()
}

// ── Running a pass ───────────────────────────────────────────────────────────

/// One engine invocation on one source file.
#[derive(Debug, Clone)]
pub struct Invocation<'a> {
    /// Engine binary, usually from [`locate_engine`].
    pub engine: &'a Path,
    /// The `.tex` source to compile.
    pub source: &'a Path,
    /// Directory receiving the PDF and auxiliary files. The engine itself
    /// runs in the caller's working directory, so relative image paths in
    /// the document resolve from there.
    pub output_dir: &'a Path,
}

impl<'a> Invocation<'a> {
    pub fn new(engine: &'a Path, source: &'a Path, output_dir: &'a Path) -> Self {
        Self {
            engine,
            source,
            output_dir,
        }
    }

    /// Command-line arguments passed to the engine (engine path excluded).
    pub fn args(&self) -> Vec<OsString> {
        let mut out_dir = OsString::from("-output-directory=");
        out_dir.push(self.output_dir.as_os_str());
        vec![
            OsString::from("-interaction=nonstopmode"),
            out_dir,
            self.source.as_os_str().to_os_string(),
        ]
    }
}

/// Captured result of a successful pass.
#[derive(Debug, Clone)]
pub struct PassOutput {
    /// Exit code (always `Some(0)` for a successful pass on Unix).
    pub status_code: Option<i32>,
    /// Engine stdout, lossily decoded.
    pub stdout: String,
}

/// Run the engine once. Blocks until it exits.
///
/// A non-zero exit is reported as [`TexrunError::Failed`] carrying the first
/// `! ` error line from the transcript, or the last non-empty line when the
/// engine printed no LaTeX error.
pub fn run_pass(invocation: &Invocation<'_>) -> Result<PassOutput, TexrunError> {
    let mut cmd = Command::new(invocation.engine);
    cmd.args(invocation.args())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let output = cmd.output().map_err(|e| TexrunError::Spawn {
        engine: invocation.engine.to_path_buf(),
        source: e,
    })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    if output.status.success() {
        return Ok(PassOutput {
            status_code: output.status.code(),
            stdout,
        });
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let detail = first_error_line(&stdout)
        .or_else(|| last_nonempty_line(&stderr))
        .or_else(|| last_nonempty_line(&stdout))
        .unwrap_or("no output")
        .to_string();

    Err(TexrunError::Failed {
        engine: invocation.engine.to_path_buf(),
        code: output.status.code(),
        detail,
    })
}

/// First TeX error line (`! ...`) in an engine transcript.
pub fn first_error_line(transcript: &str) -> Option<&str> {
    transcript
        .lines()
        .map(str::trim_end)
        .find(|l| l.starts_with("! "))
}

fn last_nonempty_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).rfind(|l| !l.is_empty())
}

// ── Artifact naming ──────────────────────────────────────────────────────────

/// `<dir>/<job>.<ext>` without treating dots in `job` as an extension.
pub fn artifact_path(dir: &Path, job: &str, ext: &str) -> PathBuf {
    dir.join(format!("{job}.{ext}"))
}

/// The source and auxiliary files for `job`, in deletion order:
/// `.tex`, `.out`, `.aux`, `.log`.
pub fn intermediate_paths(dir: &Path, job: &str) -> Vec<PathBuf> {
    std::iter::once(SOURCE_EXTENSION)
        .chain(AUXILIARY_EXTENSIONS)
        .map(|ext| artifact_path(dir, job, ext))
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_path_keeps_dotted_job_name() {
        let p = artifact_path(Path::new("out"), "K07016.01", "tex");
        assert_eq!(p, Path::new("out").join("K07016.01.tex"));
    }

    #[test]
    fn intermediate_paths_cover_source_and_aux() {
        let paths = intermediate_paths(Path::new("."), "K00001.01");
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(
            names,
            vec!["K00001.01.tex", "K00001.01.out", "K00001.01.aux", "K00001.01.log"]
        );
    }

    #[test]
    fn invocation_args_are_nonstop() {
        let inv = Invocation::new(Path::new("pdflatex"), Path::new("a.tex"), Path::new("build"));
        let args: Vec<String> = inv
            .args()
            .iter()
            .map(|a| a.to_string_lossy().to_string())
            .collect();
        assert_eq!(args[0], "-interaction=nonstopmode");
        assert_eq!(args[1], format!("-output-directory={}", Path::new("build").display()));
        assert_eq!(args[2], "a.tex");
    }

    #[test]
    fn first_error_line_finds_tex_error() {
        let log = "This is pdfTeX\n(./a.tex\n! LaTeX Error: File `overpic.sty' not found.\n\nl.4\n";
        assert_eq!(
            first_error_line(log),
            Some("! LaTeX Error: File `overpic.sty' not found.")
        );
        assert_eq!(first_error_line("all good\n"), None);
    }

    #[test]
    fn locate_missing_engine_fails() {
        let err = locate_engine("definitely-not-a-tex-engine-xyz").unwrap_err();
        assert!(matches!(err, TexrunError::EngineNotFound { .. }));
        assert!(err.to_string().contains("definitely-not-a-tex-engine-xyz"));
    }

    #[test]
    fn locate_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("fake-engine");
        std::fs::write(&bin, b"#!/bin/sh\n").unwrap();
        let found = locate_engine(bin.to_str().unwrap()).unwrap();
        assert_eq!(found, bin);

        let missing = dir.path().join("nope");
        assert!(locate_engine(missing.to_str().unwrap()).is_err());
    }

    #[test]
    fn run_pass_reports_spawn_failure() {
        let dir = tempfile::tempdir().unwrap();
        let engine = dir.path().join("no-such-binary");
        let source = dir.path().join("x.tex");
        let err = run_pass(&Invocation::new(&engine, &source, dir.path())).unwrap_err();
        assert!(matches!(err, TexrunError::Spawn { .. }));
    }

    #[test]
    fn failed_display_includes_code() {
        let e = TexrunError::Failed {
            engine: PathBuf::from("pdflatex"),
            code: Some(1),
            detail: "! Undefined control sequence.".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("status 1"), "got: {msg}");
        assert!(msg.contains("Undefined control sequence"));
    }

    #[cfg(unix)]
    mod stub_engine {
        use super::*;
        use std::os::unix::fs::PermissionsExt;

        /// Shell script standing in for pdflatex. Records its argv and stdin
        /// next to itself, prints `output` and exits with `status`.
        pub(super) fn write_stub(dir: &Path, output: &str, status: i32) -> PathBuf {
            let bin = dir.join("fake-latex");
            let script = format!(
                "#!/bin/sh\n\
                 printf '%s\\n' \"$@\" > '{argv}'\n\
                 cat > '{stdin}'\n\
                 printf '%s\\n' '{output}'\n\
                 exit {status}\n",
                argv = dir.join("argv.txt").display(),
                stdin = dir.join("stdin.txt").display(),
            );
            std::fs::write(&bin, script).unwrap();
            std::fs::set_permissions(&bin, std::fs::Permissions::from_mode(0o755)).unwrap();
            bin
        }

        /// `run_pass`, retried while another test thread still holds the
        /// freshly written script open (ETXTBSY).
        pub(super) fn run(inv: &Invocation<'_>) -> Result<PassOutput, TexrunError> {
            for _ in 0..20 {
                match run_pass(inv) {
                    Err(TexrunError::Spawn { ref source, .. })
                        if source.raw_os_error() == Some(26) =>
                    {
                        std::thread::sleep(std::time::Duration::from_millis(50));
                    }
                    other => return other,
                }
            }
            run_pass(inv)
        }

        #[test]
        fn failing_pass_maps_exit_status_and_error_line() {
            let dir = tempfile::tempdir().unwrap();
            let engine = write_stub(dir.path(), "! LaTeX Error: boom", 1);
            let source = dir.path().join("K07016.01.tex");
            std::fs::write(&source, "\\end").unwrap();

            let err = run(&Invocation::new(&engine, &source, dir.path())).unwrap_err();
            match err {
                TexrunError::Failed { code, ref detail, .. } => {
                    assert_eq!(code, Some(1));
                    assert_eq!(detail, "! LaTeX Error: boom");
                }
                other => panic!("expected Failed, got {other:?}"),
            }

            let argv = std::fs::read_to_string(dir.path().join("argv.txt")).unwrap();
            let argv: Vec<&str> = argv.lines().collect();
            assert_eq!(
                argv,
                vec![
                    "-interaction=nonstopmode".to_string(),
                    format!("-output-directory={}", dir.path().display()),
                    source.display().to_string(),
                ]
            );
            let stdin = std::fs::read_to_string(dir.path().join("stdin.txt")).unwrap();
            assert!(stdin.is_empty(), "engine stdin must be null, got {stdin:?}");
        }

        #[test]
        fn successful_pass_returns_output() {
            let dir = tempfile::tempdir().unwrap();
            let engine = write_stub(dir.path(), "Output written on K1.01.pdf", 0);
            let source = dir.path().join("K1.01.tex");

            let out = run(&Invocation::new(&engine, &source, dir.path())).unwrap();
            assert_eq!(out.status_code, Some(0));
            assert!(out.stdout.contains("Output written on K1.01.pdf"));
        }
    }
}
