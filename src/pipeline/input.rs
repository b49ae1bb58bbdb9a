//! Identifier loading: turn a KOI list file into an ordered `Vec<Identifier>`.
//!
//! The list is whitespace-delimited, normally one `KXXXXX.YY` per line.
//! Tokens are taken with `split_whitespace`, so blank lines, CRLF endings and
//! a missing final newline can never yield an empty identifier.

use crate::error::FppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info};

/// An opaque candidate name such as `K07016.01`.
///
/// Never validated and never treated as a path with an extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Identifier {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Split `text` into identifiers, preserving order and duplicates.
pub fn parse_identifiers(text: &str) -> Vec<Identifier> {
    text.split_whitespace().map(Identifier::from).collect()
}

/// Read identifiers from any buffered reader until it is exhausted.
pub fn read_identifiers<R: BufRead>(reader: R) -> std::io::Result<Vec<Identifier>> {
    let mut ids = Vec::new();
    for line in reader.lines() {
        ids.extend(parse_identifiers(&line?));
    }
    Ok(ids)
}

/// Load the identifier list at `path`.
///
/// # Errors
/// - [`FppError::InputNotFound`] / [`FppError::InputPermissionDenied`] when
///   the file cannot be opened
/// - [`FppError::InputReadFailed`] on a read error mid-file (including
///   invalid UTF-8)
/// - [`FppError::EmptyIdentifierList`] when no identifier was found
pub fn load_identifiers(path: &Path) -> Result<Vec<Identifier>, FppError> {
    let file = std::fs::File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::PermissionDenied => FppError::InputPermissionDenied {
            path: path.to_path_buf(),
        },
        _ => FppError::InputNotFound {
            path: path.to_path_buf(),
        },
    })?;

    let ids = read_identifiers(BufReader::new(file)).map_err(|e| FppError::InputReadFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    ensure_not_empty(&ids, &path.display().to_string())?;
    info!("Loaded {} identifiers from {}", ids.len(), path.display());
    debug!("Identifiers: {:?}", ids);
    Ok(ids)
}

/// Fail with [`FppError::EmptyIdentifierList`] when `ids` is empty.
pub fn ensure_not_empty(ids: &[Identifier], source_name: &str) -> Result<(), FppError> {
    if ids.is_empty() {
        return Err(FppError::EmptyIdentifierList {
            source_name: source_name.to_string(),
        });
    }
    Ok(())
}
