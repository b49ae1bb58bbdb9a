//! Removal of a report's intermediate files.
//!
//! After both passes the `.tex` source and the engine's `.out`, `.aux` and
//! `.log` files are deleted. Missing files are the normal case when a pass
//! never ran, so every removal failure is ignored.

use crate::pipeline::input::Identifier;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Paths that [`remove_intermediates`] deletes for `id` in `dir`.
pub fn intermediate_paths(dir: &Path, id: &Identifier) -> Vec<PathBuf> {
    texrun::intermediate_paths(dir, id.as_str())
}

/// Delete the intermediates for `id`. Returns how many files were removed.
pub fn remove_intermediates(dir: &Path, id: &Identifier) -> usize {
    intermediate_paths(dir, id)
        .iter()
        .filter(|path| match std::fs::remove_file(path) {
            Ok(()) => true,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    debug!("Could not remove {}: {}", path.display(), e);
                }
                false
            }
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_existing_and_tolerates_missing() {
        let dir = tempfile::tempdir().unwrap();
        let id = Identifier::new("K07016.01");
        std::fs::write(dir.path().join("K07016.01.tex"), "x").unwrap();
        std::fs::write(dir.path().join("K07016.01.log"), "x").unwrap();
        std::fs::write(dir.path().join("K07016.01.pdf"), "x").unwrap();

        assert_eq!(remove_intermediates(dir.path(), &id), 2);
        for path in intermediate_paths(dir.path(), &id) {
            assert!(!path.exists(), "{} survived", path.display());
        }
        assert!(dir.path().join("K07016.01.pdf").exists());
    }

    #[test]
    fn second_cleanup_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let id = Identifier::new("K1.01");
        assert_eq!(remove_intermediates(dir.path(), &id), 0);
        assert_eq!(remove_intermediates(dir.path(), &id), 0);
    }

    #[test]
    fn other_candidates_are_untouched() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("K2.01.aux"), "x").unwrap();
        remove_intermediates(dir.path(), &Identifier::new("K1.01"));
        assert!(dir.path().join("K2.01.aux").exists());
    }
}
