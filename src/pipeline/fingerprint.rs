//! Content fingerprinting of an input directory.
//!
//! The fingerprint is a BLAKE3 digest over every eligible file, taken in a fixed order:
//! extension group first (`.txt`, `.yaml`, `.yml`), then file name within the group. Each file
//! contributes its bytes followed by its name, so renames change the digest as well as edits.
//! Modification times are never consulted.

use super::diagnostics::{Diagnostics, FileOutcome, Stage};
use super::listing::{display_name, files_with_suffix};
use std::path::Path;

/// Fingerprint of a directory that does not exist. Never a valid hex digest.
pub const EMPTY_FINGERPRINT: &str = "empty";

/// Eligible suffixes in hashing order.
pub const FINGERPRINT_SUFFIXES: [&str; 3] = [".txt", ".yaml", ".yml"];

/// Compute the fingerprint of `dir`.
///
/// Unreadable files are skipped and recorded in `diagnostics`; they contribute nothing.
pub fn fingerprint_dir(dir: &Path, diagnostics: &mut Diagnostics) -> String {
    if !dir.exists() {
        return EMPTY_FINGERPRINT.to_string();
    }

    let mut hasher = blake3::Hasher::new();
    let mut hashed = 0usize;
    for suffix in FINGERPRINT_SUFFIXES {
        for listed in files_with_suffix(dir, suffix) {
            let Some(path) = diagnostics.take(Stage::Fingerprint, listed) else {
                continue;
            };
            let outcome = FileOutcome::from_result(&path, std::fs::read(&path));
            if let Some(bytes) = diagnostics.take(Stage::Fingerprint, outcome) {
                hasher.update(&bytes);
                hasher.update(display_name(&path).as_bytes());
                hashed += 1;
            }
        }
    }

    let digest = hasher.finalize().to_hex().to_string();
    tracing::debug!(dir = %dir.display(), files = hashed, fingerprint = %digest, "Fingerprinted directory");
    digest
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fingerprint(dir: &Path) -> String {
        fingerprint_dir(dir, &mut Diagnostics::new())
    }

    #[test]
    fn missing_directory_is_empty_sentinel() {
        let temp = TempDir::new().unwrap();
        assert_eq!(fingerprint(&temp.path().join("nodes")), EMPTY_FINGERPRINT);
    }

    #[test]
    fn existing_empty_directory_is_a_real_digest() {
        let temp = TempDir::new().unwrap();
        let digest = fingerprint(temp.path());
        assert_ne!(digest, EMPTY_FINGERPRINT);
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn deterministic_over_unchanged_directory() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), "vless://one\n").unwrap();
        fs::write(temp.path().join("b.yaml"), "k: v\n").unwrap();
        assert_eq!(fingerprint(temp.path()), fingerprint(temp.path()));
    }

    #[test]
    fn matches_manual_digest_in_group_order() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("z.txt"), "zz").unwrap();
        fs::write(temp.path().join("a.yml"), "aa").unwrap();
        fs::write(temp.path().join("m.yaml"), "mm").unwrap();
        fs::write(temp.path().join("ignored.json"), "{}").unwrap();

        let mut expected = blake3::Hasher::new();
        for (content, name) in [("zz", "z.txt"), ("mm", "m.yaml"), ("aa", "a.yml")] {
            expected.update(content.as_bytes());
            expected.update(name.as_bytes());
        }
        assert_eq!(
            fingerprint(temp.path()),
            expected.finalize().to_hex().to_string()
        );
    }

    #[test]
    fn content_and_name_changes_alter_digest() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), "ss://x").unwrap();
        let before = fingerprint(temp.path());

        fs::write(temp.path().join("a.txt"), "ss://y").unwrap();
        let edited = fingerprint(temp.path());
        assert_ne!(before, edited);

        fs::rename(temp.path().join("a.txt"), temp.path().join("b.txt")).unwrap();
        assert_ne!(edited, fingerprint(temp.path()));
    }

    #[test]
    fn ineligible_files_do_not_contribute() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), "ss://x").unwrap();
        let before = fingerprint(temp.path());
        fs::write(temp.path().join("notes.md"), "irrelevant").unwrap();
        assert_eq!(before, fingerprint(temp.path()));
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_file_is_skipped_with_diagnostic() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), "ss://x").unwrap();
        let link = temp.path().join("b.txt");
        std::os::unix::fs::symlink(temp.path().join("gone"), &link).unwrap();

        let mut diagnostics = Diagnostics::new();
        let with_link = fingerprint_dir(temp.path(), &mut diagnostics);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.entries()[0].stage, Stage::Fingerprint);
        assert!(diagnostics.entries()[0].path.ends_with("b.txt"));

        fs::remove_file(&link).unwrap();
        assert_eq!(with_link, fingerprint(temp.path()));
    }
}
