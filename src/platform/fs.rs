// PanicScope - platform/fs.rs
//
// Filesystem helpers for the extraction directory: selecting the newest
// panic log and reading it without ever failing on bad encoding.

use crate::core::classifier::decode_permissive;
use crate::core::model::LogFile;
use chrono::{DateTime, Local};
use std::io;
use std::path::Path;
use std::time::SystemTime;

/// Return the most recently modified file in `dir` (non-recursive) whose
/// name matches the glob `pattern`, or `None` if nothing matches.
///
/// Entries whose metadata cannot be read are skipped with a debug log; only
/// failure to list `dir` itself is an error. Ties on modification time keep
/// the lexicographically greater name so the choice is deterministic.
pub fn find_latest_matching(dir: &Path, pattern: &glob::Pattern) -> io::Result<Option<LogFile>> {
    let mut best: Option<(SystemTime, std::path::PathBuf)> = None;

    for entry in std::fs::read_dir(dir)? {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::debug!(dir = %dir.display(), error = %e, "Skipping unreadable entry");
                continue;
            }
        };

        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if !pattern.matches(name) {
            continue;
        }

        // Follow symlinks: a link to a regular file is a candidate.
        let modified = match std::fs::metadata(entry.path()).and_then(|m| {
            if m.is_file() {
                m.modified()
            } else {
                Err(io::Error::other("not a regular file"))
            }
        }) {
            Ok(t) => t,
            Err(e) => {
                tracing::debug!(file = %entry.path().display(), error = %e, "Skipping candidate");
                continue;
            }
        };

        let path = entry.path();
        let newer = match &best {
            None => true,
            Some((t, p)) => modified > *t || (modified == *t && path > *p),
        };
        if newer {
            best = Some((modified, path));
        }
    }

    Ok(best.map(|(modified, path)| LogFile {
        path,
        modified: DateTime::<Local>::from(modified),
    }))
}

/// Read the full content of a file as text, dropping invalid UTF-8 bytes.
pub fn read_text_permissive(path: &Path) -> io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(decode_permissive(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::time::Duration;
    use tempfile::TempDir;

    fn panic_pattern() -> glob::Pattern {
        glob::Pattern::new("panic-full*").unwrap()
    }

    fn write_with_mtime(dir: &Path, name: &str, content: &str, age: Duration) {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        let mtime = SystemTime::now() - age;
        File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(mtime)
            .unwrap();
    }

    #[test]
    fn test_selects_newest_matching_file() {
        let dir = TempDir::new().unwrap();
        write_with_mtime(dir.path(), "panic-full-1", "old", Duration::from_secs(3600));
        write_with_mtime(dir.path(), "panic-full-2", "new", Duration::from_secs(60));

        let latest = find_latest_matching(dir.path(), &panic_pattern())
            .unwrap()
            .expect("a panic file should be found");
        assert_eq!(latest.display_name(), "panic-full-2");
    }

    #[test]
    fn test_ignores_non_matching_newer_file() {
        let dir = TempDir::new().unwrap();
        write_with_mtime(dir.path(), "panic-full-1", "old", Duration::from_secs(3600));
        write_with_mtime(dir.path(), "panic-base-9", "newer", Duration::from_secs(1));
        write_with_mtime(dir.path(), "Xpanic-full-3", "newer", Duration::from_secs(1));

        let latest = find_latest_matching(dir.path(), &panic_pattern()).unwrap().unwrap();
        assert_eq!(latest.display_name(), "panic-full-1");
    }

    #[test]
    fn test_ignores_matching_directories() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("panic-full-dir")).unwrap();
        assert!(find_latest_matching(dir.path(), &panic_pattern())
            .unwrap()
            .is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_to_regular_file_is_a_candidate() {
        let dir = TempDir::new().unwrap();
        write_with_mtime(dir.path(), "stored.ips", "AOP panic", Duration::from_secs(60));
        std::os::unix::fs::symlink(dir.path().join("stored.ips"), dir.path().join("panic-full-link"))
            .unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone.ips"), dir.path().join("panic-full-dangling"))
            .unwrap();

        let latest = find_latest_matching(dir.path(), &panic_pattern())
            .unwrap()
            .expect("the symlinked panic file should be found");
        assert_eq!(latest.display_name(), "panic-full-link");
        assert_eq!(read_text_permissive(&latest.path).unwrap(), "AOP panic");
    }

    #[test]
    fn test_empty_directory_returns_none() {
        let dir = TempDir::new().unwrap();
        assert!(find_latest_matching(dir.path(), &panic_pattern())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_missing_directory_is_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("gone");
        assert!(find_latest_matching(&missing, &panic_pattern()).is_err());
    }

    #[test]
    fn test_read_text_permissive_drops_bad_bytes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("panic-full-x");
        fs::write(&path, b"baseband\xc3 crash").unwrap();
        assert_eq!(read_text_permissive(&path).unwrap(), "baseband crash");
    }
}
