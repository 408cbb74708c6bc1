use std::path::{Path, PathBuf};

use glob::{Pattern, glob};
use tracing::warn;
use walkdir::WalkDir;

use crate::config::TEST_FILE_PATTERNS;
use crate::core::FileKind;

/// Check if a pattern contains glob wildcards (* or ?).
/// Patterns without wildcards are treated as literal directory paths.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Result of scanning files.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Sorted, without duplicates.
    pub files: Vec<PathBuf>,
    pub skipped_count: usize,
}

impl ScanResult {
    fn finish(mut self) -> Self {
        self.files.sort();
        self.files.dedup();
        self
    }
}

/// Source files under `base_dir`, restricted to `includes` (all of
/// `base_dir` when empty) and minus anything matching `ignore_patterns`.
pub fn scan_files(
    base_dir: &Path,
    includes: &[String],
    ignore_patterns: &[String],
    ignore_test_files: bool,
) -> ScanResult {
    let mut result = ScanResult::default();

    let mut literal_ignore_paths: Vec<PathBuf> = Vec::new();
    let mut glob_patterns: Vec<Pattern> = Vec::new();

    for p in ignore_patterns {
        if is_glob_pattern(p) {
            match Pattern::new(p) {
                Ok(pattern) => glob_patterns.push(pattern),
                Err(e) => warn!(pattern = %p, error = %e, "invalid ignore pattern"),
            }
        } else {
            literal_ignore_paths.push(base_dir.join(p));
        }
    }

    if ignore_test_files {
        glob_patterns.extend(TEST_FILE_PATTERNS.iter().filter_map(|p| Pattern::new(p).ok()));
    }

    let dirs_to_scan: Vec<PathBuf> = if includes.is_empty() {
        vec![base_dir.to_path_buf()]
    } else {
        let mut paths = Vec::new();
        for inc in includes {
            if is_glob_pattern(inc) {
                let full_pattern = format!(
                    "{}/{}",
                    Pattern::escape(&base_dir.to_string_lossy()).trim_end_matches('/'),
                    inc
                );
                match glob(&full_pattern) {
                    Ok(entries) => paths.extend(entries.flatten().filter(|e| e.is_dir())),
                    Err(e) => warn!(pattern = %inc, error = %e, "invalid include pattern"),
                }
            } else {
                let path = base_dir.join(inc);
                if path.exists() {
                    paths.push(path);
                } else {
                    warn!(path = %path.display(), "include path does not exist");
                }
            }
        }
        paths
    };

    for dir in dirs_to_scan {
        for entry in WalkDir::new(dir) {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    result.skipped_count += 1;
                    warn!(error = %e, "cannot access path");
                    continue;
                }
            };
            let path = entry.path();

            if literal_ignore_paths
                .iter()
                .any(|ignore_path| path.starts_with(ignore_path))
            {
                continue;
            }

            let path_str = path.to_string_lossy();
            if glob_patterns.iter().any(|p| p.matches(&path_str)) {
                continue;
            }

            if entry.file_type().is_file() && is_scannable_file(path) {
                result.files.push(path.to_path_buf());
            }
        }
    }

    result.finish()
}

/// Expand command-line paths: directories are scanned with the ignore rules,
/// files are taken as given.
pub fn scan_paths(
    paths: &[PathBuf],
    ignore_patterns: &[String],
    ignore_test_files: bool,
) -> ScanResult {
    let mut result = ScanResult::default();
    for path in paths {
        if path.is_dir() {
            let scanned = scan_files(path, &[], ignore_patterns, ignore_test_files);
            result.files.extend(scanned.files);
            result.skipped_count += scanned.skipped_count;
        } else if path.is_file() && is_scannable_file(path) {
            result.files.push(path.clone());
        } else {
            warn!(path = %path.display(), "not a source file, skipping");
            result.skipped_count += 1;
        }
    }
    result.finish()
}

fn is_scannable_file(path: &Path) -> bool {
    FileKind::from_path(path).is_some()
}
