//! Header file discovery with early directory pruning.
//!
//! - Excluded directories are skipped via `WalkDir::filter_entry`, so their
//!   subtrees are never visited
//! - Extension checks run in parallel via Rayon's `par_bridge`
//! - Results are sorted by path so repeated runs see files in one order

use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{InputErrorKind, ResidError, ResidResult};
use crate::logging::log_warn;

/// Directories excluded by default.
pub const EXCLUDED_DIRS: &[&str] = &[".git", ".svn", "build", "node_modules"];

/// Header extensions accepted by default.
pub const DEFAULT_EXTENSIONS: &[&str] = &["h"];

/// What to look for and where not to look.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Accepted extensions, without the dot, matched case-insensitively
    pub extensions: Vec<String>,
    /// Directory names pruned in addition to [`EXCLUDED_DIRS`]
    pub exclude_dirs: Vec<String>,
    /// Maximum directory depth below the root (`None` = unlimited)
    pub max_depth: Option<usize>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            exclude_dirs: Vec::new(),
            max_depth: None,
        }
    }
}

impl ScanOptions {
    /// Whether `path` carries one of the accepted extensions.
    pub fn is_header(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }
}

/// Checks if a directory entry should be pruned.
#[inline]
fn is_excluded_dir(entry: &walkdir::DirEntry, excludes: &HashSet<&str>) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| excludes.contains(name))
}

/// Reject input paths that cannot be analyzed.
///
/// Directories are always accepted; a single file must carry a header
/// extension.
pub fn validate_input(path: &Path, options: &ScanOptions) -> ResidResult<()> {
    let metadata = match std::fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ResidError::input(path, InputErrorKind::NotFound));
        }
        Err(e) => return Err(ResidError::io(path, e)),
    };

    if metadata.is_dir() {
        Ok(())
    } else if !metadata.is_file() {
        Err(ResidError::input(path, InputErrorKind::NotFileOrDir))
    } else if !options.is_header(path) {
        Err(ResidError::input(path, InputErrorKind::UnsupportedExtension))
    } else {
        Ok(())
    }
}

/// Gathers header files under `root`, or `root` itself when it is a file.
///
/// Only the root is validated strictly. Entries below it that cannot be
/// read are logged and skipped.
pub fn gather_header_files(root: &Path, options: &ScanOptions) -> ResidResult<Vec<PathBuf>> {
    validate_input(root, options)?;
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    let excludes: HashSet<&str> = EXCLUDED_DIRS
        .iter()
        .copied()
        .chain(options.exclude_dirs.iter().map(String::as_str))
        .collect();

    let mut walker = WalkDir::new(root);
    if let Some(depth) = options.max_depth {
        walker = walker.max_depth(depth);
    }

    let mut files = walker
        .into_iter()
        .filter_entry(|e| !is_excluded_dir(e, &excludes))
        .par_bridge()
        .filter_map(|entry| match entry {
            Ok(e) => {
                let path = e.path();
                if path.is_file() && options.is_header(path) {
                    Some(Ok(path.to_path_buf()))
                } else {
                    None
                }
            }
            Err(e) => {
                let at = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
                let err = match e.into_io_error() {
                    Some(io) => ResidError::io(at, io),
                    None => ResidError::io_message(at, "filesystem loop detected"),
                };
                if err.is_recoverable() {
                    log_warn(&format!("Skipping unreadable entry: {}", err));
                    None
                } else {
                    Some(Err(err))
                }
            }
        })
        .collect::<ResidResult<Vec<_>>>()?;

    files.sort();
    Ok(files)
}
