//! Line sources for the extractor.
//!
//! The analysis core only ever sees [`SourceLine`]s. Where they come from is
//! up to an [`Ingestor`]: the filesystem for real runs, memory for tests.

use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::declaration::SourceLine;
use crate::error::{IoResultExt, ResidResult};
use crate::logging::log_warn;
use crate::scan::{gather_header_files, ScanOptions};

/// Supplies every line of every input header, ordered file-then-line.
pub trait Ingestor {
    fn lines(&self) -> ResidResult<Vec<SourceLine>>;
}

/// Split file content into numbered lines.
///
/// Handles `\n` and `\r\n` endings.
pub fn split_lines(source: &Path, content: &str) -> Vec<SourceLine> {
    content
        .lines()
        .enumerate()
        .map(|(i, text)| SourceLine::new(source, i + 1, text))
        .collect()
}

/// Reads headers from a file or a directory tree.
#[derive(Debug, Clone)]
pub struct FsIngestor {
    root: PathBuf,
    options: ScanOptions,
}

impl FsIngestor {
    pub fn new(root: impl Into<PathBuf>, options: ScanOptions) -> Self {
        Self {
            root: root.into(),
            options,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read_file(path: &Path) -> ResidResult<Vec<SourceLine>> {
        let bytes = fs::read(path).with_path(path)?;
        let content = String::from_utf8_lossy(&bytes);
        Ok(split_lines(path, &content))
    }
}

impl Ingestor for FsIngestor {
    /// Fails only if the root is unusable. A header that cannot be read is
    /// logged and left out.
    fn lines(&self) -> ResidResult<Vec<SourceLine>> {
        let files = gather_header_files(&self.root, &self.options)?;
        info!(root = %self.root.display(), files = files.len(), "header files found");

        // `files` is sorted, and par_iter().map().collect() keeps that order.
        let per_file: Vec<Vec<SourceLine>> = files
            .par_iter()
            .map(|path| match Self::read_file(path) {
                Ok(lines) => {
                    debug!(file = %path.display(), lines = lines.len(), "read header");
                    Ok(lines)
                }
                Err(e) if e.is_recoverable() => {
                    log_warn(&format!("Skipping unreadable header: {}", e));
                    Ok(Vec::new())
                }
                Err(e) => Err(e),
            })
            .collect::<ResidResult<_>>()?;

        Ok(per_file.into_iter().flatten().collect())
    }
}

/// In-memory headers, for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryIngestor {
    files: Vec<(PathBuf, String)>,
}

impl MemoryIngestor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header with the given content.
    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.push((path.into(), content.into()));
        self
    }
}

impl Ingestor for MemoryIngestor {
    fn lines(&self) -> ResidResult<Vec<SourceLine>> {
        Ok(self
            .files
            .iter()
            .flat_map(|(path, content)| split_lines(path, content))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lines_numbering() {
        let lines = split_lines(Path::new("a.h"), "one\r\ntwo\n\nfour");
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], SourceLine::new("a.h", 1, "one"));
        assert_eq!(lines[1].text, "two");
        assert_eq!(lines[3].line, 4);
    }

    #[test]
    fn test_memory_ingestor() {
        let ingestor = MemoryIngestor::new()
            .with_file("a.h", "#define A 1000\n#define B 1001")
            .with_file("b.h", "C = 1002,");
        let lines = ingestor.lines().unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2].source, PathBuf::from("b.h"));
        assert_eq!(lines[2].line, 1);
    }

    #[test]
    fn test_fs_ingestor_reads_lossily() {
        let dir = std::env::temp_dir().join(format!("resid_ingest_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let file = dir.join("latin1.h");
        fs::write(&file, b"// caf\xe9\n#define ID_CAFE 1000\n").unwrap();

        let lines = FsIngestor::new(&dir, ScanOptions::default()).lines().unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].text, "#define ID_CAFE 1000");
        assert_eq!(lines[1].source, file);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_fs_ingestor_missing_root() {
        let ingestor = FsIngestor::new("/definitely/not/here", ScanOptions::default());
        assert!(ingestor.lines().is_err());
    }
}
