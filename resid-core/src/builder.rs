//! Builder pattern API for resid analysis.
//!
//! ```rust,ignore
//! use resid_core::prelude::*;
//!
//! let outcome = ResidCheck::new("res/")
//!     .min_value(1000)
//!     .actions(Actions::all())
//!     .suggest_count(5)
//!     .run()?;
//! ```

use std::path::PathBuf;

use serde::Serialize;
use tracing::info;

use crate::analysis::{analyze, analyze_per_file, Actions, AnalysisOptions, AnalysisResult, FileAnalysis};
use crate::config::ResidConfig;
use crate::declaration::{DeclarationStyle, DEFAULT_MIN_VALUE};
use crate::error::{ResidError, ResidResult};
use crate::extract::Extractor;
use crate::ingest::{FsIngestor, Ingestor};
use crate::scan::ScanOptions;

/// Merged or per-file results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Analysis {
    Merged(AnalysisResult),
    PerFile(Vec<FileAnalysis>),
}

/// Everything a reporter needs from one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunOutcome {
    /// Input path as given
    pub root: PathBuf,
    pub min_value: u64,
    /// Lines read from all headers
    pub lines: usize,
    /// Declarations skipped for a non-decimal value
    pub skipped_literals: usize,
    #[serde(flatten)]
    pub analysis: Analysis,
}

/// Builder for configuring a resource-ID check.
#[derive(Debug, Clone)]
pub struct ResidCheck {
    /// File or directory to analyze
    root: PathBuf,

    /// Value floor
    min_value: u64,

    /// Number of suggestions
    suggest_count: usize,

    /// Upper bound past the largest ID for suggestions
    lookahead: Option<u64>,

    /// Requested analyses
    actions: Actions,

    /// Accepted declaration syntaxes
    styles: Vec<DeclarationStyle>,

    /// File discovery settings
    scan: ScanOptions,

    /// Analyze every header on its own
    per_file: bool,
}

impl ResidCheck {
    /// Create a new check for the given path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let defaults = AnalysisOptions::default();
        Self {
            root: root.into(),
            min_value: DEFAULT_MIN_VALUE,
            suggest_count: defaults.suggest_count,
            lookahead: None,
            actions: Actions::default(),
            styles: vec![DeclarationStyle::Define, DeclarationStyle::Enum],
            scan: ScanOptions::default(),
            per_file: false,
        }
    }

    /// Apply values from a config file. Call before the individual setters
    /// so explicit settings win.
    pub fn with_config(mut self, cfg: &ResidConfig) -> Self {
        if let Some(v) = cfg.minval {
            self.min_value = v;
        }
        if let Some(v) = cfg.suggest_count {
            self.suggest_count = v;
        }
        if cfg.lookahead.is_some() {
            self.lookahead = cfg.lookahead;
        }
        if let Some(v) = &cfg.extensions {
            self.scan.extensions = v.clone();
        }
        if let Some(v) = &cfg.exclude {
            self.scan.exclude_dirs = v.clone();
        }
        if cfg.max_depth.is_some() {
            self.scan.max_depth = cfg.max_depth;
        }
        if let Some(v) = &cfg.styles {
            self.styles = v.clone();
        }
        self
    }

    /// Ignore IDs below `value`.
    pub fn min_value(mut self, value: u64) -> Self {
        self.min_value = value;
        self
    }

    /// Number of free IDs to suggest.
    pub fn suggest_count(mut self, count: usize) -> Self {
        self.suggest_count = count;
        self
    }

    /// Limit suggestions to `largest ID + lookahead`.
    pub fn lookahead(mut self, lookahead: Option<u64>) -> Self {
        self.lookahead = lookahead;
        self
    }

    /// Select analyses. Uniqueness runs when none is selected.
    pub fn actions(mut self, actions: Actions) -> Self {
        self.actions = actions;
        self
    }

    /// Accepted header extensions, without the dot.
    pub fn extensions(mut self, extensions: Vec<String>) -> Self {
        self.scan.extensions = extensions;
        self
    }

    /// Extra directory names to skip.
    pub fn exclude_dirs(mut self, dirs: Vec<String>) -> Self {
        self.scan.exclude_dirs = dirs;
        self
    }

    /// Maximum directory depth (`Some(1)` = only the top directory).
    pub fn max_depth(mut self, depth: Option<usize>) -> Self {
        self.scan.max_depth = depth;
        self
    }

    /// Accepted declaration syntaxes.
    pub fn styles(mut self, styles: Vec<DeclarationStyle>) -> Self {
        self.styles = styles;
        self
    }

    /// Analyze each header separately instead of merging them.
    pub fn per_file(mut self, enabled: bool) -> Self {
        self.per_file = enabled;
        self
    }

    /// Floor applied when extracting declarations.
    pub fn floor(&self) -> u64 {
        self.min_value
    }

    pub fn options(&self) -> AnalysisOptions {
        AnalysisOptions {
            suggest_count: self.suggest_count,
            lookahead: self.lookahead,
            actions: self.actions.or_default_uniqueness(),
        }
    }

    fn validate(&self) -> ResidResult<()> {
        if self.suggest_count == 0 {
            return Err(ResidError::invalid_argument("suggestion count must be at least 1"));
        }
        if self.styles.is_empty() {
            return Err(ResidError::invalid_argument(
                "at least one declaration style must be enabled",
            ));
        }
        if self.scan.extensions.is_empty() {
            return Err(ResidError::invalid_argument("at least one header extension is required"));
        }
        Ok(())
    }

    /// Read headers from the filesystem and analyze them.
    pub fn run(&self) -> ResidResult<RunOutcome> {
        self.validate()?;
        let ingestor = FsIngestor::new(&self.root, self.scan.clone());
        self.run_with(&ingestor)
    }

    /// Analyze lines from any ingestor.
    pub fn run_with(&self, ingestor: &dyn Ingestor) -> ResidResult<RunOutcome> {
        self.validate()?;
        let lines = ingestor.lines()?;

        let extractor = Extractor::new(self.min_value).with_styles(self.styles.iter().copied());
        let (set, stats) = extractor.extract_with_stats(&lines);
        info!(
            root = %self.root.display(),
            files = stats.files,
            lines = stats.lines,
            declarations = set.len(),
            below_floor = stats.below_floor,
            skipped = stats.bad_literals,
            "declarations extracted"
        );

        let options = self.options();
        let analysis = if self.per_file {
            Analysis::PerFile(analyze_per_file(&set, &options))
        } else {
            let mut result = analyze(&set, &options);
            result.files = stats.files;
            Analysis::Merged(result)
        };

        Ok(RunOutcome {
            root: self.root.clone(),
            min_value: self.min_value,
            lines: stats.lines,
            skipped_literals: stats.bad_literals,
            analysis,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use crate::ingest::MemoryIngestor;
    use std::path::Path;

    fn headers() -> MemoryIngestor {
        MemoryIngestor::new()
            .with_file(
                "c4d_symbols.h",
                "enum\n{\n  IDS_A = 1000,\n  IDS_B = 1000,\n  IDS_C = 1002,\n  _DUMMY_ELEMENT_\n};\n",
            )
            .with_file("ofoo.h", "#define OFOO_LOW 500\n#define OFOO_BAD 0x400\n")
    }

    #[test]
    fn test_run_with_memory_ingestor() {
        let outcome = ResidCheck::new("res")
            .actions(Actions::all())
            .suggest_count(2)
            .run_with(&headers())
            .unwrap();

        assert_eq!(outcome.lines, 9);
        assert_eq!(outcome.skipped_literals, 1);
        let Analysis::Merged(result) = outcome.analysis else {
            panic!("expected merged analysis");
        };
        // ofoo.h has no declaration at or above the floor but was still read.
        assert_eq!(result.files, 2);
        assert_eq!(result.declarations, 3);
        assert_eq!(result.duplicates.unwrap()[0].identifiers, vec!["IDS_A", "IDS_B"]);
        let values: Vec<_> = result.suggestions.unwrap().iter().map(|s| s.value).collect();
        assert_eq!(values, vec![1001, 1003]);
    }

    #[test]
    fn test_min_value_lowers_floor() {
        let outcome = ResidCheck::new("res")
            .min_value(0)
            .actions(Actions { blocks: true, ..Actions::default() })
            .run_with(&headers())
            .unwrap();
        let Analysis::Merged(result) = outcome.analysis else {
            panic!("expected merged analysis");
        };
        assert_eq!(result.declarations, 4);
        assert_eq!(result.blocks.unwrap().len(), 3);
    }

    #[test]
    fn test_styles_restrict_grammar() {
        let outcome = ResidCheck::new("res")
            .min_value(0)
            .styles(vec![DeclarationStyle::Define])
            .run_with(&headers())
            .unwrap();
        let Analysis::Merged(result) = outcome.analysis else {
            panic!("expected merged analysis");
        };
        assert_eq!(result.declarations, 1);
    }

    #[test]
    fn test_per_file() {
        let outcome = ResidCheck::new("res")
            .min_value(0)
            .per_file(true)
            .run_with(&headers())
            .unwrap();
        let Analysis::PerFile(files) = outcome.analysis else {
            panic!("expected per-file analysis");
        };
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].source, PathBuf::from("c4d_symbols.h"));
        assert_eq!(files[1].result.declarations, 1);
    }

    #[test]
    fn test_invalid_settings() {
        let err = ResidCheck::new("res").suggest_count(0).run_with(&headers()).unwrap_err();
        assert!(matches!(err, ResidError::InvalidArgument { .. }));

        let err = ResidCheck::new("res").styles(Vec::new()).run_with(&headers()).unwrap_err();
        assert!(matches!(err, ResidError::InvalidArgument { .. }));
    }

    #[test]
    fn test_config_then_explicit_override() {
        let cfg = parse_config(Path::new("resid.toml"), "minval = 0\nsuggest_count = 4").unwrap();
        let check = ResidCheck::new("res").with_config(&cfg).suggest_count(7);
        let options = check.options();
        assert_eq!(check.floor(), 0);
        assert_eq!(options.suggest_count, 7);
        assert!(options.actions.uniqueness);
    }
}
