//! resid-core: resource-ID consistency checks for C/C++ plugin headers.
//!
//! Plugin description headers assign integer IDs to symbolic names, either
//! as `#define NAME 1000` or as `NAME = 1000,` enumerators. This library
//! reads such headers and reports, without ever touching them:
//!
//! - **Duplicates**: values claimed by more than one identifier
//! - **Suggestions**: free values to use for new IDs
//! - **Blocks**: contiguous ranges of used values
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use resid_core::prelude::*;
//!
//! let outcome = ResidCheck::new("res/description")
//!     .actions(Actions::all())
//!     .run()?;
//!
//! PlainReporter.report(&outcome, &mut std::io::stdout())?;
//! ```
//!
//! # Module Organization
//!
//! - [`declaration`]: `SourceLine`, `Declaration` and `DeclarationSet`
//! - [`extract`]: regex grammar turning lines into declarations
//! - [`analysis`]: duplicate, gap and block analyses
//! - [`ingest`]: line sources (filesystem, memory)
//! - [`scan`]: header discovery and input validation
//! - [`report`]: plain and JSON reporters
//! - [`builder`]: fluent API tying the pieces together
//! - [`config`]: `resid.toml` loading
//! - [`error`]: typed error handling
//!
//! # Cargo Features
//!
//! - `json` (default): Enable the JSON reporter

pub mod analysis;
pub mod builder;
pub mod config;
pub mod declaration;
pub mod error;
pub mod extract;
pub mod ingest;
pub mod logging;
pub mod prelude;
pub mod report;
pub mod scan;

// Error types
pub use error::{InputErrorKind, IoResultExt, ResidError, ResidResult};

// Builder API
pub use builder::{Analysis, ResidCheck, RunOutcome};

// Configuration
pub use config::{load_config, load_config_file, parse_config, OutputConfig, ResidConfig};

// Core records
pub use declaration::{Declaration, DeclarationSet, DeclarationStyle, SourceLine, DEFAULT_MIN_VALUE};

// Extraction
pub use extract::{parse_value, strip_comments, CommentState, ExtractionStats, Extractor, LineOutcome};

// Analyses
pub use analysis::{
    analyze, analyze_per_file, find_blocks, find_duplicates, suggest_ids,
    Actions, AnalysisOptions, AnalysisResult, Block, DuplicateGroup, FileAnalysis,
    GapSuggester, Suggestion, SuggestionReason, DEFAULT_SUGGEST_COUNT,
};

// Ingestion and scanning
pub use ingest::{split_lines, FsIngestor, Ingestor, MemoryIngestor};
pub use scan::{gather_header_files, validate_input, ScanOptions};

// Logging
pub use logging::{init_structured_logging, log_error, log_info, log_warn};

// Reporting
pub use report::{render, PlainReporter, Reporter};

#[cfg(feature = "json")]
pub use report::JsonReporter;
