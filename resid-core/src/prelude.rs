//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use resid_core::prelude::*;
//! ```

// Records
pub use crate::declaration::{Declaration, DeclarationSet, SourceLine};

// Errors
pub use crate::error::{ResidError, ResidResult};

// Analyses
pub use crate::analysis::{
    analyze, find_blocks, find_duplicates, suggest_ids, Actions, AnalysisOptions, AnalysisResult,
};

// Extraction and ingestion
pub use crate::extract::Extractor;
pub use crate::ingest::{FsIngestor, Ingestor, MemoryIngestor};

// Builder API
pub use crate::builder::{Analysis, ResidCheck, RunOutcome};

// Reporting
pub use crate::report::{PlainReporter, Reporter};

#[cfg(feature = "json")]
pub use crate::report::JsonReporter;
