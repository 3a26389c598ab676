//! Configuration loading from resid.toml.
//!
//! Every key is optional. Command-line flags override file values, file
//! values override built-in defaults.

use serde::Deserialize;
use std::{fs, path::Path};

use crate::declaration::DeclarationStyle;
use crate::error::{IoResultExt, ResidError, ResidResult};

/// File name searched for next to the analyzed path.
pub const CONFIG_FILE_NAME: &str = "resid.toml";

/// Main configuration structure for resid.toml.
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ResidConfig {
    /// Value floor; smaller IDs are ignored.
    pub minval: Option<u64>,
    /// Number of free IDs to suggest.
    pub suggest_count: Option<usize>,
    /// Maximum distance past the largest ID for suggestions.
    pub lookahead: Option<u64>,
    /// Header extensions without the dot.
    pub extensions: Option<Vec<String>>,
    /// Directory names to skip.
    pub exclude: Option<Vec<String>>,
    /// Maximum directory depth.
    pub max_depth: Option<usize>,
    /// Accepted declaration styles: "define", "enum".
    pub styles: Option<Vec<DeclarationStyle>>,
    /// Output configuration.
    pub output: Option<OutputConfig>,
}

/// Output format configuration.
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Output format: "plain" or "json".
    pub format: Option<String>,
}

impl ResidConfig {
    /// Whether the configured output format is JSON.
    pub fn wants_json(&self) -> bool {
        self.output
            .as_ref()
            .and_then(|o| o.format.as_deref())
            .is_some_and(|f| f.eq_ignore_ascii_case("json"))
    }
}

/// Parse configuration text; `path` is only used for error messages.
pub fn parse_config(path: &Path, content: &str) -> ResidResult<ResidConfig> {
    let cfg: ResidConfig =
        toml::from_str(content).map_err(|e| ResidError::config(path, e.to_string()))?;

    if cfg.suggest_count == Some(0) {
        return Err(ResidError::config(path, "suggest_count must be at least 1"));
    }
    if let Some(format) = cfg.output.as_ref().and_then(|o| o.format.as_deref()) {
        if !matches!(format.to_ascii_lowercase().as_str(), "plain" | "json") {
            return Err(ResidError::config(
                path,
                format!("unknown output format '{}'", format),
            ));
        }
    }
    Ok(cfg)
}

/// Load configuration from an explicit file.
pub fn load_config_file(path: &Path) -> ResidResult<ResidConfig> {
    let content = fs::read_to_string(path).with_path(path)?;
    parse_config(path, &content)
}

/// Loads resid.toml next to `input` if it exists.
///
/// For a directory the file is looked up inside it, for a header file in
/// the file's parent directory.
pub fn load_config(input: &Path) -> ResidResult<Option<ResidConfig>> {
    let dir = if input.is_dir() {
        input
    } else {
        match input.parent() {
            Some(parent) => parent,
            None => return Ok(None),
        }
    };

    let path = dir.join(CONFIG_FILE_NAME);
    if !path.is_file() {
        return Ok(None);
    }
    load_config_file(&path).map(Some)
}
