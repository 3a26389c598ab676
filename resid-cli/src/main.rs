//! resid CLI - resource-ID checker for C/C++ plugin headers.
//!
//! Reads one header or a directory tree of headers and reports duplicate
//! IDs, free IDs and contiguous ID blocks. Never writes to the inputs.
//!
//! Exit codes: 0 when the analysis ran (whatever it found), 1 for invalid
//! arguments, configuration or input paths, 2 on an internal panic.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use std::io::{self, Write};
use std::path::PathBuf;

use resid_core::{
    init_structured_logging, load_config, load_config_file, log_error, log_info, Actions,
    DeclarationStyle, JsonReporter, PlainReporter, Reporter, ResidCheck, ResidConfig,
};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Checks resource IDs in C/C++ headers for duplicates and suggests free IDs"
)]
pub struct Cli {
    /// Header file or directory of header files to check
    path: PathBuf,

    /// Minimum ID value; smaller IDs are ignored [default: 1000]
    #[arg(long, value_name = "MINVAL")]
    minval: Option<u64>,

    /// Report values used by more than one identifier (default action)
    #[arg(long)]
    unique: bool,

    /// Suggest free ID values
    #[arg(long)]
    suggest: bool,

    /// Show contiguous blocks of used IDs
    #[arg(long)]
    blocks: bool,

    /// Number of IDs to suggest [default: 10]
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    count: Option<u64>,

    /// Do not suggest IDs more than N past the largest used ID
    #[arg(long, value_name = "N")]
    lookahead: Option<u64>,

    /// Analyze every header separately instead of merging them
    #[arg(long)]
    per_file: bool,

    /// Output results in JSON format
    #[arg(long)]
    json: bool,

    /// Header extensions to scan, repeatable or comma-separated [default: h]
    #[arg(long = "ext", value_name = "EXT", action = ArgAction::Append, value_delimiter = ',')]
    extensions: Vec<String>,

    /// Directory names to skip while scanning, repeatable or comma-separated
    #[arg(long, value_name = "DIR", action = ArgAction::Append, value_delimiter = ',')]
    exclude: Vec<String>,

    /// Maximum directory depth to scan (1 = only the given directory)
    #[arg(long, value_name = "N")]
    max_depth: Option<usize>,

    /// Ignore `NAME = VALUE,` enum entries
    #[arg(long, conflicts_with = "no_define")]
    no_enum: bool,

    /// Ignore `#define NAME VALUE` lines
    #[arg(long)]
    no_define: bool,

    /// Configuration file (default: resid.toml next to PATH)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

impl Cli {
    fn actions(&self) -> Actions {
        Actions {
            uniqueness: self.unique,
            suggest: self.suggest,
            blocks: self.blocks,
        }
        .or_default_uniqueness()
    }

    /// Declaration styles selected by flags, if any flag was given.
    fn styles(&self) -> Option<Vec<DeclarationStyle>> {
        if self.no_enum {
            Some(vec![DeclarationStyle::Define])
        } else if self.no_define {
            Some(vec![DeclarationStyle::Enum])
        } else {
            None
        }
    }

    /// Layer command-line flags over configuration values.
    fn build_check(&self, cfg: &ResidConfig) -> Result<ResidCheck> {
        let mut check = ResidCheck::new(&self.path)
            .with_config(cfg)
            .actions(self.actions())
            .per_file(self.per_file);

        if let Some(minval) = self.minval {
            check = check.min_value(minval);
        }
        if let Some(count) = self.count {
            let count = usize::try_from(count).context("--count is too large")?;
            check = check.suggest_count(count);
        }
        if self.lookahead.is_some() {
            check = check.lookahead(self.lookahead);
        }
        if !self.extensions.is_empty() {
            let extensions = self
                .extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_string())
                .collect();
            check = check.extensions(extensions);
        }
        if !self.exclude.is_empty() {
            check = check.exclude_dirs(self.exclude.clone());
        }
        if self.max_depth.is_some() {
            check = check.max_depth(self.max_depth);
        }
        if let Some(styles) = self.styles() {
            check = check.styles(styles);
        }
        Ok(check)
    }
}

/// Explicit `--config` wins; otherwise look for resid.toml next to the input.
fn resolve_config(cli: &Cli) -> Result<ResidConfig> {
    match &cli.config {
        Some(path) => load_config_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display())),
        None => Ok(load_config(&cli.path)
            .with_context(|| format!("Failed to load config next to: {}", cli.path.display()))?
            .unwrap_or_default()),
    }
}

fn run(cli: &Cli, out: &mut dyn Write) -> Result<()> {
    let cfg = resolve_config(cli)?;
    let check = cli.build_check(&cfg)?;

    log_info(&format!("Checking resource IDs in '{}'", cli.path.display()));
    let outcome = check
        .run()
        .with_context(|| format!("Failed to check: {}", cli.path.display()))?;

    let reporter: &dyn Reporter = if cli.json || cfg.wants_json() {
        &JsonReporter
    } else {
        &PlainReporter
    };
    reporter
        .report(&outcome, out)
        .context("Failed to write report")?;
    Ok(())
}

fn main() {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("[PANIC] resid internal error: {}", info);
        eprintln!("[PANIC] The process will exit with code 2.");
        std::process::exit(2);
    }));

    // JSON diagnostics to stderr, respects RUST_LOG
    init_structured_logging();

    let cli = Cli::parse();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Err(e) = run(&cli, &mut out) {
        log_error(&format!("{:#}", e));
        eprintln!("[ERROR] {:#}", e);
        std::process::exit(1);
    }
}
