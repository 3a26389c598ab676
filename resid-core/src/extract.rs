//! Declaration extraction from raw header lines.
//!
//! Accepted grammar, applied after comments are removed:
//!
//! ```text
//! define := WS? '#' WS? 'define' WS+ IDENT WS+ VALUE WS?
//! enum   := WS? IDENT WS? '=' WS? VALUE WS? ','? WS?
//! IDENT  := [A-Za-z_][A-Za-z0-9_]*
//! VALUE  := [0-9]+            (must fit in u64)
//! ```
//!
//! A line that fits a grammar shape but whose value token is not a plain
//! decimal literal (`1000u`, `0x3E8`, `-5`, `BASE+1`) is skipped, as is any
//! line that fits no shape. Neither case is an error.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::declaration::{Declaration, DeclarationSet, DeclarationStyle, SourceLine};

fn define_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"^\s*#\s*define\s+([A-Za-z_][A-Za-z0-9_]*)\s+(\S+)\s*$")
            .expect("Hardcoded regex pattern is valid")
    })
}

fn enum_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_]*)\s*=\s*([^\s,]+)\s*,?\s*$")
            .expect("Hardcoded regex pattern is valid")
    })
}

/// Parse a decimal literal. Anything but ASCII digits, or a value that does
/// not fit in `u64`, yields `None`.
pub fn parse_value(token: &str) -> Option<u64> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

/// Block-comment state carried from one line to the next.
///
/// Resets when the source file changes, so an unterminated `/*` never
/// leaks into the next header.
#[derive(Debug, Default)]
pub struct CommentState {
    source: Option<PathBuf>,
    in_block: bool,
}

impl CommentState {
    fn enter(&mut self, source: &Path) {
        if self.source.as_deref() != Some(source) {
            self.source = Some(source.to_path_buf());
            self.in_block = false;
        }
    }

    /// Whether the previous line left a `/* ... */` comment open.
    pub fn in_block(&self) -> bool {
        self.in_block
    }
}

/// Remove `//` and `/* */` comments from one line.
///
/// Inline block comments become a single space so tokens on either side
/// stay separated.
pub fn strip_comments(text: &str, in_block: &mut bool) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    loop {
        if *in_block {
            match rest.find("*/") {
                Some(end) => {
                    *in_block = false;
                    out.push(' ');
                    rest = &rest[end + 2..];
                }
                None => return out,
            }
        }

        let line_comment = rest.find("//");
        let block_comment = rest.find("/*");
        match (line_comment, block_comment) {
            (Some(l), Some(b)) if l < b => {
                out.push_str(&rest[..l]);
                return out;
            }
            (Some(l), None) => {
                out.push_str(&rest[..l]);
                return out;
            }
            (_, Some(b)) => {
                out.push_str(&rest[..b]);
                *in_block = true;
                rest = &rest[b + 2..];
            }
            (None, None) => {
                out.push_str(rest);
                return out;
            }
        }
    }
}

/// What the extractor made of a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// A declaration at or above the floor
    Declared(Declaration),
    /// A valid declaration below the floor
    BelowFloor(Declaration),
    /// Matched a grammar shape but the value is not a decimal `u64`
    BadLiteral,
    /// Not a declaration
    NoMatch,
}

/// Counters collected while extracting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    /// Distinct sources contributing at least one line
    pub files: usize,
    pub lines: usize,
    pub declared: usize,
    pub below_floor: usize,
    pub bad_literals: usize,
}

/// Turns source lines into a [`DeclarationSet`].
#[derive(Debug, Clone)]
pub struct Extractor {
    min_value: u64,
    styles: HashSet<DeclarationStyle>,
}

impl Extractor {
    /// Extractor accepting both `#define` and enum entries.
    pub fn new(min_value: u64) -> Self {
        Self {
            min_value,
            styles: HashSet::from([DeclarationStyle::Define, DeclarationStyle::Enum]),
        }
    }

    /// Restrict the accepted grammars.
    pub fn with_styles(mut self, styles: impl IntoIterator<Item = DeclarationStyle>) -> Self {
        self.styles = styles.into_iter().collect();
        self
    }

    pub fn min_value(&self) -> u64 {
        self.min_value
    }

    fn accepts(&self, style: DeclarationStyle) -> bool {
        self.styles.contains(&style)
    }

    /// Classify one line.
    pub fn extract_line(&self, line: &SourceLine, comments: &mut CommentState) -> LineOutcome {
        comments.enter(&line.source);
        let code = strip_comments(&line.text, &mut comments.in_block);

        let captures = if self.accepts(DeclarationStyle::Define) {
            define_regex()
                .captures(&code)
                .map(|c| (c, DeclarationStyle::Define))
        } else {
            None
        };
        let captures = captures.or_else(|| {
            if self.accepts(DeclarationStyle::Enum) {
                enum_regex()
                    .captures(&code)
                    .map(|c| (c, DeclarationStyle::Enum))
            } else {
                None
            }
        });

        let Some((caps, style)) = captures else {
            return LineOutcome::NoMatch;
        };

        let Some(value) = parse_value(&caps[2]) else {
            return LineOutcome::BadLiteral;
        };

        let declaration = Declaration::new(&caps[1], value, line.source.clone(), line.line)
            .with_style(style);
        if value < self.min_value {
            LineOutcome::BelowFloor(declaration)
        } else {
            LineOutcome::Declared(declaration)
        }
    }

    /// Extract every declaration at or above the floor.
    pub fn extract<'a>(&self, lines: impl IntoIterator<Item = &'a SourceLine>) -> DeclarationSet {
        self.extract_with_stats(lines).0
    }

    /// Same as [`Extractor::extract`], also returning counters.
    pub fn extract_with_stats<'a>(
        &self,
        lines: impl IntoIterator<Item = &'a SourceLine>,
    ) -> (DeclarationSet, ExtractionStats) {
        let mut comments = CommentState::default();
        let mut stats = ExtractionStats::default();
        let mut found = Vec::new();
        let mut sources: HashSet<&Path> = HashSet::new();

        for line in lines {
            stats.lines += 1;
            sources.insert(line.source.as_path());
            match self.extract_line(line, &mut comments) {
                LineOutcome::Declared(d) => {
                    stats.declared += 1;
                    found.push(d);
                }
                LineOutcome::BelowFloor(_) => stats.below_floor += 1,
                LineOutcome::BadLiteral => {
                    stats.bad_literals += 1;
                    debug!(
                        file = %line.source.display(),
                        line = line.line,
                        text = %line.text.trim(),
                        "skipping non-decimal value"
                    );
                }
                LineOutcome::NoMatch => {}
            }
        }
        stats.files = sources.len();

        debug!(
            files = stats.files,
            lines = stats.lines,
            declared = stats.declared,
            below_floor = stats.below_floor,
            bad_literals = stats.bad_literals,
            "extraction finished"
        );

        (DeclarationSet::new(self.min_value, found), stats)
    }
}
