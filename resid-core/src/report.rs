//! Output formatting - plaintext and JSON.

use std::io::{self, Write};

use crate::analysis::{AnalysisResult, Block, DuplicateGroup, Suggestion};
use crate::builder::{Analysis, RunOutcome};

/// Renders a run outcome to text.
pub trait Reporter {
    fn report(&self, outcome: &RunOutcome, out: &mut dyn Write) -> io::Result<()>;
}

/// Human-readable sections, one per requested analysis.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainReporter;

impl PlainReporter {
    fn write_duplicates(groups: &[DuplicateGroup], out: &mut dyn Write) -> io::Result<()> {
        if groups.is_empty() {
            return writeln!(out, "All IDs are unique.");
        }
        writeln!(out, "DUPLICATE IDS ({}):", groups.len())?;
        for group in groups {
            writeln!(out, "  {}", group.value)?;
            for decl in &group.declarations {
                writeln!(out, "    {}  ({})", decl.identifier, decl.location())?;
            }
        }
        Ok(())
    }

    fn write_suggestions(suggestions: &[Suggestion], out: &mut dyn Write) -> io::Result<()> {
        if suggestions.is_empty() {
            return writeln!(out, "No free IDs to suggest.");
        }
        writeln!(out, "SUGGESTED FREE IDS ({}):", suggestions.len())?;
        for s in suggestions {
            writeln!(out, "  {}  ({})", s.value, s.reason.describe())?;
        }
        Ok(())
    }

    fn write_blocks(blocks: &[Block], out: &mut dyn Write) -> io::Result<()> {
        if blocks.is_empty() {
            return writeln!(out, "No ID blocks found.");
        }
        writeln!(out, "ID BLOCKS ({}):", blocks.len())?;
        for b in blocks {
            writeln!(out, "  {}-{}  ({})", b.start, b.end, b.width())?;
        }
        Ok(())
    }

    fn write_result(result: &AnalysisResult, out: &mut dyn Write) -> io::Result<()> {
        writeln!(
            out,
            "{} declaration(s) >= {} in {} file(s)",
            result.declarations, result.min_value, result.files
        )?;
        if let Some(groups) = &result.duplicates {
            writeln!(out)?;
            Self::write_duplicates(groups, out)?;
        }
        if let Some(suggestions) = &result.suggestions {
            writeln!(out)?;
            Self::write_suggestions(suggestions, out)?;
        }
        if let Some(blocks) = &result.blocks {
            writeln!(out)?;
            Self::write_blocks(blocks, out)?;
        }
        Ok(())
    }
}

impl Reporter for PlainReporter {
    fn report(&self, outcome: &RunOutcome, out: &mut dyn Write) -> io::Result<()> {
        match &outcome.analysis {
            Analysis::Merged(result) => Self::write_result(result, out),
            Analysis::PerFile(files) => {
                if files.is_empty() {
                    return writeln!(out, "No declarations >= {} found.", outcome.min_value);
                }
                for (i, file) in files.iter().enumerate() {
                    if i > 0 {
                        writeln!(out)?;
                    }
                    writeln!(out, "=== {} ===", file.source.display())?;
                    Self::write_result(&file.result, out)?;
                }
                Ok(())
            }
        }
    }
}

/// Pretty-printed JSON of the whole outcome.
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReporter;

#[cfg(feature = "json")]
impl Reporter for JsonReporter {
    fn report(&self, outcome: &RunOutcome, out: &mut dyn Write) -> io::Result<()> {
        let json = serde_json::to_string_pretty(outcome).map_err(io::Error::other)?;
        writeln!(out, "{}", json)
    }
}

/// Render `outcome` into a string.
pub fn render(reporter: &dyn Reporter, outcome: &RunOutcome) -> io::Result<String> {
    let mut buf = Vec::new();
    reporter.report(outcome, &mut buf)?;
    String::from_utf8(buf).map_err(io::Error::other)
}
