//! Plain-text report output.

use std::io::Write;

use crate::duplicates::Report;

/// Message printed by `duplicate-finder` when nothing was found.
pub const NO_DUPLICATE_WADS: &str = "No duplicate WAD files found.";

/// Message printed by `waddup` when nothing was found.
pub const NO_DUPLICATES: &str = "No duplicate files found.";

/// Writes report lines, or a fallback message when the report is empty.
#[derive(Debug)]
pub struct TextOutput<'a> {
    report: &'a Report,
    empty_message: &'a str,
}

impl<'a> TextOutput<'a> {
    /// Create a text view of `report`.
    #[must_use]
    pub fn new(report: &'a Report, empty_message: &'a str) -> Self {
        Self {
            report,
            empty_message,
        }
    }

    /// Write the report, one line per entry line.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        if self.report.is_empty() {
            writeln!(writer, "{}", self.empty_message)?;
            return Ok(());
        }

        for line in self.report.lines() {
            writeln!(writer, "{}", line)?;
        }
        Ok(())
    }
}
