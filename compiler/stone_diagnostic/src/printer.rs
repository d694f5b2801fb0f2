//! Plain-text diagnostic output.

use crate::{DiagnosticConsumer, DiagnosticLevel, DiagnosticMessage};
use std::io::{self, Write};

/// ANSI color codes for terminal output.
mod colors {
    pub const FATAL: &str = "\x1b[1;35m"; // Bold magenta
    pub const ERROR: &str = "\x1b[1;31m"; // Bold red
    pub const WARNING: &str = "\x1b[1;33m"; // Bold yellow
    pub const NOTE: &str = "\x1b[1;36m"; // Bold cyan
    pub const REMARK: &str = "\x1b[1;32m"; // Bold green
    pub const BOLD: &str = "\x1b[1m";
    pub const RESET: &str = "\x1b[0m";
}

#[inline]
fn plural_s(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

/// Color output mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Colors when the output is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn should_use_colors(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

/// Source text the printer resolves offsets against.
#[derive(Clone, Debug)]
struct SourceFile {
    name: String,
    text: String,
}

/// Consumer that writes one line per diagnostic:
///
/// ```text
/// main.stone:3:7: error: expected ')' [ExpectedToken]
///   fix-it: insert ")" at 41
/// ```
///
/// Without a source file, the location is printed as a byte range. Write
/// failures are remembered and reported by `finish`.
pub struct TextDiagnosticPrinter<W: Write> {
    writer: W,
    colors: bool,
    show_names: bool,
    source: Option<SourceFile>,
    failed: bool,
}

impl<W: Write> TextDiagnosticPrinter<W> {
    pub fn new(writer: W) -> Self {
        TextDiagnosticPrinter {
            writer,
            colors: false,
            show_names: true,
            source: None,
            failed: false,
        }
    }

    /// Choose colors from `mode`; `is_tty` decides `ColorMode::Auto`.
    #[must_use]
    pub fn with_color_mode(mut self, mode: ColorMode, is_tty: bool) -> Self {
        self.colors = mode.should_use_colors(is_tty);
        self
    }

    /// Append ` [Name]` to each message.
    #[must_use]
    pub fn with_names(mut self, show_names: bool) -> Self {
        self.show_names = show_names;
        self
    }

    /// Report line and column within `text`, prefixed by `name`.
    #[must_use]
    pub fn with_source(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.source = Some(SourceFile {
            name: name.into(),
            text: text.into(),
        });
        self
    }

    pub fn has_failed(&self) -> bool {
        self.failed
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Print the closing "N errors, M warnings" line, if there is anything
    /// to report.
    pub fn write_summary(&mut self, num_errors: usize, num_warnings: usize) {
        if num_errors == 0 && num_warnings == 0 {
            return;
        }
        let line = match (num_errors, num_warnings) {
            (0, w) => format!("{w} warning{} generated.", plural_s(w)),
            (e, 0) => format!("{e} error{} generated.", plural_s(e)),
            (e, w) => format!(
                "{e} error{} and {w} warning{} generated.",
                plural_s(e),
                plural_s(w)
            ),
        };
        let result = writeln!(self.writer, "{line}");
        self.record(result);
    }

    fn record(&mut self, result: io::Result<()>) {
        if let Err(err) = result {
            if !self.failed {
                tracing::warn!(error = %err, "diagnostic output failed");
            }
            self.failed = true;
        }
    }

    fn write_message(&mut self, message: &DiagnosticMessage) -> io::Result<()> {
        match &self.source {
            Some(source) => {
                let (line, col) = message.report_loc(&source.text).line_col(&source.text);
                write!(self.writer, "{}:{line}:{col}: ", source.name)?;
            }
            None => write!(self.writer, "{}: ", message.loc)?,
        }

        let level = message.level;
        if self.colors {
            let color = match level {
                DiagnosticLevel::Fatal => colors::FATAL,
                DiagnosticLevel::Error => colors::ERROR,
                DiagnosticLevel::Warning => colors::WARNING,
                DiagnosticLevel::Remark => colors::REMARK,
                DiagnosticLevel::Note | DiagnosticLevel::Ignore => colors::NOTE,
            };
            write!(self.writer, "{color}{level}{}: ", colors::RESET)?;
            write!(self.writer, "{}{}{}", colors::BOLD, message.text, colors::RESET)?;
        } else {
            write!(self.writer, "{level}: {}", message.text)?;
        }
        if self.show_names {
            write!(self.writer, " [{}]", message.name())?;
        }
        writeln!(self.writer)?;

        for fix in &message.fix_its {
            writeln!(self.writer, "  fix-it: {fix}")?;
        }
        Ok(())
    }
}

impl<W: Write> DiagnosticConsumer for TextDiagnosticPrinter<W> {
    fn consume(&mut self, message: &DiagnosticMessage) {
        let result = self.write_message(message);
        self.record(result);
    }

    fn finish(&mut self) -> bool {
        let result = self.writer.flush();
        self.record(result);
        self.failed
    }
}

#[cfg(test)]
mod tests;
