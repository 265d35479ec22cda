//! Diagnostics library for console error reporting
//!
//! This library provides compiler-style diagnostics with:
//! - Error and warning severities
//! - An optional file location the diagnostic refers to
//! - Help messages and notes
//! - Colored terminal output

use std::fmt;
use std::path::{Path, PathBuf};

/// Severity level for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

impl fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticSeverity::Error => write!(f, "error"),
            DiagnosticSeverity::Warning => write!(f, "warning"),
        }
    }
}

/// A diagnostic message with severity, location, help and notes
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: DiagnosticSeverity,
    pub code: Option<String>,
    pub message: String,
    pub location: Option<PathBuf>,
    pub notes: Vec<String>,
    pub help: Vec<String>,
}

/// Builder for creating diagnostics
pub struct DiagnosticBuilder {
    severity: DiagnosticSeverity,
    code: Option<String>,
    message: String,
    location: Option<PathBuf>,
    notes: Vec<String>,
    help: Vec<String>,
}

impl DiagnosticBuilder {
    fn with_severity(severity: DiagnosticSeverity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            location: None,
            notes: vec![],
            help: vec![],
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::with_severity(DiagnosticSeverity::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::with_severity(DiagnosticSeverity::Warning, message)
    }

    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn location(mut self, path: impl AsRef<Path>) -> Self {
        self.location = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn help(mut self, help_msg: impl Into<String>) -> Self {
        self.help.push(help_msg.into());
        self
    }

    pub fn build(self) -> Diagnostic {
        Diagnostic {
            severity: self.severity,
            code: self.code,
            message: self.message,
            location: self.location,
            notes: self.notes,
            help: self.help,
        }
    }
}

/// Formatter for displaying diagnostics
pub struct ErrorFormatter {
    use_colors: bool,
}

impl ErrorFormatter {
    pub fn new() -> Self {
        Self { use_colors: false }
    }

    pub fn with_colors() -> Self {
        Self { use_colors: true }
    }

    pub fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        let mut output = String::new();

        // Header
        if self.use_colors {
            let color = match diagnostic.severity {
                DiagnosticSeverity::Error => "\x1b[31m",
                DiagnosticSeverity::Warning => "\x1b[33m",
            };
            output.push_str(color);
            output.push_str(&format!("{}", diagnostic.severity));

            if let Some(code) = &diagnostic.code {
                output.push_str(&format!("[{}]", code));
            }

            output.push_str("\x1b[0m: \x1b[1;97m");
            output.push_str(&diagnostic.message);
            output.push_str("\x1b[0m\n");
        } else {
            output.push_str(&format!("{}", diagnostic.severity));

            if let Some(code) = &diagnostic.code {
                output.push_str(&format!("[{}]", code));
            }

            output.push_str(&format!(": {}\n", diagnostic.message));
        }

        if let Some(path) = &diagnostic.location {
            if self.use_colors {
                output.push_str(&format!("  \x1b[96m-->\x1b[0m {}\n", path.display()));
            } else {
                output.push_str(&format!("  --> {}\n", path.display()));
            }
        }

        for help_msg in &diagnostic.help {
            if self.use_colors {
                output.push_str("     \x1b[32mhelp\x1b[0m: \x1b[33m");
                output.push_str(help_msg);
                output.push_str("\x1b[0m\n");
            } else {
                output.push_str("     help: ");
                output.push_str(help_msg);
                output.push('\n');
            }
        }

        // Notes may span several lines (captured compiler output)
        for note in &diagnostic.notes {
            if self.use_colors {
                output.push_str("\x1b[34mnote\x1b[0m: ");
            } else {
                output.push_str("note: ");
            }
            let mut lines = note.lines();
            if let Some(first) = lines.next() {
                output.push_str(first);
            }
            output.push('\n');
            for line in lines {
                output.push_str("      ");
                output.push_str(line);
                output.push('\n');
            }
        }

        output
    }
}

impl Default for ErrorFormatter {
    fn default() -> Self {
        Self::new()
    }
}

// Diagnostics emitted by the variant pipeline
pub mod pipeline;
