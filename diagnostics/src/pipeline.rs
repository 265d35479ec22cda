//! Diagnostic builders for the variant pipeline
//!
//! Codes:
//! - W0001: template file missing (generation skipped, run continues)
//! - E0002: compiler exited unsuccessfully
//! - E0003: compiler could not be launched
//! - E0004: configuration error
//! - E0005: fatal I/O error

use crate::{Diagnostic, DiagnosticBuilder};
use std::path::Path;

/// Provides common pipeline diagnostic builders
pub struct PipelineDiagnostics;

impl PipelineDiagnostics {
    /// The kernel template could not be found; generation was skipped
    pub fn template_missing(path: &Path) -> Diagnostic {
        DiagnosticBuilder::warning("template file not found")
            .code("W0001")
            .location(path)
            .note("no variant sources were generated")
            .help("check the template path, or pass --manifest with a [template] section")
            .build()
    }

    /// The compiler ran and returned a failure status
    pub fn build_failed(target: &str, code: Option<i32>, stderr: &str) -> Diagnostic {
        let status = match code {
            Some(code) => format!("exit code {}", code),
            None => "terminated by signal".to_string(),
        };

        let mut builder =
            DiagnosticBuilder::error(format!("compilation failed for target '{}'", target))
                .code("E0002")
                .note(status);

        let stderr = stderr.trim();
        if !stderr.is_empty() {
            builder = builder.note(stderr.to_string());
        }

        builder.build()
    }

    /// The compiler process could not be started at all
    pub fn launch_failed(target: &str, program: &str, reason: &str) -> Diagnostic {
        DiagnosticBuilder::error(format!(
            "could not run '{}' for target '{}'",
            program, target
        ))
        .code("E0003")
        .note(reason.to_string())
        .help(format!("make sure '{}' is installed and on PATH", program))
        .build()
    }

    /// Invalid manifest or target table
    pub fn config_error(message: &str, path: Option<&Path>) -> Diagnostic {
        let mut builder = DiagnosticBuilder::error(message.to_string()).code("E0004");
        if let Some(path) = path {
            builder = builder.location(path);
        }
        builder.build()
    }

    /// Unrecoverable error that aborts the run
    pub fn fatal(message: &str) -> Diagnostic {
        DiagnosticBuilder::error(message.to_string())
            .code("E0005")
            .build()
    }
}
