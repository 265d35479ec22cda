//! Console reporting for the pipeline.
//!
//! Status lines go to stdout in a fixed format; diagnostics go to stderr.

use crate::generator::GeneratedArtifact;
use crate::invoker::{BuildOutcome, BuildResult, CompilerInvocation};
use diagnostics::pipeline::PipelineDiagnostics;
use diagnostics::{Diagnostic, ErrorFormatter};
use std::io::{self, Stderr, Stdout, Write};
use std::path::Path;

/// Receives pipeline events as they happen
pub trait Reporter {
    /// The template was not found; generation is skipped
    fn template_missing(&mut self, path: &Path);

    /// One variant source was written
    fn generated(&mut self, artifact: &GeneratedArtifact);

    /// One compiler invocation finished (or failed to start)
    fn built(&mut self, result: &BuildResult);

    /// Dry run: a variant source that would be written
    fn planned_write(&mut self, _target: &str, _path: &Path) {}

    /// Dry run: a command that would be executed
    fn planned_command(&mut self, _invocation: &CompilerInvocation) {}
}

pub fn generated_line(path: &Path) -> String {
    format!("{} generate done", path.display())
}

pub fn template_missing_line(path: &Path) -> String {
    format!("{} unable to get the file.", path.display())
}

pub fn build_line(result: &BuildResult) -> String {
    if result.succeeded() {
        format!("{} build done", result.display_name)
    } else {
        format!("{} failed to build", result.display_name)
    }
}

/// Reporter writing status lines and diagnostics to a pair of streams
pub struct ConsoleReporter<O: Write = Stdout, E: Write = Stderr> {
    out: O,
    err: E,
    formatter: ErrorFormatter,
    verbose: bool,
}

impl ConsoleReporter {
    /// Report to the process's stdout and stderr.
    pub fn stdio(verbose: bool, colors: bool) -> Self {
        Self::new(io::stdout(), io::stderr(), verbose, colors)
    }
}

impl<O: Write, E: Write> ConsoleReporter<O, E> {
    pub fn new(out: O, err: E, verbose: bool, colors: bool) -> Self {
        let formatter = if colors {
            ErrorFormatter::with_colors()
        } else {
            ErrorFormatter::new()
        };
        Self {
            out,
            err,
            formatter,
            verbose,
        }
    }

    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }

    /// Print a diagnostic on the error stream.
    pub fn diagnostic(&mut self, diagnostic: &Diagnostic) {
        let text = self.formatter.format_diagnostic(diagnostic);
        // Console output is best effort; a closed stream must not abort the build
        let _ = self.err.write_all(text.as_bytes());
    }

    fn status(&mut self, line: &str) {
        let _ = writeln!(self.out, "{}", line);
    }
}

impl<O: Write, E: Write> Reporter for ConsoleReporter<O, E> {
    fn template_missing(&mut self, path: &Path) {
        self.status(&template_missing_line(path));
        self.diagnostic(&PipelineDiagnostics::template_missing(path));
    }

    fn generated(&mut self, artifact: &GeneratedArtifact) {
        self.status(&generated_line(&artifact.path));
    }

    fn built(&mut self, result: &BuildResult) {
        self.status(&build_line(result));

        if !self.verbose {
            return;
        }
        let diagnostic = match &result.outcome {
            BuildOutcome::Succeeded => return,
            BuildOutcome::Failed { code } => {
                let stderr = result
                    .output
                    .as_ref()
                    .map(|o| o.stderr.as_str())
                    .unwrap_or("");
                PipelineDiagnostics::build_failed(&result.target, *code, stderr)
            }
            BuildOutcome::LaunchFailed { reason } => PipelineDiagnostics::launch_failed(
                &result.target,
                &result.invocation.program,
                reason,
            ),
        };
        self.diagnostic(&diagnostic);
    }

    fn planned_write(&mut self, target: &str, path: &Path) {
        self.status(&format!("[{}] would write {}", target, path.display()));
    }

    fn planned_command(&mut self, invocation: &CompilerInvocation) {
        self.status(&format!("[{}] {}", invocation.target, invocation.command_line()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoker::CapturedOutput;
    use std::path::PathBuf;

    fn result(outcome: BuildOutcome, stderr: &str) -> BuildResult {
        BuildResult {
            target: "avx2".to_string(),
            display_name: "AVX2".to_string(),
            invocation: CompilerInvocation {
                target: "avx2".to_string(),
                program: "ispc".to_string(),
                opt_level: "-O2".to_string(),
                source: PathBuf::from("bc7e_avx2.ispc"),
                object: PathBuf::from("bc7e_avx2.obj"),
                header: PathBuf::from("bc7e_ispc_avx2.h"),
                isa: "avx2".to_string(),
                flags: vec![],
            },
            output: Some(CapturedOutput {
                code: Some(1),
                success: false,
                stdout: String::new(),
                stderr: stderr.to_string(),
            }),
            outcome,
        }
    }

    fn text(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_template_missing_prints_line_and_diagnostic() {
        let mut reporter = ConsoleReporter::new(Vec::new(), Vec::new(), false, false);
        reporter.template_missing(Path::new("kernels/bc7e.ispc"));

        let (out, err) = reporter.into_inner();
        assert_eq!(text(out), "kernels/bc7e.ispc unable to get the file.\n");
        assert!(text(err).starts_with("warning[W0001]: template file not found"));
    }

    #[test]
    fn test_failure_detail_only_when_verbose() {
        let failed = result(BuildOutcome::Failed { code: Some(1) }, "bad isa");

        let mut quiet = ConsoleReporter::new(Vec::new(), Vec::new(), false, false);
        quiet.built(&failed);
        let (out, err) = quiet.into_inner();
        assert_eq!(text(out), "AVX2 failed to build\n");
        assert!(err.is_empty());

        let mut verbose = ConsoleReporter::new(Vec::new(), Vec::new(), true, false);
        verbose.built(&failed);
        let (_, err) = verbose.into_inner();
        let err = text(err);
        assert!(err.contains("compilation failed for target 'avx2'"));
        assert!(err.contains("bad isa"));
    }

    #[test]
    fn test_launch_failure_reports_failed_line() {
        let launch = result(
            BuildOutcome::LaunchFailed {
                reason: "No such file or directory".to_string(),
            },
            "",
        );
        let mut reporter = ConsoleReporter::new(Vec::new(), Vec::new(), true, false);
        reporter.built(&launch);
        let (out, err) = reporter.into_inner();
        assert_eq!(text(out), "AVX2 failed to build\n");
        assert!(text(err).contains("error[E0003]"));
    }

    #[test]
    fn test_success_line() {
        let ok = result(BuildOutcome::Succeeded, "");
        assert_eq!(build_line(&ok), "AVX2 build done");
    }
}
