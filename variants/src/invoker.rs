//! External compiler invocation, one process per target.
//!
//! Each target is compiled with a fixed argument template:
//!
//! ```text
//! ispc -O2 <source> -o <object> -h <header> --target <isa> <flags...>
//! ```
//!
//! Output is captured, never streamed. A failing target is reported and the
//! loop moves on; no retries, no timeout, no parallelism.

use crate::layout::ArtifactLayout;
use crate::report::Reporter;
use crate::target::{ArchDescriptor, TargetTable};
use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::process::Command;

/// Compiler executable and the flags shared by every target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerSettings {
    /// Executable name (resolved via PATH) or path
    pub program: String,
    /// Optimisation flag placed before the source path
    pub opt_level: String,
    /// Extra flags appended after `--target`
    pub flags: Vec<String>,
}

impl CompilerSettings {
    /// `ispc -O2 ... -O2 --opt=fast-math --opt=disable-assertions`
    pub fn ispc() -> Self {
        Self {
            program: "ispc".to_string(),
            opt_level: "-O2".to_string(),
            flags: vec![
                "-O2".to_string(),
                "--opt=fast-math".to_string(),
                "--opt=disable-assertions".to_string(),
            ],
        }
    }
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self::ispc()
    }
}

/// A fully resolved compiler command for one target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerInvocation {
    pub target: String,
    pub program: String,
    pub opt_level: String,
    pub source: PathBuf,
    pub object: PathBuf,
    pub header: PathBuf,
    pub isa: String,
    pub flags: Vec<String>,
}

impl CompilerInvocation {
    /// Argument vector, without the program name.
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            self.opt_level.clone().into(),
            self.source.clone().into(),
            "-o".into(),
            self.object.clone().into(),
            "-h".into(),
            self.header.clone().into(),
            "--target".into(),
            self.isa.clone().into(),
        ];
        args.extend(self.flags.iter().map(OsString::from));
        args
    }

    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(self.args());
        cmd
    }

    /// Human-readable command line for logs and dry runs.
    pub fn command_line(&self) -> String {
        format_command(&self.to_command())
    }
}

/// Exit status and captured streams of a finished child process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedOutput {
    /// Exit code; `None` when terminated by a signal
    pub code: Option<i32>,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Runs an external command to completion and captures its output
pub trait CommandRunner {
    /// `Err` means the process could not be started.
    fn run(&mut self, program: &str, args: &[OsString]) -> io::Result<CapturedOutput>;
}

/// Runs commands with `std::process::Command`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&mut self, program: &str, args: &[OsString]) -> io::Result<CapturedOutput> {
        let output = Command::new(program).args(args).output()?;
        Ok(CapturedOutput {
            code: output.status.code(),
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Outcome of one target's compilation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    /// Exit code 0
    Succeeded,
    /// The compiler ran and returned a failure status
    Failed { code: Option<i32> },
    /// The compiler could not be started (not on PATH, not executable, ...)
    LaunchFailed { reason: String },
}

/// Per-target build result; kept in memory, never persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildResult {
    pub target: String,
    /// Uppercased name used in status lines
    pub display_name: String,
    pub invocation: CompilerInvocation,
    pub outcome: BuildOutcome,
    /// Captured output, absent when the process never started
    pub output: Option<CapturedOutput>,
}

impl BuildResult {
    pub fn succeeded(&self) -> bool {
        self.outcome == BuildOutcome::Succeeded
    }
}

/// Compiles each target's generated source
pub struct CompilerInvoker<'a> {
    settings: &'a CompilerSettings,
    layout: &'a ArtifactLayout,
}

impl<'a> CompilerInvoker<'a> {
    pub fn new(settings: &'a CompilerSettings, layout: &'a ArtifactLayout) -> Self {
        Self { settings, layout }
    }

    pub fn invocation_for(&self, target: &ArchDescriptor) -> CompilerInvocation {
        let paths = self.layout.paths_for(target);
        CompilerInvocation {
            target: target.name.clone(),
            program: self.settings.program.clone(),
            opt_level: self.settings.opt_level.clone(),
            source: paths.source,
            object: paths.object,
            header: paths.header,
            isa: target.compiler_target().to_string(),
            flags: self.settings.flags.clone(),
        }
    }

    /// Every invocation `build_all` would run, in order.
    pub fn plan(&self, targets: &TargetTable) -> Vec<CompilerInvocation> {
        targets.iter().map(|t| self.invocation_for(t)).collect()
    }

    /// Compile one target. Never fails: launch errors become `LaunchFailed`.
    pub fn build_one(
        &self,
        target: &ArchDescriptor,
        runner: &mut dyn CommandRunner,
    ) -> BuildResult {
        let invocation = self.invocation_for(target);
        log::debug!("running: {}", invocation.command_line());

        let (outcome, output) = match runner.run(&invocation.program, &invocation.args()) {
            Ok(output) => {
                if !output.stdout.is_empty() {
                    log::trace!("[{}] stdout:\n{}", target.name, output.stdout);
                }
                if !output.stderr.is_empty() {
                    log::trace!("[{}] stderr:\n{}", target.name, output.stderr);
                }
                let outcome = if output.success {
                    BuildOutcome::Succeeded
                } else {
                    BuildOutcome::Failed { code: output.code }
                };
                (outcome, Some(output))
            }
            Err(e) => {
                log::warn!("failed to launch {}: {}", invocation.program, e);
                (BuildOutcome::LaunchFailed { reason: e.to_string() }, None)
            }
        };

        BuildResult {
            target: target.name.clone(),
            display_name: target.display_name(),
            invocation,
            outcome,
            output,
        }
    }

    /// Compile every target in order; one failure never stops the others.
    pub fn build_all(
        &self,
        targets: &TargetTable,
        runner: &mut dyn CommandRunner,
        reporter: &mut dyn Reporter,
    ) -> Vec<BuildResult> {
        log::info!("compiling {} targets with {}", targets.len(), self.settings.program);

        let mut results = Vec::with_capacity(targets.len());
        for target in targets {
            let result = self.build_one(target, runner);
            reporter.built(&result);
            results.push(result);
        }
        results
    }
}

/// Format a command for display
pub fn format_command(cmd: &Command) -> String {
    let prog = cmd.get_program().to_string_lossy().to_string();
    let args: Vec<_> = cmd
        .get_args()
        .map(|a| a.to_string_lossy().to_string())
        .collect();
    format!("{} {}", prog, args.join(" "))
}
