//! Generate-then-compile orchestration.
//!
//! Generation always runs to completion before the first compiler
//! invocation. A missing template skips generation but the build stage
//! still runs, against whatever variant sources already exist.

use crate::error::Result;
use crate::generator::{GenerateOutcome, GeneratedArtifact, VariantGenerator};
use crate::invoker::{BuildResult, CommandRunner, CompilerInvocation, CompilerInvoker};
use crate::manifest::Config;
use crate::report::Reporter;

/// What a pipeline run produced
#[derive(Debug, Clone, Default)]
pub struct PipelineSummary {
    /// `None` when the generation stage did not run
    pub generation: Option<GenerateOutcome>,
    /// One entry per target, empty when the build stage did not run
    pub builds: Vec<BuildResult>,
}

impl PipelineSummary {
    pub fn generated(&self) -> &[GeneratedArtifact] {
        self.generation
            .as_ref()
            .map(GenerateOutcome::artifacts)
            .unwrap_or(&[])
    }

    pub fn template_missing(&self) -> bool {
        self.generation
            .as_ref()
            .is_some_and(GenerateOutcome::is_template_missing)
    }

    pub fn failed_targets(&self) -> Vec<&str> {
        self.builds
            .iter()
            .filter(|r| !r.succeeded())
            .map(|r| r.target.as_str())
            .collect()
    }

    pub fn all_succeeded(&self) -> bool {
        self.builds.iter().all(BuildResult::succeeded)
    }
}

/// The two-stage variant pipeline
pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Generate all variants, then compile all targets.
    pub fn run(
        &self,
        runner: &mut dyn CommandRunner,
        reporter: &mut dyn Reporter,
    ) -> Result<PipelineSummary> {
        let generation = self.generate(reporter)?;
        let builds = self.build(runner, reporter);
        Ok(PipelineSummary {
            generation: Some(generation),
            builds,
        })
    }

    /// Generation stage only.
    pub fn generate(&self, reporter: &mut dyn Reporter) -> Result<GenerateOutcome> {
        VariantGenerator::new(&self.config.layout).generate(&self.config.targets, reporter)
    }

    /// Build stage only.
    pub fn build(
        &self,
        runner: &mut dyn CommandRunner,
        reporter: &mut dyn Reporter,
    ) -> Vec<BuildResult> {
        CompilerInvoker::new(&self.config.compiler, &self.config.layout).build_all(
            &self.config.targets,
            runner,
            reporter,
        )
    }

    /// Compiler invocations the build stage would run.
    pub fn plan(&self) -> Vec<CompilerInvocation> {
        CompilerInvoker::new(&self.config.compiler, &self.config.layout).plan(&self.config.targets)
    }

    /// Report what `run` would write and execute, touching nothing.
    pub fn dry_run(&self, generate: bool, build: bool, reporter: &mut dyn Reporter) {
        if generate {
            for target in &self.config.targets {
                reporter.planned_write(&target.name, &self.config.layout.source_for(target));
            }
        }
        if build {
            for invocation in self.plan() {
                reporter.planned_command(&invocation);
            }
        }
    }
}
