//! Variant generation: one substituted copy of the template per target.

use crate::error::{Error, Result};
use crate::layout::ArtifactLayout;
use crate::report::Reporter;
use crate::target::{ArchDescriptor, TargetTable};
use std::fs;
use std::path::PathBuf;

/// A variant source written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    pub target: String,
    pub path: PathBuf,
}

/// Result of a generation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateOutcome {
    /// One artifact per target, in table order
    Generated(Vec<GeneratedArtifact>),
    /// The template was absent; nothing was written
    TemplateMissing(PathBuf),
}

impl GenerateOutcome {
    pub fn artifacts(&self) -> &[GeneratedArtifact] {
        match self {
            GenerateOutcome::Generated(artifacts) => artifacts,
            GenerateOutcome::TemplateMissing(_) => &[],
        }
    }

    pub fn is_template_missing(&self) -> bool {
        matches!(self, GenerateOutcome::TemplateMissing(_))
    }
}

/// Render one target's variant of the template.
pub fn render(template: &str, target: &ArchDescriptor) -> String {
    target.apply(template)
}

/// Writes the per-target variant sources described by a layout
pub struct VariantGenerator<'a> {
    layout: &'a ArtifactLayout,
}

impl<'a> VariantGenerator<'a> {
    pub fn new(layout: &'a ArtifactLayout) -> Self {
        Self { layout }
    }

    /// Generate every target's variant source.
    ///
    /// A missing template aborts the whole pass before anything is written.
    /// Any read or write failure after that is fatal for the run. Line
    /// endings are written back exactly as read.
    pub fn generate(
        &self,
        targets: &TargetTable,
        reporter: &mut dyn Reporter,
    ) -> Result<GenerateOutcome> {
        let template_path = &self.layout.template;

        if !template_path.exists() {
            log::warn!("template {} not found, skipping generation", template_path.display());
            reporter.template_missing(template_path);
            return Ok(GenerateOutcome::TemplateMissing(template_path.clone()));
        }

        let template = fs::read_to_string(template_path).map_err(|source| Error::ReadTemplate {
            path: template_path.clone(),
            source,
        })?;
        log::info!(
            "generating {} variants of {} ({} bytes)",
            targets.len(),
            template_path.display(),
            template.len()
        );

        let mut artifacts = Vec::with_capacity(targets.len());
        for target in targets {
            let path = self.layout.source_for(target);
            let contents = render(&template, target);

            fs::write(&path, &contents).map_err(|source| Error::WriteArtifact {
                path: path.clone(),
                source,
            })?;
            log::debug!("wrote {} ({} bytes)", path.display(), contents.len());

            let artifact = GeneratedArtifact {
                target: target.name.clone(),
                path,
            };
            reporter.generated(&artifact);
            artifacts.push(artifact);
        }

        Ok(GenerateOutcome::Generated(artifacts))
    }
}
