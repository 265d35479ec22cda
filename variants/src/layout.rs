//! Artifact paths derived from a target name.

use crate::error::{Error, Result};
use crate::target::ArchDescriptor;
use std::path::{Path, PathBuf};

/// Placeholder replaced by the target name in path patterns
pub const TARGET_PLACEHOLDER: &str = "{target}";

/// Where the template lives and where each target's artifacts go
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLayout {
    /// The single template all variants are derived from
    pub template: PathBuf,
    /// Generated variant source, e.g. `bc7e_{target}.ispc`
    pub source_pattern: String,
    /// Compiler object output, e.g. `bc7e_{target}.obj`
    pub object_pattern: String,
    /// Compiler header output, e.g. `bc7e_ispc_{target}.h`
    pub header_pattern: String,
}

/// Resolved paths for one target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub source: PathBuf,
    pub object: PathBuf,
    pub header: PathBuf,
}

impl ArtifactLayout {
    pub fn new(
        template: impl Into<PathBuf>,
        source_pattern: impl Into<String>,
        object_pattern: impl Into<String>,
        header_pattern: impl Into<String>,
    ) -> Result<Self> {
        let layout = Self {
            template: template.into(),
            source_pattern: source_pattern.into(),
            object_pattern: object_pattern.into(),
            header_pattern: header_pattern.into(),
        };
        layout.validate()?;
        Ok(layout)
    }

    /// Layout of the bc7enc_rdo checkout used by the default configuration.
    pub fn bc7e() -> Self {
        Self {
            template: PathBuf::from("../extern/bc7enc_rdo/bc7e.ispc"),
            source_pattern: "../extern/bc7enc_rdo/bc7e_{target}.ispc".to_string(),
            object_pattern: "../build/bc7e_{target}.obj".to_string(),
            header_pattern: "bc7e_ispc_{target}.h".to_string(),
        }
    }

    /// Every pattern must name the target, otherwise two targets would
    /// share (and overwrite) one artifact.
    pub fn validate(&self) -> Result<()> {
        for pattern in [
            &self.source_pattern,
            &self.object_pattern,
            &self.header_pattern,
        ] {
            if !pattern.contains(TARGET_PLACEHOLDER) {
                return Err(Error::InvalidLayout {
                    pattern: pattern.clone(),
                });
            }
        }
        Ok(())
    }

    /// Resolve the template and every pattern against `root`.
    ///
    /// Absolute paths are left as they are.
    pub fn rooted_at(&self, root: &Path) -> Self {
        let join = |pattern: &str| {
            if Path::new(pattern).is_absolute() {
                pattern.to_string()
            } else {
                root.join(pattern).to_string_lossy().into_owned()
            }
        };
        Self {
            template: root.join(&self.template),
            source_pattern: join(&self.source_pattern),
            object_pattern: join(&self.object_pattern),
            header_pattern: join(&self.header_pattern),
        }
    }

    pub fn source_for(&self, target: &ArchDescriptor) -> PathBuf {
        expand(&self.source_pattern, &target.name)
    }

    pub fn object_for(&self, target: &ArchDescriptor) -> PathBuf {
        expand(&self.object_pattern, &target.name)
    }

    pub fn header_for(&self, target: &ArchDescriptor) -> PathBuf {
        expand(&self.header_pattern, &target.name)
    }

    pub fn paths_for(&self, target: &ArchDescriptor) -> ArtifactPaths {
        ArtifactPaths {
            source: self.source_for(target),
            object: self.object_for(target),
            header: self.header_for(target),
        }
    }
}

impl Default for ArtifactLayout {
    fn default() -> Self {
        Self::bc7e()
    }
}

fn expand(pattern: &str, name: &str) -> PathBuf {
    PathBuf::from(pattern.replace(TARGET_PLACEHOLDER, name))
}
