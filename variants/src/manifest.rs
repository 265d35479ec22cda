//! TOML manifest parsing for `isagen.toml`.
//!
//! Every section is optional; anything left out falls back to the bc7e
//! defaults. Relative paths are resolved against the manifest's directory.

use crate::error::{Error, Result};
use crate::invoker::CompilerSettings;
use crate::layout::ArtifactLayout;
use crate::target::{ArchDescriptor, TargetTable};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Conventional manifest file name
pub const MANIFEST_FILE: &str = "isagen.toml";

/// Resolved configuration for one pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Config {
    pub layout: ArtifactLayout,
    pub compiler: CompilerSettings,
    pub targets: TargetTable,
}

impl Config {
    /// Read and validate a manifest, rooting relative paths at its directory.
    pub fn load(path: &Path) -> Result<Self> {
        let manifest_error = |message: String| Error::Manifest {
            path: path.to_path_buf(),
            message,
        };

        let content = std::fs::read_to_string(path)
            .map_err(|e| manifest_error(format!("failed to read: {}", e)))?;
        let mut config = parse_manifest(&content).map_err(manifest_error)?;

        let root = path.parent().unwrap_or_else(|| Path::new(""));
        config.layout = config.layout.rooted_at(root);
        log::debug!("loaded manifest {} ({} targets)", path.display(), config.targets.len());
        Ok(config)
    }
}

/// The raw TOML structure.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawManifest {
    template: Option<TemplateSection>,
    output: Option<OutputSection>,
    compiler: Option<CompilerSection>,
    #[serde(default, rename = "target")]
    targets: Vec<TargetEntry>,
}

/// `[template]` section.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TemplateSection {
    path: Option<PathBuf>,
}

/// `[output]` section. Patterns must contain `{target}`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct OutputSection {
    source: Option<String>,
    object: Option<String>,
    header: Option<String>,
}

/// `[compiler]` section.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct CompilerSection {
    program: Option<String>,
    opt_level: Option<String>,
    flags: Option<Vec<String>>,
}

/// One `[[target]]` entry: either `prefix` or both `lower` and `upper`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TargetEntry {
    name: String,
    prefix: Option<String>,
    lower: Option<[String; 2]>,
    upper: Option<[String; 2]>,
    isa: Option<String>,
}

impl TargetEntry {
    fn into_descriptor(self) -> std::result::Result<ArchDescriptor, String> {
        let descriptor = match (self.prefix, self.lower, self.upper) {
            (Some(prefix), None, None) => ArchDescriptor::with_prefix(self.name, &prefix),
            (None, Some([lower_old, lower_new]), Some([upper_old, upper_new])) => {
                ArchDescriptor::from_tokens(
                    self.name,
                    (
                        lower_old.as_str(),
                        lower_new.as_str(),
                        upper_old.as_str(),
                        upper_new.as_str(),
                    ),
                )
            }
            (Some(_), _, _) => {
                return Err(format!(
                    "target '{}': use either prefix or lower/upper, not both",
                    self.name
                ))
            }
            (None, _, _) => {
                return Err(format!(
                    "target '{}': needs a prefix or both lower and upper pairs",
                    self.name
                ))
            }
        };

        Ok(match self.isa {
            Some(isa) => descriptor.with_isa(isa),
            None => descriptor,
        })
    }
}

/// Parse an `isagen.toml` string into a `Config` (paths not yet rooted).
pub fn parse_manifest(content: &str) -> std::result::Result<Config, String> {
    let raw: RawManifest =
        toml::from_str(content).map_err(|e| format!("failed to parse {}: {}", MANIFEST_FILE, e))?;

    let mut layout = ArtifactLayout::default();
    if let Some(template) = raw.template.and_then(|t| t.path) {
        layout.template = template;
    }
    if let Some(output) = raw.output {
        if let Some(source) = output.source {
            layout.source_pattern = source;
        }
        if let Some(object) = output.object {
            layout.object_pattern = object;
        }
        if let Some(header) = output.header {
            layout.header_pattern = header;
        }
    }
    layout.validate().map_err(|e| e.to_string())?;

    let mut compiler = CompilerSettings::default();
    if let Some(section) = raw.compiler {
        if let Some(program) = section.program {
            compiler.program = program;
        }
        if let Some(opt_level) = section.opt_level {
            compiler.opt_level = opt_level;
        }
        if let Some(flags) = section.flags {
            compiler.flags = flags;
        }
    }
    if compiler.program.trim().is_empty() {
        return Err("compiler.program must not be empty".to_string());
    }

    let targets = if raw.targets.is_empty() {
        TargetTable::default()
    } else {
        let descriptors = raw
            .targets
            .into_iter()
            .map(TargetEntry::into_descriptor)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        TargetTable::new(descriptors).map_err(|e| e.to_string())?
    };

    Ok(Config {
        layout,
        compiler,
        targets,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_manifest_is_default() {
        let config = parse_manifest("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_parse_full_manifest() {
        let toml = r#"
[template]
path = "kernels/bc7e.ispc"

[output]
source = "gen/bc7e_{target}.ispc"
object = "obj/bc7e_{target}.o"
header = "include/bc7e_{target}.h"

[compiler]
program = "/opt/ispc/bin/ispc"
opt-level = "-O3"
flags = ["--opt=fast-math"]

[[target]]
name = "avx2"
lower = ["bc7e_", "bc7e_avx2_"]
upper = ["BC7E_", "BC7E_AVX2_"]
isa = "avx2-i32x8"

[[target]]
name = "neon"
prefix = "bc7e"
"#;
        let config = parse_manifest(toml).unwrap();
        assert_eq!(config.layout.template, PathBuf::from("kernels/bc7e.ispc"));
        assert_eq!(config.layout.object_pattern, "obj/bc7e_{target}.o");
        assert_eq!(config.compiler.program, "/opt/ispc/bin/ispc");
        assert_eq!(config.compiler.opt_level, "-O3");
        assert_eq!(config.compiler.flags, vec!["--opt=fast-math"]);

        assert_eq!(config.targets.names(), vec!["avx2", "neon"]);
        let avx2 = config.targets.get("avx2").unwrap();
        assert_eq!(avx2.compiler_target(), "avx2-i32x8");
        let neon = config.targets.get("neon").unwrap();
        assert_eq!(neon.upper.new, "BC7E_NEON_");
        assert_eq!(neon.lower.new, "bc7e_neon_");
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config = parse_manifest("[compiler]\nprogram = \"ispc-1.22\"\n").unwrap();
        assert_eq!(config.compiler.program, "ispc-1.22");
        assert_eq!(config.compiler.flags, CompilerSettings::default().flags);
        assert_eq!(config.layout, ArtifactLayout::default());
        assert_eq!(config.targets.len(), 4);
    }

    #[test]
    fn test_rejects_ambiguous_target() {
        let toml = r#"
[[target]]
name = "avx"
prefix = "bc7e"
lower = ["bc7e_", "bc7e_avx_"]
"#;
        let err = parse_manifest(toml).unwrap_err();
        assert!(err.contains("not both"), "{}", err);

        let err = parse_manifest("[[target]]\nname = \"avx\"\n").unwrap_err();
        assert!(err.contains("needs a prefix"), "{}", err);
    }

    #[test]
    fn test_rejects_misspelled_keys() {
        let err = parse_manifest("[compiler]\nopt_level = \"-O3\"\n").unwrap_err();
        assert!(err.contains("opt_level"), "{}", err);

        let err = parse_manifest("[templat]\npath = \"x.ispc\"\n").unwrap_err();
        assert!(err.contains("templat"), "{}", err);

        let err = parse_manifest("[output]\nsources = \"x_{target}.ispc\"\n").unwrap_err();
        assert!(err.contains("sources"), "{}", err);

        assert!(parse_manifest("[template]\nfile = \"x.ispc\"\n").is_err());
    }

    #[test]
    fn test_rejects_pattern_without_placeholder() {
        let err = parse_manifest("[output]\nheader = \"bc7e.h\"\n").unwrap_err();
        assert!(err.contains("{target}"), "{}", err);
    }

    #[test]
    fn test_rejects_duplicate_targets() {
        let toml = "[[target]]\nname = \"avx\"\nprefix = \"k\"\n[[target]]\nname = \"avx\"\nprefix = \"k\"\n";
        let err = parse_manifest(toml).unwrap_err();
        assert!(err.contains("duplicate"), "{}", err);
    }

    #[test]
    fn test_load_roots_paths_at_manifest_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MANIFEST_FILE);
        std::fs::write(&path, "[template]\npath = \"k.ispc\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.layout.template, dir.path().join("k.ispc"));
        let avx = config.targets.get("avx").unwrap();
        assert_eq!(
            config.layout.header_for(avx),
            dir.path().join("bc7e_ispc_avx.h")
        );
    }

    #[test]
    fn test_load_reports_missing_file() {
        let err = Config::load(Path::new("/nonexistent/isagen.toml")).unwrap_err();
        assert!(matches!(err, Error::Manifest { .. }));
    }
}
