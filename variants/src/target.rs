//! Architecture descriptors and the target table.
//!
//! A descriptor names one instruction-set variant and the literal tokens
//! that are rewritten in the template to give that variant its own symbol
//! prefix, e.g. `bc7e_` -> `bc7e_avx2_` and `BC7E_` -> `BC7E_AVX2_`.

use crate::error::{Error, Result};

/// A literal find/replace pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub old: String,
    pub new: String,
}

impl TokenPair {
    pub fn new(old: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            old: old.into(),
            new: new.into(),
        }
    }
}

/// One configured target instruction set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchDescriptor {
    /// Target name, used in artifact paths and status lines
    pub name: String,
    /// Lowercase symbol prefix substitution
    pub lower: TokenPair,
    /// Uppercase symbol prefix substitution
    pub upper: TokenPair,
    /// Value passed to the compiler's `--target` (defaults to `name`)
    pub isa: Option<String>,
}

impl ArchDescriptor {
    /// Build from the `(lower_old, lower_new, upper_old, upper_new)` tuple.
    pub fn from_tokens(
        name: impl Into<String>,
        (lower_old, lower_new, upper_old, upper_new): (&str, &str, &str, &str),
    ) -> Self {
        Self {
            name: name.into(),
            lower: TokenPair::new(lower_old, lower_new),
            upper: TokenPair::new(upper_old, upper_new),
            isa: None,
        }
    }

    /// Derive all four tokens from a symbol prefix.
    ///
    /// `with_prefix("avx2", "bc7e")` rewrites `bc7e_` to `bc7e_avx2_` and
    /// `BC7E_` to `BC7E_AVX2_`.
    pub fn with_prefix(name: impl Into<String>, prefix: &str) -> Self {
        let name = name.into();
        let lower_old = format!("{}_", prefix.to_lowercase());
        let lower_new = format!("{}{}_", lower_old, name.to_lowercase());
        let upper_old = format!("{}_", prefix.to_uppercase());
        let upper_new = format!("{}{}_", upper_old, name.to_uppercase());
        Self {
            lower: TokenPair::new(lower_old, lower_new),
            upper: TokenPair::new(upper_old, upper_new),
            name,
            isa: None,
        }
    }

    pub fn with_isa(mut self, isa: impl Into<String>) -> Self {
        self.isa = Some(isa.into());
        self
    }

    /// The compiler target string for this variant.
    pub fn compiler_target(&self) -> &str {
        self.isa.as_deref().unwrap_or(&self.name)
    }

    /// Name as shown in build status lines (`AVX2 build done`).
    pub fn display_name(&self) -> String {
        self.name.to_uppercase()
    }

    /// Apply this descriptor's substitutions to the template text.
    ///
    /// The uppercase pair is replaced first, then the lowercase pair.
    pub fn apply(&self, template: &str) -> String {
        template
            .replace(&self.upper.old, &self.upper.new)
            .replace(&self.lower.old, &self.lower.new)
    }

    /// Reject names that are empty or would escape the artifact directory
    /// once spliced into a path pattern, and tokens that are empty.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| Error::InvalidTarget {
            name: self.name.clone(),
            reason: reason.to_string(),
        };

        if self.name.trim().is_empty() {
            return Err(invalid("name must not be empty"));
        }
        if self.name.contains(['/', '\\']) || self.name.contains("..") {
            return Err(invalid("name must not contain path separators or '..'"));
        }
        if self.lower.old.is_empty() || self.upper.old.is_empty() {
            return Err(invalid("replacement tokens must not be empty"));
        }
        if matches!(&self.isa, Some(isa) if isa.trim().is_empty()) {
            return Err(invalid("isa must not be empty"));
        }
        Ok(())
    }
}

/// Ordered, validated set of descriptors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetTable {
    targets: Vec<ArchDescriptor>,
}

impl TargetTable {
    /// Validate descriptors and reject duplicate names.
    pub fn new(targets: Vec<ArchDescriptor>) -> Result<Self> {
        for (i, target) in targets.iter().enumerate() {
            target.validate()?;
            if targets[..i].iter().any(|t| t.name == target.name) {
                return Err(Error::InvalidTarget {
                    name: target.name.clone(),
                    reason: "duplicate target name".to_string(),
                });
            }
        }
        Ok(Self { targets })
    }

    /// The four x86 variants of the bc7e encoder.
    pub fn bc7e() -> Self {
        Self {
            targets: vec![
                ArchDescriptor::from_tokens("avx", ("bc7e_", "bc7e_avx_", "BC7E_", "BC7E_AVX_")),
                ArchDescriptor::from_tokens("avx2", ("bc7e_", "bc7e_avx2_", "BC7E_", "BC7E_AVX2_")),
                ArchDescriptor::from_tokens("sse2", ("bc7e_", "bc7e_sse2_", "BC7E_", "BC7E_SSE2_")),
                ArchDescriptor::from_tokens("sse4", ("bc7e_", "bc7e_sse4_", "BC7E_", "BC7E_SSE4_")),
            ],
        }
    }

    pub fn get(&self, name: &str) -> Option<&ArchDescriptor> {
        self.targets.iter().find(|t| t.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ArchDescriptor> {
        self.targets.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.targets.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl Default for TargetTable {
    fn default() -> Self {
        Self::bc7e()
    }
}

impl<'a> IntoIterator for &'a TargetTable {
    type Item = &'a ArchDescriptor;
    type IntoIter = std::slice::Iter<'a, ArchDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.targets.iter()
    }
}
