//! Per-instruction-set kernel variants.
//!
//! Takes one ispc kernel template, writes a copy per target instruction set
//! with the symbol prefixes rewritten (`bc7e_` -> `bc7e_avx2_`, ...), then
//! compiles each copy with the external compiler into an object file and a
//! header.
//!
//! ```rust,ignore
//! use variants::{Config, ConsoleReporter, Pipeline, SystemRunner};
//!
//! let pipeline = Pipeline::new(Config::default());
//! let mut reporter = ConsoleReporter::stdio(false, false);
//! let summary = pipeline.run(&mut SystemRunner, &mut reporter)?;
//! println!("failed: {:?}", summary.failed_targets());
//! ```

pub mod error;
pub mod generator;
pub mod invoker;
pub mod layout;
pub mod logging;
pub mod manifest;
pub mod pipeline;
pub mod report;
pub mod target;

pub use error::{Error, Result};
pub use generator::{render, GenerateOutcome, GeneratedArtifact, VariantGenerator};
pub use invoker::{
    BuildOutcome, BuildResult, CapturedOutput, CommandRunner, CompilerInvocation, CompilerInvoker,
    CompilerSettings, SystemRunner,
};
pub use layout::{ArtifactLayout, ArtifactPaths};
pub use manifest::{parse_manifest, Config, MANIFEST_FILE};
pub use pipeline::{Pipeline, PipelineSummary};
pub use report::{ConsoleReporter, Reporter};
pub use target::{ArchDescriptor, TargetTable, TokenPair};
