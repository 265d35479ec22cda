//! isagen - per-ISA kernel variant generator
//!
//! # Usage
//!
//! ```bash
//! # Generate the bc7e variants and compile them with ispc
//! isagen
//!
//! # Use an isagen.toml manifest instead of the built-in bc7e layout
//! isagen --manifest kernels/isagen.toml
//!
//! # Only write the variant sources
//! isagen generate
//!
//! # Show the compiler command lines without running anything
//! isagen build --dry-run
//! ```

use clap::{Parser, Subcommand};
use diagnostics::pipeline::PipelineDiagnostics;
use diagnostics::ErrorFormatter;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;
use variants::{Config, ConsoleReporter, Pipeline, PipelineSummary, SystemRunner};

#[derive(Parser)]
#[command(name = "isagen")]
#[command(version)]
#[command(about = "Generate per-ISA variants of an ispc kernel and compile them", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Load configuration from an isagen.toml manifest
    #[arg(short, long, global = true)]
    manifest: Option<PathBuf>,

    /// Verbose logging and failure detail
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print compiler command lines instead of running them
    #[arg(long, global = true)]
    dry_run: bool,

    /// Exit with status 1 if any target failed to build
    #[arg(long, global = true)]
    strict: bool,

    /// Disable colored diagnostics
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand, Clone, Copy)]
enum Commands {
    /// Generate variants, then compile them (default)
    All,
    /// Only generate the per-target variant sources
    Generate,
    /// Only compile existing variant sources
    Build,
    /// List configured targets and their token substitutions
    Targets,
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        variants::logging::init_with_level(log::LevelFilter::Debug);
    } else {
        variants::logging::init_from_env();
    }

    let colors = !cli.no_color && std::io::stderr().is_terminal();

    match run(&cli, colors) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            let diagnostic = match &e {
                variants::Error::Manifest { path, message } => {
                    PipelineDiagnostics::config_error(message, Some(path.as_path()))
                }
                other => PipelineDiagnostics::fatal(&other.to_string()),
            };
            let formatter = if colors {
                ErrorFormatter::with_colors()
            } else {
                ErrorFormatter::new()
            };
            eprint!("{}", formatter.format_diagnostic(&diagnostic));
            process::exit(1);
        }
    }
}

/// Returns `Ok(false)` when `--strict` is set and a target failed.
fn run(cli: &Cli, colors: bool) -> variants::Result<bool> {
    let config = match &cli.manifest {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let pipeline = Pipeline::new(config);
    let (generate, build) = match cli.command.unwrap_or(Commands::All) {
        Commands::All => (true, true),
        Commands::Generate => (true, false),
        Commands::Build => (false, true),
        Commands::Targets => {
            show_targets(pipeline.config());
            return Ok(true);
        }
    };
    let mut reporter = ConsoleReporter::stdio(cli.verbose, colors);

    if cli.dry_run {
        pipeline.dry_run(generate, build, &mut reporter);
        return Ok(true);
    }

    let summary = match (generate, build) {
        (true, false) => PipelineSummary {
            generation: Some(pipeline.generate(&mut reporter)?),
            builds: Vec::new(),
        },
        (false, _) => PipelineSummary {
            generation: None,
            builds: pipeline.build(&mut SystemRunner, &mut reporter),
        },
        (true, true) => pipeline.run(&mut SystemRunner, &mut reporter)?,
    };

    let failed = summary.failed_targets();
    if !failed.is_empty() {
        log::info!(
            "{} of {} targets failed: {}",
            failed.len(),
            summary.builds.len(),
            failed.join(", ")
        );
        if cli.strict {
            return Ok(false);
        }
    }

    Ok(true)
}

fn show_targets(config: &Config) {
    println!("template: {}", config.layout.template.display());
    println!("compiler: {}", config.compiler.program);
    for target in config.targets.iter() {
        println!(
            "  {:<8} {} -> {}  {} -> {}  --target {}",
            target.name,
            target.lower.old,
            target.lower.new,
            target.upper.old,
            target.upper.new,
            target.compiler_target()
        );
    }
}
