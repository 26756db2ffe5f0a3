use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use miette::{IntoDiagnostic, Result, WrapErr};
use tracing_subscriber::EnvFilter;

use docgenny_core::{split_patterns, DocgenConfig, NestedFunctionPolicy, OutputFormat};
use docgenny_scan::{generate_docs, scan, GenerateOptions};

#[derive(Parser)]
#[command(
    name = "docgenny",
    version,
    disable_version_flag = true,
    about = "Generate technical documentation from a codebase",
    long_about = "Generate technical documentation from a codebase.\n\n\
                   Scans Python files with a tree-sitter grammar and JavaScript, TypeScript\n\
                   and Svelte files with pattern heuristics, then writes a single report with\n\
                   the project tree, models and functions.\n\n\
                   Examples:\n  \
                     docgenny                              Document the current directory\n  \
                     docgenny ./backend -o API.md          Custom output file\n  \
                     docgenny . --exclude fixtures,mocks   Skip extra directories\n  \
                     docgenny . --format json -o docs.json Machine-readable output"
)]
struct Cli {
    /// Root directory to scan (default: current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Output file, written relative to the scanned root (default: TECHNICAL_DOCS.md)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Extra include patterns, comma-separated (e.g. "*.rs,Makefile")
    #[arg(long)]
    include: Option<String>,

    /// Extra ignore patterns, comma-separated (e.g. "fixtures,*.tmp")
    #[arg(long)]
    exclude: Option<String>,

    /// Output format: markdown or json (default: markdown)
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Path to configuration file (default: <PATH>/.docgenny.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Only skip Python functions that are nested inside a class
    #[arg(long)]
    strict_nesting: bool,

    /// Enable verbose output
    #[arg(long)]
    verbose: bool,

    /// Print version
    #[arg(short = 'v', long, short_alias = 'V', action = clap::ArgAction::Version)]
    version: Option<bool>,
}

fn main() -> ExitCode {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .expect("miette handler");
    human_panic::setup_panic!();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(report) => {
            if cli.verbose {
                eprintln!("{report:?}");
            } else {
                eprintln!("Error: {report}");
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    scan::validate_root(&cli.path).into_diagnostic()?;

    let config = DocgenConfig::load(&cli.path, cli.config.as_deref())
        .into_diagnostic()
        .wrap_err("failed to load configuration")?;
    let options = resolve_options(cli, config);

    println!("Generating documentation for: {}", display_root(&cli.path));

    let summary = generate_docs(&cli.path, &options)
        .into_diagnostic()
        .wrap_err("documentation generation failed")?;

    println!("✓ Documentation generated: {}", summary.output_path.display());
    println!("  - {} models documented", summary.models);
    println!("  - {} functions documented", summary.functions);
    println!("  - {} files in tree", summary.tree_lines);

    if cli.verbose {
        println!();
        println!("Models: {}", summary.models);
        println!("Functions: {}", summary.functions);
        println!("Files: {}", summary.tree_lines);
        if summary.files_failed > 0 {
            println!("Skipped: {}", summary.files_failed);
        }
    }

    Ok(())
}

/// Layer CLI flags over the loaded configuration.
fn resolve_options(cli: &Cli, mut config: DocgenConfig) -> GenerateOptions {
    if let Some(format) = cli.format {
        config.format = format;
    }
    if cli.strict_nesting {
        config.nested_functions = NestedFunctionPolicy::EnclosingClass;
    }
    if let Some(include) = &cli.include {
        config.include.extend(split_patterns(include));
    }
    if let Some(exclude) = &cli.exclude {
        config.exclude.extend(split_patterns(exclude));
    }

    let mut options = GenerateOptions::from_config(&config);
    if let Some(output) = &cli.output {
        options.output = output.clone();
    }
    options
}

fn display_root(path: &Path) -> String {
    path.canonicalize()
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}
