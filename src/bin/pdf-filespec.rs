//! PDF file specification checker
//!
//! A command-line tool for validating the file specifications of PDF files.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use glob::glob;
use log::{info, warn};
use std::path::PathBuf;
use std::process;

use pdf_filespec::validate::{collect_file_specs, validate_file, ValidationContext, ValidationOptions};
use pdf_filespec::version::{PdfVersion, ValidationMode};

/// PDF File Spec - Check file specifications, embedded files and URL specifications
#[derive(Parser)]
#[command(name = "pdf-filespec")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Check every PDF in the current directory
    pdf-filespec check \"*.pdf\"

    # Check against PDF 1.7 rules, without relaxed exceptions
    pdf-filespec check --strict --pdf-version 1.7 report.pdf

    # Show the file specifications of a document
    pdf-filespec list report.pdf")]
struct Cli {
    /// Log progress (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the file specifications of PDF files
    Check {
        /// Input PDF files. Supports glob patterns like "*.pdf"
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Apply strict conformance rules
        #[arg(long)]
        strict: bool,

        /// Validate as this PDF version instead of the declared one (e.g. "1.7")
        #[arg(long)]
        pdf_version: Option<PdfVersion>,
    },

    /// List the file specifications of a PDF file
    List {
        /// PDF file to inspect
        input: PathBuf,

        /// Apply strict conformance rules
        #[arg(long)]
        strict: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let result = match cli.command {
        Commands::Check { inputs, strict, pdf_version } => cmd_check(inputs, options(strict, pdf_version)),
        Commands::List { input, strict } => cmd_list(input, options(strict, None)),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn options(strict: bool, version_override: Option<PdfVersion>) -> ValidationOptions {
    let mode = if strict { ValidationMode::Strict } else { ValidationMode::Relaxed };
    ValidationOptions { mode, version_override }
}

/// Expand glob patterns in input paths
fn expand_globs(patterns: Vec<String>) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for pattern in patterns {
        // Check if pattern contains glob characters
        if pattern.contains('*') || pattern.contains('?') || pattern.contains('[') {
            let mut matched = false;
            for entry in glob(&pattern).with_context(|| format!("Invalid pattern: {}", pattern))? {
                match entry {
                    Ok(path) => {
                        paths.push(path);
                        matched = true;
                    }
                    Err(e) => warn!("glob error for {}: {}", pattern, e),
                }
            }
            if !matched {
                return Err(anyhow!("No files matched pattern: {}", pattern));
            }
        } else {
            // No glob characters, treat as literal path
            paths.push(PathBuf::from(pattern));
        }
    }

    // Sort paths for consistent ordering
    paths.sort();

    Ok(paths)
}

/// Validate each input, reporting the first error per file
fn cmd_check(inputs: Vec<String>, options: ValidationOptions) -> Result<()> {
    // Expand glob patterns
    let inputs = expand_globs(inputs)?;
    info!("Checking {} PDF files", inputs.len());

    // Keep going after a failure so every file gets a verdict
    let mut failed = 0;
    for path in &inputs {
        match validate_file(path, &options) {
            Ok(count) => println!("{}: OK ({} file specifications)", path.display(), count),
            Err(e) => {
                println!("{}: {}", path.display(), e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(anyhow!("{} of {} files failed validation", failed, inputs.len()));
    }
    Ok(())
}

/// Print every file specification found in a document
fn cmd_list(input: PathBuf, options: ValidationOptions) -> Result<()> {
    if !input.exists() {
        return Err(anyhow!("Input file not found: {}", input.display()));
    }

    // Load and locate, then validate each site independently
    let doc = lopdf::Document::load(&input).with_context(|| format!("Failed to load {}", input.display()))?;
    let ctx = ValidationContext::for_document(&doc, &options)?;
    let root = doc.trailer.get(b"Root").context("No Root in trailer")?;

    let sites = collect_file_specs(&ctx, root)?;
    println!("PDF {}: {} file specifications", ctx.version(), sites.len());
    for site in &sites {
        let name = site.file_name(&ctx).unwrap_or_else(|| "-".to_string());
        let status = match site.validate(&ctx) {
            Ok(()) => "ok".to_string(),
            Err(e) => e.to_string(),
        };
        println!("  {}: {} [{}]", site, name, status);
    }

    Ok(())
}
