//! erscribe CLI Tool
//!
//! Command-line interface for turning requirement text into a relational
//! schema and a Mermaid ER diagram, and for checking or repairing existing
//! diagram markup. Every input argument accepts `-` for standard input.

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use erscribe::diagram::{self, ValidationReport};
use erscribe::{Pipeline, PipelineConfig};
use erscribe_cli::{load_config, parse_schema, read_input, to_json, write_output, write_run_outputs};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "erscribe")]
#[command(about = "Infer relational schemas and ER diagrams from requirement text")]
#[command(version = "0.1.0")]
struct Cli {
    /// Configuration file (default: config/erscribe.toml, then ERSCRIBE__* env vars)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet output (errors only)
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract candidate entities, attributes and relationships as JSON
    Extract {
        /// Requirement text file, or - for stdin
        input: PathBuf,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Synthesize a relational schema as JSON
    Schema {
        /// Requirement text file, or - for stdin
        input: PathBuf,

        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Schema name (overrides the configured default)
        #[arg(long)]
        name: Option<String>,
    },

    /// Render a Mermaid ER diagram
    Diagram {
        /// Requirement text file (or schema JSON with --from-schema), or - for stdin
        input: PathBuf,

        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Treat the input as a schema JSON document
        #[arg(long)]
        from_schema: bool,
    },

    /// Validate diagram markup; exits with 1 when it has errors
    Validate {
        /// Markup file, or - for stdin
        input: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Repair diagram markup
    Repair {
        /// Markup file, or - for stdin
        input: PathBuf,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run the whole pipeline, writing schema.json and diagram.mmd
    Run {
        /// Requirement text file, or - for stdin
        input: PathBuf,

        /// Output directory
        #[arg(long, default_value = "erscribe-out")]
        out_dir: PathBuf,

        /// Schema name (overrides the configured default)
        #[arg(long)]
        name: Option<String>,
    },
}

fn main() {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    // Initialize logging
    if cli.quiet {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("error")).init();
    } else if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {:#}", "❌ Error:".red(), e);
            process::exit(1);
        }
    };

    let quiet = cli.quiet;
    let result = match cli.command {
        Commands::Extract { input, output } => {
            handle_extract(config, &input, output.as_deref()).map(|_| true)
        }
        Commands::Schema {
            input,
            output,
            name,
        } => handle_schema(with_name(config, name), &input, output.as_deref()).map(|_| true),
        Commands::Diagram {
            input,
            output,
            from_schema,
        } => handle_diagram(config, &input, output.as_deref(), from_schema).map(|_| true),
        Commands::Validate { input, json } => handle_validate(&config, &input, json, quiet),
        Commands::Repair { input, output } => {
            handle_repair(&input, output.as_deref()).map(|_| true)
        }
        Commands::Run {
            input,
            out_dir,
            name,
        } => handle_run(with_name(config, name), &input, &out_dir, quiet).map(|_| true),
    };

    match result {
        Ok(true) => {
            if !quiet {
                eprintln!("{}", "✅ Success".green());
            }
            process::exit(0);
        }
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("{} {:#}", "❌ Error:".red(), e);
            process::exit(1);
        }
    }
}

fn with_name(mut config: PipelineConfig, name: Option<String>) -> PipelineConfig {
    if let Some(name) = name {
        config.schema.default_name = name;
    }
    config
}

fn handle_extract(config: PipelineConfig, input: &Path, output: Option<&Path>) -> Result<()> {
    let text = read_input(input)?;
    let extraction = Pipeline::new(config).extract(&text);
    if extraction.is_empty() {
        log::warn!("no concepts found in {}", input.display());
    }
    write_output(&to_json(&extraction)?, output)
}

fn handle_schema(config: PipelineConfig, input: &Path, output: Option<&Path>) -> Result<()> {
    let text = read_input(input)?;
    let pipeline = Pipeline::new(config);
    let (schema, report) = pipeline.synthesize(&pipeline.extract(&text));
    for dropped in &report.dropped_relationships {
        eprintln!(
            "{} dropped {} -> {}: {}",
            "⚠️".yellow(),
            dropped.source_entity,
            dropped.target_entity,
            dropped.reason
        );
    }
    write_output(&to_json(&schema)?, output)
}

fn handle_diagram(
    config: PipelineConfig,
    input: &Path,
    output: Option<&Path>,
    from_schema: bool,
) -> Result<()> {
    let content = read_input(input)?;
    let pipeline = Pipeline::new(config);
    let rendered = if from_schema {
        pipeline.render(&parse_schema(&content)?)
    } else {
        pipeline.run(&content).diagram
    };
    write_output(&rendered.markup, output)
}

fn handle_validate(config: &PipelineConfig, input: &Path, json: bool, quiet: bool) -> Result<bool> {
    let markup = read_input(input)?;
    let report = diagram::validate_with(&markup, &config.diagram);
    if json {
        write_output(&to_json(&report)?, None)?;
    } else if !quiet || !report.is_valid {
        print_report(&report);
    }
    Ok(report.is_valid)
}

fn print_report(report: &ValidationReport) {
    println!("\n🔍 Diagram Validation\n");
    if report.errors.is_empty() {
        println!("{}", "✅ Errors: None".green());
    } else {
        println!("{}", format!("❌ Errors ({}):", report.error_count()).red());
        for line in &report.errors {
            println!("  {}", line);
        }
    }
    if !report.warnings.is_empty() {
        println!();
        println!("{}", format!("⚠️  Warnings ({}):", report.warnings.len()).yellow());
        for line in &report.warnings {
            println!("  {}", line);
        }
    }
    println!(
        "\n📈 Summary: {}",
        if report.is_valid { "valid".green() } else { "invalid".red() }
    );
}

fn handle_repair(input: &Path, output: Option<&Path>) -> Result<()> {
    let markup = read_input(input)?;
    write_output(&diagram::auto_repair(&markup), output)
}

fn handle_run(config: PipelineConfig, input: &Path, out_dir: &Path, quiet: bool) -> Result<()> {
    let text = read_input(input)?;
    let output = Pipeline::new(config).run(&text);
    let artifacts = write_run_outputs(&output, out_dir)?;

    if !quiet {
        println!("\n📊 {}\n", output.schema.name.bold());
        println!(
            "  {} table(s), {} relationship(s)",
            output.schema.tables.len(),
            output.schema.relationships.len()
        );
        if !output.report.is_clean() {
            println!(
                "  {}",
                format!(
                    "{} relationship(s) dropped",
                    output.report.dropped_relationships.len()
                )
                .yellow()
            );
        }
        if !output.diagram.report.is_valid {
            println!(
                "  {}",
                "diagram has structural errors, see the %% annotations".red()
            );
        }
        println!("  ✓ {}", artifacts.schema_path.display());
        println!("  ✓ {}", artifacts.diagram_path.display());
    }
    Ok(())
}
