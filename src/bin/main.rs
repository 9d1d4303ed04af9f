//! metastep CLI - run database metadata introspection over a row stream
//!
//! Usage:
//!   metastep run --config <metastep.toml> [--input <rows.json>] [--output <out.json>]
//!   metastep operations
//!   metastep describe <operation>
//!
//! Examples:
//!   metastep run --config metastep.toml
//!   metastep run --config metastep.toml --input tables.json --output columns.json
//!   metastep describe getColumns

use clap::{Parser, Subcommand};
use metastep::catalog::Catalog;
use metastep::config::Settings;
use metastep::connection::ConnectionContext;
use metastep::driver::DriverRegistry;
use metastep::logging;
use metastep::pipeline::{run_batch, RowBatch};
use metastep::step::MetadataStep;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "metastep")]
#[command(about = "metastep - Run database metadata introspection over a row stream")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the metadata step
    Run {
        /// Path to the TOML configuration (defaults to the usual search path)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Input rows as JSON ({"fields": [...], "rows": [[...]]}); one empty row if omitted
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Write output rows here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Log level (error, warn, info, debug, trace)
        #[arg(long, default_value = "info")]
        log_level: String,
    },

    /// List the available operations
    Operations,

    /// Show the arguments and result columns of an operation
    Describe {
        /// Operation name, e.g. getColumns
        operation: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            input,
            output,
            log_level,
        } => {
            logging::init(&log_level);
            cmd_run(config, input, output)
        }
        Commands::Operations => cmd_operations(),
        Commands::Describe { operation } => cmd_describe(&operation),
    }
}

fn cmd_run(config: Option<PathBuf>, input: Option<PathBuf>, output: Option<PathBuf>) -> ExitCode {
    let settings = match &config {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    };
    let settings = match settings {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let batch = match &input {
        Some(path) => {
            let text = match fs::read_to_string(path) {
                Ok(t) => t,
                Err(e) => {
                    eprintln!("Error reading input '{}': {}", path.display(), e);
                    return ExitCode::FAILURE;
                }
            };
            match serde_json::from_str::<RowBatch>(&text) {
                Ok(b) => b,
                Err(e) => {
                    eprintln!("Error parsing input '{}': {}", path.display(), e);
                    return ExitCode::FAILURE;
                }
            }
        }
        None => RowBatch::single_empty_row(),
    };

    let context = ConnectionContext::from_settings(&settings, DriverRegistry::with_defaults());
    let mut step = MetadataStep::new(settings.step.clone(), context);

    let (result, summary) = match run_batch(&mut step, batch) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let json = match serde_json::to_string_pretty(&result) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match &output {
        Some(path) => {
            if let Err(e) = fs::write(path, json) {
                eprintln!("Error writing output '{}': {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        }
        None => println!("{}", json),
    }

    eprintln!(
        "{} row(s) read, {} row(s) written",
        summary.rows_read, summary.rows_written
    );
    ExitCode::SUCCESS
}

fn cmd_operations() -> ExitCode {
    for op in Catalog::operations() {
        let args: Vec<&str> = op.arguments.iter().map(|a| a.name).collect();
        println!("{}({})", op.name, args.join(", "));
    }
    ExitCode::SUCCESS
}

fn cmd_describe(name: &str) -> ExitCode {
    let op = match Catalog::lookup(name) {
        Ok(op) => op,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("{}", op.name);
    println!();
    println!("Arguments:");
    if op.arguments.is_empty() {
        println!("  (none)");
    }
    for (i, arg) in op.arguments.iter().enumerate() {
        println!("  {}. {}: {}", i + 1, arg.name, arg.type_name());
    }
    println!();
    println!("Columns:");
    for (i, col) in op.columns.iter().enumerate() {
        println!("  {:>2}. {} ({})", i + 1, col.name, col.value_type);
    }
    ExitCode::SUCCESS
}
