//! Command-line interface for prompt-studio templates

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "studio-cli")]
#[command(about = "Inspect, fill and render prompt templates", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the placeholders a template references
    Placeholders {
        /// Template file, or `-` for stdin
        file: PathBuf,
    },
    /// Render a template with the given values
    Render {
        /// Template file, or `-` for stdin
        file: PathBuf,
        #[command(flatten)]
        values: ValueArgs,
    },
    /// Report which placeholders still need a value
    Check {
        /// Template file, or `-` for stdin
        file: PathBuf,
        #[command(flatten)]
        values: ValueArgs,
    },
}

#[derive(Args, Debug)]
struct ValueArgs {
    /// JSON object file with values
    #[arg(long = "vars", value_name = "JSON_FILE")]
    vars: Option<PathBuf>,

    /// Set a value; dotted keys create nested objects
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = commands::parse_assignment)]
    set: Vec<(String, String)>,
}

fn main() -> anyhow::Result<ExitCode> {
    studio_utils::init_tracing_with("warn", false);

    let cli = Cli::parse();

    match cli.command {
        Commands::Placeholders { file } => {
            let text = commands::read_template(&file)?;
            println!("{}", commands::placeholder_table(&text));
            Ok(ExitCode::SUCCESS)
        }
        Commands::Render { file, values } => {
            let text = commands::read_template(&file)?;
            let context = commands::load_context(values.vars.as_deref(), &values.set)?;
            match commands::render(&text, &context) {
                Ok(output) => {
                    println!("{output}");
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    eprintln!("error: {e}");
                    println!("{}", studio_template::RENDER_ERROR_SENTINEL);
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Commands::Check { file, values } => {
            let text = commands::read_template(&file)?;
            let context = commands::load_context(values.vars.as_deref(), &values.set)?;
            let missing = commands::missing_fields(&text, &context);
            if missing.is_empty() {
                println!("All placeholders have values.");
                Ok(ExitCode::SUCCESS)
            } else {
                println!("Missing values:");
                for name in &missing {
                    println!("  {name} ({})", studio_template::field_label(name));
                }
                Ok(ExitCode::FAILURE)
            }
        }
    }
}
