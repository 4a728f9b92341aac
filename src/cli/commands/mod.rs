//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod check;
mod config_cmd;
mod render;
mod run;
mod sections;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::load_settings;

/// Output format for extracted jobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Numbered plain-text listing
    #[default]
    Text,
    /// Pretty-printed JSON report
    Json,
}

#[derive(Parser)]
#[command(name = "jobsift")]
#[command(about = "Extract job postings from careers pages with an LLM")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true, env = "JOBSIFT_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Extract job postings from a URL or a local HTML/text file
    Run {
        /// http(s) URL or path to a .html/.txt file
        source: String,
        /// Model identifier (overrides config)
        #[arg(short, long)]
        model: Option<String>,
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
        /// Write an HTML visualization to this path
        #[arg(long)]
        html: Option<PathBuf>,
        /// Save the annotated document as JSONL
        #[arg(long)]
        save: Option<PathBuf>,
        /// Keep postings that fail the title/description filter
        #[arg(long)]
        no_filter: bool,
        /// Maximum characters per model request
        #[arg(long)]
        max_chunk_chars: Option<usize>,
        /// Chunks processed concurrently
        #[arg(short, long)]
        workers: Option<usize>,
        /// Extraction passes over the text
        #[arg(long)]
        passes: Option<usize>,
    },

    /// Show the job sections detected in a page
    Sections {
        /// http(s) URL or path to a .html/.txt file
        source: String,
    },

    /// Render saved annotated documents as HTML
    Render {
        /// JSONL file written by `run --save`
        input: PathBuf,
        /// Output HTML path
        #[arg(long)]
        html: PathBuf,
    },

    /// Check LLM configuration and availability
    Check,

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,
    /// Write a default config file
    Init {
        /// Destination (default: ./jobsift.toml)
        path: Option<PathBuf>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_deref()).await?;

    match cli.command {
        Commands::Run {
            source,
            model,
            format,
            html,
            save,
            no_filter,
            max_chunk_chars,
            workers,
            passes,
        } => {
            let options = run::RunOptions {
                model,
                format,
                html,
                save,
                filter: !no_filter,
                max_chunk_chars,
                workers,
                passes,
            };
            run::cmd_run(settings, &source, options).await
        }
        Commands::Sections { source } => sections::cmd_sections(&settings, &source).await,
        Commands::Render { input, html } => render::cmd_render(&settings, &input, &html),
        Commands::Check => check::cmd_check(&settings).await,
        Commands::Config { command } => match command {
            ConfigCommands::Show => config_cmd::cmd_config_show(&settings),
            ConfigCommands::Init { path, force } => {
                config_cmd::cmd_config_init(path.as_deref(), force)
            }
        },
    }
}
