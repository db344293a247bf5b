//! CLI module for the research agent
//!
//! Provides command-line interface parsing for the ares-research binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod init;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ares-research - web research agent
///
/// Turns a free-text query into a research plan, searches the web, scrapes
/// the most relevant pages and synthesizes what it found.
#[derive(Parser, Debug)]
#[command(
    name = "ares-research",
    version,
    about = "Web research agent: plan, search, scrape and synthesize",
    long_about = "Turns a free-text query into a research plan, runs web searches, filters\n\
                  and scrapes the most relevant pages, then synthesizes the findings.\n\n\
                  Works without an LLM API key: every model-backed step falls back to\n\
                  deterministic heuristics.",
    after_help = "EXAMPLES:\n    \
                  ares-research init                                # Write research.toml\n    \
                  ares-research research \"prix immobilier Paris\"    # Run a full research\n    \
                  ares-research plan \"meilleurs casques moto\"       # Show the plan only\n    \
                  ares-research serve --port 8080                   # Start the HTTP API"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "research.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full research pipeline for a query
    Research {
        /// The research query
        query: String,

        /// Print the bundle as JSON instead of a formatted report
        #[arg(long)]
        json: bool,
    },

    /// Generate and print the research plan only
    Plan {
        /// The research query
        query: String,
    },

    /// Start the HTTP API server
    Serve {
        /// Host address (overrides the configuration)
        #[arg(long)]
        host: Option<String>,

        /// Port (overrides the configuration)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Write a default research.toml and .env.example
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite existing files
        #[arg(short, long)]
        force: bool,
    },

    /// Show the effective configuration
    Config,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
