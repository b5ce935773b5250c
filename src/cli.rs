use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Generate TypeScript client interfaces from backend controller schemas
#[derive(Parser, Debug)]
#[command(name = "ts-client-codegen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate TypeScript files from schema files
    Generate {
        /// Path to the configuration file
        #[arg(short, long, default_value = "ts-codegen.toml")]
        config: PathBuf,

        /// Enable verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Create a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(short, long, default_value = "ts-codegen.toml")]
        output: PathBuf,

        /// Overwrite an existing configuration file
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
