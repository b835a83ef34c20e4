use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "query-analyzer")]
#[command(about = "Turn search phrases into search engine filters", long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to $QUERY_ANALYZER_CONFIG, then the user
    /// config directory, then the built-in configuration)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log analysis steps to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze one phrase and print the result as JSON
    Analyze {
        /// Words of the phrase; several arguments are joined with spaces
        #[arg(required = true)]
        phrase: Vec<String>,
        #[arg(short, long)]
        pretty: bool,
    },
    /// Analyze every non-empty line of a file, printing one JSON line each
    Batch {
        /// Input file, or `-` for stdin
        file: PathBuf,
    },
    /// Validate the configuration and summarize it
    CheckConfig,
}
