use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "movieskyy")]
#[command(author, version, about = "Movie browsing server backed by TMDB")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the server with the TMDB proxy and view session
    Start {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Create or check the env file holding the TMDB API key
    Setup {
        /// Env file to inspect (defaults to the configured one)
        #[arg(long)]
        env_file: Option<PathBuf>,
    },

    /// Fetch one listing through the view orchestrator and print it
    Browse {
        /// Category: trending, popular, top_rated, now_playing, upcoming
        #[arg(long)]
        category: Option<String>,

        /// Search text (takes precedence over the category listing)
        #[arg(long)]
        search: Option<String>,

        /// Output the view state as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
