use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use tracing::Level;

mod error_format;
mod init;
mod search;
mod syntax;

use init::init_config;
use search::{Source, interactive_search, load_into, run_query, show_buckets, show_stats};
use symdex::config::Config;
use symdex::index::{QueryMode, QueryOptions};
use symdex::store::IndexSlot;

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Parser)]
#[command(name = "symdex")]
#[command(about = "Search the symbol index of generated C API docs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory holding the search data (overrides search_dir from symdex.toml)
    #[arg(short, long, global = true)]
    dir: Option<PathBuf>,

    /// Use the bundled sample search data instead of a directory
    #[arg(long, global = true, conflicts_with = "dir")]
    sample: bool,

    /// Fail when no usable records are found
    #[arg(long, global = true)]
    strict: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up symbols by prefix (or exactly with --exact)
    Query {
        /// Symbol text to search for
        text: String,
        /// Only return keys equal to the text (case-insensitive)
        #[arg(short, long)]
        exact: bool,
        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,
        /// Print the results as a JSON array
        #[arg(long)]
        json: bool,
    },
    /// Interactive search prompt
    Interactive,
    /// Show index statistics
    Stats,
    /// List buckets with their key ranges
    Buckets,
    /// Initialize a new symdex.toml configuration file
    Init {
        /// Overwrite existing symdex.toml if present
        #[arg(long)]
        force: bool,
    },
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let result = run(cli);

    if let Err(e) = result {
        eprintln!("\n{} {}", "❌".red(), e.red());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), String> {
    if let Commands::Init { force } = cli.command {
        return init_config(force);
    }

    let mut config = Config::load();

    // CLI flags override the config file
    if let Some(dir) = cli.dir {
        config.search_dir = dir;
    }
    if cli.strict {
        config.allow_empty = false;
    }

    let source = if cli.sample {
        Source::Sample
    } else {
        Source::Dir {
            dir: config.search_dir.clone(),
            pattern: config.file_pattern.clone(),
        }
    };

    let slot = IndexSlot::empty();
    load_into(&slot, &source, config.build_options(), cli.verbose)?;

    match cli.command {
        Commands::Query {
            text,
            exact,
            limit,
            json,
        } => {
            let mut options: QueryOptions = config.query_options();
            if exact {
                options.mode = QueryMode::Exact;
            }
            if let Some(limit) = limit {
                options.max_results = limit;
            }
            run_query(&slot, &text, options, json)
        }
        Commands::Interactive => interactive_search(
            &slot,
            &source,
            config.query_options(),
            config.build_options(),
        ),
        Commands::Stats => show_stats(&slot),
        Commands::Buckets => show_buckets(&slot),
        Commands::Init { .. } => Ok(()),
    }
}
