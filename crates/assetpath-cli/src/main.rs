//! assetpath CLI - Inspect and resolve a versioned asset store

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{info, resolve, versions, StoreArgs};

#[derive(Parser)]
#[command(name = "assetpath")]
#[command(about = "Resolve asset: identifiers against a versioned asset store", long_about = None)]
#[command(version)]
struct Cli {
    /// Asset store root (overrides USD_ASSET_ROOT and config files)
    #[arg(long, global = true)]
    root: Option<String>,

    /// Disable the resolution cache
    #[arg(long, global = true)]
    no_cache: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve identifiers to document paths
    Resolve {
        /// Identifiers such as asset:chair_0 or asset:chair_0?v=10
        #[arg(required = true)]
        identifiers: Vec<String>,

        /// Explain why an identifier did not resolve
        #[arg(long)]
        explain: bool,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Print the form of an identifier to store in documents
    Canonicalize {
        /// Identifier to canonicalize
        identifier: String,
    },

    /// Map a document path inside the store back to its identifier
    Identify {
        /// Path to a versioned asset document
        path: String,
    },

    /// Show the version a manifest calls latest
    Latest {
        /// Asset name
        name: String,
    },

    /// List the published versions of an asset
    Versions {
        /// Asset name
        name: String,
    },

    /// Show AssetInfo metadata of a resolved asset
    Info {
        /// Identifier of the asset
        identifier: String,

        /// Prim to inspect (defaults to the stage's default prim)
        #[arg(long)]
        prim: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let store = StoreArgs {
        root: cli.root,
        no_cache: cli.no_cache,
    };

    match cli.command {
        Commands::Resolve {
            identifiers,
            explain,
            format,
        } => resolve::run(&store, &identifiers, explain, &format),
        Commands::Canonicalize { identifier } => resolve::canonicalize(&store, &identifier),
        Commands::Identify { path } => resolve::identify(&store, &path),
        Commands::Latest { name } => versions::latest(&store, &name),
        Commands::Versions { name } => versions::list(&store, &name),
        Commands::Info { identifier, prim } => info::run(&store, &identifier, prim.as_deref()),
    }
}
