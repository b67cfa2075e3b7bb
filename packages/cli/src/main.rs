#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line tool for the WSO atlas.
//!
//! ```text
//! wso_atlas [--db PATH] serve
//! wso_atlas [--db PATH] import <clubs|meets|boundaries|results|snapshots> <FILE>...
//! wso_atlas [--db PATH] assign [--wso NAME] [--meets]
//! wso_atlas [--db PATH] audit --wso NAME
//! wso_atlas [--db PATH] activity [--window 12|24]
//! wso_atlas [--db PATH] top [--month YYYY-MM] [--metric NAME] [--limit N]
//! wso_atlas [--db PATH] rollup [--start-date YYYY-MM-DD]
//! wso_atlas [--db PATH] search-docs [--output FILE]
//! ```
//!
//! Reports are printed to stdout as JSON. Logging goes through
//! [`wso_atlas_cli_utils::init_logger`] so log lines and progress bars
//! share the terminal.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use wso_atlas_analytics_models::RollingMetric;
use wso_atlas_database::ImportKind;
use wso_atlas_database::paths::db_path_from_env;

#[derive(Parser)]
#[command(
    name = "wso_atlas",
    about = "Import weightlifting results and analyze WSO territories and clubs"
)]
struct Cli {
    /// `DuckDB` results file (defaults to `WSO_ATLAS_DB` or
    /// `data/wso_atlas.duckdb`)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve,
    /// Import JSON array files into the results store
    Import {
        /// What the files contain
        kind: ImportKind,
        /// Files to import
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Assign clubs (or meets) to WSO territories
    Assign {
        /// Only list entities inside this WSO
        #[arg(long)]
        wso: Option<String>,
        /// Assign recent meets instead of clubs
        #[arg(long)]
        meets: bool,
    },
    /// Compare stored meet labels against a WSO territory
    Audit {
        /// WSO name, verbatim
        #[arg(long)]
        wso: String,
    },
    /// Per-club activity and quadrant over a trailing window
    Activity {
        /// Window length in months (12 or 24); defaults to the config value
        #[arg(long)]
        window: Option<u32>,
    },
    /// Top clubs for one snapshot month
    Top {
        /// Snapshot month; defaults to the latest
        #[arg(long)]
        month: Option<String>,
        /// Metric to rank by
        #[arg(long, default_value_t = RollingMetric::ActiveMembers12mo)]
        metric: RollingMetric,
        /// Number of clubs (at most 50)
        #[arg(long, default_value = "20")]
        limit: usize,
    },
    /// Monthly totals across all clubs
    Rollup {
        /// Earliest month to include
        #[arg(long)]
        start_date: Option<String>,
    },
    /// Write search index documents for clubs and WSOs
    SearchDocs {
        /// Output file; stdout when omitted
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = wso_atlas_cli_utils::init_logger();
    let cli = Cli::parse();
    let db_path = cli.db.unwrap_or_else(db_path_from_env);

    match cli.command {
        Commands::Serve => {
            // actix-web brings its own runtime; run it off the tokio workers.
            tokio::task::spawn_blocking(move || {
                actix_web::rt::System::new()
                    .block_on(wso_atlas_server::run_server(Some(&db_path)))
            })
            .await??;
        }
        Commands::Import { kind, files } => {
            commands::import(&db_path, kind, &files, &multi)?;
        }
        Commands::Assign { wso, meets } => {
            commands::assign(&db_path, wso.as_deref(), meets).await?;
        }
        Commands::Audit { wso } => {
            commands::audit(&db_path, &wso).await?;
        }
        Commands::Activity { window } => {
            commands::activity(&db_path, window, &multi).await?;
        }
        Commands::Top {
            month,
            metric,
            limit,
        } => {
            commands::top(&db_path, month.as_deref(), metric, limit).await?;
        }
        Commands::Rollup { start_date } => {
            commands::rollup(&db_path, start_date.as_deref()).await?;
        }
        Commands::SearchDocs { output } => {
            commands::search_docs(&db_path, output.as_deref()).await?;
        }
    }

    Ok(())
}
