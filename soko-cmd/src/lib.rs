//! Command implementations for the Soko CLI.
//!
//! Provides subcommands for refreshing the daily AMIS price list and for
//! viewing, summarising and asking about a price CSV.

use chrono::NaiveDate;
use clap::Subcommand;
use soko_data::{Selection, ViewMode, ALL};
use soko_prices::amis::{DEFAULT_BACKOFF_MILLIS, DEFAULT_MAX_TRIES};
use std::time::Duration;

pub mod browse;
pub mod context;
pub mod refresh;
pub mod render;
pub mod report;

use refresh::RefreshOptions;
use render::OutputFormat;

/// Number of headlines shown unless a command asks for more.
pub const DEFAULT_HEADLINES: usize = 5;

#[derive(Subcommand)]
pub enum Command {
    /// Fetch the daily AMIS price list and write it as a price CSV
    Refresh {
        /// Price feed URL answering with a price CSV
        #[arg(long)]
        source_url: String,

        /// Output path for the price CSV (overwritten)
        #[arg(short = 'p', long)]
        prices_csv: String,

        /// Observation date to request (YYYY-MM-DD); latest when omitted
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Fetch attempts before giving up
        #[arg(long, default_value_t = DEFAULT_MAX_TRIES)]
        max_tries: u32,

        /// Wait before the first retry, doubled after each failure
        #[arg(long, default_value_t = DEFAULT_BACKOFF_MILLIS)]
        backoff_millis: u64,
    },

    /// Print the prices selected by view, selectors and search
    Show {
        /// Path to the price CSV
        #[arg(short = 'p', long)]
        prices_csv: String,

        /// Group by "county" or "commodity"
        #[arg(long, default_value = "county")]
        view: ViewMode,

        /// County to show in county view, or "all"
        #[arg(long, default_value = ALL)]
        county: String,

        /// Commodity to show in commodity view, or "all"
        #[arg(long, default_value = ALL)]
        commodity: String,

        /// Case-insensitive match on commodity, county or market
        #[arg(short = 's', long, default_value = "")]
        search: String,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Print price headlines and the last update time
    Summary {
        /// Path to the price CSV
        #[arg(short = 'p', long)]
        prices_csv: String,

        /// Maximum number of headlines
        #[arg(long, default_value_t = DEFAULT_HEADLINES)]
        limit: usize,
    },

    /// List Kenya's 47 counties
    Counties,

    /// Ask the price assistant a question (English or Swahili)
    Ask {
        /// Path to the price CSV
        #[arg(short = 'p', long)]
        prices_csv: String,

        #[arg(required = true)]
        question: Vec<String>,
    },

    /// Interactively browse a price CSV
    Browse {
        /// Path to the price CSV
        #[arg(short = 'p', long)]
        prices_csv: String,

        /// How long a loaded price file is reused before it is read again
        #[arg(long, default_value_t = 300)]
        cache_ttl_secs: u64,
    },
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Refresh {
            source_url,
            prices_csv,
            date,
            max_tries,
            backoff_millis,
        } => {
            let options = RefreshOptions {
                source_url,
                date,
                max_tries,
                backoff: Duration::from_millis(backoff_millis),
            };
            refresh::run_refresh(&options, &prices_csv).await
        }
        Command::Show {
            prices_csv,
            view,
            county,
            commodity,
            search,
            format,
        } => {
            let selection = Selection {
                view,
                county,
                commodity,
                search,
            };
            report::run_show(&prices_csv, &selection, format)
        }
        Command::Summary { prices_csv, limit } => report::run_summary(&prices_csv, limit),
        Command::Counties => report::run_counties(),
        Command::Ask {
            prices_csv,
            question,
        } => report::run_ask(&prices_csv, &question.join(" ")),
        Command::Browse {
            prices_csv,
            cache_ttl_secs,
        } => browse::run_browse(&prices_csv, cache_ttl_secs),
    }
}
