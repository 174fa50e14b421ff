use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod formatters;

#[derive(Parser)]
#[command(name = "fundfolio")]
#[command(version, about = "Daily fund and asset portfolio tracker")]
#[command(
    long_about = "Record daily values of investment funds and asset categories (precious metals, crypto, physical gold), then analyze daily changes, period returns and top/bottom performers."
)]
pub struct Cli {
    /// Disable colorized/ANSI output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Output results in JSON format
    #[arg(long = "json", global = true)]
    pub json: bool,

    /// Path to a TOML config file (default: ~/.fundfolio/config.toml)
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Path to the SQLite database (overrides the config file)
    #[arg(long = "db", global = true)]
    pub db: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record a day's values
    Add {
        #[command(subcommand)]
        action: AddCommands,
    },

    /// Load every dated batch under <DIR>/data_funds and <DIR>/data_assets
    Import {
        /// Directory holding data_funds/ and data_assets/
        dir: PathBuf,
    },

    /// Delete recorded values
    Delete {
        #[command(subcommand)]
        action: DeleteCommands,
    },

    /// Full analysis: summary, daily totals, daily changes, top/bottom lists
    Analyze {
        #[command(flatten)]
        range: RangeArgs,

        /// Entries per top/bottom list (default: config top_n)
        #[arg(long)]
        top: Option<usize>,
    },

    /// Portfolio start/end value and change over a range
    Summary {
        #[command(flatten)]
        range: RangeArgs,
    },
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct RangeArgs {
    /// First day (YYYY-MM-DD, default: --to minus lookback_days)
    #[arg(long)]
    pub from: Option<String>,

    /// Last day (YYYY-MM-DD, default: today)
    #[arg(long)]
    pub to: Option<String>,
}

#[derive(Subcommand)]
pub enum AddCommands {
    /// Fund batch: tab-separated labels line and values line
    Funds {
        /// Batch file, or '-' for stdin
        file: String,

        /// Value date (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<String>,

        /// Do not keep a copy of the raw batch
        #[arg(long)]
        no_archive: bool,
    },

    /// Asset category values
    Assets {
        #[arg(allow_negative_numbers = true)]
        precious_metals: String,
        #[arg(allow_negative_numbers = true)]
        crypto: String,
        #[arg(allow_negative_numbers = true)]
        physical_gold: String,

        /// Value date (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<String>,

        /// Do not keep a copy of the raw batch
        #[arg(long)]
        no_archive: bool,
    },
}

#[derive(Subcommand)]
pub enum DeleteCommands {
    /// Every fund value of a date
    Funds {
        /// Date (YYYY-MM-DD)
        date: String,
    },

    /// The asset values of a date
    Assets {
        /// Date (YYYY-MM-DD)
        date: String,
    },

    /// Both families for a whole month
    Month {
        /// Month (YYYY-MM)
        month: String,
    },
}
