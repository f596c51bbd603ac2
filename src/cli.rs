use crate::models::{MonthKey, PropertyId};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

/// Default dashboard tick in seconds.
pub const DEFAULT_TICK: f64 = 0.25;

fn parse_tick_rate(s: &str) -> Result<f64, String> {
    s.parse::<f64>()
        .map_err(|_| "Invalid tick rate".to_string())
        .and_then(|v| {
            if v > 0.0 && v <= 5.0 {
                Ok(v)
            } else {
                Err("Tick rate must be between 0 and 5 seconds".to_string())
            }
        })
}

#[derive(Parser, Debug)]
#[command(name = "rent-tracker")]
#[command(about = "Track monthly rent collection across rental properties")]
#[command(version)]
pub struct Cli {
    /// Rent tracker server URL
    #[arg(long, global = true, env = "RENT_TRACKER_URL")]
    pub server: Option<String>,

    /// Directory exports are written to
    #[arg(long, global = true)]
    pub export_dir: Option<String>,

    /// Path to the config file
    #[arg(long, global = true)]
    pub config: Option<std::path::PathBuf>,

    /// Log filter, e.g. `debug` or `rent_tracker=trace` (overrides RUST_LOG)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Launch interactive dashboard (default)
    #[command(visible_aliases = &["dash", "d"])]
    Dashboard {
        /// UI tick interval in seconds (supports decimals, e.g. 0.5)
        #[arg(short, long, default_value_t = DEFAULT_TICK, value_parser = parse_tick_rate)]
        tick: f64,
    },

    /// List properties with their status for a month
    #[command(visible_alias = "ls")]
    List {
        #[command(flatten)]
        month: MonthArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Show one property and its record for a month
    Show {
        id: PropertyId,

        #[command(flatten)]
        month: MonthArgs,
    },

    /// Add a property
    Add(AddArgs),

    /// Edit a property's name, address or rent
    Edit {
        id: PropertyId,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        address: Option<String>,

        /// Monthly rent
        #[arg(long)]
        rent: Option<String>,
    },

    /// Delete a property and all of its rent history
    #[command(visible_alias = "rm")]
    Delete {
        id: PropertyId,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Flip a month between received and pending
    Toggle {
        id: PropertyId,

        #[command(flatten)]
        month: MonthArgs,
    },

    /// Set the expected and received dates of a month's record
    Dates {
        id: PropertyId,

        #[command(flatten)]
        month: MonthArgs,

        /// Expected payment date (YYYY-MM-DD, empty to clear)
        #[arg(long)]
        expected: Option<String>,

        /// Received date (YYYY-MM-DD); marks the month received
        #[arg(long, conflicts_with = "pending")]
        received: Option<String>,

        /// Clear the received date and mark the month pending
        #[arg(long)]
        pending: bool,
    },

    /// Record a rent payment
    Collect {
        id: PropertyId,

        #[command(flatten)]
        month: MonthArgs,

        /// Date the rent arrived (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Payment mode, e.g. "Cash" or "Bank Transfer"
        #[arg(long)]
        mode: Option<String>,
    },

    /// List every rent record on the server
    Records {
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Show collection totals for a month
    Summary {
        #[command(flatten)]
        month: MonthArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Show recent property additions and payments
    Activity,

    /// Export data to a file
    Export {
        #[arg(value_enum)]
        kind: ExportKind,
    },

    /// Print the effective configuration
    Config {
        /// Write the effective configuration to the config file
        #[arg(long)]
        save: bool,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct MonthArgs {
    /// Year (defaults to the current year)
    #[arg(long)]
    pub year: Option<i32>,

    /// Month 1-12 (defaults to the current month)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month: Option<u32>,
}

impl MonthArgs {
    pub fn resolve(&self, today: NaiveDate) -> MonthKey {
        let current = MonthKey::of(today);
        let year = self.year.unwrap_or(current.year);
        match self.month {
            Some(month) => MonthKey::from_human(year, month).unwrap_or(current),
            None => MonthKey { year, ..current },
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct AddArgs {
    /// Property name
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub renter: Option<String>,

    #[arg(long)]
    pub address: Option<String>,

    /// Renter phone or email
    #[arg(long)]
    pub contact: Option<String>,

    /// Initial monthly rent
    #[arg(long)]
    pub rent: Option<String>,

    /// Day of the month rent is due (1-31)
    #[arg(long)]
    pub due_day: Option<String>,

    /// Lease start date (YYYY-MM-DD)
    #[arg(long)]
    pub lease_start: Option<String>,

    /// Yearly increase in percent
    #[arg(long)]
    pub increase_percent: Option<String>,

    /// Yearly increase as a fixed amount
    #[arg(long)]
    pub increase_amount: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum ExportKind {
    /// Local JSON backup of the loaded data
    Json,
    /// Spreadsheet generated by the server
    Excel,
}
