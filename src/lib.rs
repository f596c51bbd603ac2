pub mod api;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod derive;
pub mod error;
pub mod export;
pub mod formatters;
pub mod logging;
pub mod models;
pub mod notify;
pub mod tracker;
pub mod validation;

use anyhow::{bail, Context, Result};
use api::{ApiClient, RentApi};
use chrono::Utc;
use cli::{AddArgs, Cli, Commands, ExportKind, OutputFormat};
use colored::Colorize;
use config::Config;
use indicatif::{ProgressBar, ProgressStyle};
use notify::NoticeKind;
use std::io::{self, BufRead, Write};
use std::time::Duration;
use tracker::{CollectionPrompt, RentTracker, DELETE_CONFIRMATION};
use validation::{PropertyEdit, PropertyForm};

pub async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(config::default_path);
    let config = Config::load_or_default(&config_path)
        .with_context(|| format!("Failed to read config from {}", config_path.display()))?
        .with_overrides(cli.server.clone(), cli.export_dir.clone());

    let command = cli.command.unwrap_or(Commands::Dashboard {
        tick: cli::DEFAULT_TICK,
    });

    if let Commands::Dashboard { tick } = command {
        logging::init_file(&config::log_path(), cli.log_level.as_deref())?;
        let client = ApiClient::new(&config.server_url, config.timeout())?;
        return dashboard::run_dashboard(RentTracker::new(client), config, Duration::from_secs_f64(tick)).await;
    }

    logging::init_stderr(cli.log_level.as_deref());

    if let Commands::Config { save } = command {
        println!("{}", formatters::format_json(&config)?);
        if save {
            config
                .save(&config_path)
                .with_context(|| format!("Failed to write config to {}", config_path.display()))?;
            println!("Saved to {}", config_path.display());
        }
        return Ok(());
    }

    let client = ApiClient::new(&config.server_url, config.timeout())?;
    let mut tracker = RentTracker::new(client);

    // Adding needs no cached state, so validation runs without a round trip.
    if let Commands::Add(args) = command {
        let property = tracker.create_property(&add_form(args)).await?;
        print_notices(&mut tracker);
        println!("  id: {}", property.id);
        return Ok(());
    }

    let quiet = matches!(
        command,
        Commands::List { format, .. } | Commands::Records { format } | Commands::Summary { format, .. }
            if format != OutputFormat::Table
    );
    load_with_spinner(&mut tracker, quiet).await?;
    let today = tracker.today();

    match command {
        Commands::List { month, format } => {
            let key = month.resolve(today);
            let properties = tracker.properties();
            let history = tracker.rent_history();
            match format {
                OutputFormat::Table => {
                    if properties.is_empty() {
                        println!("No properties yet. Add one with `rent-tracker add`.");
                        return Ok(());
                    }
                    println!("{}", formatters::format_properties_table(properties, history, key));
                    formatters::print_summary(&tracker.summary_for(key));
                }
                OutputFormat::Json => println!("{}", formatters::format_json(properties)?),
                OutputFormat::Csv => {
                    print!("{}", formatters::format_properties_csv(properties, history, key)?)
                }
                OutputFormat::Markdown => {
                    print!("{}", formatters::format_properties_markdown(properties, history, key))
                }
            }
        }
        Commands::Show { id, month } => {
            let details = tracker
                .rent_details(&id, month.resolve(today))
                .ok_or_else(|| error::TrackerError::UnknownProperty(id.clone()))?;
            formatters::print_property_details(&details, today);
        }
        Commands::Edit {
            id,
            name,
            address,
            rent,
        } => {
            let Some(property) = tracker.property(&id) else {
                bail!(error::TrackerError::UnknownProperty(id));
            };
            let edit = PropertyEdit {
                name: name.unwrap_or_else(|| property.name.clone()),
                address: address.unwrap_or_else(|| property.address.clone()),
                monthly_rent: rent.unwrap_or_else(|| property.rent().to_string()),
            };
            tracker.update_property(&id, &edit).await?;
            print_notices(&mut tracker);
        }
        Commands::Delete { id, yes } => {
            let deleted = tracker.delete_property(&id, |p| yes || confirm_delete(&p.name)).await?;
            if deleted {
                print_notices(&mut tracker);
            } else {
                println!("Cancelled");
            }
        }
        Commands::Toggle { id, month } => {
            let key = month.resolve(today);
            let record = tracker.toggle_rent_status(&id, key).await?;
            let status = if record.received {
                "Received".green()
            } else {
                "Pending".yellow()
            };
            println!("{} for {} is now {}", id, formatters::month_label(key), status);
        }
        Commands::Dates {
            id,
            month,
            expected,
            received,
            pending,
        } => {
            let key = month.resolve(today);
            let details = tracker
                .rent_details(&id, key)
                .ok_or_else(|| error::TrackerError::UnknownProperty(id.clone()))?;
            let expected = match expected {
                Some(raw) => validation::optional_date("Expected date", &raw)?,
                None => details.record.expected_date,
            };
            let received = match received {
                _ if pending => None,
                Some(raw) => validation::optional_date("Received date", &raw)?,
                None => details.record.received_date,
            };
            tracker.update_rent_dates(&id, key, expected, received).await?;
            print_notices(&mut tracker);
        }
        Commands::Collect {
            id,
            month,
            date,
            mode,
        } => match tracker.collection_for(&id, month.resolve(today))? {
            CollectionPrompt::AlreadyReceived(details) => {
                println!(
                    "{} Rent for {} was already received on {}",
                    "!".yellow(),
                    formatters::month_label(details.month),
                    formatters::format_optional_date(details.record.received_date)
                );
            }
            CollectionPrompt::Collect(mut collection) => {
                if let Some(raw) = date {
                    collection.received_date = validation::optional_date("Received date", &raw)?;
                }
                collection.payment_mode = mode;
                tracker.record_collection(&collection).await?;
                print_notices(&mut tracker);
                println!("  Amount: {}", formatters::format_currency(collection.amount));
            }
        },
        Commands::Records { format } => {
            let rows = tracker.fetch_records().await?;
            match format {
                OutputFormat::Table => {
                    if rows.is_empty() {
                        println!("No rent records found");
                    } else {
                        println!("{}", formatters::format_records_table(&rows));
                    }
                }
                OutputFormat::Json => println!("{}", formatters::format_json(&rows)?),
                OutputFormat::Csv => print!("{}", formatters::format_records_csv(&rows)?),
                OutputFormat::Markdown => print!("{}", formatters::format_records_markdown(&rows)),
            }
        }
        Commands::Summary { month, format } => {
            let summary = tracker.summary_for(month.resolve(today));
            match format {
                OutputFormat::Table => formatters::print_summary(&summary),
                OutputFormat::Json => println!("{}", formatters::format_json(&summary)?),
                OutputFormat::Csv => print!("{}", formatters::format_summary_csv(&summary)?),
                OutputFormat::Markdown => print!("{}", formatters::format_summary_markdown(&summary)),
            }
        }
        Commands::Activity => {
            let now = Utc::now();
            formatters::print_activity(&tracker.recent_activity(now), now);
        }
        Commands::Export { kind } => {
            let dir = config.export_path();
            let path = match kind {
                ExportKind::Json => tracker.export_json(&dir)?,
                ExportKind::Excel => tracker.export_excel(&dir).await?,
            };
            print_notices(&mut tracker);
            println!("  {}", path.display());
        }
        Commands::Dashboard { .. } | Commands::Config { .. } | Commands::Add(_) => {}
    }

    Ok(())
}

fn add_form(args: AddArgs) -> PropertyForm {
    PropertyForm {
        name: args.name.unwrap_or_default(),
        renter_name: args.renter.unwrap_or_default(),
        address: args.address.unwrap_or_default(),
        renter_contact: args.contact.unwrap_or_default(),
        initial_rent: args.rent.unwrap_or_default(),
        expected_rent_date: args.due_day.unwrap_or_default(),
        lease_start_date: args.lease_start.unwrap_or_default(),
        yearly_increase_percent: args.increase_percent.unwrap_or_default(),
        yearly_increase_amount: args.increase_amount.unwrap_or_default(),
    }
}

async fn load_with_spinner<A: RentApi>(tracker: &mut RentTracker<A>, quiet: bool) -> Result<()> {
    let pb = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(format!("Loading data from {}", tracker.api().base_url()));
    pb.enable_steady_tick(Duration::from_millis(100));

    let result = tracker.load().await;
    pb.finish_and_clear();
    result.context("Could not reach the rent tracker server")
}

/// Prints the success toasts a command raised; errors travel as `Err`.
fn print_notices<A: RentApi>(tracker: &mut RentTracker<A>) {
    for notice in tracker.notifications_mut().drain() {
        if notice.kind == NoticeKind::Success {
            println!("{} {}", "✓".green(), notice.message);
        }
    }
}

fn confirm_delete(name: &str) -> bool {
    print!("{}\nDelete {}? [y/N] ", DELETE_CONFIRMATION, name.bold());
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}
