use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use log::LevelFilter;

mod chart;
mod error;
mod load;
mod models;
mod report;
mod stack;
mod tally;

use chart::MonthView;
use models::Entry;

const DEFAULT_CSV: &str = "crying.csv";

#[derive(Parser)]
#[command(name = "feelings-dashboard")]
#[command(about = "Monthly dashboard of journal entries by intensity and category", long_about = None)]
struct Cli {
    /// Entries CSV (falls back to FEELINGS_CSV, then crying.csv)
    #[arg(long, global = true)]
    csv: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print category counts and column sizes for one month
    Summary {
        #[arg(long)]
        month: String,
    },
    /// Write the HTML dashboard with a month selector
    Render {
        #[arg(long, default_value = "dashboard.html")]
        out: PathBuf,
        #[arg(long, value_delimiter = ',', default_value = "Jan,Feb,Mar")]
        months: Vec<String>,
        /// Month shown on load (defaults to the first of --months)
        #[arg(long = "default")]
        default_month: Option<String>,
    },
    /// Export the points and category counts of one month as JSON
    Export {
        #[arg(long)]
        month: String,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Generate a markdown report for one month
    Report {
        #[arg(long)]
        month: String,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// List the months present in the data
    Months,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let csv_path = resolve_csv_path(cli.csv, std::env::var_os("FEELINGS_CSV"));
    let entries = open_entries(&csv_path)?;

    match cli.command {
        Commands::Summary { month } => {
            let view = MonthView::compute(&entries, &month);
            if view.points.is_empty() {
                println!("No entries found for {month}.");
                return Ok(());
            }

            println!("Entries for {month} by category:");
            for (category, count) in view.tally.iter() {
                println!(
                    "- {} {} ({:.1}%)",
                    category,
                    count,
                    view.tally.share(category) * 100.0
                );
            }
            println!("Entries by degree:");
            for (level, count) in stack::column_sizes(&view.points) {
                println!("- {level} {count}");
            }
        }
        Commands::Render {
            out,
            months,
            default_month,
        } => {
            let (months, default_month) = select_months(months, default_month)?;
            let views: Vec<MonthView> = months
                .iter()
                .map(|month| MonthView::compute(&entries, month))
                .collect();
            for view in &views {
                log::info!("{}: {} entries", view.month, view.points.len());
            }

            let html = chart::render_dashboard(&views, &default_month)?;
            std::fs::write(&out, html)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Dashboard written to {}.", out.display());
        }
        Commands::Export { month, out } => {
            let view = MonthView::compute(&entries, &month);
            let json = serde_json::to_string_pretty(&view)?;
            match out {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("Exported {} points to {}.", view.points.len(), path.display());
                }
                None => println!("{json}"),
            }
        }
        Commands::Report { month, out } => {
            let report = report::build_report(&month, chrono::Utc::now(), &entries);
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Months => {
            let months = tally::distinct_months(&entries);
            if months.is_empty() {
                println!("No dated entries found.");
            }
            for month in months {
                println!("{month}");
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// `--csv`, then the `FEELINGS_CSV` value, then `crying.csv`.
fn resolve_csv_path(flag: Option<PathBuf>, env: Option<OsString>) -> PathBuf {
    flag.or_else(|| env.map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CSV))
}

/// Drops repeated months and checks that the default month is one of them.
fn select_months(
    months: Vec<String>,
    default_month: Option<String>,
) -> anyhow::Result<(Vec<String>, String)> {
    let mut unique: Vec<String> = Vec::with_capacity(months.len());
    for month in months {
        if unique.contains(&month) {
            log::warn!("Ignoring repeated month `{month}`");
        } else {
            unique.push(month);
        }
    }

    let Some(first) = unique.first() else {
        bail!("--months needs at least one month");
    };
    let default_month = default_month.unwrap_or_else(|| first.clone());
    if !unique.contains(&default_month) {
        bail!("default month `{default_month}` is not one of --months");
    }

    Ok((unique, default_month))
}

fn open_entries(csv_path: &Path) -> anyhow::Result<Vec<Entry>> {
    load::load_entries(csv_path)
        .with_context(|| format!("failed to load entries from {}", csv_path.display()))
}
