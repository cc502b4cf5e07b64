//! Command-line front end for the galley inventory library.
//!
//! Drives the full pipeline from the shell: resolve raw scan payloads,
//! register and query products, and ask the remote verification service
//! about an identifier.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};

use galley_core::core::Inventory;
use galley_core::freshness::{ExpiryAssessment, FreshnessStatus};
use galley_core::resolve::resolve;
use galley_core::types::{
    Config, FreshnessThresholds, ProductIdentifier, ProductRecord, Unit,
};
use galley_core::verify::{HttpVerifier, Verify, VerifyError};

#[derive(Parser)]
#[command(name = "galley", about = "Perishable-goods inventory over scanned QR identifiers")]
struct Cli {
    /// Data directory holding the product database and config.toml.
    #[arg(long, default_value = ".galley")]
    data_dir: PathBuf,

    /// Override "today" (YYYY-MM-DD) for reproducible output.
    #[arg(long)]
    date: Option<NaiveDate>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the canonical identifier for a raw scan payload.
    Resolve {
        /// Raw payload as delivered by the scanner.
        raw: String,
    },

    /// Feed a scanned payload through the pipeline: resolve, count, classify.
    Scan {
        raw: String,
    },

    /// Register (or replace) a product.
    Add {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        lot: String,
        #[arg(long, default_value_t = 1)]
        quantity: u32,
        #[arg(long, value_enum, default_value = "ml")]
        unit: UnitArg,
        /// Expiry date (YYYY-MM-DD).
        #[arg(long)]
        expiry: NaiveDate,
    },

    /// Show one product with its current assessment.
    Get {
        id: String,
    },

    /// Delete a product.
    Rm {
        id: String,
    },

    /// List products, optionally filtered by status or sorted by expiry.
    List {
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
        #[arg(long)]
        sort_expiry: bool,
    },

    /// Search products by name or lot.
    Search {
        query: String,
    },

    /// Dashboard statistics.
    Stats,

    /// Ask the remote verification service about an identifier.
    Verify {
        id: String,
        /// Base URL of the verification service.
        #[arg(long)]
        endpoint: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum UnitArg {
    Ml,
    Mg,
}

impl From<UnitArg> for Unit {
    fn from(arg: UnitArg) -> Self {
        match arg {
            UnitArg::Ml => Unit::Ml,
            UnitArg::Mg => Unit::Mg,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum StatusArg {
    Fresh,
    UseSoon,
    Critical,
    Expired,
}

impl From<StatusArg> for FreshnessStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Fresh => FreshnessStatus::Fresh,
            StatusArg::UseSoon => FreshnessStatus::UseSoon,
            StatusArg::Critical => FreshnessStatus::Critical,
            StatusArg::Expired => FreshnessStatus::Expired,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    // The library never reads the clock; "today" is pinned here.
    let today = cli.date.unwrap_or_else(|| Utc::now().date_naive());

    match cli.command {
        Command::Resolve { raw } => {
            println!("{}", resolve(&raw));
            Ok(())
        }
        Command::Verify { id, endpoint } => verify(&id, &endpoint, today),
        command => {
            let mut inventory = open_inventory(&cli.data_dir)?;
            match command {
                Command::Scan { raw } => scan(&mut inventory, &raw, today),
                Command::Add {
                    id,
                    name,
                    lot,
                    quantity,
                    unit,
                    expiry,
                } => {
                    let record = ProductRecord {
                        id: parse_identifier(&id)?,
                        name,
                        lot,
                        quantity,
                        unit: unit.into(),
                        expiry,
                    };
                    inventory.register(record)?;
                    println!("registered {id}");
                    Ok(())
                }
                Command::Get { id } => {
                    let id = parse_identifier(&id)?;
                    match inventory.product(&id)? {
                        Some(record) => {
                            let assessment = inventory.assess(&id, today)?.expect("record exists");
                            print_record(&record, &assessment);
                            Ok(())
                        }
                        None => Err(format!("no product registered under '{id}'").into()),
                    }
                }
                Command::Rm { id } => {
                    let id = parse_identifier(&id)?;
                    if inventory.remove(&id)? {
                        println!("removed {id}");
                        Ok(())
                    } else {
                        Err(format!("no product registered under '{id}'").into())
                    }
                }
                Command::List { status, sort_expiry } => {
                    let records = match (status, sort_expiry) {
                        (Some(status), _) => inventory.by_status(status.into(), today)?,
                        (None, true) => inventory.sorted_by_expiry(true)?,
                        (None, false) => inventory.products()?,
                    };
                    list_records(&inventory, &records, today)
                }
                Command::Search { query } => {
                    let records = inventory.search(&query)?;
                    list_records(&inventory, &records, today)
                }
                Command::Stats => {
                    let stats = inventory.dashboard(today)?;
                    println!("{}", serde_json::to_string_pretty(&stats)?);
                    Ok(())
                }
                // Handled above before the inventory was opened.
                Command::Resolve { .. } | Command::Verify { .. } => unreachable!(),
            }
        }
    }
}

fn open_inventory(data_dir: &Path) -> Result<Inventory, Box<dyn std::error::Error>> {
    let thresholds = FreshnessThresholds::load(&FreshnessThresholds::path(data_dir))?;
    for problem in thresholds.validate() {
        tracing::warn!(%problem, "invalid config.toml value, using defaults");
    }

    let config = Config {
        base_path: data_dir.to_path_buf(),
        thresholds: thresholds.with_defaults_for_invalid(),
    };
    Ok(Inventory::open(config)?)
}

fn parse_identifier(raw: &str) -> Result<ProductIdentifier, Box<dyn std::error::Error>> {
    ProductIdentifier::try_from(raw).map_err(|e| format!("invalid identifier: {e}").into())
}

fn scan(
    inventory: &mut Inventory,
    raw: &str,
    today: NaiveDate,
) -> Result<(), Box<dyn std::error::Error>> {
    let outcome = inventory.record_scan(raw, Utc::now(), today)?;

    if outcome.identifier.is_empty() {
        println!("blank payload, nothing recorded");
        return Ok(());
    }

    println!("identifier: {}", outcome.identifier);
    if let Some(stats) = &outcome.stats {
        let duplicate = if outcome.is_duplicate() { " (duplicate)" } else { "" };
        println!("scan #{}{duplicate}", stats.count);
    }

    match (&outcome.product, &outcome.assessment) {
        (Some(record), Some(assessment)) => print_record(record, assessment),
        _ => println!("not registered in this inventory"),
    }
    Ok(())
}

fn verify(id: &str, endpoint: &str, today: NaiveDate) -> Result<(), Box<dyn std::error::Error>> {
    let id = parse_identifier(id)?;
    let verifier = HttpVerifier::new(endpoint)?;

    match verifier.verify(&id) {
        Ok(verification) => {
            println!("name: {}", verification.product_name);
            if let Some(quantity) = verification.quantity {
                println!("quantity: {quantity}");
            }
            match verification.expiry_date {
                // Local classification is the source of truth for status.
                Some(expiry) => {
                    let assessment = galley_core::freshness::classify(expiry, today);
                    println!("expiry: {expiry}");
                    println!("status: {} ({})", assessment.status.label(), assessment.message);
                }
                None => println!("no expiry date on file"),
            }
            Ok(())
        }
        Err(VerifyError::NotFound) => Err(format!("'{id}' is not known to the service").into()),
        Err(error) => Err(error.to_string().into()),
    }
}

fn list_records(
    inventory: &Inventory,
    records: &[ProductRecord],
    today: NaiveDate,
) -> Result<(), Box<dyn std::error::Error>> {
    if records.is_empty() {
        println!("no products");
        return Ok(());
    }

    for record in records {
        let assessment = inventory
            .assess(&record.id, today)?
            .expect("listed record exists");
        println!(
            "{}  {} ({} {})  lot {}  [{}] {}",
            record.id,
            record.name,
            record.quantity,
            record.unit,
            record.lot,
            assessment.status.label(),
            assessment.message,
        );
    }
    Ok(())
}

fn print_record(record: &ProductRecord, assessment: &ExpiryAssessment) {
    println!("name: {} ({} {})", record.name, record.quantity, record.unit);
    println!("lot: {}", record.lot);
    println!("expiry: {}", record.expiry);
    println!("status: {} ({})", assessment.status.label(), assessment.message);
}
