//! lodge-admin: back-office tasks from the command line
//!
//! Configuration comes from the environment (and `.env`):
//! - LODGE_API_URL, LODGE_API_TOKEN, LODGE_TIMEOUT_SECS
//! - LOG_LEVEL, LOG_DIR, LODGE_TOKEN_FILE
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use lodge_client::{
    ClientConfig, CrudService, HttpClient, PromotionService, ReservationService, logger,
};
use shared::export;
use shared::models::AnalyticsPeriod;
use shared::registry::MODULES;
use shared::request::{AdminReservationQuery, SortOrder};

#[derive(Parser, Debug)]
#[command(name = "lodge-admin", version, about = "Lodge back-office tools")]
struct Args {
    /// API base URL (overrides LODGE_API_URL)
    #[arg(long, env = "LODGE_API_URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the registered admin modules
    Modules,
    /// Print a module's records as JSON lines
    List {
        /// Module key, e.g. rooms
        module: String,
    },
    /// Print reservation analytics
    Analytics {
        /// today | weekly | monthly (overall when omitted)
        period: Option<String>,
        /// Write the report as CSV instead of printing it
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Export every reservation to a CSV file
    ExportReservations {
        file: PathBuf,
        /// Only this status (booked | pending | cancelled)
        #[arg(long)]
        status: Option<String>,
    },
    /// Print the id the next promotion will get
    NextPromotionId,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = ClientConfig::from_env();
    if let Some(url) = args.api_url {
        config.base_url = url;
    }
    logger::init_logger(&config.log_level, config.log_dir.as_deref())?;

    let client: Arc<dyn HttpClient> =
        Arc::new(config.build_http_client().context("could not build HTTP client")?);

    match args.command {
        Command::Modules => {
            for module in &MODULES {
                println!("{:<14} {:<18} {}", module.key, module.name, module.endpoints.list);
            }
        }
        Command::List { module } => {
            let module = CrudService::module(&module)?;
            let outcome = CrudService::new(client).fetch_list(module).await;
            if let Some(warning) = &outcome.warning {
                eprintln!("warning: {warning}");
            }
            for item in &outcome.items {
                println!("{item}");
            }
        }
        Command::Analytics { period, csv } => {
            let period = match period.as_deref() {
                Some(raw) => Some(
                    AnalyticsPeriod::parse(raw)
                        .with_context(|| format!("unknown period {raw}, expected today|weekly|monthly"))?,
                ),
                None => None,
            };
            let analytics = ReservationService::new(client).analytics(period).await?;
            match csv {
                Some(path) => {
                    std::fs::write(&path, export::analytics_csv(&analytics)?)
                        .with_context(|| format!("could not write {}", path.display()))?;
                    println!("Wrote {}", path.display());
                }
                None => {
                    for (metric, value) in analytics.report_rows() {
                        println!("{metric:<28} {value}");
                    }
                }
            }
        }
        Command::ExportReservations { file, status } => {
            let mut query = AdminReservationQuery::new()
                .limit(shared::request::MAX_LIMIT)
                .sort("checkIn", SortOrder::Asc);
            if let Some(raw) = status {
                let status = serde_json::from_value(serde_json::Value::String(raw.to_lowercase()))
                    .with_context(|| format!("unknown status {raw}"))?;
                query = query.status(status);
            }
            let reservations = ReservationService::new(client).admin_list_all(&query).await?;
            std::fs::write(&file, export::reservations_csv(&reservations)?)
                .with_context(|| format!("could not write {}", file.display()))?;
            println!("Exported {} reservations to {}", reservations.len(), file.display());
        }
        Command::NextPromotionId => {
            println!("{}", PromotionService::new(client).next_id().await);
        }
    }

    Ok(())
}
