use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use cleantoken_api::AppState;
use cleantoken_forecast::Forecaster;
use cleantoken_ledger::{Ledger, LedgerError};
use cleantoken_policy::IncentivePolicy;
use cleantoken_types::{ForecastResult, PerkCatalog, Series};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "CleanToken — breathe easy, earn tokens"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict the next-period pollution level from recorded readings
    Forecast {
        /// JSON file with {"area": ..., "readings": [{"timestamp", "value"}, ...]}
        #[arg(long)]
        series: PathBuf,
    },
    /// Run a one-shot earn-and-redeem session
    Session {
        #[arg(long)]
        series: PathBuf,
        /// Eco-action description; repeat together with --impact
        #[arg(long)]
        action: Vec<String>,
        /// Impact score (1-10) for the matching --action
        #[arg(long)]
        impact: Vec<f64>,
        /// Perk names to redeem once the actions are minted
        #[arg(long)]
        redeem: Vec<String>,
        /// Pollution level above which rewards double
        #[arg(long, default_value_t = cleantoken_policy::DEFAULT_ALERT_THRESHOLD)]
        threshold: f64,
    },
    /// Serve the HTTP API for a presentation layer
    Serve {
        #[arg(long, default_value = "0.0.0.0:3000")]
        addr: SocketAddr,
    },
}

fn load_series(path: &Path) -> Result<Series> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read series file {}", path.display()))?;
    let series: Series = serde_json::from_str(&content)
        .with_context(|| format!("invalid series file {}", path.display()))?;
    Ok(series)
}

fn print_forecast(series: &Series, forecast: &ForecastResult) {
    println!(
        "Predicted next-period PM2.5 for {}: {:.1} µg/m³ ({})",
        series.area(),
        forecast.value,
        forecast.method
    );
}

fn run_session(
    series_path: &Path,
    actions: &[String],
    impacts: &[f64],
    redeems: &[String],
    threshold: f64,
) -> Result<()> {
    if actions.len() != impacts.len() {
        bail!(
            "each --action needs a matching --impact ({} actions, {} impacts)",
            actions.len(),
            impacts.len()
        );
    }

    let series = load_series(series_path)?;
    let forecast = Forecaster::default().predict_series(&series)?;
    print_forecast(&series, &forecast);

    let policy = IncentivePolicy::new(threshold);
    let multiplier = policy.multiplier(&forecast);
    if multiplier > 1.0 {
        println!("High pollution alert — double tokens for actions today.");
    }

    let catalog = PerkCatalog::default();
    let mut ledger = Ledger::new();

    for (action, impact) in actions.iter().zip(impacts) {
        let tx = ledger.mint(action, *impact, multiplier)?;
        println!("Minted {} CAT for {:?} (tx {})", tx.amount, tx.action, tx.id);
    }

    for name in redeems {
        let Some(perk) = catalog.get(name) else {
            println!("Unknown perk: {name}");
            continue;
        };
        match ledger.redeem(&perk) {
            Ok(()) => println!(
                "Redeemed {} ({} CAT), balance {} CAT",
                perk.name,
                perk.cost,
                ledger.balance()
            ),
            Err(LedgerError::InsufficientBalance { shortfall, .. }) => {
                println!("Need {} more CAT for {}", shortfall, perk.name)
            }
            Err(err) => return Err(err.into()),
        }
    }

    println!(
        "Closing balance: {} CAT across {} transactions",
        ledger.balance(),
        ledger.transactions().len()
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");

    let cli = Cli::parse();

    match &cli.command {
        Commands::Forecast { series } => {
            let series = load_series(series)?;
            let forecast = Forecaster::default().predict_series(&series)?;
            print_forecast(&series, &forecast);
        }
        Commands::Session {
            series,
            action,
            impact,
            redeem,
            threshold,
        } => {
            run_session(series, action, impact, redeem, *threshold)?;
        }
        Commands::Serve { addr } => {
            cleantoken_api::start_server(*addr, AppState::new()).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_files_parse_through_the_ordering_check() {
        let good = r#"{"area":"Downtown","readings":[
            {"timestamp":1,"value":80.0},
            {"timestamp":2,"value":85.0},
            {"timestamp":3,"value":78.0}
        ]}"#;
        let series: Series = serde_json::from_str(good).unwrap();
        assert_eq!(series.len(), 3);

        let shuffled = r#"{"area":"Downtown","readings":[
            {"timestamp":3,"value":80.0},
            {"timestamp":1,"value":85.0}
        ]}"#;
        assert!(serde_json::from_str::<Series>(shuffled).is_err());
    }

    #[test]
    fn full_pipeline_from_forecast_to_mint() {
        let series: Series = serde_json::from_str(
            r#"{"area":"Downtown","readings":[
                {"timestamp":1,"value":80.0},
                {"timestamp":2,"value":85.0},
                {"timestamp":3,"value":78.0}
            ]}"#,
        )
        .unwrap();

        let forecast = Forecaster::default().predict_series(&series).unwrap();
        assert_eq!(forecast.value, 81.0);

        let multiplier = IncentivePolicy::default().multiplier(&forecast);
        assert_eq!(multiplier, 1.0);

        let mut ledger = Ledger::new();
        let tx = ledger.mint("Planted 3 trees", 3.0, multiplier).unwrap();
        assert_eq!(tx.amount, 30);
        assert_eq!(ledger.balance(), 30);
    }

    #[test]
    fn session_flow_mints_then_redeems() {
        let mut ledger = Ledger::new();
        let catalog = PerkCatalog::default();

        ledger.mint("Planted 3 trees", 3.0, 1.0).unwrap();
        ledger.mint("Beach cleanup", 7.0, 1.0).unwrap();
        assert_eq!(ledger.balance(), 100);

        let coffee = catalog.get("Coffee Discount").unwrap();
        ledger.redeem(&coffee).unwrap();
        assert_eq!(ledger.balance(), 80);
    }
}
