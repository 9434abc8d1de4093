//! Fraud Shield - Operator CLI
//!
//! Runs the same service the checkout embeds, against a local data dir.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;

use fraud_shield_core::api::commands;
use fraud_shield_core::constants::{APP_NAME, APP_VERSION};
use fraud_shield_core::logic::client::{ClientContext, RequestHeaders};
use fraud_shield_core::logic::error::ShieldResult;
use fraud_shield_core::logic::honeypot::{CartSnapshot, CheckoutCycle};
use fraud_shield_core::logic::risk::{CheckoutFields, OrderFacts, OrderSource};
use fraud_shield_core::FraudShield;

#[derive(Parser)]
#[command(name = "fraud-shield")]
#[command(version, about = "Checkout fraud decision core", long_about = None)]
struct Cli {
    /// Data directory (logs, stats, config); defaults to FRAUD_SHIELD_DATA_DIR
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score an OrderFacts JSON file and print the assessment
    Score {
        /// Path to the facts file
        facts: PathBuf,
    },

    /// Print running statistics and this month's summary
    Stats,

    /// Clear event logs
    Clear {
        /// Only this type (honeypot, order_analysis, high_risk_alert, system)
        event_type: Option<String>,
    },

    /// Push a honeypot cart and a submitted order through the service
    Simulate,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    log::info!("{} v{}", APP_NAME, APP_VERSION);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> ShieldResult<()> {
    let shield = FraudShield::open(cli.data_dir)?;

    match cli.command {
        Commands::Score { facts } => {
            let data = fs::read(&facts)?;
            let facts: OrderFacts = serde_json::from_slice(&data)?;
            print_json(&shield.score(&facts))
        }
        Commands::Stats => {
            #[derive(Serialize)]
            struct Report {
                statistics: fraud_shield_core::logic::stats::RunningStats,
                monthly: fraud_shield_core::logic::stats::MonthlySummary,
            }
            print_json(&Report {
                statistics: commands::get_statistics(&shield),
                monthly: commands::get_monthly_summary(&shield)?,
            })
        }
        Commands::Clear { event_type } => {
            let removed = commands::clear_logs(&shield, event_type.as_deref())?;
            println!("Removed {} log partition(s)", removed);
            Ok(())
        }
        Commands::Simulate => {
            shield.record_startup();
            simulate(&shield)
        }
    }
}

fn simulate(shield: &FraudShield) -> ShieldResult<()> {
    let headers = RequestHeaders::new()
        .with_header("X-Forwarded-For", "10.0.0.7, 81.2.69.142")
        .with_header("User-Agent", "python-requests/2.31")
        .with_remote_addr("10.0.0.1");
    let client = ClientContext::resolve(&headers);

    let honeypot_id = shield
        .config()
        .honeypot_product_ids
        .iter()
        .next()
        .copied()
        .unwrap_or(fraud_shield_core::constants::DEFAULT_HONEYPOT_PRODUCT_ID);

    let mut cart = CartSnapshot::default()
        .with_item(honeypot_id, 1, 1.0)
        .with_item(1001, 3, 45.0);
    let mut cycle = CheckoutCycle::begin();
    // Hooks fire more than once per user action
    for _ in 0..2 {
        shield.on_cart_recalculated(&mut cart, &client, &mut cycle);
    }

    let fields = CheckoutFields {
        billing_email: "buyer123456@mailinator.com".into(),
        billing_first_name: "Xxxx".into(),
        billing_country: "NG".into(),
        shipping_country: "US".into(),
        payment_method: "cod".into(),
        currency: "USD".into(),
        ..Default::default()
    };
    let source = OrderSource::Submitted {
        fields: &fields,
        cart: &cart,
    };
    if let Some(assessment) = shield.on_order_submitted(&source, &client) {
        println!("Order scored {} ({})", assessment.score, assessment.risk_level);
    }

    print_json(&commands::get_recent_events(shield, 20))
}

fn print_json<T: Serialize>(value: &T) -> ShieldResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
