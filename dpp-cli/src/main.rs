//! dpp - Emission Data Passport
//! Calibrate an MQ gas sensor, record one measurement and anchor its digest

use anyhow::Context;
use clap::{Parser, Subcommand};
use dpp_anchor::IntegrityAnchor;
use dpp_cli::{Session, SessionConfig, SessionError, SessionReport, exit};
use dpp_core::CancellationToken;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dpp")]
#[command(author = "Silvano Neto <dev@silvanoneto.com>")]
#[command(version = "2026.1.16")]
#[command(about = "Emission data passport: calibrated gas readings anchored on a ledger", long_about = None)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, global = true, value_name = "FILE", env = "DPP_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calibrate, measure, persist and anchor one record
    Run {
        /// Device identifier written into the record
        #[arg(long)]
        device_id: Option<String>,

        /// Location label
        #[arg(long)]
        location: Option<String>,

        /// Gas type label
        #[arg(long)]
        gas_type: Option<String>,

        /// Directory for records and receipts
        #[arg(long, value_name = "DIR")]
        storage_dir: Option<PathBuf>,
    },

    /// Anchor an already persisted record
    Anchor {
        #[arg(value_name = "RECORD")]
        record: PathBuf,
    },

    /// Check a persisted record against its anchor
    Verify {
        #[arg(value_name = "RECORD")]
        record: PathBuf,

        /// Receipt file (defaults to the record's .receipt.json sidecar)
        #[arg(long, value_name = "FILE")]
        receipt: Option<PathBuf>,
    },

    /// Print the SHA-256 of a persisted record
    Digest {
        #[arg(value_name = "RECORD")]
        record: PathBuf,
    },

    /// Print the effective configuration
    Config,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "dpp=info,dpp_cli=info,dpp_olfactory=info,dpp_record=info,dpp_anchor=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = execute(cli) {
        eprintln!("error: {e:#}");
        let code = e
            .downcast_ref::<SessionError>()
            .map(SessionError::exit_code)
            .unwrap_or(exit::FAILURE);
        std::process::exit(code);
    }
}

fn execute(cli: Cli) -> anyhow::Result<()> {
    let mut config = SessionConfig::load(cli.config.as_deref()).map_err(SessionError::from)?;

    match cli.command {
        Commands::Run {
            device_id,
            location,
            gas_type,
            storage_dir,
        } => {
            config
                .apply_overrides(device_id, location, gas_type, storage_dir)
                .map_err(SessionError::from)?;
            run_command(&config)
        }
        Commands::Anchor { record } => anchor_command(&config, record),
        Commands::Verify { record, receipt } => verify_command(&config, record, receipt),
        Commands::Digest { record } => {
            let digest = dpp_cli::digest_record(&record)
                .with_context(|| format!("cannot digest {}", record.display()))?;
            println!("{digest}");
            Ok(())
        }
        Commands::Config => {
            print!("{}", config.to_toml_string().map_err(SessionError::from)?);
            Ok(())
        }
    }
}

fn run_command(config: &SessionConfig) -> anyhow::Result<()> {
    let mut session = Session::from_config(config, CancellationToken::new())?;
    let report = session.run()?;
    print_report(&report);
    Ok(())
}

fn anchor_command(config: &SessionConfig, record: PathBuf) -> anyhow::Result<()> {
    let anchor = IntegrityAnchor::with_config(
        config.build_ledger().map_err(SessionError::from)?,
        config.anchor_config(),
    );
    let (receipt, receipt_path) = dpp_cli::anchor_record(&anchor, &record)
        .with_context(|| format!("cannot anchor {}", record.display()))?;

    println!("SHA-256(XML)      : {}", receipt.digest);
    println!("Blockchain TX Hash: {}", receipt.transaction_id);
    println!("Block Number      : {}", receipt.sequence_number);
    println!("Receipt           : {}", receipt_path.display());
    Ok(())
}

fn verify_command(config: &SessionConfig, record: PathBuf, receipt: Option<PathBuf>) -> anyhow::Result<()> {
    let anchor = IntegrityAnchor::with_config(
        config.build_ledger().map_err(SessionError::from)?,
        config.anchor_config(),
    );
    let verification = dpp_cli::verify_record(&anchor, &record, receipt.as_deref())
        .with_context(|| format!("cannot verify {}", record.display()))?;
    println!("{}: {verification}", record.display());
    Ok(())
}

fn print_report(report: &SessionReport) {
    let m = &report.measurement;
    println!("Cal Vout: {:.3} V | R0: {:.1} ohm", report.baseline.voltage, report.baseline.r0);
    println!();
    println!("Timestamp: {}", m.timestamp_str());
    println!("DeviceID : {}", m.device_id);
    println!("Vout     : {:.3} V", m.voltage);
    println!("Rs       : {:.1} ohm", m.resistance);
    println!("Rs/R0    : {:.3}", m.ratio);
    println!("GasType  : {}", m.gas_type);
    println!("Location : {}", m.location);
    println!();
    println!("{}", report.record);
    println!();
    println!("Saved XML → {}", report.record_path.display());
    println!("SHA-256(XML): {}", report.digest);
    println!();
    println!("Blockchain TX Hash: {}", report.receipt.transaction_id);
    println!("Block Number      : {}", report.receipt.sequence_number);
}
