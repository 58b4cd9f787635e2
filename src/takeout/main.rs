//! HP takeout detector.
//!
//! Reconciles a survey KMZ/KML against a design KMZ/KML, lists the survey
//! home-passes missing from the design together with their nearest FAT, and
//! exports them as CSV.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use hp_takeout::export::{read_csv, DEFAULT_EXPORT_FILE};
use hp_takeout::report::render_table;
use hp_takeout::{ClassifierPolicy, ReconcileConfig, RunResult, Session};

#[derive(Parser, Debug)]
#[command(name = "takeout")]
#[command(about = "Find survey home-passes missing from the design and their nearest FAT")]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Reconcile a survey document against a design document
    Run(RunArgs),
    /// Print a previously exported takeout CSV
    Show {
        /// CSV file written by `takeout run`
        file: PathBuf,
    },
}

#[derive(clap::Args, Debug)]
struct RunArgs {
    /// Survey (as-built) KMZ or KML file
    #[arg(short, long)]
    survey: Option<PathBuf>,

    /// Design (as-planned) KMZ or KML file
    #[arg(short, long)]
    design: Option<PathBuf>,

    /// Proximity fallback radius in meters (0 disables it)
    #[arg(short, long)]
    radius: Option<f64>,

    /// Classifier policy: folder or name-blacklist
    #[arg(long)]
    policy: Option<ClassifierPolicy>,

    /// Optional TOML config file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Never match unnamed points to each other by identifier
    #[arg(long)]
    no_unnamed_id_match: bool,

    /// CSV output path
    #[arg(short, long, default_value = DEFAULT_EXPORT_FILE)]
    output: PathBuf,

    /// Skip writing the CSV export
    #[arg(long)]
    no_export: bool,

    /// Print the run result as JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(if args.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        })
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match args.command {
        Command::Run(run) => run_reconcile(run).await,
        Command::Show { file } => show_export(&file),
    }
}

fn build_config(args: &RunArgs) -> Result<ReconcileConfig> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading config from {}", path.display());
            ReconcileConfig::load_from_file(path)?
        }
        None => ReconcileConfig::default(),
    };

    if let Some(radius) = args.radius {
        config.radius_meters = radius;
    }
    if let Some(policy) = args.policy {
        config.policy = policy;
    }
    if args.no_unnamed_id_match {
        config.match_unnamed_by_id = false;
    }

    Ok(config)
}

async fn run_reconcile(args: RunArgs) -> Result<()> {
    let config = build_config(&args)?;

    info!("HP Takeout Detector");
    if let Some(survey) = &args.survey {
        info!("Survey: {}", survey.display());
    }
    if let Some(design) = &args.design {
        info!("Design: {}", design.display());
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message("Parsing KMZ...");
    pb.enable_steady_tick(Duration::from_millis(100));

    let mut session = Session::new();
    let outcome = session
        .run(args.survey.as_deref(), args.design.as_deref(), &config)
        .await;
    pb.finish_and_clear();

    let result = outcome.context("Reconciliation failed")?;
    print_result(result, args.json)?;

    if args.no_export {
        return Ok(());
    }

    if !session.can_export() {
        warn!("No TAKEOUT rows, skipping CSV export");
        return Ok(());
    }

    let file = File::create(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    let count = session.export_csv(BufWriter::new(file))?;
    info!("Wrote {} rows to {}", count, args.output.display());

    Ok(())
}

fn print_result(result: &RunResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    println!("{}", result.stats);
    if !result.rows.is_empty() {
        println!();
        print!("{}", render_table(&result.rows));
    }

    Ok(())
}

fn show_export(path: &Path) -> Result<()> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let rows = read_csv(BufReader::new(file))
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    info!("{} takeout rows in {}", rows.len(), path.display());
    print!("{}", render_table(&rows));
    Ok(())
}
