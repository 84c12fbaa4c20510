//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - sets up logging
//! - parses CLI arguments
//! - runs the scoring pipeline or one of the auxiliary lookups
//! - prints reports
//! - writes optional exports

use clap::Parser;
use log::{info, warn};

use crate::cli::{Command, HoldersArgs, MetricsArgs, ScoreArgs};
use crate::data::{
    BribeClient, HolderClient, MetricsClient, MetricsTable, parse_token, reconstruct_balances, sum_bribes,
};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `gv` binary.
pub fn run() -> Result<(), AppError> {
    init_logging();

    // `gv` and `gv -e 60` behave like `gv score ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Score(args) => handle_score(args),
        Command::Bribes => handle_bribes(),
        Command::Metrics(args) => handle_metrics(args),
        Command::Holders(args) => handle_holders(args),
    }
}

fn init_logging() {
    dotenvy::dotenv().ok();
    // A second init (e.g. from tests) is harmless.
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).try_init();
}

fn handle_score(args: ScoreArgs) -> Result<(), AppError> {
    let run = pipeline::run_score(&args)?;

    println!(
        "{}",
        crate::report::format_run_summary(run.epoch, &run.output, &run.config)
    );
    print!(
        "{}",
        crate::report::format_allocation_table(&run.output.ranked, args.top)
    );

    if let Some(path) = &args.export {
        crate::io::write_results_csv(path, &run.output.ranked)?;
        info!("wrote {}", path.display());
    }
    if let Some(path) = &args.export_json {
        crate::io::write_run_json(path, run.epoch, &run.output)?;
        info!("wrote {}", path.display());
    }

    Ok(())
}

fn handle_bribes() -> Result<(), AppError> {
    let response = BribeClient::from_env().fetch()?;
    println!("{}", crate::report::format_bribe_total(sum_bribes(&response)));
    Ok(())
}

fn handle_metrics(args: MetricsArgs) -> Result<(), AppError> {
    let client = MetricsClient::from_env();
    println!("Fetching data from {}...", client.url_for(args.protocol));
    let data = client.fetch(args.protocol)?;

    if let Some(current) = data.current_epoch {
        println!("\nCurrent epoch: {current}");
    }

    let epoch = match args.epoch {
        Some(e) => e,
        None => crate::cli::picker::prompt_for_epoch(data.current_epoch)?,
    };

    match data.table() {
        MetricsTable::Missing => {
            warn!("metrics payload for {} has no metrics array", args.protocol.slug());
            println!("No data available");
        }
        MetricsTable::Invalid => {
            warn!("metrics payload for {} is not an array", args.protocol.slug());
            println!("Invalid metrics data received");
        }
        MetricsTable::Entries(entries) => match entries.iter().find(|m| m.epoch == epoch) {
            Some(m) => println!("{}", crate::report::format_epoch_metrics(epoch, m)),
            None => println!("No data found for epoch {epoch}"),
        },
    }
    Ok(())
}

fn handle_holders(args: HoldersArgs) -> Result<(), AppError> {
    let token = parse_token(&args.token)?;
    let client = HolderClient::from_env()?;
    let events = client.fetch_transfers(token)?;
    let decimals = client.fetch_decimals(token)?;
    let holders = reconstruct_balances(&events)?;
    info!("{} transfers, {} holders with a positive balance", events.len(), holders.len());

    print!("{}", crate::report::format_holders(&holders, decimals, args.top));

    crate::io::write_holders_csv(&args.export, &holders, decimals, args.top)?;
    println!("CSV file saved: {}", args.export.display());
    Ok(())
}

/// Rewrite argv so `gv` defaults to `gv score`.
///
/// Rules:
/// - `gv`                      -> `gv score`
/// - `gv -e 60 ...`            -> `gv score -e 60 ...`
/// - `gv --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("score".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "score".to_string());
    }
    argv
}
