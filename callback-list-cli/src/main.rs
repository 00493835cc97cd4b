//! Callback List CLI Application
//!
//! Command-line scenario runner for the callback-list library. It loads a
//! TOML scenario and adds:
//! - Scripted callbacks that can reenter the list (add, remove, fire, lock...)
//! - An invocation trace tagged by scenario step
//! - Text or JSON reports

use anyhow::Result;
use callback_list::FlagCache;
use clap::Parser;
use std::path::PathBuf;

mod callbacks;
mod config;
mod events;
mod report;
mod scenario;

/// Callback List - Run callback list scenarios
#[derive(Parser, Debug)]
#[command(name = "callback-list-cli")]
#[command(about = "Run scripted callback list scenarios and trace every invocation", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the scenario file (.toml)
    #[arg(short, long, value_name = "FILE")]
    scenario: PathBuf,

    /// Override the scenario flags (e.g. "once memory")
    #[arg(long, value_name = "FLAGS")]
    flags: Option<String>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Callback List CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using callback-list library v{}", callback_list::VERSION);

    let mut config = config::load_config(&args.scenario)?;
    if let Some(flags) = args.flags {
        log::debug!("Overriding scenario flags with {:?}", flags);
        config.flags = config::FlagsConfig::Names(flags);
        config.validate()?;
    }

    let mut cache = FlagCache::new();
    let report = scenario::run(&config, &mut cache)?;

    if args.json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.to_text());
    }

    Ok(())
}

/// Initialize logging based on verbosity level
///
/// The report goes to stdout, so by default only warnings reach stderr;
/// `-v` adds per-run info and `-vv` the list's lifecycle debug messages.
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
