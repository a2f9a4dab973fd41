//! energy-ledger entry point: CLI wiring and store selection.

use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::Parser;

use energy_ledger::cli::{Cli, Command, SimulateArgs};
use energy_ledger::config::LedgerConfig;
use energy_ledger::feed::Feed;
use energy_ledger::io::export::export_csv;
use energy_ledger::logging;
use energy_ledger::store::{JournalStore, LedgerStore};
use energy_ledger::EnergyLedger;

fn load_config(cli: &Cli) -> anyhow::Result<LedgerConfig> {
    let mut config = match &cli.config {
        Some(path) => LedgerConfig::from_toml_file(path)?,
        None => LedgerConfig::default(),
    };
    if let Some(path) = &cli.journal {
        config.store.journal = Some(path.clone());
    }
    if let Command::Simulate(SimulateArgs { preset, seed, .. }) = &cli.command {
        if let Some(name) = preset {
            config.feed = LedgerConfig::from_preset(name)?.feed;
        }
        if let Some(seed) = seed {
            config.feed.seed = *seed;
        }
    }

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        bail!("invalid configuration ({} errors)", errors.len());
    }
    Ok(config)
}

fn execute<S: LedgerStore>(
    ledger: &EnergyLedger<S>,
    command: Command,
    config: &LedgerConfig,
) -> anyhow::Result<()> {
    match command {
        Command::Record(args) => {
            let record = ledger.record_energy(&args.account, args.produced, args.consumed)?;
            println!("{}: {record}", args.account);
        }
        Command::Show(args) => {
            let snapshot = ledger.snapshot(&args.account);
            if args.json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                for r in &snapshot.records {
                    println!("{r}");
                }
                println!(
                    "{}: total produced={} Wh, total consumed={} Wh",
                    snapshot.account, snapshot.total_produced, snapshot.total_consumed
                );
            }
        }
        Command::Report(args) => {
            let report = ledger.report();
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{report}");
            }
        }
        Command::Simulate(args) => {
            let mut feed = Feed::from_config(&config.feed)?;
            let recorded = feed.run(ledger)?;
            eprintln!("Recorded {recorded} readings");
            println!("{}", ledger.report());

            if let Some(path) = &args.export {
                export_csv(ledger, path)
                    .with_context(|| format!("failed to write CSV to {}", path.display()))?;
                eprintln!("Ledger written to {}", path.display());
            }
        }
    }
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    logging::init(&config.logging);

    match &config.store.journal {
        Some(path) => {
            let store = JournalStore::open(path)
                .with_context(|| format!("failed to open journal {}", path.display()))?;
            execute(&EnergyLedger::with_store(store), cli.command, &config)
        }
        None => execute(&EnergyLedger::new(), cli.command, &config),
    }
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
