use anyhow::Context;
use clap::Parser;
use rotor_ledger::{cli, config, export, form, persistence, report, session};
use cli::{Cli, Commands};
use config::Config;
use persistence::Backend;
use rotor_ledger_common::{running_balance, RecordFilter, StockOptions};
use session::LedgerSession;
use std::path::PathBuf;
use tracing::Level;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::load().context("failed to load config")?;

    // Settings are handled before the ledger is opened
    if let Commands::Config { show, set_data_path, set_backend, set_include_zero } = &cli.command {
        if let Some(path) = set_data_path {
            config.set_data_path(path.clone())?;
            println!("✔ Data file set to {} ({})", config.data_path.display(), config.backend);
        }
        if let Some(backend) = *set_backend {
            config.set_backend(backend)?;
            println!("✔ Backend set to {}", backend);
        }
        if let Some(include_zero) = *set_include_zero {
            config.set_include_zero(include_zero)?;
            println!("✔ Zero-stock sizes {}", if include_zero { "shown" } else { "hidden" });
        }
        if *show {
            println!("Settings:");
            println!("  Config file: {}", Config::config_path()?.display());
            println!("  Backend: {}", config.backend);
            println!("  Data file: {}", config.resolved_data_path().display());
            println!("  Show zero stock: {}", if config.include_zero { "yes" } else { "no" });
            println!("  Export title: {}", config.export_title);
        }
        return Ok(());
    }

    let data_path = cli.data.clone().unwrap_or_else(|| config.resolved_data_path());
    let backend = cli
        .backend
        .or_else(|| Backend::from_path(&data_path))
        .unwrap_or(config.backend);
    tracing::debug!(path = %data_path.display(), %backend, "opening ledger");

    let adapter = persistence::open_adapter(backend, data_path.clone());
    let mut session = LedgerSession::open(adapter)
        .with_context(|| format!("failed to open ledger {}", data_path.display()))?;

    match cli.command {
        Commands::Add { record } => {
            let record = record.into_record()?;
            let position = session.append(record)?;
            println!("✔ Entry #{} added", position);
        }

        Commands::Form { edit: None } => {
            println!("🔧 rotor-ledger - new entries\n");
            let added = form::run_entry_form(&mut session)?;
            println!("\n✅ {} entr{} saved", added, if added == 1 { "y" } else { "ies" });
        }

        Commands::Form { edit: Some(position) } => {
            let current = session
                .store()
                .get(position)
                .cloned()
                .ok_or(rotor_ledger_common::Error::OutOfRange { position, len: session.records().len() })?;
            println!("🔧 rotor-ledger - editing entry #{}\n", position);
            let hints = form::collect_existing_sizes(session.records());
            let record = form::prompt_record(&hints, Some(&current))?;
            session.update(position, record)?;
            println!("✔ Entry #{} updated", position);
        }

        Commands::Edit { position, record } => {
            session.update(position, record.into_record()?)?;
            println!("✔ Entry #{} updated", position);
        }

        Commands::Remove { positions } => {
            let removed = session.remove_many(&positions)?;
            println!("✔ Removed {} entr{}", removed.len(), if removed.len() == 1 { "y" } else { "ies" });
        }

        Commands::List { filter, balance, sort_date } => {
            let filter = RecordFilter::from(filter);
            let mut rows = session.filter(&filter);
            if sort_date {
                report::sort_by_date(&mut rows);
            }
            let balances = balance.then(|| running_balance(session.records()));
            print!("{}", report::format_ledger(&rows, balances.as_deref()));
            if !filter.is_empty() {
                println!("{} of {} entries", rows.len(), session.records().len());
            }
        }

        Commands::Stock { available, include_zero } => {
            let options = StockOptions { include_zero: include_zero || config.include_zero };
            let (levels, heading) = if available {
                (session.available_stock(options), "Available stock (current, received)")
            } else {
                (session.net_stock(options), "Net stock")
            };
            print!("{}", report::format_stock(&levels, heading));
        }

        Commands::Export { format, output, title } => {
            let title = title.unwrap_or_else(|| config.export_title.clone());
            let output = output.unwrap_or_else(|| PathBuf::from("."));
            let path = export::export_records(session.records(), format, &output, &title)?;
            println!("✔ Exported {} entries to {}", session.records().len(), path.display());
        }

        Commands::Config { .. } => unreachable!("handled before the ledger is opened"),
    }

    Ok(())
}
