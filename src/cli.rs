use crate::export::ExportFormat;
use crate::persistence::Backend;
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use rotor_ledger_common::{MovementType, Record, RecordFilter, StockStatus};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rotor-ledger")]
#[command(about = "Rotor part stock ledger: log movements, view stock, export", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose diagnostics on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Ledger file (overrides config and ROTOR_LEDGER_DATA)
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Storage backend (csv/xlsx/json)
    #[arg(long, global = true)]
    pub backend: Option<Backend>,
}

/// Fields of one movement entry, shared by `add` and `edit`
#[derive(Args, Debug, Clone)]
pub struct RecordArgs {
    /// Rotor size in mm
    #[arg(short, long)]
    pub size: String,

    /// Number of rotors (at least 1)
    #[arg(short, long)]
    pub quantity: u32,

    /// Entry type (in/out)
    #[arg(short = 't', long = "type")]
    pub movement: MovementType,

    /// Entry date, YYYY-MM-DD (default: today)
    #[arg(short, long)]
    pub date: Option<NaiveDate>,

    /// Recorded but not yet received
    #[arg(long)]
    pub pending: bool,

    /// Stock status (current/incoming)
    #[arg(long, default_value = "current")]
    pub status: StockStatus,

    /// Free-text remarks
    #[arg(short, long, default_value = "")]
    pub remarks: String,
}

impl RecordArgs {
    pub fn into_record(self) -> rotor_ledger_common::Result<Record> {
        let date = self.date.unwrap_or_else(|| Local::now().date_naive());
        Ok(Record::new(date, self.size, self.quantity, self.movement)?
            .with_pending(self.pending)
            .with_status(self.status)
            .with_remarks(self.remarks))
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Only this status (current/incoming)
    #[arg(long)]
    pub status: Option<StockStatus>,

    /// Only pending (true) or settled (false) entries
    #[arg(long)]
    pub pending: Option<bool>,

    /// Only this rotor size
    #[arg(long)]
    pub size: Option<String>,

    /// Remarks contain this text (case-insensitive)
    #[arg(long)]
    pub remarks: Option<String>,

    /// Only this date
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// From this date (inclusive)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Up to this date (inclusive)
    #[arg(long)]
    pub to: Option<NaiveDate>,
}

impl From<FilterArgs> for RecordFilter {
    fn from(args: FilterArgs) -> Self {
        RecordFilter {
            status: args.status,
            pending: args.pending,
            size: args.size,
            remarks: args.remarks,
            date: args.date,
            date_from: args.from,
            date_to: args.to,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log one movement
    Add {
        #[command(flatten)]
        record: RecordArgs,
    },

    /// Interactive entry form
    Form {
        /// Edit the entry at this position instead of adding new ones
        #[arg(long)]
        edit: Option<usize>,
    },

    /// Replace the entry at a position
    Edit {
        /// Position as shown by `list`
        position: usize,

        #[command(flatten)]
        record: RecordArgs,
    },

    /// Delete entries by position
    Remove {
        #[arg(required = true)]
        positions: Vec<usize>,
    },

    /// Show the movement log
    List {
        #[command(flatten)]
        filter: FilterArgs,

        /// Add a running balance column
        #[arg(long)]
        balance: bool,

        /// Order by date instead of entry order
        #[arg(long)]
        sort_date: bool,
    },

    /// Show stock per size
    Stock {
        /// Available stock: current and inward only, pending excluded
        #[arg(long)]
        available: bool,

        /// Keep sizes whose stock is zero
        #[arg(long)]
        include_zero: bool,
    },

    /// Export the ledger
    Export {
        /// Output format (csv/xlsx)
        #[arg(short, long, default_value = "csv")]
        format: ExportFormat,

        /// Output file or directory (default: current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// File name stem / workbook title
        #[arg(short, long)]
        title: Option<String>,
    },

    /// Show or edit settings
    Config {
        /// Show settings
        #[arg(long)]
        show: bool,

        /// Set the ledger file (backend follows the extension)
        #[arg(long)]
        set_data_path: Option<PathBuf>,

        /// Set the storage backend
        #[arg(long)]
        set_backend: Option<Backend>,

        /// Show zero-stock sizes by default
        #[arg(long)]
        set_include_zero: Option<bool>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from([
            "rotor-ledger", "add", "--size", "32", "--quantity", "10", "--type", "in",
            "--date", "2024-01-10", "--remarks", "opening",
        ])
        .expect("parse failed");

        match cli.command {
            Commands::Add { record } => {
                let record = record.into_record().expect("valid record");
                assert_eq!(record.size, "32");
                assert_eq!(record.quantity, 10);
                assert_eq!(record.movement, MovementType::Inward);
                assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
                assert_eq!(record.status, StockStatus::Current);
                assert!(!record.pending);
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn test_parse_add_zero_quantity_is_rejected_later() {
        let cli = Cli::try_parse_from([
            "rotor-ledger", "add", "-s", "32", "-q", "0", "-t", "out",
        ])
        .expect("parse failed");

        match cli.command {
            Commands::Add { record } => assert!(record.into_record().is_err()),
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn test_parse_list_filters() {
        let cli = Cli::try_parse_from([
            "rotor-ledger", "list", "--status", "incoming", "--pending", "true",
            "--from", "2024-01-01", "--to", "2024-01-31", "--balance", "--sort-date",
        ])
        .expect("parse failed");

        match cli.command {
            Commands::List { filter, balance, sort_date } => {
                assert!(sort_date);
                let filter = RecordFilter::from(filter);
                assert_eq!(filter.status, Some(StockStatus::Incoming));
                assert_eq!(filter.pending, Some(true));
                assert_eq!(filter.date_from, NaiveDate::from_ymd_opt(2024, 1, 1));
                assert!(balance);
            }
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from([
            "rotor-ledger", "stock", "--available", "--data", "log.json", "--backend", "json", "-v",
        ])
        .expect("parse failed");

        assert!(cli.verbose);
        assert_eq!(cli.data, Some(PathBuf::from("log.json")));
        assert_eq!(cli.backend, Some(Backend::Json));
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let result = Cli::try_parse_from([
            "rotor-ledger", "add", "-s", "32", "-q", "1", "-t", "sideways",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_remove_requires_position() {
        assert!(Cli::try_parse_from(["rotor-ledger", "remove"]).is_err());
        let cli = Cli::try_parse_from(["rotor-ledger", "remove", "2", "0"]).expect("parse failed");
        match cli.command {
            Commands::Remove { positions } => assert_eq!(positions, vec![2, 0]),
            _ => panic!("expected remove"),
        }
    }
}
