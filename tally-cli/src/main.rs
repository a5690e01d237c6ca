use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tally_core::UserId;
use tally_ingest::{PlainTextExtractor, StatementParser, Transaction, parse_statement_file};
use tally_review::{LedgerStore, format_amount, load_ledger_csv, save_ledger_csv};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

mod bills_cmd;
mod config;
mod state;
mod summary_cmd;

use bills_cmd::{BillsArgs, CategorizeArgs};
use config::Config;
use summary_cmd::SummaryArgs;

/// The CLI keeps a single user's ledger.
const LOCAL_USER: UserId = UserId(1);

#[derive(Parser, Debug)]
#[command(
    name = "tally",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("TALLY_BUILD_SHA"), ")"),
    about = "Parse card statements and summarize spending by month and category"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a statement text file and print its transactions
    Parse {
        /// Extracted statement text
        #[arg(long)]
        text: PathBuf,

        /// Also write the transactions to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Reject transactions dated outside the statement window
        #[arg(long)]
        strict_window: bool,
    },

    /// Parse a statement and append its transactions to a ledger as
    /// uncategorized bills
    Import {
        #[arg(long)]
        text: PathBuf,

        /// Ledger CSV (created if missing)
        #[arg(long)]
        ledger: PathBuf,

        #[arg(long)]
        strict_window: bool,
    },

    /// List bills with their ids, filtered like `summary`
    Bills(BillsArgs),

    /// Assign a category to a bill
    Categorize(CategorizeArgs),

    /// Month x category spending summary of a ledger
    Summary(SummaryArgs),

    /// Manage ~/.tally/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
    /// Print the effective config
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config()?;
    init_logging(&cfg.log.level);

    match cli.command {
        Command::Parse {
            text,
            csv,
            strict_window,
        } => {
            let txns = parse_text(&text, &cfg, strict_window)?;
            for t in &txns {
                println!("{}  {:>12}  {}", t.date, format_amount(t.value), t.description);
            }
            println!("\nParsed {} transactions from {}", txns.len(), text.display());

            if let Some(out) = csv {
                write_transactions_csv(&out, &txns)?;
                println!("Wrote {}", out.display());
            }
        }

        Command::Import {
            text,
            ledger,
            strict_window,
        } => {
            let txns = parse_text(&text, &cfg, strict_window)?;

            let mut store = if ledger.exists() {
                load_ledger_csv(&ledger, LOCAL_USER)
                    .with_context(|| format!("loading {}", ledger.display()))?
            } else {
                LedgerStore::new()
            };
            store.insert_statement(LOCAL_USER, &txns);
            save_ledger_csv(&ledger, &store, LOCAL_USER)
                .with_context(|| format!("writing {}", ledger.display()))?;

            println!(
                "Imported {} transactions into {} ({} uncategorized)",
                txns.len(),
                ledger.display(),
                store.uncategorized(LOCAL_USER).len()
            );
        }

        Command::Bills(args) => {
            bills_cmd::run_bills(&args, &cfg, LOCAL_USER)?;
        }

        Command::Categorize(args) => {
            bills_cmd::run_categorize(&args, LOCAL_USER)?;
        }

        Command::Summary(args) => {
            summary_cmd::run_summary(&args, &cfg, LOCAL_USER)?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => config::show_config()?,
        },
    }

    Ok(())
}

/// Log to stderr. RUST_LOG wins over the configured level.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(filter),
        )
        .init();
}

fn parse_text(path: &Path, cfg: &Config, strict_window: bool) -> Result<Vec<Transaction>> {
    if !path.exists() {
        bail!("Statement text not found: {}", path.display());
    }
    let parser = StatementParser::new().strict_window(strict_window || cfg.parse.strict_window);
    parse_statement_file(&PlainTextExtractor, &parser, path)
        .with_context(|| format!("parsing {}", path.display()))
}

fn write_transactions_csv(path: &Path, txns: &[Transaction]) -> Result<()> {
    let mut wtr =
        csv::Writer::from_path(path).with_context(|| format!("create {}", path.display()))?;
    for t in txns {
        wtr.serialize(t)?;
    }
    wtr.flush().with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
