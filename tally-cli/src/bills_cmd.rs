use anyhow::{Context, Result, bail};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use tally_core::{BillId, CategoryId, UserId};
use tally_review::{LedgerSource, LedgerStore, format_amount, save_ledger_csv};

use crate::config::Config;
use crate::summary_cmd::{FilterArgs, build_filters, load_ledger};

#[derive(Args, Debug)]
pub struct BillsArgs {
    #[arg(long)]
    pub ledger: PathBuf,

    /// List bills still waiting for a category (newest first); filters are
    /// ignored
    #[arg(long)]
    pub uncategorized: bool,

    #[command(flatten)]
    pub filters: FilterArgs,

    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CategorizeArgs {
    #[arg(long)]
    pub ledger: PathBuf,

    /// Bill id as shown by `tally bills`
    #[arg(long)]
    pub bill: u32,

    /// Category name; created if the ledger has no such category
    #[arg(long)]
    pub category: String,

    /// Mark a newly created category as hidden
    #[arg(long)]
    pub hidden: bool,
}

/// One line of `tally bills` output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillLine {
    pub id: BillId,
    pub date: chrono::NaiveDate,
    pub description: String,
    pub value: f64,
    pub category: Option<String>,
}

pub fn run_bills(args: &BillsArgs, cfg: &Config, user_id: UserId) -> Result<()> {
    let store = load_ledger(&args.ledger, user_id)?;
    let lines = list_bills(args, cfg, &store, user_id)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&lines)?);
        return Ok(());
    }
    for line in &lines {
        println!(
            "{:>5}  {}  {:>12}  {:<20}  {}",
            line.id,
            line.date,
            format_amount(line.value),
            line.category.as_deref().unwrap_or("-"),
            line.description
        );
    }
    println!("\n{} bills", lines.len());
    Ok(())
}

pub fn list_bills(
    args: &BillsArgs,
    cfg: &Config,
    store: &LedgerStore,
    user_id: UserId,
) -> Result<Vec<BillLine>> {
    if args.uncategorized {
        return Ok(store
            .uncategorized(user_id)
            .into_iter()
            .map(|b| BillLine {
                id: b.id,
                date: b.date,
                description: b.description.clone(),
                value: b.value,
                category: None,
            })
            .collect());
    }

    let filters = build_filters(&args.filters, cfg, store, user_id)?;
    let rows = store.fetch(&filters).context("reading ledger")?;
    Ok(rows
        .into_iter()
        .map(|r| BillLine {
            id: r.bill_id,
            date: r.date,
            description: r.description,
            value: r.value,
            category: r.category_name,
        })
        .collect())
}

pub fn run_categorize(args: &CategorizeArgs, user_id: UserId) -> Result<()> {
    let mut store = load_ledger(&args.ledger, user_id)?;
    let category_id =
        categorize_bill(&mut store, user_id, BillId(args.bill), &args.category, args.hidden)?;
    save_ledger_csv(&args.ledger, &store, user_id)
        .with_context(|| format!("writing {}", args.ledger.display()))?;

    println!(
        "Bill {} -> category {} ({} uncategorized left)",
        args.bill,
        category_id,
        store.uncategorized(user_id).len()
    );
    Ok(())
}

/// Assign `category` to a bill, creating the category if needed.
pub fn categorize_bill(
    store: &mut LedgerStore,
    user_id: UserId,
    bill_id: BillId,
    category: &str,
    hidden: bool,
) -> Result<CategoryId> {
    if !store.bills().iter().any(|b| b.id == bill_id && b.user_id == user_id) {
        bail!("No bill with id {bill_id} (see: tally bills)");
    }
    let category_id = match store.category_by_name(user_id, category) {
        Some(existing) => existing.id,
        None => {
            let id = store.add_category(user_id, category, hidden)?;
            tracing::info!(%id, name = category.trim(), "created category");
            id
        }
    };
    store.categorize(bill_id, category_id)?;
    Ok(category_id)
}
