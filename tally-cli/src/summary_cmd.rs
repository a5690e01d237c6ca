use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::Args;
use std::path::{Path, PathBuf};
use tally_core::{FilterSpec, UserId};
use tally_review::{LedgerData, LedgerStore, SummaryTable, load_ledger_csv, render_summary};

use crate::config::Config;

/// Bill filters shared by `summary` and `bills`.
#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Earliest bill date (inclusive), YYYY-MM-DD
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Latest bill date (inclusive), YYYY-MM-DD
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Case-insensitive description substring
    #[arg(long)]
    pub search: Option<String>,

    /// Restrict to these categories (repeatable)
    #[arg(long = "category", value_name = "NAME")]
    pub categories: Vec<String>,

    /// Include bills in hidden categories
    #[arg(long)]
    pub include_hidden: bool,

    #[arg(long, allow_negative_numbers = true)]
    pub min: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    pub max: Option<f64>,
}

#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Ledger CSV to summarize
    #[arg(long)]
    pub ledger: PathBuf,

    #[command(flatten)]
    pub filters: FilterArgs,

    /// Keep the first and last months even if they are only partly covered
    #[arg(long)]
    pub keep_boundary_months: bool,

    /// Print the table as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run_summary(args: &SummaryArgs, cfg: &Config, user_id: UserId) -> Result<()> {
    let store = load_ledger(&args.ledger, user_id)?;

    let filters = build_filters(&args.filters, cfg, &store, user_id)?;
    let drop_boundary = cfg.review.drop_boundary_months && !args.keep_boundary_months;
    let table = summarize(&filters, &store, drop_boundary)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&table)?);
    } else {
        print!("{}", render_summary(&table));
    }
    Ok(())
}

/// Load an existing ledger file.
pub fn load_ledger(path: &Path, user_id: UserId) -> Result<LedgerStore> {
    if !path.exists() {
        bail!("Ledger not found: {} (run: tally import)", path.display());
    }
    load_ledger_csv(path, user_id).with_context(|| format!("loading {}", path.display()))
}

/// Turn command-line filters into a [`FilterSpec`]. Category names are
/// resolved against the user's categories.
pub fn build_filters(
    args: &FilterArgs,
    cfg: &Config,
    store: &LedgerStore,
    user_id: UserId,
) -> Result<FilterSpec> {
    let mut filters = FilterSpec::for_user(user_id)
        .include_hidden(args.include_hidden || !cfg.review.exclude_hidden);

    if let Some(from) = args.from {
        filters = filters.with_start_date(from);
    }
    if let Some(to) = args.to {
        filters = filters.with_end_date(to);
    }
    if let Some(search) = &args.search {
        filters = filters.with_description(search.as_str());
    }
    for name in &args.categories {
        let Some(category) = store.category_by_name(user_id, name) else {
            bail!("Unknown category: {name}");
        };
        filters = filters.with_category(category.id);
    }
    if let Some(min) = args.min {
        filters = filters.with_min_value(min);
    }
    if let Some(max) = args.max {
        filters = filters.with_max_value(max);
    }
    Ok(filters)
}

/// Snapshot, optionally drop the boundary months, and pivot. A failed
/// boundary filter falls back to the unfiltered data with a warning.
pub fn summarize(filters: &FilterSpec, store: &LedgerStore, drop_boundary: bool) -> Result<SummaryTable> {
    let mut data = LedgerData::new(filters, store).context("reading ledger")?;

    if drop_boundary && !data.is_empty() {
        if let Err(err) = data.filter_first_and_last_month() {
            tracing::warn!(%err, "keeping boundary months");
            eprintln!(
                "warning: {err}; the first and last months shown may be incomplete"
            );
        }
    }
    Ok(data.summarize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> LedgerStore {
        let data = "\
date,description,value,category,hidden
2020-01-05,zehrs,10.00,groceries,false
2020-02-05,zehrs,20.00,groceries,false
2020-03-05,zehrs,30.00,groceries,false
2020-03-06,hidden,99.00,secret,true
";
        tally_review::read_ledger_csv(data.as_bytes(), UserId(1)).unwrap()
    }

    #[test]
    fn test_summarize_drops_boundary_months() {
        let filters = FilterSpec::for_user(UserId(1));
        let table = summarize(&filters, &store(), true).unwrap();
        assert_eq!(table.months().count(), 1);
        assert_eq!(table.columns, vec!["groceries", "Total"]);
    }

    #[test]
    fn test_summarize_falls_back_when_too_short() {
        let filters = FilterSpec::for_user(UserId(1))
            .with_end_date(NaiveDate::from_ymd_opt(2020, 2, 28).unwrap());
        let table = summarize(&filters, &store(), true).unwrap();
        assert_eq!(table.months().count(), 2);
    }

    #[test]
    fn test_build_filters_resolves_category_names() {
        let store = store();
        let args = FilterArgs {
            categories: vec!["GROCERIES".to_string()],
            min: Some(15.0),
            ..FilterArgs::default()
        };
        let filters = build_filters(&args, &Config::default(), &store, UserId(1)).unwrap();
        assert_eq!(filters.categories.len(), 1);
        assert_eq!(filters.min_value, Some(15.0));
        assert!(filters.exclude_hidden);

        let args = FilterArgs {
            categories: vec!["rent".to_string()],
            ..FilterArgs::default()
        };
        assert!(build_filters(&args, &Config::default(), &store, UserId(1)).is_err());
    }

    #[test]
    fn test_summarize_empty() {
        let filters = FilterSpec::for_user(UserId(2));
        let table = summarize(&filters, &store(), true).unwrap();
        assert!(table.is_empty());
    }
}
