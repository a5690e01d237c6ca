//! Read and write a single user's ledger as CSV.
//!
//! Layout (header required):
//! date,description,value,category,hidden
//! 2020-01-26,zehrs,100.00,groceries,
//! 2020-01-27,SHELL TORONTO ON,43.79,,
//! ,,,transfers,true
//!
//! An empty `category` marks a bill that has not been categorized yet. A row
//! with no date declares a category that has no bills. A category counts as
//! hidden if any of its rows says `true`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use tally_core::UserId;

use crate::error::LedgerError;
use crate::store::LedgerStore;

#[derive(Debug, Serialize, Deserialize)]
struct LedgerCsvRecord {
    #[serde(default)]
    date: Option<NaiveDate>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    value: Option<f64>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    hidden: Option<bool>,
}

/// Load a ledger CSV file into a fresh store owned by `user_id`.
pub fn load_ledger_csv(path: impl AsRef<Path>, user_id: UserId) -> Result<LedgerStore, LedgerError> {
    let rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path.as_ref())?;
    let store = read_records(rdr, user_id)?;
    tracing::debug!(
        path = %path.as_ref().display(),
        bills = store.bills().len(),
        "loaded ledger"
    );
    Ok(store)
}

/// Same as [`load_ledger_csv`] for any reader.
pub fn read_ledger_csv(reader: impl io::Read, user_id: UserId) -> Result<LedgerStore, LedgerError> {
    let rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    read_records(rdr, user_id)
}

fn read_records<R: io::Read>(
    mut rdr: csv::Reader<R>,
    user_id: UserId,
) -> Result<LedgerStore, LedgerError> {
    let mut store = LedgerStore::new();

    for (i, result) in rdr.deserialize::<LedgerCsvRecord>().enumerate() {
        let record = result.map_err(|e| match e.position() {
            Some(pos) => LedgerError::InvalidRow {
                line: pos.line(),
                message: e.to_string(),
            },
            None => LedgerError::Csv(e),
        })?;
        // header is line 1
        let line = i as u64 + 2;

        let category_id = match record.category.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => {
                let hidden = record.hidden.unwrap_or(false);
                let id = match store.category_by_name(user_id, name) {
                    Some(existing) => existing.id,
                    None => store.add_category(user_id, name, hidden)?,
                };
                if hidden {
                    store.set_category_hidden(id, true)?;
                }
                Some(id)
            }
            _ => None,
        };

        match (record.date, record.value) {
            (Some(date), Some(value)) => {
                store.add_bill(user_id, date, record.description, value, category_id)?;
            }
            (None, None) if category_id.is_some() && record.description.is_empty() => {}
            (None, _) => {
                return Err(LedgerError::InvalidRow {
                    line,
                    message: "a row without a date may only declare a category".to_string(),
                });
            }
            (Some(_), None) => {
                return Err(LedgerError::InvalidRow {
                    line,
                    message: "bill has no value".to_string(),
                });
            }
        }
    }

    Ok(store)
}

/// Write `user_id`'s bills to a CSV file, in date order.
pub fn save_ledger_csv(
    path: impl AsRef<Path>,
    store: &LedgerStore,
    user_id: UserId,
) -> Result<(), LedgerError> {
    let wtr = csv::Writer::from_path(path.as_ref())?;
    write_records(wtr, store, user_id)?;
    tracing::debug!(path = %path.as_ref().display(), "saved ledger");
    Ok(())
}

/// Same as [`save_ledger_csv`] for any writer.
pub fn write_ledger_csv(
    writer: impl io::Write,
    store: &LedgerStore,
    user_id: UserId,
) -> Result<(), LedgerError> {
    write_records(csv::Writer::from_writer(writer), store, user_id)
}

fn write_records<W: io::Write>(
    mut wtr: csv::Writer<W>,
    store: &LedgerStore,
    user_id: UserId,
) -> Result<(), LedgerError> {
    let mut bills: Vec<_> = store.bills().iter().filter(|b| b.user_id == user_id).collect();
    bills.sort_by_key(|b| b.date);

    for bill in &bills {
        let category = bill.category_id.and_then(|id| store.category(id));
        wtr.serialize(LedgerCsvRecord {
            date: Some(bill.date),
            description: bill.description.clone(),
            value: Some(bill.value),
            category: category.map(|c| c.name.clone()),
            hidden: category.map(|c| c.hidden),
        })?;
    }

    for category in store
        .categories(user_id)
        .filter(|c| !bills.iter().any(|b| b.category_id == Some(c.id)))
    {
        wtr.serialize(LedgerCsvRecord {
            date: None,
            description: String::new(),
            value: None,
            category: Some(category.name.clone()),
            hidden: Some(category.hidden),
        })?;
    }

    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tally_core::FilterSpec;

    use crate::store::LedgerSource;

    fn ledger_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("data")
            .join("ledger.csv")
    }

    #[test]
    fn test_load_fixture() {
        let store = load_ledger_csv(ledger_path(), UserId(1)).unwrap();
        assert_eq!(store.bills().len(), 9);
        assert_eq!(store.categories(UserId(1)).count(), 3);

        let hidden = store.category_by_name(UserId(1), "sample_hidden").unwrap();
        assert!(hidden.hidden);

        let rows = store.fetch(&FilterSpec::for_user(UserId(1))).unwrap();
        assert_eq!(rows.len(), 8);
    }

    #[test]
    fn test_empty_category_is_uncategorized() {
        let data = "\
date,description,value,category,hidden
2020-01-05,SHELL TORONTO ON,43.79,,
2020-01-06,zehrs,12.00,groceries,false
";
        let store = read_ledger_csv(data.as_bytes(), UserId(1)).unwrap();
        assert_eq!(store.uncategorized(UserId(1)).len(), 1);
        assert_eq!(store.categories(UserId(1)).count(), 1);
    }

    #[test]
    fn test_empty_categories_survive_save() {
        let mut store = LedgerStore::new();
        let groceries = store.add_category(UserId(1), "groceries", false).unwrap();
        store.add_category(UserId(1), "transfers", true).unwrap();
        store
            .add_bill(
                UserId(1),
                NaiveDate::from_ymd_opt(2020, 1, 6).unwrap(),
                "zehrs",
                12.0,
                Some(groceries),
            )
            .unwrap();

        let mut buf = Vec::new();
        write_ledger_csv(&mut buf, &store, UserId(1)).unwrap();
        let text = String::from_utf8(buf.clone()).unwrap();
        assert!(text.contains(",,,transfers,true"));

        let reloaded = read_ledger_csv(buf.as_slice(), UserId(1)).unwrap();
        assert_eq!(reloaded.bills().len(), 1);
        assert_eq!(reloaded.categories(UserId(1)).count(), 2);
        assert!(reloaded.category_by_name(UserId(1), "transfers").unwrap().hidden);
    }

    #[test]
    fn test_dateless_row_must_be_a_category() {
        let data = "date,description,value,category,hidden\n,SHELL,4.00,,\n";
        let err = read_ledger_csv(data.as_bytes(), UserId(1)).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidRow { line: 2, .. }));

        let data = "date,description,value,category,hidden\n2020-01-05,SHELL,,,\n";
        let err = read_ledger_csv(data.as_bytes(), UserId(1)).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidRow { line: 2, .. }));
    }

    #[test]
    fn test_bad_row_is_an_error() {
        let data = "date,description,value,category,hidden\nnot-a-date,x,1.0,,\n";
        assert!(read_ledger_csv(data.as_bytes(), UserId(1)).is_err());
    }

    #[test]
    fn test_write_then_read_keeps_bills() {
        let store = load_ledger_csv(ledger_path(), UserId(1)).unwrap();

        let mut buf = Vec::new();
        write_ledger_csv(&mut buf, &store, UserId(1)).unwrap();
        let text = String::from_utf8(buf.clone()).unwrap();
        assert!(text.starts_with("date,description,value,category,hidden"));

        let reloaded = read_ledger_csv(buf.as_slice(), UserId(1)).unwrap();
        let before: Vec<_> = store.rows().collect();
        let after: Vec<_> = reloaded.rows().collect();
        assert_eq!(before.len(), after.len());
        assert_eq!(
            before.iter().map(|r| &r.category_name).collect::<Vec<_>>(),
            after.iter().map(|r| &r.category_name).collect::<Vec<_>>()
        );
    }
}
