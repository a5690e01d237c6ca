//! Review a user's categorized bills: snapshot, boundary-month filtering and
//! the monthly pivot.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tally_core::{FilterSpec, YearMonth};

use crate::error::{BoundaryError, LedgerError};
use crate::pivot::SummaryTable;
use crate::store::LedgerSource;

/// One row of the review table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub date: NaiveDate,
    pub description: String,
    pub value: f64,
    pub category: String,
}

/// A date-ordered snapshot of the rows matching a filter.
///
/// The snapshot is taken once, at construction; later changes to the source
/// are not seen.
#[derive(Debug, Clone, Default)]
pub struct LedgerData {
    data: Vec<LedgerEntry>,
}

impl LedgerData {
    /// Fetch and snapshot every row matching `filters`.
    ///
    /// Rows without a category are dropped.
    pub fn new<S>(filters: &FilterSpec, source: &S) -> Result<Self, LedgerError>
    where
        S: LedgerSource + ?Sized,
    {
        let rows = source.fetch(filters)?;
        let fetched = rows.len();

        let entries: Vec<LedgerEntry> = rows
            .into_iter()
            .filter_map(|row| {
                Some(LedgerEntry {
                    category: row.category_name?,
                    date: row.date,
                    description: row.description,
                    value: row.value,
                })
            })
            .collect();

        tracing::debug!(
            user = %filters.user_id,
            rows = entries.len(),
            uncategorized = fetched - entries.len(),
            "loaded ledger snapshot"
        );
        Ok(Self::from_entries(entries))
    }

    /// Wrap entries directly; they are sorted by date (stable).
    pub fn from_entries(mut entries: Vec<LedgerEntry>) -> Self {
        entries.sort_by_key(|e| e.date);
        Self { data: entries }
    }

    pub fn data(&self) -> &[LedgerEntry] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Drop the rows of the first and last calendar months on record, which
    /// are usually only partly covered by statements.
    ///
    /// Leaves the data untouched on error.
    pub fn filter_first_and_last_month(&mut self) -> Result<(), BoundaryError> {
        let (Some(first), Some(last)) = (self.data.first(), self.data.last()) else {
            return Err(BoundaryError::Empty);
        };
        let first = YearMonth::of(first.date);
        let last = YearMonth::of(last.date);

        let kept = self
            .data
            .iter()
            .filter(|e| {
                let ym = YearMonth::of(e.date);
                first < ym && ym < last
            })
            .count();
        if kept == 0 {
            return Err(BoundaryError::InsufficientData);
        }

        self.data.retain(|e| {
            let ym = YearMonth::of(e.date);
            first < ym && ym < last
        });
        tracing::debug!(%first, %last, kept, "dropped boundary months");
        Ok(())
    }

    /// Keep only rows of the named category.
    pub fn filter_by_category(&mut self, category: &str) {
        self.data.retain(|e| e.category == category);
    }

    /// Month x category pivot of the current data.
    pub fn summarize(&self) -> SummaryTable {
        SummaryTable::from_entries(&self.data)
    }
}
