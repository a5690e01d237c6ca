//! Month x category pivot of ledger entries.

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use tally_core::YearMonth;

use crate::summary::LedgerEntry;

/// Name of the trailing row-sum column.
pub const TOTAL_COLUMN: &str = "Total";

/// Label of a pivot row: a calendar month or the trailing average.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowLabel {
    Month(YearMonth),
    Average,
}

impl RowLabel {
    /// First index level: the year, or "Average".
    pub fn year_label(&self) -> String {
        match self {
            RowLabel::Month(ym) => ym.year.to_string(),
            RowLabel::Average => "Average".to_string(),
        }
    }

    /// Second index level: the full month name, empty for the average row.
    pub fn month_label(&self) -> &'static str {
        match self {
            RowLabel::Month(ym) => ym.month_name(),
            RowLabel::Average => "",
        }
    }
}

/// Serialized as its two index levels, e.g. `["2019", "December"]` or `["Average", ""]`.
impl Serialize for RowLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (self.year_label(), self.month_label()).serialize(serializer)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub label: RowLabel,
    /// One value per column of the owning table
    pub values: Vec<f64>,
}

/// Monthly totals per category.
///
/// Month rows are chronological and followed by one `Average` row. Category
/// columns are ordered by their average, highest first, and followed by a
/// `Total` column.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryTable {
    pub columns: Vec<String>,
    pub rows: Vec<SummaryRow>,
}

impl SummaryTable {
    /// Build the pivot. `entries` must be in ascending date order; categories
    /// with equal averages keep the order in which they first appear.
    pub fn from_entries(entries: &[LedgerEntry]) -> Self {
        if entries.is_empty() {
            return Self::default();
        }

        let mut categories: Vec<&str> = Vec::new();
        let mut sums: BTreeMap<YearMonth, Vec<f64>> = BTreeMap::new();
        for entry in entries {
            let col = match categories.iter().position(|c| *c == entry.category) {
                Some(col) => col,
                None => {
                    categories.push(&entry.category);
                    categories.len() - 1
                }
            };
            let row = sums.entry(YearMonth::of(entry.date)).or_default();
            if row.len() <= col {
                row.resize(col + 1, 0.0);
            }
            row[col] += entry.value;
        }

        let width = categories.len();
        let months: Vec<(YearMonth, Vec<f64>)> = sums
            .into_iter()
            .map(|(ym, mut values)| {
                values.resize(width, 0.0);
                (ym, values)
            })
            .collect();

        let n_months = months.len() as f64;
        let averages: Vec<f64> = (0..width)
            .map(|col| months.iter().map(|(_, values)| values[col]).sum::<f64>() / n_months)
            .collect();

        // stable: ties keep first-seen order
        let mut order: Vec<usize> = (0..width).collect();
        order.sort_by(|&a, &b| averages[b].total_cmp(&averages[a]));

        let with_total = |values: &[f64]| {
            let mut out: Vec<f64> = order.iter().map(|&col| values[col]).collect();
            let total = out.iter().sum();
            out.push(total);
            out
        };

        let mut rows: Vec<SummaryRow> = months
            .iter()
            .map(|(ym, values)| SummaryRow {
                label: RowLabel::Month(*ym),
                values: with_total(values.as_slice()),
            })
            .collect();
        rows.push(SummaryRow {
            label: RowLabel::Average,
            values: with_total(averages.as_slice()),
        });

        let mut columns: Vec<String> = order.iter().map(|&col| categories[col].to_string()).collect();
        columns.push(TOTAL_COLUMN.to_string());

        Self { columns, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Category column names, without `Total`.
    pub fn categories(&self) -> &[String] {
        match self.columns.split_last() {
            Some((_, categories)) => categories,
            None => &[],
        }
    }

    /// Every value in the named column, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|r| r.values[idx]).collect())
    }

    pub fn row(&self, label: RowLabel) -> Option<&SummaryRow> {
        self.rows.iter().find(|r| r.label == label)
    }

    pub fn average(&self) -> Option<&SummaryRow> {
        self.row(RowLabel::Average)
    }

    pub fn cell(&self, label: RowLabel, column: &str) -> Option<f64> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.row(label).map(|r| r.values[idx])
    }

    /// Month rows only (everything but the average).
    pub fn months(&self) -> impl Iterator<Item = &SummaryRow> {
        self.rows.iter().filter(|r| r.label != RowLabel::Average)
    }
}
