//! Plain-text rendering of a [`SummaryTable`].

use num_format::{Locale, ToFormattedString as _};

use crate::pivot::SummaryTable;

/// Format a value as `#,###.##` (en locale, two decimals).
pub fn format_amount(amount: f64) -> String {
    let cents = (amount * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    format!(
        "{sign}{}.{:02}",
        (cents / 100).to_formatted_string(&Locale::en),
        cents % 100
    )
}

/// Render the table with the two label columns left-aligned and every value
/// column right-aligned.
pub fn render_summary(table: &SummaryTable) -> String {
    if table.is_empty() {
        return "No categorized bills to summarize.\n".to_string();
    }

    let labels: Vec<(String, &str)> = table
        .rows
        .iter()
        .map(|r| (r.label.year_label(), r.label.month_label()))
        .collect();
    let cells: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|r| r.values.iter().map(|v| format_amount(*v)).collect())
        .collect();

    let year_w = labels.iter().map(|(y, _)| y.len()).max().unwrap_or(0).max("Year".len());
    let month_w = labels.iter().map(|(_, m)| m.len()).max().unwrap_or(0).max("Month".len());
    let widths: Vec<usize> = table
        .columns
        .iter()
        .enumerate()
        .map(|(col, name)| {
            cells
                .iter()
                .map(|row| row[col].len())
                .max()
                .unwrap_or(0)
                .max(name.chars().count())
        })
        .collect();

    let mut out = String::new();
    out.push_str(&format!("{:<year_w$}  {:<month_w$}", "Year", "Month"));
    for (name, w) in table.columns.iter().zip(&widths) {
        out.push_str(&format!("  {name:>w$}"));
    }
    out.push('\n');

    for ((year, month), row) in labels.iter().zip(&cells) {
        out.push_str(&format!("{year:<year_w$}  {month:<month_w$}"));
        for (cell, w) in row.iter().zip(&widths) {
            out.push_str(&format!("  {cell:>w$}"));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::LedgerEntry;
    use chrono::NaiveDate;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(1.0), "1.00");
        assert_eq!(format_amount(1002.0), "1,002.00");
        assert_eq!(format_amount(1234567.891), "1,234,567.89");
        assert_eq!(format_amount(-143.66), "-143.66");
        assert_eq!(format_amount(504.0 / 3.0), "168.00");
    }

    #[test]
    fn test_render_summary() {
        let entry = |m: u32, value: f64, category: &str| LedgerEntry {
            date: NaiveDate::from_ymd_opt(2020, m, 5).unwrap(),
            description: "x".to_string(),
            value,
            category: category.to_string(),
        };
        let table = SummaryTable::from_entries(&[
            entry(1, 502.0, "misc"),
            entry(1, 500.0, "groceries"),
            entry(2, 1.0, "misc"),
        ]);
        let text = render_summary(&table);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Year"));
        assert!(lines[0].ends_with("Total"));
        assert!(lines[1].starts_with("2020"));
        assert!(lines[1].contains("January"));
        assert!(lines[1].ends_with("1,002.00"));
        assert!(lines[3].starts_with("Average"));
        // all rows share one width
        assert!(lines.iter().all(|l| l.len() == lines[0].len()));
    }

    #[test]
    fn test_render_empty() {
        let text = render_summary(&SummaryTable::default());
        assert!(text.contains("No categorized bills"));
    }
}
