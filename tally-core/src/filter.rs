//! Conjunctive row filters for ledger queries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ledger::{CategoryId, LedgerRow, UserId};

/// A set of optional predicates over ledger rows. Every predicate that is set
/// must hold; an absent bound imposes no constraint.
///
/// Rows without a category never match: the store joins bills against
/// categories, so uncategorized bills are not part of any review query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub user_id: UserId,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Case-insensitive substring of the description
    pub description: Option<String>,
    /// Empty means any category
    pub categories: Vec<CategoryId>,
    pub exclude_hidden: bool,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
}

impl FilterSpec {
    /// Filters for one user's rows, hidden categories excluded.
    pub fn for_user(user_id: UserId) -> Self {
        Self {
            user_id,
            start_date: None,
            end_date: None,
            description: None,
            categories: Vec::new(),
            exclude_hidden: true,
            min_value: None,
            max_value: None,
        }
    }

    #[must_use]
    pub fn with_start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    #[must_use]
    pub fn with_end_date(mut self, date: NaiveDate) -> Self {
        self.end_date = Some(date);
        self
    }

    /// Inclusive on both ends.
    #[must_use]
    pub fn with_date_range(self, start: NaiveDate, end: NaiveDate) -> Self {
        self.with_start_date(start).with_end_date(end)
    }

    #[must_use]
    pub fn with_description(mut self, needle: impl Into<String>) -> Self {
        let needle = needle.into();
        self.description = if needle.trim().is_empty() {
            None
        } else {
            Some(needle)
        };
        self
    }

    #[must_use]
    pub fn with_category(mut self, id: CategoryId) -> Self {
        if !self.categories.contains(&id) {
            self.categories.push(id);
        }
        self
    }

    #[must_use]
    pub fn with_categories(self, ids: impl IntoIterator<Item = CategoryId>) -> Self {
        ids.into_iter().fold(self, |spec, id| spec.with_category(id))
    }

    #[must_use]
    pub fn include_hidden(mut self, include: bool) -> Self {
        self.exclude_hidden = !include;
        self
    }

    #[must_use]
    pub fn with_min_value(mut self, value: f64) -> Self {
        self.min_value = Some(value);
        self
    }

    #[must_use]
    pub fn with_max_value(mut self, value: f64) -> Self {
        self.max_value = Some(value);
        self
    }

    /// Returns true if `row` satisfies every predicate.
    pub fn matches(&self, row: &LedgerRow) -> bool {
        if row.user_id != self.user_id {
            return false;
        }
        let Some(category_id) = row.category_id else {
            return false;
        };
        if self.start_date.is_some_and(|start| row.date < start) {
            return false;
        }
        if self.end_date.is_some_and(|end| row.date > end) {
            return false;
        }
        if let Some(needle) = &self.description {
            if !row
                .description
                .to_lowercase()
                .contains(&needle.to_lowercase())
            {
                return false;
            }
        }
        if !self.categories.is_empty() && !self.categories.contains(&category_id) {
            return false;
        }
        if self.exclude_hidden && row.category_hidden {
            return false;
        }
        if self.min_value.is_some_and(|min| row.value < min) {
            return false;
        }
        if self.max_value.is_some_and(|max| row.value > max) {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::BillId;

    fn row(day: u32, descr: &str, value: f64, category: u32, hidden: bool) -> LedgerRow {
        LedgerRow {
            bill_id: BillId(day),
            user_id: UserId(1),
            date: NaiveDate::from_ymd_opt(2020, 1, day).unwrap(),
            description: descr.to_string(),
            value,
            category_id: Some(CategoryId(category)),
            category_name: Some(format!("cat-{category}")),
            category_hidden: hidden,
        }
    }

    fn rows() -> Vec<LedgerRow> {
        vec![
            row(2, "hidden", 100.0, 9, true),
            row(26, "zehrs", 100.0, 1, false),
            row(27, "walmart", 200.0, 3, false),
            row(28, "ren's", 300.0, 3, false),
            row(29, "sobeys", 400.0, 1, false),
        ]
    }

    fn count(spec: &FilterSpec) -> usize {
        rows().iter().filter(|r| spec.matches(r)).count()
    }

    #[test]
    fn test_default_excludes_hidden() {
        let spec = FilterSpec::for_user(UserId(1));
        assert_eq!(count(&spec), 4);
        assert_eq!(count(&spec.include_hidden(true)), 5);
    }

    #[test]
    fn test_other_users_never_match() {
        assert_eq!(count(&FilterSpec::for_user(UserId(2)).include_hidden(true)), 0);
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let spec = FilterSpec::for_user(UserId(1)).with_date_range(
            NaiveDate::from_ymd_opt(2020, 1, 27).unwrap(),
            NaiveDate::from_ymd_opt(2020, 1, 29).unwrap(),
        );
        assert_eq!(count(&spec), 3);
    }

    #[test]
    fn test_description_substring_ignores_case() {
        assert_eq!(count(&FilterSpec::for_user(UserId(1)).with_description("SOBEYS")), 1);
        assert_eq!(count(&FilterSpec::for_user(UserId(1)).with_description("  ")), 4);
    }

    #[test]
    fn test_category_membership() {
        let spec = FilterSpec::for_user(UserId(1)).with_category(CategoryId(1));
        assert_eq!(count(&spec), 2);
        let spec = spec.with_categories([CategoryId(3), CategoryId(1)]);
        assert_eq!(spec.categories, vec![CategoryId(1), CategoryId(3)]);
        assert_eq!(count(&spec), 4);
    }

    #[test]
    fn test_value_range_is_inclusive() {
        let spec = FilterSpec::for_user(UserId(1))
            .with_min_value(200.0)
            .with_max_value(300.0);
        assert_eq!(count(&spec), 2);
        // a zero bound is still a bound
        assert_eq!(count(&FilterSpec::for_user(UserId(1)).with_max_value(0.0)), 0);
    }

    #[test]
    fn test_uncategorized_rows_never_match() {
        let mut r = row(5, "shell", 43.79, 1, false);
        r.category_id = None;
        r.category_name = None;
        assert!(!FilterSpec::for_user(UserId(1)).include_hidden(true).matches(&r));
    }
}
