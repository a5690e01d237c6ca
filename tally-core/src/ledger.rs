//! Ledger record types: categories, persisted bills and the joined rows
//! handed to the summarizer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Owner of categories and bills
    UserId
);
id_type!(
    /// Identity of a category within the store
    CategoryId
);
id_type!(
    /// Identity of a persisted bill
    BillId
);

/// A user-defined spending category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub user_id: UserId,
    pub name: String,
    /// Hidden categories (transfers, reimbursements) are left out of default summaries
    pub hidden: bool,
}

impl Category {
    pub fn new(id: CategoryId, user_id: UserId, name: impl Into<String>, hidden: bool) -> Self {
        Self {
            id,
            user_id,
            name: name.into(),
            hidden,
        }
    }

    /// Category names compare case-insensitively.
    pub fn name_matches(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.trim().to_lowercase()
    }
}

/// A persisted purchase/payment record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    pub id: BillId,
    pub user_id: UserId,
    pub date: NaiveDate,
    pub description: String,
    /// Positive = charge, negative = payment/refund
    pub value: f64,
    /// `None` until the user assigns a category
    pub category_id: Option<CategoryId>,
}

impl Bill {
    pub fn is_categorized(&self) -> bool {
        self.category_id.is_some()
    }
}

/// A bill joined against its category metadata.
///
/// This is the shape the store hands to the summarizer; the summarizer never
/// performs its own join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerRow {
    pub bill_id: BillId,
    pub user_id: UserId,
    pub date: NaiveDate,
    pub description: String,
    pub value: f64,
    pub category_id: Option<CategoryId>,
    pub category_name: Option<String>,
    pub category_hidden: bool,
}

impl LedgerRow {
    /// Join a bill with its category (if any).
    pub fn join(bill: &Bill, category: Option<&Category>) -> Self {
        Self {
            bill_id: bill.id,
            user_id: bill.user_id,
            date: bill.date,
            description: bill.description.clone(),
            value: bill.value,
            category_id: category.map(|c| c.id),
            category_name: category.map(|c| c.name.clone()),
            category_hidden: category.is_some_and(|c| c.hidden),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_join_with_category() {
        let cat = Category::new(CategoryId(3), UserId(1), "transfers", true);
        let bill = Bill {
            id: BillId(7),
            user_id: UserId(1),
            date: date(2020, 1, 5),
            description: "E-TRANSFER".to_string(),
            value: -250.0,
            category_id: Some(CategoryId(3)),
        };

        let row = LedgerRow::join(&bill, Some(&cat));
        assert_eq!(row.bill_id, BillId(7));
        assert_eq!(row.category_id, Some(CategoryId(3)));
        assert_eq!(row.category_name.as_deref(), Some("transfers"));
        assert!(row.category_hidden);
        assert_eq!(row.value, -250.0);
    }

    #[test]
    fn test_join_uncategorized() {
        let bill = Bill {
            id: BillId(1),
            user_id: UserId(1),
            date: date(2020, 1, 5),
            description: "SHELL".to_string(),
            value: 43.79,
            category_id: None,
        };
        let row = LedgerRow::join(&bill, None);
        assert!(!bill.is_categorized());
        assert!(row.category_name.is_none());
        assert!(!row.category_hidden);
    }

    #[test]
    fn test_name_matches_ignores_case() {
        let cat = Category::new(CategoryId(1), UserId(1), "Groceries", false);
        assert!(cat.name_matches("groceries"));
        assert!(cat.name_matches(" GROCERIES "));
        assert!(!cat.name_matches("gas"));
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let json = serde_json::to_string(&CategoryId(12)).unwrap();
        assert_eq!(json, "12");
        assert_eq!(UserId(4).to_string(), "4");
    }
}
