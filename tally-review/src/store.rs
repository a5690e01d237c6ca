//! Ledger data sources.
//!
//! The summarizer reads rows through [`LedgerSource`]; rows come back already
//! joined against category metadata and filtered. [`LedgerStore`] is an
//! in-memory store used by the CLI and tests.

use chrono::NaiveDate;
use tally_core::{Bill, BillId, Category, CategoryId, FilterSpec, LedgerRow, UserId};
use tally_ingest::Transaction;

use crate::error::LedgerError;

const MAX_CATEGORY_NAME_LEN: usize = 30;

/// Read access to persisted, category-joined ledger rows.
pub trait LedgerSource {
    /// Rows matching `filters`, in ascending date order.
    fn fetch(&self, filters: &FilterSpec) -> Result<Vec<LedgerRow>, LedgerError>;
}

/// Rows that were joined elsewhere can be summarized directly.
impl LedgerSource for [LedgerRow] {
    fn fetch(&self, filters: &FilterSpec) -> Result<Vec<LedgerRow>, LedgerError> {
        let mut rows: Vec<LedgerRow> = self.iter().filter(|r| filters.matches(r)).cloned().collect();
        rows.sort_by_key(|r| r.date);
        Ok(rows)
    }
}

/// In-memory categories and bills for any number of users.
#[derive(Debug, Clone, Default)]
pub struct LedgerStore {
    categories: Vec<Category>,
    bills: Vec<Bill>,
    next_category_id: u32,
    next_bill_id: u32,
}

impl LedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a category. Names are trimmed and must be unique per user
    /// regardless of case.
    pub fn add_category(
        &mut self,
        user_id: UserId,
        name: &str,
        hidden: bool,
    ) -> Result<CategoryId, LedgerError> {
        let name = validate_category_name(name)?;
        if self.category_by_name(user_id, name).is_some() {
            return Err(LedgerError::DuplicateCategory(name.to_string()));
        }

        self.next_category_id += 1;
        let id = CategoryId(self.next_category_id);
        self.categories.push(Category::new(id, user_id, name, hidden));
        Ok(id)
    }

    /// Rename a category. Re-casing its own name is allowed; taking the name
    /// of another of the user's categories is not.
    pub fn rename_category(&mut self, id: CategoryId, name: &str) -> Result<(), LedgerError> {
        let name = validate_category_name(name)?;
        let user_id = self.category(id).ok_or(LedgerError::UnknownCategory(id))?.user_id;

        let taken = self
            .categories(user_id)
            .any(|c| c.id != id && c.name_matches(name));
        if taken {
            return Err(LedgerError::DuplicateCategory(name.to_string()));
        }

        let category = self.category_mut(id)?;
        category.name = name.to_string();
        Ok(())
    }

    pub fn set_category_hidden(&mut self, id: CategoryId, hidden: bool) -> Result<(), LedgerError> {
        self.category_mut(id)?.hidden = hidden;
        Ok(())
    }

    /// Remove a category together with every bill filed under it.
    pub fn remove_category(&mut self, id: CategoryId) -> Result<Category, LedgerError> {
        let pos = self
            .categories
            .iter()
            .position(|c| c.id == id)
            .ok_or(LedgerError::UnknownCategory(id))?;
        let removed = self.categories.remove(pos);

        let before = self.bills.len();
        self.bills.retain(|b| b.category_id != Some(id));
        tracing::debug!(
            category = %removed.name,
            bills = before - self.bills.len(),
            "removed category"
        );
        Ok(removed)
    }

    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    fn category_mut(&mut self, id: CategoryId) -> Result<&mut Category, LedgerError> {
        self.categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(LedgerError::UnknownCategory(id))
    }

    pub fn category_by_name(&self, user_id: UserId, name: &str) -> Option<&Category> {
        self.categories(user_id).find(|c| c.name_matches(name))
    }

    pub fn categories(&self, user_id: UserId) -> impl Iterator<Item = &Category> {
        self.categories.iter().filter(move |c| c.user_id == user_id)
    }

    pub fn add_bill(
        &mut self,
        user_id: UserId,
        date: NaiveDate,
        description: impl Into<String>,
        value: f64,
        category_id: Option<CategoryId>,
    ) -> Result<BillId, LedgerError> {
        if let Some(category_id) = category_id {
            self.check_owner(category_id, user_id)?;
        }

        self.next_bill_id += 1;
        let id = BillId(self.next_bill_id);
        self.bills.push(Bill {
            id,
            user_id,
            date,
            description: description.into(),
            value,
            category_id,
        });
        Ok(id)
    }

    /// Store every transaction of a parsed statement as an uncategorized bill.
    pub fn insert_statement(&mut self, user_id: UserId, txns: &[Transaction]) -> Vec<BillId> {
        let ids = txns
            .iter()
            .map(|txn| {
                self.next_bill_id += 1;
                let id = BillId(self.next_bill_id);
                self.bills.push(Bill {
                    id,
                    user_id,
                    date: txn.date,
                    description: txn.description.clone(),
                    value: txn.value,
                    category_id: None,
                });
                id
            })
            .collect::<Vec<_>>();
        tracing::info!(user = %user_id, count = ids.len(), "stored statement transactions");
        ids
    }

    /// Assign a category to a bill.
    pub fn categorize(&mut self, bill_id: BillId, category_id: CategoryId) -> Result<(), LedgerError> {
        let user_id = self
            .bills
            .iter()
            .find(|b| b.id == bill_id)
            .ok_or(LedgerError::UnknownBill(bill_id))?
            .user_id;
        self.check_owner(category_id, user_id)?;

        if let Some(bill) = self.bills.iter_mut().find(|b| b.id == bill_id) {
            bill.category_id = Some(category_id);
        }
        Ok(())
    }

    /// A user's bills still waiting for a category, newest first.
    pub fn uncategorized(&self, user_id: UserId) -> Vec<&Bill> {
        let mut bills: Vec<&Bill> = self
            .bills
            .iter()
            .filter(|b| b.user_id == user_id && !b.is_categorized())
            .collect();
        bills.sort_by(|a, b| b.date.cmp(&a.date));
        bills
    }

    pub fn bills(&self) -> &[Bill] {
        &self.bills
    }

    /// Every bill joined with its category.
    pub fn rows(&self) -> impl Iterator<Item = LedgerRow> + '_ {
        self.bills.iter().map(|bill| {
            let category = bill.category_id.and_then(|id| self.category(id));
            LedgerRow::join(bill, category)
        })
    }

    fn check_owner(&self, category_id: CategoryId, user_id: UserId) -> Result<(), LedgerError> {
        let category = self
            .category(category_id)
            .ok_or(LedgerError::UnknownCategory(category_id))?;
        if category.user_id != user_id {
            return Err(LedgerError::ForeignCategory {
                category: category_id,
                user: user_id,
            });
        }
        Ok(())
    }
}

impl LedgerSource for LedgerStore {
    fn fetch(&self, filters: &FilterSpec) -> Result<Vec<LedgerRow>, LedgerError> {
        let mut rows: Vec<LedgerRow> = self.rows().filter(|r| filters.matches(r)).collect();
        rows.sort_by_key(|r| r.date);
        Ok(rows)
    }
}

fn validate_category_name(name: &str) -> Result<&str, LedgerError> {
    let name = name.trim();
    if name.is_empty() || name.chars().count() > MAX_CATEGORY_NAME_LEN {
        return Err(LedgerError::InvalidCategoryName(name.to_string()));
    }
    Ok(name)
}
