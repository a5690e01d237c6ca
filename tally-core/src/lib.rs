//! tally-core: ledger types, review filters and calendar helpers shared by
//! the statement parser and the ledger summarizer

pub mod filter;
pub mod ledger;
pub mod time;

pub use filter::FilterSpec;
pub use ledger::{Bill, BillId, Category, CategoryId, LedgerRow, UserId};
pub use time::{YearMonth, month_from_abbreviation, month_name};
