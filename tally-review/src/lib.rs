//! tally-review: ledger store, CSV persistence, and the monthly spending summary

pub mod error;
pub mod ledger_csv;
pub mod pivot;
pub mod render;
pub mod store;
pub mod summary;

pub use error::{BoundaryError, LedgerError};
pub use ledger_csv::{load_ledger_csv, read_ledger_csv, save_ledger_csv, write_ledger_csv};
pub use pivot::{RowLabel, SummaryRow, SummaryTable, TOTAL_COLUMN};
pub use render::{format_amount, render_summary};
pub use store::{LedgerSource, LedgerStore};
pub use summary::{LedgerData, LedgerEntry};
