use tally_core::{BillId, CategoryId, UserId};

/// Errors raised by a ledger data source or the reference store.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("no category with id {0}")]
    UnknownCategory(CategoryId),

    #[error("no bill with id {0}")]
    UnknownBill(BillId),

    /// Category names are unique per user, ignoring case.
    #[error("category \"{0}\" already exists")]
    DuplicateCategory(String),

    #[error("category name must be 1 to 30 characters, got \"{0}\"")]
    InvalidCategoryName(String),

    #[error("category {category} does not belong to user {user}")]
    ForeignCategory { category: CategoryId, user: UserId },

    #[error("ledger csv line {line}: {message}")]
    InvalidRow { line: u64, message: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Errors raised when dropping the (possibly incomplete) first and last
/// months from a ledger snapshot.
///
/// Callers usually fall back to the unfiltered data and tell the user that
/// the boundary months are included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BoundaryError {
    #[error("attempted to filter boundary months of an empty ledger")]
    Empty,

    #[error("insufficient data to filter out the (potentially incomplete) first and last months")]
    InsufficientData,
}
