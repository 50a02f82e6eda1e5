use chrono::NaiveDate;
use std::convert::TryFrom;

/// Parameters rejected before anything is sent to the bank.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid account id: {0}")]
    InvalidAccount(i64),
    #[error("Invalid format: {0}")]
    UnsupportedFormat(String),
    #[error("The date range {from} to {to} is empty")]
    EmptyDateRange { from: NaiveDate, to: NaiveDate },
}

/// Check an account id given on the command line.
///
/// Accounts are numbered from zero in the order the portal lists them.
pub fn account_index(raw: i64) -> Result<u32, ValidationError> {
    u32::try_from(raw).map_err(|_| ValidationError::InvalidAccount(raw))
}
