//! Download transactions and electronic statements from Czech internet
//! banking.
//!
//! Two portals are supported:
//!
//! - [`citibank`], a session-based web portal which needs a username,
//!   password and SMS code before anything can be downloaded
//! - [`fio`], a REST API authorised with a static token

#![forbid(unsafe_code)]

#[cfg(test)]
#[macro_use]
extern crate pretty_assertions;

pub mod citibank;
mod cookies;
mod dates;
pub mod fio;
mod interrupt;
mod output;
mod prompt;
mod session;
mod state;
mod sync_token;
mod validation;

pub use cookies::{CookieJar, SavedCookies};
pub use dates::DateRange;
pub use interrupt::{exit_on_interrupt, is_interrupted, INTERRUPTED_EXIT_CODE};
pub use output::{statement_file_name, transactions_file_name, Output};
pub use prompt::TerminalCredentials;
pub use session::Session;
pub use state::{StateError, StateFile};
pub use sync_token::SyncToken;
pub use validation::{account_index, ValidationError};

/// The user agent sent to the banks.
///
/// The portals serve their pages to ordinary browsers, so we look like one.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:24.0) Gecko/20100101 Firefox/24.0";
