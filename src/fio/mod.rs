//! The Fio banka REST API.
//!
//! Fio hands out a static token per account, so there is no session to look
//! after: every operation is a single `GET` with the token in the path.

mod formats;

pub use formats::Format;

use crate::{DateRange, DEFAULT_USER_AGENT};
use reqwest::{Client, StatusCode, Url};
use std::fmt::{self, Display, Formatter};

/// Where the real API lives.
pub const PRODUCTION_URL: &str = "https://www.fio.cz/ib_api/rest/";

/// Create a HTTP client suitable for talking to the API.
pub fn client() -> Result<Client, reqwest::Error> {
    Client::builder().user_agent(DEFAULT_USER_AGENT).build()
}

/// Download the transactions made between two dates (inclusive).
pub async fn get_transactions(
    client: &Client,
    base_url: &Url,
    token: &str,
    range: &DateRange,
    format: Format,
) -> Result<Vec<u8>, Error> {
    let from = range.from().format("%Y-%m-%d").to_string();
    let to = range.to().format("%Y-%m-%d").to_string();
    let file = transactions_file(format.transactions()?);

    send(
        client,
        base_url,
        Operation::Transactions,
        token,
        &["periods", token, &from, &to, &file],
    )
    .await
}

/// Download the transactions made since the last download.
pub async fn get_last_transactions(
    client: &Client,
    base_url: &Url,
    token: &str,
    format: Format,
) -> Result<Vec<u8>, Error> {
    let file = transactions_file(format.transactions()?);

    send(
        client,
        base_url,
        Operation::LastTransactions,
        token,
        &["last", token, &file],
    )
    .await
}

/// Download an account statement, identified by its year and number.
pub async fn get_statement(
    client: &Client,
    base_url: &Url,
    token: &str,
    year: i32,
    statement: u32,
    format: Format,
) -> Result<Vec<u8>, Error> {
    let year = year.to_string();
    let statement = statement.to_string();
    let file = transactions_file(format);

    send(
        client,
        base_url,
        Operation::Statement,
        token,
        &["by-id", token, &year, &statement, &file],
    )
    .await
}

fn transactions_file(format: Format) -> String {
    format!("transactions.{}", format.name())
}

async fn send(
    client: &Client,
    base_url: &Url,
    operation: Operation,
    token: &str,
    segments: &[&str],
) -> Result<Vec<u8>, Error> {
    let mut url = base_url.clone();
    url.path_segments_mut()
        .map_err(|_| Error::BaseUrl(base_url.clone()))?
        .pop_if_empty()
        .extend(segments);

    log::debug!("Sending a request to {}", redact(base_url, segments, token));
    let response = client.get(url).send().await?;
    log::trace!("Headers: {:#?}", response.headers());

    let status = response.status();
    if status != StatusCode::OK {
        log::error!("{} failed with {}", operation, status);
        return Err(Error::RequestFailed { operation, status });
    }

    let body = response.bytes().await?;
    log::info!("Downloaded {} bytes", body.len());

    Ok(body.to_vec())
}

/// The URL as it may appear in logs, with the token left out before anything
/// gets percent-encoded.
fn redact(base_url: &Url, segments: &[&str], token: &str) -> String {
    let path = segments
        .iter()
        .map(|&segment| if segment == token { "<token>" } else { segment })
        .collect::<Vec<_>>()
        .join("/");

    format!("{}/{}", base_url.as_str().trim_end_matches('/'), path)
}

/// The API's operations, for error messages.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Operation {
    Transactions,
    LastTransactions,
    Statement,
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Transactions | Operation::LastTransactions => {
                f.write_str("Download transactions")
            },
            Operation::Statement => f.write_str("Download statement"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The HTTP client encountered an error.
    #[error("Unable to send the request")]
    HttpClient(#[from] reqwest::Error),
    #[error("{0} can't be used as the API's base URL")]
    BaseUrl(Url),
    #[error("{operation} failed with {status}")]
    RequestFailed {
        operation: Operation,
        status: StatusCode,
    },
    #[error(transparent)]
    Validation(#[from] crate::ValidationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_never_reach_the_logs() {
        let base = Url::parse(PRODUCTION_URL).unwrap();

        let segments = ["last", "s3cr3tT0k3n", "transactions.ofx"];

        let got = redact(&base, &segments, "s3cr3tT0k3n");

        assert_eq!(
            got,
            "https://www.fio.cz/ib_api/rest/last/<token>/transactions.ofx"
        );
    }

    #[test]
    fn tokens_needing_percent_encoding_are_redacted_too() {
        let base = Url::parse(PRODUCTION_URL).unwrap();
        let token = "a/b+c d%";

        let segments = ["by-id", token, "2023", "4", "transactions.pdf"];

        let got = redact(&base, &segments, token);

        assert_eq!(
            got,
            "https://www.fio.cz/ib_api/rest/by-id/<token>/2023/4/transactions.pdf"
        );
        assert!(!got.contains("a%2Fb"));
        assert!(!got.contains("b+c"));
    }

    #[test]
    fn operations_in_error_messages() {
        let err = Error::RequestFailed {
            operation: Operation::Statement,
            status: StatusCode::CONFLICT,
        };

        assert_eq!(err.to_string(), "Download statement failed with 409 Conflict");
    }
}
