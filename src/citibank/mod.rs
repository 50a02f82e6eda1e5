//! The Citibank CZ internet banking portal.
//!
//! The portal is a classic server-rendered web application, so every
//! operation here is a fixed sequence of page requests and form posts that
//! mimics what a browser would do. Each function takes the [`Session`]
//! holding the portal's cookies and either finishes the whole sequence or
//! fails at the first step that goes wrong. Nothing is retried.

mod formats;
mod liveness;
mod login;
mod saved_login;
mod statement;
mod transactions;

pub use formats::TransactionFormat;
pub use liveness::is_logged_in;
pub use login::{login, Credentials, LoginRejection, LoginStage};
pub use saved_login::SavedLogin;
pub use statement::get_statement;
pub use transactions::{get_transactions, ExportRequest};

use crate::{Session, StateError};
use reqwest::{header::CONTENT_TYPE, Response, StatusCode};
use serde::{Serialize, Serializer};
use std::fmt::{self, Debug, Display, Formatter};

/// Where the real portal lives.
pub const PRODUCTION_URL: &str = "https://production.citibank.cz/";

/// A single request/response exchange with the portal.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Step {
    SignonPage,
    Credentials,
    SecondFactor,
    InitializeSubApp,
    DownloadSetup,
    DownloadConfirm,
    Download,
    StatementInit,
    SelectAccount,
    SelectYear,
    SelectStatement,
    StatementDownload,
}

impl Step {
    /// The endpoint, relative to the portal's base URL.
    pub fn path(self) -> &'static str {
        match self {
            Step::SignonPage => "CZGCB/JSO/signon/DisplayUsernameSignon.do",
            Step::Credentials => "CZGCB/JSO/signon/ProcessUsernameSignon.do",
            Step::SecondFactor => "CZGCB/JPS/apps/otpstc/StcMain.do",
            Step::InitializeSubApp => "CZGCB/jba/daa/InitializeSubApp.do",
            Step::DownloadSetup => "CZGCB/jba/daa/startdownloadActivity.do",
            Step::DownloadConfirm => "CZGCB/jba/daa/downloadActivity.do",
            Step::Download => "CZGCB/jba/daa/Opendownload.do",
            Step::StatementInit => "CZGCB/cba/estmtview/InitializeSubApp.do",
            Step::SelectAccount => "CZGCB/cba/estmtview/FireListqMsg.do",
            Step::SelectYear => "CZGCB/cba/estmtview/BuildStatementDates.do",
            Step::SelectStatement => "CZGCB/cba/estmtview/FireVwstqMsg.do",
            Step::StatementDownload => {
                "CZGCB/cba/estmtview/DisplayStatementAction.do"
            },
        }
    }
}

impl Display for Step {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::SignonPage => "sign-on page",
            Step::Credentials => "username/password",
            Step::SecondFactor => "SMS password",
            Step::InitializeSubApp => "initialize subapp",
            Step::DownloadSetup => "download setup",
            Step::DownloadConfirm => "initialize download",
            Step::Download => "download",
            Step::StatementInit => "statement initialization",
            Step::SelectAccount => "statement account selection",
            Step::SelectYear => "build statement dates",
            Step::SelectStatement => "statement selection",
            Step::StatementDownload => "statement download",
        };

        f.write_str(name)
    }
}

/// Everything that can go wrong while talking to the portal.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The HTTP client encountered an error.
    #[error("Unable to send the request")]
    HttpClient(#[from] reqwest::Error),
    #[error("Unable to build the request URL")]
    Url(#[from] url::ParseError),
    #[error("Unable to read the login credentials")]
    Credentials(#[from] std::io::Error),
    #[error("Unable to save the session")]
    State(#[from] StateError),
    /// The response didn't contain something it always used to, which
    /// usually means the portal's pages have changed.
    #[error("The {step} response has no {missing}")]
    Protocol { step: Step, missing: &'static str },
    #[error("Login failed: {0}")]
    LoginFailed(LoginRejection),
    /// The portal no longer recognises the session, log in again.
    #[error("Session expired")]
    SessionExpired,
    #[error("The {step} request failed with {status}")]
    RequestFailed { step: Step, status: StatusCode },
    /// The portal sent something other than what we asked for.
    #[error(
        "Unexpected content-type: {} (expected {})",
        actual.as_deref().unwrap_or("none"),
        expected
    )]
    FormatMismatch {
        expected: &'static str,
        actual: Option<String>,
    },
}

async fn get(session: &Session, step: Step) -> Result<Response, Error> {
    let url = session.url(step.path())?;

    log::debug!("Sending the {} request to {}", step, url);
    let response = session.client().get(url).send().await?;
    log::trace!("Headers: {:#?}", response.headers());

    ensure_ok(step, response)
}

async fn post<D>(
    session: &Session,
    step: Step,
    data: &D,
) -> Result<Response, Error>
where
    D: Debug + Serialize,
{
    let url = session.url(step.path())?;

    log::debug!("Sending the {} request to {}", step, url);
    log::trace!("Payload: {:#?}", data);
    let response = session.client().post(url).form(data).send().await?;
    log::trace!("Headers: {:#?}", response.headers());

    ensure_ok(step, response)
}

fn ensure_ok(step: Step, response: Response) -> Result<Response, Error> {
    let status = response.status();

    if status == StatusCode::OK {
        Ok(response)
    } else {
        log::error!("The {} request failed with {}", step, status);
        Err(Error::RequestFailed { step, status })
    }
}

fn content_type(response: &Response) -> Option<String> {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// A form value which is sent as-is but never shows up in the logs.
#[derive(Copy, Clone)]
struct Secret<'a>(&'a str);

impl Serialize for Secret<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0)
    }
}

impl Debug for Secret<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result { f.write_str("\"***\"") }
}
