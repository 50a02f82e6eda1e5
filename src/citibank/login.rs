use super::{Error, Secret, Step};
use crate::{Session, SyncToken};
use regex::Regex;
use serde_derive::Serialize;
use std::{
    fmt::{self, Display, Formatter},
    io,
    sync::OnceLock,
};

/// Shown ("We are sorry...") when the username or password is wrong.
const CREDENTIALS_REJECTED_MARKER: &str = "Litujeme";

/// Supplies the credentials a login needs.
///
/// Each method is called at most once per login, in the order they are
/// declared, and only right before the request that sends the value. A login
/// which fails at the password step never asks for the SMS code.
pub trait Credentials {
    fn username(&mut self) -> io::Result<String>;
    fn password(&mut self) -> io::Result<String>;
    /// The one-time code the bank sends by SMS.
    fn second_factor(&mut self) -> io::Result<String>;
}

/// Why the portal refused to log us in.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LoginRejection {
    WrongCredentials,
    WrongSecondFactor,
}

impl Display for LoginRejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LoginRejection::WrongCredentials => {
                f.write_str("Wrong username or password")
            },
            LoginRejection::WrongSecondFactor => f.write_str("Wrong SMS password"),
        }
    }
}

/// How far a login has got.
///
/// Each stage knows which request comes next and which token it must carry.
/// [`LoginStage::advance()`] looks at the response to that request and decides
/// on the next stage, so the whole workflow can be checked without a network.
#[derive(Debug, Clone, PartialEq)]
pub enum LoginStage {
    /// Nothing has been sent yet.
    AnonymousPage,
    /// We have the sign-on page and can submit the username and password.
    CredentialsRequired(SyncToken),
    /// The password was accepted and the portal wants the SMS code.
    SecondFactorRequired(SyncToken),
    Authenticated,
}

impl LoginStage {
    /// The request to make in this stage, if there is one.
    pub fn step(&self) -> Option<Step> {
        match self {
            LoginStage::AnonymousPage => Some(Step::SignonPage),
            LoginStage::CredentialsRequired(_) => Some(Step::Credentials),
            LoginStage::SecondFactorRequired(_) => Some(Step::SecondFactor),
            LoginStage::Authenticated => None,
        }
    }

    /// Move on, given the page the portal sent back for this stage's
    /// request.
    pub fn advance(self, page: &str) -> Result<LoginStage, Error> {
        match self {
            LoginStage::AnonymousPage => {
                extract_token(Step::SignonPage, page)
                    .map(LoginStage::CredentialsRequired)
            },
            LoginStage::CredentialsRequired(_) => {
                if page.contains(CREDENTIALS_REJECTED_MARKER) {
                    return Err(rejected(LoginRejection::WrongCredentials));
                }

                extract_token(Step::Credentials, page)
                    .map(LoginStage::SecondFactorRequired)
            },
            LoginStage::SecondFactorRequired(_) => {
                if welcome_pattern().is_match(page) {
                    Ok(LoginStage::Authenticated)
                } else {
                    Err(rejected(LoginRejection::WrongSecondFactor))
                }
            },
            LoginStage::Authenticated => Ok(LoginStage::Authenticated),
        }
    }
}

/// Log in with a username, password and SMS code.
///
/// Any failure aborts the login; start again from the beginning to retry.
pub async fn login<C>(
    session: &mut Session,
    credentials: &mut C,
) -> Result<(), Error>
where
    C: Credentials + ?Sized,
{
    let mut stage = LoginStage::AnonymousPage;

    while let Some(step) = stage.step() {
        let response = match &stage {
            LoginStage::AnonymousPage => super::get(session, step).await?,
            LoginStage::CredentialsRequired(token) => {
                let username = credentials.username()?;
                let password = credentials.password()?;
                let data = CredentialsData {
                    sync_token: token.as_str(),
                    username: &username,
                    password: Secret(&password),
                    x: 0,
                    y: 0,
                    sms_login_check: true,
                };

                super::post(session, step, &data).await?
            },
            LoginStage::SecondFactorRequired(token) => {
                let code = credentials.second_factor()?;
                let data = SecondFactorData {
                    sync_token: token.as_str(),
                    secure_txn_function: "CodeEntry",
                    secure_txn_code: Secret(&code),
                };

                super::post(session, step, &data).await?
            },
            LoginStage::Authenticated => break,
        };

        let page = response.text().await?;
        log::trace!("Response: {}", page);

        stage = stage.advance(&page)?;
        log::debug!("Login moved to {:?}", stage);
    }

    log::info!("Logged in to {}", session.base_url());
    Ok(())
}

fn extract_token(step: Step, page: &str) -> Result<SyncToken, Error> {
    SyncToken::extract(page).ok_or_else(|| {
        log::error!("The {} response has no SYNC_TOKEN", step);
        Error::Protocol {
            step,
            missing: "SYNC_TOKEN",
        }
    })
}

fn rejected(reason: LoginRejection) -> Error {
    log::error!("Login failed: {}", reason);
    Error::LoginFailed(reason)
}

/// "Vítejte" (welcome), whatever encoding the "í" arrives in.
fn welcome_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();

    PATTERN.get_or_init(|| {
        Regex::new(r"V.tejte").expect("The welcome pattern is a valid regex")
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CredentialsData<'a> {
    #[serde(rename = "SYNC_TOKEN")]
    sync_token: &'a str,
    username: &'a str,
    password: Secret<'a>,
    x: u32,
    y: u32,
    sms_login_check: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SecondFactorData<'a> {
    #[serde(rename = "SYNC_TOKEN")]
    sync_token: &'a str,
    secure_txn_function: &'a str,
    secure_txn_code: Secret<'a>,
}
