use super::{liveness, Error, Step, TransactionFormat};
use crate::{account_index, DateRange, Session, ValidationError};
use serde_derive::Serialize;

/// The download wizard's hint next to the account list.
const SELECT_ACCOUNT_PHRASE: &str =
    "Zaškrtněte účty, pro které si chcete uložit přehled pohybů.";

/// Which transactions to download, and how.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ExportRequest {
    account: u32,
    range: Option<DateRange>,
    format: TransactionFormat,
}

impl ExportRequest {
    /// Without a `range` the portal sends everything since the last
    /// download it remembers for the account.
    pub fn new(
        account: i64,
        range: Option<DateRange>,
        format: TransactionFormat,
    ) -> Result<Self, ValidationError> {
        Ok(ExportRequest {
            account: account_index(account)?,
            range,
            format,
        })
    }

    pub fn account(&self) -> u32 { self.account }

    pub fn range(&self) -> Option<&DateRange> { self.range.as_ref() }

    pub fn format(&self) -> TransactionFormat { self.format }
}

/// Download an account's transactions.
///
/// Fails with [`Error::SessionExpired`] if the portal has forgotten the
/// session, in which case logging in again and repeating the download is
/// safe.
pub async fn get_transactions(
    session: &mut Session,
    request: &ExportRequest,
) -> Result<String, Error> {
    liveness::ensure_logged_in(session).await?;

    let data = SetupData::new(request);
    super::post(session, Step::DownloadSetup, &data).await?;

    let data = DownloadData { xyz: "" };
    super::post(session, Step::DownloadConfirm, &data).await?;
    let response = super::post(session, Step::Download, &data).await?;

    let expected = request.format();
    let content_type = super::content_type(&response);
    log::debug!("Received {:?} for {}", content_type, expected);

    if !content_type.as_deref().map_or(false, |ct| expected.matches(ct)) {
        log::error!("Expected {} but got {:?}", expected.content_type(), content_type);
        return Err(Error::FormatMismatch {
            expected: expected.content_type(),
            actual: content_type,
        });
    }

    let body = response.text().await?;
    log::info!("Downloaded {} bytes of transactions", body.len());

    Ok(body.trim().to_string())
}

/// The first page of the download wizard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
struct SetupData {
    #[serde(rename = "MISCalendarActivity")]
    mis_calendar_activity: u8,
    cmd: &'static str,
    #[serde(rename = "ruleValueforPreSelect")]
    rule_value_for_pre_select: bool,
    #[serde(rename = "ruleValueforAccountSel")]
    rule_value_for_account_sel: bool,
    select_an_acct_phrase: &'static str,
    warn_status: bool,
    end_date_option: u8,
    /// Either "Selected" or "All".
    for_account: &'static str,
    selected_accounts_in_form: u32,
    /// 1 is the standard list of transactions, 3 adds a summary.
    selected_download_type: u8,
    selected_download_format: u8,
    /// Either "Sincelastdownload" or "DateDownload".
    save_activity_for: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    from_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    to_date: Option<String>,
}

impl SetupData {
    fn new(request: &ExportRequest) -> Self {
        let (save_activity_for, from_date, to_date) = match request.range() {
            Some(range) => (
                "DateDownload",
                Some(portal_date(range.from())),
                Some(portal_date(range.to())),
            ),
            None => ("Sincelastdownload", None, None),
        };

        SetupData {
            mis_calendar_activity: 3,
            cmd: "process",
            rule_value_for_pre_select: false,
            rule_value_for_account_sel: false,
            select_an_acct_phrase: SELECT_ACCOUNT_PHRASE,
            warn_status: true,
            end_date_option: 1,
            for_account: "Selected",
            selected_accounts_in_form: request.account(),
            selected_download_type: 1,
            selected_download_format: request.format().form_id(),
            save_activity_for,
            from_date,
            to_date,
        }
    }
}

fn portal_date(date: chrono::NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

#[derive(Debug, Serialize)]
struct DownloadData<'a> {
    xyz: &'a str,
}
