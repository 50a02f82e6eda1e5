use super::{Error, Step};
use crate::Session;
use serde_derive::Serialize;

const PDF: &str = "application/pdf";

/// Download an electronic statement as a PDF.
///
/// `account` counts from zero, `statement` is the statement's position in
/// the list the portal shows for `year`.
pub async fn get_statement(
    session: &mut Session,
    account: u32,
    year: i32,
    statement: u32,
) -> Result<Vec<u8>, Error> {
    super::get(session, Step::StatementInit).await?;

    // the portal numbers accounts from one
    let account = u64::from(account) + 1;
    let data = StatementData::browse(account, None);
    super::post(session, Step::SelectAccount, &data).await?;

    let data = StatementData::browse(account, Some(year));
    super::post(session, Step::SelectYear, &data).await?;

    let data = StatementData::attachment(account, year, statement);
    super::post(session, Step::SelectStatement, &data).await?;
    let response =
        super::post(session, Step::StatementDownload, &data).await?;

    let content_type = super::content_type(&response);
    if !content_type.as_deref().map_or(false, is_pdf) {
        log::error!("Expected a PDF but got {:?}", content_type);
        return Err(Error::FormatMismatch {
            expected: PDF,
            actual: content_type,
        });
    }

    let body = response.bytes().await?;
    log::info!("Downloaded a {} byte statement", body.len());

    Ok(body.to_vec())
}

/// The media type must be exactly `application/pdf`; parameters such as the
/// charset are ignored.
fn is_pdf(content_type: &str) -> bool {
    let essence = content_type.split(';').next().unwrap_or_default();

    essence.trim() == PDF
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatementData {
    selected_account_index: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    selected_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    statement_date_index: Option<u32>,
    pdf_supported_by_browser: bool,
    /// "Inline" while browsing, "Attachment" to download.
    pdf_display: &'static str,
    warn_status: bool,
}

impl StatementData {
    fn browse(account: u64, year: Option<i32>) -> Self {
        StatementData {
            selected_account_index: account,
            selected_year: year,
            statement_date_index: None,
            pdf_supported_by_browser: false,
            pdf_display: "Inline",
            warn_status: true,
        }
    }

    fn attachment(account: u64, year: i32, statement: u32) -> Self {
        StatementData {
            selected_account_index: account,
            selected_year: Some(year),
            statement_date_index: Some(statement),
            pdf_supported_by_browser: true,
            pdf_display: "Attachment",
            warn_status: false,
        }
    }
}
