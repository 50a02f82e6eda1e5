use super::{Error, Step};
use crate::Session;
use serde_derive::Serialize;

/// The portal answers with its sign-on form once it has forgotten a session.
const SIGNON_FORM_MARKER: &str = "SignonForm";

/// Ask the portal whether the session is still logged in.
///
/// This is the only way to find out: the portal drops sessions after a few
/// minutes of inactivity and doesn't tell anyone.
pub async fn is_logged_in(session: &mut Session) -> Result<bool, Error> {
    let page = initialize_sub_app(session).await?;
    let logged_in = !page.contains(SIGNON_FORM_MARKER);

    log::debug!("Logged in: {}", logged_in);
    Ok(logged_in)
}

/// Make sure the session is alive before starting a download.
pub(crate) async fn ensure_logged_in(session: &mut Session) -> Result<(), Error> {
    if is_logged_in(session).await? {
        Ok(())
    } else {
        log::warn!("The portal has expired our session");
        Err(Error::SessionExpired)
    }
}

async fn initialize_sub_app(session: &Session) -> Result<String, Error> {
    let data = Data { ttc: "264" };
    let response = super::post(session, Step::InitializeSubApp, &data).await?;

    let body = response.text().await?;
    log::trace!("Response: {}", body);

    Ok(body)
}

#[derive(Debug, Serialize)]
struct Data<'a> {
    #[serde(rename = "TTC")]
    ttc: &'a str,
}
