use super::{Credentials, Error, ExportRequest};
use crate::{Session, StateFile};
use reqwest::Url;

/// Logging in the way a returning user does.
///
/// The session saved by an earlier run is reused while the portal still
/// accepts it, and every fresh login is saved for the next run.
pub struct SavedLogin<'a, C: ?Sized> {
    base_url: Url,
    state: &'a StateFile,
    credentials: &'a mut C,
}

impl<'a, C> SavedLogin<'a, C>
where
    C: Credentials + ?Sized,
{
    pub fn new(base_url: Url, state: &'a StateFile, credentials: &'a mut C) -> Self {
        SavedLogin {
            base_url,
            state,
            credentials,
        }
    }

    /// Reuse the saved session if the portal still accepts it, otherwise log
    /// in from scratch.
    ///
    /// A state file which can't be read is only worth a warning.
    pub async fn open(&mut self) -> Result<Session, Error> {
        let saved = match self.state.load() {
            Ok(saved) => saved.filter(|cookies| !cookies.is_empty()),
            Err(e) => {
                log::warn!(
                    "Ignoring the saved session in {}: {}",
                    self.state.path().display(),
                    e
                );
                None
            },
        };

        if let Some(cookies) = saved {
            let mut session = Session::restore(self.base_url.clone(), cookies)?;

            if super::is_logged_in(&mut session).await? {
                log::info!("Reusing the session saved in {}", self.state.path().display());
                return Ok(session);
            }

            log::info!("The saved session has expired");
        }

        self.login().await
    }

    /// Log in with a fresh session and save it.
    pub async fn login(&mut self) -> Result<Session, Error> {
        let mut session = Session::new(self.base_url.clone())?;
        super::login(&mut session, &mut *self.credentials).await?;

        self.state.save(&session.cookies())?;
        log::debug!("Saved the new session to {}", self.state.path().display());

        Ok(session)
    }

    /// [`super::get_transactions()`], logging in again and repeating the
    /// download once if the portal has forgotten the session.
    pub async fn get_transactions(
        &mut self,
        session: &mut Session,
        request: &ExportRequest,
    ) -> Result<String, Error> {
        match super::get_transactions(session, request).await {
            Err(Error::SessionExpired) => {
                log::warn!("The session expired, logging in again");
                *session = self.login().await?;
                super::get_transactions(session, request).await
            },
            other => other,
        }
    }
}
