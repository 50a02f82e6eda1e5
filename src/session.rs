use crate::{CookieJar, SavedCookies, DEFAULT_USER_AGENT};
use reqwest::{Client, Url};
use std::{
    fmt::{self, Debug, Formatter},
    sync::Arc,
};

/// An HTTP session with a banking portal.
///
/// The session owns its cookies, so everything the portal remembers about us
/// (most importantly whether we are logged in) lives here. Operations borrow
/// the session mutably, which keeps at most one workflow in flight per
/// session.
pub struct Session {
    client: Client,
    cookies: Arc<CookieJar>,
    base_url: Url,
}

impl Session {
    /// Start a fresh, anonymous session.
    pub fn new(base_url: Url) -> Result<Self, reqwest::Error> {
        Session::restore(base_url, SavedCookies::default())
    }

    /// Continue a session from previously saved cookies.
    ///
    /// The portal may have forgotten about the session in the meantime, so
    /// check it with [`crate::citibank::is_logged_in()`] before relying on it.
    pub fn restore(
        base_url: Url,
        cookies: SavedCookies,
    ) -> Result<Self, reqwest::Error> {
        let cookies = Arc::new(CookieJar::from_saved(cookies));
        let client = Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .cookie_provider(Arc::clone(&cookies))
            .build()?;

        Ok(Session {
            client,
            cookies,
            base_url,
        })
    }

    pub fn client(&self) -> &Client { &self.client }

    pub fn base_url(&self) -> &Url { &self.base_url }

    /// Resolve a path relative to the portal's base URL.
    pub fn url(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(path)
    }

    /// Take a copy of the cookies so they can be persisted.
    pub fn cookies(&self) -> SavedCookies { self.cookies.snapshot() }
}

impl Debug for Session {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        // cookie values are credentials, keep them out of the logs
        f.debug_struct("Session")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}
