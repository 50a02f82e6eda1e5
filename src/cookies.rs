use reqwest::{cookie::CookieStore, header::HeaderValue, Url};
use serde_derive::{Deserialize, Serialize};
use std::{
    convert::Infallible,
    sync::{PoisonError, RwLock},
};

/// A snapshot of the unexpired cookies in a [`CookieJar`], including the
/// session cookies a browser would throw away on exit.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SavedCookies(Vec<cookie_store::Cookie<'static>>);

impl SavedCookies {
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// The value of the first cookie called `name`, whatever its domain.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|cookie| cookie.name() == name)
            .map(|cookie| cookie.value())
    }

    /// Add a cookie as if `url` had answered with this `Set-Cookie` header.
    pub fn add(
        &mut self,
        set_cookie: &str,
        url: &Url,
    ) -> Result<(), cookie_store::CookieError> {
        let cookie = cookie_store::Cookie::parse(set_cookie, url)?;
        self.0.push(cookie.into_owned());

        Ok(())
    }
}

/// The cookie store behind a [`crate::Session`].
///
/// Cookies follow the usual browser rules (domain and path scoping, `Expires`
/// and `Max-Age`). Unlike the jar that ships with `reqwest`, the contents can
/// be taken out as [`SavedCookies`] and put back later, which is what lets a
/// login survive between runs.
#[derive(Debug, Default)]
pub struct CookieJar {
    store: RwLock<cookie_store::CookieStore>,
}

impl CookieJar {
    /// Expired cookies are dropped on the way in.
    pub fn from_saved(saved: SavedCookies) -> Self {
        let store = cookie_store::CookieStore::from_cookies(
            saved.0.into_iter().map(Ok::<_, Infallible>),
            false,
        )
        .unwrap_or_else(|never| match never {});

        CookieJar {
            store: RwLock::new(store),
        }
    }

    pub fn snapshot(&self) -> SavedCookies {
        let store = self.store.read().unwrap_or_else(PoisonError::into_inner);

        SavedCookies(store.iter_unexpired().cloned().collect())
    }
}

impl CookieStore for CookieJar {
    fn set_cookies(
        &self,
        cookie_headers: &mut dyn Iterator<Item = &HeaderValue>,
        url: &Url,
    ) {
        let host = url.host_str().unwrap_or_default();
        let cookies = cookie_headers.filter_map(|header| {
            let parsed = header
                .to_str()
                .ok()
                .and_then(|raw| cookie_store::RawCookie::parse(raw).ok());

            if parsed.is_none() {
                log::warn!("Ignoring a malformed cookie from {}", host);
            }

            parsed.map(|cookie| cookie.into_owned())
        });

        self.store
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .store_response_cookies(cookies, url);
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        let store = self.store.read().unwrap_or_else(PoisonError::into_inner);

        let header = store
            .get_request_values(url)
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; ");

        if header.is_empty() {
            return None;
        }

        HeaderValue::from_str(&header).ok()
    }
}
