use regex::Regex;
use std::{
    fmt::{self, Debug, Formatter},
    sync::OnceLock,
};

/// The anti-forgery token embedded in every page of the Citibank portal.
///
/// Each form post must carry the token from the page that was received
/// immediately before it; the portal rejects stale ones.
#[derive(Clone, PartialEq, Eq)]
pub struct SyncToken(String);

impl SyncToken {
    /// Scrape the token out of an HTML page.
    pub fn extract(page: &str) -> Option<SyncToken> {
        let captures = pattern().captures(page)?;

        Some(SyncToken(captures[1].to_string()))
    }

    pub fn as_str(&self) -> &str { &self.0 }
}

fn pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();

    PATTERN.get_or_init(|| {
        Regex::new(r#"name="SYNC_TOKEN" value="(\w+)""#)
            .expect("The SYNC_TOKEN pattern is a valid regex")
    })
}

impl Debug for SyncToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SyncToken").field(&self.0).finish()
    }
}
