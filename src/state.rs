//! The login state kept between runs.
//!
//! Citibank forgets a session after roughly five minutes of inactivity. Saving
//! the session cookies means running the tool again within that window skips
//! the whole username/password/SMS dance. Nothing here says whether the
//! session is still alive, that is always checked with the portal after
//! loading.

use crate::SavedCookies;
use serde_derive::{Deserialize, Serialize};
use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;

const STATE_DIR: &str = ".ibank";
const CITIBANK_STATE_FILE: &str = "citibankcz.state";
const STATE_VERSION: u32 = 2;

/// A file holding the cookies of a previous session.
#[derive(Debug, Clone, PartialEq)]
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StateFile { path: path.into() }
    }

    /// `~/.ibank/citibankcz.state`, if we can find the home directory.
    pub fn default_location() -> Option<Self> {
        dirs::home_dir()
            .map(|home| StateFile::new(home.join(STATE_DIR).join(CITIBANK_STATE_FILE)))
    }

    pub fn path(&self) -> &Path { &self.path }

    /// Read the saved cookies.
    ///
    /// A missing file, or one written by an incompatible version, is not an
    /// error; there is just nothing to restore.
    pub fn load(&self) -> Result<Option<SavedCookies>, StateError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("No saved session at {}", self.path.display());
                return Ok(None);
            },
            Err(e) => return Err(self.io_error(e)),
        };

        // older versions stored the cookies differently, so look at the
        // version before the rest of the document
        let Version { version } = serde_json::from_str(&contents)?;

        if version != STATE_VERSION {
            log::warn!(
                "Ignoring the saved session in {} (version {}, expected {})",
                self.path.display(),
                version,
                STATE_VERSION
            );
            return Ok(None);
        }

        let document: Document = serde_json::from_str(&contents)?;

        Ok(Some(document.cookies))
    }

    /// Replace the saved cookies.
    ///
    /// The new contents go to a uniquely named temporary file, readable only
    /// by the owner from the moment it is created, which is then renamed over
    /// the old one. A concurrent reader sees either the old or the new state.
    pub fn save(&self, cookies: &SavedCookies) -> Result<(), StateError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;

        let document = Document {
            version: STATE_VERSION,
            cookies: cookies.clone(),
        };

        let mut temp =
            NamedTempFile::new_in(dir).map_err(|e| self.io_error(e))?;
        let contents = serde_json::to_string_pretty(&document)?;
        temp.write_all(contents.as_bytes())
            .and_then(|_| temp.flush())
            .map_err(|e| self.io_error(e))?;
        temp.persist(&self.path)
            .map_err(|e| self.io_error(e.error))?;

        log::debug!("Saved the session to {}", self.path.display());
        Ok(())
    }

    fn io_error(&self, error: io::Error) -> StateError {
        StateError::Io {
            path: self.path.clone(),
            error,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Version {
    version: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Document {
    version: u32,
    cookies: SavedCookies,
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("Unable to access {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        error: io::Error,
    },
    #[error("Unable to parse the saved session")]
    Parse(#[from] serde_json::Error),
}
