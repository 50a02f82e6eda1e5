use crate::ValidationError;
use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

/// The export formats offered by the API.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Format {
    Xml,
    Ofx,
    /// ABO, the Czech banks' fixed-width interchange format.
    Gpc,
    Csv,
    Html,
    Json,
    /// MT940.
    Sta,
    /// Only available for statements.
    Pdf,
}

impl Format {
    pub const ALL: [Format; 8] = [
        Format::Xml,
        Format::Ofx,
        Format::Gpc,
        Format::Csv,
        Format::Html,
        Format::Json,
        Format::Sta,
        Format::Pdf,
    ];

    /// The name used on the command line and in the API's paths.
    pub fn name(self) -> &'static str {
        match self {
            Format::Xml => "xml",
            Format::Ofx => "ofx",
            Format::Gpc => "gpc",
            Format::Csv => "csv",
            Format::Html => "html",
            Format::Json => "json",
            Format::Sta => "sta",
            Format::Pdf => "pdf",
        }
    }

    /// Check the format can be used for transaction listings.
    pub fn transactions(self) -> Result<Self, ValidationError> {
        match self {
            Format::Pdf => Err(ValidationError::UnsupportedFormat(
                self.name().to_string(),
            )),
            other => Ok(other),
        }
    }
}

impl Display for Format {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Format::ALL
            .iter()
            .copied()
            .find(|format| format.name() == s)
            .ok_or_else(|| ValidationError::UnsupportedFormat(s.to_string()))
    }
}
