use crate::ValidationError;
use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

/// The formats transactions can be exported in.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TransactionFormat {
    Ofx,
    Csv,
    /// Tab separated values for Microsoft Excel.
    Xls,
    /// QIF with four digit years, as read by Quicken.
    QifQuicken,
    /// QIF with four digit years, as read by Microsoft Money.
    QifMs,
}

impl TransactionFormat {
    pub const ALL: [TransactionFormat; 5] = [
        TransactionFormat::Ofx,
        TransactionFormat::Csv,
        TransactionFormat::Xls,
        TransactionFormat::QifQuicken,
        TransactionFormat::QifMs,
    ];

    /// The name used on the command line, which is also the file extension.
    pub fn name(self) -> &'static str {
        match self {
            TransactionFormat::Ofx => "ofx",
            TransactionFormat::Csv => "csv",
            TransactionFormat::Xls => "xls",
            TransactionFormat::QifQuicken => "qif-quicken",
            TransactionFormat::QifMs => "qif-ms",
        }
    }

    /// The portal's id for this format in the download wizard.
    pub(crate) fn form_id(self) -> u8 {
        match self {
            TransactionFormat::Ofx => 4,
            TransactionFormat::Csv => 5,
            TransactionFormat::QifQuicken => 6,
            TransactionFormat::QifMs => 7,
            TransactionFormat::Xls => 10,
        }
    }

    /// The prefix of the content type the portal sends this format with.
    pub fn content_type(self) -> &'static str {
        match self {
            TransactionFormat::Ofx => "application/OFX",
            TransactionFormat::Csv => "application/csv",
            TransactionFormat::Xls => "application/xls",
            TransactionFormat::QifQuicken | TransactionFormat::QifMs => {
                "application/QIF"
            },
        }
    }

    /// Does a response's content type fit this format?
    pub fn matches(self, content_type: &str) -> bool {
        let expected = self.content_type();

        content_type
            .get(..expected.len())
            .map_or(false, |prefix| prefix.eq_ignore_ascii_case(expected))
    }
}

impl Display for TransactionFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TransactionFormat {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransactionFormat::ALL
            .iter()
            .copied()
            .find(|format| format.name() == s)
            .ok_or_else(|| ValidationError::UnsupportedFormat(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_every_format_by_name() {
        for format in &TransactionFormat::ALL {
            let got: TransactionFormat = format.name().parse().unwrap();

            assert_eq!(got, *format);
        }
    }

    #[test]
    fn unknown_formats_are_rejected() {
        let got = "pdf".parse::<TransactionFormat>();

        assert_eq!(got, Err(ValidationError::UnsupportedFormat(String::from("pdf"))));
    }

    #[test]
    fn content_types_match_by_prefix() {
        assert!(TransactionFormat::Ofx.matches("application/OFX; charset=windows-1250"));
        assert!(TransactionFormat::Ofx.matches("application/ofx"));
        assert!(TransactionFormat::QifMs.matches("application/QIF"));
        assert!(TransactionFormat::QifQuicken.matches("application/QIF"));
    }

    #[test]
    fn every_format_rejects_the_others() {
        for format in &TransactionFormat::ALL {
            assert!(!format.matches("text/html; charset=UTF-8"), "{}", format);
            assert!(!format.matches(""), "{}", format);
        }

        assert!(!TransactionFormat::Csv.matches("application/OFX"));
        assert!(!TransactionFormat::Xls.matches("application/csv"));
        assert!(!TransactionFormat::Ofx.matches("application/QIF"));
    }
}
