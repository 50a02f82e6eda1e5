use crate::DateRange;
use std::{
    fmt::{self, Display, Formatter},
    io::{self, Write},
    path::PathBuf,
};

/// Where a downloaded export ends up.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Stdout,
    File(PathBuf),
}

impl Output {
    /// Use the file given on the command line (`-` meaning stdout), falling
    /// back to `default_name` in the current directory.
    pub fn new(requested: Option<PathBuf>, default_name: String) -> Self {
        match requested {
            Some(path) if path.as_os_str() == "-" => Output::Stdout,
            Some(path) => Output::File(path),
            None => Output::File(PathBuf::from(default_name)),
        }
    }

    /// Write the complete export in one go.
    pub fn write(&self, data: &[u8]) -> io::Result<()> {
        match self {
            Output::Stdout => {
                let stdout = io::stdout();
                let mut stdout = stdout.lock();
                stdout.write_all(data)?;
                stdout.flush()
            },
            Output::File(path) => {
                log::debug!("Writing {} bytes to {}", data.len(), path.display());
                std::fs::write(path, data)
            },
        }
    }
}

impl Display for Output {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Output::Stdout => f.write_str("<stdout>"),
            Output::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// The default name for a transaction export, e.g.
/// `citibank_transactions_2024-01-01_2024-01-09.ofx`.
pub fn transactions_file_name(
    bank: &str,
    range: Option<&DateRange>,
    extension: &str,
) -> String {
    match range {
        Some(range) => format!("{}_transactions_{}.{}", bank, range, extension),
        None => format!("{}_transactions.{}", bank, extension),
    }
}

/// The default name for a statement, e.g. `citibank_statement_2023_1.pdf`.
pub fn statement_file_name(
    bank: &str,
    year: i32,
    statement: u32,
    extension: &str,
) -> String {
    format!("{}_statement_{}_{}.{}", bank, year, statement, extension)
}
