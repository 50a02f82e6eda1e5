use crate::{citibank::Credentials, interrupt};
use std::io::{self, BufRead, Write};

/// Ask the person at the terminal for each credential as the login needs it.
#[derive(Debug, Default)]
pub struct TerminalCredentials;

impl Credentials for TerminalCredentials {
    fn username(&mut self) -> io::Result<String> { read_line("Username: ") }

    /// Fails with [`io::ErrorKind::Interrupted`] on Ctrl-C, once the
    /// terminal is back to normal.
    fn password(&mut self) -> io::Result<String> {
        interrupt::prompt_handling_interrupts(|| {
            rpassword::prompt_password("Password: ")
        })
    }

    fn second_factor(&mut self) -> io::Result<String> {
        read_line("SMS Password: ")
    }
}

fn read_line(prompt: &str) -> io::Result<String> {
    let stdout = io::stdout();
    let mut stdout = stdout.lock();
    stdout.write_all(prompt.as_bytes())?;
    stdout.flush()?;

    let stdin = io::stdin();
    read_answer(&mut stdin.lock())
}

fn read_answer(input: &mut impl BufRead) -> io::Result<String> {
    let mut line = String::new();

    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "no input on the terminal",
        ));
    }

    Ok(line.trim().to_string())
}
