//! Terminal prompts
//!
//! Order is fixed: username, password (not echoed), MAC address, hours.

use console::Term;
use macpass_auth::CredentialSource;
use macpass_core::{Credentials, Error, Result};
use std::io::{self, BufRead, IsTerminal, Write};

pub const USERNAME_PROMPT: &str = "Enter Username: ";
pub const PASSWORD_PROMPT: &str = "Enter Password: ";
pub const MAC_PROMPT: &str = "Enter a MAC address: ";
pub const HOURS_PROMPT: &str = "Enter the duration for the connection in hours (MAX 4): ";

/// Line-oriented input
pub trait Prompter {
    fn read_line(&mut self, prompt: &str) -> Result<String>;

    /// Read a line without echoing it
    fn read_secret(&mut self, prompt: &str) -> Result<String>;
}

/// Prompts on stdout, masks the password when stdin is a terminal
pub struct TerminalPrompter {
    term: Term,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }

    fn interactive(&self) -> bool {
        self.term.is_term() && io::stdin().is_terminal()
    }

    fn show(&self, prompt: &str) -> Result<()> {
        self.term.write_str(prompt)?;
        self.term.flush()?;
        Ok(())
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TerminalPrompter {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        self.show(prompt)?;
        read_line_from(&mut io::stdin().lock())
    }

    fn read_secret(&mut self, prompt: &str) -> Result<String> {
        self.show(prompt)?;
        if self.interactive() {
            Ok(self.term.read_secure_line()?)
        } else {
            read_line_from(&mut io::stdin().lock())
        }
    }
}

/// Prompter over any reader and writer. Secrets are read like any other
/// line; there is no echo to suppress.
pub struct LinePrompter<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn show(&mut self, prompt: &str) -> Result<()> {
        self.writer.write_all(prompt.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        self.show(prompt)?;
        read_line_from(&mut self.reader)
    }

    fn read_secret(&mut self, prompt: &str) -> Result<String> {
        self.show(prompt)?;
        read_line_from(&mut self.reader)
    }
}

/// One line with the terminator stripped; EOF is an error
fn read_line_from<R: BufRead + ?Sized>(reader: &mut R) -> Result<String> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(Error::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "input closed",
        )));
    }

    let trimmed = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed);
    Ok(line)
}

/// Collects directory credentials through a [`Prompter`]
pub struct CredentialPrompt<'a, P: ?Sized> {
    prompter: &'a mut P,
}

impl<'a, P: Prompter + ?Sized> CredentialPrompt<'a, P> {
    pub fn new(prompter: &'a mut P) -> Self {
        Self { prompter }
    }
}

impl<P: Prompter + ?Sized> CredentialSource for CredentialPrompt<'_, P> {
    fn collect(&mut self) -> Result<Credentials> {
        let username = self.prompter.read_line(USERNAME_PROMPT)?;
        let secret = self.prompter.read_secret(PASSWORD_PROMPT)?;
        Ok(Credentials::from_input(&username, &secret))
    }
}

/// MAC address exactly as typed, minus surrounding whitespace
pub fn read_mac<P: Prompter + ?Sized>(prompter: &mut P) -> Result<String> {
    Ok(prompter.read_line(MAC_PROMPT)?.trim().to_string())
}

/// Requested hours, unclamped
pub fn read_hours<P: Prompter + ?Sized>(prompter: &mut P) -> Result<i64> {
    let input = prompter.read_line(HOURS_PROMPT)?;
    let input = input.trim();
    input.parse().map_err(|_| {
        Error::Validation(format!(
            "expected a whole number of hours, got {:?}",
            input
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> LinePrompter<Cursor<Vec<u8>>, Vec<u8>> {
        LinePrompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_collect_credentials() {
        let mut prompter = prompter("  alice \n wonderland\r\n");
        let creds = CredentialPrompt::new(&mut prompter).collect().unwrap();

        assert_eq!(creds.username, "alice");
        assert_eq!(creds.secret.expose(), "wonderland");

        let shown = String::from_utf8(prompter.into_writer()).unwrap();
        assert_eq!(shown, format!("{}{}", USERNAME_PROMPT, PASSWORD_PROMPT));
    }

    #[test]
    fn test_closed_input() {
        let mut prompter = prompter("alice\n");
        let err = CredentialPrompt::new(&mut prompter).collect().unwrap_err();
        assert!(matches!(err, Error::Io(ref e) if e.kind() == io::ErrorKind::UnexpectedEof));
    }

    #[test]
    fn test_last_line_without_newline() {
        let mut prompter = prompter("AA:BB:CC:DD:EE:FF");
        assert_eq!(read_mac(&mut prompter).unwrap(), "AA:BB:CC:DD:EE:FF");
    }

    #[test]
    fn test_read_mac_keeps_literal_value() {
        let mut prompter = prompter("  not-a-mac \n");
        assert_eq!(read_mac(&mut prompter).unwrap(), "not-a-mac");
    }

    #[test]
    fn test_read_hours() {
        assert_eq!(read_hours(&mut prompter("2\n")).unwrap(), 2);
        assert_eq!(read_hours(&mut prompter(" -7 \n")).unwrap(), -7);
        assert_eq!(read_hours(&mut prompter("99\n")).unwrap(), 99);

        let err = read_hours(&mut prompter("two\n")).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let err = read_hours(&mut prompter("")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
