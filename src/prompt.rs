use crate::error::Error;
use std::{
    borrow::Cow,
    io::{self, BufRead, Write},
};
use termion::input::TermRead;

/// Settings of an interactive prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// Defaults to a capitalized form of the longest option name.
    pub text: Option<Cow<'static, str>>,
    /// Used when the user enters nothing.
    pub default: Option<Cow<'static, str>>,
    pub hide: bool,
    pub confirm: bool,
    pub confirmation: Cow<'static, str>,
    pub suffix: Cow<'static, str>,
    pub show_default: bool,
}

/// A blocking, line-oriented user interface.
///
/// Implementors provide `read` and `write`; `prompt` drives the conversation: it writes the prompt,
/// substitutes the default for empty input, asks for confirmation when required and asks again
/// whenever `convert` rejects the input.
pub trait Terminal {
    /// Reads one line without its line terminator. `None` means the user cancelled.
    fn read(&mut self, hide: bool) -> io::Result<Option<String>>;
    fn write(&mut self, text: &str) -> io::Result<()>;

    /// Returns the accepted input, or `None` if the user cancelled.
    fn prompt(
        &mut self,
        text: &str,
        prompt: &Prompt,
        convert: &mut dyn FnMut(&str) -> Result<(), Error>,
    ) -> Result<Option<String>, Error> {
        let line = prompt.line(text);
        loop {
            self.write(&line)?;
            let Some(input) = self.read(prompt.hide)? else {
                return Ok(None);
            };
            let input = match (input.is_empty(), &prompt.default) {
                (true, Some(default)) => default.to_string(),
                (true, None) => continue,
                (false, _) if prompt.confirm => {
                    self.write(&prompt.confirmation)?;
                    let Some(again) = self.read(prompt.hide)? else {
                        return Ok(None);
                    };
                    if again != input {
                        self.write("Error: the two entered values do not match\n")?;
                        continue;
                    }
                    input
                }
                (false, _) => input,
            };
            match convert(&input) {
                Ok(()) => return Ok(Some(input)),
                Err(error) => self.write(&format!("Error: {error}\n"))?,
            }
        }
    }
}

/// The process' standard input and output.
#[derive(Debug, Default, Clone, Copy)]
pub struct Console;

impl Prompt {
    pub const fn new() -> Self {
        Self {
            text: None,
            default: None,
            hide: false,
            confirm: false,
            confirmation: Cow::Borrowed("Repeat for confirmation: "),
            suffix: Cow::Borrowed(": "),
            show_default: true,
        }
    }

    pub fn text(mut self, text: impl Into<Cow<'static, str>>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn default(mut self, default: impl Into<Cow<'static, str>>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn hide(mut self) -> Self {
        self.hide = true;
        self
    }

    pub fn confirm(mut self) -> Self {
        self.confirm = true;
        self
    }

    pub fn confirmation(mut self, confirmation: impl Into<Cow<'static, str>>) -> Self {
        self.confirmation = confirmation.into();
        self
    }

    pub fn suffix(mut self, suffix: impl Into<Cow<'static, str>>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn show_default(mut self, show: bool) -> Self {
        self.show_default = show;
        self
    }

    /// The line written before reading, e.g. `Username [guest]: `.
    pub fn line(&self, text: &str) -> String {
        match &self.default {
            Some(default) if self.show_default => format!("{text} [{default}]{}", self.suffix),
            _ => format!("{text}{}", self.suffix),
        }
    }
}

impl Default for Prompt {
    fn default() -> Self {
        Self::new()
    }
}

impl Terminal for Console {
    fn read(&mut self, hide: bool) -> io::Result<Option<String>> {
        if hide {
            let mut output = io::stdout();
            let input = TermRead::read_passwd(&mut io::stdin().lock(), &mut output)?;
            writeln!(output)?;
            return Ok(input);
        }

        let mut buffer = String::new();
        if BufRead::read_line(&mut io::stdin().lock(), &mut buffer)? == 0 {
            return Ok(None);
        }
        let length = buffer.trim_end_matches(['\n', '\r']).len();
        buffer.truncate(length);
        Ok(Some(buffer))
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        let mut output = io::stdout().lock();
        output.write_all(text.as_bytes())?;
        output.flush()
    }
}
