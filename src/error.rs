use core::fmt;
use std::{borrow::Cow, collections::VecDeque, error, io, mem::replace};

#[derive(Clone, PartialEq)]
pub enum Error {
    FlagNargs,
    SingleNargs,
    NegativeNargs(isize),
    SecondaryNames(Cow<'static, str>),
    InvalidOptionName(Cow<'static, str>),
    MissingOptionName,
    DuplicateName(Cow<'static, str>),

    MissingOptionValue(Option<Cow<'static, str>>, Cow<'static, str>),
    InvalidArity(Option<Cow<'static, str>>, usize, usize),
    UnrecognizedArgument(Cow<'static, str>, Vec<Cow<'static, str>>),
    ExcessArguments(VecDeque<Cow<'static, str>>),
    FailedToParseOptionValue(
        Cow<'static, str>,
        Option<Cow<'static, str>>,
        Cow<'static, str>,
        Cow<'static, str>,
    ),
    InvalidOptionValue(Cow<'static, str>, Cow<'static, str>),

    Aborted,
    Uninitialized(Cow<'static, str>),
    InvalidParseState(Cow<'static, str>),
    InvalidIndex(usize),
    Io(io::ErrorKind),
    Format(fmt::Error),
    Other(Cow<'static, str>),
}

impl Error {
    /// Errors caused by the arguments a user typed rather than by the way the options were declared.
    pub const fn is_usage(&self) -> bool {
        matches!(
            self,
            Error::MissingOptionValue(..)
                | Error::InvalidArity(..)
                | Error::UnrecognizedArgument(..)
                | Error::ExcessArguments(..)
                | Error::FailedToParseOptionValue(..)
                | Error::InvalidOptionValue(..)
        )
    }

    /// Process exit code used by [`crate::exit`].
    pub const fn code(&self) -> i32 {
        match self {
            Error::Aborted => 1,
            _ if self.is_usage() => 2,
            _ => 1,
        }
    }
}

impl error::Error for Error {}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::FlagNargs => write!(f, "Cannot set nargs = 0. Use a flag option instead.")?,
            Error::SingleNargs => write!(f, "Cannot set nargs = 1. Use 'convert' instead.")?,
            Error::NegativeNargs(nargs) => write!(f, "Invalid nargs '{nargs}'. Options cannot have nargs < 0.")?,
            Error::SecondaryNames(name) => write!(f, "Invalid option name '{name}'. Secondary option names are only allowed on flag options.")?,
            Error::InvalidOptionName(name) => write!(f, "Invalid option name '{name}'. A valid option name is non-empty.")?,
            Error::MissingOptionName => write!(f, "Missing name for option.")?,
            Error::DuplicateName(name) => write!(f, "Duplicate name '{name}'.")?,

            Error::MissingOptionValue(metavar, name) => {
                write!(f, "Missing value")?;
                if let Some(metavar) = metavar {
                    write!(f, " '{metavar}'")?;
                }
                write!(f, " for option '{name}'.")?;
            }
            Error::InvalidArity(name, expected, found) => {
                write!(f, "Expected {expected} value(s)")?;
                if let Some(name) = name {
                    write!(f, " for option '{name}'")?;
                }
                write!(f, " but found {found}.")?;
            }
            Error::UnrecognizedArgument(argument, suggestions) => {
                write!(f, "Unrecognized argument '{argument}'.")?;
                let suggestions = suggestions.iter().map(|suggestion| format!("'{suggestion}'"));
                write_join(f, " Similar matches: ", ".", ", ", suggestions)?;
            }
            Error::ExcessArguments(arguments) => {
                write_join(f, "Excess arguments '", "'.", ", ", arguments)?;
            }
            Error::FailedToParseOptionValue(value, metavar, name, reason) => {
                write!(f, "Failed to parse value '{value}'")?;
                if let Some(metavar) = metavar {
                    write!(f, " as '{metavar}'")?;
                }
                write!(f, " for option '{name}'")?;
                if reason.is_empty() {
                    write!(f, ".")?;
                } else {
                    write!(f, ": {reason}.")?;
                }
            }
            Error::InvalidOptionValue(reason, name) => {
                write!(f, "Invalid value for option '{name}': {reason}.")?
            }

            Error::Aborted => write!(f, "Aborted!")?,
            Error::Uninitialized(name) => write!(f, "Cannot read from option '{name}' before parsing the command line.")?,
            Error::InvalidParseState(name) => write!(f, "Invalid parse state for option '{name}'.")?,
            Error::InvalidIndex(index) => write!(f, "Invalid option index '{index}'.")?,
            Error::Io(kind) => write!(f, "Terminal failure: {kind}.")?,
            Error::Format(error) => error.fmt(f)?,
            Error::Other(error) => error.fmt(f)?,
        }
        Ok(())
    }
}

impl From<fmt::Error> for Error {
    fn from(error: fmt::Error) -> Self {
        Error::Format(error)
    }
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        Error::Io(error.kind())
    }
}

impl From<&'static str> for Error {
    fn from(value: &'static str) -> Self {
        Error::from(Cow::Borrowed(value))
    }
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::from(Cow::Owned(value))
    }
}

impl From<Cow<'static, str>> for Error {
    fn from(value: Cow<'static, str>) -> Self {
        Error::Other(value)
    }
}

fn write_join(
    formatter: &mut fmt::Formatter,
    prefix: impl fmt::Display,
    suffix: impl fmt::Display,
    separator: impl fmt::Display,
    items: impl IntoIterator<Item = impl fmt::Display>,
) -> Result<(), fmt::Error> {
    let mut has = false;
    for item in items.into_iter() {
        if replace(&mut has, true) {
            write!(formatter, "{separator}")?;
        } else {
            write!(formatter, "{prefix}")?;
        }
        write!(formatter, "{item}")?;
    }
    if has {
        write!(formatter, "{suffix}")?;
    }
    Ok(())
}
