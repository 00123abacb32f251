use crate::{
    case::{is_separator, Case},
    error::Error,
};
use core::num::NonZeroUsize;
use std::borrow::Cow;

const SECONDARY: char = '/';

/// Declaration of an option: its names, arity, help and metavar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Meta {
    pub(crate) names: Vec<Cow<'static, str>>,
    pub(crate) nargs: NonZeroUsize,
    pub(crate) help: Cow<'static, str>,
    pub(crate) metavar: Option<Cow<'static, str>>,
    pub(crate) default_metavar: Option<Cow<'static, str>>,
}

impl Meta {
    pub(crate) const fn new() -> Self {
        Self {
            names: Vec::new(),
            nargs: NonZeroUsize::MIN,
            help: Cow::Borrowed(""),
            metavar: None,
            default_metavar: Some(Cow::Borrowed("TEXT")),
        }
    }

    pub fn names(&self) -> &[Cow<'static, str>] {
        &self.names
    }

    /// The longest name, which is the one used when reporting errors about the option.
    pub fn name(&self) -> Cow<'static, str> {
        self.names
            .iter()
            .fold(None::<&Cow<'static, str>>, |longest, name| match longest {
                Some(longest) if longest.len() >= name.len() => Some(longest),
                _ => Some(name),
            })
            .cloned()
            .unwrap_or(Cow::Borrowed(""))
    }

    pub const fn nargs(&self) -> NonZeroUsize {
        self.nargs
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    /// The explicit metavar if one was given, else the one implied by the value conversion.
    pub fn metavar(&self) -> Option<&Cow<'static, str>> {
        self.metavar.as_ref().or(self.default_metavar.as_ref())
    }

    /// Freezes the names of the option. Explicit names are trimmed and validated; when there are none,
    /// a name is inferred from `identifier`.
    pub(crate) fn bind(
        mut self,
        identifier: &str,
        case: Case,
        short: &str,
        long: &str,
    ) -> Result<Self, Error> {
        let mut names: Vec<Cow<'static, str>> = Vec::with_capacity(self.names.len());
        for name in self.names.drain(..) {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                return Err(Error::InvalidOptionName(name));
            }
            if trimmed.contains(SECONDARY) {
                return Err(Error::SecondaryNames(name));
            }
            let name = if trimmed.len() == name.len() {
                name
            } else {
                Cow::Owned(trimmed.to_owned())
            };
            if !names.contains(&name) {
                names.push(name);
            }
        }
        if names.is_empty() {
            names.push(infer(identifier, case, short, long)?);
        }
        self.names = names;
        Ok(self)
    }
}

fn infer(identifier: &str, case: Case, short: &str, long: &str) -> Result<Cow<'static, str>, Error> {
    let identifier = identifier.trim();
    let mut letters = identifier.chars();
    let mut name = String::new();
    let prefix = match (letters.next(), letters.next()) {
        (None, _) => return Err(Error::MissingOptionName),
        (Some(letter), None) => {
            name.push_str(short);
            if !is_separator(letter) {
                name.push(letter);
            }
            short.len()
        }
        (Some(_), Some(_)) => {
            name.push_str(long);
            case.convert_in(identifier, &mut name)?;
            long.len()
        }
    };
    if name.len() == prefix {
        Err(Error::InvalidOptionName(Cow::Owned(identifier.to_owned())))
    } else {
        Ok(Cow::Owned(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bind(names: &[&'static str], identifier: &str) -> Result<Vec<Cow<'static, str>>, Error> {
        let mut meta = Meta::new();
        meta.names = names.iter().map(|&name| Cow::Borrowed(name)).collect();
        Ok(meta.bind(identifier, Case::Kebab, "-", "--")?.names)
    }

    #[test]
    fn infers_long_name_from_identifier() {
        assert_eq!(bind(&[], "repo_home"), Ok(vec!["--repo-home".into()]));
        assert_eq!(bind(&[], "repoHome"), Ok(vec!["--repo-home".into()]));
    }

    #[test]
    fn infers_short_name_from_single_letter() {
        assert_eq!(bind(&[], "v"), Ok(vec!["-v".into()]));
        assert_eq!(bind(&[], " V "), Ok(vec!["-V".into()]));
    }

    #[test]
    fn keeps_explicit_names() {
        assert_eq!(
            bind(&[" --rev", "-r", "--rev"], "revision"),
            Ok(vec!["--rev".into(), "-r".into()])
        );
    }

    #[test]
    fn rejects_invalid_names() {
        assert_eq!(bind(&["  "], "rev"), Err(Error::InvalidOptionName("  ".into())));
        assert_eq!(
            bind(&["--shallow/--deep"], "shallow"),
            Err(Error::SecondaryNames("--shallow/--deep".into()))
        );
        assert_eq!(bind(&[], " "), Err(Error::MissingOptionName));
        assert_eq!(bind(&[], "__"), Err(Error::InvalidOptionName("__".into())));
        assert_eq!(bind(&[], "_"), Err(Error::InvalidOptionName("_".into())));
        assert_eq!(bind(&[], "-"), Err(Error::InvalidOptionName("-".into())));
    }

    #[test]
    fn longest_name_is_reported() {
        let mut meta = Meta::new();
        meta.names = vec!["-r".into(), "--rev".into()];
        assert_eq!(meta.name(), "--rev");
        assert_eq!(Meta::new().name(), "");
    }
}
