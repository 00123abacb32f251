use core::fmt::{self, Write};

/// Casing applied to binding identifiers when option names are inferred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Case {
    Same,
    #[default]
    Kebab,
    Snake {
        upper: bool,
    },
}

impl Case {
    #[inline]
    pub fn convert(&self, source: &str) -> String {
        let mut target = String::with_capacity(source.len());
        match self.convert_in(source, &mut target) {
            Ok(_) => target,
            Err(_) => unreachable!(),
        }
    }

    pub fn convert_in<W: Write>(&self, source: &str, target: W) -> Result<(), fmt::Error> {
        match self {
            Case::Same => separate_in(source, target, None, None),
            Case::Kebab => separate_in(source, target, Some('-'), Some(false)),
            Case::Snake { upper } => separate_in(source, target, Some('_'), Some(*upper)),
        }
    }
}

#[inline]
pub(crate) const fn is_separator(letter: char) -> bool {
    matches!(letter, '_' | '-' | ' ' | '\n')
}

/// Splits `source` into words and joins them with `separator`. A word ends at a separator or before an
/// upper case letter that follows a lower case one; digits never start a word.
fn separate_in<W: Write>(
    source: &str,
    mut target: W,
    separator: Option<char>,
    upper: Option<bool>,
) -> Result<(), fmt::Error> {
    let Some(separator) = separator else {
        return target.write_str(source);
    };
    let mut pending = false;
    let mut written = false;
    let mut previous = ' ';
    for letter in source.chars() {
        if is_separator(letter) {
            pending = written;
        } else {
            if written && previous.is_ascii_lowercase() && letter.is_ascii_uppercase() {
                pending = true;
            }
            if pending {
                target.write_char(separator)?;
                pending = false;
            }
            let letter = match upper {
                Some(true) => letter.to_ascii_uppercase(),
                Some(false) => letter.to_ascii_lowercase(),
                None => letter,
            };
            target.write_char(letter)?;
            written = true;
        }
        previous = letter;
    }
    Ok(())
}
