use crate::{
    command::Command,
    error::Error,
    meta::Meta,
    prompt::{Prompt, Terminal},
    spell::Spell,
};
use core::num::NonZeroUsize;
use std::{borrow::Cow, collections::VecDeque};
use tracing::{debug, trace};

/// One occurrence of an option on the command line with the tokens it consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub name: Cow<'static, str>,
    pub values: Vec<Cow<'static, str>>,
}

/// Raw invocations of every option of a [`Command`], keyed by registration index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collector {
    slots: Vec<(NonZeroUsize, Vec<Invocation>)>,
}

/// What an all-stage sees while finalizing one option.
pub struct Context<'a> {
    meta: &'a Meta,
    terminal: Option<&'a mut dyn Terminal>,
}

impl Invocation {
    pub fn new<N: Into<Cow<'static, str>>, V: Into<Cow<'static, str>>>(
        name: N,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

impl Collector {
    pub(crate) fn new(nargs: impl IntoIterator<Item = NonZeroUsize>) -> Self {
        Self {
            slots: nargs.into_iter().map(|nargs| (nargs, Vec::new())).collect(),
        }
    }

    /// Records an invocation of the option at `index`. The invocation must carry exactly as many
    /// tokens as the option consumes.
    pub fn push(&mut self, index: usize, invocation: Invocation) -> Result<(), Error> {
        let Some((nargs, invocations)) = self.slots.get_mut(index) else {
            return Err(Error::InvalidIndex(index));
        };
        if invocation.values.len() != nargs.get() {
            return Err(Error::InvalidArity(
                Some(invocation.name),
                nargs.get(),
                invocation.values.len(),
            ));
        }
        trace!(name = %invocation.name, values = invocation.values.len(), "collected invocation");
        invocations.push(invocation);
        Ok(())
    }

    pub fn invocations(&self, index: usize) -> &[Invocation] {
        match self.slots.get(index) {
            Some((_, invocations)) => invocations,
            None => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl<'a> Context<'a> {
    pub(crate) const fn new(meta: &'a Meta) -> Self {
        Self {
            meta,
            terminal: None,
        }
    }

    pub(crate) fn terminal(mut self, terminal: &'a mut dyn Terminal) -> Self {
        self.terminal = Some(terminal);
        self
    }

    pub fn meta(&self) -> &Meta {
        self.meta
    }

    pub fn name(&self) -> Cow<'static, str> {
        self.meta.name()
    }

    /// `--user-name` becomes `User name`.
    pub fn prompt_text(&self) -> String {
        let name = self.meta.name();
        let name = name.strip_prefix('-').unwrap_or(&name);
        let name = name.strip_prefix('-').unwrap_or(name);
        let mut letters = name.chars().map(|letter| match letter {
            '-' | '_' => ' ',
            letter => letter,
        });
        match letters.next() {
            Some(first) => first.to_uppercase().chain(letters).collect(),
            None => String::from("Value"),
        }
    }

    /// Asks the terminal for a value. Every attempt goes through `convert`, which sees a context without
    /// a terminal; the value of the accepted attempt is returned. Cancellation yields [`Error::Aborted`].
    pub fn prompt<T>(
        &mut self,
        text: &str,
        prompt: &Prompt,
        mut convert: impl FnMut(&mut Context<'_>, &str) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let Some(terminal) = self.terminal.take() else {
            return Err(Error::InvalidParseState(self.name()));
        };
        debug!(option = %self.meta.name(), "prompting for missing value");
        let mut inner = Context::new(self.meta);
        let mut resolved = None;
        let reply = terminal.prompt(text, prompt, &mut |input| {
            resolved = Some(convert(&mut inner, input)?);
            Ok(())
        });
        self.terminal = Some(terminal);
        match (reply?, resolved) {
            (Some(_), Some(value)) => Ok(value),
            (Some(_), None) => Err(Error::MissingOptionValue(
                self.meta.metavar().cloned(),
                self.name(),
            )),
            (None, _) => {
                debug!(option = %self.meta.name(), "prompt cancelled");
                Err(Error::Aborted)
            }
        }
    }
}

impl Command {
    /// Groups `arguments` into invocations of the registered options. Blank arguments are skipped
    /// where a name is expected; values are taken verbatim.
    pub fn collect<A: Into<Cow<'static, str>>>(
        &self,
        arguments: impl IntoIterator<Item = A>,
    ) -> Result<Collector, Error> {
        let mut arguments: VecDeque<Cow<'static, str>> =
            arguments.into_iter().map(Into::into).collect();
        let mut collector = self.collector();
        while let Some(argument) = arguments.pop_front() {
            if argument.trim().is_empty() {
                continue;
            } else if argument == self.long {
                break;
            }

            let (key, inline) = self.split(&argument);
            match self.indices.get(&key).copied() {
                Some(index) => {
                    let meta = self.meta(index)?;
                    let nargs = meta.nargs().get();
                    let mut values = Vec::with_capacity(nargs);
                    if let Some(inline) = inline {
                        if nargs > 1 {
                            return Err(Error::InvalidArity(Some(key), nargs, 1));
                        }
                        values.push(inline);
                    }
                    while values.len() < nargs {
                        match arguments.pop_front() {
                            Some(value) => values.push(value),
                            None => {
                                return Err(Error::MissingOptionValue(
                                    meta.metavar().cloned(),
                                    key,
                                ));
                            }
                        }
                    }
                    collector.push(index, Invocation { name: key, values })?;
                }
                None if key.starts_with(self.short.as_ref())
                    || key.starts_with(self.long.as_ref()) =>
                {
                    let suggestions = Spell::new().suggest(&key, self.indices.keys().cloned());
                    return Err(Error::UnrecognizedArgument(key, suggestions));
                }
                None => {
                    arguments.push_front(argument);
                    return Err(Error::ExcessArguments(arguments));
                }
            }
        }

        if arguments.is_empty() {
            Ok(collector)
        } else {
            Err(Error::ExcessArguments(arguments))
        }
    }

    fn split(
        &self,
        argument: &Cow<'static, str>,
    ) -> (Cow<'static, str>, Option<Cow<'static, str>>) {
        if argument.starts_with(self.long.as_ref()) {
            if let Some((name, value)) = argument.split_once('=') {
                return (Cow::Owned(name.to_owned()), Some(Cow::Owned(value.to_owned())));
            }
        }
        (argument.clone(), None)
    }
}
