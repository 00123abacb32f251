use crate::{
    command::Command,
    error::Error,
    meta::Meta,
    parse::{Context, Invocation},
    prompt::Prompt,
    utility::type_metavar,
    value::Handle,
};
use core::num::NonZeroUsize;
use std::{borrow::Cow, fmt::Display, rc::Rc, str::FromStr};

pub(crate) type ValueStage<V> = Rc<dyn Fn(&Invocation, &str) -> Result<V, Error>>;
pub(crate) type EachStage<E, V> = Rc<dyn Fn(Vec<V>) -> Result<E, Error>>;
pub(crate) type AllStage<A, E> = Rc<dyn Fn(&mut Context, Vec<E>) -> Result<A, Error>>;

/// An option declaration with its three-stage value pipeline.
///
/// - `V` is what every raw token converts to.
/// - `E` is what the tokens of a single invocation reduce to.
/// - `A` is what all invocations reduce to; it is the resolved value read through a [`Handle`].
///
/// Every combinator consumes the pipeline and returns a new one; stages are shared, never mutated.
pub struct Pipeline<A, E = String, V = String> {
    pub(crate) meta: Meta,
    pub(crate) error: Option<Error>,
    pub(crate) value: ValueStage<V>,
    pub(crate) each: EachStage<E, V>,
    pub(crate) all: AllStage<A, E>,
}

/// A pipeline whose resolved value is checked; it can only be bound.
pub struct Validated<A, E = String, V = String>(Pipeline<A, E, V>);

/// Raw options resolve to the last string given, if any.
pub type Raw = Pipeline<Option<String>>;

/// Starts the declaration of an option with a single string value per invocation.
pub fn option() -> Raw {
    Pipeline {
        meta: Meta::new(),
        error: None,
        value: value(|_, token| Ok(token.to_owned())),
        each: single(),
        all: last(),
    }
}

impl Pipeline<Option<String>> {
    /// Converts every token with `convert`. `metavar` names the expected value.
    pub fn convert<T: 'static, R: Display, F: Fn(&str) -> Result<T, R> + 'static>(
        self,
        metavar: impl Into<Cow<'static, str>>,
        convert: F,
    ) -> Pipeline<Option<T>, T, T> {
        let metavar = metavar.into();
        let convert = {
            let metavar = metavar.clone();
            value(move |invocation, token| {
                convert(token).map_err(|reason| {
                    Error::FailedToParseOptionValue(
                        Cow::Owned(token.to_owned()),
                        Some(metavar.clone()),
                        invocation.name.clone(),
                        Cow::Owned(reason.to_string()),
                    )
                })
            })
        };
        let mut meta = self.meta;
        meta.default_metavar = Some(metavar);
        Pipeline {
            meta,
            error: self.error,
            value: convert,
            each: single(),
            all: last(),
        }
    }

    /// Converts every token with [`FromStr`].
    pub fn parse<T: FromStr + 'static>(self) -> Pipeline<Option<T>, T, T>
    where
        T::Err: Display,
    {
        self.convert(type_metavar::<T>(), str::parse::<T>)
    }
}

impl<A, E, V> Pipeline<A, E, V> {
    pub fn name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.meta.names.push(name.into());
        self
    }

    pub fn names<N: Into<Cow<'static, str>>>(self, names: impl IntoIterator<Item = N>) -> Self {
        names.into_iter().fold(self, Pipeline::name)
    }

    pub fn help(mut self, help: impl Into<Cow<'static, str>>) -> Self {
        self.meta.help = help.into();
        self
    }

    pub fn metavar(mut self, metavar: impl Into<Cow<'static, str>>) -> Self {
        self.meta.metavar = Some(metavar.into());
        self
    }

    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    /// Reports the first declaration mistake made while combining this pipeline.
    pub fn check(&self) -> Result<(), Error> {
        match &self.error {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn map_all<B>(self, all: AllStage<B, E>) -> Pipeline<B, E, V> {
        Pipeline {
            meta: self.meta,
            error: self.error,
            value: self.value,
            each: self.each,
            all,
        }
    }
}

impl<A: 'static, E: 'static, V: 'static> Pipeline<A, E, V> {
    /// Checks the resolved value; a rejection fails the parse with [`Error::InvalidOptionValue`].
    pub fn validate<R: Display, F: Fn(&A) -> Result<(), R> + 'static>(
        self,
        validate: F,
    ) -> Validated<A, E, V> {
        let inner = self.all.clone();
        Validated(self.map_all(all(move |context, values| {
            let value = inner(context, values)?;
            match validate(&value) {
                Ok(()) => Ok(value),
                Err(reason) => Err(Error::InvalidOptionValue(
                    Cow::Owned(reason.to_string()),
                    context.name(),
                )),
            }
        })))
    }

    /// Freezes the names of the option, inferring them from `identifier` if none were given, and
    /// registers it with `command`.
    pub fn bind(self, command: &mut Command, identifier: &str) -> Result<Handle<A>, Error> {
        self.check()?;
        let meta = command.infer(self.meta, identifier)?;
        command.register(meta, self.value, self.each, self.all)
    }
}

impl<E: 'static, V: 'static> Pipeline<Option<E>, E, V> {
    pub fn transform_all<A, F: Fn(&mut Context, Vec<E>) -> Result<A, Error> + 'static>(
        self,
        transform: F,
    ) -> Pipeline<A, E, V> {
        self.map_all(all(transform))
    }

    /// Resolves to `default` when the option never occurs.
    pub fn default(self, default: E) -> Pipeline<E, E, V>
    where
        E: Clone,
    {
        self.default_with(move || default.clone())
    }

    pub fn default_with<F: Fn() -> E + 'static>(self, default: F) -> Pipeline<E, E, V> {
        self.transform_all(move |_, mut values| Ok(values.pop().unwrap_or_else(&default)))
    }

    /// Resolves to every occurrence in command-line order.
    pub fn multiple(self) -> Pipeline<Vec<E>, E, V> {
        self.transform_all(|_, values| Ok(values))
    }

    /// Makes every invocation consume `nargs` tokens, reduced by `transform`. `nargs` must be at
    /// least 2; flags and single values have their own combinators.
    pub fn transform_nargs<T: 'static, F: Fn(Vec<V>) -> Result<T, Error> + 'static>(
        self,
        nargs: isize,
        transform: F,
    ) -> Pipeline<Option<T>, T, V> {
        let mut meta = self.meta;
        let mut error = self.error;
        match nargs {
            nargs if nargs < 0 => error = error.or(Some(Error::NegativeNargs(nargs))),
            0 => error = error.or(Some(Error::FlagNargs)),
            1 => error = error.or(Some(Error::SingleNargs)),
            _ => match usize::try_from(nargs).ok().and_then(NonZeroUsize::new) {
                Some(nargs) => meta.nargs = nargs,
                None => error = error.or(Some(Error::NegativeNargs(nargs))),
            },
        }
        Pipeline {
            meta,
            error,
            value: self.value,
            each: Rc::new(transform),
            all: last(),
        }
    }

    pub fn paired(self) -> Pipeline<Option<(V, V)>, (V, V), V> {
        self.transform_nargs(2, |values| match <[V; 2]>::try_from(values) {
            Ok([first, second]) => Ok((first, second)),
            Err(values) => Err(Error::InvalidArity(None, 2, values.len())),
        })
    }

    pub fn triple(self) -> Pipeline<Option<(V, V, V)>, (V, V, V), V> {
        self.transform_nargs(3, |values| match <[V; 3]>::try_from(values) {
            Ok([first, second, third]) => Ok((first, second, third)),
            Err(values) => Err(Error::InvalidArity(None, 3, values.len())),
        })
    }
}

impl<T: 'static> Pipeline<Option<T>, T, T> {
    /// Asks the user for the value when the option never occurs. The input goes through the whole
    /// pipeline; cancelling the prompt aborts the parse with [`Error::Aborted`].
    pub fn prompt(self, prompt: Prompt) -> Pipeline<T, T, T> {
        let (value, each, inner) = (self.value.clone(), self.each.clone(), self.all.clone());
        self.transform_all(move |context, mut values| {
            if let Some(provided) = values.pop() {
                return Ok(provided);
            }
            let text = match &prompt.text {
                Some(text) => text.to_string(),
                None => context.prompt_text(),
            };
            let name = context.name();
            context.prompt(&text, &prompt, |context, input| {
                let invocation = Invocation::new(name.clone(), [input.to_owned()]);
                let converted = value(&invocation, input)?;
                let each = each(vec![converted])?;
                match inner(context, vec![each])? {
                    Some(resolved) => Ok(resolved),
                    None => Err(Error::MissingOptionValue(
                        context.meta().metavar().cloned(),
                        context.name(),
                    )),
                }
            })
        })
    }
}

impl<A: 'static, E: 'static, V: 'static> Validated<A, E, V> {
    pub fn validate<R: Display, F: Fn(&A) -> Result<(), R> + 'static>(
        self,
        validate: F,
    ) -> Validated<A, E, V> {
        self.0.validate(validate)
    }

    pub fn bind(self, command: &mut Command, identifier: &str) -> Result<Handle<A>, Error> {
        self.0.bind(command, identifier)
    }

    pub fn meta(&self) -> &Meta {
        self.0.meta()
    }

    pub fn check(&self) -> Result<(), Error> {
        self.0.check()
    }
}

impl<A, E, V> Clone for Pipeline<A, E, V> {
    fn clone(&self) -> Self {
        Self {
            meta: self.meta.clone(),
            error: self.error.clone(),
            value: self.value.clone(),
            each: self.each.clone(),
            all: self.all.clone(),
        }
    }
}

fn value<V, F: Fn(&Invocation, &str) -> Result<V, Error> + 'static>(value: F) -> ValueStage<V> {
    Rc::new(value)
}

fn all<A, E, F: Fn(&mut Context, Vec<E>) -> Result<A, Error> + 'static>(all: F) -> AllStage<A, E> {
    Rc::new(all)
}

fn single<T: 'static>() -> EachStage<T, T> {
    Rc::new(|values: Vec<T>| match <[T; 1]>::try_from(values) {
        Ok([value]) => Ok(value),
        Err(values) => Err(Error::InvalidArity(None, 1, values.len())),
    })
}

fn last<T: 'static>() -> AllStage<Option<T>, T> {
    all(|_, mut values: Vec<T>| Ok(values.pop()))
}
