use crate::{
    build::{AllStage, EachStage, ValueStage},
    error::Error,
    meta::Meta,
    parse::{Context, Invocation},
    prompt::Terminal,
};
use std::{
    borrow::Cow,
    cell::{Ref, RefCell},
    rc::Rc,
};
use tracing::trace;

pub(crate) enum State<T> {
    Unset,
    Set(T),
}

/// Read access to the resolved value of a bound option.
///
/// The value only exists once the owning [`crate::Command`] has finalized a parse pass; reading it
/// earlier is a programming error reported as [`Error::Uninitialized`].
pub struct Handle<T> {
    index: usize,
    meta: Rc<Meta>,
    state: Rc<RefCell<State<T>>>,
}

/// A bound pipeline as stored in the registry of a command.
pub(crate) struct Entry<A, E, V> {
    pub meta: Rc<Meta>,
    pub value: ValueStage<V>,
    pub each: EachStage<E, V>,
    pub all: AllStage<A, E>,
    pub state: Rc<RefCell<State<A>>>,
}

pub(crate) trait Finalize {
    fn meta(&self) -> &Meta;
    fn reset(&self) -> Result<(), Error>;
    fn finalize(&self, invocations: &[Invocation], terminal: &mut dyn Terminal)
        -> Result<(), Error>;
}

impl<T> Handle<T> {
    pub(crate) fn new(index: usize, meta: Rc<Meta>, state: Rc<RefCell<State<T>>>) -> Self {
        Self { index, meta, state }
    }

    /// Registration index of the option, used to key [`crate::Collector::push`].
    pub const fn index(&self) -> usize {
        self.index
    }

    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    pub fn try_get(&self) -> Result<Ref<'_, T>, Error> {
        let Ok(state) = self.state.try_borrow() else {
            return Err(Error::Uninitialized(self.meta.name()));
        };
        Ref::filter_map(state, |state| match state {
            State::Set(value) => Some(value),
            State::Unset => None,
        })
        .map_err(|_| Error::Uninitialized(self.meta.name()))
    }

    /// # Panics
    /// When the command has not finalized a parse pass yet.
    pub fn get(&self) -> Ref<'_, T> {
        match self.try_get() {
            Ok(value) => value,
            Err(error) => panic!("{error}"),
        }
    }

    pub fn is_set(&self) -> bool {
        self.try_get().is_ok()
    }
}

impl<T: Clone> Handle<T> {
    pub fn value(&self) -> Result<T, Error> {
        self.try_get().map(|value| value.clone())
    }
}

impl<A, E, V> Entry<A, E, V> {
    fn name(&self) -> Cow<'static, str> {
        self.meta.name()
    }

    fn resolve(&self, invocations: &[Invocation], terminal: &mut dyn Terminal) -> Result<A, Error> {
        let mut eaches = Vec::with_capacity(invocations.len());
        for invocation in invocations {
            if invocation.values.len() != self.meta.nargs().get() {
                return Err(Error::InvalidArity(
                    Some(invocation.name.clone()),
                    self.meta.nargs().get(),
                    invocation.values.len(),
                ));
            }
            let values = invocation
                .values
                .iter()
                .map(|token| (self.value)(invocation, &**token))
                .collect::<Result<Vec<_>, _>>()?;
            eaches.push((self.each)(values).map_err(|error| fill(error, invocation))?);
        }
        let mut context = Context::new(&self.meta).terminal(terminal);
        (self.all)(&mut context, eaches)
    }
}

impl<A, E, V> Finalize for Entry<A, E, V> {
    fn meta(&self) -> &Meta {
        &self.meta
    }

    fn reset(&self) -> Result<(), Error> {
        let mut state = self
            .state
            .try_borrow_mut()
            .map_err(|_| Error::InvalidParseState(self.name()))?;
        *state = State::Unset;
        Ok(())
    }

    fn finalize(
        &self,
        invocations: &[Invocation],
        terminal: &mut dyn Terminal,
    ) -> Result<(), Error> {
        let mut state = self
            .state
            .try_borrow_mut()
            .map_err(|_| Error::InvalidParseState(self.name()))?;
        if let State::Set(_) = *state {
            return Err(Error::InvalidParseState(self.name()));
        }
        trace!(option = %self.name(), occurrences = invocations.len(), "finalizing option");
        *state = State::Set(self.resolve(invocations, terminal)?);
        Ok(())
    }
}

fn fill(error: Error, invocation: &Invocation) -> Error {
    match error {
        Error::InvalidArity(None, expected, found) => {
            Error::InvalidArity(Some(invocation.name.clone()), expected, found)
        }
        error => error,
    }
}
