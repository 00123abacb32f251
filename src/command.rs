use crate::{
    build::{AllStage, EachStage, ValueStage},
    case::Case,
    error::Error,
    meta::Meta,
    parse::Collector,
    prompt::{Console, Terminal},
    value::{Entry, Finalize, Handle, State},
};
use std::{
    borrow::Cow,
    cell::RefCell,
    collections::{hash_map::Entry as Slot, HashMap},
    process,
    rc::Rc,
};
use tracing::debug;

/// Registry of the options of one command and the trigger that resolves them.
///
/// Options register themselves through [`crate::Pipeline::bind`]. Every call to
/// [`Command::parse_with`] or [`Command::finalize`] is a new parse pass: all values are reset, then
/// every option is finalized exactly once, in registration order.
pub struct Command {
    pub(crate) name: Cow<'static, str>,
    pub(crate) case: Case,
    pub(crate) short: Cow<'static, str>,
    pub(crate) long: Cow<'static, str>,
    pub(crate) indices: HashMap<Cow<'static, str>, usize>,
    options: Vec<Box<dyn Finalize>>,
    terminal: Box<dyn Terminal>,
}

impl Command {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            case: Case::Kebab,
            short: Cow::Borrowed("-"),
            long: Cow::Borrowed("--"),
            indices: HashMap::new(),
            options: Vec::new(),
            terminal: Box::new(Console),
        }
    }

    /// Casing used to infer option names from binding identifiers.
    pub fn case(mut self, case: Case) -> Self {
        self.case = case;
        self
    }

    pub fn short(mut self, prefix: impl Into<Cow<'static, str>>) -> Self {
        self.short = prefix.into();
        self
    }

    pub fn long(mut self, prefix: impl Into<Cow<'static, str>>) -> Self {
        self.long = prefix.into();
        self
    }

    /// Replaces the console used to prompt for missing values.
    pub fn terminal(mut self, terminal: impl Terminal + 'static) -> Self {
        self.terminal = Box::new(terminal);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declarations of the registered options, in registration order.
    pub fn metas(&self) -> impl Iterator<Item = &Meta> {
        self.options.iter().map(|option| option.meta())
    }

    /// An empty collector with one slot per registered option.
    pub fn collector(&self) -> Collector {
        Collector::new(self.metas().map(Meta::nargs))
    }

    /// Parses `std::env::args()`.
    pub fn parse(&mut self) -> Result<(), Error> {
        self.parse_with(std::env::args().skip(1))
    }

    pub fn parse_with<A: Into<Cow<'static, str>>>(
        &mut self,
        arguments: impl IntoIterator<Item = A>,
    ) -> Result<(), Error> {
        let arguments: Vec<Cow<'static, str>> = arguments.into_iter().map(Into::into).collect();
        debug!(command = %self.name, arguments = arguments.len(), "parsing command line");
        self.reset()?;
        let collector = self.collect(arguments)?;
        self.finalize(&collector)
    }

    /// Runs every option's pipeline over its invocations in `collector`. If any option fails, every
    /// option is left unset.
    pub fn finalize(&mut self, collector: &Collector) -> Result<(), Error> {
        self.reset()?;
        if let Err(error) = self.resolve(collector) {
            self.reset()?;
            return Err(error);
        }
        debug!(command = %self.name, options = self.options.len(), "finalized options");
        Ok(())
    }

    fn resolve(&mut self, collector: &Collector) -> Result<(), Error> {
        let terminal = &mut *self.terminal;
        for (index, option) in self.options.iter().enumerate() {
            option.finalize(collector.invocations(index), terminal)?;
        }
        Ok(())
    }

    fn reset(&self) -> Result<(), Error> {
        self.options.iter().try_for_each(|option| option.reset())
    }

    pub(crate) fn meta(&self, index: usize) -> Result<&Meta, Error> {
        match self.options.get(index) {
            Some(option) => Ok(option.meta()),
            None => Err(Error::InvalidIndex(index)),
        }
    }

    pub(crate) fn infer(&self, meta: Meta, identifier: &str) -> Result<Meta, Error> {
        meta.bind(identifier, self.case, &self.short, &self.long)
    }

    pub(crate) fn register<A: 'static, E: 'static, V: 'static>(
        &mut self,
        meta: Meta,
        value: ValueStage<V>,
        each: EachStage<E, V>,
        all: AllStage<A, E>,
    ) -> Result<Handle<A>, Error> {
        let index = self.options.len();
        if let Some(name) = meta.names().iter().find(|name| self.indices.contains_key(*name)) {
            return Err(Error::DuplicateName(name.clone()));
        }
        for name in meta.names() {
            if let Slot::Vacant(slot) = self.indices.entry(name.clone()) {
                slot.insert(index);
            }
        }

        let meta = Rc::new(meta);
        let state = Rc::new(RefCell::new(State::Unset));
        self.options.push(Box::new(Entry {
            meta: meta.clone(),
            value,
            each,
            all,
            state: state.clone(),
        }));
        Ok(Handle::new(index, meta, state))
    }
}

/// Ends the process according to `result`: usage errors are reported with exit code 2, a cancelled
/// prompt prints `Aborted!` and exits with code 1.
pub fn exit<T>(result: Result<T, Error>) -> T {
    match result {
        Ok(value) => value,
        Err(Error::Aborted) => {
            eprintln!("{}", Error::Aborted);
            process::exit(Error::Aborted.code())
        }
        Err(error) => {
            eprintln!("Error: {error}");
            process::exit(error.code())
        }
    }
}
