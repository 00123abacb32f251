mod build;
mod case;
mod command;
mod error;
mod meta;
mod parse;
mod prompt;
mod spell;
mod utility;
mod value;

pub use crate::{
    build::{option, Pipeline, Raw, Validated},
    case::Case,
    command::{exit, Command},
    error::Error,
    meta::Meta,
    parse::{Collector, Context, Invocation},
    prompt::{Console, Prompt, Terminal},
    value::Handle,
};

/*
    TODO:
    - Flag options (nargs = 0) with on/off secondary names such as '--shallow/--deep'.
    - Fall back to an environment variable before prompting.
    - Combined short flags once flags exist (ex: -lart).
*/
