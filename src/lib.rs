//! A declarative, schema-driven command line parser.
//!
//! # Input sources and precedence
//!
//! The parser always reads a program's command line arguments. Inputs can additionally be
//! read from environment variables or default values, in that order of precedence: when all
//! three are present for one input, all three are recorded, but the command line value layers
//! over the environment variable's, which layers over the default. The full layered sequence
//! stays observable through [`Invocation::all`], and every recorded value carries its
//! [`Origin`].
//!
//! # Command line syntax
//!
//! Command line arguments are classified as one of the following:
//! 1. Options: arguments that begin with `-` or `--` and may or may not require a value.
//! 2. Positional arguments: arguments identified by the order in which they appear among
//!    other positional arguments.
//! 3. Subcommands: a named argument that all following arguments belong to.
//!
//! Arguments parse as options until a positional argument, a subcommand, or a lone `--` is
//! encountered; options of a command must come before its positional arguments or
//! subcommands. Positional arguments and subcommands are mutually exclusive on one command,
//! since allowing both would make `command x` ambiguous. A command is therefore shaped like:
//!
//! ```text
//! command [options] [<required_args> [optional_args] [surplus...] | subcommand ...]
//! ```
//!
//! # Options
//!
//! Syntactically there are exactly two kinds of option:
//! 1. boolean: presence alone means something, like the `--all` in `ls --all`.
//! 2. non-boolean: a value must be attached, like the pattern in `ls --hide go.sum`. There is
//!    no such thing as an option whose value is optional.
//!
//! Options have a long form (`--opt`), provided one at a time, and a single-character short
//! form (`-o`), which may be stacked. Some common spellings:
//!
//! ```text
//! --opt       // long form boolean option "opt"
//! -o          // short form boolean option "o"
//! --opt=val   // long form non-boolean option with value "val"
//! --opt val   // same, the value provided as the next argument
//! -a -b       // two short form boolean options, "a" and "b"
//! -ab         // same as above, or the short option "a" with value "b" (the schema decides)
//! ```
//!
//! # Basic usage
//!
//! ```no_run
//! use argot::{parsers, Command, Input};
//!
//! let invocation = Command::new("example")
//!     .blurb("A full example program.")
//!     .opt(Input::flag("yes").short('y').blurb("Skip confirmation.").env("YES"))
//!     .opt(Input::option("retries").with_parser(parsers::parse_u64).default("3"))
//!     .subcommand(Command::new("nodat").blurb("Subcommand with no data."))
//!     .subcommand(
//!         Command::new("put")
//!             .blurb("Store a value at a key.")
//!             .arg(Input::argument("key").required())
//!             .arg(Input::argument("value").required()),
//!     )
//!     .build()
//!     .parse_or_exit();
//!
//! if let Some(put) = invocation.subcommand() {
//!     println!("{} = {}", put.get::<String>("key"), put.get::<String>("value"));
//! }
//! ```
#![deny(missing_docs)]
mod api;
mod constant;
mod help;
mod invocation;
mod model;
mod parser;
pub mod parsers;

pub use api::{Command, Input, SchemaError};
pub use help::{default_help, default_help_input, full_help, short_help, version_input};
pub use invocation::{Binding, Invocation, Origin};
pub use model::{
    CommandSchema, HelpGenerator, InputSchema, Value, ValueError, ValueParser, Versioner,
};
pub use parser::{Outcome, ParseError};

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
