use thiserror::Error;

use crate::api::Input;
use crate::help;
use crate::model::{CommandSchema, InputSchema};

/// A structural flaw in a schema, reported when the schema is built.
///
/// These represent programmer mistakes in schema authorship, not user input errors, which is
/// why [`Command::build`] turns them into panics. Use [`Command::try_build`] to receive them
/// as data instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// A command was declared with an empty name.
    #[error("empty command name")]
    EmptyCommandName,

    /// A command name contains whitespace.
    #[error("invalid command name '{0}': cannot contain whitespace")]
    CommandNameWhitespace(String),

    /// An input was declared with an empty id.
    #[error("command '{path}': inputs must have non-empty ids")]
    EmptyInputId {
        /// The declaring command's path.
        path: String,
    },

    /// An input without a short or long name was added as an option.
    #[error("command '{path}': option '{id}' must have either a short or long name")]
    OptionWithoutName {
        /// The declaring command's path.
        path: String,
        /// The offending input's id.
        id: String,
    },

    /// An input carrying an option name was added as a positional argument.
    #[error("command '{path}': positional argument '{id}' cannot have an option name")]
    PositionalWithName {
        /// The declaring command's path.
        path: String,
        /// The offending input's id.
        id: String,
    },

    /// A required positional argument was declared after an optional one.
    #[error("command '{path}': required positional argument '{id}' cannot come after an optional one")]
    RequiredAfterOptional {
        /// The declaring command's path.
        path: String,
        /// The offending input's id.
        id: String,
    },

    /// Two inputs of one command share an id.
    #[error("command '{path}' contains inputs with duplicate id '{id}'")]
    DuplicateId {
        /// The declaring command's path.
        path: String,
        /// The duplicated id.
        id: String,
    },

    /// Two options of one command share a short name.
    #[error("command '{path}' contains options with duplicate short name '{short}'")]
    DuplicateShortName {
        /// The declaring command's path.
        path: String,
        /// The duplicated short name.
        short: char,
    },

    /// Two options of one command share a long name.
    #[error("command '{path}' contains options with duplicate long name '{long}'")]
    DuplicateLongName {
        /// The declaring command's path.
        path: String,
        /// The duplicated long name.
        long: String,
    },

    /// Two sibling subcommands share a name.
    #[error("command '{path}' contains subcommands with duplicate name '{name}'")]
    DuplicateSubcommand {
        /// The declaring command's path.
        path: String,
        /// The duplicated subcommand name.
        name: String,
    },

    /// A command declared both positional arguments and subcommands.
    #[error("command '{path}' cannot have both positional arguments and subcommands")]
    MixedArgsAndSubcommands {
        /// The declaring command's path.
        path: String,
    },
}

/// The builder for a command schema.
///
/// A `Command` is assembled through chained calls and frozen with [`Command::build`] (or the
/// fallible [`Command::try_build`]), which runs the one-time validation pass and produces the
/// immutable [`CommandSchema`] the parser consumes. Builder calls themselves never validate:
/// every structural rule is checked at build time, so a malformed schema surfaces when it is
/// built, not at first parse.
///
/// ### Example
/// ```
/// use argot::{Command, Input, Outcome};
///
/// let schema = Command::new("example")
///     .blurb("A full example program.")
///     .opt(Input::flag("yes").short('y').blurb("A boolean option.").env("YES"))
///     .opt(Input::option("str").short('s').blurb("A string option."))
///     .subcommand(Command::new("nodat").blurb("Subcommand with no data."))
///     .subcommand(
///         Command::new("run")
///             .blurb("Run with a target.")
///             .opt(Input::option("target").required()),
///     )
///     .build();
///
/// match schema.parse_tokens(&["-y", "run", "--target", "all"]) {
///     Outcome::Success(invocation) => {
///         assert_eq!(invocation.get::<bool>("yes"), &true);
///         let run = invocation.subcommand().unwrap();
///         assert_eq!(run.get::<String>("target"), "all");
///     }
///     _ => unreachable!(),
/// }
/// ```
pub struct Command {
    name: String,
    blurb: String,
    overview: String,
    usage: Vec<String>,
    subcommand_optional: bool,
    opts: Vec<Input>,
    args: Vec<Input>,
    subcommands: Vec<Command>,
}

impl Command {
    /// Create a command builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            blurb: String::default(),
            overview: String::default(),
            usage: Vec::default(),
            subcommand_optional: false,
            opts: Vec::default(),
            args: Vec::default(),
            subcommands: Vec::default(),
        }
    }

    /// Document the one-line description for this command.
    pub fn blurb(mut self, blurb: impl Into<String>) -> Self {
        self.blurb = blurb.into();
        self
    }

    /// Add an "overview" section to this command's help message.
    ///
    /// This is typically for longer-form content that wouldn't fit well within the 1-2
    /// sentence blurb.
    pub fn overview(mut self, overview: impl Into<String>) -> Self {
        self.overview = overview.into();
        self
    }

    /// Append a custom usage line, overriding the default one in the help message.
    ///
    /// Usage lines are intended to show some different ways to invoke this command using
    /// whatever combinations of options, arguments, and subcommands.
    pub fn usage(mut self, line: impl Into<String>) -> Self {
        self.usage.push(line.into());
        self
    }

    /// Add an option.
    ///
    /// The declaration order of options never affects parsing; it decides the order of their
    /// layered default/environment seeding.
    pub fn opt(mut self, option: Input) -> Self {
        self.opts.push(option);
        self
    }

    /// Add a positional argument.
    ///
    /// Positional arguments fill in declaration order, and required ones must be declared
    /// before optional ones. A command takes either positional arguments or subcommands,
    /// never both.
    ///
    /// ### Example
    /// ```
    /// use argot::{Command, Input, Outcome};
    ///
    /// let schema = Command::new("copy")
    ///     .arg(Input::argument("source").required())
    ///     .arg(Input::argument("destination"))
    ///     .build();
    ///
    /// match schema.parse_tokens(&["a.txt", "b.txt", "leftover"]) {
    ///     Outcome::Success(invocation) => {
    ///         assert_eq!(invocation.get::<String>("source"), "a.txt");
    ///         assert_eq!(invocation.get::<String>("destination"), "b.txt");
    ///         assert_eq!(invocation.surplus(), &["leftover".to_string()]);
    ///     }
    ///     _ => unreachable!(),
    /// }
    /// ```
    pub fn arg(mut self, argument: Input) -> Self {
        self.args.push(argument);
        self
    }

    /// Add a subcommand.
    ///
    /// During parsing, the first token after this command's options selects a subcommand by
    /// exact name; everything after it belongs to the subcommand.
    pub fn subcommand(mut self, subcommand: Command) -> Self {
        self.subcommands.push(subcommand);
        self
    }

    /// Allow parsing to succeed when no subcommand argument is provided at all.
    ///
    /// Without this, a command with subcommands reports
    /// [`ParseError::NoSubcommand`](crate::ParseError::NoSubcommand) when the argument list
    /// ends before naming one.
    pub fn subcommand_optional(mut self) -> Self {
        self.subcommand_optional = true;
        self
    }

    /// Build the schema, returning any structural flaw as data.
    ///
    /// Runs the full validation pass over this command and every subcommand: non-empty,
    /// whitespace-free command names; unique input ids; unique option short/long names; unique
    /// subcommand names; no mixing of positional arguments and subcommands; required
    /// positional arguments before optional ones. Commands without a help trigger get the
    /// standard `-h`/`--help` option appended before these checks run.
    ///
    /// Building consumes the builder, so a schema tree is validated exactly once.
    pub fn try_build(self) -> Result<CommandSchema, SchemaError> {
        self.freeze(Vec::default())
    }

    /// Build the schema.
    ///
    /// # Panics
    /// Panics on any structural flaw [`Command::try_build`] would report; schema errors are
    /// authoring bugs, detectable the first time the program runs.
    pub fn build(self) -> CommandSchema {
        match self.try_build() {
            Ok(schema) => schema,
            Err(error) => panic!("{error}"),
        }
    }

    fn freeze(self, ancestors: Vec<String>) -> Result<CommandSchema, SchemaError> {
        if self.name.is_empty() {
            return Err(SchemaError::EmptyCommandName);
        }
        if self.name.contains(char::is_whitespace) {
            return Err(SchemaError::CommandNameWhitespace(self.name));
        }

        let mut path = ancestors;
        path.push(self.name.clone());
        let at = path.join(" ");

        let mut opts: Vec<InputSchema> = self.opts.into_iter().map(Input::finish).collect();
        let args: Vec<InputSchema> = self.args.into_iter().map(Input::finish).collect();

        if !opts.iter().any(|o| o.help_gen.is_some()) {
            opts.push(help::default_help_input().finish());
        }

        for opt in &opts {
            if opt.id.is_empty() {
                return Err(SchemaError::EmptyInputId { path: at.clone() });
            }
            if !opt.is_option() {
                return Err(SchemaError::OptionWithoutName {
                    path: at.clone(),
                    id: opt.id.clone(),
                });
            }
        }

        let mut seen_optional = false;
        for arg in &args {
            if arg.id.is_empty() {
                return Err(SchemaError::EmptyInputId { path: at.clone() });
            }
            if arg.is_option() {
                return Err(SchemaError::PositionalWithName {
                    path: at.clone(),
                    id: arg.id.clone(),
                });
            }
            if arg.required && seen_optional {
                return Err(SchemaError::RequiredAfterOptional {
                    path: at.clone(),
                    id: arg.id.clone(),
                });
            }
            seen_optional |= !arg.required;
        }

        if !args.is_empty() && !self.subcommands.is_empty() {
            return Err(SchemaError::MixedArgsAndSubcommands { path: at.clone() });
        }

        check_duplicates(&at, &opts, &args)?;

        for i in 0..self.subcommands.len() {
            for z in (i + 1)..self.subcommands.len() {
                if self.subcommands[i].name == self.subcommands[z].name {
                    return Err(SchemaError::DuplicateSubcommand {
                        path: at.clone(),
                        name: self.subcommands[z].name.clone(),
                    });
                }
            }
        }

        let subcommands = self
            .subcommands
            .into_iter()
            .map(|subcommand| subcommand.freeze(path.clone()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CommandSchema {
            name: self.name,
            path,
            blurb: self.blurb,
            overview: self.overview,
            usage: self.usage,
            subcommand_optional: self.subcommand_optional,
            opts,
            args,
            subcommands,
        })
    }
}

fn check_duplicates(at: &str, opts: &[InputSchema], args: &[InputSchema]) -> Result<(), SchemaError> {
    let ids: Vec<&InputSchema> = opts.iter().chain(args).collect();

    for i in 0..ids.len() {
        for z in (i + 1)..ids.len() {
            if ids[i].id == ids[z].id {
                return Err(SchemaError::DuplicateId {
                    path: at.to_string(),
                    id: ids[z].id.clone(),
                });
            }
        }
    }

    for i in 0..opts.len() {
        for z in (i + 1)..opts.len() {
            if let Some(short) = opts[i].short {
                if opts[z].short == Some(short) {
                    return Err(SchemaError::DuplicateShortName {
                        path: at.to_string(),
                        short,
                    });
                }
            }
            if let (Some(first), Some(second)) = (&opts[i].long, &opts[z].long) {
                if first == second {
                    return Err(SchemaError::DuplicateLongName {
                        path: at.to_string(),
                        long: second.clone(),
                    });
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constant::{HELP_ID, HELP_SHORT};

    #[test]
    fn build_assigns_paths() {
        let schema = Command::new("root")
            .subcommand(Command::new("nested").subcommand(Command::new("leaf")))
            .build();

        assert_eq!(schema.path(), &["root".to_string()]);
        let nested = &schema.subcommands()[0];
        assert_eq!(nested.path(), &["root".to_string(), "nested".to_string()]);
        let leaf = &nested.subcommands()[0];
        assert_eq!(
            leaf.path(),
            &["root".to_string(), "nested".to_string(), "leaf".to_string()]
        );
    }

    #[test]
    fn build_synthesizes_the_help_option_once() {
        let schema = Command::new("program")
            .opt(Input::flag("verbose").short('v'))
            .build();

        let help: Vec<_> = schema.opts().iter().filter(|o| o.id() == HELP_ID).collect();
        assert_eq!(help.len(), 1);
        assert_eq!(help[0].short(), Some(HELP_SHORT));
        assert_eq!(help[0].long(), Some("help"));
        assert!(help[0].is_boolean());
    }

    #[test]
    fn custom_help_trigger_suppresses_synthesis() {
        let schema = Command::new("program")
            .opt(Input::flag("assist").help_trigger(|_, _| "assistance".to_string()))
            .build();

        assert!(!schema.opts().iter().any(|o| o.id() == HELP_ID));
    }

    #[test]
    fn empty_command_name() {
        let result = Command::new("").try_build();
        assert_eq!(result.unwrap_err(), SchemaError::EmptyCommandName);
    }

    #[test]
    fn whitespace_command_name() {
        let result = Command::new("two words").try_build();
        assert_eq!(
            result.unwrap_err(),
            SchemaError::CommandNameWhitespace("two words".to_string())
        );
    }

    #[test]
    fn duplicate_input_id() {
        let result = Command::new("program")
            .opt(Input::option("value"))
            .arg(Input::argument("value"))
            .try_build();

        assert_eq!(
            result.unwrap_err(),
            SchemaError::DuplicateId {
                path: "program".to_string(),
                id: "value".to_string(),
            }
        );
    }

    #[test]
    fn duplicate_short_name() {
        let result = Command::new("program")
            .opt(Input::option("first").short('x'))
            .opt(Input::option("second").short('x'))
            .try_build();

        assert_eq!(
            result.unwrap_err(),
            SchemaError::DuplicateShortName {
                path: "program".to_string(),
                short: 'x',
            }
        );
    }

    #[test]
    fn duplicate_long_name() {
        let result = Command::new("program")
            .opt(Input::option("first").long("same"))
            .opt(Input::option("second").long("same"))
            .try_build();

        assert_eq!(
            result.unwrap_err(),
            SchemaError::DuplicateLongName {
                path: "program".to_string(),
                long: "same".to_string(),
            }
        );
    }

    #[test]
    fn duplicate_id_against_the_synthesized_help() {
        // No custom help trigger, so '-h, --help' is appended and collides.
        let result = Command::new("program").opt(Input::flag("help")).try_build();

        assert_eq!(
            result.unwrap_err(),
            SchemaError::DuplicateId {
                path: "program".to_string(),
                id: "help".to_string(),
            }
        );
    }

    #[test]
    fn duplicate_subcommand_name() {
        let result = Command::new("program")
            .subcommand(Command::new("run"))
            .subcommand(Command::new("run"))
            .try_build();

        assert_eq!(
            result.unwrap_err(),
            SchemaError::DuplicateSubcommand {
                path: "program".to_string(),
                name: "run".to_string(),
            }
        );
    }

    #[test]
    fn mixing_args_and_subcommands() {
        let result = Command::new("program")
            .arg(Input::argument("file"))
            .subcommand(Command::new("run"))
            .try_build();

        assert_eq!(
            result.unwrap_err(),
            SchemaError::MixedArgsAndSubcommands {
                path: "program".to_string(),
            }
        );
    }

    #[test]
    fn required_argument_after_optional() {
        let result = Command::new("program")
            .arg(Input::argument("first"))
            .arg(Input::argument("second").required())
            .try_build();

        assert_eq!(
            result.unwrap_err(),
            SchemaError::RequiredAfterOptional {
                path: "program".to_string(),
                id: "second".to_string(),
            }
        );
    }

    #[test]
    fn option_without_a_name() {
        let result = Command::new("program")
            .opt(Input::argument("anonymous"))
            .try_build();

        assert_eq!(
            result.unwrap_err(),
            SchemaError::OptionWithoutName {
                path: "program".to_string(),
                id: "anonymous".to_string(),
            }
        );
    }

    #[test]
    fn positional_with_an_option_name() {
        let result = Command::new("program")
            .arg(Input::option("value"))
            .try_build();

        assert_eq!(
            result.unwrap_err(),
            SchemaError::PositionalWithName {
                path: "program".to_string(),
                id: "value".to_string(),
            }
        );
    }

    #[test]
    fn empty_input_id() {
        let result = Command::new("program").opt(Input::option("")).try_build();
        assert_eq!(
            result.unwrap_err(),
            SchemaError::EmptyInputId {
                path: "program".to_string(),
            }
        );
    }

    #[test]
    fn subcommand_flaws_surface_with_their_own_path() {
        let result = Command::new("root")
            .subcommand(
                Command::new("nested")
                    .opt(Input::option("x").short('x'))
                    .opt(Input::option("y").short('x')),
            )
            .try_build();

        assert_eq!(
            result.unwrap_err(),
            SchemaError::DuplicateShortName {
                path: "root nested".to_string(),
                short: 'x',
            }
        );
    }

    #[test]
    #[should_panic(expected = "duplicate short name 'x'")]
    fn build_panics_on_a_schema_error() {
        Command::new("program")
            .opt(Input::option("first").short('x'))
            .opt(Input::option("second").short('x'))
            .build();
    }
}
