use std::any::Any;

use crate::invocation::Binding;

/// A parsed input value.
///
/// Values are dynamically typed: whatever a [`ValueParser`] produces is stored as-is, and the
/// caller re-asserts the concrete type at lookup time (see [`Invocation::get`]).
///
/// [`Invocation::get`]: crate::Invocation::get
pub type Value = Box<dyn Any + Send + Sync>;

/// The failure produced by a [`ValueParser`].
pub type ValueError = Box<dyn std::error::Error + Send + Sync>;

/// Any function that converts a raw input string into some [`Value`], or fails.
///
/// See [`parsers`](crate::parsers) for the provided parsers.
pub type ValueParser = Box<dyn Fn(&str) -> Result<Value, ValueError> + Send + Sync>;

/// Any function that renders a help message from the triggering [`Binding`] and the
/// [`CommandSchema`] it was encountered on.
///
/// Encountering an input bound to a `HelpGenerator` short-circuits parsing entirely;
/// see [`Outcome::Help`](crate::Outcome::Help).
pub type HelpGenerator = Box<dyn Fn(&Binding, &CommandSchema) -> String + Send + Sync>;

/// Any function that renders a version message from the triggering [`Binding`].
///
/// Propagates exactly like a [`HelpGenerator`].
pub type Versioner = Box<dyn Fn(&Binding) -> String + Send + Sync>;

/// The validated, immutable schema of one command (or subcommand).
///
/// A `CommandSchema` holds everything the parser must know to resolve an argument list: which
/// options exist and whether they take a value, which positional arguments or subcommands to
/// expect, and the usage texts that form the help message. For example, consider the argument
/// list `["-a", "b"]`. Is `-a` a boolean option and `b` a positional argument? Or is `b` the
/// value of the non-boolean option `-a`? The only way for the parser to know is to follow a
/// schema that states which one it is.
///
/// Produced exclusively by [`Command::build`](crate::Command::build) /
/// [`Command::try_build`](crate::Command::try_build); never mutated afterwards, so one schema
/// may serve any number of parse calls, concurrent or not.
pub struct CommandSchema {
    pub(crate) name: String,
    pub(crate) path: Vec<String>,
    pub(crate) blurb: String,
    pub(crate) overview: String,
    pub(crate) usage: Vec<String>,
    pub(crate) subcommand_optional: bool,
    pub(crate) opts: Vec<InputSchema>,
    pub(crate) args: Vec<InputSchema>,
    pub(crate) subcommands: Vec<CommandSchema>,
}

impl CommandSchema {
    /// The command's own name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The command names from the root down to (and including) this command.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// The one-line description.
    pub fn blurb(&self) -> &str {
        &self.blurb
    }

    /// The longer-form description, if any.
    pub fn overview(&self) -> &str {
        &self.overview
    }

    /// Custom usage lines, empty when the default usage line applies.
    pub fn usage(&self) -> &[String] {
        &self.usage
    }

    /// Whether parsing succeeds even when no subcommand argument is provided.
    pub fn subcommand_optional(&self) -> bool {
        self.subcommand_optional
    }

    /// The option inputs, in declaration order.
    pub fn opts(&self) -> &[InputSchema] {
        &self.opts
    }

    /// The positional argument inputs, in declaration order.
    pub fn args(&self) -> &[InputSchema] {
        &self.args
    }

    /// The subcommand schemas.
    pub fn subcommands(&self) -> &[CommandSchema] {
        &self.subcommands
    }

    pub(crate) fn path_display(&self) -> String {
        self.path.join(" ")
    }

    pub(crate) fn opt_by_short(&self, short: char) -> Option<&InputSchema> {
        self.opts.iter().find(|o| o.short == Some(short))
    }

    pub(crate) fn opt_by_long(&self, long: &str) -> Option<&InputSchema> {
        self.opts.iter().find(|o| o.long.as_deref() == Some(long))
    }

    pub(crate) fn subcommand_named(&self, name: &str) -> Option<&CommandSchema> {
        self.subcommands.iter().find(|s| s.name == name)
    }
}

impl std::fmt::Debug for CommandSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSchema")
            .field("path", &self.path)
            .field("opts", &self.opts)
            .field("args", &self.args)
            .field("subcommands", &self.subcommands)
            .finish_non_exhaustive()
    }
}

/// The validated schema of a single input: either an option or a positional argument.
///
/// The two are distinguished by whether a short/long option name is set; positional arguments
/// have neither.
pub struct InputSchema {
    pub(crate) id: String,
    pub(crate) short: Option<char>,
    pub(crate) long: Option<String>,
    pub(crate) blurb: String,
    pub(crate) env: Option<String>,
    pub(crate) boolean: bool,
    pub(crate) required: bool,
    pub(crate) default: Option<String>,
    pub(crate) value_name: Option<String>,
    pub(crate) parser: Option<ValueParser>,
    pub(crate) help_gen: Option<HelpGenerator>,
    pub(crate) versioner: Option<Versioner>,
}

impl InputSchema {
    /// The identifier used to look this input's values up on an
    /// [`Invocation`](crate::Invocation).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The single-character option name, if any.
    pub fn short(&self) -> Option<char> {
        self.short
    }

    /// The long option name, if any.
    pub fn long(&self) -> Option<&str> {
        self.long.as_deref()
    }

    /// The one-line description.
    pub fn blurb(&self) -> &str {
        &self.blurb
    }

    /// The environment variable this input also reads from, if any.
    pub fn env(&self) -> Option<&str> {
        self.env.as_deref()
    }

    /// Whether this is a boolean option: its mere presence means `true`, and it never consumes
    /// the next token as a value.
    pub fn is_boolean(&self) -> bool {
        self.boolean
    }

    /// Whether parsing fails when this input ends up with no value.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// The declared raw default value, if any.
    pub fn default(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// The display name for this input's value in help text.
    pub fn value_name(&self) -> Option<&str> {
        self.value_name.as_deref()
    }

    pub(crate) fn is_option(&self) -> bool {
        self.short.is_some() || self.long.is_some()
    }

    /// The preferred display form: the long name when present, the short name otherwise.
    pub(crate) fn display_name(&self) -> String {
        match (&self.long, self.short) {
            (Some(long), _) => format!("--{long}"),
            (None, Some(short)) => format!("-{short}"),
            (None, None) => self.id.clone(),
        }
    }

    /// The display form for positional arguments in error/help text.
    pub(crate) fn display_value_name(&self) -> &str {
        self.value_name.as_deref().unwrap_or(&self.id)
    }
}

impl std::fmt::Debug for InputSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputSchema")
            .field("id", &self.id)
            .field("short", &self.short)
            .field("long", &self.long)
            .field("boolean", &self.boolean)
            .field("required", &self.required)
            .finish_non_exhaustive()
    }
}
