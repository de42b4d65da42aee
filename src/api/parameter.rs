use crate::invocation::Binding;
use crate::model::{CommandSchema, InputSchema, Value, ValueError};

/// The builder for a single input: an option or a positional argument.
///
/// Inputs are declared through one of the three constructors ([`Input::option`],
/// [`Input::flag`], [`Input::argument`]) and refined through the chained methods, then handed
/// to [`Command::opt`](crate::Command::opt) or [`Command::arg`](crate::Command::arg).
pub struct Input {
    pub(crate) id: String,
    pub(crate) short: Option<char>,
    pub(crate) long: Option<String>,
    pub(crate) blurb: String,
    pub(crate) env: Option<String>,
    pub(crate) boolean: bool,
    pub(crate) required: bool,
    pub(crate) default: Option<String>,
    pub(crate) value_name: Option<String>,
    pub(crate) parser: Option<crate::model::ValueParser>,
    pub(crate) help_gen: Option<crate::model::HelpGenerator>,
    pub(crate) versioner: Option<crate::model::Versioner>,
}

impl Input {
    fn empty(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            short: None,
            long: None,
            blurb: String::default(),
            env: None,
            boolean: false,
            required: false,
            default: None,
            value_name: None,
            parser: None,
            help_gen: None,
            versioner: None,
        }
    }

    /// Create a non-boolean option with no parser, which means its values stay raw `String`s.
    ///
    /// If `id` is more than a single character, it becomes the option's long name. A
    /// single-character `id` becomes the short name instead. Either way, the names can be
    /// reshaped afterwards via [`Input::short`], [`Input::short_only`], and [`Input::long`].
    ///
    /// ### Example
    /// ```
    /// use argot::{Command, Input, Outcome};
    ///
    /// let schema = Command::new("program")
    ///     .opt(Input::option("level"))
    ///     .build();
    ///
    /// match schema.parse_tokens(&["--level", "warn"]) {
    ///     Outcome::Success(invocation) => {
    ///         assert_eq!(invocation.get::<String>("level"), "warn");
    ///     }
    ///     _ => unreachable!(),
    /// }
    /// ```
    pub fn option(id: impl Into<String>) -> Self {
        let mut input = Self::empty(id);
        let mut chars = input.id.chars();
        match (chars.next(), chars.next()) {
            (Some(short), None) => input.short = Some(short),
            _ => input.long = Some(input.id.clone()),
        }
        input
    }

    /// Create a boolean option.
    ///
    /// When no value is attached, the mere presence of the flag parses as `true`. An attached
    /// value (`--flag=..`) goes through the permissive boolean grammar of
    /// [`parsers::parse_bool`](crate::parsers::parse_bool). Naming follows [`Input::option`].
    pub fn flag(id: impl Into<String>) -> Self {
        let mut input = Self::option(id);
        input.boolean = true;
        input
    }

    /// Create a positional argument.
    ///
    /// Its display name in help and error text defaults to `id`; override with
    /// [`Input::value_name`].
    pub fn argument(id: impl Into<String>) -> Self {
        let mut input = Self::empty(id);
        input.value_name = Some(input.id.clone());
        input
    }

    /// Set this option's short name, keeping any long name.
    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    /// Set this option's short name and remove any long name it may have had.
    ///
    /// Use [`Input::long`] to add a long name back.
    pub fn short_only(mut self, short: char) -> Self {
        self.long = None;
        self.short(short)
    }

    /// Set this option's long name.
    pub fn long(mut self, long: impl Into<String>) -> Self {
        self.long = Some(long.into());
        self
    }

    /// Document the one-line description for this input.
    pub fn blurb(mut self, blurb: impl Into<String>) -> Self {
        self.blurb = blurb.into();
        self
    }

    /// Also read this input from the named environment variable.
    ///
    /// A set variable layers over the declared default and under any command line input; see
    /// [`Origin`](crate::Origin).
    pub fn env(mut self, var: impl Into<String>) -> Self {
        self.env = Some(var.into());
        self
    }

    /// Fail parsing when this input ends up with no value.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Declare a raw default value, coerced through the same path as any other source.
    pub fn default(mut self, raw: impl Into<String>) -> Self {
        self.default = Some(raw.into());
        self
    }

    /// Set the display name of this input's value in help text.
    ///
    /// For non-boolean options this is the option's value placeholder; for positional
    /// arguments it is the argument name itself.
    pub fn value_name(mut self, name: impl Into<String>) -> Self {
        self.value_name = Some(name.into());
        self
    }

    /// Convert this input's raw values with `parser` instead of keeping them as `String`s.
    ///
    /// See [`parsers`](crate::parsers) for the provided parsers.
    ///
    /// ### Example
    /// ```
    /// use argot::{parsers, Command, Input, Outcome};
    ///
    /// let schema = Command::new("program")
    ///     .opt(Input::option("limit").with_parser(parsers::parse_i64))
    ///     .build();
    ///
    /// match schema.parse_tokens(&["--limit", "25"]) {
    ///     Outcome::Success(invocation) => assert_eq!(invocation.get::<i64>("limit"), &25),
    ///     _ => unreachable!(),
    /// }
    /// ```
    pub fn with_parser<F>(mut self, parser: F) -> Self
    where
        F: Fn(&str) -> Result<Value, ValueError> + Send + Sync + 'static,
    {
        self.parser = Some(Box::new(parser));
        self
    }

    /// Turn this input into a help trigger.
    ///
    /// Encountering it during parsing short-circuits the entire parse, at any subcommand
    /// depth, and yields `generator`'s text as [`Outcome::Help`](crate::Outcome::Help).
    /// A command carrying a help trigger opts out of the synthesized `-h`/`--help` option.
    pub fn help_trigger<F>(mut self, generator: F) -> Self
    where
        F: Fn(&Binding, &CommandSchema) -> String + Send + Sync + 'static,
    {
        self.help_gen = Some(Box::new(generator));
        self
    }

    /// Turn this input into a version trigger, propagated exactly like a help trigger.
    pub fn version_trigger<F>(mut self, reporter: F) -> Self
    where
        F: Fn(&Binding) -> String + Send + Sync + 'static,
    {
        self.versioner = Some(Box::new(reporter));
        self
    }

    pub(crate) fn finish(self) -> InputSchema {
        let Input {
            id,
            short,
            long,
            blurb,
            env,
            boolean,
            required,
            default,
            value_name,
            parser,
            help_gen,
            versioner,
        } = self;

        InputSchema {
            id,
            short,
            long,
            blurb,
            env,
            boolean,
            required,
            default,
            value_name,
            parser,
            help_gen,
            versioner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_naming_by_id_length() {
        let long = Input::option("verbose").finish();
        assert_eq!(long.long(), Some("verbose"));
        assert_eq!(long.short(), None);

        let short = Input::option("v").finish();
        assert_eq!(short.long(), None);
        assert_eq!(short.short(), Some('v'));
    }

    #[test]
    fn short_only_removes_the_long_name() {
        let input = Input::option("verbose").short_only('v').finish();
        assert_eq!(input.long(), None);
        assert_eq!(input.short(), Some('v'));

        let restored = Input::option("verbose").short_only('v').long("loud").finish();
        assert_eq!(restored.long(), Some("loud"));
        assert_eq!(restored.short(), Some('v'));
    }

    #[test]
    fn argument_has_no_option_names() {
        let input = Input::argument("file").finish();
        assert!(!input.is_option());
        assert_eq!(input.value_name(), Some("file"));
    }

    #[test]
    fn flag_is_boolean() {
        let input = Input::flag("all").finish();
        assert!(input.is_boolean());
        assert!(!Input::option("all").finish().is_boolean());
    }
}
