use terminal_size::{terminal_size, Width};

use crate::api::Input;
use crate::constant::*;
use crate::invocation::{Binding, Origin};
use crate::model::{CommandSchema, InputSchema};

/// The standard help option: `-h`/`--help`, bound to [`default_help`].
///
/// Appended automatically to every command without a help trigger of its own; only useful
/// directly when the standard names need to be combined with a custom
/// [`help_trigger`](Input::help_trigger).
pub fn default_help_input() -> Input {
    Input::flag(HELP_ID)
        .short(HELP_SHORT)
        .blurb("Show this help message and exit.")
        .help_trigger(default_help)
}

/// A `--version` option reporting the given version string.
///
/// ### Example
/// ```
/// use argot::{version_input, Command, Outcome};
///
/// let schema = Command::new("program")
///     .opt(version_input("1.2.3"))
///     .build();
///
/// match schema.parse_tokens(&["--version"]) {
///     Outcome::Help(message) => assert_eq!(message, "1.2.3\n"),
///     _ => unreachable!(),
/// }
/// ```
pub fn version_input(version: impl Into<String>) -> Input {
    let version = version.into();
    Input::flag("version")
        .blurb("Print the version and exit.")
        .version_trigger(move |_| format!("{version}\n"))
}

/// The standard help generator: the condensed [`short_help`] when triggered through a
/// single-character option spelling, the expanded [`full_help`] otherwise.
pub fn default_help(binding: &Binding, schema: &CommandSchema) -> String {
    match binding.origin() {
        Origin::Option(name) if name.chars().count() == 1 => short_help(schema),
        _ => full_help(schema),
    }
}

fn text_width() -> usize {
    match terminal_size() {
        Some((Width(width), _)) => std::cmp::min(HELP_TEXT_WIDTH, width as usize),
        None => HELP_TEXT_WIDTH,
    }
}

fn usage_section(schema: &CommandSchema, u: &mut String) {
    u.push_str("\n\nusage:\n");
    if schema.usage.is_empty() {
        u.push_str("  ");
        u.push_str(&schema.name);
        u.push_str(" [options]");
        if !schema.args.is_empty() {
            u.push_str(" [arguments]");
        } else if !schema.subcommands.is_empty() {
            u.push_str(" <command>");
        }
        u.push('\n');
    } else {
        for line in &schema.usage {
            u.push_str("  ");
            u.push_str(line);
            u.push('\n');
        }
    }
}

fn commands_section(schema: &CommandSchema, u: &mut String) {
    if schema.subcommands.is_empty() {
        return;
    }

    let name_width = schema
        .subcommands
        .iter()
        .map(|s| s.name.len())
        .max()
        .unwrap_or(0);
    u.push_str("\ncommands:\n");
    for subcommand in &schema.subcommands {
        u.push_str(&format!(
            "   {name:<name_width$}   {blurb}\n",
            name = subcommand.name,
            blurb = subcommand.blurb,
        ));
    }
}

fn sorted_opts(schema: &CommandSchema) -> Vec<&InputSchema> {
    let mut opts: Vec<&InputSchema> = schema.opts.iter().collect();
    opts.sort_by_key(|o| sort_name(o));
    opts
}

fn sort_name(option: &InputSchema) -> String {
    match (&option.long, option.short) {
        (Some(long), _) => long.clone(),
        (None, Some(short)) => short.to_string(),
        (None, None) => option.id.clone(),
    }
}

/// The placeholder for a non-boolean option's value, e.g. the `<arg>` in `--file  <arg>`.
fn value_placeholder(option: &InputSchema) -> Option<String> {
    if option.boolean {
        return None;
    }
    match &option.value_name {
        Some(name) => Some(format!("<{name}>")),
        None => Some("<arg>".to_string()),
    }
}

/// Names and placeholder with the short column left-padded, so long names line up whether or
/// not a short name exists: `-s, --long  <arg>` / `    --other  <arg>`.
fn left_padded_names(option: &InputSchema) -> String {
    let mut s = String::new();
    match option.short {
        Some(short) => {
            s.push('-');
            s.push(short);
        }
        None => s.push_str("   "),
    }

    if let Some(long) = &option.long {
        if option.short.is_some() {
            s.push_str(", ");
        } else {
            s.push(' ');
        }
        s.push_str("--");
        s.push_str(long);
    }

    if let Some(placeholder) = value_placeholder(option) {
        s.push_str("  ");
        s.push_str(&placeholder);
    }
    s
}

/// Names and placeholder without padding, for the non-condensed layouts.
fn plain_names(option: &InputSchema) -> String {
    let mut s = String::new();
    if let Some(short) = option.short {
        s.push('-');
        s.push(short);
    }
    if let Some(long) = &option.long {
        if option.short.is_some() {
            s.push_str(", ");
        }
        s.push_str("--");
        s.push_str(long);
    }
    if let Some(placeholder) = value_placeholder(option) {
        s.push_str("  ");
        s.push_str(&placeholder);
    }
    s
}

fn annotated_blurb(input: &InputSchema) -> String {
    let mut desc = input.blurb.clone();
    if input.required {
        desc.push_str(" (required)");
    }
    if let Some(default) = &input.default {
        desc.push_str(&format!(" (default: {default})"));
    }
    if let Some(env) = &input.env {
        desc.push_str(&format!(" [${env}]"));
    }
    desc
}

/// The condensed help message: one line per option/argument where the names fit the
/// [`MAX_CONDENSED_NAME_WIDTH`] column, a stacked layout otherwise.
pub fn short_help(schema: &CommandSchema) -> String {
    let width = text_width();
    let mut u = String::new();

    u.push_str(&schema.path_display());
    u.push_str(" - ");
    u.push_str(&schema.blurb);

    usage_section(schema, &mut u);

    u.push_str("\noptions:\n");
    let opts = sorted_opts(schema);
    let padded: Vec<String> = opts.iter().map(|o| left_padded_names(o)).collect();
    let name_width = padded.iter().map(String::len).max().unwrap_or(0);

    // When the name column would be wider than the threshold, stack names over descriptions
    // instead of cramming the descriptions off to the right.
    if name_width > MAX_CONDENSED_NAME_WIDTH {
        for option in &opts {
            u.push_str("  ");
            u.push_str(&plain_names(option));
            u.push('\n');
            u.push_str("      ");
            u.push_str(&wrap_blurb(&annotated_blurb(option), 6, width));
            u.push('\n');
        }
    } else {
        for (option, names) in opts.iter().zip(&padded) {
            let lead = format!("  {names:<name_width$}   ");
            let indent = lead.len();
            u.push_str(&lead);
            u.push_str(&wrap_blurb(&annotated_blurb(option), indent, width));
            u.push('\n');
        }
    }

    if !schema.args.is_empty() {
        u.push_str("\narguments:\n");

        let mut name_width = 0;
        for argument in &schema.args {
            let len = argument.display_value_name().len();
            if len > name_width && len <= MAX_CONDENSED_NAME_WIDTH {
                name_width = len;
            }
        }
        name_width += 2;

        for argument in &schema.args {
            let name = if argument.required {
                format!("<{}>", argument.display_value_name())
            } else {
                format!("[{}]", argument.display_value_name())
            };
            let lead = format!("  {name:<name_width$}");
            u.push_str(&lead);
            if lead.len() > MAX_CONDENSED_NAME_WIDTH {
                u.push('\n');
                u.push_str(&" ".repeat(name_width + 5));
            } else {
                u.push_str("   ");
            }
            u.push_str(&wrap_blurb(&annotated_blurb(argument), lead.len() + 3, width));
            u.push('\n');
        }
    }

    commands_section(schema, &mut u);

    u
}

/// The expanded help message: the overview section plus one block per option/argument with
/// `[default: ..]` and `[env: ..]` annotations.
pub fn full_help(schema: &CommandSchema) -> String {
    let width = text_width();
    let mut u = String::new();

    u.push_str(&schema.path_display());
    u.push_str(" - ");
    u.push_str(&schema.blurb);

    if !schema.overview.is_empty() {
        u.push_str("\n\noverview:\n  ");
        u.push_str(&wrap_blurb(&schema.overview, 2, width));
    }

    usage_section(schema, &mut u);

    u.push_str("\noptions:\n");
    let opts = sorted_opts(schema);
    for (i, option) in opts.iter().enumerate() {
        let mut extra = String::new();
        if let Some(default) = &option.default {
            extra.push_str(&format!("\n      [default: {default}]"));
        }
        if let Some(env) = &option.env {
            extra.push_str(&format!("\n      [env: {env}]"));
        }

        u.push_str("  ");
        u.push_str(&plain_names(option));
        if option.required {
            u.push_str("   (required)");
        }
        if !option.blurb.is_empty() {
            u.push_str("\n      ");
            u.push_str(&wrap_blurb(&option.blurb, 6, width));
        }
        if !extra.is_empty() {
            u.push('\n');
            u.push_str(&extra);
        }
        if i < opts.len() - 1 {
            u.push('\n');
        }
        u.push('\n');
    }

    if !schema.args.is_empty() {
        u.push_str("\narguments:\n");
        for (i, argument) in schema.args.iter().enumerate() {
            let mut extra = String::new();
            if let Some(default) = &argument.default {
                extra.push_str(&format!("\n      [default: {default}]"));
            }
            if let Some(env) = &argument.env {
                extra.push_str(&format!("\n      [env: {env}]"));
            }

            let name = if argument.required {
                format!("<{}>", argument.display_value_name())
            } else {
                format!("[{}]", argument.display_value_name())
            };
            u.push_str("  ");
            u.push_str(&name);
            if argument.required {
                u.push_str("   (required)");
            }
            u.push_str("\n      ");
            u.push_str(&wrap_blurb(&argument.blurb, 6, width));
            if !extra.is_empty() {
                u.push('\n');
                u.push_str(&extra);
            }
            if i < schema.args.len() - 1 {
                u.push('\n');
            }
            u.push('\n');
        }
    }

    commands_section(schema, &mut u);

    u
}

/// Word-wrap `text` to `width` columns with continuation lines indented by `indent`; the
/// first line carries no indent (it continues the caller's current column).
fn wrap_blurb(text: &str, indent: usize, width: usize) -> String {
    let wrapped = wrap_text(text, indent, width);
    wrapped[indent.min(wrapped.len())..].to_string()
}

fn wrap_text(text: &str, indent: usize, width: usize) -> String {
    let pad = " ".repeat(indent);
    let mut result = String::with_capacity(text.len());
    let mut line = pad.clone();
    let mut word = String::new();

    for c in text.trim().chars() {
        if !c.is_whitespace() {
            word.push(c);
            continue;
        }
        if c == '\n' {
            line.push_str(&word);
            word.clear();
            result.push_str(line.trim_end());
            result.push('\n');
            line = pad.clone();
            continue;
        }
        if line.len() + word.len() > width {
            result.push_str(line.trim_end());
            result.push('\n');
            line = pad.clone();
        }
        line.push_str(&word);
        word.clear();
        line.push(c);
    }

    if !word.is_empty() {
        if line.len() + word.len() > width {
            result.push_str(line.trim_end());
            result.push('\n');
            line = pad.clone();
        }
        line.push_str(&word);
    }
    if !line.is_empty() {
        result.push_str(&line);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Command;
    use crate::test::assert_contains;

    fn example() -> CommandSchema {
        Command::new("program")
            .blurb("An example program.")
            .opt(Input::flag("verbose").short('v').blurb("Say more."))
            .opt(
                Input::option("level")
                    .short('l')
                    .blurb("The log level.")
                    .env("LEVEL")
                    .default("info"),
            )
            .subcommand(Command::new("run").blurb("Run it."))
            .build()
    }

    #[test]
    fn short_help_layout() {
        let message = short_help(&example());

        assert_contains!(message, "program - An example program.");
        assert_contains!(message, "usage:\n  program [options] <command>");
        assert_contains!(message, "-h, --help");
        assert_contains!(message, "-v, --verbose");
        assert_contains!(
            message,
            "-l, --level  <arg>   The log level. (default: info) [$LEVEL]"
        );
        assert_contains!(message, "commands:\n   run   Run it.");
    }

    #[test]
    fn short_help_sorts_options_by_display_name() {
        let message = short_help(&example());

        let help = message.find("--help").unwrap();
        let level = message.find("--level").unwrap();
        let verbose = message.find("--verbose").unwrap();
        assert!(help < level && level < verbose);
    }

    #[test]
    fn short_help_stacks_wide_option_names() {
        let schema = Command::new("program")
            .opt(
                Input::option("considerably-long-name")
                    .blurb("Wide.")
                    .value_name("wide-value"),
            )
            .build();

        let message = short_help(&schema);

        // Names wider than the condensed column push descriptions onto their own line.
        assert_contains!(message, "  --considerably-long-name  <wide-value>\n      Wide.");
    }

    #[test]
    fn short_help_marks_required_arguments() {
        let schema = Command::new("program")
            .blurb("Files.")
            .arg(Input::argument("source").required().blurb("Where from."))
            .arg(Input::argument("destination").blurb("Where to."))
            .build();

        let message = short_help(&schema);

        assert_contains!(message, "<source>");
        assert_contains!(message, "[destination]");
    }

    #[test]
    fn full_help_layout() {
        let schema = Command::new("program")
            .blurb("An example program.")
            .overview("A longer story about the program.")
            .opt(
                Input::option("level")
                    .short('l')
                    .blurb("The log level.")
                    .env("LEVEL")
                    .default("info"),
            )
            .build();

        let message = full_help(&schema);

        assert_contains!(message, "overview:\n  A longer story about the program.");
        assert_contains!(message, "-l, --level  <arg>");
        assert_contains!(message, "      The log level.");
        assert_contains!(message, "      [default: info]");
        assert_contains!(message, "      [env: LEVEL]");
    }

    #[test]
    fn full_help_marks_required_options() {
        let schema = Command::new("program")
            .opt(Input::option("target").required().blurb("The target."))
            .build();

        let message = full_help(&schema);

        assert_contains!(message, "  --target  <arg>   (required)");
    }

    #[test]
    fn custom_usage_lines_replace_the_default() {
        let schema = Command::new("program")
            .usage("program [-v] <file>")
            .usage("program --version")
            .build();

        let message = short_help(&schema);

        assert_contains!(message, "usage:\n  program [-v] <file>\n  program --version");
        assert!(!message.contains("[options]"));
    }

    #[test]
    fn default_help_picks_the_layout_by_trigger_spelling() {
        let schema = example();
        let from_short = Binding::new(
            "help",
            Box::new(true),
            "",
            Origin::Option("h".to_string()),
        );
        let from_long = Binding::new(
            "help",
            Box::new(true),
            "",
            Origin::Option("help".to_string()),
        );

        assert_eq!(default_help(&from_short, &schema), short_help(&schema));
        assert_eq!(default_help(&from_long, &schema), full_help(&schema));
    }

    #[test]
    fn wrap_breaks_on_word_boundaries() {
        let wrapped = wrap_blurb("one two three four five", 2, 12);

        assert_eq!(wrapped, "one two\n  three four\n  five");
    }

    #[test]
    fn wrap_preserves_explicit_newlines() {
        let wrapped = wrap_blurb("first\nsecond", 2, 40);

        assert_eq!(wrapped, "first\n  second");
    }
}
