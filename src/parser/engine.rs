use std::env;

use thiserror::Error;

use crate::invocation::{Invocation, Origin};
use crate::model::{CommandSchema, InputSchema, ValueError};
use crate::parser::coerce::coerce;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// A user input mistake detected while parsing.
///
/// Every variant carries the data a caller needs to branch on the failure; the rendered
/// message always leads with the path of the command level that detected it.
#[derive(Debug, Error)]
pub enum ParseError {
    /// An option token matched no option of the current command.
    #[error("{path}: unknown option '{name}'")]
    UnknownOption {
        /// The detecting command's path.
        path: String,
        /// The offending token as typed (`-x` for a character dropped from a cluster).
        name: String,
    },

    /// A non-boolean option ran out of tokens before finding its value.
    #[error("{path}: option '{name}' requires a value")]
    MissingOptionValue {
        /// The detecting command's path.
        path: String,
        /// The option name as typed, without hyphens.
        name: String,
    },

    /// One or more required options were never provided.
    #[error("{path}: missing the following required options: {}", .names.join(", "))]
    MissingOptions {
        /// The detecting command's path.
        path: String,
        /// Display names of the missing options, long form preferred.
        names: Vec<String>,
    },

    /// One or more required positional arguments were never provided.
    #[error("{path}: missing the following required arguments: {}", .names.join(", "))]
    MissingArguments {
        /// The detecting command's path.
        path: String,
        /// Display names of the missing arguments.
        names: Vec<String>,
    },

    /// The token expected to name a subcommand matched none declared.
    #[error("{path}: unknown subcommand '{name}'")]
    UnknownSubcommand {
        /// The detecting command's path.
        path: String,
        /// The offending token.
        name: String,
    },

    /// A command requires a subcommand and none was given.
    #[error("{path}: missing subcommand")]
    NoSubcommand {
        /// The detecting command's path.
        path: String,
    },

    /// A value failed coercion; the original cause is preserved as the source.
    #[error("{path}: invalid value '{raw}' for input '{id}': {source}")]
    Value {
        /// The detecting command's path.
        path: String,
        /// The id of the input whose value failed.
        id: String,
        /// The raw string that failed to coerce.
        raw: String,
        /// The underlying conversion failure.
        #[source]
        source: ValueError,
    },
}

/// The three-way result of a parse.
///
/// Help/version requests travel the same channel as errors during parsing but are not
/// failures; keeping them as their own variant makes the caller's policy an exhaustive match
/// instead of a downcast.
#[derive(Debug)]
pub enum Outcome {
    /// Parsing completed; the invocation tree mirrors the subcommand path taken.
    Success(Invocation),
    /// A help or version trigger was encountered at some command level; print the message and
    /// exit zero.
    Help(String),
    /// User input did not match the schema.
    Failure(ParseError),
}

/// The internal result of descending one command level.
pub(crate) enum Signal {
    Complete,
    Help(String),
}

impl CommandSchema {
    /// Parse the process's command line arguments (`std::env::args`, program name skipped).
    pub fn parse(&self) -> Outcome {
        let tokens: Vec<String> = env::args().skip(1).collect();
        self.parse_tokens(tokens.iter().map(AsRef::as_ref).collect::<Vec<&str>>().as_slice())
    }

    /// Parse the given tokens against this schema.
    ///
    /// ### Example
    /// ```
    /// use argot::{Command, Input, Outcome, Origin};
    ///
    /// let schema = Command::new("program")
    ///     .opt(Input::option("level").short('l').default("info"))
    ///     .build();
    ///
    /// match schema.parse_tokens(&["-l", "debug"]) {
    ///     Outcome::Success(invocation) => {
    ///         assert_eq!(invocation.get::<String>("level"), "debug");
    ///         assert_eq!(invocation.origin("level"), Some(&Origin::Option("l".to_string())));
    ///     }
    ///     _ => unreachable!(),
    /// }
    /// ```
    pub fn parse_tokens(&self, tokens: &[&str]) -> Outcome {
        let mut invocation = Invocation::new(&self.name);

        match descend(self, &mut invocation, tokens) {
            Ok(Signal::Complete) => Outcome::Success(invocation),
            Ok(Signal::Help(message)) => Outcome::Help(message),
            Err(error) => Outcome::Failure(error),
        }
    }

    /// Parse the process's command line arguments, exiting on anything but success.
    ///
    /// A help or version message is printed to stdout followed by `exit(0)`; a parse error is
    /// printed to stderr as `error: ..` followed by `exit(1)`.
    pub fn parse_or_exit(&self) -> Invocation {
        let tokens: Vec<String> = env::args().skip(1).collect();
        self.parse_tokens_or_exit(tokens.iter().map(AsRef::as_ref).collect::<Vec<&str>>().as_slice())
    }

    /// Parse the given tokens, exiting on anything but success (see [`Self::parse_or_exit`]).
    pub fn parse_tokens_or_exit(&self, tokens: &[&str]) -> Invocation {
        match self.parse_tokens(tokens) {
            Outcome::Success(invocation) => invocation,
            Outcome::Help(message) => {
                print!("{message}");
                std::process::exit(0);
            }
            Outcome::Failure(error) => {
                eprintln!("error: {error}");
                std::process::exit(1);
            }
        }
    }
}

/// Parse one command level, recursing into a matched subcommand with the unconsumed tail.
pub(crate) fn descend(
    schema: &CommandSchema,
    out: &mut Invocation,
    tokens: &[&str],
) -> Result<Signal, ParseError> {
    seed_defaults(schema, out)?;
    seed_environment(schema, out)?;

    let mut cursor = 0;
    while cursor < tokens.len() {
        let token = tokens[cursor];
        let Some(body) = token.strip_prefix('-') else {
            break;
        };
        if body.is_empty() {
            // A lone '-' is a legal positional value (conventionally "stdin").
            // Stop option scanning without consuming it.
            break;
        }

        // A single hyphen followed by more than one character, where the second character is
        // not '=', is a short-option cluster: stacked boolean flags and/or one non-boolean
        // option with its value attached.
        if !body.starts_with('-') && char_at(body, 1).is_some_and(|c| c != '=') {
            if let Some(signal) = scan_cluster(schema, out, tokens, &mut cursor, body)? {
                return Ok(signal);
            }
            cursor += 1;
            continue;
        }

        let body = match body.strip_prefix('-') {
            Some(rest) if rest.is_empty() => {
                // A lone '--' terminates option interpretation; everything after it is
                // positional/subcommand input, verbatim.
                cursor += 1;
                break;
            }
            Some(rest) => rest,
            None => body,
        };

        let (name, attached) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (body, None),
        };

        let option = match single_char(name) {
            Some(short) => schema.opt_by_short(short),
            None => schema.opt_by_long(name),
        };
        let Some(option) = option else {
            return Err(ParseError::UnknownOption {
                path: schema.path_display(),
                name: token.to_string(),
            });
        };

        let raw = match attached {
            Some(value) => value,
            None if !option.boolean => {
                cursor += 1;
                match tokens.get(cursor).copied() {
                    Some(next) => next,
                    None => {
                        return Err(ParseError::MissingOptionValue {
                            path: schema.path_display(),
                            name: name.to_string(),
                        })
                    }
                }
            }
            None => "",
        };

        #[cfg(feature = "tracing_debug")]
        {
            debug!("matched option '{name}' with raw value '{raw}'.");
        }

        if let Some(signal) = record_option(schema, out, option, name, raw)? {
            return Ok(signal);
        }
        cursor += 1;
    }

    // Check required options against what has been recorded so far. When subcommands exist,
    // hold the error: a deeper help request must win over it.
    let missing: Vec<String> = schema
        .opts
        .iter()
        .filter(|o| o.required && !out.contains(&o.id))
        .map(InputSchema::display_name)
        .collect();
    let mut held = None;
    if !missing.is_empty() {
        let error = ParseError::MissingOptions {
            path: schema.path_display(),
            names: missing,
        };
        if schema.subcommands.is_empty() {
            return Err(error);
        }
        held = Some(error);
    }

    let rest = &tokens[cursor..];

    if schema.subcommands.is_empty() {
        return fill_positionals(schema, out, rest);
    }

    if rest.is_empty() {
        if schema.subcommand_optional {
            return Ok(Signal::Complete);
        }
        return Err(ParseError::NoSubcommand {
            path: schema.path_display(),
        });
    }

    let Some(subcommand) = schema.subcommand_named(rest[0]) else {
        return Err(ParseError::UnknownSubcommand {
            path: schema.path_display(),
            name: rest[0].to_string(),
        });
    };

    #[cfg(feature = "tracing_debug")]
    {
        debug!("descending into subcommand '{name}'.", name = rest[0]);
    }

    let mut child = Invocation::new(&subcommand.name);
    let result = descend(subcommand, &mut child, &rest[1..]);
    out.set_subcommand(child);

    // A help request from any depth wins unconditionally; otherwise a held
    // missing-required-options error at this level wins over whatever the subcommand produced.
    match result {
        Ok(Signal::Help(message)) => Ok(Signal::Help(message)),
        other => match held {
            Some(error) => Err(error),
            None => other,
        },
    }
}

/// Walk a short-option cluster such as `-abc`. Returns `Ok(Some(_))` when a help/version
/// trigger short-circuits; `cursor` advances only when the cluster's last option pulled the
/// next token as its value.
fn scan_cluster(
    schema: &CommandSchema,
    out: &mut Invocation,
    tokens: &[&str],
    cursor: &mut usize,
    body: &str,
) -> Result<Option<Signal>, ParseError> {
    for (index, short) in body.char_indices() {
        let Some(option) = schema.opt_by_short(short) else {
            return Err(ParseError::UnknownOption {
                path: schema.path_display(),
                name: format!("-{short}"),
            });
        };

        // Another boolean keeps the cluster going with an empty raw value. A non-boolean
        // either takes the rest of this token verbatim (and the cluster ends), or, as the
        // last character, the next whole token.
        let mut raw = "";
        let mut rest_taken = false;
        let after = index + short.len_utf8();
        if !option.boolean {
            if after == body.len() {
                *cursor += 1;
                match tokens.get(*cursor).copied() {
                    Some(next) => raw = next,
                    None => {
                        return Err(ParseError::MissingOptionValue {
                            path: schema.path_display(),
                            name: short.to_string(),
                        })
                    }
                }
            } else {
                raw = &body[after..];
                rest_taken = true;
            }
        }

        if let Some(signal) = record_option(schema, out, option, &short.to_string(), raw)? {
            return Ok(Some(signal));
        }

        if rest_taken {
            break;
        }
    }

    Ok(None)
}

/// Coerce and record one resolved option occurrence, or short-circuit on a help/version
/// trigger.
fn record_option(
    schema: &CommandSchema,
    out: &mut Invocation,
    option: &InputSchema,
    name: &str,
    raw: &str,
) -> Result<Option<Signal>, ParseError> {
    let binding = coerce(schema, option, Origin::Option(name.to_string()), raw)?;

    if let Some(generator) = &option.help_gen {
        return Ok(Some(Signal::Help(generator(&binding, schema))));
    }
    if let Some(reporter) = &option.versioner {
        return Ok(Some(Signal::Help(reporter(&binding))));
    }

    out.push(binding);
    Ok(None)
}

/// Fill positional argument slots from the unconsumed tail, collecting missing required ones
/// and passing any leftover tokens through as surplus.
fn fill_positionals(
    schema: &CommandSchema,
    out: &mut Invocation,
    rest: &[&str],
) -> Result<Signal, ParseError> {
    let mut slot = 0;
    while slot < schema.args.len() {
        let argument = &schema.args[slot];
        if slot < rest.len() {
            let binding = coerce(schema, argument, Origin::Positional(slot + 1), rest[slot])?;
            out.push(binding);
        } else if argument.required {
            // The run of still-required slots from here on is missing, unless another source
            // (environment variable, default) already recorded an entry.
            let names: Vec<String> = schema.args[slot..]
                .iter()
                .take_while(|a| a.required)
                .filter(|a| !out.contains(&a.id))
                .map(|a| a.display_value_name().to_string())
                .collect();
            if !names.is_empty() {
                return Err(ParseError::MissingArguments {
                    path: schema.path_display(),
                    names,
                });
            }
            return Ok(Signal::Complete);
        } else {
            break;
        }
        slot += 1;
    }

    if rest.len() > slot {
        out.set_surplus(rest[slot..].iter().map(|s| s.to_string()).collect());
    }

    Ok(Signal::Complete)
}

fn seed_defaults(schema: &CommandSchema, out: &mut Invocation) -> Result<(), ParseError> {
    for input in schema.opts.iter().chain(&schema.args) {
        if let Some(raw) = &input.default {
            let binding = coerce(schema, input, Origin::Default, raw)?;
            out.push(binding);
        }
    }
    Ok(())
}

fn seed_environment(schema: &CommandSchema, out: &mut Invocation) -> Result<(), ParseError> {
    for input in schema.opts.iter().chain(&schema.args) {
        if let Some(var) = &input.env {
            if let Ok(raw) = env::var(var) {
                let binding = coerce(schema, input, Origin::Env(var.clone()), &raw)?;
                out.push(binding);
            }
        }
    }
    Ok(())
}

fn char_at(value: &str, index: usize) -> Option<char> {
    value.chars().nth(index)
}

fn single_char(value: &str) -> Option<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(only), None) => Some(only),
        _ => None,
    }
}
