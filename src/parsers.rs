//! The provided value parsers.
//!
//! Each parser here fits the [`ValueParser`](crate::ValueParser) signature and can be handed
//! to [`Input::with_parser`](crate::Input::with_parser) directly. Inputs without a parser
//! keep their raw `String` (boolean options aside, which use [`parse_bool`]).

use std::time::Duration;

use crate::model::{Value, ValueError};

pub(crate) fn bool_from_str(raw: &str) -> Result<bool, ValueError> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(format!("invalid boolean value \"{raw}\"").into()),
    }
}

/// Parse a boolean with the same permissive grammar boolean options use:
/// `1 t T TRUE true True` and `0 f F FALSE false False`.
pub fn parse_bool(raw: &str) -> Result<Value, ValueError> {
    bool_from_str(raw).map(|b| Box::new(b) as Value)
}

/// Parse an `i64`.
pub fn parse_i64(raw: &str) -> Result<Value, ValueError> {
    let value: i64 = raw.parse()?;
    Ok(Box::new(value))
}

/// Parse a `u64`.
pub fn parse_u64(raw: &str) -> Result<Value, ValueError> {
    let value: u64 = raw.parse()?;
    Ok(Box::new(value))
}

/// Parse an `f32`.
pub fn parse_f32(raw: &str) -> Result<Value, ValueError> {
    let value: f32 = raw.parse()?;
    Ok(Box::new(value))
}

/// Parse an `f64`.
pub fn parse_f64(raw: &str) -> Result<Value, ValueError> {
    let value: f64 = raw.parse()?;
    Ok(Box::new(value))
}

/// Parse a [`url::Url`].
pub fn parse_url(raw: &str) -> Result<Value, ValueError> {
    let value = url::Url::parse(raw)?;
    Ok(Box::new(value))
}

/// Parse a [`Duration`] written as a number with a unit suffix: `250ms`, `1.5s`, `10m`, `2h`.
pub fn parse_duration(raw: &str) -> Result<Value, ValueError> {
    let split = raw
        .find(|c: char| c.is_ascii_alphabetic())
        .ok_or_else(|| format!("duration \"{raw}\" is missing a unit (ms, s, m, h)"))?;
    let (number, unit) = raw.split_at(split);

    let scale = match unit {
        "ms" => 0.001,
        "s" => 1.0,
        "m" => 60.0,
        "h" => 3600.0,
        _ => return Err(format!("unknown duration unit \"{unit}\" in \"{raw}\"").into()),
    };
    let number: f64 = number
        .parse()
        .map_err(|_| format!("invalid duration value \"{raw}\""))?;
    if number < 0.0 {
        return Err(format!("duration \"{raw}\" cannot be negative").into());
    }

    Ok(Box::new(Duration::from_secs_f64(number * scale)))
}

/// A parser for [`chrono::NaiveDateTime`] values in the given
/// [format](https://docs.rs/chrono/latest/chrono/format/strftime/index.html).
///
/// ### Example
/// ```
/// use argot::{parsers, Command, Input, Outcome};
/// use chrono::NaiveDateTime;
///
/// let schema = Command::new("program")
///     .opt(Input::option("since").with_parser(parsers::timestamp_parser("%Y-%m-%d %H:%M")))
///     .build();
///
/// match schema.parse_tokens(&["--since", "2024-05-01 09:30"]) {
///     Outcome::Success(invocation) => {
///         let since: &NaiveDateTime = invocation.get("since");
///         assert_eq!(since.to_string(), "2024-05-01 09:30:00");
///     }
///     _ => unreachable!(),
/// }
/// ```
pub fn timestamp_parser(
    format: impl Into<String>,
) -> impl Fn(&str) -> Result<Value, ValueError> + Send + Sync + 'static {
    let format = format.into();
    move |raw: &str| {
        let value = chrono::NaiveDateTime::parse_from_str(raw, &format)?;
        Ok(Box::new(value) as Value)
    }
}

/// A parser that treats its input as a file path: the file's contents (one trailing newline
/// trimmed) become the value, re-parsed with `inner` when one is given.
pub fn file_parser(
    inner: Option<crate::model::ValueParser>,
) -> impl Fn(&str) -> Result<Value, ValueError> + Send + Sync + 'static {
    move |path: &str| {
        let mut contents = std::fs::read_to_string(path).map_err(|e| -> ValueError {
            format!("reading \"{path}\": {e}").into()
        })?;
        if contents.ends_with('\n') {
            contents.pop();
        }
        match &inner {
            Some(parser) => parser(&contents),
            None => Ok(Box::new(contents) as Value),
        }
    }
}
