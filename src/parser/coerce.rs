use crate::invocation::{Binding, Origin};
use crate::model::{CommandSchema, InputSchema, Value};
use crate::parser::ParseError;
use crate::parsers;

/// The single coercion path: every raw string, whether it came from a default, an environment
/// variable, or the command line, resolves to a [`Binding`] through this function.
///
/// A declared parser wins. Without one, boolean options read flag presence (empty raw) as
/// `true` and anything else through the permissive boolean grammar; every other input keeps
/// the raw string verbatim.
pub(crate) fn coerce(
    schema: &CommandSchema,
    input: &InputSchema,
    origin: Origin,
    raw: &str,
) -> Result<Binding, ParseError> {
    let value: Value = if let Some(parser) = &input.parser {
        parser(raw).map_err(|source| ParseError::Value {
            path: schema.path_display(),
            id: input.id.clone(),
            raw: raw.to_string(),
            source,
        })?
    } else if input.boolean {
        if raw.is_empty() {
            Box::new(true)
        } else {
            let flag = parsers::bool_from_str(raw).map_err(|source| ParseError::Value {
                path: schema.path_display(),
                id: input.id.clone(),
                raw: raw.to_string(),
                source,
            })?;
            Box::new(flag)
        }
    } else {
        Box::new(raw.to_string())
    };

    Ok(Binding::new(&input.id, value, raw, origin))
}
