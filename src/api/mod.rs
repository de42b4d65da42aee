mod core;
mod parameter;

pub use self::core::{Command, SchemaError};
pub use self::parameter::Input;
