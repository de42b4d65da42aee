mod coerce;
mod engine;

pub use engine::{Outcome, ParseError};
