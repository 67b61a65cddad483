//! Goal map cell codes and the objects they describe.

pub mod interpreter;
pub mod value_objects;

pub use interpreter::{CellDescriptor, ParseError};
pub use value_objects::{ComethDirection, SoloonColor};
