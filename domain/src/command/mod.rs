//! Creation commands derived from a goal map.
//!
//! A [`CreateCommand`] names one object to create at one [`Position`]. Each
//! non-empty cell yields exactly one command; commands are independent of
//! each other and can be executed in any order.

use crate::cell::{CellDescriptor, ComethDirection, ParseError, SoloonColor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Zero-indexed grid coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub column: usize,
}

impl Position {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Kind of celestial object to create, with its attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CelestialObject {
    Polyanet,
    Soloon { color: SoloonColor },
    Cometh { direction: ComethDirection },
}

impl CelestialObject {
    /// Short name of the object kind (`"polyanet"`, `"soloon"`, `"cometh"`).
    pub fn kind_name(&self) -> &'static str {
        match self {
            CelestialObject::Polyanet => "polyanet",
            CelestialObject::Soloon { .. } => "soloon",
            CelestialObject::Cometh { .. } => "cometh",
        }
    }

    /// Object for a cell, or `None` for an empty cell.
    pub fn from_cell(cell: CellDescriptor) -> Option<Self> {
        match cell {
            CellDescriptor::Empty => None,
            CellDescriptor::Polyanet => Some(CelestialObject::Polyanet),
            CellDescriptor::Soloon { color } => Some(CelestialObject::Soloon { color }),
            CellDescriptor::Cometh { direction } => Some(CelestialObject::Cometh { direction }),
        }
    }
}

impl fmt::Display for CelestialObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CelestialObject::Polyanet => f.write_str("polyanet"),
            CelestialObject::Soloon { color } => write!(f, "{} soloon", color),
            CelestialObject::Cometh { direction } => write!(f, "{} cometh", direction),
        }
    }
}

/// Request to create one object at one position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CreateCommand {
    pub position: Position,
    pub object: CelestialObject,
}

impl CreateCommand {
    pub fn new(position: Position, object: CelestialObject) -> Self {
        Self { position, object }
    }

    pub fn polyanet(row: usize, column: usize) -> Self {
        Self::new(Position::new(row, column), CelestialObject::Polyanet)
    }

    pub fn soloon(row: usize, column: usize, color: SoloonColor) -> Self {
        Self::new(Position::new(row, column), CelestialObject::Soloon { color })
    }

    pub fn cometh(row: usize, column: usize, direction: ComethDirection) -> Self {
        Self::new(
            Position::new(row, column),
            CelestialObject::Cometh { direction },
        )
    }

    /// Command for a parsed cell, or `None` when the cell is empty.
    pub fn for_cell(position: Position, cell: CellDescriptor) -> Option<Self> {
        CelestialObject::from_cell(cell).map(|object| Self::new(position, object))
    }

    /// Interpret a raw cell code at `position`.
    ///
    /// Returns `Ok(None)` for `EMPTY` and an error for any unknown encoding.
    pub fn interpret(position: Position, raw: &str) -> Result<Option<Self>, ParseError> {
        CellDescriptor::interpret(raw).map(|cell| Self::for_cell(position, cell))
    }
}

impl fmt::Display for CreateCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.object, self.position)
    }
}
