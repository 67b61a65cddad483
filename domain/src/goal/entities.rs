//! Goal map entity.
//!
//! A [`GoalMap`] is built once per run from the raw matrix of cell codes and
//! is read-only afterwards. Every row has the same length, and every cell has
//! been interpreted; a single bad cell rejects the whole map.

use crate::cell::{CellDescriptor, ParseError};
use crate::command::{CreateCommand, Position};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while building a [`GoalMap`] from raw cell codes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GoalMapError {
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("cell ({row}, {column}): {source}")]
    Cell {
        row: usize,
        column: usize,
        #[source]
        source: ParseError,
    },
}

/// Parsed, rectangular goal map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalMap {
    rows: Vec<Vec<CellDescriptor>>,
    width: usize,
}

impl GoalMap {
    /// Interpret a raw matrix of cell codes.
    pub fn parse<R, S>(raw: &[R]) -> Result<Self, GoalMapError>
    where
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        let width = raw.first().map(|r| r.as_ref().len()).unwrap_or(0);
        let mut rows = Vec::with_capacity(raw.len());

        for (row, raw_row) in raw.iter().enumerate() {
            let raw_row = raw_row.as_ref();
            if raw_row.len() != width {
                return Err(GoalMapError::Ragged {
                    row,
                    expected: width,
                    found: raw_row.len(),
                });
            }

            let cells = raw_row
                .iter()
                .enumerate()
                .map(|(column, code)| {
                    CellDescriptor::interpret(code.as_ref()).map_err(|source| {
                        GoalMapError::Cell {
                            row,
                            column,
                            source,
                        }
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(cells);
        }

        Ok(Self { rows, width })
    }

    /// Square map with POLYanets on both diagonals, leaving a two-cell margin.
    ///
    /// For `size = 11` this is the X spanning rows 2 to 8.
    pub fn polyanet_cross(size: usize) -> Self {
        let mut rows = vec![vec![CellDescriptor::Empty; size]; size];
        for i in 2..size.saturating_sub(2) {
            rows[i][i] = CellDescriptor::Polyanet;
            rows[i][size - 1 - i] = CellDescriptor::Polyanet;
        }
        Self { rows, width: size }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// One creation command per non-empty cell, in row-major order.
    pub fn commands(&self) -> Vec<CreateCommand> {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(row, cells)| {
                cells.iter().enumerate().filter_map(move |(column, cell)| {
                    CreateCommand::for_cell(Position::new(row, column), *cell)
                })
            })
            .collect()
    }

    /// Render back into raw cell codes.
    pub fn to_codes(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|c| c.code()).collect())
            .collect()
    }
}
