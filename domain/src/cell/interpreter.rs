//! Cell code interpretation.
//!
//! A goal map cell holds a short code naming what must exist at that
//! position. The accepted encodings are:
//!
//! | Code                 | Meaning                         |
//! |----------------------|---------------------------------|
//! | `EMPTY`              | nothing to create               |
//! | `POLYANET`           | a POLYanet                      |
//! | `<COLOR>_SOLOON`     | a SOLoon of the given color     |
//! | `<DIRECTION>_COMETH` | a comETH facing that direction  |
//!
//! Matching is case-insensitive. Anything else is a [`ParseError`]; codes are
//! never matched by substring, so `FOO_BAR_SOLOON` or `RED_COMETH` are
//! rejected rather than guessed at.

use super::value_objects::{ComethDirection, SoloonColor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const EMPTY: &str = "EMPTY";
const POLYANET: &str = "POLYANET";
const SOLOON: &str = "SOLOON";
const COMETH: &str = "COMETH";

/// Errors produced when a cell code does not match a known encoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty cell code")]
    Blank,

    #[error("unknown cell code '{0}'")]
    UnknownCode(String),

    #[error("cell code '{raw}' names unknown soloon color '{color}'")]
    InvalidColor { raw: String, color: String },

    #[error("cell code '{raw}' names unknown cometh direction '{direction}'")]
    InvalidDirection { raw: String, direction: String },
}

/// Parsed content of a single goal map cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CellDescriptor {
    Empty,
    Polyanet,
    Soloon { color: SoloonColor },
    Cometh { direction: ComethDirection },
}

impl CellDescriptor {
    /// Interpret a raw cell code.
    pub fn interpret(raw: &str) -> Result<Self, ParseError> {
        if raw.trim().is_empty() {
            return Err(ParseError::Blank);
        }
        let code = raw;
        if code.eq_ignore_ascii_case(EMPTY) {
            return Ok(CellDescriptor::Empty);
        }
        if code.eq_ignore_ascii_case(POLYANET) {
            return Ok(CellDescriptor::Polyanet);
        }

        let unknown = || ParseError::UnknownCode(raw.to_string());
        let (attribute, kind) = code.split_once('_').ok_or_else(unknown)?;
        if attribute.is_empty() || kind.contains('_') {
            return Err(unknown());
        }

        if kind.eq_ignore_ascii_case(SOLOON) {
            let color = SoloonColor::from_str(attribute).map_err(|_| ParseError::InvalidColor {
                raw: raw.to_string(),
                color: attribute.to_string(),
            })?;
            Ok(CellDescriptor::Soloon { color })
        } else if kind.eq_ignore_ascii_case(COMETH) {
            let direction =
                ComethDirection::from_str(attribute).map_err(|_| ParseError::InvalidDirection {
                    raw: raw.to_string(),
                    direction: attribute.to_string(),
                })?;
            Ok(CellDescriptor::Cometh { direction })
        } else {
            Err(unknown())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellDescriptor::Empty)
    }

    /// Canonical cell code, the inverse of [`CellDescriptor::interpret`].
    pub fn code(&self) -> String {
        match self {
            CellDescriptor::Empty => EMPTY.to_string(),
            CellDescriptor::Polyanet => POLYANET.to_string(),
            CellDescriptor::Soloon { color } => {
                format!("{}_{}", color.as_str().to_ascii_uppercase(), SOLOON)
            }
            CellDescriptor::Cometh { direction } => {
                format!("{}_{}", direction.as_str().to_ascii_uppercase(), COMETH)
            }
        }
    }
}

impl FromStr for CellDescriptor {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::interpret(s)
    }
}

impl fmt::Display for CellDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code())
    }
}
