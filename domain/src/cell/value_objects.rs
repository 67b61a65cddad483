//! Attribute value objects carried by celestial objects.
//!
//! - [`SoloonColor`] - the color of a SOLoon
//! - [`ComethDirection`] - the direction a comETH travels

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Color of a SOLoon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoloonColor {
    Blue,
    Red,
    Purple,
    White,
}

impl SoloonColor {
    /// Wire name used by the remote API (`"blue"`, `"red"`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            SoloonColor::Blue => "blue",
            SoloonColor::Red => "red",
            SoloonColor::Purple => "purple",
            SoloonColor::White => "white",
        }
    }
}

impl fmt::Display for SoloonColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SoloonColor {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "blue" => Ok(SoloonColor::Blue),
            "red" => Ok(SoloonColor::Red),
            "purple" => Ok(SoloonColor::Purple),
            "white" => Ok(SoloonColor::White),
            _ => Err(()),
        }
    }
}

/// Travel direction of a comETH.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComethDirection {
    Up,
    Down,
    Left,
    Right,
}

impl ComethDirection {
    /// Wire name used by the remote API (`"up"`, `"down"`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            ComethDirection::Up => "up",
            ComethDirection::Down => "down",
            ComethDirection::Left => "left",
            ComethDirection::Right => "right",
        }
    }
}

impl fmt::Display for ComethDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComethDirection {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" => Ok(ComethDirection::Up),
            "down" => Ok(ComethDirection::Down),
            "left" => Ok(ComethDirection::Left),
            "right" => Ok(ComethDirection::Right),
            _ => Err(()),
        }
    }
}
