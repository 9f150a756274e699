//! Unit handling for generated programs.
//!
//! A compilation may declare the unit its coordinates are expressed in;
//! the compiler then emits the matching G-code unit directive in the
//! program header.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coordinate unit declared for a compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Millimeters (metric)
    Millimeters,
    /// Inches (imperial)
    Inches,
}

impl Unit {
    /// The G-code directive selecting this unit.
    pub fn gcode_directive(&self) -> &'static str {
        match self {
            Unit::Millimeters => "G21 ; Set units to millimeters",
            Unit::Inches => "G20 ; Set units to inches",
        }
    }

    /// Short label ("mm" or "in").
    pub fn label(&self) -> &'static str {
        match self {
            Unit::Millimeters => "mm",
            Unit::Inches => "in",
        }
    }
}

impl Default for Unit {
    fn default() -> Self {
        Self::Millimeters
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mm" | "millimeter" | "millimeters" => Ok(Self::Millimeters),
            "in" | "inch" | "inches" => Ok(Self::Inches),
            _ => Err(format!("Unknown unit: {}", s)),
        }
    }
}
