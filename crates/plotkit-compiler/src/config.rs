//! Compiler configuration.

use crate::error::{CompileError, CompileResult};
use plotkit_core::constants::DEFAULT_OPERATION_TOLERANCE;
use plotkit_core::{FlattenOptions, Unit};
use serde::{Deserialize, Serialize};

/// Motion compiler parameters.
///
/// Speeds are feed rates in configured units per minute. The configured
/// unit only selects the directive emitted in the program header; no
/// coordinate conversion is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Feed rate for rapid travel moves
    pub movement_speed: f64,
    /// Feed rate for drawing/cutting moves
    pub cutting_speed: f64,
    /// Downward step applied between passes; stored as an absolute value
    pub pass_depth: f64,
    /// Pause before lowering the pen, in milliseconds (0 disables)
    pub dwell_time: f64,
    /// Coordinate unit declared in the program header
    pub unit: Option<Unit>,
    /// Number of times the program body is traversed
    pub passes: u32,
    /// Positional delta below which two positions are considered the same
    pub operation_tolerance: f64,
    /// Curve flattening options
    pub flatten: FlattenOptions,
    /// Header lines appended after the built-in preamble; a single
    /// pen-up instruction when unset
    pub custom_header: Option<Vec<String>>,
    /// Footer lines; a single pen-up instruction when unset
    pub custom_footer: Option<Vec<String>>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            movement_speed: 3000.0,
            cutting_speed: 1000.0,
            pass_depth: 0.0,
            dwell_time: 0.0,
            unit: None,
            passes: 1,
            operation_tolerance: DEFAULT_OPERATION_TOLERANCE,
            flatten: FlattenOptions::default(),
            custom_header: None,
            custom_footer: None,
        }
    }
}

impl CompilerConfig {
    /// Validate the configuration, normalizing `pass_depth` to its
    /// absolute value.
    pub fn validated(mut self) -> CompileResult<Self> {
        if !self.movement_speed.is_finite() || self.movement_speed <= 0.0 {
            return Err(CompileError::Configuration(format!(
                "movement_speed must be positive, got {}",
                self.movement_speed
            )));
        }
        if !self.cutting_speed.is_finite() || self.cutting_speed <= 0.0 {
            return Err(CompileError::Configuration(format!(
                "cutting_speed must be positive, got {}",
                self.cutting_speed
            )));
        }
        if !self.pass_depth.is_finite() {
            return Err(CompileError::Configuration(format!(
                "pass_depth must be finite, got {}",
                self.pass_depth
            )));
        }
        if !self.dwell_time.is_finite() || self.dwell_time < 0.0 {
            return Err(CompileError::Configuration(format!(
                "dwell_time must be non-negative, got {}",
                self.dwell_time
            )));
        }
        if self.passes == 0 {
            return Err(CompileError::Configuration(
                "passes must be at least 1".to_string(),
            ));
        }
        if !self.operation_tolerance.is_finite() || self.operation_tolerance < 0.0 {
            return Err(CompileError::Configuration(format!(
                "operation_tolerance must be non-negative, got {}",
                self.operation_tolerance
            )));
        }
        if !self.flatten.tolerance.is_finite() || self.flatten.tolerance <= 0.0 {
            return Err(CompileError::Configuration(format!(
                "flatten.tolerance must be positive, got {}",
                self.flatten.tolerance
            )));
        }
        if self.flatten.max_depth == 0 {
            return Err(CompileError::Configuration(
                "flatten.max_depth must be at least 1".to_string(),
            ));
        }
        self.pass_depth = self.pass_depth.abs();
        Ok(self)
    }
}
