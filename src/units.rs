// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Scene units and conversion to physical take-off units
//!
//! Three independent conversions are derived from the declared scene unit:
//! lengths to millimeters, areas to square meters and volumes to cubic
//! meters. Each is applied exactly once, where the derived value is produced.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Linear unit the scene coordinates are declared in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SceneUnit {
    #[serde(rename = "m")]
    Meter,
    #[serde(rename = "cm")]
    Centimeter,
    #[default]
    #[serde(rename = "mm")]
    Millimeter,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown scene unit '{0}' (expected m, cm or mm)")]
pub struct UnitParseError(pub String);

impl SceneUnit {
    pub const ALL: [SceneUnit; 3] = [SceneUnit::Meter, SceneUnit::Centimeter, SceneUnit::Millimeter];

    pub fn as_str(self) -> &'static str {
        match self {
            SceneUnit::Meter => "m",
            SceneUnit::Centimeter => "cm",
            SceneUnit::Millimeter => "mm",
        }
    }

    /// Parse a unit, falling back to millimeters for anything unrecognised
    pub fn parse_lenient(value: &str) -> Self {
        value.parse().unwrap_or_else(|err: UnitParseError| {
            tracing::warn!("{}; using {}", err, SceneUnit::default().as_str());
            SceneUnit::default()
        })
    }

    /// Factor converting one scene unit to millimeters
    pub fn millimeter_scale(self) -> f64 {
        match self {
            SceneUnit::Meter => 1000.0,
            SceneUnit::Centimeter => 10.0,
            SceneUnit::Millimeter => 1.0,
        }
    }

    /// Divisor converting square scene units to m²
    pub fn area_divisor(self) -> f64 {
        match self {
            SceneUnit::Meter => 1.0,
            SceneUnit::Centimeter => 10_000.0,
            SceneUnit::Millimeter => 1_000_000.0,
        }
    }

    /// Divisor converting cubic scene units to m³
    pub fn volume_divisor(self) -> f64 {
        match self {
            SceneUnit::Meter => 1.0,
            SceneUnit::Centimeter => 1e6,
            SceneUnit::Millimeter => 1e9,
        }
    }

    pub fn to_millimeters(self, length: f64) -> f64 {
        length * self.millimeter_scale()
    }

    pub fn area_to_square_meters(self, raw_area: f64) -> f64 {
        raw_area / self.area_divisor()
    }

    pub fn volume_to_cubic_meters(self, raw_volume: f64) -> f64 {
        raw_volume / self.volume_divisor()
    }
}

impl FromStr for SceneUnit {
    type Err = UnitParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "m" => Ok(SceneUnit::Meter),
            "cm" => Ok(SceneUnit::Centimeter),
            "mm" => Ok(SceneUnit::Millimeter),
            _ => Err(UnitParseError(s.to_string())),
        }
    }
}

impl fmt::Display for SceneUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Physical unit of a part's calculation value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CalculationUnit {
    #[serde(rename = "m²")]
    SquareMeters,
    #[serde(rename = "m³")]
    CubicMeters,
    #[serde(rename = "mm")]
    Millimeters,
    #[serde(rename = "un")]
    Units,
}

impl CalculationUnit {
    pub fn symbol(self) -> &'static str {
        match self {
            CalculationUnit::SquareMeters => "m²",
            CalculationUnit::CubicMeters => "m³",
            CalculationUnit::Millimeters => "mm",
            CalculationUnit::Units => "un",
        }
    }
}

impl fmt::Display for CalculationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Tag carried by [`Dimensions`]; stored dimensions are always millimeters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DimensionUnit {
    #[default]
    #[serde(rename = "mm")]
    Millimeters,
}

/// Bounding-box extents in millimeters: length (x), width (y), height (z)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Dimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub unit: DimensionUnit,
}

impl Dimensions {
    pub fn new(length: f64, width: f64, height: f64) -> Self {
        Self {
            length,
            width,
            height,
            unit: DimensionUnit::Millimeters,
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Convert raw scene-unit extents to millimeters
    pub fn from_extents(size: &Vector3<f64>, unit: SceneUnit) -> Self {
        Self::new(
            unit.to_millimeters(size.x),
            unit.to_millimeters(size.y),
            unit.to_millimeters(size.z),
        )
    }

    pub fn max(&self) -> f64 {
        self.length.max(self.width).max(self.height)
    }

    /// Extents in ascending order: thickness, width, length
    pub fn sorted(&self) -> [f64; 3] {
        let mut dims = [self.length, self.width, self.height];
        dims.sort_by(|a, b| a.total_cmp(b));
        dims
    }

    /// No usable extent: everything zero or something non-finite
    pub fn is_degenerate(&self) -> bool {
        let dims = [self.length, self.width, self.height];
        dims.iter().any(|d| !d.is_finite()) || dims.iter().all(|d| *d == 0.0)
    }
}
