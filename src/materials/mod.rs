// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Material categories, the label registry and the part classifier

pub mod classifier;
pub mod registry;

pub use classifier::{ClassifierConfig, ClassifierThresholds, MaterialClassifier, NameRule};
pub use registry::{label_key, label_unit, MaterialRegistry};

use crate::units::CalculationUnit;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The four semantic material roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialCategory {
    /// Plate-like parts, quantified by area
    Sheet,
    /// Solid blocks, quantified by volume
    Volume,
    /// Profiles and bars, quantified by length
    Linear,
    /// Discrete items, counted
    Unit,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown material category '{0}' (expected sheet, volume, linear or unit)")]
pub struct CategoryParseError(pub String);

impl MaterialCategory {
    pub const ALL: [MaterialCategory; 4] = [
        MaterialCategory::Sheet,
        MaterialCategory::Volume,
        MaterialCategory::Linear,
        MaterialCategory::Unit,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MaterialCategory::Sheet => "sheet",
            MaterialCategory::Volume => "volume",
            MaterialCategory::Linear => "linear",
            MaterialCategory::Unit => "unit",
        }
    }

    /// Canonical unit of a part's calculation value in this category
    pub fn calculation_unit(self) -> CalculationUnit {
        match self {
            MaterialCategory::Sheet => CalculationUnit::SquareMeters,
            MaterialCategory::Volume => CalculationUnit::CubicMeters,
            MaterialCategory::Linear => CalculationUnit::Millimeters,
            MaterialCategory::Unit => CalculationUnit::Units,
        }
    }
}

impl FromStr for MaterialCategory {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sheet" | "chapa" => Ok(MaterialCategory::Sheet),
            "volume" => Ok(MaterialCategory::Volume),
            "linear" => Ok(MaterialCategory::Linear),
            "unit" | "unitario" => Ok(MaterialCategory::Unit),
            _ => Err(CategoryParseError(s.to_string())),
        }
    }
}

impl fmt::Display for MaterialCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
