// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Caller-defined display labels for the four material roles
//!
//! Labels take the form `"TEXT (unit)"`. The text before the parenthesis is
//! the category key used to group totals; the text inside is the display unit.

use super::MaterialCategory;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialRegistry {
    pub sheet: String,
    pub volume: String,
    pub linear: String,
    pub unit: String,
}

impl Default for MaterialRegistry {
    fn default() -> Self {
        Self {
            sheet: "CHAPA (m²)".to_string(),
            volume: "VOLUME (m³)".to_string(),
            linear: "LINEAR (m)".to_string(),
            unit: "UNITARIO (un)".to_string(),
        }
    }
}

impl MaterialRegistry {
    pub fn label(&self, category: MaterialCategory) -> &str {
        match category {
            MaterialCategory::Sheet => &self.sheet,
            MaterialCategory::Volume => &self.volume,
            MaterialCategory::Linear => &self.linear,
            MaterialCategory::Unit => &self.unit,
        }
    }

    /// Category key, e.g. `"CHAPA"` for `"CHAPA (m²)"`
    pub fn key(&self, category: MaterialCategory) -> &str {
        label_key(self.label(category))
    }

    /// Unit shown next to aggregated totals. Linear totals are always shown
    /// in millimeters and unit totals as counts, whatever the label says.
    pub fn display_unit(&self, category: MaterialCategory) -> String {
        match category {
            MaterialCategory::Linear => "mm".to_string(),
            MaterialCategory::Unit => "un".to_string(),
            _ => label_unit(self.label(category))
                .map(str::to_string)
                .unwrap_or_else(|| category.calculation_unit().symbol().to_string()),
        }
    }

    /// Roles paired with their labels, in registry order
    pub fn entries(&self) -> impl Iterator<Item = (MaterialCategory, &str)> + '_ {
        MaterialCategory::ALL
            .into_iter()
            .map(move |category| (category, self.label(category)))
    }
}

/// Text before the first parenthesis, trimmed
pub fn label_key(label: &str) -> &str {
    label.split('(').next().unwrap_or(label).trim()
}

/// Text inside the first pair of parentheses, trimmed
pub fn label_unit(label: &str) -> Option<&str> {
    let (_, rest) = label.split_once('(')?;
    let unit = rest.split(')').next().unwrap_or(rest).trim();
    (!unit.is_empty()).then_some(unit)
}
