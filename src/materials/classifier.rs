// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Rule-based material classification of a part
//!
//! Name keywords are checked first, in rule order. When no keyword matches,
//! the part's millimeter extents decide:
//!
//! 1. longest extent below the small-part limit → unit item
//! 2. thin relative to both other extents → sheet
//! 3. thin and narrow with one dominant axis → linear profile
//! 4. anything else → volume
//!
//! The sheet check always runs before the linear check.

use super::MaterialCategory;
use crate::units::Dimensions;
use serde::{Deserialize, Serialize};

/// Dimension-heuristic constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierThresholds {
    /// Parts whose longest extent is below this are counted as units (mm)
    pub small_part_max_mm: f64,
    /// Thin threshold as a fraction of the longest extent
    pub thin_ratio: f64,
    /// Lower bound of the thin threshold (mm)
    pub thin_floor_mm: f64,
    /// Maximum thickness/width ratio of a sheet
    pub sheet_aspect_ratio: f64,
    /// Minimum length/width factor of a linear profile
    pub linear_length_factor: f64,
}

impl Default for ClassifierThresholds {
    fn default() -> Self {
        Self {
            small_part_max_mm: 50.0,
            thin_ratio: 0.05,
            thin_floor_mm: 10.0,
            sheet_aspect_ratio: 0.1,
            linear_length_factor: 5.0,
        }
    }
}

impl ClassifierThresholds {
    pub fn thin_threshold(&self, longest: f64) -> f64 {
        self.thin_floor_mm.max(longest * self.thin_ratio)
    }
}

/// Keywords that map a part name to a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRule {
    pub category: MaterialCategory,
    pub keywords: Vec<String>,
}

impl NameRule {
    pub fn new(category: MaterialCategory, keywords: &[&str]) -> Self {
        Self {
            category,
            keywords: keywords.iter().map(|k| k.to_uppercase()).collect(),
        }
    }

    /// `upper_name` must already be upper-cased
    fn matches(&self, upper_name: &str) -> bool {
        self.keywords
            .iter()
            .any(|keyword| upper_name.contains(&keyword.to_uppercase()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub thresholds: ClassifierThresholds,
    /// Checked in order; the first matching rule wins
    pub name_rules: Vec<NameRule>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            thresholds: ClassifierThresholds::default(),
            name_rules: vec![
                NameRule::new(MaterialCategory::Sheet, &["CHAPA", "PLACA"]),
                // structural profiles are quantified by volume, before the generic PERFIL rule
                NameRule::new(
                    MaterialCategory::Volume,
                    &["TUBO", "METALON", "PERFIL ESTRUTURAL"],
                ),
                NameRule::new(MaterialCategory::Linear, &["BARRA", "PERFIL", "HASTE"]),
                NameRule::new(MaterialCategory::Unit, &["UNIDADE", "PECA"]),
            ],
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MaterialClassifier {
    config: ClassifierConfig,
}

impl MaterialClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify a part. Returns `None` only for degenerate dimensions.
    pub fn classify(&self, name: &str, dimensions: &Dimensions) -> Option<MaterialCategory> {
        if dimensions.is_degenerate() {
            return None;
        }
        self.classify_by_name(name)
            .or_else(|| Some(self.classify_by_shape(dimensions)))
    }

    /// Keyword match on the upper-cased name
    pub fn classify_by_name(&self, name: &str) -> Option<MaterialCategory> {
        let upper = name.to_uppercase();
        self.config
            .name_rules
            .iter()
            .find(|rule| rule.matches(&upper))
            .map(|rule| rule.category)
    }

    /// Dimension heuristic on millimeter extents
    pub fn classify_by_shape(&self, dimensions: &Dimensions) -> MaterialCategory {
        let limits = &self.config.thresholds;
        let [thickness, width, length] = dimensions.sorted();

        if length < limits.small_part_max_mm {
            return MaterialCategory::Unit;
        }

        let thin = limits.thin_threshold(length);

        if thickness < thin && thickness / width < limits.sheet_aspect_ratio {
            return MaterialCategory::Sheet;
        }

        if thickness < thin && width < thin && length > width * limits.linear_length_factor {
            return MaterialCategory::Linear;
        }

        MaterialCategory::Volume
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(name: &str, l: f64, w: f64, h: f64) -> Option<MaterialCategory> {
        MaterialClassifier::default().classify(name, &Dimensions::new(l, w, h))
    }

    #[test]
    fn test_name_rules_dominate_dimensions() {
        assert_eq!(classify("Chapa Lateral", 500.0, 500.0, 500.0), Some(MaterialCategory::Sheet));
        assert_eq!(classify("placa base", 5.0, 5.0, 5.0), Some(MaterialCategory::Sheet));
        assert_eq!(classify("Tubo 40x40", 2.0, 40.0, 1000.0), Some(MaterialCategory::Volume));
        assert_eq!(classify("Haste roscada", 300.0, 300.0, 300.0), Some(MaterialCategory::Linear));
        assert_eq!(classify("Peca de fixacao", 900.0, 900.0, 2.0), Some(MaterialCategory::Unit));
    }

    #[test]
    fn test_structural_profile_is_volume_not_linear() {
        assert_eq!(
            classify("Perfil Estrutural W150", 10.0, 10.0, 3000.0),
            Some(MaterialCategory::Volume)
        );
        assert_eq!(classify("Perfil U", 10.0, 10.0, 3000.0), Some(MaterialCategory::Linear));
    }

    #[test]
    fn test_small_part_rule() {
        assert_eq!(classify("", 30.0, 20.0, 10.0), Some(MaterialCategory::Unit));
        assert_eq!(classify("bolt", 49.9, 1.0, 1.0), Some(MaterialCategory::Unit));
    }

    #[test]
    fn test_thin_sheet_from_dimensions() {
        assert_eq!(classify("", 1200.0, 600.0, 3.0), Some(MaterialCategory::Sheet));
    }

    #[test]
    fn test_linear_profile_from_dimensions() {
        // threshold is max(10, 1000 * 0.05) = 50; 8/12 is too thick for a sheet
        assert_eq!(classify("", 8.0, 12.0, 1000.0), Some(MaterialCategory::Linear));
        // 2/40 = 0.05 passes the sheet aspect check first
        assert_eq!(classify("", 2.0, 40.0, 1000.0), Some(MaterialCategory::Sheet));
    }

    #[test]
    fn test_sheet_check_precedes_linear_check() {
        // thickness/width = 0.05 satisfies the sheet rule even though the
        // linear rule would also match
        assert_eq!(classify("", 1.0, 20.0, 1000.0), Some(MaterialCategory::Sheet));
    }

    #[test]
    fn test_blocky_part_is_volume() {
        assert_eq!(classify("", 200.0, 150.0, 100.0), Some(MaterialCategory::Volume));
    }

    #[test]
    fn test_degenerate_dimensions_are_unclassified() {
        assert_eq!(classify("Chapa", 0.0, 0.0, 0.0), None);
        assert_eq!(classify("", f64::INFINITY, 1.0, 1.0), None);
    }

    #[test]
    fn test_plate_flat_along_x_is_classified() {
        // zero extent on any single axis is a flat part, not a degenerate one
        assert_eq!(classify("", 0.0, 600.0, 1200.0), Some(MaterialCategory::Sheet));
        assert_eq!(classify("Chapa Lateral", 0.0, 600.0, 1200.0), Some(MaterialCategory::Sheet));
        assert_eq!(classify("Barra", 0.0, 0.0, 900.0), Some(MaterialCategory::Linear));
    }

    #[test]
    fn test_overridden_thresholds() {
        let config = ClassifierConfig {
            thresholds: ClassifierThresholds {
                small_part_max_mm: 10.0,
                ..ClassifierThresholds::default()
            },
            ..ClassifierConfig::default()
        };
        let classifier = MaterialClassifier::new(config);
        assert_eq!(
            classifier.classify("", &Dimensions::new(30.0, 20.0, 10.0)),
            Some(MaterialCategory::Volume)
        );
    }
}
