// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Material totals across all loaded models

use super::store::MetadataStore;
use crate::materials::{MaterialCategory, MaterialRegistry};
use crate::scene::SceneNode;
use serde::{Deserialize, Serialize};

/// Accumulated value of one material role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialTotal {
    pub key: String,
    pub category: MaterialCategory,
    pub value: f64,
    pub unit: String,
    /// Registry label the key was taken from
    pub label: String,
}

/// Totals in registry order, zero entries included
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialTotals(Vec<MaterialTotal>);

impl MaterialTotals {
    /// One zeroed accumulator per registry role. A key shared by several
    /// roles is kept once, for the first role.
    pub fn from_registry(registry: &MaterialRegistry) -> Self {
        let mut totals: Vec<MaterialTotal> = Vec::with_capacity(MaterialCategory::ALL.len());
        for (category, label) in registry.entries() {
            let key = registry.key(category);
            if totals.iter().any(|total| total.key == key) {
                tracing::warn!("Material label '{}' reuses key '{}'; ignored", label, key);
                continue;
            }
            totals.push(MaterialTotal {
                key: key.to_string(),
                category,
                value: 0.0,
                unit: registry.display_unit(category),
                label: label.to_string(),
            });
        }
        Self(totals)
    }

    pub fn get(&self, key: &str) -> Option<&MaterialTotal> {
        self.0.iter().find(|total| total.key == key)
    }

    pub fn value(&self, key: &str) -> f64 {
        self.get(key).map(|total| total.value).unwrap_or(0.0)
    }

    fn add(&mut self, key: &str, value: f64) -> bool {
        match self.0.iter_mut().find(|total| total.key == key) {
            Some(total) => {
                total.value += value;
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MaterialTotal> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a MaterialTotals {
    type Item = &'a MaterialTotal;
    type IntoIter = std::slice::Iter<'a, MaterialTotal>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Display-ready total
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedTotal {
    pub key: String,
    pub value: String,
    pub unit: String,
    pub label: String,
}

/// Fixed-point text with ties rounded away from zero, as the viewer shows it.
fn to_fixed(value: f64, decimals: usize) -> String {
    let scale = 10f64.powi(decimals as i32);
    format!("{:.*}", decimals, (value * scale).round() / scale)
}

impl FormattedTotal {
    fn from_total(total: &MaterialTotal) -> Self {
        let value = match total.category {
            MaterialCategory::Unit => to_fixed(total.value, 0),
            _ => to_fixed(total.value, 3),
        };
        Self {
            key: total.key.clone(),
            value,
            unit: total.unit.clone(),
            label: total.label.clone(),
        }
    }
}

/// Result of one aggregation call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialReport {
    pub totals: MaterialTotals,
    /// Non-zero totals only, in registry order
    pub formatted: Vec<FormattedTotal>,
}

impl MaterialReport {
    fn from_totals(totals: MaterialTotals) -> Self {
        let formatted = totals
            .iter()
            .filter(|total| total.value > 0.0)
            .map(FormattedTotal::from_total)
            .collect();
        Self { totals, formatted }
    }

    pub fn has_results(&self) -> bool {
        !self.formatted.is_empty()
    }
}

/// Receives the aggregation result for display
pub trait ResultsPresenter {
    fn present(&mut self, report: &MaterialReport);
}

impl<F: FnMut(&MaterialReport)> ResultsPresenter for F {
    fn present(&mut self, report: &MaterialReport) {
        self(report)
    }
}

/// Keeps every report it is handed
#[derive(Debug, Default)]
pub struct CollectingPresenter {
    pub reports: Vec<MaterialReport>,
}

impl ResultsPresenter for CollectingPresenter {
    fn present(&mut self, report: &MaterialReport) {
        self.reports.push(report.clone());
    }
}

/// Sum the stored calculation values of every part of every model by
/// category key and hand the report to `presenter`.
///
/// Parts that were never scanned are skipped. Totals are rebuilt on every
/// call.
pub fn aggregate_all<P>(
    models: &[SceneNode],
    store: &MetadataStore,
    registry: &MaterialRegistry,
    presenter: &mut P,
) -> MaterialReport
where
    P: ResultsPresenter + ?Sized,
{
    let mut totals = MaterialTotals::from_registry(registry);

    if models.is_empty() {
        tracing::warn!("No models to aggregate; load a model first");
        let report = MaterialReport {
            totals,
            formatted: Vec::new(),
        };
        presenter.present(&report);
        return report;
    }

    for model in models {
        for (node, _) in model.parts() {
            let Some(part) = store.part(&node.id) else {
                continue;
            };
            let key = registry.key(part.material_type());
            if !totals.add(key, part.calculation_value()) {
                tracing::debug!("No total for key '{}' of part {}", key, node.id);
            }
        }
    }

    let report = MaterialReport::from_totals(totals);
    tracing::info!(
        "Material totals: {}",
        report
            .formatted
            .iter()
            .map(|total| format!("{} {} {}", total.key, total.value, total.unit))
            .collect::<Vec<_>>()
            .join(", ")
    );
    presenter.present(&report);
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Primitive;
    use crate::scan::Scanner;
    use crate::units::SceneUnit;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn model() -> SceneNode {
        let cuboid = |x, y, z| Primitive::cuboid(Vector3::new(x, y, z), false).to_geometry();
        SceneNode::group(
            "m",
            "Bench",
            vec![
                SceneNode::part("m/0", "Chapa tampo", cuboid(1000.0, 500.0, 2.0)),
                SceneNode::part("m/1", "Parafuso", cuboid(10.0, 10.0, 30.0)),
                SceneNode::part("m/2", "Parafuso", cuboid(10.0, 10.0, 30.0)),
                SceneNode::part("m/3", "Barra", cuboid(20.0, 20.0, 800.0)),
            ],
        )
    }

    #[test]
    fn test_ties_round_away_from_zero() {
        assert_eq!(to_fixed(0.0625, 3), "0.063");
        assert_eq!(to_fixed(0.0624, 3), "0.062");
        assert_eq!(to_fixed(2.5, 0), "3");
        assert_eq!(to_fixed(1.5, 0), "2");
        assert_eq!(to_fixed(0.0, 3), "0.000");
    }

    #[test]
    fn test_empty_models_present_empty_report() {
        let store = MetadataStore::new();
        let mut presenter = CollectingPresenter::default();
        let report = aggregate_all(&[], &store, &MaterialRegistry::default(), &mut presenter);

        assert!(!report.has_results());
        assert_eq!(report.totals.len(), 4);
        assert!(report.totals.iter().all(|total| total.value == 0.0));
        assert_eq!(presenter.reports.len(), 1);
    }

    #[test]
    fn test_totals_by_category() {
        let models = vec![model()];
        let mut store = MetadataStore::new();
        Scanner::new(SceneUnit::Millimeter).scan_all(&models, &mut store);

        let mut seen = 0;
        let report = aggregate_all(
            &models,
            &store,
            &MaterialRegistry::default(),
            &mut |report: &MaterialReport| seen = report.formatted.len(),
        );

        assert_eq!(report.totals.value("UNITARIO"), 2.0);
        assert_relative_eq!(report.totals.value("LINEAR"), 800.0);
        assert_eq!(report.totals.value("VOLUME"), 0.0);
        assert!(report.totals.value("CHAPA") > 1.0);

        let keys: Vec<_> = report.formatted.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["CHAPA", "LINEAR", "UNITARIO"]);
        assert_eq!(report.formatted[1].value, "800.000");
        assert_eq!(report.formatted[1].unit, "mm");
        assert_eq!(report.formatted[2].value, "2");
        assert_eq!(seen, 3);
    }

    #[test]
    fn test_unscanned_parts_are_skipped() {
        let models = vec![model()];
        let store = MetadataStore::new();
        let report = aggregate_all(&models, &store, &MaterialRegistry::default(), &mut |_: &MaterialReport| {});
        assert!(!report.has_results());
    }

    #[test]
    fn test_duplicate_keys_keep_first_role() {
        let registry = MaterialRegistry {
            volume: "CHAPA (m³)".to_string(),
            ..MaterialRegistry::default()
        };
        let totals = MaterialTotals::from_registry(&registry);
        assert_eq!(totals.len(), 3);
        assert_eq!(totals.get("CHAPA").unwrap().category, MaterialCategory::Sheet);
    }
}
