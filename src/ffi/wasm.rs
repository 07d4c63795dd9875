// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! WASM bindings using wasm-bindgen
//!
//! Everything crosses the boundary as JSON so the host can keep its own
//! scene representation.

use crate::io::SceneFile;
use crate::materials::{MaterialClassifier, MaterialRegistry};
use crate::scan::{aggregate_all, MaterialReport, MetadataStore, ScanReport, Scanner};
use crate::units::{Dimensions, SceneUnit};
use wasm_bindgen::prelude::*;

fn js_error(context: &str, err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{}: {}", context, err))
}

/// Scan a JSON scene file and return the JSON scan report.
///
/// `unit` overrides the unit declared in the scene; `registry_json` may be
/// empty to use the default labels.
#[wasm_bindgen]
pub fn scan_scene_json(scene_json: &str, unit: Option<String>, registry_json: &str) -> Result<String, JsValue> {
    let file = SceneFile::from_json(scene_json).map_err(|e| js_error("Scene parse error", e))?;
    let registry: MaterialRegistry = if registry_json.trim().is_empty() {
        MaterialRegistry::default()
    } else {
        serde_json::from_str(registry_json).map_err(|e| js_error("Registry parse error", e))?
    };

    let scene = file.into_scene("model");
    let unit = unit
        .as_deref()
        .map(SceneUnit::parse_lenient)
        .or(scene.unit)
        .unwrap_or_default();

    let scanner = Scanner::new(unit).with_registry(registry.clone());
    let mut store = MetadataStore::new();
    scanner.scan_all(&scene.models, &mut store);
    let materials = aggregate_all(&scene.models, &store, &registry, &mut |_: &MaterialReport| {});

    let report = ScanReport::new(unit, &scene.models, &store, materials);
    serde_json::to_string(&report).map_err(|e| js_error("JSON serialization error", e))
}

/// Classify a part from its name and millimeter dimensions.
/// Returns the category name, or `undefined` for degenerate dimensions.
#[wasm_bindgen]
pub fn classify_part(name: &str, length: f64, width: f64, height: f64) -> Option<String> {
    MaterialClassifier::default()
        .classify(name, &Dimensions::new(length, width, height))
        .map(|category| category.as_str().to_string())
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    crate::VERSION.to_string()
}
