// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! I/O module - model loading, discovery and report export

mod scene_file;
mod stl;

pub use scene_file::{LoadedScene, NodeRecord, SceneFile};
pub use stl::{model_from_geometry, read_geometry, write_geometry};

use crate::scan::ScanReport;
use crate::scene::{NodeId, UniqueIds};
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// File extensions accepted by [`load_model`]
pub const MODEL_EXTENSIONS: [&str; 2] = ["json", "stl"];

#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("unsupported model format: {0}")]
    UnsupportedFormat(PathBuf),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid scene file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
}

fn is_model_file(path: &Path) -> bool {
    extension(path)
        .map(|ext| MODEL_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Load a JSON scene or an STL mesh
pub fn load_model(path: impl AsRef<Path>) -> Result<LoadedScene, ModelLoadError> {
    let path = path.as_ref();
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "model".to_string());
    let io_error = |source| ModelLoadError::Io {
        path: path.to_path_buf(),
        source,
    };

    match extension(path).as_deref() {
        Some("json") => {
            let source = fs::read_to_string(path).map_err(io_error)?;
            let file = SceneFile::from_json(&source).map_err(|source| ModelLoadError::Json {
                path: path.to_path_buf(),
                source,
            })?;
            Ok(file.into_scene(&stem))
        }
        Some("stl") => {
            let mut file = File::open(path).map_err(io_error)?;
            let geometry = read_geometry(&mut file).map_err(io_error)?;
            Ok(LoadedScene {
                unit: None,
                models: vec![model_from_geometry(NodeId::new(stem.clone()), &stem, geometry)],
            })
        }
        _ => Err(ModelLoadError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Loads models that share one metadata store.
///
/// Ids stay unique across every file loaded through the same loader, so two
/// `bracket.stl` files from different directories never overwrite each
/// other's metadata.
#[derive(Debug, Default)]
pub struct ModelLoader {
    ids: UniqueIds,
}

impl ModelLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<LoadedScene, ModelLoadError> {
        let mut scene = load_model(path)?;
        self.ids.assign(&mut scene.models);
        Ok(scene)
    }
}

/// Expand files and directories into a sorted list of model files
pub fn discover_models(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut models = Vec::new();

    for input in inputs {
        if input.is_dir() {
            for entry in WalkDir::new(input)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file() && is_model_file(e.path()))
            {
                models.push(entry.path().to_path_buf());
            }
        } else if input.is_file() {
            models.push(input.clone());
        } else {
            anyhow::bail!("Input not found: {}", input.display());
        }
    }

    models.sort();
    models.dedup();
    Ok(models)
}

/// Write a scan report as pretty-printed JSON
pub fn export_report_json(report: &ScanReport, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let content = serde_json::to_string_pretty(report).context("Failed to serialize scan report")?;
    fs::write(path, content)
        .with_context(|| format!("Failed to write report: {}", path.display()))?;
    Ok(())
}
