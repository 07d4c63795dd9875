// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Part selection, global X-ray mode and ray picking
//!
//! The renderer owns materials and the transform gizmo. The controller only
//! tracks which parts carry a saved original material and tells the renderer
//! what to do through [`SelectionEffect`]s.

use crate::geometry::Ray;
use crate::scene::{NodeId, SceneNode};
use ahash::AHashSet;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Parts with this name are the floor and never highlighted or picked
pub const FLOOR_NAME: &str = "Chao";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum SelectionEffect {
    /// Swap in the X-ray material, first saving the current one if asked
    ApplyXRay { id: NodeId, save_original: bool },
    /// Put the saved original material back
    Restore { id: NodeId },
    AttachGizmo { id: NodeId },
    DetachGizmo,
}

/// What the transform gizmo follows on selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GizmoMode {
    /// Stays on the model root
    #[default]
    Model,
    /// Moves to the selected part
    Part,
}

#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    selected: Option<NodeId>,
    xray_mode: bool,
    gizmo_mode: GizmoMode,
    saved: AHashSet<NodeId>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&NodeId> {
        self.selected.as_ref()
    }

    pub fn xray_mode(&self) -> bool {
        self.xray_mode
    }

    pub fn gizmo_mode(&self) -> GizmoMode {
        self.gizmo_mode
    }

    pub fn set_gizmo_mode(&mut self, mode: GizmoMode) {
        self.gizmo_mode = mode;
    }

    /// Whether the part currently carries a saved original material
    pub fn is_highlighted(&self, id: &NodeId) -> bool {
        self.saved.contains(id)
    }

    fn apply(&mut self, id: &NodeId, effects: &mut Vec<SelectionEffect>) {
        let save_original = self.saved.insert(id.clone());
        effects.push(SelectionEffect::ApplyXRay {
            id: id.clone(),
            save_original,
        });
    }

    fn restore(&mut self, id: &NodeId, effects: &mut Vec<SelectionEffect>) {
        if self.saved.remove(id) {
            effects.push(SelectionEffect::Restore { id: id.clone() });
        }
    }

    /// Select a part, or clear the selection with `None`.
    ///
    /// Selecting the current part again deselects it.
    pub fn select(&mut self, target: Option<&NodeId>) -> Vec<SelectionEffect> {
        let mut effects = Vec::new();

        if let Some(current) = self.selected.clone() {
            // in X-ray mode every part keeps the X-ray material
            if Some(&current) != target && !self.xray_mode {
                self.restore(&current, &mut effects);
            }
        }

        match target {
            Some(id) if self.selected.as_ref() == Some(id) => {
                self.restore(id, &mut effects);
                self.selected = None;
                effects.push(SelectionEffect::DetachGizmo);
            }
            Some(id) => {
                self.apply(id, &mut effects);
                self.selected = Some(id.clone());
                if self.gizmo_mode == GizmoMode::Part {
                    effects.push(SelectionEffect::DetachGizmo);
                    effects.push(SelectionEffect::AttachGizmo { id: id.clone() });
                }
            }
            None => {
                self.selected = None;
                effects.push(SelectionEffect::DetachGizmo);
            }
        }

        effects
    }

    /// Switch global X-ray mode on every non-floor part of every model
    pub fn toggle_xray(&mut self, models: &[SceneNode], activate: bool) -> Vec<SelectionEffect> {
        self.xray_mode = activate;
        let mut effects = Vec::new();

        for model in models {
            for (node, _) in model.parts().filter(|(node, _)| node.name != FLOOR_NAME) {
                if activate {
                    if !self.saved.contains(&node.id) {
                        self.apply(&node.id, &mut effects);
                    }
                } else {
                    self.restore(&node.id, &mut effects);
                }
            }
        }

        tracing::debug!("X-ray {}: {} effects", if activate { "on" } else { "off" }, effects.len());
        effects
    }

    /// Handle a pointer press: pick under the cursor and update the selection.
    /// Returns `None` when the press should not pick.
    pub fn click(
        &mut self,
        models: &[SceneNode],
        camera: &PerspectiveCamera,
        pointer: &PointerInput,
    ) -> Option<Vec<SelectionEffect>> {
        if !pointer.should_pick() {
            return None;
        }
        let ray = camera.ray_from_screen(pointer.x, pointer.y, pointer.viewport_width, pointer.viewport_height);
        let hit = pick(models, &ray);
        match &hit {
            Some(id) => tracing::debug!("Picked {}", id),
            None => tracing::debug!("Background click, selection cleared"),
        }
        Some(self.select(hit.as_ref()))
    }
}

/// Nearest part hit by the ray, floor excluded
pub fn pick(models: &[SceneNode], ray: &Ray) -> Option<NodeId> {
    models
        .iter()
        .flat_map(|model| model.parts())
        .filter(|(node, _)| node.name != FLOOR_NAME)
        .filter_map(|(node, geometry)| ray.intersect_geometry(geometry).map(|t| (t, node)))
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, node)| node.id.clone())
}

/// Pointer press as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerInput {
    /// Viewport coordinates in pixels, origin top-left
    pub x: f64,
    pub y: f64,
    pub viewport_width: f64,
    pub viewport_height: f64,
    /// Button that changed (0 = primary)
    pub button: u8,
    /// Bitmask of held buttons (2 = secondary, 4 = middle)
    pub buttons: u8,
    pub gizmo_dragging: bool,
    pub orbit_enabled: bool,
}

impl PointerInput {
    pub fn primary(x: f64, y: f64, viewport_width: f64, viewport_height: f64) -> Self {
        Self {
            x,
            y,
            viewport_width,
            viewport_height,
            button: 0,
            buttons: 1,
            gizmo_dragging: false,
            orbit_enabled: true,
        }
    }

    /// Only primary presses that are neither gizmo drags nor orbit drags pick
    pub fn should_pick(&self) -> bool {
        if self.gizmo_dragging || self.button != 0 {
            return false;
        }
        !(self.orbit_enabled && (self.buttons == 2 || self.buttons == 4))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerspectiveCamera {
    pub position: Point3<f64>,
    pub target: Point3<f64>,
    pub up: Vector3<f64>,
    /// Vertical field of view in degrees
    pub fov: f64,
    pub aspect: f64,
}

impl PerspectiveCamera {
    pub fn new(position: Point3<f64>, target: Point3<f64>, fov: f64, aspect: f64) -> Self {
        Self {
            position,
            target,
            up: Vector3::y(),
            fov,
            aspect,
        }
    }

    /// World ray through a viewport pixel, via normalized device coordinates
    pub fn ray_from_screen(&self, x: f64, y: f64, width: f64, height: f64) -> Ray {
        let ndc_x = if width > 0.0 { (x / width) * 2.0 - 1.0 } else { 0.0 };
        let ndc_y = if height > 0.0 { -(y / height) * 2.0 + 1.0 } else { 0.0 };

        let forward = (self.target - self.position)
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(|| -Vector3::z());
        let right = forward
            .cross(&self.up)
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(Vector3::x);
        let up = right.cross(&forward);

        let half_height = (self.fov.to_radians() / 2.0).tan();
        let half_width = half_height * self.aspect;
        let direction = forward + right * (ndc_x * half_width) + up * (ndc_y * half_height);

        Ray::new(self.position, direction)
    }
}
