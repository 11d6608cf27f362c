//! # Label Projection
//!
//! Computes, once per frame, where each part's label anchor lands on screen
//! so the overlay layer can position its elements. The projector only does
//! the math; element lifecycle (create lazily, reuse, hide rather than
//! destroy) belongs to the chrome consuming the placements.

use crate::interact::CameraRig;
use crate::registry::AnatomyRegistry;

/// Screen placement of one part's label for the current frame.
///
/// When `shown` is false the coordinates are unspecified and must not be
/// rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelPlacement {
    pub part_id: String,
    pub screen_x: f32,
    pub screen_y: f32,
    pub shown: bool,
}

impl LabelPlacement {
    fn hidden(part_id: &str) -> Self {
        Self {
            part_id: part_id.to_string(),
            screen_x: 0.0,
            screen_y: 0.0,
            shown: false,
        }
    }
}

/// Projects visible parts' anchors to surface pixels each frame.
#[derive(Debug)]
pub struct LabelProjector {
    /// Global label toggle; when off every placement is hidden.
    pub show_labels: bool,
}

impl LabelProjector {
    pub fn new() -> Self {
        Self { show_labels: true }
    }

    /// One placement per part, in `all_parts` order, so the overlay layer
    /// can diff deterministically frame to frame.
    ///
    /// A placement is hidden when labels are globally off, the part's system
    /// is hidden, or the anchor projects behind the camera (NDC z >= 1).
    pub fn project(
        &self,
        rig: &dyn CameraRig,
        surface_width: f32,
        surface_height: f32,
        registry: &AnatomyRegistry,
    ) -> Vec<LabelPlacement> {
        registry
            .all_parts()
            .into_iter()
            .map(|part| {
                let system_visible = registry
                    .get_system(&part.system_id)
                    .map(|system| system.visible)
                    .unwrap_or(false);

                if !self.show_labels || !system_visible {
                    return LabelPlacement::hidden(&part.id);
                }

                let ndc = rig.project_to_ndc(part.geometry.anchor);
                if ndc.z >= 1.0 {
                    return LabelPlacement::hidden(&part.id);
                }

                LabelPlacement {
                    part_id: part.id.clone(),
                    // NDC Y grows upward, pixels grow downward.
                    screen_x: (ndc.x * 0.5 + 0.5) * surface_width,
                    screen_y: (-ndc.y * 0.5 + 0.5) * surface_height,
                    shown: true,
                }
            })
            .collect()
    }
}

impl Default for LabelProjector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interact::test_rigs::PassthroughRig;
    use crate::interact::visibility;
    use crate::registry::tests::test_part;
    use cgmath::Vector3;

    fn labeled_registry() -> AnatomyRegistry {
        let mut registry = AnatomyRegistry::new();
        registry.declare_system("nervous").unwrap();
        registry.declare_system("digestive").unwrap();
        registry
            .register(test_part("brain", "nervous", Vector3::new(0.0, 0.0, 0.0)))
            .unwrap();
        registry
            .register(test_part("stomach", "digestive", Vector3::new(0.5, -0.5, 0.0)))
            .unwrap();
        registry
    }

    #[test]
    fn ndc_maps_to_pixels_with_flipped_y() {
        let registry = labeled_registry();
        let rig = PassthroughRig { ndc_z: 0.5 };
        let placements = LabelProjector::new().project(&rig, 800.0, 600.0, &registry);

        // Anchor at NDC origin lands on the surface center.
        assert_eq!(placements[0].part_id, "brain");
        assert!(placements[0].shown);
        assert_eq!(placements[0].screen_x, 400.0);
        assert_eq!(placements[0].screen_y, 300.0);

        // NDC (+0.5, -0.5): right of center and below it in pixels.
        assert_eq!(placements[1].part_id, "stomach");
        assert_eq!(placements[1].screen_x, 600.0);
        assert_eq!(placements[1].screen_y, 450.0);
    }

    #[test]
    fn behind_camera_anchor_is_hidden() {
        let registry = labeled_registry();
        let rig = PassthroughRig { ndc_z: 1.0 };
        let placements = LabelProjector::new().project(&rig, 800.0, 600.0, &registry);
        assert!(placements.iter().all(|p| !p.shown));
    }

    #[test]
    fn hidden_system_and_global_toggle_suppress_labels() {
        let mut registry = labeled_registry();
        let rig = PassthroughRig { ndc_z: 0.5 };

        visibility::set_system_visible(&mut registry, "nervous", false).unwrap();
        let placements = LabelProjector::new().project(&rig, 800.0, 600.0, &registry);
        assert!(!placements[0].shown);
        assert!(placements[1].shown);

        let mut projector = LabelProjector::new();
        projector.show_labels = false;
        let placements = projector.project(&rig, 800.0, 600.0, &registry);
        assert!(placements.iter().all(|p| !p.shown));
    }

    #[test]
    fn output_order_matches_all_parts() {
        let registry = labeled_registry();
        let rig = PassthroughRig { ndc_z: 0.5 };
        let placements = LabelProjector::new().project(&rig, 800.0, 600.0, &registry);

        let expected: Vec<String> = registry
            .all_parts()
            .iter()
            .map(|p| p.id.clone())
            .collect();
        let actual: Vec<String> = placements.iter().map(|p| p.part_id.clone()).collect();
        assert_eq!(actual, expected);
    }
}
