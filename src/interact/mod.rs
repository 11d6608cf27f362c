//! # Interaction Core
//!
//! Everything between a pointer event and the info panel: per-system
//! visibility toggling, ray-based part picking, screen-space label
//! projection, and the selection state machine.
//!
//! The camera is consumed through the [`CameraRig`] seam rather than as raw
//! matrices, so the whole interaction path can be driven by synthetic rigs
//! in tests.

pub mod labels;
pub mod picking;
pub mod selection;
pub mod visibility;

pub use labels::{LabelPlacement, LabelProjector};
pub use picking::{PickResult, PickingEngine};
pub use selection::{PanelUpdate, PanelViewModel, SelectionController, SelectionState};

use cgmath::Vector3;

use crate::gfx::geometry::Ray;

/// Ray-casting and projection capability supplied by the camera.
///
/// The interaction core never builds view or projection matrices itself; it
/// asks the rig for a world ray through a normalized-device point, or for
/// the normalized-device image of a world point. A returned NDC z of 1.0 or
/// more means the point is behind the camera.
pub trait CameraRig {
    /// World-space ray through the given normalized device coordinates.
    fn ray_from_ndc(&self, ndc_x: f32, ndc_y: f32) -> Ray;

    /// Normalized-device image of a world point.
    fn project_to_ndc(&self, world: Vector3<f32>) -> Vector3<f32>;
}

#[cfg(test)]
pub(crate) mod test_rigs {
    use super::*;

    /// Rig that casts the same world ray for every pointer position.
    pub struct FixedRig {
        pub ray: Ray,
    }

    impl CameraRig for FixedRig {
        fn ray_from_ndc(&self, _ndc_x: f32, _ndc_y: f32) -> Ray {
            self.ray
        }

        fn project_to_ndc(&self, _world: Vector3<f32>) -> Vector3<f32> {
            Vector3::new(0.0, 0.0, 0.5)
        }
    }

    /// Rig that reads world x/y as NDC directly and reports a fixed depth,
    /// so label tests can place anchors in NDC space literally.
    pub struct PassthroughRig {
        pub ndc_z: f32,
    }

    impl CameraRig for PassthroughRig {
        fn ray_from_ndc(&self, ndc_x: f32, ndc_y: f32) -> Ray {
            Ray::new(
                Vector3::new(ndc_x, ndc_y, -10.0),
                Vector3::new(0.0, 0.0, 1.0),
            )
        }

        fn project_to_ndc(&self, world: Vector3<f32>) -> Vector3<f32> {
            Vector3::new(world.x, world.y, self.ndc_z)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_rigs::FixedRig;
    use super::*;
    use crate::gfx::geometry::{Aabb, Ray};
    use crate::registry::tests::test_part;
    use crate::registry::{AnatomyRegistry, GeometryRef};

    /// Registry from the walkthrough scenario: a skeletal system with the
    /// skull and seven cervical vertebrae off to one side, and a circulatory
    /// system whose heart sits 4 units down the probe ray.
    fn walkthrough_registry() -> AnatomyRegistry {
        let mut registry = AnatomyRegistry::new();
        registry.declare_system("skeletal").unwrap();
        registry.declare_system("circulatory").unwrap();

        registry
            .register(test_part("Skull", "skeletal", Vector3::new(10.0, 6.0, 0.0)))
            .unwrap();
        for i in 1..=7 {
            registry
                .register(test_part(
                    &format!("C{}", i),
                    "skeletal",
                    Vector3::new(10.0, 4.5 - i as f32 * 0.6, 0.0),
                ))
                .unwrap();
        }

        let mut heart = test_part("Heart", "circulatory", Vector3::new(0.0, 0.0, 4.5));
        heart.geometry = GeometryRef {
            node_index: 0,
            bounds: Aabb::new(Vector3::new(-0.5, -0.5, 4.0), Vector3::new(0.5, 0.5, 5.0)),
            anchor: Vector3::new(0.0, 0.0, 4.5),
        };
        registry.register(heart).unwrap();

        registry
    }

    #[test]
    fn click_to_panel_and_back_through_visibility() {
        let mut registry = walkthrough_registry();
        let rig = FixedRig {
            ray: Ray::new(Vector3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 1.0)),
        };
        let picker = PickingEngine::new();
        let mut selection = SelectionController::new();

        // The probe ray intersects only the heart, 4 units out.
        let hit = picker
            .pick((400.0, 300.0), (800.0, 600.0), &rig, &registry)
            .unwrap();
        assert_eq!(hit.part_id, "Heart");
        assert!((hit.distance - 4.0).abs() < 1e-5);

        let update = selection
            .on_pick(Some(&hit.part_id), &registry)
            .unwrap()
            .unwrap();
        match update {
            PanelUpdate::Show(vm) => assert_eq!(vm.name, "Heart"),
            PanelUpdate::Hide => panic!("expected a shown panel"),
        }
        assert_eq!(selection.selected_part(), Some("Heart"));

        // Hiding the circulatory system makes the same click a miss, and a
        // miss does not deselect.
        visibility::set_system_visible(&mut registry, "circulatory", false).unwrap();
        assert!(picker
            .pick((400.0, 300.0), (800.0, 600.0), &rig, &registry)
            .is_none());
        assert!(selection.on_pick(None, &registry).unwrap().is_none());
        assert_eq!(selection.selected_part(), Some("Heart"));

        visibility::set_system_visible(&mut registry, "circulatory", true).unwrap();
        let hit = picker.pick((400.0, 300.0), (800.0, 600.0), &rig, &registry);
        assert_eq!(hit.unwrap().part_id, "Heart");
    }
}
