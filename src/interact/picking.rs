//! # Part Picking
//!
//! Resolves a screen-space pointer position to the nearest visible
//! anatomical part along the corresponding world ray.
//!
//! 1. **Pointer to NDC**: surface pixels become normalized device
//!    coordinates, origin at the surface center, Y flipped.
//! 2. **NDC to ray**: the [`CameraRig`] turns the point into a world ray.
//! 3. **Intersection**: the ray is tested against the bounding volumes of
//!    visible parts only; parts of hidden systems are skipped before any
//!    intersection math, so hidden geometry can never shadow a visible hit.
//! 4. **Resolution**: nearest hit wins; exact-distance ties go to the
//!    lexicographically smaller part id so results are deterministic.
//!
//! A miss is the normal no-selection outcome, not an error.

use cgmath::Vector3;
use log::debug;

use crate::interact::CameraRig;
use crate::registry::AnatomyRegistry;

/// Result of a successful pick.
#[derive(Debug, Clone)]
pub struct PickResult {
    /// Id of the picked part.
    pub part_id: String,
    /// Distance from the ray origin to the intersection point.
    pub distance: f32,
    /// World-space intersection point.
    pub point: Vector3<f32>,
}

/// Resolves pointer positions against the registry's bounding volumes.
#[derive(Debug, Default)]
pub struct PickingEngine;

impl PickingEngine {
    pub fn new() -> Self {
        Self
    }

    /// Converts surface-pixel coordinates to normalized device coordinates.
    ///
    /// Screen-down Y becomes NDC-up Y.
    pub fn pointer_to_ndc(
        pointer_x: f32,
        pointer_y: f32,
        surface_width: f32,
        surface_height: f32,
    ) -> (f32, f32) {
        let ndc_x = (2.0 * pointer_x) / surface_width - 1.0;
        let ndc_y = 1.0 - (2.0 * pointer_y) / surface_height;
        (ndc_x, ndc_y)
    }

    /// Picks the nearest visible part under the pointer, if any.
    pub fn pick(
        &self,
        pointer: (f32, f32),
        surface_size: (f32, f32),
        rig: &dyn CameraRig,
        registry: &AnatomyRegistry,
    ) -> Option<PickResult> {
        let (ndc_x, ndc_y) = Self::pointer_to_ndc(pointer.0, pointer.1, surface_size.0, surface_size.1);
        let ray = rig.ray_from_ndc(ndc_x, ndc_y);

        let mut closest: Option<PickResult> = None;

        for system in registry.systems() {
            // Hidden systems are excluded up front, never intersected.
            if !system.visible {
                continue;
            }

            for part_id in system.member_ids() {
                // Member lists only hold registered ids.
                let Ok(part) = registry.get_part(part_id) else {
                    continue;
                };

                if let Some(distance) = part.geometry.bounds.intersect_ray(&ray) {
                    let closer = match &closest {
                        None => true,
                        Some(best) => {
                            distance < best.distance
                                || (distance == best.distance && part.id < best.part_id)
                        }
                    };
                    if closer {
                        closest = Some(PickResult {
                            part_id: part.id.clone(),
                            distance,
                            point: ray.point_at(distance),
                        });
                    }
                }
            }
        }

        match &closest {
            Some(result) => debug!(
                "pick at ndc ({:.3}, {:.3}) hit '{}' at distance {:.3}",
                ndc_x, ndc_y, result.part_id, result.distance
            ),
            None => debug!("pick at ndc ({:.3}, {:.3}) missed", ndc_x, ndc_y),
        }

        closest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::{Aabb, Ray};
    use crate::interact::test_rigs::FixedRig;
    use crate::interact::visibility;
    use crate::registry::tests::test_part;
    use crate::registry::GeometryRef;
    use rand::Rng;

    const SURFACE: (f32, f32) = (800.0, 600.0);
    const CENTER: (f32, f32) = (400.0, 300.0);

    fn probe_rig() -> FixedRig {
        FixedRig {
            ray: Ray::new(Vector3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 1.0)),
        }
    }

    fn boxed_part(id: &str, system_id: &str, min_z: f32, max_z: f32) -> crate::registry::AnatomyPart {
        let mut part = test_part(id, system_id, Vector3::new(0.0, 0.0, (min_z + max_z) * 0.5));
        part.geometry = GeometryRef {
            node_index: 0,
            bounds: Aabb::new(
                Vector3::new(-0.5, -0.5, min_z),
                Vector3::new(0.5, 0.5, max_z),
            ),
            anchor: Vector3::new(0.0, 0.0, (min_z + max_z) * 0.5),
        };
        part
    }

    #[test]
    fn pointer_to_ndc_centers_and_flips_y() {
        assert_eq!(
            PickingEngine::pointer_to_ndc(400.0, 300.0, 800.0, 600.0),
            (0.0, 0.0)
        );
        assert_eq!(
            PickingEngine::pointer_to_ndc(0.0, 0.0, 800.0, 600.0),
            (-1.0, 1.0)
        );
        assert_eq!(
            PickingEngine::pointer_to_ndc(800.0, 600.0, 800.0, 600.0),
            (1.0, -1.0)
        );
    }

    #[test]
    fn nearest_of_two_overlapping_volumes_wins() {
        let mut registry = AnatomyRegistry::new();
        registry.declare_system("digestive").unwrap();
        registry
            .register(boxed_part("liver", "digestive", 5.0, 7.0))
            .unwrap();
        registry
            .register(boxed_part("stomach", "digestive", 3.0, 6.0))
            .unwrap();

        let hit = PickingEngine::new()
            .pick(CENTER, SURFACE, &probe_rig(), &registry)
            .unwrap();
        assert_eq!(hit.part_id, "stomach");
        assert!((hit.distance - 3.0).abs() < 1e-5);
        assert!((hit.point.z - 3.0).abs() < 1e-5);
    }

    #[test]
    fn exact_distance_tie_goes_to_smaller_id() {
        let mut registry = AnatomyRegistry::new();
        registry.declare_system("respiratory").unwrap();
        // Registration order deliberately reversed relative to the ids.
        registry
            .register(boxed_part("lung_right", "respiratory", 2.0, 3.0))
            .unwrap();
        registry
            .register(boxed_part("lung_left", "respiratory", 2.0, 3.0))
            .unwrap();

        let hit = PickingEngine::new()
            .pick(CENTER, SURFACE, &probe_rig(), &registry)
            .unwrap();
        assert_eq!(hit.part_id, "lung_left");
    }

    #[test]
    fn miss_returns_none() {
        let mut registry = AnatomyRegistry::new();
        registry.declare_system("skeletal").unwrap();
        registry
            .register(test_part("skull", "skeletal", Vector3::new(10.0, 0.0, 5.0)))
            .unwrap();

        assert!(PickingEngine::new()
            .pick(CENTER, SURFACE, &probe_rig(), &registry)
            .is_none());
    }

    #[test]
    fn never_picks_a_part_of_a_hidden_system() {
        // All parts sit on the probe ray at staggered depths; across random
        // visibility configurations the winner's system must be visible.
        let system_ids = ["a", "b", "c", "d"];
        let mut registry = AnatomyRegistry::new();
        for (i, system_id) in system_ids.iter().enumerate() {
            registry.declare_system(system_id).unwrap();
            for j in 0..3 {
                let near = 1.0 + (i * 3 + j) as f32;
                registry
                    .register(boxed_part(
                        &format!("{}_{}", system_id, j),
                        system_id,
                        near,
                        near + 0.5,
                    ))
                    .unwrap();
            }
        }

        let picker = PickingEngine::new();
        let rig = probe_rig();
        let mut rng = rand::rng();

        for _ in 0..200 {
            let mut any_visible = false;
            for system_id in &system_ids {
                let visible = rng.random_bool(0.5);
                visibility::set_system_visible(&mut registry, system_id, visible).unwrap();
                any_visible |= visible;
            }

            match picker.pick(CENTER, SURFACE, &rig, &registry) {
                Some(hit) => {
                    let part = registry.get_part(&hit.part_id).unwrap();
                    assert!(registry.get_system(&part.system_id).unwrap().visible);
                }
                None => assert!(!any_visible),
            }
        }
    }

    #[test]
    fn hidden_near_geometry_does_not_shadow_visible_far_geometry() {
        let mut registry = AnatomyRegistry::new();
        registry.declare_system("muscular").unwrap();
        registry.declare_system("skeletal").unwrap();
        registry
            .register(boxed_part("pectorals", "muscular", 2.0, 3.0))
            .unwrap();
        registry
            .register(boxed_part("sternum", "skeletal", 4.0, 5.0))
            .unwrap();

        visibility::set_system_visible(&mut registry, "muscular", false).unwrap();

        let hit = PickingEngine::new()
            .pick(CENTER, SURFACE, &probe_rig(), &registry)
            .unwrap();
        assert_eq!(hit.part_id, "sternum");
        assert!((hit.distance - 4.0).abs() < 1e-5);
    }
}
