//! # Built-in Anatomy Catalog
//!
//! The stylized human model: six anatomical systems built from generated
//! primitives, each part carrying curated metadata for the info panel. The
//! catalog is declarative data; [`populate`] turns it into scene nodes and
//! registry entries in one pass, which keeps part ids, node indices, and
//! captured bounds consistent by construction.

use cgmath::{Matrix4, Rad, Vector3};

use crate::gfx::geometry::{
    generate_cuboid, generate_cylinder, generate_sphere, generate_torus, GeometryData,
};
use crate::gfx::scene::{SceneGraph, SceneNode};
use crate::registry::{AnatomyPart, AnatomyRegistry, GeometryRef, PartMetadata, RegistryError};

const BONE: [f32; 4] = [0.545, 0.271, 0.075, 1.0];
const MUSCLE: [f32; 4] = [1.0, 0.42, 0.42, 1.0];
const BLOOD: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
const NERVE: [f32; 4] = [1.0, 0.843, 0.0, 1.0];
const ORGAN: [f32; 4] = [1.0, 0.647, 0.0, 1.0];
// Translucent so the heart stays visible between the lungs.
const LUNG: [f32; 4] = [0.529, 0.808, 0.922, 0.7];

/// Primitive shape of one catalog part, in native dimensions.
#[derive(Debug, Clone, Copy)]
pub enum Shape {
    Sphere { radius: f32 },
    Cuboid { width: f32, height: f32, depth: f32 },
    Cylinder { radius_top: f32, radius_bottom: f32, height: f32 },
    Torus { ring_radius: f32, tube_radius: f32 },
}

impl Shape {
    fn geometry(&self) -> GeometryData {
        match *self {
            Shape::Sphere { .. } => generate_sphere(32, 16),
            Shape::Cuboid {
                width,
                height,
                depth,
            } => generate_cuboid(width, height, depth),
            Shape::Cylinder {
                radius_top,
                radius_bottom,
                height,
            } => generate_cylinder(radius_top, radius_bottom, height, 16),
            Shape::Torus {
                ring_radius,
                tube_radius,
            } => generate_torus(ring_radius, tube_radius, 16, 8),
        }
    }

    /// The sphere generator emits a unit sphere; its radius folds into the
    /// node scale. Every other generator is natively sized.
    fn base_scale(&self) -> Vector3<f32> {
        match *self {
            Shape::Sphere { radius } => Vector3::new(radius, radius, radius),
            _ => Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

/// One part of the catalog, before it becomes a node and a registry entry.
#[derive(Debug, Clone)]
pub struct PartSpec {
    pub id: String,
    pub display_name: String,
    pub shape: Shape,
    pub position: Vector3<f32>,
    pub scale: Vector3<f32>,
    pub rotation_z: f32,
    pub color: [f32; 4],
    pub metadata: PartMetadata,
}

impl PartSpec {
    fn new(
        id: &str,
        display_name: &str,
        shape: Shape,
        position: Vector3<f32>,
        color: [f32; 4],
        metadata: PartMetadata,
    ) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            shape,
            position,
            scale: Vector3::new(1.0, 1.0, 1.0),
            rotation_z: 0.0,
            color,
            metadata,
        }
    }

    fn scaled(mut self, x: f32, y: f32, z: f32) -> Self {
        self.scale = Vector3::new(x, y, z);
        self
    }

    fn rotated_z(mut self, radians: f32) -> Self {
        self.rotation_z = radians;
        self
    }

    /// World transform placing the native-size mesh.
    pub fn transform(&self) -> Matrix4<f32> {
        let base = self.shape.base_scale();
        let s = Vector3::new(
            base.x * self.scale.x,
            base.y * self.scale.y,
            base.z * self.scale.z,
        );
        Matrix4::from_translation(self.position)
            * Matrix4::from_angle_z(Rad(self.rotation_z))
            * Matrix4::from_nonuniform_scale(s.x, s.y, s.z)
    }
}

/// One anatomical system and its parts, in registration order.
#[derive(Debug, Clone)]
pub struct SystemSpec {
    pub id: String,
    pub parts: Vec<PartSpec>,
}

/// The full six-system catalog.
pub fn standard_catalog() -> Vec<SystemSpec> {
    vec![
        skeletal_system(),
        muscular_system(),
        circulatory_system(),
        nervous_system(),
        digestive_system(),
        respiratory_system(),
    ]
}

fn skeletal_system() -> SystemSpec {
    use std::f32::consts::FRAC_PI_2;

    let mut parts = vec![PartSpec::new(
        "skull",
        "Skull",
        Shape::Sphere { radius: 1.0 },
        Vector3::new(0.0, 6.0, 0.0),
        BONE,
        PartMetadata::new(
            "The skull protects the brain and forms the structure of the face.",
            "Protection of brain, support for facial features",
            &["Mandible", "Cervical Vertebrae"],
        ),
    )];

    for i in 0..7 {
        parts.push(PartSpec::new(
            &format!("cervical_c{}", i + 1),
            &format!("Cervical Vertebra {}", i + 1),
            Shape::Cylinder {
                radius_top: 0.3,
                radius_bottom: 0.4,
                height: 0.5,
            },
            Vector3::new(0.0, 4.5 - i as f32 * 0.6, 0.0),
            BONE,
            PartMetadata::new(
                "Cervical vertebrae support the neck and allow head movement.",
                "Support head, enable neck movement",
                &["Skull", "Thoracic Vertebrae"],
            ),
        ));
    }

    for i in 0..12 {
        parts.push(
            PartSpec::new(
                &format!("rib_{:02}", i + 1),
                &format!("Rib {}", i + 1),
                Shape::Torus {
                    ring_radius: 2.0,
                    tube_radius: 0.1,
                },
                Vector3::new(0.0, 1.0, 0.0),
                BONE,
                PartMetadata::new(
                    "Ribs protect the thoracic organs and assist in breathing.",
                    "Protection, breathing assistance",
                    &["Sternum", "Thoracic Vertebrae"],
                ),
            )
            .rotated_z(FRAC_PI_2),
        );
    }

    parts.push(PartSpec::new(
        "pelvis",
        "Pelvis",
        Shape::Cuboid {
            width: 3.0,
            height: 0.8,
            depth: 2.0,
        },
        Vector3::new(0.0, -1.0, 0.0),
        BONE,
        PartMetadata::new(
            "The pelvis connects the spine to the lower limbs.",
            "Support upper body, connect to legs",
            &["Lumbar Vertebrae", "Femur"],
        ),
    ));

    SystemSpec {
        id: "skeletal".to_string(),
        parts,
    }
}

fn muscular_system() -> SystemSpec {
    use std::f32::consts::FRAC_PI_2;

    let biceps_shape = Shape::Cylinder {
        radius_top: 0.4,
        radius_bottom: 0.3,
        height: 2.0,
    };
    let biceps_metadata = PartMetadata::new(
        "The biceps is located in the upper arm and flexes the elbow.",
        "Elbow flexion, forearm supination",
        &["Triceps", "Brachialis"],
    );

    SystemSpec {
        id: "muscular".to_string(),
        parts: vec![
            PartSpec::new(
                "biceps_left",
                "Biceps Brachii (Left)",
                biceps_shape,
                Vector3::new(-2.0, 3.0, 0.0),
                MUSCLE,
                biceps_metadata.clone(),
            )
            .rotated_z(FRAC_PI_2),
            PartSpec::new(
                "biceps_right",
                "Biceps Brachii (Right)",
                biceps_shape,
                Vector3::new(2.0, 3.0, 0.0),
                MUSCLE,
                biceps_metadata,
            )
            .rotated_z(FRAC_PI_2),
            PartSpec::new(
                "pectoralis_major",
                "Pectoralis Major",
                Shape::Cuboid {
                    width: 3.0,
                    height: 0.5,
                    depth: 1.0,
                },
                Vector3::new(0.0, 4.0, 0.5),
                MUSCLE,
                PartMetadata::new(
                    "Large chest muscle involved in shoulder movement.",
                    "Shoulder flexion, adduction, rotation",
                    &["Serratus Anterior", "Deltoid"],
                ),
            ),
        ],
    }
}

fn circulatory_system() -> SystemSpec {
    SystemSpec {
        id: "circulatory".to_string(),
        parts: vec![
            PartSpec::new(
                "heart",
                "Heart",
                Shape::Sphere { radius: 0.8 },
                Vector3::new(0.0, 2.0, 1.0),
                BLOOD,
                PartMetadata::new(
                    "The heart pumps blood throughout the body.",
                    "Pump blood, circulate oxygen and nutrients",
                    &["Lungs", "Aorta", "Vena Cava"],
                ),
            )
            .scaled(1.0, 1.2, 0.8),
            PartSpec::new(
                "aorta",
                "Aorta",
                Shape::Cylinder {
                    radius_top: 0.2,
                    radius_bottom: 0.15,
                    height: 4.0,
                },
                Vector3::new(0.0, 2.0, 0.0),
                BLOOD,
                PartMetadata::new(
                    "The largest artery carrying oxygenated blood from the heart.",
                    "Distribute oxygenated blood",
                    &["Heart", "Carotid Arteries"],
                ),
            ),
        ],
    }
}

fn nervous_system() -> SystemSpec {
    SystemSpec {
        id: "nervous".to_string(),
        parts: vec![
            PartSpec::new(
                "brain",
                "Brain",
                Shape::Sphere { radius: 0.9 },
                Vector3::new(0.0, 6.5, 0.0),
                NERVE,
                PartMetadata::new(
                    "The brain is the center of the nervous system.",
                    "Control body functions, thinking, memory",
                    &["Spinal Cord", "Cranial Nerves"],
                ),
            ),
            PartSpec::new(
                "spinal_cord",
                "Spinal Cord",
                Shape::Cylinder {
                    radius_top: 0.15,
                    radius_bottom: 0.15,
                    height: 8.0,
                },
                Vector3::new(0.0, 1.0, 0.0),
                NERVE,
                PartMetadata::new(
                    "The spinal cord transmits signals between brain and body.",
                    "Signal transmission, reflex control",
                    &["Brain", "Peripheral Nerves"],
                ),
            ),
        ],
    }
}

fn digestive_system() -> SystemSpec {
    SystemSpec {
        id: "digestive".to_string(),
        parts: vec![
            PartSpec::new(
                "stomach",
                "Stomach",
                Shape::Sphere { radius: 0.6 },
                Vector3::new(-0.5, 1.0, 0.5),
                ORGAN,
                PartMetadata::new(
                    "The stomach breaks down food with acid and enzymes.",
                    "Food digestion, nutrient absorption",
                    &["Esophagus", "Small Intestine"],
                ),
            )
            .scaled(1.0, 1.2, 0.8),
            PartSpec::new(
                "liver",
                "Liver",
                Shape::Cuboid {
                    width: 2.0,
                    height: 1.0,
                    depth: 1.5,
                },
                Vector3::new(1.0, 1.0, 0.0),
                ORGAN,
                PartMetadata::new(
                    "The liver processes nutrients and detoxifies blood.",
                    "Detoxification, metabolism, bile production",
                    &["Gallbladder", "Pancreas"],
                ),
            ),
        ],
    }
}

fn respiratory_system() -> SystemSpec {
    let lung_shape = Shape::Sphere { radius: 1.2 };

    SystemSpec {
        id: "respiratory".to_string(),
        parts: vec![
            PartSpec::new(
                "lung_left",
                "Left Lung",
                lung_shape,
                Vector3::new(-1.0, 2.0, 0.0),
                LUNG,
                PartMetadata::new(
                    "The left lung facilitates gas exchange.",
                    "Gas exchange, oxygen intake",
                    &["Right Lung", "Heart", "Diaphragm"],
                ),
            )
            .scaled(0.8, 1.2, 0.9),
            PartSpec::new(
                "lung_right",
                "Right Lung",
                lung_shape,
                Vector3::new(1.0, 2.0, 0.0),
                LUNG,
                PartMetadata::new(
                    "The right lung facilitates gas exchange.",
                    "Gas exchange, oxygen intake",
                    &["Left Lung", "Heart", "Diaphragm"],
                ),
            )
            .scaled(0.8, 1.2, 0.9),
        ],
    }
}

/// Builds nodes and registry entries from the catalog.
///
/// For each part the node is created first, its world bounds and anchor are
/// captured, and the registry entry points back at the node index. Systems
/// are declared before any of their parts register.
pub fn populate(
    registry: &mut AnatomyRegistry,
    scene: &mut SceneGraph,
    catalog: &[SystemSpec],
) -> Result<(), RegistryError> {
    for system in catalog {
        registry.declare_system(&system.id)?;
        for spec in &system.parts {
            let node = SceneNode::from_geometry(
                &spec.display_name,
                &spec.shape.geometry(),
                spec.transform(),
                spec.color,
            );
            let bounds = node.world_bounds();
            let anchor = node.anchor();
            let node_index = scene.add_node(node);

            registry.register(AnatomyPart {
                id: spec.id.clone(),
                display_name: spec.display_name.clone(),
                system_id: system.id.clone(),
                geometry: GeometryRef {
                    node_index,
                    bounds,
                    anchor,
                },
                metadata: spec.metadata.clone(),
            })?;
        }
    }
    Ok(())
}

/// Adds the reference grid under the model and returns its node index.
///
/// The grid is not registered as a part, so it is never pickable and
/// visibility sync leaves it alone; the display options toggle flips its
/// node flag directly.
pub fn add_ground_grid(scene: &mut SceneGraph) -> usize {
    let node = SceneNode::from_geometry(
        "grid",
        &generate_cuboid(20.0, 0.02, 20.0),
        Matrix4::from_translation(Vector3::new(0.0, -2.0, 0.0)),
        [0.75, 0.75, 0.75, 1.0],
    );
    scene.add_node(node)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn built_scene() -> (AnatomyRegistry, SceneGraph) {
        let mut registry = AnatomyRegistry::new();
        let mut scene = SceneGraph::new();
        populate(&mut registry, &mut scene, &standard_catalog()).unwrap();
        (registry, scene)
    }

    #[test]
    fn catalog_declares_six_systems_in_order() {
        let (registry, _) = built_scene();
        let ids: Vec<&str> = registry.systems().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "skeletal",
                "muscular",
                "circulatory",
                "nervous",
                "digestive",
                "respiratory"
            ]
        );
    }

    #[test]
    fn every_part_gets_a_node_and_a_registry_entry() {
        let (registry, scene) = built_scene();
        assert_eq!(registry.part_count(), 32);
        assert_eq!(scene.node_count(), 32);

        // Node indices round-trip.
        for part in registry.all_parts() {
            assert!(part.geometry.node_index < scene.node_count());
        }
    }

    #[test]
    fn anchors_and_bounds_reflect_placement() {
        let (registry, _) = built_scene();

        let skull = registry.get_part("skull").unwrap();
        assert_eq!(skull.geometry.anchor, Vector3::new(0.0, 6.0, 0.0));

        // Scaled sphere: radius 0.8 times (1.0, 1.2, 0.8) half extents.
        let heart = registry.get_part("heart").unwrap();
        let bounds = heart.geometry.bounds;
        assert!((bounds.max.x - 0.8).abs() < 1e-3);
        assert!((bounds.max.y - (2.0 + 0.96)).abs() < 1e-3);
        assert!((bounds.max.z - (1.0 + 0.64)).abs() < 1e-3);
    }

    #[test]
    fn search_finds_catalog_parts_by_display_name() {
        let (registry, _) = built_scene();
        assert_eq!(registry.find_by_name("left lung").unwrap().id, "lung_left");
        assert_eq!(registry.find_by_name("vertebra 3").unwrap().id, "cervical_c3");
    }

    #[test]
    fn grid_is_not_pickable_and_survives_visibility_sync() {
        let (mut registry, mut scene) = built_scene();
        let grid_index = add_ground_grid(&mut scene);

        crate::interact::visibility::set_system_visible(&mut registry, "skeletal", false)
            .unwrap();
        scene.sync_visibility(&registry);

        assert!(scene.nodes[grid_index].visible);
        let skull_index = registry.get_part("skull").unwrap().geometry.node_index;
        assert!(!scene.nodes[skull_index].visible);
    }
}
