//! # Anatomy Registry
//!
//! The catalog of anatomical systems and parts. Identity and metadata live
//! here, keyed by stable string ids, decoupled from the renderable scene
//! graph: a part only carries an opaque [`GeometryRef`] back into it.
//!
//! Systems and parts are registered once during scene construction and are
//! structurally immutable afterwards; only the per-system `visible` flag
//! mutates at runtime (see [`crate::interact::visibility`]).

use std::collections::HashMap;

use cgmath::Vector3;
use thiserror::Error;

use crate::gfx::geometry::Aabb;

/// Errors raised when a registry invariant is violated.
///
/// All of these are programmer/integration errors surfaced at the violating
/// call; none of them is a recoverable runtime condition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("duplicate id: '{0}' is already registered")]
    DuplicateId(String),
    #[error("unknown part id: '{0}'")]
    UnknownPartId(String),
    #[error("unknown system id: '{0}'")]
    UnknownSystemId(String),
}

/// Curated descriptive metadata attached to a part at registration.
///
/// `related` entries are display hints only; they are not validated against
/// registered part ids.
#[derive(Debug, Clone)]
pub struct PartMetadata {
    pub description: String,
    pub function: String,
    pub related: Vec<String>,
}

impl PartMetadata {
    pub fn new(description: &str, function: &str, related: &[&str]) -> Self {
        Self {
            description: description.to_string(),
            function: function.to_string(),
            related: related.iter().map(|r| r.to_string()).collect(),
        }
    }
}

/// Opaque handle from a part to its renderable geometry.
///
/// The render host owns the mesh; the registry only keeps what the
/// interaction core needs: a world-space bounding volume for picking, a
/// world-space anchor point for label placement, and the index of the scene
/// node so the host can look visibility back up when drawing.
#[derive(Debug, Clone, Copy)]
pub struct GeometryRef {
    pub node_index: usize,
    pub bounds: Aabb,
    pub anchor: Vector3<f32>,
}

/// A single anatomical structure with identity, metadata, and geometry.
#[derive(Debug, Clone)]
pub struct AnatomyPart {
    pub id: String,
    pub display_name: String,
    pub system_id: String,
    pub geometry: GeometryRef,
    pub metadata: PartMetadata,
}

/// A named grouping of parts (e.g. "skeletal") with independent visibility.
#[derive(Debug, Clone)]
pub struct AnatomySystem {
    pub id: String,
    member_part_ids: Vec<String>,
    pub visible: bool,
}

impl AnatomySystem {
    fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            member_part_ids: Vec::new(),
            visible: true,
        }
    }

    /// Member part ids in registration order.
    pub fn member_ids(&self) -> &[String] {
        &self.member_part_ids
    }
}

/// Owns every [`AnatomySystem`] and [`AnatomyPart`] in the scene.
///
/// Iteration order is deterministic: systems in declaration order, parts in
/// registration order within each system.
#[derive(Debug, Default)]
pub struct AnatomyRegistry {
    systems: Vec<AnatomySystem>,
    parts: HashMap<String, AnatomyPart>,
}

impl AnatomyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a system so parts can be registered against it.
    ///
    /// A second declaration with the same id fails with
    /// [`RegistryError::DuplicateId`] and leaves the registry unchanged.
    pub fn declare_system(&mut self, system_id: &str) -> Result<(), RegistryError> {
        if self.systems.iter().any(|s| s.id == system_id) {
            return Err(RegistryError::DuplicateId(system_id.to_string()));
        }
        self.systems.push(AnatomySystem::new(system_id));
        Ok(())
    }

    /// Adds a part to its owning system.
    ///
    /// Fails with [`RegistryError::DuplicateId`] if the part id is taken and
    /// [`RegistryError::UnknownSystemId`] if the owning system was never
    /// declared. A failed call mutates nothing.
    pub fn register(&mut self, part: AnatomyPart) -> Result<(), RegistryError> {
        if self.parts.contains_key(&part.id) {
            return Err(RegistryError::DuplicateId(part.id));
        }
        let system = self
            .systems
            .iter_mut()
            .find(|s| s.id == part.system_id)
            .ok_or_else(|| RegistryError::UnknownSystemId(part.system_id.clone()))?;

        system.member_part_ids.push(part.id.clone());
        self.parts.insert(part.id.clone(), part);
        Ok(())
    }

    pub fn get_part(&self, part_id: &str) -> Result<&AnatomyPart, RegistryError> {
        self.parts
            .get(part_id)
            .ok_or_else(|| RegistryError::UnknownPartId(part_id.to_string()))
    }

    pub fn get_system(&self, system_id: &str) -> Result<&AnatomySystem, RegistryError> {
        self.systems
            .iter()
            .find(|s| s.id == system_id)
            .ok_or_else(|| RegistryError::UnknownSystemId(system_id.to_string()))
    }

    pub(crate) fn get_system_mut(
        &mut self,
        system_id: &str,
    ) -> Result<&mut AnatomySystem, RegistryError> {
        self.systems
            .iter_mut()
            .find(|s| s.id == system_id)
            .ok_or_else(|| RegistryError::UnknownSystemId(system_id.to_string()))
    }

    /// All systems in declaration order.
    pub fn systems(&self) -> &[AnatomySystem] {
        &self.systems
    }

    pub(crate) fn systems_mut(&mut self) -> &mut [AnatomySystem] {
        &mut self.systems
    }

    /// Parts of one system, in registration order.
    pub fn parts_of(&self, system_id: &str) -> Result<Vec<&AnatomyPart>, RegistryError> {
        let system = self.get_system(system_id)?;
        Ok(system
            .member_part_ids
            .iter()
            .filter_map(|id| self.parts.get(id))
            .collect())
    }

    /// Every part: systems in declaration order, members in registration
    /// order. The overlay layer diffs against this ordering each frame.
    pub fn all_parts(&self) -> Vec<&AnatomyPart> {
        self.systems
            .iter()
            .flat_map(|system| {
                system
                    .member_part_ids
                    .iter()
                    .filter_map(|id| self.parts.get(id))
            })
            .collect()
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Case-insensitive substring search over display names; first match in
    /// `all_parts` order. Backs the search box.
    pub fn find_by_name(&self, query: &str) -> Option<&AnatomyPart> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.all_parts()
            .into_iter()
            .find(|part| part.display_name.to_lowercase().contains(&needle))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use cgmath::Vector3;

    /// Builds a part with a unit bounding box centered on `anchor`.
    pub(crate) fn test_part(id: &str, system_id: &str, anchor: Vector3<f32>) -> AnatomyPart {
        let half = Vector3::new(0.5, 0.5, 0.5);
        AnatomyPart {
            id: id.to_string(),
            display_name: id.to_string(),
            system_id: system_id.to_string(),
            geometry: GeometryRef {
                node_index: 0,
                bounds: Aabb::new(anchor - half, anchor + half),
                anchor,
            },
            metadata: PartMetadata::new("desc", "func", &[]),
        }
    }

    #[test]
    fn register_requires_declared_system() {
        let mut registry = AnatomyRegistry::new();
        let err = registry
            .register(test_part("skull", "skeletal", Vector3::new(0.0, 6.0, 0.0)))
            .unwrap_err();
        assert_eq!(err, RegistryError::UnknownSystemId("skeletal".to_string()));
        assert_eq!(registry.part_count(), 0);
    }

    #[test]
    fn duplicate_part_id_rejected_and_registry_unchanged() {
        let mut registry = AnatomyRegistry::new();
        registry.declare_system("skeletal").unwrap();
        registry
            .register(test_part("skull", "skeletal", Vector3::new(0.0, 6.0, 0.0)))
            .unwrap();

        let err = registry
            .register(test_part("skull", "skeletal", Vector3::new(1.0, 1.0, 1.0)))
            .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateId("skull".to_string()));

        // Unchanged: still one part, original anchor intact.
        assert_eq!(registry.part_count(), 1);
        assert_eq!(
            registry.get_system("skeletal").unwrap().member_ids(),
            &["skull".to_string()]
        );
        let part = registry.get_part("skull").unwrap();
        assert_eq!(part.geometry.anchor, Vector3::new(0.0, 6.0, 0.0));
    }

    #[test]
    fn duplicate_system_declaration_rejected() {
        let mut registry = AnatomyRegistry::new();
        registry.declare_system("nervous").unwrap();
        let err = registry.declare_system("nervous").unwrap_err();
        assert_eq!(err, RegistryError::DuplicateId("nervous".to_string()));
        assert_eq!(registry.systems().len(), 1);
    }

    #[test]
    fn all_parts_preserves_declaration_and_registration_order() {
        let mut registry = AnatomyRegistry::new();
        registry.declare_system("skeletal").unwrap();
        registry.declare_system("circulatory").unwrap();

        registry
            .register(test_part("skull", "skeletal", Vector3::new(0.0, 6.0, 0.0)))
            .unwrap();
        registry
            .register(test_part("heart", "circulatory", Vector3::new(0.0, 2.0, 1.0)))
            .unwrap();
        registry
            .register(test_part("pelvis", "skeletal", Vector3::new(0.0, -1.0, 0.0)))
            .unwrap();

        let ids: Vec<&str> = registry.all_parts().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["skull", "pelvis", "heart"]);

        let skeletal: Vec<&str> = registry
            .parts_of("skeletal")
            .unwrap()
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(skeletal, vec!["skull", "pelvis"]);
    }

    #[test]
    fn lookups_fail_for_unknown_ids() {
        let registry = AnatomyRegistry::new();
        assert_eq!(
            registry.get_part("femur").unwrap_err(),
            RegistryError::UnknownPartId("femur".to_string())
        );
        assert_eq!(
            registry.parts_of("lymphatic").unwrap_err(),
            RegistryError::UnknownSystemId("lymphatic".to_string())
        );
    }

    #[test]
    fn find_by_name_is_case_insensitive_substring() {
        let mut registry = AnatomyRegistry::new();
        registry.declare_system("circulatory").unwrap();
        let mut part = test_part("heart", "circulatory", Vector3::new(0.0, 2.0, 1.0));
        part.display_name = "Heart".to_string();
        registry.register(part).unwrap();

        assert_eq!(registry.find_by_name("hea").unwrap().id, "heart");
        assert_eq!(registry.find_by_name("HEART").unwrap().id, "heart");
        assert!(registry.find_by_name("lung").is_none());
        assert!(registry.find_by_name("   ").is_none());
    }
}
