//! # System Visibility
//!
//! The sole write path for part visibility. A part has no visibility flag of
//! its own: its effective visibility is its owning system's flag, so setting
//! a system cascades to every member by definition. Nothing here touches
//! geometry or the current selection.

use log::debug;

use crate::registry::{AnatomyRegistry, RegistryError};

/// Shows or hides a whole anatomical system.
pub fn set_system_visible(
    registry: &mut AnatomyRegistry,
    system_id: &str,
    visible: bool,
) -> Result<(), RegistryError> {
    let system = registry.get_system_mut(system_id)?;
    system.visible = visible;
    debug!("system '{}' visible = {}", system_id, visible);
    Ok(())
}

/// Effective visibility of a part: its owning system's flag.
pub fn is_part_visible(registry: &AnatomyRegistry, part_id: &str) -> Result<bool, RegistryError> {
    let part = registry.get_part(part_id)?;
    Ok(registry.get_system(&part.system_id)?.visible)
}

/// Shows exactly one system and hides all others (focus navigation).
///
/// Fails with `UnknownSystemId` before mutating anything.
pub fn solo_system(registry: &mut AnatomyRegistry, system_id: &str) -> Result<(), RegistryError> {
    registry.get_system(system_id)?;
    for system in registry.systems_mut() {
        system.visible = system.id == system_id;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::tests::test_part;
    use cgmath::Vector3;

    fn two_system_registry() -> AnatomyRegistry {
        let mut registry = AnatomyRegistry::new();
        registry.declare_system("skeletal").unwrap();
        registry.declare_system("circulatory").unwrap();
        registry
            .register(test_part("skull", "skeletal", Vector3::new(0.0, 6.0, 0.0)))
            .unwrap();
        registry
            .register(test_part("pelvis", "skeletal", Vector3::new(0.0, -1.0, 0.0)))
            .unwrap();
        registry
            .register(test_part("heart", "circulatory", Vector3::new(0.0, 2.0, 1.0)))
            .unwrap();
        registry
    }

    #[test]
    fn toggling_a_system_cascades_to_exactly_its_members() {
        let mut registry = two_system_registry();

        set_system_visible(&mut registry, "skeletal", false).unwrap();
        assert!(!is_part_visible(&registry, "skull").unwrap());
        assert!(!is_part_visible(&registry, "pelvis").unwrap());
        assert!(is_part_visible(&registry, "heart").unwrap());

        set_system_visible(&mut registry, "skeletal", true).unwrap();
        assert!(is_part_visible(&registry, "skull").unwrap());
        assert!(is_part_visible(&registry, "pelvis").unwrap());
    }

    #[test]
    fn toggle_is_independent_of_other_systems() {
        let mut registry = two_system_registry();

        set_system_visible(&mut registry, "circulatory", false).unwrap();
        set_system_visible(&mut registry, "skeletal", false).unwrap();
        set_system_visible(&mut registry, "skeletal", true).unwrap();

        assert!(is_part_visible(&registry, "skull").unwrap());
        assert!(!is_part_visible(&registry, "heart").unwrap());
    }

    #[test]
    fn unknown_ids_are_rejected() {
        let mut registry = two_system_registry();
        assert_eq!(
            set_system_visible(&mut registry, "lymphatic", false).unwrap_err(),
            RegistryError::UnknownSystemId("lymphatic".to_string())
        );
        assert_eq!(
            is_part_visible(&registry, "femur").unwrap_err(),
            RegistryError::UnknownPartId("femur".to_string())
        );
    }

    #[test]
    fn solo_system_hides_everything_else() {
        let mut registry = two_system_registry();
        solo_system(&mut registry, "circulatory").unwrap();
        assert!(!is_part_visible(&registry, "skull").unwrap());
        assert!(is_part_visible(&registry, "heart").unwrap());

        // Unknown target leaves flags untouched.
        assert!(solo_system(&mut registry, "lymphatic").is_err());
        assert!(is_part_visible(&registry, "heart").unwrap());
        assert!(!is_part_visible(&registry, "skull").unwrap());
    }
}
