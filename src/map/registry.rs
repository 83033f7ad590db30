//! Registry of validated map templates.
//!
//! Templates are stored behind `Arc` so any number of games can be
//! created from one without copying the definition.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::template::{MapError, MapTemplate};
use crate::core::entity::MapId;

/// Registry of map templates, keyed by `MapId`.
///
/// ## Example
///
/// ```
/// use grid_tactics::core::PlayerId;
/// use grid_tactics::map::{BuildingKind, MapRegistry, MapTemplate};
///
/// let mut registry = MapRegistry::new();
/// let map = MapTemplate::new("duel", 4, 4)
///     .with_building((0, 0), BuildingKind::HQ, Some(PlayerId::new(1)))
///     .with_building((3, 3), BuildingKind::HQ, Some(PlayerId::new(2)));
///
/// let id = registry.register(map).unwrap();
/// assert_eq!(registry.get(id).unwrap().name, "duel");
/// ```
#[derive(Clone, Debug)]
pub struct MapRegistry {
    maps: FxHashMap<MapId, Arc<MapTemplate>>,
    next_id: MapId,
}

impl Default for MapRegistry {
    fn default() -> Self {
        Self {
            maps: FxHashMap::default(),
            next_id: MapId::FIRST,
        }
    }
}

impl MapRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and store a template, assigning the next id.
    ///
    /// A rejected template consumes no id.
    pub fn register(&mut self, template: MapTemplate) -> Result<MapId, MapError> {
        template.validate()?;
        let id = self.next_id;
        self.next_id = id.next();
        self.maps.insert(id, Arc::new(template));
        Ok(id)
    }

    /// Get a template by id.
    #[must_use]
    pub fn get(&self, id: MapId) -> Option<Arc<MapTemplate>> {
        self.maps.get(&id).cloned()
    }

    /// Check if a map id is registered.
    #[must_use]
    pub fn contains(&self, id: MapId) -> bool {
        self.maps.contains_key(&id)
    }

    /// Get the number of registered maps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.maps.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    /// Iterate over all templates, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (MapId, &MapTemplate)> {
        self.maps.iter().map(|(id, map)| (*id, map.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::player::PlayerId;
    use crate::map::BuildingKind;

    fn duel(name: &str) -> MapTemplate {
        MapTemplate::new(name, 4, 4)
            .with_building((0, 0), BuildingKind::HQ, Some(PlayerId::new(1)))
            .with_building((3, 3), BuildingKind::HQ, Some(PlayerId::new(2)))
    }

    #[test]
    fn test_register_assigns_sequential_ids() {
        let mut registry = MapRegistry::new();

        let a = registry.register(duel("a")).unwrap();
        let b = registry.register(duel("b")).unwrap();

        assert_eq!(a, MapId(1));
        assert_eq!(b, MapId(2));
        assert_eq!(registry.len(), 2);
        assert!(registry.contains(b));
        assert!(registry.get(MapId(9)).is_none());
    }

    #[test]
    fn test_invalid_template_not_stored() {
        let mut registry = MapRegistry::new();

        let broken = MapTemplate::new("empty", 4, 4);
        assert_eq!(registry.register(broken), Err(MapError::HqCount(0)));
        assert!(registry.is_empty());

        let id = registry.register(duel("ok")).unwrap();
        assert_eq!(id, MapId::FIRST);
    }

    #[test]
    fn test_templates_are_shared() {
        let mut registry = MapRegistry::new();
        let id = registry.register(duel("shared")).unwrap();

        let a = registry.get(id).unwrap();
        let b = registry.get(id).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
