//! Identifier index for O(1) identity matching.

use hashbrown::HashMap;
use tracing::debug;

use crate::models::{HpEntity, Identified};

/// Multi-valued index from identifier to every entity carrying it.
///
/// Entities under one identifier keep their insertion order. Empty
/// identifiers are indexed like any other key.
pub struct IdIndex<'a, T> {
    by_id: HashMap<&'a str, Vec<&'a T>>,
    total: usize,
}

/// Index over the design home-passes
pub type DesignIndex<'a> = IdIndex<'a, HpEntity>;

impl<'a, T: Identified> IdIndex<'a, T> {
    /// Build the index over `entities`
    pub fn build(entities: &'a [T]) -> Self {
        let mut by_id: HashMap<&'a str, Vec<&'a T>> = HashMap::with_capacity(entities.len());

        for entity in entities {
            by_id.entry(entity.id()).or_default().push(entity);
        }

        debug!(
            "Identifier index built: {} entities under {} ids",
            entities.len(),
            by_id.len()
        );

        Self {
            by_id,
            total: entities.len(),
        }
    }

    /// All entities with this identifier, in insertion order
    pub fn get(&self, id: &str) -> &[&'a T] {
        self.by_id.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of indexed entities
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
