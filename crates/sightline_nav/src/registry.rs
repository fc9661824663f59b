//! Ordered section registry
//!
//! Holds the renderer's section list in document order with O(1) id lookups.
//! Every change of list identity (add, remove, reorder, retitle) bumps the
//! generation, which is how dependants know to re-subscribe or reset focus.

use indexmap::IndexMap;
use sightline_core::{SectionDescriptor, SectionId};

/// Ordered map of section id → descriptor
#[derive(Debug, Clone, Default)]
pub struct SectionRegistry {
    sections: IndexMap<SectionId, SectionDescriptor>,
    generation: u64,
}

impl SectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from descriptors in document order
    pub fn from_descriptors(descriptors: impl IntoIterator<Item = SectionDescriptor>) -> Self {
        let mut registry = Self::new();
        registry.sections = Self::collect(descriptors);
        registry
    }

    fn collect(
        descriptors: impl IntoIterator<Item = SectionDescriptor>,
    ) -> IndexMap<SectionId, SectionDescriptor> {
        let mut sections = IndexMap::new();
        for descriptor in descriptors {
            // Duplicate ids: last wins, position of the first is kept
            if sections.contains_key(&descriptor.id) {
                tracing::warn!("Duplicate section id registered: {}", descriptor.id);
            }
            sections.insert(descriptor.id.clone(), descriptor);
        }
        sections
    }

    /// Replace the list. Returns true if its identity changed.
    pub fn replace(&mut self, descriptors: impl IntoIterator<Item = SectionDescriptor>) -> bool {
        let next = Self::collect(descriptors);
        let same = next.len() == self.sections.len()
            && next.values().zip(self.sections.values()).all(|(a, b)| a == b);
        if same {
            return false;
        }
        self.sections = next;
        self.generation += 1;
        tracing::debug!(
            "SectionRegistry: {} sections (generation {})",
            self.sections.len(),
            self.generation
        );
        true
    }

    pub fn get(&self, id: &SectionId) -> Option<&SectionDescriptor> {
        self.sections.get(id)
    }

    pub fn contains(&self, id: &SectionId) -> bool {
        self.sections.contains_key(id)
    }

    /// Document-order position of a section
    pub fn index_of(&self, id: &SectionId) -> Option<usize> {
        self.sections.get_index_of(id)
    }

    pub fn get_index(&self, index: usize) -> Option<&SectionDescriptor> {
        self.sections.get_index(index).map(|(_, d)| d)
    }

    pub fn ids(&self) -> impl Iterator<Item = &SectionId> {
        self.sections.keys()
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &SectionDescriptor> {
        self.sections.values()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Bumped on every identity change
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descs(ids: &[&str]) -> Vec<SectionDescriptor> {
        ids.iter()
            .map(|id| SectionDescriptor::new(*id, id.to_uppercase()))
            .collect()
    }

    #[test]
    fn test_order_and_lookup() {
        let reg = SectionRegistry::from_descriptors(descs(&["a", "b", "c"]));
        assert_eq!(reg.len(), 3);
        assert_eq!(reg.index_of(&"b".into()), Some(1));
        assert_eq!(reg.get_index(2).map(|d| d.title.as_str()), Some("C"));
        let ids: Vec<&str> = reg.ids().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_replace_detects_identity_change() {
        let mut reg = SectionRegistry::from_descriptors(descs(&["a", "b"]));
        assert!(!reg.replace(descs(&["a", "b"])));
        assert_eq!(reg.generation(), 0);

        // Reorder
        assert!(reg.replace(descs(&["b", "a"])));
        assert_eq!(reg.generation(), 1);

        // Retitle
        let mut retitled = descs(&["b", "a"]);
        retitled[0].title = "Bee".into();
        assert!(reg.replace(retitled));
        assert_eq!(reg.generation(), 2);

        // Remove
        assert!(reg.replace(descs(&["b"])));
        assert!(!reg.contains(&"a".into()));
    }

    #[test]
    fn test_duplicate_ids_last_wins() {
        let mut list = descs(&["a", "b"]);
        list.push(SectionDescriptor::new("a", "Again"));
        let reg = SectionRegistry::from_descriptors(list);
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.index_of(&"a".into()), Some(0));
        assert_eq!(reg.get(&"a".into()).map(|d| d.title.as_str()), Some("Again"));
    }
}
