// ── Row selection for bulk actions ──

use std::collections::BTreeSet;

use crate::model::EntityId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: BTreeSet<EntityId>,
}

impl SelectionSet {
    pub fn contains(&self, id: EntityId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn toggle(&mut self, id: EntityId) {
        if !self.ids.remove(&id) {
            self.ids.insert(id);
        }
    }

    /// Page-scoped select-all: select exactly `page`, or clear the selection
    /// when every row of `page` is already selected.
    pub fn toggle_page(&mut self, page: &[EntityId]) {
        let all_selected = !page.is_empty() && page.iter().all(|id| self.ids.contains(id));
        if all_selected {
            self.ids.clear();
        } else {
            self.ids = page.iter().copied().collect();
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drop ids that are no longer present.
    pub fn retain_present(&mut self, present: &BTreeSet<EntityId>) {
        self.ids.retain(|id| present.contains(id));
    }

    /// Selected ids in ascending order.
    pub fn ids(&self) -> Vec<EntityId> {
        self.ids.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u64]) -> Vec<EntityId> {
        raw.iter().copied().map(EntityId::new).collect()
    }

    #[test]
    fn toggle_row() {
        let mut sel = SelectionSet::default();
        sel.toggle(EntityId::new(3));
        assert!(sel.contains(EntityId::new(3)));
        sel.toggle(EntityId::new(3));
        assert!(sel.is_empty());
    }

    #[test]
    fn select_all_toggles_the_page() {
        let mut sel = SelectionSet::default();
        let page = ids(&[1, 2, 3]);
        sel.toggle(EntityId::new(9));

        sel.toggle_page(&page);
        assert_eq!(sel.ids(), page);

        sel.toggle_page(&page);
        assert!(sel.is_empty());
    }

    #[test]
    fn select_all_on_empty_page_is_a_no_op_clear() {
        let mut sel = SelectionSet::default();
        sel.toggle_page(&[]);
        assert!(sel.is_empty());
    }
}
