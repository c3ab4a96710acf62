use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::catalog::CatalogItem;
use super::dimension::{Dimension, HIERARCHY_ORDER};

/// Selected catalog ids per active dimension. Order of ids is selection order.
pub type SelectionMap = BTreeMap<Dimension, Vec<String>>;

/// Which catalogs have to be re-fetched after a store mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefreshScope {
    /// Nothing changed that affects any catalog
    None,
    /// Every active dimension, with no ancestor constraints
    All,
    /// Every active dimension at or below the given one in hierarchy order
    From(Dimension),
}

impl RefreshScope {
    /// Scope for a change of `dim`'s own selection: everything strictly below it.
    pub fn below(dim: Dimension) -> Self {
        match dim.next() {
            Some(next) => RefreshScope::From(next),
            None => RefreshScope::None,
        }
    }

    /// Combine two pending scopes; the broader one wins.
    pub fn merge(self, other: RefreshScope) -> RefreshScope {
        match (self, other) {
            (RefreshScope::All, _) | (_, RefreshScope::All) => RefreshScope::All,
            (RefreshScope::None, s) | (s, RefreshScope::None) => s,
            (RefreshScope::From(a), RefreshScope::From(b)) => RefreshScope::From(a.min(b)),
        }
    }

    pub fn covers(self, dim: Dimension) -> bool {
        match self {
            RefreshScope::None => false,
            RefreshScope::All => true,
            RefreshScope::From(from) => dim >= from,
        }
    }

    pub fn is_none(self) -> bool {
        self == RefreshScope::None
    }
}

/// Active filter dimensions and their selections, with the cascade rule enforced
/// on every mutation.
///
/// Invariant: every active dimension has a (possibly empty) entry in `selections`,
/// and no inactive dimension has one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterHierarchyStore {
    active: Vec<Dimension>,
    selections: SelectionMap,
    search_terms: HashMap<Dimension, String>,
}

impl FilterHierarchyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `dim` to the active set with an empty selection.
    ///
    /// Idempotent: activating an already active dimension changes nothing and
    /// needs no refresh.
    pub fn activate(&mut self, dim: Dimension) -> RefreshScope {
        if self.is_active(dim) {
            return RefreshScope::None;
        }
        self.active.push(dim);
        self.selections.insert(dim, Vec::new());
        RefreshScope::From(dim)
    }

    /// Removes `dim` from the active set, drops its selection and resets the
    /// selections of its descendants.
    pub fn deactivate(&mut self, dim: Dimension) -> RefreshScope {
        if !self.is_active(dim) {
            return RefreshScope::None;
        }
        self.active.retain(|d| *d != dim);
        self.selections.remove(&dim);
        self.search_terms.remove(&dim);
        self.reset_descendants(dim);
        RefreshScope::below(dim)
    }

    /// Flips membership of `value_id` in `dim`'s selection and resets every descendant.
    /// Rejected (no-op) when `dim` is not active.
    pub fn toggle_value(&mut self, dim: Dimension, value_id: &str) -> RefreshScope {
        let Some(selected) = self.selections.get_mut(&dim) else {
            return RefreshScope::None;
        };
        if let Some(pos) = selected.iter().position(|id| id == value_id) {
            selected.remove(pos);
        } else {
            selected.push(value_id.to_string());
        }
        self.reset_descendants(dim);
        RefreshScope::below(dim)
    }

    /// Select-all over the currently visible ids.
    ///
    /// If every visible id is already selected the selection is cleared, otherwise it
    /// is replaced by exactly the visible ids. Ids selected outside the visible subset
    /// are dropped in both cases.
    pub fn select_all(&mut self, dim: Dimension, visible_ids: &[String]) -> RefreshScope {
        if visible_ids.is_empty() {
            return RefreshScope::None;
        }
        let Some(selected) = self.selections.get_mut(&dim) else {
            return RefreshScope::None;
        };
        let all_selected = visible_ids.iter().all(|id| selected.contains(id));
        if all_selected {
            selected.clear();
        } else {
            let mut next: Vec<String> = Vec::with_capacity(visible_ids.len());
            for id in visible_ids {
                if !next.contains(id) {
                    next.push(id.clone());
                }
            }
            *selected = next;
        }
        self.reset_descendants(dim);
        RefreshScope::below(dim)
    }

    /// Drops every active dimension, selection and search term.
    pub fn clear_all(&mut self) -> RefreshScope {
        self.active.clear();
        self.selections.clear();
        self.search_terms.clear();
        RefreshScope::All
    }

    pub fn set_search_term(&mut self, dim: Dimension, term: impl Into<String>) {
        if !self.is_active(dim) {
            return;
        }
        let term = term.into();
        if term.is_empty() {
            self.search_terms.remove(&dim);
        } else {
            self.search_terms.insert(dim, term);
        }
    }

    pub fn search_term(&self, dim: Dimension) -> &str {
        self.search_terms.get(&dim).map(String::as_str).unwrap_or("")
    }

    /// Catalog entries matching the dimension's search term (case-insensitive substring
    /// on the name). Everything is visible when no term is set.
    pub fn visible_catalog<'a>(
        &self,
        dim: Dimension,
        catalog: &'a [CatalogItem],
    ) -> Vec<&'a CatalogItem> {
        let term = self.search_term(dim).trim().to_lowercase();
        if term.is_empty() {
            return catalog.iter().collect();
        }
        catalog
            .iter()
            .filter(|item| item.name.to_lowercase().contains(&term))
            .collect()
    }

    /// Active dimensions in insertion (display) order.
    pub fn active(&self) -> &[Dimension] {
        &self.active
    }

    pub fn is_active(&self, dim: Dimension) -> bool {
        self.active.contains(&dim)
    }

    /// Inactive dimensions in hierarchy order: the drag source pool.
    pub fn available(&self) -> Vec<Dimension> {
        HIERARCHY_ORDER
            .iter()
            .copied()
            .filter(|d| !self.is_active(*d))
            .collect()
    }

    pub fn selections(&self) -> &SelectionMap {
        &self.selections
    }

    pub fn selection(&self, dim: Dimension) -> &[String] {
        self.selections.get(&dim).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_selected(&self, dim: Dimension, value_id: &str) -> bool {
        self.selection(dim).iter().any(|id| id == value_id)
    }

    pub fn has_any_selection(&self) -> bool {
        self.selections.values().any(|ids| !ids.is_empty())
    }

    /// Resets descendants that are active; inactive ones have no entry to reset.
    fn reset_descendants(&mut self, dim: Dimension) {
        for child in dim.descendants() {
            if let Some(ids) = self.selections.get_mut(child) {
                ids.clear();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn store_with(dims: &[Dimension]) -> FilterHierarchyStore {
        let mut store = FilterHierarchyStore::new();
        for dim in dims {
            store.activate(*dim);
        }
        store
    }

    #[test]
    fn test_activate_is_idempotent() {
        let mut store = FilterHierarchyStore::new();
        assert_eq!(
            store.activate(Dimension::Region),
            RefreshScope::From(Dimension::Region)
        );
        store.toggle_value(Dimension::Region, "3");
        assert_eq!(store.activate(Dimension::Region), RefreshScope::None);
        assert_eq!(store.active(), &[Dimension::Region]);
        assert_eq!(store.selection(Dimension::Region), &ids(&["3"])[..]);
    }

    #[test]
    fn test_active_keeps_insertion_order() {
        let store = store_with(&[Dimension::Customer, Dimension::Company, Dimension::Area]);
        assert_eq!(
            store.active(),
            &[Dimension::Customer, Dimension::Company, Dimension::Area]
        );
        for dim in store.active() {
            assert!(store.selections().contains_key(dim));
        }
    }

    #[test]
    fn test_toggle_flips_membership() {
        let mut store = store_with(&[Dimension::Warehouse]);
        store.toggle_value(Dimension::Warehouse, "5");
        store.toggle_value(Dimension::Warehouse, "6");
        assert_eq!(store.selection(Dimension::Warehouse), &ids(&["5", "6"])[..]);
        store.toggle_value(Dimension::Warehouse, "5");
        assert_eq!(store.selection(Dimension::Warehouse), &ids(&["6"])[..]);
    }

    #[test]
    fn test_toggle_on_inactive_dimension_is_rejected() {
        let mut store = store_with(&[Dimension::Company]);
        assert_eq!(store.toggle_value(Dimension::Region, "1"), RefreshScope::None);
        assert!(!store.selections().contains_key(&Dimension::Region));
        assert_eq!(
            store.select_all(Dimension::Region, &ids(&["1"])),
            RefreshScope::None
        );
    }

    #[test]
    fn test_cascade_resets_every_declared_descendant() {
        let all = Dimension::all().to_vec();
        for dim in Dimension::all() {
            let mut store = store_with(&all);
            for other in Dimension::all() {
                store.selections.insert(*other, ids(&["1"]));
            }
            store.toggle_value(*dim, "2");
            for other in Dimension::all() {
                if dim.descendants().contains(other) {
                    assert!(store.selection(*other).is_empty(), "{other} after {dim}");
                } else {
                    assert!(!store.selection(*other).is_empty(), "{other} after {dim}");
                }
            }
        }
    }

    #[test]
    fn test_cascade_clears_grandchildren_in_one_step() {
        let mut store = store_with(&[
            Dimension::Company,
            Dimension::Region,
            Dimension::Area,
            Dimension::Warehouse,
        ]);
        store.toggle_value(Dimension::Company, "1");
        store.toggle_value(Dimension::Region, "10");
        store.toggle_value(Dimension::Area, "100");
        store.toggle_value(Dimension::Warehouse, "1000");

        store.toggle_value(Dimension::Company, "2");
        assert!(store.selection(Dimension::Region).is_empty());
        assert!(store.selection(Dimension::Area).is_empty());
        assert!(store.selection(Dimension::Warehouse).is_empty());

        // Second mutation on the child: grandchildren were already empty.
        store.toggle_value(Dimension::Region, "11");
        assert_eq!(store.selection(Dimension::Region), &ids(&["11"])[..]);
        assert!(store.selection(Dimension::Area).is_empty());
        assert_eq!(store.selection(Dimension::Company), &ids(&["1", "2"])[..]);
    }

    #[test]
    fn test_select_all_toggles() {
        let mut store = store_with(&[Dimension::Item]);
        store.toggle_value(Dimension::Item, "9");
        let visible = ids(&["1", "2", "3"]);

        store.select_all(Dimension::Item, &visible);
        assert_eq!(store.selection(Dimension::Item), &visible[..]);

        store.select_all(Dimension::Item, &visible);
        assert!(store.selection(Dimension::Item).is_empty());
    }

    #[test]
    fn test_select_all_replaces_with_visible_subset() {
        let mut store = store_with(&[Dimension::Customer]);
        store.select_all(Dimension::Customer, &ids(&["1", "2", "3", "4"]));
        // Search narrowed to a subset that is already fully selected: toggles off.
        store.select_all(Dimension::Customer, &ids(&["2", "3"]));
        assert!(store.selection(Dimension::Customer).is_empty());

        store.toggle_value(Dimension::Customer, "1");
        store.select_all(Dimension::Customer, &ids(&["2", "3"]));
        assert_eq!(store.selection(Dimension::Customer), &ids(&["2", "3"])[..]);
    }

    #[test]
    fn test_select_all_cascades() {
        let mut store = store_with(&[Dimension::ItemCategory, Dimension::Item]);
        store.toggle_value(Dimension::Item, "7");
        assert_eq!(
            store.select_all(Dimension::ItemCategory, &ids(&["1"])),
            RefreshScope::From(Dimension::Item)
        );
        assert!(store.selection(Dimension::Item).is_empty());
    }

    #[test]
    fn test_deactivate_removes_selection_and_resets_descendants() {
        let mut store = store_with(&[Dimension::Region, Dimension::Area, Dimension::Item]);
        store.toggle_value(Dimension::Region, "1");
        store.toggle_value(Dimension::Area, "2");
        store.toggle_value(Dimension::Item, "3");

        assert_eq!(
            store.deactivate(Dimension::Region),
            RefreshScope::From(Dimension::Area)
        );
        assert!(!store.is_active(Dimension::Region));
        assert!(!store.selections().contains_key(&Dimension::Region));
        assert!(store.selection(Dimension::Area).is_empty());
        assert_eq!(store.selection(Dimension::Item), &ids(&["3"])[..]);
        assert_eq!(store.available()[0], Dimension::Company);
        assert!(store.available().contains(&Dimension::Region));

        store.activate(Dimension::Region);
        assert!(store.selection(Dimension::Region).is_empty());
        assert_eq!(store.deactivate(Dimension::Warehouse), RefreshScope::None);
    }

    #[test]
    fn test_clear_all() {
        let mut store = store_with(&[Dimension::Region, Dimension::Customer]);
        store.toggle_value(Dimension::Region, "1");
        store.set_search_term(Dimension::Customer, "acme");
        assert_eq!(store.clear_all(), RefreshScope::All);
        assert!(store.active().is_empty());
        assert!(store.selections().is_empty());
        assert_eq!(store.search_term(Dimension::Customer), "");
        assert!(!store.has_any_selection());
    }

    #[test]
    fn test_visible_catalog_filters_by_search_term() {
        let mut store = store_with(&[Dimension::Customer]);
        let catalog = vec![
            CatalogItem::new("1", "Acme Stores"),
            CatalogItem::new("2", "Bolt Market"),
            CatalogItem::new("3", "ACME Wholesale"),
        ];
        assert_eq!(store.visible_catalog(Dimension::Customer, &catalog).len(), 3);
        store.set_search_term(Dimension::Customer, "acme");
        let visible: Vec<&str> = store
            .visible_catalog(Dimension::Customer, &catalog)
            .iter()
            .map(|item| item.id.as_str())
            .collect();
        assert_eq!(visible, vec!["1", "3"]);
    }

    #[test]
    fn test_refresh_scope_merge() {
        use Dimension::*;
        assert_eq!(
            RefreshScope::From(Warehouse).merge(RefreshScope::From(Region)),
            RefreshScope::From(Region)
        );
        assert_eq!(
            RefreshScope::None.merge(RefreshScope::From(Area)),
            RefreshScope::From(Area)
        );
        assert_eq!(
            RefreshScope::From(Area).merge(RefreshScope::All),
            RefreshScope::All
        );
        assert_eq!(RefreshScope::below(Customer), RefreshScope::None);
        assert!(RefreshScope::From(Area).covers(Customer));
        assert!(!RefreshScope::From(Area).covers(Region));
    }
}
