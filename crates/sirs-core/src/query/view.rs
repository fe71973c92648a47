// ── View-state controller ──
//
// Owns the filter criteria, sort, page window, selection and open action
// menu for the product table, plus the latest entity snapshot. Every
// operation updates state and then re-derives the visible page through the
// pure `derive` function, in the fixed order filter → sort → total pages →
// page slice.

use std::collections::BTreeSet;
use std::sync::Arc;

use super::filter::{FilterCriteria, FilterPatch, filter_products};
use super::page::{PageWindow, total_pages};
use super::saved_view::SavedView;
use super::selection::SelectionSet;
use super::sort::{SortSpec, sort_products};
use super::summary::Summary;
use crate::model::{EntityId, Product, ProductField};

/// Everything the table renders, derived from the view state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedView {
    /// Rows of the current page, in display order.
    pub rows: Vec<Arc<Product>>,
    /// The full filtered and sorted list.
    pub filtered: Vec<Arc<Product>>,
    /// Page actually rendered (after clamping).
    pub page: usize,
    pub total_pages: usize,
    pub summary: Summary,
}

impl DerivedView {
    pub fn is_empty(&self) -> bool {
        self.filtered.is_empty()
    }

    pub fn page_ids(&self) -> Vec<EntityId> {
        self.rows.iter().map(|p| p.id).collect()
    }
}

/// Pure derivation of the visible page.
pub fn derive(
    entities: &[Arc<Product>],
    criteria: &FilterCriteria,
    sort: SortSpec,
    window: PageWindow,
) -> DerivedView {
    let mut filtered = filter_products(entities, criteria);
    sort_products(&mut filtered, sort);

    let pages = total_pages(filtered.len(), window.page_size());
    let window = window.clamped(pages);
    let rows = filtered
        .get(window.range(filtered.len()))
        .unwrap_or_default()
        .to_vec();

    DerivedView {
        summary: Summary::compute(entities, filtered.len()),
        rows,
        filtered,
        page: window.page(),
        total_pages: pages,
    }
}

/// Stateful controller behind the product table.
#[derive(Debug, Clone, Default)]
pub struct ViewController {
    entities: Arc<Vec<Arc<Product>>>,
    criteria: FilterCriteria,
    sort: SortSpec,
    window: PageWindow,
    selection: SelectionSet,
    active_menu: Option<EntityId>,
    saved_view: Option<SavedView>,
    derived: DerivedView,
}

impl ViewController {
    pub fn new(page_size: usize) -> Self {
        let mut view = Self {
            window: PageWindow::new(1, page_size),
            ..Self::default()
        };
        view.recompute();
        view
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn derived(&self) -> &DerivedView {
        &self.derived
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn sort(&self) -> SortSpec {
        self.sort
    }

    pub fn window(&self) -> PageWindow {
        self.window
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn active_menu(&self) -> Option<EntityId> {
        self.active_menu
    }

    pub fn saved_view(&self) -> Option<SavedView> {
        self.saved_view
    }

    pub fn entities(&self) -> &Arc<Vec<Arc<Product>>> {
        &self.entities
    }

    // ── Data ─────────────────────────────────────────────────────────

    /// Swap in a freshly fetched list. Selections and the open menu that
    /// point at vanished rows are dropped.
    pub fn replace_entities(&mut self, entities: Arc<Vec<Arc<Product>>>) {
        let present: BTreeSet<EntityId> = entities.iter().map(|p| p.id).collect();
        self.selection.retain_present(&present);
        if self.active_menu.is_some_and(|id| !present.contains(&id)) {
            self.active_menu = None;
        }
        self.entities = entities;
        self.recompute();
    }

    // ── Filtering & sorting ──────────────────────────────────────────

    /// Merge `patch` into the criteria and go back to page 1.
    pub fn apply_filter(&mut self, patch: FilterPatch) {
        self.criteria.merge(patch);
        self.saved_view = None;
        self.selection.clear();
        self.window = self.window.at(1, usize::MAX);
        self.recompute();
    }

    /// Reset every filter to its default.
    pub fn clear_filters(&mut self) {
        self.criteria = FilterCriteria::default();
        self.saved_view = None;
        self.selection.clear();
        self.window = self.window.at(1, usize::MAX);
        self.recompute();
    }

    /// Same field flips direction, a new field sorts ascending. The page is
    /// kept.
    pub fn apply_sort(&mut self, field: ProductField) {
        self.sort = self.sort.toggled(field);
        self.recompute();
    }

    pub fn apply_saved_view(&mut self, view: SavedView) {
        let (criteria, sort) = view.preset();
        self.criteria = criteria;
        self.sort = sort;
        self.saved_view = Some(view);
        self.selection.clear();
        self.window = self.window.at(1, usize::MAX);
        self.recompute();
    }

    // ── Paging ───────────────────────────────────────────────────────

    /// Jump to `page`, clamped into `[1, total_pages]`.
    pub fn set_page(&mut self, page: usize) {
        self.window = self.window.at(page, self.derived.total_pages);
        self.recompute();
    }

    pub fn next_page(&mut self) {
        self.set_page(self.window.page().saturating_add(1));
    }

    pub fn prev_page(&mut self) {
        self.set_page(self.window.page().saturating_sub(1));
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.window = self.window.with_page_size(page_size);
        self.recompute();
    }

    // ── Selection ────────────────────────────────────────────────────

    pub fn select_row(&mut self, id: EntityId) {
        if self.entities.iter().any(|p| p.id == id) {
            self.selection.toggle(id);
        }
    }

    /// Toggle selection of the rows on the current page only.
    pub fn select_all(&mut self) {
        let page = self.derived.page_ids();
        self.selection.toggle_page(&page);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // ── Action menu ──────────────────────────────────────────────────

    /// Open the menu for `id`, or close it when it is already open.
    pub fn toggle_menu(&mut self, id: EntityId) {
        self.active_menu = if self.active_menu == Some(id) {
            None
        } else {
            Some(id)
        };
    }

    pub fn close_menu(&mut self) {
        self.active_menu = None;
    }

    // ── Derivation ───────────────────────────────────────────────────

    fn recompute(&mut self) {
        self.derived = derive(&self.entities, &self.criteria, self.sort, self.window);
        self.window = self.window.at(self.derived.page, self.derived.total_pages);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::fixtures::{ids, named, product, shared};
    use crate::query::filter::StockFilter;
    use crate::query::sort::SortDirection;

    fn controller(items: Vec<Product>, page_size: usize) -> ViewController {
        let mut view = ViewController::new(page_size);
        view.replace_entities(Arc::new(shared(items)));
        view
    }

    fn many(n: u64) -> Vec<Product> {
        (1..=n).map(|i| product(i, &i.to_string(), "20")).collect()
    }

    #[test]
    fn two_product_example() {
        let mut a = named(1, "A", "x", None);
        a.price = "10".into();
        a.stock = "0".into();
        let mut b = named(2, "B", "x", None);
        b.price = "20".into();
        b.stock = "15".into();

        let mut view = controller(vec![a, b], 25);
        view.apply_filter(FilterPatch::stock(StockFilter::OutOfStock));
        assert_eq!(ids(&view.derived().rows), vec![1]);

        view.clear_filters();
        view.apply_sort(ProductField::Price);
        view.apply_sort(ProductField::Price);
        assert_eq!(view.sort().direction, SortDirection::Desc);
        assert_eq!(ids(&view.derived().rows), vec![2, 1]);
    }

    #[test]
    fn low_stock_saved_view() {
        let items = ["0", "5", "9", "10", "50"]
            .iter()
            .zip(1..)
            .map(|(stock, id)| product(id, "1", stock))
            .collect();
        let mut view = controller(items, 25);
        view.apply_saved_view(SavedView::LowStock);
        assert_eq!(ids(&view.derived().rows), vec![2, 3]);
    }

    #[test]
    fn pages_concatenate_to_the_filtered_list() {
        let mut view = controller(many(23), 5);
        view.apply_filter(FilterPatch::search("1"));
        let expected = ids(&view.derived().filtered);

        let mut seen = Vec::new();
        for page in 1..=view.derived().total_pages {
            view.set_page(page);
            seen.extend(ids(&view.derived().rows));
        }
        assert_eq!(seen, expected);
    }

    #[test]
    fn out_of_range_pages_clamp_to_the_boundary() {
        let mut view = controller(many(12), 5);
        view.set_page(0);
        assert_eq!(view.derived().page, 1);
        view.set_page(99);
        assert_eq!(view.derived().page, 3);
        assert_eq!(ids(&view.derived().rows), vec![11, 12]);
    }

    #[test]
    fn empty_result_is_page_one_of_zero() {
        let mut view = controller(many(3), 5);
        view.apply_filter(FilterPatch::search("no such product"));
        assert!(view.derived().is_empty());
        assert_eq!(view.derived().total_pages, 0);
        assert_eq!(view.derived().page, 1);
        view.set_page(4);
        assert_eq!(view.window().page(), 1);
    }

    #[test]
    fn filter_resets_page_but_sort_does_not() {
        let mut view = controller(many(30), 10);
        view.set_page(3);
        view.apply_sort(ProductField::Name);
        assert_eq!(view.derived().page, 3);
        view.apply_filter(FilterPatch::stock(StockFilter::InStock));
        assert_eq!(view.derived().page, 1);
    }

    #[test]
    fn shrinking_snapshot_reclamps_page() {
        let mut view = controller(many(30), 10);
        view.set_page(3);
        view.replace_entities(Arc::new(shared(many(12))));
        assert_eq!(view.derived().page, 2);
    }

    #[test]
    fn select_all_then_saved_view_clears_selection() {
        let mut view = controller(many(40), 25);
        view.select_all();
        assert_eq!(view.selection().len(), 25);

        view.apply_saved_view(SavedView::Recent);
        assert!(view.selection().is_empty());
        assert_eq!(view.derived().rows[0].id, EntityId::new(40));
    }

    #[test]
    fn saved_view_replaces_ad_hoc_filters() {
        let mut view = controller(many(5), 25);
        view.apply_filter(FilterPatch::search("3"));
        view.apply_saved_view(SavedView::Recent);
        assert!(view.criteria().search.is_empty());
        assert_eq!(view.saved_view(), Some(SavedView::Recent));

        view.apply_filter(FilterPatch::search("2"));
        assert_eq!(view.saved_view(), None);
    }

    #[test]
    fn refetch_prunes_selection_and_dangling_menu() {
        let mut view = controller(many(5), 25);
        view.select_row(EntityId::new(2));
        view.select_row(EntityId::new(5));
        view.toggle_menu(EntityId::new(5));

        view.replace_entities(Arc::new(shared(many(4))));

        assert_eq!(view.selection().ids(), vec![EntityId::new(2)]);
        assert_eq!(view.active_menu(), None);
    }

    #[test]
    fn only_one_menu_is_open() {
        let mut view = controller(many(5), 25);
        view.toggle_menu(EntityId::new(1));
        view.toggle_menu(EntityId::new(2));
        assert_eq!(view.active_menu(), Some(EntityId::new(2)));
        view.toggle_menu(EntityId::new(2));
        assert_eq!(view.active_menu(), None);
    }

    #[test]
    fn unknown_rows_cannot_be_selected() {
        let mut view = controller(many(2), 25);
        view.select_row(EntityId::new(99));
        assert!(view.selection().is_empty());
    }

    #[test]
    fn derivation_is_deterministic() {
        let items = shared(many(17));
        let criteria = FilterCriteria {
            stock: StockFilter::InStock,
            ..FilterCriteria::default()
        };
        let sort = SortSpec::new(ProductField::Price, SortDirection::Desc);
        let window = PageWindow::new(2, 5);
        assert_eq!(
            derive(&items, &criteria, sort, window),
            derive(&items, &criteria, sort, window)
        );
    }
}
