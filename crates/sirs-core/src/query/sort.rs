// ── Sort comparator ──

use std::cmp::Ordering;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::model::{Product, ProductField};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Sort column and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: ProductField,
    pub direction: SortDirection,
}

impl SortSpec {
    pub const fn new(field: ProductField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Same field flips direction; a new field starts ascending.
    #[must_use]
    pub fn toggled(self, field: ProductField) -> Self {
        if field == self.field {
            Self::new(field, self.direction.flipped())
        } else {
            Self::new(field, SortDirection::Asc)
        }
    }
}

/// Ascending comparison of two products on one column.
pub fn compare(a: &Product, b: &Product, field: ProductField) -> Ordering {
    match field {
        ProductField::Id => a.id.cmp(&b.id),
        ProductField::Name => a.name.cmp(&b.name),
        ProductField::Brand => a.brand.cmp(&b.brand),
        ProductField::Category => a.category_name().cmp(b.category_name()),
        ProductField::Price => a.price_value().total_cmp(&b.price_value()),
        ProductField::Stock => a.stock_value().total_cmp(&b.stock_value()),
    }
}

/// Stable in-place sort. Ties keep their incoming order in both directions.
pub fn sort_products(items: &mut [Arc<Product>], spec: SortSpec) {
    items.sort_by(|a, b| {
        let ord = compare(a, b, spec.field);
        match spec.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::fixtures::{ids, named, product, shared};

    #[test]
    fn price_sorts_numerically_with_garbage_as_zero() {
        let mut items = shared(vec![
            product(1, "100", "1"),
            product(2, "9.5", "1"),
            product(3, "bad", "1"),
        ]);
        sort_products(&mut items, SortSpec::new(ProductField::Price, SortDirection::Asc));
        assert_eq!(ids(&items), vec![3, 2, 1]);
    }

    #[test]
    fn category_sorts_by_name_missing_first() {
        let mut items = shared(vec![
            named(1, "a", "x", Some((9, "Washers"))),
            named(2, "b", "x", None),
            named(3, "c", "x", Some((4, "Cooling"))),
        ]);
        sort_products(&mut items, SortSpec::new(ProductField::Category, SortDirection::Asc));
        assert_eq!(ids(&items), vec![2, 3, 1]);
    }

    #[test]
    fn descending_keeps_ties_stable() {
        let mut items = shared(vec![
            named(1, "a", "Beko", None),
            named(2, "b", "Arcelik", None),
            named(3, "c", "Beko", None),
        ]);
        sort_products(&mut items, SortSpec::new(ProductField::Brand, SortDirection::Desc));
        assert_eq!(ids(&items), vec![1, 3, 2]);
    }

    #[test]
    fn resorting_is_a_no_op() {
        let mut items = shared(vec![
            product(4, "5", "2"),
            product(1, "5", "1"),
            product(3, "1", "2"),
            product(2, "9", "2"),
        ]);
        let spec = SortSpec::new(ProductField::Stock, SortDirection::Desc);
        sort_products(&mut items, spec);
        let first = ids(&items);
        sort_products(&mut items, spec);
        assert_eq!(ids(&items), first);
    }

    #[test]
    fn toggling() {
        let spec = SortSpec::default();
        let flipped = spec.toggled(ProductField::Id);
        assert_eq!(flipped.direction, SortDirection::Desc);
        let other = flipped.toggled(ProductField::Name);
        assert_eq!(other, SortSpec::new(ProductField::Name, SortDirection::Asc));
    }
}
