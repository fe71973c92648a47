// ── Client-side query engine ──
//
// Filter, sort, paginate and select over a wholesale entity snapshot.
// Everything here is synchronous and free of I/O.

pub mod filter;
pub mod list;
pub mod page;
pub mod saved_view;
pub mod search;
pub mod selection;
pub mod sort;
pub mod summary;
pub mod view;

pub use filter::{CategoryFilter, FilterCriteria, FilterPatch, StockFilter, filter_products};
pub use list::{ListPage, search_page};
pub use page::{DEFAULT_PAGE_SIZE, PageWindow, total_pages};
pub use saved_view::SavedView;
pub use search::{Searchable, matches_search};
pub use selection::SelectionSet;
pub use sort::{SortDirection, SortSpec, compare, sort_products};
pub use summary::Summary;
pub use view::{DerivedView, ViewController, derive};
