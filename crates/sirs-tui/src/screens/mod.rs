pub mod products;

pub use products::ProductsScreen;
