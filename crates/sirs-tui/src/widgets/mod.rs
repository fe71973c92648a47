pub mod overlay;
pub mod sub_tabs;
