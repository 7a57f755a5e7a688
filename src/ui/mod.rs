/// View helpers for the main window
pub mod catalog_view;
pub mod panels;
