/// Catalog browsing module
///
/// This module handles:
/// - Scanning catalog directories for selectable images
/// - Memoizing scans in a bounded cache
/// - Generating and reusing on-disk thumbnails
/// - Slicing catalogs into pages

pub mod cache;
pub mod paginator;
pub mod scanner;
pub mod thumbnail;

pub use paginator::Paginator;
