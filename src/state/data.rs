/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the catalog layer and the UI layer.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::catalog::thumbnail::ThumbnailOutcome;

/// Which catalog an item belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Clothing,
    Accessory,
}

impl Category {
    /// Name of the catalog sub-directory holding this category
    pub fn dir_name(self) -> &'static str {
        match self {
            Category::Clothing => "clothing",
            Category::Accessory => "accessories",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Clothing => write!(f, "clothing"),
            Category::Accessory => write!(f, "accessory"),
        }
    }
}

/// Represents a single selectable image in a catalog
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogItem {
    /// Human readable name derived from the filename (e.g., "Blue Tshirt")
    pub display_name: String,
    /// Full path to the original image; this is the item's identity
    pub source_path: PathBuf,
    pub category: Category,
    /// Attached by the paginator for items on the visible page only
    pub thumbnail: Option<ThumbnailOutcome>,
}

impl CatalogItem {
    pub fn new(display_name: String, source_path: PathBuf, category: Category) -> Self {
        Self {
            display_name,
            source_path,
            category,
            thumbnail: None,
        }
    }

    /// Path to show in the grid: the thumbnail when one is attached,
    /// otherwise the full-size source image
    pub fn display_path(&self) -> &Path {
        self.thumbnail
            .as_ref()
            .map(ThumbnailOutcome::path)
            .unwrap_or(&self.source_path)
    }
}

/// One page of a catalog, recomputed on every request
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogPage {
    pub items: Vec<CatalogItem>,
    /// 1-indexed, always within `1..=total_pages`
    pub current_page: usize,
    /// Never less than 1, even for an empty catalog
    pub total_pages: usize,
    pub total_items: usize,
}

impl CatalogPage {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}
