use log::{info, warn};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::state::data::{CatalogItem, Category};

/// Catalog image extensions (compared case-insensitively)
pub const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Anything that can produce the items of a catalog directory.
///
/// The cache only talks to this trait so tests can count scans.
pub trait CatalogSource {
    fn scan(&self, directory: &Path, category: Category) -> Vec<CatalogItem>;
}

/// Lists catalog images straight from the filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectoryScanner;

impl CatalogSource for DirectoryScanner {
    fn scan(&self, directory: &Path, category: Category) -> Vec<CatalogItem> {
        scan_directory(directory, category)
    }
}

/// List the images directly inside `directory`.
///
/// A missing directory is created and yields an empty catalog. Order follows
/// the directory listing and is not guaranteed to be sorted.
pub fn scan_directory(directory: &Path, category: Category) -> Vec<CatalogItem> {
    if !directory.exists() {
        if let Err(e) = fs::create_dir_all(directory) {
            warn!("⚠️  Could not create catalog directory {}: {}", directory.display(), e);
        } else {
            info!("📁 Created empty catalog directory: {}", directory.display());
        }
        return Vec::new();
    }

    let mut items = Vec::new();

    // Symlinked catalog images count as files
    let walker = WalkDir::new(directory)
        .follow_links(true)
        .min_depth(1)
        .max_depth(1);

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("⚠️  Error reading catalog entry in {}: {}", directory.display(), e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let filename = entry.file_name().to_string_lossy();
        if !is_catalog_image(&filename) {
            continue;
        }

        items.push(CatalogItem::new(
            display_name(&filename),
            entry.path().to_path_buf(),
            category,
        ));
    }

    info!(
        "🔍 Scanned {} {} items in {}",
        items.len(),
        category,
        directory.display()
    );
    items
}

/// Whether a filename carries one of the recognised image extensions
pub fn is_catalog_image(filename: &str) -> bool {
    match filename.rsplit_once('.') {
        Some((_, ext)) => {
            let ext = ext.to_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        }
        None => false,
    }
}

/// Turn `blue_tshirt.png` into `Blue Tshirt`
pub fn display_name(filename: &str) -> String {
    let stem = match filename.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => filename,
    };
    title_case(&stem.replace('_', " "))
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest
fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut previous_is_letter = false;

    for c in input.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            out.push(c);
            previous_is_letter = false;
        }
    }

    out
}
