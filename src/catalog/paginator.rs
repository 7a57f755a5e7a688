use log::debug;
use std::path::Path;

use super::cache::{CatalogCache, Clock, SystemClock};
use super::scanner::{CatalogSource, DirectoryScanner};
use super::thumbnail::{ensure_thumbnail, ThumbnailSettings};
use crate::state::data::{CatalogPage, Category};

/// Number of pages needed for `total_items`; always at least one
pub fn total_pages(total_items: usize, items_per_page: usize) -> usize {
    let per_page = items_per_page.max(1);
    total_items.div_ceil(per_page).max(1)
}

/// Clamp a requested page number into `1..=total_pages`
pub fn clamp_page(requested: usize, total_pages: usize) -> usize {
    requested.clamp(1, total_pages.max(1))
}

/// Serves fixed-size pages of a catalog with thumbnails attached
pub struct Paginator<S = DirectoryScanner, C = SystemClock> {
    cache: CatalogCache<S, C>,
    thumbnails: ThumbnailSettings,
}

impl<S: CatalogSource, C: Clock> Paginator<S, C> {
    pub fn with_cache(cache: CatalogCache<S, C>, thumbnails: ThumbnailSettings) -> Self {
        Self { cache, thumbnails }
    }

    pub fn cache_mut(&mut self) -> &mut CatalogCache<S, C> {
        &mut self.cache
    }

    /// Build page `page` of the catalog in `directory`.
    ///
    /// Out-of-range pages are clamped; only the items on the returned page
    /// get a thumbnail generated.
    pub fn paginate(
        &mut self,
        directory: &Path,
        category: Category,
        page: usize,
        items_per_page: usize,
    ) -> CatalogPage {
        let all_items = self.cache.get_or_scan(directory, category);
        let total_items = all_items.len();
        let per_page = items_per_page.max(1);

        let total_pages = total_pages(total_items, per_page);
        let current_page = clamp_page(page, total_pages);

        let start = ((current_page - 1) * per_page).min(total_items);
        let end = (start + per_page).min(total_items);

        let items = all_items[start..end]
            .iter()
            .map(|item| {
                let mut item = item.clone();
                item.thumbnail = Some(ensure_thumbnail(&item.source_path, &self.thumbnails));
                item
            })
            .collect();

        debug!(
            "Page {}/{} of {} ({} items total)",
            current_page,
            total_pages,
            directory.display(),
            total_items
        );

        CatalogPage {
            items,
            current_page,
            total_pages,
            total_items,
        }
    }

    /// Scan a catalog and generate thumbnails for every item in it
    pub fn preload(&mut self, directory: &Path, category: Category) -> usize {
        let items = self.cache.get_or_scan(directory, category);
        let ready = items
            .iter()
            .map(|item| ensure_thumbnail(&item.source_path, &self.thumbnails))
            .filter(|outcome| outcome.is_ready())
            .count();
        debug!(
            "Preloaded {}/{} thumbnails for {}",
            ready,
            items.len(),
            directory.display()
        );
        ready
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::cache::tests::CountingScanner;
    use crate::catalog::thumbnail::ThumbnailOutcome;
    use image::{Rgb, RgbImage};
    use std::collections::HashSet;
    use std::fs;
    use std::path::PathBuf;

    fn clothing_catalog(names: &[&str]) -> (tempfile::TempDir, PathBuf) {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("catalog").join("clothing");
        fs::create_dir_all(&dir).unwrap();
        for name in names {
            RgbImage::from_pixel(60, 90, Rgb([10, 20, 30]))
                .save(dir.join(name))
                .unwrap();
        }
        (root, dir)
    }

    fn paginator() -> Paginator {
        Paginator::with_cache(CatalogCache::new(10), ThumbnailSettings::default())
    }

    fn names(page: &CatalogPage) -> HashSet<String> {
        page.items.iter().map(|i| i.display_name.clone()).collect()
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 6), 1);
        assert_eq!(total_pages(6, 6), 1);
        assert_eq!(total_pages(7, 6), 2);
        assert_eq!(total_pages(3, 2), 2);
        assert_eq!(total_pages(5, 0), 5);
    }

    #[test]
    fn test_clamp_page() {
        assert_eq!(clamp_page(0, 3), 1);
        assert_eq!(clamp_page(2, 3), 2);
        assert_eq!(clamp_page(1_000_000, 3), 3);
        assert_eq!(clamp_page(4, 0), 1);
    }

    #[test]
    fn test_three_items_two_per_page() {
        let (_root, dir) =
            clothing_catalog(&["blue_tshirt.png", "red_dress.png", "black_jacket.png"]);
        let mut paginator = paginator();

        let first = paginator.paginate(&dir, Category::Clothing, 1, 2);
        assert_eq!(first.items.len(), 2);
        assert_eq!(first.current_page, 1);
        assert_eq!(first.total_pages, 2);
        assert_eq!(first.total_items, 3);
        assert!(first.has_next());

        let second = paginator.paginate(&dir, Category::Clothing, 2, 2);
        assert_eq!(second.items.len(), 1);
        assert_eq!(second.current_page, 2);
        assert!(!second.has_next());

        let all: HashSet<String> = names(&first).union(&names(&second)).cloned().collect();
        assert_eq!(
            all,
            HashSet::from([
                "Blue Tshirt".to_string(),
                "Red Dress".to_string(),
                "Black Jacket".to_string(),
            ])
        );
    }

    #[test]
    fn test_out_of_range_pages_are_clamped() {
        let (_root, dir) = clothing_catalog(&["a.png", "b.png", "c.png", "d.png", "e.png"]);
        let mut paginator = paginator();

        let low = paginator.paginate(&dir, Category::Clothing, 0, 2);
        assert_eq!(low.current_page, 1);
        assert_eq!(low.total_pages, 3);

        let high = paginator.paginate(&dir, Category::Clothing, 1_000_000, 2);
        assert_eq!(high.current_page, 3);
        assert_eq!(high.items.len(), 1);
    }

    #[test]
    fn test_empty_catalog_has_one_page() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("catalog").join("accessories");
        let mut paginator = paginator();

        let page = paginator.paginate(&dir, Category::Accessory, 5, 6);
        assert!(page.is_empty());
        assert_eq!(page.current_page, 1);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.total_items, 0);
        assert!(dir.is_dir());
    }

    #[test]
    fn test_only_visible_items_get_thumbnails() {
        let (_root, dir) = clothing_catalog(&["a.png", "b.png", "c.png"]);
        let mut paginator = paginator();

        let page = paginator.paginate(&dir, Category::Clothing, 1, 1);
        let shown = &page.items[0];
        assert!(matches!(shown.thumbnail, Some(ThumbnailOutcome::Ready(_))));
        assert_ne!(shown.display_path(), shown.source_path.as_path());

        let generated = fs::read_dir(dir.join("thumbnails")).unwrap().count();
        assert_eq!(generated, 1);
    }

    #[test]
    fn test_broken_image_falls_back_without_failing_the_page() {
        let (_root, dir) = clothing_catalog(&[]);
        fs::write(dir.join("broken.png"), b"not an image").unwrap();
        let mut paginator = paginator();

        let page = paginator.paginate(&dir, Category::Clothing, 1, 6);
        assert_eq!(page.items.len(), 1);
        let item = &page.items[0];
        assert_eq!(item.display_path(), item.source_path.as_path());
        assert!(matches!(item.thumbnail, Some(ThumbnailOutcome::Fallback { .. })));
    }

    #[test]
    fn test_unwritable_thumbnail_dir_still_yields_a_full_page() {
        let (root, dir) = clothing_catalog(&["a.png", "b.png", "c.png"]);
        let blocker = root.path().join("blocker");
        fs::write(&blocker, b"x").unwrap();
        let settings = ThumbnailSettings {
            output_dir: Some(blocker.join("thumbs")),
            ..ThumbnailSettings::default()
        };
        let mut paginator = Paginator::with_cache(CatalogCache::new(10), settings);

        let page = paginator.paginate(&dir, Category::Clothing, 2, 2);
        assert_eq!(page.current_page, 2);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.total_items, 3);
        assert_eq!(page.items.len(), 1);
        for item in &page.items {
            assert_eq!(item.display_path(), item.source_path.as_path());
            assert!(matches!(item.thumbnail, Some(ThumbnailOutcome::Fallback { .. })));
        }
        assert_eq!(paginator.preload(&dir, Category::Clothing), 0);
    }

    #[test]
    fn test_pages_share_one_scan() {
        let (_root, dir) = clothing_catalog(&["a.png", "b.png", "c.png"]);
        let scanner = CountingScanner::default();
        let cache = CatalogCache::with_source(scanner.clone(), SystemClock, 10);
        let mut paginator = Paginator::with_cache(cache, ThumbnailSettings::default());

        for page in 1..=3 {
            paginator.paginate(&dir, Category::Clothing, page, 1);
        }
        assert_eq!(scanner.count(), 1);
    }

    #[test]
    fn test_preload_generates_every_thumbnail() {
        let (_root, dir) = clothing_catalog(&["a.png", "b.png", "c.png"]);
        let mut paginator = paginator();

        assert_eq!(paginator.preload(&dir, Category::Clothing), 3);
        assert_eq!(fs::read_dir(dir.join("thumbnails")).unwrap().count(), 3);
    }
}
