/// Per-run UI session: current pages, selected items and the user's photo
use std::path::{Path, PathBuf};

use super::data::Category;

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    clothing_page: usize,
    accessories_page: usize,
    /// Source paths in the order they were selected
    selected_items: Vec<PathBuf>,
    pub user_photo: Option<PathBuf>,
    /// Last item uploaded through the "Upload Your Item" tab
    pub custom_item: Option<PathBuf>,
    pub prompt_addon: String,
    pub result: Option<PathBuf>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            clothing_page: 1,
            accessories_page: 1,
            selected_items: Vec::new(),
            user_photo: None,
            custom_item: None,
            prompt_addon: String::new(),
            result: None,
        }
    }
}

impl Session {
    pub fn page(&self, category: Category) -> usize {
        match category {
            Category::Clothing => self.clothing_page,
            Category::Accessory => self.accessories_page,
        }
    }

    /// Store the page actually shown (already clamped by the paginator)
    pub fn set_page(&mut self, category: Category, page: usize) {
        let page = page.max(1);
        match category {
            Category::Clothing => self.clothing_page = page,
            Category::Accessory => self.accessories_page = page,
        }
    }

    pub fn selected_items(&self) -> &[PathBuf] {
        &self.selected_items
    }

    pub fn is_selected(&self, path: &Path) -> bool {
        self.selected_items.iter().any(|p| p == path)
    }

    /// Append `path` if absent, remove it if present. Returns whether it is
    /// selected afterwards.
    pub fn toggle_selection(&mut self, path: &Path) -> bool {
        if self.remove_selection(path) {
            false
        } else {
            self.selected_items.push(path.to_path_buf());
            true
        }
    }

    /// Returns whether the item was selected
    pub fn remove_selection(&mut self, path: &Path) -> bool {
        let before = self.selected_items.len();
        self.selected_items.retain(|p| p != path);
        self.selected_items.len() != before
    }

    pub fn can_generate(&self) -> bool {
        self.user_photo.is_some() && !self.selected_items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_selection_keeps_order() {
        let mut session = Session::default();
        let dress = Path::new("catalog/clothing/red_dress.png");
        let hat = Path::new("catalog/accessories/hat.png");

        assert!(session.toggle_selection(dress));
        assert!(session.toggle_selection(hat));
        assert_eq!(session.selected_items(), &[dress.to_path_buf(), hat.to_path_buf()]);

        assert!(!session.toggle_selection(dress));
        assert!(!session.is_selected(dress));
        assert_eq!(session.selected_items(), &[hat.to_path_buf()]);
    }

    #[test]
    fn test_can_generate_needs_photo_and_item() {
        let mut session = Session::default();
        assert!(!session.can_generate());

        session.toggle_selection(Path::new("catalog/clothing/red_dress.png"));
        assert!(!session.can_generate());

        session.user_photo = Some(PathBuf::from("uploads/user_images/1234abcd.png"));
        assert!(session.can_generate());

        assert!(session.remove_selection(Path::new("catalog/clothing/red_dress.png")));
        assert!(!session.can_generate());
    }

    #[test]
    fn test_pages_are_tracked_per_category() {
        let mut session = Session::default();
        session.set_page(Category::Clothing, 3);
        session.set_page(Category::Accessory, 0);
        assert_eq!(session.page(Category::Clothing), 3);
        assert_eq!(session.page(Category::Accessory), 1);
    }
}
