use iced::widget::image::{Handle, Image};
use iced::widget::{button, column, container, row, text, Column, Row, Space};
use iced::{Alignment, Element, Length};

use crate::state::data::{CatalogItem, CatalogPage, Category};
use crate::state::session::Session;
use crate::Message;

/// Items per grid row
const GRID_COLUMNS: usize = 3;

/// Height of a thumbnail cell in the grid
const CARD_IMAGE_HEIGHT: f32 = 220.0;

/// One catalog tab: pagination controls above a grid of item cards
pub fn catalog_tab<'a>(
    page: &'a CatalogPage,
    category: Category,
    session: &'a Session,
) -> Element<'a, Message> {
    let heading = match category {
        Category::Clothing => "Clothing Items",
        Category::Accessory => "Accessories",
    };

    if page.is_empty() {
        let empty = match category {
            Category::Clothing => "No clothing items found in the catalog.",
            Category::Accessory => "No accessory items found in the catalog.",
        };
        return column![
            text(heading).size(22),
            text(empty).size(16),
            refresh_button(category),
        ]
        .spacing(12)
        .into();
    }

    column![
        text(heading).size(22),
        pagination_controls(page, category),
        item_grid(&page.items, session),
    ]
    .spacing(12)
    .into()
}

/// Prev / "Page X of Y" / Next
fn pagination_controls<'a>(page: &CatalogPage, category: Category) -> Element<'a, Message> {
    let previous = button("← Prev")
        .on_press_maybe(page.has_previous().then_some(Message::PreviousPage(category)))
        .style(button::secondary);
    let next = button("Next →")
        .on_press_maybe(page.has_next().then_some(Message::NextPage(category)))
        .style(button::secondary);

    row![
        previous,
        Space::with_width(Length::Fill),
        text(format!("Page {} of {}", page.current_page, page.total_pages)).size(14),
        Space::with_width(Length::Fill),
        next,
        refresh_button(category),
    ]
    .spacing(8)
    .align_y(Alignment::Center)
    .into()
}

/// Rescan the catalog directory, picking up added or removed files
fn refresh_button<'a>(category: Category) -> Element<'a, Message> {
    button("⟳ Refresh")
        .on_press(Message::RefreshCatalog(category))
        .style(button::text)
        .into()
}

fn item_grid<'a>(items: &'a [CatalogItem], session: &'a Session) -> Element<'a, Message> {
    let rows = items.chunks(GRID_COLUMNS).map(|chunk| {
        let mut cells: Vec<Element<'a, Message>> = chunk
            .iter()
            .map(|item| item_card(item, session.is_selected(&item.source_path)))
            .collect();
        // Pad the last row so cards keep the same width
        while cells.len() < GRID_COLUMNS {
            cells.push(Space::with_width(Length::FillPortion(1)).into());
        }
        Row::with_children(cells).spacing(12).into()
    });

    Column::with_children(rows).spacing(12).into()
}

fn item_card(item: &CatalogItem, selected: bool) -> Element<'_, Message> {
    let picture = Image::new(Handle::from_path(item.display_path()))
        .width(Length::Fill)
        .height(Length::Fixed(CARD_IMAGE_HEIGHT));

    let toggle = if selected {
        button("✓ Selected").style(button::primary)
    } else {
        button("Select").style(button::secondary)
    }
    .on_press(Message::ToggleItem(item.source_path.clone()))
    .width(Length::Fill);

    container(
        column![picture, text(item.display_name.as_str()).size(14), toggle]
            .spacing(6)
            .align_x(Alignment::Center),
    )
    .padding(8)
    .width(Length::FillPortion(1))
    .style(container::rounded_box)
    .into()
}
