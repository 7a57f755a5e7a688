use iced::widget::image::{Handle, Image};
use iced::widget::{button, column, container, row, text, text_input, Column, Row};
use iced::{Element, Length};

use crate::state::session::Session;
use crate::{Message, Tab};

/// Photo picker and selection summary
pub fn sidebar<'a>(session: &'a Session, status: &'a str) -> Element<'a, Message> {
    let mut content = Column::new()
        .spacing(12)
        .width(Length::Fixed(260.0))
        .push(text("Options").size(24))
        .push(text("📷 Your Profile Photo").size(16))
        .push(button("Upload your photo").on_press(Message::PickPhoto));

    match &session.user_photo {
        Some(photo) => {
            content = content
                .push(Image::new(Handle::from_path(photo)).width(Length::Fill))
                .push(text("Your Profile Photo").size(12));
        }
        None => {
            content = content
                .push(text("Please upload your photo or use a sample").size(12))
                .push(
                    button("Use Sample Photo")
                        .on_press(Message::UseSamplePhoto)
                        .style(button::secondary),
                );
        }
    }

    let selected = session.selected_items().len();
    if selected > 0 {
        content = content.push(text(format!("{} items selected for try-on", selected)).size(14));
    }

    content = content.push(text(status).size(12));

    container(content).padding(16).height(Length::Fill).into()
}

/// Clothing / Accessories / Upload Your Item
pub fn tab_bar<'a>(active: Tab) -> Element<'a, Message> {
    let tab = |label: &'a str, tab: Tab| {
        let style = if tab == active {
            button::primary
        } else {
            button::secondary
        };
        button(label).style(style).on_press(Message::SelectTab(tab))
    };

    row![
        tab("Clothing", Tab::Clothing),
        tab("Accessories", Tab::Accessories),
        tab("Upload Your Item", Tab::UploadItem),
    ]
    .spacing(8)
    .into()
}

/// Upload an item that is not part of the catalog
pub fn upload_item_tab(session: &Session) -> Element<'_, Message> {
    let mut content = Column::new()
        .spacing(12)
        .push(text("Upload Your Own Item").size(22))
        .push(button("Upload clothing or accessories").on_press(Message::PickCustomItem));

    if let Some(item) = &session.custom_item {
        let toggle = if session.is_selected(item) {
            button("✓ Selected").style(button::primary)
        } else {
            button("Select Item").style(button::secondary)
        };
        content = content
            .push(Image::new(Handle::from_path(item)).width(Length::Fixed(200.0)))
            .push(toggle.on_press(Message::ToggleItem(item.clone())));
    }

    content.into()
}

/// Prompt add-on and the generate button
pub fn generate_controls(session: &Session, generating: bool) -> Element<'_, Message> {
    let label = if generating {
        "Generating your virtual try-on image..."
    } else {
        "Generate Try-On Image"
    };
    let enabled = session.can_generate() && !generating;

    column![
        text("Additional Instructions (Optional)").size(18),
        text_input(
            "e.g. 'Make it a professional look', 'Add a casual background'",
            &session.prompt_addon,
        )
        .on_input(Message::PromptChanged)
        .padding(8),
        button(label)
            .style(button::primary)
            .on_press_maybe(enabled.then_some(Message::Generate)),
    ]
    .spacing(10)
    .into()
}

/// Selected items with remove buttons, then the generated picture
pub fn result_panel(session: &Session) -> Element<'_, Message> {
    let mut content = Column::new()
        .spacing(12)
        .push(text("Your Virtual Try-On Result").size(24));

    if !session.selected_items().is_empty() {
        content = content.push(text("Selected Items:").size(16));
        for chunk in session.selected_items().chunks(3) {
            let cells = chunk.iter().map(|path| {
                column![
                    Image::new(Handle::from_path(path)).height(Length::Fixed(100.0)),
                    button("Remove")
                        .style(button::danger)
                        .on_press(Message::RemoveItem(path.clone())),
                ]
                .spacing(4)
                .width(Length::FillPortion(1))
                .into()
            });
            content = content.push(Row::with_children(cells).spacing(8));
        }
    }

    content = match &session.result {
        Some(result) => content
            .push(Image::new(Handle::from_path(result)).width(Length::Fill))
            .push(text(format!("Saved to {}", result.display())).size(12))
            .push(
                button("💾 Save As…")
                    .style(button::secondary)
                    .on_press(Message::SaveResult),
            ),
        None => content.push(
            text("Your virtual try-on image will appear here after generation.").size(14),
        ),
    };

    container(content).padding(16).width(Length::FillPortion(2)).into()
}
