use iced::widget::{button, column, container, text, Image};
use iced::{Alignment, Element, Length};
use iced_aw::Wrap;

use crate::state::data::{GalleryItem, PendingSelection};
use crate::state::gallery::Gallery;
use crate::Message;

/// Width of a thumbnail card
const CARD_WIDTH: f32 = 200.0;

/// Largest width of the pending selection preview
const PREVIEW_WIDTH: f32 = 400.0;

/// All uploaded images as a wrapping grid, or a placeholder when empty
pub fn grid(gallery: &Gallery) -> Element<'_, Message> {
    if gallery.items().is_empty() {
        return text("No images uploaded yet.").into();
    }

    let cards: Vec<Element<'_, Message>> = gallery
        .items()
        .iter()
        .map(|item| card(item, gallery.is_deleting(&item.record.id)))
        .collect();

    Wrap::with_elements(cards).into()
}

/// One thumbnail with its name and a delete button
fn card(item: &GalleryItem, deleting: bool) -> Element<'_, Message> {
    let picture: Element<'_, Message> = match &item.thumbnail {
        Some(handle) => Image::new(handle.clone()).width(Length::Fill).into(),
        None => text("Preview unavailable").size(14).into(),
    };

    let delete = button(text(if deleting { "Deleting..." } else { "Delete" }))
        .style(button::danger)
        .on_press_maybe((!deleting).then(|| Message::Delete(item.record.id.clone())));

    let body = column![
        picture,
        text(item.record.name.as_str()).size(14),
        text(item.mime).size(11),
        delete,
    ]
    .spacing(8)
    .align_x(Alignment::Center);

    // Outer container acts as the grid gutter
    container(
        container(body)
            .width(Length::Fixed(CARD_WIDTH))
            .padding(8)
            .style(container::rounded_box),
    )
    .padding(8)
    .into()
}

/// The chosen file, shown before it is uploaded
pub fn preview(selection: &PendingSelection) -> Element<'_, Message> {
    let body = column![
        Image::new(selection.preview.clone()).width(Length::Fixed(PREVIEW_WIDTH)),
        text(selection.name.as_str()).size(14),
    ]
    .spacing(12)
    .align_x(Alignment::Center);

    container(body)
        .padding(8)
        .style(container::bordered_box)
        .into()
}
