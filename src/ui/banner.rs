use iced::widget::{button, container, row, text, Space};
use iced::{Alignment, Element, Length, Theme};

use crate::state::notification::Notification;
use crate::Message;

/// The status banner with its close button
pub fn banner(notification: &Notification) -> Element<'_, Message> {
    let style: fn(&Theme) -> text::Style = if notification.kind.is_error() {
        text::danger
    } else {
        text::success
    };

    let content = row![
        text(notification.message()).size(16).style(style),
        Space::with_width(Length::Fill),
        button(text("Close").size(14))
            .style(button::text)
            .on_press(Message::DismissNotification),
    ]
    .spacing(12)
    .align_y(Alignment::Center);

    container(content)
        .width(Length::Fill)
        .padding(12)
        .style(container::rounded_box)
        .into()
}
