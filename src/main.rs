use iced::widget::{button, column, container, row, scrollable, text, Column};
use iced::{Alignment, Element, Length, Task, Theme};
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageLevel};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, warn};
use tracing_subscriber::{fmt, EnvFilter};

mod api;
mod config;
mod error;
mod file;
mod state;
mod ui;

use api::{HttpImageApi, ImageApi};
use config::Settings;
use error::{Error, Result};
use state::data::{ImageRecord, PendingSelection};
use state::gallery::{Gallery, ReadToken, SelectionPhase};
use state::notification::NotificationId;

/// Main application state
struct ImageGallery {
    /// Client for the remote image API
    api: Arc<dyn ImageApi>,
    /// Everything the user sees: images, selection, banner
    gallery: Gallery,
    settings: Settings,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// Initial image list arrived (or failed)
    ImagesLoaded(Result<Vec<ImageRecord>>),
    /// User clicked the "Choose Image" button
    ChooseFile,
    /// Background file read completed
    FileRead(ReadToken, Result<PendingSelection>),
    /// User clicked the "Upload" button
    Submit,
    /// Upload request completed
    Uploaded(Result<ImageRecord>),
    /// User clicked "Delete" on a thumbnail
    Delete(String),
    /// Delete request completed
    Deleted(String, Result<()>),
    /// Auto-dismiss timer for a banner fired
    NotificationExpired(NotificationId),
    /// User closed the banner
    DismissNotification,
}

impl ImageGallery {
    /// Create a new instance of the application and fetch the image list
    fn new(settings: Settings, api: Arc<dyn ImageApi>) -> (Self, Task<Message>) {
        let mut app = ImageGallery {
            api,
            gallery: Gallery::new(),
            settings,
        };
        let task = app.initialize();
        (app, task)
    }

    fn initialize(&mut self) -> Task<Message> {
        if !self.gallery.begin_initialize() {
            return Task::none();
        }

        let api = Arc::clone(&self.api);
        Task::perform(
            async move { api.list_images().await },
            Message::ImagesLoaded,
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::ImagesLoaded(result) => {
                let notified = self.gallery.finish_initialize(result);
                self.schedule_dismiss(notified)
            }
            Message::ChooseFile => {
                // Show the native file picker dialog
                let path = FileDialog::new().set_title("Choose Image").pick_file();
                self.select_file(path)
            }
            Message::FileRead(token, result) => {
                let notified = self.gallery.finish_read(token, result);
                self.schedule_dismiss(notified)
            }
            Message::Submit => match self.submit() {
                Ok(upload) => Task::perform(upload, Message::Uploaded),
                Err(Error::MissingSelection) => {
                    warn!("⚠️  Upload requested without a selected image");
                    warn_missing_selection();
                    Task::none()
                }
                Err(err) => {
                    debug!("upload ignored: {}", err);
                    Task::none()
                }
            },
            Message::Uploaded(result) => {
                let notified = self.gallery.finish_upload(result);
                self.schedule_dismiss(Some(notified))
            }
            Message::Delete(id) => {
                if !self.gallery.begin_delete(&id) {
                    return Task::none();
                }

                let api = Arc::clone(&self.api);
                Task::perform(
                    async move {
                        let result = api.delete_image(&id).await;
                        (id, result)
                    },
                    |(id, result)| Message::Deleted(id, result),
                )
            }
            Message::Deleted(id, result) => {
                let notified = self.gallery.finish_delete(&id, result);
                self.schedule_dismiss(Some(notified))
            }
            Message::NotificationExpired(id) => {
                self.gallery.expire_notification(id);
                Task::none()
            }
            Message::DismissNotification => {
                self.gallery.dismiss_notification();
                Task::none()
            }
        }
    }

    /// Start reading the picked file; a cancelled picker changes nothing
    fn select_file(&mut self, path: Option<PathBuf>) -> Task<Message> {
        let Some(path) = path else {
            debug!("file selection cancelled");
            return Task::none();
        };

        let token = self.gallery.begin_read();
        Task::perform(file::read_selection(path), move |result| {
            Message::FileRead(token, result)
        })
    }

    /// Validate the selection and prepare the upload request.
    /// Nothing is sent unless the selection is valid.
    fn submit(&mut self) -> Result<impl Future<Output = Result<ImageRecord>> + Send + 'static> {
        let request = self.gallery.begin_upload()?;
        let api = Arc::clone(&self.api);
        Ok(async move { api.upload_image(request).await })
    }

    /// Hide a freshly shown banner once the configured timeout elapses
    fn schedule_dismiss(&self, notified: Option<NotificationId>) -> Task<Message> {
        let Some(id) = notified else {
            return Task::none();
        };

        let timeout = self.settings.notification_timeout();
        Task::perform(async move { tokio::time::sleep(timeout).await }, move |_| {
            Message::NotificationExpired(id)
        })
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        let uploading = self.gallery.is_uploading();

        let controls = row![
            button("Choose Image")
                .on_press(Message::ChooseFile)
                .padding(10),
            button(if uploading { "Uploading..." } else { "Upload" })
                .on_press_maybe((!uploading).then_some(Message::Submit))
                .padding(10),
        ]
        .spacing(12);

        let selection: Option<Element<'_, Message>> = match self.gallery.phase() {
            SelectionPhase::Loading => Some(text("Reading file...").size(14).into()),
            SelectionPhase::Populated => self.gallery.pending().map(ui::gallery::preview),
            SelectionPhase::Empty => None,
        };

        let content: Column<'_, Message> = column![text("Image Upload").size(36), controls]
            .push_maybe(selection)
            .push(text("Uploaded Images").size(22))
            .push(ui::gallery::grid(&self.gallery))
            .spacing(20)
            .padding(40)
            .align_x(Alignment::Center);

        let page = column![
            scrollable(container(content).center_x(Length::Fill)).height(Length::Fill)
        ]
        .push_maybe(self.gallery.notification().map(ui::banner::banner))
        .padding(8);

        container(page)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Blocking warning shown when Upload is pressed with nothing selected
fn warn_missing_selection() {
    let _ = MessageDialog::new()
        .set_level(MessageLevel::Warning)
        .set_title("Image Upload")
        .set_description("Please select an image first.")
        .set_buttons(MessageButtons::Ok)
        .show();
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("image_gallery=info,wgpu=warn,iced=warn"));
    fmt().with_env_filter(filter).with_target(true).init();
}

fn main() -> iced::Result {
    init_tracing();

    let settings = Settings::load();
    let api: Arc<dyn ImageApi> = match HttpImageApi::new(&settings) {
        Ok(api) => Arc::new(api),
        Err(e) => {
            error!("❌ {}", e);
            std::process::exit(1);
        }
    };

    iced::application("Image Gallery", ImageGallery::update, ImageGallery::view)
        .theme(ImageGallery::theme)
        .centered()
        .run_with(move || ImageGallery::new(settings, api))
}
