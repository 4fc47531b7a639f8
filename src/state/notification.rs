/// Single-slot status banner
///
/// Only the latest notification is kept. Each one gets a fresh id so a
/// delayed auto-dismiss can tell whether it still targets the current banner.

/// Identifier of an emitted notification
pub type NotificationId = u64;

/// What happened, as far as the user is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    FetchFailed,
    ReadFailed,
    UploadSucceeded,
    UploadFailed,
    DeleteSucceeded,
    DeleteFailed,
}

impl NotificationKind {
    /// Text shown in the banner
    pub fn message(self) -> &'static str {
        match self {
            NotificationKind::FetchFailed => "Failed to fetch images.",
            NotificationKind::ReadFailed => "Failed to read the selected file.",
            NotificationKind::UploadSucceeded => "Image uploaded successfully!",
            NotificationKind::UploadFailed => "Failed to upload image.",
            NotificationKind::DeleteSucceeded => "Image deleted successfully!",
            NotificationKind::DeleteFailed => "Failed to delete image.",
        }
    }

    pub fn is_error(self) -> bool {
        !matches!(
            self,
            NotificationKind::UploadSucceeded | NotificationKind::DeleteSucceeded
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub visible: bool,
}

impl Notification {
    pub fn message(&self) -> &'static str {
        self.kind.message()
    }
}

#[derive(Debug, Default)]
pub struct Notifier {
    current: Option<Notification>,
    next_id: NotificationId,
}

impl Notifier {
    /// Replace whatever is shown with a new notification
    pub fn notify(&mut self, kind: NotificationKind) -> NotificationId {
        self.next_id += 1;
        let id = self.next_id;
        self.current = Some(Notification {
            id,
            kind,
            visible: true,
        });
        id
    }

    /// The banner to render, if any
    pub fn visible(&self) -> Option<&Notification> {
        self.current.as_ref().filter(|n| n.visible)
    }

    /// Auto-dismiss: hides the banner only if `id` is still the current one
    pub fn expire(&mut self, id: NotificationId) -> bool {
        match self.current.as_mut() {
            Some(current) if current.id == id && current.visible => {
                current.visible = false;
                true
            }
            _ => false,
        }
    }

    /// Explicit close from the user
    pub fn dismiss(&mut self) {
        if let Some(current) = self.current.as_mut() {
            current.visible = false;
        }
    }
}
