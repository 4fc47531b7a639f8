use std::collections::HashSet;

use tracing::{debug, error, info, warn};

use super::data::{GalleryItem, ImageRecord, PendingSelection, UploadRequest};
use super::notification::{Notification, NotificationId, NotificationKind, Notifier};
use crate::error::{Error, Result};

/// Token handed out for each file read; only the latest one is applied
pub type ReadToken = u64;

/// Where the pending selection currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPhase {
    Empty,
    Loading,
    Populated,
}

/// The Gallery owns every piece of client state.
///
/// Each operation is split in two: a `begin_*` call made when the user acts
/// and a `finish_*` call made once the async work (file read or HTTP request)
/// completes. Nothing else mutates the state.
#[derive(Debug, Default)]
pub struct Gallery {
    items: Vec<GalleryItem>,
    pending: Option<PendingSelection>,
    /// Token of the read that produced `pending`
    pending_token: ReadToken,
    latest_read: ReadToken,
    read_in_flight: bool,
    /// Token of the selection being uploaded, if any
    uploading: Option<ReadToken>,
    deleting: HashSet<String>,
    notifier: Notifier,
    initialized: bool,
}

impl Gallery {
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Initialize ==========

    /// Returns true the first time only; the list is fetched once.
    pub fn begin_initialize(&mut self) -> bool {
        if self.initialized {
            return false;
        }
        self.initialized = true;
        true
    }

    pub fn finish_initialize(
        &mut self,
        result: Result<Vec<ImageRecord>>,
    ) -> Option<NotificationId> {
        match result {
            Ok(records) => {
                info!("🖼️  Loaded {} images", records.len());
                self.items.clear();
                for record in records {
                    self.insert(record);
                }
                None
            }
            Err(err) => {
                // Keep whatever was uploaded while the list was in flight
                error!("Error fetching images: {}", err);
                Some(self.notifier.notify(NotificationKind::FetchFailed))
            }
        }
    }

    // ========== SelectFile ==========

    /// Start a file read and get the token its completion must carry
    pub fn begin_read(&mut self) -> ReadToken {
        self.latest_read += 1;
        self.read_in_flight = true;
        self.latest_read
    }

    /// Apply a completed read. Completions of superseded reads are dropped.
    pub fn finish_read(
        &mut self,
        token: ReadToken,
        result: Result<PendingSelection>,
    ) -> Option<NotificationId> {
        if token != self.latest_read {
            debug!(token, latest = self.latest_read, "discarding stale file read");
            return None;
        }
        self.read_in_flight = false;

        match result {
            Ok(selection) => {
                debug!(name = %selection.name, "file selected");
                self.pending = Some(selection);
                self.pending_token = token;
                None
            }
            Err(err) => {
                error!("Error reading file: {}", err);
                Some(self.notifier.notify(NotificationKind::ReadFailed))
            }
        }
    }

    // ========== Submit ==========

    /// Validate the selection and build the upload body.
    ///
    /// Fails with `MissingSelection` when nothing is selected and with
    /// `UploadInProgress` while an earlier upload is outstanding. Neither
    /// failure touches the state.
    pub fn begin_upload(&mut self) -> Result<UploadRequest> {
        if self.uploading.is_some() {
            return Err(Error::UploadInProgress);
        }
        let selection = self.pending.as_ref().ok_or(Error::MissingSelection)?;
        if selection.name.is_empty() || selection.content.is_empty() {
            return Err(Error::MissingSelection);
        }

        let request = selection.to_upload();
        self.uploading = Some(self.pending_token);
        info!("⏫ Uploading {}", request.name);
        Ok(request)
    }

    pub fn finish_upload(&mut self, result: Result<ImageRecord>) -> NotificationId {
        let submitted = self.uploading.take();

        match result {
            Ok(record) => {
                info!("✅ Uploaded {} as {}", record.name, record.id);
                self.insert(record);
                // A newer selection made during the upload stays in place
                if submitted == Some(self.pending_token) {
                    self.pending = None;
                }
                self.notifier.notify(NotificationKind::UploadSucceeded)
            }
            Err(err) => {
                error!("Error uploading image: {}", err);
                self.notifier.notify(NotificationKind::UploadFailed)
            }
        }
    }

    // ========== Delete ==========

    /// Returns false when a delete for this id is already outstanding
    pub fn begin_delete(&mut self, id: &str) -> bool {
        if !self.deleting.insert(id.to_string()) {
            debug!(id, "delete already in flight");
            return false;
        }
        true
    }

    pub fn finish_delete(&mut self, id: &str, result: Result<()>) -> NotificationId {
        self.deleting.remove(id);

        match result {
            Ok(()) => {
                let before = self.items.len();
                self.items.retain(|item| item.record.id != id);
                if self.items.len() == before {
                    warn!(id, "deleted image was not in the gallery");
                } else {
                    info!("🗑️  Deleted {}", id);
                }
                self.notifier.notify(NotificationKind::DeleteSucceeded)
            }
            Err(err) => {
                error!("Error deleting image {}: {}", id, err);
                self.notifier.notify(NotificationKind::DeleteFailed)
            }
        }
    }

    // ========== Notifications ==========

    pub fn expire_notification(&mut self, id: NotificationId) {
        self.notifier.expire(id);
    }

    pub fn dismiss_notification(&mut self) {
        self.notifier.dismiss();
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notifier.visible()
    }

    // ========== Queries ==========

    pub fn items(&self) -> &[GalleryItem] {
        &self.items
    }

    pub fn pending(&self) -> Option<&PendingSelection> {
        self.pending.as_ref()
    }

    pub fn phase(&self) -> SelectionPhase {
        if self.read_in_flight {
            SelectionPhase::Loading
        } else if self.pending.is_some() {
            SelectionPhase::Populated
        } else {
            SelectionPhase::Empty
        }
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading.is_some()
    }

    pub fn is_deleting(&self, id: &str) -> bool {
        self.deleting.contains(id)
    }

    /// Append a record, dropping any older entry with the same id
    fn insert(&mut self, record: ImageRecord) {
        if let Some(index) = self.items.iter().position(|item| item.record.id == record.id) {
            warn!(id = %record.id, "duplicate image id, keeping the newest");
            self.items.remove(index);
        }
        self.items.push(GalleryItem::from(record));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> ImageRecord {
        ImageRecord {
            id: id.to_string(),
            name: format!("{}.png", id),
            base64: "XYZ==".to_string(),
        }
    }

    fn selection(name: &str) -> PendingSelection {
        PendingSelection::new(
            name.to_string(),
            "data:image/png;base64,XYZ==".to_string(),
            Vec::new(),
        )
    }

    fn ids(gallery: &Gallery) -> Vec<String> {
        gallery.items().iter().map(|item| item.record.id.clone()).collect()
    }

    fn loaded(records: Vec<ImageRecord>) -> Gallery {
        let mut gallery = Gallery::new();
        assert!(gallery.begin_initialize());
        assert!(gallery.finish_initialize(Ok(records)).is_none());
        gallery
    }

    fn select(gallery: &mut Gallery, name: &str) {
        let token = gallery.begin_read();
        gallery.finish_read(token, Ok(selection(name)));
    }

    #[test]
    fn test_initialize_replaces_list() {
        let gallery = loaded(vec![record("a"), record("b")]);
        assert_eq!(ids(&gallery), vec!["a", "b"]);
        assert!(gallery.notification().is_none());
    }

    #[test]
    fn test_initialize_failure_leaves_empty_and_notifies() {
        let mut gallery = Gallery::new();
        gallery.begin_initialize();
        let id = gallery.finish_initialize(Err(Error::Request("connection refused".into())));

        assert!(id.is_some());
        assert!(gallery.items().is_empty());
        assert_eq!(
            gallery.notification().map(|n| n.kind),
            Some(NotificationKind::FetchFailed)
        );
    }

    #[test]
    fn test_failed_fetch_keeps_upload_made_meanwhile() {
        let mut gallery = Gallery::new();
        gallery.begin_initialize();

        select(&mut gallery, "up.png");
        gallery.begin_upload().unwrap();
        gallery.finish_upload(Ok(record("up")));
        assert_eq!(gallery.items().len(), 1);

        gallery.finish_initialize(Err(Error::Request("connection refused".into())));
        assert_eq!(ids(&gallery), vec!["up"]);
        assert_eq!(
            gallery.notification().map(|n| n.kind),
            Some(NotificationKind::FetchFailed)
        );
    }

    #[test]
    fn test_initialize_runs_once() {
        let mut gallery = Gallery::new();
        assert!(gallery.begin_initialize());
        assert!(!gallery.begin_initialize());
    }

    #[test]
    fn test_select_file_populates_selection() {
        let mut gallery = Gallery::new();
        assert_eq!(gallery.phase(), SelectionPhase::Empty);

        let token = gallery.begin_read();
        assert_eq!(gallery.phase(), SelectionPhase::Loading);

        gallery.finish_read(token, Ok(selection("a.png")));
        assert_eq!(gallery.phase(), SelectionPhase::Populated);
        let pending = gallery.pending().unwrap();
        assert_eq!(pending.name, "a.png");
        assert_eq!(pending.content, "data:image/png;base64,XYZ==");
    }

    #[test]
    fn test_stale_read_is_discarded() {
        let mut gallery = Gallery::new();
        let first = gallery.begin_read();
        let second = gallery.begin_read();

        gallery.finish_read(second, Ok(selection("second.png")));
        gallery.finish_read(first, Ok(selection("first.png")));

        assert_eq!(gallery.pending().unwrap().name, "second.png");
    }

    #[test]
    fn test_reselect_overwrites_selection() {
        let mut gallery = Gallery::new();
        select(&mut gallery, "a.png");
        select(&mut gallery, "b.png");
        assert_eq!(gallery.pending().unwrap().name, "b.png");
        assert_eq!(gallery.phase(), SelectionPhase::Populated);
    }

    #[test]
    fn test_failed_read_keeps_previous_selection() {
        let mut gallery = Gallery::new();
        select(&mut gallery, "a.png");

        let token = gallery.begin_read();
        let notified = gallery.finish_read(
            token,
            Err(Error::Read {
                path: "b.png".into(),
                reason: "permission denied".into(),
            }),
        );

        assert!(notified.is_some());
        assert_eq!(gallery.pending().unwrap().name, "a.png");
        assert_eq!(
            gallery.notification().map(|n| n.kind),
            Some(NotificationKind::ReadFailed)
        );
    }

    #[test]
    fn test_submit_without_selection_is_rejected() {
        let mut gallery = loaded(vec![record("a")]);
        assert_eq!(gallery.begin_upload(), Err(Error::MissingSelection));
        assert!(!gallery.is_uploading());
        assert_eq!(ids(&gallery), vec!["a"]);
        assert!(gallery.notification().is_none());
    }

    #[test]
    fn test_submit_strips_data_url_prefix() {
        let mut gallery = Gallery::new();
        select(&mut gallery, "a.png");

        let request = gallery.begin_upload().unwrap();
        assert_eq!(request.name, "a.png");
        assert_eq!(request.base64, "XYZ==");
        assert!(gallery.is_uploading());
    }

    #[test]
    fn test_second_submit_while_uploading_is_rejected() {
        let mut gallery = Gallery::new();
        select(&mut gallery, "a.png");

        gallery.begin_upload().unwrap();
        assert_eq!(gallery.begin_upload(), Err(Error::UploadInProgress));
    }

    #[test]
    fn test_successful_upload_appends_and_clears_selection() {
        let mut gallery = loaded(vec![record("a")]);
        select(&mut gallery, "b.png");

        gallery.begin_upload().unwrap();
        gallery.finish_upload(Ok(record("b")));

        assert_eq!(ids(&gallery), vec!["a", "b"]);
        assert!(gallery.pending().is_none());
        assert!(!gallery.is_uploading());
        assert_eq!(
            gallery.notification().map(|n| n.kind),
            Some(NotificationKind::UploadSucceeded)
        );
    }

    #[test]
    fn test_failed_upload_keeps_state() {
        let mut gallery = loaded(vec![record("a")]);
        select(&mut gallery, "b.png");

        gallery.begin_upload().unwrap();
        gallery.finish_upload(Err(Error::Status(500)));

        assert_eq!(ids(&gallery), vec!["a"]);
        assert_eq!(gallery.pending().unwrap().name, "b.png");
        assert!(!gallery.is_uploading());
        assert_eq!(
            gallery.notification().map(|n| n.kind),
            Some(NotificationKind::UploadFailed)
        );
    }

    #[test]
    fn test_selection_made_during_upload_survives() {
        let mut gallery = Gallery::new();
        select(&mut gallery, "a.png");
        gallery.begin_upload().unwrap();

        select(&mut gallery, "b.png");
        gallery.finish_upload(Ok(record("a")));

        assert_eq!(gallery.pending().unwrap().name, "b.png");
    }

    #[test]
    fn test_upload_with_existing_id_keeps_ids_unique() {
        let mut gallery = loaded(vec![record("a"), record("b")]);
        select(&mut gallery, "a.png");
        gallery.begin_upload().unwrap();
        gallery.finish_upload(Ok(record("a")));

        assert_eq!(ids(&gallery), vec!["b", "a"]);
    }

    #[test]
    fn test_delete_removes_matching_record() {
        let mut gallery = loaded(vec![record("a"), record("b"), record("c")]);

        assert!(gallery.begin_delete("b"));
        assert!(gallery.is_deleting("b"));
        gallery.finish_delete("b", Ok(()));

        assert_eq!(ids(&gallery), vec!["a", "c"]);
        assert!(!gallery.is_deleting("b"));
        assert_eq!(
            gallery.notification().map(|n| n.kind),
            Some(NotificationKind::DeleteSucceeded)
        );
    }

    #[test]
    fn test_delete_unknown_id_is_noop() {
        let mut gallery = loaded(vec![record("a")]);
        gallery.begin_delete("zzz");
        gallery.finish_delete("zzz", Ok(()));
        assert_eq!(ids(&gallery), vec!["a"]);
    }

    #[test]
    fn test_failed_delete_keeps_record() {
        let mut gallery = loaded(vec![record("a")]);
        gallery.begin_delete("a");
        gallery.finish_delete("a", Err(Error::Status(404)));

        assert_eq!(ids(&gallery), vec!["a"]);
        assert_eq!(
            gallery.notification().map(|n| n.kind),
            Some(NotificationKind::DeleteFailed)
        );
    }

    #[test]
    fn test_duplicate_delete_is_ignored_while_in_flight() {
        let mut gallery = loaded(vec![record("a")]);
        assert!(gallery.begin_delete("a"));
        assert!(!gallery.begin_delete("a"));
    }

    #[test]
    fn test_count_tracks_uploads_and_deletes() {
        let initial: Vec<_> = (0..3).map(|i| record(&format!("init-{}", i))).collect();
        let mut gallery = loaded(initial);

        let mut uploads = 0;
        let mut deletes = 0;
        for round in 0..10 {
            select(&mut gallery, "x.png");
            gallery.begin_upload().unwrap();
            gallery.finish_upload(Ok(record(&format!("up-{}", round))));
            uploads += 1;

            if round % 3 == 0 {
                let victim = gallery.items()[0].record.id.clone();
                gallery.begin_delete(&victim);
                gallery.finish_delete(&victim, Ok(()));
                deletes += 1;
            }
        }

        assert_eq!(gallery.items().len(), 3 + uploads - deletes);
    }

    #[test]
    fn test_count_holds_for_out_of_order_completions() {
        let mut gallery = loaded(vec![record("a"), record("b"), record("c")]);
        select(&mut gallery, "d.png");

        gallery.begin_upload().unwrap();
        assert!(gallery.begin_delete("a"));
        assert!(gallery.begin_delete("b"));

        // Completions arrive in reverse order, one delete fails
        gallery.finish_delete("b", Err(Error::Status(500)));
        gallery.finish_delete("a", Ok(()));
        gallery.finish_upload(Ok(record("d")));

        assert_eq!(gallery.items().len(), 3 + 1 - 1);
        assert_eq!(ids(&gallery), vec!["b", "c", "d"]);
        assert!(!gallery.is_deleting("a"));
        assert!(!gallery.is_deleting("b"));
        assert!(!gallery.is_uploading());
    }

    #[test]
    fn test_expired_notification_is_hidden() {
        let mut gallery = loaded(vec![record("a")]);
        gallery.begin_delete("a");
        let id = gallery.finish_delete("a", Ok(()));

        gallery.expire_notification(id);
        assert!(gallery.notification().is_none());
    }
}
