/// View helpers for the gallery window
///
/// - `gallery.rs` - Thumbnail cards and the wrapped grid
/// - `banner.rs` - The transient status banner

pub mod banner;
pub mod gallery;
