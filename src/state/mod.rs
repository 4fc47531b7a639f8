/// State management module
///
/// This module handles all client state, including:
/// - Shared data structures and the API wire format (data.rs)
/// - The gallery controller and its request lifecycle (gallery.rs)
/// - The single-slot status banner (notification.rs)

pub mod data;
pub mod gallery;
pub mod notification;
