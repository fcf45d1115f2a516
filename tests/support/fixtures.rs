//! Canned page bodies for integration tests.

/// A trimmed watch page carrying both the title and channel markers.
pub const VIDEO_PAGE: &[u8] = include_bytes!("../fixtures/video_page.html");

/// Title found in [`VIDEO_PAGE`].
pub const VIDEO_PAGE_TITLE: &str = "Rustacean Station, Live";

/// Channel address found in [`VIDEO_PAGE`].
pub const VIDEO_PAGE_CHANNEL: &str = "https://www.youtube.com/@rustacean-station";
