//! Input resolution: command-line arguments and list files to [`WorkItem`]s.
//!
//! # Example
//!
//! ```
//! use channel_puller::input::resolve_inputs;
//!
//! let items = resolve_inputs(&["youtube.com/watch?v=abc", "https://example.com/"]).unwrap();
//! assert_eq!(items.len(), 2);
//! assert!(items[0].is_valid());
//! assert_eq!(items[1].error(), Some("Not YouTube URL"));
//! ```

mod error;
mod item;
mod resolve;

pub use error::InputError;
pub use item::WorkItem;
pub use resolve::{NOT_YOUTUBE_URL, YOUTUBE_HOST, classify_address, resolve_inputs};
