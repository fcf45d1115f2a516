//! Expansion of command-line inputs into ordered work items.
//!
//! Each input is either a video page address or the path of a text file
//! listing more inputs, one per line. Files are expanded in place, so the
//! resulting order is a depth-first walk of the arguments.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument, trace};
use url::Url;

use super::error::InputError;
use super::item::WorkItem;

/// The only host whose pages are fetched.
pub const YOUTUBE_HOST: &str = "www.youtube.com";

/// Error text for addresses on any other host.
pub const NOT_YOUTUBE_URL: &str = "Not YouTube URL";

/// Scheme-less prefixes that are promoted to full addresses.
const SCHEMELESS_PREFIXES: &[(&str, &str)] = &[
    ("youtube.com/", "https://www."),
    ("www.youtube.com/", "https://"),
];

/// Resolves command-line inputs into work items, preserving order.
///
/// # Rules
///
/// - `youtube.com/...` and `www.youtube.com/...` gain an `https://` prefix
/// - `http://` and `https://` inputs become one item each, validated by
///   [`classify_address`]
/// - anything else is a path to a line-delimited file whose non-blank lines
///   are resolved recursively with the same rules
///
/// # Errors
///
/// Returns [`InputError::Read`] if a file cannot be read and
/// [`InputError::Cycle`] if a file includes itself.
#[instrument(skip(inputs))]
pub fn resolve_inputs<S: AsRef<str>>(inputs: &[S]) -> Result<Vec<WorkItem>, InputError> {
    let mut resolver = Resolver::default();
    for input in inputs {
        resolver.resolve(input.as_ref())?;
    }
    debug!(items = resolver.items.len(), "inputs resolved");
    Ok(resolver.items)
}

/// Validates one address.
///
/// Parse failures carry the URL parser's message; a host other than
/// [`YOUTUBE_HOST`] or a non-https scheme yields [`NOT_YOUTUBE_URL`].
#[must_use]
pub fn classify_address(address: &str) -> WorkItem {
    match Url::parse(address) {
        Err(e) => WorkItem::invalid(address, e.to_string()),
        Ok(url) if url.scheme() != "https" || url.host_str() != Some(YOUTUBE_HOST) => {
            WorkItem::invalid(address, NOT_YOUTUBE_URL)
        }
        Ok(_) => WorkItem::valid(address),
    }
}

fn normalize(raw: &str) -> Cow<'_, str> {
    for (prefix, replacement) in SCHEMELESS_PREFIXES {
        if raw.starts_with(prefix) {
            return Cow::Owned(format!("{replacement}{raw}"));
        }
    }
    Cow::Borrowed(raw)
}

fn is_address(input: &str) -> bool {
    input.starts_with("https://") || input.starts_with("http://")
}

#[derive(Debug, Default)]
struct Resolver {
    items: Vec<WorkItem>,
    open_files: Vec<PathBuf>,
}

impl Resolver {
    fn resolve(&mut self, raw: &str) -> Result<(), InputError> {
        let input = normalize(raw);
        if is_address(&input) {
            trace!(address = %input, "address input");
            self.items.push(classify_address(&input));
            Ok(())
        } else {
            self.expand_file(Path::new(raw))
        }
    }

    fn expand_file(&mut self, path: &Path) -> Result<(), InputError> {
        let canonical = std::fs::canonicalize(path).map_err(|e| InputError::read(path, e))?;
        if self.open_files.contains(&canonical) {
            return Err(InputError::cycle(path));
        }

        let contents = std::fs::read_to_string(&canonical).map_err(|e| InputError::read(path, e))?;
        debug!(path = %path.display(), "reading input file");

        self.open_files.push(canonical);
        let lines = contents
            .trim_start_matches('\u{feff}')
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty());
        for line in lines {
            self.resolve(line)?;
        }
        self.open_files.pop();
        Ok(())
    }
}
