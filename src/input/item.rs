//! The unit of work handed to the batch processor.

use std::fmt;

/// Fallback message for items rejected without a reason.
const UNSPECIFIED_REJECTION: &str = "invalid input";

/// One resolved input address.
///
/// An invalid item always carries a non-empty error message and is never
/// fetched; the message goes straight into its output row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    source: String,
    rejection: Option<String>,
}

impl WorkItem {
    /// Creates an item that will be fetched.
    #[must_use]
    pub fn valid(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            rejection: None,
        }
    }

    /// Creates an item rejected before any network attempt.
    ///
    /// An empty `reason` is replaced with a generic message so the invariant
    /// "invalid implies non-empty error" holds.
    #[must_use]
    pub fn invalid(source: impl Into<String>, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        let reason = if reason.trim().is_empty() {
            UNSPECIFIED_REJECTION.to_string()
        } else {
            reason
        };
        Self {
            source: source.into(),
            rejection: Some(reason),
        }
    }

    /// The address as it will appear in the output.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns true if the item should be fetched.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.rejection.is_none()
    }

    /// The pre-computed error for an invalid item.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.rejection.as_deref()
    }
}

impl fmt::Display for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.rejection {
            None => write!(f, "{}", self.source),
            Some(reason) => write!(f, "{} (invalid: {reason})", self.source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_item_valid_has_no_error() {
        let item = WorkItem::valid("https://www.youtube.com/watch?v=a");
        assert!(item.is_valid());
        assert_eq!(item.error(), None);
        assert_eq!(item.source(), "https://www.youtube.com/watch?v=a");
    }

    #[test]
    fn test_work_item_invalid_keeps_reason() {
        let item = WorkItem::invalid("https://example.com/", "Not YouTube URL");
        assert!(!item.is_valid());
        assert_eq!(item.error(), Some("Not YouTube URL"));
    }

    #[test]
    fn test_work_item_invalid_empty_reason_gets_fallback() {
        let item = WorkItem::invalid("x", "  ");
        assert!(!item.is_valid());
        assert_eq!(item.error(), Some("invalid input"));
    }

    #[test]
    fn test_work_item_display() {
        assert_eq!(WorkItem::valid("a").to_string(), "a");
        assert_eq!(WorkItem::invalid("b", "bad").to_string(), "b (invalid: bad)");
    }
}
