//! Reference path strings.
//!
//! AUTOSAR references are ASCII, `/`-separated segment lists with an
//! optional leading `/` marking an absolute path. Short-names never
//! contain `/`, so there is no escaping.

use std::fmt;

use smol_str::SmolStr;

/// A slash-delimited reference path like `/DataTypes/UInt8`.
///
/// `ArPath` is a thin wrapper over an interned string; it does not know
/// whether the path resolves. That is the workspace's job.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArPath(SmolStr);

impl ArPath {
    /// Wrap a path string as written.
    pub fn new(path: impl Into<SmolStr>) -> Self {
        Self(path.into())
    }

    /// The path text, bit-exact.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if the path starts with `/` (resolved from the workspace root).
    pub fn is_absolute(&self) -> bool {
        self.0.starts_with('/')
    }

    /// Iterate the non-empty segments in order.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    /// Append one segment.
    pub fn join(&self, segment: &str) -> ArPath {
        if self.0.is_empty() {
            ArPath::new(format!("/{segment}"))
        } else {
            ArPath::new(format!("{}/{segment}", self.0))
        }
    }

    /// The path without its last segment, or `None` for a root segment.
    pub fn parent(&self) -> Option<ArPath> {
        let trimmed = self.0.trim_end_matches('/');
        let idx = trimmed.rfind('/')?;
        if idx == 0 {
            // "/Root" has no parent path worth naming
            return None;
        }
        Some(ArPath::new(&trimmed[..idx]))
    }

    /// The last segment, if any.
    pub fn last_segment(&self) -> Option<&str> {
        self.segments().last()
    }
}

impl fmt::Display for ArPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ArPath {
    fn from(s: &str) -> Self {
        ArPath::new(s)
    }
}

impl From<String> for ArPath {
    fn from(s: String) -> Self {
        ArPath::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_and_segments() {
        let p = ArPath::new("/DataTypes/UInt8");
        assert!(p.is_absolute());
        assert_eq!(p.segments().collect::<Vec<_>>(), vec!["DataTypes", "UInt8"]);

        let bare = ArPath::new("Speed_I");
        assert!(!bare.is_absolute());
        assert_eq!(bare.segments().collect::<Vec<_>>(), vec!["Speed_I"]);
    }

    #[test]
    fn test_join_and_parent() {
        let p = ArPath::new("/PortInterfaces").join("Speed_I");
        assert_eq!(p.as_str(), "/PortInterfaces/Speed_I");
        assert_eq!(p.parent(), Some(ArPath::new("/PortInterfaces")));
        assert_eq!(p.last_segment(), Some("Speed_I"));
        assert_eq!(ArPath::new("/PortInterfaces").parent(), None);
    }
}
