//! Path types for hierarchical tree access.
//!
//! A [`PathBuf`] is an ordered sequence of segments used to address nodes in a
//! schema or state tree. Segments are arbitrary strings; the special segment
//! `..` moves to the parent of the current cursor when a path is established
//! relative to a traversal root.
//!
//! # Usage
//!
//! ```rust
//! use bigraph_schema::path;
//! use bigraph_schema::tree::PathBuf;
//!
//! // Build incrementally
//! let path = PathBuf::new().push("cell").push("membrane");
//!
//! // Or with the macro
//! let same = path!("cell", "membrane");
//! assert_eq!(path, same);
//!
//! // A bare string is a single segment, dots included
//! let single = PathBuf::from("a.b");
//! assert_eq!(single.len(), 1);
//! ```

use std::fmt;

use crate::{
    Value,
    constants::PARENT,
    tree::TreeError,
};

/// An owned path into a tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathBuf {
    segments: Vec<String>,
}

impl PathBuf {
    /// Creates a new empty path.
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Adds a segment to the end of this path.
    pub fn push(mut self, segment: impl AsRef<str>) -> Self {
        self.segments.push(segment.as_ref().to_string());
        self
    }

    /// Joins this path with another path.
    pub fn join(mut self, other: &PathBuf) -> Self {
        self.segments.extend(other.segments.iter().cloned());
        self
    }

    /// Returns an iterator over the path segments as string slices.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }

    /// Returns the segments as a slice.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns the number of segments in the path.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns `true` if the path has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the parent path, or `None` if this is the root.
    pub fn parent(&self) -> Option<PathBuf> {
        if self.segments.is_empty() {
            None
        } else {
            Some(PathBuf {
                segments: self.segments[..self.segments.len() - 1].to_vec(),
            })
        }
    }

    /// Returns the last segment of the path, or `None` if empty.
    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Returns true if any segment is the parent marker.
    pub fn is_relative(&self) -> bool {
        self.segments.iter().any(|segment| segment == PARENT)
    }

    /// Resolves `..` segments against `cursor`, producing a path from the root.
    ///
    /// # Errors
    /// Returns [`TreeError::ParentTraversal`] if a `..` would travel above the root.
    pub fn resolve_from(&self, cursor: &PathBuf) -> Result<PathBuf, TreeError> {
        let mut resolved = cursor.segments.clone();
        for segment in &self.segments {
            if segment == PARENT {
                if resolved.pop().is_none() {
                    return Err(TreeError::ParentTraversal { path: self.clone() });
                }
            } else {
                resolved.push(segment.clone());
            }
        }
        Ok(PathBuf { segments: resolved })
    }
}

impl fmt::Display for PathBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            write!(f, "(empty path)")
        } else {
            write!(f, "{}", self.segments.join("/"))
        }
    }
}

impl From<&str> for PathBuf {
    fn from(segment: &str) -> Self {
        PathBuf::new().push(segment)
    }
}

impl From<String> for PathBuf {
    fn from(segment: String) -> Self {
        Self {
            segments: vec![segment],
        }
    }
}

impl From<&PathBuf> for PathBuf {
    fn from(path: &PathBuf) -> Self {
        path.clone()
    }
}

impl From<Vec<String>> for PathBuf {
    fn from(segments: Vec<String>) -> Self {
        Self { segments }
    }
}

impl From<Vec<&str>> for PathBuf {
    fn from(segments: Vec<&str>) -> Self {
        segments.as_slice().into()
    }
}

impl From<&[&str]> for PathBuf {
    fn from(segments: &[&str]) -> Self {
        Self {
            segments: segments.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl<const N: usize> From<[&str; N]> for PathBuf {
    fn from(segments: [&str; N]) -> Self {
        segments.as_slice().into()
    }
}

impl TryFrom<&Value> for PathBuf {
    type Error = TreeError;

    /// Reads a path out of a value: text is a single segment, a list of text is
    /// a sequence of segments.
    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Text(segment) => Ok(PathBuf::from(segment.clone())),
            Value::List(items) => items
                .iter()
                .map(|item| {
                    item.as_text()
                        .map(str::to_string)
                        .ok_or_else(|| TreeError::InvalidPath {
                            reason: format!("path segment {item} is not text"),
                        })
                })
                .collect::<Result<Vec<_>, _>>()
                .map(PathBuf::from),
            other => Err(TreeError::InvalidPath {
                reason: format!("{} cannot be read as a path", other.type_name()),
            }),
        }
    }
}

impl From<&PathBuf> for Value {
    fn from(path: &PathBuf) -> Self {
        Value::List(path.components().map(Value::from).collect())
    }
}

/// Constructs a [`PathBuf`] from a list of segments.
///
/// # Examples
///
/// ```rust
/// # use bigraph_schema::path;
/// let empty = path!();
/// assert!(empty.is_empty());
///
/// let base = "cell";
/// let path = path!(base, "..", "membrane");
/// assert_eq!(path.len(), 3);
/// ```
#[macro_export]
macro_rules! path {
    () => {
        $crate::tree::PathBuf::new()
    };

    ($($segment:expr),+ $(,)?) => {{
        let path = $crate::tree::PathBuf::new();
        $(
            let path = path.push($segment);
        )+
        path
    }};
}
