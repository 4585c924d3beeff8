//! The compiled mask and its query-parameter form.

use std::fmt;

use serde::Serialize;

/// A compiled partial-response field mask, e.g. `etag,items(title,id)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FieldMask(String);

impl FieldMask {
    /// Conventional name of the query parameter carrying the mask.
    pub const QUERY_PARAMETER: &'static str = "fields";

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// An empty mask selects nothing explicitly; servers then return their
    /// default representation.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// The `(name, value)` pair to attach to a request's query string.
    pub fn query_pair(&self) -> (&'static str, &str) {
        (Self::QUERY_PARAMETER, &self.0)
    }
}

impl From<FieldMask> for String {
    fn from(mask: FieldMask) -> Self {
        mask.0
    }
}

impl AsRef<str> for FieldMask {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for FieldMask {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for FieldMask {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl From<&crate::tree::SelectorTree> for FieldMask {
    fn from(tree: &crate::tree::SelectorTree) -> Self {
        Self(tree.to_string())
    }
}
