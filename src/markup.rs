//! Trusted markup wrapper.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Text that the caller has vouched for as safe to embed in HTML as-is.
///
/// Wrapping a string in `SafeHtml` tells the rendering layer not to escape
/// it again. Nothing here inspects the content: the wrapper carries trust,
/// it does not establish it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SafeHtml(String);

impl SafeHtml {
    /// Mark `text` as trusted markup.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SafeHtml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SafeHtml {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
