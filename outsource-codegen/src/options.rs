//! Builder configuration.

use std::str::FromStr;

use serde::Deserialize;

use crate::{Error, Indent, Result};

/// Default limit on simultaneously open nested blocks.
///
/// CPython refuses more than 20 statically nested blocks; the module body
/// counts as one of them.
pub const DEFAULT_MAX_NESTED_BLOCKS: usize = 19;

/// Options controlling how a [`Builder`](crate::Builder) nests and renders.
///
/// ```
/// use outsource_codegen::{Indent, Options};
///
/// let options: Options = "max_nested_blocks = 8\nindent = \"tab\"".parse().unwrap();
/// assert_eq!(options.max_nested_blocks, 8);
/// assert_eq!(options.indent, Indent::Tab);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    /// Indentation emitted per nesting level.
    pub indent: Indent,
    /// Maximum number of nested blocks open at the same time.
    pub max_nested_blocks: usize,
}

impl Options {
    /// Set the indentation style.
    pub fn with_indent(mut self, indent: Indent) -> Self {
        self.indent = indent;
        self
    }

    /// Set the nested block limit.
    pub fn with_max_nested_blocks(mut self, max: usize) -> Self {
        self.max_nested_blocks = max;
        self
    }

    /// Parse options from TOML, attributing errors to `filename`.
    pub fn from_toml(content: &str, filename: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::options(e, content, filename))
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            indent: Indent::PYTHON,
            max_nested_blocks: DEFAULT_MAX_NESTED_BLOCKS,
        }
    }
}

impl FromStr for Options {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_toml(s, "options.toml")
    }
}
