//! Programmatic Python source generation.
//!
//! Build expressions as immutable [`Node`] trees, assemble statements and
//! nested blocks with a [`Builder`], and serialize the result with an
//! indentation-aware [`Writer`].
//!
//! # Module Organization
//!
//! - [`node`] - Expression trees and literal conversion
//! - [`literal`] - Scalar literals and their canonical representation
//! - [`block`] - Statements and indented blocks
//! - [`builder`] - Statement builder with nested scopes, hoisting and fresh names
//! - [`writer`] - The [`Render`] trait and the text [`Writer`]
//!
//! # Example
//!
//! ```
//! use outsource_codegen::{Builder, code};
//!
//! let mut b = Builder::new();
//! b.def("area", ["width", "height"], |b| {
//!     b.add_docstring("Area of a rectangle.");
//!     b.return_(code("width") * code("height"));
//!     Ok(())
//! })?;
//!
//! assert_eq!(
//!     b.write_source(),
//!     "def area(width, height):\n    \"\"\"\n    Area of a rectangle.\n    \"\"\"\n    return (width * height)\n"
//! );
//! # Ok::<(), outsource_codegen::Error>(())
//! ```

pub mod block;
pub mod builder;
mod error;
mod indent;
pub mod literal;
pub mod node;
mod ops;
mod options;
pub mod writer;

pub use block::{Block, Construct, ConstructKind, Statement};
pub use builder::Builder;
pub use error::{Error, Result};
pub use indent::Indent;
pub use literal::Literal;
pub use node::{BinOp, Node, UnaryOp, code};
pub use options::{DEFAULT_MAX_NESTED_BLOCKS, Options};
pub use writer::{Render, Writer};
