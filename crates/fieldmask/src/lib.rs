//! Typed partial-response field masks.
//!
//! Sparse-fieldset APIs accept a `fields` parameter such as
//! `etag,items(title,id)` and return only the requested data. This crate
//! builds that string from typed selections against `#[derive(Selectable)]`
//! response types:
//!
//! ```ignore
//! use fieldmask::{FieldSelector, Record};
//!
//! let mut selector = FieldSelector::<FileList>::new();
//! selector
//!     .select(FileList::fields().etag())?
//!     .select_each(FileList::fields().items(), File::fields().title())?;
//! let mask = selector.build()?; // "etag,items/title"
//! ```
//!
//! Selections are merged, then every node whose selected children cover all
//! of the fields its type declares is collapsed to its bare name, relying on
//! the server expanding a bare field to its full representation.

pub mod builder;
pub mod error;
pub mod mask;
pub mod name;
pub mod path;
pub mod reflect;
pub mod schema;
pub mod tree;

// Re-export key types at crate root for convenience.
pub use builder::FieldSelector;
pub use error::{FieldMaskError, Result};
pub use fieldmask_derive::Selectable;
pub use mask::FieldMask;
pub use name::{MemberNames, NameExtractor, SerializedNames};
pub use path::FieldPath;
pub use reflect::SchemaReflector;
pub use schema::{Collection, Field, Nested, Record, Schema, Selectable, Shape};
pub use tree::{SelectorNode, SelectorTree};
