//! Full reference trees reflected from type metadata.
//!
//! The reference tree of a record lists every field the server could return
//! for it, down to a fixed depth. The depth bound also guarantees termination
//! for self-referential schemas such as folders containing folders.

use crate::error::Result;
use crate::name::NameExtractor;
use crate::schema::{Record, Schema};
use crate::tree::{SelectorNode, SelectorTree};

/// Builds full reference trees using one naming strategy.
#[derive(Debug, Clone, Copy)]
pub struct SchemaReflector<E> {
    extractor: E,
}

impl<E: NameExtractor> SchemaReflector<E> {
    pub fn new(extractor: E) -> Self {
        Self { extractor }
    }

    /// Reflect every field of `T` up to `max_depth` levels.
    ///
    /// A depth of 0 yields an empty tree; 1 yields the top-level fields with
    /// no children.
    pub fn full_tree<T: Record + ?Sized>(&self, max_depth: usize) -> Result<SelectorTree> {
        self.full_tree_of(&T::schema(), max_depth)
    }

    /// Reflect an already resolved schema.
    pub fn full_tree_of(&self, schema: &Schema, max_depth: usize) -> Result<SelectorTree> {
        let mut tree = SelectorTree::new();
        for node in self.expand(schema, 0, max_depth)? {
            tree.push_unmerged(node);
        }
        Ok(tree)
    }

    fn expand(&self, schema: &Schema, depth: usize, max_depth: usize) -> Result<Vec<SelectorNode>> {
        if depth == max_depth {
            return Ok(Vec::new());
        }

        // Colliding names are kept; only optimizing a selection through one fails.
        let mut nodes = Vec::with_capacity(schema.fields.len());
        for field in &schema.fields {
            let mut node = SelectorNode::new(self.extractor.extract_name(field))?;
            if let Some(inner) = (field.shape)().expansion() {
                for child in self.expand(&inner, depth + 1, max_depth)? {
                    node.push_unmerged(child);
                }
            }
            nodes.push(node);
        }
        Ok(nodes)
    }
}
