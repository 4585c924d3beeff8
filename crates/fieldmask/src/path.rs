//! Field paths and their compilation into selector chains.
//!
//! A [`FieldPath`] is an ordered list of member accesses from a root record
//! down to a member, typed by both ends. Paths are obtained from the
//! generated accessors and extended with [`FieldPath::then`]:
//!
//! ```ignore
//! let path = File::fields().labels().then(Labels::fields().starred());
//! // compiles to the chain `labels/starred`
//! ```
//!
//! Paths may also be written as dotted strings (`"items.labels.starred"`),
//! which are checked against the root's metadata when resolved.

use std::fmt;
use std::marker::PhantomData;

use crate::error::{FieldMaskError, Result};
use crate::name::NameExtractor;
use crate::schema::{Field, Nested, Record, Schema};
use crate::tree::{SelectorNode, SelectorTree};

/// A chain of member accesses from `Root` to a member of type `Value`.
pub struct FieldPath<Root: ?Sized, Value: ?Sized> {
    steps: Vec<Field>,
    _marker: PhantomData<fn(&Root) -> &Value>,
}

impl<Root: ?Sized, Value: ?Sized> FieldPath<Root, Value> {
    /// A single member access. Called by generated accessors.
    pub fn member(field: Field) -> Self {
        Self {
            steps: vec![field],
            _marker: PhantomData,
        }
    }

    pub fn steps(&self) -> &[Field] {
        &self.steps
    }

    /// Continue the path into a member of the nested record.
    pub fn then<Next: ?Sized>(mut self, next: FieldPath<Value::Target, Next>) -> FieldPath<Root, Next>
    where
        Value: Nested,
    {
        self.steps.extend(next.steps);
        FieldPath {
            steps: self.steps,
            _marker: PhantomData,
        }
    }
}

impl<Root: ?Sized, Value: ?Sized> Clone for FieldPath<Root, Value> {
    fn clone(&self) -> Self {
        Self {
            steps: self.steps.clone(),
            _marker: PhantomData,
        }
    }
}

impl<Root: ?Sized, Value: ?Sized> fmt::Debug for FieldPath<Root, Value> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.steps.iter().map(|s| s.name).collect();
        f.debug_tuple("FieldPath").field(&names.join(".")).finish()
    }
}

/// Fail with [`FieldMaskError::Configuration`] if any step never reaches the
/// wire.
pub fn ensure_participates(steps: &[Field]) -> Result<()> {
    match steps.iter().find(|s| !s.participates()) {
        Some(step) => Err(FieldMaskError::Configuration {
            field: step.name.to_string(),
            declaring_type: step.declaring_type.to_string(),
        }),
        None => Ok(()),
    }
}

/// Compile member steps into a linear selector chain.
pub fn compile<E: NameExtractor + ?Sized>(steps: &[Field], extractor: &E) -> Result<SelectorTree> {
    let mut nodes = steps
        .iter()
        .rev()
        .map(|step| SelectorNode::new(extractor.extract_name(step)));

    let mut chain = match nodes.next() {
        Some(leaf) => leaf?,
        None => {
            return Err(FieldMaskError::InvalidArgument(
                "field path cannot be empty".to_string(),
            ))
        }
    };
    for parent in nodes {
        let mut parent = parent?;
        parent.push_unmerged(chain);
        chain = parent;
    }
    Ok(SelectorTree::from(chain))
}

/// Compile a path to a collection and a path within its item type, hanging
/// the item chain below the collection chain's leaf.
pub fn compile_each<E: NameExtractor + ?Sized>(
    collection: &[Field],
    item: &[Field],
    extractor: &E,
) -> Result<SelectorTree> {
    let mut tree = compile(collection, extractor)?;
    let item_tree = compile(item, extractor)?;

    let leaf = tree.unique_leaf_mut()?;
    for node in item_tree.nodes() {
        leaf.insert(node.clone());
    }
    Ok(tree)
}

/// Resolve a dotted path such as `"items.labels.starred"` against `Root`.
///
/// Each segment must name a member of the current record, either by the
/// name the extractor produces or, failing any such match, by its declared
/// name. Collections are entered transparently.
pub fn resolve<Root: Record + ?Sized, E: NameExtractor + ?Sized>(
    path: &str,
    extractor: &E,
) -> Result<Vec<Field>> {
    resolve_in(Root::schema(), path, extractor)
}

pub(crate) fn resolve_in<E: NameExtractor + ?Sized>(
    root: Schema,
    path: &str,
    extractor: &E,
) -> Result<Vec<Field>> {
    if path.trim().is_empty() {
        return Err(FieldMaskError::InvalidArgument(
            "field path cannot be empty".to_string(),
        ));
    }

    let mut steps = Vec::new();
    let mut current = Some(root);
    for segment in path.split('.') {
        if !is_member_name(segment) {
            return Err(unsupported(path, format!("'{}' is not a member access", segment)));
        }
        let schema = match current.take() {
            Some(schema) => schema,
            None => {
                let parent = steps.last().map(|s: &Field| s.name).unwrap_or_default();
                return Err(unsupported(
                    path,
                    format!("'{}' has no members to select '{}' from", parent, segment),
                ));
            }
        };
        // Extracted names win over declared names anywhere in the record.
        let field = schema
            .fields
            .iter()
            .find(|f| extractor.extract_name(f) == segment)
            .or_else(|| schema.fields.iter().find(|f| f.name == segment))
            .copied()
            .ok_or_else(|| {
                unsupported(path, format!("'{}' has no member '{}'", schema.name, segment))
            })?;
        current = (field.shape)().expansion();
        steps.push(field);
    }
    Ok(steps)
}

/// Anything that cannot be mistaken for mask syntax, an indexer or a call.
fn is_member_name(segment: &str) -> bool {
    !segment.is_empty()
        && !segment
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '[' | ']' | '(' | ')' | '*' | ',' | '/'))
}

fn unsupported(path: &str, reason: String) -> FieldMaskError {
    FieldMaskError::UnsupportedSelector {
        selector: path.to_string(),
        reason,
    }
}
