//! Selector trees: the in-memory form of a field mask.
//!
//! A [`SelectorTree`] is an unnamed root holding top-level [`SelectorNode`]s.
//! Siblings are unique by name; inserting a node whose name already exists
//! merges it into the existing sibling, so the union of any number of paths
//! is built by repeated insertion.
//!
//! Serialization follows the partial-response syntax: a leaf is its name, a
//! node with one child is `name/child`, and a node with several children is
//! `name(a,b)`.

use std::fmt;

use crate::error::{FieldMaskError, Result};

/// A named field with the sub-fields selected beneath it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorNode {
    name: String,
    children: Vec<SelectorNode>,
}

impl SelectorNode {
    /// Create a leaf node. The name must not be empty.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(FieldMaskError::InvalidArgument(
                "selector name cannot be empty".to_string(),
            ));
        }
        Ok(Self {
            name,
            children: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn children(&self) -> &[SelectorNode] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// The direct child with the given name, if selected.
    pub fn child(&self, name: &str) -> Option<&SelectorNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Add a child, merging it into an existing child of the same name.
    pub fn insert(&mut self, child: SelectorNode) {
        merge_into(&mut self.children, child);
    }

    /// Drop every selected child, leaving a bare field.
    pub fn clear_children(&mut self) {
        self.children.clear();
    }

    /// Levels below this node: 0 for a leaf.
    pub fn depth(&self) -> usize {
        self.children
            .iter()
            .map(|c| 1 + c.depth())
            .max()
            .unwrap_or(0)
    }

    pub(crate) fn push_unmerged(&mut self, child: SelectorNode) {
        self.children.push(child);
    }

    fn optimize_against(&mut self, full: &SelectorNode) -> Result<()> {
        for child in &mut self.children {
            let reference = single_match(&full.children, &child.name)?;
            child.optimize_against(reference)?;
        }
        if self.children.len() == full.children.len() {
            self.children.clear();
        }
        Ok(())
    }
}

impl fmt::Display for SelectorNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        match self.children.as_slice() {
            [] => Ok(()),
            [only] => write!(f, "/{}", only),
            many => {
                f.write_str("(")?;
                write_joined(f, many)?;
                f.write_str(")")
            }
        }
    }
}

/// The root of a selection: an ordered list of top-level fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorTree {
    nodes: Vec<SelectorNode>,
}

impl SelectorTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[SelectorNode] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The top-level node with the given name, if selected.
    pub fn node(&self, name: &str) -> Option<&SelectorNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Add a top-level node, merging it into an existing node of the same name.
    pub fn insert(&mut self, node: SelectorNode) {
        merge_into(&mut self.nodes, node);
    }

    /// Merge every node of `other` into this tree.
    pub fn merge(&mut self, other: SelectorTree) {
        for node in other.nodes {
            self.insert(node);
        }
    }

    /// Number of levels: 0 for an empty tree, 1 for top-level leaves only.
    pub fn depth(&self) -> usize {
        self.nodes
            .iter()
            .map(|n| 1 + n.depth())
            .max()
            .unwrap_or(0)
    }

    /// Collapse every node whose selected children cover all children of the
    /// corresponding node in `full`.
    ///
    /// `full` must be the reference tree of the same root type, reflected at
    /// least as deep as this tree. A node without a counterpart in `full` is
    /// reported as [`FieldMaskError::InvariantViolation`]. Top-level nodes are
    /// matched but never collapsed into the root.
    pub fn optimize_against(&mut self, full: &SelectorTree) -> Result<()> {
        for node in &mut self.nodes {
            let reference = single_match(&full.nodes, &node.name)?;
            node.optimize_against(reference)?;
        }
        Ok(())
    }

    /// The only leaf of a linear chain.
    ///
    /// Fails with [`FieldMaskError::InvalidState`] when the tree has no leaf or
    /// branches into several.
    pub fn unique_leaf_mut(&mut self) -> Result<&mut SelectorNode> {
        let mut leaves = Vec::new();
        collect_leaves(&mut self.nodes, &mut leaves);
        let count = leaves.len();
        match leaves.pop() {
            Some(leaf) if count == 1 => Ok(leaf),
            _ => Err(FieldMaskError::InvalidState(format!(
                "expected a single leaf in the selection chain, found {}",
                count
            ))),
        }
    }

    pub(crate) fn push_unmerged(&mut self, node: SelectorNode) {
        self.nodes.push(node);
    }
}

impl fmt::Display for SelectorTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_joined(f, &self.nodes)
    }
}

impl From<SelectorNode> for SelectorTree {
    fn from(node: SelectorNode) -> Self {
        Self { nodes: vec![node] }
    }
}

fn merge_into(siblings: &mut Vec<SelectorNode>, node: SelectorNode) {
    match siblings.iter_mut().find(|s| s.name == node.name) {
        Some(existing) => {
            for child in node.children {
                existing.insert(child);
            }
        }
        None => siblings.push(node),
    }
}

fn single_match<'a>(candidates: &'a [SelectorNode], name: &str) -> Result<&'a SelectorNode> {
    let mut matches = candidates.iter().filter(|c| c.name == name);
    match (matches.next(), matches.next()) {
        (Some(found), None) => Ok(found),
        (None, _) => Err(FieldMaskError::InvariantViolation(format!(
            "no field '{}' in the reference tree; was it reflected for another type or too shallow a depth?",
            name
        ))),
        (Some(_), Some(_)) => Err(FieldMaskError::InvariantViolation(format!(
            "field '{}' appears more than once in the reference tree",
            name
        ))),
    }
}

fn collect_leaves<'a>(nodes: &'a mut [SelectorNode], out: &mut Vec<&'a mut SelectorNode>) {
    for node in nodes {
        if node.children.is_empty() {
            out.push(node);
        } else {
            collect_leaves(&mut node.children, out);
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, nodes: &[SelectorNode]) -> fmt::Result {
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{}", node)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(name: &str) -> SelectorNode {
        SelectorNode::new(name).unwrap()
    }

    fn node(name: &str, children: Vec<SelectorNode>) -> SelectorNode {
        let mut n = leaf(name);
        for child in children {
            n.insert(child);
        }
        n
    }

    fn tree(nodes: Vec<SelectorNode>) -> SelectorTree {
        let mut t = SelectorTree::new();
        for n in nodes {
            t.insert(n);
        }
        t
    }

    // ── construction ────────────────────────────────────────────────────────

    #[test]
    fn empty_name_is_rejected() {
        let err = SelectorNode::new("").unwrap_err();
        assert!(matches!(err, FieldMaskError::InvalidArgument(_)));
    }

    #[test]
    fn insert_merges_same_named_children() {
        let mut items = node("items", vec![node("owners", vec![leaf("id")])]);
        items.insert(node("owners", vec![leaf("email")]));
        items.insert(leaf("title"));
        assert_eq!(items.children().len(), 2);
        assert_eq!(items.child("owners").unwrap().children().len(), 2);
    }

    #[test]
    fn merge_keeps_first_appearance_order() {
        let mut t = tree(vec![leaf("b"), leaf("a")]);
        t.merge(tree(vec![leaf("c"), leaf("b")]));
        assert_eq!(t.to_string(), "b,a,c");
    }

    #[test]
    fn depth_counts_levels() {
        assert_eq!(SelectorTree::new().depth(), 0);
        assert_eq!(tree(vec![leaf("etag")]).depth(), 1);
        let t = tree(vec![leaf("etag"), node("items", vec![node("labels", vec![leaf("starred")])])]);
        assert_eq!(t.depth(), 3);
        assert_eq!(t.node("items").unwrap().depth(), 2);
    }

    // ── serialization ───────────────────────────────────────────────────────

    #[test]
    fn empty_tree_serializes_to_empty_string() {
        assert_eq!(SelectorTree::new().to_string(), "");
    }

    #[test]
    fn single_child_uses_slash() {
        let t = tree(vec![node("labels", vec![leaf("starred")])]);
        assert_eq!(t.to_string(), "labels/starred");
    }

    #[test]
    fn several_children_use_parentheses() {
        let t = tree(vec![
            leaf("id"),
            leaf("etag"),
            node("items", vec![leaf("title"), leaf("id")]),
        ]);
        assert_eq!(t.to_string(), "id,etag,items(title,id)");
    }

    #[test]
    fn slash_and_parentheses_nest() {
        let t = tree(vec![node(
            "items",
            vec![node("owners", vec![leaf("displayName"), leaf("emailAddress")])],
        )]);
        assert_eq!(t.to_string(), "items/owners(displayName,emailAddress)");
    }

    // ── optimization ────────────────────────────────────────────────────────

    fn reference() -> SelectorTree {
        tree(vec![
            leaf("etag"),
            node(
                "items",
                vec![
                    leaf("id"),
                    leaf("title"),
                    node("labels", vec![leaf("starred"), leaf("trashed")]),
                ],
            ),
        ])
    }

    #[test]
    fn complete_child_list_collapses() {
        let mut t = tree(vec![node(
            "items",
            vec![node("labels", vec![leaf("starred"), leaf("trashed")])],
        )]);
        t.optimize_against(&reference()).unwrap();
        assert_eq!(t.to_string(), "items/labels");
    }

    #[test]
    fn partial_child_list_is_kept() {
        let mut t = tree(vec![node("items", vec![leaf("title"), leaf("id")])]);
        t.optimize_against(&reference()).unwrap();
        assert_eq!(t.to_string(), "items(title,id)");
    }

    #[test]
    fn collapse_cascades_upwards() {
        let mut t = tree(vec![node(
            "items",
            vec![
                leaf("id"),
                leaf("title"),
                node("labels", vec![leaf("starred"), leaf("trashed")]),
            ],
        )]);
        t.optimize_against(&reference()).unwrap();
        assert_eq!(t.to_string(), "items");
    }

    #[test]
    fn top_level_is_never_collapsed() {
        let mut t = tree(vec![leaf("etag"), leaf("items")]);
        t.optimize_against(&reference()).unwrap();
        assert_eq!(t.to_string(), "etag,items");
    }

    #[test]
    fn optimizing_twice_is_a_no_op() {
        let mut t = tree(vec![
            leaf("etag"),
            node(
                "items",
                vec![leaf("title"), node("labels", vec![leaf("starred"), leaf("trashed")])],
            ),
        ]);
        t.optimize_against(&reference()).unwrap();
        let once = t.clone();
        t.optimize_against(&reference()).unwrap();
        assert_eq!(t, once);
        assert_eq!(t.to_string(), "etag,items(title,labels)");
    }

    #[test]
    fn missing_reference_node_is_an_invariant_violation() {
        let mut t = tree(vec![leaf("etag")]);
        let err = t.optimize_against(&SelectorTree::new()).unwrap_err();
        assert!(matches!(err, FieldMaskError::InvariantViolation(_)));
    }

    #[test]
    fn duplicate_reference_node_is_an_invariant_violation() {
        let mut full = SelectorTree::new();
        full.push_unmerged(leaf("etag"));
        full.push_unmerged(leaf("etag"));
        let mut t = tree(vec![leaf("etag")]);
        assert!(matches!(
            t.optimize_against(&full),
            Err(FieldMaskError::InvariantViolation(_))
        ));
    }

    // ── leaves ──────────────────────────────────────────────────────────────

    #[test]
    fn unique_leaf_of_a_chain() {
        let mut t = tree(vec![node("items", vec![node("labels", vec![leaf("starred")])])]);
        assert_eq!(t.unique_leaf_mut().unwrap().name(), "starred");
    }

    #[test]
    fn branching_tree_has_no_unique_leaf() {
        let mut t = tree(vec![node("items", vec![leaf("id"), leaf("title")])]);
        let err = t.unique_leaf_mut().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid state: expected a single leaf in the selection chain, found 2"
        );
        assert!(matches!(
            SelectorTree::new().unique_leaf_mut(),
            Err(FieldMaskError::InvalidState(_))
        ));
    }
}
