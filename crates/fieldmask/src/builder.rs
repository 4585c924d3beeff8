//! Accumulating selections into an optimized field mask.
//!
//! A [`FieldSelector`] collects one selector chain per call, then merges them,
//! reflects the root type's reference tree as deep as the merged selection,
//! collapses every node whose children cover the whole schema level, and
//! serializes the result.

use std::fmt;
use std::marker::PhantomData;

use crate::error::Result;
use crate::mask::FieldMask;
use crate::name::{NameExtractor, SerializedNames};
use crate::path::{self, FieldPath};
use crate::reflect::SchemaReflector;
use crate::schema::{Collection, Nested, Record};
use crate::tree::SelectorTree;

/// Builds the field mask for responses of type `Root`.
///
/// # Example
///
/// ```ignore
/// use fieldmask::{FieldSelector, Record};
///
/// let mut selector = FieldSelector::<FileList>::new();
/// selector
///     .select(FileList::fields().etag())?
///     .select_each(FileList::fields().items(), File::fields().title())?
///     .select_each(FileList::fields().items(), File::fields().id())?;
/// assert_eq!(selector.build()?, "etag,items(title,id)");
/// ```
pub struct FieldSelector<Root: ?Sized, E = SerializedNames> {
    extractor: E,
    optimize: bool,
    selections: Vec<SelectorTree>,
    _root: PhantomData<fn(&Root)>,
}

impl<Root: Record + ?Sized> FieldSelector<Root> {
    /// A selector using serde wire names.
    pub fn new() -> Self {
        Self::with_extractor(SerializedNames)
    }

    /// A selector whose root type is inferred from a value.
    pub fn for_value(_root: &Root) -> Self {
        Self::new()
    }
}

impl<Root: Record + ?Sized> Default for FieldSelector<Root> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Root: Record + ?Sized, E: NameExtractor> FieldSelector<Root, E> {
    /// A selector using a custom naming strategy.
    pub fn with_extractor(extractor: E) -> Self {
        Self {
            extractor,
            optimize: true,
            selections: Vec::new(),
            _root: PhantomData,
        }
    }

    /// Like [`FieldSelector::for_value`], with a custom naming strategy.
    pub fn for_value_with(_root: &Root, extractor: E) -> Self {
        Self::with_extractor(extractor)
    }

    /// Enable or disable collapsing of complete child lists. Enabled by
    /// default.
    pub fn optimize(mut self, enabled: bool) -> Self {
        self.optimize = enabled;
        self
    }

    /// Select a member, possibly nested through records.
    ///
    /// Fails immediately if any member on the path is skipped by serde.
    pub fn select<V: ?Sized>(&mut self, path: FieldPath<Root, V>) -> Result<&mut Self> {
        path::ensure_participates(path.steps())?;
        let tree = path::compile(path.steps(), &self.extractor)?;
        Ok(self.accumulate(tree))
    }

    /// Select a member of every item of a collection.
    pub fn select_each<C, I, V>(
        &mut self,
        collection: FieldPath<Root, C>,
        item: FieldPath<I, V>,
    ) -> Result<&mut Self>
    where
        C: Collection + ?Sized,
        C::Item: Nested<Target = I>,
        I: Record + ?Sized,
        V: ?Sized,
    {
        path::ensure_participates(collection.steps())?;
        path::ensure_participates(item.steps())?;
        let tree = path::compile_each(collection.steps(), item.steps(), &self.extractor)?;
        Ok(self.accumulate(tree))
    }

    /// Select a member by dotted path, e.g. `"items.labels.starred"`.
    ///
    /// The path is validated against `Root`'s metadata right away.
    pub fn select_path(&mut self, path: &str) -> Result<&mut Self> {
        let steps = path::resolve::<Root, _>(path, &self.extractor)?;
        path::ensure_participates(&steps)?;
        let tree = path::compile(&steps, &self.extractor)?;
        Ok(self.accumulate(tree))
    }

    /// Number of selections made so far.
    pub fn len(&self) -> usize {
        self.selections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    /// The union of all selections, before optimization.
    pub fn merged(&self) -> SelectorTree {
        let mut merged = SelectorTree::new();
        for selection in &self.selections {
            merged.merge(selection.clone());
        }
        merged
    }

    /// Merge, optimize and serialize every selection.
    pub fn build(self) -> Result<FieldMask> {
        let count = self.selections.len();
        let mut merged = SelectorTree::new();
        for selection in self.selections {
            merged.merge(selection);
        }

        let depth = merged.depth();
        if self.optimize {
            let full = SchemaReflector::new(&self.extractor).full_tree::<Root>(depth)?;
            merged.optimize_against(&full)?;
        }

        let mask = FieldMask::from(&merged);
        tracing::debug!(selections = count, depth, mask = %mask, "built field mask");
        Ok(mask)
    }

    fn accumulate(&mut self, tree: SelectorTree) -> &mut Self {
        tracing::trace!(selection = %tree, "selected");
        self.selections.push(tree);
        self
    }
}

impl<Root: ?Sized, E: fmt::Debug> fmt::Debug for FieldSelector<Root, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSelector")
            .field("root", &std::any::type_name::<Root>())
            .field("extractor", &self.extractor)
            .field("optimize", &self.optimize)
            .field("selections", &self.selections.len())
            .finish()
    }
}
