//! Static type metadata for field selection.
//!
//! Every type that can appear in a response implements [`Selectable`], which
//! reports its [`Shape`]: a scalar leaf, a record with named fields, or a
//! homogeneous collection of some other shape. Records are derived with
//! `#[derive(Selectable)]`, which also implements [`Record`] and [`Nested`]
//! and generates a companion `<Name>Fields` type holding one typed accessor per
//! member.
//!
//! Shapes are resolved through the trait system at compile time, so walking a
//! schema never inspects values and never allocates beyond the field list.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::rc::Rc;
use std::sync::Arc;

/// Metadata for a single declared member of a record.
#[derive(Debug, Clone, Copy)]
pub struct Field {
    /// The member name as declared in Rust (raw identifiers without `r#`).
    pub name: &'static str,
    /// The name used on the wire, or `None` when serde skips the member and
    /// the server therefore never returns it.
    pub serialized_name: Option<&'static str>,
    /// Short name of the record declaring this member.
    pub declaring_type: &'static str,
    /// Capability of the member's value type.
    pub shape: fn() -> Shape,
}

impl Field {
    /// Whether the member is part of the serialized response.
    pub fn participates(&self) -> bool {
        self.serialized_name.is_some()
    }
}

/// Declared members of a record type, in declaration order.
#[derive(Debug, Clone)]
pub struct Schema {
    /// Short type name, e.g. `FileList`.
    pub name: &'static str,
    /// Fully qualified type name, unique per generic instantiation.
    pub type_name: &'static str,
    pub fields: Vec<Field>,
}

impl Schema {
    /// Look up a member by its declared name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// What a value type looks like to the field selector.
#[derive(Debug, Clone, Copy)]
pub enum Shape {
    /// A leaf value with no selectable members.
    Scalar,
    /// A record with named members.
    Object(fn() -> Schema),
    /// A homogeneous collection; the payload describes one element.
    List(fn() -> Shape),
}

impl Shape {
    /// Shape constructor usable as a `fn() -> Shape` pointer for members
    /// marked `#[fieldmask(scalar)]`.
    pub fn scalar() -> Shape {
        Shape::Scalar
    }

    /// The schema a node of this shape expands into.
    ///
    /// Records expand into themselves and collections into their innermost
    /// element type. Scalars (and collections of scalars) do not expand.
    pub fn expansion(&self) -> Option<Schema> {
        match self {
            Shape::Scalar => None,
            Shape::Object(schema) => Some(schema()),
            Shape::List(element) => element().expansion(),
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, Shape::List(_))
    }
}

/// Trait implemented by every type that can appear as a member value.
pub trait Selectable {
    fn shape() -> Shape;
}

/// A record type with named, selectable members.
///
/// Implemented by `#[derive(Selectable)]`:
///
/// ```ignore
/// use fieldmask::Selectable;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize, Selectable)]
/// #[serde(rename_all = "camelCase")]
/// struct FileList {
///     etag: Option<String>,
///     next_page_token: Option<String>,
///     items: Vec<File>,
/// }
///
/// // FileList::fields().next_page_token() is a FieldPath<FileList, Option<String>>
/// ```
pub trait Record: Selectable {
    /// Companion type with one accessor per member.
    type Fields;

    fn schema() -> Schema;

    fn fields() -> Self::Fields;
}

/// A value that expands into exactly one record, possibly through wrappers.
pub trait Nested {
    type Target: Record;
}

/// A value that holds many items of one type.
pub trait Collection {
    type Item;
}

macro_rules! scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Selectable for $ty {
                fn shape() -> Shape {
                    Shape::Scalar
                }
            }
        )*
    };
}

scalar!(
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    (),
    str,
    String,
    serde_json::Value,
    chrono::NaiveDate,
    chrono::NaiveDateTime,
    chrono::NaiveTime,
);

// DateTime serializes as an ISO 8601 string.
impl<Tz: chrono::TimeZone> Selectable for chrono::DateTime<Tz> {
    fn shape() -> Shape {
        Shape::Scalar
    }
}

// Maps have no declared members to enumerate.
impl<K, V, S> Selectable for HashMap<K, V, S> {
    fn shape() -> Shape {
        Shape::Scalar
    }
}

impl<K, V> Selectable for BTreeMap<K, V> {
    fn shape() -> Shape {
        Shape::Scalar
    }
}

macro_rules! transparent {
    ($($wrapper:ident),*) => {
        $(
            impl<T: Selectable + ?Sized> Selectable for $wrapper<T> {
                fn shape() -> Shape {
                    T::shape()
                }
            }

            impl<T: Nested> Nested for $wrapper<T> {
                type Target = T::Target;
            }
        )*
    };
}

transparent!(Box, Rc, Arc);

impl<T: Selectable> Selectable for Option<T> {
    fn shape() -> Shape {
        T::shape()
    }
}

impl<T: Nested> Nested for Option<T> {
    type Target = T::Target;
}

impl<C: Collection> Collection for Option<C> {
    type Item = C::Item;
}

macro_rules! list {
    ($($coll:ident),*) => {
        $(
            impl<T: Selectable> Selectable for $coll<T> {
                fn shape() -> Shape {
                    Shape::List(T::shape)
                }
            }

            impl<T> Collection for $coll<T> {
                type Item = T;
            }
        )*
    };
}

list!(Vec, VecDeque, BTreeSet);

impl<T: Selectable, S> Selectable for HashSet<T, S> {
    fn shape() -> Shape {
        Shape::List(T::shape)
    }
}

impl<T, S> Collection for HashSet<T, S> {
    type Item = T;
}

impl<T: Selectable> Selectable for [T] {
    fn shape() -> Shape {
        Shape::List(T::shape)
    }
}

impl<T> Collection for Box<[T]> {
    type Item = T;
}

impl<T: Selectable, const N: usize> Selectable for [T; N] {
    fn shape() -> Shape {
        Shape::List(T::shape)
    }
}

impl<T, const N: usize> Collection for [T; N] {
    type Item = T;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrappers_are_transparent() {
        assert!(matches!(<Option<Box<u32>>>::shape(), Shape::Scalar));
        assert!(matches!(<Arc<String>>::shape(), Shape::Scalar));
    }

    #[test]
    fn collections_wrap_their_element() {
        let shape = <Option<Vec<String>>>::shape();
        assert!(shape.is_collection());
        match shape {
            Shape::List(element) => assert!(matches!(element(), Shape::Scalar)),
            other => panic!("expected list, got {:?}", other),
        }
    }

    #[test]
    fn scalars_and_scalar_lists_do_not_expand() {
        assert!(<chrono::DateTime<chrono::Utc>>::shape().expansion().is_none());
        assert!(<Vec<Vec<i64>>>::shape().expansion().is_none());
        assert!(<HashMap<String, u8>>::shape().expansion().is_none());
    }
}
