//! Field name extraction strategies.
//!
//! The same strategy must be used to compile selections and to reflect the
//! reference tree, otherwise the optimizer cannot match nodes by name.

use crate::schema::Field;

/// Maps member metadata to the name emitted in a field mask.
pub trait NameExtractor {
    fn extract_name(&self, field: &Field) -> &'static str;
}

impl<E: NameExtractor + ?Sized> NameExtractor for &E {
    fn extract_name(&self, field: &Field) -> &'static str {
        (**self).extract_name(field)
    }
}

/// Uses the member name exactly as declared in Rust.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemberNames;

impl NameExtractor for MemberNames {
    fn extract_name(&self, field: &Field) -> &'static str {
        field.name
    }
}

/// Uses the serde wire name, falling back to the declared member name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SerializedNames;

impl NameExtractor for SerializedNames {
    fn extract_name(&self, field: &Field) -> &'static str {
        field.serialized_name.unwrap_or(field.name)
    }
}
