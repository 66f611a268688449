//! The serializer contract and the three provided serializer families:
//! scalars, containers, and structs.

mod map_serializer;
mod scalar_serializer;
mod struct_serializer;

pub use map_serializer::MapSerializer;
pub use scalar_serializer::{ScalarBind, ScalarSerializer};
pub use struct_serializer::StructSerializer;

use std::fmt;

use crate::error::BindError;
use crate::info::TypeDecl;
use crate::primitive::Primitive;
use crate::reflection::Reflect;

// -----------------------------------------------------------------------------
// Serializer

/// One conversion strategy: a match predicate plus the two directions.
///
/// Serializers are registered in a
/// [`DependencyResolver`](crate::registry::DependencyResolver) in precedence
/// order; [`matches`](Self::matches) decides whether this serializer handles
/// a given declaration, and the first match wins.
///
/// `unserialize_value` only ever sees non-null data: null handling is
/// centralized in [`unserialize`](dyn Serializer::unserialize) on the trait
/// object, which implementations cannot override.
pub trait Serializer: Send + Sync {
    /// Whether this serializer handles the given declaration.
    fn matches(&self, decl: &TypeDecl) -> bool;

    /// Converts a runtime value into a primitive tree.
    fn serialize(&self, value: &dyn Reflect) -> Result<Primitive, BindError>;

    /// Converts non-null primitive data into a value of the declared type.
    fn unserialize_value(
        &self,
        data: &Primitive,
        decl: &TypeDecl,
    ) -> Result<Box<dyn Reflect>, BindError>;
}

impl dyn Serializer {
    /// Converts primitive data into a value of the declared type, enforcing
    /// the nullability contract.
    ///
    /// Null data yields `Ok(None)` when the declaration is nullable and
    /// [`BindError::NullValue`] when it is not; everything else is delegated
    /// to [`unserialize_value`](Serializer::unserialize_value).
    pub fn unserialize(
        &self,
        data: &Primitive,
        decl: &TypeDecl,
    ) -> Result<Option<Box<dyn Reflect>>, BindError> {
        if data.is_null() {
            if decl.nullable {
                Ok(None)
            } else {
                Err(BindError::null_value(decl, "value"))
            }
        } else {
            self.unserialize_value(data, decl).map(Some)
        }
    }
}

impl fmt::Debug for dyn Serializer {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("dyn Serializer")
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TypeTable;

    struct Never;

    impl Serializer for Never {
        fn matches(&self, _decl: &TypeDecl) -> bool {
            false
        }

        fn serialize(&self, _value: &dyn Reflect) -> Result<Primitive, BindError> {
            unreachable!()
        }

        fn unserialize_value(
            &self,
            _data: &Primitive,
            _decl: &TypeDecl,
        ) -> Result<Box<dyn Reflect>, BindError> {
            unreachable!()
        }
    }

    #[test]
    fn null_handling_is_decided_before_the_serializer_runs() {
        let serializer: &dyn Serializer = &Never;
        let table = TypeTable::new();

        let nullable = TypeDecl::from_name("?i64", &table);
        assert!(
            serializer
                .unserialize(&Primitive::Null, &nullable)
                .unwrap()
                .is_none()
        );

        let required = TypeDecl::from_name("i64", &table);
        assert!(matches!(
            serializer
                .unserialize(&Primitive::Null, &required)
                .unwrap_err(),
            BindError::NullValue { .. }
        ));
    }
}
