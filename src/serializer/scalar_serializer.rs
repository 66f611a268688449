use std::marker::PhantomData;

use crate::error::BindError;
use crate::info::{TypeDecl, TypePath};
use crate::primitive::Primitive;
use crate::reflection::Reflect;
use crate::serializer::Serializer;

// -----------------------------------------------------------------------------
// ScalarBind

/// A scalar's two-way mapping to the primitive tree.
///
/// Integer widths ride through [`Primitive::Int`] with checked conversion in
/// both directions, so an out-of-range value is [`BindError::InvalidData`]
/// rather than a silent wrap.
pub trait ScalarBind: Reflect + TypePath + Sized {
    /// Converts the value into its primitive node.
    fn to_primitive(&self) -> Result<Primitive, BindError>;

    /// Converts a non-null primitive node back into the value.
    fn from_primitive(data: &Primitive) -> Result<Self, BindError>;
}

// -----------------------------------------------------------------------------
// ScalarSerializer

/// The serializer for one scalar type `T`.
///
/// Matches declarations naming `T`'s type path exactly; nullability is
/// handled upstream by the trait-object wrapper.
pub struct ScalarSerializer<T: ScalarBind> {
    _marker: PhantomData<fn() -> T>,
}

impl<T: ScalarBind> ScalarSerializer<T> {
    /// Creates the serializer.
    #[inline]
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T: ScalarBind> Default for ScalarSerializer<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ScalarBind> Serializer for ScalarSerializer<T> {
    fn matches(&self, decl: &TypeDecl) -> bool {
        decl.is_named(T::type_path())
    }

    fn serialize(&self, value: &dyn Reflect) -> Result<Primitive, BindError> {
        value
            .downcast_ref::<T>()
            .ok_or_else(|| BindError::mismatched(T::type_path(), value.reflect_type_path()))?
            .to_primitive()
    }

    fn unserialize_value(
        &self,
        data: &Primitive,
        _decl: &TypeDecl,
    ) -> Result<Box<dyn Reflect>, BindError> {
        T::from_primitive(data).map(|value| Box::new(value) as Box<dyn Reflect>)
    }
}

// -----------------------------------------------------------------------------
// ScalarBind impls

macro_rules! impl_int_bind {
    ($($ty:ty),* $(,)?) => {
        $(impl ScalarBind for $ty {
            fn to_primitive(&self) -> Result<Primitive, BindError> {
                i64::try_from(*self)
                    .map(Primitive::Int)
                    .map_err(|_| BindError::invalid_value(<$ty>::type_path(), "out-of-range int"))
            }

            fn from_primitive(data: &Primitive) -> Result<Self, BindError> {
                match data {
                    Primitive::Int(value) => <$ty>::try_from(*value).map_err(|_| {
                        BindError::invalid_value(<$ty>::type_path(), "out-of-range int")
                    }),
                    other => Err(BindError::invalid_value(
                        <$ty>::type_path(),
                        other.kind_name(),
                    )),
                }
            }
        })*
    };
}

impl_int_bind!(i8, i16, i32, i64, u8, u16, u32, u64);

impl ScalarBind for bool {
    fn to_primitive(&self) -> Result<Primitive, BindError> {
        Ok(Primitive::Bool(*self))
    }

    fn from_primitive(data: &Primitive) -> Result<Self, BindError> {
        match data {
            Primitive::Bool(value) => Ok(*value),
            other => Err(BindError::invalid_value("bool", other.kind_name())),
        }
    }
}

impl ScalarBind for f32 {
    fn to_primitive(&self) -> Result<Primitive, BindError> {
        Ok(Primitive::Float(f64::from(*self)))
    }

    fn from_primitive(data: &Primitive) -> Result<Self, BindError> {
        // Int is accepted too; data formats without a float/int split (and
        // whole-number floats encoded as ints) stay usable.
        match data {
            Primitive::Float(value) => Ok(*value as f32),
            Primitive::Int(value) => Ok(*value as f32),
            other => Err(BindError::invalid_value("f32", other.kind_name())),
        }
    }
}

impl ScalarBind for f64 {
    fn to_primitive(&self) -> Result<Primitive, BindError> {
        Ok(Primitive::Float(*self))
    }

    fn from_primitive(data: &Primitive) -> Result<Self, BindError> {
        match data {
            Primitive::Float(value) => Ok(*value),
            Primitive::Int(value) => Ok(*value as f64),
            other => Err(BindError::invalid_value("f64", other.kind_name())),
        }
    }
}

impl ScalarBind for char {
    fn to_primitive(&self) -> Result<Primitive, BindError> {
        Ok(Primitive::Str(self.to_string()))
    }

    fn from_primitive(data: &Primitive) -> Result<Self, BindError> {
        match data {
            Primitive::Str(value) => {
                let mut chars = value.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => Ok(ch),
                    _ => Err(BindError::invalid_value("char", "multi-character str")),
                }
            }
            other => Err(BindError::invalid_value("char", other.kind_name())),
        }
    }
}

impl ScalarBind for String {
    fn to_primitive(&self) -> Result<Primitive, BindError> {
        Ok(Primitive::Str(self.clone()))
    }

    fn from_primitive(data: &Primitive) -> Result<Self, BindError> {
        match data {
            Primitive::Str(value) => Ok(value.clone()),
            other => Err(BindError::invalid_value("str", other.kind_name())),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TypeTable;

    #[test]
    fn matches_by_exact_path() {
        let serializer = ScalarSerializer::<i64>::new();
        let table = TypeTable::new();

        assert!(serializer.matches(&TypeDecl::from_name("i64", &table)));
        assert!(serializer.matches(&TypeDecl::from_name("?i64", &table)));
        assert!(!serializer.matches(&TypeDecl::from_name("i32", &table)));
    }

    #[test]
    fn int_round_trip() {
        let serializer = ScalarSerializer::<u8>::new();
        let table = TypeTable::new();
        let decl = TypeDecl::of::<u8>(&table);

        let data = serializer.serialize(&200_u8).unwrap();
        assert_eq!(data, Primitive::Int(200));

        let back = serializer.unserialize_value(&data, &decl).unwrap();
        assert_eq!(back.take::<u8>().unwrap(), 200);
    }

    #[test]
    fn narrowing_overflow_is_invalid_data() {
        let serializer = ScalarSerializer::<u8>::new();
        let table = TypeTable::new();
        let decl = TypeDecl::of::<u8>(&table);

        let result = serializer.unserialize_value(&Primitive::Int(300), &decl);
        assert!(matches!(
            result.unwrap_err(),
            BindError::InvalidData { .. }
        ));
    }

    #[test]
    fn u64_above_i64_max_fails_on_serialize() {
        let serializer = ScalarSerializer::<u64>::new();
        let value = u64::MAX;

        assert!(matches!(
            serializer.serialize(&value).unwrap_err(),
            BindError::InvalidData { .. }
        ));
    }

    #[test]
    fn float_accepts_whole_number_ints() {
        assert_eq!(f64::from_primitive(&Primitive::Int(3)).unwrap(), 3.0);
        assert!(f64::from_primitive(&Primitive::from("x")).is_err());
    }

    #[test]
    fn char_requires_single_character() {
        assert_eq!(char::from_primitive(&Primitive::from("x")).unwrap(), 'x');
        assert!(char::from_primitive(&Primitive::from("xy")).is_err());
    }
}
