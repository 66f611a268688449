use std::borrow::Cow;
use std::fmt;

use crate::info::TypePath;
use crate::primitive::Primitive;
use crate::reflection::Reflect;
use crate::registry::TypeTable;

// -----------------------------------------------------------------------------
// TypeDecl

/// A target type declaration: the "what to produce" side of every conversion.
///
/// A declaration names a type by its canonical path, carries a nullability
/// flag, and for containers with strictly typed elements carries the element
/// declarations. Resolution walks the registry with the declaration; the
/// winning serializer interprets it.
///
/// The textual form accepts a leading `?` as the nullability marker:
///
/// ```
/// use databind::info::TypeDecl;
/// use databind::registry::TypeTable;
///
/// let table = TypeTable::new();
/// let decl = TypeDecl::from_name("?i64", &table);
///
/// assert_eq!(decl.name, "i64");
/// assert!(decl.nullable);
/// assert_eq!(decl.to_string(), "?i64");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct TypeDecl {
    /// The canonical type path, without the nullability marker.
    pub name: Cow<'static, str>,
    /// Whether null is an accepted value for this declaration.
    pub nullable: bool,
    /// The declared key type, for containers with a strict key type.
    pub key: Option<Box<TypeDecl>>,
    /// The declared value type, for containers with a strict value type.
    pub value: Option<Box<TypeDecl>>,
}

impl TypeDecl {
    /// Parses a declaration from its textual form.
    ///
    /// A leading `?` marks the declaration nullable. If the named type is
    /// registered in the table as a container with strict element types, the
    /// element declarations are expanded recursively.
    pub fn from_name(text: &str, table: &TypeTable) -> Self {
        let (nullable, name) = match text.strip_prefix('?') {
            Some(rest) => (true, rest),
            None => (false, text),
        };

        let (key, value) = match table.map_record(name) {
            Some(record) => (
                record
                    .strict_key()
                    .map(|path| Box::new(Self::from_name(path, table))),
                record
                    .strict_value()
                    .map(|path| Box::new(Self::from_name(path, table))),
            ),
            None => (None, None),
        };

        Self {
            name: Cow::Owned(name.to_owned()),
            nullable,
            key,
            value,
        }
    }

    /// Infers a declaration from a concrete value.
    ///
    /// Used per entry when serializing untyped containers. The result is
    /// never nullable; a present value needs no null allowance.
    pub fn from_value(value: &dyn Reflect) -> Self {
        Self {
            name: Cow::Borrowed(value.reflect_type_path()),
            nullable: false,
            key: None,
            value: None,
        }
    }

    /// Infers a declaration from a primitive node.
    ///
    /// Used per entry when unserializing containers without strict element
    /// types. A null node yields the nullable `"null"` declaration, which no
    /// serializer matches; resolution surfaces
    /// [`NoSerializerFound`](crate::BindError::NoSerializerFound).
    pub fn from_primitive(data: &Primitive) -> Self {
        let (name, nullable) = match data {
            Primitive::Null => ("null", true),
            Primitive::Bool(_) => (bool::type_path(), false),
            Primitive::Int(_) => (i64::type_path(), false),
            Primitive::Float(_) => (f64::type_path(), false),
            Primitive::Str(_) => (String::type_path(), false),
            Primitive::Map(_) => (crate::ops::DynMap::type_path(), false),
        };
        Self {
            name: Cow::Borrowed(name),
            nullable,
            key: None,
            value: None,
        }
    }

    /// Declaration for the statically known type `T`.
    #[inline]
    pub fn of<T: TypePath>(table: &TypeTable) -> Self {
        Self::from_name(T::type_path(), table)
    }

    /// Returns `true` if this declaration names the given type path.
    #[inline]
    pub fn is_named(&self, path: &str) -> bool {
        self.name == path
    }
}

impl fmt::Display for TypeDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable {
            f.write_str("?")?;
        }
        f.write_str(&self.name)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nullability_marker() {
        let table = TypeTable::new();

        let plain = TypeDecl::from_name("str", &table);
        assert!(!plain.nullable);
        assert_eq!(plain.name, "str");

        let nullable = TypeDecl::from_name("?str", &table);
        assert!(nullable.nullable);
        assert_eq!(nullable.name, "str");
    }

    #[test]
    fn from_primitive_inference() {
        assert_eq!(TypeDecl::from_primitive(&Primitive::Int(1)).name, "i64");
        assert_eq!(TypeDecl::from_primitive(&Primitive::Float(1.0)).name, "f64");
        assert_eq!(
            TypeDecl::from_primitive(&Primitive::Bool(true)).name,
            "bool"
        );
        assert_eq!(TypeDecl::from_primitive(&Primitive::from("x")).name, "str");

        let null = TypeDecl::from_primitive(&Primitive::Null);
        assert_eq!(null.name, "null");
        assert!(null.nullable);
    }

    #[test]
    fn strict_container_elements_expand_recursively() {
        use crate::impls::OrderedMap;

        let mut table = TypeTable::new();
        table.register_map::<OrderedMap<String, i64>>();
        table.register_map::<OrderedMap<String, OrderedMap<String, i64>>>();

        let decl = TypeDecl::from_name(
            <OrderedMap<String, OrderedMap<String, i64>>>::type_path(),
            &table,
        );
        assert_eq!(decl.key.as_deref().unwrap().name, "str");

        let inner = decl.value.as_deref().unwrap();
        assert_eq!(inner.key.as_deref().unwrap().name, "str");
        assert_eq!(inner.value.as_deref().unwrap().name, "i64");
    }

    #[test]
    fn from_value_is_never_nullable() {
        let value = 3_i64;
        let decl = TypeDecl::from_value(&value);
        assert_eq!(decl.name, "i64");
        assert!(!decl.nullable);
    }
}
