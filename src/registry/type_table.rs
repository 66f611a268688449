use std::collections::HashMap;

use crate::info::{FieldInfo, StructInfo, TypeDecl, TypePath};
use crate::ops::{DynMap, Map, MapBuilder, Struct};
use crate::reflection::Reflect;

// -----------------------------------------------------------------------------
// Meta traits

/// Registration metadata for composite types.
///
/// Generated by [the derive macro](databind_derive::Reflect): `struct_info`
/// describes the fields, `blank` produces the instance the struct serializer
/// fills field by field during unserialize.
pub trait StructMeta: Struct + TypePath + Sized {
    /// The cached field description of this struct.
    fn struct_info() -> &'static StructInfo;

    /// A fresh instance with every field at its default value.
    fn blank() -> Self;
}

/// Registration metadata for container types.
///
/// A container declares its element types by overriding `strict_key` and
/// `strict_value`; the defaults leave both open, making the container
/// heterogeneous with per-entry type inference.
pub trait MapMeta: Map + TypePath + Sized {
    /// The declared key type path, if the container is strictly keyed.
    fn strict_key() -> Option<&'static str> {
        None
    }

    /// The declared value type path, if the container is strictly valued.
    fn strict_value() -> Option<&'static str> {
        None
    }

    /// A fresh builder for one unserialize call.
    fn builder() -> Box<dyn MapBuilder>;
}

// -----------------------------------------------------------------------------
// Records

/// The table's record of a registered struct type.
pub struct StructRecord {
    info: &'static StructInfo,
    blank: fn() -> Box<dyn Reflect>,
}

impl StructRecord {
    /// The struct's field description.
    #[inline]
    pub fn info(&self) -> &'static StructInfo {
        self.info
    }

    /// Produces a blank instance, boxed.
    #[inline]
    pub fn blank(&self) -> Box<dyn Reflect> {
        (self.blank)()
    }
}

/// The table's record of a registered container type.
pub struct MapRecord {
    strict_key: fn() -> Option<&'static str>,
    strict_value: fn() -> Option<&'static str>,
    make_builder: fn() -> Box<dyn MapBuilder>,
}

impl MapRecord {
    /// The declared key type path, if any.
    #[inline]
    pub fn strict_key(&self) -> Option<&'static str> {
        (self.strict_key)()
    }

    /// The declared value type path, if any.
    #[inline]
    pub fn strict_value(&self) -> Option<&'static str> {
        (self.strict_value)()
    }

    /// A fresh builder for one unserialize call.
    #[inline]
    pub fn builder(&self) -> Box<dyn MapBuilder> {
        (self.make_builder)()
    }
}

enum TypeRecord {
    Struct(StructRecord),
    Map(MapRecord),
}

// -----------------------------------------------------------------------------
// TypeTable

/// The introspection collaborator: canonical type path → registration record.
///
/// Serializers consult the table instead of the values themselves for
/// everything static: struct field layouts, blank construction, container
/// builders, and strict element declarations. The table is populated during
/// setup and read-only afterwards; [`Binder`](crate::Binder) construction
/// freezes it behind an `Arc`.
///
/// [`DynMap`] is always registered.
pub struct TypeTable {
    records: HashMap<&'static str, TypeRecord>,
}

impl TypeTable {
    /// Creates a table holding only the built-in [`DynMap`] registration.
    pub fn new() -> Self {
        let mut table = Self {
            records: HashMap::new(),
        };
        table.register_map::<DynMap>();
        table
    }

    /// Creates a table and applies every registration collected through
    /// [the derive macro](databind_derive::Reflect)'s `auto_register`
    /// submission.
    #[cfg(feature = "auto_register")]
    pub fn with_registered() -> Self {
        let mut table = Self::new();
        for registration in inventory::iter::<TypeRegistration> {
            (registration.register)(&mut table);
        }
        table
    }

    /// Registers a struct type under its canonical path.
    pub fn register_struct<T: StructMeta>(&mut self) {
        fn blank_boxed<T: StructMeta>() -> Box<dyn Reflect> {
            Box::new(T::blank())
        }
        self.records.insert(
            T::type_path(),
            TypeRecord::Struct(StructRecord {
                info: T::struct_info(),
                blank: blank_boxed::<T>,
            }),
        );
    }

    /// Registers a container type under its canonical path.
    pub fn register_map<T: MapMeta>(&mut self) {
        self.records.insert(
            T::type_path(),
            TypeRecord::Map(MapRecord {
                strict_key: T::strict_key,
                strict_value: T::strict_value,
                make_builder: T::builder,
            }),
        );
    }

    /// Looks up a struct registration by type path.
    pub fn struct_record(&self, path: &str) -> Option<&StructRecord> {
        match self.records.get(path) {
            Some(TypeRecord::Struct(record)) => Some(record),
            _ => None,
        }
    }

    /// Looks up a container registration by type path.
    pub fn map_record(&self, path: &str) -> Option<&MapRecord> {
        match self.records.get(path) {
            Some(TypeRecord::Map(record)) => Some(record),
            _ => None,
        }
    }

    /// Builds the target declaration for a struct field, expanding strict
    /// container element types.
    pub fn detect(&self, field: &FieldInfo) -> TypeDecl {
        let mut decl = TypeDecl::from_name(field.type_path(), self);
        decl.nullable = field.nullable();
        decl
    }
}

impl Default for TypeTable {
    fn default() -> Self {
        Self::new()
    }
}

// -----------------------------------------------------------------------------
// TypeRegistration

/// A deferred registration, collected at link time under `auto_register`.
///
/// The derive macro submits one of these per derived struct; call
/// [`TypeTable::with_registered`] to apply them all.
pub struct TypeRegistration {
    register: fn(&mut TypeTable),
}

impl TypeRegistration {
    /// The registration entry for struct `T`.
    pub const fn of<T: StructMeta>() -> Self {
        Self {
            register: TypeTable::register_struct::<T>,
        }
    }
}

#[cfg(feature = "auto_register")]
inventory::collect!(TypeRegistration);

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dyn_map_is_always_registered() {
        let table = TypeTable::new();
        let record = table.map_record(DynMap::type_path()).unwrap();
        assert_eq!(record.strict_key(), None);
        assert_eq!(record.strict_value(), None);
    }

    #[test]
    fn detect_carries_field_nullability() {
        let table = TypeTable::new();

        let required = table.detect(&FieldInfo::new::<i64>("age", false));
        assert_eq!(required.name, "i64");
        assert!(!required.nullable);

        let optional = table.detect(&FieldInfo::new::<i64>("age", true));
        assert!(optional.nullable);
    }
}
