use crate::info::TypePath;

// -----------------------------------------------------------------------------
// FieldInfo

/// Compile-time information about a single struct field.
///
/// The field's type path is deferred behind a function pointer so that
/// `FieldInfo` construction stays `const`-friendly inside derive output even
/// for generic element paths built lazily.
#[derive(Clone, Debug)]
pub struct FieldInfo {
    name: &'static str,
    type_path: fn() -> &'static str,
    nullable: bool,
}

impl FieldInfo {
    /// Describes a field of type `T`.
    ///
    /// `nullable` is `true` when the field is declared as `Option<T>`; the
    /// info then carries the inner type's path.
    pub const fn new<T: TypePath>(name: &'static str, nullable: bool) -> Self {
        Self {
            name,
            type_path: T::type_path,
            nullable,
        }
    }

    /// The field name.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The canonical path of the field's (inner) type.
    #[inline]
    pub fn type_path(&self) -> &'static str {
        (self.type_path)()
    }

    /// Whether the field accepts null, i.e. is an `Option`.
    #[inline]
    pub const fn nullable(&self) -> bool {
        self.nullable
    }
}

// -----------------------------------------------------------------------------
// StructInfo

/// Compile-time information about a struct: its path and ordered fields.
///
/// Produced once per type by [the derive macro](databind_derive::Reflect) and
/// cached in a `OnceLock`; everything downstream borrows it as
/// `&'static StructInfo`.
#[derive(Debug)]
pub struct StructInfo {
    type_path: &'static str,
    type_name: &'static str,
    fields: Box<[FieldInfo]>,
}

impl StructInfo {
    /// Builds the info record for struct `T` from its fields, in declaration
    /// order.
    pub fn new<T: TypePath>(fields: Vec<FieldInfo>) -> Self {
        Self {
            type_path: T::type_path(),
            type_name: T::type_name(),
            fields: fields.into_boxed_slice(),
        }
    }

    /// The canonical type path of the struct.
    #[inline]
    pub const fn type_path(&self) -> &'static str {
        self.type_path
    }

    /// The short name of the struct.
    #[inline]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The fields, in declaration order.
    #[inline]
    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|field| field.name == name)
    }
}

// -----------------------------------------------------------------------------
// Tests
