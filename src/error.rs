use std::borrow::Cow;
use std::{error, fmt};

use crate::info::TypeDecl;
use crate::primitive::Primitive;

// -----------------------------------------------------------------------------
// BindError

/// An enumeration of all error outcomes of a serialize or unserialize call.
///
/// Every failure aborts the in-flight call chain immediately; there is no
/// partial result and no internal recovery. The first three variants form the
/// public taxonomy of the engine:
///
/// - [`NoSerializerFound`](Self::NoSerializerFound): the registry has no
///   serializer whose `matches` predicate accepts the requested [`TypeDecl`].
/// - [`InvalidData`](Self::InvalidData): a serializer received a primitive
///   shape incompatible with its expectations (e.g. a scalar where a keyed
///   mapping was required).
/// - [`NullValue`](Self::NullValue): a non-nullable value or field was
///   missing or explicitly null during unserialize.
///
/// The remaining variants cover failure modes specific to the type-erased
/// plumbing (failed downcasts, unknown field names, a resolver reference used
/// outside its lifetime).
#[derive(Debug)]
pub enum BindError {
    /// No registered serializer matches the requested type declaration.
    NoSerializerFound { decl: Cow<'static, str> },
    /// The primitive data has a shape the serializer cannot accept.
    InvalidData {
        decl: Cow<'static, str>,
        found: Cow<'static, str>,
    },
    /// A non-nullable value or field was missing or explicitly null.
    NullValue {
        decl: Cow<'static, str>,
        context: Cow<'static, str>,
    },
    /// A type-erased value failed to downcast to the expected concrete type.
    MismatchedTypes {
        expected: Cow<'static, str>,
        found: Cow<'static, str>,
    },
    /// `set_field` was called with a name the struct does not declare.
    UnknownField {
        type_path: Cow<'static, str>,
        field: Cow<'static, str>,
    },
    /// A resolver-aware serializer was used before [`attach`] or after its
    /// resolver was dropped.
    ///
    /// [`attach`]: crate::registry::ResolverAware::attach
    ResolverDetached,
}

impl BindError {
    /// Resolution failure for the given declaration.
    pub fn no_serializer(decl: &TypeDecl) -> Self {
        Self::NoSerializerFound {
            decl: Cow::Owned(decl.to_string()),
        }
    }

    /// Shape mismatch between a declaration and the primitive data it was
    /// unserialized against.
    pub fn invalid_data(decl: &TypeDecl, found: &Primitive) -> Self {
        Self::InvalidData {
            decl: Cow::Owned(decl.to_string()),
            found: Cow::Borrowed(found.kind_name()),
        }
    }

    /// Shape mismatch reported by a scalar strategy for a named type.
    pub fn invalid_value(
        decl: impl Into<Cow<'static, str>>,
        found: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::InvalidData {
            decl: decl.into(),
            found: found.into(),
        }
    }

    /// Null or missing data for a non-nullable declaration.
    pub fn null_value(decl: &TypeDecl, context: impl Into<Cow<'static, str>>) -> Self {
        Self::NullValue {
            decl: Cow::Owned(decl.to_string()),
            context: context.into(),
        }
    }

    /// Failed downcast of a type-erased value.
    pub fn mismatched(
        expected: impl Into<Cow<'static, str>>,
        found: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::MismatchedTypes {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Unknown field name for the given struct type.
    pub fn unknown_field(
        type_path: impl Into<Cow<'static, str>>,
        field: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::UnknownField {
            type_path: type_path.into(),
            field: field.into(),
        }
    }
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSerializerFound { decl } => {
                write!(f, "no serializer found for type `{decl}`")
            }
            Self::InvalidData { decl, found } => {
                write!(f, "invalid data for type `{decl}`: found {found}")
            }
            Self::NullValue { decl, context } => {
                write!(f, "null value for non-nullable type `{decl}` at {context}")
            }
            Self::MismatchedTypes { expected, found } => {
                write!(f, "expected a value of type `{expected}`, found `{found}`")
            }
            Self::UnknownField { type_path, field } => {
                write!(f, "type `{type_path}` has no field named `{field}`")
            }
            Self::ResolverDetached => {
                write!(f, "serializer used without an attached dependency resolver")
            }
        }
    }
}

impl error::Error for BindError {}
