use std::fmt;

use crate::ops::{Map, Struct};
use crate::reflection::Reflect;

// -----------------------------------------------------------------------------
// ReflectKind

/// The closed set of value shapes the engine distinguishes.
///
/// Every reflected value is exactly one of these; serializers dispatch on the
/// kind instead of probing concrete types.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReflectKind {
    /// A scalar or otherwise indivisible value.
    Opaque,
    /// A key→value container, see [`Map`].
    Map,
    /// A field-bearing composite type, see [`Struct`].
    Struct,
}

impl fmt::Display for ReflectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Opaque => f.write_str("opaque"),
            Self::Map => f.write_str("map"),
            Self::Struct => f.write_str("struct"),
        }
    }
}

// -----------------------------------------------------------------------------
// ReflectRef / ReflectMut

/// An immutable reflected value, tagged with its [kind](ReflectKind).
pub enum ReflectRef<'a> {
    Opaque(&'a dyn Reflect),
    Map(&'a dyn Map),
    Struct(&'a dyn Struct),
}

impl<'a> ReflectRef<'a> {
    /// The [`ReflectKind`] of this reference.
    pub fn kind(&self) -> ReflectKind {
        match self {
            Self::Opaque(_) => ReflectKind::Opaque,
            Self::Map(_) => ReflectKind::Map,
            Self::Struct(_) => ReflectKind::Struct,
        }
    }

    /// Returns the value as a map, if it is one.
    pub fn as_map(self) -> Option<&'a dyn Map> {
        match self {
            Self::Map(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the value as a struct, if it is one.
    pub fn as_struct(self) -> Option<&'a dyn Struct> {
        match self {
            Self::Struct(value) => Some(value),
            _ => None,
        }
    }
}

/// A mutable reflected value, tagged with its [kind](ReflectKind).
pub enum ReflectMut<'a> {
    Opaque(&'a mut dyn Reflect),
    Map(&'a mut dyn Map),
    Struct(&'a mut dyn Struct),
}

impl<'a> ReflectMut<'a> {
    /// The [`ReflectKind`] of this reference.
    pub fn kind(&self) -> ReflectKind {
        match self {
            Self::Opaque(_) => ReflectKind::Opaque,
            Self::Map(_) => ReflectKind::Map,
            Self::Struct(_) => ReflectKind::Struct,
        }
    }

    /// Returns the value as a mutable struct, if it is one.
    pub fn as_struct(self) -> Option<&'a mut dyn Struct> {
        match self {
            Self::Struct(value) => Some(value),
            _ => None,
        }
    }
}
