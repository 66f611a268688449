//! The untyped intermediate representation produced by serialize and consumed
//! by unserialize.
//!
//! A [`Primitive`] is either a scalar, null, or an insertion-ordered mapping
//! of primitives ([`PrimitiveMap`]). It is an in-memory value, not a wire
//! format; the serde impls in this module exist so callers can move the tree
//! through a serde backend of their choosing.

mod serde;

// -----------------------------------------------------------------------------
// Primitive

/// A node of the primitive tree.
///
/// # Examples
///
/// ```
/// use databind::{Primitive, PrimitiveMap};
///
/// let data = Primitive::Map(PrimitiveMap::from_iter([
///     (Primitive::from("name"), Primitive::from("Alice")),
///     (Primitive::from("age"), Primitive::Null),
/// ]));
///
/// let map = data.as_map().unwrap();
/// assert_eq!(map.get_str("name"), Some(&Primitive::from("Alice")));
/// assert!(map.get_str("age").unwrap().is_null());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    /// An explicit null.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// A nested, insertion-ordered mapping.
    Map(PrimitiveMap),
}

impl Primitive {
    /// Returns `true` for [`Primitive::Null`].
    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// A short name for the shape of this node, used in error messages.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
            Self::Map(_) => "map",
        }
    }

    /// Borrows the inner mapping, if this node is one.
    #[inline]
    pub const fn as_map(&self) -> Option<&PrimitiveMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl From<bool> for Primitive {
    #[inline]
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Primitive {
    #[inline]
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Primitive {
    #[inline]
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Primitive {
    #[inline]
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for Primitive {
    #[inline]
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<PrimitiveMap> for Primitive {
    #[inline]
    fn from(value: PrimitiveMap) -> Self {
        Self::Map(value)
    }
}

// -----------------------------------------------------------------------------
// PrimitiveMap

/// An insertion-ordered mapping of primitives.
///
/// Entry iteration order is the order of first insertion; inserting an
/// existing key replaces its value in place. Keys are full [`Primitive`]
/// values (containers may have non-string keys), though struct serialization
/// always produces string keys.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PrimitiveMap {
    entries: Vec<(Primitive, Primitive)>,
}

impl PrimitiveMap {
    /// Creates an empty map.
    #[inline]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Creates an empty map with at least the given capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Inserts a key-value pair.
    ///
    /// If the key is already present its value is replaced and the old value
    /// returned; the entry keeps its original position.
    pub fn insert(&mut self, key: Primitive, value: Primitive) -> Option<Primitive> {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, old)) => Some(std::mem::replace(old, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Looks up a value by key.
    pub fn get(&self, key: &Primitive) -> Option<&Primitive> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Looks up a value by string key.
    pub fn get_str(&self, key: &str) -> Option<&Primitive> {
        self.entries
            .iter()
            .find(|(k, _)| matches!(k, Primitive::Str(s) if s == key))
            .map(|(_, v)| v)
    }

    /// Returns `true` if the map has an entry under the given string key.
    #[inline]
    pub fn contains_str(&self, key: &str) -> bool {
        self.get_str(key).is_some()
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the map has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in insertion order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&Primitive, &Primitive)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }
}

impl FromIterator<(Primitive, Primitive)> for PrimitiveMap {
    fn from_iter<I: IntoIterator<Item = (Primitive, Primitive)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl IntoIterator for PrimitiveMap {
    type Item = (Primitive, Primitive);
    type IntoIter = std::vec::IntoIter<Self::Item>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a PrimitiveMap {
    type Item = (&'a Primitive, &'a Primitive);
    type IntoIter = std::iter::Map<
        std::slice::Iter<'a, (Primitive, Primitive)>,
        fn(&'a (Primitive, Primitive)) -> Self::Item,
    >;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter().map(|(k, v)| (k, v))
    }
}

// -----------------------------------------------------------------------------
// Tests
