use std::fmt;

use crate::error::BindError;
use crate::info::TypePath;
use crate::reflection::{Reflect, ReflectKind, ReflectMut, ReflectRef};
use crate::registry::MapMeta;

// -----------------------------------------------------------------------------
// Map

/// The capability interface of key→value containers.
///
/// Serialization only needs ordered read access; mutation during unserialize
/// goes through a [`MapBuilder`] instead, so a finished container never has
/// to expose insertion.
pub trait Map: Reflect {
    /// Number of entries.
    fn len(&self) -> usize;

    /// Returns `true` if the container has no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates entries in the container's order.
    fn entries(&self) -> Box<dyn Iterator<Item = (&dyn Reflect, &dyn Reflect)> + '_>;
}

// -----------------------------------------------------------------------------
// MapBuilder

/// Accumulates entries during unserialize and produces the finished
/// container.
///
/// A builder is obtained per call from the container's registered
/// [`MapMeta::builder`]; entries arrive already converted, in data order.
pub trait MapBuilder {
    /// Appends one converted entry.
    fn add(&mut self, key: Box<dyn Reflect>, value: Box<dyn Reflect>) -> Result<(), BindError>;

    /// Consumes the builder and returns the finished container.
    fn build(self: Box<Self>) -> Box<dyn Reflect>;
}

// -----------------------------------------------------------------------------
// DynMap

/// A heterogeneous, insertion-ordered container of reflected values.
///
/// `DynMap` is the dynamic fallback container: entries may mix key and value
/// types freely, so element declarations are inferred per entry instead of
/// being declared up front. Entries are appended in order; no key equality is
/// imposed.
///
/// # Examples
///
/// ```
/// use databind::ops::{DynMap, Map};
///
/// let mut map = DynMap::new();
/// map.push(String::from("id"), 7_i64);
/// map.push(1_i64, true);
///
/// assert_eq!(map.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct DynMap {
    entries: Vec<(Box<dyn Reflect>, Box<dyn Reflect>)>,
}

impl DynMap {
    /// Creates an empty container.
    #[inline]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends an entry.
    #[inline]
    pub fn push(&mut self, key: impl Reflect, value: impl Reflect) {
        self.entries.push((Box::new(key), Box::new(value)));
    }

    /// Appends an already boxed entry.
    #[inline]
    pub fn push_boxed(&mut self, key: Box<dyn Reflect>, value: Box<dyn Reflect>) {
        self.entries.push((key, value));
    }
}

impl TypePath for DynMap {
    fn type_path() -> &'static str {
        "databind::ops::DynMap"
    }

    fn type_name() -> &'static str {
        "DynMap"
    }
}

impl Reflect for DynMap {
    #[inline]
    fn reflect_kind(&self) -> ReflectKind {
        ReflectKind::Map
    }

    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Map(self)
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Map(self)
    }

    fn reflect_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries()).finish()
    }
}

impl Map for DynMap {
    #[inline]
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (&dyn Reflect, &dyn Reflect)> + '_> {
        Box::new(self.entries.iter().map(|(k, v)| (&**k, &**v)))
    }
}

impl MapMeta for DynMap {
    fn builder() -> Box<dyn MapBuilder> {
        Box::new(DynMapBuilder(Self::new()))
    }
}

/// Builder for [`DynMap`]; appends entries as they arrive.
pub struct DynMapBuilder(DynMap);

impl MapBuilder for DynMapBuilder {
    fn add(&mut self, key: Box<dyn Reflect>, value: Box<dyn Reflect>) -> Result<(), BindError> {
        self.0.push_boxed(key, value);
        Ok(())
    }

    fn build(self: Box<Self>) -> Box<dyn Reflect> {
        Box::new(self.0)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_keep_insertion_order() {
        let mut map = DynMap::new();
        map.push(String::from("b"), 2_i64);
        map.push(String::from("a"), 1_i64);

        let keys: Vec<_> = map
            .entries()
            .map(|(k, _)| k.downcast_ref::<String>().unwrap().clone())
            .collect();
        assert_eq!(keys, ["b", "a"]);
    }

    #[test]
    fn builder_produces_dyn_map() {
        let mut builder = DynMap::builder();
        builder
            .add(Box::new(String::from("x")), Box::new(true))
            .unwrap();

        let built = builder.build();
        let map = built.downcast_ref::<DynMap>().unwrap();
        assert_eq!(map.len(), 1);
    }
}
