use std::collections::BTreeMap;
use std::fmt;

use crate::error::BindError;
use crate::info::{GenericPathCell, TypePath};
use crate::ops::{Map, MapBuilder, take_field};
use crate::reflection::{Reflect, ReflectKind, ReflectMut, ReflectRef};
use crate::registry::MapMeta;

// -----------------------------------------------------------------------------
// OrderedMap

/// A strictly typed, insertion-ordered container.
///
/// Entries iterate in first-insertion order; inserting an existing key
/// replaces its value in place. Registered as a container with strict key and
/// value types, so serialization resolves the element serializers once per
/// call and unserialization trusts the declared element declarations.
///
/// # Examples
///
/// ```
/// use databind::impls::OrderedMap;
///
/// let map: OrderedMap<String, i64> = [
///     (String::from("b"), 2),
///     (String::from("a"), 1),
/// ]
/// .into_iter()
/// .collect();
///
/// let keys: Vec<_> = map.iter().map(|(k, _)| k.as_str()).collect();
/// assert_eq!(keys, ["b", "a"]);
/// ```
pub struct OrderedMap<K, V> {
    entries: Vec<(K, V)>,
}

impl<K: PartialEq, V> OrderedMap<K, V> {
    /// Creates an empty container.
    #[inline]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Inserts a key-value pair; an existing key keeps its position and gets
    /// the new value, with the old value returned.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, old)) => Some(std::mem::replace(old, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Looks up a value by key.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the container has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in insertion order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }
}

impl<K: PartialEq, V> Default for OrderedMap<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for OrderedMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for OrderedMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(k, v)| (k, v)))
            .finish()
    }
}

impl<K: PartialEq, V> FromIterator<(K, V)> for OrderedMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<K, V> TypePath for OrderedMap<K, V>
where
    K: TypePath,
    V: TypePath,
{
    fn type_path() -> &'static str {
        static CELL: GenericPathCell = GenericPathCell::new();
        CELL.get_or_insert::<Self>(|| {
            format!(
                "databind::impls::OrderedMap<{}, {}>",
                K::type_path(),
                V::type_path()
            )
        })
    }

    fn type_name() -> &'static str {
        static CELL: GenericPathCell = GenericPathCell::new();
        CELL.get_or_insert::<Self>(|| {
            format!("OrderedMap<{}, {}>", K::type_name(), V::type_name())
        })
    }
}

impl<K, V> Reflect for OrderedMap<K, V>
where
    K: Reflect + TypePath + PartialEq,
    V: Reflect + TypePath,
{
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

impl<K, V> Map for OrderedMap<K, V>
where
    K: Reflect + TypePath + PartialEq,
    V: Reflect + TypePath,
{
    #[inline]
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (&dyn Reflect, &dyn Reflect)> + '_> {
        Box::new(
            self.entries
                .iter()
                .map(|(k, v)| (k as &dyn Reflect, v as &dyn Reflect)),
        )
    }
}

impl<K, V> MapMeta for OrderedMap<K, V>
where
    K: Reflect + TypePath + PartialEq,
    V: Reflect + TypePath,
{
    fn strict_key() -> Option<&'static str> {
        Some(K::type_path())
    }

    fn strict_value() -> Option<&'static str> {
        Some(V::type_path())
    }

    fn builder() -> Box<dyn MapBuilder> {
        Box::new(OrderedMapBuilder(Self::new()))
    }
}

/// Builder for [`OrderedMap`]; downcasts each converted entry to the strict
/// element types.
pub struct OrderedMapBuilder<K, V>(OrderedMap<K, V>);

impl<K, V> MapBuilder for OrderedMapBuilder<K, V>
where
    K: Reflect + TypePath + PartialEq,
    V: Reflect + TypePath,
{
    fn add(&mut self, key: Box<dyn Reflect>, value: Box<dyn Reflect>) -> Result<(), BindError> {
        self.0.insert(take_field(key)?, take_field(value)?);
        Ok(())
    }

    fn build(self: Box<Self>) -> Box<dyn Reflect> {
        Box::new(self.0)
    }
}

// -----------------------------------------------------------------------------
// BTreeMap

impl<K, V> TypePath for BTreeMap<K, V>
where
    K: TypePath,
    V: TypePath,
{
    fn type_path() -> &'static str {
        static CELL: GenericPathCell = GenericPathCell::new();
        CELL.get_or_insert::<Self>(|| {
            format!(
                "std::collections::BTreeMap<{}, {}>",
                K::type_path(),
                V::type_path()
            )
        })
    }

    fn type_name() -> &'static str {
        static CELL: GenericPathCell = GenericPathCell::new();
        CELL.get_or_insert::<Self>(|| format!("BTreeMap<{}, {}>", K::type_name(), V::type_name()))
    }
}

impl<K, V> Reflect for BTreeMap<K, V>
where
    K: Reflect + TypePath + Ord,
    V: Reflect + TypePath,
{
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

impl<K, V> Map for BTreeMap<K, V>
where
    K: Reflect + TypePath + Ord,
    V: Reflect + TypePath,
{
    #[inline]
    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (&dyn Reflect, &dyn Reflect)> + '_> {
        Box::new(
            self.iter()
                .map(|(k, v)| (k as &dyn Reflect, v as &dyn Reflect)),
        )
    }
}

impl<K, V> MapMeta for BTreeMap<K, V>
where
    K: Reflect + TypePath + Ord,
    V: Reflect + TypePath,
{
    fn strict_key() -> Option<&'static str> {
        Some(K::type_path())
    }

    fn strict_value() -> Option<&'static str> {
        Some(V::type_path())
    }

    fn builder() -> Box<dyn MapBuilder> {
        Box::new(BTreeMapBuilder(Self::new()))
    }
}

/// Builder for the std [`BTreeMap`]; entry order comes from key ordering, not
/// data order.
pub struct BTreeMapBuilder<K, V>(BTreeMap<K, V>);

impl<K, V> MapBuilder for BTreeMapBuilder<K, V>
where
    K: Reflect + TypePath + Ord,
    V: Reflect + TypePath,
{
    fn add(&mut self, key: Box<dyn Reflect>, value: Box<dyn Reflect>) -> Result<(), BindError> {
        self.0.insert(take_field(key)?, take_field(value)?);
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
    fn ordered_map_replaces_in_place() {
        let mut map = OrderedMap::new();
        map.insert(String::from("a"), 1_i64);
        map.insert(String::from("b"), 2_i64);

        assert_eq!(map.insert(String::from("a"), 10), Some(1));
        assert_eq!(map.len(), 2);
        assert_eq!(map.iter().next(), Some((&String::from("a"), &10)));
    }

    #[test]
    fn generic_paths_embed_element_paths() {
        assert_eq!(
            <OrderedMap<String, i64>>::type_path(),
            "databind::impls::OrderedMap<str, i64>"
        );
        assert_eq!(
            <BTreeMap<String, bool>>::type_path(),
            "std::collections::BTreeMap<str, bool>"
        );
    }

    #[test]
    fn strict_elements_are_declared() {
        assert_eq!(<OrderedMap<String, i64>>::strict_key(), Some("str"));
        assert_eq!(<OrderedMap<String, i64>>::strict_value(), Some("i64"));
    }

    #[test]
    fn builders_downcast_entries() {
        let mut builder = <OrderedMap<String, i64>>::builder();
        builder
            .add(Box::new(String::from("k")), Box::new(5_i64))
            .unwrap();

        let wrong = builder.add(Box::new(true), Box::new(5_i64));
        assert!(matches!(
            wrong.unwrap_err(),
            BindError::MismatchedTypes { .. }
        ));

        let built = builder.build();
        let map = built.downcast_ref::<OrderedMap<String, i64>>().unwrap();
        assert_eq!(map.get(&String::from("k")), Some(&5));
    }
}
