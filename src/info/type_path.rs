use std::any::{Any, TypeId};
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

// -----------------------------------------------------------------------------
// TypePath

/// A static, canonical identifier for a type.
///
/// `type_path` is the identifier [`TypeDecl`](crate::info::TypeDecl)s carry
/// and the [`TypeTable`](crate::registry::TypeTable) keys by; it must be
/// unique across every type handled by one engine instance. Scalars use their
/// bare Rust names (`"i64"`, `"bool"`, `"str"`); derived structs use
/// `module_path::Name`; generic containers build theirs through a
/// [`GenericPathCell`].
///
/// # Examples
///
/// ```
/// use databind::info::TypePath;
///
/// assert_eq!(i64::type_path(), "i64");
/// assert_eq!(String::type_path(), "str");
/// ```
pub trait TypePath: 'static {
    /// The canonical type identifier.
    fn type_path() -> &'static str;

    /// The short type name; defaults to the full path.
    fn type_name() -> &'static str {
        Self::type_path()
    }
}

// -----------------------------------------------------------------------------
// GenericPathCell

/// Static storage for the type paths of generic types.
///
/// A `static CELL` inside a generic function is shared by every
/// instantiation, so the cell keys the built paths by [`TypeId`] and leaks
/// each one once.
///
/// # Examples
///
/// ```ignore
/// impl<K: TypePath, V: TypePath> TypePath for OrderedMap<K, V> {
///     fn type_path() -> &'static str {
///         static CELL: GenericPathCell = GenericPathCell::new();
///         CELL.get_or_insert::<Self>(|| {
///             format!("OrderedMap<{}, {}>", K::type_path(), V::type_path())
///         })
///     }
/// }
/// ```
pub struct GenericPathCell(RwLock<BTreeMap<TypeId, &'static str>>);

impl GenericPathCell {
    /// Creates an empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(BTreeMap::new()))
    }

    /// Returns the path stored for type `T`, building and leaking it from
    /// the given function on first access.
    pub fn get_or_insert<T: Any + ?Sized>(&self, f: impl FnOnce() -> String) -> &'static str {
        let type_id = TypeId::of::<T>();
        if let Some(path) = self
            .0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
        {
            return path;
        }
        // Build before locking: `f` re-enters this cell for the element
        // paths of a nested generic.
        let built = f();
        let mut table = self.0.write().unwrap_or_else(PoisonError::into_inner);
        table
            .entry(type_id)
            .or_insert_with(|| Box::leak(built.into_boxed_str()))
    }
}

impl Default for GenericPathCell {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_is_keyed_by_type() {
        static CELL: GenericPathCell = GenericPathCell::new();

        let a = CELL.get_or_insert::<u8>(|| "first".to_owned());
        let b = CELL.get_or_insert::<u16>(|| "second".to_owned());
        // Second access must not rebuild.
        let a_again = CELL.get_or_insert::<u8>(|| unreachable!());

        assert_eq!(a, "first");
        assert_eq!(b, "second");
        assert!(std::ptr::eq(a, a_again));
    }
}
