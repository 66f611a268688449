use std::any::{Any, TypeId};
use std::fmt;

use crate::info::TypePath;
use crate::reflection::{ReflectKind, ReflectMut, ReflectRef};

// -----------------------------------------------------------------------------
// DynamicTypePath

/// Object-safe access to a value's [`TypePath`] information.
///
/// Implemented for every `T: TypePath`; serializers use it to infer a
/// [`TypeDecl`](crate::info::TypeDecl) from a concrete value when no static
/// type is known.
pub trait DynamicTypePath {
    /// The canonical type identifier of the underlying value.
    fn reflect_type_path(&self) -> &'static str;

    /// The short type name of the underlying value.
    fn reflect_type_name(&self) -> &'static str;
}

impl<T: TypePath> DynamicTypePath for T {
    #[inline]
    fn reflect_type_path(&self) -> &'static str {
        T::type_path()
    }

    #[inline]
    fn reflect_type_name(&self) -> &'static str {
        T::type_name()
    }
}

// -----------------------------------------------------------------------------
// Reflect

/// The foundational trait for values the engine can convert.
///
/// A `&dyn Reflect` carries its canonical type path (for descriptor
/// inference) and a [kind](ReflectKind) tag that exposes the container or
/// composite capability interfaces.
///
/// Use [the derive macro](databind_derive::Reflect) for structs; scalar and
/// container impls are provided in [`crate::impls`].
///
/// # Examples
///
/// ```
/// use databind::Reflect;
///
/// let x = 32_i64;
/// let r: &dyn Reflect = &x;
///
/// assert_eq!(r.reflect_type_path(), "i64");
/// assert_eq!(r.downcast_ref::<i64>(), Some(&32));
/// ```
pub trait Reflect: DynamicTypePath + Any + Send + Sync {
    /// Returns the ["kind"](ReflectKind) of this value.
    fn reflect_kind(&self) -> ReflectKind;

    /// Returns this value tagged with its kind, exposing the matching
    /// capability trait.
    fn reflect_ref(&self) -> ReflectRef<'_>;

    /// Returns this value mutably, tagged with its kind.
    fn reflect_mut(&mut self) -> ReflectMut<'_>;

    /// Debug formatter for the value; defaults to the type path.
    fn reflect_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.reflect_type_path())
    }
}

impl dyn Reflect {
    /// Returns the [`TypeId`] of the underlying value.
    ///
    /// `Box<dyn Reflect>::type_id` would return the id of the box; this
    /// always reaches through to the concrete value.
    #[inline]
    pub fn ty_id(&self) -> TypeId {
        let this: &dyn Any = self;
        this.type_id()
    }

    /// Returns `true` if the underlying value is of type `T`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use databind::Reflect;
    /// let x: Box<dyn Reflect> = Box::new(10_i64);
    /// assert!(x.is::<i64>());
    /// assert!(!x.is::<bool>());
    /// ```
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.ty_id() == TypeId::of::<T>()
    }

    /// Downcasts the value to type `T` by reference.
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        let this: &dyn Any = self;
        this.downcast_ref()
    }

    /// Downcasts the value to type `T` by mutable reference.
    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        let this: &mut dyn Any = self;
        this.downcast_mut()
    }

    /// Downcasts the value to type `T`, consuming the trait object.
    ///
    /// If the underlying value is not of type `T`, returns `Err(self)`.
    pub fn downcast<T: Any>(self: Box<dyn Reflect>) -> Result<Box<T>, Box<dyn Reflect>> {
        if self.is::<T>() {
            let this: Box<dyn Any> = self;
            match this.downcast::<T>() {
                Ok(value) => Ok(value),
                Err(_) => unreachable!("type id already checked"),
            }
        } else {
            Err(self)
        }
    }

    /// Downcasts the value to type `T`, unboxing and consuming the trait
    /// object.
    ///
    /// # Examples
    ///
    /// ```
    /// # use databind::Reflect;
    /// let x: Box<dyn Reflect> = Box::new(10_i64);
    /// assert_eq!(x.take::<i64>().unwrap(), 10);
    /// ```
    #[inline]
    pub fn take<T: Any>(self: Box<dyn Reflect>) -> Result<T, Box<dyn Reflect>> {
        self.downcast::<T>().map(|boxed| *boxed)
    }
}

impl fmt::Debug for dyn Reflect {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.reflect_debug(f)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downcast_round_trip() {
        let boxed: Box<dyn Reflect> = Box::new(String::from("hello"));
        assert!(boxed.is::<String>());

        let wrong = boxed.downcast::<i64>().unwrap_err();
        assert_eq!(wrong.take::<String>().unwrap(), "hello");
    }

    #[test]
    fn kind_of_scalar() {
        let value = 1.5_f64;
        assert_eq!(value.reflect_kind(), ReflectKind::Opaque);
        assert!(value.reflect_ref().as_struct().is_none());
    }
}
