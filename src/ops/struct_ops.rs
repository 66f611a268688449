use crate::error::BindError;
use crate::info::TypePath;
use crate::reflection::Reflect;

// -----------------------------------------------------------------------------
// Struct

/// The capability interface of field-bearing composite types.
///
/// Field access is by name or declaration index. A nullable field whose value
/// is currently null reports `None` from the accessors; setting a field
/// replaces its value wholesale.
///
/// Implemented by [the derive macro](databind_derive::Reflect); hand-written
/// impls are possible but rarely needed.
pub trait Struct: Reflect {
    /// Borrows a field by name; `None` if absent or currently null.
    fn field(&self, name: &str) -> Option<&dyn Reflect>;

    /// Borrows a field by declaration index; `None` if out of range or
    /// currently null.
    fn field_at(&self, index: usize) -> Option<&dyn Reflect>;

    /// The name of the field at the given declaration index.
    fn name_at(&self, index: usize) -> Option<&'static str>;

    /// Number of declared fields.
    fn field_len(&self) -> usize;

    /// Replaces the named field's value.
    ///
    /// Fails with [`BindError::UnknownField`] for an undeclared name and
    /// [`BindError::MismatchedTypes`] when the boxed value has the wrong
    /// concrete type.
    fn set_field(&mut self, name: &str, value: Box<dyn Reflect>) -> Result<(), BindError>;
}

/// Unboxes a type-erased field value to its concrete type.
///
/// Derive-generated `set_field` arms use this to turn the incoming
/// `Box<dyn Reflect>` into the field's type, reporting the expected and found
/// paths on mismatch.
pub fn take_field<T: Reflect + TypePath>(value: Box<dyn Reflect>) -> Result<T, BindError> {
    value
        .take::<T>()
        .map_err(|found| BindError::mismatched(T::type_path(), found.reflect_type_path()))
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_field_reports_both_paths() {
        let value: Box<dyn Reflect> = Box::new(10_i64);
        assert_eq!(take_field::<i64>(value).unwrap(), 10);

        let wrong: Box<dyn Reflect> = Box::new(true);
        match take_field::<i64>(wrong).unwrap_err() {
            BindError::MismatchedTypes { expected, found } => {
                assert_eq!(expected, "i64");
                assert_eq!(found, "bool");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
