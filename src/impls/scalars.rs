use std::fmt;

use crate::info::TypePath;
use crate::reflection::{Reflect, ReflectKind, ReflectMut, ReflectRef};

// Scalars are opaque: the engine never looks inside them, the scalar
// serializers do.
macro_rules! impl_opaque_reflect {
    ($($ty:ty => $path:literal),* $(,)?) => {
        $(
            impl TypePath for $ty {
                #[inline]
                fn type_path() -> &'static str {
                    $path
                }
            }

            impl Reflect for $ty {
                #[inline]
                fn reflect_kind(&self) -> ReflectKind {
                    ReflectKind::Opaque
                }

                #[inline]
                fn reflect_ref(&self) -> ReflectRef<'_> {
                    ReflectRef::Opaque(self)
                }

                #[inline]
                fn reflect_mut(&mut self) -> ReflectMut<'_> {
                    ReflectMut::Opaque(self)
                }

                fn reflect_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{self:?}")
                }
            }
        )*
    };
}

impl_opaque_reflect! {
    bool => "bool",
    i8 => "i8",
    i16 => "i16",
    i32 => "i32",
    i64 => "i64",
    u8 => "u8",
    u16 => "u16",
    u32 => "u32",
    u64 => "u64",
    f32 => "f32",
    f64 => "f64",
    char => "char",
    String => "str",
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_path_is_str() {
        assert_eq!(String::type_path(), "str");
        assert_eq!(u32::type_path(), "u32");
    }

    #[test]
    fn scalars_are_opaque() {
        let value = 'x';
        assert_eq!(value.reflect_kind(), ReflectKind::Opaque);
        assert_eq!(format!("{:?}", &value as &dyn Reflect), "'x'");
    }
}
