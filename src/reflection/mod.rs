//! The value-side reflection layer: the [`Reflect`] trait and the closed
//! kind model that exposes container and composite capabilities.

mod kind;
mod reflect;

pub use kind::{ReflectKind, ReflectMut, ReflectRef};
pub use reflect::{DynamicTypePath, Reflect};
