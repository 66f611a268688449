#![doc = include_str!("../README.md")]

// Lets derive-generated code name this crate as `databind` even from within
// the crate itself (doctests and unit tests included).
extern crate self as databind;

pub mod binder;
pub mod error;
pub mod impls;
pub mod info;
pub mod ops;
pub mod primitive;
pub mod reflection;
pub mod registry;
pub mod serializer;

pub use binder::{Binder, BinderBuilder};
pub use error::BindError;
pub use primitive::{Primitive, PrimitiveMap};
pub use reflection::Reflect;

/// The `#[derive(Reflect)]` macro.
pub use databind_derive as derive;

#[cfg(feature = "auto_register")]
#[doc(hidden)]
pub mod __macro_exports {
    pub use inventory;
}
