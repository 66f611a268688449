//! Reflection and container impls for scalars, the std ordered map, and the
//! crate's own [`OrderedMap`].

mod collections;
mod scalars;

pub use collections::{BTreeMapBuilder, OrderedMap, OrderedMapBuilder};
