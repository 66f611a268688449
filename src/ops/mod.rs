//! Capability interfaces for the two compound value shapes: key→value
//! containers and field-bearing structs.

mod map_ops;
mod struct_ops;

pub use map_ops::{DynMap, DynMapBuilder, Map, MapBuilder};
pub use struct_ops::{Struct, take_field};
