//! The two registries of the engine: the ordered serializer resolver and the
//! type table that holds per-type registration records.

mod resolver;
mod type_table;

pub use resolver::{DependencyResolver, ResolverAware, ResolverBuilder, ResolverRef};
pub use type_table::{MapMeta, MapRecord, StructMeta, StructRecord, TypeRegistration, TypeTable};
