//! Static type information: canonical type paths, target type declarations,
//! and per-struct field metadata.

mod struct_info;
mod type_decl;
mod type_path;

pub use struct_info::{FieldInfo, StructInfo};
pub use type_decl::TypeDecl;
pub use type_path::{GenericPathCell, TypePath};
