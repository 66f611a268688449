//! Derive support for `databind`.
//!
//! One macro, [`Reflect`], wires a named-field struct into the engine:
//! reflection, field metadata, blank construction, and (under the
//! `auto_register` feature) link-time collection of the registration.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod derive_data;
mod impls;

/// Implements `TypePath`, `Reflect`, `Struct`, and `StructMeta` for a
/// named-field struct.
///
/// ```rust, ignore
/// #[derive(Reflect)]
/// struct Person {
///     name: String,
///     age: i64,
///     nickname: Option<String>,
/// }
/// ```
///
/// An `Option<T>` field is a nullable field of type `T`: it reflects as
/// absent while `None`, and unserialize leaves it `None` when the data has
/// no value for it.
///
/// Every field type must implement `Reflect`, `TypePath`, and `Default`
/// (`Default` supplies the blank value the struct serializer starts from).
/// Generic structs, enums, and tuple or unit structs are not supported.
#[proc_macro_derive(Reflect)]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive_data::ReflectStruct::parse(&input)
        .map(|model| impls::expand(&model))
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
