use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::ReflectStruct;

/// Expands the full impl set for one parsed struct.
pub(crate) fn expand(model: &ReflectStruct) -> TokenStream {
    let ident = &model.ident;
    let name = ident.to_string();
    let field_count = model.fields.len();

    let names: Vec<_> = model.fields.iter().map(|f| f.name.as_str()).collect();
    let indices: Vec<_> = (0..field_count).collect();

    // Borrow expressions shared by `field` and `field_at`: a nullable field
    // reflects as absent while `None`.
    let accessors: Vec<TokenStream> = model
        .fields
        .iter()
        .map(|field| {
            let ident = &field.ident;
            if field.nullable {
                quote! {
                    self.#ident.as_ref().map(|value| value as &dyn databind::Reflect)
                }
            } else {
                quote! {
                    ::core::option::Option::Some(&self.#ident as &dyn databind::Reflect)
                }
            }
        })
        .collect();

    let set_arms: Vec<TokenStream> = model
        .fields
        .iter()
        .map(|field| {
            let ident = &field.ident;
            let name = &field.name;
            let ty = &field.ty;
            if field.nullable {
                quote! {
                    #name => {
                        self.#ident = ::core::option::Option::Some(
                            databind::ops::take_field::<#ty>(value)?,
                        );
                    }
                }
            } else {
                quote! {
                    #name => {
                        self.#ident = databind::ops::take_field::<#ty>(value)?;
                    }
                }
            }
        })
        .collect();

    let field_infos: Vec<TokenStream> = model
        .fields
        .iter()
        .map(|field| {
            let name = &field.name;
            let ty = &field.ty;
            let nullable = field.nullable;
            quote! {
                databind::info::FieldInfo::new::<#ty>(#name, #nullable)
            }
        })
        .collect();

    let blank_fields: Vec<TokenStream> = model
        .fields
        .iter()
        .map(|field| {
            let ident = &field.ident;
            if field.nullable {
                quote! { #ident: ::core::option::Option::None }
            } else {
                quote! { #ident: ::core::default::Default::default() }
            }
        })
        .collect();

    let auto_register = if cfg!(feature = "auto_register") {
        quote! {
            databind::__macro_exports::inventory::submit! {
                databind::registry::TypeRegistration::of::<#ident>()
            }
        }
    } else {
        TokenStream::new()
    };

    quote! {
        impl databind::info::TypePath for #ident {
            fn type_path() -> &'static str {
                ::core::concat!(::core::module_path!(), "::", #name)
            }

            fn type_name() -> &'static str {
                #name
            }
        }

        impl databind::Reflect for #ident {
            #[inline]
            fn reflect_kind(&self) -> databind::reflection::ReflectKind {
                databind::reflection::ReflectKind::Struct
            }

            #[inline]
            fn reflect_ref(&self) -> databind::reflection::ReflectRef<'_> {
                databind::reflection::ReflectRef::Struct(self)
            }

            #[inline]
            fn reflect_mut(&mut self) -> databind::reflection::ReflectMut<'_> {
                databind::reflection::ReflectMut::Struct(self)
            }
        }

        impl databind::ops::Struct for #ident {
            fn field(&self, name: &str) -> ::core::option::Option<&dyn databind::Reflect> {
                match name {
                    #(#names => #accessors,)*
                    _ => ::core::option::Option::None,
                }
            }

            fn field_at(&self, index: usize) -> ::core::option::Option<&dyn databind::Reflect> {
                match index {
                    #(#indices => #accessors,)*
                    _ => ::core::option::Option::None,
                }
            }

            fn name_at(&self, index: usize) -> ::core::option::Option<&'static str> {
                match index {
                    #(#indices => ::core::option::Option::Some(#names),)*
                    _ => ::core::option::Option::None,
                }
            }

            fn field_len(&self) -> usize {
                #field_count
            }

            fn set_field(
                &mut self,
                name: &str,
                value: ::std::boxed::Box<dyn databind::Reflect>,
            ) -> ::core::result::Result<(), databind::BindError> {
                match name {
                    #(#set_arms)*
                    _ => {
                        return ::core::result::Result::Err(
                            databind::BindError::unknown_field(
                                <Self as databind::info::TypePath>::type_path(),
                                ::std::string::ToString::to_string(name),
                            ),
                        );
                    }
                }
                ::core::result::Result::Ok(())
            }
        }

        impl databind::registry::StructMeta for #ident {
            fn struct_info() -> &'static databind::info::StructInfo {
                static INFO: ::std::sync::OnceLock<databind::info::StructInfo> =
                    ::std::sync::OnceLock::new();
                INFO.get_or_init(|| {
                    databind::info::StructInfo::new::<Self>(::std::vec![
                        #(#field_infos),*
                    ])
                })
            }

            fn blank() -> Self {
                Self {
                    #(#blank_fields),*
                }
            }
        }

        #auto_register
    }
}
