use syn::{Data, DeriveInput, Error, Fields, GenericArgument, Ident, PathArguments, Type};

// -----------------------------------------------------------------------------
// ReflectStruct

/// The parsed shape of a `#[derive(Reflect)]` input.
pub(crate) struct ReflectStruct {
    pub ident: Ident,
    pub fields: Vec<ReflectField>,
}

/// One named field, with `Option<T>` already unwrapped into its inner type
/// plus the nullability flag.
pub(crate) struct ReflectField {
    pub ident: Ident,
    pub name: String,
    pub ty: Type,
    pub nullable: bool,
}

impl ReflectStruct {
    pub(crate) fn parse(input: &DeriveInput) -> syn::Result<Self> {
        if !input.generics.params.is_empty() || input.generics.where_clause.is_some() {
            return Err(Error::new_spanned(
                &input.generics,
                "#[derive(Reflect)] does not support generic structs; \
                 implement the traits manually",
            ));
        }

        let fields = match &input.data {
            Data::Struct(data) => match &data.fields {
                Fields::Named(fields) => &fields.named,
                _ => {
                    return Err(Error::new_spanned(
                        &input.ident,
                        "#[derive(Reflect)] requires named fields",
                    ));
                }
            },
            Data::Enum(data) => {
                return Err(Error::new_spanned(
                    &data.enum_token,
                    "#[derive(Reflect)] only supports structs",
                ));
            }
            Data::Union(data) => {
                return Err(Error::new_spanned(
                    &data.union_token,
                    "#[derive(Reflect)] only supports structs",
                ));
            }
        };

        let fields = fields
            .iter()
            .map(|field| {
                // Unwrap is fine: Fields::Named guarantees an ident.
                let ident = field.ident.clone().unwrap();
                let (ty, nullable) = match option_inner(&field.ty) {
                    Some(inner) => (inner.clone(), true),
                    None => (field.ty.clone(), false),
                };
                ReflectField {
                    name: ident.to_string(),
                    ident,
                    ty,
                    nullable,
                }
            })
            .collect();

        Ok(Self {
            ident: input.ident.clone(),
            fields,
        })
    }
}

/// Returns the `T` of an `Option<T>` field type, detected syntactically.
///
/// Recognizes `Option`, `std::option::Option`, and `core::option::Option`.
/// An aliased `Option` is not seen through; such a field is treated as
/// non-nullable.
fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    if type_path.qself.is_some() {
        return None;
    }

    let segments = &type_path.path.segments;
    let last = segments.last()?;
    let path_is_option = last.ident == "Option"
        && match segments.len() {
            1 => true,
            3 => {
                (segments[0].ident == "std" || segments[0].ident == "core")
                    && segments[1].ident == "option"
            }
            _ => false,
        };
    if !path_is_option {
        return None;
    }

    let PathArguments::AngleBracketed(args) = &last.arguments else {
        return None;
    };
    match args.args.first() {
        Some(GenericArgument::Type(inner)) if args.args.len() == 1 => Some(inner),
        _ => None,
    }
}
