use crate::macros::attrs;
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, GenericArgument, Ident, LitStr, PathArguments, Type};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Controller,
    Service,
}

struct Injection<'a> {
    field: &'a Ident,
    name: Option<LitStr>,
    type_name: String,
}

/// Expands `#[derive(Controller)]` and `#[derive(Service)]`.
pub fn expand_derive(input: DeriveInput, marker: Marker) -> TokenStream {
    match expand(&input, marker) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error(),
    }
}

fn expand(input: &DeriveInput, marker: Marker) -> syn::Result<TokenStream> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(&input.generics, "components cannot be generic"));
    }
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(&input.ident, "components must be structs"));
    };

    let ident = &input.ident;
    let simple_name = ident.to_string();
    let injections = collect_injections(&data.fields)?;

    let marker_tokens = match marker {
        Marker::Controller => quote! { ::trellis_core::Marker::Controller },
        Marker::Service => {
            let name = match attrs::find(&input.attrs, "service") {
                Some(attr) => attrs::string_arg(attr, &["name", "value"])?,
                None => None,
            };
            let name = name.map_or_else(String::new, |lit| lit.value());
            quote! { ::trellis_core::Marker::Service { name: #name } }
        },
    };

    let base_path = match attrs::find(&input.attrs, "request_mapping") {
        Some(attr) => match attrs::string_arg(attr, &["path", "value"])? {
            Some(path) => quote! { Some(#path) },
            None => quote! { Some("") },
        },
        None => quote! { None },
    };

    let points = injections.iter().map(|injection| {
        let field = injection.field.to_string();
        let name = injection.name.as_ref().map_or_else(String::new, LitStr::value);
        let type_name = &injection.type_name;
        quote! {
            ::trellis_core::InjectionPoint { field: #field, name: #name, type_name: #type_name }
        }
    });

    let inject_arms = injections.iter().map(|injection| {
        let field = injection.field;
        let label = field.to_string();
        quote! { #label => self.#field.assign(target), }
    });

    let into_handler = match marker {
        Marker::Controller => quote! { Some(self) },
        Marker::Service => quote! { None },
    };

    Ok(quote! {
        #[automatically_derived]
        impl ::trellis_core::Component for #ident {
            fn descriptor() -> &'static ::trellis_core::ComponentDescriptor
            where
                Self: Sized,
            {
                static DESCRIPTOR: ::trellis_core::ComponentDescriptor = ::trellis_core::ComponentDescriptor {
                    type_name: concat!(module_path!(), "::", #simple_name),
                    simple_name: #simple_name,
                    marker: #marker_tokens,
                    base_path: #base_path,
                    injections: &[#(#points),*],
                };
                &DESCRIPTOR
            }

            fn component_descriptor(&self) -> &'static ::trellis_core::ComponentDescriptor {
                <Self as ::trellis_core::Component>::descriptor()
            }

            #[allow(unused_variables)]
            fn inject(
                &self,
                field: &str,
                target: ::std::sync::Arc<dyn ::std::any::Any + Send + Sync>,
            ) -> ::std::result::Result<(), ::trellis_core::InjectError> {
                match field {
                    #(#inject_arms)*
                    other => Err(::trellis_core::InjectError::UnknownField {
                        message: other.to_owned().into(),
                        context: Some(#simple_name.into()),
                    }),
                }
            }

            fn into_any(self: ::std::sync::Arc<Self>) -> ::std::sync::Arc<dyn ::std::any::Any + Send + Sync> {
                self
            }

            fn into_handler(
                self: ::std::sync::Arc<Self>,
            ) -> Option<::std::sync::Arc<dyn ::trellis_core::Handler>> {
                #into_handler
            }
        }
    })
}

fn collect_injections(fields: &Fields) -> syn::Result<Vec<Injection<'_>>> {
    let mut injections = Vec::new();
    for field in fields {
        let Some(attr) = attrs::find(&field.attrs, "autowired") else {
            continue;
        };
        let Some(ident) = &field.ident else {
            return Err(syn::Error::new_spanned(field, "#[autowired] requires a named field"));
        };
        let Some(type_name) = autowired_target(&field.ty) else {
            return Err(syn::Error::new_spanned(&field.ty, "#[autowired] fields must be of type Autowired<T>"));
        };
        let name = attrs::string_arg(attr, &["name", "value"])?;
        injections.push(Injection { field: ident, name, type_name });
    }
    Ok(injections)
}

/// Simple name of `T` in `Autowired<T>`.
fn autowired_target(ty: &Type) -> Option<String> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != "Autowired" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    let Some(GenericArgument::Type(Type::Path(inner))) = args.args.first() else {
        return None;
    };
    inner.path.segments.last().map(|segment| segment.ident.to_string())
}
