use crate::macros::attrs;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{FnArg, ImplItem, ImplItemFn, ItemImpl, Type, TypeParamBound, Visibility};

const REQUEST_TYPE: &str = "RequestView";
const RESPONSE_TRAIT: &str = "ResponseWriter";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Request,
    Response,
    Value,
}

struct Param {
    kind: Kind,
    name: Option<String>,
    ty: Type,
}

struct RouteMethod {
    ident: syn::Ident,
    path: String,
    params: Vec<Param>,
}

/// Expands `#[routes]` on an inherent impl block.
pub fn expand_routes(input: ItemImpl) -> TokenStream {
    match expand(input) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error(),
    }
}

fn expand(mut input: ItemImpl) -> syn::Result<TokenStream> {
    if input.trait_.is_some() {
        return Err(syn::Error::new_spanned(&input.self_ty, "#[routes] must be placed on an inherent impl block"));
    }
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(&input.generics, "#[routes] does not support generic impl blocks"));
    }

    let mut methods = Vec::new();
    for item in &mut input.items {
        let ImplItem::Fn(method) = item else {
            continue;
        };
        if let Some(route) = take_route(method)? {
            methods.push(route);
        }
    }

    let self_ty = &input.self_ty;
    let type_label = quote!(#self_ty).to_string();

    let descriptors = methods.iter().map(|method| {
        let name = method.ident.to_string();
        let path = &method.path;
        let params = method.params.iter().map(|param| {
            let kind = match param.kind {
                Kind::Request => quote! { ::trellis_core::ParamKind::Request },
                Kind::Response => quote! { ::trellis_core::ParamKind::Response },
                Kind::Value => quote! { ::trellis_core::ParamKind::Value },
            };
            let name = param.name.as_ref().map_or_else(|| quote! { None }, |name| quote! { Some(#name) });
            quote! { ::trellis_core::ParamDescriptor { name: #name, kind: #kind } }
        });
        quote! {
            ::trellis_core::MethodDescriptor { name: #name, path: #path, params: &[#(#params),*] }
        }
    });

    let arms = methods.iter().map(|method| {
        let ident = &method.ident;
        let name = ident.to_string();
        let bindings = method.params.iter().enumerate().map(|(index, param)| {
            let var = format_ident!("__arg{index}");
            let ty = &param.ty;
            let fetch = match param.kind {
                Kind::Request => quote! { args.request(#index)? },
                Kind::Response => quote! { args.response(#index)? },
                Kind::Value => quote! { args.value(#index)? },
            };
            quote! { let #var: #ty = #fetch; }
        });
        let vars = (0..method.params.len()).map(|index| format_ident!("__arg{index}"));
        quote! {
            #name => {
                #(#bindings)*
                ::trellis_core::IntoOutcome::into_outcome(self.#ident(#(#vars),*))
            }
        }
    });

    Ok(quote! {
        #input

        #[automatically_derived]
        impl ::trellis_core::Handler for #self_ty {
            fn methods(&self) -> &'static [::trellis_core::MethodDescriptor] {
                const METHODS: &[::trellis_core::MethodDescriptor] = &[#(#descriptors),*];
                METHODS
            }

            #[allow(unused_variables)]
            fn invoke(
                &self,
                method: &str,
                args: &mut ::trellis_core::Arguments<'_>,
            ) -> ::std::result::Result<(), ::trellis_core::DispatchError> {
                match method {
                    #(#arms)*
                    other => Err(::trellis_core::DispatchError::UnknownMethod {
                        message: other.to_owned().into(),
                        context: Some(#type_label.into()),
                    }),
                }
            }
        }
    })
}

/// Strips marker attributes from `method` and returns its route, if it is one.
fn take_route(method: &mut ImplItemFn) -> syn::Result<Option<RouteMethod>> {
    let mapping = method
        .attrs
        .iter()
        .position(|attr| attr.path().is_ident("request_mapping"))
        .map(|index| method.attrs.remove(index));

    let mut params = Vec::new();
    let mut receiver = None;
    for input in &mut method.sig.inputs {
        match input {
            FnArg::Receiver(r) => receiver = Some(r.reference.is_some() && r.mutability.is_none()),
            FnArg::Typed(typed) => {
                let marker = typed
                    .attrs
                    .iter()
                    .position(|attr| attr.path().is_ident("request_param"))
                    .map(|index| typed.attrs.remove(index));
                let name = match &marker {
                    Some(attr) => attrs::string_arg(attr, &["name", "value"])?.map(|lit| lit.value()),
                    None => None,
                };
                params.push(Param { kind: classify(&typed.ty), name, ty: (*typed.ty).clone() });
            },
        }
    }

    let Some(mapping) = mapping else {
        return Ok(None);
    };
    if !matches!(method.vis, Visibility::Public(_)) {
        return Ok(None);
    }
    if receiver != Some(true) {
        return Err(syn::Error::new_spanned(&method.sig.ident, "route methods must take `&self`"));
    }

    let path = attrs::string_arg(&mapping, &["path", "value"])?.map_or_else(String::new, |lit| lit.value());
    Ok(Some(RouteMethod { ident: method.sig.ident.clone(), path, params }))
}

fn classify(ty: &Type) -> Kind {
    match ty {
        Type::Group(group) => classify(&group.elem),
        Type::Paren(paren) => classify(&paren.elem),
        Type::Reference(reference) => match (&*reference.elem, reference.mutability.is_some()) {
            (Type::Path(path), false) if last_ident_is(&path.path, REQUEST_TYPE) => Kind::Request,
            (Type::TraitObject(object), true) if object.bounds.iter().any(is_response_bound) => Kind::Response,
            _ => Kind::Value,
        },
        _ => Kind::Value,
    }
}

fn is_response_bound(bound: &TypeParamBound) -> bool {
    matches!(bound, TypeParamBound::Trait(tr) if last_ident_is(&tr.path, RESPONSE_TRAIT))
}

fn last_ident_is(path: &syn::Path, name: &str) -> bool {
    path.segments.last().is_some_and(|segment| segment.ident == name)
}
