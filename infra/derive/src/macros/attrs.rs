use syn::{Attribute, Expr, Lit, LitStr, Meta};

/// Reads the single string argument of a marker attribute.
///
/// Accepted forms: `#[marker]`, `#[marker("value")]`, `#[marker = "value"]` and
/// `#[marker(key = "value")]` for any of `keys`. A bare marker yields `None`.
pub fn string_arg(attr: &Attribute, keys: &[&str]) -> syn::Result<Option<LitStr>> {
    match &attr.meta {
        Meta::Path(_) => Ok(None),
        Meta::NameValue(name_value) => match &name_value.value {
            Expr::Lit(expr) => match &expr.lit {
                Lit::Str(lit) => Ok(Some(lit.clone())),
                other => Err(syn::Error::new_spanned(other, "expected a string literal")),
            },
            other => Err(syn::Error::new_spanned(other, "expected a string literal")),
        },
        Meta::List(list) => {
            if let Ok(lit) = syn::parse2::<LitStr>(list.tokens.clone()) {
                return Ok(Some(lit));
            }

            let mut found: Option<LitStr> = None;
            attr.parse_nested_meta(|meta| {
                if !keys.iter().any(|key| meta.path.is_ident(key)) {
                    return Err(meta.error(format!("unsupported argument; expected {}", keys.join(" or "))));
                }
                if found.is_some() {
                    return Err(meta.error("duplicate argument"));
                }
                found = Some(meta.value()?.parse()?);
                Ok(())
            })?;
            Ok(found)
        },
    }
}

/// Finds the first attribute named `name`.
pub fn find<'a>(attrs: &'a [Attribute], name: &str) -> Option<&'a Attribute> {
    attrs.iter().find(|attr| attr.path().is_ident(name))
}
