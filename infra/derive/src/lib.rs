#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros for the dispatcher.
//! Component authors never implement `trellis_core::Component` or `trellis_core::Handler`
//! by hand: the derives below generate the metadata (type name, markers, injection points,
//! route methods) and the glue that replaces reflective field assignment and method calls.
//!
//! ## Usage
//! ```rust,ignore
//! use trellis_core::prelude::*;
//!
//! #[derive(Debug, Default, Controller)]
//! #[request_mapping("/hello")]
//! pub struct HelloController {
//!     #[autowired]
//!     hello_service: Autowired<HelloService>,
//! }
//!
//! #[routes]
//! impl HelloController {
//!     #[request_mapping("/world")]
//!     pub fn hello_world(
//!         &self,
//!         response: &mut dyn ResponseWriter,
//!         #[request_param("name")] name: Option<String>,
//!     ) {
//!         response.write(&format!("Hello,{}", name.unwrap_or_default()));
//!     }
//! }
//! ```
//!
//! The generated code refers to `::trellis_core`, so consuming crates must depend on it
//! under that name.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemImpl, parse_macro_input};

/// Marks a struct as a request-handling component.
///
/// The type is registered under its simple name with the first letter lower-cased
/// (`HelloController` → `helloController`) and must also carry a `#[routes]` impl block.
///
/// # Helper attributes
///
/// * `#[request_mapping("/base")]` on the struct - base path prepended to every route.
/// * `#[autowired]` / `#[autowired("name")]` on `Autowired<T>` fields - dependency slots.
///
/// # Errors
/// Emits a compile-time error for generic structs, non-struct items, or `#[autowired]`
/// fields whose type is not `Autowired<T>`.
#[proc_macro_derive(Controller, attributes(request_mapping, autowired))]
pub fn derive_controller(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::component::expand_derive(input, macros::component::Marker::Controller).into()
}

/// Marks a struct as a service component.
///
/// The registry key is the explicit name from `#[service("name")]` (trimmed) when it is
/// non-empty, and the lower-case-first simple name otherwise.
///
/// # Example
/// ```rust,ignore
/// #[derive(Debug, Default, Service)]
/// #[service("greeter")]
/// pub struct GreetingService;
/// ```
#[proc_macro_derive(Service, attributes(service, autowired))]
pub fn derive_service(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::component::expand_derive(input, macros::component::Marker::Service).into()
}

/// Turns the public `#[request_mapping]` methods of an impl block into routes.
///
/// Parameters are classified by type: `&RequestView` binds the live request,
/// `&mut dyn ResponseWriter` binds the response, anything else is converted from the
/// query parameter named by `#[request_param("name")]` through `trellis_core::FromParam`.
///
/// Only `pub` methods taking `&self` become routes; marker attributes on other methods are
/// stripped and ignored. A type may carry at most one `#[routes]` block.
///
/// # Example
/// ```rust,ignore
/// #[routes]
/// impl IndexController {
///     #[request_mapping("/")]
///     pub fn index(&self, response: &mut dyn ResponseWriter) {
///         response.write("hello world");
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn routes(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemImpl);
    macros::routes::expand_routes(input).into()
}

/// A high-level attribute macro for defining domain-specific error enums.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]` when missing.
/// * **Context Support**: Generates a companion `...Ext` trait that adds `.context()`
///   to any `Result` that can be converted into this error type.
/// * **Standard Conversions**: Implements `From<T>` for variants containing a `source` field.
/// * **Internal Fallback**: `From<&'static str>` and `From<String>` when an `Internal`
///   variant is present.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum** with named-field variants.
/// 2. Variants with a `source` field must also carry `context: Option<Cow<'static, str>>`.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[trellis_derive::trellis_error]
/// pub enum ScanError {
///     #[error("Not found{}: {message}", format_context(.context))]
///     NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
/// ```
#[proc_macro_attribute]
pub fn trellis_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}
