//! Demo components: a greeting controller backed by an injected service, and an index page.
//!
//! ```rust
//! use trellis_core::{Dispatcher, RequestView, initialize};
//!
//! let application = initialize(&trellis_demo::catalog(), trellis_demo::ROOT).unwrap();
//! let dispatcher = Dispatcher::new(application);
//!
//! let mut body = String::new();
//! dispatcher.dispatch(&RequestView::from_target("/hello/age"), &mut body);
//! assert_eq!(body, "Age is 42");
//! ```
pub mod controller;
pub mod service;

use trellis_core::Catalog;

/// Root namespace of the demo components.
pub const ROOT: &str = module_path!();

/// Every demo component, ready to be scanned from [`ROOT`].
#[must_use]
pub fn catalog() -> Catalog {
    Catalog::new()
        .register::<controller::HelloController>()
        .register::<controller::IndexController>()
        .register::<service::HelloService>()
}
