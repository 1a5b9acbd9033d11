//! # Trellis core
//!
//! A small web-application dispatcher. Startup runs four phases over a [`Catalog`]:
//!
//! 1. [`scanner::scan`] enumerates the units under a root namespace, breadth-first.
//! 2. [`registry::build`] instantiates one singleton per component and keys it by name.
//! 3. [`wiring::wire`] fills the `#[autowired]` slots from the registry.
//! 4. [`route::build`] compiles a full-match pattern per routed method.
//!
//! The resulting [`Application`] feeds a [`Dispatcher`], which answers requests without
//! ever failing: unmatched paths yield `404 Not Found`, failures `500 Server Internal Error`.
//!
//! ```rust,ignore
//! use trellis_core::prelude::*;
//!
//! let application = trellis_core::initialize(&catalog, "trellis_demo")?;
//! let dispatcher = Dispatcher::new(application);
//!
//! let mut body = String::new();
//! dispatcher.dispatch(&RequestView::from_target("/hello/world?name=Sam"), &mut body);
//! assert_eq!(body, "Hello,Sam");
//! ```

extern crate self as trellis_core;

pub mod autowired;
pub mod catalog;
pub mod component;
pub mod dispatch;
pub mod error;
pub mod naming;
pub mod registry;
pub mod route;
pub mod scanner;
pub mod wiring;

pub use autowired::{Autowired, InjectError, InjectErrorExt};
pub use catalog::{Catalog, Unit};
pub use component::{
    Component, ComponentDescriptor, Handler, InjectionPoint, Marker, MethodDescriptor, ParamDescriptor, ParamKind,
};
pub use dispatch::{
    Arguments, DispatchError, Dispatcher, FromParam, IntoOutcome, NOT_FOUND_BODY, Outcome, RequestView, ResponseWriter,
    SERVER_ERROR_BODY,
};
pub use error::{InitError, InitErrorExt};
pub use registry::Registry;
pub use route::{BindingKey, ParameterBinding, Route, RouteTable};

/// Boxed error accepted from handlers and fallible constructors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub mod prelude {
    pub use crate::{
        Application, Autowired, Catalog, Dispatcher, Outcome, RequestView, ResponseWriter, initialize,
    };
    pub use trellis_derive::{Controller, Service, routes};
}

/// Initialized registry and route table.
#[derive(Debug)]
pub struct Application {
    registry: Registry,
    routes: RouteTable,
}

impl Application {
    #[must_use]
    pub fn builder() -> ApplicationBuilder {
        ApplicationBuilder::default()
    }

    #[must_use]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    #[must_use]
    pub const fn routes(&self) -> &RouteTable {
        &self.routes
    }

    #[must_use]
    pub fn into_parts(self) -> (RouteTable, Registry) {
        (self.routes, self.registry)
    }
}

/// Initialization options.
///
/// Strict mode turns registry key collisions and unresolved injection points into
/// [`InitError::Strict`]; by default both are logged and tolerated.
#[derive(Debug, Default, Clone, Copy)]
pub struct ApplicationBuilder {
    strict: bool,
}

impl ApplicationBuilder {
    #[must_use]
    pub const fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Runs scanning, registry construction, wiring and route table construction.
    ///
    /// # Errors
    /// [`InitError::ResourceNotFound`] for an unknown root, [`InitError::Pattern`] for a
    /// route that does not compile, [`InitError::Strict`] in strict mode.
    pub fn initialize(self, catalog: &Catalog, root: &str) -> Result<Application, InitError> {
        tracing::info!(root, strict = self.strict, "Initializing application");

        let names = scanner::scan(catalog, root)?;
        let registry = registry::build(catalog, &names, self.strict)?;
        wiring::wire(&registry, self.strict)?;
        let routes = route::build(&registry)?;

        Ok(Application { registry, routes })
    }
}

/// Initializes with default (lenient) options.
///
/// # Errors
/// See [`ApplicationBuilder::initialize`].
pub fn initialize(catalog: &Catalog, root: &str) -> Result<Application, InitError> {
    Application::builder().initialize(catalog, root)
}
