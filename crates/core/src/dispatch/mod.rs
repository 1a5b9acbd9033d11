//! Per-request pipeline: normalize, match, bind, invoke, respond.

mod args;
mod error;
mod request;

pub use args::{Arguments, FromParam, IntoOutcome};
pub use error::{DispatchError, DispatchErrorExt};
pub use request::{RequestView, ResponseWriter};

use crate::Application;
use crate::naming::collapse_separators;
use crate::registry::Registry;
use crate::route::{Route, RouteTable};
use std::any::Any;
use std::borrow::Cow;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error};

pub const NOT_FOUND_BODY: &str = "404 Not Found";
pub const SERVER_ERROR_BODY: &str = "500 Server Internal Error";

/// Terminal state of one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Handled,
    NotFound,
    Failed,
}

impl Outcome {
    /// The matching HTTP status code.
    #[must_use]
    pub const fn status_code(self) -> u16 {
        match self {
            Self::Handled => 200,
            Self::NotFound => 404,
            Self::Failed => 500,
        }
    }
}

/// Strips a leading `context_path` from `path` and collapses repeated separators.
#[must_use]
pub fn normalize<'a>(path: &'a str, context_path: &str) -> Cow<'a, str> {
    let stripped = if context_path.is_empty() { path } else { path.strip_prefix(context_path).unwrap_or(path) };
    collapse_separators(stripped)
}

/// Routes requests to handler methods.
///
/// Holds the route table together with the registry, which owns the services that
/// handlers reach through their injected slots.
#[derive(Debug)]
pub struct Dispatcher {
    routes: RouteTable,
    registry: Registry,
}

impl Dispatcher {
    #[must_use]
    pub fn new(application: Application) -> Self {
        let (routes, registry) = application.into_parts();
        Self { routes, registry }
    }

    #[must_use]
    pub const fn from_parts(routes: RouteTable, registry: Registry) -> Self {
        Self { routes, registry }
    }

    #[must_use]
    pub const fn routes(&self) -> &RouteTable {
        &self.routes
    }

    #[must_use]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Handles one request, writing the handler output or an error body to `response`.
    ///
    /// Never fails: handler errors and panics are logged and become
    /// [`SERVER_ERROR_BODY`]. Output written before a failure stays in `response`.
    pub fn dispatch(&self, request: &RequestView, response: &mut dyn ResponseWriter) -> Outcome {
        let path = normalize(request.path(), request.context_path());

        let Some(route) = self.routes.find(&path) else {
            debug!(path = %path, "No route matched");
            response.write(NOT_FOUND_BODY);
            return Outcome::NotFound;
        };

        debug!(path = %path, route = route.source(), method = route.method().name, "Dispatching");
        match invoke(route, request, &mut *response) {
            Ok(()) => Outcome::Handled,
            Err(err) => {
                error!(path = %path, route = route.source(), error = %err, "Dispatch failed");
                response.write(SERVER_ERROR_BODY);
                Outcome::Failed
            },
        }
    }
}

fn invoke(route: &Route, request: &RequestView, response: &mut dyn ResponseWriter) -> Result<(), DispatchError> {
    let method = route.method();
    let context = || Cow::Owned(format!("{}::{}", route.component(), method.name));

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        let mut args = bind(route, request, response);
        route.handler().invoke(method.name, &mut args)
    }));

    match result {
        Ok(outcome) => outcome.context(context()),
        Err(payload) => Err(DispatchError::Panic { message: panic_message(payload.as_ref()), context: Some(context()) }),
    }
}

fn bind<'a>(route: &Route, request: &'a RequestView, response: &'a mut dyn ResponseWriter) -> Arguments<'a> {
    let binding = route.binding();
    let mut args = Arguments::new(binding.arity());

    for (key, values) in request.params() {
        if let Some(index) = binding.param(key) {
            args.set_value(index, join_values(values));
        }
    }
    if let Some(index) = binding.request() {
        args.set_request(index, request);
    }
    if let Some(index) = binding.response() {
        args.set_response(index, response);
    }
    args
}

/// Renders repeated query values as one argument: `", "`-joined, with every `[` and `]` removed.
fn join_values(values: &[String]) -> String {
    values.join(", ").replace(['[', ']'], "")
}

fn panic_message(payload: &(dyn Any + Send)) -> Cow<'static, str> {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        Cow::Borrowed(*message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        Cow::Owned(message.clone())
    } else {
        Cow::Borrowed("non-string panic payload")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_context_prefix() {
        assert_eq!(normalize("/app//hello/world", "/app"), "/hello/world");
        assert_eq!(normalize("/hello//world", ""), "/hello/world");
        assert_eq!(normalize("/other/app/x", "/app"), "/other/app/x");
    }

    #[test]
    fn outcome_status_codes() {
        assert_eq!(Outcome::Handled.status_code(), 200);
        assert_eq!(Outcome::NotFound.status_code(), 404);
        assert_eq!(Outcome::Failed.status_code(), 500);
    }

    #[test]
    fn empty_dispatcher_answers_not_found() {
        let dispatcher = Dispatcher::from_parts(RouteTable::default(), Registry::default());
        let mut body = String::new();
        let outcome = dispatcher.dispatch(&RequestView::from_target("/anything"), &mut body);
        assert_eq!(outcome, Outcome::NotFound);
        assert_eq!(body, NOT_FOUND_BODY);
    }

    #[test]
    fn joined_values_drop_brackets() {
        assert_eq!(join_values(&["a".to_owned(), "b".to_owned()]), "a, b");
        assert_eq!(join_values(&["a[1]".to_owned(), "[b]".to_owned()]), "a1, b");
        assert_eq!(join_values(&["solo".to_owned()]), "solo");
    }

    #[test]
    fn panic_payloads_are_rendered() {
        let message = panic::catch_unwind(|| panic!("static")).unwrap_err();
        assert_eq!(panic_message(message.as_ref()), "static");
        let message = panic::catch_unwind(|| panic!("{}", String::from("owned"))).unwrap_err();
        assert_eq!(panic_message(message.as_ref()), "owned");
    }
}
