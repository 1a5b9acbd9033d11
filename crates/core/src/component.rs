//! Component metadata and the object-safe traits the derive macros implement.

use crate::autowired::InjectError;
use crate::dispatch::{Arguments, DispatchError};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Markers declared on a component type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// Request-handling component, always keyed by its derived name.
    Controller,
    /// Service component with an optional explicit registry name (empty when absent).
    Service { name: &'static str },
}

/// A field slot that receives another registered component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InjectionPoint {
    pub field: &'static str,
    /// Explicit lookup name; empty when the key derives from `type_name`.
    pub name: &'static str,
    /// Simple name of the injected type.
    pub type_name: &'static str,
}

/// Static description of a component type, generated by `#[derive(Controller)]` or
/// `#[derive(Service)]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentDescriptor {
    /// Fully-qualified name, `module::path::TypeName`.
    pub type_name: &'static str,
    pub simple_name: &'static str,
    pub marker: Marker,
    /// Class-level `#[request_mapping]`, if any.
    pub base_path: Option<&'static str>,
    pub injections: &'static [InjectionPoint],
}

impl ComponentDescriptor {
    /// Registry key for this component.
    #[must_use]
    pub fn key(&self) -> String {
        match self.marker {
            Marker::Controller => crate::naming::lower_case_first(self.simple_name).into_owned(),
            Marker::Service { name } => crate::naming::component_key(name, self.simple_name),
        }
    }

    #[must_use]
    pub const fn is_controller(&self) -> bool {
        matches!(self.marker, Marker::Controller)
    }
}

/// How a handler parameter is fed at dispatch time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// `&RequestView`
    Request,
    /// `&mut dyn ResponseWriter`
    Response,
    /// Any `FromParam` type, bound from a named query parameter.
    Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamDescriptor {
    /// Name from `#[request_param]`, if present.
    pub name: Option<&'static str>,
    pub kind: ParamKind,
}

/// A public `#[request_mapping]` method of a `#[routes]` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub name: &'static str,
    pub path: &'static str,
    pub params: &'static [ParamDescriptor],
}

/// A registrable singleton.
///
/// Implemented by `#[derive(Controller)]` and `#[derive(Service)]`; writing it by hand is
/// possible but rarely useful.
pub trait Component: Any + Send + Sync {
    fn descriptor() -> &'static ComponentDescriptor
    where
        Self: Sized;

    fn component_descriptor(&self) -> &'static ComponentDescriptor;

    /// Assigns `target` to the injection slot named `field`.
    ///
    /// # Errors
    /// Returns [`InjectError`] when the field is unknown, already assigned, or holds a
    /// different type.
    fn inject(&self, field: &str, target: Arc<dyn Any + Send + Sync>) -> Result<(), InjectError>;

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;

    /// The handler view of a controller; `None` for services.
    fn into_handler(self: Arc<Self>) -> Option<Arc<dyn Handler>>;
}

impl fmt::Debug for dyn Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component").field("type_name", &self.component_descriptor().type_name).finish()
    }
}

/// Route methods of a controller, generated by `#[routes]`.
pub trait Handler: Send + Sync {
    fn methods(&self) -> &'static [MethodDescriptor];

    /// Calls `method` with positional `args`.
    ///
    /// # Errors
    /// Returns [`DispatchError`] on a bind failure, a failing handler, or an unknown method.
    fn invoke(&self, method: &str, args: &mut Arguments<'_>) -> Result<(), DispatchError>;
}

impl fmt::Debug for dyn Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler").field("methods", &self.methods().len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn descriptor(marker: Marker) -> ComponentDescriptor {
        ComponentDescriptor {
            type_name: "app::GreetingService",
            simple_name: "GreetingService",
            marker,
            base_path: None,
            injections: &[],
        }
    }

    #[test]
    fn controller_key_is_lower_case_first() {
        let descriptor = descriptor(Marker::Controller);
        assert_eq!(descriptor.key(), "greetingService");
        assert!(descriptor.is_controller());
    }

    #[test]
    fn service_key_uses_explicit_name() {
        assert_eq!(descriptor(Marker::Service { name: " greeter " }).key(), "greeter");
        assert_eq!(descriptor(Marker::Service { name: "" }).key(), "greetingService");
        assert!(!descriptor(Marker::Service { name: "" }).is_controller());
    }
}
