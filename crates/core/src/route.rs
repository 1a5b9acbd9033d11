use crate::component::{Handler, MethodDescriptor, ParamKind};
use crate::error::{InitError, InitErrorExt};
use crate::naming::collapse_separators;
use crate::registry::Registry;
use fxhash::FxHashMap;
use regex::Regex;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Key of a parameter binding entry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BindingKey {
    Param(String),
    Request,
    Response,
}

/// Maps named request parameters and the two sentinels to positional argument indexes.
///
/// Positions without an entry are binding gaps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterBinding {
    params: FxHashMap<String, usize>,
    request: Option<usize>,
    response: Option<usize>,
    arity: usize,
}

impl ParameterBinding {
    /// Derives the binding from a method's parameter list.
    ///
    /// Named parameters are recorded first, then sentinel-typed parameters; a later entry
    /// for the same key replaces an earlier one.
    #[must_use]
    pub fn from_method(method: &MethodDescriptor) -> Self {
        let mut binding = Self { arity: method.params.len(), ..Self::default() };
        for (index, param) in method.params.iter().enumerate() {
            if let Some(name) = param.name.filter(|name| !name.is_empty()) {
                binding.params.insert(name.to_owned(), index);
            }
        }
        for (index, param) in method.params.iter().enumerate() {
            match param.kind {
                ParamKind::Request => binding.request = Some(index),
                ParamKind::Response => binding.response = Some(index),
                ParamKind::Value => {},
            }
        }
        binding
    }

    #[must_use]
    pub fn get(&self, key: &BindingKey) -> Option<usize> {
        match key {
            BindingKey::Param(name) => self.param(name),
            BindingKey::Request => self.request,
            BindingKey::Response => self.response,
        }
    }

    #[must_use]
    pub fn param(&self, name: &str) -> Option<usize> {
        self.params.get(name).copied()
    }

    #[must_use]
    pub const fn request(&self) -> Option<usize> {
        self.request
    }

    #[must_use]
    pub const fn response(&self) -> Option<usize> {
        self.response
    }

    /// Number of positional arguments of the bound method.
    #[must_use]
    pub const fn arity(&self) -> usize {
        self.arity
    }

    /// Every entry, sorted by key for stable comparison.
    #[must_use]
    pub fn entries(&self) -> Vec<(BindingKey, usize)> {
        let mut entries: Vec<_> =
            self.params.iter().map(|(name, index)| (BindingKey::Param(name.clone()), *index)).collect();
        entries.extend(self.request.map(|index| (BindingKey::Request, index)));
        entries.extend(self.response.map(|index| (BindingKey::Response, index)));
        entries.sort_unstable();
        entries
    }

    /// Positions no key maps to.
    #[must_use]
    pub fn gaps(&self) -> Vec<usize> {
        (0..self.arity)
            .filter(|index| {
                !self.params.values().any(|bound| bound == index)
                    && self.request != Some(*index)
                    && self.response != Some(*index)
            })
            .collect()
    }
}

/// A compiled path pattern bound to one handler method.
pub struct Route {
    source: String,
    pattern: Regex,
    component: String,
    handler: Arc<dyn Handler>,
    method: &'static MethodDescriptor,
    binding: ParameterBinding,
}

impl Route {
    /// Pattern source after separator collapsing, before anchoring.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Full match of `path` against the route pattern.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        self.pattern.is_match(path)
    }

    /// Registry key of the owning component.
    #[must_use]
    pub fn component(&self) -> &str {
        &self.component
    }

    #[must_use]
    pub fn handler(&self) -> &Arc<dyn Handler> {
        &self.handler
    }

    #[must_use]
    pub const fn method(&self) -> &'static MethodDescriptor {
        self.method
    }

    #[must_use]
    pub const fn binding(&self) -> &ParameterBinding {
        &self.binding
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("source", &self.source)
            .field("component", &self.component)
            .field("method", &self.method.name)
            .field("binding", &self.binding)
            .finish_non_exhaustive()
    }
}

/// Routes in discovery order.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// The last route whose pattern fully matches `path`.
    #[must_use]
    pub fn find(&self, path: &str) -> Option<&Route> {
        self.routes.iter().rev().find(|route| route.matches(path))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Route> {
        self.routes.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl<'a> IntoIterator for &'a RouteTable {
    type Item = &'a Route;
    type IntoIter = std::slice::Iter<'a, Route>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Compiles `source` as a full-match pattern.
///
/// # Errors
/// Returns the regex error when `source` is not a valid pattern.
pub fn compile(source: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{source})$"))
}

/// Builds the route table from every controller in `registry`.
///
/// # Errors
/// [`InitError::Pattern`] when a route pattern does not compile.
pub fn build(registry: &Registry) -> Result<RouteTable, InitError> {
    let mut routes = Vec::new();

    for (key, component) in registry.iter() {
        let descriptor = component.component_descriptor();
        if !descriptor.is_controller() {
            continue;
        }
        let Some(handler) = Arc::clone(component).into_handler() else {
            warn!(key, "Controller exposes no handler, skipping");
            continue;
        };

        let base = descriptor.base_path.unwrap_or_default();
        for method in handler.methods() {
            let source = collapse_separators(&format!("{base}{}", method.path)).into_owned();
            let pattern = compile(&source).context(format!("{}::{}", descriptor.type_name, method.name))?;
            let binding = ParameterBinding::from_method(method);
            debug!(key, method = method.name, pattern = %source, "Mapped route");
            routes.push(Route {
                source,
                pattern,
                component: key.to_owned(),
                handler: Arc::clone(&handler),
                method,
                binding,
            });
        }
    }

    info!(routes = routes.len(), "Route table built");
    Ok(RouteTable { routes })
}
