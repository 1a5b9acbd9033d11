use crate::BoxError;
use crate::component::{Component, ComponentDescriptor};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

type Constructor = Box<dyn Fn() -> Result<Arc<dyn Component>, BoxError> + Send + Sync>;

/// A loadable unit of the catalog.
pub enum Unit {
    /// Present in the namespace tree but carrying no component marker.
    Plain,
    Component { descriptor: &'static ComponentDescriptor, constructor: Constructor },
}

impl Unit {
    #[must_use]
    pub const fn descriptor(&self) -> Option<&'static ComponentDescriptor> {
        match self {
            Self::Plain => None,
            Self::Component { descriptor, .. } => Some(*descriptor),
        }
    }
}

impl fmt::Debug for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain => f.write_str("Plain"),
            Self::Component { descriptor, .. } => {
                f.debug_struct("Component").field("type_name", &descriptor.type_name).finish_non_exhaustive()
            },
        }
    }
}

/// Registration-based namespace tree of loadable units, keyed by fully-qualified name.
///
/// # Example
/// ```rust,ignore
/// let catalog = Catalog::new()
///     .register::<HelloController>()
///     .register::<HelloService>()
///     .register_unit("trellis_demo::util::StringUtil");
/// ```
#[derive(Debug, Default)]
pub struct Catalog {
    units: BTreeMap<String, Unit>,
}

impl Catalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a component built with `Default::default()`.
    #[must_use]
    pub fn register<T>(self) -> Self
    where
        T: Component + Default,
    {
        self.register_with(|| Ok::<T, BoxError>(T::default()))
    }

    /// Registers a component built by a fallible constructor.
    ///
    /// A failing constructor skips the component at registry build time.
    #[must_use]
    pub fn register_with<T, F, E>(mut self, constructor: F) -> Self
    where
        T: Component,
        F: Fn() -> Result<T, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        let descriptor = T::descriptor();
        let constructor: Constructor =
            Box::new(move || constructor().map(|component| Arc::new(component) as Arc<dyn Component>).map_err(Into::into));
        self.units.insert(descriptor.type_name.to_owned(), Unit::Component { descriptor, constructor });
        self
    }

    /// Registers a plain unit with no component marker.
    #[must_use]
    pub fn register_unit(mut self, name: impl Into<String>) -> Self {
        self.units.insert(name.into(), Unit::Plain);
        self
    }

    #[must_use]
    pub fn load(&self, name: &str) -> Option<&Unit> {
        self.units.get(name)
    }

    /// All unit names, in lexical order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.units.keys().map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.units.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}
