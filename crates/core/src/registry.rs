use crate::catalog::{Catalog, Unit};
use crate::component::Component;
use crate::error::InitError;
use fxhash::FxHashMap;
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Singleton store of component instances keyed by component name.
///
/// Built once during initialization and read-only afterwards. Iteration order is
/// unspecified.
#[derive(Debug, Default)]
pub struct Registry {
    components: FxHashMap<String, Arc<dyn Component>>,
}

impl Registry {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Arc<dyn Component>> {
        self.components.get(key)
    }

    /// Looks up `key` and downcasts it to `T`.
    #[must_use]
    pub fn get_as<T: Component>(&self, key: &str) -> Option<Arc<T>> {
        self.components.get(key).and_then(|component| Arc::clone(component).into_any().downcast::<T>().ok())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn Component>)> {
        self.components.iter().map(|(key, component)| (key.as_str(), component))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.components.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

/// Instantiates every component among `names` and stores it under its key.
///
/// Plain units are skipped silently; units that fail to load or construct are logged and
/// skipped. A later component with an already used key replaces the earlier one.
///
/// # Errors
/// With `strict`, a key collision fails with [`InitError::Strict`].
pub fn build(catalog: &Catalog, names: &[String], strict: bool) -> Result<Registry, InitError> {
    let mut registry = Registry::default();

    for name in names {
        let (descriptor, constructor) = match catalog.load(name) {
            Some(Unit::Component { descriptor, constructor }) => (*descriptor, constructor),
            Some(Unit::Plain) => continue,
            None => {
                warn!(unit = %name, "Unit could not be loaded, skipping");
                continue;
            },
        };

        let component = match constructor() {
            Ok(component) => component,
            Err(err) => {
                warn!(unit = %name, error = %err, "Component instantiation failed, skipping");
                continue;
            },
        };

        let key = descriptor.key();
        debug!(key = %key, unit = %name, "Registered component");
        if let Some(previous) = registry.components.insert(key.clone(), component) {
            let previous = previous.component_descriptor().type_name;
            warn!(key = %key, previous, replacement = %name, "Component key collision, replacing");
            if strict {
                return Err(InitError::Strict {
                    message: Cow::Owned(format!("component key `{key}` is declared by {previous} and {name}")),
                    context: Some("registry".into()),
                });
            }
        }
    }

    info!(components = registry.len(), "Registry built");
    Ok(registry)
}
