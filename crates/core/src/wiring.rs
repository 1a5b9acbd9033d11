use crate::error::InitError;
use crate::naming::component_key;
use crate::registry::Registry;
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Fills the `#[autowired]` slots of every registered component.
///
/// The lookup key of a slot is its explicit name (trimmed) or the lower-case-first simple
/// name of the slot type. A missing target leaves the slot empty; a rejected assignment is
/// logged and the slot is skipped. Returns the number of slots filled.
///
/// # Errors
/// With `strict`, a missing target fails with [`InitError::Strict`].
pub fn wire(registry: &Registry, strict: bool) -> Result<usize, InitError> {
    let mut wired = 0;

    for (owner, component) in registry.iter() {
        for point in component.component_descriptor().injections {
            let key = component_key(point.name, point.type_name);
            let Some(target) = registry.get(&key) else {
                debug!(owner, field = point.field, key = %key, "No component for injection point");
                if strict {
                    return Err(InitError::Strict {
                        message: Cow::Owned(format!("`{owner}.{}` needs missing component `{key}`", point.field)),
                        context: Some("wiring".into()),
                    });
                }
                continue;
            };

            match component.inject(point.field, Arc::clone(target).into_any()) {
                Ok(()) => {
                    wired += 1;
                    debug!(owner, field = point.field, key = %key, "Injected dependency");
                },
                Err(err) => warn!(owner, field = point.field, error = %err, "Injection failed, skipping field"),
            }
        }
    }

    info!(wired, "Dependencies wired");
    Ok(wired)
}
