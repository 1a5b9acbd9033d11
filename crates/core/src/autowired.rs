use std::any::{Any, type_name};
use std::borrow::Cow;
use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

#[trellis_derive::trellis_error]
pub enum InjectError {
    #[error("Type mismatch{}: {message}", format_context(.context))]
    TypeMismatch { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
    #[error("Already assigned{}: {message}", format_context(.context))]
    AlreadyAssigned { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
    #[error("Unknown injection field{}: {message}", format_context(.context))]
    UnknownField { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Injection slot for another registered component.
///
/// The registry owns every instance; the slot keeps a non-owning reference that the wirer
/// fills exactly once. Reading it after the registry is dropped yields `None`.
///
/// ```rust
/// use std::sync::Arc;
/// use trellis_core::Autowired;
///
/// let slot: Autowired<String> = Autowired::default();
/// let target = Arc::new(String::from("shared"));
/// slot.assign(target.clone()).unwrap();
/// assert_eq!(slot.get().as_deref(), Some(&String::from("shared")));
/// ```
pub struct Autowired<T> {
    slot: OnceLock<Weak<T>>,
}

impl<T> Autowired<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self { slot: OnceLock::new() }
    }

    /// The injected component, if the slot was wired and the registry is still alive.
    #[must_use]
    pub fn get(&self) -> Option<Arc<T>> {
        self.slot.get().and_then(Weak::upgrade)
    }

    #[must_use]
    pub fn is_assigned(&self) -> bool {
        self.slot.get().is_some()
    }
}

impl<T: Any + Send + Sync> Autowired<T> {
    /// Fills the slot with `target`.
    ///
    /// # Errors
    /// [`InjectError::TypeMismatch`] when `target` is not a `T`;
    /// [`InjectError::AlreadyAssigned`] on a second assignment.
    pub fn assign(&self, target: Arc<dyn Any + Send + Sync>) -> Result<(), InjectError> {
        let target = target.downcast::<T>().map_err(|_| InjectError::TypeMismatch {
            message: Cow::Owned(format!("expected {}", type_name::<T>())),
            context: None,
        })?;
        self.slot.set(Arc::downgrade(&target)).map_err(|_| InjectError::AlreadyAssigned {
            message: Cow::Borrowed(type_name::<T>()),
            context: None,
        })
    }
}

impl<T> Default for Autowired<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Autowired<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Autowired")
            .field("target", &type_name::<T>())
            .field("assigned", &self.is_assigned())
            .finish()
    }
}
