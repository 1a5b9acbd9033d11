use crate::BoxError;
use std::borrow::Cow;

/// Failures while binding or invoking a handler. Every variant ends as a 500 response.
#[trellis_derive::trellis_error]
pub enum DispatchError {
    #[error("Binding failed{}: {message}", format_context(.context))]
    Binding { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
    #[error("Handler failed{}: {source}", format_context(.context))]
    Handler { source: BoxError, context: Option<Cow<'static, str>> },
    #[error("Handler panicked{}: {message}", format_context(.context))]
    Panic { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
    #[error("Unknown handler method{}: {message}", format_context(.context))]
    UnknownMethod { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl DispatchError {
    pub(crate) fn binding(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Binding { message: message.into(), context: None }
    }
}
