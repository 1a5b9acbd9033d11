use std::borrow::Cow;

/// Failures that abort initialization.
#[trellis_derive::trellis_error]
pub enum InitError {
    #[error("Resource not found{}: {message}", format_context(.context))]
    ResourceNotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
    #[error("Invalid route pattern{}: {source}", format_context(.context))]
    Pattern { source: regex::Error, context: Option<Cow<'static, str>> },
    #[error("Strict initialization failed{}: {message}", format_context(.context))]
    Strict { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
