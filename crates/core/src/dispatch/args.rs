use super::error::DispatchError;
use super::request::{RequestView, ResponseWriter};
use crate::BoxError;
use std::fmt;
use std::mem;

enum Argument<'a> {
    Unset,
    Value(String),
    Request(&'a RequestView),
    Response(&'a mut dyn ResponseWriter),
}

/// Positional arguments of one handler invocation.
///
/// Each slot is consumed by the generated `invoke` exactly once, in parameter order.
pub struct Arguments<'a> {
    slots: Vec<Argument<'a>>,
}

impl<'a> Arguments<'a> {
    #[must_use]
    pub fn new(arity: usize) -> Self {
        Self { slots: std::iter::repeat_with(|| Argument::Unset).take(arity).collect() }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Binds a query value. Out-of-range indexes are ignored.
    pub fn set_value(&mut self, index: usize, value: String) {
        self.set(index, Argument::Value(value));
    }

    pub fn set_request(&mut self, index: usize, request: &'a RequestView) {
        self.set(index, Argument::Request(request));
    }

    pub fn set_response(&mut self, index: usize, response: &'a mut dyn ResponseWriter) {
        self.set(index, Argument::Response(response));
    }

    /// # Errors
    /// [`DispatchError::Binding`] when slot `index` does not hold the request.
    pub fn request(&self, index: usize) -> Result<&'a RequestView, DispatchError> {
        match self.slots.get(index) {
            Some(Argument::Request(request)) => Ok(*request),
            _ => Err(DispatchError::binding(format!("argument {index} is not bound to the request"))),
        }
    }

    /// Takes the response out of slot `index`.
    ///
    /// # Errors
    /// [`DispatchError::Binding`] when slot `index` does not hold the response.
    pub fn response(&mut self, index: usize) -> Result<&'a mut dyn ResponseWriter, DispatchError> {
        match self.take(index) {
            Argument::Response(response) => Ok(response),
            _ => Err(DispatchError::binding(format!("argument {index} is not bound to the response"))),
        }
    }

    /// Takes slot `index` and converts it to `T`.
    ///
    /// # Errors
    /// [`DispatchError::Binding`] when the conversion fails or the slot holds a sentinel.
    pub fn value<T: FromParam>(&mut self, index: usize) -> Result<T, DispatchError> {
        let raw = match self.take(index) {
            Argument::Unset => None,
            Argument::Value(value) => Some(value),
            Argument::Request(_) | Argument::Response(_) => {
                return Err(DispatchError::binding(format!("argument {index} is bound to a sentinel")));
            },
        };
        T::from_param(raw).map_err(|message| DispatchError::Binding {
            message,
            context: Some(format!("argument {index}").into()),
        })
    }

    fn set(&mut self, index: usize, argument: Argument<'a>) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = argument;
        }
    }

    fn take(&mut self, index: usize) -> Argument<'a> {
        self.slots.get_mut(index).map_or(Argument::Unset, |slot| mem::replace(slot, Argument::Unset))
    }
}

impl fmt::Debug for Arguments<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slots: Vec<&str> = self
            .slots
            .iter()
            .map(|slot| match slot {
                Argument::Unset => "unset",
                Argument::Value(_) => "value",
                Argument::Request(_) => "request",
                Argument::Response(_) => "response",
            })
            .collect();
        f.debug_struct("Arguments").field("slots", &slots).finish()
    }
}

/// Conversion from an optional bound query value into a handler parameter.
pub trait FromParam: Sized {
    /// # Errors
    /// A message describing why `value` cannot become `Self`.
    fn from_param(value: Option<String>) -> Result<Self, std::borrow::Cow<'static, str>>;
}

impl FromParam for String {
    fn from_param(value: Option<String>) -> Result<Self, std::borrow::Cow<'static, str>> {
        value.ok_or_else(|| "missing value".into())
    }
}

impl<T: FromParam> FromParam for Option<T> {
    fn from_param(value: Option<String>) -> Result<Self, std::borrow::Cow<'static, str>> {
        value.map(|value| T::from_param(Some(value))).transpose()
    }
}

macro_rules! from_param_via_str {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromParam for $ty {
                fn from_param(value: Option<String>) -> Result<Self, std::borrow::Cow<'static, str>> {
                    let value = value.ok_or("missing value")?;
                    value.parse().map_err(|err| format!("cannot parse `{value}` as {}: {err}", stringify!($ty)).into())
                }
            }
        )*
    };
}

from_param_via_str!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char);

/// Handler return values the dispatcher accepts.
pub trait IntoOutcome {
    /// # Errors
    /// [`DispatchError::Handler`] when the handler reported a failure.
    fn into_outcome(self) -> Result<(), DispatchError>;
}

impl IntoOutcome for () {
    fn into_outcome(self) -> Result<(), DispatchError> {
        Ok(())
    }
}

impl<T, E: Into<BoxError>> IntoOutcome for Result<T, E> {
    fn into_outcome(self) -> Result<(), DispatchError> {
        self.map(drop).map_err(|err| DispatchError::Handler { source: err.into(), context: None })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_convert() {
        let mut args = Arguments::new(4);
        args.set_value(0, "42".to_owned());
        args.set_value(1, "true".to_owned());
        args.set_value(2, "a, b".to_owned());
        assert_eq!(args.value::<u32>(0).unwrap(), 42);
        assert!(args.value::<bool>(1).unwrap());
        assert_eq!(args.value::<String>(2).unwrap(), "a, b");
        assert_eq!(args.value::<Option<String>>(3).unwrap(), None);
    }

    #[test]
    fn missing_required_value_fails() {
        let mut args = Arguments::new(1);
        let err = args.value::<String>(0).unwrap_err();
        assert_eq!(err.to_string(), "Binding failed (argument 0): missing value");
    }

    #[test]
    fn bad_number_fails() {
        let mut args = Arguments::new(1);
        args.set_value(0, "forty".to_owned());
        assert!(matches!(args.value::<i64>(0), Err(DispatchError::Binding { .. })));
    }

    #[test]
    fn optional_number_still_parses() {
        let mut args = Arguments::new(1);
        args.set_value(0, "7".to_owned());
        assert_eq!(args.value::<Option<u8>>(0).unwrap(), Some(7));
    }

    #[test]
    fn sentinels_round_trip() {
        let request = RequestView::new("/x");
        let mut body = String::new();
        {
            let mut args = Arguments::new(2);
            args.set_request(0, &request);
            args.set_response(1, &mut body);
            assert_eq!(args.request(0).unwrap().path(), "/x");
            args.response(1).unwrap().write("ok");
            assert!(args.response(1).is_err());
            assert!(args.request(1).is_err());
        }
        assert_eq!(body, "ok");
    }

    #[test]
    fn out_of_range_is_a_binding_error() {
        let mut args = Arguments::new(0);
        args.set_value(3, "ignored".to_owned());
        assert!(args.is_empty());
        assert!(args.response(0).is_err());
    }

    #[test]
    fn results_map_to_outcomes() {
        assert!(().into_outcome().is_ok());
        assert!(Ok::<u8, std::io::Error>(1).into_outcome().is_ok());
        let err = Err::<(), _>("boom").into_outcome().unwrap_err();
        assert_eq!(err.to_string(), "Handler failed: boom");
    }
}
