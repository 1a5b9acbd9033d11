use url::form_urlencoded;

/// The request as seen by the dispatcher and by handlers.
///
/// Query parameters form an ordered multi-map: keys keep the order of their first
/// occurrence and repeated keys accumulate values.
///
/// ```rust
/// use trellis_core::RequestView;
///
/// let request = RequestView::from_target("/hello/world?name=a&name=b&x=1");
/// assert_eq!(request.path(), "/hello/world");
/// assert_eq!(request.param_values("name"), ["a", "b"]);
/// assert_eq!(request.param("x"), Some("1"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestView {
    path: String,
    context_path: String,
    params: Vec<(String, Vec<String>)>,
}

impl RequestView {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), ..Self::default() }
    }

    /// Parses a request target such as `/hello/world?name=Sam`.
    #[must_use]
    pub fn from_target(target: &str) -> Self {
        let (path, query) = target.split_once('?').unwrap_or((target, ""));
        let mut request = Self::new(path);
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            request.push_param(key.into_owned(), value.into_owned());
        }
        request
    }

    #[must_use]
    pub fn with_context_path(mut self, context_path: impl Into<String>) -> Self {
        self.context_path = context_path.into();
        self
    }

    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push_param(key.into(), value.into());
        self
    }

    pub fn push_param(&mut self, key: String, value: String) {
        match self.params.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, values)) => values.push(value),
            None => self.params.push((key, vec![value])),
        }
    }

    /// Raw request path, context path included.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn context_path(&self) -> &str {
        &self.context_path
    }

    /// First value of `key`.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.param_values(key).first().map(String::as_str)
    }

    #[must_use]
    pub fn param_values(&self, key: &str) -> &[String] {
        self.params
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, values)| values.as_slice())
            .unwrap_or_default()
    }

    pub fn params(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.params.iter().map(|(key, values)| (key.as_str(), values.as_slice()))
    }
}

/// Sink for the response body.
pub trait ResponseWriter {
    fn write(&mut self, body: &str);
}

impl ResponseWriter for String {
    fn write(&mut self, body: &str) {
        self.push_str(body);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_target_without_query() {
        let request = RequestView::from_target("/plain");
        assert_eq!(request.path(), "/plain");
        assert_eq!(request.params().count(), 0);
    }

    #[test]
    fn query_is_percent_decoded() {
        let request = RequestView::from_target("/q?name=J%C3%BCrgen&greeting=hi+there");
        assert_eq!(request.param("name"), Some("Jürgen"));
        assert_eq!(request.param("greeting"), Some("hi there"));
    }

    #[test]
    fn keys_keep_first_occurrence_order() {
        let request = RequestView::new("/").with_param("b", "1").with_param("a", "2").with_param("b", "3");
        let keys: Vec<_> = request.params().map(|(key, _)| key).collect();
        assert_eq!(keys, ["b", "a"]);
        assert_eq!(request.param_values("b"), ["1", "3"]);
        assert!(request.param_values("missing").is_empty());
    }

    #[test]
    fn string_collects_writes() {
        let mut body = String::new();
        body.write("Hello,");
        body.write("Sam");
        assert_eq!(body, "Hello,Sam");
    }
}
