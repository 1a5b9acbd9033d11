//! Name derivation and path normalization helpers shared by the registry, the route
//! table builder and the dispatcher.

use std::borrow::Cow;

/// Lower-cases the first character when it is an ASCII uppercase letter.
///
/// Only the first character is ever touched, so `URLParser` becomes `uRLParser`.
/// Digits, lowercase letters, non-Latin characters and the empty string pass through.
///
/// ```rust
/// use trellis_core::naming::lower_case_first;
///
/// assert_eq!(lower_case_first("HelloController"), "helloController");
/// assert_eq!(lower_case_first("élan"), "élan");
/// ```
#[must_use]
pub fn lower_case_first(name: &str) -> Cow<'_, str> {
    match name.as_bytes().first() {
        Some(first) if first.is_ascii_uppercase() => {
            let mut owned = String::with_capacity(name.len());
            owned.push(char::from(first.to_ascii_lowercase()));
            owned.push_str(&name[1..]);
            Cow::Owned(owned)
        },
        _ => Cow::Borrowed(name),
    }
}

/// Collapses every run of `/` into a single `/`.
#[must_use]
pub fn collapse_separators(path: &str) -> Cow<'_, str> {
    if !path.contains("//") {
        return Cow::Borrowed(path);
    }

    let mut collapsed = String::with_capacity(path.len());
    let mut previous_slash = false;
    for ch in path.chars() {
        if ch == '/' {
            if previous_slash {
                continue;
            }
            previous_slash = true;
        } else {
            previous_slash = false;
        }
        collapsed.push(ch);
    }
    Cow::Owned(collapsed)
}

/// Component key for a descriptor: the trimmed explicit name, or the derived one.
pub(crate) fn component_key(explicit: &str, simple_name: &str) -> String {
    let explicit = explicit.trim();
    if explicit.is_empty() { lower_case_first(simple_name).into_owned() } else { explicit.to_owned() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn lower_case_first_examples() {
        assert_eq!(lower_case_first("HelloController"), "helloController");
        assert_eq!(lower_case_first("URLParser"), "uRLParser");
        assert_eq!(lower_case_first("Zebra"), "zebra");
        assert_eq!(lower_case_first("Apple"), "apple");
        assert_eq!(lower_case_first("already"), "already");
        assert_eq!(lower_case_first("9lives"), "9lives");
        assert_eq!(lower_case_first("Ñandu"), "Ñandu");
        assert_eq!(lower_case_first(""), "");
    }

    #[test]
    fn collapse_separators_examples() {
        assert_eq!(collapse_separators("/hello//world"), "/hello/world");
        assert_eq!(collapse_separators("///"), "/");
        assert_eq!(collapse_separators("/plain"), "/plain");
        assert_eq!(collapse_separators(""), "");
    }

    #[test]
    fn component_key_prefers_trimmed_explicit_name() {
        assert_eq!(component_key("  greeter ", "GreetingService"), "greeter");
        assert_eq!(component_key("   ", "GreetingService"), "greetingService");
        assert_eq!(component_key("", "HelloService"), "helloService");
    }

    proptest! {
        #[test]
        fn lower_case_first_only_touches_first_char(name in "\\PC{0,16}") {
            let lowered = lower_case_first(&name);
            let mut original = name.chars();
            let mut result = lowered.chars();
            match (original.next(), result.next()) {
                (Some(a), Some(b)) if a.is_ascii_uppercase() => prop_assert_eq!(a.to_ascii_lowercase(), b),
                (a, b) => prop_assert_eq!(a, b),
            }
            prop_assert_eq!(original.as_str(), result.as_str());
        }

        #[test]
        fn collapsed_paths_have_no_double_slash(path in "[a-z/]{0,24}") {
            let collapsed = collapse_separators(&path);
            prop_assert!(!collapsed.contains("//"));
            prop_assert_eq!(collapsed.replace('/', ""), path.replace('/', ""));
        }

        #[test]
        fn collapse_is_idempotent(path in "[a-z/]{0,24}") {
            let once = collapse_separators(&path).into_owned();
            prop_assert_eq!(collapse_separators(&once), once.as_str());
        }
    }
}
