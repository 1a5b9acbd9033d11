use crate::catalog::Catalog;
use crate::error::InitError;
use std::borrow::Cow;
use std::collections::VecDeque;
use tracing::debug;

const SEPARATOR: &str = "::";

/// Normalizes a root identifier: `.` separators become `::`, surrounding separators go.
#[must_use]
pub fn normalize_root(root: &str) -> String {
    let root = root.trim().replace('.', SEPARATOR);
    root.trim_matches(':').to_owned()
}

/// Enumerates the fully-qualified names of every unit under `root`, breadth-first.
///
/// Within a namespace, units are emitted in lexical order before its child namespaces are
/// queued (also in lexical order). A root naming a single unit yields just that name; an
/// empty root covers the whole catalog.
///
/// # Errors
/// [`InitError::ResourceNotFound`] when `root` resolves to neither a unit nor a namespace.
pub fn scan(catalog: &Catalog, root: &str) -> Result<Vec<String>, InitError> {
    let root = normalize_root(root);

    if catalog.contains(&root) {
        debug!(unit = %root, "Scan root is a single unit");
        return Ok(vec![root]);
    }

    let prefix = namespace_prefix(&root);
    if !catalog.names().any(|name| name.starts_with(prefix.as_ref())) {
        return Err(InitError::ResourceNotFound { message: root.into(), context: Some("scan root".into()) });
    }

    let mut found = Vec::new();
    let mut queue = VecDeque::from([root]);
    while let Some(namespace) = queue.pop_front() {
        let prefix = namespace_prefix(&namespace);
        let mut children = Vec::new();
        for name in catalog.names() {
            let Some(rest) = name.strip_prefix(prefix.as_ref()) else {
                continue;
            };
            match rest.split_once(SEPARATOR) {
                None => found.push(name.to_owned()),
                Some((child, _)) => {
                    if children.last().is_none_or(|last: &String| last != child) {
                        children.push(child.to_owned());
                    }
                },
            }
        }
        debug!(namespace = %namespace, children = children.len(), "Scanned namespace");
        queue.extend(children.into_iter().map(|child| format!("{prefix}{child}")));
    }

    Ok(found)
}

fn namespace_prefix(namespace: &str) -> Cow<'_, str> {
    if namespace.is_empty() { Cow::Borrowed("") } else { Cow::Owned(format!("{namespace}{SEPARATOR}")) }
}
