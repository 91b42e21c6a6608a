use indexmap::IndexMap;
use log::warn;

///The set of namespace URI→prefix bindings active at the current point
///of the scan.
///
///Bindings are not lexically nested per URI: a later start-mapping for a
///URI already present overwrites it, and an end-mapping removes the URI
///regardless of nesting depth. Documents that redeclare a namespace keep
///the last writer.
#[derive(Debug, Default)]
pub(crate) struct NamespaceScope {
    map: IndexMap<String, String>,
}

impl NamespaceScope {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, uri: String, prefix: String) {
        self.map.insert(uri, prefix);
    }

    pub(crate) fn pop(&mut self, uri: &str) {
        if self.map.shift_remove(uri).is_none() {
            warn!("end of namespace {uri:?} without a matching start");
        }
    }

    ///Resolves the prefix currently bound to `uri`. Fails open: an
    ///unknown URI yields `None` and callers fall back to the bare local
    ///name.
    pub(crate) fn prefix_for(&self, uri: &str) -> Option<&str> {
        self.map.get(uri).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_active_bindings() {
        let mut scope = NamespaceScope::new();
        scope.push("http://x".to_string(), "a".to_string());

        assert_eq!(scope.prefix_for("http://x"), Some("a"));
        assert_eq!(scope.prefix_for("http://y"), None);
    }

    #[test]
    fn pop_ends_the_binding() {
        let mut scope = NamespaceScope::new();
        scope.push("http://x".to_string(), "a".to_string());
        scope.pop("http://x");

        assert_eq!(scope.prefix_for("http://x"), None);
    }

    #[test]
    fn redeclaration_is_last_writer_wins() {
        let mut scope = NamespaceScope::new();
        scope.push("http://x".to_string(), "a".to_string());
        scope.push("http://x".to_string(), "b".to_string());

        assert_eq!(scope.prefix_for("http://x"), Some("b"));

        // A single end-mapping removes the URI outright, whichever start
        // it pairs with.
        scope.pop("http://x");
        assert_eq!(scope.prefix_for("http://x"), None);
    }

    #[test]
    fn unbalanced_pop_is_not_fatal() {
        let mut scope = NamespaceScope::new();
        scope.pop("http://never-started");
        assert_eq!(scope.prefix_for("http://never-started"), None);
    }
}
