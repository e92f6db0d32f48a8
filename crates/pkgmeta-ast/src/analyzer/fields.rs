use super::resolver::find_variable_in_body;
use super::CallSite;
use crate::tree::{Call, DictEntry, Expr};
use pkgmeta_record::ExtrasRequire;
use tracing::debug;

/// Name of the mapping constructor accepted for a `**kwargs` bundle
const MAPPING_CONSTRUCTOR: &str = "dict";

impl<'a> CallSite<'a> {
    fn find_variable(&self, name: &str) -> Option<&'a Expr> {
        find_variable_in_body(&self.body, name)
    }

    /// Value node for `keyword`: the explicit keyword argument if present,
    /// otherwise the entry of a `**bundle` that is bound to a dict display or a
    /// `dict(...)` call. Only one level of bundle indirection is followed.
    fn keyword_value(&self, keyword: &str) -> Option<&'a Expr> {
        let call: &'a Call = self.call;
        if let Some(value) = call.keyword(keyword) {
            return Some(value);
        }

        let bundle = call.kwargs_bundle()?.as_name()?;
        match self.find_variable(bundle)? {
            Expr::Dict(entries) => find_in_dict(entries, keyword),
            Expr::Call(ctor) if ctor.func.as_name() == Some(MAPPING_CONSTRUCTOR) => {
                ctor.keyword(keyword)
            }
            other => {
                debug!(
                    "kwargs bundle '{}' is not a literal mapping: {:?}",
                    bundle, other
                );
                None
            }
        }
    }

    /// Follow a bare name once; any other node is returned as is
    fn resolve_once(&self, value: &'a Expr) -> Option<&'a Expr> {
        match value {
            Expr::Name(name) => self.find_variable(name),
            other => Some(other),
        }
    }

    /// A scalar field: a string literal, or a name bound to one
    pub(super) fn single_string(&self, keyword: &str) -> Option<String> {
        let value = self.keyword_value(keyword)?;
        self.resolve_once(value)?.as_str().map(str::to_string)
    }

    /// A requirement list: a list/tuple display, or a name bound to one.
    /// Elements that are not string literals are skipped.
    pub(super) fn string_list(&self, keyword: &str) -> Vec<String> {
        self.keyword_value(keyword)
            .and_then(|value| self.resolve_once(value))
            .and_then(Expr::as_sequence)
            .map(literal_strings)
            .unwrap_or_default()
    }

    /// The extras mapping: a dict display, or a name bound to one. Each group
    /// needs a string-literal key and a list display (or a name bound to one);
    /// a group that does not fit is skipped on its own.
    pub(super) fn extras(&self, keyword: &str) -> ExtrasRequire {
        let mut extras = ExtrasRequire::new();
        let entries = match self
            .keyword_value(keyword)
            .and_then(|value| self.resolve_once(value))
        {
            Some(Expr::Dict(entries)) => entries,
            _ => return extras,
        };

        for entry in entries {
            let Some(Expr::Str(group)) = &entry.key else {
                continue;
            };
            match self.resolve_once(&entry.value).and_then(Expr::as_sequence) {
                Some(elements) => {
                    extras.insert(group.clone(), literal_strings(elements));
                }
                None => debug!("Skipping extras group '{}': not a literal list", group),
            }
        }

        extras
    }
}

fn find_in_dict<'a>(entries: &'a [DictEntry], name: &str) -> Option<&'a Expr> {
    entries
        .iter()
        .find(|entry| entry.key.as_ref().and_then(Expr::as_str) == Some(name))
        .map(|entry| &entry.value)
}

fn literal_strings(elements: &[Expr]) -> Vec<String> {
    elements
        .iter()
        .filter_map(Expr::as_str)
        .map(str::to_string)
        .collect()
}
