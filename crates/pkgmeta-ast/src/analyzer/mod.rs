//! Symbolic analysis of `setup.py`
//!
//! The analyzer walks the statement tree looking for the `setup(...)` call,
//! then resolves the keyword arguments that carry package metadata. Nothing in
//! the script is ever executed: only literals, bare names bound by a simple
//! assignment, and one level of `**kwargs` forwarding are understood. Anything
//! else leaves the affected field unknown.

use crate::errors::SyntaxError;
use crate::parser::ScriptParser;
use crate::tree::{Call, CompareOp, Expr, Stmt};
use pkgmeta_record::PackageMetadata;
use tracing::debug;

mod fields;
pub mod resolver;

#[cfg(test)]
mod tests;

/// Name of the registration function
const SETUP_FUNCTION: &str = "setup";
/// Namespace object that also exposes the registration function
const SETUP_NAMESPACE: &str = "setuptools";
/// Name compared against in the `if __name__ == "__main__":` guard
const ENTRY_POINT_NAME: &str = "__name__";

/// The discovered `setup(...)` call and the statements its names resolve against
#[derive(Debug, Clone)]
pub struct CallSite<'a> {
    pub call: &'a Call,
    pub body: Vec<&'a Stmt>,
}

/// Stateless `setup.py` analyzer; construct one per analysis or share freely
#[derive(Debug, Default, Clone, Copy)]
pub struct SetupScriptAnalyzer;

impl SetupScriptAnalyzer {
    pub fn new() -> Self {
        SetupScriptAnalyzer
    }

    /// Parse `source` with `parser` and analyze the resulting module
    pub fn analyze_source<P: ScriptParser + ?Sized>(
        &self,
        parser: &P,
        source: &str,
    ) -> Result<PackageMetadata, SyntaxError> {
        let module = parser.parse(source)?;
        Ok(self.analyze(&module))
    }

    /// Resolve every metadata field reachable from the module's `setup(...)` call
    pub fn analyze(&self, module: &[Stmt]) -> PackageMetadata {
        let Some(site) = find_setup_call(module) else {
            debug!("No setup() call found; all fields unknown");
            return PackageMetadata::default();
        };
        debug!(
            "Found setup() call with {} keyword(s), {} visible statement(s)",
            site.call.keywords.len(),
            site.body.len()
        );

        PackageMetadata {
            name: site.single_string("name"),
            version: site.single_string("version"),
            python_requires: site.single_string("python_requires"),
            install_requires: site.string_list("install_requires"),
            extras_require: site.extras("extras_require"),
        }
    }
}

/// Locate the `setup(...)` call in `elements`.
///
/// Tried in order, first success wins:
/// 1. a top-level `setup(...)` expression statement; everything in
///    `elements` is visible;
/// 2. a `setup(...)` inside a trailing `if __name__ == "<literal>":` guard;
///    the guard's visible body is followed by `elements`;
/// 3. a `setup(...)` inside a top-level function; the function's visible body
///    is followed by the top-level function definitions only.
pub fn find_setup_call(elements: &[Stmt]) -> Option<CallSite<'_>> {
    for stmt in elements {
        if let Stmt::Expr(Expr::Call(call)) = stmt {
            if is_setup_function(&call.func) {
                return Some(CallSite {
                    call,
                    body: elements.iter().collect(),
                });
            }
        }
    }

    if let Some(Stmt::If { test, body }) = elements.last() {
        if is_entry_point_guard(test) {
            if let Some(mut site) = find_setup_call(body) {
                site.body.extend(elements.iter());
                return Some(site);
            }
        }
    }

    let funcdefs: Vec<&Stmt> = elements
        .iter()
        .filter(|stmt| matches!(stmt, Stmt::FunctionDef { .. }))
        .collect();
    for def in funcdefs.iter().copied() {
        let Stmt::FunctionDef { name, body } = def else {
            continue;
        };
        if let Some(mut site) = find_setup_call(body) {
            debug!("setup() call found inside function '{}'", name);
            site.body.extend(funcdefs.iter().copied());
            return Some(site);
        }
    }

    None
}

fn is_setup_function(func: &Expr) -> bool {
    match func {
        Expr::Name(name) => name == SETUP_FUNCTION,
        Expr::Attribute { value, attr } => {
            attr == SETUP_FUNCTION && value.as_name() == Some(SETUP_NAMESPACE)
        }
        _ => false,
    }
}

/// `__name__ == "<literal>"`, in either operand order
fn is_entry_point_guard(test: &Expr) -> bool {
    let Expr::Compare {
        left,
        ops,
        comparators,
    } = test
    else {
        return false;
    };
    let ([CompareOp::Eq], [right]) = (ops.as_slice(), comparators.as_slice()) else {
        return false;
    };
    match (&**left, right) {
        (Expr::Name(name), Expr::Str(_)) | (Expr::Str(_), Expr::Name(name)) => {
            name == ENTRY_POINT_NAME
        }
        _ => false,
    }
}
