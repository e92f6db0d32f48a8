use crate::tree::{Expr, Stmt};

/// Value node of the first simple assignment to `name` in `body`.
///
/// The scan runs front to back and stops at the first match, so a later
/// reassignment of the same name is never seen. The returned node is not
/// interpreted further.
pub fn find_variable_in_body<'a>(body: &[&'a Stmt], name: &str) -> Option<&'a Expr> {
    body.iter().find_map(|stmt| match stmt {
        Stmt::Assign { target, value } if target == name => Some(value),
        _ => None,
    })
}
