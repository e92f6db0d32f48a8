//! Syntax tree consumed by the setup script analyzer
//!
//! Only the shapes the analyzer can reason about get their own variant;
//! everything else collapses into `Other`. The tree is produced by a
//! [`crate::parser::ScriptParser`] and has no ties to any particular parser.

/// A statement of the script descriptor
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// A bare expression statement, e.g. `setup(...)`
    Expr(Expr),
    /// A single-target, non-destructuring assignment `target = value`
    Assign { target: String, value: Expr },
    /// An `if` statement; only the body of the first branch is kept
    If { test: Expr, body: Vec<Stmt> },
    /// A (non-async) function definition
    FunctionDef { name: String, body: Vec<Stmt> },
    Other,
}

/// An expression node
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A string literal with escapes already decoded
    Str(String),
    /// A bare name reference
    Name(String),
    Attribute {
        value: Box<Expr>,
        attr: String,
    },
    List(Vec<Expr>),
    Tuple(Vec<Expr>),
    Dict(Vec<DictEntry>),
    Call(Call),
    Compare {
        left: Box<Expr>,
        ops: Vec<CompareOp>,
        comparators: Vec<Expr>,
    },
    Other,
}

/// One `key: value` entry of a dict display; `key` is `None` for `**splat`
#[derive(Debug, Clone, PartialEq)]
pub struct DictEntry {
    pub key: Option<Expr>,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub func: Box<Expr>,
    pub args: Vec<Expr>,
    pub keywords: Vec<Keyword>,
}

/// A keyword argument; `arg` is `None` for a `**bundle` argument
#[derive(Debug, Clone, PartialEq)]
pub struct Keyword {
    pub arg: Option<String>,
    pub value: Expr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    LtE,
    Gt,
    GtE,
    Is,
    IsNot,
    In,
    NotIn,
}

impl CompareOp {
    /// Map an operator token sequence (whitespace-normalised) to an operator
    pub fn from_token(token: &str) -> Option<Self> {
        let op = match token {
            "==" => CompareOp::Eq,
            "!=" | "<>" => CompareOp::NotEq,
            "<" => CompareOp::Lt,
            "<=" => CompareOp::LtE,
            ">" => CompareOp::Gt,
            ">=" => CompareOp::GtE,
            "is" => CompareOp::Is,
            "is not" => CompareOp::IsNot,
            "in" => CompareOp::In,
            "not in" => CompareOp::NotIn,
            _ => return None,
        };
        Some(op)
    }
}

impl Expr {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Expr::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_name(&self) -> Option<&str> {
        match self {
            Expr::Name(name) => Some(name),
            _ => None,
        }
    }

    /// Elements of a list or tuple display
    pub fn as_sequence(&self) -> Option<&[Expr]> {
        match self {
            Expr::List(elements) | Expr::Tuple(elements) => Some(elements),
            _ => None,
        }
    }
}

impl Call {
    /// Value of the explicit keyword argument `name`, if present
    pub fn keyword(&self, name: &str) -> Option<&Expr> {
        self.keywords
            .iter()
            .find(|kw| kw.arg.as_deref() == Some(name))
            .map(|kw| &kw.value)
    }

    /// Value forwarded through `**bundle`; the last one wins when several are given
    pub fn kwargs_bundle(&self) -> Option<&Expr> {
        self.keywords
            .iter()
            .rev()
            .find(|kw| kw.arg.is_none())
            .map(|kw| &kw.value)
    }
}
