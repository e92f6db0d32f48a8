//! Parser adapter: tree-sitter Python (via ast-grep) -> [`crate::tree`]
//!
//! The analyzer never touches ast-grep types. This module lowers the concrete
//! syntax tree into the small statement/expression model, dropping anything
//! the analyzer does not need into `Other` variants.

use crate::errors::SyntaxError;
use crate::tree::{Call, CompareOp, DictEntry, Expr, Keyword, Stmt};
use ast_grep_core::source::StrDoc;
use ast_grep_core::{AstGrep, Node};
use ast_grep_language::Python;
use std::iter::Peekable;
use std::str::Chars;

type PyNode<'r> = Node<'r, StrDoc<Python>>;

/// Turns script descriptor source into a statement list
pub trait ScriptParser {
    fn parse(&self, source: &str) -> Result<Vec<Stmt>, SyntaxError>;
}

/// Production parser backed by the tree-sitter Python grammar
#[derive(Debug, Default, Clone, Copy)]
pub struct AstGrepParser;

impl ScriptParser for AstGrepParser {
    fn parse(&self, source: &str) -> Result<Vec<Stmt>, SyntaxError> {
        let sg = AstGrep::new(source, Python);
        let root = sg.root();

        if let Some((offset, message)) = root.children().find_map(|child| find_syntax_error(&child)) {
            let (line, column) = line_and_column(source, offset);
            return Err(SyntaxError {
                line,
                column,
                message: message.to_string(),
            });
        }

        Ok(lower_block(&root))
    }
}

/// Byte offset and description of the first error or missing node below the
/// module root, if any
fn find_syntax_error(node: &PyNode<'_>) -> Option<(usize, &'static str)> {
    if node.kind() == "ERROR" {
        return Some((node.range().start, "invalid syntax"));
    }
    // Nodes inserted by error recovery are zero-width.
    if node.range().is_empty() {
        let message = if node.kind() == "block" {
            "expected an indented block"
        } else {
            "missing token"
        };
        return Some((node.range().start, message));
    }
    node.children().find_map(|child| find_syntax_error(&child))
}

fn line_and_column(source: &str, offset: usize) -> (usize, usize) {
    let prefix = source.get(..offset).unwrap_or(source);
    let line = prefix.matches('\n').count() + 1;
    let column = prefix
        .rsplit('\n')
        .next()
        .map_or(0, |last| last.chars().count())
        + 1;
    (line, column)
}

fn named_children<'r>(node: &PyNode<'r>) -> Vec<PyNode<'r>> {
    node.children()
        .filter(|child| child.is_named() && child.kind() != "comment")
        .collect()
}

fn lower_block(node: &PyNode<'_>) -> Vec<Stmt> {
    named_children(node).iter().map(lower_stmt).collect()
}

fn lower_stmt(node: &PyNode<'_>) -> Stmt {
    match node.kind().as_ref() {
        "expression_statement" => lower_expression_statement(node),
        "if_statement" => {
            let test = node
                .field("condition")
                .map_or(Expr::Other, |condition| lower_expr(&condition));
            let body = node
                .field("consequence")
                .map(|block| lower_block(&block))
                .unwrap_or_default();
            Stmt::If { test, body }
        }
        "function_definition" => lower_function(node),
        "decorated_definition" => match node.field("definition") {
            Some(def) if def.kind() == "function_definition" => lower_function(&def),
            _ => Stmt::Other,
        },
        _ => Stmt::Other,
    }
}

fn lower_expression_statement(node: &PyNode<'_>) -> Stmt {
    match named_children(node).as_slice() {
        [only] if only.kind() == "assignment" => lower_assignment(only),
        [only] if only.kind() == "augmented_assignment" => Stmt::Other,
        [only] => Stmt::Expr(lower_expr(only)),
        _ => Stmt::Other,
    }
}

fn lower_assignment(node: &PyNode<'_>) -> Stmt {
    // Annotated assignments are a different statement kind in Python.
    if node.field("type").is_some() {
        return Stmt::Other;
    }
    let (Some(left), Some(right)) = (node.field("left"), node.field("right")) else {
        return Stmt::Other;
    };
    // `a = b = value` and `a, b = ...` are not single-target assignments.
    if left.kind() != "identifier" || right.kind() == "assignment" {
        return Stmt::Other;
    }
    Stmt::Assign {
        target: left.text().to_string(),
        value: lower_expr(&right),
    }
}

fn lower_function(node: &PyNode<'_>) -> Stmt {
    if node
        .children()
        .next()
        .is_some_and(|first| first.kind() == "async")
    {
        return Stmt::Other;
    }
    let Some(name) = node.field("name") else {
        return Stmt::Other;
    };
    let body = node
        .field("body")
        .map(|block| lower_block(&block))
        .unwrap_or_default();
    Stmt::FunctionDef {
        name: name.text().to_string(),
        body,
    }
}

fn lower_expr(node: &PyNode<'_>) -> Expr {
    match node.kind().as_ref() {
        "identifier" => Expr::Name(node.text().to_string()),
        "string" => lower_string(node).map_or(Expr::Other, Expr::Str),
        "concatenated_string" => {
            let parts: Option<Vec<String>> = named_children(node).iter().map(lower_string).collect();
            parts.map_or(Expr::Other, |parts| Expr::Str(parts.concat()))
        }
        "list" => Expr::List(lower_elements(node)),
        "tuple" | "expression_list" => Expr::Tuple(lower_elements(node)),
        "parenthesized_expression" => match named_children(node).as_slice() {
            [inner] => lower_expr(inner),
            _ => Expr::Other,
        },
        "dictionary" => Expr::Dict(lower_dict_entries(node)),
        "call" => lower_call(node),
        "attribute" => {
            let (Some(object), Some(attr)) = (node.field("object"), node.field("attribute"))
            else {
                return Expr::Other;
            };
            Expr::Attribute {
                value: Box::new(lower_expr(&object)),
                attr: attr.text().to_string(),
            }
        }
        "comparison_operator" => lower_comparison(node),
        _ => Expr::Other,
    }
}

fn lower_elements(node: &PyNode<'_>) -> Vec<Expr> {
    named_children(node).iter().map(lower_expr).collect()
}

fn lower_string(node: &PyNode<'_>) -> Option<String> {
    if node.kind() != "string" {
        return None;
    }
    decode_string_literal(&node.text())
}

fn lower_dict_entries(node: &PyNode<'_>) -> Vec<DictEntry> {
    named_children(node)
        .iter()
        .filter_map(|child| match child.kind().as_ref() {
            "pair" => Some(DictEntry {
                key: Some(child.field("key").map_or(Expr::Other, |key| lower_expr(&key))),
                value: child
                    .field("value")
                    .map_or(Expr::Other, |value| lower_expr(&value)),
            }),
            "dictionary_splat" => Some(DictEntry {
                key: None,
                value: splat_value(child),
            }),
            _ => None,
        })
        .collect()
}

fn splat_value(node: &PyNode<'_>) -> Expr {
    match named_children(node).as_slice() {
        [inner] => lower_expr(inner),
        _ => Expr::Other,
    }
}

fn lower_call(node: &PyNode<'_>) -> Expr {
    let Some(function) = node.field("function") else {
        return Expr::Other;
    };
    let mut call = Call {
        func: Box::new(lower_expr(&function)),
        args: Vec::new(),
        keywords: Vec::new(),
    };

    if let Some(arguments) = node.field("arguments") {
        if arguments.kind() != "argument_list" {
            // `f(x for x in y)`
            call.args.push(Expr::Other);
            return Expr::Call(call);
        }
        for argument in named_children(&arguments) {
            match argument.kind().as_ref() {
                "keyword_argument" => {
                    if let (Some(name), Some(value)) =
                        (argument.field("name"), argument.field("value"))
                    {
                        call.keywords.push(Keyword {
                            arg: Some(name.text().to_string()),
                            value: lower_expr(&value),
                        });
                    }
                }
                "dictionary_splat" => call.keywords.push(Keyword {
                    arg: None,
                    value: splat_value(&argument),
                }),
                _ => call.args.push(lower_expr(&argument)),
            }
        }
    }

    Expr::Call(call)
}

fn lower_comparison(node: &PyNode<'_>) -> Expr {
    let mut operands = Vec::new();
    let mut ops = Vec::new();
    let mut pending: Vec<String> = Vec::new();

    for child in node.children() {
        if child.kind() == "comment" {
            continue;
        }
        if !child.is_named() {
            pending.push(child.text().to_string());
            continue;
        }
        if !operands.is_empty() {
            let token = pending
                .iter()
                .flat_map(|part| part.split_whitespace())
                .collect::<Vec<_>>()
                .join(" ");
            let Some(op) = CompareOp::from_token(&token) else {
                return Expr::Other;
            };
            ops.push(op);
            pending.clear();
        }
        operands.push(lower_expr(&child));
    }

    let mut operands = operands.into_iter();
    let Some(left) = operands.next() else {
        return Expr::Other;
    };
    Expr::Compare {
        left: Box::new(left),
        ops,
        comparators: operands.collect(),
    }
}

/// Decode the source text of a single string literal.
///
/// Returns `None` for bytes and formatted strings, which are not text literals.
pub(crate) fn decode_string_literal(text: &str) -> Option<String> {
    let quote_start = text.find(['\'', '"'])?;
    let prefix = text[..quote_start].to_ascii_lowercase();
    if !prefix.chars().all(|c| c == 'r' || c == 'u') {
        return None;
    }
    let raw = prefix.contains('r');

    let literal = &text[quote_start..];
    let quote = ["\"\"\"", "'''", "\"", "'"]
        .into_iter()
        .find(|q| literal.starts_with(q) && literal.len() >= 2 * q.len())?;
    let body = literal.strip_prefix(quote)?.strip_suffix(quote)?;

    if raw {
        Some(body.to_string())
    } else {
        unescape(body)
    }
}

/// Decoded body, or `None` when it holds an escape that cannot be decoded
/// statically
fn unescape(body: &str) -> Option<String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        let Some(escaped) = chars.next() else {
            out.push('\\');
            break;
        };
        match escaped {
            '\n' => {}
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            '\\' | '\'' | '"' => out.push(escaped),
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0c}'),
            'v' => out.push('\u{0b}'),
            '0'..='7' => {
                let mut digits = escaped.to_string();
                while digits.len() < 3 && chars.peek().is_some_and(|c| ('0'..='7').contains(c)) {
                    if let Some(digit) = chars.next() {
                        digits.push(digit);
                    }
                }
                match u32::from_str_radix(&digits, 8).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push('\\');
                        out.push_str(&digits);
                    }
                }
            }
            // Named escapes need the Unicode name table.
            'N' => return None,
            'x' => push_code_point(&mut out, &mut chars, 'x', 2),
            'u' => push_code_point(&mut out, &mut chars, 'u', 4),
            'U' => push_code_point(&mut out, &mut chars, 'U', 8),
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }

    Some(out)
}

fn push_code_point(out: &mut String, chars: &mut Peekable<Chars<'_>>, marker: char, width: usize) {
    let mut digits = String::with_capacity(width);
    while digits.len() < width && chars.peek().is_some_and(char::is_ascii_hexdigit) {
        if let Some(digit) = chars.next() {
            digits.push(digit);
        }
    }
    let decoded = (digits.len() == width)
        .then(|| u32::from_str_radix(&digits, 16).ok())
        .flatten()
        .and_then(char::from_u32);
    match decoded {
        Some(decoded) => out.push(decoded),
        None => {
            out.push('\\');
            out.push(marker);
            out.push_str(&digits);
        }
    }
}
