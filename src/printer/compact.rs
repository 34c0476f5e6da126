//! Compact renderer: the shortest text that parses back to the same tree.

use super::{RenderError, identifier, param_name, quote};
use crate::ast::{ArrayElement, Expr, FunctionCall, Literal, ObjectAttribute};
use std::io::Write;

/// Render `expr` with minimal syntax.
///
/// ```rust
/// use groqfmt::parser::{parse, ParseOptions};
/// use groqfmt::printer::print;
///
/// let tree = parse("*[ _type == 'movie' ] { title }", &ParseOptions::with_param_nodes()).unwrap();
/// let mut out = Vec::new();
/// print(&tree, &mut out).unwrap();
/// assert_eq!(String::from_utf8(out).unwrap(), r#"*[_type=="movie"]{title}"#);
/// ```
pub fn print(expr: &Expr, w: &mut dyn Write) -> Result<(), RenderError> {
    let mut state = CompactState::default();
    state.expr(expr)?;
    w.write_all(state.output.as_bytes())?;
    Ok(())
}

#[derive(Debug, Default)]
struct CompactState {
    output: String,
}

/// Two tokens that would lex as one if written back to back.
fn fuses(last: char, next: char) -> bool {
    let word = |c: char| c.is_ascii_alphanumeric() || c == '_';
    (word(last) && word(next))
        || matches!(
            (last, next),
            ('*', '*')
                | ('-', '>')
                | ('=', '>' | '=')
                | ('!' | '<' | '>', '=')
                | ('&', '&')
                | ('|', '|')
                | ('.', '.')
                | (':', ':')
                | ('/', '/')
        )
}

impl CompactState {
    fn write_token(&mut self, text: &str) {
        if let (Some(last), Some(next)) = (self.output.chars().last(), text.chars().next()) {
            if fuses(last, next) {
                self.output.push(' ');
            }
        }
        self.output.push_str(text);
    }

    fn expr(&mut self, expr: &Expr) -> Result<(), RenderError> {
        match expr {
            Expr::Everything => self.write_token("*"),
            Expr::This => self.write_token("@"),
            Expr::Parent(levels) => self.write_token(&vec!["^"; *levels].join(".")),
            Expr::Attribute(name) => self.write_token(identifier(name)?),
            Expr::Param(name) => self.write_token(&format!("${}", param_name(name)?)),
            Expr::Literal(lit) => self.literal(lit),
            Expr::Array(elements) => {
                self.write_token("[");
                self.elements(elements)?;
                self.write_token("]");
            }
            Expr::Object(attributes) => self.object(attributes)?,
            Expr::Group(inner) => {
                self.write_token("(");
                self.expr(inner)?;
                self.write_token(")");
            }
            Expr::Prefix { op, operand } => {
                self.write_token(op.as_str());
                self.expr(operand)?;
            }
            Expr::Binary { op, lhs, rhs } => {
                self.expr(lhs)?;
                if op.is_word() {
                    self.output.push(' ');
                    self.output.push_str(op.as_str());
                    self.output.push(' ');
                } else {
                    self.write_token(op.as_str());
                }
                self.expr(rhs)?;
            }
            Expr::Range {
                start,
                end,
                exclusive,
            } => {
                self.expr(start)?;
                self.write_token(if *exclusive { "..." } else { ".." });
                self.expr(end)?;
            }
            Expr::AccessAttribute { base, name } => {
                self.expr(base)?;
                self.write_token(".");
                self.write_token(identifier(name)?);
            }
            Expr::Element { base, index: inner }
            | Expr::Slice { base, range: inner }
            | Expr::Filter {
                base,
                condition: inner,
            } => {
                self.expr(base)?;
                self.write_token("[");
                self.expr(inner)?;
                self.write_token("]");
            }
            Expr::ArrayTraversal(base) => {
                self.expr(base)?;
                self.write_token("[]");
            }
            Expr::Dereference { base, name } => {
                self.expr(base)?;
                self.write_token("->");
                if let Some(name) = name {
                    self.write_token(identifier(name)?);
                }
            }
            Expr::Projection { base, attributes } => {
                self.expr(base)?;
                self.object(attributes)?;
            }
            Expr::FunctionCall(call) => self.call(call)?,
            Expr::Pipe { base, call } => {
                self.expr(base)?;
                self.write_token("|");
                self.call(call)?;
            }
            Expr::Ordering { expr, direction } => {
                self.expr(expr)?;
                self.output.push(' ');
                self.output.push_str(direction.as_str());
            }
        }
        Ok(())
    }

    fn literal(&mut self, lit: &Literal) {
        match lit {
            Literal::Null => self.write_token("null"),
            Literal::Boolean(true) => self.write_token("true"),
            Literal::Boolean(false) => self.write_token("false"),
            Literal::Number(n) => self.write_token(n),
            Literal::String(s) => self.write_token(&quote(s)),
        }
    }

    fn elements(&mut self, elements: &[ArrayElement]) -> Result<(), RenderError> {
        for (i, element) in elements.iter().enumerate() {
            if i > 0 {
                self.write_token(",");
            }
            if element.spread {
                self.write_token("...");
            }
            self.expr(&element.value)?;
        }
        Ok(())
    }

    fn object(&mut self, attributes: &[ObjectAttribute]) -> Result<(), RenderError> {
        self.write_token("{");
        for (i, attribute) in attributes.iter().enumerate() {
            if i > 0 {
                self.write_token(",");
            }
            match attribute {
                ObjectAttribute::Entry { key, value } => {
                    self.write_token(&quote(key));
                    self.write_token(":");
                    self.expr(value)?;
                }
                ObjectAttribute::Shorthand(value) => self.expr(value)?,
                ObjectAttribute::Splat(value) => {
                    self.write_token("...");
                    if let Some(value) = value {
                        self.expr(value)?;
                    }
                }
            }
        }
        self.write_token("}");
        Ok(())
    }

    fn call(&mut self, call: &FunctionCall) -> Result<(), RenderError> {
        if let Some(namespace) = &call.namespace {
            self.write_token(identifier(namespace)?);
            self.write_token("::");
        }
        self.write_token(identifier(&call.name)?);
        self.write_token("(");
        for (i, arg) in call.args.iter().enumerate() {
            if i > 0 {
                self.write_token(",");
            }
            self.expr(arg)?;
        }
        self.write_token(")");
        Ok(())
    }
}
