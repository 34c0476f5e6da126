//! GROQ parser
//!
//! A Pratt parser over the tokens produced by [`crate::lexer`]. Operator
//! precedence, from loosest to tightest:
//!
//! | operators                              | associativity |
//! |----------------------------------------|---------------|
//! | `asc` `desc` (postfix)                 | left          |
//! | `=>`                                   | right         |
//! | `\|\|`                                 | left          |
//! | `&&`                                   | left          |
//! | `==` `!=` `<` `<=` `>` `>=` `in` `match` | none        |
//! | `..` `...`                             | none          |
//! | `+` `-`                                | left          |
//! | `*` `/` `%`                            | left          |
//! | prefix `-`                             |               |
//! | `**`                                   | right         |
//! | prefix `!` `+`                         |               |
//! | `.a` `[]` `[x]` `->` `{}` `\| f()`     | left          |
//!
//! # Example
//!
//! ```rust
//! use groqfmt::ast::Expr;
//! use groqfmt::parser::{parse, ParseOptions};
//!
//! let opts = ParseOptions::with_param_nodes();
//! let tree = parse("*[slug.current == $slug][0]", &opts).unwrap();
//! assert!(matches!(tree, Expr::Element { .. }));
//! ```

use crate::ast::{
    ArrayElement, BinaryOp, Direction, Expr, FunctionCall, Literal, ObjectAttribute, PrefixOp,
};
use crate::lexer::{Keyword, Token, TokenKind, tokenize};
use std::collections::BTreeMap;
use thiserror::Error;

/// A syntax error with the position it was detected at.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at line {line}, column {column}")]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl ParseError {
    /// Build an error for the byte `offset` into `src`. Columns count characters, from 1.
    pub fn at(src: &str, offset: usize, message: impl Into<String>) -> Self {
        let offset = offset.min(src.len());
        let before = src.get(..offset).unwrap_or(src);
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before[line_start..].chars().count() + 1;
        Self {
            message: message.into(),
            line,
            column,
        }
    }
}

/// Options controlling how the parser treats `$parameters`.
#[derive(Clone, Debug, Default)]
pub struct ParseOptions {
    /// Keep parameters as [`Expr::Param`] placeholder nodes.
    pub param_nodes: bool,
    /// Values substituted for parameters when `param_nodes` is off.
    pub params: BTreeMap<String, Expr>,
}

impl ParseOptions {
    pub fn with_param_nodes() -> Self {
        Self {
            param_nodes: true,
            params: BTreeMap::new(),
        }
    }
}

/// Parse a complete GROQ query.
///
/// The whole input must form exactly one expression; anything left over is an
/// error, as is an empty document.
pub fn parse(source: &str, opts: &ParseOptions) -> Result<Expr, ParseError> {
    let tokens = tokenize(source)?;
    let mut parser = Parser {
        src: source,
        tokens,
        pos: 0,
        opts,
        depth: 0,
    };
    let expr = parser.expr(0)?;
    if parser.peek() != &TokenKind::Eof {
        return Err(parser.unexpected("end of query"));
    }
    Ok(expr)
}

struct Parser<'a> {
    src: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    opts: &'a ParseOptions,
    /// Nesting of the node being built: one per open expression and one per
    /// operator or postfix link wrapped around it.
    depth: usize,
}

/// Deepest tree the parser builds. Both renderers recurse over the tree, so
/// anything deeper is rejected instead of exhausting the stack.
pub const MAX_DEPTH: usize = 128;

// Binding powers; larger binds tighter.
const BP_ORDERING: u8 = 1;
const BP_PAIR: u8 = 3;
const BP_OR: u8 = 4;
const BP_AND: u8 = 6;
const BP_COMPARE: u8 = 8;
const BP_RANGE: u8 = 10;
const BP_ADD: u8 = 12;
const BP_MUL: u8 = 14;
const BP_NEG: u8 = 16;
const BP_POW: u8 = 19;
const BP_NOT: u8 = 20;

enum Infix {
    Binary(BinaryOp),
    Range { exclusive: bool },
    Ordering(Direction),
}

impl Infix {
    fn of(kind: &TokenKind) -> Option<Self> {
        Some(match kind {
            TokenKind::FatArrow => Infix::Binary(BinaryOp::Pair),
            TokenKind::OrOr => Infix::Binary(BinaryOp::Or),
            TokenKind::AndAnd => Infix::Binary(BinaryOp::And),
            TokenKind::EqEq => Infix::Binary(BinaryOp::Eq),
            TokenKind::NotEq => Infix::Binary(BinaryOp::NotEq),
            TokenKind::Lt => Infix::Binary(BinaryOp::Lt),
            TokenKind::LtEq => Infix::Binary(BinaryOp::LtEq),
            TokenKind::Gt => Infix::Binary(BinaryOp::Gt),
            TokenKind::GtEq => Infix::Binary(BinaryOp::GtEq),
            TokenKind::Keyword(Keyword::In) => Infix::Binary(BinaryOp::In),
            TokenKind::Keyword(Keyword::Match) => Infix::Binary(BinaryOp::Match),
            TokenKind::Plus => Infix::Binary(BinaryOp::Add),
            TokenKind::Minus => Infix::Binary(BinaryOp::Sub),
            TokenKind::Star => Infix::Binary(BinaryOp::Mul),
            TokenKind::Slash => Infix::Binary(BinaryOp::Div),
            TokenKind::Percent => Infix::Binary(BinaryOp::Rem),
            TokenKind::StarStar => Infix::Binary(BinaryOp::Pow),
            TokenKind::DotDot => Infix::Range { exclusive: false },
            TokenKind::Ellipsis => Infix::Range { exclusive: true },
            TokenKind::Keyword(Keyword::Asc) => Infix::Ordering(Direction::Asc),
            TokenKind::Keyword(Keyword::Desc) => Infix::Ordering(Direction::Desc),
            _ => return None,
        })
    }

    /// Left and right binding power. Orderings are postfix and never use the right one.
    fn binding_power(&self) -> (u8, u8) {
        match self {
            Infix::Ordering(_) => (BP_ORDERING, BP_ORDERING),
            Infix::Range { .. } => (BP_RANGE, BP_RANGE + 1),
            Infix::Binary(op) => match op {
                BinaryOp::Pair => (BP_PAIR, BP_PAIR),
                BinaryOp::Or => (BP_OR, BP_OR + 1),
                BinaryOp::And => (BP_AND, BP_AND + 1),
                BinaryOp::Eq
                | BinaryOp::NotEq
                | BinaryOp::Lt
                | BinaryOp::LtEq
                | BinaryOp::Gt
                | BinaryOp::GtEq
                | BinaryOp::In
                | BinaryOp::Match => (BP_COMPARE, BP_COMPARE + 1),
                BinaryOp::Add | BinaryOp::Sub => (BP_ADD, BP_ADD + 1),
                BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => (BP_MUL, BP_MUL + 1),
                BinaryOp::Pow => (BP_POW, BP_POW - 1),
            },
        }
    }

    fn non_associative(&self) -> bool {
        self.binding_power().0 == BP_COMPARE || matches!(self, Infix::Range { .. })
    }
}

impl Parser<'_> {
    fn peek(&self) -> &TokenKind {
        &self.tokens[self.pos].kind
    }

    fn peek_at(&self, ahead: usize) -> &TokenKind {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + ahead).min(last)].kind
    }

    fn offset(&self) -> usize {
        self.tokens[self.pos].offset
    }

    fn advance(&mut self) -> TokenKind {
        let kind = self.tokens[self.pos].kind.clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        kind
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek() == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::at(self.src, self.offset(), message)
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        self.error(format!(
            "expected {expected}, found {}",
            self.peek().describe()
        ))
    }

    fn expect(&mut self, kind: &TokenKind, expected: &str) -> Result<(), ParseError> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn identifier(&mut self, expected: &str) -> Result<String, ParseError> {
        match self.peek() {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected(expected)),
        }
    }

    /// Go one level deeper into the tree being built.
    fn descend(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(self.error("query is nested too deeply"));
        }
        Ok(())
    }

    fn expr(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let depth = self.depth;
        self.descend()?;
        let expr = self.operators(min_bp);
        self.depth = depth;
        expr
    }

    fn operators(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let mut lhs = self.prefix()?;
        let mut last_non_assoc: Option<u8> = None;

        while let Some(infix) = Infix::of(self.peek()) {
            let (lbp, rbp) = infix.binding_power();
            if lbp < min_bp {
                break;
            }
            if infix.non_associative() && last_non_assoc == Some(lbp) {
                return Err(self.error(format!(
                    "operator {} cannot be chained without parentheses",
                    self.peek().describe()
                )));
            }
            self.descend()?;
            self.advance();

            lhs = match infix {
                Infix::Ordering(direction) => Expr::Ordering {
                    expr: Box::new(lhs),
                    direction,
                },
                Infix::Range { exclusive } => Expr::Range {
                    start: Box::new(lhs),
                    end: Box::new(self.expr(rbp)?),
                    exclusive,
                },
                Infix::Binary(op) => Expr::Binary {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(self.expr(rbp)?),
                },
            };
            last_non_assoc = (lbp == BP_COMPARE || lbp == BP_RANGE).then_some(lbp);
        }
        Ok(lhs)
    }

    fn prefix(&mut self) -> Result<Expr, ParseError> {
        let op = match self.peek() {
            TokenKind::Bang => Some((PrefixOp::Not, BP_NOT)),
            TokenKind::Plus => Some((PrefixOp::Pos, BP_NOT)),
            TokenKind::Minus => Some((PrefixOp::Neg, BP_NEG)),
            _ => None,
        };
        match op {
            Some((op, bp)) => {
                self.advance();
                let operand = self.expr(bp)?;
                Ok(Expr::Prefix {
                    op,
                    operand: Box::new(operand),
                })
            }
            None => {
                let primary = self.primary()?;
                self.postfix(primary)
            }
        }
    }

    fn postfix(&mut self, mut base: Expr) -> Result<Expr, ParseError> {
        loop {
            base = match self.peek() {
                TokenKind::Dot => {
                    self.descend()?;
                    self.advance();
                    let name = self.identifier("attribute name after '.'")?;
                    Expr::AccessAttribute {
                        base: Box::new(base),
                        name,
                    }
                }
                TokenKind::LBracket => {
                    self.descend()?;
                    self.advance();
                    if self.eat(&TokenKind::RBracket) {
                        Expr::ArrayTraversal(Box::new(base))
                    } else {
                        let inner = self.expr(0)?;
                        self.expect(&TokenKind::RBracket, "']'")?;
                        subscript(base, inner)
                    }
                }
                TokenKind::Arrow => {
                    self.descend()?;
                    self.advance();
                    let name = match self.peek() {
                        TokenKind::Ident(name) => {
                            let name = name.clone();
                            self.advance();
                            Some(name)
                        }
                        _ => None,
                    };
                    Expr::Dereference {
                        base: Box::new(base),
                        name,
                    }
                }
                TokenKind::LBrace => {
                    self.descend()?;
                    Expr::Projection {
                        base: Box::new(base),
                        attributes: self.object_body()?,
                    }
                }
                TokenKind::Pipe => {
                    self.descend()?;
                    self.advance();
                    if self.peek() == &TokenKind::LBrace {
                        Expr::Projection {
                            base: Box::new(base),
                            attributes: self.object_body()?,
                        }
                    } else {
                        let call = self.function_call()?;
                        Expr::Pipe {
                            base: Box::new(base),
                            call,
                        }
                    }
                }
                _ => return Ok(base),
            };
        }
    }

    fn primary(&mut self) -> Result<Expr, ParseError> {
        match self.peek().clone() {
            TokenKind::Star => {
                self.advance();
                Ok(Expr::Everything)
            }
            TokenKind::At => {
                self.advance();
                Ok(Expr::This)
            }
            TokenKind::Caret => {
                self.advance();
                let mut levels = 1;
                while self.peek() == &TokenKind::Dot && self.peek_at(1) == &TokenKind::Caret {
                    self.advance();
                    self.advance();
                    levels += 1;
                }
                Ok(Expr::Parent(levels))
            }
            TokenKind::Param(name) => {
                let offset = self.offset();
                self.advance();
                if self.opts.param_nodes {
                    return Ok(Expr::Param(name));
                }
                match self.opts.params.get(&name) {
                    Some(value) => Ok(value.clone()),
                    None => {
                        let message = format!("parameter ${name} is not defined");
                        Err(ParseError::at(self.src, offset, message))
                    }
                }
            }
            TokenKind::Number(n) => {
                self.advance();
                Ok(Expr::Literal(Literal::Number(n)))
            }
            TokenKind::Str(s) => {
                self.advance();
                Ok(Expr::Literal(Literal::String(s)))
            }
            TokenKind::Keyword(Keyword::True) => {
                self.advance();
                Ok(Expr::Literal(Literal::Boolean(true)))
            }
            TokenKind::Keyword(Keyword::False) => {
                self.advance();
                Ok(Expr::Literal(Literal::Boolean(false)))
            }
            TokenKind::Keyword(Keyword::Null) => {
                self.advance();
                Ok(Expr::Literal(Literal::Null))
            }
            TokenKind::Ident(name) => {
                if matches!(self.peek_at(1), TokenKind::LParen | TokenKind::ColonColon) {
                    return Ok(Expr::FunctionCall(self.function_call()?));
                }
                self.advance();
                Ok(Expr::Attribute(name))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.expr(0)?;
                self.expect(&TokenKind::RParen, "')'")?;
                Ok(Expr::Group(Box::new(inner)))
            }
            TokenKind::LBracket => self.array(),
            TokenKind::LBrace => Ok(Expr::Object(self.object_body()?)),
            _ => Err(self.unexpected("expression")),
        }
    }

    fn function_call(&mut self) -> Result<FunctionCall, ParseError> {
        let first = self.identifier("function name")?;
        let (namespace, name) = if self.eat(&TokenKind::ColonColon) {
            (Some(first), self.identifier("function name after '::'")?)
        } else {
            (None, first)
        };
        self.expect(&TokenKind::LParen, "'('")?;
        let args = self.comma_separated(&TokenKind::RParen, |p| p.expr(0))?;
        Ok(FunctionCall {
            namespace,
            name,
            args,
        })
    }

    fn array(&mut self) -> Result<Expr, ParseError> {
        self.expect(&TokenKind::LBracket, "'['")?;
        let elements = self.comma_separated(&TokenKind::RBracket, |p| {
            let spread = p.eat(&TokenKind::Ellipsis);
            Ok(ArrayElement {
                spread,
                value: p.expr(0)?,
            })
        })?;
        Ok(Expr::Array(elements))
    }

    fn object_body(&mut self) -> Result<Vec<ObjectAttribute>, ParseError> {
        self.expect(&TokenKind::LBrace, "'{'")?;
        self.comma_separated(&TokenKind::RBrace, |p| {
            if p.eat(&TokenKind::Ellipsis) {
                if matches!(p.peek(), TokenKind::Comma | TokenKind::RBrace) {
                    return Ok(ObjectAttribute::Splat(None));
                }
                return Ok(ObjectAttribute::Splat(Some(p.expr(0)?)));
            }
            if let (TokenKind::Str(key), TokenKind::Colon) = (p.peek(), p.peek_at(1)) {
                let key = key.clone();
                p.advance();
                p.advance();
                return Ok(ObjectAttribute::Entry {
                    key,
                    value: p.expr(0)?,
                });
            }
            Ok(ObjectAttribute::Shorthand(p.expr(0)?))
        })
    }

    /// Items up to `close`, allowing a trailing comma. Consumes `close`.
    fn comma_separated<T>(
        &mut self,
        close: &TokenKind,
        mut item: impl FnMut(&mut Self) -> Result<T, ParseError>,
    ) -> Result<Vec<T>, ParseError> {
        let mut items = Vec::new();
        loop {
            if self.eat(close) {
                return Ok(items);
            }
            items.push(item(self)?);
            if !self.eat(&TokenKind::Comma) {
                let closing = format!("',' or {}", close.describe());
                self.expect(close, &closing)?;
                return Ok(items);
            }
        }
    }
}

fn subscript(base: Expr, inner: Expr) -> Expr {
    let base = Box::new(base);
    let is_index = match &inner {
        Expr::Literal(Literal::Number(_)) => true,
        Expr::Prefix {
            op: PrefixOp::Neg,
            operand,
        } => matches!(**operand, Expr::Literal(Literal::Number(_))),
        _ => false,
    };
    if matches!(inner, Expr::Range { .. }) {
        Expr::Slice {
            base,
            range: Box::new(inner),
        }
    } else if is_index {
        Expr::Element {
            base,
            index: Box::new(inner),
        }
    } else {
        Expr::Filter {
            base,
            condition: Box::new(inner),
        }
    }
}
