//! Abstract syntax tree for GROQ queries
//!
//! The tree is produced by [`crate::parser::parse`] and consumed by the
//! renderers in [`crate::printer`]. Parentheses written in the source are kept
//! as [`Expr::Group`] so that rendering never has to reinvent them.

/// A GROQ expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// `*`, every document in the dataset
    Everything,
    /// `@`, the current scope value
    This,
    /// `^`, `^.^`, ... The count is the number of levels walked up.
    Parent(usize),
    /// A bare attribute lookup in the current scope, e.g. `title`
    Attribute(String),
    /// `$name` kept as a placeholder node
    Param(String),
    Literal(Literal),
    Array(Vec<ArrayElement>),
    Object(Vec<ObjectAttribute>),
    /// `( expr )`
    Group(Box<Expr>),
    Prefix {
        op: PrefixOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// `a..b` or `a...b`
    Range {
        start: Box<Expr>,
        end: Box<Expr>,
        exclusive: bool,
    },
    /// `base.name`
    AccessAttribute {
        base: Box<Expr>,
        name: String,
    },
    /// `base[0]`
    Element {
        base: Box<Expr>,
        index: Box<Expr>,
    },
    /// `base[0..3]`; `range` is always an [`Expr::Range`]
    Slice {
        base: Box<Expr>,
        range: Box<Expr>,
    },
    /// `base[condition]`
    Filter {
        base: Box<Expr>,
        condition: Box<Expr>,
    },
    /// `base[]`
    ArrayTraversal(Box<Expr>),
    /// `base->` or `base->name`
    Dereference {
        base: Box<Expr>,
        name: Option<String>,
    },
    /// `base{ ... }`
    Projection {
        base: Box<Expr>,
        attributes: Vec<ObjectAttribute>,
    },
    FunctionCall(FunctionCall),
    /// `base | order(...)`
    Pipe {
        base: Box<Expr>,
        call: FunctionCall,
    },
    /// `expr asc` / `expr desc`, only meaningful inside `order(...)`
    Ordering {
        expr: Box<Expr>,
        direction: Direction,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Null,
    Boolean(bool),
    /// Numbers keep their source spelling so reformatting never changes them.
    Number(String),
    String(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ArrayElement {
    pub spread: bool,
    pub value: Expr,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ObjectAttribute {
    /// `"key": value`
    Entry { key: String, value: Expr },
    /// `title`, `author->name`, `defined(x) => {...}`
    Shorthand(Expr),
    /// `...` or `...expr`
    Splat(Option<Expr>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionCall {
    pub namespace: Option<String>,
    pub name: String,
    pub args: Vec<Expr>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrefixOp {
    Not,
    Neg,
    Pos,
}

impl PrefixOp {
    pub fn as_str(self) -> &'static str {
        match self {
            PrefixOp::Not => "!",
            PrefixOp::Neg => "-",
            PrefixOp::Pos => "+",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Pair,
    Or,
    And,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    In,
    Match,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
}

impl BinaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Pair => "=>",
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::In => "in",
            BinaryOp::Match => "match",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Pow => "**",
        }
    }

    /// Operators spelled as words need surrounding whitespace even in compact output.
    pub fn is_word(self) -> bool {
        matches!(self, BinaryOp::In | BinaryOp::Match)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

/// Whether `name` can be written as a bare GROQ identifier.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
