//! Layout-aware renderer
//!
//! Builds a [`Doc`] from the syntax tree and lets [`doc::render`] decide
//! where lines break. Objects, arrays, filters and argument lists stay on one
//! line when they fit and are otherwise spread out with their contents
//! indented; `&&`/`||` chains break before each operator.

use super::doc::{self, Doc};
use super::{RenderError, identifier, param_name, quote};
use crate::ast::{ArrayElement, BinaryOp, Expr, FunctionCall, Literal, ObjectAttribute};
use std::io::Write;

/// Layout settings for [`pretty_print_with`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrettyOptions {
    /// Preferred maximum line width
    pub max_width: usize,
    /// Number of spaces per indentation level
    pub indent_width: usize,
}

impl Default for PrettyOptions {
    fn default() -> Self {
        Self {
            max_width: 80,
            indent_width: 2,
        }
    }
}

/// Render `expr` with the default [`PrettyOptions`].
pub fn pretty_print(expr: &Expr, w: &mut dyn Write) -> Result<(), RenderError> {
    pretty_print_with(expr, w, &PrettyOptions::default())
}

pub fn pretty_print_with(
    expr: &Expr,
    w: &mut dyn Write,
    opts: &PrettyOptions,
) -> Result<(), RenderError> {
    let builder = DocBuilder {
        indent: opts.indent_width,
    };
    let doc = builder.expr(expr)?;
    w.write_all(doc::render(&doc, opts.max_width).as_bytes())?;
    Ok(())
}

struct DocBuilder {
    indent: usize,
}

fn text(s: impl Into<String>) -> Doc {
    Doc::text(s)
}

impl DocBuilder {
    fn expr(&self, expr: &Expr) -> Result<Doc, RenderError> {
        Ok(match expr {
            Expr::Everything => text("*"),
            Expr::This => text("@"),
            Expr::Parent(levels) => text(vec!["^"; *levels].join(".")),
            Expr::Attribute(name) => text(identifier(name)?),
            Expr::Param(name) => text(format!("${}", param_name(name)?)),
            Expr::Literal(lit) => text(literal(lit)),
            Expr::Array(elements) => self.array(elements)?,
            Expr::Object(attributes) => self.object(attributes)?,
            Expr::Group(inner) => Doc::concat([text("("), self.expr(inner)?, text(")")]),
            Expr::Prefix { op, operand } => Doc::concat([text(op.as_str()), self.expr(operand)?]),
            Expr::Binary {
                op: op @ (BinaryOp::And | BinaryOp::Or),
                ..
            } => self.logical_chain(*op, expr)?,
            Expr::Binary { op, lhs, rhs } => Doc::concat([
                self.expr(lhs)?,
                text(format!(" {} ", op.as_str())),
                self.expr(rhs)?,
            ]),
            Expr::Range {
                start,
                end,
                exclusive,
            } => Doc::concat([
                self.expr(start)?,
                text(if *exclusive { "..." } else { ".." }),
                self.expr(end)?,
            ]),
            Expr::AccessAttribute { base, name } => {
                Doc::concat([self.expr(base)?, text(format!(".{}", identifier(name)?))])
            }
            Expr::Element { base, index: inner } | Expr::Slice { base, range: inner } => {
                Doc::concat([self.expr(base)?, text("["), self.expr(inner)?, text("]")])
            }
            Expr::Filter { base, condition } => Doc::concat([
                self.expr(base)?,
                Doc::group(Doc::concat([
                    text("["),
                    Doc::nest(
                        self.indent,
                        Doc::concat([Doc::SoftLine, self.expr(condition)?]),
                    ),
                    Doc::SoftLine,
                    text("]"),
                ])),
            ]),
            Expr::ArrayTraversal(base) => Doc::concat([self.expr(base)?, text("[]")]),
            Expr::Dereference { base, name } => {
                let arrow = match name {
                    Some(name) => format!("->{}", identifier(name)?),
                    None => "->".to_string(),
                };
                Doc::concat([self.expr(base)?, text(arrow)])
            }
            Expr::Projection { base, attributes } => {
                Doc::concat([self.expr(base)?, text(" "), self.object(attributes)?])
            }
            Expr::FunctionCall(call) => self.call(call)?,
            Expr::Pipe { base, call } => {
                Doc::concat([self.expr(base)?, text(" | "), self.call(call)?])
            }
            Expr::Ordering { expr, direction } => {
                Doc::concat([self.expr(expr)?, text(format!(" {}", direction.as_str()))])
            }
        })
    }

    /// `a && b && c` as one group, breaking before every operator.
    fn logical_chain(&self, op: BinaryOp, expr: &Expr) -> Result<Doc, RenderError> {
        let mut operands = Vec::new();
        let mut current = expr;
        while let Expr::Binary { op: inner, lhs, rhs } = current {
            if *inner != op {
                break;
            }
            operands.push(rhs.as_ref());
            current = lhs.as_ref();
        }
        operands.push(current);
        operands.reverse();

        let mut parts = Vec::with_capacity(operands.len() * 3);
        for (i, operand) in operands.into_iter().enumerate() {
            if i > 0 {
                parts.push(Doc::Line);
                parts.push(text(format!("{} ", op.as_str())));
            }
            parts.push(self.expr(operand)?);
        }
        Ok(Doc::group(Doc::Concat(parts)))
    }

    /// `open items close`, flat as `open item, item close` when it fits.
    fn bracketed(&self, open: &str, items: Vec<Doc>, close: &str, padding: Doc) -> Doc {
        if items.is_empty() {
            return text(format!("{open}{close}"));
        }
        Doc::group(Doc::concat([
            text(open),
            Doc::nest(
                self.indent,
                Doc::concat([
                    padding.clone(),
                    Doc::join(items, Doc::concat([text(","), Doc::Line])),
                ]),
            ),
            padding,
            text(close),
        ]))
    }

    fn array(&self, elements: &[ArrayElement]) -> Result<Doc, RenderError> {
        let items = elements
            .iter()
            .map(|element| {
                let value = self.expr(&element.value)?;
                Ok(if element.spread {
                    Doc::concat([text("..."), value])
                } else {
                    value
                })
            })
            .collect::<Result<Vec<_>, RenderError>>()?;
        Ok(self.bracketed("[", items, "]", Doc::SoftLine))
    }

    fn object(&self, attributes: &[ObjectAttribute]) -> Result<Doc, RenderError> {
        let items = attributes
            .iter()
            .map(|attribute| {
                Ok(match attribute {
                    ObjectAttribute::Entry { key, value } => {
                        Doc::concat([text(format!("{}: ", quote(key))), self.expr(value)?])
                    }
                    ObjectAttribute::Shorthand(value) => self.expr(value)?,
                    ObjectAttribute::Splat(None) => text("..."),
                    ObjectAttribute::Splat(Some(value)) => {
                        Doc::concat([text("..."), self.expr(value)?])
                    }
                })
            })
            .collect::<Result<Vec<_>, RenderError>>()?;
        Ok(self.bracketed("{", items, "}", Doc::Line))
    }

    fn call(&self, call: &FunctionCall) -> Result<Doc, RenderError> {
        let name = match &call.namespace {
            Some(namespace) => format!("{}::{}", identifier(namespace)?, identifier(&call.name)?),
            None => identifier(&call.name)?.to_string(),
        };
        let args = call
            .args
            .iter()
            .map(|arg| self.expr(arg))
            .collect::<Result<Vec<_>, RenderError>>()?;
        Ok(Doc::concat([
            text(name),
            self.bracketed("(", args, ")", Doc::SoftLine),
        ]))
    }
}

fn literal(lit: &Literal) -> String {
    match lit {
        Literal::Null => "null".to_string(),
        Literal::Boolean(b) => b.to_string(),
        Literal::Number(n) => n.clone(),
        Literal::String(s) => quote(s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{ParseOptions, parse};

    fn pretty_with(src: &str, opts: &PrettyOptions) -> String {
        let tree = parse(src, &ParseOptions::with_param_nodes()).unwrap();
        let mut out = Vec::new();
        pretty_print_with(&tree, &mut out, opts).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn pretty(src: &str) -> String {
        pretty_with(src, &PrettyOptions::default())
    }

    #[test]
    fn short_query_stays_on_one_line() {
        assert_eq!(
            pretty(r#"*[_type=="movie"]{title,year}"#),
            r#"*[_type == "movie"] { title, year }"#
        );
    }

    #[test]
    fn long_projection_breaks_with_indentation() {
        let src = r#"*[_type=="movie"&&releaseYear>=1990]{title,releaseYear,"director":director->name,"cast":castMembers[].person->name}"#;
        let expected = r#"*[_type == "movie" && releaseYear >= 1990] {
  title,
  releaseYear,
  "director": director->name,
  "cast": castMembers[].person->name
}"#;
        assert_eq!(pretty(src), expected);
    }

    #[test]
    fn long_filter_breaks_before_logical_operators() {
        let opts = PrettyOptions {
            max_width: 40,
            indent_width: 2,
        };
        let src = r#"*[_type == "post" && defined(slug.current) && !(_id in path("drafts.**"))]"#;
        let expected = r#"*[
  _type == "post"
  && defined(slug.current)
  && !(_id in path("drafts.**"))
]"#;
        assert_eq!(pretty_with(src, &opts), expected);
    }

    #[test]
    fn indent_width_is_configurable() {
        let opts = PrettyOptions {
            max_width: 10,
            indent_width: 4,
        };
        assert_eq!(
            pretty_with("[alpha, beta]", &opts),
            "[\n    alpha,\n    beta\n]"
        );
    }

    #[test]
    fn operators_pipes_and_literals() {
        assert_eq!(
            pretty("*[]|order(date desc)[0...10]{...,'n':count(tags)*2}"),
            r#"*[] | order(date desc)[0...10] { ..., "n": count(tags) * 2 }"#
        );
        assert_eq!(pretty("[]"), "[]");
        assert_eq!(pretty("{}"), "{}");
        assert_eq!(pretty("select(a=>1,null)"), "select(a => 1, null)");
        assert_eq!(pretty("$slug"), "$slug");
    }

    #[test]
    fn reformatting_is_a_fixed_point() {
        for src in [
            r#"*[_type=="movie"&&releaseYear>=1990]{title,releaseYear,"director":director->name,"cast":castMembers[].person->name}"#,
            "*[_type == 'post' && defined(slug.current) && publishedAt < now() && !(_id in path('drafts.**'))] | order(publishedAt desc)[0...20]{_id, title, 'slug': slug.current, 'author': author->{name, 'image': image.asset->url}, 'categories': categories[]->title}",
            "count(*[_type in ['a', 'b', 'c']]) + math::sum(*[_type == 'order'].total) ** 2",
        ] {
            let once = pretty(src);
            assert_eq!(pretty(&once), once);
        }
    }

    #[test]
    fn keyword_attribute_is_a_render_error() {
        let tree = Expr::Attribute("match".to_string());
        let mut out = Vec::new();
        assert!(matches!(
            pretty_print(&tree, &mut out),
            Err(RenderError::InvalidIdentifier(name)) if name == "match"
        ));
    }
}
