//! Layout documents for the pretty printer
//!
//! A small Wadler-style document algebra. A [`Doc::Group`] is printed on one
//! line when it fits in the remaining width, otherwise every [`Doc::Line`]
//! and [`Doc::SoftLine`] directly inside it becomes a newline.

#[derive(Clone, Debug, PartialEq)]
pub enum Doc {
    Text(String),
    /// A space when flat, a newline when broken
    Line,
    /// Nothing when flat, a newline when broken
    SoftLine,
    Concat(Vec<Doc>),
    Nest(usize, Box<Doc>),
    Group(Box<Doc>),
}

impl Doc {
    pub fn text(s: impl Into<String>) -> Doc {
        Doc::Text(s.into())
    }

    pub fn concat(docs: impl IntoIterator<Item = Doc>) -> Doc {
        Doc::Concat(docs.into_iter().collect())
    }

    pub fn nest(indent: usize, doc: Doc) -> Doc {
        Doc::Nest(indent, Box::new(doc))
    }

    pub fn group(doc: Doc) -> Doc {
        Doc::Group(Box::new(doc))
    }

    /// `docs` separated by `sep`.
    pub fn join(docs: impl IntoIterator<Item = Doc>, sep: Doc) -> Doc {
        let mut parts = Vec::new();
        for (i, doc) in docs.into_iter().enumerate() {
            if i > 0 {
                parts.push(sep.clone());
            }
            parts.push(doc);
        }
        Doc::Concat(parts)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Flat,
    Break,
}

type Command<'a> = (usize, Mode, &'a Doc);

/// Lay `doc` out within `width` columns.
pub fn render(doc: &Doc, width: usize) -> String {
    let mut out = String::new();
    let mut column = 0usize;
    let mut stack: Vec<Command> = vec![(0, Mode::Break, doc)];

    while let Some((indent, mode, doc)) = stack.pop() {
        match doc {
            Doc::Text(s) => {
                out.push_str(s);
                column += s.chars().count();
            }
            Doc::Line | Doc::SoftLine => match mode {
                Mode::Flat => {
                    if matches!(doc, Doc::Line) {
                        out.push(' ');
                        column += 1;
                    }
                }
                Mode::Break => {
                    out.push('\n');
                    out.push_str(&" ".repeat(indent));
                    column = indent;
                }
            },
            Doc::Concat(docs) => {
                stack.extend(docs.iter().rev().map(|d| (indent, mode, d)));
            }
            Doc::Nest(extra, inner) => stack.push((indent + extra, mode, inner.as_ref())),
            Doc::Group(inner) => {
                let flat = mode == Mode::Flat
                    || fits(
                        width.saturating_sub(column) as isize,
                        (indent, Mode::Flat, inner.as_ref()),
                        &stack,
                    );
                let mode = if flat { Mode::Flat } else { Mode::Break };
                stack.push((indent, mode, inner.as_ref()));
            }
        }
    }
    out
}

/// Whether `next`, followed by whatever is pending on `rest`, fits in `remaining`
/// columns up to the first line break.
fn fits(mut remaining: isize, next: Command, rest: &[Command]) -> bool {
    let mut pending = vec![next];
    let mut rest_index = rest.len();

    loop {
        let (indent, mode, doc) = match pending.pop() {
            Some(cmd) => cmd,
            None if rest_index > 0 => {
                rest_index -= 1;
                rest[rest_index]
            }
            None => return true,
        };
        match doc {
            Doc::Text(s) => remaining -= s.chars().count() as isize,
            Doc::Line | Doc::SoftLine => match mode {
                Mode::Break => return true,
                Mode::Flat => {
                    if matches!(doc, Doc::Line) {
                        remaining -= 1;
                    }
                }
            },
            Doc::Concat(docs) => pending.extend(docs.iter().rev().map(|d| (indent, mode, d))),
            Doc::Nest(extra, inner) => pending.push((indent + extra, mode, inner.as_ref())),
            Doc::Group(inner) => pending.push((indent, mode, inner.as_ref())),
        }
        if remaining < 0 {
            return false;
        }
    }
}
