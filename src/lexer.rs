//! Tokenizer for GROQ source text
//!
//! Whitespace and `//` comments are discarded. Every token remembers the
//! byte offset it started at so the parser can report line and column.

use crate::parser::ParseError;
use once_cell::sync::Lazy;
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Keyword {
    True,
    False,
    Null,
    In,
    Match,
    Asc,
    Desc,
}

/// Reserved words of the language, which can never be used as bare attributes.
pub static KEYWORDS: Lazy<HashMap<&'static str, Keyword>> = Lazy::new(|| {
    HashMap::from([
        ("true", Keyword::True),
        ("false", Keyword::False),
        ("null", Keyword::Null),
        ("in", Keyword::In),
        ("match", Keyword::Match),
        ("asc", Keyword::Asc),
        ("desc", Keyword::Desc),
    ])
});

pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains_key(word)
}

#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    Ident(String),
    Keyword(Keyword),
    Param(String),
    Number(String),
    Str(String),
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    LParen,
    RParen,
    Comma,
    Colon,
    ColonColon,
    Dot,
    DotDot,
    Ellipsis,
    Arrow,
    FatArrow,
    EqEq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    AndAnd,
    OrOr,
    Bang,
    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    Percent,
    Pipe,
    At,
    Caret,
    Eof,
}

impl TokenKind {
    /// Human readable form used in parse error messages.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Ident(name) => format!("identifier '{name}'"),
            TokenKind::Keyword(kw) => {
                let word = KEYWORDS
                    .iter()
                    .find(|(_, k)| *k == kw)
                    .map(|(w, _)| *w)
                    .unwrap_or("keyword");
                format!("'{word}'")
            }
            TokenKind::Param(name) => format!("parameter '${name}'"),
            TokenKind::Number(n) => format!("number {n}"),
            TokenKind::Str(_) => "string".to_string(),
            TokenKind::Eof => "end of input".to_string(),
            other => format!("'{}'", other.punct()),
        }
    }

    fn punct(&self) -> &'static str {
        match self {
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::Comma => ",",
            TokenKind::Colon => ":",
            TokenKind::ColonColon => "::",
            TokenKind::Dot => ".",
            TokenKind::DotDot => "..",
            TokenKind::Ellipsis => "...",
            TokenKind::Arrow => "->",
            TokenKind::FatArrow => "=>",
            TokenKind::EqEq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Lt => "<",
            TokenKind::LtEq => "<=",
            TokenKind::Gt => ">",
            TokenKind::GtEq => ">=",
            TokenKind::AndAnd => "&&",
            TokenKind::OrOr => "||",
            TokenKind::Bang => "!",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::StarStar => "**",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Pipe => "|",
            TokenKind::At => "@",
            TokenKind::Caret => "^",
            _ => "",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub offset: usize,
}

struct Lexer<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

/// Split `src` into tokens, always ending with [`TokenKind::Eof`].
pub fn tokenize(src: &str) -> Result<Vec<Token>, ParseError> {
    let mut lexer = Lexer {
        src,
        bytes: src.as_bytes(),
        pos: 0,
    };
    let mut tokens = Vec::new();
    loop {
        lexer.skip_trivia();
        let offset = lexer.pos;
        let kind = lexer.next_kind()?;
        let done = kind == TokenKind::Eof;
        tokens.push(Token { kind, offset });
        if done {
            return Ok(tokens);
        }
    }
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

impl Lexer<'_> {
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.pos + ahead).copied()
    }

    fn error(&self, offset: usize, message: impl Into<String>) -> ParseError {
        ParseError::at(self.src, offset, message)
    }

    fn skip_trivia(&mut self) {
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() {
                self.pos += 1;
            } else if b == b'/' && self.peek_at(1) == Some(b'/') {
                while let Some(b) = self.peek() {
                    if b == b'\n' {
                        break;
                    }
                    self.pos += 1;
                }
            } else {
                break;
            }
        }
    }

    fn next_kind(&mut self) -> Result<TokenKind, ParseError> {
        let Some(b) = self.peek() else {
            return Ok(TokenKind::Eof);
        };
        let start = self.pos;

        if is_ident_start(b) {
            let word = self.take_while(is_ident_continue);
            return Ok(match KEYWORDS.get(word) {
                Some(kw) => TokenKind::Keyword(*kw),
                None => TokenKind::Ident(word.to_string()),
            });
        }
        if b.is_ascii_digit() {
            return self.number();
        }
        if b == b'"' || b == b'\'' {
            return self.string(b);
        }
        if b == b'$' {
            self.pos += 1;
            if !self.peek().is_some_and(is_ident_start) {
                return Err(self.error(start, "expected parameter name after '$'"));
            }
            let name = self.take_while(is_ident_continue);
            return Ok(TokenKind::Param(name.to_string()));
        }

        let two = (b, self.peek_at(1));
        let (kind, len) = match two {
            (b'.', Some(b'.')) if self.peek_at(2) == Some(b'.') => (TokenKind::Ellipsis, 3),
            (b'.', Some(b'.')) => (TokenKind::DotDot, 2),
            (b':', Some(b':')) => (TokenKind::ColonColon, 2),
            (b'-', Some(b'>')) => (TokenKind::Arrow, 2),
            (b'=', Some(b'>')) => (TokenKind::FatArrow, 2),
            (b'=', Some(b'=')) => (TokenKind::EqEq, 2),
            (b'!', Some(b'=')) => (TokenKind::NotEq, 2),
            (b'<', Some(b'=')) => (TokenKind::LtEq, 2),
            (b'>', Some(b'=')) => (TokenKind::GtEq, 2),
            (b'&', Some(b'&')) => (TokenKind::AndAnd, 2),
            (b'|', Some(b'|')) => (TokenKind::OrOr, 2),
            (b'*', Some(b'*')) => (TokenKind::StarStar, 2),
            (b'{', _) => (TokenKind::LBrace, 1),
            (b'}', _) => (TokenKind::RBrace, 1),
            (b'[', _) => (TokenKind::LBracket, 1),
            (b']', _) => (TokenKind::RBracket, 1),
            (b'(', _) => (TokenKind::LParen, 1),
            (b')', _) => (TokenKind::RParen, 1),
            (b',', _) => (TokenKind::Comma, 1),
            (b':', _) => (TokenKind::Colon, 1),
            (b'.', _) => (TokenKind::Dot, 1),
            (b'<', _) => (TokenKind::Lt, 1),
            (b'>', _) => (TokenKind::Gt, 1),
            (b'!', _) => (TokenKind::Bang, 1),
            (b'+', _) => (TokenKind::Plus, 1),
            (b'-', _) => (TokenKind::Minus, 1),
            (b'*', _) => (TokenKind::Star, 1),
            (b'/', _) => (TokenKind::Slash, 1),
            (b'%', _) => (TokenKind::Percent, 1),
            (b'|', _) => (TokenKind::Pipe, 1),
            (b'@', _) => (TokenKind::At, 1),
            (b'^', _) => (TokenKind::Caret, 1),
            _ => {
                let ch = self.src[start..].chars().next().unwrap_or('?');
                return Err(self.error(start, format!("unexpected character {ch:?}")));
            }
        };
        self.pos += len;
        Ok(kind)
    }

    fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &str {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.pos += 1;
        }
        &self.src[start..self.pos]
    }

    fn number(&mut self) -> Result<TokenKind, ParseError> {
        let start = self.pos;
        self.take_while(|b| b.is_ascii_digit());
        // `1..2` is a range, not the float `1.`
        if self.peek() == Some(b'.') && self.peek_at(1).is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
            self.take_while(|b| b.is_ascii_digit());
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            let mark = self.pos;
            self.pos += 1;
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            if !self.peek().is_some_and(|b| b.is_ascii_digit()) {
                return Err(self.error(mark, "malformed exponent in number"));
            }
            self.take_while(|b| b.is_ascii_digit());
        }
        if self.peek().is_some_and(is_ident_start) {
            return Err(self.error(self.pos, "unexpected letter after number"));
        }
        Ok(TokenKind::Number(self.src[start..self.pos].to_string()))
    }

    fn string(&mut self, quote: u8) -> Result<TokenKind, ParseError> {
        let start = self.pos;
        self.pos += 1;
        let mut value = String::new();
        loop {
            let Some(b) = self.peek() else {
                return Err(self.error(start, "unterminated string"));
            };
            if b == quote {
                self.pos += 1;
                return Ok(TokenKind::Str(value));
            }
            if b == b'\\' {
                let escape_at = self.pos;
                self.pos += 1;
                let Some(esc) = self.peek() else {
                    return Err(self.error(start, "unterminated string"));
                };
                self.pos += 1;
                match esc {
                    b'"' => value.push('"'),
                    b'\'' => value.push('\''),
                    b'\\' => value.push('\\'),
                    b'/' => value.push('/'),
                    b'b' => value.push('\u{8}'),
                    b'f' => value.push('\u{c}'),
                    b'n' => value.push('\n'),
                    b'r' => value.push('\r'),
                    b't' => value.push('\t'),
                    b'u' => value.push(self.unicode_escape(escape_at)?),
                    _ => return Err(self.error(escape_at, "invalid escape sequence in string")),
                }
                continue;
            }
            // Copy a whole UTF-8 character at once.
            let ch = self.src[self.pos..].chars().next().unwrap_or('\u{fffd}');
            value.push(ch);
            self.pos += ch.len_utf8();
        }
    }

    fn hex4(&mut self, escape_at: usize) -> Result<u32, ParseError> {
        let digits = self
            .src
            .get(self.pos..self.pos + 4)
            .filter(|d| d.bytes().all(|b| b.is_ascii_hexdigit()))
            .ok_or_else(|| self.error(escape_at, "invalid unicode escape in string"))?;
        self.pos += 4;
        u32::from_str_radix(digits, 16)
            .map_err(|_| self.error(escape_at, "invalid unicode escape in string"))
    }

    fn unicode_escape(&mut self, escape_at: usize) -> Result<char, ParseError> {
        let high = self.hex4(escape_at)?;
        if (0xD800..0xDC00).contains(&high) {
            if self.peek() == Some(b'\\') && self.peek_at(1) == Some(b'u') {
                self.pos += 2;
                let low = self.hex4(escape_at)?;
                if (0xDC00..0xE000).contains(&low) {
                    let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                    return char::from_u32(code)
                        .ok_or_else(|| self.error(escape_at, "invalid surrogate pair in string"));
                }
            }
            return Err(self.error(escape_at, "invalid surrogate pair in string"));
        }
        char::from_u32(high)
            .ok_or_else(|| self.error(escape_at, "invalid unicode escape in string"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        tokenize(src)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn punctuation_and_operators() {
        assert_eq!(
            kinds("*[a->b...c]"),
            vec![
                TokenKind::Star,
                TokenKind::LBracket,
                TokenKind::Ident("a".into()),
                TokenKind::Arrow,
                TokenKind::Ident("b".into()),
                TokenKind::Ellipsis,
                TokenKind::Ident("c".into()),
                TokenKind::RBracket,
                TokenKind::Eof,
            ]
        );
        assert_eq!(
            kinds("a**b|c"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::StarStar,
                TokenKind::Ident("b".into()),
                TokenKind::Pipe,
                TokenKind::Ident("c".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn range_after_integer_is_not_a_float() {
        assert_eq!(
            kinds("1..20"),
            vec![
                TokenKind::Number("1".into()),
                TokenKind::DotDot,
                TokenKind::Number("20".into()),
                TokenKind::Eof,
            ]
        );
        assert_eq!(
            kinds("1.5e-3"),
            vec![TokenKind::Number("1.5e-3".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn keywords_params_and_comments() {
        assert_eq!(
            kinds("// leading\n$slug in true // trailing"),
            vec![
                TokenKind::Param("slug".into()),
                TokenKind::Keyword(Keyword::In),
                TokenKind::Keyword(Keyword::True),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn string_escapes() {
        assert_eq!(
            kinds(r#"'it\'s' "a\né😀""#),
            vec![
                TokenKind::Str("it's".into()),
                TokenKind::Str("a\né😀".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn offsets_are_recorded() {
        let tokens = tokenize("a  ==\n b").unwrap();
        let offsets: Vec<usize> = tokens.iter().map(|t| t.offset).collect();
        assert_eq!(offsets, vec![0, 3, 7, 8]);
    }

    #[test]
    fn lexical_errors() {
        let err = tokenize("\"open").unwrap_err();
        assert_eq!(err.to_string(), "unterminated string at line 1, column 1");

        let err = tokenize("a = b").unwrap_err();
        assert_eq!(
            err.to_string(),
            "unexpected character '=' at line 1, column 3"
        );

        assert!(tokenize(r#""\q""#).is_err());
        assert!(tokenize("$").is_err());
        assert!(tokenize("1e").is_err());
    }
}
