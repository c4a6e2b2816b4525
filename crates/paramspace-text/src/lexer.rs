//! Tokenizer for the parameter-text dialect.
//!
//! The dialect is JSON-like: braced `key: value` pairs with list,
//! string, and numeric literals, extended with constructor calls
//! (`ref(...)`, `range(...)`, `normal(...)`, ...) and infix arithmetic
//! on references. `#` starts a line comment.

use logos::Logos;

use crate::error::TextError;

/// One token of the parameter-text dialect.
#[derive(Logos, Clone, Debug, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r"#[^\n]*")]
pub enum Token {
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `:`
    #[token(":")]
    Colon,
    /// `,`
    #[token(",")]
    Comma,
    /// `=` (keyword arguments in constructor calls)
    #[token("=")]
    Eq,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `**` (exponentiation; must outrank `*`)
    #[token("**")]
    DoubleStar,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `null`
    #[token("null")]
    Null,
    /// `true`
    #[token("true")]
    True,
    /// `false`
    #[token("false")]
    False,
    /// Bare identifier: constructor names and named constants.
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_owned())]
    Ident(String),
    /// Double-quoted string with backslash escapes.
    #[regex(r#""([^"\\]|\\.)*""#, |lex| unescape(lex.slice()))]
    Str(String),
    /// Real literal (requires a decimal point or exponent).
    #[regex(
        r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?|\.[0-9]+([eE][+-]?[0-9]+)?|[0-9]+[eE][+-]?[0-9]+",
        |lex| lex.slice().parse::<f64>().ok()
    )]
    Real(f64),
    /// Integer literal.
    #[regex(r"[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    Int(i64),
}

/// A token together with the byte range it was lexed from.
pub type Spanned = (Token, std::ops::Range<usize>);

/// Tokenize a full source string.
///
/// # Errors
///
/// [`TextError::Lex`] at the first unrecognized input.
pub fn tokenize(source: &str) -> Result<Vec<Spanned>, TextError> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(()) => {
                let (line, column) = line_col(source, span.start);
                return Err(TextError::Lex {
                    line,
                    column,
                    snippet: source[span.clone()].to_owned(),
                });
            }
        }
    }
    Ok(tokens)
}

/// 1-based line and column of a byte offset.
pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let upto = &source[..offset.min(source.len())];
    let line = upto.bytes().filter(|&b| b == b'\n').count() + 1;
    let column = upto.rfind('\n').map_or(offset + 1, |nl| offset - nl);
    (line, column)
}

/// Strip the surrounding quotes and decode backslash escapes.
fn unescape(quoted: &str) -> String {
    let inner = &quoted[1..quoted.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other), // \" \\ and anything else literally
            None => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source).unwrap().into_iter().map(|(t, _)| t).collect()
    }

    #[test]
    fn punctuation_and_literals() {
        assert_eq!(
            kinds(r#"{"a": 1, "b": 2.5}"#),
            vec![
                Token::LBrace,
                Token::Str("a".into()),
                Token::Colon,
                Token::Int(1),
                Token::Comma,
                Token::Str("b".into()),
                Token::Colon,
                Token::Real(2.5),
                Token::RBrace,
            ]
        );
    }

    #[test]
    fn double_star_outranks_star() {
        assert_eq!(
            kinds("2 ** 3 * 4"),
            vec![
                Token::Int(2),
                Token::DoubleStar,
                Token::Int(3),
                Token::Star,
                Token::Int(4),
            ]
        );
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(
            kinds("1 # the rest is ignored\n2"),
            vec![Token::Int(1), Token::Int(2)]
        );
    }

    #[test]
    fn string_escapes() {
        assert_eq!(
            kinds(r#""he said \"hi\"\n""#),
            vec![Token::Str("he said \"hi\"\n".into())]
        );
    }

    #[test]
    fn exponent_forms_are_real() {
        assert_eq!(kinds("1e3"), vec![Token::Real(1000.0)]);
        assert_eq!(kinds("2.5e-1"), vec![Token::Real(0.25)]);
        assert_eq!(kinds("10"), vec![Token::Int(10)]);
    }

    #[test]
    fn unrecognized_input_reports_position() {
        let err = tokenize("{\n  $oops\n}").unwrap_err();
        assert_eq!(
            err,
            TextError::Lex {
                line: 2,
                column: 3,
                snippet: "$".into()
            }
        );
    }
}
