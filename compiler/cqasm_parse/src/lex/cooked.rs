// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The second lexing phase "cooks" a raw token stream, transforming it into tokens
//! that directly correspond to components in the cQASM grammar: multi-character
//! operators are joined, whitespace and comments are discarded, and reserved words
//! become keywords. Newlines survive cooking because they terminate statements.
//!
//! Tokens never contain substrings from the original input, but are simply labels
//! that refer back to regions in the input. Lexing never fails, but may produce
//! error tokens.

#[cfg(test)]
mod tests;

use super::{
    raw::{self, Number, Single},
    Delim,
};
use crate::keyword::Keyword;
use cqasm_data_structures::span::Span;
use enum_iterator::Sequence;
use miette::Diagnostic;
use std::{
    fmt::{self, Display, Formatter},
    iter::Peekable,
};
use thiserror::Error;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) span: Span,
}

#[derive(Clone, Copy, Debug, Diagnostic, Eq, Error, PartialEq)]
pub(crate) enum Error {
    #[error("unterminated string literal")]
    #[diagnostic(code("Qasm.Lex.UnterminatedString"))]
    UnterminatedString(#[label] Span),

    #[error("unrecognized character `{0}`")]
    #[diagnostic(code("Qasm.Lex.UnknownChar"))]
    Unknown(char, #[label] Span),
}

/// A token kind.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Sequence)]
pub(crate) enum TokenKind {
    /// `&`
    Amp,
    /// `&&`
    AmpAmp,
    /// `@`
    At,
    /// `!`
    Bang,
    /// `|`
    Bar,
    /// `||`
    BarBar,
    /// `^`
    Caret,
    /// `^^`
    CaretCaret,
    /// A closing delimiter.
    Close(Delim),
    /// `:`
    Colon,
    /// `,`
    Comma,
    /// `.`
    Dot,
    /// End of file.
    Eof,
    /// `=`
    Eq,
    /// `==`
    EqEq,
    /// A floating-point literal.
    Float,
    /// `>`
    Gt,
    /// `>=`
    Gte,
    /// `>>`
    GtGt,
    /// `>>>`
    GtGtGt,
    /// An identifier.
    Ident,
    /// An integer literal.
    Int,
    /// A keyword.
    Keyword(Keyword),
    /// `<`
    Lt,
    /// `<=`
    Lte,
    /// `<<`
    LtLt,
    /// `-`
    Minus,
    /// `!=`
    Ne,
    /// A line break terminating a statement.
    Newline,
    /// An opening delimiter.
    Open(Delim),
    /// `%`
    Percent,
    /// `+`
    Plus,
    /// `?`
    Question,
    /// `;`
    Semi,
    /// `/`
    Slash,
    /// `//`
    SlashSlash,
    /// `*`
    Star,
    /// `**`
    StarStar,
    /// A string literal.
    String,
    /// `~`
    Tilde,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            TokenKind::Amp => f.write_str("`&`"),
            TokenKind::AmpAmp => f.write_str("`&&`"),
            TokenKind::At => f.write_str("`@`"),
            TokenKind::Bang => f.write_str("`!`"),
            TokenKind::Bar => f.write_str("`|`"),
            TokenKind::BarBar => f.write_str("`||`"),
            TokenKind::Caret => f.write_str("`^`"),
            TokenKind::CaretCaret => f.write_str("`^^`"),
            TokenKind::Close(Delim::Brace) => f.write_str("`}`"),
            TokenKind::Close(Delim::Bracket) => f.write_str("`]`"),
            TokenKind::Close(Delim::Paren) => f.write_str("`)`"),
            TokenKind::Colon => f.write_str("`:`"),
            TokenKind::Comma => f.write_str("`,`"),
            TokenKind::Dot => f.write_str("`.`"),
            TokenKind::Eof => f.write_str("EOF"),
            TokenKind::Eq => f.write_str("`=`"),
            TokenKind::EqEq => f.write_str("`==`"),
            TokenKind::Float => f.write_str("float"),
            TokenKind::Gt => f.write_str("`>`"),
            TokenKind::Gte => f.write_str("`>=`"),
            TokenKind::GtGt => f.write_str("`>>`"),
            TokenKind::GtGtGt => f.write_str("`>>>`"),
            TokenKind::Ident => f.write_str("identifier"),
            TokenKind::Int => f.write_str("integer"),
            TokenKind::Keyword(keyword) => write!(f, "keyword `{keyword}`"),
            TokenKind::Lt => f.write_str("`<`"),
            TokenKind::Lte => f.write_str("`<=`"),
            TokenKind::LtLt => f.write_str("`<<`"),
            TokenKind::Minus => f.write_str("`-`"),
            TokenKind::Ne => f.write_str("`!=`"),
            TokenKind::Newline => f.write_str("end of line"),
            TokenKind::Open(Delim::Brace) => f.write_str("`{`"),
            TokenKind::Open(Delim::Bracket) => f.write_str("`[`"),
            TokenKind::Open(Delim::Paren) => f.write_str("`(`"),
            TokenKind::Percent => f.write_str("`%`"),
            TokenKind::Plus => f.write_str("`+`"),
            TokenKind::Question => f.write_str("`?`"),
            TokenKind::Semi => f.write_str("`;`"),
            TokenKind::Slash => f.write_str("`/`"),
            TokenKind::SlashSlash => f.write_str("`//`"),
            TokenKind::Star => f.write_str("`*`"),
            TokenKind::StarStar => f.write_str("`**`"),
            TokenKind::String => f.write_str("string"),
            TokenKind::Tilde => f.write_str("`~`"),
        }
    }
}

pub(crate) struct Lexer<'a> {
    input: &'a str,
    len: u32,

    // This uses a `Peekable` iterator over the raw lexer, which allows for one
    // token lookahead.
    tokens: Peekable<raw::Lexer<'a>>,
}

impl<'a> Lexer<'a> {
    pub(crate) fn new(input: &'a str, slash_comments: bool) -> Self {
        Self {
            input,
            len: input
                .len()
                .try_into()
                .expect("input length should fit into u32"),
            tokens: raw::Lexer::new(input, slash_comments).peekable(),
        }
    }

    fn offset(&mut self) -> u32 {
        self.tokens.peek().map_or(self.len, |t| t.offset)
    }

    fn next_if_eq(&mut self, single: Single) -> bool {
        self.tokens
            .next_if(|t| t.kind == raw::TokenKind::Single(single))
            .is_some()
    }

    fn cook(&mut self, token: &raw::Token) -> Result<Option<Token>, Error> {
        let kind = match token.kind {
            raw::TokenKind::Comment | raw::TokenKind::Whitespace => None,
            raw::TokenKind::Newline => Some(TokenKind::Newline),
            raw::TokenKind::Ident => {
                let ident = &self.input[(token.offset as usize)..(self.offset() as usize)];
                Some(ident.parse().map_or(TokenKind::Ident, TokenKind::Keyword))
            }
            raw::TokenKind::Number(Number::Int) => Some(TokenKind::Int),
            raw::TokenKind::Number(Number::Float) => Some(TokenKind::Float),
            raw::TokenKind::Single(single) => Some(self.single(single)),
            raw::TokenKind::String { terminated: true } => Some(TokenKind::String),
            raw::TokenKind::String { terminated: false } => {
                return Err(Error::UnterminatedString(Span {
                    lo: token.offset,
                    hi: token.offset,
                }));
            }
            raw::TokenKind::Unknown => {
                let c = self.input[(token.offset as usize)..]
                    .chars()
                    .next()
                    .expect("token offset should be the start of a character");
                return Err(Error::Unknown(
                    c,
                    Span {
                        lo: token.offset,
                        hi: self.offset(),
                    },
                ));
            }
        };

        Ok(kind.map(|kind| {
            let span = Span {
                lo: token.offset,
                hi: self.offset(),
            };
            Token { kind, span }
        }))
    }

    fn single(&mut self, single: Single) -> TokenKind {
        match single {
            Single::Amp => {
                if self.next_if_eq(Single::Amp) {
                    TokenKind::AmpAmp
                } else {
                    TokenKind::Amp
                }
            }
            Single::At => TokenKind::At,
            Single::Bang => {
                if self.next_if_eq(Single::Eq) {
                    TokenKind::Ne
                } else {
                    TokenKind::Bang
                }
            }
            Single::Bar => {
                if self.next_if_eq(Single::Bar) {
                    TokenKind::BarBar
                } else {
                    TokenKind::Bar
                }
            }
            Single::Caret => {
                if self.next_if_eq(Single::Caret) {
                    TokenKind::CaretCaret
                } else {
                    TokenKind::Caret
                }
            }
            Single::Close(delim) => TokenKind::Close(delim),
            Single::Colon => TokenKind::Colon,
            Single::Comma => TokenKind::Comma,
            Single::Dot => TokenKind::Dot,
            Single::Eq => {
                if self.next_if_eq(Single::Eq) {
                    TokenKind::EqEq
                } else {
                    TokenKind::Eq
                }
            }
            Single::Gt => {
                if self.next_if_eq(Single::Eq) {
                    TokenKind::Gte
                } else if self.next_if_eq(Single::Gt) {
                    if self.next_if_eq(Single::Gt) {
                        TokenKind::GtGtGt
                    } else {
                        TokenKind::GtGt
                    }
                } else {
                    TokenKind::Gt
                }
            }
            Single::Lt => {
                if self.next_if_eq(Single::Eq) {
                    TokenKind::Lte
                } else if self.next_if_eq(Single::Lt) {
                    TokenKind::LtLt
                } else {
                    TokenKind::Lt
                }
            }
            Single::Minus => TokenKind::Minus,
            Single::Open(delim) => TokenKind::Open(delim),
            Single::Percent => TokenKind::Percent,
            Single::Plus => TokenKind::Plus,
            Single::Question => TokenKind::Question,
            Single::Semi => TokenKind::Semi,
            Single::Slash => {
                if self.next_if_eq(Single::Slash) {
                    TokenKind::SlashSlash
                } else {
                    TokenKind::Slash
                }
            }
            Single::Star => {
                if self.next_if_eq(Single::Star) {
                    TokenKind::StarStar
                } else {
                    TokenKind::Star
                }
            }
            Single::Tilde => TokenKind::Tilde,
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(token) = self.tokens.next() {
            match self.cook(&token) {
                Ok(None) => {}
                Ok(Some(token)) => return Some(Ok(token)),
                Err(err) => return Some(Err(err)),
            }
        }

        None
    }
}
