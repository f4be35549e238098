// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::{lex::TokenKind, scan::Scanner, Error, ErrorKind, Parser, Result};
use cqasm_ast::ast::Ident;

pub(super) fn token(s: &mut Scanner, t: TokenKind) -> Result<()> {
    if s.peek().kind == t {
        s.advance();
        Ok(())
    } else {
        Err(Error(ErrorKind::Token(t, s.peek().kind, s.peek().span)))
    }
}

pub(super) fn ident(s: &mut Scanner) -> Result<Ident> {
    let peek = s.peek();
    if peek.kind == TokenKind::Ident {
        let name = s.read().into();
        s.advance();
        Ok(Ident {
            span: peek.span,
            name,
        })
    } else {
        Err(Error(ErrorKind::Rule("identifier", peek.kind, peek.span)))
    }
}

/// Optionally parse with the given parser.
/// Returns Ok(Some(value)) if the parser succeeded,
/// Ok(None) if the parser failed on the first token,
/// Err(error) if the parser failed after consuming some tokens.
pub(super) fn opt<T>(s: &mut Scanner, mut p: impl Parser<T>) -> Result<Option<T>> {
    let offset = s.peek().span.lo;
    match p(s) {
        Ok(x) => Ok(Some(x)),
        Err(error) if advanced(s, offset) => Err(error),
        Err(_) => Ok(None),
    }
}

/// Parses a sequence of one or more items separated by commas.
pub(super) fn seq<T>(s: &mut Scanner, mut p: impl Parser<T>) -> Result<Vec<T>> {
    let mut xs = vec![p(s)?];
    while token(s, TokenKind::Comma).is_ok() {
        xs.push(p(s)?);
    }
    Ok(xs)
}

/// Skips newline tokens; used inside delimited regions where line breaks do not
/// terminate anything.
pub(super) fn skip_newlines(s: &mut Scanner) {
    while s.peek().kind == TokenKind::Newline {
        s.advance();
    }
}

fn advanced(s: &Scanner, from: u32) -> bool {
    s.peek().span.lo > from
}
