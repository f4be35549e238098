// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use super::{Lexer, Token, TokenKind};
use crate::{keyword::Keyword, lex::Delim};
use cqasm_data_structures::span::Span;

fn kinds(input: &str, slash_comments: bool) -> Vec<TokenKind> {
    Lexer::new(input, slash_comments)
        .map(|t| t.expect("lexing should succeed").kind)
        .collect()
}

#[test]
fn keywords_and_idents() {
    assert_eq!(
        kinds("version qubits h q", false),
        vec![
            TokenKind::Keyword(Keyword::Version),
            TokenKind::Keyword(Keyword::Qubits),
            TokenKind::Ident,
            TokenKind::Ident,
        ]
    );
}

#[test]
fn spans_skip_whitespace() {
    let tokens: Vec<Token> = Lexer::new("h  q", false)
        .map(|t| t.expect("lexing should succeed"))
        .collect();
    assert_eq!(tokens[0].span, Span { lo: 0, hi: 1 });
    assert_eq!(tokens[1].span, Span { lo: 3, hi: 4 });
}

#[test]
fn newlines_are_tokens() {
    assert_eq!(
        kinds("h\nq\r\nx", false),
        vec![
            TokenKind::Ident,
            TokenKind::Newline,
            TokenKind::Ident,
            TokenKind::Newline,
            TokenKind::Ident,
        ]
    );
}

#[test]
fn hash_comments_are_skipped() {
    assert_eq!(
        kinds("h # a comment\nq", false),
        vec![TokenKind::Ident, TokenKind::Newline, TokenKind::Ident]
    );
}

#[test]
fn double_slash_is_division_in_v1() {
    assert_eq!(
        kinds("5 // 2", false),
        vec![TokenKind::Int, TokenKind::SlashSlash, TokenKind::Int]
    );
}

#[test]
fn double_slash_is_comment_in_v3() {
    assert_eq!(kinds("5 // 2", true), vec![TokenKind::Int]);
}

#[test]
fn block_comments_are_skipped() {
    assert_eq!(
        kinds("h /* stuff \n more */ q", false),
        vec![TokenKind::Ident, TokenKind::Ident]
    );
}

#[test]
fn multi_char_operators() {
    assert_eq!(
        kinds("** == != <= >= << >> >>> && || ^^", false),
        vec![
            TokenKind::StarStar,
            TokenKind::EqEq,
            TokenKind::Ne,
            TokenKind::Lte,
            TokenKind::Gte,
            TokenKind::LtLt,
            TokenKind::GtGt,
            TokenKind::GtGtGt,
            TokenKind::AmpAmp,
            TokenKind::BarBar,
            TokenKind::CaretCaret,
        ]
    );
}

#[test]
fn numbers() {
    assert_eq!(
        kinds("1 3.14 1e3 2.5e-2", false),
        vec![
            TokenKind::Int,
            TokenKind::Float,
            TokenKind::Float,
            TokenKind::Float,
        ]
    );
}

#[test]
fn version_components_stay_separate() {
    // `1.0.2` must lex as float `1.0`, dot, int `2` so the version parser can
    // re-join the components.
    assert_eq!(
        kinds("1.0.2", false),
        vec![TokenKind::Float, TokenKind::Dot, TokenKind::Int]
    );
}

#[test]
fn subcircuit_dot_and_braces() {
    assert_eq!(
        kinds(".init(3) { h | x }", false),
        vec![
            TokenKind::Dot,
            TokenKind::Ident,
            TokenKind::Open(Delim::Paren),
            TokenKind::Int,
            TokenKind::Close(Delim::Paren),
            TokenKind::Open(Delim::Brace),
            TokenKind::Ident,
            TokenKind::Bar,
            TokenKind::Ident,
            TokenKind::Close(Delim::Brace),
        ]
    );
}

#[test]
fn unterminated_string_is_an_error() {
    let result: Vec<_> = Lexer::new("\"oops", false).collect();
    assert!(matches!(
        result[0],
        Err(super::Error::UnterminatedString(_))
    ));
}
