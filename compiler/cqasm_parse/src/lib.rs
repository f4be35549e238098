// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The cQASM parser uses recursive descent to turn an input string into a
//! syntactic tree. Both dialect grammars share one lexer shape and one node
//! vocabulary; the dialect picks which statements are legal and how a handful
//! of tokens (comments, boolean keywords) behave.

mod expr;
mod keyword;
mod lex;
mod prim;
mod scan;
mod stmt;
#[cfg(test)]
mod tests;

use cqasm_ast::ast::Program;
use cqasm_data_structures::{language::Dialect, span::Span};
use lex::TokenKind;
use miette::Diagnostic;
use scan::Scanner;
use std::result;
use thiserror::Error as ThisError;

#[derive(Clone, Copy, Debug, Diagnostic, Eq, PartialEq, ThisError)]
#[error(transparent)]
#[diagnostic(transparent)]
pub struct Error(ErrorKind);

impl Error {
    /// The span the error is attached to.
    #[must_use]
    pub fn span(&self) -> Span {
        match self.0 {
            ErrorKind::Lex(lex::Error::UnterminatedString(span) | lex::Error::Unknown(_, span))
            | ErrorKind::Token(_, _, span)
            | ErrorKind::Rule(_, _, span)
            | ErrorKind::Lit(_, span)
            | ErrorKind::Escape(_, span)
            | ErrorKind::MissingTerminator(span)
            | ErrorKind::DialectStmt(_, span) => span,
        }
    }
}

#[derive(Clone, Copy, Debug, Diagnostic, Eq, PartialEq, ThisError)]
enum ErrorKind {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Lex(lex::Error),
    #[error("expected {0}, found {1}")]
    #[diagnostic(code("Qasm.Parse.Token"))]
    Token(TokenKind, TokenKind, #[label] Span),
    #[error("expected {0}, found {1}")]
    #[diagnostic(code("Qasm.Parse.Rule"))]
    Rule(&'static str, TokenKind, #[label] Span),
    #[error("invalid {0} literal")]
    #[diagnostic(code("Qasm.Parse.Literal"))]
    Lit(&'static str, #[label] Span),
    #[error("unknown escape sequence: `{0}`")]
    #[diagnostic(code("Qasm.Parse.Escape"))]
    Escape(char, #[label] Span),
    #[error("expected the statement to end with a newline or `;`")]
    #[diagnostic(code("Qasm.Parse.MissingTerminator"))]
    MissingTerminator(#[label] Span),
    #[error("{0} statements are not part of this dialect")]
    #[diagnostic(code("Qasm.Parse.DialectStmt"))]
    DialectStmt(&'static str, #[label] Span),
}

type Result<T> = result::Result<T, Error>;

trait Parser<T>: FnMut(&mut Scanner) -> Result<T> {}

impl<T, F: FnMut(&mut Scanner) -> Result<T>> Parser<T> for F {}

/// Parses a complete source file in the given dialect. Errors are accumulated;
/// the returned program is complete up to statements that failed to parse.
#[must_use]
pub fn program(input: &str, dialect: Dialect) -> (Program, Vec<Error>) {
    let mut scanner = Scanner::new(input, dialect);
    let program = stmt::program(&mut scanner);
    (program, scanner.into_errors())
}
