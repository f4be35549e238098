// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use cqasm_data_structures::{span::Span, version::Version};
use miette::Diagnostic;
use thiserror::Error as ThisError;

/// An analysis error. Analysis is accumulative: all recoverable errors are
/// collected and returned together with a best-effort partial tree.
#[derive(Clone, Debug, Diagnostic, PartialEq, ThisError)]
pub enum Error {
    #[error("failed to resolve {0}")]
    #[diagnostic(code("Qasm.Analyze.NameResolution"))]
    NameResolution(String, #[label("unknown name")] Option<Span>),

    #[error("failed to resolve overload for {0} with argument pack ({1})")]
    #[diagnostic(code("Qasm.Analyze.OverloadResolution"))]
    OverloadResolution(String, String, #[label("no matching overload")] Option<Span>),

    #[error("failed to promote value of type {0} to {1}")]
    #[diagnostic(code("Qasm.Analyze.TypePromotion"))]
    TypePromotion(String, String, #[label] Option<Span>),

    #[error("index {0} out of range for register of size {1}")]
    #[diagnostic(code("Qasm.Analyze.IndexOutOfRange"))]
    IndexOutOfRange(i64, usize, #[label] Option<Span>),

    #[error("{0}")]
    #[diagnostic(code("Qasm.Analyze.DuplicateDeclaration"))]
    DuplicateDeclaration(&'static str, #[label("redeclared here")] Option<Span>),

    #[error("{0}")]
    #[diagnostic(code("Qasm.Analyze.InstructionConstraint"))]
    InstructionConstraint(&'static str, #[label] Option<Span>),

    #[error("cQASM file version is {0}, but at most {1} is supported")]
    #[diagnostic(code("Qasm.Analyze.VersionMismatch"))]
    VersionMismatch(Version, Version, #[label] Option<Span>),

    #[error("missing or malformed version statement")]
    #[diagnostic(code("Qasm.Analyze.VersionHeader"))]
    VersionHeader(#[label] Option<Span>),

    #[error("division by zero")]
    #[diagnostic(code("Qasm.Analyze.DivisionByZero"))]
    DivisionByZero(#[label] Option<Span>),

    #[error("{0}")]
    #[diagnostic(code("Qasm.Analyze.InvalidArgument"))]
    InvalidArgument(String, #[label] Option<Span>),

    #[error("failed to open input file {0}")]
    #[diagnostic(code("Qasm.Analyze.UnreadableFile"))]
    UnreadableFile(String),
}

impl Error {
    /// The span the error is attached to, when one is known.
    #[must_use]
    pub fn span(&self) -> Option<Span> {
        match self {
            Error::NameResolution(_, span)
            | Error::OverloadResolution(_, _, span)
            | Error::TypePromotion(_, _, span)
            | Error::IndexOutOfRange(_, _, span)
            | Error::DuplicateDeclaration(_, span)
            | Error::InstructionConstraint(_, span)
            | Error::VersionMismatch(_, _, span)
            | Error::VersionHeader(span)
            | Error::DivisionByZero(span)
            | Error::InvalidArgument(_, span) => *span,
            Error::UnreadableFile(_) => None,
        }
    }
}

/// A failure inside a registered constant-evaluating function. The caller
/// attaches the span of the call site.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FnError {
    DivisionByZero,
    InvalidArgument(String),
}

impl FnError {
    pub(crate) fn with_span(self, span: Span) -> Error {
        match self {
            FnError::DivisionByZero => Error::DivisionByZero(Some(span)),
            FnError::InvalidArgument(message) => Error::InvalidArgument(message, Some(span)),
        }
    }
}
