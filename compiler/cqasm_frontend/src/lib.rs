// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The semantic analyzer for cQASM: the pipeline that consumes a syntactic tree
//! and emits a semantic tree, driven by pluggable registries and a
//! constant-evaluating expression resolver with overload resolution.

pub mod analyzer;
pub mod error;
mod fold;
pub mod functions;
pub mod resolver;
pub mod scope;
pub mod v1;
pub mod v3;
pub mod version;

use cqasm_data_structures::span::Span;
use miette::Diagnostic;
use thiserror::Error as ThisError;

pub use analyzer::{AnalysisFailed, AnalysisResult, Analyzer};

/// An error produced while turning source text into a semantic tree: either a
/// parse error copied verbatim from the parser, or an analysis error.
#[derive(Clone, Debug, Diagnostic, PartialEq, ThisError)]
#[diagnostic(transparent)]
#[error(transparent)]
pub struct Error(pub(crate) ErrorKind);

#[derive(Clone, Debug, Diagnostic, PartialEq, ThisError)]
#[diagnostic(transparent)]
pub(crate) enum ErrorKind {
    #[error(transparent)]
    Parse(#[from] cqasm_parse::Error),
    #[error(transparent)]
    Analyze(#[from] error::Error),
}

impl Error {
    /// The span the error is attached to, when one is known.
    #[must_use]
    pub fn span(&self) -> Option<Span> {
        match &self.0 {
            ErrorKind::Parse(error) => Some(error.span()),
            ErrorKind::Analyze(error) => error.span(),
        }
    }
}

impl From<cqasm_parse::Error> for Error {
    fn from(error: cqasm_parse::Error) -> Self {
        Self(ErrorKind::Parse(error))
    }
}

impl From<error::Error> for Error {
    fn from(error: error::Error) -> Self {
        Self(ErrorKind::Analyze(error))
    }
}
