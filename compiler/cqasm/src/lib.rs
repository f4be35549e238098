// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The public cQASM front-end: entry points for parsing a source file or
//! string into a syntactic tree, or analyzing it into a semantic tree, for
//! both language dialects, plus JSON and tag-value serializations of either
//! result.

mod result;

pub use cqasm_frontend::{AnalysisFailed, AnalysisResult, Analyzer, Error};
pub use result::{analysis_to_json, parse_to_json, ParseResult};

use cqasm_data_structures::{language::Dialect, version::Version};
use cqasm_frontend::version::version_of;
use std::path::Path;

/// Parses and analyzes the given string, selecting the dialect from the
/// version header. The optional `file_name` is used only for error messages.
#[must_use]
pub fn analyze_string(source: &str, file_name: Option<&str>) -> AnalysisResult {
    dialect_analyzer(source).analyze_string(source, file_name)
}

/// Parses and analyzes the given file, selecting the dialect from the version
/// header.
#[must_use]
pub fn analyze_file(path: &Path) -> AnalysisResult {
    match std::fs::read_to_string(path) {
        Ok(source) => analyze_string(&source, Some(&path.display().to_string())),
        // Let the dialect-specific path produce the unreadable-file error.
        Err(_) => v3::default_analyzer().analyze_file(path),
    }
}

fn dialect_analyzer(source: &str) -> Analyzer {
    match version_of(source) {
        Ok((version, _)) if Dialect::for_version(&version) == Dialect::V1 => {
            v1::default_analyzer()
        }
        // An unknown or missing version falls through to the newest dialect,
        // which will report the header problem itself.
        _ => v3::default_analyzer(),
    }
}

/// The legacy (1.x) dialect surface.
pub mod v1 {
    use super::{result, AnalysisResult, Analyzer, ParseResult, Path, Version};
    use cqasm_data_structures::language::Dialect;

    /// Constructs an analyzer with the cQASM 1.0 defaults loaded.
    #[must_use]
    pub fn default_analyzer() -> Analyzer {
        cqasm_frontend::v1::default_analyzer(Version::new(&[1, 0]))
    }

    /// Parses the given string to a syntactic tree.
    #[must_use]
    pub fn parse_string(source: &str, file_name: Option<&str>) -> ParseResult {
        result::parse(source, file_name, Dialect::V1)
    }

    /// Parses the given file to a syntactic tree.
    #[must_use]
    pub fn parse_file(path: &Path) -> ParseResult {
        result::parse_path(path, Dialect::V1)
    }

    /// Parses and analyzes the given string with the default analyzer.
    #[must_use]
    pub fn analyze_string(source: &str, file_name: Option<&str>) -> AnalysisResult {
        default_analyzer().analyze_string(source, file_name)
    }

    /// Parses and analyzes the given file with the default analyzer.
    #[must_use]
    pub fn analyze_file(path: &Path) -> AnalysisResult {
        default_analyzer().analyze_file(path)
    }

    /// Like [`parse_string`], serialized to JSON.
    #[must_use]
    pub fn parse_string_to_json(source: &str, file_name: Option<&str>) -> String {
        super::parse_to_json(&parse_string(source, file_name))
    }

    /// Like [`parse_file`], serialized to JSON.
    #[must_use]
    pub fn parse_file_to_json(path: &Path) -> String {
        super::parse_to_json(&parse_file(path))
    }

    /// Like [`analyze_string`], serialized to JSON.
    #[must_use]
    pub fn analyze_string_to_json(source: &str, file_name: Option<&str>) -> String {
        super::analysis_to_json(&analyze_string(source, file_name))
    }

    /// Like [`analyze_file`], serialized to JSON.
    #[must_use]
    pub fn analyze_file_to_json(path: &Path) -> String {
        super::analysis_to_json(&analyze_file(path))
    }
}

/// The 3.x dialect surface.
pub mod v3 {
    use super::{result, AnalysisResult, Analyzer, ParseResult, Path, Version};
    use cqasm_data_structures::language::Dialect;

    /// Constructs an analyzer with the cQASM 3.0 defaults loaded.
    #[must_use]
    pub fn default_analyzer() -> Analyzer {
        cqasm_frontend::v3::default_analyzer(Version::new(&[3, 0]))
    }

    /// Parses the given string to a syntactic tree.
    #[must_use]
    pub fn parse_string(source: &str, file_name: Option<&str>) -> ParseResult {
        result::parse(source, file_name, Dialect::V3)
    }

    /// Parses the given file to a syntactic tree.
    #[must_use]
    pub fn parse_file(path: &Path) -> ParseResult {
        result::parse_path(path, Dialect::V3)
    }

    /// Parses and analyzes the given string with the default analyzer.
    #[must_use]
    pub fn analyze_string(source: &str, file_name: Option<&str>) -> AnalysisResult {
        default_analyzer().analyze_string(source, file_name)
    }

    /// Parses and analyzes the given file with the default analyzer.
    #[must_use]
    pub fn analyze_file(path: &Path) -> AnalysisResult {
        default_analyzer().analyze_file(path)
    }

    /// Like [`parse_string`], serialized to JSON.
    #[must_use]
    pub fn parse_string_to_json(source: &str, file_name: Option<&str>) -> String {
        super::parse_to_json(&parse_string(source, file_name))
    }

    /// Like [`parse_file`], serialized to JSON.
    #[must_use]
    pub fn parse_file_to_json(path: &Path) -> String {
        super::parse_to_json(&parse_file(path))
    }

    /// Like [`analyze_string`], serialized to JSON.
    #[must_use]
    pub fn analyze_string_to_json(source: &str, file_name: Option<&str>) -> String {
        super::analysis_to_json(&analyze_string(source, file_name))
    }

    /// Like [`analyze_file`], serialized to JSON.
    #[must_use]
    pub fn analyze_file_to_json(path: &Path) -> String {
        super::analysis_to_json(&analyze_file(path))
    }
}

/// Serializes a semantic tree to the binary tag-value format.
#[must_use]
pub fn semantic_to_cbor(program: &cqasm_semantic::semantic::Program) -> Vec<u8> {
    cqasm_data_structures::cbor::encode(&cqasm_semantic::serialize::program_to_value(program))
}

/// Serializes a syntactic tree to the binary tag-value format.
#[must_use]
pub fn syntactic_to_cbor(program: &cqasm_ast::ast::Program) -> Vec<u8> {
    cqasm_data_structures::cbor::encode(&cqasm_ast::serialize::program_to_value(program))
}
