// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Result wrappers and their JSON serialization. Successful results serialize
//! to `{"Program": …}` holding the tag-value tree rendered as JSON; failed
//! results serialize to `{"errors": […]}` where every error takes the
//! Language Server Protocol `Diagnostic` shape.

use cqasm_ast::ast;
use cqasm_data_structures::{
    cbor,
    language::Dialect,
    line_column::{Encoding, Position},
    span::Span,
};
use cqasm_frontend::{error::Error as AnalyzeError, AnalysisResult, Error};
use serde_json::{json, Value as Json};
use std::{fs, path::Path, sync::Arc};

/// The outcome of parsing one input: the syntactic tree together with the
/// accumulated parse errors, in source order.
#[derive(Clone, Debug)]
pub struct ParseResult {
    pub program: ast::Program,
    pub errors: Vec<Error>,
    /// The name used for the input in diagnostics.
    pub file_name: Arc<str>,
    /// The parsed source text.
    pub source: Arc<str>,
}

impl ParseResult {
    /// Whether parsing reported any errors.
    #[must_use]
    pub fn failed(&self) -> bool {
        !self.errors.is_empty()
    }
}

pub(crate) fn parse(source: &str, file_name: Option<&str>, dialect: Dialect) -> ParseResult {
    let (program, errors) = cqasm_parse::program(source, dialect);
    ParseResult {
        program,
        errors: errors.into_iter().map(Into::into).collect(),
        file_name: file_name.unwrap_or("<unknown>").into(),
        source: source.into(),
    }
}

pub(crate) fn parse_path(path: &Path, dialect: Dialect) -> ParseResult {
    match fs::read_to_string(path) {
        Ok(source) => parse(&source, Some(&path.display().to_string()), dialect),
        Err(_) => ParseResult {
            program: ast::Program::default(),
            errors: vec![AnalyzeError::UnreadableFile(path.display().to_string()).into()],
            file_name: path.display().to_string().into(),
            source: "".into(),
        },
    }
}

/// Serializes an analysis result to JSON: the semantic tree on success, the
/// LSP diagnostics otherwise.
#[must_use]
pub fn analysis_to_json(result: &AnalysisResult) -> String {
    let json = if result.errors.is_empty() {
        json!({
            "Program": cbor_to_json(&cqasm_semantic::serialize::program_to_value(&result.program)),
        })
    } else {
        json!({
            "errors": diagnostics(&result.errors, &result.file_name, &result.source),
        })
    };
    json.to_string()
}

/// Serializes a parse result to JSON: the syntactic tree on success, the LSP
/// diagnostics otherwise.
#[must_use]
pub fn parse_to_json(result: &ParseResult) -> String {
    let json = if result.errors.is_empty() {
        json!({
            "Program": cbor_to_json(&cqasm_ast::serialize::program_to_value(&result.program)),
        })
    } else {
        json!({
            "errors": diagnostics(&result.errors, &result.file_name, &result.source),
        })
    };
    json.to_string()
}

/// Renders the tag-value tree as JSON. The binary and JSON serializations
/// share one structure this way, which keeps the two in lockstep.
fn cbor_to_json(value: &cbor::Value) -> Json {
    match value {
        cbor::Value::Bool(b) => json!(b),
        cbor::Value::Int(i) => json!(i),
        cbor::Value::Float(f) => json!(f),
        cbor::Value::Text(s) => json!(s),
        cbor::Value::Bytes(b) => json!(b),
        cbor::Value::Array(items) => Json::Array(items.iter().map(cbor_to_json).collect()),
        cbor::Value::Map(entries) => Json::Object(
            entries
                .iter()
                .map(|(key, item)| (key.clone(), cbor_to_json(item)))
                .collect(),
        ),
    }
}

fn diagnostics(errors: &[Error], file_name: &str, source: &str) -> Json {
    Json::Array(
        errors
            .iter()
            .map(|error| diagnostic(error, file_name, source))
            .collect(),
    )
}

/// One error in the LSP `Diagnostic` shape. Positions are zero-based, with
/// zero preserved when the location is unknown; severity is hardcoded to 1
/// (the value corresponding to an error).
fn diagnostic(error: &Error, file_name: &str, source: &str) -> Json {
    let (start, end) = positions(error.span(), source);
    let mut diagnostic = json!({
        "range": {
            "start": { "line": start.line, "character": start.column },
            "end": { "line": end.line, "character": end.column },
        },
        "message": error.to_string(),
        "severity": 1,
    });

    if file_name != "<unknown>" {
        diagnostic["relatedInformation"] = json!([{
            "location": {
                "uri": format!("file:///{}", url_encode(file_name)),
                "range": {
                    "start": { "line": 0, "character": 0 },
                    "end": { "line": 0, "character": 0 },
                },
            },
            "message": error.to_string(),
        }]);
    }

    diagnostic
}

fn positions(span: Option<Span>, source: &str) -> (Position, Position) {
    match span {
        Some(span) if !source.is_empty() => (
            Position::from_utf8_byte_offset(Encoding::Utf16, source, span.lo),
            Position::from_utf8_byte_offset(Encoding::Utf16, source, span.hi),
        ),
        _ => (
            Position { line: 0, column: 0 },
            Position { line: 0, column: 0 },
        ),
    }
}

/// Percent-encodes a path for use in a `file://` URI.
fn url_encode(path: &str) -> String {
    let mut encoded = String::with_capacity(path.len());
    for byte in path.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                encoded.push(byte as char);
            }
            _ => {
                encoded.push('%');
                encoded.push_str(&format!("{byte:02X}"));
            }
        }
    }
    encoded
}
