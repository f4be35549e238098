// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::{
    expr::{continue_expr, continues_expr, expr, operand_expr},
    keyword::Keyword,
    lex::{Delim, TokenKind},
    prim::{ident, opt, seq, skip_newlines, token},
    scan::Scanner,
    Error, ErrorKind, Result,
};
use cqasm_ast::ast::{
    Annotation, BitDecl, Bundle, ErrorModelStmt, Expr, ExprKind, GateModifier, GateModifierKind,
    Ident, Instruction, Mapping, Program, QubitDecl, Stmt, StmtKind, Subcircuit, VersionNode,
};
use cqasm_data_structures::{language::Dialect, span::Span, version::Version};

pub(super) fn program(s: &mut Scanner) -> Program {
    skip_newlines(s);
    let version = match version_header(s) {
        Ok(version) => version,
        Err(error) => {
            s.push_error(error);
            s.recover(&[TokenKind::Newline, TokenKind::Semi]);
            VersionNode::default()
        }
    };

    let mut statements = Vec::new();
    loop {
        skip_newlines(s);
        if s.peek().kind == TokenKind::Eof {
            break;
        }
        let lo = s.peek().span.lo;
        match stmt(s) {
            Ok(stmt) => {
                statements.push(stmt);
                terminator(s);
            }
            Err(error) => {
                s.push_error(error);
                s.recover(&[TokenKind::Newline, TokenKind::Semi]);
                statements.push(Stmt {
                    span: s.span(lo),
                    kind: StmtKind::Err,
                });
            }
        }
    }

    Program {
        span: s.span(0),
        version,
        statements,
    }
}

/// Consumes the statement terminator: a newline, a semicolon, or the end of the
/// file. Anything else is an error, recovered by skipping to the next line.
fn terminator(s: &mut Scanner) {
    match s.peek().kind {
        TokenKind::Newline | TokenKind::Semi => s.advance(),
        TokenKind::Eof => {}
        _ => {
            s.push_error(Error(ErrorKind::MissingTerminator(s.peek().span)));
            s.recover(&[TokenKind::Newline, TokenKind::Semi]);
        }
    }
}

/// Parses `version M(.N)*`. The components arrive as integer and float tokens
/// plus adjacent dots; they are re-joined textually before parsing.
fn version_header(s: &mut Scanner) -> Result<VersionNode> {
    token(s, TokenKind::Keyword(Keyword::Version))?;
    let start = s.peek();
    let mut text = String::new();
    match start.kind {
        TokenKind::Int | TokenKind::Float => {
            text.push_str(s.read());
            s.advance();
        }
        _ => {
            return Err(Error(ErrorKind::Rule(
                "version number",
                start.kind,
                start.span,
            )));
        }
    }
    while s.peek().kind == TokenKind::Dot && s.peek().span.lo == s.span(start.span.lo).hi {
        s.advance();
        let component = s.peek();
        if component.kind != TokenKind::Int {
            return Err(Error(ErrorKind::Rule(
                "version number",
                component.kind,
                component.span,
            )));
        }
        text.push('.');
        text.push_str(s.read());
        s.advance();
    }
    let span = s.span(start.span.lo);
    let version: Version = text
        .parse()
        .map_err(|_| Error(ErrorKind::Lit("version", span)))?;
    terminator(s);
    Ok(VersionNode { span, version })
}

fn stmt(s: &mut Scanner) -> Result<Stmt> {
    let peek = s.peek();
    let lo = peek.span.lo;
    let kind = match peek.kind {
        TokenKind::Keyword(Keyword::Qubits) => {
            dialect_gate(s, Dialect::V1, "qubits", peek.span)?;
            s.advance();
            let size = expr(s)?;
            StmtKind::QubitDecl(Box::new(QubitDecl {
                size: Some(size),
                name: None,
            }))
        }
        TokenKind::Keyword(Keyword::Qubit) => {
            dialect_gate(s, Dialect::V3, "qubit", peek.span)?;
            s.advance();
            let size = bracketed_size(s)?;
            let name = ident(s)?;
            StmtKind::QubitDecl(Box::new(QubitDecl {
                size,
                name: Some(name),
            }))
        }
        TokenKind::Keyword(Keyword::Bit) => {
            dialect_gate(s, Dialect::V3, "bit", peek.span)?;
            s.advance();
            let size = bracketed_size(s)?;
            let name = ident(s)?;
            StmtKind::BitDecl(Box::new(BitDecl { size, name }))
        }
        TokenKind::Keyword(Keyword::Map) => {
            s.advance();
            let name = ident(s)?;
            token(s, TokenKind::Eq)?;
            let value = expr(s)?;
            let annotations = annotations(s)?;
            StmtKind::Mapping(Box::new(Mapping {
                name,
                value,
                annotations,
            }))
        }
        TokenKind::Keyword(Keyword::Break) => {
            dialect_gate(s, Dialect::V3, "break", peek.span)?;
            s.advance();
            StmtKind::Break
        }
        TokenKind::Keyword(Keyword::Continue) => {
            dialect_gate(s, Dialect::V3, "continue", peek.span)?;
            s.advance();
            StmtKind::Continue
        }
        TokenKind::Dot => {
            dialect_gate(s, Dialect::V1, "subcircuit", peek.span)?;
            s.advance();
            let name = ident(s)?;
            let iterations = if s.peek().kind == TokenKind::Open(Delim::Paren) {
                s.advance();
                let iterations = expr(s)?;
                token(s, TokenKind::Close(Delim::Paren))?;
                Some(iterations)
            } else {
                None
            };
            let annotations = annotations(s)?;
            StmtKind::Subcircuit(Box::new(Subcircuit {
                name,
                iterations,
                annotations,
            }))
        }
        TokenKind::Open(Delim::Brace) => {
            s.advance();
            let mut instructions = Vec::new();
            loop {
                skip_newlines(s);
                instructions.push(instruction(s, true)?);
                skip_newlines(s);
                if token(s, TokenKind::Bar).is_err() {
                    break;
                }
            }
            token(s, TokenKind::Close(Delim::Brace))?;
            let annotations = annotations(s)?;
            StmtKind::Bundle(Box::new(Bundle {
                instructions,
                annotations,
            }))
        }
        TokenKind::Ident if s.dialect() == Dialect::V1 && s.read() == "error_model" => {
            s.advance();
            let name = ident(s)?;
            let args = if token(s, TokenKind::Comma).is_ok() {
                seq(s, expr)?
            } else {
                Vec::new()
            };
            let annotations = annotations(s)?;
            StmtKind::ErrorModel(Box::new(ErrorModelStmt {
                name,
                args,
                annotations,
            }))
        }
        _ => StmtKind::Bundle(Box::new(Bundle {
            instructions: vec![instruction(s, false)?],
            annotations: Vec::new(),
        })),
    };
    Ok(Stmt {
        span: s.span(lo),
        kind,
    })
}

fn dialect_gate(
    s: &Scanner,
    expected: Dialect,
    name: &'static str,
    span: Span,
) -> Result<()> {
    if s.dialect() == expected {
        Ok(())
    } else {
        Err(Error(ErrorKind::DialectStmt(name, span)))
    }
}

fn bracketed_size(s: &mut Scanner) -> Result<Option<Expr>> {
    if s.peek().kind == TokenKind::Open(Delim::Bracket) {
        s.advance();
        let size = expr(s)?;
        token(s, TokenKind::Close(Delim::Bracket))?;
        Ok(Some(size))
    } else {
        Ok(None)
    }
}

fn instruction(s: &mut Scanner, in_bundle: bool) -> Result<Instruction> {
    let lo = s.peek().span.lo;

    if s.dialect() == Dialect::V3 {
        if let Some(first) = modifiers_start(s)? {
            return match first {
                ModifierStart::Name(name) => {
                    instruction_with_head(s, lo, name, Vec::new(), in_bundle)
                }
                ModifierStart::Modifiers(modifiers) => {
                    let name = ident(s)?;
                    finish_instruction(s, lo, name, None, modifiers, in_bundle)
                }
            };
        }
    }

    if s.peek().kind == TokenKind::Ident {
        let name = instruction_name(s)?;
        return instruction_with_head(s, lo, name, Vec::new(), in_bundle);
    }

    // The statement does not start with a name, so the leading expression can
    // only be a condition (legacy dialect) or a measure target (3.x dialect).
    let first = operand_expr(s, in_bundle)?;
    instruction_with_first_expr(s, lo, first, in_bundle)
}

/// Continues an instruction whose leading identifier was already parsed. When
/// the identifier turns out to start a larger expression (`b[0]: x q[0]`,
/// `b[1] = measure q[1]`), that expression is completed first.
fn instruction_with_head(
    s: &mut Scanner,
    lo: u32,
    name: Ident,
    modifiers: Vec<GateModifier>,
    in_bundle: bool,
) -> Result<Instruction> {
    let peek = s.peek().kind;
    let head_continues = peek == TokenKind::Open(Delim::Bracket)
        || peek == TokenKind::Colon
        || (s.dialect() == Dialect::V3 && peek == TokenKind::Eq)
        || continues_expr(peek);
    if head_continues {
        let head = Expr {
            span: name.span,
            kind: ExprKind::Ident(name),
        };
        let first = continue_expr(s, head, in_bundle)?;
        instruction_with_first_expr(s, lo, first, in_bundle)
    } else {
        finish_instruction(s, lo, name, None, modifiers, in_bundle)
    }
}

/// Continues an instruction whose leading expression is complete: a colon makes
/// it the condition (legacy dialect), an equals sign the target of a measure
/// assignment (3.x dialect).
fn instruction_with_first_expr(
    s: &mut Scanner,
    lo: u32,
    first: Expr,
    in_bundle: bool,
) -> Result<Instruction> {
    if s.dialect() == Dialect::V1 && s.peek().kind == TokenKind::Colon {
        s.advance();
        let name = instruction_name(s)?;
        return finish_instruction(s, lo, name, Some(first), Vec::new(), in_bundle);
    }
    if s.dialect() == Dialect::V3 && s.peek().kind == TokenKind::Eq {
        s.advance();
        let name = ident(s)?;
        let source = operand_expr(s, in_bundle)?;
        let annotations = annotations(s)?;
        return Ok(Instruction {
            span: s.span(lo),
            name,
            modifiers: Vec::new(),
            condition: None,
            operands: vec![first, source],
            annotations,
        });
    }

    let name = expr_to_name(first)?;
    finish_instruction(s, lo, name, None, Vec::new(), in_bundle)
}

fn finish_instruction(
    s: &mut Scanner,
    lo: u32,
    name: Ident,
    condition: Option<Expr>,
    modifiers: Vec<GateModifier>,
    in_bundle: bool,
) -> Result<Instruction> {
    let operands = if starts_expr(s) {
        seq(s, |s| operand_expr(s, in_bundle))?
    } else {
        Vec::new()
    };
    let annotations = annotations(s)?;
    Ok(Instruction {
        span: s.span(lo),
        name,
        modifiers,
        condition,
        operands,
        annotations,
    })
}

enum ModifierStart {
    /// The identifier turned out to be the instruction name after all.
    Name(Ident),
    /// One or more gate modifiers, each followed by a dot.
    Modifiers(Vec<GateModifier>),
}

/// Parses a v3 gate modifier chain: `inv.`, `ctrl.`, and `pow(exponent).`
/// prefixes, in source order. Returns `None` when the next token does not look
/// like a modifier at all.
fn modifiers_start(s: &mut Scanner) -> Result<Option<ModifierStart>> {
    let mut modifiers = Vec::new();
    loop {
        let peek = s.peek();
        let is_modifier =
            peek.kind == TokenKind::Ident && matches!(s.read(), "inv" | "pow" | "ctrl");
        if !is_modifier {
            if modifiers.is_empty() {
                return Ok(None);
            }
            return Ok(Some(ModifierStart::Modifiers(modifiers)));
        }

        let name = s.read();
        s.advance();
        match name {
            "pow" => {
                token(s, TokenKind::Open(Delim::Paren))?;
                let exponent = expr(s)?;
                token(s, TokenKind::Close(Delim::Paren))?;
                token(s, TokenKind::Dot)?;
                modifiers.push(GateModifier {
                    span: s.span(peek.span.lo),
                    kind: GateModifierKind::Pow(exponent),
                });
            }
            modifier => {
                if s.peek().kind == TokenKind::Dot {
                    s.advance();
                    modifiers.push(GateModifier {
                        span: s.span(peek.span.lo),
                        kind: if modifier == "inv" {
                            GateModifierKind::Inv
                        } else {
                            GateModifierKind::Ctrl
                        },
                    });
                } else if modifiers.is_empty() {
                    // `inv` with no dot is an ordinary instruction name.
                    return Ok(Some(ModifierStart::Name(Ident {
                        span: peek.span,
                        name: modifier.into(),
                    })));
                } else {
                    return Err(Error(ErrorKind::Token(
                        TokenKind::Dot,
                        s.peek().kind,
                        s.peek().span,
                    )));
                }
            }
        }
    }
}

/// Parses an instruction name, joining `-`-separated identifiers written
/// without spaces (`reset-averaging`) into a single name.
fn instruction_name(s: &mut Scanner) -> Result<Ident> {
    let mut name = ident(s)?;
    while s.peek().kind == TokenKind::Minus && s.peek().span.lo == name.span.hi {
        let minus = s.peek().span;
        s.advance();
        let part = ident(s)?;
        if part.span.lo != minus.hi {
            return Err(Error(ErrorKind::Rule(
                "instruction name",
                s.peek().kind,
                part.span,
            )));
        }
        name = Ident {
            span: name.span.union(part.span),
            name: format!("{}-{}", name.name, part.name).into(),
        };
    }
    Ok(name)
}

/// Reinterprets an already-parsed expression as an instruction name. Identifier
/// chains joined by adjacent minus signs fold back into hyphenated names.
fn expr_to_name(expr: Expr) -> Result<Ident> {
    match expr.kind {
        ExprKind::Ident(ident) => Ok(ident),
        ExprKind::BinOp(cqasm_ast::ast::BinOp::Sub, lhs, rhs) => {
            let lhs = expr_to_name(*lhs)?;
            let rhs = expr_to_name(*rhs)?;
            if rhs.span.lo == lhs.span.hi + 1 {
                Ok(Ident {
                    span: lhs.span.union(rhs.span),
                    name: format!("{}-{}", lhs.name, rhs.name).into(),
                })
            } else {
                Err(Error(ErrorKind::Rule(
                    "instruction name",
                    TokenKind::Minus,
                    expr.span,
                )))
            }
        }
        _ => Err(Error(ErrorKind::Rule(
            "instruction name",
            TokenKind::Ident,
            expr.span,
        ))),
    }
}

/// Whether the next token can start an operand expression.
fn starts_expr(s: &Scanner) -> bool {
    match s.peek().kind {
        TokenKind::Ident
        | TokenKind::Int
        | TokenKind::Float
        | TokenKind::String
        | TokenKind::Minus
        | TokenKind::Bang
        | TokenKind::Tilde
        | TokenKind::Open(Delim::Paren)
        | TokenKind::Open(Delim::Bracket)
        | TokenKind::Keyword(Keyword::True | Keyword::False) => true,
        _ => false,
    }
}

fn annotations(s: &mut Scanner) -> Result<Vec<Annotation>> {
    let mut annotations = Vec::new();
    while let Some(annotation) = opt(s, annotation)? {
        annotations.push(annotation);
    }
    Ok(annotations)
}

fn annotation(s: &mut Scanner) -> Result<Annotation> {
    let lo = s.peek().span.lo;
    token(s, TokenKind::At)?;
    let interface = ident(s)?;
    token(s, TokenKind::Dot)?;
    let operation = ident(s)?;
    let operands = if s.peek().kind == TokenKind::Open(Delim::Paren) {
        s.advance();
        let operands = if s.peek().kind == TokenKind::Close(Delim::Paren) {
            Vec::new()
        } else {
            seq(s, expr)?
        };
        token(s, TokenKind::Close(Delim::Paren))?;
        operands
    } else {
        Vec::new()
    };
    Ok(Annotation {
        span: s.span(lo),
        interface,
        operation,
        operands,
    })
}
