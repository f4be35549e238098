// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Expression parsing makes use of Pratt parsing (or "top-down operator-precedence
//! parsing") to handle relative precedence of operators.

use crate::{
    keyword::Keyword,
    lex::{Delim, TokenKind},
    prim::{ident, seq, skip_newlines, token},
    scan::Scanner,
    Error, ErrorKind, Result,
};
use cqasm_ast::ast::{BinOp, Expr, ExprKind, Ident, IndexItem, Lit, UnOp};
use cqasm_data_structures::language::Dialect;

struct PrefixOp {
    kind: UnOp,
    precedence: u8,
}

struct MixfixOp {
    kind: OpKind,
    precedence: u8,
}

enum OpKind {
    Binary(BinOp, Assoc),
    Ternary,
    Index,
}

#[derive(Clone, Copy)]
enum Assoc {
    Left,
    Right,
}

#[derive(Clone, Copy)]
struct OpContext {
    min_precedence: u8,
    /// Inside a bundle, a top-level `|` separates instructions instead of
    /// binding as bitwise-or. Parentheses and brackets reset this.
    no_bar: bool,
}

const TERNARY_PRECEDENCE: u8 = 1;
const PREFIX_PRECEDENCE: u8 = 14;
const POSTFIX_PRECEDENCE: u8 = 15;

pub(super) fn expr(s: &mut Scanner) -> Result<Expr> {
    expr_op(
        s,
        OpContext {
            min_precedence: 0,
            no_bar: false,
        },
    )
}

/// Parses an instruction operand or condition. When `in_bundle` is set, a
/// top-level `|` ends the expression.
pub(super) fn operand_expr(s: &mut Scanner, in_bundle: bool) -> Result<Expr> {
    expr_op(
        s,
        OpContext {
            min_precedence: 0,
            no_bar: in_bundle,
        },
    )
}

/// Continues parsing an expression whose first operand was already consumed by
/// the statement parser while it was still deciding what the statement is.
pub(super) fn continue_expr(s: &mut Scanner, lhs: Expr, in_bundle: bool) -> Result<Expr> {
    expr_loop(
        s,
        lhs,
        OpContext {
            min_precedence: 0,
            no_bar: in_bundle,
        },
    )
}

/// Whether the token continues an already-started expression when it follows
/// the first operand.
pub(super) fn continues_expr(kind: TokenKind) -> bool {
    mixfix_op(kind).is_some()
}

fn expr_op(s: &mut Scanner, context: OpContext) -> Result<Expr> {
    let lo = s.peek().span.lo;
    let lhs = if let Some(op) = prefix_op(s.peek().kind) {
        s.advance();
        let rhs = expr_op(
            s,
            OpContext {
                min_precedence: op.precedence,
                ..context
            },
        )?;
        Expr {
            span: s.span(lo),
            kind: ExprKind::UnOp(op.kind, Box::new(rhs)),
        }
    } else {
        expr_base(s)?
    };

    expr_loop(s, lhs, context)
}

fn expr_loop(s: &mut Scanner, mut lhs: Expr, context: OpContext) -> Result<Expr> {
    let lo = lhs.span.lo;
    loop {
        let peek = s.peek().kind;
        if peek == TokenKind::Bar && context.no_bar {
            break;
        }
        let Some(op) = mixfix_op(peek) else {
            break;
        };
        if op.precedence < context.min_precedence {
            break;
        }

        s.advance();
        lhs = match op.kind {
            OpKind::Binary(kind, assoc) => {
                let rhs = expr_op(
                    s,
                    OpContext {
                        min_precedence: next_precedence(op.precedence, assoc),
                        ..context
                    },
                )?;
                Expr {
                    span: s.span(lo),
                    kind: ExprKind::BinOp(kind, Box::new(lhs), Box::new(rhs)),
                }
            }
            OpKind::Ternary => {
                let if_true = expr_op(
                    s,
                    OpContext {
                        min_precedence: 0,
                        ..context
                    },
                )?;
                token(s, TokenKind::Colon)?;
                let if_false = expr_op(
                    s,
                    OpContext {
                        min_precedence: op.precedence,
                        ..context
                    },
                )?;
                Expr {
                    span: s.span(lo),
                    kind: ExprKind::TernOp(Box::new(lhs), Box::new(if_true), Box::new(if_false)),
                }
            }
            OpKind::Index => {
                let items = seq(s, index_item)?;
                token(s, TokenKind::Close(Delim::Bracket))?;
                Expr {
                    span: s.span(lo),
                    kind: ExprKind::Index(Box::new(lhs), items),
                }
            }
        };
    }

    Ok(lhs)
}

fn expr_base(s: &mut Scanner) -> Result<Expr> {
    let peek = s.peek();
    let lo = peek.span.lo;
    match peek.kind {
        TokenKind::Open(Delim::Paren) => {
            s.advance();
            skip_newlines(s);
            let inner = expr(s)?;
            skip_newlines(s);
            token(s, TokenKind::Close(Delim::Paren))?;
            Ok(Expr {
                span: s.span(lo),
                kind: ExprKind::Paren(Box::new(inner)),
            })
        }
        TokenKind::Open(Delim::Bracket) if s.dialect() == Dialect::V1 => matrix(s),
        TokenKind::Int => {
            let lexeme = s.read();
            s.advance();
            let value: i64 = lexeme
                .parse()
                .map_err(|_| Error(ErrorKind::Lit("integer", peek.span)))?;
            Ok(Expr {
                span: peek.span,
                kind: ExprKind::Lit(Lit::Int(value)),
            })
        }
        TokenKind::Float => {
            let lexeme = s.read();
            s.advance();
            let value: f64 = lexeme
                .parse()
                .map_err(|_| Error(ErrorKind::Lit("floating-point", peek.span)))?;
            Ok(Expr {
                span: peek.span,
                kind: ExprKind::Lit(Lit::Real(value)),
            })
        }
        TokenKind::String => {
            let lexeme = s.read();
            s.advance();
            let value = unescape(lexeme, peek.span.lo)?;
            Ok(Expr {
                span: peek.span,
                kind: ExprKind::Lit(Lit::String(value.into())),
            })
        }
        TokenKind::Keyword(keyword @ (Keyword::True | Keyword::False)) => {
            s.advance();
            // The 3.x dialect has boolean literals; in the legacy dialect the
            // same spellings are default mappings, so they stay identifiers.
            let kind = if s.dialect() == Dialect::V3 {
                ExprKind::Lit(Lit::Bool(keyword == Keyword::True))
            } else {
                ExprKind::Ident(Ident {
                    span: peek.span,
                    name: keyword.as_str().into(),
                })
            };
            Ok(Expr {
                span: peek.span,
                kind,
            })
        }
        TokenKind::Ident => {
            let name = ident(s)?;
            if s.peek().kind == TokenKind::Open(Delim::Paren) {
                s.advance();
                skip_newlines(s);
                let args = if s.peek().kind == TokenKind::Close(Delim::Paren) {
                    Vec::new()
                } else {
                    seq(s, expr)?
                };
                skip_newlines(s);
                token(s, TokenKind::Close(Delim::Paren))?;
                Ok(Expr {
                    span: s.span(lo),
                    kind: ExprKind::Call(name, args),
                })
            } else {
                Ok(Expr {
                    span: peek.span,
                    kind: ExprKind::Ident(name),
                })
            }
        }
        _ => Err(Error(ErrorKind::Rule("expression", peek.kind, peek.span))),
    }
}

fn index_item(s: &mut Scanner) -> Result<IndexItem> {
    let first = expr(s)?;
    if token(s, TokenKind::Colon).is_ok() {
        let last = expr(s)?;
        Ok(IndexItem::Range(first, last))
    } else {
        Ok(IndexItem::Single(first))
    }
}

/// A matrix literal: comma-separated entries, `|`-separated rows (v1).
fn matrix(s: &mut Scanner) -> Result<Expr> {
    let lo = s.peek().span.lo;
    token(s, TokenKind::Open(Delim::Bracket))?;
    let mut rows = Vec::new();
    loop {
        skip_newlines(s);
        let row = seq(s, |s| {
            expr_op(
                s,
                OpContext {
                    min_precedence: 0,
                    no_bar: true,
                },
            )
        })?;
        rows.push(row);
        skip_newlines(s);
        if token(s, TokenKind::Bar).is_err() {
            break;
        }
    }
    token(s, TokenKind::Close(Delim::Bracket))?;
    Ok(Expr {
        span: s.span(lo),
        kind: ExprKind::Matrix(rows),
    })
}

fn unescape(lexeme: &str, offset: u32) -> Result<String> {
    // Strip the surrounding quotes; the lexer guarantees they are present.
    let inner = &lexeme[1..lexeme.len() - 1];
    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.char_indices();
    while let Some((i, c)) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some((_, 't')) => result.push('\t'),
            Some((_, 'n')) => result.push('\n'),
            Some((_, 'r')) => result.push('\r'),
            Some((_, '\'')) => result.push('\''),
            Some((_, '"')) => result.push('"'),
            Some((_, '\\')) => result.push('\\'),
            Some((j, other)) => {
                let lo = offset + 1 + u32::try_from(i).expect("escape offset should fit into u32");
                let hi = offset
                    + 1
                    + u32::try_from(j + other.len_utf8())
                        .expect("escape offset should fit into u32");
                return Err(Error(ErrorKind::Escape(
                    other,
                    cqasm_data_structures::span::Span { lo, hi },
                )));
            }
            None => result.push('\\'),
        }
    }
    Ok(result)
}

fn prefix_op(kind: TokenKind) -> Option<PrefixOp> {
    let op = match kind {
        TokenKind::Minus => UnOp::Neg,
        TokenKind::Bang => UnOp::NotL,
        TokenKind::Tilde => UnOp::NotB,
        _ => return None,
    };
    Some(PrefixOp {
        kind: op,
        precedence: PREFIX_PRECEDENCE,
    })
}

fn mixfix_op(kind: TokenKind) -> Option<MixfixOp> {
    let (op, precedence) = match kind {
        TokenKind::Question => {
            return Some(MixfixOp {
                kind: OpKind::Ternary,
                precedence: TERNARY_PRECEDENCE,
            });
        }
        TokenKind::Open(Delim::Bracket) => {
            return Some(MixfixOp {
                kind: OpKind::Index,
                precedence: POSTFIX_PRECEDENCE,
            });
        }
        TokenKind::BarBar => (OpKind::Binary(BinOp::OrL, Assoc::Left), 2),
        TokenKind::CaretCaret => (OpKind::Binary(BinOp::XorL, Assoc::Left), 3),
        TokenKind::AmpAmp => (OpKind::Binary(BinOp::AndL, Assoc::Left), 4),
        TokenKind::Bar => (OpKind::Binary(BinOp::OrB, Assoc::Left), 5),
        TokenKind::Caret => (OpKind::Binary(BinOp::XorB, Assoc::Left), 6),
        TokenKind::Amp => (OpKind::Binary(BinOp::AndB, Assoc::Left), 7),
        TokenKind::EqEq => (OpKind::Binary(BinOp::Eq, Assoc::Left), 8),
        TokenKind::Ne => (OpKind::Binary(BinOp::Ne, Assoc::Left), 8),
        TokenKind::Gt => (OpKind::Binary(BinOp::Gt, Assoc::Left), 9),
        TokenKind::Gte => (OpKind::Binary(BinOp::Gte, Assoc::Left), 9),
        TokenKind::Lt => (OpKind::Binary(BinOp::Lt, Assoc::Left), 9),
        TokenKind::Lte => (OpKind::Binary(BinOp::Lte, Assoc::Left), 9),
        TokenKind::LtLt => (OpKind::Binary(BinOp::Shl, Assoc::Left), 10),
        TokenKind::GtGt => (OpKind::Binary(BinOp::ShrA, Assoc::Left), 10),
        TokenKind::GtGtGt => (OpKind::Binary(BinOp::ShrL, Assoc::Left), 10),
        TokenKind::Plus => (OpKind::Binary(BinOp::Add, Assoc::Left), 11),
        TokenKind::Minus => (OpKind::Binary(BinOp::Sub, Assoc::Left), 11),
        TokenKind::Star => (OpKind::Binary(BinOp::Mul, Assoc::Left), 12),
        TokenKind::Slash => (OpKind::Binary(BinOp::Div, Assoc::Left), 12),
        TokenKind::SlashSlash => (OpKind::Binary(BinOp::IntDiv, Assoc::Left), 12),
        TokenKind::Percent => (OpKind::Binary(BinOp::Mod, Assoc::Left), 12),
        TokenKind::StarStar => (OpKind::Binary(BinOp::Pow, Assoc::Right), 13),
        _ => return None,
    };
    Some(MixfixOp {
        kind: op,
        precedence,
    })
}

fn next_precedence(precedence: u8, assoc: Assoc) -> u8 {
    match assoc {
        Assoc::Left => precedence + 1,
        Assoc::Right => precedence,
    }
}
