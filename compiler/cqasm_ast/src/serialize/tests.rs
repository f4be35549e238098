// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use super::{program_from_value, program_to_value};
use crate::ast::{
    Annotation, Bundle, Expr, ExprKind, GateModifier, GateModifierKind, Ident, IndexItem,
    Instruction, Lit, Mapping, Program, QubitDecl, Stmt, StmtKind, VersionNode,
};
use cqasm_data_structures::{cbor, span::Span, version::Version};

fn span(lo: u32, hi: u32) -> Span {
    Span { lo, hi }
}

fn ident(lo: u32, hi: u32, name: &str) -> Ident {
    Ident {
        span: span(lo, hi),
        name: name.into(),
    }
}

fn expr(lo: u32, hi: u32, kind: ExprKind) -> Expr {
    Expr {
        span: span(lo, hi),
        kind,
    }
}

fn sample_program() -> Program {
    Program {
        span: span(0, 60),
        version: VersionNode {
            span: span(8, 11),
            version: Version::new(&[1, 0]),
        },
        statements: vec![
            Stmt {
                span: span(12, 20),
                kind: StmtKind::QubitDecl(Box::new(QubitDecl {
                    size: Some(expr(19, 20, ExprKind::Lit(Lit::Int(2)))),
                    name: None,
                })),
            },
            Stmt {
                span: span(21, 36),
                kind: StmtKind::Mapping(Box::new(Mapping {
                    name: ident(25, 30, "theta"),
                    value: expr(
                        33,
                        36,
                        ExprKind::BinOp(
                            crate::ast::BinOp::Mul,
                            Box::new(expr(33, 34, ExprKind::Lit(Lit::Real(0.5)))),
                            Box::new(expr(
                                35,
                                36,
                                ExprKind::Ident(ident(35, 36, "pi")),
                            )),
                        ),
                    ),
                    annotations: vec![Annotation {
                        span: span(37, 50),
                        interface: ident(38, 42, "test"),
                        operation: ident(43, 48, "annot"),
                        operands: vec![expr(49, 50, ExprKind::Lit(Lit::String("x".into())))],
                    }],
                })),
            },
            Stmt {
                span: span(40, 60),
                kind: StmtKind::Bundle(Box::new(Bundle {
                    instructions: vec![Instruction {
                        span: span(40, 60),
                        name: ident(40, 42, "rx"),
                        modifiers: vec![GateModifier {
                            span: span(40, 43),
                            kind: GateModifierKind::Inv,
                        }],
                        condition: Some(expr(44, 45, ExprKind::Lit(Lit::Bool(true)))),
                        operands: vec![expr(
                            46,
                            55,
                            ExprKind::Index(
                                Box::new(expr(46, 47, ExprKind::Ident(ident(46, 47, "q")))),
                                vec![
                                    IndexItem::Single(expr(48, 49, ExprKind::Lit(Lit::Int(0)))),
                                    IndexItem::Range(
                                        expr(50, 51, ExprKind::Lit(Lit::Int(1))),
                                        expr(52, 53, ExprKind::Lit(Lit::Int(3))),
                                    ),
                                ],
                            ),
                        )],
                        annotations: Vec::new(),
                    }],
                    annotations: Vec::new(),
                })),
            },
        ],
    }
}

#[test]
fn value_round_trip() {
    let program = sample_program();
    let value = program_to_value(&program);
    assert_eq!(program_from_value(&value), Ok(program));
}

#[test]
fn binary_round_trip() {
    let program = sample_program();
    let bytes = cbor::encode(&program_to_value(&program));
    let value = cbor::decode(&bytes).expect("blob should decode");
    assert_eq!(program_from_value(&value), Ok(program));
}

#[test]
fn empty_program_round_trips() {
    let program = Program::default();
    let value = program_to_value(&program);
    assert_eq!(program_from_value(&value), Ok(program));
}
