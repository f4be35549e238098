// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::program;
use cqasm_ast::ast::{
    ExprKind, GateModifierKind, IndexItem, Lit, Program, Stmt, StmtKind, UnOp,
};
use cqasm_data_structures::{language::Dialect, version::Version};
use expect_test::expect;
use indoc::indoc;

fn parse_v1(source: &str) -> (Program, Vec<crate::Error>) {
    program(source, Dialect::V1)
}

fn parse_v3(source: &str) -> (Program, Vec<crate::Error>) {
    program(source, Dialect::V3)
}

fn single_instruction(stmt: &Stmt) -> &cqasm_ast::ast::Instruction {
    match &stmt.kind {
        StmtKind::Bundle(bundle) => {
            assert_eq!(bundle.instructions.len(), 1, "expected a lone instruction");
            &bundle.instructions[0]
        }
        _ => panic!("expected a bundle statement, got {stmt}"),
    }
}

#[test]
fn simple_program_tree() {
    let (program, errors) = parse_v1("version 1.0\nqubits 2\nh q[0]\n");
    assert_eq!(errors, Vec::new());
    expect![[r#"
        Program [0-28]: version 1.0
            QubitDecl [12-20]:
                size: Lit [19-20]: Int(2)
            Bundle [21-27]:
                Instruction [21-27]: Ident [21-22] "h"
                    Index [23-27]:
                        Expr [23-24]: Ident [23-24] "q"
                        Lit [25-26]: Int(0)
    "#]]
    .assert_eq(&format!("{program}\n"));
}

#[test]
fn version_components() {
    let (program, errors) = parse_v1("version 1.0.2\n");
    assert_eq!(errors, Vec::new());
    assert_eq!(program.version.version, Version::new(&[1, 0, 2]));

    let (program, errors) = parse_v3("version 3\n");
    assert_eq!(errors, Vec::new());
    assert_eq!(program.version.version, Version::new(&[3]));
}

#[test]
fn missing_version_is_an_error() {
    let (_, errors) = parse_v1("qubits 2\n");
    assert!(!errors.is_empty());
}

#[test]
fn statements_separated_by_semicolons() {
    let (program, errors) = parse_v1("version 1.0; qubits 2; h q[0]");
    assert_eq!(errors, Vec::new());
    assert_eq!(program.statements.len(), 2);
}

#[test]
fn instruction_with_two_operands() {
    let (program, errors) = parse_v1("version 1.0; qubits 2; cnot q[0], q[1]");
    assert_eq!(errors, Vec::new());
    let instruction = single_instruction(&program.statements[1]);
    assert_eq!(&*instruction.name.name, "cnot");
    assert_eq!(instruction.operands.len(), 2);
}

#[test]
fn instruction_without_operands() {
    let (program, errors) = parse_v1("version 1.0; qubits 2; measure_all");
    assert_eq!(errors, Vec::new());
    let instruction = single_instruction(&program.statements[1]);
    assert_eq!(&*instruction.name.name, "measure_all");
    assert_eq!(instruction.operands, Vec::new());
}

#[test]
fn hyphenated_instruction_name() {
    let (program, errors) = parse_v1("version 1.0; qubits 2; reset-averaging");
    assert_eq!(errors, Vec::new());
    let instruction = single_instruction(&program.statements[1]);
    assert_eq!(&*instruction.name.name, "reset-averaging");
}

#[test]
fn condition_prefix() {
    let (program, errors) = parse_v1("version 1.0; qubits 2; b[0]: x q[0]");
    assert_eq!(errors, Vec::new());
    let instruction = single_instruction(&program.statements[1]);
    assert_eq!(&*instruction.name.name, "x");
    assert!(instruction.condition.is_some());
    assert_eq!(instruction.operands.len(), 1);
}

#[test]
fn bundle_with_two_instructions() {
    let (program, errors) = parse_v1("version 1.0; qubits 2; { h q[0] | x q[1] }");
    assert_eq!(errors, Vec::new());
    let StmtKind::Bundle(bundle) = &program.statements[1].kind else {
        panic!("expected a bundle");
    };
    assert_eq!(bundle.instructions.len(), 2);
    assert_eq!(&*bundle.instructions[0].name.name, "h");
    assert_eq!(&*bundle.instructions[1].name.name, "x");
}

#[test]
fn bar_binds_as_bitwise_or_inside_parens() {
    let (program, errors) = parse_v1("version 1.0; qubits 2; { skip (1|2) }");
    assert_eq!(errors, Vec::new());
    let StmtKind::Bundle(bundle) = &program.statements[1].kind else {
        panic!("expected a bundle");
    };
    assert_eq!(bundle.instructions.len(), 1);
    assert_eq!(bundle.instructions[0].operands.len(), 1);
}

#[test]
fn multiline_bundle() {
    let (program, errors) = parse_v1(indoc! {"
        version 1.0
        qubits 2
        {
            h q[0] |
            x q[1]
        }
    "});
    assert_eq!(errors, Vec::new());
    let StmtKind::Bundle(bundle) = &program.statements[1].kind else {
        panic!("expected a bundle");
    };
    assert_eq!(bundle.instructions.len(), 2);
}

#[test]
fn map_statement() {
    let (program, errors) = parse_v1("version 1.0; map three = 1 + 2");
    assert_eq!(errors, Vec::new());
    let StmtKind::Mapping(mapping) = &program.statements[0].kind else {
        panic!("expected a mapping");
    };
    assert_eq!(&*mapping.name.name, "three");
    assert!(matches!(mapping.value.kind, ExprKind::BinOp(..)));
}

#[test]
fn map_with_annotations() {
    let (program, errors) = parse_v1("version 1.0; map three = 3 @first.annot @second.annot(1)");
    assert_eq!(errors, Vec::new());
    let StmtKind::Mapping(mapping) = &program.statements[0].kind else {
        panic!("expected a mapping");
    };
    assert_eq!(mapping.annotations.len(), 2);
    assert_eq!(&*mapping.annotations[0].interface.name, "first");
    assert_eq!(mapping.annotations[0].operands.len(), 0);
    assert_eq!(mapping.annotations[1].operands.len(), 1);
}

#[test]
fn subcircuit_headers() {
    let (program, errors) = parse_v1("version 1.0; qubits 2; .init\n.loop(10)\nx q[0]");
    assert_eq!(errors, Vec::new());
    let StmtKind::Subcircuit(init) = &program.statements[1].kind else {
        panic!("expected a subcircuit");
    };
    assert_eq!(&*init.name.name, "init");
    assert!(init.iterations.is_none());
    let StmtKind::Subcircuit(loop_) = &program.statements[2].kind else {
        panic!("expected a subcircuit");
    };
    assert!(loop_.iterations.is_some());
}

#[test]
fn error_model_statement() {
    let (program, errors) = parse_v1("version 1.0; error_model depolarizing_channel, 0.001");
    assert_eq!(errors, Vec::new());
    let StmtKind::ErrorModel(model) = &program.statements[0].kind else {
        panic!("expected an error model");
    };
    assert_eq!(&*model.name.name, "depolarizing_channel");
    assert_eq!(model.args.len(), 1);
}

#[test]
fn matrix_literal() {
    let (program, errors) = parse_v1("version 1.0; map id = [1, 0 | 0, 1]");
    assert_eq!(errors, Vec::new());
    let StmtKind::Mapping(mapping) = &program.statements[0].kind else {
        panic!("expected a mapping");
    };
    let ExprKind::Matrix(rows) = &mapping.value.kind else {
        panic!("expected a matrix literal");
    };
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].len(), 2);
}

#[test]
fn string_escapes() {
    let (program, errors) = parse_v1(r#"version 1.0; load_state "a\tb\\c""#);
    assert_eq!(errors, Vec::new());
    let instruction = single_instruction(&program.statements[0]);
    let ExprKind::Lit(Lit::String(value)) = &instruction.operands[0].kind else {
        panic!("expected a string literal");
    };
    assert_eq!(&**value, "a\tb\\c");
}

#[test]
fn unknown_escape_is_an_error() {
    let (_, errors) = parse_v1(r#"version 1.0; load_state "a\qb""#);
    assert_eq!(errors.len(), 1);
}

#[test]
fn index_list_and_range() {
    let (program, errors) = parse_v1("version 1.0; qubits 8; x q[0,2,4:6]");
    assert_eq!(errors, Vec::new());
    let instruction = single_instruction(&program.statements[1]);
    let ExprKind::Index(_, items) = &instruction.operands[0].kind else {
        panic!("expected an index expression");
    };
    assert_eq!(items.len(), 3);
    assert!(matches!(items[2], IndexItem::Range(..)));
}

#[test]
fn expression_precedence() {
    let (program, errors) = parse_v1("version 1.0; map v = 1 + 2 * 3 ** 4");
    assert_eq!(errors, Vec::new());
    let StmtKind::Mapping(mapping) = &program.statements[0].kind else {
        panic!("expected a mapping");
    };
    // The tree must be 1 + (2 * (3 ** 4)).
    let ExprKind::BinOp(cqasm_ast::ast::BinOp::Add, lhs, rhs) = &mapping.value.kind else {
        panic!("expected addition at the top");
    };
    assert!(matches!(lhs.kind, ExprKind::Lit(Lit::Int(1))));
    let ExprKind::BinOp(cqasm_ast::ast::BinOp::Mul, _, pow) = &rhs.kind else {
        panic!("expected multiplication below addition");
    };
    assert!(matches!(
        pow.kind,
        ExprKind::BinOp(cqasm_ast::ast::BinOp::Pow, _, _)
    ));
}

#[test]
fn ternary_expression() {
    let (program, errors) = parse_v1("version 1.0; map v = true ? 1 : 2");
    assert_eq!(errors, Vec::new());
    let StmtKind::Mapping(mapping) = &program.statements[0].kind else {
        panic!("expected a mapping");
    };
    assert!(matches!(mapping.value.kind, ExprKind::TernOp(..)));
}

#[test]
fn unary_operators() {
    let (program, errors) = parse_v1("version 1.0; map v = -3");
    assert_eq!(errors, Vec::new());
    let StmtKind::Mapping(mapping) = &program.statements[0].kind else {
        panic!("expected a mapping");
    };
    assert!(matches!(
        mapping.value.kind,
        ExprKind::UnOp(UnOp::Neg, _)
    ));
}

#[test]
fn error_recovery_keeps_later_statements() {
    let (program, errors) = parse_v1("version 1.0; qubits 2; map = ; x q[0]");
    assert!(!errors.is_empty());
    assert!(program
        .statements
        .iter()
        .any(|s| matches!(s.kind, StmtKind::Err)));
    let last = program.statements.last().expect("statements should remain");
    assert_eq!(&*single_instruction(last).name.name, "x");
}

#[test]
fn v3_register_declarations() {
    let (program, errors) = parse_v3("version 3\nqubit[5] q\nbit[5] b\nqubit single");
    assert_eq!(errors, Vec::new());
    let StmtKind::QubitDecl(qubits) = &program.statements[0].kind else {
        panic!("expected a qubit declaration");
    };
    assert!(qubits.size.is_some());
    assert_eq!(&*qubits.name.as_ref().expect("name should be set").name, "q");
    let StmtKind::BitDecl(bits) = &program.statements[1].kind else {
        panic!("expected a bit declaration");
    };
    assert!(bits.size.is_some());
    let StmtKind::QubitDecl(single) = &program.statements[2].kind else {
        panic!("expected a qubit declaration");
    };
    assert!(single.size.is_none());
}

#[test]
fn v1_register_keywords_do_not_cross_dialects() {
    let (_, errors) = parse_v3("version 3\nqubits 2");
    assert!(!errors.is_empty());
    let (_, errors) = parse_v1("version 1.0\nqubit[2] q");
    assert!(!errors.is_empty());
}

#[test]
fn v3_measure_assignment() {
    let (program, errors) = parse_v3("version 3\nqubit[2] q\nbit[2] b\nb = measure q");
    assert_eq!(errors, Vec::new());
    let instruction = single_instruction(&program.statements[2]);
    assert_eq!(&*instruction.name.name, "measure");
    assert_eq!(instruction.operands.len(), 2);
}

#[test]
fn v3_indexed_measure_assignment() {
    let (program, errors) = parse_v3("version 3\nqubit[2] q\nbit[2] b\nb[1] = measure q[0]");
    assert_eq!(errors, Vec::new());
    let instruction = single_instruction(&program.statements[2]);
    assert_eq!(&*instruction.name.name, "measure");
    assert!(matches!(instruction.operands[0].kind, ExprKind::Index(..)));
}

#[test]
fn v3_gate_modifiers() {
    let (program, errors) = parse_v3("version 3\nqubit[2] q\ninv.pow(2.0).ctrl.X q[0], q[1]");
    assert_eq!(errors, Vec::new());
    let instruction = single_instruction(&program.statements[1]);
    assert_eq!(&*instruction.name.name, "X");
    assert_eq!(instruction.modifiers.len(), 3);
    assert!(matches!(instruction.modifiers[0].kind, GateModifierKind::Inv));
    assert!(matches!(
        instruction.modifiers[1].kind,
        GateModifierKind::Pow(_)
    ));
    assert!(matches!(
        instruction.modifiers[2].kind,
        GateModifierKind::Ctrl
    ));
}

#[test]
fn v3_booleans_are_literals() {
    let (program, errors) = parse_v3("version 3\nmap flag = true");
    assert_eq!(errors, Vec::new());
    let StmtKind::Mapping(mapping) = &program.statements[0].kind else {
        panic!("expected a mapping");
    };
    assert!(matches!(mapping.value.kind, ExprKind::Lit(Lit::Bool(true))));
}

#[test]
fn v1_booleans_are_identifiers() {
    let (program, errors) = parse_v1("version 1.0\nmap flag = true");
    assert_eq!(errors, Vec::new());
    let StmtKind::Mapping(mapping) = &program.statements[0].kind else {
        panic!("expected a mapping");
    };
    assert!(matches!(mapping.value.kind, ExprKind::Ident(_)));
}

#[test]
fn v3_break_and_continue() {
    let (program, errors) = parse_v3("version 3\nbreak\ncontinue");
    assert_eq!(errors, Vec::new());
    assert!(matches!(program.statements[0].kind, StmtKind::Break));
    assert!(matches!(program.statements[1].kind, StmtKind::Continue));
}

#[test]
fn v1_comments() {
    let (program, errors) = parse_v1(indoc! {"
        version 1.0
        # a line comment
        qubits 2 /* an inline comment */
        x q[0] # trailing
    "});
    assert_eq!(errors, Vec::new());
    assert_eq!(program.statements.len(), 2);
}

#[test]
fn v3_line_comments() {
    let (program, errors) = parse_v3("version 3\n// a comment\nqubit[2] q\n");
    assert_eq!(errors, Vec::new());
    assert_eq!(program.statements.len(), 1);
}
