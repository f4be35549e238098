// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use super::AnalysisResult;
use crate::{v1, v3};
use cqasm_data_structures::version::Version;
use cqasm_semantic::{
    semantic::GateModifierKind,
    types::Type,
    value::ValueKind,
};
use expect_test::expect;
use indoc::indoc;

fn analyze_v1(source: &str) -> AnalysisResult {
    v1::default_analyzer(Version::new(&[1, 0])).analyze_string(source, None)
}

fn analyze_v3(source: &str) -> AnalysisResult {
    v3::default_analyzer(Version::new(&[3, 0])).analyze_string(source, None)
}

fn messages(result: &AnalysisResult) -> Vec<String> {
    result.error_messages()
}

#[test]
fn v1_smoke_program() {
    let result = analyze_v1(indoc! {"
        version 1.0
        qubits 2
        h q[0]
        cnot q[0], q[1]
        measure_all
    "});
    assert_eq!(messages(&result), Vec::<String>::new());
    assert_eq!(result.program.num_qubits, 2);
    assert_eq!(result.program.subcircuits.len(), 1);
    let subcircuit = &result.program.subcircuits[0];
    assert_eq!(&*subcircuit.name, "default");
    assert_eq!(subcircuit.bundles.len(), 3);
    let names: Vec<&str> = subcircuit
        .bundles
        .iter()
        .map(|bundle| &*bundle.instructions[0].name)
        .collect();
    assert_eq!(names, ["h", "cnot", "measure_all"]);
    for bundle in &subcircuit.bundles {
        for instruction in &bundle.instructions {
            assert!(instruction.instruction.is_some(), "operands should resolve");
        }
    }
    let cnot = &subcircuit.bundles[1].instructions[0];
    assert_eq!(cnot.operands[0].kind, ValueKind::QubitRefs(vec![0]));
    assert_eq!(cnot.operands[1].kind, ValueKind::QubitRefs(vec![1]));
}

#[test]
fn semantic_tree_display() {
    let result = analyze_v1("version 1.0\nqubits 2\nmap three = 3\nh q[0]\n");
    assert_eq!(messages(&result), Vec::<String>::new());
    expect![[r#"
        Program: version 1.0 (api 1.0), 2 qubits
            Mapping three = 3
            Subcircuit default x1:
                Bundle:
                    Instruction h:
                        q[0]
    "#]]
    .assert_eq(&format!("{}\n", result.program));
}

#[test]
fn v3_smoke_program() {
    let result = analyze_v3(indoc! {"
        version 3.0
        qubit[2] q
        bit[2] b
        H q[0]
        CNOT q[0], q[1]
        b = measure q
    "});
    assert_eq!(messages(&result), Vec::<String>::new());
    assert_eq!(result.program.num_qubits, 2);
    assert_eq!(result.program.num_bits, 2);
    let b = result
        .program
        .variables
        .iter()
        .find(|v| &*v.name == "b")
        .expect("b should be declared");
    assert_eq!(b.ty, Type::BitArray(2));
    let measure = &result.program.subcircuits[0].bundles[2].instructions[0];
    assert_eq!(&*measure.name, "measure");
    assert_eq!(measure.operands[0].kind, ValueKind::BitRefs(vec![0, 1]));
    assert_eq!(measure.operands[1].kind, ValueKind::QubitRefs(vec![0, 1]));
}

#[test]
fn v3_zero_size_bit_register() {
    let result = analyze_v3("version 3\nbit[0] b\n");
    assert_eq!(
        messages(&result),
        ["Error at <unknown>:2:5..6: declaring bit array of size <= 0"]
    );
}

#[test]
fn v1_overload_failure_message() {
    let result = analyze_v1("version 1.0\nqubits 2\nwait 1\n");
    assert_eq!(
        messages(&result),
        ["Error at <unknown>:3:1..7: failed to resolve overload for wait with argument pack (int)"]
    );
}

#[test]
fn duplicate_qubit_in_bundle() {
    let result = analyze_v1("version 1.0\nqubits 2\n{ h q[0] | h q[0] }\n");
    assert_eq!(result.errors.len(), 1);
    assert!(messages(&result)[0].contains("duplicate qubit in bundle"));
}

#[test]
fn version_newer_than_api_fails() {
    let analyzer = v3::default_analyzer(Version::new(&[3, 0]));
    let result = analyzer.analyze_string("version 9.9\n", None);
    assert_eq!(result.errors.len(), 1);
    assert!(
        messages(&result)[0].contains("cQASM file version is 9.9, but at most 3.0 is supported")
    );
}

#[test]
fn version_equal_to_api_is_fine() {
    let result = analyze_v1("version 1.0\nqubits 1\n");
    assert!(!result.failed());
}

#[test]
fn index_validation() {
    for size in 1..4 {
        for index in -1..5 {
            let source = format!("version 1.0\nqubits {size}\nx q[{index}]\n");
            let result = analyze_v1(&source);
            let valid = index >= 0 && index < size;
            assert_eq!(
                !result.failed(),
                valid,
                "q[{index}] with {size} qubits should {}",
                if valid { "resolve" } else { "fail" }
            );
            if !valid {
                assert!(messages(&result)[0].contains(&format!(
                    "index {index} out of range for register of size {size}"
                )));
            }
        }
    }
}

#[test]
fn index_ranges_are_inclusive() {
    let result = analyze_v1("version 1.0\nqubits 4\nmeasure_parity q[0], x, q[1:3], z\n");
    assert!(!result.failed());
    let instruction = &result.program.subcircuits[0].bundles[0].instructions[0];
    assert_eq!(instruction.operands[2].kind, ValueKind::QubitRefs(vec![1, 2, 3]));
}

#[test]
fn case_insensitive_names_in_v1() {
    let lower = analyze_v1("version 1.0\nqubits 1\nh q[0]\n");
    let upper = analyze_v1("version 1.0\nqubits 1\nH q[0]\n");
    assert!(!lower.failed());
    assert!(!upper.failed());
    let lower = &lower.program.subcircuits[0].bundles[0].instructions[0];
    let upper = &upper.program.subcircuits[0].bundles[0].instructions[0];
    assert_eq!(lower.instruction, upper.instruction);
}

#[test]
fn case_sensitive_names_in_v3() {
    let result = analyze_v3("version 3\nqubit[1] q\nh q[0]\n");
    assert_eq!(result.errors.len(), 1);
    assert!(messages(&result)[0].contains("failed to resolve h"));
}

#[test]
fn conditional_execution() {
    let allowed = analyze_v1("version 1.0\nqubits 2\nb[0]: x q[1]\n");
    assert!(!allowed.failed());
    let instruction = &allowed.program.subcircuits[0].bundles[0].instructions[0];
    assert_eq!(
        instruction.condition.as_ref().map(|c| &c.kind),
        Some(&ValueKind::BitRefs(vec![0]))
    );

    let forbidden = analyze_v1("version 1.0\nqubits 2\nb[0]: display\n");
    assert_eq!(forbidden.errors.len(), 1);
    assert!(
        messages(&forbidden)[0].contains("conditional execution is not supported")
    );
}

#[test]
fn condition_must_be_bool_or_bits() {
    let result = analyze_v1("version 1.0\nqubits 2\n3: x q[0]\n");
    assert_eq!(result.errors.len(), 1);
    assert!(messages(&result)[0].contains("failed to promote value of type int to bool"));
}

#[test]
fn non_parallel_instruction_in_bundle() {
    let result = analyze_v1("version 1.0\nqubits 2\n{ skip 1 | x q[0] }\n");
    assert_eq!(result.errors.len(), 1);
    assert!(messages(&result)[0].contains("not allowed in a bundle"));
}

#[test]
fn reused_qubit_within_instruction() {
    let result = analyze_v1("version 1.0\nqubits 2\ncnot q[0], q[0]\n");
    assert_eq!(result.errors.len(), 1);
    assert!(messages(&result)[0].contains("qubit used more than once"));
}

#[test]
fn mismatched_index_sizes() {
    let result = analyze_v1("version 1.0\nqubits 4\ncnot q[0,1], q[2]\n");
    assert_eq!(result.errors.len(), 1);
    assert!(messages(&result)[0].contains("number of indices must be the same"));

    // measure_parity explicitly allows mixed index sizes.
    let allowed = analyze_v1("version 1.0\nqubits 4\nmeasure_parity q[0], x, q[1,2], z\n");
    assert!(!allowed.failed());
}

#[test]
fn single_gate_multiple_qubits() {
    let result = analyze_v1("version 1.0\nqubits 3\nx q[0,1,2]\n");
    assert!(!result.failed());
    let instruction = &result.program.subcircuits[0].bundles[0].instructions[0];
    assert_eq!(instruction.operands[0].kind, ValueKind::QubitRefs(vec![0, 1, 2]));
}

#[test]
fn qubits_declared_twice() {
    let result = analyze_v1("version 1.0\nqubits 2\nqubits 3\n");
    assert_eq!(result.errors.len(), 1);
    assert!(messages(&result)[0].contains("qubit register declared more than once"));
}

#[test]
fn mapping_shadows_earlier_mapping() {
    let result = analyze_v1(indoc! {"
        version 1.0
        qubits 1
        map angle = 1.0
        map angle = 2.0
        rx q[0], angle
    "});
    assert!(!result.failed());
    let instruction = &result.program.subcircuits[0].bundles[0].instructions[0];
    assert_eq!(instruction.operands[1].kind, ValueKind::ConstReal(2.0));
    // Both declarations are still recorded in the tree.
    assert_eq!(result.program.mappings.len(), 2);
}

#[test]
fn mapping_of_register_slice() {
    let result = analyze_v1(indoc! {"
        version 1.0
        qubits 4
        map pair = q[2,3]
        cnot pair[0], pair[1]
    "});
    assert!(!result.failed());
    let instruction = &result.program.subcircuits[0].bundles[0].instructions[0];
    assert_eq!(instruction.operands[0].kind, ValueKind::QubitRefs(vec![2]));
    assert_eq!(instruction.operands[1].kind, ValueKind::QubitRefs(vec![3]));
}

#[test]
fn constant_folding_through_operators() {
    let result = analyze_v1(indoc! {"
        version 1.0
        qubits 1
        rx q[0], 2 * 0.5 * pi
    "});
    assert!(!result.failed());
    let instruction = &result.program.subcircuits[0].bundles[0].instructions[0];
    assert_eq!(
        instruction.operands[1].kind,
        ValueKind::ConstReal(std::f64::consts::PI)
    );
}

#[test]
fn division_by_zero_in_operand() {
    let result = analyze_v1("version 1.0\nqubits 1\nrx q[0], 1.0 / 0.0\n");
    assert_eq!(result.errors.len(), 1);
    assert!(messages(&result)[0].contains("division by zero"));
}

#[test]
fn subcircuits_group_bundles() {
    let result = analyze_v1(indoc! {"
        version 1.0
        qubits 2
        x q[0]
        .init
        prep q[0]
        .loop(10)
        h q[0]
        cnot q[0], q[1]
    "});
    assert!(!result.failed());
    let subcircuits = &result.program.subcircuits;
    assert_eq!(subcircuits.len(), 3);
    assert_eq!(&*subcircuits[0].name, "default");
    assert_eq!(subcircuits[0].iterations, 1);
    assert_eq!(subcircuits[0].bundles.len(), 1);
    assert_eq!(&*subcircuits[1].name, "init");
    assert_eq!(&*subcircuits[2].name, "loop");
    assert_eq!(subcircuits[2].iterations, 10);
    assert_eq!(subcircuits[2].bundles.len(), 2);
}

#[test]
fn subcircuit_iterations_must_be_positive() {
    let result = analyze_v1("version 1.0\nqubits 1\n.bad(0)\n");
    assert_eq!(result.errors.len(), 1);
    assert!(messages(&result)[0].contains("iteration count must be positive"));
}

#[test]
fn error_model_resolves() {
    let result = analyze_v1("version 1.0\nqubits 1\nerror_model depolarizing_channel, 0.001\n");
    assert!(!result.failed());
    let model = result.program.error_model.expect("error model should be set");
    assert_eq!(&*model.name, "depolarizing_channel");
    assert!(model.model.is_some());
    assert_eq!(model.operands[0].kind, ValueKind::ConstReal(0.001));
}

#[test]
fn error_model_declared_twice() {
    let result = analyze_v1(indoc! {"
        version 1.0
        qubits 1
        error_model depolarizing_channel, 0.001
        error_model depolarizing_channel, 0.002
    "});
    assert_eq!(result.errors.len(), 1);
    assert!(messages(&result)[0].contains("error model declared more than once"));
}

#[test]
fn unknown_error_model() {
    let result = analyze_v1("version 1.0\nqubits 1\nerror_model thermal_noise, 1.0\n");
    assert_eq!(result.errors.len(), 1);
    assert!(messages(&result)[0].contains("failed to resolve thermal_noise"));
}

#[test]
fn annotations_are_attached_uninterpreted() {
    let result = analyze_v1("version 1.0\nqubits 1\nmap three = 3 @first.annot(42)\n");
    assert!(!result.failed());
    let mapping = &result.program.mappings[0];
    assert_eq!(mapping.annotations.len(), 1);
    assert_eq!(&*mapping.annotations[0].interface, "first");
    assert_eq!(&*mapping.annotations[0].operation, "annot");
    assert_eq!(mapping.annotations[0].operands[0].kind, ValueKind::ConstInt(42));
}

#[test]
fn load_state_takes_an_opaque_string() {
    let result = analyze_v1("version 1.0\nqubits 1\nload_state \"../state/bell.qs\"\n");
    assert!(!result.failed());
    let instruction = &result.program.subcircuits[0].bundles[0].instructions[0];
    assert_eq!(
        instruction.operands[0].kind,
        ValueKind::ConstString("../state/bell.qs".into())
    );
}

#[test]
fn unitary_gate_takes_a_matrix() {
    let result = analyze_v1("version 1.0\nqubits 1\nu q[0], [1, 0 | 0, im]\n");
    assert!(!result.failed());
    let instruction = &result.program.subcircuits[0].bundles[0].instructions[0];
    assert!(matches!(
        instruction.operands[1].kind,
        ValueKind::ConstComplexMatrix(_)
    ));
}

#[test]
fn unknown_instruction() {
    let result = analyze_v1("version 1.0\nqubits 1\nfoo q[0]\n");
    assert_eq!(result.errors.len(), 1);
    assert!(messages(&result)[0].contains("failed to resolve foo"));
}

#[test]
fn unknown_mapping_does_not_stop_analysis() {
    let result = analyze_v1(indoc! {"
        version 1.0
        qubits 2
        x undefined[0]
        y q[0]
    "});
    assert_eq!(result.errors.len(), 1);
    // The later, valid instruction is still analyzed.
    assert_eq!(result.program.subcircuits[0].bundles.len(), 1);
    assert_eq!(
        &*result.program.subcircuits[0].bundles[0].instructions[0].name,
        "y"
    );
}

#[test]
fn v3_gate_modifiers_preserve_source_order() {
    let result = analyze_v3(indoc! {"
        version 3.0
        qubit[2] q
        inv.pow(2).ctrl.X q[0], q[1]
    "});
    assert_eq!(messages(&result), Vec::<String>::new());
    let instruction = &result.program.subcircuits[0].bundles[0].instructions[0];
    assert_eq!(&*instruction.name, "X");
    assert_eq!(instruction.modifiers.len(), 3);
    assert!(matches!(instruction.modifiers[0].kind, GateModifierKind::Inv));
    let GateModifierKind::Pow(exponent) = &instruction.modifiers[1].kind else {
        panic!("second modifier should be pow");
    };
    assert_eq!(exponent.kind, ValueKind::ConstReal(2.0));
    assert!(matches!(instruction.modifiers[2].kind, GateModifierKind::Ctrl));
    // The control qubit is consumed by the modifier and stays an operand.
    assert_eq!(instruction.operands.len(), 2);
    assert_eq!(instruction.operands[0].kind, ValueKind::QubitRefs(vec![0]));
}

#[test]
fn v3_measure_size_mismatch() {
    let result = analyze_v3("version 3\nqubit[2] q\nbit[3] b\nb = measure q\n");
    assert_eq!(result.errors.len(), 1);
    assert!(messages(&result)[0].contains("number of indices must be the same"));
}

#[test]
fn v3_reset_overloads() {
    let result = analyze_v3("version 3\nqubit[2] q\nreset\nreset q[0]\nreset q\n");
    assert_eq!(messages(&result), Vec::<String>::new());
}

#[test]
fn v3_break_outside_loop() {
    let result = analyze_v3("version 3\nbreak\n");
    assert_eq!(result.errors.len(), 1);
    assert!(messages(&result)[0].contains("break statement is not within a loop"));
}

#[test]
fn unwrap_writes_messages_to_the_sink() {
    let result = analyze_v1("version 1.0\nqubits 2\nwait 1\n");
    let mut sink = Vec::new();
    assert!(result.unwrap(&mut sink).is_err());
    let written = String::from_utf8(sink).expect("messages should be UTF-8");
    assert!(written.contains("failed to resolve overload for wait"));
}

#[test]
fn unwrap_returns_the_tree_on_success() {
    let result = analyze_v1("version 1.0\nqubits 2\nh q[0]\n");
    let mut sink = Vec::new();
    let program = result.unwrap(&mut sink).expect("analysis should succeed");
    assert_eq!(program.num_qubits, 2);
    assert!(sink.is_empty());
}

#[test]
fn file_name_appears_in_messages() {
    let analyzer = v1::default_analyzer(Version::new(&[1, 0]));
    let result = analyzer.analyze_string("version 1.0\nqubits 2\nwait 1\n", Some("test.cq"));
    assert!(messages(&result)[0].starts_with("Error at test.cq:3:"));
}

#[test]
fn parse_errors_are_reported_with_analysis_continuing() {
    let result = analyze_v1(indoc! {"
        version 1.0
        qubits 2
        map = 3
        x q[0]
    "});
    assert!(result.failed());
    assert_eq!(result.program.subcircuits[0].bundles.len(), 1);
}

#[test]
fn registries_are_isolated_between_analyzers() {
    let mut custom = v1::default_analyzer(Version::new(&[1, 0]));
    custom
        .register_instruction("foo", "Q", true, true, false, false)
        .expect("spec should be valid");
    let result = custom.analyze_string("version 1.0\nqubits 1\nfoo q[0]\n", None);
    assert!(!result.failed());

    // A fresh default analyzer is unaffected by the registration above.
    let result = analyze_v1("version 1.0\nqubits 1\nfoo q[0]\n");
    assert!(result.failed());
}
