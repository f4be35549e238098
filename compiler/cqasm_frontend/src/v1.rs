// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The legacy (1.x) dialect defaults.

use crate::analyzer::Analyzer;
use cqasm_data_structures::{language::Dialect, version::Version};

/// Constructs an [`Analyzer`] with the defaults for cQASM 1.x already loaded
/// into it: the default mappings (`true`, `false`, `pi`, the axes, ...), the
/// operator and math functions, the error models, and the 1.x instruction set.
#[must_use]
pub fn default_analyzer(api_version: Version) -> Analyzer {
    let mut analyzer = Analyzer::new(Dialect::V1, api_version);
    analyzer.register_default_functions_and_mappings();

    // depolarizing_channel historically accepted any number of floating point
    // arguments; the first 51 arities are registered explicitly.
    let mut args = String::new();
    for _ in 0..=50 {
        analyzer
            .register_error_model("depolarizing_channel", &args)
            .expect("default error model spec should be valid");
        args.push('r');
    }

    let mut insn = |name: &str, types: &str, conditional: bool, parallel: bool, reused: bool, mixed: bool| {
        analyzer
            .register_instruction(name, types, conditional, parallel, reused, mixed)
            .expect("default instruction spec should be valid");
    };

    insn("measure_all", "", false, false, false, false);
    insn("measure_parity", "QaQa", false, false, false, true);
    insn("x", "Q", true, true, false, false);
    insn("y", "Q", true, true, false, false);
    insn("z", "Q", true, true, false, false);
    insn("i", "Q", true, true, false, false);
    insn("h", "Q", true, true, false, false);
    insn("x90", "Q", true, true, false, false);
    insn("y90", "Q", true, true, false, false);
    insn("mx90", "Q", true, true, false, false);
    insn("my90", "Q", true, true, false, false);
    insn("s", "Q", true, true, false, false);
    insn("sdag", "Q", true, true, false, false);
    insn("t", "Q", true, true, false, false);
    insn("tdag", "Q", true, true, false, false);
    insn("u", "Qu", true, true, false, false);
    insn("prep", "Q", false, true, false, false);
    insn("prep_x", "Q", false, true, false, false);
    insn("prep_y", "Q", false, true, false, false);
    insn("prep_z", "Q", false, true, false, false);
    insn("measure", "Q", false, true, false, false);
    insn("measure_x", "Q", false, true, false, false);
    insn("measure_y", "Q", false, true, false, false);
    insn("measure_z", "Q", false, true, false, false);
    insn("rx", "Qr", true, true, false, false);
    insn("ry", "Qr", true, true, false, false);
    insn("rz", "Qr", true, true, false, false);
    insn("cnot", "QQ", true, true, false, false);
    insn("cz", "QQ", true, true, false, false);
    insn("swap", "QQ", true, true, false, false);
    insn("cr", "QQr", true, true, false, false);
    insn("crk", "QQi", true, true, false, false);
    insn("toffoli", "QQQ", true, true, false, false);
    insn("not", "B", true, true, false, false);
    insn("display", "", false, false, false, false);
    insn("display", "B", false, false, false, false);
    insn("display_binary", "", false, false, false, false);
    insn("display_binary", "B", false, false, false, false);
    insn("skip", "i", false, false, false, false);
    insn("wait", "Qi", false, false, false, false);
    insn("barrier", "Q", false, false, false, false);
    insn("reset-averaging", "", false, false, false, false);
    insn("reset-averaging", "Q", false, false, false, false);
    insn("load_state", "s", false, false, false, false);

    analyzer
}
