// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The 3.x dialect defaults.

use crate::analyzer::Analyzer;
use cqasm_data_structures::{language::Dialect, version::Version};

/// Constructs an [`Analyzer`] with the defaults for cQASM 3.x already loaded
/// into it. Names match case-sensitively in this dialect. The gate modifiers
/// `inv`, `pow`, and `ctrl` are part of the grammar rather than this table;
/// the analyzer records them on the instruction in source order.
#[must_use]
pub fn default_analyzer(api_version: Version) -> Analyzer {
    let mut analyzer = Analyzer::new(Dialect::V3, api_version);
    analyzer.register_default_functions_and_mappings();

    let mut gate = |name: &str, types: &str| {
        analyzer
            .register_instruction(name, types, false, true, false, false)
            .expect("default instruction spec should be valid");
    };

    gate("CNOT", "QQ");
    gate("CNOT", "QV");
    gate("CNOT", "VQ");
    gate("CNOT", "VV");
    gate("CR", "QQf");
    gate("CR", "QVf");
    gate("CR", "VQf");
    gate("CR", "VVf");
    gate("CRk", "QQi");
    gate("CRk", "QVi");
    gate("CRk", "VQi");
    gate("CRk", "VVi");
    gate("CZ", "QQ");
    gate("CZ", "QV");
    gate("CZ", "VQ");
    gate("CZ", "VV");
    gate("H", "Q");
    gate("H", "V");
    gate("I", "Q");
    gate("I", "V");
    gate("mX90", "Q");
    gate("mX90", "V");
    gate("mY90", "Q");
    gate("mY90", "V");
    gate("Rx", "Qf");
    gate("Rx", "Vf");
    gate("Ry", "Qf");
    gate("Ry", "Vf");
    gate("Rz", "Qf");
    gate("Rz", "Vf");
    gate("S", "Q");
    gate("S", "V");
    gate("Sdag", "Q");
    gate("Sdag", "V");
    gate("T", "Q");
    gate("T", "V");
    gate("Tdag", "Q");
    gate("Tdag", "V");
    gate("X", "Q");
    gate("X", "V");
    gate("X90", "Q");
    gate("X90", "V");
    gate("Y", "Q");
    gate("Y", "V");
    gate("Y90", "Q");
    gate("Y90", "V");
    gate("Z", "Q");
    gate("Z", "V");

    gate("measure", "BQ");
    gate("measure", "WV");
    gate("measure", "BV");
    gate("measure", "WQ");
    gate("reset", "");
    gate("reset", "Q");
    gate("reset", "V");

    analyzer
}
