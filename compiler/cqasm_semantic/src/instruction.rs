// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::types::Type;
use std::{
    fmt::{self, Display, Formatter},
    rc::Rc,
};

/// A registered instruction signature: the descriptor payload of one overload
/// in the instruction table.
#[derive(Clone, Debug, PartialEq)]
pub struct Instruction {
    /// The instruction name as registered.
    pub name: Rc<str>,
    /// The parameter types of this overload.
    pub param_types: Vec<Type>,
    /// Whether the instruction can carry a condition prefix.
    pub allow_conditional: bool,
    /// Whether the instruction may appear bundled with others.
    pub allow_parallel: bool,
    /// Whether a qubit may appear more than once in the operand list.
    pub allow_reused_qubits: bool,
    /// Whether operands may have index lists of different lengths, for
    /// instance `q[1,2]` in one operand and `q[1,2,3,4,5]` in another.
    pub allow_different_index_sizes: bool,
}

/// A shared reference to a registered instruction, resolved again by name on
/// demand rather than pointing into another subtree.
pub type InstructionRef = Rc<Instruction>;

impl Instruction {
    #[must_use]
    pub fn new(
        name: &str,
        param_types: Vec<Type>,
        allow_conditional: bool,
        allow_parallel: bool,
        allow_reused_qubits: bool,
        allow_different_index_sizes: bool,
    ) -> Self {
        Self {
            name: name.into(),
            param_types,
            allow_conditional,
            allow_parallel,
            allow_reused_qubits,
            allow_different_index_sizes,
        }
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for ty in &self.param_types {
            write!(f, " {ty}")?;
        }
        Ok(())
    }
}

/// A registered error model signature.
#[derive(Clone, Debug, PartialEq)]
pub struct ErrorModel {
    /// The error model name as registered.
    pub name: Rc<str>,
    /// The parameter types of this overload.
    pub param_types: Vec<Type>,
}

/// A shared reference to a registered error model.
pub type ErrorModelRef = Rc<ErrorModel>;

impl ErrorModel {
    #[must_use]
    pub fn new(name: &str, param_types: Vec<Type>) -> Self {
        Self {
            name: name.into(),
            param_types,
        }
    }
}

impl Display for ErrorModel {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for ty in &self.param_types {
            write!(f, " {ty}")?;
        }
        Ok(())
    }
}
