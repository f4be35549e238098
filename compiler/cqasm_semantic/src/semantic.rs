// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The semantic tree: the analyzer's output. Nodes own their children
//! exclusively; references to registered signatures are shared descriptors,
//! never pointers into another subtree.

#![warn(missing_docs)]

use crate::{
    instruction::{ErrorModelRef, InstructionRef},
    types::Type,
    value::Value,
};
use cqasm_data_structures::{span::Span, version::Version};
use indenter::{indented, Format, Indented};
use std::{
    fmt::{self, Display, Formatter, Write},
    rc::Rc,
};

fn set_indentation<'a, 'b>(
    indent: Indented<'a, Formatter<'b>>,
    level: usize,
) -> Indented<'a, Formatter<'b>> {
    indent.with_format(Format::Custom {
        inserter: Box::leak(Box::new(move |_, f: &mut dyn fmt::Write| {
            for _ in 0..level {
                write!(f, "    ")?;
            }
            Ok(())
        })),
    })
}

/// The root node of a semantic tree.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Program {
    /// The maximum version the producing analyzer was configured for.
    pub api_version: Version,
    /// The version of the analyzed file.
    pub version: Version,
    /// The size of the program-wide qubit register.
    pub num_qubits: i64,
    /// The size of the measurement bit register.
    pub num_bits: i64,
    /// The error model, when one was specified.
    pub error_model: Option<ErrorModelNode>,
    /// The subcircuits, in source order. Instructions written before any
    /// subcircuit header live in an implicit subcircuit named `default`.
    pub subcircuits: Vec<Subcircuit>,
    /// The mappings declared in the global scope.
    pub mappings: Vec<Mapping>,
    /// The variables declared by the program.
    pub variables: Vec<Variable>,
    /// The span of the whole program.
    pub span: Span,
}

impl Display for Program {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let mut indent = set_indentation(indented(f), 0);
        write!(
            indent,
            "Program: version {} (api {}), {} qubits",
            self.version, self.api_version, self.num_qubits
        )?;
        indent = set_indentation(indent, 1);
        if let Some(error_model) = &self.error_model {
            write!(indent, "\n{error_model}")?;
        }
        for mapping in &self.mappings {
            write!(indent, "\n{mapping}")?;
        }
        for variable in &self.variables {
            write!(indent, "\n{variable}")?;
        }
        for subcircuit in &self.subcircuits {
            write!(indent, "\n{subcircuit}")?;
        }
        Ok(())
    }
}

/// A named, optionally repeated region of the program.
#[derive(Clone, Debug, PartialEq)]
pub struct Subcircuit {
    /// The subcircuit name.
    pub name: Rc<str>,
    /// The number of times the subcircuit executes.
    pub iterations: i64,
    /// The bundles, in source order.
    pub bundles: Vec<Bundle>,
    /// Annotations on the subcircuit header.
    pub annotations: Vec<AnnotationData>,
    /// The span of the header.
    pub span: Span,
}

impl Display for Subcircuit {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let mut indent = set_indentation(indented(f), 0);
        write!(indent, "Subcircuit {} x{}:", self.name, self.iterations)?;
        indent = set_indentation(indent, 1);
        for bundle in &self.bundles {
            write!(indent, "\n{bundle}")?;
        }
        Ok(())
    }
}

/// A set of instructions executing in parallel.
#[derive(Clone, Debug, PartialEq)]
pub struct Bundle {
    /// The bundled instructions.
    pub instructions: Vec<Instruction>,
    /// Annotations on the bundle as a whole.
    pub annotations: Vec<AnnotationData>,
    /// The span.
    pub span: Span,
}

impl Display for Bundle {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let mut indent = set_indentation(indented(f), 0);
        write!(indent, "Bundle:")?;
        indent = set_indentation(indent, 1);
        for instruction in &self.instructions {
            write!(indent, "\n{instruction}")?;
        }
        Ok(())
    }
}

/// A resolved instruction.
#[derive(Clone, Debug, PartialEq)]
pub struct Instruction {
    /// The registered signature this instruction resolved to, when
    /// instruction resolution is enabled.
    pub instruction: Option<InstructionRef>,
    /// The name as written.
    pub name: Rc<str>,
    /// Gate modifiers, preserved in source order.
    pub modifiers: Vec<GateModifier>,
    /// The condition, when a condition prefix was written. Either a boolean
    /// value or a bit reference.
    pub condition: Option<Value>,
    /// The operand values, promoted to the signature's parameter types.
    pub operands: Vec<Value>,
    /// Trailing annotations.
    pub annotations: Vec<AnnotationData>,
    /// The span.
    pub span: Span,
}

impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let mut indent = set_indentation(indented(f), 0);
        write!(indent, "Instruction {}", self.name)?;
        for modifier in &self.modifiers {
            write!(indent, " [{modifier}]")?;
        }
        if let Some(condition) = &self.condition {
            write!(indent, " if {condition}")?;
        }
        f.write_str(":")?;
        let mut indent = set_indentation(indented(f), 1);
        for operand in &self.operands {
            write!(indent, "\n{operand}")?;
        }
        for annotation in &self.annotations {
            write!(indent, "\n{annotation}")?;
        }
        Ok(())
    }
}

/// A gate modifier attached to an instruction (v3).
#[derive(Clone, Debug, PartialEq)]
pub struct GateModifier {
    /// The modifier kind.
    pub kind: GateModifierKind,
    /// The span.
    pub span: Span,
}

impl Display for GateModifier {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match &self.kind {
            GateModifierKind::Inv => f.write_str("inv"),
            GateModifierKind::Ctrl => f.write_str("ctrl"),
            GateModifierKind::Pow(exponent) => write!(f, "pow {exponent}"),
        }
    }
}

/// A gate modifier kind.
#[derive(Clone, Debug, PartialEq)]
pub enum GateModifierKind {
    /// The inverse of the modified gate.
    Inv,
    /// The modified gate raised to the given power.
    Pow(Value),
    /// The modified gate controlled by one more qubit.
    Ctrl,
}

/// A resolved error model.
#[derive(Clone, Debug, PartialEq)]
pub struct ErrorModelNode {
    /// The registered signature this model resolved to, when error model
    /// resolution is enabled.
    pub model: Option<ErrorModelRef>,
    /// The name as written.
    pub name: Rc<str>,
    /// The operand values, promoted to the signature's parameter types.
    pub operands: Vec<Value>,
    /// Trailing annotations.
    pub annotations: Vec<AnnotationData>,
    /// The span.
    pub span: Span,
}

impl Display for ErrorModelNode {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let mut indent = set_indentation(indented(f), 0);
        write!(indent, "ErrorModel {}:", self.name)?;
        indent = set_indentation(indent, 1);
        for operand in &self.operands {
            write!(indent, "\n{operand}")?;
        }
        Ok(())
    }
}

/// A mapping from a name to a value.
#[derive(Clone, Debug, PartialEq)]
pub struct Mapping {
    /// The mapping name.
    pub name: Rc<str>,
    /// The mapped value.
    pub value: Value,
    /// Trailing annotations.
    pub annotations: Vec<AnnotationData>,
    /// The span of the declaration.
    pub span: Span,
}

impl Display for Mapping {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "Mapping {} = {}", self.name, self.value)
    }
}

/// A declared variable.
#[derive(Clone, Debug, PartialEq)]
pub struct Variable {
    /// The variable name.
    pub name: Rc<str>,
    /// The variable type.
    pub ty: Type,
    /// Trailing annotations.
    pub annotations: Vec<AnnotationData>,
    /// The span of the declaration.
    pub span: Span,
}

impl Display for Variable {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "Variable {}: {}", self.name, self.ty)?;
        if self.ty.size_of() != 1 {
            write!(f, "({})", self.ty.size_of())?;
        }
        Ok(())
    }
}

/// An annotation, attached without interpretation.
#[derive(Clone, Debug, PartialEq)]
pub struct AnnotationData {
    /// The interface the annotation is intended for.
    pub interface: Rc<str>,
    /// The operation within that interface.
    pub operation: Rc<str>,
    /// The folded operand values.
    pub operands: Vec<Value>,
    /// The span.
    pub span: Span,
}

impl Display for AnnotationData {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "Annotation {}.{}", self.interface, self.operation)?;
        for operand in &self.operands {
            write!(f, " {operand}")?;
        }
        Ok(())
    }
}
