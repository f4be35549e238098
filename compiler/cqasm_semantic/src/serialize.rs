// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Tag-value serialization of the semantic tree. Node maps carry their variant
//! name under `"@t"` and their span under `"@s"`. Payload keys follow the wire
//! format of the original trees: `"x"` for a scalar payload, `"r"`/`"i"` for
//! the components of a complex number, `"c"`/`"d"` for matrix columns and
//! data, and `"n"`/`"t"`/`"c"`/`"p"`/`"r"`/`"d"` for instruction descriptors.

#[cfg(test)]
mod tests;

use crate::{
    instruction::{ErrorModel, Instruction as InstructionSig},
    semantic::{
        AnnotationData, Bundle, ErrorModelNode, GateModifier, GateModifierKind, Instruction,
        Mapping, Program, Subcircuit, Variable,
    },
    types::Type,
    value::{Axis, FunctionCall, Matrix, Value as SemValue, ValueKind},
};
use cqasm_data_structures::{cbor::Value, span::Span, version::Version};
use num_complex::Complex64;
use std::rc::Rc;
use thiserror::Error;

/// Error produced when a tag-value blob does not describe a valid tree.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("field `{0}` has the wrong type")]
    WrongType(&'static str),
    #[error("unknown node type `{0}`")]
    UnknownNode(String),
}

type Result<T> = std::result::Result<T, Error>;

/// Serializes a semantic program to a tag-value item; encode with
/// [`cqasm_data_structures::cbor::encode`] for the binary blob.
#[must_use]
pub fn program_to_value(program: &Program) -> Value {
    let mut fields = node("Program", program.span);
    fields.push(("av".into(), version_to_value(&program.api_version)));
    fields.push(("v".into(), version_to_value(&program.version)));
    fields.push(("nq".into(), Value::Int(program.num_qubits)));
    fields.push(("nb".into(), Value::Int(program.num_bits)));
    if let Some(error_model) = &program.error_model {
        fields.push(("em".into(), error_model_to_value(error_model)));
    }
    fields.push((
        "sc".into(),
        Value::Array(program.subcircuits.iter().map(subcircuit_to_value).collect()),
    ));
    fields.push((
        "ma".into(),
        Value::Array(program.mappings.iter().map(mapping_to_value).collect()),
    ));
    fields.push((
        "va".into(),
        Value::Array(program.variables.iter().map(variable_to_value).collect()),
    ));
    Value::Map(fields)
}

/// Reconstructs a semantic program from a tag-value item.
pub fn program_from_value(value: &Value) -> Result<Program> {
    expect_node(value, "Program")?;
    Ok(Program {
        api_version: version_from_value(req(value, "av")?)?,
        version: version_from_value(req(value, "v")?)?,
        num_qubits: int(req(value, "nq")?, "nq")?,
        num_bits: int(req(value, "nb")?, "nb")?,
        error_model: value.get("em").map(error_model_from_value).transpose()?,
        subcircuits: array(req(value, "sc")?, "sc")?
            .iter()
            .map(subcircuit_from_value)
            .collect::<Result<_>>()?,
        mappings: array(req(value, "ma")?, "ma")?
            .iter()
            .map(mapping_from_value)
            .collect::<Result<_>>()?,
        variables: array(req(value, "va")?, "va")?
            .iter()
            .map(variable_from_value)
            .collect::<Result<_>>()?,
        span: span_from(value)?,
    })
}

fn version_to_value(version: &Version) -> Value {
    Value::Array(
        version
            .0
            .iter()
            .map(|&c| Value::Int(i64::try_from(c).expect("version component should fit in i64")))
            .collect(),
    )
}

fn version_from_value(value: &Value) -> Result<Version> {
    let components = array(value, "version")?
        .iter()
        .map(|item| match item {
            Value::Int(i) if *i >= 0 => Ok(u64::try_from(*i).expect("component is non-negative")),
            _ => Err(Error::WrongType("version")),
        })
        .collect::<Result<_>>()?;
    Ok(Version(components))
}

fn subcircuit_to_value(subcircuit: &Subcircuit) -> Value {
    let mut fields = node("Subcircuit", subcircuit.span);
    fields.push(("n".into(), Value::Text(subcircuit.name.to_string())));
    fields.push(("i".into(), Value::Int(subcircuit.iterations)));
    fields.push((
        "b".into(),
        Value::Array(subcircuit.bundles.iter().map(bundle_to_value).collect()),
    ));
    fields.push(("a".into(), annotations_to_value(&subcircuit.annotations)));
    Value::Map(fields)
}

fn subcircuit_from_value(value: &Value) -> Result<Subcircuit> {
    expect_node(value, "Subcircuit")?;
    Ok(Subcircuit {
        name: text(req(value, "n")?, "n")?.into(),
        iterations: int(req(value, "i")?, "i")?,
        bundles: array(req(value, "b")?, "b")?
            .iter()
            .map(bundle_from_value)
            .collect::<Result<_>>()?,
        annotations: annotations_from_value(req(value, "a")?)?,
        span: span_from(value)?,
    })
}

fn bundle_to_value(bundle: &Bundle) -> Value {
    let mut fields = node("Bundle", bundle.span);
    fields.push((
        "i".into(),
        Value::Array(bundle.instructions.iter().map(instruction_to_value).collect()),
    ));
    fields.push(("a".into(), annotations_to_value(&bundle.annotations)));
    Value::Map(fields)
}

fn bundle_from_value(value: &Value) -> Result<Bundle> {
    expect_node(value, "Bundle")?;
    Ok(Bundle {
        instructions: array(req(value, "i")?, "i")?
            .iter()
            .map(instruction_from_value)
            .collect::<Result<_>>()?,
        annotations: annotations_from_value(req(value, "a")?)?,
        span: span_from(value)?,
    })
}

fn instruction_to_value(instruction: &Instruction) -> Value {
    let mut fields = node("Instruction", instruction.span);
    if let Some(signature) = &instruction.instruction {
        fields.push(("s".into(), signature_to_value(signature)));
    }
    fields.push(("n".into(), Value::Text(instruction.name.to_string())));
    if !instruction.modifiers.is_empty() {
        fields.push((
            "m".into(),
            Value::Array(instruction.modifiers.iter().map(modifier_to_value).collect()),
        ));
    }
    if let Some(condition) = &instruction.condition {
        fields.push(("c".into(), value_to_value(condition)));
    }
    fields.push((
        "o".into(),
        Value::Array(instruction.operands.iter().map(value_to_value).collect()),
    ));
    fields.push(("a".into(), annotations_to_value(&instruction.annotations)));
    Value::Map(fields)
}

fn instruction_from_value(value: &Value) -> Result<Instruction> {
    expect_node(value, "Instruction")?;
    Ok(Instruction {
        instruction: value
            .get("s")
            .map(|s| signature_from_value(s).map(Rc::new))
            .transpose()?,
        name: text(req(value, "n")?, "n")?.into(),
        modifiers: match value.get("m") {
            Some(modifiers) => array(modifiers, "m")?
                .iter()
                .map(modifier_from_value)
                .collect::<Result<_>>()?,
            None => Vec::new(),
        },
        condition: value.get("c").map(value_from_value).transpose()?,
        operands: array(req(value, "o")?, "o")?
            .iter()
            .map(value_from_value)
            .collect::<Result<_>>()?,
        annotations: annotations_from_value(req(value, "a")?)?,
        span: span_from(value)?,
    })
}

/// An instruction descriptor: name under `"n"`, parameter types under `"t"`,
/// and the four permission flags under `"c"`, `"p"`, `"r"`, and `"d"`.
fn signature_to_value(signature: &InstructionSig) -> Value {
    Value::Map(vec![
        ("n".into(), Value::Text(signature.name.to_string())),
        (
            "t".into(),
            Value::Array(signature.param_types.iter().map(type_to_value).collect()),
        ),
        ("c".into(), Value::Bool(signature.allow_conditional)),
        ("p".into(), Value::Bool(signature.allow_parallel)),
        ("r".into(), Value::Bool(signature.allow_reused_qubits)),
        ("d".into(), Value::Bool(signature.allow_different_index_sizes)),
    ])
}

fn signature_from_value(value: &Value) -> Result<InstructionSig> {
    Ok(InstructionSig {
        name: text(req(value, "n")?, "n")?.into(),
        param_types: array(req(value, "t")?, "t")?
            .iter()
            .map(type_from_value)
            .collect::<Result<_>>()?,
        allow_conditional: boolean(req(value, "c")?, "c")?,
        allow_parallel: boolean(req(value, "p")?, "p")?,
        allow_reused_qubits: boolean(req(value, "r")?, "r")?,
        allow_different_index_sizes: boolean(req(value, "d")?, "d")?,
    })
}

fn modifier_to_value(modifier: &GateModifier) -> Value {
    let mut fields;
    match &modifier.kind {
        GateModifierKind::Inv => fields = node("Inv", modifier.span),
        GateModifierKind::Ctrl => fields = node("Ctrl", modifier.span),
        GateModifierKind::Pow(exponent) => {
            fields = node("Pow", modifier.span);
            fields.push(("e".into(), value_to_value(exponent)));
        }
    }
    Value::Map(fields)
}

fn modifier_from_value(value: &Value) -> Result<GateModifier> {
    let span = span_from(value)?;
    let kind = match node_type(value)? {
        "Inv" => GateModifierKind::Inv,
        "Ctrl" => GateModifierKind::Ctrl,
        "Pow" => GateModifierKind::Pow(value_from_value(req(value, "e")?)?),
        other => return Err(Error::UnknownNode(other.into())),
    };
    Ok(GateModifier { kind, span })
}

fn error_model_to_value(model: &ErrorModelNode) -> Value {
    let mut fields = node("ErrorModel", model.span);
    if let Some(signature) = &model.model {
        fields.push((
            "s".into(),
            Value::Map(vec![
                ("n".into(), Value::Text(signature.name.to_string())),
                (
                    "t".into(),
                    Value::Array(signature.param_types.iter().map(type_to_value).collect()),
                ),
            ]),
        ));
    }
    fields.push(("n".into(), Value::Text(model.name.to_string())));
    fields.push((
        "o".into(),
        Value::Array(model.operands.iter().map(value_to_value).collect()),
    ));
    fields.push(("a".into(), annotations_to_value(&model.annotations)));
    Value::Map(fields)
}

fn error_model_from_value(value: &Value) -> Result<ErrorModelNode> {
    expect_node(value, "ErrorModel")?;
    let signature = value
        .get("s")
        .map(|s| {
            Ok::<_, Error>(Rc::new(ErrorModel {
                name: text(req(s, "n")?, "n")?.into(),
                param_types: array(req(s, "t")?, "t")?
                    .iter()
                    .map(type_from_value)
                    .collect::<Result<_>>()?,
            }))
        })
        .transpose()?;
    Ok(ErrorModelNode {
        model: signature,
        name: text(req(value, "n")?, "n")?.into(),
        operands: array(req(value, "o")?, "o")?
            .iter()
            .map(value_from_value)
            .collect::<Result<_>>()?,
        annotations: annotations_from_value(req(value, "a")?)?,
        span: span_from(value)?,
    })
}

fn mapping_to_value(mapping: &Mapping) -> Value {
    let mut fields = node("Mapping", mapping.span);
    fields.push(("n".into(), Value::Text(mapping.name.to_string())));
    fields.push(("v".into(), value_to_value(&mapping.value)));
    fields.push(("a".into(), annotations_to_value(&mapping.annotations)));
    Value::Map(fields)
}

fn mapping_from_value(value: &Value) -> Result<Mapping> {
    expect_node(value, "Mapping")?;
    Ok(Mapping {
        name: text(req(value, "n")?, "n")?.into(),
        value: value_from_value(req(value, "v")?)?,
        annotations: annotations_from_value(req(value, "a")?)?,
        span: span_from(value)?,
    })
}

fn variable_to_value(variable: &Variable) -> Value {
    let mut fields = node("Variable", variable.span);
    fields.push(("n".into(), Value::Text(variable.name.to_string())));
    fields.push(("t".into(), type_to_value(&variable.ty)));
    fields.push(("a".into(), annotations_to_value(&variable.annotations)));
    Value::Map(fields)
}

fn variable_from_value(value: &Value) -> Result<Variable> {
    expect_node(value, "Variable")?;
    Ok(Variable {
        name: text(req(value, "n")?, "n")?.into(),
        ty: type_from_value(req(value, "t")?)?,
        annotations: annotations_from_value(req(value, "a")?)?,
        span: span_from(value)?,
    })
}

fn annotations_to_value(annotations: &[AnnotationData]) -> Value {
    Value::Array(
        annotations
            .iter()
            .map(|annotation| {
                let mut fields = node("Annotation", annotation.span);
                fields.push(("i".into(), Value::Text(annotation.interface.to_string())));
                fields.push(("o".into(), Value::Text(annotation.operation.to_string())));
                fields.push((
                    "p".into(),
                    Value::Array(annotation.operands.iter().map(value_to_value).collect()),
                ));
                Value::Map(fields)
            })
            .collect(),
    )
}

fn annotations_from_value(value: &Value) -> Result<Vec<AnnotationData>> {
    array(value, "a")?
        .iter()
        .map(|item| {
            expect_node(item, "Annotation")?;
            Ok(AnnotationData {
                interface: text(req(item, "i")?, "i")?.into(),
                operation: text(req(item, "o")?, "o")?.into(),
                operands: array(req(item, "p")?, "p")?
                    .iter()
                    .map(value_from_value)
                    .collect::<Result<_>>()?,
                span: span_from(item)?,
            })
        })
        .collect()
}

fn type_to_value(ty: &Type) -> Value {
    let name = match ty {
        Type::Qubit => "Qubit",
        Type::Bit => "Bit",
        Type::Bool => "Bool",
        Type::Int => "Int",
        Type::Real => "Real",
        Type::Complex => "Complex",
        Type::String => "String",
        Type::Axis => "Axis",
        Type::QubitArray(_) => "QubitArray",
        Type::BitArray(_) => "BitArray",
        Type::RealMatrix => "RealMatrix",
        Type::ComplexMatrix => "ComplexMatrix",
    };
    let mut fields = vec![("@t".into(), Value::Text(name.into()))];
    if let Type::QubitArray(size) | Type::BitArray(size) = ty {
        fields.push((
            "x".into(),
            Value::Int(i64::try_from(*size).expect("array size should fit in i64")),
        ));
    }
    Value::Map(fields)
}

fn type_from_value(value: &Value) -> Result<Type> {
    let size = || -> Result<u64> {
        let size = int(req(value, "x")?, "x")?;
        u64::try_from(size).map_err(|_| Error::WrongType("x"))
    };
    match node_type(value)? {
        "Qubit" => Ok(Type::Qubit),
        "Bit" => Ok(Type::Bit),
        "Bool" => Ok(Type::Bool),
        "Int" => Ok(Type::Int),
        "Real" => Ok(Type::Real),
        "Complex" => Ok(Type::Complex),
        "String" => Ok(Type::String),
        "Axis" => Ok(Type::Axis),
        "QubitArray" => Ok(Type::QubitArray(size()?)),
        "BitArray" => Ok(Type::BitArray(size()?)),
        "RealMatrix" => Ok(Type::RealMatrix),
        "ComplexMatrix" => Ok(Type::ComplexMatrix),
        other => Err(Error::UnknownNode(other.into())),
    }
}

fn value_to_value(value: &SemValue) -> Value {
    let mut fields;
    match &value.kind {
        ValueKind::ConstBool(b) => {
            fields = node("ConstBool", value.span);
            fields.push(("x".into(), Value::Bool(*b)));
        }
        ValueKind::ConstInt(i) => {
            fields = node("ConstInt", value.span);
            fields.push(("x".into(), Value::Int(*i)));
        }
        ValueKind::ConstReal(r) => {
            fields = node("ConstReal", value.span);
            fields.push(("x".into(), Value::Float(*r)));
        }
        ValueKind::ConstComplex(c) => {
            fields = node("ConstComplex", value.span);
            fields.push(("r".into(), Value::Float(c.re)));
            fields.push(("i".into(), Value::Float(c.im)));
        }
        ValueKind::ConstString(s) => {
            fields = node("ConstString", value.span);
            fields.push(("x".into(), Value::Text(s.to_string())));
        }
        ValueKind::ConstAxis(axis) => {
            fields = node("ConstAxis", value.span);
            fields.push(("x".into(), Value::Float(axis.x)));
            fields.push(("y".into(), Value::Float(axis.y)));
            fields.push(("z".into(), Value::Float(axis.z)));
        }
        ValueKind::ConstRealMatrix(m) => {
            fields = node("ConstRealMatrix", value.span);
            fields.push((
                "c".into(),
                Value::Int(i64::try_from(m.num_cols()).expect("column count should fit in i64")),
            ));
            fields.push((
                "d".into(),
                Value::Array(m.data().iter().map(|&x| Value::Float(x)).collect()),
            ));
        }
        ValueKind::ConstComplexMatrix(m) => {
            fields = node("ConstComplexMatrix", value.span);
            fields.push((
                "c".into(),
                Value::Int(i64::try_from(m.num_cols()).expect("column count should fit in i64")),
            ));
            fields.push((
                "d".into(),
                Value::Array(
                    m.data()
                        .iter()
                        .map(|entry| {
                            Value::Map(vec![
                                ("r".into(), Value::Float(entry.re)),
                                ("i".into(), Value::Float(entry.im)),
                            ])
                        })
                        .collect(),
                ),
            ));
        }
        ValueKind::QubitRefs(indices) => {
            fields = node("QubitRefs", value.span);
            fields.push((
                "x".into(),
                Value::Array(indices.iter().map(|&i| Value::Int(i)).collect()),
            ));
        }
        ValueKind::BitRefs(indices) => {
            fields = node("BitRefs", value.span);
            fields.push((
                "x".into(),
                Value::Array(indices.iter().map(|&i| Value::Int(i)).collect()),
            ));
        }
        ValueKind::FunctionCall(call) => {
            fields = node("FunctionCall", value.span);
            fields.push(("n".into(), Value::Text(call.name.to_string())));
            fields.push((
                "a".into(),
                Value::Array(call.args.iter().map(value_to_value).collect()),
            ));
            fields.push(("r".into(), type_to_value(&call.return_type)));
        }
        ValueKind::VariableRef(name, ty) => {
            fields = node("VariableRef", value.span);
            fields.push(("n".into(), Value::Text(name.to_string())));
            fields.push(("t".into(), type_to_value(ty)));
        }
    }
    Value::Map(fields)
}

fn value_from_value(value: &Value) -> Result<SemValue> {
    let span = span_from(value)?;
    let kind = match node_type(value)? {
        "ConstBool" => ValueKind::ConstBool(boolean(req(value, "x")?, "x")?),
        "ConstInt" => ValueKind::ConstInt(int(req(value, "x")?, "x")?),
        "ConstReal" => ValueKind::ConstReal(float(req(value, "x")?, "x")?),
        "ConstComplex" => ValueKind::ConstComplex(Complex64::new(
            float(req(value, "r")?, "r")?,
            float(req(value, "i")?, "i")?,
        )),
        "ConstString" => ValueKind::ConstString(text(req(value, "x")?, "x")?.into()),
        "ConstAxis" => ValueKind::ConstAxis(Axis {
            x: float(req(value, "x")?, "x")?,
            y: float(req(value, "y")?, "y")?,
            z: float(req(value, "z")?, "z")?,
        }),
        "ConstRealMatrix" => {
            let num_cols = usize::try_from(int(req(value, "c")?, "c")?)
                .map_err(|_| Error::WrongType("c"))?;
            let data = array(req(value, "d")?, "d")?
                .iter()
                .map(|x| float(x, "d"))
                .collect::<Result<_>>()?;
            ValueKind::ConstRealMatrix(Matrix::new(num_cols, data))
        }
        "ConstComplexMatrix" => {
            let num_cols = usize::try_from(int(req(value, "c")?, "c")?)
                .map_err(|_| Error::WrongType("c"))?;
            let data = array(req(value, "d")?, "d")?
                .iter()
                .map(|entry| {
                    Ok(Complex64::new(
                        float(req(entry, "r")?, "r")?,
                        float(req(entry, "i")?, "i")?,
                    ))
                })
                .collect::<Result<_>>()?;
            ValueKind::ConstComplexMatrix(Matrix::new(num_cols, data))
        }
        "QubitRefs" => ValueKind::QubitRefs(indices_from_value(req(value, "x")?)?),
        "BitRefs" => ValueKind::BitRefs(indices_from_value(req(value, "x")?)?),
        "FunctionCall" => ValueKind::FunctionCall(Box::new(FunctionCall {
            name: text(req(value, "n")?, "n")?.into(),
            args: array(req(value, "a")?, "a")?
                .iter()
                .map(value_from_value)
                .collect::<Result<_>>()?,
            return_type: type_from_value(req(value, "r")?)?,
        })),
        "VariableRef" => ValueKind::VariableRef(
            text(req(value, "n")?, "n")?.into(),
            type_from_value(req(value, "t")?)?,
        ),
        other => return Err(Error::UnknownNode(other.into())),
    };
    Ok(SemValue::new(span, kind))
}

fn indices_from_value(value: &Value) -> Result<Vec<i64>> {
    array(value, "x")?
        .iter()
        .map(|item| int(item, "x"))
        .collect()
}

fn node(ty: &str, span: Span) -> Vec<(String, Value)> {
    vec![
        ("@t".into(), Value::Text(ty.into())),
        (
            "@s".into(),
            Value::Array(vec![
                Value::Int(i64::from(span.lo)),
                Value::Int(i64::from(span.hi)),
            ]),
        ),
    ]
}

fn node_type(value: &Value) -> Result<&str> {
    text(value.get("@t").ok_or(Error::MissingField("@t"))?, "@t")
}

fn expect_node(value: &Value, ty: &'static str) -> Result<()> {
    if node_type(value)? == ty {
        Ok(())
    } else {
        Err(Error::UnknownNode(node_type(value)?.into()))
    }
}

fn span_from(value: &Value) -> Result<Span> {
    let items = array(value.get("@s").ok_or(Error::MissingField("@s"))?, "@s")?;
    match items {
        [Value::Int(lo), Value::Int(hi)] => Ok(Span {
            lo: u32::try_from(*lo).map_err(|_| Error::WrongType("@s"))?,
            hi: u32::try_from(*hi).map_err(|_| Error::WrongType("@s"))?,
        }),
        _ => Err(Error::WrongType("@s")),
    }
}

fn req<'a>(value: &'a Value, key: &'static str) -> Result<&'a Value> {
    value.get(key).ok_or(Error::MissingField(key))
}

fn array<'a>(value: &'a Value, key: &'static str) -> Result<&'a [Value]> {
    match value {
        Value::Array(items) => Ok(items),
        _ => Err(Error::WrongType(key)),
    }
}

fn text<'a>(value: &'a Value, key: &'static str) -> Result<&'a str> {
    match value {
        Value::Text(s) => Ok(s),
        _ => Err(Error::WrongType(key)),
    }
}

fn int(value: &Value, key: &'static str) -> Result<i64> {
    match value {
        Value::Int(i) => Ok(*i),
        _ => Err(Error::WrongType(key)),
    }
}

fn float(value: &Value, key: &'static str) -> Result<f64> {
    match value {
        Value::Float(f) => Ok(*f),
        _ => Err(Error::WrongType(key)),
    }
}

fn boolean(value: &Value, key: &'static str) -> Result<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        _ => Err(Error::WrongType(key)),
    }
}
