// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Tag-value serialization of the syntactic tree. Every node becomes a CBOR map
//! with its variant name under `"@t"`, its span under `"@s"`, and short keys for
//! the remaining fields; sequences become CBOR arrays. Deserialization
//! reconstructs nodes from the `"@t"` tag and the keys present.

#[cfg(test)]
mod tests;

use crate::ast::{
    Annotation, BinOp, BitDecl, Bundle, ErrorModelStmt, Expr, ExprKind, GateModifier,
    GateModifierKind, Ident, IndexItem, Instruction, Lit, Mapping, Program, QubitDecl, Stmt,
    StmtKind, Subcircuit, UnOp, VersionNode,
};
use cqasm_data_structures::{cbor::Value, span::Span, version::Version};
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
    #[error("unknown operator `{0}`")]
    UnknownOperator(String),
}

type Result<T> = std::result::Result<T, Error>;

/// Serializes a program to a tag-value item; encode with
/// [`cqasm_data_structures::cbor::encode`] for the binary blob.
#[must_use]
pub fn program_to_value(program: &Program) -> Value {
    let mut fields = node("Program", program.span);
    fields.push(("v".into(), version_to_value(&program.version)));
    fields.push((
        "s".into(),
        Value::Array(program.statements.iter().map(stmt_to_value).collect()),
    ));
    Value::Map(fields)
}

/// Reconstructs a program from a tag-value item.
pub fn program_from_value(value: &Value) -> Result<Program> {
    expect_node(value, "Program")?;
    Ok(Program {
        span: span_from(value)?,
        version: version_from_value(req(value, "v")?)?,
        statements: array(req(value, "s")?, "s")?
            .iter()
            .map(stmt_from_value)
            .collect::<Result<_>>()?,
    })
}

fn version_to_value(version: &VersionNode) -> Value {
    let mut fields = node("Version", version.span);
    fields.push((
        "x".into(),
        Value::Array(
            version
                .version
                .0
                .iter()
                .map(|&c| Value::Int(i64::try_from(c).expect("version component should fit in i64")))
                .collect(),
        ),
    ));
    Value::Map(fields)
}

fn version_from_value(value: &Value) -> Result<VersionNode> {
    expect_node(value, "Version")?;
    let components = array(req(value, "x")?, "x")?
        .iter()
        .map(|item| match item {
            Value::Int(i) if *i >= 0 => Ok(u64::try_from(*i).expect("component is non-negative")),
            _ => Err(Error::WrongType("x")),
        })
        .collect::<Result<_>>()?;
    Ok(VersionNode {
        span: span_from(value)?,
        version: Version(components),
    })
}

fn stmt_to_value(stmt: &Stmt) -> Value {
    let mut fields;
    match &stmt.kind {
        StmtKind::QubitDecl(decl) => {
            fields = node("QubitDecl", stmt.span);
            if let Some(size) = &decl.size {
                fields.push(("z".into(), expr_to_value(size)));
            }
            if let Some(name) = &decl.name {
                fields.push(("n".into(), ident_to_value(name)));
            }
        }
        StmtKind::BitDecl(decl) => {
            fields = node("BitDecl", stmt.span);
            if let Some(size) = &decl.size {
                fields.push(("z".into(), expr_to_value(size)));
            }
            fields.push(("n".into(), ident_to_value(&decl.name)));
        }
        StmtKind::Mapping(mapping) => {
            fields = node("Mapping", stmt.span);
            fields.push(("n".into(), ident_to_value(&mapping.name)));
            fields.push(("v".into(), expr_to_value(&mapping.value)));
            fields.push(("a".into(), annotations_to_value(&mapping.annotations)));
        }
        StmtKind::Subcircuit(subcircuit) => {
            fields = node("Subcircuit", stmt.span);
            fields.push(("n".into(), ident_to_value(&subcircuit.name)));
            if let Some(iterations) = &subcircuit.iterations {
                fields.push(("i".into(), expr_to_value(iterations)));
            }
            fields.push(("a".into(), annotations_to_value(&subcircuit.annotations)));
        }
        StmtKind::Bundle(bundle) => {
            fields = node("Bundle", stmt.span);
            fields.push((
                "i".into(),
                Value::Array(bundle.instructions.iter().map(instruction_to_value).collect()),
            ));
            fields.push(("a".into(), annotations_to_value(&bundle.annotations)));
        }
        StmtKind::ErrorModel(model) => {
            fields = node("ErrorModel", stmt.span);
            fields.push(("n".into(), ident_to_value(&model.name)));
            fields.push((
                "o".into(),
                Value::Array(model.args.iter().map(expr_to_value).collect()),
            ));
            fields.push(("a".into(), annotations_to_value(&model.annotations)));
        }
        StmtKind::Break => fields = node("Break", stmt.span),
        StmtKind::Continue => fields = node("Continue", stmt.span),
        StmtKind::Err => fields = node("Err", stmt.span),
    }
    Value::Map(fields)
}

fn stmt_from_value(value: &Value) -> Result<Stmt> {
    let span = span_from(value)?;
    let kind = match node_type(value)? {
        "QubitDecl" => StmtKind::QubitDecl(Box::new(QubitDecl {
            size: opt(value, "z").map(expr_from_value).transpose()?,
            name: opt(value, "n").map(ident_from_value).transpose()?,
        })),
        "BitDecl" => StmtKind::BitDecl(Box::new(BitDecl {
            size: opt(value, "z").map(expr_from_value).transpose()?,
            name: ident_from_value(req(value, "n")?)?,
        })),
        "Mapping" => StmtKind::Mapping(Box::new(Mapping {
            name: ident_from_value(req(value, "n")?)?,
            value: expr_from_value(req(value, "v")?)?,
            annotations: annotations_from_value(req(value, "a")?)?,
        })),
        "Subcircuit" => StmtKind::Subcircuit(Box::new(Subcircuit {
            name: ident_from_value(req(value, "n")?)?,
            iterations: opt(value, "i").map(expr_from_value).transpose()?,
            annotations: annotations_from_value(req(value, "a")?)?,
        })),
        "Bundle" => StmtKind::Bundle(Box::new(Bundle {
            instructions: array(req(value, "i")?, "i")?
                .iter()
                .map(instruction_from_value)
                .collect::<Result<_>>()?,
            annotations: annotations_from_value(req(value, "a")?)?,
        })),
        "ErrorModel" => StmtKind::ErrorModel(Box::new(ErrorModelStmt {
            name: ident_from_value(req(value, "n")?)?,
            args: array(req(value, "o")?, "o")?
                .iter()
                .map(expr_from_value)
                .collect::<Result<_>>()?,
            annotations: annotations_from_value(req(value, "a")?)?,
        })),
        "Break" => StmtKind::Break,
        "Continue" => StmtKind::Continue,
        "Err" => StmtKind::Err,
        other => return Err(Error::UnknownNode(other.into())),
    };
    Ok(Stmt { span, kind })
}

fn instruction_to_value(instruction: &Instruction) -> Value {
    let mut fields = node("Instruction", instruction.span);
    fields.push(("n".into(), ident_to_value(&instruction.name)));
    if !instruction.modifiers.is_empty() {
        fields.push((
            "m".into(),
            Value::Array(instruction.modifiers.iter().map(modifier_to_value).collect()),
        ));
    }
    if let Some(condition) = &instruction.condition {
        fields.push(("c".into(), expr_to_value(condition)));
    }
    fields.push((
        "o".into(),
        Value::Array(instruction.operands.iter().map(expr_to_value).collect()),
    ));
    fields.push(("a".into(), annotations_to_value(&instruction.annotations)));
    Value::Map(fields)
}

fn instruction_from_value(value: &Value) -> Result<Instruction> {
    expect_node(value, "Instruction")?;
    Ok(Instruction {
        span: span_from(value)?,
        name: ident_from_value(req(value, "n")?)?,
        modifiers: match opt(value, "m") {
            Some(modifiers) => array(modifiers, "m")?
                .iter()
                .map(modifier_from_value)
                .collect::<Result<_>>()?,
            None => Vec::new(),
        },
        condition: opt(value, "c").map(expr_from_value).transpose()?,
        operands: array(req(value, "o")?, "o")?
            .iter()
            .map(expr_from_value)
            .collect::<Result<_>>()?,
        annotations: annotations_from_value(req(value, "a")?)?,
    })
}

fn modifier_to_value(modifier: &GateModifier) -> Value {
    let mut fields;
    match &modifier.kind {
        GateModifierKind::Inv => fields = node("Inv", modifier.span),
        GateModifierKind::Ctrl => fields = node("Ctrl", modifier.span),
        GateModifierKind::Pow(exponent) => {
            fields = node("Pow", modifier.span);
            fields.push(("e".into(), expr_to_value(exponent)));
        }
    }
    Value::Map(fields)
}

fn modifier_from_value(value: &Value) -> Result<GateModifier> {
    let span = span_from(value)?;
    let kind = match node_type(value)? {
        "Inv" => GateModifierKind::Inv,
        "Ctrl" => GateModifierKind::Ctrl,
        "Pow" => GateModifierKind::Pow(expr_from_value(req(value, "e")?)?),
        other => return Err(Error::UnknownNode(other.into())),
    };
    Ok(GateModifier { span, kind })
}

fn annotations_to_value(annotations: &[Annotation]) -> Value {
    Value::Array(
        annotations
            .iter()
            .map(|annotation| {
                let mut fields = node("Annotation", annotation.span);
                fields.push(("i".into(), ident_to_value(&annotation.interface)));
                fields.push(("o".into(), ident_to_value(&annotation.operation)));
                fields.push((
                    "p".into(),
                    Value::Array(annotation.operands.iter().map(expr_to_value).collect()),
                ));
                Value::Map(fields)
            })
            .collect(),
    )
}

fn annotations_from_value(value: &Value) -> Result<Vec<Annotation>> {
    array(value, "a")?
        .iter()
        .map(|item| {
            expect_node(item, "Annotation")?;
            Ok(Annotation {
                span: span_from(item)?,
                interface: ident_from_value(req(item, "i")?)?,
                operation: ident_from_value(req(item, "o")?)?,
                operands: array(req(item, "p")?, "p")?
                    .iter()
                    .map(expr_from_value)
                    .collect::<Result<_>>()?,
            })
        })
        .collect()
}

fn ident_to_value(ident: &Ident) -> Value {
    let mut fields = node("Ident", ident.span);
    fields.push(("x".into(), Value::Text(ident.name.to_string())));
    Value::Map(fields)
}

fn ident_from_value(value: &Value) -> Result<Ident> {
    expect_node(value, "Ident")?;
    Ok(Ident {
        span: span_from(value)?,
        name: text(req(value, "x")?, "x")?.into(),
    })
}

fn expr_to_value(expr: &Expr) -> Value {
    let mut fields;
    match &expr.kind {
        ExprKind::Lit(Lit::Bool(b)) => {
            fields = node("BoolLit", expr.span);
            fields.push(("x".into(), Value::Bool(*b)));
        }
        ExprKind::Lit(Lit::Int(i)) => {
            fields = node("IntLit", expr.span);
            fields.push(("x".into(), Value::Int(*i)));
        }
        ExprKind::Lit(Lit::Real(r)) => {
            fields = node("RealLit", expr.span);
            fields.push(("x".into(), Value::Float(*r)));
        }
        ExprKind::Lit(Lit::String(s)) => {
            fields = node("StringLit", expr.span);
            fields.push(("x".into(), Value::Text(s.to_string())));
        }
        ExprKind::Ident(ident) => return ident_to_value(ident),
        ExprKind::Index(indexee, items) => {
            fields = node("Index", expr.span);
            fields.push(("e".into(), expr_to_value(indexee)));
            fields.push((
                "i".into(),
                Value::Array(items.iter().map(index_item_to_value).collect()),
            ));
        }
        ExprKind::UnOp(op, operand) => {
            fields = node("UnOp", expr.span);
            fields.push(("o".into(), Value::Text(op.spelling().into())));
            fields.push(("e".into(), expr_to_value(operand)));
        }
        ExprKind::BinOp(op, lhs, rhs) => {
            fields = node("BinOp", expr.span);
            fields.push(("o".into(), Value::Text(op.spelling().into())));
            fields.push(("l".into(), expr_to_value(lhs)));
            fields.push(("r".into(), expr_to_value(rhs)));
        }
        ExprKind::TernOp(cond, if_true, if_false) => {
            fields = node("TernOp", expr.span);
            fields.push(("c".into(), expr_to_value(cond)));
            fields.push(("t".into(), expr_to_value(if_true)));
            fields.push(("f".into(), expr_to_value(if_false)));
        }
        ExprKind::Call(name, args) => {
            fields = node("Call", expr.span);
            fields.push(("n".into(), ident_to_value(name)));
            fields.push((
                "a".into(),
                Value::Array(args.iter().map(expr_to_value).collect()),
            ));
        }
        ExprKind::Matrix(rows) => {
            fields = node("Matrix", expr.span);
            fields.push((
                "d".into(),
                Value::Array(
                    rows.iter()
                        .map(|row| Value::Array(row.iter().map(expr_to_value).collect()))
                        .collect(),
                ),
            ));
        }
        ExprKind::Paren(inner) => {
            fields = node("Paren", expr.span);
            fields.push(("e".into(), expr_to_value(inner)));
        }
        ExprKind::Err => fields = node("Err", expr.span),
    }
    Value::Map(fields)
}

fn expr_from_value(value: &Value) -> Result<Expr> {
    let span = span_from(value)?;
    let kind = match node_type(value)? {
        "BoolLit" => match req(value, "x")? {
            Value::Bool(b) => ExprKind::Lit(Lit::Bool(*b)),
            _ => return Err(Error::WrongType("x")),
        },
        "IntLit" => match req(value, "x")? {
            Value::Int(i) => ExprKind::Lit(Lit::Int(*i)),
            _ => return Err(Error::WrongType("x")),
        },
        "RealLit" => match req(value, "x")? {
            Value::Float(r) => ExprKind::Lit(Lit::Real(*r)),
            _ => return Err(Error::WrongType("x")),
        },
        "StringLit" => ExprKind::Lit(Lit::String(text(req(value, "x")?, "x")?.into())),
        "Ident" => ExprKind::Ident(ident_from_value(value)?),
        "Index" => ExprKind::Index(
            Box::new(expr_from_value(req(value, "e")?)?),
            array(req(value, "i")?, "i")?
                .iter()
                .map(index_item_from_value)
                .collect::<Result<_>>()?,
        ),
        "UnOp" => {
            let spelling = text(req(value, "o")?, "o")?;
            let op = UnOp::from_spelling(spelling)
                .ok_or_else(|| Error::UnknownOperator(spelling.into()))?;
            ExprKind::UnOp(op, Box::new(expr_from_value(req(value, "e")?)?))
        }
        "BinOp" => {
            let spelling = text(req(value, "o")?, "o")?;
            let op = BinOp::from_spelling(spelling)
                .ok_or_else(|| Error::UnknownOperator(spelling.into()))?;
            ExprKind::BinOp(
                op,
                Box::new(expr_from_value(req(value, "l")?)?),
                Box::new(expr_from_value(req(value, "r")?)?),
            )
        }
        "TernOp" => ExprKind::TernOp(
            Box::new(expr_from_value(req(value, "c")?)?),
            Box::new(expr_from_value(req(value, "t")?)?),
            Box::new(expr_from_value(req(value, "f")?)?),
        ),
        "Call" => ExprKind::Call(
            ident_from_value(req(value, "n")?)?,
            array(req(value, "a")?, "a")?
                .iter()
                .map(expr_from_value)
                .collect::<Result<_>>()?,
        ),
        "Matrix" => ExprKind::Matrix(
            array(req(value, "d")?, "d")?
                .iter()
                .map(|row| {
                    array(row, "d")?
                        .iter()
                        .map(expr_from_value)
                        .collect::<Result<_>>()
                })
                .collect::<Result<_>>()?,
        ),
        "Paren" => ExprKind::Paren(Box::new(expr_from_value(req(value, "e")?)?)),
        "Err" => ExprKind::Err,
        other => return Err(Error::UnknownNode(other.into())),
    };
    Ok(Expr { span, kind })
}

fn index_item_to_value(item: &IndexItem) -> Value {
    match item {
        IndexItem::Single(expr) => expr_to_value(expr),
        IndexItem::Range(first, last) => {
            let mut fields = node("Range", first.span.union(last.span));
            fields.push(("f".into(), expr_to_value(first)));
            fields.push(("l".into(), expr_to_value(last)));
            Value::Map(fields)
        }
    }
}

fn index_item_from_value(value: &Value) -> Result<IndexItem> {
    if node_type(value)? == "Range" {
        Ok(IndexItem::Range(
            expr_from_value(req(value, "f")?)?,
            expr_from_value(req(value, "l")?)?,
        ))
    } else {
        Ok(IndexItem::Single(expr_from_value(value)?))
    }
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

fn opt<'a>(value: &'a Value, key: &'static str) -> Option<&'a Value> {
    value.get(key)
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
