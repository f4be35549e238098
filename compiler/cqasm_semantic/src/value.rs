// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#[cfg(test)]
mod tests;

use crate::types::Type;
use cqasm_data_structures::{language::Dialect, span::Span};
use num_complex::Complex64;
use std::{
    fmt::{self, Display, Formatter},
    rc::Rc,
};

/// A measurement axis as a unit vector.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Axis {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Axis {
    pub const X: Self = Self {
        x: 1.0,
        y: 0.0,
        z: 0.0,
    };
    pub const Y: Self = Self {
        x: 0.0,
        y: 1.0,
        z: 0.0,
    };
    pub const Z: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 1.0,
    };
}

impl Display for Axis {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.x, self.y, self.z)
    }
}

/// A matrix literal: a column count plus the flat data sequence in row-major
/// order, so that serialization is trivial.
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix<T> {
    num_cols: usize,
    data: Vec<T>,
}

impl<T> Matrix<T> {
    /// Creates a matrix from row-major data. The data length must be a
    /// multiple of the column count.
    #[must_use]
    pub fn new(num_cols: usize, data: Vec<T>) -> Self {
        assert!(
            num_cols > 0 && data.len() % num_cols == 0,
            "matrix data length should be a multiple of the column count"
        );
        Self { num_cols, data }
    }

    #[must_use]
    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.data.len() / self.num_cols
    }

    #[must_use]
    pub fn data(&self) -> &[T] {
        &self.data
    }
}

impl<T: Display> Display for Matrix<T> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str("[")?;
        for (i, entry) in self.data.iter().enumerate() {
            if i > 0 {
                f.write_str(if i % self.num_cols == 0 { " | " } else { ", " })?;
            }
            write!(f, "{entry}")?;
        }
        f.write_str("]")
    }
}

/// A value node: the result of constant folding an expression. Clones are deep
/// and carry the source span along.
#[derive(Clone, Debug, PartialEq)]
pub struct Value {
    /// The span of the expression this value was folded from.
    pub span: Span,
    /// The value kind.
    pub kind: ValueKind,
}

impl Value {
    #[must_use]
    pub fn new(span: Span, kind: ValueKind) -> Self {
        Self { span, kind }
    }

    /// The type tag of this value. In the legacy dialect qubit and bit
    /// references are always scalar-typed regardless of how many indices they
    /// carry; the 3.x dialect types multi-index references as arrays.
    #[must_use]
    pub fn type_of(&self, dialect: Dialect) -> Type {
        match &self.kind {
            ValueKind::ConstBool(_) => Type::Bool,
            ValueKind::ConstInt(_) => Type::Int,
            ValueKind::ConstReal(_) => Type::Real,
            ValueKind::ConstComplex(_) => Type::Complex,
            ValueKind::ConstString(_) => Type::String,
            ValueKind::ConstAxis(_) => Type::Axis,
            ValueKind::ConstRealMatrix(_) => Type::RealMatrix,
            ValueKind::ConstComplexMatrix(_) => Type::ComplexMatrix,
            ValueKind::QubitRefs(indices) => match dialect {
                Dialect::V1 => Type::Qubit,
                Dialect::V3 if indices.len() == 1 => Type::Qubit,
                Dialect::V3 => Type::QubitArray(indices.len() as u64),
            },
            ValueKind::BitRefs(indices) => match dialect {
                Dialect::V1 => Type::Bit,
                Dialect::V3 if indices.len() == 1 => Type::Bit,
                Dialect::V3 => Type::BitArray(indices.len() as u64),
            },
            ValueKind::FunctionCall(call) => call.return_type.clone(),
            ValueKind::VariableRef(_, ty) => ty.clone(),
        }
    }

    /// The qubit indices this value references, if any.
    #[must_use]
    pub fn qubit_indices(&self) -> &[i64] {
        match &self.kind {
            ValueKind::QubitRefs(indices) => indices,
            _ => &[],
        }
    }

    /// The length of the index list for reference values.
    #[must_use]
    pub fn index_size(&self) -> Option<usize> {
        match &self.kind {
            ValueKind::QubitRefs(indices) | ValueKind::BitRefs(indices) => Some(indices.len()),
            _ => None,
        }
    }
}

/// The sum of value node kinds.
#[derive(Clone, Debug, PartialEq)]
pub enum ValueKind {
    ConstBool(bool),
    ConstInt(i64),
    ConstReal(f64),
    ConstComplex(Complex64),
    ConstString(Rc<str>),
    ConstAxis(Axis),
    ConstRealMatrix(Matrix<f64>),
    ConstComplexMatrix(Matrix<Complex64>),
    /// A reference to qubits in the program-wide register, by index.
    QubitRefs(Vec<i64>),
    /// A reference to measurement bits, by index.
    BitRefs(Vec<i64>),
    /// The result of a function call that could not be evaluated at analysis
    /// time.
    FunctionCall(Box<FunctionCall>),
    /// A reference to a declared variable, by name.
    VariableRef(Rc<str>, Type),
}

/// A deferred function call value.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionCall {
    pub name: Rc<str>,
    pub args: Vec<Value>,
    pub return_type: Type,
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match &self.kind {
            ValueKind::ConstBool(b) => write!(f, "{b}"),
            ValueKind::ConstInt(i) => write!(f, "{i}"),
            ValueKind::ConstReal(r) => write!(f, "{r:?}"),
            ValueKind::ConstComplex(c) => write!(f, "{}{:+}i", c.re, c.im),
            ValueKind::ConstString(s) => write!(f, "{s:?}"),
            ValueKind::ConstAxis(axis) => write!(f, "{axis}"),
            ValueKind::ConstRealMatrix(m) => write!(f, "{m}"),
            ValueKind::ConstComplexMatrix(m) => {
                f.write_str("[")?;
                for (i, entry) in m.data().iter().enumerate() {
                    if i > 0 {
                        f.write_str(if i % m.num_cols() == 0 { " | " } else { ", " })?;
                    }
                    write!(f, "{}{:+}i", entry.re, entry.im)?;
                }
                f.write_str("]")
            }
            ValueKind::QubitRefs(indices) => write_refs(f, "q", indices),
            ValueKind::BitRefs(indices) => write_refs(f, "b", indices),
            ValueKind::FunctionCall(call) => {
                write!(f, "{}(", call.name)?;
                for (i, arg) in call.args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
            ValueKind::VariableRef(name, _) => write!(f, "var {name}"),
        }
    }
}

fn write_refs(f: &mut Formatter, register: &str, indices: &[i64]) -> fmt::Result {
    write!(f, "{register}[")?;
    for (i, index) in indices.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{index}")?;
    }
    f.write_str("]")
}

/// Returns a new value of type `ty` if `type_of(value) ≾ ty` under the
/// promotion relation, and `None` otherwise.
///
/// The relation is `Bool ≾ Int ≾ Real ≾ Complex` (transitively), `T ≾ T` with
/// array sizes ignored, and scalar-reference-to-array-of-one wrapping.
/// Promotion is lossless: `Bool` maps to 0/1, and the numeric widenings are
/// exact over the representable range.
#[must_use]
pub fn promote(value: &Value, ty: &Type, dialect: Dialect) -> Option<Value> {
    let actual = value.type_of(dialect);
    if actual.matches(ty) {
        return Some(value.clone());
    }

    #[allow(clippy::cast_precision_loss)]
    let kind = match (&value.kind, ty) {
        (ValueKind::ConstBool(b), Type::Int) => ValueKind::ConstInt(i64::from(*b)),
        (ValueKind::ConstBool(b), Type::Real) => ValueKind::ConstReal(f64::from(*b)),
        (ValueKind::ConstBool(b), Type::Complex) => {
            ValueKind::ConstComplex(Complex64::new(f64::from(*b), 0.0))
        }
        (ValueKind::ConstInt(i), Type::Real) => ValueKind::ConstReal(*i as f64),
        (ValueKind::ConstInt(i), Type::Complex) => {
            ValueKind::ConstComplex(Complex64::new(*i as f64, 0.0))
        }
        (ValueKind::ConstReal(r), Type::Complex) => {
            ValueKind::ConstComplex(Complex64::new(*r, 0.0))
        }
        // A single-element reference satisfies the corresponding array type.
        (ValueKind::QubitRefs(indices), Type::QubitArray(_)) if actual == Type::Qubit => {
            ValueKind::QubitRefs(indices.clone())
        }
        (ValueKind::BitRefs(indices), Type::BitArray(_)) if actual == Type::Bit => {
            ValueKind::BitRefs(indices.clone())
        }
        _ => return None,
    };
    Some(Value::new(value.span, kind))
}
