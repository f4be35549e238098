// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.


use cqasm_data_structures::language::Dialect;
use std::{
    fmt::{self, Display, Formatter},
    mem,
};
use thiserror::Error;

/// A semantic type tag. Every tag carries a size: 1 for scalars, the element
/// count for arrays.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Type {
    /// A reference to a single qubit.
    Qubit,
    /// A reference to a single measurement bit.
    Bit,
    Bool,
    Int,
    Real,
    Complex,
    String,
    /// A measurement axis.
    Axis,
    /// A reference to `size` qubits.
    QubitArray(u64),
    /// A reference to `size` measurement bits.
    BitArray(u64),
    /// A matrix of reals.
    RealMatrix,
    /// A matrix of complex numbers.
    ComplexMatrix,
}

/// Error raised at registration time for a malformed shorthand type spec.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("unknown type code `{0}` in type spec")]
pub struct InvalidSpec(pub char);

impl Type {
    /// The number of elements of this type.
    #[must_use]
    pub fn size_of(&self) -> u64 {
        match self {
            Type::QubitArray(size) | Type::BitArray(size) => *size,
            _ => 1,
        }
    }

    /// Whether `self` and `other` are the same tag, ignoring array sizes.
    /// Signature matching uses this; exact equality includes the size.
    #[must_use]
    pub fn matches(&self, other: &Type) -> bool {
        mem::discriminant(self) == mem::discriminant(other)
    }

    /// The type a single shorthand character encodes. The alphabet is
    /// dialect-specific:
    ///
    /// - v1: `Q` qubit, `B` bit, `a` axis, `b` bool, `i` int, `r` real,
    ///   `c` complex, `s` string, `u` complex matrix, `m` real matrix.
    /// - v3: `Q` qubit, `B` bit, `b` bool, `i` int, `f` real (float),
    ///   `V` qubit array, `W` bit array.
    pub fn from_spec_char(c: char, dialect: Dialect) -> Result<Self, InvalidSpec> {
        match (dialect, c) {
            (_, 'Q') => Ok(Type::Qubit),
            (_, 'B') => Ok(Type::Bit),
            (_, 'b') => Ok(Type::Bool),
            (_, 'i') => Ok(Type::Int),
            (Dialect::V1, 'a') => Ok(Type::Axis),
            (Dialect::V1, 'r') => Ok(Type::Real),
            (Dialect::V1, 'c') => Ok(Type::Complex),
            (Dialect::V1, 's') => Ok(Type::String),
            (Dialect::V1, 'u') => Ok(Type::ComplexMatrix),
            (Dialect::V1, 'm') => Ok(Type::RealMatrix),
            (Dialect::V3, 'f') => Ok(Type::Real),
            (Dialect::V3, 'V') => Ok(Type::QubitArray(1)),
            (Dialect::V3, 'W') => Ok(Type::BitArray(1)),
            _ => Err(InvalidSpec(c)),
        }
    }
}

/// The types a shorthand string encodes, one character per type.
pub fn from_spec(spec: &str, dialect: Dialect) -> Result<Vec<Type>, InvalidSpec> {
    spec.chars()
        .map(|c| Type::from_spec_char(c, dialect))
        .collect()
}

impl Display for Type {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(match self {
            Type::Qubit => "qubit",
            Type::Bit => "bit",
            Type::Bool => "bool",
            Type::Int => "int",
            Type::Real => "real",
            Type::Complex => "complex",
            Type::String => "string",
            Type::Axis => "axis",
            Type::QubitArray(_) => "qubit array",
            Type::BitArray(_) => "bit array",
            Type::RealMatrix => "real matrix",
            Type::ComplexMatrix => "complex matrix",
        })
    }
}
