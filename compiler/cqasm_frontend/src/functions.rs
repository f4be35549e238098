// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The default function sets: operators and math functions usable during
//! constant propagation. Operators are registered as `operator<sym>` and are
//! defined only over `Const*` inputs, which is what makes folding implicit.

#[cfg(test)]
mod tests;

use crate::{
    error::FnError,
    resolver::{FunctionTable, MappingTable},
};
use cqasm_data_structures::{language::Dialect, span::Span};
use cqasm_semantic::{
    types::from_spec,
    value::{Axis, Value, ValueKind},
};
use num_complex::Complex64;
use std::f64::consts::{E, PI, TAU};

type FnResult = Result<ValueKind, FnError>;

fn bool_arg(args: &[Value], i: usize) -> bool {
    match args[i].kind {
        ValueKind::ConstBool(b) => b,
        _ => unreachable!("argument should have been promoted to bool"),
    }
}

fn int_arg(args: &[Value], i: usize) -> i64 {
    match args[i].kind {
        ValueKind::ConstInt(x) => x,
        _ => unreachable!("argument should have been promoted to int"),
    }
}

fn real_arg(args: &[Value], i: usize) -> f64 {
    match args[i].kind {
        ValueKind::ConstReal(x) => x,
        _ => unreachable!("argument should have been promoted to real"),
    }
}

fn complex_arg(args: &[Value], i: usize) -> Complex64 {
    match args[i].kind {
        ValueKind::ConstComplex(x) => x,
        _ => unreachable!("argument should have been promoted to complex"),
    }
}

fn string_arg(args: &[Value], i: usize) -> &str {
    match &args[i].kind {
        ValueKind::ConstString(s) => s,
        _ => unreachable!("argument should have been promoted to string"),
    }
}

fn checked_int_div(lhs: i64, rhs: i64) -> FnResult {
    if rhs == 0 {
        Err(FnError::DivisionByZero)
    } else {
        Ok(ValueKind::ConstInt(lhs.wrapping_div(rhs)))
    }
}

fn checked_int_mod(lhs: i64, rhs: i64) -> FnResult {
    if rhs == 0 {
        Err(FnError::DivisionByZero)
    } else {
        Ok(ValueKind::ConstInt(lhs.wrapping_rem(rhs)))
    }
}

fn shift_amount(rhs: i64) -> u32 {
    // Shifts take the amount modulo the word size, like the hardware would.
    (rhs & 63) as u32
}

/// Registers the legacy dialect's operators and math functions.
pub fn register_v1(table: &mut FunctionTable) {
    let mut add = |name: &str, spec: &str, impl_: super::resolver::FunctionImpl| {
        let types = from_spec(spec, Dialect::V1).expect("default type specs should be valid");
        table.add(name, types, impl_);
    };

    add("operator-", "c", |a| Ok(ValueKind::ConstComplex(-complex_arg(a, 0))));
    add("operator-", "r", |a| Ok(ValueKind::ConstReal(-real_arg(a, 0))));
    add("operator-", "i", |a| {
        Ok(ValueKind::ConstInt(int_arg(a, 0).wrapping_neg()))
    });

    add("operator+", "cc", |a| {
        Ok(ValueKind::ConstComplex(complex_arg(a, 0) + complex_arg(a, 1)))
    });
    add("operator+", "rr", |a| {
        Ok(ValueKind::ConstReal(real_arg(a, 0) + real_arg(a, 1)))
    });
    add("operator+", "ii", |a| {
        Ok(ValueKind::ConstInt(int_arg(a, 0).wrapping_add(int_arg(a, 1))))
    });
    add("operator+", "ss", |a| {
        Ok(ValueKind::ConstString(
            format!("{}{}", string_arg(a, 0), string_arg(a, 1)).into(),
        ))
    });
    add("operator-", "cc", |a| {
        Ok(ValueKind::ConstComplex(complex_arg(a, 0) - complex_arg(a, 1)))
    });
    add("operator-", "rr", |a| {
        Ok(ValueKind::ConstReal(real_arg(a, 0) - real_arg(a, 1)))
    });
    add("operator-", "ii", |a| {
        Ok(ValueKind::ConstInt(int_arg(a, 0).wrapping_sub(int_arg(a, 1))))
    });

    add("operator*", "cc", |a| {
        Ok(ValueKind::ConstComplex(complex_arg(a, 0) * complex_arg(a, 1)))
    });
    add("operator*", "rr", |a| {
        Ok(ValueKind::ConstReal(real_arg(a, 0) * real_arg(a, 1)))
    });
    add("operator*", "ii", |a| {
        Ok(ValueKind::ConstInt(int_arg(a, 0).wrapping_mul(int_arg(a, 1))))
    });
    add("operator/", "cc", |a| {
        let rhs = complex_arg(a, 1);
        if rhs == Complex64::new(0.0, 0.0) {
            Err(FnError::DivisionByZero)
        } else {
            Ok(ValueKind::ConstComplex(complex_arg(a, 0) / rhs))
        }
    });
    add("operator/", "rr", |a| {
        let rhs = real_arg(a, 1);
        if rhs == 0.0 {
            Err(FnError::DivisionByZero)
        } else {
            Ok(ValueKind::ConstReal(real_arg(a, 0) / rhs))
        }
    });
    add("operator//", "ii", |a| checked_int_div(int_arg(a, 0), int_arg(a, 1)));
    add("operator%", "ii", |a| checked_int_mod(int_arg(a, 0), int_arg(a, 1)));

    add("operator**", "cc", |a| {
        Ok(ValueKind::ConstComplex(complex_arg(a, 0).powc(complex_arg(a, 1))))
    });
    add("operator**", "rr", |a| {
        Ok(ValueKind::ConstReal(real_arg(a, 0).powf(real_arg(a, 1))))
    });

    add("operator==", "cc", |a| {
        Ok(ValueKind::ConstBool(complex_arg(a, 0) == complex_arg(a, 1)))
    });
    add("operator!=", "cc", |a| {
        Ok(ValueKind::ConstBool(complex_arg(a, 0) != complex_arg(a, 1)))
    });

    add("operator==", "rr", |a| {
        Ok(ValueKind::ConstBool(real_arg(a, 0) == real_arg(a, 1)))
    });
    add("operator!=", "rr", |a| {
        Ok(ValueKind::ConstBool(real_arg(a, 0) != real_arg(a, 1)))
    });
    add("operator>=", "rr", |a| {
        Ok(ValueKind::ConstBool(real_arg(a, 0) >= real_arg(a, 1)))
    });
    add("operator>", "rr", |a| {
        Ok(ValueKind::ConstBool(real_arg(a, 0) > real_arg(a, 1)))
    });
    add("operator<=", "rr", |a| {
        Ok(ValueKind::ConstBool(real_arg(a, 0) <= real_arg(a, 1)))
    });
    add("operator<", "rr", |a| {
        Ok(ValueKind::ConstBool(real_arg(a, 0) < real_arg(a, 1)))
    });

    add("operator==", "ii", |a| {
        Ok(ValueKind::ConstBool(int_arg(a, 0) == int_arg(a, 1)))
    });
    add("operator!=", "ii", |a| {
        Ok(ValueKind::ConstBool(int_arg(a, 0) != int_arg(a, 1)))
    });
    add("operator>=", "ii", |a| {
        Ok(ValueKind::ConstBool(int_arg(a, 0) >= int_arg(a, 1)))
    });
    add("operator>", "ii", |a| {
        Ok(ValueKind::ConstBool(int_arg(a, 0) > int_arg(a, 1)))
    });
    add("operator<=", "ii", |a| {
        Ok(ValueKind::ConstBool(int_arg(a, 0) <= int_arg(a, 1)))
    });
    add("operator<", "ii", |a| {
        Ok(ValueKind::ConstBool(int_arg(a, 0) < int_arg(a, 1)))
    });

    add("operator==", "bb", |a| {
        Ok(ValueKind::ConstBool(bool_arg(a, 0) == bool_arg(a, 1)))
    });
    add("operator!=", "bb", |a| {
        Ok(ValueKind::ConstBool(bool_arg(a, 0) != bool_arg(a, 1)))
    });
    add("operator>=", "bb", |a| {
        Ok(ValueKind::ConstBool(bool_arg(a, 0) >= bool_arg(a, 1)))
    });
    add("operator>", "bb", |a| {
        Ok(ValueKind::ConstBool(bool_arg(a, 0) & !bool_arg(a, 1)))
    });
    add("operator<=", "bb", |a| {
        Ok(ValueKind::ConstBool(bool_arg(a, 0) <= bool_arg(a, 1)))
    });
    add("operator<", "bb", |a| {
        Ok(ValueKind::ConstBool(!bool_arg(a, 0) & bool_arg(a, 1)))
    });

    add("operator~", "i", |a| Ok(ValueKind::ConstInt(!int_arg(a, 0))));
    add("operator&", "ii", |a| {
        Ok(ValueKind::ConstInt(int_arg(a, 0) & int_arg(a, 1)))
    });
    add("operator^", "ii", |a| {
        Ok(ValueKind::ConstInt(int_arg(a, 0) ^ int_arg(a, 1)))
    });
    add("operator|", "ii", |a| {
        Ok(ValueKind::ConstInt(int_arg(a, 0) | int_arg(a, 1)))
    });

    add("operator<<", "ii", |a| {
        Ok(ValueKind::ConstInt(
            int_arg(a, 0).wrapping_shl(shift_amount(int_arg(a, 1))),
        ))
    });
    add("operator>>", "ii", |a| {
        Ok(ValueKind::ConstInt(
            int_arg(a, 0).wrapping_shr(shift_amount(int_arg(a, 1))),
        ))
    });
    add("operator>>>", "ii", |a| {
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_wrap)]
        Ok(ValueKind::ConstInt(
            ((int_arg(a, 0) as u64) >> shift_amount(int_arg(a, 1))) as i64,
        ))
    });

    add("operator!", "b", |a| Ok(ValueKind::ConstBool(!bool_arg(a, 0))));
    add("operator&&", "bb", |a| {
        Ok(ValueKind::ConstBool(bool_arg(a, 0) && bool_arg(a, 1)))
    });
    add("operator^^", "bb", |a| {
        Ok(ValueKind::ConstBool(bool_arg(a, 0) != bool_arg(a, 1)))
    });
    add("operator||", "bb", |a| {
        Ok(ValueKind::ConstBool(bool_arg(a, 0) || bool_arg(a, 1)))
    });

    add("operator?:", "bcc", select);
    add("operator?:", "brr", select);
    add("operator?:", "bii", select);
    add("operator?:", "bbb", select);

    add("sqrt", "c", |a| Ok(ValueKind::ConstComplex(complex_arg(a, 0).sqrt())));
    add("exp", "c", |a| Ok(ValueKind::ConstComplex(complex_arg(a, 0).exp())));
    add("log", "c", |a| Ok(ValueKind::ConstComplex(complex_arg(a, 0).ln())));
    add("sin", "c", |a| Ok(ValueKind::ConstComplex(complex_arg(a, 0).sin())));
    add("cos", "c", |a| Ok(ValueKind::ConstComplex(complex_arg(a, 0).cos())));
    add("tan", "c", |a| Ok(ValueKind::ConstComplex(complex_arg(a, 0).tan())));
    add("sinh", "c", |a| Ok(ValueKind::ConstComplex(complex_arg(a, 0).sinh())));
    add("cosh", "c", |a| Ok(ValueKind::ConstComplex(complex_arg(a, 0).cosh())));
    add("tanh", "c", |a| Ok(ValueKind::ConstComplex(complex_arg(a, 0).tanh())));
    add("asin", "c", |a| Ok(ValueKind::ConstComplex(complex_arg(a, 0).asin())));
    add("acos", "c", |a| Ok(ValueKind::ConstComplex(complex_arg(a, 0).acos())));
    add("atan", "c", |a| Ok(ValueKind::ConstComplex(complex_arg(a, 0).atan())));
    add("asinh", "c", |a| Ok(ValueKind::ConstComplex(complex_arg(a, 0).asinh())));
    add("acosh", "c", |a| Ok(ValueKind::ConstComplex(complex_arg(a, 0).acosh())));
    add("atanh", "c", |a| Ok(ValueKind::ConstComplex(complex_arg(a, 0).atanh())));

    add("sqrt", "r", |a| Ok(ValueKind::ConstReal(real_arg(a, 0).sqrt())));
    add("exp", "r", |a| Ok(ValueKind::ConstReal(real_arg(a, 0).exp())));
    add("log", "r", |a| Ok(ValueKind::ConstReal(real_arg(a, 0).ln())));
    add("sin", "r", |a| Ok(ValueKind::ConstReal(real_arg(a, 0).sin())));
    add("cos", "r", |a| Ok(ValueKind::ConstReal(real_arg(a, 0).cos())));
    add("tan", "r", |a| Ok(ValueKind::ConstReal(real_arg(a, 0).tan())));
    add("sinh", "r", |a| Ok(ValueKind::ConstReal(real_arg(a, 0).sinh())));
    add("cosh", "r", |a| Ok(ValueKind::ConstReal(real_arg(a, 0).cosh())));
    add("tanh", "r", |a| Ok(ValueKind::ConstReal(real_arg(a, 0).tanh())));
    add("asin", "r", |a| Ok(ValueKind::ConstReal(real_arg(a, 0).asin())));
    add("acos", "r", |a| Ok(ValueKind::ConstReal(real_arg(a, 0).acos())));
    add("atan", "r", |a| Ok(ValueKind::ConstReal(real_arg(a, 0).atan())));
    add("asinh", "r", |a| Ok(ValueKind::ConstReal(real_arg(a, 0).asinh())));
    add("acosh", "r", |a| Ok(ValueKind::ConstReal(real_arg(a, 0).acosh())));
    add("atanh", "r", |a| Ok(ValueKind::ConstReal(real_arg(a, 0).atanh())));

    add("abs", "r", |a| Ok(ValueKind::ConstReal(real_arg(a, 0).abs())));
    add("abs", "i", |a| {
        Ok(ValueKind::ConstInt(int_arg(a, 0).wrapping_abs()))
    });

    add("complex", "rr", |a| {
        Ok(ValueKind::ConstComplex(Complex64::new(
            real_arg(a, 0),
            real_arg(a, 1),
        )))
    });
    add("polar", "rr", |a| {
        Ok(ValueKind::ConstComplex(Complex64::from_polar(
            real_arg(a, 0),
            real_arg(a, 1),
        )))
    });
    add("real", "c", |a| Ok(ValueKind::ConstReal(complex_arg(a, 0).re)));
    add("imag", "c", |a| Ok(ValueKind::ConstReal(complex_arg(a, 0).im)));
    add("arg", "c", |a| Ok(ValueKind::ConstReal(complex_arg(a, 0).arg())));
    add("norm", "c", |a| {
        Ok(ValueKind::ConstReal(complex_arg(a, 0).norm_sqr()))
    });
    add("conj", "c", |a| Ok(ValueKind::ConstComplex(complex_arg(a, 0).conj())));
}

/// Registers the 3.x dialect's operators and math functions. The shapes are
/// the legacy set restricted to float, int, and bool.
pub fn register_v3(table: &mut FunctionTable) {
    let mut add = |name: &str, spec: &str, impl_: super::resolver::FunctionImpl| {
        let types = from_spec(spec, Dialect::V3).expect("default type specs should be valid");
        table.add(name, types, impl_);
    };

    add("operator-", "f", |a| Ok(ValueKind::ConstReal(-real_arg(a, 0))));
    add("operator-", "i", |a| {
        Ok(ValueKind::ConstInt(int_arg(a, 0).wrapping_neg()))
    });

    add("operator+", "ff", |a| {
        Ok(ValueKind::ConstReal(real_arg(a, 0) + real_arg(a, 1)))
    });
    add("operator+", "ii", |a| {
        Ok(ValueKind::ConstInt(int_arg(a, 0).wrapping_add(int_arg(a, 1))))
    });
    add("operator-", "ff", |a| {
        Ok(ValueKind::ConstReal(real_arg(a, 0) - real_arg(a, 1)))
    });
    add("operator-", "ii", |a| {
        Ok(ValueKind::ConstInt(int_arg(a, 0).wrapping_sub(int_arg(a, 1))))
    });

    add("operator*", "ff", |a| {
        Ok(ValueKind::ConstReal(real_arg(a, 0) * real_arg(a, 1)))
    });
    add("operator*", "ii", |a| {
        Ok(ValueKind::ConstInt(int_arg(a, 0).wrapping_mul(int_arg(a, 1))))
    });
    add("operator/", "ff", |a| {
        let rhs = real_arg(a, 1);
        if rhs == 0.0 {
            Err(FnError::DivisionByZero)
        } else {
            Ok(ValueKind::ConstReal(real_arg(a, 0) / rhs))
        }
    });
    add("operator/", "ii", |a| checked_int_div(int_arg(a, 0), int_arg(a, 1)));
    add("operator%", "ii", |a| checked_int_mod(int_arg(a, 0), int_arg(a, 1)));

    add("operator**", "ff", |a| {
        Ok(ValueKind::ConstReal(real_arg(a, 0).powf(real_arg(a, 1))))
    });

    add("operator==", "ff", |a| {
        Ok(ValueKind::ConstBool(real_arg(a, 0) == real_arg(a, 1)))
    });
    add("operator!=", "ff", |a| {
        Ok(ValueKind::ConstBool(real_arg(a, 0) != real_arg(a, 1)))
    });
    add("operator>=", "ff", |a| {
        Ok(ValueKind::ConstBool(real_arg(a, 0) >= real_arg(a, 1)))
    });
    add("operator>", "ff", |a| {
        Ok(ValueKind::ConstBool(real_arg(a, 0) > real_arg(a, 1)))
    });
    add("operator<=", "ff", |a| {
        Ok(ValueKind::ConstBool(real_arg(a, 0) <= real_arg(a, 1)))
    });
    add("operator<", "ff", |a| {
        Ok(ValueKind::ConstBool(real_arg(a, 0) < real_arg(a, 1)))
    });

    add("operator==", "ii", |a| {
        Ok(ValueKind::ConstBool(int_arg(a, 0) == int_arg(a, 1)))
    });
    add("operator!=", "ii", |a| {
        Ok(ValueKind::ConstBool(int_arg(a, 0) != int_arg(a, 1)))
    });
    add("operator>=", "ii", |a| {
        Ok(ValueKind::ConstBool(int_arg(a, 0) >= int_arg(a, 1)))
    });
    add("operator>", "ii", |a| {
        Ok(ValueKind::ConstBool(int_arg(a, 0) > int_arg(a, 1)))
    });
    add("operator<=", "ii", |a| {
        Ok(ValueKind::ConstBool(int_arg(a, 0) <= int_arg(a, 1)))
    });
    add("operator<", "ii", |a| {
        Ok(ValueKind::ConstBool(int_arg(a, 0) < int_arg(a, 1)))
    });

    add("operator==", "bb", |a| {
        Ok(ValueKind::ConstBool(bool_arg(a, 0) == bool_arg(a, 1)))
    });
    add("operator!=", "bb", |a| {
        Ok(ValueKind::ConstBool(bool_arg(a, 0) != bool_arg(a, 1)))
    });
    add("operator>=", "bb", |a| {
        Ok(ValueKind::ConstBool(bool_arg(a, 0) >= bool_arg(a, 1)))
    });
    add("operator>", "bb", |a| {
        Ok(ValueKind::ConstBool(bool_arg(a, 0) & !bool_arg(a, 1)))
    });
    add("operator<=", "bb", |a| {
        Ok(ValueKind::ConstBool(bool_arg(a, 0) <= bool_arg(a, 1)))
    });
    add("operator<", "bb", |a| {
        Ok(ValueKind::ConstBool(!bool_arg(a, 0) & bool_arg(a, 1)))
    });

    add("operator~", "i", |a| Ok(ValueKind::ConstInt(!int_arg(a, 0))));
    add("operator&", "ii", |a| {
        Ok(ValueKind::ConstInt(int_arg(a, 0) & int_arg(a, 1)))
    });
    add("operator^", "ii", |a| {
        Ok(ValueKind::ConstInt(int_arg(a, 0) ^ int_arg(a, 1)))
    });
    add("operator|", "ii", |a| {
        Ok(ValueKind::ConstInt(int_arg(a, 0) | int_arg(a, 1)))
    });

    add("operator<<", "ii", |a| {
        Ok(ValueKind::ConstInt(
            int_arg(a, 0).wrapping_shl(shift_amount(int_arg(a, 1))),
        ))
    });
    add("operator>>", "ii", |a| {
        Ok(ValueKind::ConstInt(
            int_arg(a, 0).wrapping_shr(shift_amount(int_arg(a, 1))),
        ))
    });

    add("operator!", "b", |a| Ok(ValueKind::ConstBool(!bool_arg(a, 0))));
    add("operator&&", "bb", |a| {
        Ok(ValueKind::ConstBool(bool_arg(a, 0) && bool_arg(a, 1)))
    });
    add("operator^^", "bb", |a| {
        Ok(ValueKind::ConstBool(bool_arg(a, 0) != bool_arg(a, 1)))
    });
    add("operator||", "bb", |a| {
        Ok(ValueKind::ConstBool(bool_arg(a, 0) || bool_arg(a, 1)))
    });

    add("operator?:", "bff", select);
    add("operator?:", "bii", select);
    add("operator?:", "bbb", select);

    add("sqrt", "f", |a| Ok(ValueKind::ConstReal(real_arg(a, 0).sqrt())));
    add("exp", "f", |a| Ok(ValueKind::ConstReal(real_arg(a, 0).exp())));
    add("log", "f", |a| Ok(ValueKind::ConstReal(real_arg(a, 0).ln())));
    add("sin", "f", |a| Ok(ValueKind::ConstReal(real_arg(a, 0).sin())));
    add("cos", "f", |a| Ok(ValueKind::ConstReal(real_arg(a, 0).cos())));
    add("tan", "f", |a| Ok(ValueKind::ConstReal(real_arg(a, 0).tan())));
    add("sinh", "f", |a| Ok(ValueKind::ConstReal(real_arg(a, 0).sinh())));
    add("cosh", "f", |a| Ok(ValueKind::ConstReal(real_arg(a, 0).cosh())));
    add("tanh", "f", |a| Ok(ValueKind::ConstReal(real_arg(a, 0).tanh())));
    add("asin", "f", |a| Ok(ValueKind::ConstReal(real_arg(a, 0).asin())));
    add("acos", "f", |a| Ok(ValueKind::ConstReal(real_arg(a, 0).acos())));
    add("atan", "f", |a| Ok(ValueKind::ConstReal(real_arg(a, 0).atan())));
    add("asinh", "f", |a| Ok(ValueKind::ConstReal(real_arg(a, 0).asinh())));
    add("acosh", "f", |a| Ok(ValueKind::ConstReal(real_arg(a, 0).acosh())));
    add("atanh", "f", |a| Ok(ValueKind::ConstReal(real_arg(a, 0).atanh())));
    add("abs", "f", |a| Ok(ValueKind::ConstReal(real_arg(a, 0).abs())));
    add("abs", "i", |a| {
        Ok(ValueKind::ConstInt(int_arg(a, 0).wrapping_abs()))
    });
}

fn select(args: &[Value]) -> FnResult {
    if bool_arg(args, 0) {
        Ok(args[1].kind.clone())
    } else {
        Ok(args[2].kind.clone())
    }
}

/// Registers the legacy dialect's default mappings: the boolean constants, the
/// usual math constants, and the measurement axes.
pub fn register_v1_mappings(table: &mut MappingTable) {
    let constant = |kind| Value::new(Span::default(), kind);
    table.add("true", constant(ValueKind::ConstBool(true)), None);
    table.add("false", constant(ValueKind::ConstBool(false)), None);
    table.add("pi", constant(ValueKind::ConstReal(PI)), None);
    table.add("eu", constant(ValueKind::ConstReal(E)), None);
    table.add(
        "im",
        constant(ValueKind::ConstComplex(Complex64::new(0.0, 1.0))),
        None,
    );
    table.add("x", constant(ValueKind::ConstAxis(Axis::X)), None);
    table.add("y", constant(ValueKind::ConstAxis(Axis::Y)), None);
    table.add("z", constant(ValueKind::ConstAxis(Axis::Z)), None);
}

/// Registers the 3.x dialect's default mappings. Booleans are literals in this
/// dialect, so only the math constants remain.
pub fn register_v3_mappings(table: &mut MappingTable) {
    let constant = |kind| Value::new(Span::default(), kind);
    table.add("pi", constant(ValueKind::ConstReal(PI)), None);
    table.add("euler", constant(ValueKind::ConstReal(E)), None);
    table.add("tau", constant(ValueKind::ConstReal(TAU)), None);
}
