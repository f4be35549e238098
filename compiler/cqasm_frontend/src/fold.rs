// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The constant folder: lowers syntactic expressions to value nodes. Operator
//! and function applications dispatch through the function table, so folding
//! happens automatically because the registered implementations are defined
//! over `Const*` inputs only.

use crate::{error::Error, scope::ScopeStack};
use cqasm_ast::ast::{Expr, ExprKind, IndexItem, Lit, UnOp};
use cqasm_data_structures::language::Dialect;
use cqasm_semantic::{
    types::Type,
    value::{Matrix, Value, ValueKind},
};
use num_complex::Complex64;

pub(crate) struct Folder<'a> {
    pub scopes: &'a ScopeStack,
    pub dialect: Dialect,
}

impl Folder<'_> {
    /// Lowers an expression to a value, or fails with the first error found.
    pub(crate) fn fold(&self, expr: &Expr) -> Result<Value, Error> {
        let span = expr.span;
        match &expr.kind {
            ExprKind::Lit(Lit::Bool(b)) => Ok(Value::new(span, ValueKind::ConstBool(*b))),
            ExprKind::Lit(Lit::Int(i)) => Ok(Value::new(span, ValueKind::ConstInt(*i))),
            ExprKind::Lit(Lit::Real(r)) => Ok(Value::new(span, ValueKind::ConstReal(*r))),
            ExprKind::Lit(Lit::String(s)) => {
                Ok(Value::new(span, ValueKind::ConstString(s.clone())))
            }
            ExprKind::Ident(ident) => {
                let mut value = self.scopes.resolve_mapping(&ident.name, Some(span))?;
                value.span = span;
                Ok(value)
            }
            ExprKind::Index(base, items) => self.fold_index(expr, base, items),
            ExprKind::UnOp(op, operand) => {
                // `-literal` folds directly so that the most negative literals
                // do not overflow on the way through the negation operator.
                if let (UnOp::Neg, ExprKind::Lit(Lit::Int(i))) = (op, &operand.kind) {
                    return Ok(Value::new(span, ValueKind::ConstInt(i.wrapping_neg())));
                }
                let value = self.fold(operand)?;
                self.scopes
                    .call_function(&format!("operator{}", op.spelling()), &[value], span)
            }
            ExprKind::BinOp(op, lhs, rhs) => {
                let lhs = self.fold(lhs)?;
                let rhs = self.fold(rhs)?;
                self.scopes
                    .call_function(&format!("operator{}", op.spelling()), &[lhs, rhs], span)
            }
            ExprKind::TernOp(cond, if_true, if_false) => {
                let cond = self.fold(cond)?;
                let if_true = self.fold(if_true)?;
                let if_false = self.fold(if_false)?;
                self.scopes
                    .call_function("operator?:", &[cond, if_true, if_false], span)
            }
            ExprKind::Call(name, args) => {
                let args: Vec<Value> = args
                    .iter()
                    .map(|arg| self.fold(arg))
                    .collect::<Result<_, _>>()?;
                self.scopes.call_function(&name.name, &args, span)
            }
            ExprKind::Matrix(rows) => self.fold_matrix(expr, rows),
            ExprKind::Paren(inner) => {
                let mut value = self.fold(inner)?;
                value.span = span;
                Ok(value)
            }
            ExprKind::Err => Err(Error::InvalidArgument(
                "invalid expression".to_string(),
                Some(span),
            )),
        }
    }

    /// Folds an expression that must produce a constant integer.
    pub(crate) fn fold_int(&self, expr: &Expr) -> Result<i64, Error> {
        let value = self.fold(expr)?;
        match value.kind {
            ValueKind::ConstInt(i) => Ok(i),
            _ => Err(Error::TypePromotion(
                value.type_of(self.dialect).to_string(),
                Type::Int.to_string(),
                Some(expr.span),
            )),
        }
    }

    fn fold_index(&self, expr: &Expr, base: &Expr, items: &[IndexItem]) -> Result<Value, Error> {
        let base_value = self.fold(base)?;
        let indices = match &base_value.kind {
            ValueKind::QubitRefs(indices) | ValueKind::BitRefs(indices) => indices,
            _ => {
                return Err(Error::InvalidArgument(
                    format!(
                        "only qubit and bit registers can be indexed, not {}",
                        base_value.type_of(self.dialect)
                    ),
                    Some(base.span),
                ));
            }
        };

        let mut selected = Vec::new();
        for item in items {
            match item {
                IndexItem::Single(index) => {
                    selected.push(self.select(indices, index)?);
                }
                IndexItem::Range(first, last) => {
                    let first_index = self.fold_int(first)?;
                    let last_index = self.fold_int(last)?;
                    if first_index > last_index {
                        return Err(Error::InvalidArgument(
                            "range start is past its end".to_string(),
                            Some(first.span.union(last.span)),
                        ));
                    }
                    for index in first_index..=last_index {
                        selected.push(select_at(indices, index, first.span.union(last.span))?);
                    }
                }
            }
        }

        let kind = match &base_value.kind {
            ValueKind::QubitRefs(_) => ValueKind::QubitRefs(selected),
            _ => ValueKind::BitRefs(selected),
        };
        Ok(Value::new(expr.span, kind))
    }

    fn select(&self, indices: &[i64], index: &Expr) -> Result<i64, Error> {
        let value = self.fold_int(index)?;
        select_at(indices, value, index.span)
    }

    fn fold_matrix(&self, expr: &Expr, rows: &[Vec<Expr>]) -> Result<Value, Error> {
        let num_cols = rows.first().map_or(0, Vec::len);
        if num_cols == 0 || rows.iter().any(|row| row.len() != num_cols) {
            return Err(Error::InvalidArgument(
                "matrix rows must be non-empty and equally sized".to_string(),
                Some(expr.span),
            ));
        }

        let mut entries = Vec::with_capacity(rows.len() * num_cols);
        for row in rows {
            for entry in row {
                entries.push(self.fold(entry)?);
            }
        }

        // An all-real matrix stays real; a single complex entry lifts the
        // whole literal to a complex matrix.
        let real_entries: Option<Vec<f64>> = entries
            .iter()
            .map(|entry| match promote_kind(entry, self.dialect, Type::Real) {
                Some(ValueKind::ConstReal(r)) => Some(r),
                _ => None,
            })
            .collect();
        if let Some(data) = real_entries {
            return Ok(Value::new(
                expr.span,
                ValueKind::ConstRealMatrix(Matrix::new(num_cols, data)),
            ));
        }

        let complex_entries: Option<Vec<Complex64>> = entries
            .iter()
            .map(|entry| match promote_kind(entry, self.dialect, Type::Complex) {
                Some(ValueKind::ConstComplex(c)) => Some(c),
                _ => None,
            })
            .collect();
        match complex_entries {
            Some(data) => Ok(Value::new(
                expr.span,
                ValueKind::ConstComplexMatrix(Matrix::new(num_cols, data)),
            )),
            None => Err(Error::InvalidArgument(
                "matrix entries must be numeric".to_string(),
                Some(expr.span),
            )),
        }
    }
}

fn promote_kind(value: &Value, dialect: Dialect, ty: Type) -> Option<ValueKind> {
    cqasm_semantic::value::promote(value, &ty, dialect).map(|v| v.kind)
}

fn select_at(indices: &[i64], index: i64, span: cqasm_data_structures::span::Span) -> Result<i64, Error> {
    usize::try_from(index)
        .ok()
        .and_then(|i| indices.get(i).copied())
        .ok_or(Error::IndexOutOfRange(index, indices.len(), Some(span)))
}
