// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The four registries driving analysis: the mapping table and, sharing one
//! overloaded-name resolver, the function, instruction, and error-model tables.

#[cfg(test)]
mod tests;

use crate::error::{Error, FnError};
use cqasm_data_structures::{language::Dialect, span::Span};
use cqasm_semantic::{
    instruction::{ErrorModel, ErrorModelRef, Instruction, InstructionRef},
    types::Type,
    value::{promote, Value, ValueKind},
};
use rustc_hash::FxHashMap;
use std::{fmt::Write, rc::Rc};

/// A pure constant-evaluating function: the payload of a function-table
/// overload. The implementation can assume the argument list has already been
/// promoted to the overload's parameter types.
pub type FunctionImpl = fn(&[Value]) -> Result<ValueKind, FnError>;

/// Formats an argument type tuple for overload-resolution diagnostics.
fn render_types(args: &[Value], dialect: Dialect) -> String {
    let mut rendered = String::new();
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            rendered.push_str(", ");
        }
        write!(rendered, "{}", arg.type_of(dialect)).expect("writing to a string should succeed");
    }
    rendered
}

/// A table mapping names to insertion-ordered overload lists.
///
/// Overloads are matched in reverse insertion order, so later registrations
/// override earlier ones; the dialect defaults exploit this to layer
/// permissive variants on top.
#[derive(Clone, Debug)]
pub struct OverloadedNameResolver<T> {
    dialect: Dialect,
    table: FxHashMap<String, Vec<Overload<T>>>,
}

#[derive(Clone, Debug)]
struct Overload<T> {
    param_types: Vec<Type>,
    payload: T,
}

impl<T: Clone> OverloadedNameResolver<T> {
    #[must_use]
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            table: FxHashMap::default(),
        }
    }

    fn key(&self, name: &str) -> String {
        if self.dialect.case_sensitive() {
            name.to_string()
        } else {
            name.to_lowercase()
        }
    }

    /// Appends an overload. Duplicates are allowed; the latest wins.
    pub fn add_overload(&mut self, name: &str, payload: T, param_types: Vec<Type>) {
        self.table.entry(self.key(name)).or_default().push(Overload {
            param_types,
            payload,
        });
    }

    /// Selects the latest-added overload whose parameter types accept the
    /// arguments under promotion, returning its payload and the promoted
    /// argument list.
    pub fn resolve(
        &self,
        name: &str,
        args: &[Value],
        span: Option<Span>,
    ) -> Result<(T, Vec<Value>), Error> {
        let overloads = self
            .table
            .get(&self.key(name))
            .ok_or_else(|| Error::NameResolution(name.to_string(), span))?;

        for overload in overloads.iter().rev() {
            if overload.param_types.len() != args.len() {
                continue;
            }
            let promoted: Option<Vec<Value>> = args
                .iter()
                .zip(&overload.param_types)
                .map(|(arg, ty)| promote(arg, ty, self.dialect))
                .collect();
            if let Some(promoted) = promoted {
                return Ok((overload.payload.clone(), promoted));
            }
        }

        Err(Error::OverloadResolution(
            name.to_string(),
            render_types(args, self.dialect),
            span,
        ))
    }
}

/// The set of mappings/variables in one scope frame: name to value, with the
/// span of the declaration for diagnostics. Later adds shadow earlier ones.
#[derive(Clone, Debug, Default)]
pub struct MappingTable {
    table: FxHashMap<String, (Value, Option<Span>)>,
}

impl MappingTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a mapping, replacing any earlier entry with the same name.
    pub fn add(&mut self, name: &str, value: Value, decl: Option<Span>) {
        self.table.insert(name.to_string(), (value, decl));
    }

    /// Resolves a mapping to a deep clone of the stored value.
    pub fn resolve(&self, name: &str, span: Option<Span>) -> Result<Value, Error> {
        self.table
            .get(name)
            .map(|(value, _)| value.clone())
            .ok_or_else(|| Error::NameResolution(name.to_string(), span))
    }

    /// Whether the table holds a mapping with the given name.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }
}

/// The supported set of classical functions and operators. Operators are
/// spelled `operator<sym>`.
#[derive(Clone, Debug)]
pub struct FunctionTable {
    resolver: OverloadedNameResolver<FunctionImpl>,
}

impl FunctionTable {
    #[must_use]
    pub fn new(dialect: Dialect) -> Self {
        Self {
            resolver: OverloadedNameResolver::new(dialect),
        }
    }

    /// Registers a function. The implementation can assume that the value list
    /// it gets is of the right size and the values are of the right types.
    pub fn add(&mut self, name: &str, param_types: Vec<Type>, impl_: FunctionImpl) {
        self.resolver.add_overload(name, impl_, param_types);
    }

    /// Resolves and invokes a function, returning the value it produced. The
    /// result carries the call-site span.
    pub fn call(&self, name: &str, args: &[Value], span: Span) -> Result<Value, Error> {
        let (impl_, promoted) = self.resolver.resolve(name, args, Some(span))?;
        let kind = impl_(&promoted).map_err(|e| e.with_span(span))?;
        Ok(Value::new(span, kind))
    }

    /// Resolves a function without invoking it.
    pub fn contains(&self, name: &str, args: &[Value]) -> bool {
        self.resolver.resolve(name, args, None).is_ok()
    }
}

/// The supported set of quantum/classical/mixed instructions.
#[derive(Clone, Debug)]
pub struct InstructionTable {
    resolver: OverloadedNameResolver<InstructionRef>,
}

impl InstructionTable {
    #[must_use]
    pub fn new(dialect: Dialect) -> Self {
        Self {
            resolver: OverloadedNameResolver::new(dialect),
        }
    }

    /// Registers an instruction signature.
    pub fn add(&mut self, instruction: Instruction) {
        let name = Rc::clone(&instruction.name);
        let param_types = instruction.param_types.clone();
        self.resolver
            .add_overload(&name, Rc::new(instruction), param_types);
    }

    /// Resolves an instruction, returning the matched signature and the
    /// promoted operand list. Condition, annotations, and span still need to
    /// be filled in by the caller.
    pub fn resolve(
        &self,
        name: &str,
        args: &[Value],
        span: Option<Span>,
    ) -> Result<(InstructionRef, Vec<Value>), Error> {
        self.resolver.resolve(name, args, span)
    }
}

/// The supported set of error models.
#[derive(Clone, Debug)]
pub struct ErrorModelTable {
    resolver: OverloadedNameResolver<ErrorModelRef>,
}

impl ErrorModelTable {
    #[must_use]
    pub fn new(dialect: Dialect) -> Self {
        Self {
            resolver: OverloadedNameResolver::new(dialect),
        }
    }

    /// Registers an error model signature.
    pub fn add(&mut self, model: ErrorModel) {
        let name = Rc::clone(&model.name);
        let param_types = model.param_types.clone();
        self.resolver.add_overload(&name, Rc::new(model), param_types);
    }

    /// Resolves an error model, returning the matched signature and the
    /// promoted operand list.
    pub fn resolve(
        &self,
        name: &str,
        args: &[Value],
        span: Option<Span>,
    ) -> Result<(ErrorModelRef, Vec<Value>), Error> {
        self.resolver.resolve(name, args, span)
    }
}
