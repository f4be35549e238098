// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.


use crate::{
    error::Error,
    resolver::{FunctionTable, InstructionTable, MappingTable},
};
use cqasm_data_structures::{language::Dialect, span::Span};
use cqasm_semantic::{instruction::InstructionRef, value::Value};

/// One scope frame: a mapping/variable table plus private function and
/// instruction extensions, and the flag validating loop-control statements.
#[derive(Clone, Debug)]
pub struct Scope {
    pub mappings: MappingTable,
    pub functions: FunctionTable,
    pub instructions: InstructionTable,
    pub within_loop: bool,
}

impl Scope {
    #[must_use]
    pub fn new(dialect: Dialect) -> Self {
        Self {
            mappings: MappingTable::new(),
            functions: FunctionTable::new(dialect),
            instructions: InstructionTable::new(dialect),
            within_loop: false,
        }
    }
}

/// The scope stack: a vector of frames with inner-to-outer lookup. The global
/// frame is the first element and is never popped.
#[derive(Clone, Debug)]
pub struct ScopeStack {
    dialect: Dialect,
    scopes: Vec<Scope>,
}

impl ScopeStack {
    /// Creates a stack holding only the given global frame.
    #[must_use]
    pub fn new(dialect: Dialect, global: Scope) -> Self {
        Self {
            dialect,
            scopes: vec![global],
        }
    }

    /// Opens a new block scope. The new frame inherits the loop flag.
    pub fn push(&mut self, within_loop: bool) {
        let scope = Scope {
            within_loop: within_loop || self.current().within_loop,
            ..Scope::new(self.dialect)
        };
        self.scopes.push(scope);
    }

    /// Closes the innermost block scope. Mappings declared inside it do not
    /// outlive it.
    pub fn pop(&mut self) {
        assert!(
            self.scopes.len() > 1,
            "the global scope should never be popped"
        );
        self.scopes.pop();
    }

    /// The innermost frame.
    #[must_use]
    pub fn current(&self) -> &Scope {
        self.scopes.last().expect("the global scope should exist")
    }

    /// The innermost frame, mutably.
    pub fn current_mut(&mut self) -> &mut Scope {
        self.scopes
            .last_mut()
            .expect("the global scope should exist")
    }

    /// Whether the innermost frame is inside a loop body.
    #[must_use]
    pub fn within_loop(&self) -> bool {
        self.current().within_loop
    }

    /// Resolves a mapping, walking frames inner-to-outer.
    pub fn resolve_mapping(&self, name: &str, span: Option<Span>) -> Result<Value, Error> {
        for scope in self.scopes.iter().rev() {
            if scope.mappings.contains(name) {
                return scope.mappings.resolve(name, span);
            }
        }
        Err(Error::NameResolution(name.to_string(), span))
    }

    /// Calls a function, walking frames inner-to-outer. A frame that knows the
    /// name but has no matching overload stops the walk.
    pub fn call_function(&self, name: &str, args: &[Value], span: Span) -> Result<Value, Error> {
        let mut unknown = None;
        for scope in self.scopes.iter().rev() {
            match scope.functions.call(name, args, span) {
                Err(Error::NameResolution(name, span)) => {
                    unknown = Some(Error::NameResolution(name, span));
                }
                other => return other,
            }
        }
        Err(unknown.expect("the global scope should exist"))
    }

    /// Resolves an instruction, walking frames inner-to-outer.
    pub fn resolve_instruction(
        &self,
        name: &str,
        args: &[Value],
        span: Option<Span>,
    ) -> Result<(InstructionRef, Vec<Value>), Error> {
        let mut unknown = None;
        for scope in self.scopes.iter().rev() {
            match scope.instructions.resolve(name, args, span) {
                Err(Error::NameResolution(name, span)) => {
                    unknown = Some(Error::NameResolution(name, span));
                }
                other => return other,
            }
        }
        Err(unknown.expect("the global scope should exist"))
    }
}
