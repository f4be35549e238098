// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The analyzer: walks a syntactic tree, maintains the scope stack, lowers each
//! statement through the constant folder, resolves instructions and error
//! models against the registries, and accumulates diagnostics. Analysis never
//! stops at the first error; the returned tree is a best-effort partial form.

#[cfg(test)]
mod tests;

use crate::{
    error::Error as AnalyzeError,
    fold::Folder,
    functions,
    resolver::{ErrorModelTable, FunctionImpl, FunctionTable, InstructionTable, MappingTable},
    scope::{Scope, ScopeStack},
    version, Error,
};
use cqasm_ast::ast;
use cqasm_data_structures::{
    language::Dialect,
    line_column::{Encoding, Position},
    span::Span,
    version::Version,
};
use cqasm_semantic::{
    instruction::{ErrorModel, Instruction as InstructionSig},
    semantic,
    types::{from_spec, InvalidSpec, Type},
    value::{promote, Value, ValueKind},
};
use log::debug;
use rustc_hash::FxHashSet;
use std::{fs, io, path::Path, sync::Arc};
use thiserror::Error as ThisError;

/// Error raised by [`AnalysisResult::unwrap`] when analysis reported errors.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ThisError)]
#[error("cQASM analysis failed")]
pub struct AnalysisFailed;

/// The outcome of analyzing one input: the semantic tree (possibly with
/// placeholder holes) together with the accumulated errors, in source order.
/// Analysis succeeded if and only if `errors` is empty.
#[derive(Clone, Debug)]
pub struct AnalysisResult {
    pub program: semantic::Program,
    pub errors: Vec<Error>,
    /// The name used for the input in diagnostics.
    pub file_name: Arc<str>,
    /// The analyzed source text; empty when analysis started from a tree.
    pub source: Arc<str>,
}

impl AnalysisResult {
    /// Whether analysis reported any errors.
    #[must_use]
    pub fn failed(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Renders the errors as human-readable single-line messages, in source
    /// order: `Error at <file>:<line>:<col>..<col>: <message>`.
    #[must_use]
    pub fn error_messages(&self) -> Vec<String> {
        self.errors
            .iter()
            .map(|error| match error.span() {
                Some(span) if !self.source.is_empty() => {
                    let start =
                        Position::from_utf8_byte_offset(Encoding::Utf8, &self.source, span.lo);
                    let end = Position::from_utf8_byte_offset(Encoding::Utf8, &self.source, span.hi);
                    if start.line == end.line {
                        format!(
                            "Error at {}:{}:{}..{}: {error}",
                            self.file_name,
                            start.line + 1,
                            start.column + 1,
                            end.column + 1,
                        )
                    } else {
                        format!(
                            "Error at {}:{}:{}..{}:{}: {error}",
                            self.file_name,
                            start.line + 1,
                            start.column + 1,
                            end.line + 1,
                            end.column + 1,
                        )
                    }
                }
                _ => format!("Error: {error}"),
            })
            .collect()
    }

    /// "Unwraps" the result to get the semantic tree, writing the error
    /// messages to the given sink first when analysis failed.
    pub fn unwrap(self, sink: &mut impl io::Write) -> Result<semantic::Program, AnalysisFailed> {
        if self.errors.is_empty() {
            Ok(self.program)
        } else {
            for message in self.error_messages() {
                let _ = writeln!(sink, "{message}");
            }
            Err(AnalysisFailed)
        }
    }
}

/// Main type used for analyzing cQASM files.
///
/// Registries are copied into the analyzer on construction and live for its
/// lifetime; analyzers share nothing mutable, so independent instances can run
/// concurrently on different inputs.
#[derive(Clone, Debug)]
pub struct Analyzer {
    dialect: Dialect,
    api_version: Version,
    mappings: MappingTable,
    functions: FunctionTable,
    instruction_set: InstructionTable,
    resolve_instructions: bool,
    error_models: ErrorModelTable,
    resolve_error_model: bool,
}

impl Analyzer {
    /// Creates a bare analyzer with empty registries. `api_version` is the
    /// newest language version the caller supports.
    #[must_use]
    pub fn new(dialect: Dialect, api_version: Version) -> Self {
        Self {
            dialect,
            api_version,
            mappings: MappingTable::new(),
            functions: FunctionTable::new(dialect),
            instruction_set: InstructionTable::new(dialect),
            resolve_instructions: false,
            error_models: ErrorModelTable::new(dialect),
            resolve_error_model: false,
        }
    }

    #[must_use]
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    #[must_use]
    pub fn api_version(&self) -> &Version {
        &self.api_version
    }

    /// Registers an initial mapping from the given name to the given value.
    pub fn register_mapping(&mut self, name: &str, value: Value) {
        self.mappings.add(name, value, None);
    }

    /// Registers a function, usable within expressions. The parameter types
    /// are given as a shorthand type spec.
    pub fn register_function(
        &mut self,
        name: &str,
        param_types: &str,
        impl_: FunctionImpl,
    ) -> Result<(), InvalidSpec> {
        let types = from_spec(param_types, self.dialect)?;
        self.functions.add(name, types, impl_);
        Ok(())
    }

    /// Registers the dialect's default functions and mappings: the operator
    /// functions, the usual math functions, and constants like `pi`.
    pub fn register_default_functions_and_mappings(&mut self) {
        match self.dialect {
            Dialect::V1 => {
                functions::register_v1(&mut self.functions);
                functions::register_v1_mappings(&mut self.mappings);
            }
            Dialect::V3 => {
                functions::register_v3(&mut self.functions);
                functions::register_v3_mappings(&mut self.mappings);
            }
        }
    }

    /// Registers an instruction signature. If this is never called,
    /// instructions are not resolved: anything goes name- and operand-wise.
    /// Once it is, only registered signatures are legal.
    pub fn register_instruction(
        &mut self,
        name: &str,
        param_types: &str,
        allow_conditional: bool,
        allow_parallel: bool,
        allow_reused_qubits: bool,
        allow_different_index_sizes: bool,
    ) -> Result<(), InvalidSpec> {
        let types = from_spec(param_types, self.dialect)?;
        self.instruction_set.add(InstructionSig::new(
            name,
            types,
            allow_conditional,
            allow_parallel,
            allow_reused_qubits,
            allow_different_index_sizes,
        ));
        self.resolve_instructions = true;
        Ok(())
    }

    /// Registers an error model. As with instructions, registering one enables
    /// resolution.
    pub fn register_error_model(&mut self, name: &str, param_types: &str) -> Result<(), InvalidSpec> {
        let types = from_spec(param_types, self.dialect)?;
        self.error_models.add(ErrorModel::new(name, types));
        self.resolve_error_model = true;
        Ok(())
    }

    /// Analyzes an already-parsed program.
    #[must_use]
    pub fn analyze(&self, program: &ast::Program) -> AnalysisResult {
        let (program, errors) = Driver::new(self).run(program);
        AnalysisResult {
            program,
            errors: errors.into_iter().map(Into::into).collect(),
            file_name: "<unknown>".into(),
            source: "".into(),
        }
    }

    /// Parses and analyzes the given string. The optional `file_name` is used
    /// only for error messages.
    #[must_use]
    pub fn analyze_string(&self, source: &str, file_name: Option<&str>) -> AnalysisResult {
        let file_name: Arc<str> = file_name.unwrap_or("<unknown>").into();
        let source: Arc<str> = source.into();
        debug!("analyzing {file_name} with the {} dialect", self.dialect);

        // The version gate runs over the header before the full parse.
        match version::version_of(&source) {
            Ok((file_version, span)) => {
                if file_version > self.api_version {
                    return self.version_failure(
                        AnalyzeError::VersionMismatch(
                            file_version,
                            self.api_version.clone(),
                            Some(span),
                        ),
                        file_name,
                        source,
                    );
                }
            }
            Err(error) => return self.version_failure(error, file_name, source),
        }

        let (ast, parse_errors) = cqasm_parse::program(&source, self.dialect);
        let (program, analysis_errors) = Driver::new(self).run(&ast);
        let errors = parse_errors
            .into_iter()
            .map(Into::into)
            .chain(analysis_errors.into_iter().map(Into::into))
            .collect();
        AnalysisResult {
            program,
            errors,
            file_name,
            source,
        }
    }

    /// Opens, parses, and analyzes the given file. An unreadable file is
    /// reported as a single diagnostic.
    #[must_use]
    pub fn analyze_file(&self, path: &Path) -> AnalysisResult {
        match fs::read_to_string(path) {
            Ok(source) => self.analyze_string(&source, Some(&path.display().to_string())),
            Err(_) => AnalysisResult {
                program: semantic::Program::default(),
                errors: vec![AnalyzeError::UnreadableFile(path.display().to_string()).into()],
                file_name: path.display().to_string().into(),
                source: "".into(),
            },
        }
    }

    fn version_failure(
        &self,
        error: AnalyzeError,
        file_name: Arc<str>,
        source: Arc<str>,
    ) -> AnalysisResult {
        let program = semantic::Program {
            api_version: self.api_version.clone(),
            ..semantic::Program::default()
        };
        AnalysisResult {
            program,
            errors: vec![error.into()],
            file_name,
            source,
        }
    }
}

struct Driver<'a> {
    analyzer: &'a Analyzer,
    scopes: ScopeStack,
    errors: Vec<AnalyzeError>,
    program: semantic::Program,
    qubit_decl: Option<Span>,
    bit_decl: Option<Span>,
}

impl<'a> Driver<'a> {
    fn new(analyzer: &'a Analyzer) -> Self {
        let global = Scope {
            mappings: analyzer.mappings.clone(),
            functions: analyzer.functions.clone(),
            instructions: analyzer.instruction_set.clone(),
            within_loop: false,
        };
        Self {
            analyzer,
            scopes: ScopeStack::new(analyzer.dialect, global),
            errors: Vec::new(),
            program: semantic::Program::default(),
            qubit_decl: None,
            bit_decl: None,
        }
    }

    fn run(mut self, ast: &ast::Program) -> (semantic::Program, Vec<AnalyzeError>) {
        self.program.api_version = self.analyzer.api_version.clone();
        self.program.version = ast.version.version.clone();
        self.program.span = ast.span;

        if ast.version.version > self.analyzer.api_version {
            self.errors.push(AnalyzeError::VersionMismatch(
                ast.version.version.clone(),
                self.analyzer.api_version.clone(),
                Some(ast.version.span),
            ));
        }

        for stmt in &ast.statements {
            self.stmt(stmt);
        }

        (self.program, self.errors)
    }

    fn folder(&self) -> Folder {
        Folder {
            scopes: &self.scopes,
            dialect: self.analyzer.dialect,
        }
    }

    fn stmt(&mut self, stmt: &ast::Stmt) {
        match &stmt.kind {
            ast::StmtKind::QubitDecl(decl) => self.qubit_decl(stmt.span, decl),
            ast::StmtKind::BitDecl(decl) => self.bit_decl(stmt.span, decl),
            ast::StmtKind::Mapping(mapping) => self.mapping(stmt.span, mapping),
            ast::StmtKind::Subcircuit(subcircuit) => self.subcircuit(stmt.span, subcircuit),
            ast::StmtKind::Bundle(bundle) => self.bundle(stmt.span, bundle),
            ast::StmtKind::ErrorModel(model) => self.error_model(stmt.span, model),
            ast::StmtKind::Break => self.loop_control(stmt.span, "break"),
            ast::StmtKind::Continue => self.loop_control(stmt.span, "continue"),
            // The parser already reported the failure; there is nothing left
            // to analyze.
            ast::StmtKind::Err => {}
        }
    }

    fn declared_size(&mut self, size: Option<&ast::Expr>, what: &str, name_span: Span) -> Option<(i64, Span)> {
        match size {
            None => Some((1, name_span)),
            Some(expr) => {
                let folded = self.folder().fold_int(expr);
                match folded {
                    Ok(size) if size > 0 => Some((size, expr.span)),
                    Ok(_) => {
                        self.errors.push(AnalyzeError::InvalidArgument(
                            format!("declaring {what} of size <= 0"),
                            Some(expr.span),
                        ));
                        None
                    }
                    Err(error) => {
                        self.errors.push(error);
                        None
                    }
                }
            }
        }
    }

    fn qubit_decl(&mut self, span: Span, decl: &ast::QubitDecl) {
        if self.qubit_decl.is_some() {
            self.errors.push(AnalyzeError::DuplicateDeclaration(
                "qubit register declared more than once",
                Some(span),
            ));
            return;
        }

        match &decl.name {
            // Legacy `qubits N`: one program-wide register, with implicit
            // mappings `q` for the qubits and `b` for their measurement bits.
            None => {
                let what = "qubit register";
                let Some((size, _)) = self.declared_size(decl.size.as_ref(), what, span) else {
                    return;
                };
                self.qubit_decl = Some(span);
                self.bit_decl = Some(span);
                self.program.num_qubits = size;
                self.program.num_bits = size;
                let indices: Vec<i64> = (0..size).collect();
                self.scopes.current_mut().mappings.add(
                    "q",
                    Value::new(span, ValueKind::QubitRefs(indices.clone())),
                    Some(span),
                );
                self.scopes.current_mut().mappings.add(
                    "b",
                    Value::new(span, ValueKind::BitRefs(indices)),
                    Some(span),
                );
            }
            // 3.x `qubit[N] q`: a named register variable.
            Some(name) => {
                let Some((size, _)) =
                    self.declared_size(decl.size.as_ref(), "qubit array", name.span)
                else {
                    return;
                };
                self.qubit_decl = Some(span);
                self.program.num_qubits = size;
                let ty = if decl.size.is_some() {
                    Type::QubitArray(u64::try_from(size).expect("size should be positive"))
                } else {
                    Type::Qubit
                };
                self.program.variables.push(semantic::Variable {
                    name: name.name.clone(),
                    ty,
                    annotations: Vec::new(),
                    span,
                });
                self.scopes.current_mut().mappings.add(
                    &name.name,
                    Value::new(name.span, ValueKind::QubitRefs((0..size).collect())),
                    Some(span),
                );
            }
        }
    }

    fn bit_decl(&mut self, span: Span, decl: &ast::BitDecl) {
        if self.bit_decl.is_some() {
            self.errors.push(AnalyzeError::DuplicateDeclaration(
                "bit register declared more than once",
                Some(span),
            ));
            return;
        }
        let Some((size, _)) = self.declared_size(decl.size.as_ref(), "bit array", decl.name.span)
        else {
            return;
        };
        self.bit_decl = Some(span);
        self.program.num_bits = size;
        let ty = if decl.size.is_some() {
            Type::BitArray(u64::try_from(size).expect("size should be positive"))
        } else {
            Type::Bit
        };
        self.program.variables.push(semantic::Variable {
            name: decl.name.name.clone(),
            ty,
            annotations: Vec::new(),
            span,
        });
        self.scopes.current_mut().mappings.add(
            &decl.name.name,
            Value::new(decl.name.span, ValueKind::BitRefs((0..size).collect())),
            Some(span),
        );
    }

    fn mapping(&mut self, span: Span, mapping: &ast::Mapping) {
        let folded = self.folder().fold(&mapping.value);
        let value = match folded {
            Ok(value) => value,
            Err(error) => {
                self.errors.push(error);
                return;
            }
        };
        let annotations = self.annotations(&mapping.annotations);
        self.scopes
            .current_mut()
            .mappings
            .add(&mapping.name.name, value.clone(), Some(span));
        self.program.mappings.push(semantic::Mapping {
            name: mapping.name.name.clone(),
            value,
            annotations,
            span,
        });
    }

    fn subcircuit(&mut self, span: Span, subcircuit: &ast::Subcircuit) {
        let iterations = match &subcircuit.iterations {
            None => 1,
            Some(expr) => {
                let folded = self.folder().fold_int(expr);
                match folded {
                    Ok(iterations) if iterations > 0 => iterations,
                    Ok(_) => {
                        self.errors.push(AnalyzeError::InvalidArgument(
                            "subcircuit iteration count must be positive".to_string(),
                            Some(expr.span),
                        ));
                        return;
                    }
                    Err(error) => {
                        self.errors.push(error);
                        return;
                    }
                }
            }
        };
        let annotations = self.annotations(&subcircuit.annotations);
        self.program.subcircuits.push(semantic::Subcircuit {
            name: subcircuit.name.name.clone(),
            iterations,
            bundles: Vec::new(),
            annotations,
            span,
        });
    }

    fn error_model(&mut self, span: Span, model: &ast::ErrorModelStmt) {
        if self.program.error_model.is_some() {
            self.errors.push(AnalyzeError::DuplicateDeclaration(
                "error model declared more than once",
                Some(span),
            ));
            return;
        }

        let mut operands = Vec::new();
        for arg in &model.args {
            let folded = self.folder().fold(arg);
            match folded {
                Ok(value) => operands.push(value),
                Err(error) => {
                    self.errors.push(error);
                    return;
                }
            }
        }
        let annotations = self.annotations(&model.annotations);

        let (model_ref, operands) = if self.analyzer.resolve_error_model {
            match self
                .analyzer
                .error_models
                .resolve(&model.name.name, &operands, Some(span))
            {
                Ok((model_ref, promoted)) => (Some(model_ref), promoted),
                Err(error) => {
                    self.errors.push(error);
                    return;
                }
            }
        } else {
            (None, operands)
        };

        self.program.error_model = Some(semantic::ErrorModelNode {
            model: model_ref,
            name: model.name.name.clone(),
            operands,
            annotations,
            span,
        });
    }

    fn loop_control(&mut self, span: Span, statement: &str) {
        if !self.scopes.within_loop() {
            self.errors.push(AnalyzeError::InvalidArgument(
                format!("{statement} statement is not within a loop"),
                Some(span),
            ));
        }
    }

    fn bundle(&mut self, span: Span, bundle: &ast::Bundle) {
        let mut instructions = Vec::new();
        for instruction in &bundle.instructions {
            if let Some(instruction) = self.instruction(instruction) {
                instructions.push(instruction);
            }
        }

        if instructions.len() > 1 {
            for instruction in &instructions {
                if let Some(signature) = &instruction.instruction {
                    if !signature.allow_parallel {
                        self.errors.push(AnalyzeError::InstructionConstraint(
                            "instruction is not allowed in a bundle",
                            Some(instruction.span),
                        ));
                    }
                }
            }

            // No qubit may be used by two instructions of the same bundle.
            let mut used: FxHashSet<i64> = FxHashSet::default();
            'bundle: for instruction in &instructions {
                let mut mine = FxHashSet::default();
                for operand in &instruction.operands {
                    mine.extend(operand.qubit_indices());
                }
                for qubit in mine {
                    if !used.insert(qubit) {
                        self.errors.push(AnalyzeError::InstructionConstraint(
                            "duplicate qubit in bundle",
                            Some(span),
                        ));
                        break 'bundle;
                    }
                }
            }
        }

        let annotations = self.annotations(&bundle.annotations);
        if instructions.is_empty() {
            return;
        }
        self.current_subcircuit(span).bundles.push(semantic::Bundle {
            instructions,
            annotations,
            span,
        });
    }

    fn instruction(&mut self, instruction: &ast::Instruction) -> Option<semantic::Instruction> {
        let mut failed = false;

        let mut operands = Vec::new();
        for operand in &instruction.operands {
            let folded = self.folder().fold(operand);
            match folded {
                Ok(value) => operands.push(value),
                Err(error) => {
                    self.errors.push(error);
                    failed = true;
                }
            }
        }

        let condition = match &instruction.condition {
            None => None,
            Some(expr) => {
                let folded = self.folder().fold(expr);
                match folded {
                    Ok(value) => match value.kind {
                        ValueKind::ConstBool(_) | ValueKind::BitRefs(_) => Some(value),
                        _ => {
                            self.errors.push(AnalyzeError::TypePromotion(
                                value.type_of(self.analyzer.dialect).to_string(),
                                Type::Bool.to_string(),
                                Some(expr.span),
                            ));
                            failed = true;
                            None
                        }
                    },
                    Err(error) => {
                        self.errors.push(error);
                        failed = true;
                        None
                    }
                }
            }
        };

        let mut modifiers = Vec::new();
        for modifier in &instruction.modifiers {
            let kind = match &modifier.kind {
                ast::GateModifierKind::Inv => semantic::GateModifierKind::Inv,
                ast::GateModifierKind::Ctrl => semantic::GateModifierKind::Ctrl,
                ast::GateModifierKind::Pow(expr) => {
                    let folded = self.folder().fold(expr);
                    match folded {
                        Ok(value) => match promote(&value, &Type::Real, self.analyzer.dialect) {
                            Some(exponent) => semantic::GateModifierKind::Pow(exponent),
                            None => {
                                self.errors.push(AnalyzeError::TypePromotion(
                                    value.type_of(self.analyzer.dialect).to_string(),
                                    Type::Real.to_string(),
                                    Some(expr.span),
                                ));
                                failed = true;
                                continue;
                            }
                        },
                        Err(error) => {
                            self.errors.push(error);
                            failed = true;
                            continue;
                        }
                    }
                }
            };
            modifiers.push(semantic::GateModifier {
                kind,
                span: modifier.span,
            });
        }

        let annotations = self.annotations(&instruction.annotations);
        if failed {
            return None;
        }

        if !self.analyzer.resolve_instructions {
            return Some(semantic::Instruction {
                instruction: None,
                name: instruction.name.name.clone(),
                modifiers,
                condition,
                operands,
                annotations,
                span: instruction.span,
            });
        }

        // Each ctrl modifier consumes one leading control qubit operand before
        // the base gate signature is matched.
        let ctrl_count = modifiers
            .iter()
            .filter(|m| matches!(m.kind, semantic::GateModifierKind::Ctrl))
            .count();
        if ctrl_count > operands.len() {
            self.errors.push(AnalyzeError::InstructionConstraint(
                "each ctrl modifier needs a control qubit operand",
                Some(instruction.span),
            ));
            return None;
        }
        let (controls, base_operands) = operands.split_at(ctrl_count);
        for control in controls {
            if control.qubit_indices().is_empty() {
                self.errors.push(AnalyzeError::TypePromotion(
                    control.type_of(self.analyzer.dialect).to_string(),
                    Type::Qubit.to_string(),
                    Some(control.span),
                ));
                return None;
            }
        }

        match self.scopes.resolve_instruction(
            &instruction.name.name,
            base_operands,
            Some(instruction.span),
        ) {
            Ok((signature, promoted)) => {
                let mut all_operands = controls.to_vec();
                all_operands.extend(promoted);
                let resolved = semantic::Instruction {
                    instruction: Some(signature),
                    name: instruction.name.name.clone(),
                    modifiers,
                    condition,
                    operands: all_operands,
                    annotations,
                    span: instruction.span,
                };
                self.check_constraints(&resolved);
                Some(resolved)
            }
            Err(error) => {
                self.errors.push(error);
                None
            }
        }
    }

    fn check_constraints(&mut self, instruction: &semantic::Instruction) {
        let Some(signature) = &instruction.instruction else {
            return;
        };

        if instruction.condition.is_some() && !signature.allow_conditional {
            self.errors.push(AnalyzeError::InstructionConstraint(
                "conditional execution is not supported for this instruction",
                Some(instruction.span),
            ));
        }

        if !signature.allow_reused_qubits {
            let mut seen = FxHashSet::default();
            for operand in &instruction.operands {
                for qubit in operand.qubit_indices() {
                    if !seen.insert(*qubit) {
                        self.errors.push(AnalyzeError::InstructionConstraint(
                            "qubit used more than once in the operand list",
                            Some(instruction.span),
                        ));
                        return;
                    }
                }
            }
        }

        if !signature.allow_different_index_sizes {
            let mut sizes = instruction
                .operands
                .iter()
                .filter_map(Value::index_size);
            if let Some(first) = sizes.next() {
                if sizes.any(|size| size != first) {
                    self.errors.push(AnalyzeError::InstructionConstraint(
                        "the number of indices must be the same for all operands",
                        Some(instruction.span),
                    ));
                }
            }
        }
    }

    fn annotations(&mut self, annotations: &[ast::Annotation]) -> Vec<semantic::AnnotationData> {
        annotations
            .iter()
            .map(|annotation| {
                let mut operands = Vec::new();
                for operand in &annotation.operands {
                    let folded = self.folder().fold(operand);
                    match folded {
                        Ok(value) => operands.push(value),
                        Err(error) => self.errors.push(error),
                    }
                }
                semantic::AnnotationData {
                    interface: annotation.interface.name.clone(),
                    operation: annotation.operation.name.clone(),
                    operands,
                    span: annotation.span,
                }
            })
            .collect()
    }

    fn current_subcircuit(&mut self, span: Span) -> &mut semantic::Subcircuit {
        if self.program.subcircuits.is_empty() {
            // Instructions before any subcircuit header go into an implicit
            // subcircuit named `default`.
            self.program.subcircuits.push(semantic::Subcircuit {
                name: "default".into(),
                iterations: 1,
                bundles: Vec::new(),
                annotations: Vec::new(),
                span,
            });
        }
        self.program
            .subcircuits
            .last_mut()
            .expect("a subcircuit should exist")
    }
}
