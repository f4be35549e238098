// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The abstract syntax tree (AST) for cQASM. The AST directly corresponds to the
//! surface syntax and is faithful to the grammar: nothing is resolved, folded, or
//! checked beyond what the parser had to know to build the nodes.

#![warn(missing_docs)]

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

/// The root node of an AST: a version header followed by statements.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Program {
    /// The span.
    pub span: Span,
    /// The version header.
    pub version: VersionNode,
    /// The statements, in source order.
    pub statements: Vec<Stmt>,
}

impl Display for Program {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let mut indent = set_indentation(indented(f), 0);
        write!(indent, "Program {}: version {}", self.span, self.version.version)?;
        indent = set_indentation(indent, 1);
        for stmt in &self.statements {
            write!(indent, "\n{stmt}")?;
        }
        Ok(())
    }
}

/// The `version M.N` header.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VersionNode {
    /// The span of the version literal.
    pub span: Span,
    /// The parsed components.
    pub version: Version,
}

/// A statement node.
#[derive(Clone, Debug, PartialEq)]
pub struct Stmt {
    /// The span.
    pub span: Span,
    /// The statement kind.
    pub kind: StmtKind,
}

impl Display for Stmt {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let mut indent = set_indentation(indented(f), 0);
        match &self.kind {
            StmtKind::QubitDecl(decl) => {
                write!(indent, "QubitDecl {}:", self.span)?;
                indent = set_indentation(indent, 1);
                if let Some(size) = &decl.size {
                    write!(indent, "\nsize: {size}")?;
                }
                if let Some(name) = &decl.name {
                    write!(indent, "\nname: {name}")?;
                }
            }
            StmtKind::BitDecl(decl) => {
                write!(indent, "BitDecl {}:", self.span)?;
                indent = set_indentation(indent, 1);
                if let Some(size) = &decl.size {
                    write!(indent, "\nsize: {size}")?;
                }
                write!(indent, "\nname: {}", decl.name)?;
            }
            StmtKind::Mapping(mapping) => {
                write!(indent, "Mapping {}: {}", self.span, mapping.name)?;
                indent = set_indentation(indent, 1);
                write!(indent, "\n{}", mapping.value)?;
                for annotation in &mapping.annotations {
                    write!(indent, "\n{annotation}")?;
                }
            }
            StmtKind::Subcircuit(subcircuit) => {
                write!(indent, "Subcircuit {}: {}", self.span, subcircuit.name)?;
                indent = set_indentation(indent, 1);
                if let Some(iterations) = &subcircuit.iterations {
                    write!(indent, "\niterations: {iterations}")?;
                }
            }
            StmtKind::Bundle(bundle) => {
                write!(indent, "Bundle {}:", self.span)?;
                indent = set_indentation(indent, 1);
                for instruction in &bundle.instructions {
                    write!(indent, "\n{instruction}")?;
                }
                for annotation in &bundle.annotations {
                    write!(indent, "\n{annotation}")?;
                }
            }
            StmtKind::ErrorModel(model) => {
                write!(indent, "ErrorModel {}: {}", self.span, model.name)?;
                indent = set_indentation(indent, 1);
                for arg in &model.args {
                    write!(indent, "\n{arg}")?;
                }
                for annotation in &model.annotations {
                    write!(indent, "\n{annotation}")?;
                }
            }
            StmtKind::Break => write!(indent, "Break {}", self.span)?,
            StmtKind::Continue => write!(indent, "Continue {}", self.span)?,
            StmtKind::Err => write!(indent, "Err {}", self.span)?,
        }
        Ok(())
    }
}

/// A statement kind.
#[derive(Clone, Debug, PartialEq)]
pub enum StmtKind {
    /// A qubit register declaration: v1 `qubits N`, v3 `qubit[N] q` or `qubit q`.
    QubitDecl(Box<QubitDecl>),
    /// A bit register declaration: v3 `bit[N] b` or `bit b`.
    BitDecl(Box<BitDecl>),
    /// `map name = expression`.
    Mapping(Box<Mapping>),
    /// `.name(iterations)` on a line of its own.
    Subcircuit(Box<Subcircuit>),
    /// One or more instructions executing in parallel. A lone instruction is a
    /// one-element bundle.
    Bundle(Box<Bundle>),
    /// `error_model name, arg, ...`.
    ErrorModel(Box<ErrorModelStmt>),
    /// `break`.
    Break,
    /// `continue`.
    Continue,
    /// An invalid statement produced by error recovery.
    Err,
}

/// A qubit register declaration.
#[derive(Clone, Debug, PartialEq)]
pub struct QubitDecl {
    /// The register size; absent for a bare v3 `qubit q`.
    pub size: Option<Expr>,
    /// The register name; absent in the v1 `qubits N` form.
    pub name: Option<Ident>,
}

/// A bit register declaration.
#[derive(Clone, Debug, PartialEq)]
pub struct BitDecl {
    /// The register size; absent for a bare `bit b`.
    pub size: Option<Expr>,
    /// The register name.
    pub name: Ident,
}

/// A `map name = expression` statement.
#[derive(Clone, Debug, PartialEq)]
pub struct Mapping {
    /// The mapping name.
    pub name: Ident,
    /// The mapped expression.
    pub value: Expr,
    /// Trailing annotations.
    pub annotations: Vec<Annotation>,
}

/// A subcircuit header.
#[derive(Clone, Debug, PartialEq)]
pub struct Subcircuit {
    /// The subcircuit name.
    pub name: Ident,
    /// The iteration count, when written.
    pub iterations: Option<Expr>,
    /// Trailing annotations.
    pub annotations: Vec<Annotation>,
}

/// A bundle of instructions.
#[derive(Clone, Debug, PartialEq)]
pub struct Bundle {
    /// The bundled instructions, in source order.
    pub instructions: Vec<Instruction>,
    /// Trailing annotations.
    pub annotations: Vec<Annotation>,
}

/// An `error_model` statement.
#[derive(Clone, Debug, PartialEq)]
pub struct ErrorModelStmt {
    /// The error model name.
    pub name: Ident,
    /// The model arguments.
    pub args: Vec<Expr>,
    /// Trailing annotations.
    pub annotations: Vec<Annotation>,
}

/// A single instruction.
#[derive(Clone, Debug, PartialEq)]
pub struct Instruction {
    /// The span.
    pub span: Span,
    /// The instruction name.
    pub name: Ident,
    /// Gate modifiers, in source order (v3).
    pub modifiers: Vec<GateModifier>,
    /// The condition expression of a `condition: name ...` prefix.
    pub condition: Option<Expr>,
    /// The operand expressions.
    pub operands: Vec<Expr>,
    /// Trailing annotations.
    pub annotations: Vec<Annotation>,
}

impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let mut indent = set_indentation(indented(f), 0);
        write!(indent, "Instruction {}: {}", self.span, self.name)?;
        indent = set_indentation(indent, 1);
        for modifier in &self.modifiers {
            write!(indent, "\n{modifier}")?;
        }
        if let Some(condition) = &self.condition {
            write!(indent, "\ncondition: {condition}")?;
        }
        for operand in &self.operands {
            write!(indent, "\n{operand}")?;
        }
        for annotation in &self.annotations {
            write!(indent, "\n{annotation}")?;
        }
        Ok(())
    }
}

/// A gate modifier (v3): `inv.`, `pow(k).`, or `ctrl.`.
#[derive(Clone, Debug, PartialEq)]
pub struct GateModifier {
    /// The span.
    pub span: Span,
    /// The modifier kind.
    pub kind: GateModifierKind,
}

impl Display for GateModifier {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let mut indent = set_indentation(indented(f), 0);
        match &self.kind {
            GateModifierKind::Inv => write!(indent, "Inv {}", self.span),
            GateModifierKind::Ctrl => write!(indent, "Ctrl {}", self.span),
            GateModifierKind::Pow(exponent) => {
                write!(indent, "Pow {}:", self.span)?;
                indent = set_indentation(indent, 1);
                write!(indent, "\n{exponent}")
            }
        }
    }
}

/// A gate modifier kind.
#[derive(Clone, Debug, PartialEq)]
pub enum GateModifierKind {
    /// The inverse of the modified gate.
    Inv,
    /// The modified gate raised to a power.
    Pow(Expr),
    /// The modified gate controlled by one more qubit.
    Ctrl,
}

/// An `@interface.operation(...)` annotation.
#[derive(Clone, Debug, PartialEq)]
pub struct Annotation {
    /// The span.
    pub span: Span,
    /// The interface the annotation is intended for.
    pub interface: Ident,
    /// The operation within that interface.
    pub operation: Ident,
    /// The uninterpreted operand expressions.
    pub operands: Vec<Expr>,
}

impl Display for Annotation {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let mut indent = set_indentation(indented(f), 0);
        write!(
            indent,
            "Annotation {}: {}.{}",
            self.span, self.interface, self.operation
        )?;
        indent = set_indentation(indent, 1);
        for operand in &self.operands {
            write!(indent, "\n{operand}")?;
        }
        Ok(())
    }
}

/// An identifier.
#[derive(Clone, Debug, PartialEq)]
pub struct Ident {
    /// The span.
    pub span: Span,
    /// The identifier name.
    pub name: Rc<str>,
}

impl Display for Ident {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "Ident {} \"{}\"", self.span, self.name)
    }
}

/// An expression node.
#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    /// The span.
    pub span: Span,
    /// The expression kind.
    pub kind: ExprKind,
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let mut indent = set_indentation(indented(f), 0);
        match &self.kind {
            ExprKind::Lit(lit) => write!(indent, "Lit {}: {lit}", self.span)?,
            ExprKind::Ident(ident) => write!(indent, "Expr {}: {ident}", self.span)?,
            ExprKind::Index(expr, items) => {
                write!(indent, "Index {}:", self.span)?;
                indent = set_indentation(indent, 1);
                write!(indent, "\n{expr}")?;
                for item in items {
                    write!(indent, "\n{item}")?;
                }
            }
            ExprKind::UnOp(op, operand) => {
                write!(indent, "UnOp {} ({}):", self.span, op.spelling())?;
                indent = set_indentation(indent, 1);
                write!(indent, "\n{operand}")?;
            }
            ExprKind::BinOp(op, lhs, rhs) => {
                write!(indent, "BinOp {} ({}):", self.span, op.spelling())?;
                indent = set_indentation(indent, 1);
                write!(indent, "\n{lhs}")?;
                write!(indent, "\n{rhs}")?;
            }
            ExprKind::TernOp(cond, if_true, if_false) => {
                write!(indent, "TernOp {} (?:):", self.span)?;
                indent = set_indentation(indent, 1);
                write!(indent, "\n{cond}")?;
                write!(indent, "\n{if_true}")?;
                write!(indent, "\n{if_false}")?;
            }
            ExprKind::Call(name, args) => {
                write!(indent, "Call {}: {}", self.span, name)?;
                indent = set_indentation(indent, 1);
                for arg in args {
                    write!(indent, "\n{arg}")?;
                }
            }
            ExprKind::Matrix(rows) => {
                write!(indent, "Matrix {}:", self.span)?;
                indent = set_indentation(indent, 1);
                for (i, row) in rows.iter().enumerate() {
                    write!(indent, "\nrow {i}:")?;
                    indent = set_indentation(indent, 2);
                    for entry in row {
                        write!(indent, "\n{entry}")?;
                    }
                    indent = set_indentation(indent, 1);
                }
            }
            ExprKind::Paren(expr) => {
                write!(indent, "Paren {}:", self.span)?;
                indent = set_indentation(indent, 1);
                write!(indent, "\n{expr}")?;
            }
            ExprKind::Err => write!(indent, "Err {}", self.span)?,
        }
        Ok(())
    }
}

/// An expression kind.
#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    /// A literal.
    Lit(Lit),
    /// A name to be resolved against the mapping/variable tables.
    Ident(Ident),
    /// An index into a register: `q[0]`, `q[0,2]`, `q[0:3]`.
    Index(Box<Expr>, Vec<IndexItem>),
    /// A unary operator application.
    UnOp(UnOp, Box<Expr>),
    /// A binary operator application.
    BinOp(BinOp, Box<Expr>, Box<Expr>),
    /// The ternary conditional `cond ? a : b`.
    TernOp(Box<Expr>, Box<Expr>, Box<Expr>),
    /// A function call.
    Call(Ident, Vec<Expr>),
    /// A matrix literal `[a, b | c, d]` (rows separated by `|`).
    Matrix(Vec<Vec<Expr>>),
    /// A parenthesized expression.
    Paren(Box<Expr>),
    /// An invalid expression produced by error recovery.
    Err,
}

/// A single entry inside index brackets.
#[derive(Clone, Debug, PartialEq)]
pub enum IndexItem {
    /// One index.
    Single(Expr),
    /// An inclusive range `a:b`.
    Range(Expr, Expr),
}

impl Display for IndexItem {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let mut indent = set_indentation(indented(f), 0);
        match self {
            IndexItem::Single(expr) => write!(indent, "{expr}"),
            IndexItem::Range(first, last) => {
                write!(indent, "Range:")?;
                indent = set_indentation(indent, 1);
                write!(indent, "\n{first}")?;
                write!(indent, "\n{last}")
            }
        }
    }
}

/// A literal.
#[derive(Clone, Debug, PartialEq)]
pub enum Lit {
    /// A boolean literal.
    Bool(bool),
    /// An integer literal.
    Int(i64),
    /// A floating-point literal.
    Real(f64),
    /// A string literal, with escapes already processed.
    String(Rc<str>),
}

impl Display for Lit {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Lit::Bool(value) => write!(f, "Bool({value})"),
            Lit::Int(value) => write!(f, "Int({value})"),
            Lit::Real(value) => write!(f, "Real({value:?})"),
            Lit::String(value) => write!(f, "String({value:?})"),
        }
    }
}

/// A unary operator.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UnOp {
    /// Negation: `-`.
    Neg,
    /// Bitwise NOT: `~`.
    NotB,
    /// Logical NOT: `!`.
    NotL,
}

impl UnOp {
    /// The textual form of the operator.
    #[must_use]
    pub fn spelling(self) -> &'static str {
        match self {
            UnOp::Neg => "-",
            UnOp::NotB => "~",
            UnOp::NotL => "!",
        }
    }

    /// The operator with the given textual form.
    #[must_use]
    pub fn from_spelling(spelling: &str) -> Option<Self> {
        match spelling {
            "-" => Some(UnOp::Neg),
            "~" => Some(UnOp::NotB),
            "!" => Some(UnOp::NotL),
            _ => None,
        }
    }
}

/// A binary operator.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BinOp {
    /// Addition: `+`.
    Add,
    /// Subtraction: `-`.
    Sub,
    /// Multiplication: `*`.
    Mul,
    /// True division: `/`.
    Div,
    /// Flooring integer division: `//` (v1).
    IntDiv,
    /// Modulo: `%`.
    Mod,
    /// Exponentiation: `**`.
    Pow,
    /// Shift left: `<<`.
    Shl,
    /// Arithmetic shift right: `>>`.
    ShrA,
    /// Logical shift right: `>>>` (v1).
    ShrL,
    /// Equality: `==`.
    Eq,
    /// Inequality: `!=`.
    Ne,
    /// Greater than: `>`.
    Gt,
    /// Greater than or equal: `>=`.
    Gte,
    /// Less than: `<`.
    Lt,
    /// Less than or equal: `<=`.
    Lte,
    /// Bitwise AND: `&`.
    AndB,
    /// Bitwise XOR: `^`.
    XorB,
    /// Bitwise OR: `|`.
    OrB,
    /// Logical AND: `&&`.
    AndL,
    /// Logical XOR: `^^`.
    XorL,
    /// Logical OR: `||`.
    OrL,
}

impl BinOp {
    /// The textual form of the operator.
    #[must_use]
    pub fn spelling(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::IntDiv => "//",
            BinOp::Mod => "%",
            BinOp::Pow => "**",
            BinOp::Shl => "<<",
            BinOp::ShrA => ">>",
            BinOp::ShrL => ">>>",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Gt => ">",
            BinOp::Gte => ">=",
            BinOp::Lt => "<",
            BinOp::Lte => "<=",
            BinOp::AndB => "&",
            BinOp::XorB => "^",
            BinOp::OrB => "|",
            BinOp::AndL => "&&",
            BinOp::XorL => "^^",
            BinOp::OrL => "||",
        }
    }

    /// The operator with the given textual form.
    #[must_use]
    pub fn from_spelling(spelling: &str) -> Option<Self> {
        match spelling {
            "+" => Some(BinOp::Add),
            "-" => Some(BinOp::Sub),
            "*" => Some(BinOp::Mul),
            "/" => Some(BinOp::Div),
            "//" => Some(BinOp::IntDiv),
            "%" => Some(BinOp::Mod),
            "**" => Some(BinOp::Pow),
            "<<" => Some(BinOp::Shl),
            ">>" => Some(BinOp::ShrA),
            ">>>" => Some(BinOp::ShrL),
            "==" => Some(BinOp::Eq),
            "!=" => Some(BinOp::Ne),
            ">" => Some(BinOp::Gt),
            ">=" => Some(BinOp::Gte),
            "<" => Some(BinOp::Lt),
            "<=" => Some(BinOp::Lte),
            "&" => Some(BinOp::AndB),
            "^" => Some(BinOp::XorB),
            "|" => Some(BinOp::OrB),
            "&&" => Some(BinOp::AndL),
            "^^" => Some(BinOp::XorL),
            "||" => Some(BinOp::OrL),
            _ => None,
        }
    }
}
