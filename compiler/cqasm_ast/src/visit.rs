// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::ast::{
    Annotation, Expr, ExprKind, GateModifierKind, Ident, IndexItem, Instruction, Program, Stmt,
    StmtKind,
};

pub trait Visitor<'a>: Sized {
    fn visit_program(&mut self, program: &'a Program) {
        walk_program(self, program);
    }

    fn visit_stmt(&mut self, stmt: &'a Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_instruction(&mut self, instruction: &'a Instruction) {
        walk_instruction(self, instruction);
    }

    fn visit_annotation(&mut self, annotation: &'a Annotation) {
        walk_annotation(self, annotation);
    }

    fn visit_expr(&mut self, expr: &'a Expr) {
        walk_expr(self, expr);
    }

    fn visit_ident(&mut self, _: &'a Ident) {}
}

pub fn walk_program<'a>(vis: &mut impl Visitor<'a>, program: &'a Program) {
    program.statements.iter().for_each(|s| vis.visit_stmt(s));
}

pub fn walk_stmt<'a>(vis: &mut impl Visitor<'a>, stmt: &'a Stmt) {
    match &stmt.kind {
        StmtKind::QubitDecl(decl) => {
            decl.size.iter().for_each(|e| vis.visit_expr(e));
            decl.name.iter().for_each(|n| vis.visit_ident(n));
        }
        StmtKind::BitDecl(decl) => {
            decl.size.iter().for_each(|e| vis.visit_expr(e));
            vis.visit_ident(&decl.name);
        }
        StmtKind::Mapping(mapping) => {
            vis.visit_ident(&mapping.name);
            vis.visit_expr(&mapping.value);
            mapping.annotations.iter().for_each(|a| vis.visit_annotation(a));
        }
        StmtKind::Subcircuit(subcircuit) => {
            vis.visit_ident(&subcircuit.name);
            subcircuit.iterations.iter().for_each(|e| vis.visit_expr(e));
            subcircuit
                .annotations
                .iter()
                .for_each(|a| vis.visit_annotation(a));
        }
        StmtKind::Bundle(bundle) => {
            bundle
                .instructions
                .iter()
                .for_each(|i| vis.visit_instruction(i));
            bundle.annotations.iter().for_each(|a| vis.visit_annotation(a));
        }
        StmtKind::ErrorModel(model) => {
            vis.visit_ident(&model.name);
            model.args.iter().for_each(|e| vis.visit_expr(e));
            model.annotations.iter().for_each(|a| vis.visit_annotation(a));
        }
        StmtKind::Break | StmtKind::Continue | StmtKind::Err => {}
    }
}

pub fn walk_instruction<'a>(vis: &mut impl Visitor<'a>, instruction: &'a Instruction) {
    vis.visit_ident(&instruction.name);
    for modifier in &instruction.modifiers {
        if let GateModifierKind::Pow(exponent) = &modifier.kind {
            vis.visit_expr(exponent);
        }
    }
    instruction.condition.iter().for_each(|e| vis.visit_expr(e));
    instruction.operands.iter().for_each(|e| vis.visit_expr(e));
    instruction
        .annotations
        .iter()
        .for_each(|a| vis.visit_annotation(a));
}

pub fn walk_annotation<'a>(vis: &mut impl Visitor<'a>, annotation: &'a Annotation) {
    vis.visit_ident(&annotation.interface);
    vis.visit_ident(&annotation.operation);
    annotation.operands.iter().for_each(|e| vis.visit_expr(e));
}

pub fn walk_expr<'a>(vis: &mut impl Visitor<'a>, expr: &'a Expr) {
    match &expr.kind {
        ExprKind::Lit(_) | ExprKind::Err => {}
        ExprKind::Ident(ident) => vis.visit_ident(ident),
        ExprKind::Index(expr, items) => {
            vis.visit_expr(expr);
            for item in items {
                match item {
                    IndexItem::Single(index) => vis.visit_expr(index),
                    IndexItem::Range(first, last) => {
                        vis.visit_expr(first);
                        vis.visit_expr(last);
                    }
                }
            }
        }
        ExprKind::UnOp(_, operand) => vis.visit_expr(operand),
        ExprKind::BinOp(_, lhs, rhs) => {
            vis.visit_expr(lhs);
            vis.visit_expr(rhs);
        }
        ExprKind::TernOp(cond, if_true, if_false) => {
            vis.visit_expr(cond);
            vis.visit_expr(if_true);
            vis.visit_expr(if_false);
        }
        ExprKind::Call(name, args) => {
            vis.visit_ident(name);
            args.iter().for_each(|e| vis.visit_expr(e));
        }
        ExprKind::Matrix(rows) => {
            for row in rows {
                row.iter().for_each(|e| vis.visit_expr(e));
            }
        }
        ExprKind::Paren(expr) => vis.visit_expr(expr),
    }
}
