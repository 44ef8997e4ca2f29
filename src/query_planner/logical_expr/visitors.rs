//! Expression Visitor Pattern
//!
//! This module provides a visitor trait for dispatching on LogicalExpr variants.
//! Resolver passes implement it instead of matching on the expression type
//! themselves.
//!
//! # Architecture
//!
//! [`accept`] performs the exhaustive match over [`LogicalExpr`] and calls the
//! handler for the variant it found. Every handler defaults to
//! [`ExpressionVisitor::default_visit`], so a pass only overrides the variants
//! it cares about.
//!
//! Dispatch is one level deep: `accept` does not descend into call arguments.
//! A visitor that wants to rewrite a subtree calls `accept` on the children
//! itself.
//!
//! # Example
//!
//! ```ignore
//! use crate::query_planner::logical_expr::visitors::{accept, ExpressionVisitor};
//!
//! struct CallCounter;
//!
//! impl ExpressionVisitor for CallCounter {
//!     type Output = usize;
//!
//!     fn visit_unresolved_call(&mut self, _expr: &LogicalExpr, _call: &UnresolvedCall) -> usize {
//!         1
//!     }
//!
//!     fn default_visit(&mut self, _expr: &LogicalExpr) -> usize {
//!         0
//!     }
//! }
//! ```

use super::{FieldReference, LogicalExpr, ResolvedCall, UnresolvedCall, ValueLiteral};

/// Trait for visiting LogicalExpr nodes.
///
/// Each `visit_*` method receives the whole expression alongside the variant
/// payload, so a handler can return the node unchanged without rebuilding it.
pub trait ExpressionVisitor {
    type Output;

    /// Called for literal values (e.g. `42`, `'city'`)
    fn visit_literal(&mut self, expr: &LogicalExpr, _literal: &ValueLiteral) -> Self::Output {
        self.default_visit(expr)
    }

    /// Called for input column references (e.g. `address`)
    fn visit_field_ref(&mut self, expr: &LogicalExpr, _field: &FieldReference) -> Self::Output {
        self.default_visit(expr)
    }

    /// Called for calls that have no output type yet
    fn visit_unresolved_call(&mut self, expr: &LogicalExpr, _call: &UnresolvedCall) -> Self::Output {
        self.default_visit(expr)
    }

    /// Called for calls whose output type is known
    fn visit_resolved_call(&mut self, expr: &LogicalExpr, _call: &ResolvedCall) -> Self::Output {
        self.default_visit(expr)
    }

    /// Fallback for every variant whose handler is not overridden
    fn default_visit(&mut self, expr: &LogicalExpr) -> Self::Output;
}

/// Dispatch `expr` to the matching handler of `visitor`.
pub fn accept<V: ExpressionVisitor + ?Sized>(expr: &LogicalExpr, visitor: &mut V) -> V::Output {
    match expr {
        LogicalExpr::Literal(literal) => visitor.visit_literal(expr, literal),
        LogicalExpr::FieldRef(field) => visitor.visit_field_ref(expr, field),
        LogicalExpr::UnresolvedCall(call) => visitor.visit_unresolved_call(expr, call),
        LogicalExpr::ResolvedCall(call) => visitor.visit_resolved_call(expr, call),
    }
}
