//! Attaches input position and type to field references.
//!
//! Descends through unresolved calls so that arguments such as the child of
//! `flatten(address)` come out resolved. Resolved calls are returned as they
//! are; their arguments were resolved when the call was.

use crate::query_planner::{
    logical_expr::{
        visitors::{accept, ExpressionVisitor},
        FieldReference, LogicalExpr, ResolvedField, UnresolvedCall,
    },
    resolver::{
        context::ResolutionContext,
        errors::{Pass, ResolverError},
        resolver_rule::{ResolverResult, ResolverRule},
    },
};

pub struct FieldResolve;

impl ResolverRule for FieldResolve {
    fn pass(&self) -> Pass {
        Pass::FieldResolve
    }

    fn apply(
        &self,
        expressions: &[LogicalExpr],
        context: &ResolutionContext,
    ) -> ResolverResult<Vec<LogicalExpr>> {
        let mut visitor = FieldResolveVisitor { context };
        expressions
            .iter()
            .map(|expr| accept(expr, &mut visitor))
            .collect()
    }
}

struct FieldResolveVisitor<'a> {
    context: &'a ResolutionContext,
}

impl ExpressionVisitor for FieldResolveVisitor<'_> {
    type Output = ResolverResult<LogicalExpr>;

    fn visit_field_ref(&mut self, expr: &LogicalExpr, field: &FieldReference) -> Self::Output {
        if field.resolved.is_some() {
            return Ok(expr.clone());
        }

        let Some((input_index, input_field)) = self.context.lookup_field(&field.name)? else {
            return Err(ResolverError::FieldNotFound {
                pass: Pass::FieldResolve,
                name: field.name.clone(),
                available: self.context.input_field_names(),
            });
        };

        log::trace!("resolved field `{}` to input #{}", field.name, input_index);
        Ok(LogicalExpr::FieldRef(FieldReference {
            name: input_field.name.clone(),
            resolved: Some(ResolvedField {
                input_index,
                data_type: input_field.data_type.clone(),
            }),
        }))
    }

    fn visit_unresolved_call(&mut self, _expr: &LogicalExpr, call: &UnresolvedCall) -> Self::Output {
        let args = call
            .args
            .iter()
            .map(|arg| accept(arg, self))
            .collect::<ResolverResult<Vec<_>>>()?;
        Ok(LogicalExpr::UnresolvedCall(UnresolvedCall {
            function: call.function,
            args,
        }))
    }

    fn default_visit(&mut self, expr: &LogicalExpr) -> Self::Output {
        Ok(expr.clone())
    }
}
