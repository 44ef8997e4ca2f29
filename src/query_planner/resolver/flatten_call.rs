//! Expands `flatten(x)` into one `get(x, 'field')` per field of x's row type.
//!
//! Only the top level of the sequence is inspected; a flatten nested inside
//! another call is rejected by call resolution. The child must already carry
//! its output type, so this pass runs after field and call resolution.

use crate::query_planner::{
    logical_expr::{
        visitors::{accept, ExpressionVisitor},
        FunctionDefinition, LogicalExpr, UnresolvedCall,
    },
    resolver::{
        context::ResolutionContext,
        errors::{Pass, ResolverError},
        resolver_rule::{ResolverResult, ResolverRule},
    },
    types::RowField,
};

pub struct ResolveFlattenCall;

impl ResolverRule for ResolveFlattenCall {
    fn pass(&self) -> Pass {
        Pass::FlattenCall
    }

    fn apply(
        &self,
        expressions: &[LogicalExpr],
        context: &ResolutionContext,
    ) -> ResolverResult<Vec<LogicalExpr>> {
        let mut visitor = FlatteningCallVisitor { context };
        let mut flattened = Vec::with_capacity(expressions.len());
        for expr in expressions {
            flattened.extend(accept(expr, &mut visitor)?);
        }
        Ok(flattened)
    }
}

struct FlatteningCallVisitor<'a> {
    context: &'a ResolutionContext,
}

impl ExpressionVisitor for FlatteningCallVisitor<'_> {
    type Output = ResolverResult<Vec<LogicalExpr>>;

    fn visit_unresolved_call(&mut self, expr: &LogicalExpr, call: &UnresolvedCall) -> Self::Output {
        if call.function == FunctionDefinition::Flatten {
            return self.execute_flatten(call);
        }
        Ok(vec![expr.clone()])
    }

    fn default_visit(&mut self, expr: &LogicalExpr) -> Self::Output {
        Ok(vec![expr.clone()])
    }
}

impl FlatteningCallVisitor<'_> {
    fn execute_flatten(&self, call: &UnresolvedCall) -> ResolverResult<Vec<LogicalExpr>> {
        let [composite] = call.args.as_slice() else {
            log::error!(
                "flatten called with {} arguments, upstream arity check was skipped",
                call.args.len()
            );
            return Err(ResolverError::MalformedFlattenCall {
                pass: Pass::FlattenCall,
                arity: call.args.len(),
            });
        };

        let Some(result_type) = composite.output_type() else {
            log::error!(
                "flatten child `{}` is unresolved; argument resolution must run before {}",
                composite,
                Pass::FlattenCall
            );
            return Err(ResolverError::PipelineOrderingViolation {
                pass: Pass::FlattenCall,
                function: FunctionDefinition::Flatten,
                expression: composite.to_string(),
            });
        };

        match result_type.fields() {
            Some(fields) => Ok(self.flatten_composite_type(composite, fields)),
            None => Ok(vec![composite.clone()]),
        }
    }

    fn flatten_composite_type(&self, composite: &LogicalExpr, fields: &[RowField]) -> Vec<LogicalExpr> {
        if fields.is_empty() {
            // An empty row contributes no columns.
            log::warn!("flatten over empty row `{}` drops the expression", composite);
            return vec![];
        }

        log::debug!("flatten `{}` into {} fields", composite, fields.len());
        let factory = self.context.post_resolution_factory();
        fields
            .iter()
            .map(|field| factory.get(composite.clone(), &field.name, field.data_type.clone()))
            .collect()
    }
}
