//! Turns the remaining unresolved calls into resolved calls.
//!
//! Works bottom-up: arguments are resolved first, then the call's output type
//! is inferred from the argument types. Field references must already be
//! resolved by the time this pass runs.
//!
//! A top-level `flatten` gets its argument resolved but stays unresolved
//! itself; the flatten expansion runs next and needs the argument's type.

use crate::query_planner::{
    logical_expr::{
        visitors::{accept, ExpressionVisitor},
        FunctionDefinition, Literal, LogicalExpr, UnresolvedCall, ValueLiteral,
    },
    resolver::{
        context::ResolutionContext,
        errors::{Pass, ResolverError},
        resolver_rule::{ResolverResult, ResolverRule},
    },
    types::DataType,
};

pub struct ResolveCallByArguments;

impl ResolverRule for ResolveCallByArguments {
    fn pass(&self) -> Pass {
        Pass::ResolveCallByArguments
    }

    fn apply(
        &self,
        expressions: &[LogicalExpr],
        context: &ResolutionContext,
    ) -> ResolverResult<Vec<LogicalExpr>> {
        let mut visitor = CallArgumentsVisitor { context, depth: 0 };
        expressions
            .iter()
            .map(|expr| accept(expr, &mut visitor))
            .collect()
    }
}

struct CallArgumentsVisitor<'a> {
    context: &'a ResolutionContext,
    /// Call nesting level of the node being visited; 0 is the projection list
    depth: usize,
}

impl ExpressionVisitor for CallArgumentsVisitor<'_> {
    type Output = ResolverResult<LogicalExpr>;

    fn visit_unresolved_call(&mut self, _expr: &LogicalExpr, call: &UnresolvedCall) -> Self::Output {
        self.depth += 1;
        let args = call
            .args
            .iter()
            .map(|arg| accept(arg, self))
            .collect::<ResolverResult<Vec<_>>>();
        self.depth -= 1;
        let args = args?;

        if call.function == FunctionDefinition::Flatten && self.depth == 0 {
            // Arity and child type are checked by the flatten expansion.
            return Ok(LogicalExpr::UnresolvedCall(UnresolvedCall {
                function: FunctionDefinition::Flatten,
                args,
            }));
        }

        let arg_types = args
            .iter()
            .map(|arg| {
                arg.output_type().cloned().ok_or_else(|| {
                    log::error!("argument `{}` of `{}` is unresolved", arg, call.function);
                    ResolverError::PipelineOrderingViolation {
                        pass: Pass::ResolveCallByArguments,
                        function: call.function,
                        expression: arg.to_string(),
                    }
                })
            })
            .collect::<ResolverResult<Vec<_>>>()?;

        let output_type = infer_output_type(call.function, &args, &arg_types)?;
        log::trace!("resolved `{}` as {}", call.function, output_type);
        Ok(self
            .context
            .post_resolution_factory()
            .resolved_call(call.function, args, output_type))
    }

    fn default_visit(&mut self, expr: &LogicalExpr) -> Self::Output {
        Ok(expr.clone())
    }
}

fn invalid(function: FunctionDefinition, reason: impl Into<String>) -> ResolverError {
    ResolverError::InvalidArgument {
        pass: Pass::ResolveCallByArguments,
        function,
        reason: reason.into(),
    }
}

fn expect_arity(function: FunctionDefinition, types: &[DataType], arity: usize) -> ResolverResult<()> {
    if types.len() != arity {
        return Err(invalid(
            function,
            format!("expected {} arguments, got {}", arity, types.len()),
        ));
    }
    Ok(())
}

fn expect_type(
    function: FunctionDefinition,
    actual: &DataType,
    accepts: impl Fn(&DataType) -> bool,
    expected: &str,
) -> ResolverResult<()> {
    if *actual == DataType::Null || accepts(actual) {
        Ok(())
    } else {
        Err(invalid(function, format!("expected {}, got {}", expected, actual)))
    }
}

fn infer_output_type(
    function: FunctionDefinition,
    args: &[LogicalExpr],
    types: &[DataType],
) -> ResolverResult<DataType> {
    use FunctionDefinition as F;

    match function {
        F::Flatten => Err(invalid(
            function,
            "flatten is only allowed at the top level of a projection",
        )),
        F::Get => infer_get(args, types),
        F::As => {
            expect_arity(function, types, 2)?;
            match &args[1] {
                LogicalExpr::Literal(ValueLiteral {
                    value: Literal::String(_),
                    ..
                }) => Ok(types[0].clone()),
                other => Err(invalid(
                    function,
                    format!("alias must be a string literal, got `{}`", other),
                )),
            }
        }
        F::Plus | F::Minus | F::Times | F::Divide => {
            expect_arity(function, types, 2)?;
            types[0].promote_numeric(&types[1]).ok_or_else(|| {
                invalid(
                    function,
                    format!("expected numeric operands, got {} and {}", types[0], types[1]),
                )
            })
        }
        F::Equals | F::NotEquals | F::LessThan | F::GreaterThan => {
            expect_arity(function, types, 2)?;
            Ok(DataType::Boolean)
        }
        F::And | F::Or => {
            expect_arity(function, types, 2)?;
            for t in types {
                expect_type(function, t, |t| *t == DataType::Boolean, "BOOLEAN")?;
            }
            Ok(DataType::Boolean)
        }
        F::Not => {
            expect_arity(function, types, 1)?;
            expect_type(function, &types[0], |t| *t == DataType::Boolean, "BOOLEAN")?;
            Ok(DataType::Boolean)
        }
        F::IsNull | F::IsNotNull => {
            expect_arity(function, types, 1)?;
            Ok(DataType::Boolean)
        }
        F::Upper | F::Lower => {
            expect_arity(function, types, 1)?;
            expect_type(function, &types[0], |t| *t == DataType::String, "STRING")?;
            Ok(DataType::String)
        }
        F::Concat => {
            if types.is_empty() {
                return Err(invalid(function, "expected at least one argument"));
            }
            Ok(DataType::String)
        }
    }
}

/// `get(row, 'name')` or `get(row, index)`: the type of the addressed field.
fn infer_get(args: &[LogicalExpr], types: &[DataType]) -> ResolverResult<DataType> {
    let function = FunctionDefinition::Get;
    expect_arity(function, types, 2)?;

    let Some(fields) = types[0].fields() else {
        return Err(invalid(
            function,
            format!("`{}` of type {} is not composite", args[0], types[0]),
        ));
    };

    let key = match &args[1] {
        LogicalExpr::Literal(literal) => &literal.value,
        other => {
            return Err(invalid(
                function,
                format!("field key must be a literal, got `{}`", other),
            ))
        }
    };

    let field = match key {
        Literal::String(name) => fields.iter().find(|f| f.name == *name),
        Literal::Integer(idx) => usize::try_from(*idx).ok().and_then(|idx| fields.get(idx)),
        other => {
            return Err(invalid(
                function,
                format!("field key must be a name or an index, got {}", other),
            ))
        }
    };

    field.map(|f| f.data_type.clone()).ok_or_else(|| ResolverError::FieldNotFound {
        pass: Pass::ResolveCallByArguments,
        name: match key {
            Literal::String(name) => name.clone(),
            other => other.to_string(),
        },
        available: fields.iter().map(|f| f.name.clone()).collect(),
    })
}
