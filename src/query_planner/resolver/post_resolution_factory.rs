//! Builders for nodes that are already resolved when they are created.
//!
//! Passes that synthesize new expressions after types are known (such as the
//! flatten expansion) go through this factory. Nodes it returns carry their
//! output type, so later passes leave them alone.

use crate::query_planner::{
    logical_expr::{FunctionDefinition, Literal, LogicalExpr, ResolvedCall},
    types::DataType,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct PostResolutionFactory;

impl PostResolutionFactory {
    /// `get(target, 'field_name')` typed as `output_type`.
    pub fn get(&self, target: LogicalExpr, field_name: &str, output_type: DataType) -> LogicalExpr {
        self.resolved_call(
            FunctionDefinition::Get,
            vec![target, self.literal(Literal::String(field_name.to_string()))],
            output_type,
        )
    }

    pub fn literal(&self, value: Literal) -> LogicalExpr {
        LogicalExpr::literal(value)
    }

    pub fn resolved_call(
        &self,
        function: FunctionDefinition,
        args: Vec<LogicalExpr>,
        output_type: DataType,
    ) -> LogicalExpr {
        LogicalExpr::ResolvedCall(ResolvedCall {
            function,
            args,
            output_type,
        })
    }
}
