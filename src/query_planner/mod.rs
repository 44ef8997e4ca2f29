use serde::{Deserialize, Serialize};

use crate::{
    config::ResolverConfig,
    query_planner::{
        logical_expr::LogicalExpr,
        resolver::{errors::ResolverError, ExpressionResolver},
        types::RowField,
    },
};

pub mod logical_expr;
pub mod resolver;
pub mod types;

/// A projection to resolve: the input schema plus the user-written expressions.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct ProjectionRequest {
    pub schema: Vec<RowField>,
    pub expressions: Vec<LogicalExpr>,
}

pub fn evaluate_projection(
    request: &ProjectionRequest,
    config: ResolverConfig,
) -> Result<Vec<LogicalExpr>, ResolverError> {
    ExpressionResolver::new(config).resolve(&request.expressions, &request.schema)
}
