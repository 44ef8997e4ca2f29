use crate::query_planner::{
    logical_expr::LogicalExpr,
    resolver::{
        context::ResolutionContext,
        errors::{Pass, ResolverError},
    },
};

pub type ResolverResult<T> = Result<T, ResolverError>;

/// One stage of the resolver pipeline.
///
/// A rule maps an ordered expression sequence to a new ordered sequence. It
/// borrows its input and returns freshly owned expressions; one input element
/// may turn into zero, one or many output elements.
pub trait ResolverRule: Send + Sync {
    fn pass(&self) -> Pass;

    fn apply(
        &self,
        expressions: &[LogicalExpr],
        context: &ResolutionContext,
    ) -> ResolverResult<Vec<LogicalExpr>>;
}
