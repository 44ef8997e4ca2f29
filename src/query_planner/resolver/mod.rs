//! # Expression Resolver
//!
//! Turns a list of user-written projection expressions into a list of fully
//! typed expressions. The resolver runs a fixed sequence of passes, each one
//! allowed to assume what the earlier ones produced:
//!
//! ```text
//! 1. FieldResolve            - attach input position and type to field references
//! 2. ResolveCallByArguments  - infer output types of calls; a top-level flatten
//!                              only gets its argument typed
//! 3. FlattenCall             - expand flatten(x) into one get(x, 'f') per field of x
//! ```
//!
//! FlattenCall needs its argument typed, and that argument can be any
//! expression, so it runs after both passes that attach types. It is the only
//! pass that changes the number of expressions. A flatten it leaves behind is
//! reported by the final unresolved check.
//!
//! ## Module Organization
//!
//! - `resolver_rule.rs`: pass trait
//! - `context.rs`: state shared by the passes of one run
//! - `post_resolution_factory.rs`: builders for already-resolved nodes
//! - `field_resolve.rs`, `flatten_call.rs`, `resolve_call_by_arguments.rs`: the passes

pub mod context;
pub mod errors;
pub mod field_resolve;
pub mod flatten_call;
pub mod post_resolution_factory;
pub mod resolve_call_by_arguments;
pub mod resolver_rule;

use crate::{
    config::ResolverConfig,
    query_planner::{
        logical_expr::LogicalExpr,
        resolver::{
            context::ResolutionContext,
            errors::ResolverError,
            field_resolve::FieldResolve,
            flatten_call::ResolveFlattenCall,
            resolve_call_by_arguments::ResolveCallByArguments,
            resolver_rule::{ResolverResult, ResolverRule},
        },
        types::RowField,
    },
};

pub struct ExpressionResolver {
    config: ResolverConfig,
    rules: Vec<Box<dyn ResolverRule>>,
}

impl ExpressionResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self::with_rules(config, Self::default_rules())
    }

    /// Resolver running `rules` in the given order instead of the default sequence.
    pub fn with_rules(config: ResolverConfig, rules: Vec<Box<dyn ResolverRule>>) -> Self {
        ExpressionResolver { config, rules }
    }

    pub fn default_rules() -> Vec<Box<dyn ResolverRule>> {
        vec![
            Box::new(FieldResolve),
            Box::new(ResolveCallByArguments),
            Box::new(ResolveFlattenCall),
        ]
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Run every pass over `expressions`, resolving field references against
    /// `input_fields`.
    pub fn resolve(
        &self,
        expressions: &[LogicalExpr],
        input_fields: &[RowField],
    ) -> ResolverResult<Vec<LogicalExpr>> {
        log::info!(
            "Resolving {} expressions over {} input fields",
            expressions.len(),
            input_fields.len()
        );

        let mut context = ResolutionContext::new(input_fields.to_vec(), &self.config);
        let mut current = expressions.to_vec();

        for rule in &self.rules {
            let pass = rule.pass();
            context.enter_pass(pass);
            let before = current.len();
            current = rule.apply(&current, &context)?;
            log::debug!("{}: {} -> {} expressions", pass, before, current.len());
        }
        context.leave_pass();

        if let Some(unresolved) = current.iter().find(|expr| !expr.is_resolved()) {
            log::error!("`{}` left unresolved by the pass sequence", unresolved);
            return Err(ResolverError::UnresolvedAfterPipeline {
                expression: unresolved.to_string(),
            });
        }

        if current.len() > self.config.max_projection_width {
            return Err(ResolverError::ProjectionTooWide {
                width: current.len(),
                max: self.config.max_projection_width,
            });
        }

        log::info!("Resolved projection has {} expressions", current.len());
        Ok(current)
    }
}

impl Default for ExpressionResolver {
    fn default() -> Self {
        Self::new(ResolverConfig::default())
    }
}
