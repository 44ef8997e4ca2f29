use std::fmt::Display;

use thiserror::Error;

use crate::query_planner::logical_expr::FunctionDefinition;

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum Pass {
    FieldResolve,
    FlattenCall,
    ResolveCallByArguments,
}

impl Display for Pass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Pass::FieldResolve => write!(f, "FieldResolve"),
            Pass::FlattenCall => write!(f, "FlattenCall"),
            Pass::ResolveCallByArguments => write!(f, "ResolveCallByArguments"),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ResolverError {
    #[error(
        " {pass}: Resolved expression expected for `{function}`, got `{expression}`. The pass that resolves it must run earlier."
    )]
    PipelineOrderingViolation {
        pass: Pass,
        function: FunctionDefinition,
        expression: String,
    },

    #[error(" {pass}: `flatten` takes exactly one argument, got {arity}.")]
    MalformedFlattenCall { pass: Pass, arity: usize },

    #[error("Expression `{expression}` is still unresolved after all passes")]
    UnresolvedAfterPipeline { expression: String },

    #[error(" {pass}: Field `{name}` not found. Available fields: [{}]", .available.join(", "))]
    FieldNotFound {
        pass: Pass,
        name: String,
        available: Vec<String>,
    },

    #[error(" {pass}: Field `{name}` is ambiguous, it matches [{}]", .candidates.join(", "))]
    AmbiguousField {
        pass: Pass,
        name: String,
        candidates: Vec<String>,
    },

    #[error(" {pass}: Invalid arguments for `{function}`: {reason}")]
    InvalidArgument {
        pass: Pass,
        function: FunctionDefinition,
        reason: String,
    },

    #[error("Projection expands to {width} columns, limit is {max}")]
    ProjectionTooWide { width: usize, max: usize },
}

impl ResolverError {
    /// Internal errors point at a defect in pass configuration or in an
    /// upstream pass, never at the user's query.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            ResolverError::PipelineOrderingViolation { .. }
                | ResolverError::MalformedFlattenCall { .. }
                | ResolverError::UnresolvedAfterPipeline { .. }
        )
    }
}
