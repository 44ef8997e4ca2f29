//! Resolution context shared by all passes of one resolver run.
//!
//! [`ResolutionContext`] is handed to each pass by reference. It exposes:
//! - the input schema that field references resolve against
//! - the pass currently running
//! - the [`PostResolutionFactory`] for building already-resolved nodes
//!
//! Only the driver moves the context from one pass to the next; passes see it
//! read-only.

use crate::{
    config::ResolverConfig,
    query_planner::{
        resolver::{
            errors::{Pass, ResolverError},
            post_resolution_factory::PostResolutionFactory,
            resolver_rule::ResolverResult,
        },
        types::RowField,
    },
};

#[derive(Debug, Clone)]
pub struct ResolutionContext {
    input_fields: Vec<RowField>,
    case_sensitive: bool,
    active_pass: Option<Pass>,
    post_resolution_factory: PostResolutionFactory,
}

impl ResolutionContext {
    pub fn new(input_fields: Vec<RowField>, config: &ResolverConfig) -> Self {
        ResolutionContext {
            input_fields,
            case_sensitive: config.case_sensitive,
            active_pass: None,
            post_resolution_factory: PostResolutionFactory,
        }
    }

    pub fn post_resolution_factory(&self) -> &PostResolutionFactory {
        &self.post_resolution_factory
    }

    /// The pass the driver is currently running, `None` outside a run.
    pub fn active_pass(&self) -> Option<Pass> {
        self.active_pass
    }

    pub(crate) fn enter_pass(&mut self, pass: Pass) {
        self.active_pass = Some(pass);
    }

    pub(crate) fn leave_pass(&mut self) {
        self.active_pass = None;
    }

    pub fn input_fields(&self) -> &[RowField] {
        &self.input_fields
    }

    /// Find an input column by name, honoring case sensitivity.
    ///
    /// Ignoring case, an exact match still wins. Several columns that differ
    /// only in case and none matching exactly is an ambiguity error.
    pub fn lookup_field(&self, name: &str) -> ResolverResult<Option<(usize, &RowField)>> {
        let exact = self
            .input_fields
            .iter()
            .enumerate()
            .find(|(_, field)| field.name == name);
        if self.case_sensitive || exact.is_some() {
            return Ok(exact);
        }

        let candidates: Vec<(usize, &RowField)> = self
            .input_fields
            .iter()
            .enumerate()
            .filter(|(_, field)| field.name.eq_ignore_ascii_case(name))
            .collect();
        match candidates.as_slice() {
            [] => Ok(None),
            [single] => Ok(Some(*single)),
            _ => Err(ResolverError::AmbiguousField {
                pass: self.active_pass.unwrap_or(Pass::FieldResolve),
                name: name.to_string(),
                candidates: candidates
                    .iter()
                    .map(|(_, field)| field.name.clone())
                    .collect(),
            }),
        }
    }

    pub fn input_field_names(&self) -> Vec<String> {
        self.input_fields.iter().map(|f| f.name.clone()).collect()
    }
}
