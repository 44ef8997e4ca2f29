//! Unit tests for the flatten expansion pass
//!
//! Exercises the pass through its public rule interface, with hand-built
//! resolved children and no pipeline driver.

#[cfg(test)]
mod flatten_properties_tests {
    use projection_resolver::{
        config::ResolverConfig,
        query_planner::{
            logical_expr::{FunctionDefinition, Literal, LogicalExpr, ResolvedCall},
            resolver::{
                context::ResolutionContext,
                errors::{Pass, ResolverError},
                flatten_call::ResolveFlattenCall,
                resolver_rule::ResolverRule,
            },
            types::{DataType, RowField},
        },
    };
    use test_case::test_case;

    fn context() -> ResolutionContext {
        ResolutionContext::new(vec![], &ResolverConfig::default())
    }

    fn flatten(child: LogicalExpr) -> LogicalExpr {
        LogicalExpr::call(FunctionDefinition::Flatten, vec![child])
    }

    fn row_of(fields: &[(&str, DataType)]) -> LogicalExpr {
        LogicalExpr::resolved_field(
            "r",
            0,
            DataType::Row(
                fields
                    .iter()
                    .map(|(name, data_type)| RowField::new(*name, data_type.clone()))
                    .collect(),
            ),
        )
    }

    /// Field name and output type of a `get` accessor produced by the pass.
    fn accessor_parts(expr: &LogicalExpr) -> (String, DataType) {
        match expr {
            LogicalExpr::ResolvedCall(ResolvedCall {
                function: FunctionDefinition::Get,
                args,
                output_type,
            }) => match &args[1] {
                LogicalExpr::Literal(lit) => match &lit.value {
                    Literal::String(name) => (name.clone(), output_type.clone()),
                    other => panic!("expected string key, got {:?}", other),
                },
                other => panic!("expected literal key, got {:?}", other),
            },
            other => panic!("expected resolved get, got {:?}", other),
        }
    }

    #[test_case(0 ; "empty row vanishes")]
    #[test_case(1 ; "single field")]
    #[test_case(5 ; "five fields")]
    fn test_output_count_matches_arity(arity: usize) {
        let fields: Vec<(String, DataType)> =
            (0..arity).map(|i| (format!("f{}", i), DataType::Int)).collect();
        let borrowed: Vec<(&str, DataType)> =
            fields.iter().map(|(n, t)| (n.as_str(), t.clone())).collect();

        let result = ResolveFlattenCall
            .apply(&[flatten(row_of(&borrowed))], &context())
            .unwrap();
        assert_eq!(result.len(), arity);
        for (idx, expr) in result.iter().enumerate() {
            assert_eq!(accessor_parts(expr), (format!("f{}", idx), DataType::Int));
        }
    }

    #[test]
    fn test_accessors_follow_field_order_and_types() {
        let row = row_of(&[("b", DataType::String), ("a", DataType::Double)]);
        let result = ResolveFlattenCall.apply(&[flatten(row.clone())], &context()).unwrap();

        assert_eq!(
            result.iter().map(accessor_parts).collect::<Vec<_>>(),
            vec![
                ("b".to_string(), DataType::String),
                ("a".to_string(), DataType::Double)
            ]
        );
        for expr in &result {
            assert_eq!(expr.children()[0], row);
        }
    }

    #[test]
    fn test_nested_row_field_is_not_expanded_further() {
        let inner = DataType::Row(vec![RowField::new("x", DataType::Int)]);
        let row = row_of(&[("inner", inner.clone())]);
        let result = ResolveFlattenCall.apply(&[flatten(row)], &context()).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(accessor_parts(&result[0]), ("inner".to_string(), inner));
    }

    #[test]
    fn test_scalar_literal_child_is_unwrapped() {
        let lit = LogicalExpr::literal(Literal::Integer(3));
        let result = ResolveFlattenCall.apply(&[flatten(lit.clone())], &context()).unwrap();
        assert_eq!(result, vec![lit]);
    }

    #[test]
    fn test_error_produces_no_partial_output() {
        let exprs = vec![
            flatten(row_of(&[("a", DataType::Int)])),
            flatten(LogicalExpr::field("pending")),
        ];
        let err = ResolveFlattenCall.apply(&exprs, &context()).unwrap_err();
        assert_eq!(
            err,
            ResolverError::PipelineOrderingViolation {
                pass: Pass::FlattenCall,
                function: FunctionDefinition::Flatten,
                expression: "pending".to_string(),
            }
        );
    }

    #[test]
    fn test_ordering_violation_and_malformed_call_differ() {
        let ordering = ResolveFlattenCall
            .apply(&[flatten(LogicalExpr::field("pending"))], &context())
            .unwrap_err();
        let malformed = ResolveFlattenCall
            .apply(
                &[LogicalExpr::call(FunctionDefinition::Flatten, vec![])],
                &context(),
            )
            .unwrap_err();

        assert!(matches!(ordering, ResolverError::PipelineOrderingViolation { .. }));
        assert!(matches!(malformed, ResolverError::MalformedFlattenCall { .. }));
    }

    #[test]
    fn test_idempotent_on_expanded_output() {
        let exprs = vec![
            LogicalExpr::string("x"),
            flatten(row_of(&[("a", DataType::Int), ("b", DataType::Boolean)])),
            LogicalExpr::field("y"),
        ];
        let once = ResolveFlattenCall.apply(&exprs, &context()).unwrap();
        assert_eq!(once.len(), 4);
        assert_eq!(ResolveFlattenCall.apply(&once, &context()).unwrap(), once);
    }
}
