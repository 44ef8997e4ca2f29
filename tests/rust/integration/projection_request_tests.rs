//! Integration tests for resolving projection requests
//!
//! Requests are written the way the command line tool reads them (YAML and
//! JSON) and run through the full pass sequence.

#[cfg(test)]
mod projection_request_tests {
    use projection_resolver::{
        config::ResolverConfig,
        query_planner::{
            evaluate_projection,
            logical_expr::{FunctionDefinition, LogicalExpr},
            resolver::{errors::ResolverError, ExpressionResolver},
            types::{DataType, RowField},
            ProjectionRequest,
        },
    };

    const ORDERS_YAML: &str = r#"
schema:
  - name: order_id
    data_type: BigInt
  - name: customer
    data_type: !Row
      - name: name
        data_type: String
      - name: tier
        data_type: Int
  - name: amount
    data_type: Double
expressions:
  - !FieldRef
    name: order_id
  - !UnresolvedCall
    function: Flatten
    args:
      - !FieldRef
        name: customer
  - !UnresolvedCall
    function: Upper
    args:
      - !UnresolvedCall
        function: Get
        args:
          - !FieldRef
            name: customer
          - !Literal
            value: !String name
            data_type: String
"#;

    fn parse(yaml: &str) -> ProjectionRequest {
        serde_yaml::from_str(yaml).expect("request should parse")
    }

    #[test]
    fn test_yaml_request_resolves() -> anyhow::Result<()> {
        let request = parse(ORDERS_YAML);
        let resolved = evaluate_projection(&request, ResolverConfig::default())?;

        let types: Vec<_> = resolved.iter().map(|e| e.output_type().cloned()).collect();
        assert_eq!(
            types,
            vec![
                Some(DataType::BigInt),
                Some(DataType::String),
                Some(DataType::Int),
                Some(DataType::String),
            ]
        );
        assert_eq!(resolved[1].to_string(), "get(customer, 'name')");
        assert_eq!(resolved[2].to_string(), "get(customer, 'tier')");
        assert_eq!(resolved[3].to_string(), "upper(get(customer, 'name'))");
        Ok(())
    }

    #[test]
    fn test_resolved_output_serializes_to_json_and_back() -> anyhow::Result<()> {
        let request = parse(ORDERS_YAML);
        let resolved = evaluate_projection(&request, ResolverConfig::default())?;

        let json = serde_json::to_string(&resolved)?;
        let decoded: Vec<LogicalExpr> = serde_json::from_str(&json)?;
        assert_eq!(decoded, resolved);

        // Already resolved input goes through the passes untouched.
        let again = ExpressionResolver::default().resolve(&decoded, &request.schema)?;
        assert_eq!(again, resolved);
        Ok(())
    }

    #[test]
    fn test_json_request() -> anyhow::Result<()> {
        let json = r#"{
            "schema": [{"name": "point", "data_type": {"Row": [
                {"name": "x", "data_type": "Double"},
                {"name": "y", "data_type": "Double"}
            ]}}],
            "expressions": [
                {"UnresolvedCall": {"function": "Flatten", "args": [{"FieldRef": {"name": "point"}}]}}
            ]
        }"#;
        let request: ProjectionRequest = serde_json::from_str(json)?;
        let resolved = evaluate_projection(&request, ResolverConfig::default())?;
        assert_eq!(resolved.len(), 2);
        assert!(resolved
            .iter()
            .all(|e| e.output_type() == Some(&DataType::Double)));
        Ok(())
    }

    #[test]
    fn test_case_insensitive_request() {
        let request = ProjectionRequest {
            schema: vec![RowField::new("Amount", DataType::Double)],
            expressions: vec![LogicalExpr::field("amount")],
        };
        assert!(matches!(
            evaluate_projection(&request, ResolverConfig::default()),
            Err(ResolverError::FieldNotFound { .. })
        ));

        let config = ResolverConfig {
            case_sensitive: false,
            ..Default::default()
        };
        let resolved = evaluate_projection(&request, config).unwrap();
        assert_eq!(
            resolved,
            vec![LogicalExpr::resolved_field("Amount", 0, DataType::Double)]
        );
    }

    #[test]
    fn test_flatten_of_empty_row_in_request() {
        let request = ProjectionRequest {
            schema: vec![
                RowField::new("id", DataType::BigInt),
                RowField::new("nothing", DataType::Row(vec![])),
            ],
            expressions: vec![
                LogicalExpr::call(FunctionDefinition::Flatten, vec![LogicalExpr::field("nothing")]),
                LogicalExpr::field("id"),
            ],
        };
        let resolved = evaluate_projection(&request, ResolverConfig::default()).unwrap();
        assert_eq!(
            resolved,
            vec![LogicalExpr::resolved_field("id", 0, DataType::BigInt)]
        );
    }

    #[test]
    fn test_wide_flatten_hits_width_limit() {
        let fields = (0..10)
            .map(|i| RowField::new(format!("c{}", i), DataType::Int))
            .collect();
        let request = ProjectionRequest {
            schema: vec![RowField::new("wide", DataType::Row(fields))],
            expressions: vec![LogicalExpr::call(
                FunctionDefinition::Flatten,
                vec![LogicalExpr::field("wide")],
            )],
        };
        let config = ResolverConfig {
            max_projection_width: 8,
            ..Default::default()
        };
        let err = evaluate_projection(&request, config).unwrap_err();
        assert_eq!(err, ResolverError::ProjectionTooWide { width: 10, max: 8 });
        assert!(!err.is_internal());
    }

    #[test]
    fn test_flatten_of_nested_row_field() -> anyhow::Result<()> {
        let yaml = r#"
schema:
  - name: person
    data_type: !Row
      - name: name
        data_type: String
      - name: address
        data_type: !Row
          - name: city
            data_type: String
          - name: zip
            data_type: Int
expressions:
  - !UnresolvedCall
    function: Flatten
    args:
      - !UnresolvedCall
        function: Get
        args:
          - !FieldRef
            name: person
          - !Literal
            value: !String address
"#;
        let resolved = evaluate_projection(&parse(yaml), ResolverConfig::default())?;
        let rendered: Vec<_> = resolved.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec![
                "get(get(person, 'address'), 'city')",
                "get(get(person, 'address'), 'zip')",
            ]
        );
        assert_eq!(resolved[1].output_type(), Some(&DataType::Int));
        Ok(())
    }
}
