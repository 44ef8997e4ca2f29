//! Expression trees handed between resolver passes.
//!
//! Expressions are immutable value trees. A pass never mutates a node it was
//! given; it builds new nodes and returns a new sequence.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::query_planner::types::DataType;

pub mod visitors;

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum LogicalExpr {
    /// A typed literal value. Literals are always resolved.
    Literal(ValueLiteral),

    /// Reference to a column of the input, resolved once its position and type are known.
    FieldRef(FieldReference),

    /// A call as written by the user, before its output type is known.
    UnresolvedCall(UnresolvedCall),

    /// A call whose output type has been computed.
    ResolvedCall(ResolvedCall),
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum Literal {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(String),
    Null,
}

impl Literal {
    pub fn data_type(&self) -> DataType {
        match self {
            Literal::Integer(_) => DataType::BigInt,
            Literal::Float(_) => DataType::Double,
            Literal::Boolean(_) => DataType::Boolean,
            Literal::String(_) => DataType::String,
            Literal::Null => DataType::Null,
        }
    }
}

/// A literal and its type. The type always follows from the value; input that
/// declares a different one is rejected.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(try_from = "LiteralInput")]
pub struct ValueLiteral {
    pub value: Literal,
    pub data_type: DataType,
}

impl ValueLiteral {
    pub fn new(value: Literal) -> Self {
        let data_type = value.data_type();
        ValueLiteral { value, data_type }
    }
}

#[derive(Deserialize)]
struct LiteralInput {
    value: Literal,
    #[serde(default)]
    data_type: Option<DataType>,
}

impl TryFrom<LiteralInput> for ValueLiteral {
    type Error = String;

    fn try_from(input: LiteralInput) -> Result<Self, Self::Error> {
        let literal = ValueLiteral::new(input.value);
        match input.data_type {
            Some(declared) if declared != literal.data_type => Err(format!(
                "literal {} has type {}, not {}",
                literal.value, literal.data_type, declared
            )),
            _ => Ok(literal),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct FieldReference {
    pub name: String,
    /// Position and type in the input, attached by field resolution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved: Option<ResolvedField>,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct ResolvedField {
    pub input_index: usize,
    pub data_type: DataType,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct UnresolvedCall {
    pub function: FunctionDefinition,
    pub args: Vec<LogicalExpr>,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct ResolvedCall {
    pub function: FunctionDefinition,
    pub args: Vec<LogicalExpr>,
    pub output_type: DataType,
}

/// Built-in functions a call can refer to.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum FunctionDefinition {
    /// Expand a composite value into one column per field
    Flatten,
    /// Positional field access on a composite value: `get(row, 'name')`
    Get,
    As,
    Plus,
    Minus,
    Times,
    Divide,
    Equals,
    NotEquals,
    LessThan,
    GreaterThan,
    And,
    Or,
    Not,
    IsNull,
    IsNotNull,
    Upper,
    Lower,
    Concat,
}

impl fmt::Display for FunctionDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FunctionDefinition::Flatten => "flatten",
            FunctionDefinition::Get => "get",
            FunctionDefinition::As => "as",
            FunctionDefinition::Plus => "plus",
            FunctionDefinition::Minus => "minus",
            FunctionDefinition::Times => "times",
            FunctionDefinition::Divide => "divide",
            FunctionDefinition::Equals => "equals",
            FunctionDefinition::NotEquals => "notEquals",
            FunctionDefinition::LessThan => "lessThan",
            FunctionDefinition::GreaterThan => "greaterThan",
            FunctionDefinition::And => "and",
            FunctionDefinition::Or => "or",
            FunctionDefinition::Not => "not",
            FunctionDefinition::IsNull => "isNull",
            FunctionDefinition::IsNotNull => "isNotNull",
            FunctionDefinition::Upper => "upper",
            FunctionDefinition::Lower => "lower",
            FunctionDefinition::Concat => "concat",
        };
        f.write_str(name)
    }
}

impl LogicalExpr {
    pub fn literal(value: Literal) -> Self {
        LogicalExpr::Literal(ValueLiteral::new(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::literal(Literal::String(value.into()))
    }

    /// An unresolved reference to an input column.
    pub fn field(name: impl Into<String>) -> Self {
        LogicalExpr::FieldRef(FieldReference {
            name: name.into(),
            resolved: None,
        })
    }

    pub fn resolved_field(name: impl Into<String>, input_index: usize, data_type: DataType) -> Self {
        LogicalExpr::FieldRef(FieldReference {
            name: name.into(),
            resolved: Some(ResolvedField {
                input_index,
                data_type,
            }),
        })
    }

    pub fn call(function: FunctionDefinition, args: Vec<LogicalExpr>) -> Self {
        LogicalExpr::UnresolvedCall(UnresolvedCall { function, args })
    }

    /// The attached output type, `None` while the expression is unresolved.
    pub fn output_type(&self) -> Option<&DataType> {
        match self {
            LogicalExpr::Literal(lit) => Some(&lit.data_type),
            LogicalExpr::FieldRef(field) => field.resolved.as_ref().map(|r| &r.data_type),
            LogicalExpr::UnresolvedCall(_) => None,
            LogicalExpr::ResolvedCall(call) => Some(&call.output_type),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.output_type().is_some()
    }

    pub fn children(&self) -> &[LogicalExpr] {
        match self {
            LogicalExpr::UnresolvedCall(call) => &call.args,
            LogicalExpr::ResolvedCall(call) => &call.args,
            LogicalExpr::Literal(_) | LogicalExpr::FieldRef(_) => &[],
        }
    }

    /// True if this is an unresolved call to `function`.
    pub fn is_unresolved_call_to(&self, function: FunctionDefinition) -> bool {
        matches!(self, LogicalExpr::UnresolvedCall(call) if call.function == function)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Integer(i) => write!(f, "{}", i),
            Literal::Float(v) => write!(f, "{}", v),
            Literal::Boolean(b) => write!(f, "{}", b),
            Literal::String(s) => write!(f, "'{}'", s),
            Literal::Null => f.write_str("NULL"),
        }
    }
}

fn write_call(f: &mut fmt::Formatter<'_>, function: &FunctionDefinition, args: &[LogicalExpr]) -> fmt::Result {
    write!(f, "{}(", function)?;
    for (idx, arg) in args.iter().enumerate() {
        if idx > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", arg)?;
    }
    f.write_str(")")
}

impl fmt::Display for LogicalExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalExpr::Literal(lit) => write!(f, "{}", lit.value),
            LogicalExpr::FieldRef(field) => f.write_str(&field.name),
            LogicalExpr::UnresolvedCall(call) => write_call(f, &call.function, &call.args),
            LogicalExpr::ResolvedCall(call) => write_call(f, &call.function, &call.args),
        }
    }
}
