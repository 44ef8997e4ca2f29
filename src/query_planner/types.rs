//! Data types attached to resolved expressions.
//!
//! A [`DataType::Row`] is the only composite type: an ordered list of named
//! fields. Field order is positional and must be preserved by every consumer.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum DataType {
    Null,
    Boolean,
    TinyInt,
    SmallInt,
    Int,
    BigInt,
    Float,
    Double,
    String,
    Date,
    Timestamp,
    Array(Box<DataType>),
    /// Structured type with named, ordered fields (e.g. `ROW<city STRING, zip INT>`)
    Row(Vec<RowField>),
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct RowField {
    pub name: String,
    pub data_type: DataType,
}

impl RowField {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        RowField {
            name: name.into(),
            data_type,
        }
    }
}

impl DataType {
    pub fn is_composite(&self) -> bool {
        matches!(self, DataType::Row(_))
    }

    /// Ordered fields of a composite type, `None` for everything else.
    pub fn fields(&self) -> Option<&[RowField]> {
        match self {
            DataType::Row(fields) => Some(fields),
            _ => None,
        }
    }

    /// Number of fields of a composite type; scalars have arity 0.
    pub fn arity(&self) -> usize {
        self.fields().map_or(0, <[RowField]>::len)
    }

    /// Look up a field of a composite type by name, returning its position.
    pub fn field(&self, name: &str) -> Option<(usize, &RowField)> {
        self.fields()?
            .iter()
            .enumerate()
            .find(|(_, field)| field.name == name)
    }

    pub fn is_numeric(&self) -> bool {
        self.numeric_rank().is_some()
    }

    /// Widening order used for arithmetic promotion.
    fn numeric_rank(&self) -> Option<u8> {
        match self {
            DataType::TinyInt => Some(0),
            DataType::SmallInt => Some(1),
            DataType::Int => Some(2),
            DataType::BigInt => Some(3),
            DataType::Float => Some(4),
            DataType::Double => Some(5),
            _ => None,
        }
    }

    /// The wider of two numeric types, `None` if either side is not numeric.
    pub fn promote_numeric(&self, other: &DataType) -> Option<DataType> {
        let lhs = self.numeric_rank()?;
        let rhs = other.numeric_rank()?;
        if lhs >= rhs {
            Some(self.clone())
        } else {
            Some(other.clone())
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Null => f.write_str("NULL"),
            DataType::Boolean => f.write_str("BOOLEAN"),
            DataType::TinyInt => f.write_str("TINYINT"),
            DataType::SmallInt => f.write_str("SMALLINT"),
            DataType::Int => f.write_str("INT"),
            DataType::BigInt => f.write_str("BIGINT"),
            DataType::Float => f.write_str("FLOAT"),
            DataType::Double => f.write_str("DOUBLE"),
            DataType::String => f.write_str("STRING"),
            DataType::Date => f.write_str("DATE"),
            DataType::Timestamp => f.write_str("TIMESTAMP"),
            DataType::Array(element) => write!(f, "ARRAY<{}>", element),
            DataType::Row(fields) => {
                f.write_str("ROW<")?;
                for (idx, field) in fields.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{} {}", field.name, field.data_type)?;
                }
                f.write_str(">")
            }
        }
    }
}
