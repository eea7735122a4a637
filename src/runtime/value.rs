//! Runtime value model
//!
//! Every expression evaluates to a `Value`. Numbers keep separate integer
//! and float payloads; arrays carry their base type name and dimension
//! count so assignment checks can run against declared types.

use crate::types::TypeSpec;

/// A runtime value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(i64),
    Float(f64),
    Str(String),
    Boolean(bool),
    Char(char),
    Null,
    Undefined,
    Array(ArrayValue),
    Interface(InterfaceValue),
}

/// An array or matrix value
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayValue {
    pub elements: Vec<Value>,
    pub base: String,
    pub dims: usize,
}

/// An interface (record) value. `type_name` is stamped when the value is
/// checked against a declared interface type; a fresh literal has none.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceValue {
    pub type_name: Option<String>,
    pub fields: Vec<(String, Value)>,
}

impl InterfaceValue {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    pub fn set(&mut self, field: &str, value: Value) -> bool {
        for (name, slot) in &mut self.fields {
            if name == field {
                *slot = value;
                return true;
            }
        }
        false
    }
}

impl Value {
    /// The value's type as seen by `typeof` and the assignment checks
    pub fn type_spec(&self) -> TypeSpec {
        match self {
            Self::Number(_) => TypeSpec::Number,
            Self::Float(_) => TypeSpec::Float,
            Self::Str(_) => TypeSpec::Str,
            Self::Boolean(_) => TypeSpec::Boolean,
            Self::Char(_) => TypeSpec::Char,
            Self::Null => TypeSpec::Null,
            Self::Undefined => TypeSpec::Undefined,
            Self::Array(array) => TypeSpec::Array {
                base: array.base.clone(),
                dims: array.dims,
            },
            Self::Interface(interface) => TypeSpec::Interface {
                name: interface
                    .type_name
                    .clone()
                    .unwrap_or_else(|| "interface".to_string()),
            },
        }
    }

    /// Plain rendering, used by `console.log` and string concatenation.
    /// Floats with an integral value keep a trailing `.0`.
    pub fn display(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Float(f) => render_float(*f),
            Self::Str(s) => s.clone(),
            Self::Boolean(b) => if *b { "true" } else { "false" }.to_string(),
            Self::Char(c) => c.to_string(),
            Self::Null => "null".to_string(),
            Self::Undefined => "undefined".to_string(),
            Self::Array(_) => self.repr(),
            Self::Interface(interface) => {
                let mut buffer = String::from("{ ");
                for (name, value) in &interface.fields {
                    buffer.push_str(name);
                    buffer.push_str(": '");
                    buffer.push_str(&value.display());
                    buffer.push_str("', ");
                }
                buffer.push_str(" }");
                buffer
            }
        }
    }

    /// Quoted rendering, used inside array listings and by `toString`
    pub fn repr(&self) -> String {
        match self {
            Self::Str(s) => format!("'{}'", s),
            Self::Char(c) => format!("'{}'", c),
            Self::Array(array) => {
                let items: Vec<String> = array.elements.iter().map(|e| e.repr()).collect();
                format!("[{}]", items.join(", "))
            }
            Self::Interface(interface) => {
                let fields: Vec<String> = interface
                    .fields
                    .iter()
                    .map(|(name, value)| format!("{}: '{}'", name, value.display()))
                    .collect();
                format!("{{ {} }}", fields.join(", "))
            }
            _ => self.display(),
        }
    }

    /// Numeric payload widened to float, when the value is numeric
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }
}

fn render_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 {
        format!("{:.1}", f)
    } else {
        format!("{}", f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn number_array(elements: Vec<Value>) -> Value {
        Value::Array(ArrayValue {
            elements,
            base: "number".to_string(),
            dims: 1,
        })
    }

    #[test]
    fn test_display_scalars() {
        assert_eq!(Value::Number(5).display(), "5");
        assert_eq!(Value::Float(5.0).display(), "5.0");
        assert_eq!(Value::Float(2.5).display(), "2.5");
        assert_eq!(Value::Boolean(true).display(), "true");
        assert_eq!(Value::Str("hi".to_string()).display(), "hi");
        assert_eq!(Value::Char('a').display(), "a");
        assert_eq!(Value::Null.display(), "null");
        assert_eq!(Value::Undefined.display(), "undefined");
    }

    #[test]
    fn test_repr_quotes_text() {
        assert_eq!(Value::Str("hi".to_string()).repr(), "'hi'");
        assert_eq!(Value::Char('a').repr(), "'a'");
        assert_eq!(Value::Number(5).repr(), "5");
    }

    #[test]
    fn test_array_rendering_uses_repr() {
        let array = Value::Array(ArrayValue {
            elements: vec![
                Value::Str("a".to_string()),
                Value::Str("b".to_string()),
            ],
            base: "string".to_string(),
            dims: 1,
        });
        assert_eq!(array.display(), "['a', 'b']");
        assert_eq!(number_array(vec![Value::Number(1), Value::Number(2)]).display(), "[1, 2]");
    }

    #[test]
    fn test_interface_rendering() {
        let value = Value::Interface(InterfaceValue {
            type_name: Some("Point".to_string()),
            fields: vec![
                ("x".to_string(), Value::Number(1)),
                ("y".to_string(), Value::Number(2)),
            ],
        });
        assert_eq!(value.display(), "{ x: '1', y: '2',  }");
        assert_eq!(value.repr(), "{ x: '1', y: '2' }");
    }

    #[test]
    fn test_type_spec() {
        assert_eq!(Value::Number(1).type_spec(), TypeSpec::Number);
        assert_eq!(
            number_array(vec![]).type_spec(),
            TypeSpec::Array {
                base: "number".to_string(),
                dims: 1
            }
        );
    }
}
