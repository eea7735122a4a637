//! Type model for OLCScript
//!
//! `TypeSpec` is the resolved form of a type annotation. Arrays carry their
//! base type name and dimension count; a single `Array` shape covers both
//! one-dimensional arrays and higher-dimensional matrices.

use std::collections::HashMap;

use crate::parser::TypeAnnotation;

/// A fully resolved OLCScript type
#[derive(Debug, Clone, PartialEq)]
pub enum TypeSpec {
    Number,
    Float,
    Boolean,
    Str,
    Char,
    Null,
    Undefined,
    Array { base: String, dims: usize },
    Interface { name: String },
}

impl TypeSpec {
    /// Type name as it appears in diagnostics and `typeof`
    pub fn render(&self) -> String {
        match self {
            Self::Number => "number".to_string(),
            Self::Float => "float".to_string(),
            Self::Boolean => "boolean".to_string(),
            Self::Str => "string".to_string(),
            Self::Char => "char".to_string(),
            Self::Null => "null".to_string(),
            Self::Undefined => "undefined".to_string(),
            Self::Array { base, dims } => format!("{}{}", base, "[]".repeat(*dims)),
            Self::Interface { name } => name.clone(),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Number | Self::Float)
    }
}

impl std::fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}

/// Interface definitions for a single run. A fresh registry is created per
/// evaluation so state never leaks between runs.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    interfaces: HashMap<String, Vec<(String, TypeSpec)>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an interface, replacing any previous definition of the
    /// same name. Returns false when a definition was replaced.
    pub fn define_interface(&mut self, name: &str, fields: Vec<(String, TypeSpec)>) -> bool {
        self.interfaces.insert(name.to_string(), fields).is_none()
    }

    pub fn interface_fields(&self, name: &str) -> Option<&[(String, TypeSpec)]> {
        self.interfaces.get(name).map(|f| f.as_slice())
    }

    pub fn has_interface(&self, name: &str) -> bool {
        self.interfaces.contains_key(name)
    }

    /// Resolve a syntactic annotation against the known type names. The
    /// error carries the unresolved name so the caller can attach a
    /// location.
    pub fn resolve(&self, annotation: &TypeAnnotation) -> Result<TypeSpec, String> {
        if annotation.dims > 0 {
            if !self.is_known_name(&annotation.name) {
                return Err(annotation.name.clone());
            }
            return Ok(TypeSpec::Array {
                base: annotation.name.clone(),
                dims: annotation.dims,
            });
        }

        match annotation.name.as_str() {
            "number" => Ok(TypeSpec::Number),
            "float" => Ok(TypeSpec::Float),
            "boolean" => Ok(TypeSpec::Boolean),
            "string" => Ok(TypeSpec::Str),
            "char" => Ok(TypeSpec::Char),
            name if self.has_interface(name) => Ok(TypeSpec::Interface {
                name: name.to_string(),
            }),
            _ => Err(annotation.name.clone()),
        }
    }

    fn is_known_name(&self, name: &str) -> bool {
        matches!(name, "number" | "float" | "boolean" | "string" | "char")
            || self.has_interface(name)
    }
}
