//! Type compatibility rules and diagnostic text
//!
//! Assignment compatibility and the shared wording for operand-type errors.
//! Arithmetic result types are value-driven and live with the evaluator;
//! this module only answers "may a value of type `source` be stored where
//! `target` is declared".

use super::type_def::TypeSpec;

/// Assignment compatibility between a declared type and a value's type.
pub fn is_assignable(target: &TypeSpec, source: &TypeSpec) -> bool {
    match (target, source) {
        // number and float coerce both ways
        (TypeSpec::Number, TypeSpec::Number | TypeSpec::Float) => true,
        (TypeSpec::Float, TypeSpec::Number | TypeSpec::Float) => true,
        (TypeSpec::Boolean, TypeSpec::Boolean) => true,
        (TypeSpec::Str, TypeSpec::Str) => true,
        (TypeSpec::Char, TypeSpec::Char) => true,
        (TypeSpec::Null, TypeSpec::Null) => true,
        (TypeSpec::Undefined, TypeSpec::Undefined) => true,
        // arrays accept null; matrices additionally require matching depth
        (TypeSpec::Array { .. }, TypeSpec::Null) => true,
        (
            TypeSpec::Array {
                base: target_base,
                dims: target_dims,
            },
            TypeSpec::Array {
                base: source_base,
                dims: source_dims,
            },
        ) => {
            if *target_dims == 1 && *source_dims == 1 {
                target_base == source_base
            } else {
                target_base == source_base && target_dims == source_dims
            }
        }
        (TypeSpec::Interface { name: target_name }, TypeSpec::Interface { name: source_name }) => {
            target_name == source_name
        }
        _ => false,
    }
}

/// `OLC1155` wording for an incompatible assignment
pub fn assignment_mismatch(source: &TypeSpec, target: &TypeSpec) -> String {
    format!(
        "type '{}' cannot be assign to type '{}'",
        source.render(),
        target.render()
    )
}

/// `TypeError` wording for an operator applied to unsupported operand types
pub fn unsupported_operands(op: &str, left: &TypeSpec, right: &TypeSpec) -> String {
    format!(
        "unsupported operand type(s) for '{}': '{}' and '{}'",
        op,
        left.render(),
        right.render()
    )
}
