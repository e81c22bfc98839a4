//! Structural equality over [`Value`].

use crate::value::Value;

/// Outcome of comparing two values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    Equal,
    NotEqual,
    TypesDiffer { left: String, right: String },
    Unsupported { type_name: String },
}

impl Comparison {
    pub fn is_equal(&self) -> bool {
        matches!(self, Comparison::Equal)
    }
}

/// Compares two values. The rules apply in order, at every nesting level:
///
/// 1. both absent: equal
/// 2. one absent: equal only if the other is an empty sequence
/// 3. different type names: `TypesDiffer` (top level only; nested types are fixed)
/// 4. shared pointers to the same allocation: equal, without looking inside
/// 5. an opaque value reached by the walk: `Unsupported`
/// 6. otherwise structural comparison, bytes compared byte for byte
///
/// `Unsupported` wins over `NotEqual`: a walk that finds a difference keeps
/// going in case an opaque value is still ahead.
pub fn compare(left: &Value, right: &Value) -> Comparison {
    if !left.is_nil() && !right.is_nil() {
        let (left_ty, right_ty) = (left.type_name(), right.type_name());
        if left_ty != right_ty {
            return Comparison::TypesDiffer {
                left: left_ty,
                right: right_ty,
            };
        }
    }
    walk(left, right)
}

fn walk(left: &Value, right: &Value) -> Comparison {
    match (left, right) {
        (Value::Nil, Value::Nil) => Comparison::Equal,
        (Value::Nil, other) | (other, Value::Nil) => equal_if(other.is_empty_sequence()),
        (
            Value::Ref {
                addr: a, target: x, ..
            },
            Value::Ref {
                addr: b, target: y, ..
            },
        ) => {
            if a == b {
                Comparison::Equal
            } else {
                walk(x, y)
            }
        }
        (Value::Opaque { ty }, _) | (_, Value::Opaque { ty }) => Comparison::Unsupported {
            type_name: ty.clone(),
        },
        (Value::Bool(a), Value::Bool(b)) => equal_if(a == b),
        (Value::Int { kind: ka, value: a }, Value::Int { kind: kb, value: b }) => {
            equal_if(ka == kb && a == b)
        }
        (Value::Uint { kind: ka, value: a }, Value::Uint { kind: kb, value: b }) => {
            equal_if(ka == kb && a == b)
        }
        (Value::Float { kind: ka, value: a }, Value::Float { kind: kb, value: b }) => {
            equal_if(ka == kb && a == b)
        }
        (Value::Char(a), Value::Char(b)) => equal_if(a == b),
        (Value::Str(a), Value::Str(b)) => equal_if(a == b),
        (Value::Bytes(a), Value::Bytes(b)) => equal_if(a == b),
        (Value::List { items: a, .. }, Value::List { items: b, .. })
        | (Value::Tuple { items: a, .. }, Value::Tuple { items: b, .. })
            if a.len() == b.len() =>
        {
            all_equal(a.iter().zip(b))
        }
        (Value::Map { entries: a, .. }, Value::Map { entries: b, .. }) if a.len() == b.len() => {
            all_equal(
                a.iter()
                    .zip(b)
                    .flat_map(|((ka, va), (kb, vb))| [(ka, kb), (va, vb)]),
            )
        }
        (
            Value::Struct {
                ty: ta, fields: fa, ..
            },
            Value::Struct {
                ty: tb, fields: fb, ..
            },
        ) if ta == tb
            && fa.len() == fb.len()
            && fa.iter().zip(fb).all(|((a, _), (b, _))| a == b) =>
        {
            all_equal(fa.iter().zip(fb).map(|((_, x), (_, y))| (x, y)))
        }
        _ => differ(left, right),
    }
}

fn equal_if(same: bool) -> Comparison {
    if same {
        Comparison::Equal
    } else {
        Comparison::NotEqual
    }
}

/// Folds child outcomes: the first `Unsupported` ends the walk, any `NotEqual`
/// sticks.
fn all_equal<'a>(pairs: impl Iterator<Item = (&'a Value, &'a Value)>) -> Comparison {
    let mut outcome = Comparison::Equal;
    for (x, y) in pairs {
        match walk(x, y) {
            Comparison::Equal => {}
            unsupported @ Comparison::Unsupported { .. } => return unsupported,
            _ => outcome = Comparison::NotEqual,
        }
    }
    outcome
}

/// Shapes that cannot be paired up are unequal, unless either side holds an
/// opaque value.
fn differ(left: &Value, right: &Value) -> Comparison {
    match left.find_opaque().or_else(|| right.find_opaque()) {
        Some(type_name) => Comparison::Unsupported { type_name },
        None => Comparison::NotEqual,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Opaque, Reflect};
    use std::rc::Rc;

    #[test]
    fn test_nil_against_empty_and_non_empty() {
        let none: Option<Vec<u8>> = None;
        assert_eq!(compare(&none.reflect(), &Vec::<u8>::new().reflect()), Comparison::Equal);
        assert_eq!(compare(&none.reflect(), &vec![1u8].reflect()), Comparison::NotEqual);
        assert_eq!(compare(&none.reflect(), &0i32.reflect()), Comparison::NotEqual);
    }

    #[test]
    fn test_integer_widths_are_distinct_types() {
        assert_eq!(
            compare(&1i32.reflect(), &1i64.reflect()),
            Comparison::TypesDiffer {
                left: "i32".to_string(),
                right: "i64".to_string()
            }
        );
    }

    #[test]
    fn test_nested_none_matches_nested_empty() {
        let a: Vec<Option<Vec<i32>>> = vec![None];
        let b: Vec<Option<Vec<i32>>> = vec![Some(vec![])];
        assert!(compare(&a.reflect(), &b.reflect()).is_equal());
    }

    #[test]
    fn test_distinct_rc_compare_by_content() {
        let a = Rc::new(5u32);
        let b = Rc::new(5u32);
        assert!(compare(&a.reflect(), &b.reflect()).is_equal());
        assert!(!compare(&a.reflect(), &Rc::new(6u32).reflect()).is_equal());
    }

    #[test]
    fn test_nested_shared_allocation_is_equal() {
        let shared = Rc::new(Opaque(1u8));
        let left = vec![Rc::clone(&shared)];
        let right = vec![Rc::clone(&shared)];
        assert_eq!(compare(&left.reflect(), &right.reflect()), Comparison::Equal);

        let other = vec![Rc::new(Opaque(1u8))];
        assert_eq!(
            compare(&left.reflect(), &other.reflect()),
            Comparison::Unsupported {
                type_name: "u8".to_string()
            }
        );
    }

    #[test]
    fn test_opaque_after_a_difference_is_unsupported() {
        let left = (1u8, Opaque(()));
        let right = (2u8, Opaque(()));
        assert!(matches!(
            compare(&left.reflect(), &right.reflect()),
            Comparison::Unsupported { .. }
        ));
    }
}
