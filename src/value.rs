use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;
use std::sync::Arc;

use crate::repr::repr_value;

/// Width of an integer value, kept so `1i32` and `1i64` stay distinct types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntKind {
    I8,
    I16,
    I32,
    I64,
    I128,
    Isize,
    U8,
    U16,
    U32,
    U64,
    U128,
    Usize,
}

impl IntKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntKind::I8 => "i8",
            IntKind::I16 => "i16",
            IntKind::I32 => "i32",
            IntKind::I64 => "i64",
            IntKind::I128 => "i128",
            IntKind::Isize => "isize",
            IntKind::U8 => "u8",
            IntKind::U16 => "u16",
            IntKind::U32 => "u32",
            IntKind::U64 => "u64",
            IntKind::U128 => "u128",
            IntKind::Usize => "usize",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatKind {
    F32,
    F64,
}

impl FloatKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FloatKind::F32 => "f32",
            FloatKind::F64 => "f64",
        }
    }
}

/// A value lowered into the closed set of shapes the equality checker and the
/// formatter understand.
///
/// # Examples
///
/// ```rust
/// use testutil::{Reflect, Value};
/// assert_eq!(42i32.reflect().type_name(), "i32");
/// assert_eq!(vec![1u8, 2].reflect().type_name(), "[u8]");
/// assert_eq!(vec!["a"].reflect().type_name(), "[String]");
/// assert!(Option::<i32>::None.reflect().is_nil());
/// ```
#[derive(Debug, Clone)]
pub enum Value {
    /// An absent value (`None`).
    Nil,
    Bool(bool),
    Int {
        kind: IntKind,
        value: i128,
    },
    Uint {
        kind: IntKind,
        value: u128,
    },
    Float {
        kind: FloatKind,
        value: f64,
    },
    Char(char),
    Str(String),
    Bytes(Vec<u8>),
    List {
        ty: String,
        items: Vec<Value>,
    },
    /// Entries are kept sorted by the representation of their keys.
    Map {
        ty: String,
        entries: Vec<(Value, Value)>,
    },
    Tuple {
        ty: String,
        items: Vec<Value>,
    },
    /// `ty` is the full type path and decides identity; `name` is for display.
    Struct {
        ty: String,
        name: String,
        fields: Vec<(String, Value)>,
    },
    /// A shared pointer (`Rc`, `Arc`); `addr` identifies the allocation.
    Ref {
        ty: String,
        addr: usize,
        target: Box<Value>,
    },
    /// A value that has no defined comparison.
    Opaque {
        ty: String,
    },
}

impl Value {
    /// Returns the dynamic type name used for type-mismatch checks.
    pub fn type_name(&self) -> String {
        match self {
            Value::Nil => "None".to_string(),
            Value::Bool(_) => "bool".to_string(),
            Value::Int { kind, .. } | Value::Uint { kind, .. } => kind.as_str().to_string(),
            Value::Float { kind, .. } => kind.as_str().to_string(),
            Value::Char(_) => "char".to_string(),
            Value::Str(_) => "String".to_string(),
            Value::Bytes(_) => "[u8]".to_string(),
            Value::List { ty, .. }
            | Value::Map { ty, .. }
            | Value::Tuple { ty, .. }
            | Value::Ref { ty, .. }
            | Value::Struct { ty, .. }
            | Value::Opaque { ty } => ty.clone(),
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// True for sequences with no elements; these compare equal to `Nil`.
    pub fn is_empty_sequence(&self) -> bool {
        match self {
            Value::Str(s) => s.is_empty(),
            Value::Bytes(b) => b.is_empty(),
            Value::List { items, .. } | Value::Tuple { items, .. } => items.is_empty(),
            Value::Map { entries, .. } => entries.is_empty(),
            _ => false,
        }
    }

    /// Returns the type name of the first opaque value found, depth first.
    pub fn find_opaque(&self) -> Option<String> {
        match self {
            Value::Opaque { ty } => Some(ty.clone()),
            Value::List { items, .. } | Value::Tuple { items, .. } => {
                items.iter().find_map(Value::find_opaque)
            }
            Value::Map { entries, .. } => entries
                .iter()
                .find_map(|(k, v)| k.find_opaque().or_else(|| v.find_opaque())),
            Value::Struct { fields, .. } => fields.iter().find_map(|(_, v)| v.find_opaque()),
            Value::Ref { target, .. } => target.find_opaque(),
            _ => None,
        }
    }

    /// Builds a map value, sorting entries by key representation.
    pub fn map(ty: String, mut entries: Vec<(Value, Value)>) -> Value {
        entries.sort_by_cached_key(|(key, _)| repr_value(key));
        Value::Map { ty, entries }
    }
}

// ============================================================================
// REFLECT: lowering Rust values into `Value`
// ============================================================================

/// Lowers a Rust value into a [`Value`].
///
/// Implemented for primitives, text, byte buffers, `Option`, sequences, maps,
/// tuples and smart pointers. Structs use [`reflect_struct!`](crate::reflect_struct).
pub trait Reflect {
    /// Static type label, used where no instance is available (empty containers).
    fn type_label() -> String;

    fn reflect(&self) -> Value;

    /// Lowers a slice of `Self`. Overridden by `u8` so byte buffers become `Value::Bytes`.
    #[doc(hidden)]
    fn reflect_slice(items: &[Self]) -> Value
    where
        Self: Sized,
    {
        Value::List {
            ty: format!("[{}]", Self::type_label()),
            items: items.iter().map(Reflect::reflect).collect(),
        }
    }
}

macro_rules! reflect_int {
    ($($ty:ty => $kind:ident, $variant:ident, $wide:ty;)*) => {
        $(
            impl Reflect for $ty {
                fn type_label() -> String {
                    IntKind::$kind.as_str().to_string()
                }

                fn reflect(&self) -> Value {
                    Value::$variant {
                        kind: IntKind::$kind,
                        value: *self as $wide,
                    }
                }
            }
        )*
    };
}

reflect_int! {
    i8 => I8, Int, i128;
    i16 => I16, Int, i128;
    i32 => I32, Int, i128;
    i64 => I64, Int, i128;
    i128 => I128, Int, i128;
    isize => Isize, Int, i128;
    u16 => U16, Uint, u128;
    u32 => U32, Uint, u128;
    u64 => U64, Uint, u128;
    u128 => U128, Uint, u128;
    usize => Usize, Uint, u128;
}

impl Reflect for u8 {
    fn type_label() -> String {
        IntKind::U8.as_str().to_string()
    }

    fn reflect(&self) -> Value {
        Value::Uint {
            kind: IntKind::U8,
            value: *self as u128,
        }
    }

    fn reflect_slice(items: &[Self]) -> Value {
        Value::Bytes(items.to_vec())
    }
}

impl Reflect for f32 {
    fn type_label() -> String {
        FloatKind::F32.as_str().to_string()
    }

    fn reflect(&self) -> Value {
        Value::Float {
            kind: FloatKind::F32,
            value: *self as f64,
        }
    }
}

impl Reflect for f64 {
    fn type_label() -> String {
        FloatKind::F64.as_str().to_string()
    }

    fn reflect(&self) -> Value {
        Value::Float {
            kind: FloatKind::F64,
            value: *self,
        }
    }
}

impl Reflect for bool {
    fn type_label() -> String {
        "bool".to_string()
    }

    fn reflect(&self) -> Value {
        Value::Bool(*self)
    }
}

impl Reflect for char {
    fn type_label() -> String {
        "char".to_string()
    }

    fn reflect(&self) -> Value {
        Value::Char(*self)
    }
}

impl Reflect for str {
    fn type_label() -> String {
        "String".to_string()
    }

    fn reflect(&self) -> Value {
        Value::Str(self.to_string())
    }
}

impl Reflect for String {
    fn type_label() -> String {
        "String".to_string()
    }

    fn reflect(&self) -> Value {
        Value::Str(self.clone())
    }
}

impl Reflect for () {
    fn type_label() -> String {
        "()".to_string()
    }

    fn reflect(&self) -> Value {
        Value::Tuple {
            ty: Self::type_label(),
            items: Vec::new(),
        }
    }
}

impl<T: Reflect> Reflect for [T] {
    fn type_label() -> String {
        format!("[{}]", T::type_label())
    }

    fn reflect(&self) -> Value {
        T::reflect_slice(self)
    }
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn type_label() -> String {
        format!("[{}]", T::type_label())
    }

    fn reflect(&self) -> Value {
        T::reflect_slice(self)
    }
}

impl<T: Reflect> Reflect for Vec<T> {
    fn type_label() -> String {
        format!("[{}]", T::type_label())
    }

    fn reflect(&self) -> Value {
        T::reflect_slice(self)
    }
}

impl<T: Reflect> Reflect for Option<T> {
    fn type_label() -> String {
        format!("Option<{}>", T::type_label())
    }

    fn reflect(&self) -> Value {
        match self {
            Some(inner) => inner.reflect(),
            None => Value::Nil,
        }
    }
}

impl<T: Reflect + ?Sized> Reflect for &T {
    fn type_label() -> String {
        T::type_label()
    }

    fn reflect(&self) -> Value {
        (**self).reflect()
    }
}

impl<T: Reflect + ?Sized> Reflect for &mut T {
    fn type_label() -> String {
        T::type_label()
    }

    fn reflect(&self) -> Value {
        (**self).reflect()
    }
}

impl<T: Reflect + ?Sized> Reflect for Box<T> {
    fn type_label() -> String {
        T::type_label()
    }

    fn reflect(&self) -> Value {
        (**self).reflect()
    }
}

impl<T: Reflect + ?Sized> Reflect for Rc<T> {
    fn type_label() -> String {
        format!("Rc<{}>", T::type_label())
    }

    fn reflect(&self) -> Value {
        Value::Ref {
            ty: Self::type_label(),
            addr: Rc::as_ptr(self) as *const u8 as usize,
            target: Box::new((**self).reflect()),
        }
    }
}

impl<T: Reflect + ?Sized> Reflect for Arc<T> {
    fn type_label() -> String {
        format!("Arc<{}>", T::type_label())
    }

    fn reflect(&self) -> Value {
        Value::Ref {
            ty: Self::type_label(),
            addr: Arc::as_ptr(self) as *const u8 as usize,
            target: Box::new((**self).reflect()),
        }
    }
}

impl<K: Reflect, V: Reflect, S> Reflect for HashMap<K, V, S> {
    fn type_label() -> String {
        format!("HashMap<{}, {}>", K::type_label(), V::type_label())
    }

    fn reflect(&self) -> Value {
        Value::map(
            Self::type_label(),
            self.iter().map(|(k, v)| (k.reflect(), v.reflect())).collect(),
        )
    }
}

impl<K: Reflect, V: Reflect> Reflect for BTreeMap<K, V> {
    fn type_label() -> String {
        format!("BTreeMap<{}, {}>", K::type_label(), V::type_label())
    }

    fn reflect(&self) -> Value {
        Value::map(
            Self::type_label(),
            self.iter().map(|(k, v)| (k.reflect(), v.reflect())).collect(),
        )
    }
}

macro_rules! reflect_tuple {
    ($(($($name:ident . $idx:tt),+);)*) => {
        $(
            impl<$($name: Reflect),+> Reflect for ($($name,)+) {
                fn type_label() -> String {
                    let parts: Vec<String> = vec![$($name::type_label()),+];
                    if parts.len() == 1 {
                        format!("({},)", parts[0])
                    } else {
                        format!("({})", parts.join(", "))
                    }
                }

                fn reflect(&self) -> Value {
                    Value::Tuple {
                        ty: Self::type_label(),
                        items: vec![$(self.$idx.reflect()),+],
                    }
                }
            }
        )*
    };
}

reflect_tuple! {
    (A.0);
    (A.0, B.1);
    (A.0, B.1, C.2);
    (A.0, B.1, C.2, D.3);
}

/// Wraps a value that cannot be compared, such as a closure or a handle.
///
/// Equality checks involving an `Opaque` always fail as unsupported.
pub struct Opaque<T>(pub T);

impl<T> Reflect for Opaque<T> {
    fn type_label() -> String {
        std::any::type_name::<T>().to_string()
    }

    fn reflect(&self) -> Value {
        Value::Opaque {
            ty: Self::type_label(),
        }
    }
}
