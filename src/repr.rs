//! Human-readable rendering of values for failure messages.
//!
//! Text and bytes are quoted. Composites print their type ahead of their
//! structure (`[i32]{1, 2}`, `(u8, String)(1, "a")`, `Rc<u32>(5)`); they stay on
//! one line when that line fits in [`MAX_WIDTH`] columns and otherwise break into
//! one element per line. Map entries are always in sorted key order.

use std::fmt;

use crate::value::{FloatKind, Reflect, Value};

pub const MAX_WIDTH: usize = 80;
const INDENT: &str = "    ";

/// Renders any reflectable value.
///
/// ```rust
/// use std::collections::HashMap;
/// use testutil::repr;
///
/// let map: HashMap<String, i32> = [("B".to_string(), 2), ("A".to_string(), 1)].into();
/// assert_eq!(repr(&map), r#"HashMap<String, i32>{"A": 1, "B": 2}"#);
/// assert_eq!(repr("foo"), r#""foo""#);
/// assert_eq!(repr(&b"a\x00".to_vec()), r#"b"a\x00""#);
/// ```
pub fn repr<T: Reflect + ?Sized>(value: &T) -> String {
    repr_value(&value.reflect())
}

/// Renders an already-lowered value.
pub fn repr_value(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value, 0);
    out
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&repr_value(self))
    }
}

// ============================================================================
// LAYOUT
// ============================================================================

/// Delimiters and children of a composite value.
struct Layout<'a> {
    open: String,
    close: &'static str,
    /// Inline form pads inside the delimiters: `Point { x: 1 }`.
    pad: bool,
    children: Vec<(String, &'a Value)>,
}

fn layout(value: &Value) -> Option<Layout<'_>> {
    let layout = match value {
        Value::List { ty, items } => Layout {
            open: format!("{ty}{{"),
            close: "}",
            pad: false,
            children: items.iter().map(|v| (String::new(), v)).collect(),
        },
        Value::Tuple { ty, items } => Layout {
            open: format!("{ty}("),
            close: ")",
            pad: false,
            children: items.iter().map(|v| (String::new(), v)).collect(),
        },
        Value::Map { ty, entries } => Layout {
            open: format!("{ty}{{"),
            close: "}",
            pad: false,
            children: entries
                .iter()
                .map(|(k, v)| (format!("{}: ", inline(k)), v))
                .collect(),
        },
        Value::Struct { name, fields, .. } => Layout {
            open: format!("{name} {{"),
            close: "}",
            pad: true,
            children: fields.iter().map(|(f, v)| (format!("{f}: "), v)).collect(),
        },
        Value::Ref { ty, target, .. } => Layout {
            open: format!("{ty}("),
            close: ")",
            pad: false,
            children: vec![(String::new(), target.as_ref())],
        },
        _ => return None,
    };
    Some(layout)
}

fn write_value(out: &mut String, value: &Value, depth: usize) {
    let flat = inline(value);
    let Some(layout) = layout(value) else {
        out.push_str(&flat);
        return;
    };
    if layout.children.is_empty() || depth * INDENT.len() + flat.len() <= MAX_WIDTH {
        out.push_str(&flat);
        return;
    }

    out.push_str(&layout.open);
    out.push('\n');
    for (prefix, child) in &layout.children {
        push_indent(out, depth + 1);
        out.push_str(prefix);
        write_value(out, child, depth + 1);
        out.push_str(",\n");
    }
    push_indent(out, depth);
    out.push_str(layout.close);
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

// ============================================================================
// SINGLE-LINE RENDERING
// ============================================================================

fn inline(value: &Value) -> String {
    match value {
        Value::Nil => "None".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Int { value, .. } => value.to_string(),
        Value::Uint { value, .. } => value.to_string(),
        Value::Float {
            kind: FloatKind::F32,
            value,
        } => format!("{:?}", *value as f32),
        Value::Float { value, .. } => format!("{value:?}"),
        Value::Char(c) => format!("{c:?}"),
        Value::Str(s) => format!("{s:?}"),
        Value::Bytes(bytes) => quote_bytes(bytes),
        Value::Opaque { ty } => format!("<opaque {ty}>"),
        Value::Struct { name, fields, .. } if fields.is_empty() => name.clone(),
        Value::Tuple { items, .. } if items.is_empty() => "()".to_string(),
        Value::Tuple { ty, items } if items.len() == 1 => format!("{ty}({},)", inline(&items[0])),
        composite => {
            let Some(layout) = layout(composite) else {
                return String::new();
            };
            let body = layout
                .children
                .iter()
                .map(|(prefix, child)| format!("{prefix}{}", inline(child)))
                .collect::<Vec<_>>()
                .join(", ");
            if layout.pad {
                format!("{} {body} {}", layout.open, layout.close)
            } else {
                format!("{}{body}{}", layout.open, layout.close)
            }
        }
    }
}

fn quote_bytes(bytes: &[u8]) -> String {
    let mut out = String::from("b\"");
    for byte in bytes {
        out.extend(std::ascii::escape_default(*byte).map(char::from));
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_list_breaks_lines() {
        let items: Vec<String> = (0..12).map(|i| format!("item-{i}")).collect();
        let rendered = repr(&items);
        assert!(rendered.starts_with("[String]{\n    \"item-0\",\n"));
        assert!(rendered.ends_with("    \"item-11\",\n}"));
    }

    #[test]
    fn test_empty_struct_renders_name() {
        let value = Value::Struct {
            ty: "crate::Unit".to_string(),
            name: "Unit".to_string(),
            fields: Vec::new(),
        };
        assert_eq!(repr_value(&value), "Unit");
    }

    #[test]
    fn test_f32_keeps_its_precision() {
        assert_eq!(repr(&0.1f32), "0.1");
        assert_eq!(repr(&1.0f64), "1.0");
    }

    #[test]
    fn test_element_width_is_visible() {
        assert_eq!(repr(&vec![1i32, 2]), "[i32]{1, 2}");
        assert_eq!(repr(&vec![1i64, 2]), "[i64]{1, 2}");
        assert_ne!(repr(&vec![1i32]), repr(&vec![1i64]));
    }
}
