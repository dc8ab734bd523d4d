//! Human-readable rendering of descriptors and values for diagnostics.

use crate::types::{CompositeType, ObjectShape, Signature, Type, TypeKind};
use crate::value::{FunctionRef, Value};
use rtti_common::limits::{
    CIRCULAR_REFERENCE_MARKER, CIRCULAR_TYPE_MARKER, MAX_ARRAY_PREVIEW_ELEMENTS,
};
use rustc_hash::FxHashSet;
use std::fmt::Write;

/// Render a number the way `Number.prototype.toString()` does: integral
/// values without a fractional part, exponent notation outside
/// `[1e-6, 1e21)`, `NaN`, `Infinity`, `-Infinity`.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value == 0.0 {
        // -0 prints as 0.
        return "0".to_string();
    }
    if value.is_infinite() {
        return if value.is_sign_negative() {
            "-Infinity"
        } else {
            "Infinity"
        }
        .to_string();
    }

    if !(1e-6..1e21).contains(&value.abs()) {
        // Rust prints `1e21` / `1e-7`; the host wants an explicit sign.
        let formatted = format!("{value:e}");
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) => match exponent.strip_prefix('-') {
                Some(digits) => format!("{mantissa}e-{digits}"),
                None => format!("{mantissa}e+{exponent}"),
            },
            None => formatted,
        };
    }
    value.to_string()
}

/// Formats type descriptors.
///
/// Named object types print their name. Anonymous object types print their
/// members; re-entering one that is already being printed yields
/// `[circular type]`.
#[derive(Default)]
pub struct TypeFormatter {
    visiting: FxHashSet<usize>,
}

impl TypeFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn format(&mut self, ty: &Type) -> String {
        self.format_at(ty, 0)
    }

    pub fn format_signature(&mut self, signature: &Signature) -> String {
        self.format_signature_at(signature, 0)
    }

    fn format_at(&mut self, ty: &Type, indent: usize) -> String {
        match ty.kind() {
            TypeKind::Any => "any".to_string(),
            TypeKind::Never => "never".to_string(),
            TypeKind::Void => "undefined".to_string(),
            TypeKind::Null => "null".to_string(),
            TypeKind::Boolean => "boolean".to_string(),
            TypeKind::Numeric => "number".to_string(),
            TypeKind::String => "string".to_string(),
            TypeKind::BooleanLiteral(value) => value.to_string(),
            TypeKind::NumericLiteral(value) => format_number(*value),
            TypeKind::StringLiteral(value) => format!("'{value}'"),
            TypeKind::Union(union) => self.format_composite(union, " | ", indent),
            TypeKind::Intersection(intersection) => {
                self.format_composite(intersection, " & ", indent)
            }
            TypeKind::TypeParameter(name) => name.as_deref().unwrap_or("T").to_string(),
            TypeKind::Object(object) => {
                if let Some(name) = &object.name {
                    return name.to_string();
                }
                let Ok(shape) = object.shape() else {
                    return "{ <undefined> }".to_string();
                };
                let addr = ty.addr();
                if !self.visiting.insert(addr) {
                    return CIRCULAR_TYPE_MARKER.to_string();
                }
                let rendered = self.format_shape(shape, indent);
                self.visiting.remove(&addr);
                rendered
            }
        }
    }

    fn format_composite(&mut self, composite: &CompositeType, separator: &str, indent: usize) -> String {
        if let Some(name) = &composite.name {
            return name.to_string();
        }
        let members: Vec<String> = composite
            .members
            .iter()
            .map(|member| self.format_at(member, indent))
            .collect();
        format!("({})", members.join(separator))
    }

    fn format_shape(&mut self, shape: &ObjectShape, indent: usize) -> String {
        let inner = indent + 1;
        let pad = "  ".repeat(inner);
        let mut out = String::from("{\n");

        if let Some(index) = &shape.numeric_index_type {
            let _ = writeln!(out, "{pad}[number]: {};", self.format_at(index, inner));
        }
        if let Some(index) = &shape.string_index_type {
            let _ = writeln!(out, "{pad}[string]: {};", self.format_at(index, inner));
        }
        for signature in &shape.call_signatures {
            let _ = writeln!(out, "{pad}{};", self.format_signature_at(signature, inner));
        }
        for signature in &shape.construct_signatures {
            let _ = writeln!(out, "{pad}new {};", self.format_signature_at(signature, inner));
        }
        for prop in shape.properties.values() {
            let marker = if prop.optional { "?" } else { "" };
            let _ = writeln!(
                out,
                "{pad}\"{}\"{marker}: {},",
                prop.name,
                self.format_at(&prop.ty, inner)
            );
        }

        out.push_str(&"  ".repeat(indent));
        out.push('}');
        out
    }

    fn format_signature_at(&mut self, signature: &Signature, indent: usize) -> String {
        let mut params: Vec<String> = signature
            .args()
            .iter()
            .map(|arg| self.format_at(arg, indent))
            .collect();
        if let Some(rest) = signature.varargs() {
            params.push(format!("...{}[]", self.format_at(rest, indent)));
        }
        format!(
            "({}) => {}",
            params.join(", "),
            self.format_at(signature.result(), indent)
        )
    }
}

/// Formats runtime values.
///
/// Every reference value is printed at most once per formatter; later
/// occurrences, cyclic or merely shared, print `[circular reference]`.
#[derive(Default)]
pub struct ValueFormatter {
    seen: FxHashSet<usize>,
}

impl ValueFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn format(&mut self, value: &Value) -> String {
        self.format_at(value, 0)
    }

    /// Comma-separated list, as used for call arguments.
    pub fn format_list(&mut self, values: &[Value]) -> String {
        let rendered: Vec<String> = values.iter().map(|value| self.format_at(value, 0)).collect();
        rendered.join(", ")
    }

    fn format_at(&mut self, value: &Value, indent: usize) -> String {
        if let Some(identity) = value.identity() {
            if !self.seen.insert(identity) {
                return CIRCULAR_REFERENCE_MARKER.to_string();
            }
        }
        match value {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Boolean(value) => value.to_string(),
            Value::Number(value) => format_number(*value),
            Value::String(value) => format!("'{value}'"),
            Value::Function(function) => format_function(function),
            Value::Array(array) => {
                let elements = array.elements();
                let preview: Vec<String> = elements
                    .iter()
                    .take(MAX_ARRAY_PREVIEW_ELEMENTS)
                    .map(|element| self.format_at(element, indent))
                    .collect();
                format!("[{}]", with_ellipsis(preview, elements.len()))
            }
            Value::TypedArray(buffer) => {
                let preview: Vec<String> = buffer
                    .elements()
                    .iter()
                    .take(MAX_ARRAY_PREVIEW_ELEMENTS)
                    .map(|element| format_number(*element))
                    .collect();
                format!(
                    "{} [{}]",
                    buffer.kind().constructor_name(),
                    with_ellipsis(preview, buffer.len())
                )
            }
            Value::DataView(view) => format!("DataView {{ byteLength: {} }}", view.byte_length()),
            Value::Object(object) => {
                let mut entries = object.own_entries();
                let mut prototype = object.prototype().cloned();
                while let Some(proto) = prototype {
                    for (key, value) in proto.own_entries() {
                        if !entries.iter().any(|(existing, _)| *existing == key) {
                            entries.push((key, value));
                        }
                    }
                    prototype = proto.prototype().cloned();
                }
                if entries.is_empty() {
                    return "{}".to_string();
                }
                let pad = "  ".repeat(indent + 1);
                let mut out = String::from("{\n");
                for (key, value) in &entries {
                    let rendered = self.format_at(value, indent + 1);
                    let _ = writeln!(out, "{pad}{key}: {rendered},");
                }
                out.push_str(&"  ".repeat(indent));
                out.push('}');
                out
            }
        }
    }
}

fn format_function(function: &FunctionRef) -> String {
    match function.tag() {
        Some(tag) => TypeFormatter::new().format(&tag),
        None => "Function".to_string(),
    }
}

fn with_ellipsis(mut preview: Vec<String>, total: usize) -> String {
    if total > preview.len() {
        preview.push("...".to_string());
    }
    preview.join(", ")
}

#[cfg(test)]
#[path = "../tests/format_tests.rs"]
mod tests;
