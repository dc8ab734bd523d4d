//! Runtime values checked by the engine.
//!
//! Generated code manipulates dynamically typed values; this module is the
//! value universe the engine sees. Reference values (objects, arrays,
//! functions, buffers) are shared `Rc` handles, so identity is pointer
//! identity, objects may refer to themselves, and the same function can be
//! reached through several references while carrying one descriptor tag.

use crate::diagnostics::EngineError;
use crate::engine::TypeEngine;
use crate::types::Type;
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

pub type ObjectRef = Rc<JsObject>;
pub type ArrayRef = Rc<JsArray>;
pub type FunctionRef = Rc<FunctionObject>;

/// Native body of a function: `(engine, receiver, arguments) -> result`.
///
/// The engine is passed in so the body can route nested calls and
/// assertions through the same context.
pub type NativeFn = dyn Fn(&mut TypeEngine, &Value, &[Value]) -> Result<Value, EngineError>;

#[derive(Clone, Debug)]
pub enum Value {
    Undefined,
    Null,
    Boolean(bool),
    Number(f64),
    String(Rc<str>),
    Array(ArrayRef),
    Object(ObjectRef),
    Function(FunctionRef),
    TypedArray(Rc<TypedArray>),
    DataView(Rc<DataView>),
}

impl Value {
    pub fn string(value: &str) -> Self {
        Value::String(Rc::from(value))
    }

    pub fn array(elements: Vec<Value>) -> Self {
        Value::Array(JsArray::new(elements))
    }

    pub fn object<'a>(properties: impl IntoIterator<Item = (&'a str, Value)>) -> Self {
        Value::Object(JsObject::from_pairs(properties, None))
    }

    pub fn typed_array(kind: ElementKind, elements: Vec<f64>) -> Self {
        Value::TypedArray(Rc::new(TypedArray::new(kind, elements)))
    }

    pub fn data_view(bytes: Vec<u8>) -> Self {
        Value::DataView(Rc::new(DataView::new(bytes)))
    }

    /// The host's dynamic type tag.
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Function(_) => "function",
            Value::Null
            | Value::Array(_)
            | Value::Object(_)
            | Value::TypedArray(_)
            | Value::DataView(_) => "object",
        }
    }

    /// `null` or `undefined`.
    #[inline]
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    #[inline]
    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Function(_))
    }

    pub fn as_function(&self) -> Option<&FunctionRef> {
        match self {
            Value::Function(function) => Some(function),
            _ => None,
        }
    }

    /// Address of a reference value, `None` for primitives.
    pub fn identity(&self) -> Option<usize> {
        match self {
            Value::Array(array) => Some(Rc::as_ptr(array) as *const () as usize),
            Value::Object(object) => Some(Rc::as_ptr(object) as *const () as usize),
            Value::Function(function) => Some(Rc::as_ptr(function) as *const () as usize),
            Value::TypedArray(buffer) => Some(Rc::as_ptr(buffer) as *const () as usize),
            Value::DataView(view) => Some(Rc::as_ptr(view) as *const () as usize),
            _ => None,
        }
    }

    /// `===`: primitives by value, references by identity.
    pub fn strict_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            _ => match (self.identity(), other.identity()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }

    /// Property read, walking the prototype chain. Missing properties read
    /// as `undefined`.
    pub fn get(&self, key: &str) -> Value {
        self.effective_properties()
            .get(key)
            .unwrap_or(Value::Undefined)
    }

    /// Is `key` present on the value or anywhere on its prototype chain?
    pub fn has_property(&self, key: &str) -> bool {
        self.effective_properties().has(key)
    }

    /// Property view with the inheritance chain resolved once.
    pub fn effective_properties(&self) -> EffectiveProperties {
        match self {
            Value::Object(object) => {
                EffectiveProperties::Flattened(flatten_chain(&object.properties, object.prototype()))
            }
            Value::Function(function) => EffectiveProperties::Flattened(flatten_chain(
                &function.properties,
                function.prototype(),
            )),
            Value::Array(_) | Value::TypedArray(_) | Value::DataView(_) => {
                EffectiveProperties::Indexed(self.clone())
            }
            _ => EffectiveProperties::Empty,
        }
    }

    /// Convert parsed JSON. Object key order is preserved.
    pub fn from_json(json: &serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(*b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::string(s),
            serde_json::Value::Array(elements) => {
                Value::array(elements.iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => {
                let object = JsObject::new();
                for (key, value) in map {
                    object.set(key, Value::from_json(value));
                }
                Value::Object(object)
            }
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.strict_equals(other)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::string(value)
    }
}

impl From<FunctionRef> for Value {
    fn from(value: FunctionRef) -> Self {
        Value::Function(value)
    }
}

fn flatten_chain(
    own: &RefCell<IndexMap<String, Value>>,
    mut prototype: Option<&ObjectRef>,
) -> FxHashMap<String, Value> {
    let mut flattened: FxHashMap<String, Value> = own
        .borrow()
        .iter()
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    while let Some(proto) = prototype {
        for (key, value) in proto.properties.borrow().iter() {
            flattened
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
        prototype = proto.prototype();
    }
    flattened
}

/// Properties of a value with inherited members already resolved.
///
/// Objects and functions flatten their chain up front; arrays and buffers
/// answer `length` and index keys on demand.
pub enum EffectiveProperties {
    Flattened(FxHashMap<String, Value>),
    Indexed(Value),
    Empty,
}

impl EffectiveProperties {
    pub fn get(&self, key: &str) -> Option<Value> {
        match self {
            EffectiveProperties::Flattened(map) => map.get(key).cloned(),
            EffectiveProperties::Indexed(value) => indexed_property(value, key),
            EffectiveProperties::Empty => None,
        }
    }

    pub fn has(&self, key: &str) -> bool {
        match self {
            EffectiveProperties::Flattened(map) => map.contains_key(key),
            EffectiveProperties::Indexed(value) => indexed_property(value, key).is_some(),
            EffectiveProperties::Empty => false,
        }
    }
}

fn indexed_property(value: &Value, key: &str) -> Option<Value> {
    match value {
        Value::Array(array) => match key {
            "length" => Some(Value::Number(array.len() as f64)),
            _ => canonical_index(key).and_then(|index| array.get(index)),
        },
        Value::TypedArray(buffer) => match key {
            "length" => Some(Value::Number(buffer.len() as f64)),
            _ => canonical_index(key)
                .and_then(|index| buffer.get(index))
                .map(Value::Number),
        },
        Value::DataView(view) => match key {
            "byteLength" => Some(Value::Number(view.byte_length() as f64)),
            _ => None,
        },
        _ => None,
    }
}

/// `"3"` is an index, `"03"` and `"3.0"` are not.
fn canonical_index(key: &str) -> Option<usize> {
    let index: usize = key.parse().ok()?;
    (index.to_string() == key).then_some(index)
}

/// A plain object: own properties plus an optional prototype.
pub struct JsObject {
    properties: RefCell<IndexMap<String, Value>>,
    prototype: Option<ObjectRef>,
}

impl JsObject {
    pub fn new() -> ObjectRef {
        Self::with_prototype(None)
    }

    pub fn with_prototype(prototype: Option<ObjectRef>) -> ObjectRef {
        Rc::new(JsObject {
            properties: RefCell::new(IndexMap::new()),
            prototype,
        })
    }

    pub fn from_pairs<'a>(
        properties: impl IntoIterator<Item = (&'a str, Value)>,
        prototype: Option<ObjectRef>,
    ) -> ObjectRef {
        let object = Self::with_prototype(prototype);
        for (key, value) in properties {
            object.set(key, value);
        }
        object
    }

    pub fn set(&self, key: &str, value: Value) {
        self.properties.borrow_mut().insert(key.to_string(), value);
    }

    pub fn get_own(&self, key: &str) -> Option<Value> {
        self.properties.borrow().get(key).cloned()
    }

    pub fn has_own(&self, key: &str) -> bool {
        self.properties.borrow().contains_key(key)
    }

    pub fn own_entries(&self) -> Vec<(String, Value)> {
        self.properties
            .borrow()
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    #[inline]
    pub fn prototype(&self) -> Option<&ObjectRef> {
        self.prototype.as_ref()
    }
}

impl fmt::Debug for JsObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<String> = self.properties.borrow().keys().cloned().collect();
        f.debug_struct("JsObject")
            .field("keys", &keys)
            .field("has_prototype", &self.prototype.is_some())
            .finish()
    }
}

pub struct JsArray {
    elements: RefCell<Vec<Value>>,
}

impl JsArray {
    pub fn new(elements: Vec<Value>) -> ArrayRef {
        Rc::new(JsArray {
            elements: RefCell::new(elements),
        })
    }

    pub fn len(&self) -> usize {
        self.elements.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.borrow().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.elements.borrow().get(index).cloned()
    }

    pub fn push(&self, value: Value) {
        self.elements.borrow_mut().push(value);
    }

    pub fn set(&self, index: usize, value: Value) {
        let mut elements = self.elements.borrow_mut();
        if index >= elements.len() {
            elements.resize(index + 1, Value::Undefined);
        }
        elements[index] = value;
    }

    pub fn elements(&self) -> Ref<'_, Vec<Value>> {
        self.elements.borrow()
    }
}

impl fmt::Debug for JsArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JsArray(len = {})", self.len())
    }
}

/// A callable value.
///
/// The descriptor tag is attached after creation by `register_type` and can
/// be re-assigned; every reference to the function observes the same tag.
pub struct FunctionObject {
    name: Option<String>,
    tag: RefCell<Option<Type>>,
    properties: RefCell<IndexMap<String, Value>>,
    prototype: Option<ObjectRef>,
    body: Box<NativeFn>,
}

impl FunctionObject {
    pub fn new(
        name: Option<&str>,
        body: impl Fn(&mut TypeEngine, &Value, &[Value]) -> Result<Value, EngineError> + 'static,
    ) -> FunctionRef {
        Self::with_prototype(name, None, body)
    }

    pub fn with_prototype(
        name: Option<&str>,
        prototype: Option<ObjectRef>,
        body: impl Fn(&mut TypeEngine, &Value, &[Value]) -> Result<Value, EngineError> + 'static,
    ) -> FunctionRef {
        Rc::new(FunctionObject {
            name: name.map(str::to_string),
            tag: RefCell::new(None),
            properties: RefCell::new(IndexMap::new()),
            prototype,
            body: Box::new(body),
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Attached descriptor, if the function was produced under static typing.
    pub fn tag(&self) -> Option<Type> {
        self.tag.borrow().clone()
    }

    pub(crate) fn set_tag(&self, tag: Type) {
        *self.tag.borrow_mut() = Some(tag);
    }

    pub fn set(&self, key: &str, value: Value) {
        self.properties.borrow_mut().insert(key.to_string(), value);
    }

    pub fn get_own(&self, key: &str) -> Option<Value> {
        self.properties.borrow().get(key).cloned()
    }

    #[inline]
    pub fn prototype(&self) -> Option<&ObjectRef> {
        self.prototype.as_ref()
    }

    /// Run the body without any boundary check.
    pub(crate) fn invoke(
        &self,
        engine: &mut TypeEngine,
        receiver: &Value,
        args: &[Value],
    ) -> Result<Value, EngineError> {
        (self.body)(engine, receiver, args)
    }
}

impl fmt::Debug for FunctionObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionObject")
            .field("name", &self.name)
            .field("tagged", &self.tag.borrow().is_some())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Int8,
    Uint8,
    Uint8Clamped,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Float32,
    Float64,
}

impl ElementKind {
    pub const fn constructor_name(self) -> &'static str {
        match self {
            ElementKind::Int8 => "Int8Array",
            ElementKind::Uint8 => "Uint8Array",
            ElementKind::Uint8Clamped => "Uint8ClampedArray",
            ElementKind::Int16 => "Int16Array",
            ElementKind::Uint16 => "Uint16Array",
            ElementKind::Int32 => "Int32Array",
            ElementKind::Uint32 => "Uint32Array",
            ElementKind::Float32 => "Float32Array",
            ElementKind::Float64 => "Float64Array",
        }
    }
}

/// An indexable view over a binary buffer with numeric elements.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedArray {
    kind: ElementKind,
    elements: Vec<f64>,
}

impl TypedArray {
    pub fn new(kind: ElementKind, elements: Vec<f64>) -> Self {
        Self { kind, elements }
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::new(
            ElementKind::Uint8,
            bytes.iter().map(|&byte| f64::from(byte)).collect(),
        )
    }

    #[inline]
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<f64> {
        self.elements.get(index).copied()
    }

    #[inline]
    pub fn elements(&self) -> &[f64] {
        &self.elements
    }
}

/// Raw byte view. Not subject to numeric index checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataView {
    bytes: Vec<u8>,
}

impl DataView {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    #[inline]
    pub fn byte_length(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

#[cfg(test)]
#[path = "../tests/value_tests.rs"]
mod tests;
