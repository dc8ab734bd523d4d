//! Value conformance: does a live value inhabit a descriptor?
//!
//! `null` and `undefined` conform to every type, mirroring how the compiler
//! models optional and nullable positions. Object types accept plain objects
//! and callables; a callable that carries its own descriptor is related
//! through that descriptor, an untagged callable passes the signature part
//! unchecked.

use crate::diagnostics::EngineError;
use crate::engine::TypeEngine;
use crate::recursion::{RecursionResult, grow_stack};
use crate::types::{ObjectShape, Type, TypeKind};
use crate::value::{FunctionRef, Value};
use tracing::trace;

impl TypeEngine {
    /// Does `value` conform to `ty`?
    pub fn is_type(&mut self, value: &Value, ty: &Type) -> Result<bool, EngineError> {
        if value.is_nullish() {
            return Ok(true);
        }
        match ty.kind() {
            TypeKind::Never => Ok(false),
            TypeKind::Any => Ok(true),
            TypeKind::Boolean => Ok(value.type_of() == "boolean"),
            TypeKind::Numeric => Ok(value.type_of() == "number"),
            TypeKind::String => Ok(value.type_of() == "string"),
            TypeKind::BooleanLiteral(expected) => {
                Ok(matches!(value, Value::Boolean(actual) if actual == expected))
            }
            TypeKind::NumericLiteral(expected) => {
                Ok(matches!(value, Value::Number(actual) if actual == expected))
            }
            TypeKind::StringLiteral(expected) => {
                Ok(matches!(value, Value::String(actual) if **actual == **expected))
            }
            TypeKind::Void => Ok(matches!(value, Value::Undefined)),
            TypeKind::Null => Ok(matches!(value, Value::Null)),
            TypeKind::Intersection(intersection) => {
                for member in &intersection.members {
                    if !self.is_type(value, member)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            TypeKind::Union(union) => {
                for member in &union.members {
                    if self.is_type(value, member)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            TypeKind::TypeParameter(_) => Err(EngineError::UnsupportedTypeParameter),
            TypeKind::Object(object) => {
                let shape = object.shape()?;
                self.is_object_type(value, ty, shape)
            }
        }
    }

    fn is_object_type(
        &mut self,
        value: &Value,
        ty: &Type,
        shape: &ObjectShape,
    ) -> Result<bool, EngineError> {
        let function = match value {
            Value::Function(function) => Some(function),
            // Plain data aggregates are never callable.
            Value::Object(_) | Value::Array(_) | Value::TypedArray(_) | Value::DataView(_) => {
                if shape.has_signatures() {
                    return Ok(false);
                }
                None
            }
            _ => return Ok(false),
        };

        // Every reference value has an identity.
        let Some(identity) = value.identity() else {
            return Ok(false);
        };
        let key = (identity, ty.id());

        if !self.value_guard.is_active() {
            self.value_guard.reset();
        }
        match self.value_guard.enter(key) {
            RecursionResult::Entered => {}
            RecursionResult::Cycle => {
                trace!(
                    type_id = ty.id().0,
                    "value already being checked against type; assuming it holds"
                );
                return Ok(true);
            }
            RecursionResult::DepthExceeded | RecursionResult::IterationExceeded => {
                return Err(EngineError::RecursionLimit("checking a value against its type"));
            }
        }
        let result = grow_stack(|| self.uncached_is_object_type(value, function, ty, shape));
        self.value_guard.leave(key);
        result
    }

    fn uncached_is_object_type(
        &mut self,
        value: &Value,
        function: Option<&FunctionRef>,
        ty: &Type,
        shape: &ObjectShape,
    ) -> Result<bool, EngineError> {
        let properties = value.effective_properties();
        for prop in shape.properties.values() {
            let prop_value = properties.get(&prop.name).unwrap_or(Value::Undefined);
            if !self.is_type(&prop_value, &prop.ty)? {
                return Ok(false);
            }
            // An inherited member counts as present.
            if !prop.optional && !properties.has(&prop.name) {
                return Ok(false);
            }
        }

        if let Some(function) = function {
            if !self.function_conforms(function, ty)? {
                return Ok(false);
            }
        }

        match &shape.numeric_index_type {
            Some(index_type) => self.is_index_conformant(value, index_type),
            None => Ok(true),
        }
    }

    /// Signature part of an object-type check for a callable.
    fn function_conforms(&mut self, function: &FunctionRef, ty: &Type) -> Result<bool, EngineError> {
        match function.tag() {
            Some(tag) => self.function_tag_matches(&tag, ty),
            // Dynamically constructed functions are accepted as generic
            // callables.
            None => Ok(true),
        }
    }

    fn is_index_conformant(&mut self, value: &Value, index_type: &Type) -> Result<bool, EngineError> {
        match value {
            Value::TypedArray(buffer) => Ok(match index_type.kind() {
                TypeKind::Numeric => true,
                TypeKind::NumericLiteral(expected) => {
                    buffer.elements().iter().all(|element| element == expected)
                }
                _ => false,
            }),
            Value::Array(array) => {
                let elements = array.elements();
                for element in elements.iter() {
                    if !self.is_type(element, index_type)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            _ => Ok(true),
        }
    }
}

#[cfg(test)]
#[path = "../tests/conformance_tests.rs"]
mod tests;
