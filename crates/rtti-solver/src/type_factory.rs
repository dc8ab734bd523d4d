//! Builders for object types and signatures.

use crate::diagnostics::EngineError;
use crate::types::{ObjectShape, PropertyDescriptor, Signature, Type};
use std::sync::Arc;

/// Builds an [`ObjectShape`] and turns it into an object [`Type`].
///
/// ```ignore
/// let point = ObjectBuilder::named("Point")
///     .property("x", Type::numeric())
///     .optional_property("label", Type::string())
///     .build();
/// ```
#[derive(Default)]
pub struct ObjectBuilder {
    name: Option<String>,
    shape: ObjectShape,
}

impl ObjectBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            shape: ObjectShape::default(),
        }
    }

    pub fn property(self, name: &str, ty: Type) -> Self {
        self.insert_property(name, ty, false)
    }

    pub fn optional_property(self, name: &str, ty: Type) -> Self {
        self.insert_property(name, ty, true)
    }

    fn insert_property(mut self, name: &str, ty: Type, optional: bool) -> Self {
        let name: Arc<str> = Arc::from(name);
        self.shape.properties.insert(
            name.clone(),
            PropertyDescriptor { name, ty, optional },
        );
        self
    }

    pub fn call_signature(mut self, signature: Signature) -> Self {
        self.shape.call_signatures.push(signature);
        self
    }

    pub fn construct_signature(mut self, signature: Signature) -> Self {
        self.shape.construct_signatures.push(signature);
        self
    }

    pub fn numeric_index(mut self, ty: Type) -> Self {
        self.shape.numeric_index_type = Some(ty);
        self
    }

    pub fn string_index(mut self, ty: Type) -> Self {
        self.shape.string_index_type = Some(ty);
        self
    }

    pub fn build(self) -> Type {
        Type::object(self.name.as_deref(), self.shape)
    }

    /// Define a previously declared object type with this shape. The
    /// builder's name is ignored; the declared name stands.
    pub fn define(self, declared: &Type) -> Result<(), EngineError> {
        declared.define_object(self.shape)
    }

    pub fn into_shape(self) -> ObjectShape {
        self.shape
    }
}

/// Builds a [`Signature`].
///
/// `mandatory_args` defaults to the number of parameters added before the
/// first optional one.
pub struct SignatureBuilder {
    args: Vec<Type>,
    mandatory: usize,
    seen_optional: bool,
    explicit_mandatory: Option<usize>,
    varargs: Option<Type>,
    result: Type,
}

impl Default for SignatureBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SignatureBuilder {
    pub fn new() -> Self {
        Self {
            args: Vec::new(),
            mandatory: 0,
            seen_optional: false,
            explicit_mandatory: None,
            varargs: None,
            result: Type::void(),
        }
    }

    pub fn param(mut self, ty: Type) -> Self {
        if !self.seen_optional {
            self.mandatory += 1;
        }
        self.args.push(ty);
        self
    }

    pub fn optional_param(mut self, ty: Type) -> Self {
        self.seen_optional = true;
        self.args.push(ty);
        self
    }

    pub fn rest(mut self, ty: Type) -> Self {
        self.varargs = Some(ty);
        self
    }

    pub fn mandatory_args(mut self, count: usize) -> Self {
        self.explicit_mandatory = Some(count);
        self
    }

    pub fn returns(mut self, ty: Type) -> Self {
        self.result = ty;
        self
    }

    pub fn build(self) -> Signature {
        let mandatory = self.explicit_mandatory.unwrap_or(self.mandatory);
        Signature::new(self.args, mandatory, self.varargs, self.result)
    }
}
