//! Serialized descriptor documents.
//!
//! The compiler emits descriptors as a flat JSON table:
//!
//! ```json
//! { "types": [ { "type": "objectType", "properties": { "next": { "type": 0, "optional": true } } } ],
//!   "root": 0 }
//! ```
//!
//! Entries refer to each other by index, so object types can be recursive.
//! Decoding declares every object type up front, builds the other entries on
//! demand, and only then defines object shapes.

use crate::diagnostics::EngineError;
use crate::types::{CompositeType, ObjectShape, PropertyDescriptor, Signature, Type, TypeKind};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Index of an entry in [`WireDocument::types`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WireRef(pub u32);

impl WireRef {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireDocument {
    pub types: Vec<WireType>,
    pub root: WireRef,
}

impl WireDocument {
    pub fn from_json_str(source: &str) -> Result<Self, EngineError> {
        serde_json::from_str(source)
            .map_err(|err| EngineError::MalformedDescriptor(format!("invalid document: {err}")))
    }

    pub fn decode(&self) -> Result<TypeTable, EngineError> {
        decode_document(self)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum WireType {
    Any,
    Never,
    Void,
    Null,
    Boolean,
    Numeric,
    String,
    BooleanLiteral {
        value: bool,
    },
    NumericLiteral {
        value: f64,
    },
    StringLiteral {
        value: String,
    },
    Union {
        types: Vec<WireRef>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    Intersection {
        types: Vec<WireRef>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    TypeParameter {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    ObjectType {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default)]
        properties: IndexMap<String, WireProperty>,
        #[serde(default)]
        call_signatures: Vec<WireSignature>,
        #[serde(default)]
        construct_signatures: Vec<WireSignature>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        numeric_index_type: Option<WireRef>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        string_index_type: Option<WireRef>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireProperty {
    #[serde(rename = "type")]
    pub ty: WireRef,
    #[serde(default)]
    pub optional: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireSignature {
    #[serde(default)]
    pub args: Vec<WireRef>,
    /// Defaults to the number of declared parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mandatory_args: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub varargs: Option<WireRef>,
    pub result: WireRef,
}

/// Decoded descriptors, indexed like the document they came from.
#[derive(Debug, Clone)]
pub struct TypeTable {
    types: Vec<Type>,
    root: WireRef,
}

impl TypeTable {
    pub fn get(&self, reference: WireRef) -> Option<&Type> {
        self.types.get(reference.index())
    }

    pub fn root(&self) -> &Type {
        // Checked during decoding.
        &self.types[self.root.index()]
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Type> {
        self.types.iter()
    }
}

pub fn decode_document(document: &WireDocument) -> Result<TypeTable, EngineError> {
    let mut decoder = Decoder::new(&document.types);
    decoder.check(document.root)?;

    // Objects first, so every later reference to one can be resolved.
    for (index, entry) in document.types.iter().enumerate() {
        if let WireType::ObjectType { name, .. } = entry {
            decoder.slots[index] = Slot::Built(Type::declare_object(name.as_deref()));
        }
    }
    for index in 0..document.types.len() {
        decoder.build(index)?;
    }
    for (index, entry) in document.types.iter().enumerate() {
        if let WireType::ObjectType {
            properties,
            call_signatures,
            construct_signatures,
            numeric_index_type,
            string_index_type,
            ..
        } = entry
        {
            let shape = decoder.shape(
                properties,
                call_signatures,
                construct_signatures,
                *numeric_index_type,
                *string_index_type,
            )?;
            decoder.built(index)?.define_object(shape)?;
        }
    }

    let types = decoder
        .slots
        .into_iter()
        .map(|slot| match slot {
            Slot::Built(ty) => Ok(ty),
            _ => Err(EngineError::MalformedDescriptor(
                "descriptor left unresolved".to_string(),
            )),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TypeTable {
        types,
        root: document.root,
    })
}

enum Slot {
    Pending,
    InProgress,
    Built(Type),
}

struct Decoder<'a> {
    entries: &'a [WireType],
    slots: Vec<Slot>,
}

impl<'a> Decoder<'a> {
    fn new(entries: &'a [WireType]) -> Self {
        Self {
            entries,
            slots: entries.iter().map(|_| Slot::Pending).collect(),
        }
    }

    fn check(&self, reference: WireRef) -> Result<usize, EngineError> {
        let index = reference.index();
        if index < self.entries.len() {
            Ok(index)
        } else {
            Err(EngineError::MalformedDescriptor(format!(
                "reference {index} is out of range for a table of {} descriptors",
                self.entries.len()
            )))
        }
    }

    fn built(&self, index: usize) -> Result<Type, EngineError> {
        match &self.slots[index] {
            Slot::Built(ty) => Ok(ty.clone()),
            _ => Err(EngineError::MalformedDescriptor(format!(
                "descriptor {index} used before it was built"
            ))),
        }
    }

    fn resolve(&mut self, reference: WireRef) -> Result<Type, EngineError> {
        let index = self.check(reference)?;
        self.build(index)
    }

    fn resolve_all(&mut self, references: &[WireRef]) -> Result<Vec<Type>, EngineError> {
        references.iter().map(|&r| self.resolve(r)).collect()
    }

    fn build(&mut self, index: usize) -> Result<Type, EngineError> {
        match &self.slots[index] {
            Slot::Built(ty) => return Ok(ty.clone()),
            Slot::InProgress => {
                return Err(EngineError::MalformedDescriptor(format!(
                    "descriptor {index} refers to itself without passing through an object type"
                )));
            }
            Slot::Pending => {}
        }
        self.slots[index] = Slot::InProgress;

        let entries = self.entries;
        let ty = match &entries[index] {
            WireType::Any => Type::any(),
            WireType::Never => Type::never(),
            WireType::Void => Type::void(),
            WireType::Null => Type::null(),
            WireType::Boolean => Type::boolean(),
            WireType::Numeric => Type::numeric(),
            WireType::String => Type::string(),
            WireType::BooleanLiteral { value } => Type::boolean_literal(*value),
            WireType::NumericLiteral { value } => Type::numeric_literal(*value),
            WireType::StringLiteral { value } => Type::string_literal(value),
            WireType::Union { types, name } => {
                let members = self.resolve_all(types)?;
                Type::new(TypeKind::Union(CompositeType {
                    members,
                    name: name.as_deref().map(Arc::from),
                }))
            }
            WireType::Intersection { types, name } => {
                let members = self.resolve_all(types)?;
                Type::new(TypeKind::Intersection(CompositeType {
                    members,
                    name: name.as_deref().map(Arc::from),
                }))
            }
            WireType::TypeParameter { name } => Type::type_parameter(name.as_deref()),
            // Declared before building starts.
            WireType::ObjectType { .. } => {
                return Err(EngineError::MalformedDescriptor(format!(
                    "object type {index} was not declared"
                )));
            }
        };
        self.slots[index] = Slot::Built(ty.clone());
        Ok(ty)
    }

    fn signature(&mut self, wire: &WireSignature) -> Result<Signature, EngineError> {
        let args = self.resolve_all(&wire.args)?;
        let mandatory_args = wire.mandatory_args.unwrap_or(args.len());
        if mandatory_args > args.len() {
            return Err(EngineError::MalformedDescriptor(format!(
                "signature requires {mandatory_args} arguments but declares {}",
                args.len()
            )));
        }
        let varargs = wire.varargs.map(|r| self.resolve(r)).transpose()?;
        let result = self.resolve(wire.result)?;
        Ok(Signature::new(args, mandatory_args, varargs, result))
    }

    fn shape(
        &mut self,
        properties: &IndexMap<String, WireProperty>,
        call_signatures: &[WireSignature],
        construct_signatures: &[WireSignature],
        numeric_index_type: Option<WireRef>,
        string_index_type: Option<WireRef>,
    ) -> Result<ObjectShape, EngineError> {
        let mut shape = ObjectShape::default();
        for (name, prop) in properties {
            let name: Arc<str> = Arc::from(name.as_str());
            let ty = self.resolve(prop.ty)?;
            shape.properties.insert(
                Arc::clone(&name),
                PropertyDescriptor {
                    name,
                    ty,
                    optional: prop.optional,
                },
            );
        }
        for wire in call_signatures {
            let signature = self.signature(wire)?;
            shape.call_signatures.push(signature);
        }
        for wire in construct_signatures {
            let signature = self.signature(wire)?;
            shape.construct_signatures.push(signature);
        }
        shape.numeric_index_type = numeric_index_type.map(|r| self.resolve(r)).transpose()?;
        shape.string_index_type = string_index_type.map(|r| self.resolve(r)).transpose()?;
        Ok(shape)
    }
}

#[cfg(test)]
#[path = "../tests/wire_tests.rs"]
mod tests;
