//! Type descriptor model.
//!
//! Descriptors are produced by the compiler and are logically immutable once
//! a program starts running. Every descriptor and signature carries an
//! identity slot that starts out invalid and is assigned from a process-wide
//! counter the first time the descriptor takes part in a judgment. Identities,
//! not structure, key the judgment cache: two structurally identical
//! descriptors are distinct until a judgment for that exact pair exists.

use crate::diagnostics::EngineError;
use indexmap::IndexMap;
use smallvec::SmallVec;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, OnceLock};

static NEXT_DESCRIPTOR_ID: AtomicU32 = AtomicU32::new(0);

/// Globally unique identity of a descriptor or signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DescriptorId(pub u32);

impl DescriptorId {
    /// Sentinel stored in an identity slot before assignment.
    pub const INVALID: DescriptorId = DescriptorId(u32::MAX);

    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

/// Lazily assigned identity.
///
/// Assignment is a compare-and-swap on the sentinel, so a descriptor shared
/// between engine contexts on different threads still ends up with exactly
/// one identity.
pub(crate) struct IdentitySlot(AtomicU32);

impl IdentitySlot {
    const fn new() -> Self {
        Self(AtomicU32::new(DescriptorId::INVALID.0))
    }

    #[inline]
    fn get(&self) -> Option<DescriptorId> {
        let raw = self.0.load(Ordering::Acquire);
        if raw == DescriptorId::INVALID.0 {
            None
        } else {
            Some(DescriptorId(raw))
        }
    }

    fn get_or_assign(&self) -> DescriptorId {
        if let Some(id) = self.get() {
            return id;
        }
        let fresh = NEXT_DESCRIPTOR_ID.fetch_add(1, Ordering::Relaxed);
        match self.0.compare_exchange(
            DescriptorId::INVALID.0,
            fresh,
            Ordering::AcqRel,
            Ordering::Acquire,
        ) {
            Ok(_) => DescriptorId(fresh),
            // Lost the race; the winner's identity stands.
            Err(existing) => DescriptorId(existing),
        }
    }
}

impl fmt::Debug for IdentitySlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(id) => write!(f, "#{}", id.0),
            None => f.write_str("#?"),
        }
    }
}

/// Discriminant of a [`TypeKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Any,
    Never,
    Void,
    Null,
    Boolean,
    Numeric,
    String,
    BooleanLiteral,
    NumericLiteral,
    StringLiteral,
    Union,
    Intersection,
    TypeParameter,
    Object,
}

impl TypeTag {
    /// `Void`, `Any` and `Null` are accepted as a source for every target
    /// unless the engine runs with strict nullable sources.
    #[inline]
    pub fn is_universal_source(self) -> bool {
        matches!(self, Self::Void | Self::Any | Self::Null)
    }

    #[inline]
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            Self::BooleanLiteral | Self::NumericLiteral | Self::StringLiteral
        )
    }
}

/// Members of a union or intersection, with an optional display name.
#[derive(Debug)]
pub struct CompositeType {
    pub members: Vec<Type>,
    pub name: Option<Arc<str>>,
}

#[derive(Debug)]
pub enum TypeKind {
    Any,
    Never,
    Void,
    Null,
    Boolean,
    Numeric,
    String,
    BooleanLiteral(bool),
    NumericLiteral(f64),
    StringLiteral(Arc<str>),
    Union(CompositeType),
    Intersection(CompositeType),
    /// Generic type parameters are not supported at run time.
    TypeParameter(Option<Arc<str>>),
    Object(ObjectType),
}

impl TypeKind {
    pub fn tag(&self) -> TypeTag {
        match self {
            TypeKind::Any => TypeTag::Any,
            TypeKind::Never => TypeTag::Never,
            TypeKind::Void => TypeTag::Void,
            TypeKind::Null => TypeTag::Null,
            TypeKind::Boolean => TypeTag::Boolean,
            TypeKind::Numeric => TypeTag::Numeric,
            TypeKind::String => TypeTag::String,
            TypeKind::BooleanLiteral(_) => TypeTag::BooleanLiteral,
            TypeKind::NumericLiteral(_) => TypeTag::NumericLiteral,
            TypeKind::StringLiteral(_) => TypeTag::StringLiteral,
            TypeKind::Union(_) => TypeTag::Union,
            TypeKind::Intersection(_) => TypeTag::Intersection,
            TypeKind::TypeParameter(_) => TypeTag::TypeParameter,
            TypeKind::Object(_) => TypeTag::Object,
        }
    }
}

/// A type descriptor: identity plus structure.
#[derive(Debug)]
pub struct TypeDescriptor {
    identity: IdentitySlot,
    kind: TypeKind,
}

/// Shared handle to a [`TypeDescriptor`].
///
/// Cloning a `Type` shares the descriptor; [`Type::ptr_eq`] is the identity
/// comparison used for the `source === target` short-circuit.
#[derive(Clone)]
pub struct Type(Arc<TypeDescriptor>);

impl Type {
    pub fn new(kind: TypeKind) -> Self {
        Type(Arc::new(TypeDescriptor {
            identity: IdentitySlot::new(),
            kind,
        }))
    }

    pub fn any() -> Self {
        Self::new(TypeKind::Any)
    }

    pub fn never() -> Self {
        Self::new(TypeKind::Never)
    }

    pub fn void() -> Self {
        Self::new(TypeKind::Void)
    }

    pub fn null() -> Self {
        Self::new(TypeKind::Null)
    }

    pub fn boolean() -> Self {
        Self::new(TypeKind::Boolean)
    }

    pub fn numeric() -> Self {
        Self::new(TypeKind::Numeric)
    }

    pub fn string() -> Self {
        Self::new(TypeKind::String)
    }

    pub fn boolean_literal(value: bool) -> Self {
        Self::new(TypeKind::BooleanLiteral(value))
    }

    pub fn numeric_literal(value: f64) -> Self {
        Self::new(TypeKind::NumericLiteral(value))
    }

    pub fn string_literal(value: &str) -> Self {
        Self::new(TypeKind::StringLiteral(Arc::from(value)))
    }

    pub fn union(members: Vec<Type>) -> Self {
        Self::new(TypeKind::Union(CompositeType {
            members,
            name: None,
        }))
    }

    pub fn intersection(members: Vec<Type>) -> Self {
        Self::new(TypeKind::Intersection(CompositeType {
            members,
            name: None,
        }))
    }

    pub fn type_parameter(name: Option<&str>) -> Self {
        Self::new(TypeKind::TypeParameter(name.map(Arc::from)))
    }

    /// Create a fully defined object type.
    pub fn object(name: Option<&str>, shape: ObjectShape) -> Self {
        let object = ObjectType::declared(name);
        // A fresh OnceLock cannot already be set.
        let _ = object.shape.set(shape);
        Self::new(TypeKind::Object(object))
    }

    /// Create an object type whose shape is supplied later with
    /// [`define_object`](Self::define_object). Used to build self-referential
    /// descriptors.
    pub fn declare_object(name: Option<&str>) -> Self {
        Self::new(TypeKind::Object(ObjectType::declared(name)))
    }

    /// Supply the shape of an object type created with
    /// [`declare_object`](Self::declare_object).
    pub fn define_object(&self, shape: ObjectShape) -> Result<(), EngineError> {
        let object = self.as_object().ok_or_else(|| {
            EngineError::MalformedDescriptor(format!(
                "cannot define members on a {:?} descriptor",
                self.tag()
            ))
        })?;
        object.shape.set(shape).map_err(|_| {
            EngineError::MalformedDescriptor("object type shape defined twice".to_string())
        })
    }

    #[inline]
    pub fn kind(&self) -> &TypeKind {
        &self.0.kind
    }

    #[inline]
    pub fn tag(&self) -> TypeTag {
        self.0.kind.tag()
    }

    /// Identity of this descriptor, assigned on first use.
    #[inline]
    pub fn id(&self) -> DescriptorId {
        self.0.identity.get_or_assign()
    }

    /// Identity if one has been assigned yet.
    #[inline]
    pub fn assigned_id(&self) -> Option<DescriptorId> {
        self.0.identity.get()
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Type) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Address of the shared descriptor, used as a visited-set key by
    /// printers that must not assign identities.
    #[inline]
    pub(crate) fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }

    #[inline]
    pub fn as_object(&self) -> Option<&ObjectType> {
        match &self.0.kind {
            TypeKind::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Shape of an object type. Fails for non-object descriptors and for
    /// object types that were declared but never defined.
    pub fn object_shape(&self) -> Result<&ObjectShape, EngineError> {
        match self.as_object() {
            Some(object) => object.shape(),
            None => Err(EngineError::MalformedDescriptor(format!(
                "expected an object type, found {:?}",
                self.tag()
            ))),
        }
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}{:?}", self.0.identity, self.0.kind)
    }
}

/// Object type: properties, call/construct signatures and index types.
pub struct ObjectType {
    pub name: Option<Arc<str>>,
    shape: OnceLock<ObjectShape>,
}

impl ObjectType {
    fn declared(name: Option<&str>) -> Self {
        Self {
            name: name.map(Arc::from),
            shape: OnceLock::new(),
        }
    }

    pub fn shape(&self) -> Result<&ObjectShape, EngineError> {
        self.shape.get().ok_or_else(|| {
            EngineError::MalformedDescriptor(format!(
                "object type {} was declared but never defined",
                self.name.as_deref().unwrap_or("<anonymous>")
            ))
        })
    }

    #[inline]
    pub fn is_defined(&self) -> bool {
        self.shape.get().is_some()
    }
}

// Shallow: object types may refer to themselves.
impl fmt::Debug for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("ObjectType");
        debug.field("name", &self.name);
        match self.shape.get() {
            Some(shape) => {
                let names: Vec<&str> = shape.properties.keys().map(|k| &**k).collect();
                debug
                    .field("properties", &names)
                    .field("call_signatures", &shape.call_signatures.len())
                    .field("construct_signatures", &shape.construct_signatures.len())
                    .field("numeric_index", &shape.numeric_index_type.is_some())
                    .field("string_index", &shape.string_index_type.is_some());
            }
            None => {
                debug.field("shape", &"<undefined>");
            }
        }
        debug.finish()
    }
}

#[derive(Debug, Default)]
pub struct ObjectShape {
    pub properties: IndexMap<Arc<str>, PropertyDescriptor>,
    pub call_signatures: Vec<Signature>,
    pub construct_signatures: Vec<Signature>,
    pub numeric_index_type: Option<Type>,
    pub string_index_type: Option<Type>,
}

impl ObjectShape {
    #[inline]
    pub fn has_signatures(&self) -> bool {
        !self.call_signatures.is_empty() || !self.construct_signatures.is_empty()
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.get(name)
    }
}

#[derive(Debug, Clone)]
pub struct PropertyDescriptor {
    pub name: Arc<str>,
    pub ty: Type,
    pub optional: bool,
}

/// A call or construct signature.
#[derive(Debug)]
pub struct SignatureDescriptor {
    identity: IdentitySlot,
    pub args: SmallVec<[Type; 4]>,
    pub mandatory_args: usize,
    pub varargs: Option<Type>,
    pub result: Type,
}

/// Shared handle to a [`SignatureDescriptor`].
#[derive(Clone)]
pub struct Signature(Arc<SignatureDescriptor>);

impl Signature {
    pub fn new(
        args: impl IntoIterator<Item = Type>,
        mandatory_args: usize,
        varargs: Option<Type>,
        result: Type,
    ) -> Self {
        Signature(Arc::new(SignatureDescriptor {
            identity: IdentitySlot::new(),
            args: args.into_iter().collect(),
            mandatory_args,
            varargs,
            result,
        }))
    }

    #[inline]
    pub fn args(&self) -> &[Type] {
        &self.0.args
    }

    #[inline]
    pub fn mandatory_args(&self) -> usize {
        self.0.mandatory_args
    }

    #[inline]
    pub fn varargs(&self) -> Option<&Type> {
        self.0.varargs.as_ref()
    }

    #[inline]
    pub fn result(&self) -> &Type {
        &self.0.result
    }

    #[inline]
    pub fn id(&self) -> DescriptorId {
        self.0.identity.get_or_assign()
    }

    #[inline]
    pub fn assigned_id(&self) -> Option<DescriptorId> {
        self.0.identity.get()
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Signature) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Parameter type expected at argument position `index`: the declared
    /// parameter, else the variadic tail.
    pub fn param_at(&self, index: usize) -> Option<&Type> {
        self.0.args.get(index).or(self.0.varargs.as_ref())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
#[path = "../tests/types_tests.rs"]
mod tests;
