//! Runtime Type Engine
//!
//! This crate decides, at program-run time, whether a concrete value or a
//! function call conforms to a statically declared type. The compiler emits
//! serialized type descriptors for every boundary it could not verify
//! statically; generated code then routes values and calls through the
//! entry points on [`TypeEngine`].
//!
//! - **Descriptors**: `Type` / `Signature` handles with lazily assigned identities
//! - **Compatibility**: structural subtyping between descriptors, memoized per identity pair
//! - **Conformance**: checking live [`Value`]s (objects, functions, arrays, buffers) against descriptors
//! - **Interception**: checking tagged function calls before delegating to the body
//! - **Cycle Detection**: coinductive semantics for recursive descriptors and values
mod caches;
mod compat;
mod conformance;
mod diagnostics;
mod engine;
mod format;
mod intercept;
pub mod recursion;
mod signatures;
mod type_factory;
mod types;
pub mod value;
pub mod wire;

pub use caches::{JudgmentCache, JudgmentCacheStats, JudgmentKey, JudgmentKind};
pub use diagnostics::{EngineError, ErrorSink, TypeViolation};
pub use engine::{EngineOptions, TypeEngine};
pub use format::{TypeFormatter, ValueFormatter, format_number};
pub use recursion::{RecursionGuard, RecursionProfile, RecursionResult};
pub use type_factory::{ObjectBuilder, SignatureBuilder};
pub use types::{
    CompositeType, DescriptorId, ObjectShape, ObjectType, PropertyDescriptor, Signature,
    SignatureDescriptor, Type, TypeDescriptor, TypeKind, TypeTag,
};
pub use value::{
    ArrayRef, DataView, EffectiveProperties, ElementKind, FunctionObject, FunctionRef, JsArray,
    JsObject, NativeFn, ObjectRef, TypedArray, Value,
};
pub use wire::{TypeTable, WireDocument, WireRef, WireType, decode_document};

pub use rtti_common::SourceLocation;
