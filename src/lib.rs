//! rtti: run-time enforcement of statically declared type contracts.
//!
//! The compiler erases types; for every boundary it could not verify it emits
//! a type descriptor and routes the value or call through a [`TypeEngine`].
//! This crate re-exports the workspace crates under one roof:
//!
//! - [`common`]: source locations and display limits shared by every crate
//! - [`solver`]: descriptors, the compatibility and conformance engine,
//!   call interception, diagnostics and the wire format

pub use rtti_common as common;
pub use rtti_common::SourceLocation;

pub use rtti_solver as solver;
pub use rtti_solver::{
    EngineError, EngineOptions, FunctionObject, FunctionRef, JsObject, ObjectBuilder,
    SignatureBuilder, Type, TypeEngine, TypeFormatter, TypeViolation, Value, ValueFormatter,
    WireDocument, decode_document,
};
