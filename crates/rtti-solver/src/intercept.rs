//! Call-boundary interception.
//!
//! Generated code calls through [`TypeEngine::apply`] instead of invoking a
//! function directly. Tagged functions have their arguments checked against
//! their declared signatures first; untagged functions are called as-is.

use crate::diagnostics::EngineError;
use crate::engine::TypeEngine;
use crate::format::{TypeFormatter, ValueFormatter};
use crate::types::{Signature, Type};
use crate::value::{FunctionRef, Value};
use rtti_common::SourceLocation;
use tracing::debug;

impl TypeEngine {
    /// Attach `descriptor` to `function` and hand the function back.
    ///
    /// The descriptor must be an object type; its call and construct
    /// signatures become the function's checked signatures. Registering again
    /// replaces the tag.
    pub fn register_type(
        &mut self,
        descriptor: Type,
        function: &FunctionRef,
    ) -> Result<FunctionRef, EngineError> {
        descriptor.object_shape()?;
        let id = descriptor.id();
        debug!(descriptor = id.0, name = ?function.name(), "registering function descriptor");
        function.set_tag(descriptor);
        Ok(FunctionRef::clone(function))
    }

    /// Invoke `function` with `receiver` bound, checking the arguments first
    /// when the function is tagged.
    pub fn apply(
        &mut self,
        function: &FunctionRef,
        receiver: Value,
        args: &[Value],
    ) -> Result<Value, EngineError> {
        if let Some(tag) = function.tag() {
            self.check_call_boundary(&tag, args)?;
        }
        function.invoke(self, &receiver, args)
    }

    /// [`apply`](Self::apply) for a callee that is only known as a value.
    pub fn call_value(
        &mut self,
        callee: &Value,
        receiver: Value,
        args: &[Value],
    ) -> Result<Value, EngineError> {
        match callee {
            Value::Function(function) => self.apply(function, receiver, args),
            other => Err(EngineError::NotCallable(
                ValueFormatter::new().format(other),
            )),
        }
    }

    /// Accept the call if any call or construct signature of `tag` accepts
    /// `args`; otherwise report a violation.
    fn check_call_boundary(&mut self, tag: &Type, args: &[Value]) -> Result<(), EngineError> {
        let shape = tag.object_shape()?;
        for signature in shape
            .call_signatures
            .iter()
            .chain(shape.construct_signatures.iter())
        {
            if self.values_match_signature(signature, args)? {
                debug!(arguments = args.len(), "call accepted");
                return Ok(());
            }
        }

        debug!(arguments = args.len(), "no signature accepts the call");
        let message = format!(
            "Function:\n{}\nis not callable with arguments:\n[{}]",
            TypeFormatter::new().format(tag),
            ValueFormatter::new().format_list(args)
        );
        Err(self.report_violation(message, SourceLocation::unknown()))
    }

    fn values_match_signature(
        &mut self,
        signature: &Signature,
        args: &[Value],
    ) -> Result<bool, EngineError> {
        if args.len() < signature.mandatory_args() {
            return Ok(false);
        }
        for (index, arg) in args.iter().enumerate() {
            // Trailing arguments without a slot are tolerated.
            let Some(param) = signature.param_at(index) else {
                return Ok(true);
            };
            if !self.is_type(arg, param)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
#[path = "../tests/intercept_tests.rs"]
mod tests;
