//! Signature compatibility.
//!
//! Parameters are compared bivariantly: a parameter pair is accepted when
//! either side is assignable to the other. This mirrors the host type
//! system's treatment of method parameters, and is unsound.

use crate::caches::JudgmentKey;
use crate::diagnostics::EngineError;
use crate::engine::TypeEngine;
use crate::types::{Signature, Type};

impl TypeEngine {
    /// Is signature `x` assignable to signature `y`?
    pub fn are_signatures_compatible(
        &mut self,
        x: &Signature,
        y: &Signature,
    ) -> Result<bool, EngineError> {
        if x.ptr_eq(y) {
            return Ok(true);
        }
        let key = JudgmentKey::signatures(x.id(), y.id());
        self.judge(key, |engine| engine.uncached_are_signatures_compatible(x, y))
    }

    fn uncached_are_signatures_compatible(
        &mut self,
        x: &Signature,
        y: &Signature,
    ) -> Result<bool, EngineError> {
        // Callers bound to y may pass as few as y.mandatory_args arguments.
        if x.mandatory_args() > y.mandatory_args() {
            return Ok(false);
        }

        for (index, param) in x.args().iter().enumerate() {
            // Parameters y does not declare are optional in x, as guaranteed
            // by the arity check above.
            let Some(y_param) = y.args().get(index) else {
                continue;
            };
            if !self.is_bivariant_compatible(param, y_param)? {
                return Ok(false);
            }
        }

        // A rest parameter behaves like an unbounded run of optional
        // parameters.
        if let Some(rest) = x.varargs() {
            for y_param in y.args().iter().skip(x.args().len()) {
                if !self.is_bivariant_compatible(y_param, rest)? {
                    return Ok(false);
                }
            }
        }

        self.is_compatible(y.result(), x.result())
    }

    fn is_bivariant_compatible(&mut self, a: &Type, b: &Type) -> Result<bool, EngineError> {
        Ok(self.is_compatible(a, b)? || self.is_compatible(b, a)?)
    }

    /// Every signature in `required` must be matched by at least one
    /// signature in `candidates` that is assignable to it. Quadratic.
    pub(crate) fn all_signatures_matched(
        &mut self,
        required: &[Signature],
        candidates: &[Signature],
    ) -> Result<bool, EngineError> {
        'required: for wanted in required {
            for candidate in candidates {
                if self.are_signatures_compatible(candidate, wanted)? {
                    continue 'required;
                }
            }
            return Ok(false);
        }
        Ok(true)
    }

    /// Do the signatures tagged on a function satisfy the call and construct
    /// signatures of `target`? Cached per (tag, target) pair.
    pub(crate) fn function_tag_matches(
        &mut self,
        tag: &Type,
        target: &Type,
    ) -> Result<bool, EngineError> {
        let key = JudgmentKey::function_tag(tag.id(), target.id());
        self.judge(key, |engine| {
            let own = tag.object_shape()?;
            let wanted = target.object_shape()?;
            Ok(
                engine.all_signatures_matched(&wanted.call_signatures, &own.call_signatures)?
                    && engine.all_signatures_matched(
                        &wanted.construct_signatures,
                        &own.construct_signatures,
                    )?,
            )
        })
    }
}

#[cfg(test)]
#[path = "../tests/signatures_tests.rs"]
mod tests;
