//! Structural compatibility between descriptors.
//!
//! `is_compatible(source, target)` answers "can a value of type `source` be
//! used where `target` is expected". The rules mirror the host type system,
//! including its unsound corners:
//!
//! - `void`, `any` and `null` are accepted as a source for every target.
//! - Literal types only match the same literal; primitives accept their
//!   literals.
//! - A union source relates member-wise: every member must be assignable.
//! - A union target needs one matching member, an intersection target needs
//!   all of them.
//! - Object types relate by shape: every target property, signature and index
//!   type must be provided by the source. Extra source properties are ignored.
//!
//! Type parameters are stricter than in the host: a type parameter on either
//! side fails with [`EngineError::UnsupportedTypeParameter`], even against
//! `any` or a primitive target, instead of answering true or false.

use crate::caches::JudgmentKey;
use crate::diagnostics::EngineError;
use crate::engine::TypeEngine;
use crate::types::{ObjectShape, PropertyDescriptor, Type, TypeKind, TypeTag};

impl TypeEngine {
    /// Is `source` assignable to `target`?
    ///
    /// Memoized per identity pair. Identical handles are compatible without
    /// consulting the cache.
    pub fn is_compatible(&mut self, source: &Type, target: &Type) -> Result<bool, EngineError> {
        if source.ptr_eq(target) {
            return Ok(true);
        }
        let key = JudgmentKey::types(source.id(), target.id());
        self.judge(key, |engine| engine.uncached_is_compatible(source, target))
    }

    fn uncached_is_compatible(&mut self, source: &Type, target: &Type) -> Result<bool, EngineError> {
        let source_tag = source.tag();
        if source_tag.is_universal_source()
            && (!self.options.strict_nullable_sources || source_tag == TypeTag::Any)
        {
            return Ok(true);
        }
        if source_tag == TypeTag::TypeParameter {
            return Err(EngineError::UnsupportedTypeParameter);
        }
        if let TypeKind::Union(union) = source.kind() {
            for member in &union.members {
                if !self.is_compatible(member, target)? {
                    return Ok(false);
                }
            }
            return Ok(true);
        }

        match target.kind() {
            TypeKind::Any => Ok(true),
            TypeKind::Boolean => Ok(matches!(
                source_tag,
                TypeTag::Boolean | TypeTag::BooleanLiteral
            )),
            TypeKind::Numeric => Ok(matches!(
                source_tag,
                TypeTag::Numeric | TypeTag::NumericLiteral
            )),
            TypeKind::String => Ok(matches!(
                source_tag,
                TypeTag::String | TypeTag::StringLiteral
            )),
            TypeKind::BooleanLiteral(expected) => {
                Ok(matches!(source.kind(), TypeKind::BooleanLiteral(actual) if actual == expected))
            }
            TypeKind::NumericLiteral(expected) => {
                Ok(matches!(source.kind(), TypeKind::NumericLiteral(actual) if actual == expected))
            }
            TypeKind::StringLiteral(expected) => {
                Ok(matches!(source.kind(), TypeKind::StringLiteral(actual) if actual == expected))
            }
            TypeKind::Void | TypeKind::Null => Ok(source_tag == target.tag()),
            TypeKind::Intersection(intersection) => {
                for member in &intersection.members {
                    if !self.is_compatible(source, member)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            TypeKind::Union(union) => {
                for member in &union.members {
                    if self.is_compatible(source, member)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            TypeKind::TypeParameter(_) => Err(EngineError::UnsupportedTypeParameter),
            TypeKind::Never => Ok(source_tag == TypeTag::Never),
            TypeKind::Object(target_object) => {
                let target_shape = target_object.shape()?;
                match source.kind() {
                    TypeKind::Intersection(_) => Err(EngineError::UnsupportedIntersectionSource),
                    TypeKind::Object(source_object) => {
                        let source_shape = source_object.shape()?;
                        self.is_shape_compatible(source_shape, target_shape)
                    }
                    _ => Ok(false),
                }
            }
        }
    }

    /// Structural object check. The composite is part of a larger judgment,
    /// so only its leaves are cached.
    fn is_shape_compatible(
        &mut self,
        source: &ObjectShape,
        target: &ObjectShape,
    ) -> Result<bool, EngineError> {
        for prop in target.properties.values() {
            if !self.has_compatible_property(source, prop)? {
                return Ok(false);
            }
        }

        if !self.all_signatures_matched(&target.call_signatures, &source.call_signatures)? {
            return Ok(false);
        }
        if !self.all_signatures_matched(
            &target.construct_signatures,
            &source.construct_signatures,
        )? {
            return Ok(false);
        }

        if !self.is_index_compatible(
            source.numeric_index_type.as_ref(),
            target.numeric_index_type.as_ref(),
        )? {
            return Ok(false);
        }
        self.is_index_compatible(
            source.string_index_type.as_ref(),
            target.string_index_type.as_ref(),
        )
    }

    fn has_compatible_property(
        &mut self,
        source: &ObjectShape,
        target_prop: &PropertyDescriptor,
    ) -> Result<bool, EngineError> {
        match source.property(&target_prop.name) {
            None => Ok(target_prop.optional),
            // An optional source property cannot satisfy a required one.
            Some(source_prop) if source_prop.optional && !target_prop.optional => Ok(false),
            Some(source_prop) => self.is_compatible(&source_prop.ty, &target_prop.ty),
        }
    }

    fn is_index_compatible(
        &mut self,
        source: Option<&Type>,
        target: Option<&Type>,
    ) -> Result<bool, EngineError> {
        match (source, target) {
            (_, None) => Ok(true),
            (None, Some(_)) => Ok(false),
            (Some(source), Some(target)) => self.is_compatible(source, target),
        }
    }
}

#[cfg(test)]
#[path = "../tests/compat_tests.rs"]
mod tests;
