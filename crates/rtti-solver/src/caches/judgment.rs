//! Judgment cache.
//!
//! Maps an ordered pair of descriptor identities to a boolean result. The
//! discriminator keeps type pairs, signature pairs and function-tag pairs
//! apart even when their identities happen to coincide numerically.
//!
//! Entries are never invalidated: descriptors are immutable once they have
//! an identity. The cache only saves work; recomputing a judgment yields the
//! same answer.

use crate::types::DescriptorId;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JudgmentKind {
    /// `source` type is assignable to `target` type.
    Type,
    /// `source` signature is assignable to `target` signature.
    Signature,
    /// The descriptor tagged on a function satisfies the signatures of an
    /// object type.
    FunctionTag,
}

impl JudgmentKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            JudgmentKind::Type => "type",
            JudgmentKind::Signature => "signature",
            JudgmentKind::FunctionTag => "function_tag",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JudgmentKey {
    pub kind: JudgmentKind,
    pub source: DescriptorId,
    pub target: DescriptorId,
}

impl JudgmentKey {
    #[inline]
    pub const fn types(source: DescriptorId, target: DescriptorId) -> Self {
        Self {
            kind: JudgmentKind::Type,
            source,
            target,
        }
    }

    #[inline]
    pub const fn signatures(source: DescriptorId, target: DescriptorId) -> Self {
        Self {
            kind: JudgmentKind::Signature,
            source,
            target,
        }
    }

    #[inline]
    pub const fn function_tag(tag: DescriptorId, target: DescriptorId) -> Self {
        Self {
            kind: JudgmentKind::FunctionTag,
            source: tag,
            target,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JudgmentCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

#[derive(Debug, Default)]
pub struct JudgmentCache {
    entries: FxHashMap<JudgmentKey, bool>,
    hits: u64,
    misses: u64,
}

impl JudgmentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a judgment, recording a hit or a miss.
    pub fn lookup(&mut self, key: &JudgmentKey) -> Option<bool> {
        match self.entries.get(key) {
            Some(&result) => {
                self.hits += 1;
                Some(result)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Read without touching the statistics.
    pub fn peek(&self, key: &JudgmentKey) -> Option<bool> {
        self.entries.get(key).copied()
    }

    pub fn insert(&mut self, key: JudgmentKey, result: bool) {
        self.entries.insert(key, result);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }

    pub fn stats(&self) -> JudgmentCacheStats {
        JudgmentCacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.entries.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_records_hits_and_misses() {
        let mut cache = JudgmentCache::new();
        let key = JudgmentKey::types(DescriptorId(1), DescriptorId(2));
        assert_eq!(cache.lookup(&key), None);
        cache.insert(key, true);
        assert_eq!(cache.lookup(&key), Some(true));
        assert_eq!(
            cache.stats(),
            JudgmentCacheStats {
                hits: 1,
                misses: 1,
                entries: 1
            }
        );
    }

    #[test]
    fn kinds_do_not_collide() {
        let mut cache = JudgmentCache::new();
        cache.insert(JudgmentKey::types(DescriptorId(1), DescriptorId(2)), true);
        assert_eq!(
            cache.peek(&JudgmentKey::signatures(DescriptorId(1), DescriptorId(2))),
            None
        );
        assert_eq!(
            cache.peek(&JudgmentKey::function_tag(DescriptorId(1), DescriptorId(2))),
            None
        );
    }

    #[test]
    fn pairs_are_ordered() {
        let mut cache = JudgmentCache::new();
        cache.insert(JudgmentKey::types(DescriptorId(1), DescriptorId(2)), false);
        assert_eq!(
            cache.peek(&JudgmentKey::types(DescriptorId(2), DescriptorId(1))),
            None
        );
    }

    #[test]
    fn clear_resets_everything() {
        let mut cache = JudgmentCache::new();
        let key = JudgmentKey::types(DescriptorId(3), DescriptorId(4));
        cache.insert(key, true);
        cache.lookup(&key);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats(), JudgmentCacheStats::default());
    }
}
