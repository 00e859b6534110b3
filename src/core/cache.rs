//! Evaluation result memoization
//!
//! Identical inputs always reproduce the same verdict, so results can be
//! memoized on (part a, part b, context hash). Entries are invalidated
//! only when the underlying spec data changes, never by time.

use std::collections::HashMap;
use std::sync::Mutex;

use sha2::{Digest, Sha256};

use crate::engine::verdict::CompatibilityResult;
use crate::specs::context::ApplicationContext;

type CacheKey = (String, String, [u8; 32]);

/// Thread-safe memo of compatibility results
#[derive(Debug, Default)]
pub struct EvaluationCache {
    entries: Mutex<HashMap<CacheKey, CompatibilityResult>>,
}

/// Hash a context's canonical JSON serialization
pub fn context_hash(ctx: &ApplicationContext) -> [u8; 32] {
    // Field order is fixed by the struct and Decimal serializes as a
    // string, so identical contexts hash identically
    let bytes = serde_json::to_vec(ctx).expect("application context serializes to JSON");
    let digest = Sha256::digest(&bytes);
    digest.into()
}

impl EvaluationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch a memoized result, if any
    pub fn lookup(
        &self,
        part_a: &str,
        part_b: &str,
        ctx: &ApplicationContext,
    ) -> Option<CompatibilityResult> {
        let key = (part_a.to_string(), part_b.to_string(), context_hash(ctx));
        let entries = match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.get(&key).cloned()
    }

    /// Memoize a result
    pub fn store(
        &self,
        part_a: &str,
        part_b: &str,
        ctx: &ApplicationContext,
        result: CompatibilityResult,
    ) {
        let key = (part_a.to_string(), part_b.to_string(), context_hash(ctx));
        let mut entries = match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.insert(key, result);
    }

    /// Drop every entry; call when the underlying spec data changes
    pub fn invalidate_all(&self) {
        let mut entries = match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.clear();
    }

    pub fn len(&self) -> usize {
        let entries = match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
