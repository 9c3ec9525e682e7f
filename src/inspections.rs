//! Memoized exploration results, keyed by (model, variant).

use std::collections::HashMap;

use crate::protocol::{ExplorationResult, ModelId, VariantId};

/// Coalescing and cache key for one concrete variant of one model.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct VariantKey {
    pub model_id: ModelId,
    pub variant_id: VariantId,
}

impl VariantKey {
    pub fn new(model_id: impl Into<ModelId>, variant_id: impl Into<VariantId>) -> Self {
        Self {
            model_id: model_id.into(),
            variant_id: variant_id.into(),
        }
    }
}

/// At most one entry per key; absence means "never explored".
///
/// Entries are replaced by each successful exploration and never evicted
/// for the rest of the session, so a result stays addressable by its own
/// key even after the selection moves elsewhere.
#[derive(Debug, Default)]
pub struct InspectionCache {
    entries: HashMap<VariantKey, ExplorationResult>,
}

impl InspectionCache {
    pub fn insert(&mut self, key: VariantKey, result: ExplorationResult) {
        self.entries.insert(key, result);
    }

    pub fn get(&self, key: &VariantKey) -> Option<&ExplorationResult> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
