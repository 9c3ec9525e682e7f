//! Tracks which variant is currently selected per model.

use std::collections::HashMap;

use crate::errors::{Error, Result};
use crate::protocol::{CatalogEntry, ModelId, VariantId};

/// Per-model selected variant.
///
/// Every selection is drawn from that model's own variant list. A model
/// that arrived with an empty variant list never gets an entry here and
/// stays unselectable until fixed upstream.
#[derive(Debug, Default)]
pub struct SelectionState {
    selected: HashMap<ModelId, VariantId>,
}

impl SelectionState {
    /// Defaults the selection to the model's first variant.
    pub fn seed(&mut self, entry: &CatalogEntry) -> Result<()> {
        let first = entry
            .variants
            .first()
            .ok_or_else(|| Error::EmptyVariantList(entry.id.clone()))?;
        self.selected.insert(entry.id.clone(), first.id.clone());
        Ok(())
    }

    /// Overwrites the selection for `entry` after membership validation.
    pub fn select(&mut self, entry: &CatalogEntry, variant_id: &str) -> Result<()> {
        if !entry.variants.iter().any(|v| v.id == variant_id) {
            return Err(Error::UnknownVariant {
                model_id: entry.id.clone(),
                variant_id: variant_id.to_string(),
            });
        }
        self.selected
            .insert(entry.id.clone(), variant_id.to_string());
        Ok(())
    }

    pub fn selected(&self, model_id: &str) -> Option<&VariantId> {
        self.selected.get(model_id)
    }
}
