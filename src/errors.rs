//! Error taxonomy for orchestrator operations.
//!
//! Every failure is local to the operation that raised it: nothing here
//! crashes the orchestrator or corrupts state held for other keys. The
//! enum is `Clone` because coalesced operations share one outcome among
//! all of their callers.

use thiserror::Error;

use crate::protocol::{ModelId, VariantId};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Network or parse failure from a collaborator call. Recoverable;
    /// the user may retry.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The requested model is not in the loaded catalog.
    #[error("model '{0}' is not in the catalog")]
    UnknownModel(ModelId),

    /// The requested variant is not part of the model's variant list.
    #[error("variant '{variant_id}' is not part of model '{model_id}'")]
    UnknownVariant {
        model_id: ModelId,
        variant_id: VariantId,
    },

    /// Data contract violation from the catalog collaborator: a model
    /// arrived with no variants. The entry stays loaded but unselectable.
    #[error("model '{0}' has no variants to select")]
    EmptyVariantList(ModelId),
}

impl Error {
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
