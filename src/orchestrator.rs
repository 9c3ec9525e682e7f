//! The model acquisition orchestrator.
//!
//! Reconciles three independently-timed sources of truth — the
//! synchronously-fetched catalog, on-demand exploration calls and the
//! continuously-pushed event feed — into one consistent view that display
//! code can render without bookkeeping of its own.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use futures::{
    future::{BoxFuture, Shared},
    FutureExt, StreamExt,
};

use crate::clients::HubClient;
use crate::errors::{Error, Result};
use crate::event_log::EventLog;
use crate::inspections::{InspectionCache, VariantKey};
use crate::protocol::{
    CatalogEntry, DownloadReceipt, ExplorationResult, Settings, TokenReceipt, VariantId,
};
use crate::selection::SelectionState;
use crate::utils::asynchronous::{abort_on_drop, spawn, AbortOnDropHandle};

/// Outcome of a coalesced in-flight operation, shared by every caller
/// that joined it.
type SharedOutcome<T> = Shared<BoxFuture<'static, Result<T>>>;

#[derive(Default)]
struct OrchestratorState {
    catalog: Vec<CatalogEntry>,
    selection: SelectionState,
    inspections: InspectionCache,
    events: EventLog,
    /// Shared status line. Last writer wins: when two operations finish
    /// out of order the slot reflects whichever finished last. Callers
    /// needing certainty correlate via the cache or the event log.
    message: String,
    explorations_in_flight: HashMap<VariantKey, SharedOutcome<ExplorationResult>>,
    downloads_in_flight: HashMap<VariantKey, SharedOutcome<DownloadReceipt>>,
}

/// Owner of all mutable acquisition state for one session.
///
/// All state lives behind a single mutation gate; the transport layer
/// only ever delivers results back through it and the lock is never held
/// across an await.
pub struct Orchestrator {
    client: Box<dyn HubClient>,
    state: Arc<Mutex<OrchestratorState>>,
    _event_feed: AbortOnDropHandle,
}

impl Orchestrator {
    /// Fetches the catalog once, seeds the per-model selections and opens
    /// the push channel for the lifetime of the session.
    ///
    /// A catalog transport failure is recorded in the message slot and
    /// leaves the catalog empty; there is no automatic retry. A model
    /// arriving with no variants is surfaced the same way but its entry
    /// stays loaded.
    pub async fn activate(client: Box<dyn HubClient>) -> Self {
        let state = Arc::new(Mutex::new(OrchestratorState::default()));

        match client.fetch_catalog().await {
            Ok(catalog) => {
                let mut st = state.lock().unwrap();
                for entry in &catalog {
                    if let Err(err) = st.selection.seed(entry) {
                        log::warn!("{err}");
                        st.message = err.to_string();
                    }
                }
                st.catalog = catalog;
            }
            Err(err) => {
                log::warn!("catalog fetch failed: {err}");
                state.lock().unwrap().message = format!("catalog unavailable: {err}");
            }
        }

        let feed_state = Arc::clone(&state);
        let mut events = client.subscribe_events();
        let (feed, feed_handle) = abort_on_drop(async move {
            while let Some(event) = events.next().await {
                feed_state.lock().unwrap().events.record(&event);
            }
            // Connection loss ends the feed silently for the session.
            log::debug!("event feed ended");
        });
        spawn(async move {
            let _ = feed.await;
        });

        Self {
            client,
            state,
            _event_feed: feed_handle,
        }
    }

    /// Probes availability and fit for the currently selected variant of
    /// `model_id`.
    ///
    /// Concurrent calls for the same (model, variant) key coalesce into a
    /// single underlying request whose outcome every caller observes. On
    /// success the result replaces the cache entry for that key and the
    /// message slot is set from the readiness decision table; on failure
    /// the cache is untouched and the call may simply be retried.
    pub async fn explore(&self, model_id: &str) -> Result<ExplorationResult> {
        let key = self.selected_key(model_id)?;

        let outcome = {
            let mut st = self.state.lock().unwrap();
            if let Some(pending) = st.explorations_in_flight.get(&key) {
                pending.clone()
            } else {
                let request = self.client.explore(&key.model_id, &key.variant_id);
                let state = Arc::clone(&self.state);
                let owned_key = key.clone();
                let pending = async move {
                    let outcome = request.await;
                    let mut st = state.lock().unwrap();
                    // Release the key exactly once, on either outcome, so a
                    // failure never deadlocks future requests for it.
                    st.explorations_in_flight.remove(&owned_key);
                    match outcome {
                        Ok(result) => {
                            st.message = exploration_message(&result);
                            st.inspections.insert(owned_key, result.clone());
                            Ok(result)
                        }
                        Err(err) => {
                            st.message = format!("exploration failed: {err}");
                            Err(err)
                        }
                    }
                }
                .boxed()
                .shared();
                st.explorations_in_flight
                    .insert(key.clone(), pending.clone());
                pending
            }
        };

        outcome.await
    }

    /// Downloads the currently selected variant of `model_id`.
    ///
    /// Coalesces per key exactly like [`Self::explore`]. A prior
    /// exploration is not required, and a cached DOES_NOT_FIT verdict is
    /// deliberately not enforced here; warning or blocking on fit is a
    /// display-layer decision.
    pub async fn download(&self, model_id: &str) -> Result<DownloadReceipt> {
        let key = self.selected_key(model_id)?;

        let outcome = {
            let mut st = self.state.lock().unwrap();
            if let Some(pending) = st.downloads_in_flight.get(&key) {
                pending.clone()
            } else {
                st.message = format!("downloading {}:{} ...", key.model_id, key.variant_id);
                let request = self.client.download(&key.model_id, &key.variant_id);
                let state = Arc::clone(&self.state);
                let owned_key = key.clone();
                let pending = async move {
                    let outcome = request.await;
                    let mut st = state.lock().unwrap();
                    st.downloads_in_flight.remove(&owned_key);
                    match outcome {
                        Ok(receipt) => {
                            st.message = format!(
                                "downloaded {} ({} GB)",
                                receipt.repo_id,
                                bytes_to_gb(receipt.total_bytes)
                            );
                            Ok(receipt)
                        }
                        Err(err) => {
                            st.message = format!("download failed: {err}");
                            Err(err)
                        }
                    }
                }
                .boxed()
                .shared();
                st.downloads_in_flight.insert(key.clone(), pending.clone());
                pending
            }
        };

        outcome.await
    }

    /// Overwrites the selected variant for `model_id`.
    ///
    /// Never invalidates inspection cache entries for the previously
    /// selected variant; they stay addressable by their own key.
    pub fn select_variant(&self, model_id: &str, variant_id: &str) -> Result<()> {
        let mut guard = self.state.lock().unwrap();
        let st = &mut *guard;
        let entry = st
            .catalog
            .iter()
            .find(|m| m.id == model_id)
            .ok_or_else(|| Error::UnknownModel(model_id.to_string()))?;
        st.selection.select(entry, variant_id)
    }

    pub async fn fetch_settings(&self) -> Result<Settings> {
        self.client.fetch_settings().await
    }

    pub async fn save_settings(&self, settings: &Settings) -> Result<Settings> {
        match self.client.save_settings(settings).await {
            Ok(saved) => {
                self.state.lock().unwrap().message = "settings saved.".to_string();
                Ok(saved)
            }
            Err(err) => {
                self.state.lock().unwrap().message = format!("saving settings failed: {err}");
                Err(err)
            }
        }
    }

    pub async fn save_token(&self, token: &str) -> Result<TokenReceipt> {
        match self.client.save_token(token).await {
            Ok(receipt) => {
                self.state.lock().unwrap().message =
                    format!("token stored using {}", receipt.storage);
                Ok(receipt)
            }
            Err(err) => {
                self.state.lock().unwrap().message = format!("saving token failed: {err}");
                Err(err)
            }
        }
    }

    /// Immutable catalog snapshot for this session.
    pub fn catalog(&self) -> Vec<CatalogEntry> {
        self.state.lock().unwrap().catalog.clone()
    }

    /// Current content of the shared status line.
    pub fn message(&self) -> String {
        self.state.lock().unwrap().message.clone()
    }

    /// Event log lines, newest first.
    pub fn event_lines(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .events
            .lines()
            .map(str::to_string)
            .collect()
    }

    pub fn selected_variant(&self, model_id: &str) -> Option<VariantId> {
        self.state
            .lock()
            .unwrap()
            .selection
            .selected(model_id)
            .cloned()
    }

    /// Cached exploration result for an explicit (model, variant) key,
    /// regardless of the current selection.
    pub fn inspection(&self, model_id: &str, variant_id: &str) -> Option<ExplorationResult> {
        self.state
            .lock()
            .unwrap()
            .inspections
            .get(&VariantKey::new(model_id, variant_id))
            .cloned()
    }

    fn selected_key(&self, model_id: &str) -> Result<VariantKey> {
        let st = self.state.lock().unwrap();
        let entry = st
            .catalog
            .iter()
            .find(|m| m.id == model_id)
            .ok_or_else(|| Error::UnknownModel(model_id.to_string()))?;
        let variant_id = st
            .selection
            .selected(model_id)
            .ok_or_else(|| Error::EmptyVariantList(entry.id.clone()))?;
        Ok(VariantKey::new(model_id, variant_id.clone()))
    }
}

/// Readiness decision table for a finished exploration, in rule order:
/// credentials first, disk second, otherwise ready.
fn exploration_message(result: &ExplorationResult) -> String {
    if result.probe.auth_required {
        "credential required for this repo.".to_string()
    } else if !result.disk.enough_for_download {
        format!(
            "insufficient disk space; free: {} GB.",
            result.disk.free_gb
        )
    } else {
        "exploration complete; readiness updated.".to_string()
    }
}

fn bytes_to_gb(bytes: u64) -> String {
    format!("{:.2}", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
}
