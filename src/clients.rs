//! Collaborator seam between the orchestrator and the hub services.

mod http;

pub use http::HttpHubClient;

use futures::{future::BoxFuture, stream::BoxStream};

use crate::errors::Result;
use crate::protocol::{
    CatalogEntry, DownloadReceipt, ExplorationResult, LiveEvent, Settings, TokenReceipt,
};

/// A client capable of talking to the catalog, probe, download and
/// settings services of one hub.
///
/// Transport policy (timeouts, retries, reconnects) belongs to the
/// implementation; the orchestrator only ever sees a resolved or failed
/// call. All methods hand back owned futures so the orchestrator can
/// coalesce and share them freely.
pub trait HubClient: Send + Sync {
    /// One-shot fetch of the full catalog.
    fn fetch_catalog(&self) -> BoxFuture<'static, Result<Vec<CatalogEntry>>>;

    /// Probes remote availability and computes a capacity-fit assessment
    /// for one variant.
    fn explore(
        &self,
        model_id: &str,
        variant_id: &str,
    ) -> BoxFuture<'static, Result<ExplorationResult>>;

    /// Requests the download of one variant, resolving once the transfer
    /// finished. Progress arrives separately over [`Self::subscribe_events`].
    fn download(
        &self,
        model_id: &str,
        variant_id: &str,
    ) -> BoxFuture<'static, Result<DownloadReceipt>>;

    fn fetch_settings(&self) -> BoxFuture<'static, Result<Settings>>;

    fn save_settings(&self, settings: &Settings) -> BoxFuture<'static, Result<Settings>>;

    fn save_token(&self, token: &str) -> BoxFuture<'static, Result<TokenReceipt>>;

    /// Long-lived subscription to the push channel.
    ///
    /// The stream ends silently when the connection is lost; whether a
    /// reconnect exists upstream is not this crate's concern.
    fn subscribe_events(&self) -> BoxStream<'static, LiveEvent>;

    fn clone_box(&self) -> Box<dyn HubClient>;
}

impl Clone for Box<dyn HubClient> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
