//! Async plumbing shared by the orchestrator and the HTTP client.

use futures::future::{abortable, AbortHandle, Abortable, Future};

/// Runs a future independently on the ambient tokio runtime.
///
/// **Note:** This function may spawn its own runtime if it can't find an
/// existing one, so library users are not forced to enter a runtime just
/// to activate an orchestrator.
pub fn spawn(fut: impl Future<Output = ()> + Send + 'static) {
    use std::sync::OnceLock;
    use tokio::runtime::{Builder, Handle, Runtime};

    static RUNTIME: OnceLock<Runtime> = OnceLock::new();

    if let Ok(handle) = Handle::try_current() {
        handle.spawn(fut);
    } else {
        log::warn!("No tokio runtime found. Creating a shared runtime.");
        let rt = RUNTIME.get_or_init(|| {
            Builder::new_multi_thread()
                .enable_io()
                .enable_time()
                .thread_name("workbench-kit-tokio")
                .build()
                .expect("Failed to create tokio runtime for workbench-kit")
        });
        rt.spawn(fut);
    }
}

/// A handle that aborts its associated future when dropped.
///
/// This is created from the [`abort_on_drop`] function. The orchestrator
/// holds one of these for its push-channel subscription so the feed is
/// torn down deterministically with the session.
pub struct AbortOnDropHandle(AbortHandle);

impl Drop for AbortOnDropHandle {
    fn drop(&mut self) {
        self.abort();
    }
}

impl AbortOnDropHandle {
    /// Manually aborts the future associated with this handle before it
    /// is dropped.
    pub fn abort(&mut self) {
        self.0.abort();
    }
}

/// Constructs a future + [`AbortOnDropHandle`] pair.
pub fn abort_on_drop<F, T>(future: F) -> (Abortable<F>, AbortOnDropHandle)
where
    F: Future<Output = T> + Send + 'static,
{
    let (abortable_future, abort_handle) = abortable(future);
    (abortable_future, AbortOnDropHandle(abort_handle))
}
