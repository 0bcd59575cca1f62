use std::future::Future;

use tokio_util::sync::CancellationToken;

/// The single outstanding fetch of a search session or detail loader.
///
/// Dropping it cancels the fetch, so replacing or clearing the slot is all it
/// takes to abandon a request.
pub(crate) struct InFlight {
    pub generation: u64,
    token: CancellationToken,
}

impl InFlight {
    pub fn new(generation: u64) -> (Self, CancellationToken) {
        let token = CancellationToken::new();
        (
            Self {
                generation,
                token: token.clone(),
            },
            token,
        )
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Drive `fut` until it completes or `token` fires. `None` means cancelled;
/// the future is dropped, which aborts the underlying request.
pub(crate) async fn until_cancelled<F: Future>(
    token: &CancellationToken,
    fut: F,
) -> Option<F::Output> {
    tokio::select! {
        biased;
        _ = token.cancelled() => None,
        out = fut => Some(out),
    }
}
