//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::{Error, MemberRegistry, StudentIdSync, ViewRouter};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The roster, history and session, shared by every request.
    pub view_router: Arc<Mutex<ViewRouter>>,

    /// The local timezone as a canonical timezone name, e.g. "Asia/Shanghai".
    pub local_timezone: String,
}

impl AppState {
    /// Create a new [AppState] starting on the home view with `registry` as the roster.
    ///
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Asia/Shanghai".
    pub fn new(
        registry: MemberRegistry,
        student_id_sync: StudentIdSync,
        local_timezone: &str,
    ) -> Self {
        Self {
            view_router: Arc::new(Mutex::new(ViewRouter::new(registry, student_id_sync))),
            local_timezone: local_timezone.to_owned(),
        }
    }
}

/// Lock the shared [ViewRouter], logging if the lock has been poisoned.
pub(crate) fn lock_view_router(
    view_router: &Mutex<ViewRouter>,
) -> Result<MutexGuard<'_, ViewRouter>, Error> {
    view_router
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire the view router lock: {error}"))
        .map_err(|_| Error::StateLockError)
}
