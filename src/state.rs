//! View state and the coordinator that drives it through a search.
//!
//! All transitions go through [`reduce`]; the [`Coordinator`] owns the
//! current [`ViewState`], replaces it with the reducer's output and notifies
//! subscribed views whenever the value changes.

use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::client::ProfileLookup;
use crate::error::{FailureKind, LookupError};
use crate::models::Profile;

/// Error shown in place of the result card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewError {
    EmptyInput,
    NotFound,
    GenericError,
}

impl From<FailureKind> for ViewError {
    fn from(kind: FailureKind) -> Self {
        match kind {
            FailureKind::EmptyHandle => ViewError::EmptyInput,
            FailureKind::NotFound => ViewError::NotFound,
            FailureKind::TransportOrServer => ViewError::GenericError,
        }
    }
}

impl From<&LookupError> for ViewError {
    fn from(err: &LookupError) -> Self {
        err.kind().into()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub user: Option<Profile>,
    pub loading: bool,
    pub error: Option<ViewError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    EmptySubmitted,
    LookupStarted,
    LookupSucceeded(Profile),
    LookupFailed(ViewError),
}

/// Computes the state that follows `event`.
///
/// Every branch builds a fresh value; nothing from the previous state leaks
/// into the next one.
pub fn reduce(_state: &ViewState, event: &Event) -> ViewState {
    match event {
        Event::EmptySubmitted => ViewState {
            user: None,
            loading: false,
            error: Some(ViewError::EmptyInput),
        },
        Event::LookupStarted => ViewState {
            user: None,
            loading: true,
            error: None,
        },
        Event::LookupSucceeded(profile) => ViewState {
            user: Some(profile.clone()),
            loading: false,
            error: None,
        },
        Event::LookupFailed(error) => ViewState {
            user: None,
            loading: false,
            error: Some(*error),
        },
    }
}

/// How responses to overlapping searches are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StalePolicy {
    /// Every response is applied; whichever settles last is displayed.
    #[default]
    LastSettledWins,
    /// Responses to anything but the most recent search are dropped.
    LatestRequestWins,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

/// A search that has been started and is waiting for its lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLookup {
    pub id: RequestId,
    /// Trimmed, non-empty handle to look up.
    pub handle: String,
}

type Listener = Box<dyn FnMut(&ViewState)>;

/// Single owner of the [`ViewState`].
pub struct Coordinator {
    state: ViewState,
    policy: StalePolicy,
    next_id: u64,
    latest: Option<RequestId>,
    listeners: Vec<Listener>,
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new(StalePolicy::default())
    }
}

impl Coordinator {
    pub fn new(policy: StalePolicy) -> Self {
        Self {
            state: ViewState::default(),
            policy,
            next_id: 0,
            latest: None,
            listeners: Vec::new(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn loading(&self) -> bool {
        self.state.loading
    }

    /// Registers a view. It is called synchronously after every change.
    pub fn subscribe(&mut self, listener: impl FnMut(&ViewState) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Starts a search for `raw_handle`.
    ///
    /// Blank input settles immediately as [`ViewError::EmptyInput`] and
    /// returns `None`. Otherwise the loading state is published before this
    /// returns, and the caller must hand the lookup result to
    /// [`settle`](Self::settle).
    pub fn begin(&mut self, raw_handle: &str) -> Option<PendingLookup> {
        let handle = raw_handle.trim();
        if handle.is_empty() {
            debug!("search submitted with an empty handle");
            // A blank search supersedes whatever is still in flight.
            self.latest = None;
            self.apply(&Event::EmptySubmitted);
            return None;
        }

        let id = RequestId(self.next_id);
        self.next_id += 1;
        self.latest = Some(id);

        debug!(request = id.0, %handle, "search started");
        self.apply(&Event::LookupStarted);

        Some(PendingLookup {
            id,
            handle: handle.to_string(),
        })
    }

    /// Applies the result of a lookup started by [`begin`](Self::begin).
    ///
    /// Returns `false` when the result was discarded as stale.
    pub fn settle(&mut self, id: RequestId, outcome: Result<Profile, LookupError>) -> bool {
        let event = match outcome {
            Ok(profile) => Event::LookupSucceeded(profile),
            Err(err) => {
                debug!(request = id.0, error = %err, "lookup failed");
                Event::LookupFailed(ViewError::from(&err))
            }
        };
        self.finish(id, event)
    }

    /// Settles a lookup that ended without an outcome (panicked or was
    /// cancelled). Shown as a generic error.
    pub fn abandon(&mut self, id: RequestId, reason: &str) -> bool {
        warn!(request = id.0, %reason, "lookup ended unexpectedly");
        self.finish(id, Event::LookupFailed(ViewError::GenericError))
    }

    /// Runs a complete search: [`begin`](Self::begin), the lookup, then
    /// [`settle`](Self::settle). A panicking lookup is treated like
    /// [`abandon`](Self::abandon).
    pub async fn submit_search<L>(&mut self, lookup: &L, raw_handle: &str)
    where
        L: ProfileLookup + ?Sized,
    {
        let Some(pending) = self.begin(raw_handle) else {
            return;
        };

        match AssertUnwindSafe(lookup.lookup(&pending.handle))
            .catch_unwind()
            .await
        {
            Ok(outcome) => {
                self.settle(pending.id, outcome);
            }
            Err(panic) => {
                let reason = panic_message(panic.as_ref());
                self.abandon(pending.id, &reason);
            }
        }
    }

    fn finish(&mut self, id: RequestId, event: Event) -> bool {
        if self.policy == StalePolicy::LatestRequestWins && self.latest != Some(id) {
            debug!(request = id.0, "dropping stale lookup result");
            return false;
        }
        self.apply(&event);
        true
    }

    fn apply(&mut self, event: &Event) {
        let next = reduce(&self.state, event);
        if next == self.state {
            return;
        }
        self.state = next;
        for listener in &mut self.listeners {
            listener(&self.state);
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "lookup panicked".to_string()
    }
}
