//! Concurrent screen loading
//!
//! A screen's reads are grouped into a batch: one primary source and any
//! number of secondaries, all awaited together on the current task. Each
//! result is applied to the shared view model as it settles, unless the
//! batch has been cancelled in the meantime. Starting a new batch cancels
//! the previous one; requests already in flight still complete but their
//! results are discarded.
//!
//! Outcome rules:
//! - primary failed: the view is in error, whatever the secondaries did
//! - a secondary failed: its section is left out and listed as degraded
//! - everything settled: the view is ready

use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use tokio_util::sync::CancellationToken;

use crate::domain::result::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceRole {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadPhase {
    Idle,
    Loading,
    Error(String),
    Ready,
}

/// Shared, observable state of one screen
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel<T> {
    pub phase: LoadPhase,
    pub sections: Vec<T>,
    pub degraded: Vec<&'static str>,
}

impl<T> Default for ViewModel<T> {
    fn default() -> Self {
        Self {
            phase: LoadPhase::Idle,
            sections: Vec::new(),
            degraded: Vec::new(),
        }
    }
}

/// Sections of a settled batch
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedView<T> {
    pub sections: Vec<T>,
    /// Secondary sources that failed and were left out
    pub degraded: Vec<&'static str>,
}

struct Source<T> {
    name: &'static str,
    role: SourceRole,
    future: BoxFuture<'static, Result<T>>,
}

/// Owns the view model of one screen and the token of its current batch
pub struct DataFetchOrchestrator<T> {
    state: Arc<Mutex<ViewModel<T>>>,
    current: Mutex<Option<CancellationToken>>,
}

impl<T: Clone + Send + 'static> Default for DataFetchOrchestrator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + 'static> DataFetchOrchestrator<T> {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(ViewModel::default())),
            current: Mutex::new(None),
        }
    }

    /// Start a new batch, cancelling the one before it
    pub fn begin(&self) -> Batch<T> {
        let token = CancellationToken::new();
        {
            let mut current = lock(&self.current);
            if let Some(previous) = current.replace(token.clone()) {
                previous.cancel();
            }
        }

        *lock(&self.state) = ViewModel {
            phase: LoadPhase::Loading,
            ..ViewModel::default()
        };

        Batch {
            token,
            state: self.state.clone(),
            sources: Vec::new(),
        }
    }

    /// Navigation away: the current batch may no longer touch state
    pub fn teardown(&self) {
        if let Some(token) = lock(&self.current).take() {
            token.cancel();
        }
    }

    pub fn snapshot(&self) -> ViewModel<T> {
        lock(&self.state).clone()
    }
}

/// One screen load in preparation or in flight
pub struct Batch<T> {
    token: CancellationToken,
    state: Arc<Mutex<ViewModel<T>>>,
    sources: Vec<Source<T>>,
}

impl<T: Clone + Send + 'static> Batch<T> {
    pub fn primary(self, name: &'static str, future: BoxFuture<'static, Result<T>>) -> Self {
        self.source(name, SourceRole::Primary, future)
    }

    pub fn secondary(self, name: &'static str, future: BoxFuture<'static, Result<T>>) -> Self {
        self.source(name, SourceRole::Secondary, future)
    }

    fn source(
        mut self,
        name: &'static str,
        role: SourceRole,
        future: BoxFuture<'static, Result<T>>,
    ) -> Self {
        self.sources.push(Source { name, role, future });
        self
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Await every source and settle the view
    ///
    /// Returns the primary's error if it failed, or `Error::Cancelled` if the
    /// batch was superseded or torn down before it settled.
    pub async fn run(self) -> Result<LoadedView<T>> {
        let Batch {
            token,
            state,
            sources,
        } = self;

        let mut pending: FuturesUnordered<_> = sources
            .into_iter()
            .map(|source| async move { (source.name, source.role, source.future.await) })
            .collect();

        let mut primary_error: Option<Error> = None;

        while let Some((name, role, result)) = pending.next().await {
            if token.is_cancelled() {
                continue;
            }

            let mut view = lock(&state);
            match (role, result) {
                (_, Ok(section)) => view.sections.push(section),
                (SourceRole::Secondary, Err(_)) => view.degraded.push(name),
                (SourceRole::Primary, Err(e)) => primary_error = Some(e),
            }
        }

        if token.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let mut view = lock(&state);
        if let Some(e) = primary_error {
            view.phase = LoadPhase::Error(e.to_string());
            return Err(e);
        }
        view.phase = LoadPhase::Ready;

        Ok(LoadedView {
            sections: view.sections.clone(),
            degraded: view.degraded.clone(),
        })
    }
}

fn lock<V>(mutex: &Mutex<V>) -> std::sync::MutexGuard<'_, V> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
