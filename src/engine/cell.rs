//! Lazy, single-flight engine initialization

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use super::{EngineLoader, TransliterationEngine};
use crate::core::errors::{EngineError, PipelineError};

/// Lifecycle of the shared engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No load has started
    Uninitialized,
    /// A load is in flight
    Initializing,
    /// Engine available
    Ready,
    /// Load failed; final
    Failed,
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineState::Uninitialized => write!(f, "uninitialized"),
            EngineState::Initializing => write!(f, "initializing"),
            EngineState::Ready => write!(f, "ready"),
            EngineState::Failed => write!(f, "failed"),
        }
    }
}

type Outcome = Result<Arc<dyn TransliterationEngine>, EngineError>;

/// Marks a load as in flight until dropped, including when the loading
/// future is cancelled
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn enter(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Holds the engine once its loader has run
///
/// At most one load is in flight; callers that arrive meanwhile wait on the
/// same cell and observe its outcome. A failed load is final for the life of
/// the cell.
pub struct EngineCell {
    loader: Arc<dyn EngineLoader>,
    outcome: OnceCell<Outcome>,
    initializing: AtomicBool,
}

impl EngineCell {
    /// Uninitialized cell that will run `loader` on first use
    pub fn new(loader: Arc<dyn EngineLoader>) -> Self {
        Self {
            loader,
            outcome: OnceCell::new(),
            initializing: AtomicBool::new(false),
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> EngineState {
        match self.outcome.get() {
            Some(Ok(_)) => EngineState::Ready,
            Some(Err(_)) => EngineState::Failed,
            None if self.initializing.load(Ordering::SeqCst) => EngineState::Initializing,
            None => EngineState::Uninitialized,
        }
    }

    /// Return the ready engine, running the loader on first use
    pub async fn ensure_ready(&self) -> Result<Arc<dyn TransliterationEngine>, PipelineError> {
        let outcome = self
            .outcome
            .get_or_init(|| async {
                let _in_flight = InFlight::enter(&self.initializing);
                info!("Initializing transliteration engine");

                let outcome = self.loader.load().await;
                match &outcome {
                    Ok(_) => info!("Transliteration engine ready"),
                    Err(e) => warn!("Transliteration engine unavailable: {}", e),
                }

                outcome
            })
            .await;

        outcome.clone().map_err(|e| PipelineError::EngineUnavailable {
            reason: e.to_string(),
        })
    }
}
