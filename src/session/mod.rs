//! The identification workflow state machine.
//!
//! An [`IdentificationSession`] owns the lifecycle of one scan attempt:
//! selecting an image, submitting it to the remote classifier, and presenting
//! success or failure. The machine moves through
//! `Idle -> Selected -> Analyzing -> Resolved | Failed`; `reset` returns to
//! `Idle` from any state, and selecting a new image discards any prior
//! result or error.
//!
//! At most one submission is ever in flight per session: `analyze` is a no-op
//! unless the state is exactly `Selected`. A failed analysis is terminal for
//! the attempt; the only recovery paths are selecting a new image or `reset`.

pub mod classifier;
pub mod preview;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use thiserror::Error;

pub use classifier::{Classifier, ClassifyError, Identification};
pub use preview::Preview;

/// Observable state tag of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No image chosen.
    Idle,
    /// An image is chosen but not yet submitted.
    Selected,
    /// A submission is in flight.
    Analyzing,
    /// The classifier answered; a result is available.
    Resolved,
    /// The attempt failed; a user-facing message is available.
    Failed,
}

/// Error type for image selection.
#[derive(Debug, Error)]
pub enum SelectImageError {
    /// The image file could not be read.
    #[error("could not read image {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A submission is in flight; the selection cannot be replaced right now.
    #[error("an analysis is in flight; wait for it to finish or reset")]
    AnalysisInFlight,
}

/// A user-chosen image: the raw payload for submission plus a previewable
/// reference. Never persisted; replaced or cleared on reset.
#[derive(Debug)]
struct Selection {
    path: PathBuf,
    bytes: Vec<u8>,
    preview: Option<Preview>,
}

/// Internal machine state. Result and error live in separate variants, so
/// they can never both be present.
#[derive(Debug)]
enum State {
    Idle,
    Selected(Selection),
    Analyzing { selection: Selection, attempt: u64 },
    Resolved { selection: Selection, result: Identification },
    Failed { selection: Selection, message: String },
}

/// The workflow state machine for one identification attempt at a time.
#[derive(Debug)]
pub struct IdentificationSession {
    classifier: Classifier,
    state: Mutex<State>,
    attempts: Mutex<u64>,
}

impl IdentificationSession {
    /// Create a session that submits to the given classifier.
    #[must_use]
    pub fn new(classifier: Classifier) -> Self {
        Self {
            classifier,
            state: Mutex::new(State::Idle),
            attempts: Mutex::new(0),
        }
    }

    /// Choose an image for the next attempt.
    ///
    /// Reads the raw bytes, generates a best-effort preview thumbnail, and
    /// moves to `Selected`, discarding any prior selection, result, or error.
    /// The file is not validated as an image here; that is the file picker's
    /// concern. Rejected only while a submission is in flight.
    pub fn select_image(&self, path: &Path) -> Result<(), SelectImageError> {
        let bytes = fs::read(path).map_err(|source| SelectImageError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let preview = Preview::generate(&bytes);

        let mut state = self.lock_state();
        if matches!(*state, State::Analyzing { .. }) {
            return Err(SelectImageError::AnalysisInFlight);
        }

        *state = State::Selected(Selection {
            path: path.to_path_buf(),
            bytes,
            preview,
        });
        log::debug!("selected {}", path.display());
        Ok(())
    }

    /// Submit the selected image to the classifier.
    ///
    /// No-op unless the state is exactly `Selected`: calling with nothing
    /// selected, while a submission is in flight, or after the attempt has
    /// concluded issues no request and changes nothing. On completion the
    /// session holds either the parsed identification (`Resolved`) or a
    /// user-facing failure message (`Failed`). No retries are attempted.
    pub async fn analyze(&self) {
        let (file_name, bytes, attempt) = {
            let mut state = self.lock_state();
            match std::mem::replace(&mut *state, State::Idle) {
                State::Selected(selection) => {
                    let attempt = self.next_attempt();
                    let file_name = selection
                        .path
                        .file_name()
                        .map(|name| name.to_string_lossy().into_owned())
                        .unwrap_or_else(|| "image".to_string());
                    let bytes = selection.bytes.clone();
                    *state = State::Analyzing { selection, attempt };
                    (file_name, bytes, attempt)
                }
                other => {
                    log::debug!("analyze ignored: nothing ready to submit");
                    *state = other;
                    return;
                }
            }
        };

        // Exactly one submission per attempt; the lock is never held here.
        let outcome = self.classifier.predict(&file_name, bytes).await;

        let mut state = self.lock_state();
        match std::mem::replace(&mut *state, State::Idle) {
            State::Analyzing { selection, attempt: current } if current == attempt => {
                *state = match outcome {
                    Ok(result) => {
                        log::info!(
                            "identified {} (confidence {:.0}%)",
                            result.name,
                            result.confidence * 100.0
                        );
                        State::Resolved { selection, result }
                    }
                    Err(e) => {
                        log::debug!("analysis failed: {}", e);
                        State::Failed {
                            selection,
                            message: e.to_string(),
                        }
                    }
                };
            }
            other => {
                // The attempt was cleared while the request was in flight;
                // a stale completion must not resurrect it.
                log::debug!("dropping completion of superseded attempt {}", attempt);
                *state = other;
            }
        }
    }

    /// Clear the selection, result, and error from any state.
    ///
    /// Returns to `Idle` and releases the preview thumbnail. An in-flight
    /// request is not aborted, but its completion will be dropped.
    pub fn reset(&self) {
        let mut state = self.lock_state();
        *state = State::Idle;
        log::debug!("session reset");
    }

    /// Current state tag.
    #[must_use]
    pub fn phase(&self) -> Phase {
        match *self.lock_state() {
            State::Idle => Phase::Idle,
            State::Selected(_) => Phase::Selected,
            State::Analyzing { .. } => Phase::Analyzing,
            State::Resolved { .. } => Phase::Resolved,
            State::Failed { .. } => Phase::Failed,
        }
    }

    /// The identification, when the state is `Resolved`.
    #[must_use]
    pub fn result(&self) -> Option<Identification> {
        match &*self.lock_state() {
            State::Resolved { result, .. } => Some(result.clone()),
            _ => None,
        }
    }

    /// The user-facing failure message, when the state is `Failed`.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        match &*self.lock_state() {
            State::Failed { message, .. } => Some(message.clone()),
            _ => None,
        }
    }

    /// Path of the selected image, when one is selected.
    #[must_use]
    pub fn selected_image(&self) -> Option<PathBuf> {
        self.with_selection(|selection| selection.path.clone())
    }

    /// Path of the preview thumbnail, when one could be generated.
    #[must_use]
    pub fn preview_path(&self) -> Option<PathBuf> {
        self.with_selection(|selection| {
            selection
                .preview
                .as_ref()
                .map(|preview| preview.path().to_path_buf())
        })
        .flatten()
    }

    fn with_selection<T>(&self, f: impl FnOnce(&Selection) -> T) -> Option<T> {
        match &*self.lock_state() {
            State::Idle => None,
            State::Selected(selection)
            | State::Analyzing { selection, .. }
            | State::Resolved { selection, .. }
            | State::Failed { selection, .. } => Some(f(selection)),
        }
    }

    fn next_attempt(&self) -> u64 {
        let mut attempts = self
            .attempts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *attempts += 1;
        *attempts
    }

    // The lock is only ever held for short synchronous sections, never
    // across an await.
    fn lock_state(&self) -> MutexGuard<'_, State> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
