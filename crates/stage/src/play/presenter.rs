use std::fmt::Debug;

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum PresentError {
    #[error("asset '{0}' is not loaded")]
    MissingAsset(String),
    #[error("playback rejected: {0}")]
    Rejected(String),
}

/// The rendering/animation framework boundary. The round code hands every
/// fired cue to a presenter and never waits on it; a failing presenter is
/// logged by the caller and the cue is treated as presented.
pub trait Presenter<C> {
    fn present(&mut self, cue: &C) -> Result<(), PresentError>;
}

/// Default presenter for headless runs: cues go to the debug log.
#[derive(Debug, Default)]
pub struct LoggingPresenter;

impl<C: Debug> Presenter<C> for LoggingPresenter {
    fn present(&mut self, cue: &C) -> Result<(), PresentError> {
        debug!(cue = ?cue, "cue_presented");
        Ok(())
    }
}

/// Captures every presented cue; used by tests and the replay summary.
#[derive(Debug, Default)]
pub struct RecordingPresenter<C> {
    presented: Vec<C>,
}

impl<C> RecordingPresenter<C> {
    pub fn new() -> Self {
        Self {
            presented: Vec::new(),
        }
    }

    pub fn presented(&self) -> &[C] {
        &self.presented
    }

    pub fn take(&mut self) -> Vec<C> {
        std::mem::take(&mut self.presented)
    }
}

impl<C: Clone> Presenter<C> for RecordingPresenter<C> {
    fn present(&mut self, cue: &C) -> Result<(), PresentError> {
        self.presented.push(cue.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_presenter_keeps_cue_order() {
        let mut presenter = RecordingPresenter::new();
        presenter.present(&"a").expect("present");
        presenter.present(&"b").expect("present");
        assert_eq!(presenter.presented(), &["a", "b"]);
        assert_eq!(presenter.take(), vec!["a", "b"]);
        assert!(presenter.presented().is_empty());
    }

    #[test]
    fn logging_presenter_accepts_any_debug_cue() {
        let mut presenter = LoggingPresenter;
        assert!(presenter.present(&42u32).is_ok());
    }
}
