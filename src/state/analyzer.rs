/// Analyzer state machine
///
/// The analyzer view is always in exactly one of four phases. Each
/// variant carries only the data valid in that phase, so combinations
/// like "loading with an error but no image" cannot be represented.
///
/// Background work (file reads, preview derivation, analysis requests)
/// is tagged with the epoch it was started under. Every file read and
/// every reset starts a new epoch; completions from an older epoch are
/// dropped.

use crate::media::preview::Preview;

use super::data::{AnalysisResult, PickedFile, SelectedImage};
use super::error::{AnalysisError, LoadError, ValidationError};

/// Phase of the analyzer, without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Empty,
    Selected,
    Loading,
    Result,
}

#[derive(Debug, Clone)]
pub enum AnalyzerState {
    /// No image selected
    Empty { error: Option<String> },
    /// Image selected, no request in flight
    Selected {
        image: SelectedImage,
        preview: Option<Preview>,
        error: Option<String>,
    },
    /// Request in flight
    Loading {
        image: SelectedImage,
        preview: Option<Preview>,
    },
    /// Analysis result available
    Result {
        image: SelectedImage,
        preview: Option<Preview>,
        result: AnalysisResult,
        show_extracted_text: bool,
    },
}

impl Default for AnalyzerState {
    fn default() -> Self {
        AnalyzerState::Empty { error: None }
    }
}

/// Preview derivation to run for a freshly selected image
#[derive(Debug, Clone)]
pub struct PreviewJob {
    pub epoch: u64,
    pub image: SelectedImage,
}

/// Submission to run against the analysis service
#[derive(Debug, Clone)]
pub struct AnalysisJob {
    pub epoch: u64,
    pub image: SelectedImage,
}

/// Owner of the analyzer state and its staleness epoch
#[derive(Debug, Default)]
pub struct Analyzer {
    state: AnalyzerState,
    epoch: u64,
}

impl Analyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        match self.state {
            AnalyzerState::Empty { .. } => Phase::Empty,
            AnalyzerState::Selected { .. } => Phase::Selected,
            AnalyzerState::Loading { .. } => Phase::Loading,
            AnalyzerState::Result { .. } => Phase::Result,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.phase() == Phase::Loading
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            AnalyzerState::Empty { error } | AnalyzerState::Selected { error, .. } => {
                error.as_deref()
            }
            _ => None,
        }
    }

    pub fn image(&self) -> Option<&SelectedImage> {
        match &self.state {
            AnalyzerState::Empty { .. } => None,
            AnalyzerState::Selected { image, .. }
            | AnalyzerState::Loading { image, .. }
            | AnalyzerState::Result { image, .. } => Some(image),
        }
    }

    pub fn preview(&self) -> Option<&Preview> {
        match &self.state {
            AnalyzerState::Empty { .. } => None,
            AnalyzerState::Selected { preview, .. }
            | AnalyzerState::Loading { preview, .. }
            | AnalyzerState::Result { preview, .. } => preview.as_ref(),
        }
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match &self.state {
            AnalyzerState::Result { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn shows_extracted_text(&self) -> bool {
        matches!(
            self.state,
            AnalyzerState::Result {
                show_extracted_text: true,
                ..
            }
        )
    }

    /// Open a new epoch for a file read about to be dispatched
    ///
    /// Supersedes any read, preview or analysis still in flight.
    pub fn begin_acquisition(&mut self) -> u64 {
        self.epoch += 1;
        tracing::debug!(epoch = self.epoch, "acquisition started");
        self.epoch
    }

    /// Acquire a picked or dropped file read under `epoch`
    ///
    /// Any prior result and error are discarded first. On rejection the
    /// previous selection is cleared as well. Reads overtaken by a later
    /// acquisition or a reset change nothing.
    pub fn acquire(
        &mut self,
        epoch: u64,
        file: Result<PickedFile, LoadError>,
    ) -> Option<PreviewJob> {
        if epoch != self.epoch {
            tracing::debug!(epoch, current = self.epoch, "dropping stale file read");
            return None;
        }

        let selected = file.and_then(|f| SelectedImage::try_from(f).map_err(LoadError::from));

        match selected {
            Ok(image) => {
                tracing::debug!(file = image.name(), epoch = self.epoch, "image selected");
                self.state = AnalyzerState::Selected {
                    image: image.clone(),
                    preview: None,
                    error: None,
                };
                Some(PreviewJob {
                    epoch: self.epoch,
                    image,
                })
            }
            Err(e) => {
                tracing::warn!(error = %e, "file acquisition rejected");
                self.state = AnalyzerState::Empty {
                    error: Some(e.to_string()),
                };
                None
            }
        }
    }

    /// Attach a finished preview, unless it belongs to a superseded selection
    pub fn apply_preview(&mut self, epoch: u64, new_preview: Preview) -> bool {
        if epoch != self.epoch {
            tracing::debug!(epoch, current = self.epoch, "dropping stale preview");
            return false;
        }

        match &mut self.state {
            AnalyzerState::Empty { .. } => false,
            AnalyzerState::Selected { preview, .. }
            | AnalyzerState::Loading { preview, .. }
            | AnalyzerState::Result { preview, .. } => {
                *preview = Some(new_preview);
                true
            }
        }
    }

    /// Start an analysis of the current selection
    ///
    /// A no-op while a request is in flight. Without a selection the
    /// validation error is recorded and no job is produced.
    pub fn begin_analysis(&mut self) -> Option<AnalysisJob> {
        match std::mem::take(&mut self.state) {
            AnalyzerState::Empty { .. } => {
                self.state = AnalyzerState::Empty {
                    error: Some(ValidationError::NoImageSelected.to_string()),
                };
                None
            }
            loading @ AnalyzerState::Loading { .. } => {
                self.state = loading;
                None
            }
            AnalyzerState::Selected { image, preview, .. }
            | AnalyzerState::Result { image, preview, .. } => {
                tracing::debug!(file = image.name(), epoch = self.epoch, "analysis started");
                self.state = AnalyzerState::Loading {
                    image: image.clone(),
                    preview,
                };
                Some(AnalysisJob {
                    epoch: self.epoch,
                    image,
                })
            }
        }
    }

    /// Record the outcome of an analysis request
    ///
    /// Leaves Loading in every case. Completions for a selection that has
    /// since been reset or replaced are ignored.
    pub fn finish_analysis(
        &mut self,
        epoch: u64,
        outcome: Result<AnalysisResult, AnalysisError>,
    ) -> bool {
        if epoch != self.epoch || !self.is_loading() {
            tracing::warn!(epoch, current = self.epoch, "ignoring stale analysis completion");
            return false;
        }

        let AnalyzerState::Loading { image, preview } = std::mem::take(&mut self.state) else {
            return false;
        };

        self.state = match outcome {
            Ok(result) => {
                tracing::debug!(class = %result.classification, score = result.score, "analysis succeeded");
                AnalyzerState::Result {
                    image,
                    preview,
                    result,
                    show_extracted_text: false,
                }
            }
            Err(e) => {
                tracing::error!(error = ?e, "analysis error");
                AnalyzerState::Selected {
                    image,
                    preview,
                    error: Some(e.user_message()),
                }
            }
        };
        true
    }

    /// Return to Empty, discarding everything
    pub fn reset(&mut self) {
        self.epoch += 1;
        self.state = AnalyzerState::Empty { error: None };
        tracing::debug!(epoch = self.epoch, "analyzer reset");
    }

    pub fn toggle_extracted_text(&mut self) {
        if let AnalyzerState::Result {
            show_extracted_text,
            ..
        } = &mut self.state
        {
            *show_extracted_text = !*show_extracted_text;
        }
    }
}
