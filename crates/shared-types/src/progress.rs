//! # Pipeline Progress
//!
//! Progress notifications a pipeline run pushes to its caller.
//!
//! A run emits a finite sequence of [`ProcessStep`]s through a
//! [`ProgressSink`]. [`StepEmitter`] is the only way coordinators emit steps:
//! it keeps progress non-decreasing and guarantees exactly one terminal step.
//!
//! ```text
//! INIT → KEY_GEN → EVE_CHECK ─┬─→ ABORT
//!                             └─→ ENCRYPT → PERSIST_RECORD → PERSIST_KEY → SYNC → DONE
//! (any stage) ──────────────────→ FAILED
//! ```

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;
use tracing::warn;

/// Stages of a secured-operation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PipelineStage {
    /// Request accepted.
    Init,
    /// Key generation.
    KeyGen,
    /// Eavesdropper check.
    EveCheck,
    /// Payload sealing under the fresh key.
    Encrypt,
    /// Operation record written.
    PersistRecord,
    /// Key row written.
    PersistKey,
    /// Remote mirror push.
    Sync,
    /// Committed.
    Done,
    /// Aborted after an interception.
    Abort,
    /// Failed for a non-security reason.
    Failed,
}

impl PipelineStage {
    /// Fixed progress value reported for the stage.
    pub fn progress(&self) -> f64 {
        match self {
            PipelineStage::Init => 0.05,
            PipelineStage::KeyGen => 0.20,
            PipelineStage::EveCheck => 0.40,
            PipelineStage::Encrypt => 0.55,
            PipelineStage::PersistRecord => 0.70,
            PipelineStage::PersistKey => 0.80,
            PipelineStage::Sync => 0.90,
            PipelineStage::Done | PipelineStage::Abort | PipelineStage::Failed => 1.0,
        }
    }

    /// Short status label.
    pub fn status(&self) -> &'static str {
        match self {
            PipelineStage::Init => "Initializing secure channel",
            PipelineStage::KeyGen => "Generating quantum key",
            PipelineStage::EveCheck => "Checking for eavesdroppers",
            PipelineStage::Encrypt => "Encrypting payload",
            PipelineStage::PersistRecord => "Recording transaction",
            PipelineStage::PersistKey => "Storing key metadata",
            PipelineStage::Sync => "Syncing with server",
            PipelineStage::Done => "Completed",
            PipelineStage::Abort => "Aborted: eavesdropper detected",
            PipelineStage::Failed => "Failed",
        }
    }

    /// True for `Done`, `Abort` and `Failed`.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PipelineStage::Done | PipelineStage::Abort | PipelineStage::Failed
        )
    }
}

/// One progress notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessStep {
    /// Stage reached.
    pub stage: PipelineStage,
    /// Progress in [0, 1], non-decreasing within a run.
    pub progress: f64,
    /// Short status label.
    pub status: String,
    /// Explanatory text.
    pub detail: String,
    /// True exactly once per run, on the final step.
    pub is_terminal: bool,
}

/// Receiver of progress notifications.
pub trait ProgressSink: Send {
    /// Called once per emitted step, in order.
    fn on_step(&mut self, step: ProcessStep);
}

impl<F> ProgressSink for F
where
    F: FnMut(ProcessStep) + Send,
{
    fn on_step(&mut self, step: ProcessStep) {
        self(step)
    }
}

/// Sink that discards every step.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn on_step(&mut self, _step: ProcessStep) {}
}

/// Sink that keeps every step in memory.
#[derive(Debug, Default, Clone)]
pub struct StepRecorder {
    steps: Vec<ProcessStep>,
}

impl StepRecorder {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Steps received so far.
    pub fn steps(&self) -> &[ProcessStep] {
        &self.steps
    }

    /// Consume the recorder.
    pub fn into_steps(self) -> Vec<ProcessStep> {
        self.steps
    }

    /// Stages received so far, in order.
    pub fn stages(&self) -> Vec<PipelineStage> {
        self.steps.iter().map(|s| s.stage).collect()
    }
}

impl ProgressSink for StepRecorder {
    fn on_step(&mut self, step: ProcessStep) {
        self.steps.push(step);
    }
}

/// Sink forwarding steps into a tokio channel.
///
/// A dropped receiver means the caller abandoned the run; steps are then
/// discarded and the pipeline carries on to its terminal state.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: UnboundedSender<ProcessStep>,
}

impl ChannelSink {
    /// Wrap a sender.
    pub fn new(tx: UnboundedSender<ProcessStep>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelSink {
    fn on_step(&mut self, step: ProcessStep) {
        let _ = self.tx.send(step);
    }
}

/// Emits steps for one run, enforcing ordering and single termination.
pub struct StepEmitter<'a> {
    sink: &'a mut dyn ProgressSink,
    last_progress: f64,
    terminated: bool,
    emitted: usize,
}

impl<'a> StepEmitter<'a> {
    /// Start a run on `sink`.
    pub fn new(sink: &'a mut dyn ProgressSink) -> Self {
        Self {
            sink,
            last_progress: 0.0,
            terminated: false,
            emitted: 0,
        }
    }

    /// Emit a step for `stage`.
    ///
    /// Steps after the terminal one are dropped; progress never goes backwards.
    pub fn emit(&mut self, stage: PipelineStage, detail: impl Into<String>) {
        if self.terminated {
            warn!(stage = ?stage, "Dropping progress step emitted after terminal step");
            return;
        }

        let progress = stage.progress().max(self.last_progress);
        self.last_progress = progress;
        self.terminated = stage.is_terminal();
        self.emitted += 1;

        self.sink.on_step(ProcessStep {
            stage,
            progress,
            status: stage.status().to_string(),
            detail: detail.into(),
            is_terminal: stage.is_terminal(),
        });
    }

    /// True once a terminal step was emitted.
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Number of steps emitted.
    pub fn emitted(&self) -> usize {
        self.emitted
    }
}
